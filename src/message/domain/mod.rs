//! Domain model for the message feed.

mod error;
mod ids;
mod message;

pub use error::MessageDomainError;
pub use ids::MessageId;
pub use message::{Message, MessageBody, PersistedMessageData};
