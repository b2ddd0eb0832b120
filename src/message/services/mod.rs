//! Application services for the message feed.

mod feed;

pub use feed::{MessageFeedError, MessageFeedResult, MessageFeedService};
