//! `PostgreSQL` repository implementation for message storage.

use super::{
    models::{MessageRow, NewMessageRow},
    schema::messages,
};
use crate::identity::domain::UserId;
use crate::message::{
    domain::{Message, MessageBody, MessageId, PersistedMessageData},
    ports::{MessageRepository, MessageRepositoryError, MessageRepositoryResult},
};
use crate::project::domain::ProjectId;
use crate::storage::postgres::PgPool;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::Error as DieselError;

impl From<DieselError> for MessageRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

/// `PostgreSQL`-backed message repository.
#[derive(Debug, Clone)]
pub struct PostgresMessageRepository {
    pool: PgPool,
}

impl PostgresMessageRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> MessageRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> MessageRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(MessageRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(MessageRepositoryError::persistence)?
    }
}

#[async_trait]
impl MessageRepository for PostgresMessageRepository {
    async fn append(&self, message: &Message) -> MessageRepositoryResult<()> {
        let new_row = to_new_row(message);
        self.run_blocking(move |connection| {
            diesel::insert_into(messages::table)
                .values(&new_row)
                .execute(connection)?;
            Ok(())
        })
        .await
    }

    async fn messages_for(
        &self,
        project: ProjectId,
    ) -> MessageRepositoryResult<Vec<Message>> {
        self.run_blocking(move |connection| {
            let rows = messages::table
                .filter(messages::project_id.eq(project.into_inner()))
                .order(messages::sent_at.asc())
                .select(MessageRow::as_select())
                .load::<MessageRow>(connection)?;
            rows.into_iter().map(row_to_message).collect()
        })
        .await
    }
}

fn to_new_row(message: &Message) -> NewMessageRow {
    NewMessageRow {
        id: message.id().into_inner(),
        content: message.content().as_str().to_owned(),
        sent_at: message.sent_at(),
        user_id: message.user_id().into_inner(),
        project_id: message.project_id().into_inner(),
    }
}

fn row_to_message(row: MessageRow) -> MessageRepositoryResult<Message> {
    let MessageRow {
        id,
        content,
        sent_at,
        user_id,
        project_id,
    } = row;

    let data = PersistedMessageData {
        id: MessageId::from_uuid(id),
        content: MessageBody::new(content).map_err(MessageRepositoryError::persistence)?,
        sent_at,
        user_id: UserId::from_uuid(user_id),
        project_id: ProjectId::from_uuid(project_id),
    };
    Ok(Message::from_persisted(data))
}
