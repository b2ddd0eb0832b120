//! `PostgreSQL` directory implementation for user account storage.

use super::{
    models::{NewUserRow, UserRow},
    schema::users,
};
use crate::identity::{
    domain::{EmailAddress, PersistedUserData, UserAccount, UserId, Username},
    ports::{UserDirectory, UserDirectoryError, UserDirectoryResult},
};
use crate::storage::postgres::PgPool;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed user directory.
#[derive(Debug, Clone)]
pub struct PostgresUserDirectory {
    pool: PgPool,
}

impl PostgresUserDirectory {
    /// Creates a new directory from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> UserDirectoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> UserDirectoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(UserDirectoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(UserDirectoryError::persistence)?
    }
}

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    async fn register(&self, account: &UserAccount) -> UserDirectoryResult<()> {
        let new_row = to_new_row(account);
        let username = account.username().clone();
        let email = account.email().as_str().to_owned();

        self.run_blocking(move |connection| {
            diesel::insert_into(users::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if is_email_unique_violation(info.as_ref()) =>
                    {
                        UserDirectoryError::DuplicateEmail(email.clone())
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        UserDirectoryError::DuplicateUsername(username.clone())
                    }
                    _ => UserDirectoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: UserId) -> UserDirectoryResult<Option<UserAccount>> {
        self.run_blocking(move |connection| {
            let row = users::table
                .filter(users::id.eq(id.into_inner()))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(UserDirectoryError::persistence)?;
            row.map(row_to_account).transpose()
        })
        .await
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> UserDirectoryResult<Option<UserAccount>> {
        let lookup = username.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = users::table
                .filter(users::username.eq(lookup.as_str()))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(UserDirectoryError::persistence)?;
            row.map(row_to_account).transpose()
        })
        .await
    }
}

fn to_new_row(account: &UserAccount) -> NewUserRow {
    NewUserRow {
        id: account.id().into_inner(),
        username: account.username().as_str().to_owned(),
        email: account.email().as_str().to_owned(),
        about_me: account.about_me().map(str::to_owned),
        skills: account.skills().map(str::to_owned),
    }
}

fn row_to_account(row: UserRow) -> UserDirectoryResult<UserAccount> {
    let UserRow {
        id,
        username,
        email,
        about_me,
        skills,
    } = row;

    let data = PersistedUserData {
        id: UserId::from_uuid(id),
        username: Username::new(username).map_err(UserDirectoryError::persistence)?,
        email: EmailAddress::new(email).map_err(UserDirectoryError::persistence)?,
        about_me,
        skills,
    };
    Ok(UserAccount::from_persisted(data))
}

fn is_email_unique_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name().is_some_and(|name| name == "users_email_key")
}
