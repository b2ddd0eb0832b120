//! Tests for the in-memory user directory.

use crate::identity::{
    adapters::memory::InMemoryUserDirectory,
    domain::{EmailAddress, UserAccount, Username},
    ports::{UserDirectory, UserDirectoryError},
};
use crate::storage::MemoryDb;
use rstest::{fixture, rstest};

#[fixture]
fn directory() -> InMemoryUserDirectory {
    InMemoryUserDirectory::new(MemoryDb::new())
}

fn account(username: &str, email: &str) -> UserAccount {
    UserAccount::new(
        Username::new(username).expect("valid username"),
        EmailAddress::new(email).expect("valid email"),
    )
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn register_then_lookup_by_id_and_username(directory: InMemoryUserDirectory) {
    let fern = account("fern", "fern@example.org");
    directory.register(&fern).await.expect("registration should succeed");

    let by_id = directory
        .find_by_id(fern.id())
        .await
        .expect("lookup should succeed");
    let by_name = directory
        .find_by_username(fern.username())
        .await
        .expect("lookup should succeed");

    assert_eq!(by_id, Some(fern.clone()));
    assert_eq!(by_name, Some(fern));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn register_rejects_duplicate_username(directory: InMemoryUserDirectory) {
    directory
        .register(&account("fern", "fern@example.org"))
        .await
        .expect("first registration should succeed");

    let result = directory.register(&account("fern", "other@example.org")).await;

    assert!(matches!(
        result,
        Err(UserDirectoryError::DuplicateUsername(_))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn register_rejects_duplicate_email(directory: InMemoryUserDirectory) {
    directory
        .register(&account("fern", "fern@example.org"))
        .await
        .expect("first registration should succeed");

    let result = directory.register(&account("moss", "fern@example.org")).await;

    assert!(matches!(result, Err(UserDirectoryError::DuplicateEmail(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn lookup_of_unknown_username_returns_none(directory: InMemoryUserDirectory) {
    let missing = Username::new("nobody").expect("valid username");
    let found = directory
        .find_by_username(&missing)
        .await
        .expect("lookup should succeed");
    assert!(found.is_none());
}
