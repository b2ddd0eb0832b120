//! Shared harness wiring every service onto one in-memory database.

use std::sync::Arc;

use atelier::identity::adapters::memory::InMemoryUserDirectory;
use atelier::identity::domain::{EmailAddress, UserAccount, Username};
use atelier::identity::ports::UserDirectory;
use atelier::membership::adapters::memory::InMemoryMembershipRepository;
use atelier::membership::services::MembershipService;
use atelier::message::adapters::memory::InMemoryMessageRepository;
use atelier::message::services::MessageFeedService;
use atelier::project::adapters::memory::InMemoryProjectRepository;
use atelier::project::services::ProjectLifecycleService;
use atelier::storage::MemoryDb;
use atelier::task::adapters::memory::InMemoryTaskRepository;
use atelier::task::services::TaskLifecycleService;
use mockable::DefaultClock;

/// Project service wired to the in-memory adapters.
pub type Projects =
    ProjectLifecycleService<InMemoryProjectRepository, InMemoryMembershipRepository, DefaultClock>;
/// Membership service wired to the in-memory adapters.
pub type Memberships = MembershipService<
    InMemoryProjectRepository,
    InMemoryMembershipRepository,
    InMemoryUserDirectory,
    DefaultClock,
>;
/// Task service wired to the in-memory adapters.
pub type Tasks = TaskLifecycleService<
    InMemoryProjectRepository,
    InMemoryMembershipRepository,
    InMemoryTaskRepository,
    DefaultClock,
>;
/// Message service wired to the in-memory adapters.
pub type Messages = MessageFeedService<InMemoryMessageRepository, DefaultClock>;

/// Every engine service sharing one in-memory database.
pub struct Harness {
    /// User directory adapter, exposed for direct registration.
    pub directory: Arc<InMemoryUserDirectory>,
    /// Membership repository, exposed for direct state assertions.
    pub membership_repo: Arc<InMemoryMembershipRepository>,
    /// Task repository, exposed for direct state assertions.
    pub task_repo: Arc<InMemoryTaskRepository>,
    /// Project lifecycle service.
    pub projects: Projects,
    /// Membership service.
    pub memberships: Memberships,
    /// Task service.
    pub tasks: Tasks,
    /// Message feed service.
    pub messages: Messages,
}

impl Harness {
    /// Wires all services onto a fresh shared database.
    #[must_use]
    pub fn new() -> Self {
        let db = MemoryDb::new();
        let directory = Arc::new(InMemoryUserDirectory::new(db.clone()));
        let project_repo = Arc::new(InMemoryProjectRepository::new(db.clone()));
        let membership_repo = Arc::new(InMemoryMembershipRepository::new(db.clone()));
        let task_repo = Arc::new(InMemoryTaskRepository::new(db.clone()));
        let message_repo = Arc::new(InMemoryMessageRepository::new(db));
        let clock = Arc::new(DefaultClock);

        Self {
            projects: ProjectLifecycleService::new(
                Arc::clone(&project_repo),
                Arc::clone(&membership_repo),
                Arc::clone(&clock),
            ),
            memberships: MembershipService::new(
                Arc::clone(&project_repo),
                Arc::clone(&membership_repo),
                Arc::clone(&directory),
                Arc::clone(&clock),
            ),
            tasks: TaskLifecycleService::new(
                Arc::clone(&project_repo),
                Arc::clone(&membership_repo),
                Arc::clone(&task_repo),
                Arc::clone(&clock),
            ),
            messages: MessageFeedService::new(Arc::clone(&message_repo), clock),
            directory,
            membership_repo,
            task_repo,
        }
    }

    /// Registers a user with a derived email address.
    pub async fn user(&self, username: &str) -> UserAccount {
        let account = UserAccount::new(
            Username::new(username).expect("valid username"),
            EmailAddress::new(format!("{username}@example.org")).expect("valid email"),
        );
        self.directory
            .register(&account)
            .await
            .expect("registration should succeed");
        account
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}
