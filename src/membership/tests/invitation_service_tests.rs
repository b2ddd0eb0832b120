//! Service orchestration tests for the invitation flow and participant
//! removal.

use std::sync::Arc;

use crate::access::AccessError;
use crate::identity::{
    adapters::memory::InMemoryUserDirectory,
    domain::{EmailAddress, UserAccount, UserId, Username},
    ports::UserDirectory,
};
use crate::membership::{
    adapters::memory::InMemoryMembershipRepository,
    domain::MembershipStatus,
    ports::{MembershipRepository, MembershipRepositoryError},
    services::{MembershipService, MembershipServiceError},
};
use crate::project::{
    adapters::memory::InMemoryProjectRepository,
    domain::{Project, ProjectTitle},
    ports::ProjectRepository,
};
use crate::storage::MemoryDb;
use crate::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{Task, TaskTitle},
    ports::TaskRepository,
};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

type TestService = MembershipService<
    InMemoryProjectRepository,
    InMemoryMembershipRepository,
    InMemoryUserDirectory,
    DefaultClock,
>;

struct Fixture {
    service: TestService,
    projects: Arc<InMemoryProjectRepository>,
    memberships: Arc<InMemoryMembershipRepository>,
    directory: Arc<InMemoryUserDirectory>,
    tasks: Arc<InMemoryTaskRepository>,
}

#[fixture]
fn fixture() -> Fixture {
    let db = MemoryDb::new();
    let projects = Arc::new(InMemoryProjectRepository::new(db.clone()));
    let memberships = Arc::new(InMemoryMembershipRepository::new(db.clone()));
    let directory = Arc::new(InMemoryUserDirectory::new(db.clone()));
    let tasks = Arc::new(InMemoryTaskRepository::new(db));
    let service = MembershipService::new(
        Arc::clone(&projects),
        Arc::clone(&memberships),
        Arc::clone(&directory),
        Arc::new(DefaultClock),
    );
    Fixture {
        service,
        projects,
        memberships,
        directory,
        tasks,
    }
}

impl Fixture {
    async fn register(&self, username: &str) -> UserAccount {
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

    async fn project_owned_by(&self, creator: UserId) -> Project {
        let project = Project::new(
            ProjectTitle::new("Field Guide").expect("valid title"),
            "Catalogue the local flora",
            creator,
            &DefaultClock,
        )
        .expect("valid project");
        self.projects
            .insert(&project)
            .await
            .expect("project insert should succeed");
        project
    }

    async fn task_assigned_to(&self, project: &Project, assignee: UserId) -> Task {
        let task = Task::new(
            TaskTitle::new("Press specimens").expect("valid title"),
            "",
            project.id(),
            &DefaultClock,
        )
        .with_assignee(assignee);
        self.tasks
            .insert(&task)
            .await
            .expect("task insert should succeed");
        task
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn invite_creates_a_pending_invitation(fixture: Fixture) {
    let creator = fixture.register("creator").await;
    let guest = fixture.register("guest").await;
    let project = fixture.project_owned_by(creator.id()).await;

    let invitation = fixture
        .service
        .invite(creator.id(), project.id(), "guest")
        .await
        .expect("invitation should succeed");

    assert_eq!(invitation.status(), MembershipStatus::Pending);
    assert_eq!(invitation.user_id(), guest.id());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn invite_requires_the_creator(fixture: Fixture) {
    let creator = fixture.register("creator").await;
    fixture.register("guest").await;
    let stranger = fixture.register("stranger").await;
    let project = fixture.project_owned_by(creator.id()).await;

    let result = fixture
        .service
        .invite(stranger.id(), project.id(), "guest")
        .await;

    assert!(matches!(
        result,
        Err(MembershipServiceError::Access(AccessError::NotCreator { .. }))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn invite_unknown_username_reports_not_found(fixture: Fixture) {
    let creator = fixture.register("creator").await;
    let project = fixture.project_owned_by(creator.id()).await;

    let result = fixture
        .service
        .invite(creator.id(), project.id(), "nobody")
        .await;

    assert!(matches!(
        result,
        Err(MembershipServiceError::UnknownUsername(name)) if name == "nobody"
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn invite_conflicts_for_existing_participants(fixture: Fixture) {
    let creator = fixture.register("creator").await;
    let guest = fixture.register("guest").await;
    let project = fixture.project_owned_by(creator.id()).await;
    let invitation = fixture
        .service
        .invite(creator.id(), project.id(), "guest")
        .await
        .expect("invitation should succeed");
    fixture
        .service
        .accept_invitation(guest.id(), invitation.id())
        .await
        .expect("acceptance should succeed");

    let result = fixture
        .service
        .invite(creator.id(), project.id(), "guest")
        .await;

    assert!(matches!(
        result,
        Err(MembershipServiceError::AlreadyParticipant { .. })
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn invite_conflicts_while_an_invitation_is_pending(fixture: Fixture) {
    let creator = fixture.register("creator").await;
    fixture.register("guest").await;
    let project = fixture.project_owned_by(creator.id()).await;
    fixture
        .service
        .invite(creator.id(), project.id(), "guest")
        .await
        .expect("first invitation should succeed");

    let result = fixture
        .service
        .invite(creator.id(), project.id(), "guest")
        .await;

    assert!(matches!(
        result,
        Err(MembershipServiceError::AlreadyInvited { .. })
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn only_the_invitee_answers_an_invitation(fixture: Fixture) {
    let creator = fixture.register("creator").await;
    fixture.register("guest").await;
    let stranger = fixture.register("stranger").await;
    let project = fixture.project_owned_by(creator.id()).await;
    let invitation = fixture
        .service
        .invite(creator.id(), project.id(), "guest")
        .await
        .expect("invitation should succeed");

    let result = fixture
        .service
        .accept_invitation(stranger.id(), invitation.id())
        .await;

    assert!(matches!(
        result,
        Err(MembershipServiceError::Access(AccessError::NotSelf { .. }))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn accepting_an_invitation_creates_the_participant(fixture: Fixture) {
    let creator = fixture.register("creator").await;
    let guest = fixture.register("guest").await;
    let project = fixture.project_owned_by(creator.id()).await;
    let invitation = fixture
        .service
        .invite(creator.id(), project.id(), "guest")
        .await
        .expect("invitation should succeed");

    let accepted = fixture
        .service
        .accept_invitation(guest.id(), invitation.id())
        .await
        .expect("acceptance should succeed");

    assert_eq!(accepted.invitation.status(), MembershipStatus::Accepted);
    let is_member = fixture
        .memberships
        .is_participant(project.id(), guest.id())
        .await
        .expect("membership lookup should succeed");
    assert!(is_member);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejecting_an_invitation_keeps_the_user_out(fixture: Fixture) {
    let creator = fixture.register("creator").await;
    let guest = fixture.register("guest").await;
    let project = fixture.project_owned_by(creator.id()).await;
    let invitation = fixture
        .service
        .invite(creator.id(), project.id(), "guest")
        .await
        .expect("invitation should succeed");

    let rejected = fixture
        .service
        .reject_invitation(guest.id(), invitation.id())
        .await
        .expect("rejection should succeed");

    assert_eq!(rejected.status(), MembershipStatus::Rejected);
    let is_member = fixture
        .memberships
        .is_participant(project.id(), guest.id())
        .await
        .expect("membership lookup should succeed");
    assert!(!is_member);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn revoke_deletes_the_invitation_regardless_of_status(fixture: Fixture) {
    let creator = fixture.register("creator").await;
    let guest = fixture.register("guest").await;
    let project = fixture.project_owned_by(creator.id()).await;
    let invitation = fixture
        .service
        .invite(creator.id(), project.id(), "guest")
        .await
        .expect("invitation should succeed");
    fixture
        .service
        .reject_invitation(guest.id(), invitation.id())
        .await
        .expect("rejection should succeed");

    fixture
        .service
        .revoke_invitation(creator.id(), invitation.id())
        .await
        .expect("revocation should succeed");

    let remaining = fixture
        .service
        .invitations_for(project.id())
        .await
        .expect("listing should succeed");
    assert!(remaining.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn removing_a_participant_unassigns_their_tasks(fixture: Fixture) {
    let creator = fixture.register("creator").await;
    let guest = fixture.register("guest").await;
    let project = fixture.project_owned_by(creator.id()).await;
    let invitation = fixture
        .service
        .invite(creator.id(), project.id(), "guest")
        .await
        .expect("invitation should succeed");
    fixture
        .service
        .accept_invitation(guest.id(), invitation.id())
        .await
        .expect("acceptance should succeed");
    let task = fixture.task_assigned_to(&project, guest.id()).await;

    let removal = fixture
        .service
        .remove_participant(creator.id(), project.id(), guest.id())
        .await
        .expect("removal should succeed");

    assert_eq!(removal.unassigned_tasks, 1);
    let is_member = fixture
        .memberships
        .is_participant(project.id(), guest.id())
        .await
        .expect("membership lookup should succeed");
    assert!(!is_member);

    let stored = fixture
        .tasks
        .find(task.id())
        .await
        .expect("task lookup should succeed")
        .expect("task should survive the removal");
    assert!(stored.assignee_id().is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn removing_an_unknown_participant_reports_not_found(fixture: Fixture) {
    let creator = fixture.register("creator").await;
    let guest = fixture.register("guest").await;
    let project = fixture.project_owned_by(creator.id()).await;

    let result = fixture
        .service
        .remove_participant(creator.id(), project.id(), guest.id())
        .await;

    assert!(matches!(
        result,
        Err(MembershipServiceError::Repository(
            MembershipRepositoryError::ParticipantNotFound { .. }
        ))
    ));
}
