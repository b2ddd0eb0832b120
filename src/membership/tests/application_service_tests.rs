//! Service orchestration tests for the application flow.

use std::sync::Arc;

use crate::access::AccessError;
use crate::failure::{Classify, FailureKind};
use crate::identity::{
    adapters::memory::InMemoryUserDirectory,
    domain::{EmailAddress, UserAccount, UserId, Username},
    ports::UserDirectory,
};
use crate::membership::{
    adapters::memory::InMemoryMembershipRepository,
    domain::MembershipStatus,
    ports::{MembershipRepository, MembershipRepositoryError},
    services::{ApplyOutcome, MembershipService, MembershipServiceError},
};
use crate::project::{
    adapters::memory::InMemoryProjectRepository,
    domain::{Project, ProjectId, ProjectTitle},
    ports::ProjectRepository,
};
use crate::storage::MemoryDb;
use mockable::{Clock, DefaultClock};
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
}

#[fixture]
fn fixture() -> Fixture {
    let db = MemoryDb::new();
    let projects = Arc::new(InMemoryProjectRepository::new(db.clone()));
    let memberships = Arc::new(InMemoryMembershipRepository::new(db.clone()));
    let directory = Arc::new(InMemoryUserDirectory::new(db));
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
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn apply_inserts_a_pending_application(fixture: Fixture) {
    let creator = fixture.register("creator").await;
    let applicant = fixture.register("applicant").await;
    let project = fixture.project_owned_by(creator.id()).await;

    let outcome = fixture
        .service
        .apply(applicant.id(), project.id())
        .await
        .expect("application should succeed");

    let ApplyOutcome::Submitted(application) = outcome else {
        panic!("expected a fresh submission");
    };
    assert_eq!(application.status(), MembershipStatus::Pending);
    assert_eq!(application.user_id(), applicant.id());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn apply_twice_is_idempotent_while_open(fixture: Fixture) {
    let creator = fixture.register("creator").await;
    let applicant = fixture.register("applicant").await;
    let project = fixture.project_owned_by(creator.id()).await;

    let first = fixture
        .service
        .apply(applicant.id(), project.id())
        .await
        .expect("first application should succeed");
    let second = fixture
        .service
        .apply(applicant.id(), project.id())
        .await
        .expect("second call should succeed as a no-op");

    assert!(matches!(second, ApplyOutcome::AlreadyOpen(_)));
    assert_eq!(second.application().id(), first.application().id());

    let rows = fixture
        .service
        .applications_by(applicant.id())
        .await
        .expect("listing should succeed");
    assert_eq!(rows.len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn apply_after_rejection_opens_a_fresh_record(fixture: Fixture) {
    let creator = fixture.register("creator").await;
    let applicant = fixture.register("applicant").await;
    let project = fixture.project_owned_by(creator.id()).await;

    let first = fixture
        .service
        .apply(applicant.id(), project.id())
        .await
        .expect("application should succeed");
    fixture
        .service
        .reject_application(creator.id(), first.application().id())
        .await
        .expect("rejection should succeed");

    let outcome = fixture
        .service
        .apply(applicant.id(), project.id())
        .await
        .expect("re-application should succeed");

    let ApplyOutcome::Submitted(second) = outcome else {
        panic!("expected a fresh submission after rejection");
    };
    assert_ne!(second.id(), first.application().id());

    let rows = fixture
        .service
        .applications_by(applicant.id())
        .await
        .expect("listing should succeed");
    assert_eq!(rows.len(), 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn creators_cannot_apply_to_their_own_project(fixture: Fixture) {
    let creator = fixture.register("creator").await;
    let project = fixture.project_owned_by(creator.id()).await;

    let result = fixture.service.apply(creator.id(), project.id()).await;

    assert!(matches!(
        result,
        Err(MembershipServiceError::CreatorApplication { .. })
    ));
    assert_eq!(
        result.map_err(|err| err.kind()).err(),
        Some(FailureKind::Forbidden)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn apply_to_unknown_project_reports_not_found(fixture: Fixture) {
    let applicant = fixture.register("applicant").await;
    let missing = ProjectId::new();

    let result = fixture.service.apply(applicant.id(), missing).await;

    assert!(matches!(
        result,
        Err(MembershipServiceError::ProjectNotFound(id)) if id == missing
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn accepting_an_application_creates_the_participant(fixture: Fixture) {
    let creator = fixture.register("creator").await;
    let applicant = fixture.register("applicant").await;
    let project = fixture.project_owned_by(creator.id()).await;
    let outcome = fixture
        .service
        .apply(applicant.id(), project.id())
        .await
        .expect("application should succeed");

    let accepted = fixture
        .service
        .accept_application(creator.id(), outcome.application().id())
        .await
        .expect("acceptance should succeed");

    assert_eq!(accepted.application.status(), MembershipStatus::Accepted);
    assert_eq!(accepted.participant.user_id(), applicant.id());
    let is_member = fixture
        .memberships
        .is_participant(project.id(), applicant.id())
        .await
        .expect("membership lookup should succeed");
    assert!(is_member);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn only_the_creator_accepts_applications(fixture: Fixture) {
    let creator = fixture.register("creator").await;
    let applicant = fixture.register("applicant").await;
    let stranger = fixture.register("stranger").await;
    let project = fixture.project_owned_by(creator.id()).await;
    let outcome = fixture
        .service
        .apply(applicant.id(), project.id())
        .await
        .expect("application should succeed");

    let result = fixture
        .service
        .accept_application(stranger.id(), outcome.application().id())
        .await;

    assert!(matches!(
        result,
        Err(MembershipServiceError::Access(AccessError::NotCreator { .. }))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn accepting_for_an_existing_participant_conflicts_and_rolls_back(fixture: Fixture) {
    let creator = fixture.register("creator").await;
    let applicant = fixture.register("applicant").await;
    let project = fixture.project_owned_by(creator.id()).await;

    // The applicant joins through an invitation first.
    let invitation = fixture
        .service
        .invite(creator.id(), project.id(), "applicant")
        .await
        .expect("invitation should succeed");
    fixture
        .service
        .accept_invitation(applicant.id(), invitation.id())
        .await
        .expect("invitation acceptance should succeed");

    // An application submitted earlier would normally be a no-op now, so
    // drive the repository directly to stage the race the uniqueness
    // constraint closes.
    let application = crate::membership::domain::Application::new(
        applicant.id(),
        project.id(),
        &DefaultClock,
    );
    fixture
        .memberships
        .insert_application(&application)
        .await
        .expect("staged application insert should succeed");

    let result = fixture
        .service
        .accept_application(creator.id(), application.id())
        .await;

    assert!(matches!(
        result,
        Err(MembershipServiceError::Repository(
            MembershipRepositoryError::DuplicateParticipant { .. }
        ))
    ));

    // The status change rolled back with the rejected transaction.
    let stored = fixture
        .memberships
        .find_application(application.id())
        .await
        .expect("lookup should succeed")
        .expect("application should still exist");
    assert_eq!(stored.status(), MembershipStatus::Pending);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cancelling_is_applicant_only_and_deletes_the_record(fixture: Fixture) {
    let creator = fixture.register("creator").await;
    let applicant = fixture.register("applicant").await;
    let stranger = fixture.register("stranger").await;
    let project = fixture.project_owned_by(creator.id()).await;
    let outcome = fixture
        .service
        .apply(applicant.id(), project.id())
        .await
        .expect("application should succeed");

    let denied = fixture
        .service
        .cancel_application(stranger.id(), outcome.application().id())
        .await;
    assert!(matches!(
        denied,
        Err(MembershipServiceError::Access(AccessError::NotSelf { .. }))
    ));

    fixture
        .service
        .cancel_application(applicant.id(), outcome.application().id())
        .await
        .expect("withdrawal should succeed");
    let rows = fixture
        .service
        .applications_by(applicant.id())
        .await
        .expect("listing should succeed");
    assert!(rows.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn latest_application_governs_reapplication_checks(fixture: Fixture) {
    let creator = fixture.register("creator").await;
    let applicant = fixture.register("applicant").await;
    let project = fixture.project_owned_by(creator.id()).await;

    let first = fixture
        .service
        .apply(applicant.id(), project.id())
        .await
        .expect("application should succeed");
    fixture
        .service
        .reject_application(creator.id(), first.application().id())
        .await
        .expect("rejection should succeed");
    fixture
        .service
        .apply(applicant.id(), project.id())
        .await
        .expect("re-application should succeed");

    // The latest record is the new pending one, so a further apply is a
    // no-op even though a rejected record exists in the history.
    let third = fixture
        .service
        .apply(applicant.id(), project.id())
        .await
        .expect("third call should succeed as a no-op");
    assert!(matches!(third, ApplyOutcome::AlreadyOpen(_)));

    let latest = fixture
        .memberships
        .latest_application(applicant.id(), project.id())
        .await
        .expect("latest lookup should succeed")
        .expect("a latest application should exist");
    assert_eq!(latest.status(), MembershipStatus::Pending);

    // Timestamps from the default clock can collide, so verify the clock
    // still moves forward across records.
    assert!(DefaultClock.utc() >= latest.applied_at());
}
