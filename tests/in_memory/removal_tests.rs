//! Participant removal and its task-unassignment side effect.

use super::helpers::Harness;
use atelier::membership::services::ApplyOutcome;
use atelier::project::services::CreateProjectRequest;
use atelier::task::ports::TaskRepository;
use atelier::task::services::CreateTaskRequest;

#[tokio::test(flavor = "multi_thread")]
async fn removal_unassigns_every_task_in_the_project() {
    let harness = Harness::new();
    let creator = harness.user("creator").await;
    let worker = harness.user("worker").await;

    let project = harness
        .projects
        .create(
            creator.id(),
            CreateProjectRequest::new("Field Guide", "Catalogue the local flora"),
        )
        .await
        .expect("project creation should succeed");
    let other_project = harness
        .projects
        .create(
            creator.id(),
            CreateProjectRequest::new("Seed Bank", "Store seeds for winter"),
        )
        .await
        .expect("project creation should succeed");

    let invitation = harness
        .memberships
        .invite(creator.id(), project.id(), "worker")
        .await
        .expect("invitation should succeed");
    harness
        .memberships
        .accept_invitation(worker.id(), invitation.id())
        .await
        .expect("acceptance should succeed");

    let first = harness
        .tasks
        .create_task(
            creator.id(),
            CreateTaskRequest::new(project.id(), "Press specimens")
                .with_assignee(worker.id()),
        )
        .await
        .expect("task creation should succeed");
    let second = harness
        .tasks
        .create_task(
            creator.id(),
            CreateTaskRequest::new(project.id(), "Label drawers").with_assignee(worker.id()),
        )
        .await
        .expect("task creation should succeed");
    let elsewhere = harness
        .tasks
        .create_task(
            creator.id(),
            CreateTaskRequest::new(other_project.id(), "Sort envelopes")
                .with_assignee(worker.id()),
        )
        .await
        .expect("task creation should succeed");

    let removal = harness
        .memberships
        .remove_participant(creator.id(), project.id(), worker.id())
        .await
        .expect("removal should succeed");

    assert_eq!(removal.unassigned_tasks, 2);
    for task_id in [first.id(), second.id()] {
        let stored = harness
            .task_repo
            .find(task_id)
            .await
            .expect("lookup should succeed")
            .expect("task should survive the removal");
        assert!(stored.assignee_id().is_none());
    }

    // Assignments in other projects are untouched.
    let untouched = harness
        .task_repo
        .find(elsewhere.id())
        .await
        .expect("lookup should succeed")
        .expect("task should exist");
    assert_eq!(untouched.assignee_id(), Some(worker.id()));
}

#[tokio::test(flavor = "multi_thread")]
async fn reapplication_after_removal_is_blocked_by_the_accepted_record() {
    let harness = Harness::new();
    let creator = harness.user("creator").await;
    let worker = harness.user("worker").await;

    let project = harness
        .projects
        .create(
            creator.id(),
            CreateProjectRequest::new("Field Guide", "Catalogue the local flora"),
        )
        .await
        .expect("project creation should succeed");
    let outcome = harness
        .memberships
        .apply(worker.id(), project.id())
        .await
        .expect("application should succeed");
    harness
        .memberships
        .accept_application(creator.id(), outcome.application().id())
        .await
        .expect("acceptance should succeed");
    harness
        .memberships
        .remove_participant(creator.id(), project.id(), worker.id())
        .await
        .expect("removal should succeed");

    // The accepted application remains the latest record, so a fresh apply
    // is treated as already open rather than inserting a new request. The
    // creator must reject or the applicant withdraw it to start over.
    let retry = harness
        .memberships
        .apply(worker.id(), project.id())
        .await
        .expect("apply should succeed as a no-op");
    assert!(matches!(retry, ApplyOutcome::AlreadyOpen(_)));

    harness
        .memberships
        .cancel_application(worker.id(), outcome.application().id())
        .await
        .expect("withdrawal should succeed");
    let fresh = harness
        .memberships
        .apply(worker.id(), project.id())
        .await
        .expect("re-application should succeed");
    assert!(matches!(fresh, ApplyOutcome::Submitted(_)));
}
