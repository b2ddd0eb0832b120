//! Project deletion cascades across every dependent table.

use super::helpers::Harness;
use atelier::failure::{Classify, FailureKind};
use atelier::membership::ports::MembershipRepository;
use atelier::project::domain::ProjectId;
use atelier::project::services::CreateProjectRequest;
use atelier::task::ports::TaskRepository;
use atelier::task::services::CreateTaskRequest;

#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_project_removes_every_dependent_row() {
    let harness = Harness::new();
    let creator = harness.user("creator").await;
    let worker = harness.user("worker").await;
    let hopeful = harness.user("hopeful").await;

    let project = harness
        .projects
        .create(
            creator.id(),
            CreateProjectRequest::new("Field Guide", "Catalogue the local flora")
                .with_deadline("2025-07-01"),
        )
        .await
        .expect("project creation should succeed");

    // Populate every dependent table.
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
    harness
        .memberships
        .apply(hopeful.id(), project.id())
        .await
        .expect("application should succeed");
    let task = harness
        .tasks
        .create_task(
            creator.id(),
            CreateTaskRequest::new(project.id(), "Press specimens")
                .with_assignee(worker.id()),
        )
        .await
        .expect("task creation should succeed");
    harness
        .tasks
        .add_subtask(worker.id(), task.id(), "draft", "2025-06-20")
        .await
        .expect("subtask creation should succeed");
    harness
        .messages
        .post(worker.id(), project.id(), "starting on the pressing")
        .await
        .expect("post should succeed");

    harness
        .projects
        .delete(creator.id(), project.id())
        .await
        .expect("deletion should succeed");

    assert!(
        harness
            .projects
            .find(project.id())
            .await
            .expect("lookup should succeed")
            .is_none()
    );
    assert!(
        harness
            .task_repo
            .tasks_for(project.id())
            .await
            .expect("listing should succeed")
            .is_empty()
    );
    assert!(
        harness
            .task_repo
            .subtasks_for(task.id())
            .await
            .expect("listing should succeed")
            .is_empty()
    );
    assert!(
        harness
            .membership_repo
            .participants(project.id())
            .await
            .expect("listing should succeed")
            .is_empty()
    );
    assert!(
        harness
            .membership_repo
            .applications_for(project.id())
            .await
            .expect("listing should succeed")
            .is_empty()
    );
    assert!(
        harness
            .membership_repo
            .invitations_for(project.id())
            .await
            .expect("listing should succeed")
            .is_empty()
    );
    assert!(
        harness
            .messages
            .feed(project.id())
            .await
            .expect("feed should succeed")
            .is_empty()
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn deleting_an_unknown_project_reports_not_found() {
    let harness = Harness::new();
    let creator = harness.user("creator").await;

    let result = harness.projects.delete(creator.id(), ProjectId::new()).await;

    assert_eq!(
        result.map_err(|err| err.kind()).err(),
        Some(FailureKind::NotFound)
    );
}
