//! End-to-end recruitment and execution flow over one project.

use super::helpers::Harness;
use atelier::membership::domain::MembershipStatus;
use eyre::ensure;
use atelier::membership::services::ApplyOutcome;
use atelier::project::services::CreateProjectRequest;
use atelier::task::domain::{TaskDomainError, TaskStatus};
use atelier::task::ports::TaskRepository;
use atelier::task::services::{CreateTaskRequest, TaskLifecycleError};

#[tokio::test(flavor = "multi_thread")]
async fn application_to_completed_task_walkthrough() {
    let harness = Harness::new();
    let creator = harness.user("creator").await;
    let worker = harness.user("worker").await;

    // Project with a deadline; the creator is seeded as a participant.
    let project = harness
        .projects
        .create(
            creator.id(),
            CreateProjectRequest::new("Field Guide", "Catalogue the local flora")
                .with_deadline("2025-07-01"),
        )
        .await
        .expect("project creation should succeed");

    // The worker applies and the creator accepts.
    let outcome = harness
        .memberships
        .apply(worker.id(), project.id())
        .await
        .expect("application should succeed");
    let ApplyOutcome::Submitted(application) = outcome else {
        panic!("expected a fresh application");
    };
    assert_eq!(application.status(), MembershipStatus::Pending);

    let accepted = harness
        .memberships
        .accept_application(creator.id(), application.id())
        .await
        .expect("acceptance should succeed");
    assert_eq!(accepted.application.status(), MembershipStatus::Accepted);

    // A task without an explicit deadline inherits the project's.
    let task = harness
        .tasks
        .create_task(
            creator.id(),
            CreateTaskRequest::new(project.id(), "Press specimens")
                .with_assignee(worker.id()),
        )
        .await
        .expect("task creation should succeed");
    assert_eq!(
        task.deadline().map(|deadline| deadline.to_string()),
        Some("2025-07-01".to_owned())
    );

    // Subtask within the task deadline is accepted.
    let draft = harness
        .tasks
        .add_subtask(worker.id(), task.id(), "draft", "2025-06-20")
        .await
        .expect("subtask creation should succeed");

    // Completing the task before the subtask is a conflict and changes
    // nothing.
    let blocked = harness
        .tasks
        .update_task_status(worker.id(), task.id(), true)
        .await;
    assert!(matches!(
        blocked,
        Err(TaskLifecycleError::Domain(
            TaskDomainError::IncompleteSubTasks { .. }
        ))
    ));
    let stored = harness
        .task_repo
        .find(task.id())
        .await
        .expect("lookup should succeed")
        .expect("task should still exist");
    assert_eq!(stored.status(), TaskStatus::NotStarted);

    // Completing the subtask rolls the task up to completed automatically.
    let update = harness
        .tasks
        .update_subtask_status(worker.id(), draft.subtask.id(), true)
        .await
        .expect("subtask completion should succeed");
    assert_eq!(update.task.status(), TaskStatus::Completed);
    assert!(update.task.completed());
}

#[tokio::test(flavor = "multi_thread")]
async fn personal_overview_queries_see_the_collaboration() -> eyre::Result<()> {
    let harness = Harness::new();
    let creator = harness.user("creator").await;
    let worker = harness.user("worker").await;

    let project = harness
        .projects
        .create(
            creator.id(),
            CreateProjectRequest::new("Field Guide", "Catalogue the local flora"),
        )
        .await?;
    let invitation = harness
        .memberships
        .invite(creator.id(), project.id(), "worker")
        .await?;

    let pending = harness
        .memberships
        .pending_invitations_for(worker.id())
        .await?;
    ensure!(pending.len() == 1, "the worker should see one invitation");

    harness
        .memberships
        .accept_invitation(worker.id(), invitation.id())
        .await?;
    harness
        .tasks
        .create_task(
            creator.id(),
            CreateTaskRequest::new(project.id(), "Press specimens")
                .with_assignee(worker.id()),
        )
        .await?;

    let created = harness.projects.created_by(creator.id()).await?;
    ensure!(created.len() == 1, "the creator should see one project");

    let assigned = harness.projects.with_assignments_for(worker.id()).await?;
    ensure!(assigned.len() == 1, "the worker should see one assignment");
    ensure!(
        assigned.first().map(|found| found.id()) == Some(project.id()),
        "the assignment should point at the shared project"
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn project_chatter_accumulates_in_order() {
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

    harness
        .messages
        .post(creator.id(), project.id(), "welcome aboard")
        .await
        .expect("post should succeed");
    harness
        .messages
        .post(worker.id(), project.id(), "glad to help")
        .await
        .expect("post should succeed");

    let feed = harness
        .messages
        .feed(project.id())
        .await
        .expect("feed should succeed");
    let bodies: Vec<_> = feed
        .iter()
        .map(|message| message.content().as_str().to_owned())
        .collect();
    assert_eq!(
        bodies,
        vec!["welcome aboard".to_owned(), "glad to help".to_owned()]
    );
}
