//! Domain-focused tests for tasks and subtasks.

use crate::identity::domain::UserId;
use crate::project::domain::{Deadline, ProjectId};
use crate::task::domain::{
    SubTask, SubTaskTitle, Task, TaskDomainError, TaskStatus, TaskTitle,
};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

#[fixture]
fn clock() -> DefaultClock {
    DefaultClock
}

fn deadline(raw: &str) -> Deadline {
    Deadline::parse(raw).expect("valid deadline")
}

#[rstest]
fn new_tasks_start_unstarted_and_visible(clock: DefaultClock) {
    let task = Task::new(
        TaskTitle::new("Collect samples").expect("valid title"),
        "From the north meadow",
        ProjectId::new(),
        &clock,
    );

    assert_eq!(task.status(), TaskStatus::NotStarted);
    assert!(!task.completed());
    assert!(!task.hidden());
    assert!(task.assignee_id().is_none());
}

#[rstest]
#[case("")]
#[case("   ")]
fn task_title_rejects_blank_values(#[case] raw: &str) {
    let result = TaskTitle::new(raw);
    assert_eq!(result, Err(TaskDomainError::InvalidTitle(raw.to_owned())));
}

#[rstest]
fn claim_takes_an_unassigned_task(clock: DefaultClock) {
    let mut task = Task::new(
        TaskTitle::new("Collect samples").expect("valid title"),
        "",
        ProjectId::new(),
        &clock,
    );
    let user = UserId::new();

    task.claim(user).expect("claim should succeed");

    assert_eq!(task.assignee_id(), Some(user));
}

#[rstest]
fn claim_refuses_an_assigned_task(clock: DefaultClock) {
    let first = UserId::new();
    let mut task = Task::new(
        TaskTitle::new("Collect samples").expect("valid title"),
        "",
        ProjectId::new(),
        &clock,
    )
    .with_assignee(first);

    let result = task.claim(UserId::new());

    assert_eq!(result, Err(TaskDomainError::AlreadyAssigned(task.id())));
    assert_eq!(task.assignee_id(), Some(first));
}

#[rstest]
fn completion_with_no_subtasks_always_succeeds(clock: DefaultClock) {
    let mut task = Task::new(
        TaskTitle::new("Collect samples").expect("valid title"),
        "",
        ProjectId::new(),
        &clock,
    );

    task.set_completion(true, &[]).expect("completion should succeed");
    assert_eq!(task.status(), TaskStatus::Completed);
    assert!(task.completed());

    task.set_completion(false, &[]).expect("reopening should succeed");
    assert_eq!(task.status(), TaskStatus::NotStarted);
    assert!(!task.completed());
}

#[rstest]
fn completion_is_blocked_by_open_subtasks(clock: DefaultClock) {
    let mut task = Task::new(
        TaskTitle::new("Collect samples").expect("valid title"),
        "",
        ProjectId::new(),
        &clock,
    )
    .with_deadline(deadline("2025-06-01"));
    let open = SubTask::new(
        SubTaskTitle::new("Label jars").expect("valid title"),
        deadline("2025-05-20"),
        task.id(),
        task.deadline(),
    )
    .expect("valid subtask");

    let result = task.set_completion(true, std::slice::from_ref(&open));

    assert_eq!(
        result,
        Err(TaskDomainError::IncompleteSubTasks {
            task: task.id(),
            remaining: 1,
        })
    );
    assert_eq!(task.status(), TaskStatus::NotStarted);
}

#[rstest]
fn subtask_deadline_may_not_exceed_the_parent(clock: DefaultClock) {
    let task = Task::new(
        TaskTitle::new("Collect samples").expect("valid title"),
        "",
        ProjectId::new(),
        &clock,
    )
    .with_deadline(deadline("2025-06-01"));

    let result = SubTask::new(
        SubTaskTitle::new("Label jars").expect("valid title"),
        deadline("2025-06-05"),
        task.id(),
        task.deadline(),
    );

    assert_eq!(
        result,
        Err(TaskDomainError::DeadlineBeyondParent {
            subtask: deadline("2025-06-05"),
            task: deadline("2025-06-01"),
        })
    );
}

#[rstest]
fn subtask_deadline_on_the_parent_date_is_allowed(clock: DefaultClock) {
    let task = Task::new(
        TaskTitle::new("Collect samples").expect("valid title"),
        "",
        ProjectId::new(),
        &clock,
    )
    .with_deadline(deadline("2025-06-01"));

    let subtask = SubTask::new(
        SubTaskTitle::new("Label jars").expect("valid title"),
        deadline("2025-06-01"),
        task.id(),
        task.deadline(),
    )
    .expect("valid subtask");

    assert!(!subtask.completed());
}

#[rstest]
fn subtasks_under_a_deadline_free_parent_accept_any_date(clock: DefaultClock) {
    let task = Task::new(
        TaskTitle::new("Collect samples").expect("valid title"),
        "",
        ProjectId::new(),
        &clock,
    );

    let subtask = SubTask::new(
        SubTaskTitle::new("Label jars").expect("valid title"),
        deadline("2199-01-01"),
        task.id(),
        task.deadline(),
    );

    assert!(subtask.is_ok());
}

#[rstest]
#[case("not_started", TaskStatus::NotStarted)]
#[case("in_progress", TaskStatus::InProgress)]
#[case(" COMPLETED ", TaskStatus::Completed)]
fn status_round_trips_through_storage_form(#[case] raw: &str, #[case] expected: TaskStatus) {
    assert_eq!(TaskStatus::try_from(raw), Ok(expected));
}

#[rstest]
fn unknown_status_fails_to_parse() {
    assert!(TaskStatus::try_from("paused").is_err());
}
