//! Thread-safe in-memory database shared by the memory adapters.

use crate::identity::domain::{UserAccount, UserId};
use crate::membership::domain::{Application, Invitation, Participant};
use crate::message::domain::Message;
use crate::project::domain::{Project, ProjectId};
use crate::task::domain::{SubTask, Task, TaskId};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Handle to one shared in-memory database.
///
/// Cloning the handle yields another view of the same state; each bounded
/// context's memory adapter holds a clone. Mutations performed under a
/// single write guard are atomic with respect to every adapter, which is
/// how composite operations (acceptance, removal, cascades) keep their
/// both-or-neither semantics.
#[derive(Debug, Clone, Default)]
pub struct MemoryDb {
    state: Arc<RwLock<DbState>>,
}

/// Row storage for every table.
///
/// Tables are insertion-ordered vectors: the scale of a test double does
/// not warrant indexes, and stable ordering keeps "latest record" queries
/// deterministic even when two rows share a timestamp.
#[derive(Debug, Default)]
pub(crate) struct DbState {
    pub(crate) users: Vec<UserAccount>,
    pub(crate) projects: Vec<Project>,
    pub(crate) participants: Vec<Participant>,
    pub(crate) applications: Vec<Application>,
    pub(crate) invitations: Vec<Invitation>,
    pub(crate) tasks: Vec<Task>,
    pub(crate) subtasks: Vec<SubTask>,
    pub(crate) messages: Vec<Message>,
}

impl MemoryDb {
    /// Creates an empty in-memory database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the shared read guard, mapping lock poisoning to an I/O
    /// error the adapters wrap as a persistence failure.
    pub(crate) fn read(&self) -> Result<RwLockReadGuard<'_, DbState>, std::io::Error> {
        self.state
            .read()
            .map_err(|err| std::io::Error::other(err.to_string()))
    }

    /// Acquires the exclusive write guard, mapping lock poisoning to an I/O
    /// error the adapters wrap as a persistence failure.
    pub(crate) fn write(&self) -> Result<RwLockWriteGuard<'_, DbState>, std::io::Error> {
        self.state
            .write()
            .map_err(|err| std::io::Error::other(err.to_string()))
    }
}

impl DbState {
    /// Resets every task in the project assigned to the user back to
    /// unassigned, returning how many were reset.
    pub(crate) fn unassign_project_tasks(&mut self, project: ProjectId, user: UserId) -> u64 {
        let mut reset = 0;
        for task in &mut self.tasks {
            if task.project_id() == project && task.assignee_id() == Some(user) {
                task.set_assignee(None);
                reset += 1;
            }
        }
        reset
    }

    /// Deletes a task and its subtasks, subtasks first.
    pub(crate) fn delete_task_cascade(&mut self, task: TaskId) {
        self.subtasks.retain(|subtask| subtask.task_id() != task);
        self.tasks.retain(|row| row.id() != task);
    }

    /// Deletes a project and every dependent row.
    pub(crate) fn delete_project_cascade(&mut self, project: ProjectId) {
        let task_ids: Vec<TaskId> = self
            .tasks
            .iter()
            .filter(|task| task.project_id() == project)
            .map(Task::id)
            .collect();
        for task_id in task_ids {
            self.delete_task_cascade(task_id);
        }

        self.participants.retain(|row| row.project_id() != project);
        self.applications.retain(|row| row.project_id() != project);
        self.invitations.retain(|row| row.project_id() != project);
        self.messages.retain(|row| row.project_id() != project);
        self.projects.retain(|row| row.id() != project);
    }
}
