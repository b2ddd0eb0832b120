//! In-memory task repository over the shared database.

use crate::identity::domain::UserId;
use crate::project::domain::ProjectId;
use crate::storage::MemoryDb;
use crate::storage::memory::DbState;
use crate::task::{
    domain::{SubTask, SubTaskId, Task, TaskId},
    ports::{SubTaskChange, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;

/// Thread-safe in-memory task repository.
#[derive(Debug, Clone)]
pub struct InMemoryTaskRepository {
    db: MemoryDb,
}

impl InMemoryTaskRepository {
    /// Creates a repository over the shared in-memory database.
    #[must_use]
    pub const fn new(db: MemoryDb) -> Self {
        Self { db }
    }
}

fn replace_task_row(state: &mut DbState, task: &Task) -> TaskRepositoryResult<()> {
    let row = state
        .tasks
        .iter_mut()
        .find(|row| row.id() == task.id())
        .ok_or(TaskRepositoryError::TaskNotFound(task.id()))?;
    *row = task.clone();
    Ok(())
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn insert(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.db.write().map_err(TaskRepositoryError::persistence)?;
        state.tasks.push(task.clone());
        Ok(())
    }

    async fn find(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.db.read().map_err(TaskRepositoryError::persistence)?;
        Ok(state.tasks.iter().find(|row| row.id() == id).cloned())
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.db.write().map_err(TaskRepositoryError::persistence)?;
        replace_task_row(&mut state, task)
    }

    async fn update_resetting_subtasks(&self, task: &Task) -> TaskRepositoryResult<u64> {
        let mut state = self.db.write().map_err(TaskRepositoryError::persistence)?;
        replace_task_row(&mut state, task)?;
        let mut removed: u64 = 0;
        state.subtasks.retain(|subtask| {
            if subtask.task_id() == task.id() {
                removed += 1;
                false
            } else {
                true
            }
        });
        Ok(removed)
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = self.db.write().map_err(TaskRepositoryError::persistence)?;
        if !state.tasks.iter().any(|row| row.id() == id) {
            return Err(TaskRepositoryError::TaskNotFound(id));
        }
        state.delete_task_cascade(id);
        Ok(())
    }

    async fn tasks_for(&self, project: ProjectId) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.db.read().map_err(TaskRepositoryError::persistence)?;
        let mut tasks: Vec<Task> = state
            .tasks
            .iter()
            .filter(|row| row.project_id() == project)
            .cloned()
            .collect();
        tasks.sort_by_key(Task::created_at);
        Ok(tasks)
    }

    async fn executable_tasks(
        &self,
        project: ProjectId,
        user: UserId,
    ) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.db.read().map_err(TaskRepositoryError::persistence)?;
        let mut tasks: Vec<Task> = state
            .tasks
            .iter()
            .filter(|row| {
                row.project_id() == project
                    && (row.assignee_id().is_none() || row.assignee_id() == Some(user))
            })
            .cloned()
            .collect();
        // Deadline ascending, tasks without a deadline last.
        tasks.sort_by_key(|task| (task.deadline().is_none(), task.deadline()));
        Ok(tasks)
    }

    async fn unhide_all(&self, project: ProjectId) -> TaskRepositoryResult<u64> {
        let mut state = self.db.write().map_err(TaskRepositoryError::persistence)?;
        let mut unhidden = 0;
        for task in &mut state.tasks {
            if task.project_id() == project && task.hidden() {
                task.unhide();
                unhidden += 1;
            }
        }
        Ok(unhidden)
    }

    async fn find_subtask(&self, id: SubTaskId) -> TaskRepositoryResult<Option<SubTask>> {
        let state = self.db.read().map_err(TaskRepositoryError::persistence)?;
        Ok(state.subtasks.iter().find(|row| row.id() == id).cloned())
    }

    async fn subtasks_for(&self, task: TaskId) -> TaskRepositoryResult<Vec<SubTask>> {
        let state = self.db.read().map_err(TaskRepositoryError::persistence)?;
        Ok(state
            .subtasks
            .iter()
            .filter(|row| row.task_id() == task)
            .cloned()
            .collect())
    }

    async fn commit_subtask_change(
        &self,
        change: &SubTaskChange,
        parent: &Task,
    ) -> TaskRepositoryResult<()> {
        let mut state = self.db.write().map_err(TaskRepositoryError::persistence)?;
        // Validate everything before mutating so a failure leaves the
        // state untouched.
        if !state.tasks.iter().any(|row| row.id() == parent.id()) {
            return Err(TaskRepositoryError::TaskNotFound(parent.id()));
        }

        match change {
            SubTaskChange::Added(subtask) => {
                state.subtasks.push(subtask.clone());
            }
            SubTaskChange::StatusChanged(subtask) => {
                let row = state
                    .subtasks
                    .iter_mut()
                    .find(|row| row.id() == subtask.id())
                    .ok_or(TaskRepositoryError::SubTaskNotFound(subtask.id()))?;
                *row = subtask.clone();
            }
            SubTaskChange::Removed(id) => {
                let position = state
                    .subtasks
                    .iter()
                    .position(|row| row.id() == *id)
                    .ok_or(TaskRepositoryError::SubTaskNotFound(*id))?;
                state.subtasks.remove(position);
            }
        }

        replace_task_row(&mut state, parent)
    }
}
