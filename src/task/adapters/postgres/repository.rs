//! `PostgreSQL` repository implementation for task and subtask storage.

use super::{
    models::{NewSubTaskRow, NewTaskRow, SubTaskRow, TaskRow},
    schema::{subtasks, tasks},
};
use crate::identity::domain::UserId;
use crate::project::domain::{Deadline, ProjectId};
use crate::storage::postgres::PgPool;
use crate::task::{
    domain::{
        PersistedSubTaskData, PersistedTaskData, SubTask, SubTaskId, SubTaskTitle, Task, TaskId,
        TaskStatus, TaskTitle,
    },
    ports::{SubTaskChange, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::Error as DieselError;

impl From<DieselError> for TaskRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

fn update_task_row(connection: &mut PgConnection, task: &Task) -> TaskRepositoryResult<()> {
    let updated = diesel::update(tasks::table.filter(tasks::id.eq(task.id().into_inner())))
        .set((
            tasks::title.eq(task.title().as_str()),
            tasks::description.eq(task.description()),
            tasks::status.eq(task.status().as_str()),
            tasks::completed.eq(task.completed()),
            tasks::deadline.eq(task.deadline().map(Deadline::date)),
            tasks::assignee_id.eq(task.assignee_id().map(UserId::into_inner)),
            tasks::hidden.eq(task.hidden()),
        ))
        .execute(connection)?;
    if updated == 0 {
        return Err(TaskRepositoryError::TaskNotFound(task.id()));
    }
    Ok(())
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn insert(&self, task: &Task) -> TaskRepositoryResult<()> {
        let new_row = task_to_new_row(task);
        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)?;
            Ok(())
        })
        .await
    }

    async fn find(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task = task.clone();
        self.run_blocking(move |connection| update_task_row(connection, &task))
            .await
    }

    async fn update_resetting_subtasks(&self, task: &Task) -> TaskRepositoryResult<u64> {
        let task = task.clone();
        self.run_blocking(move |connection| {
            connection.transaction::<u64, TaskRepositoryError, _>(|txn| {
                update_task_row(txn, &task)?;
                let dropped = diesel::delete(
                    subtasks::table.filter(subtasks::task_id.eq(task.id().into_inner())),
                )
                .execute(txn)?;
                u64::try_from(dropped).map_err(TaskRepositoryError::persistence)
            })
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        self.run_blocking(move |connection| {
            connection.transaction::<(), TaskRepositoryError, _>(|txn| {
                diesel::delete(subtasks::table.filter(subtasks::task_id.eq(id.into_inner())))
                    .execute(txn)?;
                let deleted =
                    diesel::delete(tasks::table.filter(tasks::id.eq(id.into_inner())))
                        .execute(txn)?;
                if deleted == 0 {
                    return Err(TaskRepositoryError::TaskNotFound(id));
                }
                Ok(())
            })
        })
        .await
    }

    async fn tasks_for(&self, project: ProjectId) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::project_id.eq(project.into_inner()))
                .order(tasks::created_at.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn executable_tasks(
        &self,
        project: ProjectId,
        user: UserId,
    ) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::project_id.eq(project.into_inner()))
                .filter(
                    tasks::assignee_id
                        .is_null()
                        .or(tasks::assignee_id.eq(user.into_inner())),
                )
                .order(tasks::deadline.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn unhide_all(&self, project: ProjectId) -> TaskRepositoryResult<u64> {
        self.run_blocking(move |connection| {
            let unhidden = diesel::update(
                tasks::table
                    .filter(tasks::project_id.eq(project.into_inner()))
                    .filter(tasks::hidden.eq(true)),
            )
            .set(tasks::hidden.eq(false))
            .execute(connection)?;
            u64::try_from(unhidden).map_err(TaskRepositoryError::persistence)
        })
        .await
    }

    async fn find_subtask(&self, id: SubTaskId) -> TaskRepositoryResult<Option<SubTask>> {
        self.run_blocking(move |connection| {
            let row = subtasks::table
                .filter(subtasks::id.eq(id.into_inner()))
                .select(SubTaskRow::as_select())
                .first::<SubTaskRow>(connection)
                .optional()?;
            row.map(row_to_subtask).transpose()
        })
        .await
    }

    async fn subtasks_for(&self, task: TaskId) -> TaskRepositoryResult<Vec<SubTask>> {
        self.run_blocking(move |connection| {
            let rows = subtasks::table
                .filter(subtasks::task_id.eq(task.into_inner()))
                .select(SubTaskRow::as_select())
                .load::<SubTaskRow>(connection)?;
            rows.into_iter().map(row_to_subtask).collect()
        })
        .await
    }

    async fn commit_subtask_change(
        &self,
        change: &SubTaskChange,
        parent: &Task,
    ) -> TaskRepositoryResult<()> {
        let change = change.clone();
        let parent = parent.clone();
        self.run_blocking(move |connection| {
            connection.transaction::<(), TaskRepositoryError, _>(|txn| {
                match &change {
                    SubTaskChange::Added(subtask) => {
                        let new_row = subtask_to_new_row(subtask);
                        diesel::insert_into(subtasks::table)
                            .values(&new_row)
                            .execute(txn)?;
                    }
                    SubTaskChange::StatusChanged(subtask) => {
                        let updated = diesel::update(
                            subtasks::table.filter(subtasks::id.eq(subtask.id().into_inner())),
                        )
                        .set(subtasks::completed.eq(subtask.completed()))
                        .execute(txn)?;
                        if updated == 0 {
                            return Err(TaskRepositoryError::SubTaskNotFound(subtask.id()));
                        }
                    }
                    SubTaskChange::Removed(id) => {
                        let deleted = diesel::delete(
                            subtasks::table.filter(subtasks::id.eq(id.into_inner())),
                        )
                        .execute(txn)?;
                        if deleted == 0 {
                            return Err(TaskRepositoryError::SubTaskNotFound(*id));
                        }
                    }
                }
                update_task_row(txn, &parent)
            })
        })
        .await
    }
}

fn task_to_new_row(task: &Task) -> NewTaskRow {
    NewTaskRow {
        id: task.id().into_inner(),
        title: task.title().as_str().to_owned(),
        description: task.description().to_owned(),
        status: task.status().as_str().to_owned(),
        completed: task.completed(),
        deadline: task.deadline().map(Deadline::date),
        created_at: task.created_at(),
        project_id: task.project_id().into_inner(),
        assignee_id: task.assignee_id().map(UserId::into_inner),
        hidden: task.hidden(),
    }
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        title,
        description,
        status: persisted_status,
        completed,
        deadline,
        created_at,
        project_id,
        assignee_id,
        hidden,
    } = row;

    let status = TaskStatus::try_from(persisted_status.as_str())
        .map_err(TaskRepositoryError::persistence)?;
    debug_assert!(
        completed == status.is_completed(),
        "persisted completed flag must match the status column"
    );

    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        title: TaskTitle::new(title).map_err(TaskRepositoryError::persistence)?,
        description,
        status,
        deadline: deadline.map(Deadline::from_date),
        created_at,
        project_id: ProjectId::from_uuid(project_id),
        assignee_id: assignee_id.map(UserId::from_uuid),
        hidden,
    };
    Ok(Task::from_persisted(data))
}

fn subtask_to_new_row(subtask: &SubTask) -> NewSubTaskRow {
    NewSubTaskRow {
        id: subtask.id().into_inner(),
        title: subtask.title().as_str().to_owned(),
        deadline: subtask.deadline().date(),
        completed: subtask.completed(),
        task_id: subtask.task_id().into_inner(),
    }
}

fn row_to_subtask(row: SubTaskRow) -> TaskRepositoryResult<SubTask> {
    let SubTaskRow {
        id,
        title,
        deadline,
        completed,
        task_id,
    } = row;

    let data = PersistedSubTaskData {
        id: SubTaskId::from_uuid(id),
        title: SubTaskTitle::new(title).map_err(TaskRepositoryError::persistence)?,
        deadline: Deadline::from_date(deadline),
        completed,
        task_id: TaskId::from_uuid(task_id),
    };
    Ok(SubTask::from_persisted(data))
}
