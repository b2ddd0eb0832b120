//! Application services for task lifecycle orchestration.

mod lifecycle;

pub use lifecycle::{
    CreateTaskRequest, EditTaskRequest, ExecutableTasks, SubTaskUpdate, TaskLifecycleError,
    TaskLifecycleResult, TaskLifecycleService,
};
