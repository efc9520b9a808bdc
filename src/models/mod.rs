pub mod task;

pub use task::{
    CreateTaskInput, DeleteTaskInput, NewTask, Priority, Task, TaskId, TaskPatch,
    ToggleTaskInput, UpdateTaskInput,
};
