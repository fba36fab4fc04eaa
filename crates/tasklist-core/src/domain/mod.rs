//! Domain model (ids, task rows, due dates, completion state, errors).

pub mod due_date;
pub mod errors;
pub mod ids;
pub mod state;
pub mod task;

pub use self::due_date::{DueDate, DueDateError};
pub use self::errors::{BoxError, ErrorKind, TaskError};
pub use self::ids::TaskId;
pub use self::state::CompletionState;
pub use self::task::{NewTask, Task, TaskView};
