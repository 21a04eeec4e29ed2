//! Task management module
//!
//! - Task model with category and countdown state
//! - Ordered in-memory store with add/edit/delete and the form that feeds it

pub mod error;
pub mod model;
pub mod store;

pub use error::TaskError;
pub use model::{parse_duration, Category, Task, TaskId};
pub use store::{TaskForm, TaskStore};
