pub mod list;
pub mod patch;
pub mod task;
pub mod timestamp;

pub use list::{List, ListCreate, ListWithTasks, Pagination};
pub use patch::Patch;
pub use task::{Task, TaskCreate, TaskQuery, TaskUpdate};
