// Re-export model types and service functions
pub mod error;
pub mod http;
pub mod model;
pub mod mysql;
pub mod service;
pub mod store;

pub use error::TaskError;
pub use model::{CreateTaskPayload, RawTaskId, Task, TaskIdPayload};
pub use mysql::MySqlTaskStore;
pub use service::*;
pub use http::*;
pub use store::{MemoryTaskStore, TaskStore};
