pub mod models;
pub mod repository;
pub mod store;

pub use repository::{TodoChanges, TodoError, TodoRepository, UserError, UserRepository};
pub use store::{JsonFileStore, StoreError};
