pub mod todo;
pub mod user;

pub use todo::{Todo, TodoView, DELETED_CONTENT};
pub use user::User;
