pub mod error;
pub mod filter;
pub mod types;

pub use error::FilterError;
pub use filter::TodoFilter;
pub use types::{SortDirection, TodoQuery};
