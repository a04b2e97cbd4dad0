use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FilterError {
    #[error("Invalid value for '{param}': {value} (expected true or false)")]
    InvalidBool { param: &'static str, value: String },
}
