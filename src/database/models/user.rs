use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    /// Stored as given; there is no hashing.
    pub password: String,
}

impl User {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}
