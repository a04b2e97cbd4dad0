use serde::Deserialize;

/// Raw `GET /todo` query string. Empty values behave as if absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TodoQuery {
    pub finished: Option<String>,
    pub deadline: Option<String>,
    pub reverse: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn is_desc(&self) -> bool {
        matches!(self, SortDirection::Desc)
    }
}
