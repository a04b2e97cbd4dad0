use crate::database::models::{Todo, TodoView};

use super::error::FilterError;
use super::types::{SortDirection, TodoQuery};

/// Parsed list filter for one user's todos
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoFilter {
    pub finished: Option<bool>,
    /// Upper bound compared against the RFC 3339 deadline text
    pub deadline: Option<String>,
    pub order: SortDirection,
}

impl TodoFilter {
    pub fn from_query(query: &TodoQuery) -> Result<Self, FilterError> {
        let finished = parse_bool("finished", query.finished.as_deref())?;
        let reverse = parse_bool("reverse", query.reverse.as_deref())?.unwrap_or(false);
        let deadline = query
            .deadline
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Ok(Self {
            finished,
            deadline,
            order: if reverse { SortDirection::Desc } else { SortDirection::Asc },
        })
    }

    pub fn matches(&self, todo: &Todo) -> bool {
        if let Some(finished) = self.finished {
            if todo.done != finished {
                return false;
            }
        }
        match &self.deadline {
            Some(bound) => todo.deadline_string().as_str() <= bound.as_str(),
            None => true,
        }
    }

    /// Filter and sort by deadline. Display indices are positions in the result.
    pub fn apply(&self, todos: Vec<Todo>) -> Vec<TodoView> {
        let mut kept: Vec<Todo> = todos.into_iter().filter(|t| self.matches(t)).collect();

        if self.order.is_desc() {
            kept.sort_by(|a, b| b.deadline.cmp(&a.deadline));
        } else {
            kept.sort_by(|a, b| a.deadline.cmp(&b.deadline));
        }

        kept.iter().enumerate().map(|(i, t)| t.view(i)).collect()
    }
}

fn parse_bool(param: &'static str, value: Option<&str>) -> Result<Option<bool>, FilterError> {
    match value {
        None | Some("") => Ok(None),
        Some("true") => Ok(Some(true)),
        Some("false") => Ok(Some(false)),
        Some(other) => Err(FilterError::InvalidBool {
            param,
            value: other.to_string(),
        }),
    }
}
