use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::info;

use super::models::{Todo, User};
use super::store::{JsonFileStore, StoreError};

#[derive(Debug, Error)]
pub enum TodoError {
    #[error(transparent)]
    Storage(#[from] StoreError),

    /// No record at this position that the caller may modify
    #[error("todo at position {0} not found")]
    NotFound(usize),

    #[error("todo at position {0} belongs to another user")]
    Forbidden(usize),
}

#[derive(Debug, Error)]
pub enum UserError {
    #[error(transparent)]
    Storage(#[from] StoreError),

    #[error("username '{0}' is already registered")]
    Duplicate(String),

    #[error("unknown user or wrong password")]
    InvalidCredentials,
}

/// Replacement values for an existing todo
#[derive(Debug, Clone)]
pub struct TodoChanges {
    pub content: String,
    pub done: bool,
    /// Kept as stored when `None`
    pub deadline: Option<DateTime<Utc>>,
}

/// Todo records addressed by their position in the backing array
#[derive(Debug, Clone)]
pub struct TodoRepository {
    store: JsonFileStore<Todo>,
}

impl TodoRepository {
    pub fn new(store: JsonFileStore<Todo>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &JsonFileStore<Todo> {
        &self.store
    }

    /// Append a todo for `username`; returns its array position and the stored record
    pub async fn create(
        &self,
        username: &str,
        content: String,
        done: bool,
        deadline: DateTime<Utc>,
    ) -> Result<(usize, Todo), TodoError> {
        let created = self
            .store
            .update(|todos| {
                let owned = todos.iter().filter(|t| t.is_owned_by(username)).count();
                let todo = Todo {
                    username: username.to_string(),
                    index: owned + 1,
                    content,
                    done,
                    deadline,
                };
                todos.push(todo.clone());
                Ok::<_, TodoError>((todos.len() - 1, todo))
            })
            .await?;

        info!(user = %username, position = created.0, index = created.1.index, "created todo");
        Ok(created)
    }

    /// Fetch by position. Someone else's record is `Forbidden`, not `NotFound`.
    pub async fn get(&self, username: &str, position: usize) -> Result<Todo, TodoError> {
        let todos = self.store.load().await?;
        let todo = todos
            .into_iter()
            .nth(position)
            .ok_or(TodoError::NotFound(position))?;

        if !todo.is_owned_by(username) {
            return Err(TodoError::Forbidden(position));
        }
        Ok(todo)
    }

    pub async fn update(
        &self,
        username: &str,
        position: usize,
        changes: TodoChanges,
    ) -> Result<Todo, TodoError> {
        let updated = self
            .store
            .update(|todos| {
                let todo = owned_at(todos, username, position)?;
                todo.content = changes.content;
                todo.done = changes.done;
                if let Some(deadline) = changes.deadline {
                    todo.deadline = deadline;
                }
                Ok::<_, TodoError>(todo.clone())
            })
            .await?;

        info!(user = %username, position, done = updated.done, "updated todo");
        Ok(updated)
    }

    /// Overwrite the record in place with the deleted marker. The array keeps its length.
    pub async fn delete(&self, username: &str, position: usize) -> Result<Todo, TodoError> {
        let deleted = self
            .store
            .update(|todos| {
                let todo = owned_at(todos, username, position)?;
                todo.mark_deleted();
                Ok::<_, TodoError>(todo.clone())
            })
            .await?;

        info!(user = %username, position, "deleted todo");
        Ok(deleted)
    }

    /// All records owned by `username`, in storage order
    pub async fn list_owned(&self, username: &str) -> Result<Vec<Todo>, TodoError> {
        let todos = self.store.load().await?;
        Ok(todos.into_iter().filter(|t| t.is_owned_by(username)).collect())
    }
}

fn owned_at<'a>(
    todos: &'a mut [Todo],
    username: &str,
    position: usize,
) -> Result<&'a mut Todo, TodoError> {
    todos
        .get_mut(position)
        .filter(|t| t.is_owned_by(username))
        .ok_or(TodoError::NotFound(position))
}

#[derive(Debug, Clone)]
pub struct UserRepository {
    store: JsonFileStore<User>,
}

impl UserRepository {
    pub fn new(store: JsonFileStore<User>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &JsonFileStore<User> {
        &self.store
    }

    pub async fn register(&self, user: User) -> Result<(), UserError> {
        let username = user.username.clone();
        self.store
            .update(|users| {
                if users.iter().any(|u| u.username == user.username) {
                    return Err(UserError::Duplicate(user.username.clone()));
                }
                users.push(user);
                Ok(())
            })
            .await?;

        info!(user = %username, "registered user");
        Ok(())
    }

    /// Linear scan for a user with exactly these credentials
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User, UserError> {
        let users = self.store.load().await?;
        users
            .into_iter()
            .find(|u| u.matches(username, password))
            .ok_or(UserError::InvalidCredentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::DELETED_CONTENT;
    use crate::testing::scratch_dir;
    use chrono::Duration;

    fn todo_repo(label: &str) -> TodoRepository {
        TodoRepository::new(JsonFileStore::new(scratch_dir(label).join("todos.json")))
    }

    fn later(days: i64) -> DateTime<Utc> {
        Utc::now() + Duration::days(days)
    }

    #[tokio::test]
    async fn per_user_index_counts_only_own_todos() {
        let repo = todo_repo("repo-index");

        let (p0, a1) = repo.create("alice", "a1".into(), false, later(1)).await.unwrap();
        let (p1, b1) = repo.create("bob", "b1".into(), false, later(1)).await.unwrap();
        let (p2, a2) = repo.create("alice", "a2".into(), false, later(1)).await.unwrap();

        assert_eq!((p0, p1, p2), (0, 1, 2));
        assert_eq!(a1.index, 1);
        assert_eq!(b1.index, 1);
        assert_eq!(a2.index, 2);
    }

    #[tokio::test]
    async fn get_checks_ownership() {
        let repo = todo_repo("repo-get");
        repo.create("alice", "mine".into(), false, later(1)).await.unwrap();

        assert_eq!(repo.get("alice", 0).await.unwrap().content, "mine");
        assert!(matches!(repo.get("bob", 0).await, Err(TodoError::Forbidden(0))));
        assert!(matches!(repo.get("alice", 1).await, Err(TodoError::NotFound(1))));
    }

    #[tokio::test]
    async fn delete_marks_in_place_and_keeps_length() {
        let repo = todo_repo("repo-delete");
        repo.create("alice", "first".into(), false, later(1)).await.unwrap();
        repo.create("alice", "second".into(), false, later(2)).await.unwrap();

        let deleted = repo.delete("alice", 0).await.unwrap();
        assert_eq!(deleted.content, DELETED_CONTENT);
        assert!(deleted.done);

        let all = repo.store().load().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].content, DELETED_CONTENT);
        assert_eq!(all[1].content, "second");
    }

    #[tokio::test]
    async fn foreign_todo_cannot_be_modified() {
        let repo = todo_repo("repo-foreign");
        repo.create("alice", "mine".into(), false, later(1)).await.unwrap();

        assert!(matches!(repo.delete("bob", 0).await, Err(TodoError::NotFound(0))));
        let changes = TodoChanges {
            content: "stolen".into(),
            done: true,
            deadline: None,
        };
        assert!(matches!(
            repo.update("bob", 0, changes).await,
            Err(TodoError::NotFound(0))
        ));
        assert_eq!(repo.get("alice", 0).await.unwrap().content, "mine");
    }

    #[tokio::test]
    async fn update_keeps_deadline_when_omitted() {
        let repo = todo_repo("repo-update");
        let (_, original) = repo.create("alice", "draft".into(), false, later(3)).await.unwrap();

        let updated = repo
            .update(
                "alice",
                0,
                TodoChanges {
                    content: "final".into(),
                    done: true,
                    deadline: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.content, "final");
        assert!(updated.done);
        assert_eq!(updated.deadline, original.deadline);

        let new_deadline = later(10);
        let updated = repo
            .update(
                "alice",
                0,
                TodoChanges {
                    content: "final".into(),
                    done: false,
                    deadline: Some(new_deadline),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.deadline, new_deadline);
    }

    #[tokio::test]
    async fn users_register_once_and_authenticate() {
        let repo = UserRepository::new(JsonFileStore::new(scratch_dir("repo-users").join("users.json")));

        repo.register(User::new("alice", "secret-pw")).await.unwrap();
        assert!(matches!(
            repo.register(User::new("alice", "other-pw")).await,
            Err(UserError::Duplicate(_))
        ));

        assert_eq!(repo.authenticate("alice", "secret-pw").await.unwrap().username, "alice");
        assert!(matches!(
            repo.authenticate("alice", "wrong").await,
            Err(UserError::InvalidCredentials)
        ));
        assert!(matches!(
            repo.authenticate("nobody", "secret-pw").await,
            Err(UserError::InvalidCredentials)
        ));
        assert_eq!(repo.store().load().await.unwrap().len(), 1);
    }
}
