use std::str::FromStr;

use axum::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

pub mod memory;
pub mod postgres;

pub use memory::MemStore;
pub use postgres::PgStore;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // argon2 hash, not exposed in JSON
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Fields needed to insert a user; id and created_at come from the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl FromStr for Priority {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum Category {
    #[default]
    Personal,
    Work,
    Health,
    Education,
    Social,
}

impl FromStr for Category {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "personal" => Ok(Category::Personal),
            "work" => Ok(Category::Work),
            "health" => Ok(Category::Health),
            "education" => Ok(Category::Education),
            "social" => Ok(Category::Social),
            _ => Err(()),
        }
    }
}

/// Todo record. Serialized with camelCase keys to match the wire format.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: Uuid,
    pub text: String,
    pub priority: Priority,
    pub category: Category,
    #[serde(with = "iso_date::option")]
    pub due_date: Option<Date>,
    pub completed: bool,
    pub user_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Fields needed to insert a todo, defaults already applied.
#[derive(Debug, Clone)]
pub struct NewTodo {
    pub text: String,
    pub priority: Priority,
    pub category: Category,
    pub due_date: Option<Date>,
    pub completed: bool,
    pub user_id: Uuid,
}

/// Partial update where every field is optional. `due_date` keeps the
/// extra level: `Some(None)` clears the date, `None` leaves it untouched.
#[derive(Debug, Clone, Default)]
pub struct TodoPatch {
    pub text: Option<String>,
    pub priority: Option<Priority>,
    pub category: Option<Category>,
    pub due_date: Option<Option<Date>>,
    pub completed: Option<bool>,
}

impl Todo {
    /// Merges the present fields of `patch` over this record.
    pub fn apply(&mut self, patch: TodoPatch) {
        if let Some(text) = patch.text {
            self.text = text;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
    }
}

/// Failures reported by a store, already classified so the HTTP layer never
/// sees raw backend errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violated")]
    Duplicate,
    #[error("record not found")]
    NotFound,
    #[error("referenced record missing")]
    ForeignKey,
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// The persistence engine, passed to the application as `Arc<dyn Store>`.
#[async_trait]
pub trait Store: Send + Sync {
    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    async fn create_todo(&self, new_todo: NewTodo) -> Result<Todo, StoreError>;
    /// All todos owned by `user_id`, newest first.
    async fn list_todos_for_user(&self, user_id: Uuid) -> Result<Vec<Todo>, StoreError>;
    async fn find_todo(&self, id: Uuid) -> Result<Option<Todo>, StoreError>;
    async fn update_todo(&self, todo: &Todo) -> Result<Todo, StoreError>;
    async fn delete_todo(&self, id: Uuid) -> Result<(), StoreError>;
}
