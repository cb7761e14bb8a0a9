use anyhow::Context;
use axum::async_trait;
use sqlx::error::ErrorKind;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use crate::store::{NewTodo, NewUser, Store, StoreError, Todo, User};

/// Postgres-backed store.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .context("failed to connect to the database")?;
        Ok(Self { pool })
    }

    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("failed to run migrations")?;
        Ok(())
    }
}

/// Maps driver errors onto the store taxonomy. Constraint violations keep
/// their kind; everything else is a backend failure.
fn classify(e: sqlx::Error) -> StoreError {
    if matches!(e, sqlx::Error::RowNotFound) {
        return StoreError::NotFound;
    }
    if let Some(db) = e.as_database_error() {
        match db.kind() {
            ErrorKind::UniqueViolation => return StoreError::Duplicate,
            ErrorKind::ForeignKeyViolation => return StoreError::ForeignKey,
            _ => {}
        }
    }
    StoreError::Backend(e.into())
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password_hash, created_at
            "#,
        )
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(classify)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(classify)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(classify)
    }

    async fn create_todo(&self, new_todo: NewTodo) -> Result<Todo, StoreError> {
        sqlx::query_as::<_, Todo>(
            r#"
            INSERT INTO todos (text, priority, category, due_date, completed, user_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, text, priority, category, due_date, completed, user_id, created_at
            "#,
        )
        .bind(&new_todo.text)
        .bind(new_todo.priority)
        .bind(new_todo.category)
        .bind(new_todo.due_date)
        .bind(new_todo.completed)
        .bind(new_todo.user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(classify)
    }

    async fn list_todos_for_user(&self, user_id: Uuid) -> Result<Vec<Todo>, StoreError> {
        sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, text, priority, category, due_date, completed, user_id, created_at
            FROM todos
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(classify)
    }

    async fn find_todo(&self, id: Uuid) -> Result<Option<Todo>, StoreError> {
        sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, text, priority, category, due_date, completed, user_id, created_at
            FROM todos
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(classify)
    }

    async fn update_todo(&self, todo: &Todo) -> Result<Todo, StoreError> {
        sqlx::query_as::<_, Todo>(
            r#"
            UPDATE todos
            SET text = $2, priority = $3, category = $4, due_date = $5, completed = $6
            WHERE id = $1
            RETURNING id, text, priority, category, due_date, completed, user_id, created_at
            "#,
        )
        .bind(todo.id)
        .bind(&todo.text)
        .bind(todo.priority)
        .bind(todo.category)
        .bind(todo.due_date)
        .bind(todo.completed)
        .fetch_one(&self.pool)
        .await
        .map_err(classify)
    }

    async fn delete_todo(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(classify)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
