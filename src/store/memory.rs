use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use axum::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::store::{NewTodo, NewUser, Store, StoreError, Todo, User};

/// In-memory store behind `AppState::fake()`. Mirrors the constraints the
/// Postgres schema enforces (unique email, todos referencing a live user)
/// so handler tests exercise the same failure paths.
#[derive(Default)]
pub struct MemStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    // Insertion sequence breaks created_at ties so listing stays stable.
    todos: HashMap<Uuid, (u64, Todo)>,
    seq: u64,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("store mutex poisoned")
    }
}

#[async_trait]
impl Store for MemStore {
    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut inner = self.lock();
        if inner.users.values().any(|u| u.email == new_user.email) {
            return Err(StoreError::Duplicate);
        }
        let user = User {
            id: Uuid::new_v4(),
            name: new_user.name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            created_at: OffsetDateTime::now_utc(),
        };
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.lock().users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.lock().users.get(&id).cloned())
    }

    async fn create_todo(&self, new_todo: NewTodo) -> Result<Todo, StoreError> {
        let mut inner = self.lock();
        if !inner.users.contains_key(&new_todo.user_id) {
            return Err(StoreError::ForeignKey);
        }
        inner.seq += 1;
        let seq = inner.seq;
        let todo = Todo {
            id: Uuid::new_v4(),
            text: new_todo.text,
            priority: new_todo.priority,
            category: new_todo.category,
            due_date: new_todo.due_date,
            completed: new_todo.completed,
            user_id: new_todo.user_id,
            created_at: OffsetDateTime::now_utc(),
        };
        inner.todos.insert(todo.id, (seq, todo.clone()));
        Ok(todo)
    }

    async fn list_todos_for_user(&self, user_id: Uuid) -> Result<Vec<Todo>, StoreError> {
        let inner = self.lock();
        let mut rows: Vec<(u64, Todo)> = inner
            .todos
            .values()
            .filter(|(_, t)| t.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.1.created_at.cmp(&a.1.created_at).then(b.0.cmp(&a.0)));
        Ok(rows.into_iter().map(|(_, t)| t).collect())
    }

    async fn find_todo(&self, id: Uuid) -> Result<Option<Todo>, StoreError> {
        Ok(self.lock().todos.get(&id).map(|(_, t)| t.clone()))
    }

    async fn update_todo(&self, todo: &Todo) -> Result<Todo, StoreError> {
        let mut inner = self.lock();
        match inner.todos.get_mut(&todo.id) {
            Some((_, existing)) => {
                existing.text = todo.text.clone();
                existing.priority = todo.priority;
                existing.category = todo.category;
                existing.due_date = todo.due_date;
                existing.completed = todo.completed;
                Ok(existing.clone())
            }
            None => Err(StoreError::NotFound),
        }
    }

    async fn delete_todo(&self, id: Uuid) -> Result<(), StoreError> {
        match self.lock().todos.remove(&id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound),
        }
    }
}
