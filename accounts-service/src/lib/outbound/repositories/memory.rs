use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserFilter;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// Process-local account store.
///
/// Enforces the same username/email uniqueness as the Postgres schema. Used
/// by the HTTP tests and when no database URL is configured.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<UserId, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn check_unique(users: &HashMap<UserId, User>, candidate: &User) -> Result<(), UserError> {
    for existing in users.values().filter(|u| u.id != candidate.id) {
        if existing.username == candidate.username {
            return Err(UserError::UsernameAlreadyExists(
                candidate.username.as_str().to_string(),
            ));
        }
        if existing.email == candidate.email {
            return Err(UserError::EmailAlreadyExists(
                candidate.email.as_str().to_string(),
            ));
        }
    }
    Ok(())
}

/// Newest first, then the requested page.
fn page(mut users: Vec<User>, limit: i64, offset: i64) -> Vec<User> {
    users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    users
        .into_iter()
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .collect()
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let user = User::register(user);
        let mut users = self.users.write().await;

        check_unique(&users, &user)?;
        users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| &u.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email.as_str() == email)
            .cloned())
    }

    async fn update(&self, mut user: User) -> Result<User, UserError> {
        let mut users = self.users.write().await;

        if !users.contains_key(&user.id) {
            return Err(UserError::NotFound(user.id.to_string()));
        }
        check_unique(&users, &user)?;

        user.updated_at = Utc::now();
        users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        self.users
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| UserError::NotFound(id.to_string()))
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<User>, UserError> {
        let users = self.users.read().await.values().cloned().collect();
        Ok(page(users, limit, offset))
    }

    async fn count(&self) -> Result<i64, UserError> {
        Ok(self.users.read().await.len() as i64)
    }

    async fn filter(&self, filter: &UserFilter) -> Result<Vec<User>, UserError> {
        let users = self
            .users
            .read()
            .await
            .values()
            .filter(|u| filter.matches(u))
            .cloned()
            .collect();
        Ok(page(users, filter.limit, filter.offset))
    }
}
