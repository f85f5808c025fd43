//! InMemory User Repository 実装
//!
//! HashMap をインメモリ DB として使用します。email の一意性も
//! ここで（線形走査で）守る。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Email, RepositoryError, User, UserId, UserRepository};

/// インメモリ User Repository 実装
pub struct InMemoryUserRepository {
    /// ユーザー行（Key: user_id）
    users: Mutex<HashMap<String, User>>,
}

impl InMemoryUserRepository {
    /// 新しい InMemoryUserRepository を作成
    pub fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<User, RepositoryError> {
        let users = self.users.lock().await;
        users
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| RepositoryError::UserNotFound(id.as_str().to_string()))
    }

    async fn find_by_email(&self, email: &Email) -> Result<User, RepositoryError> {
        let users = self.users.lock().await;
        users
            .values()
            .find(|user| &user.email == email)
            .cloned()
            .ok_or_else(|| RepositoryError::UserNotFound(email.as_str().to_string()))
    }

    async fn create(&self, user: User) -> Result<User, RepositoryError> {
        let mut users = self.users.lock().await;
        if users.contains_key(user.id.as_str()) {
            return Err(RepositoryError::UserConflict(user.id.as_str().to_string()));
        }
        if users.values().any(|u| u.email == user.email) {
            return Err(RepositoryError::UserConflict(
                user.email.as_str().to_string(),
            ));
        }
        users.insert(user.id.as_str().to_string(), user.clone());
        Ok(user)
    }
}
