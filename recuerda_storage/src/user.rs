use async_trait::async_trait;

use recuerda_models::{
    chrono_tz,
    user::{User, UserId},
};

use crate::StorageError;

/// `id` is the Telegram chat id; new users start active.
pub struct NewUser {
    pub id: UserId,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub time_zone: chrono_tz::Tz,
    pub default_reminder_minutes: u32,
}

#[async_trait]
pub trait UserStorage: Send + Sync {
    async fn get(&self, id: UserId) -> Result<Option<User>, StorageError>;
    async fn create(&self, new_user: NewUser) -> Result<User, StorageError>;
    async fn update(&self, user: User) -> Result<User, StorageError>;
}
