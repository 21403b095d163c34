use async_trait::async_trait;

use recuerda_models::{
    chrono::NaiveDateTime,
    reminder::{Reminder, ReminderId, ReminderStatus},
    user::UserId,
};

use crate::StorageError;

pub struct NewReminder {
    pub user_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDateTime,
    pub reminder_time: NaiveDateTime,
}

#[async_trait]
pub trait ReminderStorage: Send + Sync {
    async fn get(&self, id: ReminderId) -> Result<Option<Reminder>, StorageError>;

    /// All reminders that still need evaluation (status != completed),
    /// ordered by due date ascending.
    async fn get_unfinished(&self) -> Result<Vec<Reminder>, StorageError>;

    async fn get_pending_for_user(&self, user_id: UserId) -> Result<Vec<Reminder>, StorageError>;

    async fn insert(&self, reminder: NewReminder) -> Result<Reminder, StorageError>;

    /// Single read-modify-write; the store layer makes it atomic.
    async fn update_status(
        &self,
        id: ReminderId,
        status: ReminderStatus,
    ) -> Result<Reminder, StorageError>;
}
