mod model;

use async_trait::async_trait;
use model::{ReminderRow, status_as_str};
use recuerda_models::{
    reminder::{Reminder, ReminderId, ReminderStatus},
    user::UserId,
};

use crate::{
    StorageError,
    reminder::{NewReminder, ReminderStorage},
};

pub struct SqliteReminderStorage {
    pool: sqlx::SqlitePool,
}

impl SqliteReminderStorage {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReminderStorage for SqliteReminderStorage {
    async fn get(&self, id: ReminderId) -> Result<Option<Reminder>, StorageError> {
        let reminder = sqlx::query_as::<_, ReminderRow>("SELECT * FROM reminders WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(reminder.map(Into::into))
    }

    async fn get_unfinished(&self) -> Result<Vec<Reminder>, StorageError> {
        let reminders = sqlx::query_as::<_, ReminderRow>(
            "SELECT * FROM reminders WHERE status != ? ORDER BY date ASC",
        )
        .bind(status_as_str(ReminderStatus::Completed))
        .fetch_all(&self.pool)
        .await?;

        Ok(reminders.into_iter().map(Into::into).collect())
    }

    async fn get_pending_for_user(&self, user_id: UserId) -> Result<Vec<Reminder>, StorageError> {
        let reminders = sqlx::query_as::<_, ReminderRow>(
            "SELECT * FROM reminders WHERE user_id = ? AND status = ? ORDER BY date ASC",
        )
        .bind(user_id)
        .bind(status_as_str(ReminderStatus::Pending))
        .fetch_all(&self.pool)
        .await?;

        Ok(reminders.into_iter().map(Into::into).collect())
    }

    async fn insert(&self, reminder: NewReminder) -> Result<Reminder, StorageError> {
        let NewReminder {
            user_id,
            title,
            description,
            date,
            reminder_time,
        } = reminder;

        let created_reminder = sqlx::query_as::<_, ReminderRow>(
            "INSERT INTO reminders (user_id, title, description, date, reminder_time, status)
VALUES (?, ?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(user_id)
        .bind(title)
        .bind(description)
        .bind(date)
        .bind(reminder_time)
        .bind(status_as_str(ReminderStatus::Pending))
        .fetch_one(&self.pool)
        .await?;

        Ok(created_reminder.into())
    }

    async fn update_status(
        &self,
        id: ReminderId,
        status: ReminderStatus,
    ) -> Result<Reminder, StorageError> {
        let updated_reminder = sqlx::query_as::<_, ReminderRow>(
            "UPDATE reminders
SET status = ?,
    updated_at = CURRENT_TIMESTAMP
WHERE id = ?
RETURNING *",
        )
        .bind(status_as_str(status))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        updated_reminder
            .map(Into::into)
            .ok_or(StorageError::NotFound {
                entity: "reminder",
                id,
            })
    }
}
