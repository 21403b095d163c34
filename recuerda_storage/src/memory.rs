//! In-memory storage used by tests and local experiments.

use std::collections::HashMap;

use async_trait::async_trait;
use recuerda_models::{
    chrono::Utc,
    reminder::{Reminder, ReminderId, ReminderStatus},
    user::{User, UserId},
};
use tokio::sync::RwLock;

use crate::{
    StorageError,
    reminder::{NewReminder, ReminderStorage},
    user::{NewUser, UserStorage},
};

struct ReminderStore {
    current_id: ReminderId,
    storage: HashMap<ReminderId, Reminder>,
}

pub struct InMemoryReminderStorage {
    store: RwLock<ReminderStore>,
}

impl InMemoryReminderStorage {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(ReminderStore {
                current_id: 0,
                storage: HashMap::new(),
            }),
        }
    }
}

impl Default for InMemoryReminderStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReminderStorage for InMemoryReminderStorage {
    async fn get(&self, id: ReminderId) -> Result<Option<Reminder>, StorageError> {
        let store = self.store.read().await;
        Ok(store.storage.get(&id).cloned())
    }

    async fn get_unfinished(&self) -> Result<Vec<Reminder>, StorageError> {
        let store = self.store.read().await;
        let mut reminders: Vec<Reminder> = store
            .storage
            .values()
            .filter(|reminder| !reminder.status.is_terminal())
            .cloned()
            .collect();
        reminders.sort_by_key(|reminder| (reminder.date, reminder.id));

        Ok(reminders)
    }

    async fn get_pending_for_user(&self, user_id: UserId) -> Result<Vec<Reminder>, StorageError> {
        let store = self.store.read().await;
        let mut reminders: Vec<Reminder> = store
            .storage
            .values()
            .filter(|reminder| {
                reminder.user_id == user_id && reminder.status == ReminderStatus::Pending
            })
            .cloned()
            .collect();
        reminders.sort_by_key(|reminder| (reminder.date, reminder.id));

        Ok(reminders)
    }

    async fn insert(&self, reminder: NewReminder) -> Result<Reminder, StorageError> {
        let mut store = self.store.write().await;
        store.current_id += 1;
        let id = store.current_id;

        let created = Reminder {
            id,
            user_id: reminder.user_id,
            title: reminder.title,
            description: reminder.description,
            date: reminder.date,
            reminder_time: reminder.reminder_time,
            status: ReminderStatus::Pending,
            created_at: Utc::now().naive_utc(),
            updated_at: None,
        };
        store.storage.insert(id, created.clone());

        Ok(created)
    }

    async fn update_status(
        &self,
        id: ReminderId,
        status: ReminderStatus,
    ) -> Result<Reminder, StorageError> {
        let mut store = self.store.write().await;
        let reminder = store.storage.get_mut(&id).ok_or(StorageError::NotFound {
            entity: "reminder",
            id,
        })?;

        reminder.status = status;
        reminder.updated_at = Some(Utc::now().naive_utc());

        Ok(reminder.clone())
    }
}

pub struct InMemoryUserStorage {
    store: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserStorage {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryUserStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStorage for InMemoryUserStorage {
    async fn get(&self, id: UserId) -> Result<Option<User>, StorageError> {
        let store = self.store.read().await;
        Ok(store.get(&id).cloned())
    }

    async fn create(&self, new_user: NewUser) -> Result<User, StorageError> {
        let user = User {
            id: new_user.id,
            username: new_user.username,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            time_zone: new_user.time_zone,
            default_reminder_minutes: new_user.default_reminder_minutes,
            is_active: true,
        };

        let mut store = self.store.write().await;
        store.insert(user.id, user.clone());

        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, StorageError> {
        let mut store = self.store.write().await;
        if !store.contains_key(&user.id) {
            return Err(StorageError::NotFound {
                entity: "user",
                id: user.id,
            });
        }
        store.insert(user.id, user.clone());

        Ok(user)
    }
}
