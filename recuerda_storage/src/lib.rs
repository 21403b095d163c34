mod error;
mod memory;
pub mod reminder;
pub mod sqlite;
pub mod user;

pub use error::StorageError;
pub use memory::{InMemoryReminderStorage, InMemoryUserStorage};
pub use reminder::{NewReminder, ReminderStorage};
pub use user::{NewUser, UserStorage};
