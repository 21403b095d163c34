use chrono::NaiveDateTime;

use crate::user::UserId;

pub type ReminderId = i64;

/// Lifecycle status of a reminder. Transitions are monotonic:
/// `Pending -> Incoming -> Completed`, or `Pending -> Completed` when the
/// pre-alert window was missed entirely. `Completed` is terminal.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ReminderStatus {
    Pending,
    Incoming,
    Completed,
}

impl ReminderStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, ReminderStatus::Completed)
    }
}

/// Both timestamps are naive and already normalized to server time.
/// `reminder_time` is `date` minus the owning user's lead minutes.
#[derive(Debug, Clone)]
pub struct Reminder {
    pub id: ReminderId,
    pub user_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDateTime,
    pub reminder_time: NaiveDateTime,
    pub status: ReminderStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}
