use chrono::NaiveDateTime;
use recuerda_models::reminder::{Reminder, ReminderStatus};

use crate::delivery::ReminderMessageType;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ReminderTransition {
    /// The lead window has started; send the pre-alert.
    Incoming,
    /// The due instant has arrived; send the due alert.
    Complete,
}

impl ReminderTransition {
    pub fn target_status(self) -> ReminderStatus {
        match self {
            ReminderTransition::Incoming => ReminderStatus::Incoming,
            ReminderTransition::Complete => ReminderStatus::Completed,
        }
    }

    pub fn message_type(self) -> ReminderMessageType {
        match self {
            ReminderTransition::Incoming => ReminderMessageType::Incoming,
            ReminderTransition::Complete => ReminderMessageType::Due,
        }
    }
}

/// Evaluates one reminder against the current server-time instant.
///
/// The due guard runs before the incoming guard: a reminder past both
/// thresholds completes in a single step and the stale pre-alert is never
/// sent. At most one transition fires per evaluation, and transitions only
/// move forward.
pub fn next_transition(reminder: &Reminder, now: NaiveDateTime) -> Option<ReminderTransition> {
    match reminder.status {
        ReminderStatus::Completed => None,
        ReminderStatus::Pending | ReminderStatus::Incoming if now >= reminder.date => {
            Some(ReminderTransition::Complete)
        }
        ReminderStatus::Pending if now >= reminder.reminder_time => {
            Some(ReminderTransition::Incoming)
        }
        _ => None,
    }
}
