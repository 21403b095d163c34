use std::{sync::Arc, time::Duration};

use chrono::NaiveDateTime;
use recuerda_models::{
    reminder::{Reminder, ReminderId},
    user::UserId,
};
use recuerda_storage::{ReminderStorage, StorageError, UserStorage};
use thiserror::Error;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::{clock::Clock, delivery::ReminderDeliveryChannel, lifecycle::next_transition};

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("reminder {reminder_id} references unknown user {user_id}")]
    UserNotFound {
        reminder_id: ReminderId,
        user_id: UserId,
    },

    #[error("failed to deliver notification for reminder {reminder_id}")]
    Dispatch {
        reminder_id: ReminderId,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to persist status of reminder {reminder_id} after delivery")]
    Persistence {
        reminder_id: ReminderId,
        #[source]
        source: StorageError,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Periodic driver of the reminder lifecycle. Holds no state of its own;
/// every pass works purely from what the store returns, so a restart
/// resumes correctly.
#[derive(Clone)]
pub struct ReminderScanner {
    reminders: Arc<dyn ReminderStorage>,
    users: Arc<dyn UserStorage>,
    delivery: Arc<dyn ReminderDeliveryChannel>,
    clock: Arc<dyn Clock>,
}

impl ReminderScanner {
    pub fn new(
        reminders: Arc<dyn ReminderStorage>,
        users: Arc<dyn UserStorage>,
        delivery: Arc<dyn ReminderDeliveryChannel>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            reminders,
            users,
            delivery,
            clock,
        }
    }

    /// Runs scan passes on a fixed cadence until cancelled. Passes never
    /// overlap; a pass overrunning the interval delays the next tick
    /// instead of queueing it.
    pub async fn run(&self, interval: Duration, cancellation: CancellationToken) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        log::info!("Reminder scanner started, scanning every {:?}", interval);

        loop {
            tokio::select! {
                _ = cancellation.cancelled() => {
                    log::info!("Reminder scanner shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    if let Err(err) = self.run_once().await {
                        log::error!("Scan pass aborted: {err}");
                    }
                }
            }
        }
    }

    /// One full evaluation pass over all non-terminal reminders. Only the
    /// initial fetch can fail the pass; per-reminder failures are logged
    /// and the pass moves on to the next row.
    pub async fn run_once(&self) -> Result<(), StorageError> {
        let now = self.clock.now();
        let reminders = self.reminders.get_unfinished().await?;

        log::debug!("Evaluating {} reminders at {}", reminders.len(), now);

        for reminder in &reminders {
            if let Err(err) = self.process_reminder(reminder, now).await {
                match &err {
                    ScanError::Persistence { .. } => {
                        log::error!("{err}: the notification may be sent again next tick");
                    }
                    _ => log::warn!("{err}"),
                }
            }
        }

        Ok(())
    }

    async fn process_reminder(
        &self,
        reminder: &Reminder,
        now: NaiveDateTime,
    ) -> Result<(), ScanError> {
        let user = self
            .users
            .get(reminder.user_id)
            .await?
            .ok_or(ScanError::UserNotFound {
                reminder_id: reminder.id,
                user_id: reminder.user_id,
            })?;

        if !user.is_active {
            return Ok(());
        }

        let Some(transition) = next_transition(reminder, now) else {
            return Ok(());
        };

        // Dispatch first; the status only advances after confirmed delivery.
        self.delivery
            .send_reminder_notification(reminder, transition.message_type())
            .await
            .map_err(|source| ScanError::Dispatch {
                reminder_id: reminder.id,
                source,
            })?;

        self.reminders
            .update_status(reminder.id, transition.target_status())
            .await
            .map_err(|source| ScanError::Persistence {
                reminder_id: reminder.id,
                source,
            })?;

        log::info!(
            "Reminder {} moved to {:?}",
            reminder.id,
            transition.target_status()
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests;
