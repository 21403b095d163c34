use async_trait::async_trait;
use recuerda_models::reminder::Reminder;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ReminderMessageType {
    /// Pre-alert fired at `reminder_time`.
    Incoming,
    /// Final alert fired at `date`.
    Due,
}

/// Anything capable of delivering a reminder notification to its owning
/// user. Failure must be reported so the scanner can hold the state
/// transition back and retry.
#[async_trait]
pub trait ReminderDeliveryChannel: Send + Sync + 'static {
    async fn send_reminder_notification(
        &self,
        reminder: &Reminder,
        message: ReminderMessageType,
    ) -> anyhow::Result<()>;
}
