use async_trait::async_trait;
use recuerda_models::reminder::Reminder;
use recuerda_scheduler::{ReminderDeliveryChannel, ReminderMessageType};
use teloxide::prelude::*;

/// Delivers reminder notifications over Telegram. The reminder's `user_id`
/// is the chat id, so no lookup is needed.
pub struct TelegramDeliveryChannel {
    bot: Bot,
}

impl TelegramDeliveryChannel {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl ReminderDeliveryChannel for TelegramDeliveryChannel {
    async fn send_reminder_notification(
        &self,
        reminder: &Reminder,
        message: ReminderMessageType,
    ) -> anyhow::Result<()> {
        let text = notification_text(reminder, message);
        self.bot
            .send_message(ChatId(reminder.user_id), text)
            .await?;

        Ok(())
    }
}

fn notification_text(reminder: &Reminder, message: ReminderMessageType) -> String {
    match message {
        ReminderMessageType::Incoming => format!(
            "⏰ Reminder: {}\n📅 Date: {}\n",
            reminder.title,
            reminder.date.format("%d/%m/%Y %H:%M")
        ),
        ReminderMessageType::Due => format!("⏰ Reminder: {}\n🔔 It is now!\n", reminder.title),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use recuerda_models::reminder::ReminderStatus;

    fn reminder() -> Reminder {
        let date = NaiveDate::from_ymd_opt(2025, 12, 25)
            .unwrap()
            .and_hms_opt(15, 30, 0)
            .unwrap();

        Reminder {
            id: 1,
            user_id: 10,
            title: "Buy a gift".to_string(),
            description: Some("Something nice".to_string()),
            date,
            reminder_time: date - chrono::Duration::minutes(60),
            status: ReminderStatus::Pending,
            created_at: date - chrono::Duration::days(7),
            updated_at: None,
        }
    }

    #[test]
    fn incoming_message_carries_the_due_date() {
        let text = notification_text(&reminder(), ReminderMessageType::Incoming);

        assert_eq!(text, "⏰ Reminder: Buy a gift\n📅 Date: 25/12/2025 15:30\n");
    }

    #[test]
    fn due_message_has_now_framing() {
        let text = notification_text(&reminder(), ReminderMessageType::Due);

        assert_eq!(text, "⏰ Reminder: Buy a gift\n🔔 It is now!\n");
    }
}
