use std::sync::Arc;

use recuerda_storage::{NewUser, ReminderStorage, UserStorage};
use teloxide::prelude::*;

use super::{BotDefaults, GlobalDialogue, HandlerResult};

pub(super) async fn not_registered(bot: &Bot, chat_id: ChatId) -> HandlerResult {
    bot.send_message(chat_id, "You are not registered yet. Use /start first.")
        .await?;
    Ok(())
}

pub(super) async fn start(
    bot: Bot,
    dialogue: GlobalDialogue,
    defaults: BotDefaults,
    user_storage: Arc<dyn UserStorage>,
    msg: Message,
) -> HandlerResult {
    log::info!("/start");

    let chat_id = msg.chat.id.0;
    if user_storage.get(chat_id).await?.is_none() {
        user_storage
            .create(NewUser {
                id: chat_id,
                username: msg.chat.username().map(ToString::to_string),
                first_name: msg.chat.first_name().map(ToString::to_string),
                last_name: msg.chat.last_name().map(ToString::to_string),
                time_zone: defaults.fallback_timezone,
                default_reminder_minutes: defaults.default_reminder_minutes,
            })
            .await?;
        log::info!("Registered user {}", chat_id);
    }

    // Drop any half-finished dialogue the user left behind.
    dialogue.exit().await?;

    let greeting = format!(
        "Hi {} 👋\n\n\
        Create a new reminder with /reminder\n\
        See your pending reminders with /list\n\
        Change your time zone with /timezone\n\
        Change the alert lead time with /remindertime\n\
        Pause or resume notifications with /activate",
        msg.chat.first_name().unwrap_or("there")
    );
    bot.send_message(msg.chat.id, greeting).await?;

    Ok(())
}

pub(super) async fn list_reminders(
    bot: Bot,
    reminder_storage: Arc<dyn ReminderStorage>,
    user_storage: Arc<dyn UserStorage>,
    msg: Message,
) -> HandlerResult {
    log::info!("/list");

    if user_storage.get(msg.chat.id.0).await?.is_none() {
        return not_registered(&bot, msg.chat.id).await;
    }

    let reminders = reminder_storage.get_pending_for_user(msg.chat.id.0).await?;
    if reminders.is_empty() {
        bot.send_message(msg.chat.id, "You have no pending reminders.")
            .await?;
        return Ok(());
    }

    let mut response = "📅 Your pending reminders:\n\n".to_string();
    for reminder in &reminders {
        response.push_str(&format!(
            "📌 {}\n🕒 {}\n⏰ Alert: {}\n",
            reminder.title,
            reminder.date.format("%d/%m/%Y %H:%M"),
            reminder.reminder_time.format("%d/%m/%Y %H:%M"),
        ));
        if let Some(description) = &reminder.description {
            response.push_str(&format!("📖 {}\n", description));
        }
        response.push('\n');
    }

    bot.send_message(msg.chat.id, response).await?;

    Ok(())
}

pub(super) async fn toggle_notifications(
    bot: Bot,
    user_storage: Arc<dyn UserStorage>,
    msg: Message,
) -> HandlerResult {
    log::info!("/activate");

    let Some(mut user) = user_storage.get(msg.chat.id.0).await? else {
        return not_registered(&bot, msg.chat.id).await;
    };

    user.is_active = !user.is_active;
    let user = user_storage.update(user).await?;

    let text = if user.is_active {
        "🔔 Notifications enabled. You will receive your reminders."
    } else {
        "🔕 Notifications disabled. You will not receive any more alerts."
    };
    bot.send_message(msg.chat.id, text).await?;

    Ok(())
}
