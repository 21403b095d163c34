use std::sync::Arc;

use recuerda_scheduler::parse_timezone;
use recuerda_storage::UserStorage;
use teloxide::prelude::*;
use teloxide::types::{KeyboardButton, KeyboardMarkup, KeyboardRemove};

use crate::commands::not_registered;

use super::{GlobalDialogue, GlobalState, HandlerResult};

/// Zones offered on the reply keyboard; any valid IANA name typed by hand
/// is accepted as well.
const COMMON_TIMEZONES: [&str; 7] = [
    "America/Havana",
    "America/Mexico_City",
    "America/New_York",
    "America/Los_Angeles",
    "Europe/Madrid",
    "Europe/London",
    "Asia/Tokyo",
];

const COMMON_LEAD_MINUTES: [&str; 4] = ["15", "30", "60", "120"];

pub(super) async fn ask_timezone(
    bot: Bot,
    dialogue: GlobalDialogue,
    user_storage: Arc<dyn UserStorage>,
    msg: Message,
) -> HandlerResult {
    log::info!("/timezone");

    if user_storage.get(msg.chat.id.0).await?.is_none() {
        return not_registered(&bot, msg.chat.id).await;
    }

    let buttons = COMMON_TIMEZONES
        .iter()
        .map(|zone| vec![KeyboardButton::new(*zone)]);
    let keyboard = KeyboardMarkup::new(buttons).one_time_keyboard();

    bot.send_message(
        msg.chat.id,
        "Send me your time zone (e.g. America/Havana) or pick one of the options:",
    )
    .reply_markup(keyboard)
    .await?;

    dialogue.update(GlobalState::ChoosingTimezone).await?;

    Ok(())
}

pub(super) async fn receive_timezone(
    bot: Bot,
    dialogue: GlobalDialogue,
    user_storage: Arc<dyn UserStorage>,
    msg: Message,
) -> HandlerResult {
    let Some(text) = msg.text() else {
        bot.send_message(msg.chat.id, "Please send me a time zone name.")
            .await?;
        return Ok(());
    };

    match parse_timezone(text.trim()) {
        Ok(zone) => {
            let Some(mut user) = user_storage.get(msg.chat.id.0).await? else {
                not_registered(&bot, msg.chat.id).await?;
                dialogue.exit().await?;
                return Ok(());
            };

            user.time_zone = zone;
            user_storage.update(user).await?;

            bot.send_message(msg.chat.id, format!("✅ Time zone updated to: {zone}"))
                .reply_markup(KeyboardRemove::new())
                .await?;
            dialogue.exit().await?;
        }
        Err(_) => {
            bot.send_message(msg.chat.id, "❌ That is not a valid time zone. Try again.")
                .await?;
        }
    }

    Ok(())
}

pub(super) async fn ask_lead_minutes(
    bot: Bot,
    dialogue: GlobalDialogue,
    user_storage: Arc<dyn UserStorage>,
    msg: Message,
) -> HandlerResult {
    log::info!("/remindertime");

    if user_storage.get(msg.chat.id.0).await?.is_none() {
        return not_registered(&bot, msg.chat.id).await;
    }

    let buttons = vec![
        COMMON_LEAD_MINUTES
            .iter()
            .map(|minutes| KeyboardButton::new(*minutes))
            .collect::<Vec<_>>(),
    ];
    let keyboard = KeyboardMarkup::new(buttons).one_time_keyboard();

    bot.send_message(
        msg.chat.id,
        "How many minutes before the due time do you want the alert? (e.g. 30 for 30 minutes before)",
    )
    .reply_markup(keyboard)
    .await?;

    dialogue.update(GlobalState::ChoosingLeadMinutes).await?;

    Ok(())
}

pub(super) async fn receive_lead_minutes(
    bot: Bot,
    dialogue: GlobalDialogue,
    user_storage: Arc<dyn UserStorage>,
    msg: Message,
) -> HandlerResult {
    let minutes = msg.text().and_then(|text| text.trim().parse::<u32>().ok());

    match minutes {
        Some(minutes) if minutes > 0 => {
            let Some(mut user) = user_storage.get(msg.chat.id.0).await? else {
                not_registered(&bot, msg.chat.id).await?;
                dialogue.exit().await?;
                return Ok(());
            };

            user.default_reminder_minutes = minutes;
            user_storage.update(user).await?;

            bot.send_message(
                msg.chat.id,
                format!("✅ You will be alerted {minutes} minutes before the due time."),
            )
            .reply_markup(KeyboardRemove::new())
            .await?;
            dialogue.exit().await?;
        }
        _ => {
            bot.send_message(
                msg.chat.id,
                "❌ Please send a valid number of minutes (e.g. 30).",
            )
            .await?;
        }
    }

    Ok(())
}
