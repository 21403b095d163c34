use std::sync::Arc;

use chrono::{NaiveDateTime, Utc};
use dptree::case;
use recuerda_scheduler::convert_timezone;
use recuerda_storage::{NewReminder, ReminderStorage, UserStorage};
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::commands::not_registered;

use super::{BotDefaults, GlobalDialogue, GlobalState, HandlerResult};

const DATE_FORMAT: &str = "%d/%m/%Y %H:%M";
const DATE_PROMPT: &str =
    "Now enter the date and time of the reminder (format: DD/MM/YYYY HH:MM)\nExample: 25/12/2025 15:30";

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) enum CreateReminderState {
    WaitingForTitle,
    WaitingForDescription {
        title: String,
    },
    WaitingForDate {
        title: String,
        description: Option<String>,
    },
    WaitingForConfirmation {
        title: String,
        description: Option<String>,
        date: NaiveDateTime,
    },
}

pub(super) async fn start(
    bot: Bot,
    dialogue: GlobalDialogue,
    user_storage: Arc<dyn UserStorage>,
    msg: Message,
) -> HandlerResult {
    log::info!("/reminder");

    if user_storage.get(msg.chat.id.0).await?.is_none() {
        return not_registered(&bot, msg.chat.id).await;
    }

    bot.send_message(
        msg.chat.id,
        "Let's create a new reminder. First, send me the title:",
    )
    .await?;

    dialogue
        .update(GlobalState::CreatingReminder(
            CreateReminderState::WaitingForTitle,
        ))
        .await?;

    Ok(())
}

async fn receive_title(bot: Bot, dialogue: GlobalDialogue, msg: Message) -> HandlerResult {
    match msg.text() {
        Some(title) => {
            bot.send_message(
                msg.chat.id,
                "Great. Now describe the reminder, or send 'skip' to leave the description out:",
            )
            .await?;

            dialogue
                .update(GlobalState::CreatingReminder(
                    CreateReminderState::WaitingForDescription {
                        title: title.to_string(),
                    },
                ))
                .await?;
        }
        None => {
            bot.send_message(msg.chat.id, "Please send me the reminder title.")
                .await?;
        }
    }

    Ok(())
}

async fn receive_description(
    bot: Bot,
    dialogue: GlobalDialogue,
    title: String,
    msg: Message,
) -> HandlerResult {
    let Some(text) = msg.text() else {
        bot.send_message(msg.chat.id, "Please send me a description, or 'skip'.")
            .await?;
        return Ok(());
    };

    let description = if text.trim().eq_ignore_ascii_case("skip") {
        None
    } else {
        Some(text.to_string())
    };

    bot.send_message(msg.chat.id, DATE_PROMPT).await?;

    dialogue
        .update(GlobalState::CreatingReminder(
            CreateReminderState::WaitingForDate { title, description },
        ))
        .await?;

    Ok(())
}

async fn receive_date(
    bot: Bot,
    dialogue: GlobalDialogue,
    (title, description): (String, Option<String>),
    defaults: BotDefaults,
    user_storage: Arc<dyn UserStorage>,
    msg: Message,
) -> HandlerResult {
    let date = msg
        .text()
        .map(|text| NaiveDateTime::parse_from_str(text.trim(), DATE_FORMAT));

    let Some(Ok(date)) = date else {
        bot.send_message(msg.chat.id, format!("Wrong format. {DATE_PROMPT}"))
            .await?;
        return Ok(());
    };

    let Some(user) = user_storage.get(msg.chat.id.0).await? else {
        not_registered(&bot, msg.chat.id).await?;
        dialogue.exit().await?;
        return Ok(());
    };

    // Normalize to server time before storing or comparing.
    let date = match convert_timezone(date, user.time_zone, defaults.server_timezone) {
        Ok(date) => date,
        Err(err) => {
            bot.send_message(msg.chat.id, format!("⚠️ {err}. Please enter another time."))
                .await?;
            return Ok(());
        }
    };

    let now = Utc::now()
        .with_timezone(&defaults.server_timezone)
        .naive_local();
    if now >= date {
        bot.send_message(msg.chat.id, "The date cannot be in the past.")
            .await?;
        return Ok(());
    }

    let summary = format!(
        "📌 Reminder summary:\n\n\
        🏷 Title: {}\n\
        📝 Description: {}\n\
        📅 Date: {}\n\n\
        All correct?",
        title,
        description.as_deref().unwrap_or("None"),
        date.format(DATE_FORMAT),
    );

    let confirm_button = InlineKeyboardButton::callback("Confirm", "confirm");
    let cancel_button = InlineKeyboardButton::callback("Cancel", "cancel");
    let keyboard = InlineKeyboardMarkup::new(vec![vec![confirm_button, cancel_button]]);

    bot.send_message(msg.chat.id, summary)
        .reply_markup(keyboard)
        .await?;

    dialogue
        .update(GlobalState::CreatingReminder(
            CreateReminderState::WaitingForConfirmation {
                title,
                description,
                date,
            },
        ))
        .await?;

    Ok(())
}

async fn confirm_reminder(
    bot: Bot,
    dialogue: GlobalDialogue,
    (title, description, date): (String, Option<String>, NaiveDateTime),
    reminder_storage: Arc<dyn ReminderStorage>,
    user_storage: Arc<dyn UserStorage>,
    query: CallbackQuery,
) -> HandlerResult {
    let confirmed = query.data.as_deref() == Some("confirm");
    bot.answer_callback_query(query.id).await?;

    if confirmed {
        let Some(user) = user_storage.get(dialogue.chat_id().0).await? else {
            not_registered(&bot, dialogue.chat_id()).await?;
            dialogue.exit().await?;
            return Ok(());
        };

        let lead = chrono::Duration::minutes(i64::from(user.default_reminder_minutes));
        let reminder = reminder_storage
            .insert(NewReminder {
                user_id: user.id,
                title,
                description,
                date,
                reminder_time: date - lead,
            })
            .await?;

        log::info!("Created reminder {} for user {}", reminder.id, user.id);

        bot.send_message(dialogue.chat_id(), "✅ Reminder created!")
            .await?;
    } else {
        bot.send_message(
            dialogue.chat_id(),
            "Reminder cancelled. You can start over with /reminder.",
        )
        .await?;
    }

    dialogue.exit().await?;

    Ok(())
}

pub(super) fn message_schema() -> UpdateHandler<anyhow::Error> {
    case![GlobalState::CreatingReminder(x)]
        .branch(case![CreateReminderState::WaitingForTitle].endpoint(receive_title))
        .branch(case![CreateReminderState::WaitingForDescription { title }].endpoint(receive_description))
        .branch(
            case![CreateReminderState::WaitingForDate { title, description }]
                .endpoint(receive_date),
        )
}

pub(super) fn callback_schema() -> UpdateHandler<anyhow::Error> {
    case![GlobalState::CreatingReminder(x)].branch(
        case![CreateReminderState::WaitingForConfirmation {
            title,
            description,
            date
        }]
        .endpoint(confirm_reminder),
    )
}
