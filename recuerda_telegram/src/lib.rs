mod commands;
mod create_reminder;
mod delivery;
mod user_settings;

pub use delivery::TelegramDeliveryChannel;
pub use teloxide;

use std::sync::Arc;

use chrono_tz::Tz;
use create_reminder::CreateReminderState;
use dptree::case;
use recuerda_storage::{ReminderStorage, UserStorage};
use teloxide::{
    dispatching::UpdateHandler, dispatching::dialogue, dispatching::dialogue::InMemStorage,
    macros::BotCommands, prelude::*,
};

type GlobalDialogue = Dialogue<GlobalState, InMemStorage<GlobalState>>;
type HandlerResult = anyhow::Result<()>;

/// Defaults applied to newly registered users, plus the zone all stored
/// timestamps are normalized to.
#[derive(Clone)]
pub struct BotDefaults {
    pub server_timezone: Tz,
    pub fallback_timezone: Tz,
    pub default_reminder_minutes: u32,
}

#[derive(Default, Clone, Debug, PartialEq, Eq)]
enum GlobalState {
    #[default]
    Idle,
    CreatingReminder(CreateReminderState),
    ChoosingTimezone,
    ChoosingLeadMinutes,
}

#[derive(BotCommands, Clone)]
#[command(
    rename_rule = "lowercase",
    description = "These commands are supported:"
)]
enum GlobalCommand {
    #[command(description = "register and show what I can do")]
    Start,
    #[command(description = "create a new reminder")]
    Reminder,
    #[command(description = "list your pending reminders")]
    List,
    #[command(description = "set your time zone")]
    Timezone,
    #[command(description = "set how many minutes before the due time you are alerted")]
    ReminderTime,
    #[command(description = "pause or resume notifications")]
    Activate,
    #[command(description = "cancel the current operation")]
    Cancel,
}

pub struct TelegramInteractionInterface;

impl TelegramInteractionInterface {
    pub async fn start(
        bot: teloxide::Bot,
        defaults: BotDefaults,
        reminder_storage: Arc<dyn ReminderStorage>,
        user_storage: Arc<dyn UserStorage>,
    ) {
        log::info!("Starting Telegram interaction interface");

        Dispatcher::builder(bot, schema())
            .dependencies(dptree::deps![
                InMemStorage::<GlobalState>::new(),
                defaults,
                reminder_storage,
                user_storage
            ])
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await
    }
}

fn schema() -> UpdateHandler<anyhow::Error> {
    let command_handler = teloxide::filter_command::<GlobalCommand, _>()
        .branch(case![GlobalCommand::Start].endpoint(commands::start))
        .branch(case![GlobalCommand::Reminder].endpoint(create_reminder::start))
        .branch(case![GlobalCommand::List].endpoint(commands::list_reminders))
        .branch(case![GlobalCommand::Timezone].endpoint(user_settings::ask_timezone))
        .branch(case![GlobalCommand::ReminderTime].endpoint(user_settings::ask_lead_minutes))
        .branch(case![GlobalCommand::Activate].endpoint(commands::toggle_notifications))
        .branch(case![GlobalCommand::Cancel].endpoint(cancel));

    let message_handler = Update::filter_message()
        .branch(command_handler)
        .branch(create_reminder::message_schema())
        .branch(case![GlobalState::ChoosingTimezone].endpoint(user_settings::receive_timezone))
        .branch(case![GlobalState::ChoosingLeadMinutes].endpoint(user_settings::receive_lead_minutes))
        .branch(dptree::endpoint(invalid_state));

    let callback_handler = Update::filter_callback_query()
        .branch(create_reminder::callback_schema())
        .branch(dptree::endpoint(invalid_query));

    dialogue::enter::<Update, InMemStorage<GlobalState>, GlobalState, _>()
        .branch(message_handler)
        .branch(callback_handler)
}

async fn cancel(bot: Bot, dialogue: GlobalDialogue, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, "Cancelled current operation.")
        .await?;
    dialogue.exit().await?;
    Ok(())
}

async fn invalid_state(bot: Bot, msg: Message) -> HandlerResult {
    bot.send_message(
        msg.chat.id,
        "Unable to handle the message. Please try again or use /cancel to stop current operation.",
    )
    .await?;
    Ok(())
}

async fn invalid_query(bot: Bot, dialogue: GlobalDialogue, query: CallbackQuery) -> HandlerResult {
    bot.answer_callback_query(query.id).await?;
    bot.send_message(
        dialogue.chat_id(),
        "Unable to handle the query result. Please try again or use /cancel to stop current operation.",
    )
    .await?;

    Ok(())
}
