mod appsettings;

use std::{sync::Arc, time::Duration};

use anyhow::Context;
use recuerda_scheduler::{ReminderScanner, ServerClock, parse_timezone};
use recuerda_storage::{
    ReminderStorage, UserStorage,
    sqlite::{self, reminder_storage::SqliteReminderStorage, user_storage::SqliteUserStorage},
};
use recuerda_telegram::{
    BotDefaults, TelegramDeliveryChannel, TelegramInteractionInterface, teloxide::Bot,
};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    pretty_env_logger::init();

    let settings = appsettings::get();

    let server_timezone = parse_timezone(&settings.scheduler.server_timezone)
        .context("Invalid scheduler.server_timezone")?;
    let fallback_timezone = parse_timezone(&settings.user_defaults.time_zone)
        .context("Invalid user_defaults.time_zone")?;

    let pool = sqlite::connect(&settings.database.url).await?;
    let reminder_storage: Arc<dyn ReminderStorage> =
        Arc::new(SqliteReminderStorage::new(pool.clone()));
    let user_storage: Arc<dyn UserStorage> = Arc::new(SqliteUserStorage::new(pool));

    let bot = Bot::new(&settings.telegram.token);

    let scanner = ReminderScanner::new(
        reminder_storage.clone(),
        user_storage.clone(),
        Arc::new(TelegramDeliveryChannel::new(bot.clone())),
        Arc::new(ServerClock::new(server_timezone)),
    );

    let cancellation = CancellationToken::new();
    let scanner_token = cancellation.child_token();
    let scan_interval = Duration::from_secs(settings.scheduler.scan_interval_seconds);
    let scanner_task = tokio::spawn(async move {
        scanner.run(scan_interval, scanner_token).await;
    });

    let defaults = BotDefaults {
        server_timezone,
        fallback_timezone,
        default_reminder_minutes: settings.user_defaults.reminder_minutes,
    };

    TelegramInteractionInterface::start(bot, defaults, reminder_storage, user_storage).await;

    log::info!("Interaction interface stopped, shutting down");
    cancellation.cancel();
    scanner_task.await?;

    Ok(())
}
