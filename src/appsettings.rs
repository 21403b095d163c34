use std::sync::OnceLock;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct TelegramSettings {
    pub token: String,
}

#[derive(Deserialize, Debug)]
pub struct DatabaseSettings {
    pub url: String,
}

#[derive(Deserialize, Debug)]
pub struct SchedulerSettings {
    #[serde(default = "default_scan_interval_seconds")]
    pub scan_interval_seconds: u64,
    pub server_timezone: String,
}

/// Applied to users registered through /start until they change them.
#[derive(Deserialize, Debug)]
pub struct UserDefaults {
    pub time_zone: String,
    #[serde(default = "default_reminder_minutes")]
    pub reminder_minutes: u32,
}

#[derive(Deserialize, Debug)]
pub struct AppSettings {
    pub telegram: TelegramSettings,
    pub database: DatabaseSettings,
    pub scheduler: SchedulerSettings,
    pub user_defaults: UserDefaults,
}

fn default_scan_interval_seconds() -> u64 {
    60
}

fn default_reminder_minutes() -> u32 {
    60
}

impl AppSettings {
    fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("appsettings").required(true))
            .add_source(File::with_name("appsettings.local").required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}

pub fn get() -> &'static AppSettings {
    static APPSETTINGS: OnceLock<AppSettings> = OnceLock::new();
    APPSETTINGS.get_or_init(|| AppSettings::new().unwrap())
}
