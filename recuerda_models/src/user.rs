pub type UserId = i64;

/// A registered user. `id` doubles as the Telegram chat id, so delivery
/// needs no extra lookup.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub time_zone: chrono_tz::Tz,
    pub default_reminder_minutes: u32,
    pub is_active: bool,
}
