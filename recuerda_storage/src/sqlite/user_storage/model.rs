use recuerda_models::{chrono_tz, user::User};

#[derive(sqlx::FromRow)]
pub struct UserRow {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub time_zone: String,
    pub default_reminder_minutes: u32,
    pub is_active: bool,
}

impl From<UserRow> for User {
    fn from(value: UserRow) -> Self {
        let time_zone = value.time_zone.parse().unwrap_or_else(|_| {
            log::warn!(
                "Unknown time zone {} for user {}, defaulting to UTC",
                value.time_zone,
                value.id
            );
            chrono_tz::Tz::UTC
        });

        Self {
            id: value.id,
            username: value.username,
            first_name: value.first_name,
            last_name: value.last_name,
            time_zone,
            default_reminder_minutes: value.default_reminder_minutes,
            is_active: value.is_active,
        }
    }
}
