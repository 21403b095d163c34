use recuerda_models::{
    chrono::NaiveDateTime,
    reminder::{Reminder, ReminderStatus},
};

#[derive(sqlx::FromRow)]
pub struct ReminderRow {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDateTime,
    pub reminder_time: NaiveDateTime,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

impl From<ReminderRow> for Reminder {
    fn from(value: ReminderRow) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            title: value.title,
            description: value.description,
            date: value.date,
            reminder_time: value.reminder_time,
            status: parse_status(&value.status),
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

pub fn status_as_str(status: ReminderStatus) -> &'static str {
    match status {
        ReminderStatus::Pending => "pending",
        ReminderStatus::Incoming => "incoming",
        ReminderStatus::Completed => "completed",
    }
}

fn parse_status(status: &str) -> ReminderStatus {
    match status {
        "pending" => ReminderStatus::Pending,
        "incoming" => ReminderStatus::Incoming,
        "completed" => ReminderStatus::Completed,
        other => {
            log::warn!("Unknown reminder status {}, defaulting to pending", other);
            ReminderStatus::Pending
        }
    }
}
