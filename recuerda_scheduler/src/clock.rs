use chrono::{NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Source of "now" as a naive server-local timestamp, matching the
/// normalization of stored `date` and `reminder_time` values.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> NaiveDateTime;
}

pub struct ServerClock {
    time_zone: Tz,
}

impl ServerClock {
    pub fn new(time_zone: Tz) -> Self {
        Self { time_zone }
    }
}

impl Clock for ServerClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.time_zone).naive_local()
    }
}
