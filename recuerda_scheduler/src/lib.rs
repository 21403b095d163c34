pub mod clock;
pub mod delivery;
pub mod lifecycle;
pub mod scanner;
pub mod timezone;

pub use clock::{Clock, ServerClock};
pub use delivery::{ReminderDeliveryChannel, ReminderMessageType};
pub use lifecycle::{ReminderTransition, next_transition};
pub use scanner::{ReminderScanner, ScanError};
pub use timezone::{TimezoneError, convert_timezone, convert_timezone_by_name, parse_timezone};
