use chrono::{DateTime, Local};

/// Represents an entity responsible for providing dates across application. Charts and
/// statistics are always evaluated against a single snapshot taken from it, which also allows it
/// to be replaced during testing.
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Sync + Send + 'static {
    fn time(&self) -> DateTime<Local>;
}

pub struct DefaultClock;

impl Clock for DefaultClock {
    fn time(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Clock frozen at a given moment. Used when the user asks to evaluate charts at some point in
/// the past.
pub struct FixedClock(pub DateTime<Local>);

impl Clock for FixedClock {
    fn time(&self) -> DateTime<Local> {
        self.0
    }
}
