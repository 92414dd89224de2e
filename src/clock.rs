use chrono::Local;

use crate::types::Minutes;

/// Source of the current time of day, injected wherever departures are selected
pub trait Clock {
    fn now(&self) -> Minutes;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> Minutes {
        Minutes::from(Local::now().time())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Minutes);

impl Clock for FixedClock {
    fn now(&self) -> Minutes {
        self.0
    }
}
