//! Wall-clock implementation of the `Clock` port.

use chrono::NaiveDateTime;

use crate::application::ports::Clock;

/// Local time of the machine running the CLI.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}
