// Time source used for the filename date token and vehicle age

use chrono::{Local, NaiveDate, NaiveDateTime};

pub trait Clock {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

// Wall-clock time in the local timezone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

// Frozen clock for tests
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

#[cfg(test)]
impl FixedClock {
    pub fn at(year: i32, month: u32, day: u32) -> Self {
        let now = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .expect("valid fixed date");
        FixedClock(now)
    }
}

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
