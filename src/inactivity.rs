//! Inactive-user detection.

use chrono::{NaiveDateTime, TimeDelta};

use crate::record::{UserRecord, UserTable};

/// Default window, in days, after which a user without a login is inactive
pub const DEFAULT_THRESHOLD_DAYS: i64 = 90;

/// Length of the inactivity window.
///
/// Zero and negative values are legal: zero flags every login strictly
/// before `now`, a negative value moves the cutoff into the future.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InactivityThreshold {
    days: i64,
}

impl InactivityThreshold {
    pub fn days(days: i64) -> Self {
        Self { days }
    }

    pub fn as_days(&self) -> i64 {
        self.days
    }

    /// `now - days`, saturating at the representable date range
    pub fn cutoff(&self, now: NaiveDateTime) -> NaiveDateTime {
        let shifted = TimeDelta::try_days(self.days).and_then(|window| now.checked_sub_signed(window));
        match shifted {
            Some(cutoff) => cutoff,
            None if self.days > 0 => NaiveDateTime::MIN,
            None => NaiveDateTime::MAX,
        }
    }
}

impl Default for InactivityThreshold {
    fn default() -> Self {
        Self::days(DEFAULT_THRESHOLD_DAYS)
    }
}

/// True when `record` has no login at all or last logged in before `cutoff`
pub fn inactive_since(record: &UserRecord, cutoff: NaiveDateTime) -> bool {
    record.last_login.is_none_or(|ts| ts < cutoff)
}

/// Returns the inactive sub-sequence of `table`, original order preserved.
///
/// # Arguments
///
/// * `table` - Loaded user records (not modified)
/// * `threshold` - Inactivity window
/// * `now` - Evaluation instant; the cutoff is `now - threshold`
pub fn find_inactive(table: &UserTable, threshold: InactivityThreshold, now: NaiveDateTime) -> UserTable {
    let cutoff = threshold.cutoff(now);
    table.select(|record| inactive_since(record, cutoff))
}
