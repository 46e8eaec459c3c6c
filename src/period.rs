use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};

use crate::errors::{BillingError, Result};

/// due days above this clamp down so the due date exists in every month
pub const MAX_DUE_DAY: u8 = 28;

/// the active billing period for a tenancy, derived from the due day and a
/// reference date; never persisted, recomputed on every call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingPeriod {
    /// inclusive
    pub start: DateTime<Utc>,
    /// exclusive
    pub end: DateTime<Utc>,
    /// the due date that closes the active period (equal to `end`)
    pub due_date: DateTime<Utc>,
    /// the due date after that
    pub next_due_date: DateTime<Utc>,
    pub is_overdue: bool,
    pub is_current_period: bool,
    /// whole days from the reference date to the period end, negative once
    /// the period has elapsed
    pub days_until_due: i64,
}

impl BillingPeriod {
    /// whether a date falls inside the period's half-open range
    pub fn contains(&self, date: DateTime<Utc>) -> bool {
        date >= self.start && date < self.end
    }
}

/// resolve the active billing period for a due day of month
///
/// the due day is clamped to [1, 28] so it exists in every month; a due day
/// of zero is rejected. comparisons are at day granularity with no timezone
/// normalization, matching how callers truncate dates
pub fn resolve_billing_period(due_day: u8, reference: DateTime<Utc>) -> Result<BillingPeriod> {
    if due_day == 0 {
        return Err(BillingError::InvalidDueDay { due_day });
    }
    let day = due_day.min(MAX_DUE_DAY) as u32;

    let today = reference.date_naive();
    let current_due = due_date_in_month(today.year(), today.month(), day, due_day)?;
    let previous_due = {
        let (y, m) = shift_month(today.year(), today.month(), -1);
        due_date_in_month(y, m, day, due_day)?
    };
    let next_due = {
        let (y, m) = shift_month(today.year(), today.month(), 1);
        due_date_in_month(y, m, day, due_day)?
    };
    let after_next_due = {
        let (y, m) = shift_month(today.year(), today.month(), 2);
        due_date_in_month(y, m, day, due_day)?
    };

    // before this month's due date the active period runs from last month's
    // due date; on or after it, the period rolls forward
    let (start, end, following) = if today < current_due {
        (previous_due, current_due, next_due)
    } else {
        (current_due, next_due, after_next_due)
    };

    let days_until_due = (end - today).num_days();

    Ok(BillingPeriod {
        start: at_midnight(start),
        end: at_midnight(end),
        due_date: at_midnight(end),
        next_due_date: at_midnight(following),
        is_overdue: today >= start,
        is_current_period: today >= start && today < end,
        days_until_due,
    })
}

/// resolve against the injected clock
pub fn resolve_current_period(due_day: u8, time: &SafeTimeProvider) -> Result<BillingPeriod> {
    resolve_billing_period(due_day, time.now())
}

fn due_date_in_month(year: i32, month: u32, day: u32, original: u8) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or(BillingError::InvalidDueDay { due_day: original })
}

pub(crate) fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let zero_based = year * 12 + month as i32 - 1 + delta;
    (zero_based.div_euclid(12), (zero_based.rem_euclid(12) + 1) as u32)
}

fn at_midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}
