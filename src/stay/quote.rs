use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::RateSchedule;
use crate::decimal::Money;
use crate::errors::{BillingError, Result};

const NIGHTS_PER_WEEK: i64 = 7;
const NIGHTS_PER_MONTH: i64 = 30;
const SECONDS_PER_NIGHT: i64 = 86_400;

/// price bracket applied to a stay, selected by stay length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateTier {
    Nightly,
    Weekly,
    Monthly,
}

/// priced short-stay booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StayQuote {
    pub nights: i64,
    pub total_amount: Money,
    pub applied_tier: RateTier,
}

/// price a stay against a unit's rate schedule
///
/// nights is the ceiling of the stay length in 24-hour units. a monthly
/// tier applies from 30 nights and takes priority over the weekly tier,
/// which applies from 7 nights; remainder nights bill at the nightly rate.
/// a unit without the relevant discount tier falls back to nightly pricing.
/// a non-positive stay length is the one hard failure: accepting it would
/// price a booking with no duration
pub fn quote_stay(
    check_in: DateTime<Utc>,
    check_out: DateTime<Utc>,
    schedule: &RateSchedule,
) -> Result<StayQuote> {
    let seconds = (check_out - check_in).num_seconds();
    if seconds <= 0 {
        return Err(BillingError::InvalidStayRange { check_in, check_out });
    }
    let nights = (seconds + SECONDS_PER_NIGHT - 1) / SECONDS_PER_NIGHT;

    let nightly = schedule
        .nightly_rate
        .ok_or_else(|| BillingError::InvalidRateSchedule {
            message: "unit has no nightly rate".to_string(),
        })?;

    let monthly = schedule.monthly_rate.filter(|_| nights >= NIGHTS_PER_MONTH);
    let weekly = schedule.weekly_rate.filter(|_| nights >= NIGHTS_PER_WEEK);

    let (total_amount, applied_tier) = if let Some(monthly) = monthly {
        let months = nights / NIGHTS_PER_MONTH;
        let remainder = nights % NIGHTS_PER_MONTH;
        (
            monthly * Decimal::from(months) + nightly * Decimal::from(remainder),
            RateTier::Monthly,
        )
    } else if let Some(weekly) = weekly {
        let weeks = nights / NIGHTS_PER_WEEK;
        let remainder = nights % NIGHTS_PER_WEEK;
        (
            weekly * Decimal::from(weeks) + nightly * Decimal::from(remainder),
            RateTier::Weekly,
        )
    } else {
        (nightly * Decimal::from(nights), RateTier::Nightly)
    };

    Ok(StayQuote {
        nights,
        total_amount,
        applied_tier,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn schedule(nightly: i64, weekly: Option<i64>, monthly: Option<i64>) -> RateSchedule {
        RateSchedule::new(
            Money::from_major(50_000),
            Some(Money::from_major(nightly)),
            weekly.map(Money::from_major),
            monthly.map(Money::from_major),
        )
        .unwrap()
    }

    #[test]
    fn test_nightly_only() {
        let s = schedule(1_000, None, None);
        let quote = quote_stay(utc("2026-06-01T14:00:00Z"), utc("2026-06-04T14:00:00Z"), &s).unwrap();

        assert_eq!(quote.nights, 3);
        assert_eq!(quote.total_amount, Money::from_major(3_000));
        assert_eq!(quote.applied_tier, RateTier::Nightly);
    }

    #[test]
    fn test_partial_night_rounds_up() {
        let s = schedule(1_000, None, None);
        // 14:00 check-in to 11:00 check-out spans two 24-hour units
        let quote = quote_stay(utc("2026-06-01T14:00:00Z"), utc("2026-06-02T11:00:00Z"), &s).unwrap();

        assert_eq!(quote.nights, 1);

        let quote = quote_stay(utc("2026-06-01T14:00:00Z"), utc("2026-06-03T11:00:00Z"), &s).unwrap();
        assert_eq!(quote.nights, 2);
    }

    #[test]
    fn test_exact_week_uses_weekly_tier() {
        let s = schedule(1_000, Some(6_000), None);
        let quote = quote_stay(utc("2026-06-01T00:00:00Z"), utc("2026-06-08T00:00:00Z"), &s).unwrap();

        assert_eq!(quote.nights, 7);
        assert_eq!(quote.total_amount, Money::from_major(6_000));
        assert_eq!(quote.applied_tier, RateTier::Weekly);
    }

    #[test]
    fn test_week_plus_remainder() {
        let s = schedule(1_000, Some(6_000), None);
        let quote = quote_stay(utc("2026-06-01T00:00:00Z"), utc("2026-06-11T00:00:00Z"), &s).unwrap();

        assert_eq!(quote.nights, 10);
        assert_eq!(quote.total_amount, Money::from_major(9_000)); // 6000 + 3 nights
    }

    #[test]
    fn test_monthly_tier_takes_priority() {
        let s = schedule(1_000, Some(6_000), Some(25_000));
        let quote = quote_stay(utc("2026-06-01T00:00:00Z"), utc("2026-07-06T00:00:00Z"), &s).unwrap();

        assert_eq!(quote.nights, 35);
        assert_eq!(quote.total_amount, Money::from_major(30_000)); // 25000 + 5 nights
        assert_eq!(quote.applied_tier, RateTier::Monthly);
    }

    #[test]
    fn test_long_stay_without_monthly_tier_falls_back_to_weekly() {
        let s = schedule(1_000, Some(6_000), None);
        let quote = quote_stay(utc("2026-06-01T00:00:00Z"), utc("2026-07-06T00:00:00Z"), &s).unwrap();

        // 35 nights = 5 weeks exactly
        assert_eq!(quote.total_amount, Money::from_major(30_000));
        assert_eq!(quote.applied_tier, RateTier::Weekly);
    }

    #[test]
    fn test_long_stay_without_any_tier_is_nightly() {
        let s = schedule(1_000, None, None);
        let quote = quote_stay(utc("2026-06-01T00:00:00Z"), utc("2026-07-06T00:00:00Z"), &s).unwrap();

        assert_eq!(quote.total_amount, Money::from_major(35_000));
        assert_eq!(quote.applied_tier, RateTier::Nightly);
    }

    #[test]
    fn test_zero_length_stay_rejected() {
        let s = schedule(1_000, None, None);
        let t = utc("2026-06-01T14:00:00Z");

        assert!(matches!(
            quote_stay(t, t, &s),
            Err(BillingError::InvalidStayRange { .. })
        ));
    }

    #[test]
    fn test_backwards_range_rejected() {
        let s = schedule(1_000, None, None);

        assert!(matches!(
            quote_stay(utc("2026-06-05T00:00:00Z"), utc("2026-06-01T00:00:00Z"), &s),
            Err(BillingError::InvalidStayRange { .. })
        ));
    }

    #[test]
    fn test_unit_without_nightly_rate_rejected() {
        let s = RateSchedule::long_term(Money::from_major(50_000));

        assert!(matches!(
            quote_stay(utc("2026-06-01T00:00:00Z"), utc("2026-06-04T00:00:00Z"), &s),
            Err(BillingError::InvalidRateSchedule { .. })
        ));
    }
}
