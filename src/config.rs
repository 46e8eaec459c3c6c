use chrono::NaiveTime;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{BillingError, Result};

/// rate schedule for a unit
///
/// long-term tenancies bill against `monthly_rent`; short-stay units price
/// against the nightly tier with optional weekly/monthly discount tiers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateSchedule {
    pub monthly_rent: Money,
    pub nightly_rate: Option<Money>,
    pub weekly_rate: Option<Money>,
    pub monthly_rate: Option<Money>,
    pub check_in_time: Option<NaiveTime>,
    pub check_out_time: Option<NaiveTime>,
}

impl RateSchedule {
    /// create a validated schedule
    ///
    /// discount tiers must genuinely discount: weekly_rate must not exceed
    /// nightly_rate * 7 and monthly_rate must not exceed nightly_rate * 30,
    /// and any short-stay tier requires a positive nightly rate
    pub fn new(
        monthly_rent: Money,
        nightly_rate: Option<Money>,
        weekly_rate: Option<Money>,
        monthly_rate: Option<Money>,
    ) -> Result<Self> {
        if monthly_rent.is_negative() {
            return Err(BillingError::InvalidRateSchedule {
                message: format!("monthly rent must not be negative, got {}", monthly_rent),
            });
        }

        if weekly_rate.is_some() || monthly_rate.is_some() || nightly_rate.is_some() {
            let nightly = nightly_rate.ok_or_else(|| BillingError::InvalidRateSchedule {
                message: "short-stay tiers require a nightly rate".to_string(),
            })?;
            if !nightly.is_positive() {
                return Err(BillingError::InvalidRateSchedule {
                    message: format!("nightly rate must be positive, got {}", nightly),
                });
            }
            if let Some(weekly) = weekly_rate {
                if weekly > nightly * dec!(7) {
                    return Err(BillingError::InvalidRateSchedule {
                        message: format!(
                            "weekly rate {} exceeds 7 nights at {}",
                            weekly, nightly
                        ),
                    });
                }
            }
            if let Some(monthly) = monthly_rate {
                if monthly > nightly * dec!(30) {
                    return Err(BillingError::InvalidRateSchedule {
                        message: format!(
                            "monthly rate {} exceeds 30 nights at {}",
                            monthly, nightly
                        ),
                    });
                }
            }
        }

        Ok(Self {
            monthly_rent,
            nightly_rate,
            weekly_rate,
            monthly_rate,
            check_in_time: None,
            check_out_time: None,
        })
    }

    /// create a long-term-only schedule with no short-stay tiers
    pub fn long_term(monthly_rent: Money) -> Self {
        Self {
            monthly_rent,
            nightly_rate: None,
            weekly_rate: None,
            monthly_rate: None,
            check_in_time: None,
            check_out_time: None,
        }
    }

    /// create without tier validation, for rate data that predates validation
    pub fn unchecked(
        monthly_rent: Money,
        nightly_rate: Option<Money>,
        weekly_rate: Option<Money>,
        monthly_rate: Option<Money>,
    ) -> Self {
        Self {
            monthly_rent,
            nightly_rate,
            weekly_rate,
            monthly_rate,
            check_in_time: None,
            check_out_time: None,
        }
    }

    pub fn with_check_times(mut self, check_in: NaiveTime, check_out: NaiveTime) -> Self {
        self.check_in_time = Some(check_in);
        self.check_out_time = Some(check_out);
        self
    }
}

/// billing policy knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingConfig {
    /// outstanding balance above which a tenant counts as a critical account
    pub critical_balance_threshold: Money,
    /// agency commission withheld from collected rent, as a percentage
    pub agency_fee_percentage: Option<Decimal>,
    /// tax withheld from collected rent, as a percentage
    pub tax_deduction_percentage: Option<Decimal>,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            critical_balance_threshold: Money::from_major(100_000),
            agency_fee_percentage: None,
            tax_deduction_percentage: None,
        }
    }
}

impl BillingConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, pct) in [
            ("agency fee", self.agency_fee_percentage),
            ("tax deduction", self.tax_deduction_percentage),
        ] {
            if let Some(p) = pct {
                if p < Decimal::ZERO || p > Decimal::from(100) {
                    return Err(BillingError::InvalidConfiguration {
                        message: format!("{} percentage out of range: {}", name, p),
                    });
                }
            }
        }
        Ok(())
    }
}
