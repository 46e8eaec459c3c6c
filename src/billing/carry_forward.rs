use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{CarryForwardType, Payment};

/// estimated payment records per billing period, used to derive how many
/// periods a tenant's prior history spans
///
/// TODO: confirm this against real billing semantics; two records per period
/// is a heuristic carried over from the legacy calculation
pub const PAYMENTS_PER_PERIOD_ESTIMATE: u32 = 2;

/// net over/underpayment a tenant brings into the next billing period
///
/// `carry_forward_amount` is signed with positive meaning the tenant has
/// paid more than expected historically (credit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarryForward {
    pub carry_forward_amount: Money,
    pub carry_forward_type: CarryForwardType,
    pub current_period_total: Money,
    pub previous_period_total: Money,
    pub expected_previous_period_total: Money,
    pub has_overpayment: bool,
    pub has_underpayment: bool,
}

impl CarryForward {
    pub fn zero() -> Self {
        Self {
            carry_forward_amount: Money::ZERO,
            carry_forward_type: CarryForwardType::None,
            current_period_total: Money::ZERO,
            previous_period_total: Money::ZERO,
            expected_previous_period_total: Money::ZERO,
            has_overpayment: false,
            has_underpayment: false,
        }
    }
}

/// derive the carry-forward position from a payment history
///
/// payments are bucketed by calendar month relative to the reference date:
/// the reference month is the current bucket, strictly earlier months form
/// the prior bucket, and only completed or partial payments count. the
/// expected prior total is the estimated number of elapsed billing periods
/// times the contracted rent. an empty history yields an all-zero result
pub fn calculate_carry_forward(
    payments: &[Payment],
    rent_amount: Money,
    reference: DateTime<Utc>,
) -> CarryForward {
    let ref_year = reference.year();
    let ref_month = reference.month();

    let mut current_total = Money::ZERO;
    let mut previous_total = Money::ZERO;
    let mut previous_count: u32 = 0;

    for payment in payments.iter().filter(|p| p.counts_as_received()) {
        let date = payment.payment_date;
        if date.year() == ref_year && date.month() == ref_month {
            current_total += payment.amount_paid;
        } else if (date.year(), date.month()) < (ref_year, ref_month) {
            previous_total += payment.amount_paid;
            previous_count += 1;
        }
        // future-dated payments fall outside both buckets
    }

    if current_total.is_zero() && previous_count == 0 {
        return CarryForward::zero();
    }

    let estimated_periods = previous_count.div_ceil(PAYMENTS_PER_PERIOD_ESTIMATE);
    let expected_previous_total = rent_amount * rust_decimal::Decimal::from(estimated_periods);
    let carry_forward_amount = previous_total - expected_previous_total;

    CarryForward {
        carry_forward_amount,
        carry_forward_type: CarryForwardType::from_signed(carry_forward_amount),
        current_period_total: current_total,
        previous_period_total: previous_total,
        expected_previous_period_total: expected_previous_total,
        has_overpayment: carry_forward_amount.is_positive(),
        has_underpayment: carry_forward_amount.is_negative(),
    }
}
