use chrono::{DateTime, Utc};
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};

use crate::billing::carry_forward::{calculate_carry_forward, CarryForward};
use crate::decimal::Money;
use crate::errors::Result;
use crate::period::resolve_billing_period;
use crate::types::Tenant;

/// what a tenant currently owes, with the period and carry-forward context
/// it was derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueAmount {
    /// floored at zero; credit standing surfaces through the balance, never
    /// as a negative charge
    pub amount_due: Money,
    pub base_rent_amount: Money,
    pub due_date: Option<DateTime<Utc>>,
    pub next_due_date: Option<DateTime<Utc>>,
    pub is_overdue: bool,
    pub days_until_due: i64,
    /// received payments that fall inside the active period
    pub current_period_payments: Money,
    pub carry_forward_amount: Money,
    pub has_carry_forward: bool,
}

impl DueAmount {
    fn nothing_due() -> Self {
        Self {
            amount_due: Money::ZERO,
            base_rent_amount: Money::ZERO,
            due_date: None,
            next_due_date: None,
            is_overdue: false,
            days_until_due: 0,
            current_period_payments: Money::ZERO,
            carry_forward_amount: Money::ZERO,
            has_carry_forward: false,
        }
    }
}

/// compute the amount a tenant currently owes
///
/// resolves the active billing period from the lease's due day (defaulting
/// to the 1st), derives the carry-forward from the payment history, then
/// adjusts the contracted rent: credit reduces it (floored at zero), debt
/// increases it, and received payments inside the active period reduce it
/// again. a tenant without a lease owes nothing and is never overdue
pub fn calculate_amount_due(tenant: &Tenant, time: &SafeTimeProvider) -> Result<DueAmount> {
    let lease = match &tenant.lease {
        Some(lease) => lease,
        None => return Ok(DueAmount::nothing_due()),
    };

    let now = time.now();
    let due_day = lease.payment_due_day.max(1);
    let period = resolve_billing_period(due_day, now)?;

    let carry = effective_carry_forward(tenant, now);
    let rent = lease.rent_amount;

    let mut amount_due = rent;
    if carry.is_positive() {
        amount_due = (amount_due - carry).floor_at_zero();
    } else if carry.is_negative() {
        amount_due += carry.abs();
    }

    let current_period_payments: Money = tenant
        .payment_history
        .iter()
        .filter(|p| p.counts_as_received() && period.contains(p.payment_date))
        .map(|p| p.amount_paid)
        .sum();

    amount_due = (amount_due - current_period_payments).floor_at_zero();

    Ok(DueAmount {
        amount_due,
        base_rent_amount: rent,
        due_date: Some(period.due_date),
        next_due_date: Some(period.next_due_date),
        is_overdue: period.is_overdue,
        days_until_due: period.days_until_due,
        current_period_payments,
        carry_forward_amount: carry,
        has_carry_forward: !carry.is_zero(),
    })
}

/// signed carry-forward for the tenant, positive = credit
///
/// derived from the payment history when one exists; a tenant with no
/// received payments falls back to the stored balance, whose sign convention
/// is inverted (negative balance = credit)
fn effective_carry_forward(tenant: &Tenant, now: DateTime<Utc>) -> Money {
    let history: CarryForward =
        calculate_carry_forward(&tenant.payment_history, tenant.rent_amount(), now);

    let has_received = tenant.payment_history.iter().any(|p| p.counts_as_received());
    if has_received {
        history.carry_forward_amount
    } else {
        -tenant.current_balance
    }
}
