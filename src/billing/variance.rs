use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::CarryForwardType;

/// classification of a single payment transaction against its amount due
///
/// pure value: the caller persists the resulting payment record and moves
/// the tenant balance to `new_balance` as one unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentClassification {
    /// amount paid minus amount due, signed
    pub payment_variance: Money,
    pub new_balance: Money,
    pub is_overpayment: bool,
    pub is_underpayment: bool,
    pub overpayment: Money,
    pub underpayment: Money,
    pub carry_forward_type: CarryForwardType,
}

/// classify a payment by its variance against the amount due
pub fn classify_payment(
    amount_paid: Money,
    amount_due: Money,
    previous_balance: Money,
) -> PaymentClassification {
    let variance = amount_paid - amount_due;

    PaymentClassification {
        payment_variance: variance,
        new_balance: previous_balance + variance,
        is_overpayment: variance.is_positive(),
        is_underpayment: variance.is_negative(),
        overpayment: variance.floor_at_zero(),
        underpayment: (-variance).floor_at_zero(),
        carry_forward_type: CarryForwardType::from_signed(variance),
    }
}

/// how a collected amount splits between agency, tax, and landlord
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisbursementSplit {
    pub agency_fee: Money,
    pub tax_deduction: Money,
    pub landlord_amount: Money,
}

/// split a collected amount by the supplied percentages; a missing
/// percentage contributes nothing to its cut
pub fn split_disbursement(
    amount: Money,
    agency_fee_percentage: Option<Decimal>,
    tax_deduction_percentage: Option<Decimal>,
) -> DisbursementSplit {
    let agency_fee = agency_fee_percentage
        .map(|p| amount.percentage(p))
        .unwrap_or(Money::ZERO);
    let tax_deduction = tax_deduction_percentage
        .map(|p| amount.percentage(p))
        .unwrap_or(Money::ZERO);

    DisbursementSplit {
        agency_fee,
        tax_deduction,
        landlord_amount: amount - agency_fee - tax_deduction,
    }
}
