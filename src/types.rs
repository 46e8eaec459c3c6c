use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;

/// unique identifier for a tenant
pub type TenantId = Uuid;

/// unique identifier for a unit
pub type UnitId = Uuid;

/// unique identifier for a payment transaction
pub type PaymentId = Uuid;

/// unique identifier for a short-stay booking
pub type BookingId = Uuid;

/// payment lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// recorded but funds not yet confirmed
    Pending,
    /// funds received in full
    Completed,
    /// funds received for part of the amount due
    Partial,
    /// payment attempt failed
    Failed,
}

impl PaymentStatus {
    /// whether this payment counts toward amounts received
    pub fn counts_as_received(&self) -> bool {
        matches!(self, PaymentStatus::Completed | PaymentStatus::Partial)
    }

    /// valid status transitions: only pending payments may move
    pub fn can_transition_to(&self, next: PaymentStatus) -> bool {
        matches!(
            (self, next),
            (PaymentStatus::Pending, PaymentStatus::Completed)
                | (PaymentStatus::Pending, PaymentStatus::Failed)
        )
    }
}

/// what a payment is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    Rent,
    Deposit,
    Fee,
    Maintenance,
    Other,
    Bnb,
}

/// direction of a carry-forward balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CarryForwardType {
    /// tenant has paid more than owed
    Credit,
    /// tenant owes more than paid
    Debit,
    /// balanced
    None,
}

impl CarryForwardType {
    /// classify from a signed amount (positive = credit)
    pub fn from_signed(amount: Money) -> Self {
        if amount.is_positive() {
            CarryForwardType::Credit
        } else if amount.is_negative() {
            CarryForwardType::Debit
        } else {
            CarryForwardType::None
        }
    }
}

/// lease terms for a long-term tenancy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaseDetails {
    pub rent_amount: Money,
    /// day of month rent falls due, clamped to [1, 28] by the period resolver
    pub payment_due_day: u8,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub security_deposit: Money,
}

/// a tenant with lease terms, running balance, and payment ledger
///
/// `current_balance` is signed: negative means the tenant holds credit,
/// positive means outstanding debt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: TenantId,
    pub name: String,
    pub unit_id: Option<UnitId>,
    pub lease: Option<LeaseDetails>,
    pub current_balance: Money,
    /// chronological by payment date
    pub payment_history: Vec<Payment>,
}

impl Tenant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            unit_id: None,
            lease: None,
            current_balance: Money::ZERO,
            payment_history: Vec::new(),
        }
    }

    pub fn with_lease(mut self, lease: LeaseDetails) -> Self {
        self.lease = Some(lease);
        self
    }

    /// contracted rent, zero when no lease is active
    pub fn rent_amount(&self) -> Money {
        self.lease.as_ref().map(|l| l.rent_amount).unwrap_or(Money::ZERO)
    }
}

/// a single payment transaction
///
/// this is the one canonical payment shape; legacy payloads that use the
/// `amount`/`date` field names deserialize into `amount_paid`/`payment_date`
/// via serde aliases, so no downstream logic branches on field presence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: PaymentId,
    pub tenant_id: TenantId,
    pub unit_id: Option<UnitId>,
    pub amount_due: Money,
    #[serde(alias = "amount")]
    pub amount_paid: Money,
    #[serde(alias = "date")]
    pub payment_date: DateTime<Utc>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: PaymentStatus,
    pub payment_type: PaymentType,
    /// amount_paid - amount_due, signed
    pub payment_variance: Money,
    pub previous_balance: Money,
    pub new_balance: Money,
    pub is_overpayment: bool,
    pub is_underpayment: bool,
    pub overpayment: Money,
    pub underpayment: Money,
}

impl Payment {
    /// whether this payment counts toward amounts received
    pub fn counts_as_received(&self) -> bool {
        self.status.counts_as_received()
    }
}
