pub mod billing;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod period;
pub mod reports;
pub mod stay;
pub mod types;

// re-export key types
pub use decimal::{Money, Rate};
pub use errors::{BillingError, Result};
pub use events::{EventStore, LedgerEvent};
pub use billing::{
    calculate_amount_due, calculate_carry_forward, classify_payment, split_disbursement,
    CarryForward, DisbursementSplit, DueAmount, PaymentClassification,
};
pub use config::{BillingConfig, RateSchedule};
pub use ledger::LedgerEngine;
pub use period::{resolve_billing_period, resolve_current_period, BillingPeriod};
pub use reports::{summarize_ledger, Expense, LedgerSummary};
pub use stay::{
    check_availability, is_available, quote_stay, BookingInterval, RateTier, StayQuote,
};
pub use types::{
    BookingId, CarryForwardType, LeaseDetails, Payment, PaymentId, PaymentStatus, PaymentType,
    Tenant, TenantId, UnitId,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
