use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::decimal::Money;
use crate::types::PaymentStatus;

#[derive(Error, Debug)]
pub enum BillingError {
    #[error("invalid stay range: check-out {check_out} is not after check-in {check_in}")]
    InvalidStayRange {
        check_in: DateTime<Utc>,
        check_out: DateTime<Utc>,
    },

    #[error("booking conflict: requested range overlaps reservation {booking_id}")]
    BookingConflict {
        booking_id: Uuid,
    },

    #[error("invalid rate schedule: {message}")]
    InvalidRateSchedule {
        message: String,
    },

    #[error("invalid due day: {due_day} (must be at least 1)")]
    InvalidDueDay {
        due_day: u8,
    },

    #[error("invalid payment amount: {amount}")]
    InvalidPaymentAmount {
        amount: Money,
    },

    #[error("payment not pending: current status is {status:?}")]
    PaymentNotPending {
        status: PaymentStatus,
    },

    #[error("payment not found: {id}")]
    PaymentNotFound {
        id: Uuid,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, BillingError>;
