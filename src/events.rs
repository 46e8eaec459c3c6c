use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{BookingId, CarryForwardType, PaymentId, PaymentStatus, TenantId, UnitId};

/// all events emitted by ledger operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LedgerEvent {
    // payment events
    PaymentPosted {
        payment_id: PaymentId,
        tenant_id: TenantId,
        amount_paid: Money,
        amount_due: Money,
        variance: Money,
        timestamp: DateTime<Utc>,
    },
    PaymentCompleted {
        payment_id: PaymentId,
        tenant_id: TenantId,
        timestamp: DateTime<Utc>,
    },
    PaymentFailed {
        payment_id: PaymentId,
        tenant_id: TenantId,
        timestamp: DateTime<Utc>,
    },
    OverpaymentRecorded {
        payment_id: PaymentId,
        tenant_id: TenantId,
        amount: Money,
        timestamp: DateTime<Utc>,
    },
    UnderpaymentRecorded {
        payment_id: PaymentId,
        tenant_id: TenantId,
        amount: Money,
        timestamp: DateTime<Utc>,
    },

    // balance events
    BalanceUpdated {
        tenant_id: TenantId,
        old_balance: Money,
        new_balance: Money,
        carry_forward_type: CarryForwardType,
        timestamp: DateTime<Utc>,
    },

    // booking events
    BookingQuoted {
        unit_id: UnitId,
        nights: i64,
        total_amount: Money,
        timestamp: DateTime<Utc>,
    },
    BookingRejected {
        unit_id: UnitId,
        conflicting_booking: BookingId,
        timestamp: DateTime<Utc>,
    },

    // tenancy events
    TenancyEnded {
        tenant_id: TenantId,
        deposit_refund: Money,
        outstanding_balance: Money,
        timestamp: DateTime<Utc>,
    },

    // status change events
    StatusChanged {
        payment_id: PaymentId,
        old_status: PaymentStatus,
        new_status: PaymentStatus,
        timestamp: DateTime<Utc>,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<LedgerEvent>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: LedgerEvent) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
