use chrono::{DateTime, Utc};
use hourglass_rs::SafeTimeProvider;
use uuid::Uuid;

use crate::billing::due_amount::{calculate_amount_due, DueAmount};
use crate::billing::variance::{classify_payment, split_disbursement, DisbursementSplit};
use crate::config::{BillingConfig, RateSchedule};
use crate::decimal::Money;
use crate::errors::{BillingError, Result};
use crate::events::{EventStore, LedgerEvent};
use crate::stay::availability::{check_availability, BookingInterval};
use crate::stay::quote::{quote_stay, StayQuote};
use crate::types::{Payment, PaymentId, PaymentStatus, PaymentType, Tenant, UnitId};

/// orchestrates ledger mutations
///
/// posting a payment appends the record and moves the tenant balance in the
/// same call, so the ledger and the balance cannot diverge; every mutation
/// emits events for the host's audit and persistence layer
pub struct LedgerEngine {
    config: BillingConfig,
}

impl LedgerEngine {
    pub fn new(config: BillingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &BillingConfig {
        &self.config
    }

    /// what the tenant currently owes
    pub fn amount_due(&self, tenant: &Tenant, time: &SafeTimeProvider) -> Result<DueAmount> {
        calculate_amount_due(tenant, time)
    }

    /// split a collected amount between agency, tax, and landlord using the
    /// configured percentages
    pub fn disbursement(&self, amount: Money) -> DisbursementSplit {
        split_disbursement(
            amount,
            self.config.agency_fee_percentage,
            self.config.tax_deduction_percentage,
        )
    }

    /// record a received payment and update the tenant balance atomically
    ///
    /// the payment lands as completed when it covers the amount due and as
    /// partial otherwise; the tenant's balance moves to the classified new
    /// balance in the same call
    pub fn post_payment(
        &self,
        tenant: &mut Tenant,
        unit_id: Option<UnitId>,
        amount_paid: Money,
        amount_due: Money,
        payment_type: PaymentType,
        due_date: Option<DateTime<Utc>>,
        time: &SafeTimeProvider,
        events: &mut EventStore,
    ) -> Result<PaymentId> {
        if amount_paid.is_zero() || amount_paid.is_negative() {
            return Err(BillingError::InvalidPaymentAmount { amount: amount_paid });
        }

        let now = time.now();
        let previous_balance = tenant.current_balance;
        let classification = classify_payment(amount_paid, amount_due, previous_balance);

        let status = if amount_paid >= amount_due {
            PaymentStatus::Completed
        } else {
            PaymentStatus::Partial
        };

        let payment = Payment {
            id: Uuid::new_v4(),
            tenant_id: tenant.id,
            unit_id,
            amount_due,
            amount_paid,
            payment_date: now,
            due_date,
            status,
            payment_type,
            payment_variance: classification.payment_variance,
            previous_balance,
            new_balance: classification.new_balance,
            is_overpayment: classification.is_overpayment,
            is_underpayment: classification.is_underpayment,
            overpayment: classification.overpayment,
            underpayment: classification.underpayment,
        };
        let payment_id = payment.id;

        events.emit(LedgerEvent::PaymentPosted {
            payment_id,
            tenant_id: tenant.id,
            amount_paid,
            amount_due,
            variance: classification.payment_variance,
            timestamp: now,
        });
        if classification.is_overpayment {
            events.emit(LedgerEvent::OverpaymentRecorded {
                payment_id,
                tenant_id: tenant.id,
                amount: classification.overpayment,
                timestamp: now,
            });
        } else if classification.is_underpayment {
            events.emit(LedgerEvent::UnderpaymentRecorded {
                payment_id,
                tenant_id: tenant.id,
                amount: classification.underpayment,
                timestamp: now,
            });
        }
        events.emit(LedgerEvent::BalanceUpdated {
            tenant_id: tenant.id,
            old_balance: previous_balance,
            new_balance: classification.new_balance,
            carry_forward_type: classification.carry_forward_type,
            timestamp: now,
        });

        tenant.payment_history.push(payment);
        tenant.current_balance = classification.new_balance;

        Ok(payment_id)
    }

    /// record an expected payment that has not been received yet
    ///
    /// pending payments carry no funds and do not move the balance
    pub fn schedule_payment(
        &self,
        tenant: &mut Tenant,
        unit_id: Option<UnitId>,
        amount_due: Money,
        payment_type: PaymentType,
        due_date: DateTime<Utc>,
        time: &SafeTimeProvider,
    ) -> Result<PaymentId> {
        if amount_due.is_negative() {
            return Err(BillingError::InvalidPaymentAmount { amount: amount_due });
        }

        let balance = tenant.current_balance;
        let payment = Payment {
            id: Uuid::new_v4(),
            tenant_id: tenant.id,
            unit_id,
            amount_due,
            amount_paid: Money::ZERO,
            payment_date: time.now(),
            due_date: Some(due_date),
            status: PaymentStatus::Pending,
            payment_type,
            payment_variance: Money::ZERO,
            previous_balance: balance,
            new_balance: balance,
            is_overpayment: false,
            is_underpayment: false,
            overpayment: Money::ZERO,
            underpayment: Money::ZERO,
        };
        let payment_id = payment.id;
        tenant.payment_history.push(payment);

        Ok(payment_id)
    }

    /// settle a pending payment with received funds
    ///
    /// only pending payments may transition; the record is classified
    /// against its amount due and the balance moves in the same call
    pub fn complete_payment(
        &self,
        tenant: &mut Tenant,
        payment_id: PaymentId,
        amount_paid: Money,
        time: &SafeTimeProvider,
        events: &mut EventStore,
    ) -> Result<()> {
        if amount_paid.is_zero() || amount_paid.is_negative() {
            return Err(BillingError::InvalidPaymentAmount { amount: amount_paid });
        }

        let now = time.now();
        let tenant_id = tenant.id;
        let previous_balance = tenant.current_balance;
        let payment = find_payment(tenant, payment_id)?;
        ensure_pending(payment, PaymentStatus::Completed)?;

        let classification = classify_payment(amount_paid, payment.amount_due, previous_balance);

        payment.amount_paid = amount_paid;
        payment.payment_date = now;
        payment.status = PaymentStatus::Completed;
        payment.payment_variance = classification.payment_variance;
        payment.previous_balance = previous_balance;
        payment.new_balance = classification.new_balance;
        payment.is_overpayment = classification.is_overpayment;
        payment.is_underpayment = classification.is_underpayment;
        payment.overpayment = classification.overpayment;
        payment.underpayment = classification.underpayment;

        tenant.current_balance = classification.new_balance;

        events.emit(LedgerEvent::StatusChanged {
            payment_id,
            old_status: PaymentStatus::Pending,
            new_status: PaymentStatus::Completed,
            timestamp: now,
        });
        events.emit(LedgerEvent::PaymentCompleted {
            payment_id,
            tenant_id,
            timestamp: now,
        });
        events.emit(LedgerEvent::BalanceUpdated {
            tenant_id,
            old_balance: previous_balance,
            new_balance: classification.new_balance,
            carry_forward_type: classification.carry_forward_type,
            timestamp: now,
        });

        Ok(())
    }

    /// mark a pending payment as failed; no funds move
    pub fn fail_payment(
        &self,
        tenant: &mut Tenant,
        payment_id: PaymentId,
        time: &SafeTimeProvider,
        events: &mut EventStore,
    ) -> Result<()> {
        let now = time.now();
        let tenant_id = tenant.id;
        let payment = find_payment(tenant, payment_id)?;
        ensure_pending(payment, PaymentStatus::Failed)?;
        payment.status = PaymentStatus::Failed;

        events.emit(LedgerEvent::StatusChanged {
            payment_id,
            old_status: PaymentStatus::Pending,
            new_status: PaymentStatus::Failed,
            timestamp: now,
        });
        events.emit(LedgerEvent::PaymentFailed {
            payment_id,
            tenant_id,
            timestamp: now,
        });

        Ok(())
    }

    /// price a short-stay booking after checking it against existing
    /// reservations
    pub fn quote_booking(
        &self,
        unit_id: UnitId,
        schedule: &RateSchedule,
        check_in: DateTime<Utc>,
        check_out: DateTime<Utc>,
        existing: &[BookingInterval],
        time: &SafeTimeProvider,
        events: &mut EventStore,
    ) -> Result<StayQuote> {
        if let Err(err) = check_availability(check_in, check_out, existing) {
            if let BillingError::BookingConflict { booking_id } = &err {
                events.emit(LedgerEvent::BookingRejected {
                    unit_id,
                    conflicting_booking: *booking_id,
                    timestamp: time.now(),
                });
            }
            return Err(err);
        }

        let quote = quote_stay(check_in, check_out, schedule)?;
        events.emit(LedgerEvent::BookingQuoted {
            unit_id,
            nights: quote.nights,
            total_amount: quote.total_amount,
            timestamp: time.now(),
        });

        Ok(quote)
    }

    /// end a tenancy, settling the running balance against the security
    /// deposit
    ///
    /// outstanding debt is taken from the deposit first; whatever remains of
    /// the deposit, plus any credit the tenant holds, is the refund. debt
    /// beyond the deposit stays on the balance
    pub fn end_tenancy(
        &self,
        tenant: &mut Tenant,
        time: &SafeTimeProvider,
        events: &mut EventStore,
    ) -> Result<Money> {
        let lease = tenant
            .lease
            .take()
            .ok_or_else(|| BillingError::InvalidConfiguration {
                message: "tenant has no active lease".to_string(),
            })?;

        let deposit = lease.security_deposit;
        let owed = tenant.current_balance;
        let refund = (deposit - owed).floor_at_zero();
        let outstanding = (owed - deposit).floor_at_zero();

        tenant.current_balance = outstanding;

        events.emit(LedgerEvent::TenancyEnded {
            tenant_id: tenant.id,
            deposit_refund: refund,
            outstanding_balance: outstanding,
            timestamp: time.now(),
        });

        Ok(refund)
    }
}

fn find_payment(tenant: &mut Tenant, payment_id: PaymentId) -> Result<&mut Payment> {
    tenant
        .payment_history
        .iter_mut()
        .find(|p| p.id == payment_id)
        .ok_or(BillingError::PaymentNotFound { id: payment_id })
}

fn ensure_pending(payment: &Payment, next: PaymentStatus) -> Result<()> {
    if !payment.status.can_transition_to(next) {
        return Err(BillingError::PaymentNotPending {
            status: payment.status,
        });
    }
    Ok(())
}
