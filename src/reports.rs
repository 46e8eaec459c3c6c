use chrono::{DateTime, Datelike, Utc};
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};

use crate::config::BillingConfig;
use crate::decimal::{Money, Rate};
use crate::period::shift_month;
use crate::types::{Payment, PaymentStatus, Tenant};

/// an operating expense for net-income rollups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub amount: Money,
    pub date: DateTime<Utc>,
    pub category: Option<String>,
}

/// period-over-period rollup of a payment ledger
///
/// a pure function of its inputs: the same collections and reference time
/// always produce the same summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerSummary {
    /// received payments in the reference month
    pub monthly_total: Money,
    /// received payments in the month before
    pub last_month_revenue: Money,
    /// month-over-month change, zero when last month collected nothing
    pub growth_rate: Rate,
    /// amounts due on pending payments
    pub pending_total: Money,
    /// subset of pending whose due date has passed
    pub overdue_total: Money,
    /// paid vs due for the reference month, zero when nothing was due
    pub collection_rate: Rate,
    /// tenants whose outstanding balance exceeds the configured threshold
    pub critical_accounts: usize,
    /// aggregate signed variance across received payments
    pub net_balance: Money,
    /// expenses dated in the reference month
    pub expense_total: Money,
    /// monthly total less expenses
    pub net_income: Money,
}

/// roll up a payment ledger for the month containing the injected "now"
pub fn summarize_ledger(
    payments: &[Payment],
    tenants: &[Tenant],
    expenses: &[Expense],
    config: &BillingConfig,
    time: &SafeTimeProvider,
) -> LedgerSummary {
    let now = time.now();
    let this_month = (now.year(), now.month());
    let last_month = shift_month(now.year(), now.month(), -1);

    let mut monthly_total = Money::ZERO;
    let mut last_month_revenue = Money::ZERO;
    let mut pending_total = Money::ZERO;
    let mut overdue_total = Money::ZERO;
    let mut due_this_month = Money::ZERO;
    let mut paid_this_month = Money::ZERO;
    let mut net_balance = Money::ZERO;

    for payment in payments {
        let paid_in = (payment.payment_date.year(), payment.payment_date.month());

        if payment.counts_as_received() {
            if paid_in == this_month {
                monthly_total += payment.amount_paid;
            } else if paid_in == last_month {
                last_month_revenue += payment.amount_paid;
            }
            net_balance += payment.payment_variance;
        }

        if payment.status == PaymentStatus::Pending {
            pending_total += payment.amount_due;
            if payment.due_date.is_some_and(|due| due < now) {
                overdue_total += payment.amount_due;
            }
        }

        // collection rate compares what fell due this month with what was
        // actually received against it
        let due_in = payment
            .due_date
            .map(|d| (d.year(), d.month()))
            .unwrap_or(paid_in);
        if due_in == this_month {
            due_this_month += payment.amount_due;
            if payment.counts_as_received() {
                paid_this_month += payment.amount_paid;
            }
        }
    }

    let growth_rate = if last_month_revenue.is_zero() {
        Rate::ZERO
    } else {
        Rate::ratio(monthly_total - last_month_revenue, last_month_revenue)
    };
    let collection_rate = Rate::ratio(paid_this_month, due_this_month);

    let critical_accounts = tenants
        .iter()
        .filter(|t| t.current_balance > config.critical_balance_threshold)
        .count();

    let expense_total: Money = expenses
        .iter()
        .filter(|e| (e.date.year(), e.date.month()) == this_month)
        .map(|e| e.amount)
        .sum();

    LedgerSummary {
        monthly_total,
        last_month_revenue,
        growth_rate,
        pending_total,
        overdue_total,
        collection_rate,
        critical_accounts,
        net_balance,
        expense_total,
        net_income: monthly_total - expense_total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PaymentType;
    use hourglass_rs::TimeSource;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn clock(s: &str) -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(utc(s)))
    }

    fn payment(
        due: i64,
        paid: i64,
        date: &str,
        due_date: Option<&str>,
        status: PaymentStatus,
    ) -> Payment {
        Payment {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            unit_id: None,
            amount_due: Money::from_major(due),
            amount_paid: Money::from_major(paid),
            payment_date: utc(date),
            due_date: due_date.map(utc),
            status,
            payment_type: PaymentType::Rent,
            payment_variance: Money::from_major(paid - due),
            previous_balance: Money::ZERO,
            new_balance: Money::from_major(paid - due),
            is_overpayment: paid > due,
            is_underpayment: paid < due,
            overpayment: Money::from_major((paid - due).max(0)),
            underpayment: Money::from_major((due - paid).max(0)),
        }
    }

    #[test]
    fn test_monthly_and_last_month_totals() {
        let payments = vec![
            payment(20_000, 20_000, "2026-03-05T00:00:00Z", None, PaymentStatus::Completed),
            payment(15_000, 15_000, "2026-03-12T00:00:00Z", None, PaymentStatus::Completed),
            payment(20_000, 20_000, "2026-02-05T00:00:00Z", None, PaymentStatus::Completed),
        ];
        let summary = summarize_ledger(
            &payments,
            &[],
            &[],
            &BillingConfig::default(),
            &clock("2026-03-20T00:00:00Z"),
        );

        assert_eq!(summary.monthly_total, Money::from_major(35_000));
        assert_eq!(summary.last_month_revenue, Money::from_major(20_000));
        assert_eq!(summary.growth_rate, Rate::from_percentage(dec!(75)));
    }

    #[test]
    fn test_growth_rate_zero_when_no_prior_revenue() {
        let payments = vec![payment(
            20_000,
            20_000,
            "2026-03-05T00:00:00Z",
            None,
            PaymentStatus::Completed,
        )];
        let summary = summarize_ledger(
            &payments,
            &[],
            &[],
            &BillingConfig::default(),
            &clock("2026-03-20T00:00:00Z"),
        );

        assert_eq!(summary.growth_rate, Rate::ZERO);
    }

    #[test]
    fn test_pending_and_overdue_totals() {
        let payments = vec![
            payment(
                20_000,
                0,
                "2026-03-01T00:00:00Z",
                Some("2026-03-10T00:00:00Z"),
                PaymentStatus::Pending,
            ),
            payment(
                15_000,
                0,
                "2026-03-01T00:00:00Z",
                Some("2026-03-25T00:00:00Z"),
                PaymentStatus::Pending,
            ),
        ];
        let summary = summarize_ledger(
            &payments,
            &[],
            &[],
            &BillingConfig::default(),
            &clock("2026-03-20T00:00:00Z"),
        );

        assert_eq!(summary.pending_total, Money::from_major(35_000));
        assert_eq!(summary.overdue_total, Money::from_major(20_000));
    }

    #[test]
    fn test_collection_rate() {
        let payments = vec![
            payment(
                20_000,
                20_000,
                "2026-03-05T00:00:00Z",
                Some("2026-03-01T00:00:00Z"),
                PaymentStatus::Completed,
            ),
            payment(
                20_000,
                0,
                "2026-03-01T00:00:00Z",
                Some("2026-03-01T00:00:00Z"),
                PaymentStatus::Pending,
            ),
        ];
        let summary = summarize_ledger(
            &payments,
            &[],
            &[],
            &BillingConfig::default(),
            &clock("2026-03-20T00:00:00Z"),
        );

        assert_eq!(summary.collection_rate, Rate::from_percentage(dec!(50)));
    }

    #[test]
    fn test_collection_rate_zero_when_nothing_due() {
        let summary = summarize_ledger(
            &[],
            &[],
            &[],
            &BillingConfig::default(),
            &clock("2026-03-20T00:00:00Z"),
        );

        assert_eq!(summary.collection_rate, Rate::ZERO);
    }

    #[test]
    fn test_critical_accounts() {
        let mut risky = Tenant::new("risky");
        risky.current_balance = Money::from_major(150_000);
        let mut fine = Tenant::new("fine");
        fine.current_balance = Money::from_major(5_000);
        let mut credit = Tenant::new("credit");
        credit.current_balance = Money::from_major(-150_000);

        let summary = summarize_ledger(
            &[],
            &[risky, fine, credit],
            &[],
            &BillingConfig::default(),
            &clock("2026-03-20T00:00:00Z"),
        );

        assert_eq!(summary.critical_accounts, 1);
    }

    #[test]
    fn test_net_balance_aggregates_variance() {
        let payments = vec![
            payment(20_000, 25_000, "2026-03-05T00:00:00Z", None, PaymentStatus::Completed),
            payment(20_000, 18_000, "2026-02-05T00:00:00Z", None, PaymentStatus::Completed),
        ];
        let summary = summarize_ledger(
            &payments,
            &[],
            &[],
            &BillingConfig::default(),
            &clock("2026-03-20T00:00:00Z"),
        );

        assert_eq!(summary.net_balance, Money::from_major(3_000));
    }

    #[test]
    fn test_expenses_reduce_net_income() {
        let payments = vec![payment(
            20_000,
            20_000,
            "2026-03-05T00:00:00Z",
            None,
            PaymentStatus::Completed,
        )];
        let expenses = vec![
            Expense {
                amount: Money::from_major(4_000),
                date: utc("2026-03-08T00:00:00Z"),
                category: Some("repairs".to_string()),
            },
            Expense {
                amount: Money::from_major(9_000),
                date: utc("2026-02-08T00:00:00Z"),
                category: None,
            },
        ];
        let summary = summarize_ledger(
            &payments,
            &[],
            &expenses,
            &BillingConfig::default(),
            &clock("2026-03-20T00:00:00Z"),
        );

        assert_eq!(summary.expense_total, Money::from_major(4_000));
        assert_eq!(summary.net_income, Money::from_major(16_000));
    }

    #[test]
    fn test_summary_is_idempotent() {
        let payments = vec![
            payment(20_000, 25_000, "2026-03-05T00:00:00Z", None, PaymentStatus::Completed),
            payment(
                15_000,
                0,
                "2026-03-01T00:00:00Z",
                Some("2026-03-10T00:00:00Z"),
                PaymentStatus::Pending,
            ),
        ];
        let clock = clock("2026-03-20T00:00:00Z");

        let first = summarize_ledger(&payments, &[], &[], &BillingConfig::default(), &clock);
        let second = summarize_ledger(&payments, &[], &[], &BillingConfig::default(), &clock);

        assert_eq!(first, second);
    }
}
