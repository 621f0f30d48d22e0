//! # Shift Reconciliation
//!
//! End-of-shift Z-report computation.
//!
//! ## The Reconciliation Equation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  expected cash = starting float                                         │
//! │               + cash tendered across sales                              │
//! │               − change handed back                                      │
//! │               − cash payouts                                            │
//! │                                                                         │
//! │  variance     = actual counted − expected                               │
//! │                 (negative ⇒ drawer is SHORT)                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The report is recomputed **strictly from the shift's linked sale and
//! payout records** at close time. There are no running counters anywhere in
//! the system, so a crash mid-shift can never leave totals drifted from the
//! underlying records.

use std::collections::BTreeMap;

use crate::money::Money;
use crate::types::{PaymentMethod, Payout, Sale, Shift, ShiftReport};

/// Computes the Z-report for a shift from its linked records.
///
/// `sales` and `payouts` may be over-fetched; anything not linked to this
/// shift is ignored. Returns (negative totals, negative payments) fold in
/// naturally - a cash refund reduces the cash breakdown and the expected
/// drawer amount.
pub fn compute_shift_report(
    shift: &Shift,
    sales: &[Sale],
    payouts: &[Payout],
    actual_cash_in_drawer: Money,
) -> ShiftReport {
    let mut payment_breakdown: BTreeMap<PaymentMethod, Money> = BTreeMap::new();
    let mut total_sales = Money::zero();
    let mut total_change = Money::zero();

    for sale in sales.iter().filter(|s| s.shift_id == shift.id) {
        total_sales += sale.total;
        total_change += sale.change;
        for payment in &sale.payments {
            *payment_breakdown
                .entry(payment.method)
                .or_insert_with(Money::zero) += payment.amount;
        }
    }

    // Change is always cash, so it nets out of the cash bucket.
    if !total_change.is_zero() {
        *payment_breakdown
            .entry(PaymentMethod::Cash)
            .or_insert_with(Money::zero) -= total_change;
    }

    let total_payouts: Money = payouts
        .iter()
        .filter(|p| p.shift_id == shift.id)
        .map(|p| p.amount)
        .sum();

    let cash_collected = payment_breakdown
        .get(&PaymentMethod::Cash)
        .copied()
        .unwrap_or_else(Money::zero);

    let expected_cash_in_drawer = shift.starting_float + cash_collected - total_payouts;
    let cash_variance = actual_cash_in_drawer - expected_cash_in_drawer;

    ShiftReport {
        payment_breakdown,
        total_sales,
        total_payouts,
        expected_cash_in_drawer,
        actual_cash_in_drawer,
        cash_variance,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Payment, SaleType, ShiftStatus};
    use chrono::Utc;

    fn test_shift(float_cents: i64) -> Shift {
        Shift {
            id: "shift-1".into(),
            user_id: "u1".into(),
            start_time: Utc::now(),
            end_time: None,
            status: ShiftStatus::Active,
            starting_float: Money::from_cents(float_cents),
            sale_ids: vec![],
            payout_ids: vec![],
            report: None,
        }
    }

    fn test_sale(
        id: &str,
        shift_id: &str,
        total: i64,
        payments: Vec<(PaymentMethod, i64)>,
        change: i64,
    ) -> Sale {
        Sale {
            id: id.into(),
            sale_type: if total < 0 { SaleType::Return } else { SaleType::Sale },
            original_sale_id: None,
            return_reason: None,
            items: vec![],
            subtotal: Money::from_cents(total),
            discount: Money::zero(),
            tax: Money::zero(),
            total: Money::from_cents(total),
            payments: payments
                .into_iter()
                .map(|(method, amount)| Payment {
                    method,
                    amount: Money::from_cents(amount),
                })
                .collect(),
            change: Money::from_cents(change),
            deposit_applied: Money::zero(),
            points_earned: 0,
            points_redeemed_value: Money::zero(),
            customer_id: None,
            cashier_id: "u1".into(),
            shift_id: shift_id.into(),
            created_at: Utc::now(),
        }
    }

    fn test_payout(shift_id: &str, amount: i64) -> Payout {
        Payout {
            id: "po-1".into(),
            shift_id: shift_id.into(),
            cashier_id: "u1".into(),
            amount: Money::from_cents(amount),
            reason: "delivery fuel".into(),
            payee: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_expected_cash_equation() {
        let shift = test_shift(10000); // KSh 100 float

        let sales = vec![
            // KSh 50 sale, paid KSh 60 cash, KSh 10 change
            test_sale("s1", "shift-1", 5000, vec![(PaymentMethod::Cash, 6000)], 1000),
            // KSh 30 sale on M-Pesa
            test_sale("s2", "shift-1", 3000, vec![(PaymentMethod::Mpesa, 3000)], 0),
        ];
        let payouts = vec![test_payout("shift-1", 2000)]; // KSh 20 out

        // Counted KSh 128 (float 100 + cash 60 − change 10 − payout 20 = 130; short 2)
        let report = compute_shift_report(&shift, &sales, &payouts, Money::from_cents(12800));

        assert_eq!(report.total_sales.cents(), 8000);
        assert_eq!(report.total_payouts.cents(), 2000);
        assert_eq!(report.expected_cash_in_drawer.cents(), 13000);
        assert_eq!(report.cash_variance.cents(), -200);
        assert_eq!(
            report.payment_breakdown.get(&PaymentMethod::Cash).unwrap().cents(),
            5000
        );
        assert_eq!(
            report.payment_breakdown.get(&PaymentMethod::Mpesa).unwrap().cents(),
            3000
        );
    }

    #[test]
    fn test_return_reduces_breakdown_and_expected() {
        let shift = test_shift(0);

        let sales = vec![
            test_sale("s1", "shift-1", 5000, vec![(PaymentMethod::Cash, 5000)], 0),
            // Cash refund of KSh 20
            test_sale("r1", "shift-1", -2000, vec![(PaymentMethod::Cash, -2000)], 0),
        ];

        let report = compute_shift_report(&shift, &sales, &[], Money::from_cents(3000));

        assert_eq!(report.total_sales.cents(), 3000);
        assert_eq!(report.expected_cash_in_drawer.cents(), 3000);
        assert_eq!(report.cash_variance.cents(), 0);
    }

    #[test]
    fn test_unlinked_records_ignored() {
        let shift = test_shift(0);

        let sales = vec![
            test_sale("s1", "shift-1", 1000, vec![(PaymentMethod::Cash, 1000)], 0),
            test_sale("s2", "other-shift", 99999, vec![(PaymentMethod::Cash, 99999)], 0),
        ];
        let payouts = vec![test_payout("other-shift", 5000)];

        let report = compute_shift_report(&shift, &sales, &payouts, Money::from_cents(1000));

        assert_eq!(report.total_sales.cents(), 1000);
        assert_eq!(report.total_payouts.cents(), 0);
        assert_eq!(report.cash_variance.cents(), 0);
    }

    #[test]
    fn test_empty_shift() {
        let shift = test_shift(5000);
        let report = compute_shift_report(&shift, &[], &[], Money::from_cents(5000));

        assert!(report.payment_breakdown.is_empty());
        assert_eq!(report.expected_cash_in_drawer.cents(), 5000);
        assert_eq!(report.cash_variance.cents(), 0);
    }
}
