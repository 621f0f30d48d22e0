//! # Status Transitions
//!
//! One validated transition function per linked-document entity.
//!
//! ## Why Centralized State Machines?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Call sites never compare-and-set a status directly. They call          │
//! │  transitions::<entity>::transition(from, to), which either returns      │
//! │  the new status or CoreError::InvalidTransition. Terminal states        │
//! │  (Completed / Cancelled / Received / Defaulted) therefore cannot be     │
//! │  escaped from anywhere in the codebase.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Purchase order status is additionally *derivable* from its lines
//! ([`purchase_order::derive_status`]), so the stored status can always be
//! checked against a recomputation.

use crate::error::{CoreError, CoreResult};
use crate::types::{
    LayawayStatus, PurchaseLine, PurchaseOrderStatus, SalesOrderStatus, WorkOrderStatus,
};

// =============================================================================
// Sales Order
// =============================================================================

pub mod sales_order {
    use super::*;

    fn name(s: SalesOrderStatus) -> &'static str {
        match s {
            SalesOrderStatus::Pending => "pending",
            SalesOrderStatus::Ordered => "ordered",
            SalesOrderStatus::PartiallyReceived => "partially_received",
            SalesOrderStatus::Received => "received",
            SalesOrderStatus::Completed => "completed",
            SalesOrderStatus::Cancelled => "cancelled",
        }
    }

    fn allowed(from: SalesOrderStatus, to: SalesOrderStatus) -> bool {
        use SalesOrderStatus::*;
        matches!(
            (from, to),
            (Pending, Ordered)
                | (Pending, Cancelled)
                | (Ordered, PartiallyReceived)
                | (Ordered, Received)
                | (Ordered, Cancelled)
                | (PartiallyReceived, PartiallyReceived)
                | (PartiallyReceived, Received)
                | (PartiallyReceived, Cancelled)
                | (Received, Completed)
                | (Received, Cancelled)
        )
    }

    /// Validates and performs a sales order status change.
    pub fn transition(from: SalesOrderStatus, to: SalesOrderStatus) -> CoreResult<SalesOrderStatus> {
        if allowed(from, to) {
            Ok(to)
        } else {
            Err(CoreError::InvalidTransition {
                entity: "sales_order",
                from: name(from).to_string(),
                to: name(to).to_string(),
            })
        }
    }

    /// An order can be invoiced through POS once all its goods have arrived.
    #[inline]
    pub fn can_invoice(status: SalesOrderStatus) -> bool {
        status == SalesOrderStatus::Received
    }

    /// A purchase order can be raised only while the order is still pending.
    #[inline]
    pub fn can_order(status: SalesOrderStatus) -> bool {
        status == SalesOrderStatus::Pending
    }
}

// =============================================================================
// Work Order
// =============================================================================

pub mod work_order {
    use super::*;

    fn name(s: WorkOrderStatus) -> &'static str {
        match s {
            WorkOrderStatus::Pending => "pending",
            WorkOrderStatus::InProgress => "in_progress",
            WorkOrderStatus::AwaitingParts => "awaiting_parts",
            WorkOrderStatus::ReadyForPickup => "ready_for_pickup",
            WorkOrderStatus::Completed => "completed",
            WorkOrderStatus::Cancelled => "cancelled",
        }
    }

    fn allowed(from: WorkOrderStatus, to: WorkOrderStatus) -> bool {
        use WorkOrderStatus::*;
        matches!(
            (from, to),
            (Pending, InProgress)
                | (Pending, AwaitingParts)
                | (Pending, Cancelled)
                // Jobs bounce between the bench and the parts shelf freely.
                | (InProgress, AwaitingParts)
                | (AwaitingParts, InProgress)
                | (InProgress, ReadyForPickup)
                | (InProgress, Cancelled)
                | (AwaitingParts, Cancelled)
                | (ReadyForPickup, Completed)
                | (ReadyForPickup, Cancelled)
        )
    }

    /// Validates and performs a work order status change.
    pub fn transition(from: WorkOrderStatus, to: WorkOrderStatus) -> CoreResult<WorkOrderStatus> {
        if allowed(from, to) {
            Ok(to)
        } else {
            Err(CoreError::InvalidTransition {
                entity: "work_order",
                from: name(from).to_string(),
                to: name(to).to_string(),
            })
        }
    }

    /// The outstanding balance is invoiced through POS at pickup - either
    /// while the job sits ready, or after it was marked completed with
    /// money still owed.
    #[inline]
    pub fn can_invoice(status: WorkOrderStatus) -> bool {
        matches!(
            status,
            WorkOrderStatus::ReadyForPickup | WorkOrderStatus::Completed
        )
    }
}

// =============================================================================
// Layaway
// =============================================================================

pub mod layaway {
    use super::*;

    fn name(s: LayawayStatus) -> &'static str {
        match s {
            LayawayStatus::Active => "active",
            LayawayStatus::Completed => "completed",
            LayawayStatus::Defaulted => "defaulted",
            LayawayStatus::Cancelled => "cancelled",
        }
    }

    fn allowed(from: LayawayStatus, to: LayawayStatus) -> bool {
        use LayawayStatus::*;
        matches!(
            (from, to),
            (Active, Completed) | (Active, Defaulted) | (Active, Cancelled)
        )
    }

    /// Validates and performs a layaway status change. `Active` is the only
    /// non-terminal state.
    pub fn transition(from: LayawayStatus, to: LayawayStatus) -> CoreResult<LayawayStatus> {
        if allowed(from, to) {
            Ok(to)
        } else {
            Err(CoreError::InvalidTransition {
                entity: "layaway",
                from: name(from).to_string(),
                to: name(to).to_string(),
            })
        }
    }

    /// Installments are accepted only while the plan is active.
    #[inline]
    pub fn can_accept_payment(status: LayawayStatus) -> bool {
        status == LayawayStatus::Active
    }

    /// Stock goes back on the shelf when a plan is cancelled or defaulted.
    #[inline]
    pub fn restocks_on_exit(to: LayawayStatus) -> bool {
        matches!(to, LayawayStatus::Cancelled | LayawayStatus::Defaulted)
    }
}

// =============================================================================
// Purchase Order
// =============================================================================

pub mod purchase_order {
    use super::*;

    fn name(s: PurchaseOrderStatus) -> &'static str {
        match s {
            PurchaseOrderStatus::Draft => "draft",
            PurchaseOrderStatus::Sent => "sent",
            PurchaseOrderStatus::PartiallyReceived => "partially_received",
            PurchaseOrderStatus::Received => "received",
            PurchaseOrderStatus::Cancelled => "cancelled",
        }
    }

    fn allowed(from: PurchaseOrderStatus, to: PurchaseOrderStatus) -> bool {
        use PurchaseOrderStatus::*;
        matches!(
            (from, to),
            (Draft, Sent)
                | (Draft, Cancelled)
                | (Sent, PartiallyReceived)
                | (Sent, Received)
                | (Sent, Cancelled)
                // Repeated partial deliveries keep the same status.
                | (PartiallyReceived, PartiallyReceived)
                | (PartiallyReceived, Received)
                | (PartiallyReceived, Cancelled)
        )
    }

    /// Validates and performs a purchase order status change.
    pub fn transition(
        from: PurchaseOrderStatus,
        to: PurchaseOrderStatus,
    ) -> CoreResult<PurchaseOrderStatus> {
        if allowed(from, to) {
            Ok(to)
        } else {
            Err(CoreError::InvalidTransition {
                entity: "purchase_order",
                from: name(from).to_string(),
                to: name(to).to_string(),
            })
        }
    }

    /// Goods can be booked in once the order has gone out the door.
    #[inline]
    pub fn can_receive(status: PurchaseOrderStatus) -> bool {
        matches!(
            status,
            PurchaseOrderStatus::Sent | PurchaseOrderStatus::PartiallyReceived
        )
    }

    /// Derives the status a purchase order should carry given its lines.
    ///
    /// Returns `Received` when every line is fully received,
    /// `PartiallyReceived` when anything has arrived, otherwise `Sent`.
    /// Draft/Cancelled orders never reach this function (receiving is
    /// guarded by [`can_receive`]).
    pub fn derive_status(lines: &[PurchaseLine]) -> PurchaseOrderStatus {
        if lines.iter().all(|l| l.fully_received()) {
            PurchaseOrderStatus::Received
        } else if lines.iter().any(|l| l.quantity_received > 0) {
            PurchaseOrderStatus::PartiallyReceived
        } else {
            PurchaseOrderStatus::Sent
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    #[test]
    fn test_sales_order_happy_path() {
        use SalesOrderStatus::*;
        let s = sales_order::transition(Pending, Ordered).unwrap();
        let s = sales_order::transition(s, PartiallyReceived).unwrap();
        let s = sales_order::transition(s, Received).unwrap();
        let s = sales_order::transition(s, Completed).unwrap();
        assert_eq!(s, Completed);
    }

    #[test]
    fn test_sales_order_terminal_states() {
        use SalesOrderStatus::*;
        assert!(sales_order::transition(Completed, Cancelled).is_err());
        assert!(sales_order::transition(Cancelled, Pending).is_err());
        // Cannot invoice before everything has arrived
        assert!(!sales_order::can_invoice(PartiallyReceived));
        assert!(sales_order::can_invoice(Received));
    }

    #[test]
    fn test_work_order_bench_shelf_bounce() {
        use WorkOrderStatus::*;
        let s = work_order::transition(Pending, InProgress).unwrap();
        let s = work_order::transition(s, AwaitingParts).unwrap();
        let s = work_order::transition(s, InProgress).unwrap();
        let s = work_order::transition(s, ReadyForPickup).unwrap();
        assert!(work_order::can_invoice(s));
        let s = work_order::transition(s, Completed).unwrap();
        assert!(work_order::transition(s, InProgress).is_err());
        // A completed job with money still owed can be rung up
        assert!(work_order::can_invoice(s));
        assert!(!work_order::can_invoice(Cancelled));
    }

    #[test]
    fn test_work_order_cannot_skip_to_completed() {
        use WorkOrderStatus::*;
        let err = work_order::transition(Pending, Completed).unwrap_err();
        assert!(matches!(err, CoreError::InvalidTransition { entity: "work_order", .. }));
    }

    #[test]
    fn test_layaway_transitions() {
        use LayawayStatus::*;
        assert!(layaway::transition(Active, Completed).is_ok());
        assert!(layaway::transition(Active, Defaulted).is_ok());
        assert!(layaway::transition(Completed, Active).is_err());
        assert!(layaway::restocks_on_exit(Cancelled));
        assert!(layaway::restocks_on_exit(Defaulted));
        assert!(!layaway::restocks_on_exit(Completed));
    }

    #[test]
    fn test_purchase_order_derive_status() {
        let line = |qty, recv| PurchaseLine {
            product_id: "p1".into(),
            name: "Soda".into(),
            quantity: qty,
            quantity_received: recv,
            unit_cost: Money::from_cents(100),
            ean: None,
            category: None,
        };

        assert_eq!(
            purchase_order::derive_status(&[line(10, 0), line(5, 0)]),
            PurchaseOrderStatus::Sent
        );
        assert_eq!(
            purchase_order::derive_status(&[line(10, 4), line(5, 0)]),
            PurchaseOrderStatus::PartiallyReceived
        );
        assert_eq!(
            purchase_order::derive_status(&[line(10, 10), line(5, 5)]),
            PurchaseOrderStatus::Received
        );
    }

    #[test]
    fn test_purchase_order_receive_guard() {
        use PurchaseOrderStatus::*;
        assert!(!purchase_order::can_receive(Draft));
        assert!(purchase_order::can_receive(Sent));
        assert!(purchase_order::can_receive(PartiallyReceived));
        assert!(!purchase_order::can_receive(Received));
        assert!(!purchase_order::can_receive(Cancelled));
    }
}
