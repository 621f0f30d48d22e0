//! # Linked Documents
//!
//! The four document lifecycles that feed the register:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SalesOrder    customer orders goods not in stock; may raise a PO;      │
//! │                invoiced through checkout at locked-in prices            │
//! │  WorkOrder     service job; deposit held; balance invoiced at pickup    │
//! │  Layaway       goods reserved up front, paid off in installments        │
//! │  PurchaseOrder order on a supplier; receiving moves stock and cuts      │
//! │                one supplier invoice per receiving event                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Status changes all go through `duka_core::transitions`; nothing here
//! writes a status field directly.

pub mod layaway;
pub mod purchase_order;
pub mod sales_order;
pub mod work_order;
