//! # Domain Types
//!
//! Core domain types used throughout Duka POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Shift       │   │      Sale       │   │     Payout      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  starting_float │   │  type Sale/Ret  │   │  amount         │       │
//! │  │  sale_ids       │◄──│  items+payments │   │  reason         │       │
//! │  │  report (close) │◄──│  shift_id (FK)  │   │  shift_id (FK)  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  Linked documents, each with its own status state machine:             │
//! │  SalesOrder • WorkOrder • Layaway • PurchaseOrder (→ SupplierInvoice)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Immutability Rules
//! - `Sale` and `Payout` are never mutated after creation. Returns are
//!   separate compensating `Sale` records, not edits.
//! - `Shift.report` is written exactly once at close and never recomputed.
//! - Linked documents mutate only through the validated transitions in
//!   [`crate::transitions`].

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::CartItem;
use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1600 bps = 16% (Kenyan standard VAT rate)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a customer tendered (part of) a payment.
///
/// A sale can carry multiple payments for split tender scenarios.
/// `Ord` is derived so payment breakdowns can live in a `BTreeMap` with
/// stable, deterministic ordering in reports.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash in the drawer.
    Cash,
    /// Card payment on an external terminal.
    Card,
    /// M-Pesa mobile money. The STK push confirmation is simulated upstream;
    /// here it is simply a recorded tender.
    Mpesa,
}

/// A payment towards a sale, layaway, or sales order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub method: PaymentMethod,
    /// Amount tendered in cents. Negative on refund payments.
    pub amount: Money,
}

// =============================================================================
// Product
// =============================================================================

/// Whether a product tracks physical stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    /// Physical goods; `stock` is meaningful and mutated by sales, returns,
    /// layaway reservations, and purchase order receipts.
    Inventory,
    /// Labour / services; `stock` is ignored entirely.
    Service,
}

/// A product available for sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Stock Keeping Unit - business identifier.
    pub sku: String,

    /// Barcode (EAN-13, UPC-A, etc.).
    pub barcode: Option<String>,

    /// Display name shown to cashier and on receipt.
    pub name: String,

    /// Category for reporting and catalog browsing.
    pub category: String,

    pub product_type: ProductType,

    /// Selling price in cents.
    pub price: Money,

    /// Last cost in cents (updated by purchase order receipts).
    pub cost: Money,

    /// Current stock level. Only meaningful for `ProductType::Inventory`.
    pub stock: i64,

    /// Whether product is active (soft delete).
    pub active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Checks if the requested quantity can be sold.
    ///
    /// Services always sell; inventory sells while stock covers the request.
    pub fn can_sell(&self, quantity: i64) -> bool {
        match self.product_type {
            ProductType::Service => true,
            ProductType::Inventory => self.stock >= quantity,
        }
    }

    /// True when stock movements apply to this product.
    #[inline]
    pub fn tracks_stock(&self) -> bool {
        matches!(self.product_type, ProductType::Inventory)
    }
}

// =============================================================================
// Sale
// =============================================================================

/// Distinguishes a forward sale from a compensating return record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleType {
    Sale,
    Return,
}

/// A line item in a sale.
/// Uses snapshot pattern to freeze product data at time of sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleLine {
    pub product_id: String,
    /// SKU at time of sale (frozen).
    pub sku: String,
    /// Product name at time of sale (frozen).
    pub name: String,
    /// Unit price in cents at time of sale (frozen).
    pub unit_price: Money,
    /// Quantity sold. Negative on return lines.
    pub quantity: i64,
    /// Line total (unit_price × quantity). Negative on return lines.
    pub line_total: Money,
    /// Snapshot of the product type, so returns know whether to restock.
    pub product_type: ProductType,
}

/// A completed sale or return transaction.
///
/// Immutable once persisted. Returns reference the original via
/// `original_sale_id` and mirror its lines with negative quantities; the
/// original record is never edited.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    pub id: String,
    pub sale_type: SaleType,
    /// For returns: the sale being compensated.
    pub original_sale_id: Option<String>,
    /// For returns: why the items came back.
    pub return_reason: Option<String>,
    pub items: Vec<SaleLine>,
    pub subtotal: Money,
    pub discount: Money,
    pub tax: Money,
    pub total: Money,
    /// Tendered payments; multiple entries = split tender.
    pub payments: Vec<Payment>,
    /// Cash change handed back to the customer.
    pub change: Money,
    /// Deposit already held against a work order / layaway, offsetting the
    /// amount due at the register.
    pub deposit_applied: Money,
    /// Loyalty points earned. Recorded as 0: the accrual formula is not
    /// defined for this system yet.
    pub points_earned: i64,
    /// Value of loyalty points redeemed as tender.
    pub points_redeemed_value: Money,
    pub customer_id: Option<String>,
    pub cashier_id: String,
    pub shift_id: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Payout
// =============================================================================

/// Cash removed from the drawer during a shift for an expense.
///
/// Immutable once recorded. Reduces the expected cash at end-of-shift
/// reconciliation but touches neither products nor sales.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payout {
    pub id: String,
    pub shift_id: String,
    pub cashier_id: String,
    /// Always positive; the reconciliation subtracts it.
    pub amount: Money,
    pub reason: String,
    pub payee: Option<String>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Shift
// =============================================================================

/// The lifecycle state of a cash-drawer shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftStatus {
    /// Drawer is open; sales and payouts link themselves to this shift.
    Active,
    /// Terminal. The reconciliation snapshot has been written; a new shift
    /// object must be created to go active again.
    Closed,
}

/// The end-of-shift reconciliation snapshot (Z-report).
///
/// Computed exactly once at close by [`crate::report::compute_shift_report`],
/// strictly from the shift's linked sales and payouts - never from running
/// counters, so drift cannot accumulate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftReport {
    /// Net tendered amount per payment method across the shift's sales.
    pub payment_breakdown: BTreeMap<PaymentMethod, Money>,
    /// Sum of sale totals (returns subtract).
    pub total_sales: Money,
    /// Sum of payout amounts.
    pub total_payouts: Money,
    /// starting_float + cash collected − change given − cash payouts.
    pub expected_cash_in_drawer: Money,
    /// What the cashier actually counted.
    pub actual_cash_in_drawer: Money,
    /// actual − expected. Negative means the drawer is short.
    pub cash_variance: Money,
}

/// One cashier session against the cash drawer.
///
/// ## Invariant
/// At most one `Active` shift per user at any time. While active, the only
/// mutation is appending sale/payout ids; closing writes `report` once and
/// is irreversible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shift {
    pub id: String,
    pub user_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub status: ShiftStatus,
    /// The float: cash placed in the drawer before the shift begins.
    pub starting_float: Money,
    /// Append-only while active.
    pub sale_ids: Vec<String>,
    /// Append-only while active.
    pub payout_ids: Vec<String>,
    /// Populated only at close; the permanent Z-report.
    pub report: Option<ShiftReport>,
}

impl Shift {
    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == ShiftStatus::Active
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A customer record with a loyalty point balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub loyalty_points: i64,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Held Receipt
// =============================================================================

/// A parked cart snapshot (suspend/resume).
///
/// Created on "hold", destroyed on "recall" or explicit delete. Not a
/// financial record - just a named stash of cart items and the selected
/// customer. Any held receipt may be recalled out of order, but only into
/// an empty cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeldReceipt {
    pub id: String,
    /// Cashier-chosen label ("Mama Njeri", "blue jacket guy", ...).
    pub name: String,
    pub items: Vec<CartItem>,
    pub customer_id: Option<String>,
    pub held_at: DateTime<Utc>,
}

// =============================================================================
// Sales Order
// =============================================================================

/// Per-line procurement state within a sales order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalesOrderLineStatus {
    Pending,
    Ordered,
    Received,
}

/// A line on a sales order: goods promised to a customer, possibly not yet
/// in stock. The price is locked in at order time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesOrderLine {
    pub product_id: String,
    pub name: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub status: SalesOrderLineStatus,
}

/// Sales order lifecycle. See [`crate::transitions::sales_order`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalesOrderStatus {
    Pending,
    Ordered,
    PartiallyReceived,
    Received,
    Completed,
    Cancelled,
}

/// A customer order for goods, which may trigger a purchase order and is
/// finally invoiced through POS at its locked-in prices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesOrder {
    pub id: String,
    pub customer_id: String,
    pub status: SalesOrderStatus,
    pub items: Vec<SalesOrderLine>,
    pub total: Money,
    /// Deposits and instalments taken so far.
    pub payments: Vec<Payment>,
    pub cashier_id: String,
    pub shift_id: String,
    pub created_at: DateTime<Utc>,
}

impl SalesOrder {
    /// Total paid so far.
    pub fn paid(&self) -> Money {
        self.payments.iter().map(|p| p.amount).sum()
    }

    /// Derived balance: `total − paid`.
    pub fn balance(&self) -> Money {
        self.total - self.paid()
    }
}

// =============================================================================
// Work Order
// =============================================================================

/// Work order lifecycle. See [`crate::transitions::work_order`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkOrderStatus {
    Pending,
    InProgress,
    AwaitingParts,
    ReadyForPickup,
    Completed,
    Cancelled,
}

/// A service job tracked from intake to completion, optionally invoiced
/// through POS as a single service line for the outstanding balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkOrder {
    pub id: String,
    pub customer_id: String,
    /// What the job is ("screen replacement - Tecno Spark 10", ...).
    pub description: String,
    pub status: WorkOrderStatus,
    pub estimated_cost: Money,
    pub deposit_paid: Money,
    /// Staff member the job is assigned to.
    pub assigned_to: Option<String>,
    pub cashier_id: String,
    pub shift_id: String,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl WorkOrder {
    /// Derived balance: `estimated_cost − deposit_paid`.
    pub fn balance(&self) -> Money {
        self.estimated_cost - self.deposit_paid
    }
}

// =============================================================================
// Layaway
// =============================================================================

/// Layaway lifecycle. Completion is automatic (balance ≤ 0); default and
/// cancellation are manual decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayawayStatus {
    Active,
    Completed,
    Defaulted,
    Cancelled,
}

/// A reserved sale paid off in installments before goods are released.
///
/// Stock for inventory lines is deducted up front at creation time (treated
/// as reserved/sold), not at completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layaway {
    pub id: String,
    pub customer_id: String,
    pub items: Vec<SaleLine>,
    pub total: Money,
    pub payments: Vec<Payment>,
    /// Cached `total − Σpayments`; always recomputed by the engine via
    /// [`Layaway::recompute_balance`] after a payment.
    pub balance: Money,
    pub status: LayawayStatus,
    pub cashier_id: String,
    pub shift_id: String,
    pub created_at: DateTime<Utc>,
}

impl Layaway {
    /// Recomputes the balance from the payment list.
    pub fn recompute_balance(&self) -> Money {
        self.total - self.payments.iter().map(|p| p.amount).sum()
    }
}

// =============================================================================
// Purchase Order
// =============================================================================

/// Purchase order lifecycle. See [`crate::transitions::purchase_order`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseOrderStatus {
    Draft,
    Sent,
    PartiallyReceived,
    Received,
    Cancelled,
}

/// A line on a purchase order, tracking ordered vs received quantities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseLine {
    pub product_id: String,
    pub name: String,
    pub quantity: i64,
    pub quantity_received: i64,
    pub unit_cost: Money,
    /// Barcode to stamp onto the product on receipt, if the supplier ships
    /// labelled stock.
    pub ean: Option<String>,
    /// Category to stamp onto the product on receipt.
    pub category: Option<String>,
}

impl PurchaseLine {
    /// Units still outstanding.
    #[inline]
    pub fn outstanding(&self) -> i64 {
        self.quantity - self.quantity_received
    }

    #[inline]
    pub fn fully_received(&self) -> bool {
        self.quantity_received >= self.quantity
    }
}

/// An order placed with a supplier. Receiving it is the trigger that
/// increments product stock and creates supplier invoices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub id: String,
    pub supplier_id: String,
    pub status: PurchaseOrderStatus,
    pub lines: Vec<PurchaseLine>,
    /// Backlink when this PO was generated from a sales order.
    pub sales_order_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PurchaseOrder {
    /// Ordered value of the whole PO.
    pub fn total_cost(&self) -> Money {
        self.lines
            .iter()
            .map(|l| l.unit_cost.multiply_quantity(l.quantity))
            .sum()
    }
}

// =============================================================================
// Supplier & Supplier Invoice
// =============================================================================

/// A supplier the shop purchases from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplier {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// An accounts-payable record created per receiving event.
///
/// Exactly one invoice per receipt, sized to the value received in that
/// event - not the full PO.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierInvoice {
    pub id: String,
    pub purchase_order_id: String,
    pub supplier_id: String,
    pub amount: Money,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// User
// =============================================================================

/// Staff role, controlling which operations the session may perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Cashier,
}

/// A staff member.
///
/// Password is stored in cleartext - a known weakness of the original
/// system, carried over because there is no real security model here
/// (single offline device, mock token).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================
