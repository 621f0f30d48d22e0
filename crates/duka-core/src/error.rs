//! # Error Types
//!
//! Domain errors for Duka POS business logic.
//!
//! ## Error Philosophy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Error Handling Strategy                             │
//! │                                                                         │
//! │  CoreError                                                              │
//! │  ├── Shift guards      (NoActiveShift, ShiftAlreadyActive, ...)         │
//! │  ├── Cart violations   (InsufficientStock, CartTooLarge, ...)           │
//! │  ├── State machines    (InvalidTransition carries entity/from/to)       │
//! │  ├── Payment rules     (InvalidPaymentAmount)                           │
//! │  └── Validation        (wraps ValidationError)                          │
//! │                                                                         │
//! │  Engine/store layers wrap CoreError, never flatten it to strings.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Core Error
// =============================================================================

/// Errors that can occur in business logic operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    // -------------------------------------------------------------------------
    // Shift guards
    // -------------------------------------------------------------------------
    /// A financial operation was attempted without an active shift.
    #[error("no active shift - start a shift before transacting")]
    NoActiveShift,

    /// A shift is already active for this user.
    #[error("shift {0} is already active")]
    ShiftAlreadyActive(String),

    /// The active shift must be reconciled before this operation
    /// (e.g. logging out).
    #[error("shift {0} is still active - reconcile the drawer first")]
    ShiftStillActive(String),

    /// The shift has already been closed and reconciled.
    #[error("shift {0} is already closed")]
    ShiftAlreadyClosed(String),

    // -------------------------------------------------------------------------
    // Cart violations
    // -------------------------------------------------------------------------
    /// Requested quantity exceeds available stock.
    #[error("insufficient stock for {sku}: available {available}, requested {requested}")]
    InsufficientStock {
        sku: String,
        available: i64,
        requested: i64,
    },

    /// Quantity must be positive.
    #[error("invalid quantity: {requested}")]
    InvalidQuantity { requested: i64 },

    /// Quantity exceeds the per-line maximum.
    #[error("quantity {requested} exceeds maximum of {max}")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Cart has reached the maximum number of unique lines.
    #[error("cart is full (maximum {max} items)")]
    CartTooLarge { max: usize },

    /// The product is not in the cart.
    #[error("product {0} is not in the cart")]
    NotInCart(String),

    /// The operation requires a non-empty cart.
    #[error("cart is empty")]
    CartEmpty,

    /// The operation requires an empty cart (e.g. recalling a held receipt).
    #[error("cart is not empty")]
    CartNotEmpty,

    // -------------------------------------------------------------------------
    // Lookups
    // -------------------------------------------------------------------------
    /// Product not found in the catalog.
    #[error("product not found: {0}")]
    ProductNotFound(String),

    // -------------------------------------------------------------------------
    // State machines
    // -------------------------------------------------------------------------
    /// A status change not permitted by the entity's state machine.
    #[error("invalid {entity} transition: {from} -> {to}")]
    InvalidTransition {
        entity: &'static str,
        from: String,
        to: String,
    },

    // -------------------------------------------------------------------------
    // Payments
    // -------------------------------------------------------------------------
    /// Tendered payments do not cover the amount due, or are non-positive.
    #[error("invalid payment: tendered {tendered} against amount due {due}")]
    InvalidPaymentAmount { tendered: String, due: String },

    // -------------------------------------------------------------------------
    // Loyalty
    // -------------------------------------------------------------------------
    /// The customer does not have the points being redeemed.
    #[error("insufficient loyalty points: have {available}, requested {requested}")]
    InsufficientPoints { available: i64, requested: i64 },

    // -------------------------------------------------------------------------
    // Validation
    // -------------------------------------------------------------------------
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation failures, independent of system state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} exceeds maximum length of {max}")]
    TooLong { field: &'static str, max: usize },

    #[error("{field} must not be negative")]
    NegativeAmount { field: &'static str },

    #[error("{field} must be a valid UUID")]
    InvalidId { field: &'static str },

    #[error("tax rate {bps} bps exceeds 100%")]
    TaxRateTooHigh { bps: u32 },
}

// =============================================================================
// Unit Tests
// =============================================================================
