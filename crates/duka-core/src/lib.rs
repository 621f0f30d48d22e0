//! # duka-core: Pure Business Logic for Duka POS
//!
//! This crate is the **heart** of Duka POS. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Duka POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    duka-pos (Engine)                            │   │
//! │  │    start_shift ──► complete_sale ──► process_return ──► ...    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ duka-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │transitions│  │   │
//! │  │   │  Shift    │  │   Money   │  │   Cart    │  │  status   │  │   │
//! │  │   │   Sale    │  │  TaxRate  │  │ CartItem  │  │  machines │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐                 │   │
//! │  │   │  report   │  │  loyalty  │  │ validation│                 │   │
//! │  │   │ Z-report  │  │ redeem cap│  │   rules   │                 │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                 │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  duka-store (Document Store)                    │   │
//! │  │          SQLite-backed per-collection JSON documents            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Shift, Sale, Product, linked documents, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - Cart math: line merging, discounts, VAT, deposit offsets
//! - [`transitions`] - Explicit state machines for every status enum
//! - [`report`] - End-of-shift reconciliation (Z-report) recomputation
//! - [`loyalty`] - Loyalty point redemption capping
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Transitions**: Status changes go through one validated function
//!    per entity, never through ad hoc call-site checks
//! 5. **Recomputable Derivations**: Stored snapshots (Z-report, balances,
//!    purchase order status) are produced only by pure functions here, so tests
//!    can always assert `stored == recompute(sources)`

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod loyalty;
pub mod money;
pub mod report;
pub mod transitions;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use duka_core::Money` instead of
// `use duka_core::money::Money`

pub use cart::{Cart, CartItem, CartTotals, Discount};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use report::compute_shift_report;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum items allowed in a single cart
///
/// ## Business Reason
/// Prevents runaway carts and ensures reasonable transaction sizes.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single item in cart
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;
