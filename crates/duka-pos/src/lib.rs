//! # duka-pos: The POS Engine
//!
//! The operational layer of Duka POS: one [`Pos`] service owning the
//! session, the live cart, and every business operation.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Duka POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                ★ duka-pos (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │     Pos ──► session lock ──► every mutating operation           │   │
//! │  │                                                                 │   │
//! │  │   shift.rs      start/end shift, Z-report write                 │   │
//! │  │   checkout.rs   cart, complete_sale, returns                    │   │
//! │  │   payout.rs     drawer payouts                                  │   │
//! │  │   held.rs       park/resume carts                               │   │
//! │  │   orders/       sales orders, work orders, layaways, POs        │   │
//! │  │   engine.rs     session, catalog, backup                        │   │
//! │  └───────────┬──────────────────────────────┬──────────────────────┘   │
//! │              ▼                              ▼                          │
//! │        duka-core (pure rules)        duka-store (documents)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use duka_pos::{Pos, PosConfig};
//!
//! let pos = Pos::open(PosConfig::from_env()).await?;
//! pos.login("mary@duka.co.ke", "hunter2").await?;
//! pos.start_shift(Money::from_cents(500_00)).await?;
//! pos.add_to_cart(&product_id, 2).await?;
//! let sale = pos.complete_sale(vec![cash_payment]).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod session;

mod checkout;
mod held;
mod orders;
mod payout;
mod shift;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::PosConfig;
pub use engine::Pos;
pub use error::{PosError, PosResult};
pub use orders::purchase_order::PurchaseLineInput;

// Store types callers need for backup handling
pub use duka_store::DocumentRecord;
