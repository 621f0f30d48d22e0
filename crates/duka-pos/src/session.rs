//! # Session State
//!
//! The mutable per-terminal state: who is logged in, their active shift,
//! and the live cart.
//!
//! ## Concurrency Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  One tokio::sync::Mutex<Session> guards ALL mutating operations.        │
//! │                                                                         │
//! │  Every check-then-act sequence (e.g. "no active shift? create one",     │
//! │  "enough stock? decrement it") runs entirely inside one lock hold,      │
//! │  so two concurrent start_shift calls can never both succeed.            │
//! │                                                                         │
//! │  This is a single-terminal system; a coarse lock is the correct        │
//! │  simplicity/throughput trade.                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use duka_core::{Cart, User};

/// Per-terminal session state. Lives behind the engine's session mutex.
#[derive(Debug, Default)]
pub struct Session {
    /// The logged-in user, if any.
    pub user: Option<User>,

    /// Opaque session token handed out at login. There is no real security
    /// model on a single offline terminal; the token exists so clients have
    /// something to hold and invalidate.
    pub token: Option<String>,

    /// Cached id of the user's active shift.
    pub active_shift_id: Option<String>,

    /// The live cart.
    pub cart: Cart,

    /// Set when the cart was loaded by invoicing a sales order; completing
    /// the sale then also completes the order.
    pub originating_sales_order_id: Option<String>,

    /// Set when the cart was loaded by invoicing a work order.
    pub originating_work_order_id: Option<String>,
}

impl Session {
    /// The logged-in user, or an error for the caller to propagate.
    pub fn require_user(&self) -> Result<&User, crate::error::PosError> {
        self.user.as_ref().ok_or(crate::error::PosError::NotLoggedIn)
    }

    /// The active shift id, or `NoActiveShift`.
    pub fn require_shift(&self) -> Result<&str, crate::error::PosError> {
        self.active_shift_id
            .as_deref()
            .ok_or_else(|| duka_core::CoreError::NoActiveShift.into())
    }

    /// Drops the cart and any originating-document links.
    pub fn reset_cart(&mut self) {
        self.cart.clear();
        self.originating_sales_order_id = None;
        self.originating_work_order_id = None;
    }
}
