//! # Engine Error Types
//!
//! The outward-facing error type for every `Pos` operation.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CoreError (business rule)   StoreError (persistence)                   │
//! │       │                           │                                     │
//! │       └───────────┬───────────────┘                                     │
//! │                   ▼                                                     │
//! │              PosError  ← adds session/auth failures, keeps the          │
//! │                          source error intact                            │
//! │                   │                                                     │
//! │                   ▼                                                     │
//! │              code() ← stable machine-readable code for UI mapping       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use duka_core::{CoreError, Role, ValidationError};
use duka_store::StoreError;
use thiserror::Error;

/// Result type for engine operations.
pub type PosResult<T> = Result<T, PosError>;

/// Errors surfaced by the POS engine.
#[derive(Debug, Error)]
pub enum PosError {
    /// No user is logged in.
    #[error("not logged in")]
    NotLoggedIn,

    /// Login failed.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The logged-in user lacks the required role.
    #[error("operation requires {required:?} role")]
    Forbidden { required: Role },

    /// A business rule was violated.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The document store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

// `?` on a validator result lands in the Core channel; `From` is not
// transitive, so the hop through `CoreError::Validation` is spelled out.
impl From<ValidationError> for PosError {
    fn from(err: ValidationError) -> Self {
        PosError::Core(CoreError::Validation(err))
    }
}

impl PosError {
    /// Stable machine-readable code, for clients that map errors to UI
    /// messages without parsing display strings.
    pub fn code(&self) -> &'static str {
        match self {
            PosError::NotLoggedIn => "NOT_LOGGED_IN",
            PosError::InvalidCredentials => "INVALID_CREDENTIALS",
            PosError::Forbidden { .. } => "FORBIDDEN",

            PosError::Core(core) => match core {
                CoreError::NoActiveShift => "NO_ACTIVE_SHIFT",
                CoreError::ShiftAlreadyActive(_) => "SHIFT_ALREADY_ACTIVE",
                CoreError::ShiftStillActive(_) => "SHIFT_STILL_ACTIVE",
                CoreError::ShiftAlreadyClosed(_) => "SHIFT_ALREADY_CLOSED",
                CoreError::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
                CoreError::InvalidQuantity { .. } | CoreError::QuantityTooLarge { .. } => {
                    "INVALID_QUANTITY"
                }
                CoreError::CartTooLarge { .. } => "CART_FULL",
                CoreError::NotInCart(_) => "NOT_IN_CART",
                CoreError::CartEmpty => "CART_EMPTY",
                CoreError::CartNotEmpty => "CART_NOT_EMPTY",
                CoreError::ProductNotFound(_) => "PRODUCT_NOT_FOUND",
                CoreError::InvalidTransition { .. } => "INVALID_TRANSITION",
                CoreError::InvalidPaymentAmount { .. } => "INVALID_PAYMENT",
                CoreError::InsufficientPoints { .. } => "INSUFFICIENT_POINTS",
                CoreError::Validation(_) => "VALIDATION",
            },

            PosError::Store(store) => match store {
                StoreError::NotFound { .. } => "NOT_FOUND",
                _ => "STORE_ERROR",
            },
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
