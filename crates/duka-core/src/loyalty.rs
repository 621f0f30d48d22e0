//! # Loyalty
//!
//! Loyalty point redemption rules.
//!
//! Points redeem as tender at a fixed value per point, capped at a
//! percentage of the cart total so a sale can never go fully free on
//! points alone. Accrual is deliberately zero: the original system never
//! defined an earn formula, and inventing one here would silently change
//! customer balances.

use crate::error::{CoreError, CoreResult};
use crate::money::Money;

/// Value of a number of points at the configured rate.
#[inline]
pub fn points_value(points: i64, redeem_rate_cents: i64) -> Money {
    Money::from_cents(points * redeem_rate_cents)
}

/// The maximum value redeemable against a given total (cap in basis points).
#[inline]
pub fn redemption_cap(total: Money, redeem_cap_bps: u32) -> Money {
    total.percentage_of(redeem_cap_bps)
}

/// Validates a redemption request and returns the tender value it produces.
///
/// Fails when the customer lacks the points; the value is clamped to the
/// cap rather than rejected, so "redeem everything" requests just redeem
/// up to the cap.
pub fn validate_redemption(
    points: i64,
    available_points: i64,
    total: Money,
    redeem_cap_bps: u32,
    redeem_rate_cents: i64,
) -> CoreResult<Money> {
    if points < 0 || points > available_points {
        return Err(CoreError::InsufficientPoints {
            available: available_points,
            requested: points,
        });
    }

    let value = points_value(points, redeem_rate_cents);
    let cap = redemption_cap(total, redeem_cap_bps);
    Ok(std::cmp::min(value, cap))
}

/// Points earned on a sale. Always zero (no accrual formula is defined).
#[inline]
pub fn points_earned(_total: Money) -> i64 {
    0
}

// =============================================================================
// Unit Tests
// =============================================================================
