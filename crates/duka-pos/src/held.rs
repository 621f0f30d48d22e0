//! # Held Receipts
//!
//! Parking and resuming carts (suspend/resume).
//!
//! A held receipt is a named snapshot of the cart items and selected
//! customer - not a financial record. Discounts, deposit offsets, and
//! point redemptions are intentionally NOT parked; they are re-applied
//! on the live cart after recall if still wanted.

use chrono::Utc;
use duka_core::{validation, CoreError, HeldReceipt, Money};
use duka_store::Collection;
use tracing::info;
use uuid::Uuid;

use crate::engine::Pos;
use crate::error::PosResult;

impl Pos {
    /// Parks the current cart under a label and clears it.
    pub async fn hold_receipt(&self, name: &str) -> PosResult<HeldReceipt> {
        let mut session = self.session.lock().await;
        session.require_user()?;
        validation::validate_name("name", name)?;

        if session.cart.is_empty() {
            return Err(CoreError::CartEmpty.into());
        }

        let held = HeldReceipt {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            items: session.cart.items.clone(),
            customer_id: session.cart.customer_id.clone(),
            held_at: Utc::now(),
        };

        self.store
            .documents()
            .save(Collection::HeldReceipts, &held.id, &held)
            .await?;
        session.reset_cart();

        info!(held_id = %held.id, name = %held.name, "Receipt held");
        Ok(held)
    }

    /// Recalls a held receipt into the (empty) cart and deletes it.
    ///
    /// Prices stay as frozen at hold time. Stock is NOT re-checked here -
    /// checkout re-validates against the current catalog, so a recall never
    /// fails just because something sold out while parked.
    pub async fn recall_receipt(&self, id: &str) -> PosResult<()> {
        let mut session = self.session.lock().await;
        session.require_user()?;

        if !session.cart.is_empty() {
            return Err(CoreError::CartNotEmpty.into());
        }

        let held: HeldReceipt = self
            .store
            .documents()
            .get_required(Collection::HeldReceipts, id)
            .await?;

        session.cart.items = held.items;
        session.cart.customer_id = held.customer_id;
        session.cart.discount = None;
        session.cart.deposit_applied = Money::zero();
        session.cart.points_redeemed_value = Money::zero();

        self.store
            .documents()
            .delete(Collection::HeldReceipts, id)
            .await?;

        info!(held_id = %id, "Receipt recalled");
        Ok(())
    }

    /// Discards a held receipt without recalling it.
    pub async fn delete_held_receipt(&self, id: &str) -> PosResult<()> {
        let session = self.session.lock().await;
        session.require_user()?;

        let existed = self
            .store
            .documents()
            .delete(Collection::HeldReceipts, id)
            .await?;
        if !existed {
            return Err(duka_store::StoreError::not_found("held_receipts", id).into());
        }

        info!(held_id = %id, "Held receipt deleted");
        Ok(())
    }

    /// Every parked receipt.
    pub async fn list_held_receipts(&self) -> PosResult<Vec<HeldReceipt>> {
        Ok(self
            .store
            .documents()
            .get_all(Collection::HeldReceipts)
            .await?)
    }
}
