//! # Payout Operations
//!
//! Cash removed from the drawer mid-shift (supplier COD, delivery fuel,
//! till float correction). A payout is an immutable record linked to the
//! shift; it reduces expected cash at reconciliation but touches neither
//! products nor sales.

use chrono::Utc;
use duka_core::{validation, CoreError, Money, Payout};
use duka_store::Collection;
use tracing::info;
use uuid::Uuid;

use crate::engine::Pos;
use crate::error::PosResult;

impl Pos {
    /// Records a cash payout from the drawer.
    pub async fn process_payout(
        &self,
        amount: Money,
        reason: &str,
        payee: Option<String>,
    ) -> PosResult<Payout> {
        let session = self.session.lock().await;
        let user = session.require_user()?.clone();
        let shift_id = session.require_shift()?.to_string();

        validation::validate_text("reason", reason, validation::MAX_TEXT_LENGTH)?;
        if !amount.is_positive() {
            return Err(CoreError::InvalidPaymentAmount {
                tendered: amount.to_string(),
                due: Money::zero().to_string(),
            }
            .into());
        }

        let payout = Payout {
            id: Uuid::new_v4().to_string(),
            shift_id: shift_id.clone(),
            cashier_id: user.id,
            amount,
            reason: reason.to_string(),
            payee,
            created_at: Utc::now(),
        };

        self.store
            .documents()
            .save(Collection::Payouts, &payout.id, &payout)
            .await?;
        self.link_payout_to_shift(&shift_id, &payout.id).await?;

        info!(
            payout_id = %payout.id,
            amount = %self.config.format_currency(amount),
            reason = %payout.reason,
            "Payout recorded"
        );
        Ok(payout)
    }

    /// Every payout on record.
    pub async fn list_payouts(&self) -> PosResult<Vec<Payout>> {
        Ok(self.store.documents().get_all(Collection::Payouts).await?)
    }
}
