//! # Shift Operations
//!
//! Opening and reconciling the cash drawer.
//!
//! ## Shift Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  start_shift(float)                                                     │
//! │       │  guard: logged in, no active shift for this user                │
//! │       ▼                                                                 │
//! │  Active ── sales / returns / payouts append themselves ──┐              │
//! │       │                                                  │              │
//! │       ▼                                                  │              │
//! │  end_shift(counted cash)                                 │              │
//! │       │  recompute Z-report STRICTLY from linked records ◄┘             │
//! │       ▼                                                                 │
//! │  Closed (report written once, immutable)                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The duplicate-shift check and the shift insert happen inside one session
//! lock hold, so two racing start_shift calls cannot both succeed.

use chrono::Utc;
use duka_core::{
    compute_shift_report, validation, CoreError, Money, Payout, Sale, Shift, ShiftStatus,
};
use duka_store::Collection;
use tracing::info;
use uuid::Uuid;

use crate::engine::Pos;
use crate::error::PosResult;

impl Pos {
    /// Opens a shift with the given starting float.
    pub async fn start_shift(&self, starting_float: Money) -> PosResult<Shift> {
        let mut session = self.session.lock().await;
        let user = session.require_user()?.clone();
        validation::validate_non_negative("starting_float", starting_float)?;

        // One active shift per user, checked against the store rather than
        // the session cache so a crashed session can't double-open.
        let shifts: Vec<Shift> = self.store.documents().get_all(Collection::Shifts).await?;
        if let Some(open) = shifts.iter().find(|s| s.user_id == user.id && s.is_active()) {
            return Err(CoreError::ShiftAlreadyActive(open.id.clone()).into());
        }

        let shift = Shift {
            id: Uuid::new_v4().to_string(),
            user_id: user.id,
            start_time: Utc::now(),
            end_time: None,
            status: ShiftStatus::Active,
            starting_float,
            sale_ids: vec![],
            payout_ids: vec![],
            report: None,
        };

        self.store
            .documents()
            .save(Collection::Shifts, &shift.id, &shift)
            .await?;
        session.active_shift_id = Some(shift.id.clone());

        info!(shift_id = %shift.id, float = %starting_float, "Shift started");
        Ok(shift)
    }

    /// Closes the active shift, reconciling against the counted drawer.
    ///
    /// The Z-report is recomputed from the shift's linked sale and payout
    /// documents; nothing is carried over from in-memory state.
    pub async fn end_shift(&self, actual_cash_in_drawer: Money) -> PosResult<Shift> {
        let mut session = self.session.lock().await;
        session.require_user()?;
        let shift_id = session.require_shift()?.to_string();
        validation::validate_non_negative("actual_cash_in_drawer", actual_cash_in_drawer)?;

        let mut shift: Shift = self
            .store
            .documents()
            .get_required(Collection::Shifts, &shift_id)
            .await?;
        if shift.status == ShiftStatus::Closed {
            return Err(CoreError::ShiftAlreadyClosed(shift.id).into());
        }

        let sales: Vec<Sale> = self.store.documents().get_all(Collection::Sales).await?;
        let payouts: Vec<Payout> = self.store.documents().get_all(Collection::Payouts).await?;

        let report = compute_shift_report(&shift, &sales, &payouts, actual_cash_in_drawer);
        info!(
            shift_id = %shift.id,
            expected = %report.expected_cash_in_drawer,
            variance = %report.cash_variance,
            "Shift closed"
        );

        shift.status = ShiftStatus::Closed;
        shift.end_time = Some(Utc::now());
        shift.report = Some(report);

        self.store
            .documents()
            .save(Collection::Shifts, &shift.id, &shift)
            .await?;

        session.active_shift_id = None;
        session.reset_cart();

        Ok(shift)
    }

    /// The active shift document, if one is open.
    pub async fn active_shift(&self) -> PosResult<Option<Shift>> {
        let session = self.session.lock().await;
        match &session.active_shift_id {
            Some(id) => Ok(self.store.documents().get(Collection::Shifts, id).await?),
            None => Ok(None),
        }
    }

    /// Appends a sale id to the active shift. Caller holds the session lock.
    pub(crate) async fn link_sale_to_shift(&self, shift_id: &str, sale_id: &str) -> PosResult<()> {
        let mut shift: Shift = self
            .store
            .documents()
            .get_required(Collection::Shifts, shift_id)
            .await?;
        shift.sale_ids.push(sale_id.to_string());
        self.store
            .documents()
            .save(Collection::Shifts, &shift.id, &shift)
            .await?;
        Ok(())
    }

    /// Appends a payout id to the active shift. Caller holds the session lock.
    pub(crate) async fn link_payout_to_shift(
        &self,
        shift_id: &str,
        payout_id: &str,
    ) -> PosResult<()> {
        let mut shift: Shift = self
            .store
            .documents()
            .get_required(Collection::Shifts, shift_id)
            .await?;
        shift.payout_ids.push(payout_id.to_string());
        self.store
            .documents()
            .save(Collection::Shifts, &shift.id, &shift)
            .await?;
        Ok(())
    }
}
