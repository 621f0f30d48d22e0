//! # Layaway Operations
//!
//! Goods reserved up front and paid off in installments.
//!
//! ## Lifecycle
//! ```text
//! create ──► Active ──installments──► balance ≤ 0 ──► Completed (auto)
//!               │
//!               ├── cancel  ──► Cancelled  (stock restored)
//!               └── default ──► Defaulted  (stock restored)
//! ```
//!
//! Stock for inventory lines is deducted at creation - the goods are on
//! the layaway shelf, not the sales floor. Completion releases them to
//! the customer without further stock movement.

use chrono::Utc;
use duka_core::{
    transitions, Cart, CoreError, Layaway, LayawayStatus, Payment,
};
use duka_store::Collection;
use tracing::info;
use uuid::Uuid;

use crate::engine::Pos;
use crate::error::PosResult;

impl Pos {
    /// Creates a layaway, reserving stock immediately.
    pub async fn create_layaway(
        &self,
        customer_id: &str,
        lines: &[(String, i64)],
    ) -> PosResult<Layaway> {
        let session = self.session.lock().await;
        let user = session.require_user()?.clone();
        let shift_id = session.require_shift()?.to_string();

        self.store
            .documents()
            .get_required::<duka_core::Customer>(Collection::Customers, customer_id)
            .await?;
        if lines.is_empty() {
            return Err(CoreError::CartEmpty.into());
        }

        // A scratch cart gives us the stock checks and the totals pipeline
        // for free; it never touches the live session cart.
        let mut scratch = Cart::new();
        for (product_id, quantity) in lines {
            let product = self.load_product(product_id).await?;
            scratch.add_item(&product, *quantity)?;
        }
        let totals = scratch.totals(self.config.vat_rate);

        let layaway = Layaway {
            id: Uuid::new_v4().to_string(),
            customer_id: customer_id.to_string(),
            items: scratch.items.iter().map(|i| i.to_sale_line()).collect(),
            total: totals.total,
            payments: vec![],
            balance: totals.total,
            status: LayawayStatus::Active,
            cashier_id: user.id,
            shift_id,
            created_at: Utc::now(),
        };

        self.store
            .documents()
            .save(Collection::Layaways, &layaway.id, &layaway)
            .await?;

        // Reserve the goods now.
        for item in &layaway.items {
            self.adjust_stock(&item.product_id, -item.quantity).await?;
        }

        info!(
            layaway_id = %layaway.id,
            total = %self.config.format_currency(layaway.total),
            "Layaway created"
        );
        Ok(layaway)
    }

    /// Records an installment. When the balance reaches zero the layaway
    /// completes automatically and the goods are released.
    pub async fn record_layaway_payment(
        &self,
        layaway_id: &str,
        payment: Payment,
    ) -> PosResult<Layaway> {
        let session = self.session.lock().await;
        session.require_user()?;

        if !payment.amount.is_positive() {
            return Err(CoreError::InvalidPaymentAmount {
                tendered: payment.amount.to_string(),
                due: duka_core::Money::zero().to_string(),
            }
            .into());
        }

        let mut layaway: Layaway = self
            .store
            .documents()
            .get_required(Collection::Layaways, layaway_id)
            .await?;
        if !transitions::layaway::can_accept_payment(layaway.status) {
            return Err(CoreError::InvalidTransition {
                entity: "layaway",
                from: format!("{:?}", layaway.status).to_lowercase(),
                to: "payment".to_string(),
            }
            .into());
        }

        layaway.payments.push(payment);
        layaway.balance = layaway.recompute_balance();

        if !layaway.balance.is_positive() {
            layaway.status =
                transitions::layaway::transition(layaway.status, LayawayStatus::Completed)?;
            info!(layaway_id = %layaway.id, "Layaway paid off - goods released");
        }

        self.store
            .documents()
            .save(Collection::Layaways, &layaway.id, &layaway)
            .await?;
        info!(layaway_id = %layaway.id, balance = %layaway.balance, "Layaway payment recorded");
        Ok(layaway)
    }

    /// Cancels a layaway and restores the reserved stock.
    pub async fn cancel_layaway(&self, layaway_id: &str) -> PosResult<Layaway> {
        self.exit_layaway(layaway_id, LayawayStatus::Cancelled).await
    }

    /// Marks a layaway defaulted (customer stopped paying) and restores
    /// the reserved stock. Money already paid stays in the payment list
    /// for the shop's refund-or-forfeit policy to act on.
    pub async fn default_layaway(&self, layaway_id: &str) -> PosResult<Layaway> {
        self.exit_layaway(layaway_id, LayawayStatus::Defaulted).await
    }

    async fn exit_layaway(&self, layaway_id: &str, to: LayawayStatus) -> PosResult<Layaway> {
        let session = self.session.lock().await;
        session.require_user()?;

        let mut layaway: Layaway = self
            .store
            .documents()
            .get_required(Collection::Layaways, layaway_id)
            .await?;
        layaway.status = transitions::layaway::transition(layaway.status, to)?;

        if transitions::layaway::restocks_on_exit(to) {
            for item in &layaway.items {
                self.adjust_stock(&item.product_id, item.quantity).await?;
            }
        }

        self.store
            .documents()
            .save(Collection::Layaways, &layaway.id, &layaway)
            .await?;
        info!(layaway_id = %layaway.id, status = ?layaway.status, "Layaway closed out");
        Ok(layaway)
    }

    pub async fn get_layaway(&self, id: &str) -> PosResult<Layaway> {
        Ok(self
            .store
            .documents()
            .get_required(Collection::Layaways, id)
            .await?)
    }

    pub async fn list_layaways(&self) -> PosResult<Vec<Layaway>> {
        Ok(self.store.documents().get_all(Collection::Layaways).await?)
    }
}
