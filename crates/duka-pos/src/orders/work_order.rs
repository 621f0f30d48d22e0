//! # Work Order Operations
//!
//! Service jobs from intake to pickup.
//!
//! ## Lifecycle
//! ```text
//! Pending ──► InProgress ⇄ AwaitingParts
//!                  │
//!                  ▼
//!           ReadyForPickup ──invoice through checkout──► Completed
//!                  │
//!                (cancel from any non-terminal state)
//! ```
//!
//! The deposit taken at intake offsets the balance invoiced at pickup;
//! the invoice rings up as a single service line so no stock moves.

use chrono::Utc;
use duka_core::{
    transitions, CartItem, CoreError, Money, ProductType, WorkOrder, WorkOrderStatus,
};
use duka_store::Collection;
use tracing::info;
use uuid::Uuid;

use crate::engine::Pos;
use crate::error::PosResult;

impl Pos {
    /// Opens a work order, optionally taking a deposit up front.
    pub async fn create_work_order(
        &self,
        customer_id: &str,
        description: &str,
        estimated_cost: Money,
        deposit: Money,
        assigned_to: Option<String>,
    ) -> PosResult<WorkOrder> {
        let session = self.session.lock().await;
        let user = session.require_user()?.clone();
        let shift_id = session.require_shift()?.to_string();

        duka_core::validation::validate_text(
            "description",
            description,
            duka_core::validation::MAX_TEXT_LENGTH,
        )?;
        duka_core::validation::validate_non_negative("estimated_cost", estimated_cost)?;
        duka_core::validation::validate_non_negative("deposit", deposit)?;

        self.store
            .documents()
            .get_required::<duka_core::Customer>(Collection::Customers, customer_id)
            .await?;

        let wo = WorkOrder {
            id: Uuid::new_v4().to_string(),
            customer_id: customer_id.to_string(),
            description: description.to_string(),
            status: WorkOrderStatus::Pending,
            estimated_cost,
            deposit_paid: deposit,
            assigned_to,
            cashier_id: user.id,
            shift_id,
            created_at: Utc::now(),
            completed_at: None,
        };

        self.store
            .documents()
            .save(Collection::WorkOrders, &wo.id, &wo)
            .await?;
        info!(work_order_id = %wo.id, cost = %self.config.format_currency(estimated_cost), "Work order created");
        Ok(wo)
    }

    /// Adds to the deposit held against a work order.
    pub async fn record_work_order_deposit(
        &self,
        work_order_id: &str,
        amount: Money,
    ) -> PosResult<WorkOrder> {
        let session = self.session.lock().await;
        session.require_user()?;

        if !amount.is_positive() {
            return Err(CoreError::InvalidPaymentAmount {
                tendered: amount.to_string(),
                due: Money::zero().to_string(),
            }
            .into());
        }

        let mut wo: WorkOrder = self
            .store
            .documents()
            .get_required(Collection::WorkOrders, work_order_id)
            .await?;
        if matches!(wo.status, WorkOrderStatus::Completed | WorkOrderStatus::Cancelled) {
            return Err(CoreError::InvalidTransition {
                entity: "work_order",
                from: "terminal".to_string(),
                to: "deposit".to_string(),
            }
            .into());
        }

        wo.deposit_paid += amount;
        self.store
            .documents()
            .save(Collection::WorkOrders, &wo.id, &wo)
            .await?;
        info!(work_order_id = %wo.id, deposit = %wo.deposit_paid, "Work order deposit recorded");
        Ok(wo)
    }

    /// Moves a work order through its state machine (bench work, parts
    /// holds, cancellation). A direct move to `Completed` is allowed only
    /// from `ReadyForPickup`; any balance still owed stays collectable
    /// through [`Pos::invoice_work_order`].
    pub async fn update_work_order_status(
        &self,
        work_order_id: &str,
        to: WorkOrderStatus,
    ) -> PosResult<WorkOrder> {
        let session = self.session.lock().await;
        session.require_user()?;

        let mut wo: WorkOrder = self
            .store
            .documents()
            .get_required(Collection::WorkOrders, work_order_id)
            .await?;
        wo.status = transitions::work_order::transition(wo.status, to)?;
        if wo.status == WorkOrderStatus::Completed {
            wo.completed_at = Some(Utc::now());
        }
        self.store
            .documents()
            .save(Collection::WorkOrders, &wo.id, &wo)
            .await?;
        info!(work_order_id = %wo.id, status = ?wo.status, "Work order status updated");
        Ok(wo)
    }

    /// Reassigns (or unassigns) the technician on a work order.
    pub async fn assign_work_order(
        &self,
        work_order_id: &str,
        assigned_to: Option<String>,
    ) -> PosResult<WorkOrder> {
        let session = self.session.lock().await;
        session.require_user()?;

        let mut wo: WorkOrder = self
            .store
            .documents()
            .get_required(Collection::WorkOrders, work_order_id)
            .await?;
        if matches!(wo.status, WorkOrderStatus::Completed | WorkOrderStatus::Cancelled) {
            return Err(CoreError::InvalidTransition {
                entity: "work_order",
                from: "terminal".to_string(),
                to: "assign".to_string(),
            }
            .into());
        }

        wo.assigned_to = assigned_to;
        self.store
            .documents()
            .save(Collection::WorkOrders, &wo.id, &wo)
            .await?;
        info!(work_order_id = %wo.id, assigned_to = ?wo.assigned_to, "Work order reassigned");
        Ok(wo)
    }

    /// Loads a work order into the empty cart as a single service line for
    /// the estimated cost, with the deposit applied. Allowed for jobs
    /// ready for pickup, and for jobs already marked completed that still
    /// owe money. Completing the sale settles the job.
    ///
    /// A ready job whose deposit already covers the estimate never visits
    /// the register: it is completed on the spot.
    pub async fn invoice_work_order(&self, work_order_id: &str) -> PosResult<()> {
        let mut session = self.session.lock().await;
        session.require_user()?;

        if !session.cart.is_empty() {
            return Err(CoreError::CartNotEmpty.into());
        }

        let mut wo: WorkOrder = self
            .store
            .documents()
            .get_required(Collection::WorkOrders, work_order_id)
            .await?;
        if !transitions::work_order::can_invoice(wo.status) {
            return Err(CoreError::InvalidTransition {
                entity: "work_order",
                from: format!("{:?}", wo.status).to_lowercase(),
                to: "completed".to_string(),
            }
            .into());
        }

        if !wo.balance().is_positive() {
            // A settled completed job has nothing left to collect.
            if wo.status == WorkOrderStatus::Completed {
                return Err(CoreError::InvalidTransition {
                    entity: "work_order",
                    from: "completed".to_string(),
                    to: "completed".to_string(),
                }
                .into());
            }
            wo.status =
                transitions::work_order::transition(wo.status, WorkOrderStatus::Completed)?;
            wo.completed_at = Some(Utc::now());
            self.store
                .documents()
                .save(Collection::WorkOrders, &wo.id, &wo)
                .await?;
            info!(work_order_id = %wo.id, "Work order fully covered by deposit - completed");
            return Ok(());
        }

        // Synthetic service line; no catalog product backs a repair job.
        session.cart.items = vec![CartItem {
            product_id: wo.id.clone(),
            sku: format!("WO-{}", &wo.id[..8]),
            name: format!("Work order: {}", wo.description),
            unit_price: wo.estimated_cost,
            quantity: 1,
            product_type: ProductType::Service,
        }];
        session.cart.customer_id = Some(wo.customer_id.clone());
        session.cart.deposit_applied = wo.deposit_paid;
        session.originating_work_order_id = Some(wo.id.clone());

        info!(work_order_id = %wo.id, deposit = %wo.deposit_paid, "Work order loaded for invoicing");
        Ok(())
    }

    pub async fn get_work_order(&self, id: &str) -> PosResult<WorkOrder> {
        Ok(self
            .store
            .documents()
            .get_required(Collection::WorkOrders, id)
            .await?)
    }

    pub async fn list_work_orders(&self) -> PosResult<Vec<WorkOrder>> {
        Ok(self
            .store
            .documents()
            .get_all(Collection::WorkOrders)
            .await?)
    }
}
