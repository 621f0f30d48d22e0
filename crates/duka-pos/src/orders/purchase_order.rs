//! # Purchase Order Operations
//!
//! Ordering from suppliers and booking goods in.
//!
//! ## Receiving
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  receive_purchase_order(id, receipts)                                   │
//! │                                                                         │
//! │  per line: qty applied = min(qty delivered, qty outstanding)            │
//! │            (over-deliveries are clamped, never negative stock math)     │
//! │            stock += qty, cost/barcode/category stamped onto product     │
//! │                                                                         │
//! │  status   = derived from lines (Sent / PartiallyReceived / Received)    │
//! │  invoice  = ONE SupplierInvoice per receiving event, sized to the       │
//! │             value received in THAT event                                │
//! │  rollup   = linked sales order lines and status advance                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use duka_core::{
    transitions, CoreError, Money, PurchaseLine, PurchaseOrder, PurchaseOrderStatus,
    SalesOrder, SalesOrderLineStatus, SalesOrderStatus, Supplier, SupplierInvoice,
};
use duka_store::Collection;
use tracing::info;
use uuid::Uuid;

use crate::engine::Pos;
use crate::error::PosResult;

/// A line on a new purchase order.
#[derive(Debug, Clone)]
pub struct PurchaseLineInput {
    pub product_id: String,
    pub quantity: i64,
    pub unit_cost: Money,
    /// Barcode to stamp onto the product when the goods arrive labelled.
    pub ean: Option<String>,
    /// Category to stamp onto the product on receipt.
    pub category: Option<String>,
}

impl Pos {
    /// Creates a draft purchase order.
    pub async fn create_purchase_order(
        &self,
        supplier_id: &str,
        lines: &[PurchaseLineInput],
    ) -> PosResult<PurchaseOrder> {
        let session = self.session.lock().await;
        session.require_user()?;

        self.store
            .documents()
            .get_required::<Supplier>(Collection::Suppliers, supplier_id)
            .await?;
        if lines.is_empty() {
            return Err(CoreError::CartEmpty.into());
        }

        let mut po_lines = Vec::with_capacity(lines.len());
        for input in lines {
            if input.quantity <= 0 {
                return Err(CoreError::InvalidQuantity { requested: input.quantity }.into());
            }
            duka_core::validation::validate_non_negative("unit_cost", input.unit_cost)?;
            let product = self.load_product(&input.product_id).await?;
            po_lines.push(PurchaseLine {
                product_id: product.id,
                name: product.name,
                quantity: input.quantity,
                quantity_received: 0,
                unit_cost: input.unit_cost,
                ean: input.ean.clone(),
                category: input.category.clone(),
            });
        }

        let po = PurchaseOrder {
            id: Uuid::new_v4().to_string(),
            supplier_id: supplier_id.to_string(),
            status: PurchaseOrderStatus::Draft,
            lines: po_lines,
            sales_order_id: None,
            created_at: Utc::now(),
        };
        self.store
            .documents()
            .save(Collection::PurchaseOrders, &po.id, &po)
            .await?;
        info!(purchase_order_id = %po.id, value = %self.config.format_currency(po.total_cost()), "Purchase order drafted");
        Ok(po)
    }

    /// Sends a draft purchase order to the supplier.
    pub async fn send_purchase_order(&self, purchase_order_id: &str) -> PosResult<PurchaseOrder> {
        let session = self.session.lock().await;
        session.require_user()?;

        let mut po: PurchaseOrder = self
            .store
            .documents()
            .get_required(Collection::PurchaseOrders, purchase_order_id)
            .await?;
        po.status =
            transitions::purchase_order::transition(po.status, PurchaseOrderStatus::Sent)?;
        self.store
            .documents()
            .save(Collection::PurchaseOrders, &po.id, &po)
            .await?;
        info!(purchase_order_id = %po.id, "Purchase order sent");
        Ok(po)
    }

    /// Cancels a purchase order (any non-terminal state).
    pub async fn cancel_purchase_order(&self, purchase_order_id: &str) -> PosResult<PurchaseOrder> {
        let session = self.session.lock().await;
        session.require_user()?;

        let mut po: PurchaseOrder = self
            .store
            .documents()
            .get_required(Collection::PurchaseOrders, purchase_order_id)
            .await?;
        po.status =
            transitions::purchase_order::transition(po.status, PurchaseOrderStatus::Cancelled)?;
        self.store
            .documents()
            .save(Collection::PurchaseOrders, &po.id, &po)
            .await?;
        info!(purchase_order_id = %po.id, "Purchase order cancelled");
        Ok(po)
    }

    /// Books in a delivery against a purchase order.
    ///
    /// `receipts` pairs product ids with the quantity delivered; quantities
    /// are clamped to what is still outstanding per line. Stock, cost,
    /// barcode, and category are stamped onto the products; exactly one
    /// supplier invoice is cut for the value received in this event (none
    /// if the delivery was entirely surplus). Any linked sales order rolls
    /// forward.
    pub async fn receive_purchase_order(
        &self,
        purchase_order_id: &str,
        receipts: &[(String, i64)],
    ) -> PosResult<(PurchaseOrder, Option<SupplierInvoice>)> {
        let session = self.session.lock().await;
        session.require_user()?;

        let mut po: PurchaseOrder = self
            .store
            .documents()
            .get_required(Collection::PurchaseOrders, purchase_order_id)
            .await?;
        if !transitions::purchase_order::can_receive(po.status) {
            return Err(CoreError::InvalidTransition {
                entity: "purchase_order",
                from: format!("{:?}", po.status).to_lowercase(),
                to: "received".to_string(),
            }
            .into());
        }

        let mut received_value = Money::zero();

        for (product_id, delivered) in receipts {
            if *delivered <= 0 {
                return Err(CoreError::InvalidQuantity { requested: *delivered }.into());
            }
            let line = po
                .lines
                .iter_mut()
                .find(|l| &l.product_id == product_id)
                .ok_or_else(|| CoreError::ProductNotFound(product_id.clone()))?;

            // Over-deliveries are clamped to the outstanding quantity.
            let applied = (*delivered).min(line.outstanding());
            if applied == 0 {
                continue;
            }
            line.quantity_received += applied;
            received_value += line.unit_cost.multiply_quantity(applied);

            // Stamp the product with what we now know from the supplier.
            let mut product = self.load_product(product_id).await?;
            if product.tracks_stock() {
                product.stock += applied;
            }
            product.cost = line.unit_cost;
            if let Some(ean) = &line.ean {
                product.barcode = Some(ean.clone());
            }
            if let Some(category) = &line.category {
                product.category = category.clone();
            }
            product.updated_at = Utc::now();
            self.store
                .documents()
                .save(Collection::Products, &product.id, &product)
                .await?;
        }

        let derived = transitions::purchase_order::derive_status(&po.lines);
        po.status = transitions::purchase_order::transition(po.status, derived)?;
        self.store
            .documents()
            .save(Collection::PurchaseOrders, &po.id, &po)
            .await?;

        let invoice = if received_value.is_positive() {
            let invoice = SupplierInvoice {
                id: Uuid::new_v4().to_string(),
                purchase_order_id: po.id.clone(),
                supplier_id: po.supplier_id.clone(),
                amount: received_value,
                created_at: Utc::now(),
            };
            self.store
                .documents()
                .save(Collection::SupplierInvoices, &invoice.id, &invoice)
                .await?;
            Some(invoice)
        } else {
            None
        };

        if let Some(so_id) = po.sales_order_id.clone() {
            self.roll_forward_sales_order(&so_id, &po).await?;
        }

        info!(
            purchase_order_id = %po.id,
            status = ?po.status,
            invoiced = %self.config.format_currency(received_value),
            "Delivery received"
        );
        Ok((po, invoice))
    }

    pub async fn get_purchase_order(&self, id: &str) -> PosResult<PurchaseOrder> {
        Ok(self
            .store
            .documents()
            .get_required(Collection::PurchaseOrders, id)
            .await?)
    }

    pub async fn list_purchase_orders(&self) -> PosResult<Vec<PurchaseOrder>> {
        Ok(self
            .store
            .documents()
            .get_all(Collection::PurchaseOrders)
            .await?)
    }

    pub async fn list_supplier_invoices(&self) -> PosResult<Vec<SupplierInvoice>> {
        Ok(self
            .store
            .documents()
            .get_all(Collection::SupplierInvoices)
            .await?)
    }

    /// Advances a sales order as its purchase order's goods arrive.
    async fn roll_forward_sales_order(
        &self,
        sales_order_id: &str,
        po: &PurchaseOrder,
    ) -> PosResult<()> {
        let mut so: SalesOrder = self
            .store
            .documents()
            .get_required(Collection::SalesOrders, sales_order_id)
            .await?;
        if matches!(so.status, SalesOrderStatus::Completed | SalesOrderStatus::Cancelled) {
            return Ok(());
        }

        for so_line in &mut so.items {
            let fully_received = po
                .lines
                .iter()
                .any(|l| l.product_id == so_line.product_id && l.fully_received());
            if fully_received {
                so_line.status = SalesOrderLineStatus::Received;
            }
        }

        let target = if so.items.iter().all(|l| l.status == SalesOrderLineStatus::Received) {
            SalesOrderStatus::Received
        } else if so.items.iter().any(|l| l.status == SalesOrderLineStatus::Received) {
            SalesOrderStatus::PartiallyReceived
        } else {
            return Ok(());
        };

        if so.status != target || target == SalesOrderStatus::PartiallyReceived {
            so.status = transitions::sales_order::transition(so.status, target)?;
        }
        self.store
            .documents()
            .save(Collection::SalesOrders, &so.id, &so)
            .await?;
        info!(sales_order_id = %so.id, status = ?so.status, "Sales order rolled forward");
        Ok(())
    }
}
