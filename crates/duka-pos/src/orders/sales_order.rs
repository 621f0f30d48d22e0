//! # Sales Order Operations
//!
//! Customer orders for goods, possibly not yet in stock.
//!
//! ## Lifecycle
//! ```text
//! Pending ──create_po──► Ordered ──receipts──► PartiallyReceived ──► Received
//!    │                      │                        │                  │
//!    └──────────────────────┴────────cancel──────────┘         invoice through
//!                                                              checkout ──► Completed
//! ```
//!
//! Prices are locked at order time; the final invoice uses the locked
//! prices, with everything already paid applied as a deposit offset.

use chrono::Utc;
use duka_core::{
    transitions, CartItem, CoreError, Payment, PurchaseLine, PurchaseOrder, PurchaseOrderStatus,
    SalesOrder, SalesOrderLine, SalesOrderLineStatus, SalesOrderStatus, Supplier,
};
use duka_store::Collection;
use tracing::info;
use uuid::Uuid;

use crate::engine::Pos;
use crate::error::PosResult;

impl Pos {
    /// Creates a sales order with prices locked from the current catalog.
    ///
    /// Stock is NOT checked - ordering goods that aren't in stock is the
    /// whole point of a sales order.
    pub async fn create_sales_order(
        &self,
        customer_id: &str,
        lines: &[(String, i64)],
    ) -> PosResult<SalesOrder> {
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

        let mut items = Vec::with_capacity(lines.len());
        let mut subtotal = duka_core::Money::zero();
        for (product_id, quantity) in lines {
            if *quantity <= 0 {
                return Err(CoreError::InvalidQuantity { requested: *quantity }.into());
            }
            let product = self.load_product(product_id).await?;
            subtotal += product.price.multiply_quantity(*quantity);
            items.push(SalesOrderLine {
                product_id: product.id,
                name: product.name,
                quantity: *quantity,
                unit_price: product.price,
                status: SalesOrderLineStatus::Pending,
            });
        }
        let tax = subtotal.calculate_tax(self.config.vat_rate);

        let so = SalesOrder {
            id: Uuid::new_v4().to_string(),
            customer_id: customer_id.to_string(),
            status: SalesOrderStatus::Pending,
            items,
            total: subtotal + tax,
            payments: vec![],
            cashier_id: user.id,
            shift_id,
            created_at: Utc::now(),
        };

        self.store
            .documents()
            .save(Collection::SalesOrders, &so.id, &so)
            .await?;
        info!(sales_order_id = %so.id, total = %self.config.format_currency(so.total), "Sales order created");
        Ok(so)
    }

    /// Records a deposit or installment against a sales order.
    pub async fn record_sales_order_payment(
        &self,
        sales_order_id: &str,
        payment: Payment,
    ) -> PosResult<SalesOrder> {
        let session = self.session.lock().await;
        session.require_user()?;

        if !payment.amount.is_positive() {
            return Err(CoreError::InvalidPaymentAmount {
                tendered: payment.amount.to_string(),
                due: duka_core::Money::zero().to_string(),
            }
            .into());
        }

        let mut so: SalesOrder = self
            .store
            .documents()
            .get_required(Collection::SalesOrders, sales_order_id)
            .await?;
        if matches!(so.status, SalesOrderStatus::Completed | SalesOrderStatus::Cancelled) {
            return Err(CoreError::InvalidTransition {
                entity: "sales_order",
                from: "terminal".to_string(),
                to: "payment".to_string(),
            }
            .into());
        }

        so.payments.push(payment);
        self.store
            .documents()
            .save(Collection::SalesOrders, &so.id, &so)
            .await?;
        info!(sales_order_id = %so.id, balance = %so.balance(), "Sales order payment recorded");
        Ok(so)
    }

    /// Raises a purchase order on the given supplier for every line of a
    /// pending sales order, at the products' current cost. The sales order
    /// moves to `Ordered` and its lines to `Ordered`.
    pub async fn create_po_from_sales_order(
        &self,
        sales_order_id: &str,
        supplier_id: &str,
    ) -> PosResult<PurchaseOrder> {
        let session = self.session.lock().await;
        session.require_user()?;

        self.store
            .documents()
            .get_required::<Supplier>(Collection::Suppliers, supplier_id)
            .await?;

        let mut so: SalesOrder = self
            .store
            .documents()
            .get_required(Collection::SalesOrders, sales_order_id)
            .await?;
        if !transitions::sales_order::can_order(so.status) {
            return Err(CoreError::InvalidTransition {
                entity: "sales_order",
                from: format!("{:?}", so.status).to_lowercase(),
                to: "ordered".to_string(),
            }
            .into());
        }

        let mut po_lines = Vec::with_capacity(so.items.len());
        for line in &so.items {
            let product = self.load_product(&line.product_id).await?;
            po_lines.push(PurchaseLine {
                product_id: product.id,
                name: product.name,
                quantity: line.quantity,
                quantity_received: 0,
                unit_cost: product.cost,
                ean: None,
                category: None,
            });
        }

        let po = PurchaseOrder {
            id: Uuid::new_v4().to_string(),
            supplier_id: supplier_id.to_string(),
            // Generated POs skip Draft: raising one for a customer order
            // is the decision to send it.
            status: PurchaseOrderStatus::Sent,
            lines: po_lines,
            sales_order_id: Some(so.id.clone()),
            created_at: Utc::now(),
        };
        self.store
            .documents()
            .save(Collection::PurchaseOrders, &po.id, &po)
            .await?;

        so.status = transitions::sales_order::transition(so.status, SalesOrderStatus::Ordered)?;
        for line in &mut so.items {
            line.status = SalesOrderLineStatus::Ordered;
        }
        self.store
            .documents()
            .save(Collection::SalesOrders, &so.id, &so)
            .await?;

        info!(
            sales_order_id = %so.id,
            purchase_order_id = %po.id,
            supplier_id = %supplier_id,
            "Purchase order raised from sales order"
        );
        Ok(po)
    }

    /// Loads a fully-received sales order into the empty cart for final
    /// invoicing: locked prices, everything paid so far applied as a
    /// deposit. Completing the sale completes the order.
    pub async fn invoice_sales_order(&self, sales_order_id: &str) -> PosResult<()> {
        let mut session = self.session.lock().await;
        session.require_user()?;

        if !session.cart.is_empty() {
            return Err(CoreError::CartNotEmpty.into());
        }

        let so: SalesOrder = self
            .store
            .documents()
            .get_required(Collection::SalesOrders, sales_order_id)
            .await?;
        if !transitions::sales_order::can_invoice(so.status) {
            return Err(CoreError::InvalidTransition {
                entity: "sales_order",
                from: format!("{:?}", so.status).to_lowercase(),
                to: "completed".to_string(),
            }
            .into());
        }

        let mut items = Vec::with_capacity(so.items.len());
        for line in &so.items {
            let product = self.load_product(&line.product_id).await?;
            items.push(CartItem {
                product_id: line.product_id.clone(),
                sku: product.sku,
                name: line.name.clone(),
                // Locked-in order price, not today's catalog price.
                unit_price: line.unit_price,
                quantity: line.quantity,
                product_type: product.product_type,
            });
        }

        session.cart.items = items;
        session.cart.customer_id = Some(so.customer_id.clone());
        session.cart.deposit_applied = so.paid();
        session.originating_sales_order_id = Some(so.id.clone());

        info!(sales_order_id = %so.id, deposit = %so.paid(), "Sales order loaded for invoicing");
        Ok(())
    }

    /// Cancels a sales order (any non-terminal state).
    pub async fn cancel_sales_order(&self, sales_order_id: &str) -> PosResult<SalesOrder> {
        let session = self.session.lock().await;
        session.require_user()?;

        let mut so: SalesOrder = self
            .store
            .documents()
            .get_required(Collection::SalesOrders, sales_order_id)
            .await?;
        so.status = transitions::sales_order::transition(so.status, SalesOrderStatus::Cancelled)?;
        self.store
            .documents()
            .save(Collection::SalesOrders, &so.id, &so)
            .await?;
        info!(sales_order_id = %so.id, "Sales order cancelled");
        Ok(so)
    }

    pub async fn get_sales_order(&self, id: &str) -> PosResult<SalesOrder> {
        Ok(self
            .store
            .documents()
            .get_required(Collection::SalesOrders, id)
            .await?)
    }

    pub async fn list_sales_orders(&self) -> PosResult<Vec<SalesOrder>> {
        Ok(self
            .store
            .documents()
            .get_all(Collection::SalesOrders)
            .await?)
    }
}
