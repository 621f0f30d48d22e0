//! # Checkout Operations
//!
//! The live cart, sale completion, and returns.
//!
//! ## Sale Completion
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  complete_sale(payments)              [entire block inside one lock]    │
//! │                                                                         │
//! │  1. guards: logged in, active shift, cart non-empty                     │
//! │  2. re-validate stock against current catalog                           │
//! │  3. totals = cart pipeline (discount → VAT → deposit/points offsets)    │
//! │  4. validate tender: Σpayments ≥ amount_due, change payable in cash     │
//! │  5. persist Sale, decrement stock, append id to shift                   │
//! │  6. settle loyalty, complete any originating sales/work order           │
//! │  7. reset cart                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Returns are separate compensating `Sale` records with negative lines;
//! the original sale is never edited, and cumulative returns per line can
//! never exceed what was sold.

use chrono::Utc;
use duka_core::{
    loyalty, transitions, validation, CartTotals, CoreError, Customer, Discount, Money,
    Payment, PaymentMethod, Sale, SaleLine, SaleType, WorkOrderStatus,
};
use duka_store::Collection;
use tracing::info;
use uuid::Uuid;

use crate::engine::Pos;
use crate::error::PosResult;

impl Pos {
    // =========================================================================
    // Cart Operations
    // =========================================================================

    /// Adds a product to the cart, returning the updated totals.
    pub async fn add_to_cart(&self, product_id: &str, quantity: i64) -> PosResult<CartTotals> {
        let mut session = self.session.lock().await;
        session.require_user()?;

        let product = self.load_product(product_id).await?;
        session.cart.add_item(&product, quantity)?;
        Ok(session.cart.totals(self.config.vat_rate))
    }

    /// Updates a cart line's quantity (zero removes it).
    pub async fn update_cart_quantity(
        &self,
        product_id: &str,
        quantity: i64,
    ) -> PosResult<CartTotals> {
        let mut session = self.session.lock().await;
        session.require_user()?;

        if quantity > 0 {
            let product = self.load_product(product_id).await?;
            if !product.can_sell(quantity) {
                return Err(CoreError::InsufficientStock {
                    sku: product.sku,
                    available: product.stock,
                    requested: quantity,
                }
                .into());
            }
        }
        session.cart.update_quantity(product_id, quantity)?;
        Ok(session.cart.totals(self.config.vat_rate))
    }

    /// Removes a line from the cart.
    pub async fn remove_from_cart(&self, product_id: &str) -> PosResult<CartTotals> {
        let mut session = self.session.lock().await;
        session.require_user()?;
        session.cart.remove_item(product_id)?;
        Ok(session.cart.totals(self.config.vat_rate))
    }

    /// Clears the cart and any originating-document links.
    pub async fn clear_cart(&self) -> PosResult<()> {
        let mut session = self.session.lock().await;
        session.require_user()?;
        session.reset_cart();
        Ok(())
    }

    /// Sets or clears the whole-cart discount.
    pub async fn set_discount(&self, discount: Option<Discount>) -> PosResult<CartTotals> {
        let mut session = self.session.lock().await;
        session.require_user()?;
        session.cart.discount = discount;
        Ok(session.cart.totals(self.config.vat_rate))
    }

    /// Attaches a customer to the transaction (or detaches with `None`).
    /// Switching customers drops any pending point redemption.
    pub async fn select_customer(&self, customer_id: Option<&str>) -> PosResult<()> {
        let mut session = self.session.lock().await;
        session.require_user()?;

        if let Some(id) = customer_id {
            self.store
                .documents()
                .get_required::<Customer>(Collection::Customers, id)
                .await?;
        }
        session.cart.customer_id = customer_id.map(str::to_string);
        session.cart.points_redeemed_value = Money::zero();
        Ok(())
    }

    /// Redeems loyalty points as tender against the current cart.
    ///
    /// The redeemed value is clamped to the configured cap and rounded down
    /// to a whole number of points; returns the points actually consumed
    /// and the updated totals.
    pub async fn redeem_points(&self, points: i64) -> PosResult<(i64, CartTotals)> {
        let mut session = self.session.lock().await;
        session.require_user()?;

        let customer_id = session
            .cart
            .customer_id
            .clone()
            .ok_or(CoreError::InsufficientPoints { available: 0, requested: points })?;
        let customer: Customer = self
            .store
            .documents()
            .get_required(Collection::Customers, &customer_id)
            .await?;

        // Cap against the total before any redemption.
        session.cart.points_redeemed_value = Money::zero();
        let totals = session.cart.totals(self.config.vat_rate);

        let value = loyalty::validate_redemption(
            points,
            customer.loyalty_points,
            totals.total,
            self.config.loyalty_redeem_cap_bps,
            self.config.loyalty_redeem_rate_cents,
        )?;

        // Round down to a whole number of points so the customer's balance
        // is debited exactly what the tender is worth. A non-positive rate
        // values every point at nothing, so nothing is redeemed.
        let rate = self.config.loyalty_redeem_rate_cents;
        let points_used = if rate > 0 { value.cents() / rate } else { 0 };
        let value = loyalty::points_value(points_used, rate);

        session.cart.points_redeemed_value = value;
        Ok((points_used, session.cart.totals(self.config.vat_rate)))
    }

    /// The current cart totals.
    pub async fn cart_totals(&self) -> PosResult<CartTotals> {
        let session = self.session.lock().await;
        Ok(session.cart.totals(self.config.vat_rate))
    }

    // =========================================================================
    // Complete Sale
    // =========================================================================

    /// Completes the sale: validates tender, persists the immutable sale
    /// record, moves stock, settles loyalty, and completes any originating
    /// sales or work order.
    pub async fn complete_sale(&self, payments: Vec<Payment>) -> PosResult<Sale> {
        let mut session = self.session.lock().await;
        let user = session.require_user()?.clone();
        let shift_id = session.require_shift()?.to_string();

        if session.cart.is_empty() {
            return Err(CoreError::CartEmpty.into());
        }

        // Stock may have moved since items were added (or since a held
        // receipt was parked) - re-validate against the current catalog.
        for item in &session.cart.items {
            let product = self.load_product(&item.product_id).await?;
            if !product.can_sell(item.quantity) {
                return Err(CoreError::InsufficientStock {
                    sku: product.sku,
                    available: product.stock,
                    requested: item.quantity,
                }
                .into());
            }
        }

        let totals = session.cart.totals(self.config.vat_rate);
        let change = validate_tender(&payments, totals.amount_due)?;

        let sale = Sale {
            id: Uuid::new_v4().to_string(),
            sale_type: SaleType::Sale,
            original_sale_id: None,
            return_reason: None,
            items: session.cart.items.iter().map(|i| i.to_sale_line()).collect(),
            subtotal: totals.subtotal,
            discount: totals.discount,
            tax: totals.tax,
            total: totals.total,
            payments,
            change,
            deposit_applied: session.cart.deposit_applied,
            points_earned: loyalty::points_earned(totals.total),
            points_redeemed_value: session.cart.points_redeemed_value,
            customer_id: session.cart.customer_id.clone(),
            cashier_id: user.id,
            shift_id: shift_id.clone(),
            created_at: Utc::now(),
        };

        self.store
            .documents()
            .save(Collection::Sales, &sale.id, &sale)
            .await?;

        for item in &sale.items {
            self.adjust_stock(&item.product_id, -item.quantity).await?;
        }

        self.link_sale_to_shift(&shift_id, &sale.id).await?;
        self.settle_loyalty(&sale).await?;

        if let Some(so_id) = session.originating_sales_order_id.clone() {
            self.complete_originating_sales_order(&so_id).await?;
        }
        if let Some(wo_id) = session.originating_work_order_id.clone() {
            self.complete_originating_work_order(&wo_id).await?;
        }

        info!(
            sale_id = %sale.id,
            total = %self.config.format_currency(sale.total),
            change = %sale.change,
            "Sale completed"
        );

        session.reset_cart();
        Ok(sale)
    }

    // =========================================================================
    // Returns
    // =========================================================================

    /// Processes a return against an original sale.
    ///
    /// `lines` pairs product ids with the quantity coming back. A separate
    /// compensating sale record is written with negative lines and a single
    /// negative refund payment in `refund_method`. The discount and VAT
    /// shares of the refund are the returned lines' proportional share of
    /// the original sale's.
    pub async fn process_return(
        &self,
        original_sale_id: &str,
        lines: &[(String, i64)],
        reason: &str,
        refund_method: PaymentMethod,
    ) -> PosResult<Sale> {
        let mut session = self.session.lock().await;
        let user = session.require_user()?.clone();
        let shift_id = session.require_shift()?.to_string();

        validation::validate_text("reason", reason, validation::MAX_TEXT_LENGTH)?;

        let original: Sale = self
            .store
            .documents()
            .get_required(Collection::Sales, original_sale_id)
            .await?;
        if original.sale_type != SaleType::Sale {
            // A return cannot itself be returned.
            return Err(CoreError::InvalidTransition {
                entity: "sale",
                from: "return".to_string(),
                to: "return".to_string(),
            }
            .into());
        }

        // Cap cumulative returns per line across all prior returns.
        let all_sales: Vec<Sale> = self.store.documents().get_all(Collection::Sales).await?;
        let prior_returned = |product_id: &str| -> i64 {
            all_sales
                .iter()
                .filter(|s| s.original_sale_id.as_deref() == Some(original_sale_id))
                .flat_map(|s| &s.items)
                .filter(|l| l.product_id == product_id)
                .map(|l| -l.quantity)
                .sum()
        };

        let mut return_lines: Vec<SaleLine> = Vec::with_capacity(lines.len());
        let mut returned_subtotal = Money::zero();

        for (product_id, quantity) in lines {
            if *quantity <= 0 {
                return Err(CoreError::InvalidQuantity { requested: *quantity }.into());
            }
            let sold = original
                .items
                .iter()
                .find(|l| &l.product_id == product_id)
                .ok_or_else(|| CoreError::NotInCart(product_id.clone()))?;

            let already_back = prior_returned(product_id);
            if already_back + quantity > sold.quantity {
                return Err(CoreError::InvalidQuantity {
                    requested: already_back + quantity,
                }
                .into());
            }

            let line_total = sold.unit_price.multiply_quantity(-quantity);
            returned_subtotal += sold.unit_price.multiply_quantity(*quantity);
            return_lines.push(SaleLine {
                product_id: sold.product_id.clone(),
                sku: sold.sku.clone(),
                name: sold.name.clone(),
                unit_price: sold.unit_price,
                quantity: -quantity,
                line_total,
                product_type: sold.product_type,
            });
        }

        // Proportional discount share, then VAT recomputed on the
        // discounted portion - mirrors the forward totals pipeline.
        let discount_share = if original.subtotal.is_positive() {
            let share = (original.discount.cents() as i128 * returned_subtotal.cents() as i128)
                / original.subtotal.cents() as i128;
            Money::from_cents(share as i64)
        } else {
            Money::zero()
        };
        let taxable = returned_subtotal - discount_share;
        let tax = taxable.calculate_tax(self.config.vat_rate);
        let refund_total = taxable + tax;

        let return_sale = Sale {
            id: Uuid::new_v4().to_string(),
            sale_type: SaleType::Return,
            original_sale_id: Some(original_sale_id.to_string()),
            return_reason: Some(reason.to_string()),
            items: return_lines,
            subtotal: -returned_subtotal,
            discount: -discount_share,
            tax: -tax,
            total: -refund_total,
            payments: vec![Payment {
                method: refund_method,
                amount: -refund_total,
            }],
            change: Money::zero(),
            deposit_applied: Money::zero(),
            points_earned: 0,
            points_redeemed_value: Money::zero(),
            customer_id: original.customer_id.clone(),
            cashier_id: user.id,
            shift_id: shift_id.clone(),
            created_at: Utc::now(),
        };

        self.store
            .documents()
            .save(Collection::Sales, &return_sale.id, &return_sale)
            .await?;

        // Inventory lines come back on the shelf.
        for item in &return_sale.items {
            self.adjust_stock(&item.product_id, -item.quantity).await?;
        }

        self.link_sale_to_shift(&shift_id, &return_sale.id).await?;

        info!(
            return_id = %return_sale.id,
            original = %original_sale_id,
            refund = %self.config.format_currency(refund_total),
            "Return processed"
        );
        Ok(return_sale)
    }

    /// Fetches a sale by id.
    pub async fn get_sale(&self, id: &str) -> PosResult<Sale> {
        Ok(self
            .store
            .documents()
            .get_required(Collection::Sales, id)
            .await?)
    }

    /// Every sale and return on record.
    pub async fn list_sales(&self) -> PosResult<Vec<Sale>> {
        Ok(self.store.documents().get_all(Collection::Sales).await?)
    }

    // =========================================================================
    // Internal
    // =========================================================================

    /// Debits redeemed points and credits earned points on the customer.
    async fn settle_loyalty(&self, sale: &Sale) -> PosResult<()> {
        let Some(customer_id) = &sale.customer_id else {
            return Ok(());
        };
        let rate = self.config.loyalty_redeem_rate_cents;
        let points_used = if rate > 0 {
            sale.points_redeemed_value.cents() / rate
        } else {
            0
        };
        if points_used == 0 && sale.points_earned == 0 {
            return Ok(());
        }

        let mut customer: Customer = self
            .store
            .documents()
            .get_required(Collection::Customers, customer_id)
            .await?;
        customer.loyalty_points = customer.loyalty_points - points_used + sale.points_earned;
        self.store
            .documents()
            .save(Collection::Customers, &customer.id, &customer)
            .await?;
        Ok(())
    }

    async fn complete_originating_sales_order(&self, sales_order_id: &str) -> PosResult<()> {
        let mut so: duka_core::SalesOrder = self
            .store
            .documents()
            .get_required(Collection::SalesOrders, sales_order_id)
            .await?;
        so.status = transitions::sales_order::transition(
            so.status,
            duka_core::SalesOrderStatus::Completed,
        )?;
        self.store
            .documents()
            .save(Collection::SalesOrders, &so.id, &so)
            .await?;
        info!(sales_order_id = %so.id, "Sales order completed via checkout");
        Ok(())
    }

    async fn complete_originating_work_order(&self, work_order_id: &str) -> PosResult<()> {
        let mut wo: duka_core::WorkOrder = self
            .store
            .documents()
            .get_required(Collection::WorkOrders, work_order_id)
            .await?;
        // An order invoiced after being marked completed keeps its status
        // and completion time; the sale only settles its balance.
        if wo.status != WorkOrderStatus::Completed {
            wo.status =
                transitions::work_order::transition(wo.status, WorkOrderStatus::Completed)?;
            wo.completed_at = Some(Utc::now());
        }
        // The invoice collected everything owed.
        wo.deposit_paid = wo.estimated_cost;
        self.store
            .documents()
            .save(Collection::WorkOrders, &wo.id, &wo)
            .await?;
        info!(work_order_id = %wo.id, "Work order completed via checkout");
        Ok(())
    }
}

/// Validates tendered payments against the amount due and returns the cash
/// change owed.
///
/// Rules:
/// - every payment amount must be positive
/// - total tendered must cover the amount due
/// - change can only come out of cash actually tendered
fn validate_tender(payments: &[Payment], amount_due: Money) -> Result<Money, CoreError> {
    if payments.is_empty() && amount_due.is_positive() {
        return Err(CoreError::InvalidPaymentAmount {
            tendered: Money::zero().to_string(),
            due: amount_due.to_string(),
        });
    }
    for payment in payments {
        if !payment.amount.is_positive() {
            return Err(CoreError::InvalidPaymentAmount {
                tendered: payment.amount.to_string(),
                due: amount_due.to_string(),
            });
        }
    }

    let tendered: Money = payments.iter().map(|p| p.amount).sum();
    if tendered < amount_due {
        return Err(CoreError::InvalidPaymentAmount {
            tendered: tendered.to_string(),
            due: amount_due.to_string(),
        });
    }

    let change = tendered - amount_due;
    let cash_tendered: Money = payments
        .iter()
        .filter(|p| p.method == PaymentMethod::Cash)
        .map(|p| p.amount)
        .sum();
    if change > cash_tendered {
        // Card / M-Pesa charge the exact amount; overpayment there is a
        // client bug, not change.
        return Err(CoreError::InvalidPaymentAmount {
            tendered: tendered.to_string(),
            due: amount_due.to_string(),
        });
    }

    Ok(change)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn cash(cents: i64) -> Payment {
        Payment { method: PaymentMethod::Cash, amount: Money::from_cents(cents) }
    }

    fn mpesa(cents: i64) -> Payment {
        Payment { method: PaymentMethod::Mpesa, amount: Money::from_cents(cents) }
    }

    #[test]
    fn test_exact_cash_no_change() {
        let change = validate_tender(&[cash(1000)], Money::from_cents(1000)).unwrap();
        assert!(change.is_zero());
    }

    #[test]
    fn test_overpaid_cash_gives_change() {
        let change = validate_tender(&[cash(2000)], Money::from_cents(1440)).unwrap();
        assert_eq!(change.cents(), 560);
    }

    #[test]
    fn test_split_tender() {
        let change =
            validate_tender(&[mpesa(1000), cash(500)], Money::from_cents(1400)).unwrap();
        assert_eq!(change.cents(), 100);
    }

    #[test]
    fn test_underpayment_rejected() {
        assert!(validate_tender(&[cash(500)], Money::from_cents(1000)).is_err());
    }

    #[test]
    fn test_change_cannot_exceed_cash_portion() {
        // M-Pesa overpayment is not refundable as drawer change
        assert!(validate_tender(&[mpesa(2000)], Money::from_cents(1500)).is_err());
    }

    #[test]
    fn test_negative_payment_rejected() {
        let bad = Payment { method: PaymentMethod::Cash, amount: Money::from_cents(-100) };
        assert!(validate_tender(&[bad], Money::from_cents(0)).is_err());
    }

    #[test]
    fn test_zero_due_zero_payments_ok() {
        // Fully covered by deposit/points: nothing to tender
        let change = validate_tender(&[], Money::zero()).unwrap();
        assert!(change.is_zero());
    }
}
