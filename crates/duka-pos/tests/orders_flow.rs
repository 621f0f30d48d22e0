//! Sales order, work order, layaway, and purchase order lifecycle tests.

mod common;

use common::{cash, seed_product, setup_with_shift};
use duka_core::{
    Money, PurchaseOrderStatus, SalesOrderStatus, WorkOrderStatus,
};
use duka_pos::PurchaseLineInput;

// =============================================================================
// Sales Orders
// =============================================================================

#[tokio::test]
async fn sales_order_full_cycle() {
    let pos = setup_with_shift(0).await;
    // Nothing in stock - that's the point of a sales order.
    let product = seed_product(&pos, "SKU-1", 10000, 0).await;
    let customer = pos.create_customer("Njeri", None, None).await.unwrap();
    let supplier = pos.create_supplier("Kariuki Wholesale", None, None).await.unwrap();

    // Order 2 units: subtotal 20000 + 16% VAT = 23200, deposit KSh 100
    let so = pos
        .create_sales_order(&customer.id, &[(product.id.clone(), 2)])
        .await
        .unwrap();
    assert_eq!(so.status, SalesOrderStatus::Pending);
    assert_eq!(so.total.cents(), 23200);

    let so = pos.record_sales_order_payment(&so.id, cash(10000)).await.unwrap();
    assert_eq!(so.balance().cents(), 13200);

    // Cannot invoice before goods arrive
    assert_eq!(
        pos.invoice_sales_order(&so.id).await.unwrap_err().code(),
        "INVALID_TRANSITION"
    );

    // Raise the PO on an explicitly chosen supplier
    let po = pos.create_po_from_sales_order(&so.id, &supplier.id).await.unwrap();
    assert_eq!(po.status, PurchaseOrderStatus::Sent);
    assert_eq!(po.sales_order_id.as_deref(), Some(so.id.as_str()));
    assert_eq!(pos.get_sales_order(&so.id).await.unwrap().status, SalesOrderStatus::Ordered);

    // First delivery: 1 of 2
    let (po, invoice) = pos
        .receive_purchase_order(&po.id, &[(product.id.clone(), 1)])
        .await
        .unwrap();
    assert_eq!(po.status, PurchaseOrderStatus::PartiallyReceived);
    assert_eq!(invoice.unwrap().amount.cents(), 5000); // 1 × cost 5000
    assert_eq!(
        pos.get_sales_order(&so.id).await.unwrap().status,
        SalesOrderStatus::Ordered // line not fully received yet
    );

    // Second delivery completes the PO and the SO roll-forward
    let (po, invoice) = pos
        .receive_purchase_order(&po.id, &[(product.id.clone(), 1)])
        .await
        .unwrap();
    assert_eq!(po.status, PurchaseOrderStatus::Received);
    assert_eq!(invoice.unwrap().amount.cents(), 5000);
    assert_eq!(
        pos.get_sales_order(&so.id).await.unwrap().status,
        SalesOrderStatus::Received
    );
    assert_eq!(pos.list_products().await.unwrap()[0].stock, 2);
    assert_eq!(pos.list_supplier_invoices().await.unwrap().len(), 2);

    // Invoice through checkout: locked prices, deposit applied
    pos.invoice_sales_order(&so.id).await.unwrap();
    let totals = pos.cart_totals().await.unwrap();
    assert_eq!(totals.total.cents(), 23200);
    assert_eq!(totals.amount_due.cents(), 13200);

    let sale = pos.complete_sale(vec![cash(13200)]).await.unwrap();
    assert_eq!(sale.deposit_applied.cents(), 10000);
    assert_eq!(
        pos.get_sales_order(&so.id).await.unwrap().status,
        SalesOrderStatus::Completed
    );
    assert_eq!(pos.list_products().await.unwrap()[0].stock, 0);
}

#[tokio::test]
async fn po_cannot_be_raised_twice_for_one_sales_order() {
    let pos = setup_with_shift(0).await;
    let product = seed_product(&pos, "SKU-1", 10000, 0).await;
    let customer = pos.create_customer("Njeri", None, None).await.unwrap();
    let supplier = pos.create_supplier("Kariuki Wholesale", None, None).await.unwrap();

    let so = pos
        .create_sales_order(&customer.id, &[(product.id.clone(), 1)])
        .await
        .unwrap();
    pos.create_po_from_sales_order(&so.id, &supplier.id).await.unwrap();

    let err = pos
        .create_po_from_sales_order(&so.id, &supplier.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "INVALID_TRANSITION");
}

#[tokio::test]
async fn invoicing_locks_in_order_prices() {
    let pos = setup_with_shift(0).await;
    let product = seed_product(&pos, "SKU-1", 10000, 0).await;
    let customer = pos.create_customer("Njeri", None, None).await.unwrap();
    let supplier = pos.create_supplier("Kariuki Wholesale", None, None).await.unwrap();

    let so = pos
        .create_sales_order(&customer.id, &[(product.id.clone(), 1)])
        .await
        .unwrap();
    let po = pos.create_po_from_sales_order(&so.id, &supplier.id).await.unwrap();
    pos.receive_purchase_order(&po.id, &[(product.id.clone(), 1)]).await.unwrap();

    // Price hike after the order was placed
    let mut updated = pos.list_products().await.unwrap().remove(0);
    updated.price = Money::from_cents(15000);
    pos.save_product(updated).await.unwrap();

    pos.invoice_sales_order(&so.id).await.unwrap();
    // Still the locked 10000 + VAT
    assert_eq!(pos.cart_totals().await.unwrap().total.cents(), 11600);
}

// =============================================================================
// Work Orders
// =============================================================================

#[tokio::test]
async fn work_order_lifecycle_and_invoice() {
    let pos = setup_with_shift(0).await;
    let customer = pos.create_customer("Njeri", None, None).await.unwrap();

    let wo = pos
        .create_work_order(
            &customer.id,
            "screen replacement - Tecno Spark 10",
            Money::from_cents(10000),
            Money::from_cents(3000),
            Some("Otis".into()),
        )
        .await
        .unwrap();
    assert_eq!(wo.status, WorkOrderStatus::Pending);
    assert_eq!(wo.balance().cents(), 7000);

    // Bench ⇄ parts shelf
    pos.update_work_order_status(&wo.id, WorkOrderStatus::InProgress).await.unwrap();
    pos.update_work_order_status(&wo.id, WorkOrderStatus::AwaitingParts).await.unwrap();
    pos.update_work_order_status(&wo.id, WorkOrderStatus::InProgress).await.unwrap();
    pos.update_work_order_status(&wo.id, WorkOrderStatus::ReadyForPickup).await.unwrap();

    // Invoice: service line 10000 + VAT 1600 − deposit 3000 = 8600 due
    pos.invoice_work_order(&wo.id).await.unwrap();
    let totals = pos.cart_totals().await.unwrap();
    assert_eq!(totals.amount_due.cents(), 8600);

    let sale = pos.complete_sale(vec![cash(8600)]).await.unwrap();
    assert_eq!(sale.deposit_applied.cents(), 3000);
    assert_eq!(sale.items[0].product_id, wo.id);

    let wo = pos.get_work_order(&wo.id).await.unwrap();
    assert_eq!(wo.status, WorkOrderStatus::Completed);
    assert!(wo.completed_at.is_some());
}

#[tokio::test]
async fn work_order_cannot_skip_states() {
    let pos = setup_with_shift(0).await;
    let customer = pos.create_customer("Njeri", None, None).await.unwrap();
    let wo = pos
        .create_work_order(&customer.id, "battery swap", Money::from_cents(5000), Money::zero(), None)
        .await
        .unwrap();

    let err = pos
        .update_work_order_status(&wo.id, WorkOrderStatus::Completed)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "INVALID_TRANSITION");

    // Invoicing a job that isn't ready is refused too
    assert_eq!(
        pos.invoice_work_order(&wo.id).await.unwrap_err().code(),
        "INVALID_TRANSITION"
    );
}

#[tokio::test]
async fn work_order_deposit_accumulates() {
    let pos = setup_with_shift(0).await;
    let customer = pos.create_customer("Njeri", None, None).await.unwrap();
    let wo = pos
        .create_work_order(&customer.id, "rewire amp", Money::from_cents(20000), Money::zero(), None)
        .await
        .unwrap();

    pos.record_work_order_deposit(&wo.id, Money::from_cents(5000)).await.unwrap();
    let wo = pos.record_work_order_deposit(&wo.id, Money::from_cents(2500)).await.unwrap();
    assert_eq!(wo.deposit_paid.cents(), 7500);
    assert_eq!(wo.balance().cents(), 12500);
}

#[tokio::test]
async fn completed_order_with_balance_can_still_be_invoiced() {
    let pos = setup_with_shift(0).await;
    let customer = pos.create_customer("Njeri", None, None).await.unwrap();
    let wo = pos
        .create_work_order(
            &customer.id,
            "radio repair",
            Money::from_cents(10000),
            Money::from_cents(6000),
            None,
        )
        .await
        .unwrap();

    pos.update_work_order_status(&wo.id, WorkOrderStatus::InProgress).await.unwrap();
    pos.update_work_order_status(&wo.id, WorkOrderStatus::ReadyForPickup).await.unwrap();
    // Marked done at the bench before the customer paid up
    pos.update_work_order_status(&wo.id, WorkOrderStatus::Completed).await.unwrap();

    // The KSh 40 balance is still collectable
    pos.invoice_work_order(&wo.id).await.unwrap();
    let totals = pos.cart_totals().await.unwrap();
    assert_eq!(totals.amount_due.cents(), 10000 + 1600 - 6000);

    pos.complete_sale(vec![cash(5600)]).await.unwrap();

    let wo = pos.get_work_order(&wo.id).await.unwrap();
    assert_eq!(wo.status, WorkOrderStatus::Completed);
    assert!(wo.balance().is_zero());

    // Settled: nothing left to ring up
    assert_eq!(
        pos.invoice_work_order(&wo.id).await.unwrap_err().code(),
        "INVALID_TRANSITION"
    );
}

#[tokio::test]
async fn deposit_covering_estimate_completes_without_checkout() {
    let pos = setup_with_shift(0).await;
    let customer = pos.create_customer("Njeri", None, None).await.unwrap();
    let wo = pos
        .create_work_order(
            &customer.id,
            "jua kali weld",
            Money::from_cents(5000),
            Money::from_cents(5000),
            None,
        )
        .await
        .unwrap();

    pos.update_work_order_status(&wo.id, WorkOrderStatus::InProgress).await.unwrap();
    pos.update_work_order_status(&wo.id, WorkOrderStatus::ReadyForPickup).await.unwrap();

    // Nothing owed, so no sale is rung up
    pos.invoice_work_order(&wo.id).await.unwrap();
    assert!(pos.cart_totals().await.unwrap().subtotal.is_zero());

    let wo = pos.get_work_order(&wo.id).await.unwrap();
    assert_eq!(wo.status, WorkOrderStatus::Completed);
    assert!(wo.completed_at.is_some());
}

#[tokio::test]
async fn work_order_reassignment() {
    let pos = setup_with_shift(0).await;
    let customer = pos.create_customer("Njeri", None, None).await.unwrap();
    let wo = pos
        .create_work_order(&customer.id, "solder joint", Money::from_cents(2000), Money::zero(), None)
        .await
        .unwrap();
    assert!(wo.assigned_to.is_none());

    let wo = pos.assign_work_order(&wo.id, Some("Otis".into())).await.unwrap();
    assert_eq!(wo.assigned_to.as_deref(), Some("Otis"));

    pos.update_work_order_status(&wo.id, WorkOrderStatus::Cancelled).await.unwrap();
    assert_eq!(
        pos.assign_work_order(&wo.id, None).await.unwrap_err().code(),
        "INVALID_TRANSITION"
    );
}

// =============================================================================
// Layaways
// =============================================================================

#[tokio::test]
async fn layaway_reserves_stock_and_completes_on_payoff() {
    let pos = setup_with_shift(0).await;
    let product = seed_product(&pos, "SKU-1", 10000, 5).await;
    let customer = pos.create_customer("Njeri", None, None).await.unwrap();

    // 2 × 10000 + VAT = 23200; stock reserved immediately
    let layaway = pos
        .create_layaway(&customer.id, &[(product.id.clone(), 2)])
        .await
        .unwrap();
    assert_eq!(layaway.total.cents(), 23200);
    assert_eq!(layaway.balance.cents(), 23200);
    assert_eq!(pos.list_products().await.unwrap()[0].stock, 3);

    let layaway = pos.record_layaway_payment(&layaway.id, cash(10000)).await.unwrap();
    assert_eq!(layaway.balance.cents(), 13200);
    assert_eq!(layaway.status, duka_core::LayawayStatus::Active);

    let layaway = pos.record_layaway_payment(&layaway.id, cash(13200)).await.unwrap();
    assert_eq!(layaway.status, duka_core::LayawayStatus::Completed);
    assert!(layaway.balance.is_zero());

    // Completion releases the goods; stock does not come back
    assert_eq!(pos.list_products().await.unwrap()[0].stock, 3);

    // No further payments accepted
    assert_eq!(
        pos.record_layaway_payment(&layaway.id, cash(100)).await.unwrap_err().code(),
        "INVALID_TRANSITION"
    );
}

#[tokio::test]
async fn cancelled_layaway_restores_stock() {
    let pos = setup_with_shift(0).await;
    let product = seed_product(&pos, "SKU-1", 10000, 5).await;
    let customer = pos.create_customer("Njeri", None, None).await.unwrap();

    let layaway = pos
        .create_layaway(&customer.id, &[(product.id.clone(), 2)])
        .await
        .unwrap();
    assert_eq!(pos.list_products().await.unwrap()[0].stock, 3);

    pos.cancel_layaway(&layaway.id).await.unwrap();
    assert_eq!(pos.list_products().await.unwrap()[0].stock, 5);
}

#[tokio::test]
async fn layaway_cannot_reserve_more_than_stock() {
    let pos = setup_with_shift(0).await;
    let product = seed_product(&pos, "SKU-1", 10000, 1).await;
    let customer = pos.create_customer("Njeri", None, None).await.unwrap();

    let err = pos
        .create_layaway(&customer.id, &[(product.id.clone(), 2)])
        .await
        .unwrap_err();
    assert_eq!(err.code(), "INSUFFICIENT_STOCK");
}

// =============================================================================
// Purchase Orders
// =============================================================================

#[tokio::test]
async fn over_delivery_is_clamped_to_outstanding() {
    let pos = setup_with_shift(0).await;
    let product = seed_product(&pos, "SKU-1", 10000, 0).await;
    let supplier = pos.create_supplier("Kariuki Wholesale", None, None).await.unwrap();

    let po = pos
        .create_purchase_order(
            &supplier.id,
            &[PurchaseLineInput {
                product_id: product.id.clone(),
                quantity: 5,
                unit_cost: Money::from_cents(4000),
                ean: Some("6161100001234".into()),
                category: Some("Drinks".into()),
            }],
        )
        .await
        .unwrap();
    assert_eq!(po.status, PurchaseOrderStatus::Draft);

    // Draft orders cannot receive
    assert_eq!(
        pos.receive_purchase_order(&po.id, &[(product.id.clone(), 5)])
            .await
            .unwrap_err()
            .code(),
        "INVALID_TRANSITION"
    );

    let po = pos.send_purchase_order(&po.id).await.unwrap();

    // Supplier ships 8 against an order of 5: clamp to 5
    let (po, invoice) = pos
        .receive_purchase_order(&po.id, &[(product.id.clone(), 8)])
        .await
        .unwrap();
    assert_eq!(po.status, PurchaseOrderStatus::Received);
    assert_eq!(po.lines[0].quantity_received, 5);
    assert_eq!(invoice.unwrap().amount.cents(), 20000); // 5 × 4000, not 8

    // Product stamped with the supplier's details
    let stocked = pos.list_products().await.unwrap().remove(0);
    assert_eq!(stocked.stock, 5);
    assert_eq!(stocked.cost.cents(), 4000);
    assert_eq!(stocked.barcode.as_deref(), Some("6161100001234"));
    assert_eq!(stocked.category, "Drinks");

    // Fully received orders cannot receive again
    assert_eq!(
        pos.receive_purchase_order(&po.id, &[(product.id.clone(), 1)])
            .await
            .unwrap_err()
            .code(),
        "INVALID_TRANSITION"
    );
}

#[tokio::test]
async fn entirely_surplus_delivery_cuts_no_invoice() {
    let pos = setup_with_shift(0).await;
    let soda = seed_product(&pos, "SKU-SODA", 10000, 0).await;
    let bread = seed_product(&pos, "SKU-BREAD", 5000, 0).await;
    let supplier = pos.create_supplier("Kariuki Wholesale", None, None).await.unwrap();

    let line = |product: &duka_core::Product, qty| PurchaseLineInput {
        product_id: product.id.clone(),
        quantity: qty,
        unit_cost: Money::from_cents(4000),
        ean: None,
        category: None,
    };

    let po = pos
        .create_purchase_order(&supplier.id, &[line(&soda, 1), line(&bread, 5)])
        .await
        .unwrap();
    let po = pos.send_purchase_order(&po.id).await.unwrap();

    // Event 1: soda line fully received
    let (po, invoice) = pos
        .receive_purchase_order(&po.id, &[(soda.id.clone(), 1)])
        .await
        .unwrap();
    assert!(invoice.is_some());
    assert_eq!(po.status, PurchaseOrderStatus::PartiallyReceived);

    // Event 2: more soda shows up, but nothing is outstanding on that line
    let (po, invoice) = pos
        .receive_purchase_order(&po.id, &[(soda.id.clone(), 3)])
        .await
        .unwrap();
    assert!(invoice.is_none());
    assert_eq!(po.status, PurchaseOrderStatus::PartiallyReceived);
    assert_eq!(pos.list_supplier_invoices().await.unwrap().len(), 1);
}
