//! Cart, sale completion, return, held receipt, and loyalty tests.

mod common;

use common::{cash, mpesa, seed_product, setup_with_shift};
use duka_core::{Discount, Money, PaymentMethod, Role, SaleType};
use duka_pos::{Pos, PosConfig};

#[tokio::test]
async fn sale_totals_and_stock_movement() {
    let pos = setup_with_shift(0).await;
    let product = seed_product(&pos, "SKU-1", 10000, 5).await;

    // 2 × KSh 100, 10% discount, 16% VAT on the discounted subtotal
    pos.add_to_cart(&product.id, 2).await.unwrap();
    pos.set_discount(Some(Discount::Percentage(1000))).await.unwrap();

    let sale = pos.complete_sale(vec![cash(21000)]).await.unwrap();

    assert_eq!(sale.subtotal.cents(), 20000);
    assert_eq!(sale.discount.cents(), 2000);
    assert_eq!(sale.tax.cents(), 2880);
    assert_eq!(sale.total.cents(), 20880);
    assert_eq!(sale.change.cents(), 120);

    let restocked = pos.list_products().await.unwrap();
    assert_eq!(restocked[0].stock, 3);

    // Cart is reset after completion
    assert!(pos.cart_totals().await.unwrap().subtotal.is_zero());
}

#[tokio::test]
async fn insufficient_stock_blocks_add() {
    let pos = setup_with_shift(0).await;
    let product = seed_product(&pos, "SKU-1", 1000, 2).await;

    pos.add_to_cart(&product.id, 2).await.unwrap();
    let err = pos.add_to_cart(&product.id, 1).await.unwrap_err();
    assert_eq!(err.code(), "INSUFFICIENT_STOCK");
}

#[tokio::test]
async fn empty_cart_cannot_complete() {
    let pos = setup_with_shift(0).await;
    let err = pos.complete_sale(vec![cash(1000)]).await.unwrap_err();
    assert_eq!(err.code(), "CART_EMPTY");
}

#[tokio::test]
async fn underpayment_is_rejected_and_nothing_persists() {
    let pos = setup_with_shift(0).await;
    let product = seed_product(&pos, "SKU-1", 10000, 5).await;

    pos.add_to_cart(&product.id, 1).await.unwrap();
    let err = pos.complete_sale(vec![cash(5000)]).await.unwrap_err();
    assert_eq!(err.code(), "INVALID_PAYMENT");

    assert!(pos.list_sales().await.unwrap().is_empty());
    assert_eq!(pos.list_products().await.unwrap()[0].stock, 5);
}

#[tokio::test]
async fn split_tender_change_comes_from_cash() {
    let pos = setup_with_shift(0).await;
    let product = seed_product(&pos, "SKU-1", 10000, 5).await;

    pos.add_to_cart(&product.id, 1).await.unwrap();
    // total 11600: 10000 on M-Pesa + 2000 cash → 400 change from cash
    let sale = pos.complete_sale(vec![mpesa(10000), cash(2000)]).await.unwrap();
    assert_eq!(sale.change.cents(), 400);
}

// =============================================================================
// Returns
// =============================================================================

#[tokio::test]
async fn return_restocks_and_refunds_proportionally() {
    let pos = setup_with_shift(0).await;
    let product = seed_product(&pos, "SKU-1", 10000, 5).await;

    pos.add_to_cart(&product.id, 2).await.unwrap();
    pos.set_discount(Some(Discount::Percentage(1000))).await.unwrap();
    let sale = pos.complete_sale(vec![cash(20880)]).await.unwrap();
    assert_eq!(pos.list_products().await.unwrap()[0].stock, 3);

    // Return 1 of 2: proportional discount share 1000, VAT 1440, refund 10440
    let ret = pos
        .process_return(&sale.id, &[(product.id.clone(), 1)], "damaged", PaymentMethod::Cash)
        .await
        .unwrap();

    assert_eq!(ret.sale_type, SaleType::Return);
    assert_eq!(ret.original_sale_id.as_deref(), Some(sale.id.as_str()));
    assert_eq!(ret.return_reason.as_deref(), Some("damaged"));
    assert_eq!(ret.subtotal.cents(), -10000);
    assert_eq!(ret.discount.cents(), -1000);
    assert_eq!(ret.tax.cents(), -1440);
    assert_eq!(ret.total.cents(), -10440);
    assert_eq!(ret.items[0].quantity, -1);

    // Stock came back
    assert_eq!(pos.list_products().await.unwrap()[0].stock, 4);
}

#[tokio::test]
async fn cumulative_returns_cannot_exceed_sold_quantity() {
    let pos = setup_with_shift(0).await;
    let product = seed_product(&pos, "SKU-1", 10000, 5).await;

    pos.add_to_cart(&product.id, 2).await.unwrap();
    let sale = pos.complete_sale(vec![cash(23200)]).await.unwrap();

    pos.process_return(&sale.id, &[(product.id.clone(), 1)], "changed mind", PaymentMethod::Cash)
        .await
        .unwrap();
    pos.process_return(&sale.id, &[(product.id.clone(), 1)], "changed mind", PaymentMethod::Cash)
        .await
        .unwrap();

    let err = pos
        .process_return(&sale.id, &[(product.id.clone(), 1)], "changed mind", PaymentMethod::Cash)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "INVALID_QUANTITY");
}

#[tokio::test]
async fn refund_method_is_recorded_on_the_return() {
    let pos = setup_with_shift(0).await;
    let product = seed_product(&pos, "SKU-1", 10000, 5).await;

    pos.add_to_cart(&product.id, 1).await.unwrap();
    let sale = pos.complete_sale(vec![mpesa(11600)]).await.unwrap();

    // Paid on M-Pesa, reversed on M-Pesa: the drawer never sees it
    let ret = pos
        .process_return(&sale.id, &[(product.id.clone(), 1)], "reversal", PaymentMethod::Mpesa)
        .await
        .unwrap();
    assert_eq!(ret.payments.len(), 1);
    assert_eq!(ret.payments[0].method, PaymentMethod::Mpesa);
    assert_eq!(ret.payments[0].amount.cents(), -11600);
}

#[tokio::test]
async fn a_return_cannot_be_returned() {
    let pos = setup_with_shift(0).await;
    let product = seed_product(&pos, "SKU-1", 10000, 5).await;

    pos.add_to_cart(&product.id, 1).await.unwrap();
    let sale = pos.complete_sale(vec![cash(11600)]).await.unwrap();
    let ret = pos
        .process_return(&sale.id, &[(product.id.clone(), 1)], "faulty", PaymentMethod::Cash)
        .await
        .unwrap();

    let err = pos
        .process_return(&ret.id, &[(product.id.clone(), 1)], "faulty", PaymentMethod::Cash)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "INVALID_TRANSITION");
}

// =============================================================================
// Held Receipts
// =============================================================================

#[tokio::test]
async fn hold_and_recall_round_trip() {
    let pos = setup_with_shift(0).await;
    let product = seed_product(&pos, "SKU-1", 10000, 5).await;

    pos.add_to_cart(&product.id, 2).await.unwrap();
    let held = pos.hold_receipt("blue jacket guy").await.unwrap();

    // Cart cleared by hold
    assert!(pos.cart_totals().await.unwrap().subtotal.is_zero());

    pos.recall_receipt(&held.id).await.unwrap();
    assert_eq!(pos.cart_totals().await.unwrap().subtotal.cents(), 20000);

    // Recall consumed the held receipt
    assert!(pos.list_held_receipts().await.unwrap().is_empty());
}

#[tokio::test]
async fn recall_requires_empty_cart() {
    let pos = setup_with_shift(0).await;
    let product = seed_product(&pos, "SKU-1", 10000, 5).await;

    pos.add_to_cart(&product.id, 1).await.unwrap();
    let held = pos.hold_receipt("first").await.unwrap();

    pos.add_to_cart(&product.id, 1).await.unwrap();
    let err = pos.recall_receipt(&held.id).await.unwrap_err();
    assert_eq!(err.code(), "CART_NOT_EMPTY");
}

#[tokio::test]
async fn held_receipts_recall_in_any_order() {
    let pos = setup_with_shift(0).await;
    let product = seed_product(&pos, "SKU-1", 10000, 9).await;

    pos.add_to_cart(&product.id, 1).await.unwrap();
    let first = pos.hold_receipt("first").await.unwrap();
    pos.add_to_cart(&product.id, 2).await.unwrap();
    let second = pos.hold_receipt("second").await.unwrap();

    pos.recall_receipt(&second.id).await.unwrap();
    assert_eq!(pos.cart_totals().await.unwrap().subtotal.cents(), 20000);
    pos.clear_cart().await.unwrap();

    pos.recall_receipt(&first.id).await.unwrap();
    assert_eq!(pos.cart_totals().await.unwrap().subtotal.cents(), 10000);
}

#[tokio::test]
async fn delete_held_receipt_without_recall() {
    let pos = setup_with_shift(0).await;
    let product = seed_product(&pos, "SKU-1", 10000, 5).await;

    pos.add_to_cart(&product.id, 1).await.unwrap();
    let held = pos.hold_receipt("abandoned").await.unwrap();

    pos.delete_held_receipt(&held.id).await.unwrap();
    assert!(pos.list_held_receipts().await.unwrap().is_empty());
    assert!(pos.delete_held_receipt(&held.id).await.is_err());
}

// =============================================================================
// Loyalty
// =============================================================================

#[tokio::test]
async fn points_redeem_as_tender_up_to_cap() {
    let pos = setup_with_shift(0).await;
    let product = seed_product(&pos, "SKU-1", 10000, 5).await;
    let customer = pos.create_customer("Njeri", None, None).await.unwrap();
    pos.adjust_loyalty_points(&customer.id, 500).await.unwrap();

    pos.add_to_cart(&product.id, 1).await.unwrap();
    pos.select_customer(Some(&customer.id)).await.unwrap();

    // Total 11600; cap 50% = 5800; 500 points at KSh 1 = 50000 → clamped
    let (points_used, totals) = pos.redeem_points(500).await.unwrap();
    assert_eq!(points_used, 58);
    assert_eq!(totals.amount_due.cents(), 11600 - 5800);

    let sale = pos.complete_sale(vec![cash(5800)]).await.unwrap();
    assert_eq!(sale.points_redeemed_value.cents(), 5800);
    assert_eq!(sale.points_earned, 0);

    // Balance debited by exactly the points consumed
    let customers = pos.list_customers().await.unwrap();
    assert_eq!(customers[0].loyalty_points, 500 - 58);
}

#[tokio::test]
async fn zero_redeem_rate_disables_redemption_without_breaking_checkout() {
    let mut config = PosConfig::default();
    config.loyalty_redeem_rate_cents = 0;
    let pos = Pos::open_in_memory(config).await.unwrap();
    pos.create_user("Mary", "mary@duka.co.ke", "hunter2", Role::Admin)
        .await
        .unwrap();
    pos.login("mary@duka.co.ke", "hunter2").await.unwrap();
    pos.start_shift(Money::zero()).await.unwrap();

    let product = seed_product(&pos, "SKU-1", 10000, 5).await;
    let customer = pos.create_customer("Njeri", None, None).await.unwrap();
    pos.adjust_loyalty_points(&customer.id, 500).await.unwrap();

    pos.add_to_cart(&product.id, 1).await.unwrap();
    pos.select_customer(Some(&customer.id)).await.unwrap();

    // Points are worth nothing: redemption is a no-op, not a crash
    let (points_used, totals) = pos.redeem_points(100).await.unwrap();
    assert_eq!(points_used, 0);
    assert_eq!(totals.amount_due.cents(), 11600);

    // ...and a customer-tagged sale still settles cleanly
    let sale = pos.complete_sale(vec![cash(11600)]).await.unwrap();
    assert!(sale.points_redeemed_value.is_zero());
    assert_eq!(pos.list_customers().await.unwrap()[0].loyalty_points, 500);
}

#[tokio::test]
async fn redeeming_more_points_than_held_fails() {
    let pos = setup_with_shift(0).await;
    let product = seed_product(&pos, "SKU-1", 10000, 5).await;
    let customer = pos.create_customer("Njeri", None, None).await.unwrap();
    pos.adjust_loyalty_points(&customer.id, 10).await.unwrap();

    pos.add_to_cart(&product.id, 1).await.unwrap();
    pos.select_customer(Some(&customer.id)).await.unwrap();

    let err = pos.redeem_points(50).await.unwrap_err();
    assert_eq!(err.code(), "INSUFFICIENT_POINTS");
}
