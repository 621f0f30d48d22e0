//! Shared fixtures for engine integration tests.
//!
//! Each test binary compiles its own copy; not every binary uses every
//! helper.
#![allow(dead_code)]

use chrono::Utc;
use duka_core::{Money, Payment, PaymentMethod, Product, ProductType, Role};
use duka_pos::{Pos, PosConfig};
use uuid::Uuid;

/// Opens an in-memory engine with an admin logged in.
pub async fn setup() -> Pos {
    let pos = Pos::open_in_memory(PosConfig::default()).await.unwrap();
    pos.create_user("Mary", "mary@duka.co.ke", "hunter2", Role::Admin)
        .await
        .unwrap();
    pos.login("mary@duka.co.ke", "hunter2").await.unwrap();
    pos
}

/// Opens an in-memory engine with an admin logged in and a shift started.
pub async fn setup_with_shift(float_cents: i64) -> Pos {
    let pos = setup().await;
    pos.start_shift(Money::from_cents(float_cents)).await.unwrap();
    pos
}

/// Seeds an inventory product and returns it.
pub async fn seed_product(pos: &Pos, sku: &str, price_cents: i64, stock: i64) -> Product {
    let now = Utc::now();
    pos.save_product(Product {
        id: Uuid::new_v4().to_string(),
        sku: sku.to_string(),
        barcode: None,
        name: format!("Product {}", sku),
        category: "General".to_string(),
        product_type: ProductType::Inventory,
        price: Money::from_cents(price_cents),
        cost: Money::from_cents(price_cents / 2),
        stock,
        active: true,
        created_at: now,
        updated_at: now,
    })
    .await
    .unwrap()
}

pub fn cash(cents: i64) -> Payment {
    Payment {
        method: PaymentMethod::Cash,
        amount: Money::from_cents(cents),
    }
}

pub fn mpesa(cents: i64) -> Payment {
    Payment {
        method: PaymentMethod::Mpesa,
        amount: Money::from_cents(cents),
    }
}
