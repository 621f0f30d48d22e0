//! # Cart Module
//!
//! The live cart and its totals math - the shared `calculate_cart_totals`
//! utility every checkout path goes through.
//!
//! ## Cart Totals Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Cart Totals Pipeline                              │
//! │                                                                         │
//! │  Σ line totals ──► subtotal                                            │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  discount (percentage bps | fixed) ──► discounted subtotal             │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  VAT on discounted subtotal ──► tax                                    │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  total = discounted subtotal + tax                                     │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  amount_due = total − deposit applied − points redeemed  (floor 0)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The deposit offset is how work-order and layaway balance payments reduce
//! what is owed at the register without touching the recorded sale total.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::money::Money;
use crate::types::{Product, ProductType, SaleLine, TaxRate};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

// =============================================================================
// Cart Item
// =============================================================================

/// An item in the live cart.
///
/// ## Price Freezing
/// Product details (sku, name, price) are copied in at add time. If the
/// catalog changes afterwards, the cart - and any held receipt snapshotting
/// it - keeps the original values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: String,
    pub sku: String,
    pub name: String,
    /// Price in cents at time of adding (frozen).
    pub unit_price: Money,
    pub quantity: i64,
    /// Frozen product type, so checkout knows whether to deduct stock.
    pub product_type: ProductType,
}

impl CartItem {
    /// Creates a new cart item from a product and quantity.
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        CartItem {
            product_id: product.id.clone(),
            sku: product.sku.clone(),
            name: product.name.clone(),
            unit_price: product.price,
            quantity,
            product_type: product.product_type,
        }
    }

    /// Line total (unit price × quantity).
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }

    /// Converts this cart line into an immutable sale line snapshot.
    pub fn to_sale_line(&self) -> SaleLine {
        SaleLine {
            product_id: self.product_id.clone(),
            sku: self.sku.clone(),
            name: self.name.clone(),
            unit_price: self.unit_price,
            quantity: self.quantity,
            line_total: self.line_total(),
            product_type: self.product_type,
        }
    }
}

// =============================================================================
// Discount
// =============================================================================

/// A whole-cart discount specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum Discount {
    /// Percentage discount in basis points (1000 = 10%).
    Percentage(u32),
    /// Fixed amount off the subtotal.
    Fixed(Money),
}

impl Discount {
    /// The discount amount for a given subtotal, clamped to `[0, subtotal]`
    /// so a fixed discount can never push totals negative.
    pub fn amount_for(&self, subtotal: Money) -> Money {
        let raw = match *self {
            Discount::Percentage(bps) => subtotal.percentage_of(bps),
            Discount::Fixed(amount) => amount,
        };
        if raw.is_negative() {
            Money::zero()
        } else if raw > subtotal {
            subtotal
        } else {
            raw
        }
    }
}

// =============================================================================
// Cart Totals
// =============================================================================

/// The computed totals for a cart at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    pub subtotal: Money,
    pub discount: Money,
    pub tax: Money,
    pub total: Money,
    /// What must actually be tendered: total minus deposit applied and
    /// loyalty value redeemed, floored at zero.
    pub amount_due: Money,
}

// =============================================================================
// Cart
// =============================================================================

/// The live cart.
///
/// ## Invariants
/// - Items are unique by `product_id` (adding the same product merges quantity)
/// - Quantity per line is in `1..=MAX_ITEM_QUANTITY`
/// - At most `MAX_CART_ITEMS` unique lines
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    pub items: Vec<CartItem>,
    /// Customer selected for this transaction, if any.
    pub customer_id: Option<String>,
    pub discount: Option<Discount>,
    /// Deposit held on an originating work order / layaway, applied against
    /// the amount due.
    pub deposit_applied: Money,
    /// Value of loyalty points the customer chose to redeem.
    pub points_redeemed_value: Money,
}

impl Cart {
    pub fn new() -> Self {
        Cart::default()
    }

    /// Adds a product to the cart or increases quantity if already present.
    ///
    /// Stock is validated here, at add time, for inventory products; checkout
    /// trusts this validation and does not re-floor stock.
    pub fn add_item(&mut self, product: &Product, quantity: i64) -> Result<(), CoreError> {
        if quantity <= 0 {
            return Err(CoreError::InvalidQuantity { requested: quantity });
        }

        let in_cart = self
            .items
            .iter()
            .find(|i| i.product_id == product.id)
            .map(|i| i.quantity)
            .unwrap_or(0);

        let new_qty = in_cart + quantity;
        if new_qty > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: new_qty,
                max: MAX_ITEM_QUANTITY,
            });
        }

        if !product.can_sell(new_qty) {
            return Err(CoreError::InsufficientStock {
                sku: product.sku.clone(),
                available: product.stock,
                requested: new_qty,
            });
        }

        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product.id) {
            item.quantity = new_qty;
            return Ok(());
        }

        if self.items.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge { max: MAX_CART_ITEMS });
        }

        self.items.push(CartItem::from_product(product, quantity));
        Ok(())
    }

    /// Updates the quantity of a line. Zero removes the line.
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) -> Result<(), CoreError> {
        if quantity == 0 {
            return self.remove_item(product_id);
        }

        if quantity < 0 || quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }

        match self.items.iter_mut().find(|i| i.product_id == product_id) {
            Some(item) => {
                item.quantity = quantity;
                Ok(())
            }
            None => Err(CoreError::NotInCart(product_id.to_string())),
        }
    }

    /// Removes a line from the cart by product ID.
    pub fn remove_item(&mut self, product_id: &str) -> Result<(), CoreError> {
        let before = self.items.len();
        self.items.retain(|i| i.product_id != product_id);

        if self.items.len() == before {
            Err(CoreError::NotInCart(product_id.to_string()))
        } else {
            Ok(())
        }
    }

    /// Clears everything: items, customer, discount, offsets.
    pub fn clear(&mut self) {
        *self = Cart::default();
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of line quantities.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Subtotal before discount and VAT.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(|i| i.line_total()).sum()
    }

    /// The shared totals computation (see module docs for the pipeline).
    pub fn totals(&self, vat_rate: TaxRate) -> CartTotals {
        let subtotal = self.subtotal();
        let discount = self
            .discount
            .map(|d| d.amount_for(subtotal))
            .unwrap_or_else(Money::zero);
        let discounted = subtotal - discount;
        let tax = discounted.calculate_tax(vat_rate);
        let total = discounted + tax;
        let amount_due =
            (total - self.deposit_applied - self.points_redeemed_value).max(Money::zero());

        CartTotals {
            subtotal,
            discount,
            tax,
            total,
            amount_due,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
