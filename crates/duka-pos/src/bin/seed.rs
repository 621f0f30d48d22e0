//! # Seed Data Generator
//!
//! Populates the database with development data: a staff roster, a product
//! catalog, a few customers, and a supplier.
//!
//! ## Usage
//! ```bash
//! # Generate 500 products (default)
//! cargo run -p duka-pos --bin seed
//!
//! # Generate custom amount
//! cargo run -p duka-pos --bin seed -- --count 1000
//!
//! # Specify database path
//! cargo run -p duka-pos --bin seed -- --db ./data/duka.db
//! ```
//!
//! ## Generated Products
//! Creates realistic shelf data across categories:
//! - Beverages (sodas, water, juice)
//! - Snacks (crisps, biscuits, sweets)
//! - Staples (flour, rice, sugar, tea)
//! - Dairy & bread
//! - Household (soap, detergent)
//!
//! Each product has:
//! - Unique SKU: `{CATEGORY}-{NAME}-{INDEX}`
//! - Realistic name with a size variant
//! - Price: KSh 20 - KSh 500
//! - Cost: 60-80% of price
//! - Stock: 0 - 100
//!
//! Logins created: `admin@duka.co.ke` / `admin` and `cashier@duka.co.ke` /
//! `cashier`.

use chrono::Utc;
use duka_core::{Money, Product, ProductType, Role};
use duka_pos::{Pos, PosConfig};
use std::env;
use uuid::Uuid;

/// Product categories for realistic shelf data
const CATEGORIES: &[(&str, &str, &[&str])] = &[
    (
        "BEV",
        "Beverages",
        &[
            "Coca-Cola",
            "Fanta Orange",
            "Sprite",
            "Stoney Tangawizi",
            "Krest Bitter Lemon",
            "Minute Maid Mango",
            "Dasani Water",
            "Keringet Water",
            "Afia Juice",
            "Pick N Peel Juice",
            "Lucozade",
            "Ribena",
        ],
    ),
    (
        "SNK",
        "Snacks",
        &[
            "Tropical Heat Crisps",
            "Urban Bites",
            "Manji Biscuits",
            "Britania Shortcake",
            "Nuvita Biscuits",
            "Goody Goody",
            "Big G Gum",
            "Kenafric Lollipop",
            "Groundnuts Roasted",
            "Simsim Bar",
        ],
    ),
    (
        "STP",
        "Staples",
        &[
            "Jogoo Maize Meal",
            "Soko Maize Meal",
            "Pembe Wheat Flour",
            "Exe Wheat Flour",
            "Basmati Rice",
            "Pishori Rice",
            "Mumias Sugar",
            "Kabras Sugar",
            "Kericho Gold Tea",
            "Ketepa Tea",
            "Dormans Coffee",
            "Royco Mchuzi Mix",
            "Kimbo Cooking Fat",
            "Fresh Fri Oil",
        ],
    ),
    (
        "DRY",
        "Dairy & Bread",
        &[
            "Brookside Milk",
            "KCC Milk",
            "Tuzo Milk",
            "Mala",
            "Blue Band",
            "Eggs Tray",
            "Supa Loaf",
            "Festive Bread",
            "Broadways Bread",
            "Yoghurt Vanilla",
        ],
    ),
    (
        "HSE",
        "Household",
        &[
            "Omo Detergent",
            "Sunlight Powder",
            "Geisha Soap",
            "Panga Bar Soap",
            "Jik Bleach",
            "Harpic",
            "Kiwi Shoe Polish",
            "Steel Wool",
            "Matchbox",
            "Candles Pack",
        ],
    ),
];

/// Size variants with a price addon in cents
const SIZES: &[(&str, i64)] = &[
    ("300ml", 0),
    ("500ml", 1000),
    ("1L", 2500),
    ("2L", 5000),
    ("250g", 0),
    ("500g", 1500),
    ("1kg", 3500),
    ("2kg", 8000),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    duka_pos::logging::init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 500;
    let mut db_path = String::from("./duka.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(500);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Duka POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 500)");
                println!("  -d, --db <PATH>    Database file path (default: ./duka.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Duka POS Seed Data Generator");
    println!("===============================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!();

    let config = PosConfig {
        database_path: db_path.into(),
        ..PosConfig::default()
    };
    let pos = Pos::open(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Check existing products
    let existing = pos.list_products().await?.len();
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Staff roster
    pos.create_user("Admin", "admin@duka.co.ke", "admin", Role::Admin)
        .await?;
    pos.create_user("Cashier", "cashier@duka.co.ke", "cashier", Role::Cashier)
        .await?;
    println!("✓ Created admin and cashier logins");

    // A supplier and a few regulars
    pos.create_supplier("Mombasa Wholesalers", Some("+254722000001".into()), None)
        .await?;
    pos.create_customer("Njeri Kamau", Some("+254700000001".into()), None)
        .await?;
    pos.create_customer("Otieno Odhiambo", Some("+254700000002".into()), None)
        .await?;
    println!("✓ Created 1 supplier, 2 customers");

    // Generate products
    println!();
    println!("Generating products...");

    let mut generated = 0;
    let start = std::time::Instant::now();

    'outer: for (category_idx, (code, category, names)) in CATEGORIES.iter().enumerate() {
        for (name_idx, name) in names.iter().enumerate() {
            for (size_idx, (size, price_addon)) in SIZES.iter().enumerate() {
                if generated >= count {
                    break 'outer;
                }

                let product = generate_product(
                    code,
                    category,
                    name,
                    size,
                    *price_addon,
                    category_idx * 1000 + name_idx * 20 + size_idx,
                );

                if let Err(e) = pos.save_product(product).await {
                    eprintln!("Failed to insert product: {}", e);
                    continue;
                }

                generated += 1;

                if generated % 100 == 0 {
                    println!("  Generated {} products...", generated);
                }
            }
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} products in {:?}", generated, elapsed);

    // Verify search
    println!();
    println!("Verifying search...");
    let results = pos.search_products("cola").await?;
    println!("  Search 'cola': {} results", results.len());
    let results = pos.search_products("BEV").await?;
    println!("  Search 'BEV': {} results", results.len());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Generates a single product with realistic data.
fn generate_product(
    code: &str,
    category: &str,
    name: &str,
    size: &str,
    price_addon: i64,
    seed: usize,
) -> Product {
    let now = Utc::now();

    let compact: String = name.chars().filter(|c| c.is_alphanumeric()).collect();
    let sku = format!("{}-{}-{:03}", code, compact[..3].to_uppercase(), seed);

    // EAN-13 shaped, checksum not valid
    let barcode = Some(format!("616{:010}", seed));

    // KSh 20 - KSh 500 before the size addon
    let base_price = 2000 + ((seed * 17) % 48000) as i64;
    let price = base_price + price_addon;

    // Cost 60-80% of price
    let cost_pct = 60 + (seed % 20) as i64;
    let cost = price * cost_pct / 100;

    Product {
        id: Uuid::new_v4().to_string(),
        sku,
        barcode,
        name: format!("{} {}", name, size),
        category: category.to_string(),
        product_type: ProductType::Inventory,
        price: Money::from_cents(price),
        cost: Money::from_cents(cost),
        stock: (seed % 101) as i64,
        active: true,
        created_at: now,
        updated_at: now,
    }
}
