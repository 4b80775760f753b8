//! # Seed Data Generator
//!
//! Populates the database with vendors, products and ledger history for
//! development.
//!
//! ## Usage
//! ```bash
//! # 200 products (default)
//! cargo run -p stockroom-db --bin seed
//!
//! # Custom amount
//! cargo run -p stockroom-db --bin seed -- --count 1000
//!
//! # Specify database path
//! cargo run -p stockroom-db --bin seed -- --db ./data/inventory.db
//! ```
//!
//! ## Generated Data
//! - One vendor per supplier in [`VENDORS`]
//! - Products cycling through [`ITEMS`] and [`SIZES`], assigned round-robin
//!   to vendors, with stock spread between 0 and 40 so the low-stock report
//!   has something to show
//! - A restock and a sale through the ledger for every third product

use std::env;
use std::time::Instant;

use stockroom_core::{Money, NewProduct, NewTransaction, NewVendor};
use stockroom_db::{Database, DbConfig};

/// (name, email domain, phone)
const VENDORS: &[(&str, &str, &str)] = &[
    ("Northwind Traders", "northwind.test", "555-0101"),
    ("Acme Supply Co", "acme.test", "555-0102"),
    ("Globex Wholesale", "globex.test", "555-0103"),
    ("Initech Parts", "initech.test", "555-0104"),
];

/// (name, base price in cents)
const ITEMS: &[(&str, i64)] = &[
    ("Hex Bolt", 45),
    ("Wood Screw", 12),
    ("Wall Anchor", 30),
    ("Hinge", 399),
    ("Drawer Slide", 1299),
    ("Cabinet Knob", 249),
    ("Shelf Bracket", 575),
    ("Door Stop", 199),
    ("Cable Tie", 9),
    ("Pipe Clamp", 325),
];

/// (label, price addon in cents)
const SIZES: &[(&str, i64)] = &[("Small", 0), ("Medium", 25), ("Large", 60), ("Bulk", 400)];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut db_path = String::from("./inventory.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(200);
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
                println!("Stockroom Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 200)");
                println!("  -d, --db <PATH>    Database file path (default: ./inventory.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Stockroom Seed Data Generator");
    println!("=============================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database, migrations applied");

    let existing = db.vendors().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} vendors", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let start = Instant::now();

    let mut vendor_ids = Vec::with_capacity(VENDORS.len());
    for (name, domain, phone) in VENDORS {
        let vendor = db
            .vendors()
            .create(&NewVendor {
                name: name.to_string(),
                contact_email: format!("orders@{domain}"),
                phone: phone.to_string(),
            })
            .await?;
        vendor_ids.push(vendor.id);
    }
    println!("✓ Created {} vendors", vendor_ids.len());

    let mut products = 0;
    let mut transactions = 0;

    for n in 0..count {
        let (item, base_price) = ITEMS[n % ITEMS.len()];
        let (size, addon) = SIZES[(n / ITEMS.len()) % SIZES.len()];
        let batch = n / (ITEMS.len() * SIZES.len());

        let new_product = NewProduct {
            name: if batch == 0 {
                format!("{item} ({size})")
            } else {
                format!("{item} ({size}) #{batch}")
            },
            description: Some(format!("{size} {}", item.to_lowercase())),
            price: Money::from_cents(base_price + addon),
            quantity: ((n * 7) % 41) as i64,
            vendor_id: vendor_ids[n % vendor_ids.len()],
        };

        let product = match db.products().create(&new_product).await {
            Ok(product) => product,
            Err(e) => {
                eprintln!("Failed to insert {}: {}", new_product.name, e);
                continue;
            }
        };
        products += 1;

        if n % 3 == 0 {
            for delta in [12, -5] {
                let request = NewTransaction {
                    product_id: product.id,
                    vendor_id: None,
                    quantity: delta,
                };
                match db.transactions().record(&request).await {
                    Ok(_) => transactions += 1,
                    Err(e) => eprintln!("Failed to record {delta} for {}: {}", product.name, e),
                }
            }
        }

        if products % 100 == 0 {
            println!("  Generated {} products...", products);
        }
    }

    println!();
    println!(
        "✓ Generated {} products and {} transactions in {:?}",
        products,
        transactions,
        start.elapsed()
    );

    let low = db
        .products()
        .list_low_stock(stockroom_core::DEFAULT_LOW_STOCK_THRESHOLD)
        .await?;
    println!("  {} products below the low-stock threshold", low.len());

    db.close().await;
    Ok(())
}
