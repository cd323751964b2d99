//! # Seed Data Generator
//!
//! Populates a development database with a demo catalog and a little
//! sale history, so the analytics and transaction screens have
//! something to show.
//!
//! ## Usage
//! ```bash
//! # Seed the default development database
//! cargo run -p mezban-db --bin seed
//!
//! # Specify database path
//! cargo run -p mezban-db --bin seed -- --db ./data/mezban.db
//! ```

use std::env;

use mezban_core::{NewProduct, NewSaleLine};
use mezban_db::{Store, StoreConfig};

/// Demo menu: (name, price in cents, unit).
const MENU: &[(&str, i64, &str)] = &[
    ("Tea", 200, "item"),
    ("Doodh Patti", 250, "item"),
    ("Lassi", 150, "item"),
    ("Chicken Karahi", 1250, "item"),
    ("Mutton Karahi", 1850, "item"),
    ("Chicken Biryani", 450, "item"),
    ("Naan", 30, "item"),
    ("Roghni Naan", 60, "item"),
    ("Samosa", 50, "item"),
    ("Basmati Rice", 250, "kg"),
    ("Daal Chana", 99, "kg"),
    ("Mango Juice", 180, "litre"),
];

/// Demo sales: each entry is a list of (menu index, quantity).
const SALES: &[&[(usize, f64)]] = &[
    &[(0, 3.0)],
    &[(3, 1.0), (6, 4.0), (2, 2.0)],
    &[(5, 2.0), (6, 2.0)],
    &[(9, 0.5), (10, 1.5)],
    &[(0, 2.0), (8, 6.0)],
    &[(4, 1.0), (7, 3.0), (11, 0.5)],
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./mezban_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Mezban POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./mezban_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Mezban POS Seed Data Generator");
    println!("=================================");
    println!("Database: {db_path}");
    println!();

    let store = Store::open(StoreConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Check existing products
    let existing = store.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {existing} products");
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Seeding catalog...");
    for (name, price_cents, unit) in MENU {
        store
            .products()
            .add(&NewProduct {
                name: (*name).to_string(),
                price_cents: *price_cents,
                unit: (*unit).to_string(),
            })
            .await?;
    }
    println!("  {} products added", MENU.len());

    println!("Recording demo sales...");
    let currency = store.settings().get().await?.currency;
    for items in SALES {
        let lines: Vec<NewSaleLine> = items
            .iter()
            .map(|(idx, quantity)| {
                let (name, price_cents, unit) = MENU[*idx];
                NewSaleLine {
                    name: name.to_string(),
                    unit_price_cents: price_cents,
                    quantity: *quantity,
                    unit: unit.to_string(),
                }
            })
            .collect();
        store.sales().record(&lines, &currency).await?;
    }
    println!("  {} sales recorded", SALES.len());

    let snapshot = store.analytics().snapshot(None).await?;
    println!();
    println!("Analytics preview:");
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
