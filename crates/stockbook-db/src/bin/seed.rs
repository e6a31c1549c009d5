//! # Seed Data Generator
//!
//! Populates the database with demo categories, items, purchases and sales.
//!
//! ## Usage
//! ```bash
//! # 60 days of history (default)
//! cargo run -p stockbook-db --bin seed
//!
//! # Longer history, custom database
//! cargo run -p stockbook-db --bin seed -- --days 180 --db ./data/stockbook.db
//! ```
//!
//! ## Generated Data
//! - 5 categories, 4 items each, with units
//! - One restock purchase per item every 10 days
//! - Daily sales for every item, sized so a few items run low or out
//!
//! Quantities are derived from the item index and the day offset, so two
//! runs against empty databases produce the same figures.

use anyhow::Context;
use chrono::{Duration, NaiveDate, Utc};
use clap::Parser;
use stockbook_core::{start_of_day, NewCategory, NewItem, NewPurchase, NewSale};
use stockbook_db::{Database, DbConfig};

/// Categories and their items (name, unit).
const CATALOG: &[(&str, &[(&str, Option<&str>)])] = &[
    (
        "Grains",
        &[
            ("Basmati Rice", Some("kg")),
            ("Brown Rice", Some("kg")),
            ("Wheat Flour", Some("kg")),
            ("Oats", Some("kg")),
        ],
    ),
    (
        "Beverages",
        &[
            ("Green Tea", Some("box")),
            ("Ground Coffee", Some("pack")),
            ("Orange Juice", Some("L")),
            ("Mineral Water", Some("L")),
        ],
    ),
    (
        "Spices",
        &[
            ("Black Pepper", Some("g")),
            ("Turmeric", Some("g")),
            ("Cumin", Some("g")),
            ("Cardamom", Some("g")),
        ],
    ),
    (
        "Household",
        &[
            ("Dish Soap", Some("bottle")),
            ("Laundry Powder", Some("kg")),
            ("Sponges", None),
            ("Trash Bags", Some("roll")),
        ],
    ),
    (
        "Dairy",
        &[
            ("Whole Milk", Some("L")),
            ("Butter", Some("pack")),
            ("Yogurt", Some("cup")),
            ("Cheddar", Some("kg")),
        ],
    ),
];

/// Stockbook demo data generator.
#[derive(Debug, Parser)]
#[command(name = "seed", version, about = "Stockbook demo data generator")]
struct Args {
    /// Database file path
    #[arg(short, long, default_value = "./stockbook_dev.db")]
    db: String,

    /// Days of purchase and sale history, ending today
    #[arg(short = 'n', long, default_value_t = 60)]
    days: u32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    println!("🌱 Stockbook Seed Data Generator");
    println!("================================");
    println!("Database: {}", args.db);
    println!("History:  {} days", args.days);
    println!();

    let db = Database::new(DbConfig::new(&args.db))
        .await
        .context("opening database")?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.items().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} items", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let start = std::time::Instant::now();
    let today = Utc::now().date_naive();
    let first_day = today - Duration::days(i64::from(args.days));

    let mut purchases = 0usize;
    let mut sales = 0usize;
    let mut item_seq = 0usize;

    for (category_name, items) in CATALOG {
        let category_id = db
            .categories()
            .insert(&NewCategory::new(category_name)?)
            .await?;

        for (item_name, unit) in items.iter() {
            let item_id = db
                .items()
                .insert(&NewItem::new(item_name, &category_id, *unit)?)
                .await?;

            for offset in 0..=args.days {
                let day = first_day + Duration::days(i64::from(offset));

                if offset % 10 == 0 {
                    let qty = restock_qty(item_seq, offset);
                    db.purchases()
                        .insert(&NewPurchase::new(&category_id, &item_id, qty, at(day))?)
                        .await?;
                    purchases += 1;
                }

                let qty = daily_sale_qty(item_seq, offset);
                if qty > 0 {
                    db.sales()
                        .insert(&NewSale::new(&item_id, qty, at(day))?)
                        .await?;
                    sales += 1;
                }
            }

            item_seq += 1;
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!(
        "✓ Generated {} categories, {} items, {} purchases, {} sales in {:?}",
        CATALOG.len(),
        item_seq,
        purchases,
        sales,
        elapsed
    );

    let all = db.fetch_all().await?;
    let rows = stockbook_core::stock_summary(&all.items, &all.purchases, &all.sales);
    let low = rows
        .iter()
        .filter(|r| r.level != stockbook_core::StockLevel::Healthy)
        .count();
    println!("  Items low or out of stock: {}", low);

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

fn at(day: NaiveDate) -> chrono::DateTime<Utc> {
    start_of_day(day)
}

/// Restock size: 20..=110 depending on the item.
fn restock_qty(item_seq: usize, offset: u32) -> i64 {
    20 + ((item_seq * 37 + offset as usize * 7) % 91) as i64
}

/// Daily demand: 0..=12, with every fifth item selling faster than it restocks.
fn daily_sale_qty(item_seq: usize, offset: u32) -> i64 {
    let base = ((item_seq * 13 + offset as usize * 5) % 7) as i64;
    if item_seq % 5 == 4 {
        base + 6
    } else {
        base
    }
}
