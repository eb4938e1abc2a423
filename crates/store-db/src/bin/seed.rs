//! # Seed Data Generator
//!
//! Populates the database with customers, products and sales for
//! development, then runs a few sample searches.
//!
//! ## Usage
//! ```bash
//! # Generate 30 products (default), a third as many customers, and sales
//! cargo run -p store-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p store-db --bin seed -- --count 200
//!
//! # Specify database path (overrides STORE_DATABASE_PATH)
//! cargo run -p store-db --bin seed -- --db ./data/store.db
//! ```
//!
//! Log verbosity follows `STORE_LOG` (default `info`).

use std::env;
use store_core::{
    CustomerCriteria, Money, NewCustomer, NewProduct, NewSale, ProductCriteria, SaleCriteria,
};
use store_db::{Database, StoreConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const FIRST_NAMES: &[&str] = &[
    "John", "Jane", "Carlos", "Lucia", "Ahmed", "Mei", "Olga", "Pedro", "Sara", "Tomas",
];

const LAST_NAMES: &[&str] = &[
    "Doe", "Smith", "Garcia", "Lopez", "Khan", "Wang", "Petrova", "Silva", "Cohen", "Novak",
];

/// Product families with a base price in cents.
const PRODUCTS: &[(&str, &str, i64)] = &[
    ("Laptop", "Lenovo", 120_000),
    ("Mouse", "Logitech", 2_550),
    ("Keyboard", "Logitech", 4_500),
    ("Monitor", "Dell", 21_999),
    ("Headset", "Sony", 8_990),
    ("Webcam", "Logitech", 5_900),
    ("Dock", "Anker", 13_500),
    ("Charger", "Anker", 2_999),
    ("Speaker", "JBL", 6_450),
    ("Tablet", "Samsung", 39_900),
];

const VARIANTS: &[(&str, i64)] = &[("", 0), (" Pro", 2_000), (" Mini", -500)];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = StoreConfig::load()?;

    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args: Vec<String> = env::args().collect();
    let mut count: usize = 30;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(30);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    config.database_path = args[i + 1].clone().into();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Store Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 30)");
                println!("  -d, --db <PATH>    Database file path (default: $STORE_DATABASE_PATH or store.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    info!(path = %config.database_path.display(), count, "Seeding store database");

    let db = Database::new(config.db_config()).await?;

    let existing = db.products().count().await?;
    if existing > 0 {
        warn!(existing, "Database already has products, skipping seed");
    } else {
        seed(&db, count).await?;
    }

    sample_searches(&db).await?;

    db.close().await;
    Ok(())
}

async fn seed(db: &Database, count: usize) -> Result<(), Box<dyn std::error::Error>> {
    let start = std::time::Instant::now();

    let mut customer_ids = Vec::new();
    for n in 0..(count / 3).max(1) {
        let customer = db
            .customers()
            .insert(&NewCustomer {
                name: FIRST_NAMES[n % FIRST_NAMES.len()].to_string(),
                last_name: LAST_NAMES[(n / FIRST_NAMES.len() + n) % LAST_NAMES.len()].to_string(),
                dni: format!("{:08}", 10_000_000 + n),
                creation_date: None,
            })
            .await?;
        customer_ids.push(customer.id);
    }
    info!(customers = customer_ids.len(), "Customers generated");

    let mut product_ids = Vec::new();
    for n in 0..count {
        let (name, trade_mark, base) = PRODUCTS[n % PRODUCTS.len()];
        let (variant, addon) = VARIANTS[(n / PRODUCTS.len()) % VARIANTS.len()];
        let batch = n / (PRODUCTS.len() * VARIANTS.len());

        // Product names are unique, so later batches get a suffix
        let full_name = if batch == 0 {
            format!("{name}{variant}")
        } else {
            format!("{name}{variant} {}", batch + 1)
        };

        let result = db
            .products()
            .insert(&NewProduct {
                name: full_name.clone(),
                trade_mark: trade_mark.to_string(),
                price: Money::from_cents(base + addon),
                description: format!("{trade_mark} {full_name}"),
                stock: (n % 50) as i64,
                creation_date: None,
            })
            .await;

        match result {
            Ok(product) => product_ids.push(product.id),
            Err(e) => warn!(name = %full_name, error = %e, "Failed to insert product"),
        }
    }
    info!(products = product_ids.len(), "Products generated");

    let mut sales = 0;
    for (n, customer_id) in customer_ids.iter().enumerate() {
        if product_ids.is_empty() {
            break;
        }
        let picks = (0..=(n % 3))
            .map(|k| product_ids[(n * 7 + k * 3) % product_ids.len()].clone())
            .collect();

        db.sales()
            .insert(&NewSale {
                customer_id: customer_id.clone(),
                product_ids: picks,
                creation_date: None,
            })
            .await?;
        sales += 1;
    }

    info!(sales, elapsed = ?start.elapsed(), "Seed complete");
    Ok(())
}

async fn sample_searches(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    let does = db
        .customers()
        .search(&CustomerCriteria {
            last_name: Some("Doe".to_string()),
            sort_field: Some("name".to_string()),
            ..Default::default()
        })
        .await?;
    info!(count = does.len(), "Customers with last name 'Doe'");
    println!("{}", serde_json::to_string_pretty(&does)?);

    let cheapest = db
        .products()
        .search(&ProductCriteria {
            sort_field: Some("price".to_string()),
            sorting_direction: Some("asc".to_string()),
            page_size: 3,
            ..Default::default()
        })
        .await?;
    info!(count = cheapest.len(), "Cheapest products");
    println!("{}", serde_json::to_string_pretty(&cheapest)?);

    let johns = db
        .sales()
        .search(&SaleCriteria {
            customer_name: Some("john".to_string()),
            sort_field: Some("totalAmount".to_string()),
            sorting_direction: Some("desc".to_string()),
            ..Default::default()
        })
        .await?;
    info!(count = johns.len(), "Sales for customers named like 'john'");
    println!("{}", serde_json::to_string_pretty(&johns)?);

    Ok(())
}
