//! # Seed Data Generator
//!
//! Populates the database with test customers and supply entries for
//! development.
//!
//! ## Usage
//! ```bash
//! # Seed 25 customers (default)
//! cargo run -p jalbook-db --bin seed
//!
//! # Custom amount
//! cargo run -p jalbook-db --bin seed -- --customers 50
//!
//! # Specify database path
//! cargo run -p jalbook-db --bin seed -- --db ./data/jalbook.db
//! ```
//!
//! ## Generated Data
//! Each customer gets a handful of supply sessions spread over the last few
//! weeks, across the standard crop schedule, and a partial payment so the
//! dashboard shows a realistic mix of paid and pending balances.

use chrono::{Duration, Utc};
use std::env;

use jalbook_core::{charge, Money, RateTable};
use jalbook_db::{Database, DbConfig};

const FIRST_NAMES: &[&str] = &[
    "Ramesh", "Suresh", "Mahesh", "Anita", "Savita", "Prakash", "Ganesh", "Kavita", "Dinesh",
    "Sunita", "Vilas", "Shobha", "Baban", "Manda", "Tukaram",
];

const LAST_NAMES: &[&str] = &[
    "Patil", "Jadhav", "Pawar", "More", "Shinde", "Kale", "Deshmukh", "Gaikwad",
];

const VILLAGES: &[&str] = &[
    "Shirpur", "Akoli", "Nandgaon", "Pimpalgaon", "Wadgaon", "Kothali",
];

const CROPS: &[&str] = &["Rice", "Wheat", "Sugarcane", "Cotton", "Maize", "Vegetables"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Library logs stay quiet unless RUST_LOG asks for them
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 25;
    let mut db_path = String::from("./jalbook_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--customers" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(25);
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
                println!("JalBook Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --customers <N>  Number of customers to generate (default: 25)");
                println!("  -d, --db <PATH>      Database file path (default: ./jalbook_dev.db)");
                println!("  -h, --help           Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 JalBook Seed Data Generator");
    println!("==============================");
    println!("Database:  {}", db_path);
    println!("Customers: {}", count);
    println!();

    // Connect to database
    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Check existing customers
    let existing = db.customers().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} customers", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating customers and entries...");

    let rates = RateTable::standard();
    let ledger = db.ledger();
    let customers = db.customers();
    let now = Utc::now();

    let mut entries_created = 0;
    let start_time = std::time::Instant::now();

    for n in 0..count {
        let name = format!(
            "{} {}",
            FIRST_NAMES[n % FIRST_NAMES.len()],
            LAST_NAMES[(n / FIRST_NAMES.len() + n) % LAST_NAMES.len()]
        );
        let mobile = format!("98{:08}", 10000000 + n * 7919);
        let village = VILLAGES[n % VILLAGES.len()];

        let customer = customers.create(&name, &mobile, village).await?;

        // A few sessions per customer, spread over the past weeks
        let sessions = 2 + n % 4;
        for s in 0..sessions {
            let days_ago = (1 + (n * 5 + s * 9) % 28) as i64;
            let start_hour = (5 + (n + s * 3) % 16) as i64;
            let length_minutes = (60 + ((n * 13 + s * 37) % 300)) as i64;

            let start = now - Duration::days(days_ago) - Duration::hours(start_hour);
            let end = start + Duration::minutes(length_minutes);
            let crop = CROPS[(n + s) % CROPS.len()];

            let session_charge = charge::calculate(start, end, crop, &rates)?;
            ledger
                .add_entry(&customer.id, start, end, crop, session_charge)
                .await?;
            entries_created += 1;
        }

        // Roughly half the customers have paid something
        if n % 2 == 0 {
            let loaded = customers.get_by_id(&customer.id).await?.unwrap();
            let payment = loaded.pending_amount.rupees() * 2 / 3;
            if payment > 0 {
                ledger
                    .record_payment(&customer.id, Money::from_rupees(payment))
                    .await?;
            }
        }

        if (n + 1) % 10 == 0 {
            println!("  Generated {} customers...", n + 1);
        }
    }

    let elapsed = start_time.elapsed();
    println!();
    println!(
        "✓ Generated {} customers with {} entries in {:?}",
        count, entries_created, elapsed
    );

    // Verify the books balance
    println!();
    println!("Verifying balances...");
    let pending = db.reports().total_pending().await?;
    println!("  Total pending across customers: {}", pending);

    let recent = db.reports().recent_activity(5).await?;
    println!("  Recent entries: {}", recent.len());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
