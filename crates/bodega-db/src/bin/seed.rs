//! # Seed Data Generator
//!
//! Writes the sample catalog into a SQLite database for development and
//! prints the first product page the admin would show.
//!
//! ## Usage
//! ```bash
//! # Seed ./bodega_dev.db (or database.path from bodega.toml)
//! cargo run -p bodega-db --bin seed
//!
//! # Specify database path
//! cargo run -p bodega-db --bin seed -- --db ./data/catalog.db
//!
//! # Page size for the preview
//! cargo run -p bodega-db --bin seed -- --page-size 25
//! ```

use std::env;
use std::path::PathBuf;

use bodega_core::price::format_price;
use bodega_core::{visible_pages, PageItem, ProductFilter};
use bodega_db::sample::{self, LA_ESQUINA};
use bodega_db::{paginate_products, BackendConfig, CatalogSource, Database};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,bodega=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    let mut db_path: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut page_size: Option<usize> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-d" | "--db" => {
                if i + 1 < args.len() {
                    db_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "-c" | "--config" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "-p" | "--page-size" => {
                if i + 1 < args.len() {
                    page_size = args[i + 1].parse().ok();
                    i += 1;
                }
            }
            "-h" | "--help" => {
                println!("Bodega Admin Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>         Database file (default: config or ./bodega_dev.db)");
                println!("  -c, --config <PATH>     bodega.toml to read");
                println!("  -p, --page-size <N>     Rows in the preview page");
                println!("  -h, --help              Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let mut config = BackendConfig::load(config_path)?;
    if let Some(size) = page_size {
        config.catalog.default_page_size = size;
        config.validate()?;
    }

    let db_path = db_path
        .or_else(|| config.database.path.clone())
        .unwrap_or_else(|| PathBuf::from("./bodega_dev.db"));
    config.database.path = Some(db_path.clone());

    println!("🌱 Bodega Admin Seed Data Generator");
    println!("===================================");
    println!("Database: {}", db_path.display());
    println!();

    let db_config = config
        .database
        .db_config()
        .ok_or("database path missing")?;
    let db = Database::new(db_config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.list_products(&ProductFilter::default()).await?.len();
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
    } else {
        let start = std::time::Instant::now();
        let written = sample::load_into(&db).await?;
        println!("✓ Seeded {} products in {:?}", written, start.elapsed());
    }

    // Preview what the products table shows for the first bodegón
    let merchant = db.get_merchant(&sample::sample_id(LA_ESQUINA)).await?;
    let filter = ProductFilter::for_merchant(merchant.id.clone());
    let mut paginator = config.catalog.paginator(filter.clone());
    let page = paginate_products(&db, &filter, &mut paginator).await?;

    println!();
    println!(
        "{} (page {}/{}, {} products)",
        merchant.name, page.current_page, page.total_pages, page.total_items
    );
    for product in &page.data {
        println!("  {:<40} {:>14}", product.name, format_price(product.price()));
    }

    let controls: Vec<String> = visible_pages(page.current_page, page.total_pages)
        .into_iter()
        .map(|item| match item {
            PageItem::Page(n) => n.to_string(),
            PageItem::Ellipsis => "…".to_string(),
        })
        .collect();
    println!("  Pages: {}", controls.join(" "));

    db.close().await;
    println!();
    println!("✓ Seed complete!");

    Ok(())
}
