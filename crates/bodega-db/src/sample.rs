//! # Sample Catalog
//!
//! The data the mock source serves and the seed binary writes: two
//! bodegones, two restaurants, their categories and a page-and-a-bit of
//! products for "Bodegón La Esquina".
//!
//! Ids are fixed so a seeded database and the mock agree.

use chrono::{DateTime, Utc};

use bodega_core::{Category, Merchant, MerchantKind, Product, Subcategory};

use crate::error::DbResult;
use crate::source::CatalogSource;

/// Deterministic, well-formed UUID v4 for sample record `n`.
pub fn sample_id(n: u32) -> String {
    format!("00000000-0000-4000-8000-{n:012}")
}

pub const LA_ESQUINA: u32 = 1;
pub const EL_PARQUE: u32 = 2;
pub const LA_PILONERA: u32 = 3;
pub const DON_LUIGI: u32 = 4;

const BEBIDAS: u32 = 101;
const VIVERES: u32 = 102;
const LACTEOS: u32 = 103;
const AREPAS: u32 = 104;
const PIZZAS: u32 = 105;

const REFRESCOS: u32 = 201;
const CERVEZAS: u32 = 202;
const HARINAS: u32 = 203;
const GRANOS: u32 = 204;
const RELLENAS: u32 = 205;

fn now() -> DateTime<Utc> {
    Utc::now()
}

fn merchant(n: u32, kind: MerchantKind, name: &str, address: &str, phone: &str) -> Merchant {
    Merchant {
        id: sample_id(n),
        kind,
        name: name.to_string(),
        address: Some(address.to_string()),
        phone_number: Some(phone.to_string()),
        logo_url: None,
        is_active: true,
        created_at: now(),
        updated_at: now(),
    }
}

/// Sample bodegones and restaurants.
pub fn merchants() -> Vec<Merchant> {
    vec![
        merchant(
            LA_ESQUINA,
            MerchantKind::Bodegon,
            "Bodegón La Esquina",
            "Av. Principal de Las Mercedes, Caracas",
            "+58 212 5550101",
        ),
        merchant(
            EL_PARQUE,
            MerchantKind::Bodegon,
            "Bodegón El Parque",
            "Calle 5, Los Palos Grandes, Caracas",
            "+58 212 5550102",
        ),
        merchant(
            LA_PILONERA,
            MerchantKind::Restaurant,
            "Arepera La Pilonera",
            "Av. Francisco de Miranda, Chacao",
            "+58 414 5550103",
        ),
        merchant(
            DON_LUIGI,
            MerchantKind::Restaurant,
            "Pizzería Don Luigi",
            "Centro Comercial El Recreo, Sabana Grande",
            "+58 424 5550104",
        ),
    ]
}

fn category(n: u32, kind: MerchantKind, name: &str) -> Category {
    Category {
        id: sample_id(n),
        kind,
        name: name.to_string(),
        image_url: None,
        is_active: true,
        created_at: now(),
        updated_at: now(),
    }
}

/// Sample categories for both merchant kinds.
pub fn categories() -> Vec<Category> {
    vec![
        category(BEBIDAS, MerchantKind::Bodegon, "Bebidas"),
        category(VIVERES, MerchantKind::Bodegon, "Víveres"),
        category(LACTEOS, MerchantKind::Bodegon, "Lácteos"),
        category(AREPAS, MerchantKind::Restaurant, "Arepas"),
        category(PIZZAS, MerchantKind::Restaurant, "Pizzas"),
    ]
}

fn subcategory(n: u32, category: u32, name: &str) -> Subcategory {
    Subcategory {
        id: sample_id(n),
        category_id: sample_id(category),
        name: name.to_string(),
        is_active: true,
        created_at: now(),
        updated_at: now(),
    }
}

/// Sample subcategories.
pub fn subcategories() -> Vec<Subcategory> {
    vec![
        subcategory(REFRESCOS, BEBIDAS, "Refrescos"),
        subcategory(CERVEZAS, BEBIDAS, "Cervezas"),
        subcategory(HARINAS, VIVERES, "Harinas"),
        subcategory(GRANOS, VIVERES, "Granos"),
        subcategory(RELLENAS, AREPAS, "Rellenas"),
    ]
}

fn product(
    n: u32,
    merchant: u32,
    category: u32,
    subcategory: Option<u32>,
    name: &str,
    price_cents: i64,
) -> Product {
    Product {
        id: sample_id(n),
        merchant_id: sample_id(merchant),
        category_id: sample_id(category),
        subcategory_id: subcategory.map(sample_id),
        name: name.to_string(),
        description: None,
        price_cents,
        image_url: None,
        is_available: true,
        created_at: now(),
        updated_at: now(),
    }
}

/// Sample products.
pub fn products() -> Vec<Product> {
    let mut products = vec![
        product(301, LA_ESQUINA, VIVERES, Some(HARINAS), "Harina PAN 1kg", 125_050),
        product(302, LA_ESQUINA, VIVERES, Some(GRANOS), "Caraotas negras 500g", 98_000),
        product(303, LA_ESQUINA, VIVERES, Some(GRANOS), "Arroz Mary 1kg", 110_000),
        product(304, LA_ESQUINA, VIVERES, None, "Aceite Vatel 1L", 310_075),
        product(305, LA_ESQUINA, BEBIDAS, Some(REFRESCOS), "Malta Polar 355ml", 45_000),
        product(306, LA_ESQUINA, BEBIDAS, Some(REFRESCOS), "Frescolita 2L", 150_000),
        product(307, LA_ESQUINA, BEBIDAS, Some(CERVEZAS), "Cerveza Polar Pilsen 6-pack", 720_000),
        product(308, LA_ESQUINA, BEBIDAS, Some(CERVEZAS), "Cerveza Solera Verde 6-pack", 780_000),
        product(309, LA_ESQUINA, LACTEOS, None, "Queso llanero 1kg", 1_250_575),
        product(310, LA_ESQUINA, LACTEOS, None, "Leche completa 1L", 130_000),
        product(311, LA_ESQUINA, LACTEOS, None, "Mantequilla Mavesa 500g", 260_000),
        product(312, LA_ESQUINA, VIVERES, Some(HARINAS), "Harina de trigo Robin Hood 1kg", 140_000),
        product(313, EL_PARQUE, BEBIDAS, Some(REFRESCOS), "Pepsi 1.5L", 120_000),
        product(314, EL_PARQUE, VIVERES, Some(HARINAS), "Harina Juana 1kg", 118_000),
        product(315, LA_PILONERA, AREPAS, Some(RELLENAS), "Arepa reina pepiada", 450_000),
        product(316, LA_PILONERA, AREPAS, Some(RELLENAS), "Arepa pabellón", 520_000),
        product(317, LA_PILONERA, AREPAS, None, "Arepa viuda", 150_000),
        product(318, DON_LUIGI, PIZZAS, None, "Pizza margarita familiar", 1_100_000),
        product(319, DON_LUIGI, PIZZAS, None, "Pizza cuatro quesos familiar", 1_350_000),
    ];

    products[0].description = Some("Harina de maíz blanco precocida".to_string());
    products[8].description = Some("Queso blanco duro".to_string());
    products[16].is_available = false;
    products
}

/// Writes the whole sample catalog through `source`.
///
/// Returns the number of products written.
pub async fn load_into(source: &dyn CatalogSource) -> DbResult<usize> {
    for merchant in merchants() {
        source.save_merchant(&merchant).await?;
    }
    for category in categories() {
        source.save_category(&category).await?;
    }
    for subcategory in subcategories() {
        source.save_subcategory(&subcategory).await?;
    }

    let products = products();
    for product in &products {
        source.save_product(product).await?;
    }
    Ok(products.len())
}
