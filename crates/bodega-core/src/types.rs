//! # Domain Types
//!
//! Catalog entities managed from the admin dashboard and read by the
//! storefront.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Catalog Types                                   │
//! │                                                                         │
//! │  ┌─────────────────┐        ┌─────────────────┐                        │
//! │  │    Merchant     │        │    Category     │                        │
//! │  │  ─────────────  │        │  ─────────────  │                        │
//! │  │  kind: Bodegon  │        │  kind           │──┐                     │
//! │  │     | Restaurant│        │  name           │  │ 1..n                │
//! │  │  name, phone    │        └────────┬────────┘  ▼                     │
//! │  └────────┬────────┘                 │     ┌─────────────────┐         │
//! │           │ 1..n                     │     │   Subcategory   │         │
//! │           ▼                          │     │  category_id    │         │
//! │  ┌─────────────────┐                 │     └────────┬────────┘         │
//! │  │     Product     │◄────────────────┘              │ 0..1            │
//! │  │  merchant_id    │◄───────────────────────────────┘                  │
//! │  │  price_cents    │                                                   │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Money on Records
//! Records keep `price_cents: i64`. Display and form strings go through
//! [`crate::price`]; only the boundary converts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::price::{self, PriceFormat};
use crate::validation::{
    validate_name, validate_optional_text, validate_phone, validate_price_text, validate_uuid,
    MAX_ADDRESS_LEN, MAX_DESCRIPTION_LEN,
};

/// Longest accepted image or logo URL.
const MAX_URL_LEN: usize = 2048;

// =============================================================================
// Merchant Kind
// =============================================================================

/// The two kinds of merchant the platform sells for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum MerchantKind {
    /// Convenience store.
    Bodegon,
    /// Restaurant.
    Restaurant,
}

impl MerchantKind {
    /// Wire/database name.
    pub fn as_str(&self) -> &'static str {
        match self {
            MerchantKind::Bodegon => "bodegon",
            MerchantKind::Restaurant => "restaurant",
        }
    }
}

impl std::fmt::Display for MerchantKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Merchant
// =============================================================================

/// A bodegón or restaurant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Merchant {
    /// Unique identifier (UUID v4).
    pub id: String,

    pub kind: MerchantKind,

    /// Display name on the storefront.
    pub name: String,

    pub address: Option<String>,

    pub phone_number: Option<String>,

    /// Public URL of the logo in object storage.
    pub logo_url: Option<String>,

    /// Inactive merchants are hidden from the storefront.
    pub is_active: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Create/edit form payload for a merchant.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MerchantInput {
    pub kind: MerchantKind,
    pub name: String,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub logo_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl MerchantInput {
    /// Validates the form and builds a new merchant with a fresh id.
    pub fn into_merchant(self) -> CoreResult<Merchant> {
        let now = Utc::now();
        let mut merchant = Merchant {
            id: new_id(),
            kind: self.kind,
            name: String::new(),
            address: None,
            phone_number: None,
            logo_url: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.apply_to(&mut merchant)?;
        Ok(merchant)
    }

    /// Validates the form and writes it over an existing merchant.
    ///
    /// The merchant is left untouched when validation fails.
    pub fn apply_to(self, merchant: &mut Merchant) -> CoreResult<()> {
        let name = validate_name("name", &self.name)?;
        let address = validate_optional_text("address", self.address.as_deref(), MAX_ADDRESS_LEN)?;
        let phone_number = match self.phone_number.as_deref().map(str::trim) {
            Some(phone) if !phone.is_empty() => Some(validate_phone(phone)?),
            _ => None,
        };
        let logo_url = validate_optional_text("logo_url", self.logo_url.as_deref(), MAX_URL_LEN)?;

        merchant.kind = self.kind;
        merchant.name = name;
        merchant.address = address;
        merchant.phone_number = phone_number;
        merchant.logo_url = logo_url;
        merchant.is_active = self.is_active;
        merchant.updated_at = Utc::now();
        Ok(())
    }
}

// =============================================================================
// Category / Subcategory
// =============================================================================

/// A product category, scoped to one merchant kind
/// (e.g. "Bebidas" for bodegones, "Hamburguesas" for restaurants).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Category {
    pub id: String,
    pub kind: MerchantKind,
    pub name: String,
    pub image_url: Option<String>,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Create/edit form payload for a category.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategoryInput {
    pub kind: MerchantKind,
    pub name: String,
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl CategoryInput {
    /// Validates the form and builds a new category.
    pub fn into_category(self) -> CoreResult<Category> {
        let now = Utc::now();
        let mut category = Category {
            id: new_id(),
            kind: self.kind,
            name: String::new(),
            image_url: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.apply_to(&mut category)?;
        Ok(category)
    }

    /// Validates the form and writes it over an existing category.
    pub fn apply_to(self, category: &mut Category) -> CoreResult<()> {
        let name = validate_name("name", &self.name)?;
        let image_url = validate_optional_text("image_url", self.image_url.as_deref(), MAX_URL_LEN)?;

        category.kind = self.kind;
        category.name = name;
        category.image_url = image_url;
        category.is_active = self.is_active;
        category.updated_at = Utc::now();
        Ok(())
    }
}

/// A second-level grouping inside a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Subcategory {
    pub id: String,
    pub category_id: String,
    pub name: String,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Create/edit form payload for a subcategory.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubcategoryInput {
    pub category_id: String,
    pub name: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl SubcategoryInput {
    /// Validates the form and builds a new subcategory.
    pub fn into_subcategory(self) -> CoreResult<Subcategory> {
        let now = Utc::now();
        let mut subcategory = Subcategory {
            id: new_id(),
            category_id: String::new(),
            name: String::new(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.apply_to(&mut subcategory)?;
        Ok(subcategory)
    }

    /// Validates the form and writes it over an existing subcategory.
    pub fn apply_to(self, subcategory: &mut Subcategory) -> CoreResult<()> {
        validate_uuid("category_id", &self.category_id)?;
        let name = validate_name("name", &self.name)?;

        subcategory.category_id = self.category_id;
        subcategory.name = name;
        subcategory.is_active = self.is_active;
        subcategory.updated_at = Utc::now();
        Ok(())
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product sold by one merchant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    pub id: String,

    /// Owning bodegón or restaurant.
    pub merchant_id: String,

    pub category_id: String,

    pub subcategory_id: Option<String>,

    pub name: String,

    pub description: Option<String>,

    /// Price in cents.
    pub price_cents: i64,

    pub image_url: Option<String>,

    /// Unavailable products stay listed in the admin but not in the shop.
    pub is_available: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Price as a display amount.
    #[inline]
    pub fn price(&self) -> f64 {
        price::from_cents(self.price_cents)
    }

    /// Price in the default display format, e.g. `"$1.250,00"`.
    pub fn formatted_price(&self) -> String {
        PriceFormat::default().format_cents(self.price_cents)
    }

    /// Price as the edit form pre-fills it, e.g. `"1250,00"`.
    pub fn price_input_value(&self) -> String {
        price::number_to_input_value(self.price())
    }

    /// Checks that `subcategory` may be attached to this product.
    pub fn check_subcategory(&self, subcategory: &Subcategory) -> CoreResult<()> {
        if subcategory.category_id != self.category_id {
            return Err(CoreError::SubcategoryMismatch {
                subcategory_id: subcategory.id.clone(),
                category_id: self.category_id.clone(),
            });
        }
        Ok(())
    }
}

/// Create/edit form payload for a product.
///
/// `price` is the text of the masked price field (`"1.250,50"`).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductInput {
    pub merchant_id: String,
    pub category_id: String,
    pub subcategory_id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub price: String,
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_available: bool,
}

impl ProductInput {
    /// Validates the form and builds a new product.
    ///
    /// ## Example
    /// ```rust
    /// use bodega_core::types::ProductInput;
    ///
    /// let product = ProductInput {
    ///     merchant_id: "550e8400-e29b-41d4-a716-446655440000".into(),
    ///     category_id: "550e8400-e29b-41d4-a716-446655440001".into(),
    ///     subcategory_id: None,
    ///     name: "Harina PAN 1kg".into(),
    ///     description: None,
    ///     price: "1.250,50".into(),
    ///     image_url: None,
    ///     is_available: true,
    /// }
    /// .into_product()
    /// .unwrap();
    ///
    /// assert_eq!(product.price_cents, 125_050);
    /// assert_eq!(product.formatted_price(), "$1.250,50");
    /// ```
    pub fn into_product(self) -> CoreResult<Product> {
        let now = Utc::now();
        let mut product = Product {
            id: new_id(),
            merchant_id: String::new(),
            category_id: String::new(),
            subcategory_id: None,
            name: String::new(),
            description: None,
            price_cents: 0,
            image_url: None,
            is_available: true,
            created_at: now,
            updated_at: now,
        };
        self.apply_to(&mut product)?;
        Ok(product)
    }

    /// Validates the form and writes it over an existing product.
    pub fn apply_to(self, product: &mut Product) -> CoreResult<()> {
        validate_uuid("merchant_id", &self.merchant_id)?;
        validate_uuid("category_id", &self.category_id)?;
        let subcategory_id = match self.subcategory_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => {
                validate_uuid("subcategory_id", id)?;
                Some(id.to_string())
            }
            _ => None,
        };
        let name = validate_name("name", &self.name)?;
        let description = validate_optional_text(
            "description",
            self.description.as_deref(),
            MAX_DESCRIPTION_LEN,
        )?;
        let amount = validate_price_text(&self.price)?;
        let image_url = validate_optional_text("image_url", self.image_url.as_deref(), MAX_URL_LEN)?;

        product.merchant_id = self.merchant_id;
        product.category_id = self.category_id;
        product.subcategory_id = subcategory_id;
        product.name = name;
        product.description = description;
        product.price_cents = price::to_cents(amount);
        product.image_url = image_url;
        product.is_available = self.is_available;
        product.updated_at = Utc::now();
        Ok(())
    }
}

// =============================================================================
// Product Filter
// =============================================================================

/// Search and narrowing options for product listings.
///
/// Also serves as the paginator's reset dependency: any change here sends
/// the product table back to page 1.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductFilter {
    pub merchant_id: Option<String>,
    pub category_id: Option<String>,
    pub subcategory_id: Option<String>,
    /// Case-insensitive text matched against name and description.
    pub search: Option<String>,
    #[serde(default)]
    pub only_available: bool,
}

impl ProductFilter {
    /// Filter for one merchant's products.
    pub fn for_merchant(merchant_id: impl Into<String>) -> Self {
        ProductFilter {
            merchant_id: Some(merchant_id.into()),
            ..Default::default()
        }
    }

    /// Returns a copy with search text set.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// The trimmed search text, `None` when blank.
    pub fn search_text(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// True when `product` passes every set criterion.
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(id) = &self.merchant_id {
            if &product.merchant_id != id {
                return false;
            }
        }
        if let Some(id) = &self.category_id {
            if &product.category_id != id {
                return false;
            }
        }
        if let Some(id) = &self.subcategory_id {
            if product.subcategory_id.as_ref() != Some(id) {
                return false;
            }
        }
        if self.only_available && !product.is_available {
            return false;
        }

        match self.search_text() {
            Some(query) => {
                let query = query.to_lowercase();
                product.name.to_lowercase().contains(&query)
                    || product
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&query))
            }
            None => true,
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Generates a new entity id (UUID v4).
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn default_true() -> bool {
    true
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    const MERCHANT: &str = "550e8400-e29b-41d4-a716-446655440000";
    const CATEGORY: &str = "550e8400-e29b-41d4-a716-446655440001";
    const SUBCATEGORY: &str = "550e8400-e29b-41d4-a716-446655440002";

    fn product_input(price: &str) -> ProductInput {
        ProductInput {
            merchant_id: MERCHANT.to_string(),
            category_id: CATEGORY.to_string(),
            subcategory_id: Some(SUBCATEGORY.to_string()),
            name: "  Queso llanero 1kg ".to_string(),
            description: Some("Queso blanco duro".to_string()),
            price: price.to_string(),
            image_url: Some("".to_string()),
            is_available: true,
        }
    }

    #[test]
    fn test_product_from_input() {
        let product = product_input("12.505,75").into_product().unwrap();

        assert_eq!(product.name, "Queso llanero 1kg");
        assert_eq!(product.price_cents, 1_250_575);
        assert_eq!(product.price(), 12_505.75);
        assert_eq!(product.formatted_price(), "$12.505,75");
        assert_eq!(product.price_input_value(), "12505,75");
        assert_eq!(product.image_url, None);
        assert!(Uuid::parse_str(&product.id).is_ok());
    }

    #[test]
    fn test_product_input_rejects_bad_price() {
        let err = product_input("abc").into_product().unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::InvalidPrice { .. })
        ));

        let err = product_input("").into_product().unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_product_input_rejects_huge_price() {
        let err = product_input("99.999.999.999.999.999.999.999")
            .into_product()
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_apply_to_keeps_product_on_error() {
        let mut product = product_input("10").into_product().unwrap();
        let before = product.clone();

        let mut bad = product_input("10");
        bad.name = " ".to_string();
        assert!(bad.apply_to(&mut product).is_err());
        assert_eq!(product, before);

        product_input("20,5").apply_to(&mut product).unwrap();
        assert_eq!(product.price_cents, 2050);
        assert_eq!(product.id, before.id);
    }

    #[test]
    fn test_check_subcategory() {
        let product = product_input("10").into_product().unwrap();
        let mut sub = SubcategoryInput {
            category_id: CATEGORY.to_string(),
            name: "Quesos".to_string(),
            is_active: true,
        }
        .into_subcategory()
        .unwrap();
        assert!(product.check_subcategory(&sub).is_ok());

        sub.category_id = MERCHANT.to_string();
        assert!(matches!(
            product.check_subcategory(&sub),
            Err(CoreError::SubcategoryMismatch { .. })
        ));
    }

    #[test]
    fn test_merchant_input() {
        let merchant = MerchantInput {
            kind: MerchantKind::Bodegon,
            name: "Bodegón La Esquina".to_string(),
            address: Some(" Av. Principal ".to_string()),
            phone_number: Some("+58 212 5550101".to_string()),
            logo_url: None,
            is_active: true,
        }
        .into_merchant()
        .unwrap();

        assert_eq!(merchant.kind, MerchantKind::Bodegon);
        assert_eq!(merchant.address.as_deref(), Some("Av. Principal"));

        let bad_phone = MerchantInput {
            kind: MerchantKind::Restaurant,
            name: "Arepera".to_string(),
            address: None,
            phone_number: Some("not a phone".to_string()),
            logo_url: None,
            is_active: true,
        };
        assert!(bad_phone.into_merchant().is_err());
    }

    #[test]
    fn test_category_input_requires_name() {
        let input = CategoryInput {
            kind: MerchantKind::Restaurant,
            name: "".to_string(),
            image_url: None,
            is_active: true,
        };
        assert!(input.into_category().is_err());
    }

    #[test]
    fn test_product_filter() {
        let product = product_input("10").into_product().unwrap();

        assert!(ProductFilter::default().matches(&product));
        assert!(ProductFilter::for_merchant(MERCHANT).matches(&product));
        assert!(!ProductFilter::for_merchant(CATEGORY).matches(&product));

        assert!(ProductFilter::default().with_search("LLANERO").matches(&product));
        assert!(ProductFilter::default().with_search("blanco").matches(&product));
        assert!(ProductFilter::default().with_search("   ").matches(&product));
        assert!(!ProductFilter::default().with_search("harina").matches(&product));

        let by_sub = ProductFilter {
            subcategory_id: Some(SUBCATEGORY.to_string()),
            ..Default::default()
        };
        assert!(by_sub.matches(&product));

        let mut unavailable = product.clone();
        unavailable.is_available = false;
        let only_available = ProductFilter {
            only_available: true,
            ..Default::default()
        };
        assert!(!only_available.matches(&unavailable));
    }

    #[test]
    fn test_merchant_kind_wire_format() {
        assert_eq!(
            serde_json::to_string(&MerchantKind::Bodegon).unwrap(),
            "\"bodegon\""
        );
        assert_eq!(MerchantKind::Restaurant.to_string(), "restaurant");
    }
}
