//! Product Aggregate

use rust_decimal::Decimal;
use serde::Deserialize;
use crate::domain::value_objects::{Money, ProductId};

/// Catalog entry. Immutable once loaded.
#[derive(Clone, Debug, PartialEq)]
pub struct Product {
    id: ProductId,
    name: String,
    price: Money,
    old_price: Option<Money>,
    image: String,
    category: String,
    rating: Decimal,
    reviews: u32,
    colors: Option<Vec<String>>,
    sizes: Option<Vec<String>>,
    description: String,
    features: Vec<String>,
    in_stock: bool,
}

/// Product as it appears in a catalog file. Prices are bare amounts in the
/// catalog currency.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub id: u32,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub old_price: Option<Decimal>,
    pub image: String,
    pub category: String,
    pub rating: Decimal,
    pub reviews: u32,
    #[serde(default)]
    pub colors: Option<Vec<String>>,
    #[serde(default)]
    pub sizes: Option<Vec<String>>,
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    pub in_stock: bool,
}

impl Product {
    pub fn from_record(record: ProductRecord, currency: &str) -> Result<Self, ProductError> {
        let id = ProductId::new(record.id);
        if record.name.trim().is_empty() { return Err(ProductError::MissingName(id)); }
        if record.price.is_sign_negative() { return Err(ProductError::NegativePrice(id)); }
        if record.rating < Decimal::ZERO || record.rating > Decimal::from(5) {
            return Err(ProductError::RatingOutOfRange(id, record.rating));
        }
        if record.colors.as_ref().is_some_and(Vec::is_empty) { return Err(ProductError::EmptyVariantList(id, "colors")); }
        if record.sizes.as_ref().is_some_and(Vec::is_empty) { return Err(ProductError::EmptyVariantList(id, "sizes")); }
        Ok(Self {
            id,
            name: record.name,
            price: Money::new(record.price, currency),
            old_price: record.old_price.map(|p| Money::new(p, currency)),
            image: record.image,
            category: record.category,
            rating: record.rating,
            reviews: record.reviews,
            colors: record.colors,
            sizes: record.sizes,
            description: record.description,
            features: record.features,
            in_stock: record.in_stock,
        })
    }

    pub fn id(&self) -> ProductId { self.id }
    pub fn name(&self) -> &str { &self.name }
    pub fn price(&self) -> &Money { &self.price }
    pub fn old_price(&self) -> Option<&Money> { self.old_price.as_ref() }
    pub fn image(&self) -> &str { &self.image }
    pub fn category(&self) -> &str { &self.category }
    pub fn rating(&self) -> Decimal { self.rating }
    pub fn reviews(&self) -> u32 { self.reviews }
    pub fn colors(&self) -> Option<&[String]> { self.colors.as_deref() }
    pub fn sizes(&self) -> Option<&[String]> { self.sizes.as_deref() }
    pub fn description(&self) -> &str { &self.description }
    pub fn features(&self) -> &[String] { &self.features }
    pub fn is_in_stock(&self) -> bool { self.in_stock }

    /// `round((1 - price / old_price) * 100)`, halves rounding up.
    pub fn discount_percent(&self) -> Option<i64> {
        use rust_decimal::prelude::ToPrimitive;
        let old = self.old_price.as_ref()?.amount();
        let ratio = self.price.amount().checked_div(old)?;
        let percent = (Decimal::ONE - ratio) * Decimal::ONE_HUNDRED;
        (percent + Decimal::new(5, 1)).floor().to_i64()
    }

    pub fn discount_badge(&self) -> Option<String> {
        self.discount_percent().map(|p| format!("-{}%", p))
    }

    /// Absent choices are always accepted; present ones must be declared.
    pub fn accepts_variant(&self, color: Option<&str>, size: Option<&str>) -> bool {
        fn declared(options: Option<&[String]>, choice: Option<&str>) -> bool {
            match choice {
                None => true,
                Some(c) => options.is_some_and(|opts| opts.iter().any(|o| o == c)),
            }
        }
        declared(self.colors(), color) && declared(self.sizes(), size)
    }

    pub fn default_color(&self) -> Option<&str> { self.colors().and_then(|c| c.first()).map(String::as_str) }
    pub fn default_size(&self) -> Option<&str> { self.sizes().and_then(|s| s.first()).map(String::as_str) }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProductError {
    #[error("Product {0} has no name")]
    MissingName(ProductId),
    #[error("Product {0} has a negative price")]
    NegativePrice(ProductId),
    #[error("Product {0} rating {1} is outside 0..=5")]
    RatingOutOfRange(ProductId, Decimal),
    #[error("Product {0} declares an empty {1} list")]
    EmptyVariantList(ProductId, &'static str),
}

#[cfg(test)]
pub(crate) fn test_product(id: u32, name: &str, price: Decimal, category: &str) -> Product {
    Product::from_record(
        ProductRecord {
            id, name: name.into(), price, old_price: None, image: "/placeholder.svg".into(),
            category: category.into(), rating: Decimal::new(45, 1), reviews: 10,
            colors: None, sizes: None, description: String::new(), features: vec![], in_stock: true,
        },
        "RUB",
    )
    .unwrap()
}
