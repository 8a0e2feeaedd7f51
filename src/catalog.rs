//! Product catalog and the search/category filter over it.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::aggregates::product::{Product, ProductError, ProductRecord};
use crate::domain::value_objects::ProductId;

const SAMPLE_PRODUCTS: &str = include_str!("../data/products.json");

/// Category selection. `All` disables category filtering.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CategoryFilter {
    #[default]
    All,
    Named(String),
}

impl CategoryFilter {
    pub const ALL: &'static str = "all";

    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Named(name) => product.category() == name,
        }
    }
}

impl From<String> for CategoryFilter {
    fn from(s: String) -> Self {
        if s == Self::ALL { Self::All } else { Self::Named(s) }
    }
}

impl From<&str> for CategoryFilter {
    fn from(s: &str) -> Self { Self::from(s.to_string()) }
}

impl From<CategoryFilter> for String {
    fn from(c: CategoryFilter) -> Self {
        match c {
            CategoryFilter::All => CategoryFilter::ALL.to_string(),
            CategoryFilter::Named(n) => n,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(Self::ALL),
            Self::Named(n) => f.write_str(n),
        }
    }
}

/// Products whose name contains `search` (case-insensitive) and whose
/// category passes `category`, in catalog order.
pub fn filter<'a>(products: &'a [Product], search: &str, category: &CategoryFilter) -> Vec<&'a Product> {
    let needle = search.to_lowercase();
    products
        .iter()
        .filter(|p| p.name().to_lowercase().contains(&needle))
        .filter(|p| category.matches(p))
        .collect()
}

/// Fixed product list for the lifetime of the process.
#[derive(Clone, Debug)]
pub struct Catalog {
    currency: String,
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(currency: &str, products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for p in &products {
            if !seen.insert(p.id()) {
                return Err(CatalogError::DuplicateId(p.id()));
            }
            if p.price().currency() != currency {
                return Err(CatalogError::Currency { product_id: p.id(), found: p.price().currency().to_string(), expected: currency.to_string() });
            }
        }
        Ok(Self { currency: currency.to_string(), products })
    }

    /// Bundled demo catalog.
    pub fn sample(currency: &str) -> Result<Self, CatalogError> {
        Self::from_json(currency, SAMPLE_PRODUCTS)
    }

    pub fn from_json(currency: &str, json: &str) -> Result<Self, CatalogError> {
        let records: Vec<ProductRecord> = serde_json::from_str(json)?;
        let products = records
            .into_iter()
            .map(|r| Product::from_record(r, currency))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(currency, products)
    }

    pub fn load(currency: &str, path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(currency, &json)
    }

    pub fn currency(&self) -> &str { &self.currency }
    pub fn products(&self) -> &[Product] { &self.products }
    pub fn len(&self) -> usize { self.products.len() }
    pub fn is_empty(&self) -> bool { self.products.is_empty() }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id() == id)
    }

    /// `all` followed by each category in order of first appearance.
    pub fn categories(&self) -> Vec<CategoryFilter> {
        let mut seen = HashSet::new();
        let mut out = vec![CategoryFilter::All];
        for p in &self.products {
            if seen.insert(p.category()) {
                out.push(CategoryFilter::Named(p.category().to_string()));
            }
        }
        out
    }

    pub fn filter(&self, search: &str, category: &CategoryFilter) -> Vec<&Product> {
        filter(&self.products, search, category)
    }
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog file unreadable: {0}")]
    Io(#[from] std::io::Error),

    #[error("Catalog JSON invalid: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Product(#[from] ProductError),

    #[error("Duplicate product id {0}")]
    DuplicateId(ProductId),

    #[error("Product {product_id} priced in {found}, catalog uses {expected}")]
    Currency { product_id: ProductId, found: String, expected: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::product::test_product;
    use rust_decimal_macros::dec;

    fn names(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.name().to_string()).collect()
    }

    #[test]
    fn test_sample_catalog_loads() {
        let catalog = Catalog::sample("RUB").unwrap();
        assert_eq!(catalog.len(), 6);
        let headphones = catalog.get(ProductId::new(1)).unwrap();
        assert_eq!(headphones.discount_badge().as_deref(), Some("-19%"));
    }

    #[test]
    fn test_categories_in_first_appearance_order() {
        let catalog = Catalog::sample("RUB").unwrap();
        let cats: Vec<String> = catalog.categories().into_iter().map(String::from).collect();
        assert_eq!(cats, vec!["all", "Аудио", "Гаджеты", "Компьютеры", "Аксессуары"]);
    }

    #[test]
    fn test_search_is_case_insensitive_and_ordered() {
        let catalog = Catalog::sample("RUB").unwrap();
        let hits = catalog.filter("БЕСПРОВОД", &CategoryFilter::All);
        assert_eq!(names(&hits), vec!["Беспроводные наушники Premium", "Беспроводная клавиатура"]);
    }

    #[test]
    fn test_empty_search_matches_everything() {
        let catalog = Catalog::sample("RUB").unwrap();
        assert_eq!(catalog.filter("", &CategoryFilter::All).len(), catalog.len());
    }

    #[test]
    fn test_unmatched_search_is_empty() {
        let catalog = Catalog::sample("RUB").unwrap();
        assert!(catalog.filter("toaster", &CategoryFilter::All).is_empty());
    }

    #[test]
    fn test_category_and_search_commute() {
        let products = vec![
            test_product(1, "Red Lamp", dec!(10), "Home"),
            test_product(2, "Red Shirt", dec!(20), "Clothes"),
            test_product(3, "Blue Lamp", dec!(30), "Home"),
        ];
        let home = CategoryFilter::from("Home");
        let both = filter(&products, "red", &home);
        assert_eq!(names(&both), vec!["Red Lamp"]);

        let by_category: Vec<Product> = filter(&products, "", &home).into_iter().cloned().collect();
        let then_search = filter(&by_category, "red", &CategoryFilter::All);
        assert_eq!(names(&then_search), names(&both));

        let again: Vec<Product> = both.into_iter().cloned().collect();
        assert_eq!(filter(&again, "red", &home).len(), 1);
    }

    #[test]
    fn test_sentinel_ignores_category() {
        let products = vec![test_product(1, "Lamp", dec!(10), "Home"), test_product(2, "Lamp Shade", dec!(5), "Decor")];
        assert_eq!(filter(&products, "lamp", &CategoryFilter::All).len(), 2);
    }

    #[test]
    fn test_category_filter_serde() {
        assert_eq!(serde_json::to_string(&CategoryFilter::All).unwrap(), "\"all\"");
        let named: CategoryFilter = serde_json::from_str("\"Аудио\"").unwrap();
        assert_eq!(named, CategoryFilter::Named("Аудио".into()));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let products = vec![test_product(1, "A", dec!(1), "X"), test_product(1, "B", dec!(2), "X")];
        assert!(matches!(Catalog::new("RUB", products), Err(CatalogError::DuplicateId(_))));
    }

    #[test]
    fn test_currency_mismatch_rejected() {
        let products = vec![test_product(1, "A", dec!(1), "X")];
        assert!(matches!(Catalog::new("USD", products), Err(CatalogError::Currency { .. })));
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(Catalog::from_json("RUB", "[{\"id\": 1}]"), Err(CatalogError::Json(_))));
    }
}
