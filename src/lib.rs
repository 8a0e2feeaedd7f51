//! Storefront
//!
//! Single-page storefront demo over a fixed in-memory catalog.
//!
//! ## Features
//! - Catalog search and category filtering
//! - Cart with per-variant lines addressed by durable ids
//! - Favorites
//! - Checkout form, delivery fees and order submission
//! - JSON view state for any presentation layer

pub mod catalog;
pub mod config;
pub mod domain;
pub mod http;
pub mod services;
pub mod session;
pub mod view;

pub use catalog::{Catalog, CatalogError, CategoryFilter};
pub use config::{ConfigError, StorefrontConfig};
pub use domain::aggregates::{Cart, CartLine, DeliveryFees, DeliveryMethod, PaymentMethod, Product};
pub use domain::value_objects::{LineId, Money, ProductId, Quantity};
pub use services::{AcknowledgingSubmitter, OrderSubmissionService, SubmissionError};
pub use session::{Action, CheckoutStatus, SessionState, Storefront};
pub use view::StorefrontView;

use thiserror::Error;

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum StorefrontError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Session not found")]
    SessionNotFound,

    #[error("Session limit of {0} reached")]
    SessionLimit(usize),
}

pub type Result<T> = std::result::Result<T, StorefrontError>;

/// Loads the configured catalog, falling back to the bundled sample.
pub fn load_catalog(config: &StorefrontConfig) -> Result<Catalog> {
    let catalog = match &config.catalog_path {
        Some(path) => Catalog::load(&config.currency, path)?,
        None => Catalog::sample(&config.currency)?,
    };
    tracing::info!(products = catalog.len(), currency = catalog.currency(), "catalog loaded");
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_sample_catalog() {
        let catalog = load_catalog(&StorefrontConfig::default()).unwrap();
        assert_eq!(catalog.len(), 6);
    }

    #[test]
    fn test_missing_catalog_file() {
        let config = StorefrontConfig { catalog_path: Some("/nonexistent/products.json".into()), ..Default::default() };
        assert!(matches!(load_catalog(&config), Err(StorefrontError::Catalog(CatalogError::Io(_)))));
    }
}
