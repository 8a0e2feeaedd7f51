//! Environment-driven configuration.

use std::path::PathBuf;
use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::aggregates::order::DeliveryFees;

#[derive(Clone, Debug, PartialEq)]
pub struct StorefrontConfig {
    pub port: u16,
    pub currency: String,
    pub fees: DeliveryFees,
    /// Custom product list; the bundled sample is used when unset.
    pub catalog_path: Option<PathBuf>,
    /// Upper bound on live sessions held by the HTTP adapter.
    pub max_sessions: usize,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self { port: 8083, currency: "RUB".to_string(), fees: DeliveryFees::default(), catalog_path: None, max_sessions: 1000 }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{name} has an invalid value {value:?}: {reason}")]
    Invalid { name: &'static str, value: String, reason: String },
}

impl StorefrontConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let port = parse(&lookup, "PORT", defaults.port)?;
        let currency = lookup("STOREFRONT_CURRENCY")
            .map(|c| c.trim().to_uppercase())
            .filter(|c| !c.is_empty())
            .unwrap_or(defaults.currency);
        let fees = DeliveryFees {
            courier: parse_fee(&lookup, "COURIER_DELIVERY_FEE", defaults.fees.courier)?,
            pickup: defaults.fees.pickup,
            post: parse_fee(&lookup, "POST_DELIVERY_FEE", defaults.fees.post)?,
        };
        let catalog_path = lookup("CATALOG_PATH").filter(|p| !p.trim().is_empty()).map(PathBuf::from);
        let max_sessions = parse(&lookup, "MAX_SESSIONS", defaults.max_sessions)?;
        if max_sessions == 0 {
            return Err(ConfigError::Invalid { name: "MAX_SESSIONS", value: "0".into(), reason: "must be at least 1".into() });
        }
        Ok(Self { port, currency, fees, catalog_path, max_sessions })
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid { name, reason: e.to_string(), value }),
    }
}

fn parse_fee(lookup: &impl Fn(&str) -> Option<String>, name: &'static str, default: Decimal) -> Result<Decimal, ConfigError> {
    let fee: Decimal = parse(lookup, name, default)?;
    if fee.is_sign_negative() {
        return Err(ConfigError::Invalid { name, value: fee.to_string(), reason: "fee cannot be negative".into() });
    }
    Ok(fee)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn test_defaults() {
        let cfg = StorefrontConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, StorefrontConfig::default());
        assert_eq!(cfg.fees.courier, dec!(350));
        assert_eq!(cfg.fees.post, dec!(0));
        assert_eq!(cfg.max_sessions, 1000);
    }

    #[test]
    fn test_overrides() {
        let cfg = StorefrontConfig::from_lookup(lookup(&[
            ("PORT", "9000"),
            ("STOREFRONT_CURRENCY", "usd"),
            ("COURIER_DELIVERY_FEE", "4.99"),
            ("POST_DELIVERY_FEE", "2.50"),
            ("CATALOG_PATH", "/srv/products.json"),
            ("MAX_SESSIONS", "25"),
        ]))
        .unwrap();
        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.currency, "USD");
        assert_eq!(cfg.fees.courier, dec!(4.99));
        assert_eq!(cfg.fees.post, dec!(2.50));
        assert_eq!(cfg.catalog_path, Some(PathBuf::from("/srv/products.json")));
        assert_eq!(cfg.max_sessions, 25);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            StorefrontConfig::from_lookup(lookup(&[("PORT", "eighty")])),
            Err(ConfigError::Invalid { name: "PORT", .. })
        ));
        assert!(matches!(
            StorefrontConfig::from_lookup(lookup(&[("POST_DELIVERY_FEE", "-1")])),
            Err(ConfigError::Invalid { name: "POST_DELIVERY_FEE", .. })
        ));
        assert!(matches!(
            StorefrontConfig::from_lookup(lookup(&[("MAX_SESSIONS", "0")])),
            Err(ConfigError::Invalid { name: "MAX_SESSIONS", .. })
        ));
        assert!(matches!(
            StorefrontConfig::from_lookup(lookup(&[("MAX_SESSIONS", "-3")])),
            Err(ConfigError::Invalid { name: "MAX_SESSIONS", .. })
        ));
    }
}
