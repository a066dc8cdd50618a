//! Fixtures
//!
//! YAML-defined restaurant catalogs for demos and integration tests. A
//! fixture set lives at `fixtures/<name>.yaml` relative to the crate root.

use std::{fs, path::PathBuf, str::FromStr};

use rust_decimal::Decimal;
use rusty_money::{Money, iso};
use serde::Deserialize;
use thiserror::Error;

use crate::catalog::{Catalog, MenuItem, Restaurant};

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),
}

#[derive(Debug, Deserialize)]
struct CatalogFixture {
    currency: String,
    restaurants: Vec<RestaurantFixture>,
}

#[derive(Debug, Deserialize)]
struct RestaurantFixture {
    name: String,
    #[serde(default)]
    image: String,
    cuisine: String,
    #[serde(default = "default_true")]
    open: bool,
    menu: Vec<MenuItemFixture>,
}

#[derive(Debug, Deserialize)]
struct MenuItemFixture {
    name: String,
    price: String,
    #[serde(default)]
    image: String,
    #[serde(default = "default_true")]
    available: bool,
    #[serde(default)]
    description: String,
}

fn default_true() -> bool {
    true
}

/// A loaded fixture set.
#[derive(Debug)]
pub struct Fixture {
    catalog: Catalog,
}

impl Fixture {
    /// Loads `fixtures/<name>.yaml`.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] if the file cannot be read, the YAML does
    /// not parse, a price is malformed, or the currency code is unknown.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("fixtures")
            .join(format!("{name}.yaml"));
        let raw = fs::read_to_string(path)?;

        Self::from_yaml(&raw)
    }

    /// Parses a fixture set from YAML text.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Fixture::from_set`], minus the file read.
    pub fn from_yaml(raw: &str) -> Result<Self, FixtureError> {
        let parsed: CatalogFixture = serde_norway::from_str(raw)?;

        let currency = iso::find(&parsed.currency)
            .ok_or_else(|| FixtureError::UnknownCurrency(parsed.currency.clone()))?;

        let mut catalog = Catalog::new();

        for restaurant in parsed.restaurants {
            let key = catalog.add_restaurant(Restaurant {
                name: restaurant.name,
                image: restaurant.image,
                is_open: restaurant.open,
                cuisine: restaurant.cuisine,
            });

            for item in restaurant.menu {
                let amount = Decimal::from_str(&item.price)
                    .map_err(|_err| FixtureError::InvalidPrice(item.price.clone()))?;

                catalog.add_menu_item(MenuItem {
                    restaurant: key,
                    name: item.name,
                    price: Money::from_decimal(amount, currency),
                    image: item.image,
                    available: item.available,
                    description: item.description,
                });
            }
        }

        Ok(Self { catalog })
    }

    /// The loaded catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    const SAMPLE: &str = r"
currency: USD
restaurants:
  - name: Tony's Pizza Palace
    cuisine: Italian
    menu:
      - name: Margherita
        price: '18.99'
      - name: Calzone
        price: '10.99'
        available: false
  - name: Night Owl Diner
    cuisine: American
    open: false
    menu:
      - name: Pancakes
        price: '7.50'
";

    #[test]
    fn parses_restaurants_and_menus() -> TestResult {
        let fixture = Fixture::from_yaml(SAMPLE)?;
        let catalog = fixture.catalog();

        assert_eq!(catalog.len(), 2);

        let (key, _) = catalog
            .restaurants()
            .find(|(_, r)| r.name == "Tony's Pizza Palace")
            .ok_or("missing restaurant")?;
        assert_eq!(catalog.menu_for(key).count(), 2);

        Ok(())
    }

    #[test]
    fn closed_flag_and_availability_carry_through() -> TestResult {
        let fixture = Fixture::from_yaml(SAMPLE)?;
        let catalog = fixture.catalog();

        let (_, diner) = catalog
            .restaurants()
            .find(|(_, r)| r.name == "Night Owl Diner")
            .ok_or("missing restaurant")?;
        assert!(!diner.is_open);

        Ok(())
    }

    #[test]
    fn malformed_price_is_reported() {
        let broken = SAMPLE.replace("'18.99'", "'eighteen'");

        assert!(matches!(
            Fixture::from_yaml(&broken),
            Err(FixtureError::InvalidPrice(_))
        ));
    }

    #[test]
    fn unknown_currency_is_reported() {
        let broken = SAMPLE.replace("USD", "ZZZ");

        assert!(matches!(
            Fixture::from_yaml(&broken),
            Err(FixtureError::UnknownCurrency(_))
        ));
    }

    #[test]
    fn shipped_storefront_set_loads() -> TestResult {
        let fixture = Fixture::from_set("storefront")?;

        assert!(!fixture.catalog().is_empty());

        Ok(())
    }
}
