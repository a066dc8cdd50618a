//! Catalog
//!
//! Read-only reference data: the restaurants on the storefront and their
//! menus. The catalog has no lifecycle of its own here; it is sourced
//! externally (see [`crate::fixtures`]) and only gates what may enter a cart.

use rusty_money::{Money, iso::Currency};
use slotmap::{SlotMap, new_key_type};
use thiserror::Error;

use crate::cart::NewCartItem;

new_key_type! {
    /// Restaurant Key
    pub struct RestaurantKey;

    /// Menu Item Key
    pub struct MenuItemKey;
}

/// A restaurant listed on the storefront grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Restaurant {
    /// Display name
    pub name: String,

    /// Header image URL
    pub image: String,

    /// Whether the restaurant is currently accepting orders
    pub is_open: bool,

    /// Cuisine label shown on the grid
    pub cuisine: String,
}

/// A dish on a restaurant's menu.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    /// Owning restaurant
    pub restaurant: RestaurantKey,

    /// Display name
    pub name: String,

    /// Unit price
    pub price: Money<'static, Currency>,

    /// Image URL
    pub image: String,

    /// Whether the dish can currently be ordered
    pub available: bool,

    /// Short description shown on the detail page
    pub description: String,
}

/// Errors raised when turning a menu selection into a cart line.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    /// The menu item key does not exist in the catalog.
    #[error("menu item not found")]
    UnknownMenuItem,

    /// The item references a restaurant missing from the catalog.
    #[error("restaurant not found")]
    UnknownRestaurant,

    /// The restaurant is closed; nothing on its menu may be ordered.
    #[error("{0} is currently closed")]
    RestaurantClosed(String),

    /// The dish is marked unavailable.
    #[error("{0} is currently unavailable")]
    ItemUnavailable(String),

    /// Quantity must be at least one.
    #[error("quantity must be at least 1")]
    ZeroQuantity,
}

/// The restaurants and menu items known to the storefront.
#[derive(Debug, Default)]
pub struct Catalog {
    restaurants: SlotMap<RestaurantKey, Restaurant>,
    menu_items: SlotMap<MenuItemKey, MenuItem>,
}

impl Catalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a restaurant and returns its key.
    pub fn add_restaurant(&mut self, restaurant: Restaurant) -> RestaurantKey {
        self.restaurants.insert(restaurant)
    }

    /// Adds a menu item and returns its key.
    pub fn add_menu_item(&mut self, item: MenuItem) -> MenuItemKey {
        self.menu_items.insert(item)
    }

    /// Looks up a restaurant.
    #[must_use]
    pub fn restaurant(&self, key: RestaurantKey) -> Option<&Restaurant> {
        self.restaurants.get(key)
    }

    /// Looks up a menu item.
    #[must_use]
    pub fn menu_item(&self, key: MenuItemKey) -> Option<&MenuItem> {
        self.menu_items.get(key)
    }

    /// Iterates over all restaurants.
    pub fn restaurants(&self) -> impl Iterator<Item = (RestaurantKey, &Restaurant)> {
        self.restaurants.iter()
    }

    /// Iterates over the menu of one restaurant.
    pub fn menu_for(&self, key: RestaurantKey) -> impl Iterator<Item = (MenuItemKey, &MenuItem)> {
        self.menu_items
            .iter()
            .filter(move |(_, item)| item.restaurant == key)
    }

    /// Number of restaurants in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.restaurants.len()
    }

    /// Whether the catalog has no restaurants.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.restaurants.is_empty()
    }

    /// Turns a menu selection into a cart line, enforcing the add-to-cart
    /// gates: the restaurant must be open and the dish available.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::UnknownMenuItem`] / [`CatalogError::UnknownRestaurant`]
    ///   for dangling keys.
    /// - [`CatalogError::RestaurantClosed`] when the restaurant is not open.
    /// - [`CatalogError::ItemUnavailable`] when the dish is unavailable.
    /// - [`CatalogError::ZeroQuantity`] when `quantity` is zero.
    pub fn order_line(
        &self,
        item: MenuItemKey,
        quantity: u32,
    ) -> Result<NewCartItem, CatalogError> {
        let item = self.menu_item(item).ok_or(CatalogError::UnknownMenuItem)?;
        let restaurant = self
            .restaurant(item.restaurant)
            .ok_or(CatalogError::UnknownRestaurant)?;

        if !restaurant.is_open {
            return Err(CatalogError::RestaurantClosed(restaurant.name.clone()));
        }

        if !item.available {
            return Err(CatalogError::ItemUnavailable(item.name.clone()));
        }

        if quantity == 0 {
            return Err(CatalogError::ZeroQuantity);
        }

        Ok(NewCartItem {
            name: item.name.clone(),
            unit_price: item.price,
            quantity,
            restaurant_name: restaurant.name.clone(),
        })
    }
}
