//! Cart
//!
//! The cart holds the line items for at most one restaurant at a time. All
//! mutation goes through [`Cart::add`], [`Cart::set_quantity`] and
//! [`Cart::clear`]; a cross-restaurant add fails with
//! [`CartError::RestaurantConflict`] and must be arbitrated by the
//! [switch guard](crate::guard) instead.

use std::fmt;

use rust_decimal::Decimal;
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;
use tracing::debug;

use crate::ids::IdSource;

/// Errors related to cart mutation or totals.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// The attempted item belongs to a different restaurant than the cart.
    #[error("cart holds items from {current}; cannot add an item from {attempted}")]
    RestaurantConflict {
        /// Restaurant currently owning the cart.
        current: String,
        /// Restaurant of the attempted item.
        attempted: String,
    },

    /// An item's currency differs from the cart currency.
    #[error("item has currency {0}, but cart has currency {1}")]
    CurrencyMismatch(&'static str, &'static str),

    /// Items enter the cart with quantity of at least one.
    #[error("quantity must be at least 1")]
    ZeroQuantity,

    /// Wrapped money arithmetic error from totalling.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Identifier of a line item, unique within a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CartItemId(u64);

impl CartItemId {
    /// Wraps a raw id.
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for CartItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A line item yet to be added; the cart assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartItem {
    /// Dish name
    pub name: String,

    /// Price per unit
    pub unit_price: Money<'static, Currency>,

    /// Units ordered, at least one
    pub quantity: u32,

    /// Restaurant the dish belongs to
    pub restaurant_name: String,
}

/// A line item in the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    id: CartItemId,
    name: String,
    unit_price: Money<'static, Currency>,
    quantity: u32,
    restaurant_name: String,
}

impl CartItem {
    /// Id of this line item.
    #[must_use]
    pub fn id(&self) -> CartItemId {
        self.id
    }

    /// Dish name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Price per unit.
    #[must_use]
    pub fn unit_price(&self) -> &Money<'static, Currency> {
        &self.unit_price
    }

    /// Units ordered.
    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Restaurant the dish belongs to.
    #[must_use]
    pub fn restaurant_name(&self) -> &str {
        &self.restaurant_name
    }

    /// Line total: unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Money<'static, Currency> {
        let amount = self.unit_price.amount() * Decimal::from(self.quantity);

        Money::from_decimal(amount, self.unit_price.currency())
    }
}

/// Cart
///
/// Owned, single-writer store for the customer's current order.
#[derive(Debug)]
pub struct Cart {
    items: Vec<CartItem>,
    currency: &'static Currency,
}

impl Cart {
    /// Creates an empty cart in the given currency.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            items: Vec::new(),
            currency,
        }
    }

    /// Appends a line item with a freshly assigned id.
    ///
    /// # Errors
    ///
    /// - [`CartError::RestaurantConflict`] when the cart is non-empty and the
    ///   item's restaurant differs; the cart is left untouched and the caller
    ///   should route the item through the switch guard.
    /// - [`CartError::CurrencyMismatch`] when the item's currency differs
    ///   from the cart currency.
    /// - [`CartError::ZeroQuantity`] when the quantity is zero.
    pub fn add(
        &mut self,
        item: NewCartItem,
        ids: &mut dyn IdSource,
    ) -> Result<CartItemId, CartError> {
        let item_currency = item.unit_price.currency();
        if item_currency != self.currency {
            return Err(CartError::CurrencyMismatch(
                item_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        if item.quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }

        if let Some(current) = self.restaurant_name()
            && current != item.restaurant_name
        {
            return Err(CartError::RestaurantConflict {
                current: current.to_string(),
                attempted: item.restaurant_name,
            });
        }

        let id = CartItemId::new(ids.next());
        debug!(%id, name = %item.name, quantity = item.quantity, "cart item added");

        self.items.push(CartItem {
            id,
            name: item.name,
            unit_price: item.unit_price,
            quantity: item.quantity,
            restaurant_name: item.restaurant_name,
        });

        Ok(id)
    }

    /// Replaces an item's quantity; zero removes the item. Unknown ids are a
    /// silent no-op, so repeating a removal changes nothing.
    pub fn set_quantity(&mut self, id: CartItemId, quantity: u32) {
        if quantity == 0 {
            let before = self.items.len();
            self.items.retain(|item| item.id != id);

            if self.items.len() < before {
                debug!(%id, "cart item removed");
            }
        } else if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            item.quantity = quantity;
            debug!(%id, quantity, "cart item quantity changed");
        }
    }

    /// Empties the cart unconditionally.
    pub fn clear(&mut self) {
        if !self.items.is_empty() {
            debug!(items = self.items.len(), "cart cleared");
        }

        self.items.clear();
    }

    /// The restaurant owning the cart, or `None` when empty.
    #[must_use]
    pub fn restaurant_name(&self) -> Option<&str> {
        self.items.first().map(CartItem::restaurant_name)
    }

    /// Looks up a line item.
    #[must_use]
    pub fn get(&self, id: CartItemId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Iterates over the line items.
    pub fn iter(&self) -> impl Iterator<Item = &CartItem> {
        self.items.iter()
    }

    /// Number of line items in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The cart currency.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Snapshot of the line items, for order synthesis.
    #[must_use]
    pub fn snapshot(&self) -> Vec<CartItem> {
        self.items.clone()
    }

    /// Sum of line totals at full `Decimal` precision.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError::Money`] if money arithmetic fails.
    pub fn subtotal(&self) -> Result<Money<'static, Currency>, CartError> {
        self.items.iter().try_fold(
            Money::from_minor(0, self.currency),
            |acc, item| Ok(acc.add(item.line_total())?),
        )
    }
}
