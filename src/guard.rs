//! Switch Guard
//!
//! Arbitrates cross-restaurant adds. A conflicting add parks the attempted
//! item while the customer decides: confirming clears the cart and seeds it
//! with the parked item; cancelling discards the parked item and leaves the
//! cart untouched. Resolution is strictly user-driven; there is no timeout.

use tracing::debug;

use crate::{
    cart::{Cart, CartError, CartItemId, NewCartItem},
    ids::IdSource,
};

/// What the confirmation dialog shows while a switch is pending.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchPrompt {
    /// Restaurant currently owning the cart.
    pub current_restaurant: String,

    /// Restaurant of the attempted item.
    pub new_restaurant: String,

    /// How many items would be discarded on confirm.
    pub item_count: usize,
}

#[derive(Debug)]
enum GuardState {
    Idle,
    AwaitingConfirmation { pending: NewCartItem },
}

/// Outcome of routing an add through the guard.
#[derive(Debug, PartialEq)]
pub enum AddOutcome {
    /// The item went straight into the cart.
    Added(CartItemId),

    /// The add conflicted; the item is parked until the customer decides.
    ConfirmationRequired,
}

/// State machine between a conflicting add and its confirm/cancel.
#[derive(Debug, Default)]
pub struct SwitchGuard {
    state: GuardState,
}

impl Default for GuardState {
    fn default() -> Self {
        GuardState::Idle
    }
}

impl SwitchGuard {
    /// Creates an idle guard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a switch is awaiting confirmation.
    #[must_use]
    pub fn is_awaiting(&self) -> bool {
        matches!(self.state, GuardState::AwaitingConfirmation { .. })
    }

    /// Adds an item to the cart, parking it here instead when the add
    /// conflicts with the cart's current restaurant. A second conflicting
    /// add while one is already parked replaces the parked item.
    ///
    /// # Errors
    ///
    /// Propagates every [`CartError`] except `RestaurantConflict`, which is
    /// absorbed into [`AddOutcome::ConfirmationRequired`].
    pub fn add_to_cart(
        &mut self,
        cart: &mut Cart,
        item: NewCartItem,
        ids: &mut dyn IdSource,
    ) -> Result<AddOutcome, CartError> {
        match cart.add(item.clone(), ids) {
            Ok(id) => {
                // A successful same-restaurant add leaves any parked item alone.
                Ok(AddOutcome::Added(id))
            }
            Err(CartError::RestaurantConflict { current, attempted }) => {
                if self.is_awaiting() {
                    debug!(%attempted, "replacing parked switch item");
                }

                debug!(%current, %attempted, "restaurant switch awaiting confirmation");
                self.state = GuardState::AwaitingConfirmation { pending: item };

                Ok(AddOutcome::ConfirmationRequired)
            }
            Err(other) => Err(other),
        }
    }

    /// The dialog contents for the pending switch, if any.
    #[must_use]
    pub fn prompt(&self, cart: &Cart) -> Option<SwitchPrompt> {
        match &self.state {
            GuardState::Idle => None,
            GuardState::AwaitingConfirmation { pending } => Some(SwitchPrompt {
                current_restaurant: cart.restaurant_name().unwrap_or_default().to_string(),
                new_restaurant: pending.restaurant_name.clone(),
                item_count: cart.len(),
            }),
        }
    }

    /// Confirms the switch: the cart is cleared, then the parked item is
    /// added as its sole line with a fresh id. A confirm with nothing
    /// parked returns `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Propagates [`CartError`]s from re-adding the parked item.
    pub fn confirm(
        &mut self,
        cart: &mut Cart,
        ids: &mut dyn IdSource,
    ) -> Result<Option<CartItemId>, CartError> {
        match std::mem::take(&mut self.state) {
            GuardState::Idle => Ok(None),
            GuardState::AwaitingConfirmation { pending } => {
                debug!(new_restaurant = %pending.restaurant_name, "restaurant switch confirmed");
                cart.clear();

                cart.add(pending, ids).map(Some)
            }
        }
    }

    /// Cancels the switch: the parked item is discarded, the cart untouched.
    pub fn cancel(&mut self) {
        if self.is_awaiting() {
            debug!("restaurant switch cancelled");
        }

        self.state = GuardState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{
        Money,
        iso::{Currency, USD},
    };
    use testresult::TestResult;

    use crate::ids::SequentialIds;

    use super::*;

    fn line(name: &str, minor: i64, quantity: u32, restaurant: &str) -> NewCartItem {
        NewCartItem {
            name: name.to_string(),
            unit_price: Money::from_minor(minor, USD),
            quantity,
            restaurant_name: restaurant.to_string(),
        }
    }

    fn sushi_cart(ids: &mut SequentialIds) -> Result<Cart, CartError> {
        let mut cart = Cart::new(USD);
        cart.add(line("Salmon Roll", 899, 1, "Sakura Sushi"), ids)?;
        cart.add(line("Miso Soup", 399, 2, "Sakura Sushi"), ids)?;

        Ok(cart)
    }

    #[test]
    fn same_restaurant_add_bypasses_the_guard() -> TestResult {
        let mut ids = SequentialIds::default();
        let mut cart = sushi_cart(&mut ids)?;
        let mut guard = SwitchGuard::new();

        let outcome =
            guard.add_to_cart(&mut cart, line("Tempura", 1199, 1, "Sakura Sushi"), &mut ids)?;

        assert!(matches!(outcome, AddOutcome::Added(_)));
        assert!(!guard.is_awaiting());
        assert_eq!(cart.len(), 3);

        Ok(())
    }

    #[test]
    fn conflicting_add_parks_the_item_and_surfaces_a_prompt() -> TestResult {
        let mut ids = SequentialIds::default();
        let mut cart = sushi_cart(&mut ids)?;
        let mut guard = SwitchGuard::new();

        let outcome = guard.add_to_cart(
            &mut cart,
            line("Margherita", 1299, 1, "Tony's Pizza Palace"),
            &mut ids,
        )?;

        assert_eq!(outcome, AddOutcome::ConfirmationRequired);
        assert_eq!(cart.len(), 2, "cart must not be mutated on conflict");

        let prompt = guard.prompt(&cart).ok_or("expected a prompt")?;
        assert_eq!(prompt.current_restaurant, "Sakura Sushi");
        assert_eq!(prompt.new_restaurant, "Tony's Pizza Palace");
        assert_eq!(prompt.item_count, 2);

        Ok(())
    }

    #[test]
    fn confirm_clears_and_seeds_the_cart() -> TestResult {
        let mut ids = SequentialIds::default();
        let mut cart = sushi_cart(&mut ids)?;
        let mut guard = SwitchGuard::new();

        guard.add_to_cart(
            &mut cart,
            line("Margherita", 1299, 1, "Tony's Pizza Palace"),
            &mut ids,
        )?;
        let id = guard.confirm(&mut cart, &mut ids)?.ok_or("expected an id")?;

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.restaurant_name(), Some("Tony's Pizza Palace"));
        let sole = cart.get(id).ok_or("missing seeded item")?;
        assert_eq!(sole.quantity(), 1);
        assert!(!guard.is_awaiting());

        Ok(())
    }

    #[test]
    fn cancel_discards_the_parked_item_only() -> TestResult {
        let mut ids = SequentialIds::default();
        let mut cart = sushi_cart(&mut ids)?;
        let mut guard = SwitchGuard::new();

        guard.add_to_cart(
            &mut cart,
            line("Margherita", 1299, 1, "Tony's Pizza Palace"),
            &mut ids,
        )?;
        guard.cancel();

        assert!(!guard.is_awaiting());
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.restaurant_name(), Some("Sakura Sushi"));
        assert_eq!(guard.confirm(&mut cart, &mut ids)?, None);

        Ok(())
    }

    #[test]
    fn reentrant_conflict_replaces_the_parked_item() -> TestResult {
        let mut ids = SequentialIds::default();
        let mut cart = sushi_cart(&mut ids)?;
        let mut guard = SwitchGuard::new();

        guard.add_to_cart(
            &mut cart,
            line("Margherita", 1299, 1, "Tony's Pizza Palace"),
            &mut ids,
        )?;
        guard.add_to_cart(
            &mut cart,
            line("Pad Thai", 1450, 2, "Bangkok Garden"),
            &mut ids,
        )?;

        guard.confirm(&mut cart, &mut ids)?;

        assert_eq!(cart.restaurant_name(), Some("Bangkok Garden"));
        assert_eq!(cart.len(), 1);

        Ok(())
    }
}
