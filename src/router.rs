//! Router
//!
//! A finite set of named pages with explicit transition functions, not a
//! generic URL router: there is no deep linking and no browser history.
//! Transitions carry their payloads (selected restaurant, completed order,
//! registration), and the [`App`] facade owns every store so each one keeps
//! a single writer.

use tracing::debug;

use crate::{
    cart::{Cart, CartError, CartItemId, NewCartItem},
    catalog::Restaurant,
    guard::{AddOutcome, SwitchGuard, SwitchPrompt},
    ids::{IdSource, TimestampIds},
    order::OrderDetails,
    registration::{ApplicationId, RegistrationError, RegistrationForm, RestaurantApplication},
    relay::{PendingQueue, RegistrationRelay},
};

use rusty_money::iso::{self, Currency};

/// Who is signed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Ordering customer.
    Customer,
    /// Restaurant operator.
    Restaurant,
    /// Platform administrator.
    Admin,
    /// FrontDash staff.
    Staff,
}

/// Every page the storefront can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    /// Restaurant grid.
    Landing,
    /// Role chooser.
    SignIn,
    /// Menu of the selected restaurant.
    RestaurantDetail,
    /// Cart review.
    Cart,
    /// Payment and delivery capture.
    Payment,
    /// Completed-order summary.
    OrderConfirmation,
    /// Public registration form.
    RestaurantRegistration,
    /// Post-registration acknowledgement.
    RegistrationThankYou,
    /// Restaurant operator login.
    RestaurantLogin,
    /// Administrator login.
    AdminLogin,
    /// Staff login.
    StaffLogin,
    /// Restaurant operator dashboard.
    RestaurantDashboard,
    /// Administrator dashboard.
    AdminDashboard,
    /// Staff dashboard.
    StaffDashboard,
}

/// App
///
/// Ties the stores together and drives page transitions. Each store is
/// mutated only through here, matching the single-writer discipline of the
/// storefront.
#[derive(Debug)]
pub struct App {
    page: Page,
    role: Option<Role>,
    selected_restaurant: Option<Restaurant>,
    cart: Cart,
    guard: SwitchGuard,
    relay: RegistrationRelay,
    admin_queue: PendingQueue,
    order: Option<OrderDetails>,
    ids: Box<dyn IdSource>,
}

impl App {
    /// Creates an app on the landing page with timestamp-based ids.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Self::with_ids(currency, Box::new(TimestampIds::new()))
    }

    /// Creates an app with an injected id source, for deterministic tests.
    #[must_use]
    pub fn with_ids(currency: &'static Currency, ids: Box<dyn IdSource>) -> Self {
        Self {
            page: Page::Landing,
            role: None,
            selected_restaurant: None,
            cart: Cart::new(currency),
            guard: SwitchGuard::new(),
            relay: RegistrationRelay::new(),
            admin_queue: PendingQueue::new(),
            order: None,
            ids,
        }
    }

    /// The current page.
    #[must_use]
    pub fn page(&self) -> Page {
        self.page
    }

    /// The signed-in role, if any.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.role
    }

    /// The restaurant whose detail page was opened, if any.
    #[must_use]
    pub fn selected_restaurant(&self) -> Option<&Restaurant> {
        self.selected_restaurant.as_ref()
    }

    /// The cart, read-only; mutation goes through [`App::add_to_cart`] and
    /// [`App::update_cart_item`].
    #[must_use]
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The order shown on the confirmation page, if any.
    #[must_use]
    pub fn order(&self) -> Option<&OrderDetails> {
        self.order.as_ref()
    }

    /// The administrator's pending queue.
    #[must_use]
    pub fn admin_queue(&self) -> &PendingQueue {
        &self.admin_queue
    }

    /// Returns to the landing page, resetting the session to anonymous. The
    /// selected restaurant and any displayed order are dropped.
    pub fn to_landing(&mut self) {
        debug!("navigating to landing; session reset");
        self.page = Page::Landing;
        self.role = None;
        self.selected_restaurant = None;
        self.order = None;
    }

    /// Opens the role chooser.
    pub fn to_sign_in(&mut self) {
        self.page = Page::SignIn;
    }

    /// Opens a restaurant's detail page.
    pub fn view_restaurant(&mut self, restaurant: Restaurant) {
        self.selected_restaurant = Some(restaurant);
        self.page = Page::RestaurantDetail;
    }

    /// Opens the cart review page.
    pub fn to_cart(&mut self) {
        self.page = Page::Cart;
    }

    /// Opens the payment page.
    pub fn to_payment(&mut self) {
        self.page = Page::Payment;
    }

    /// Shows a completed order and clears the cart.
    pub fn confirm_order(&mut self, order: OrderDetails) {
        self.cart.clear();
        self.order = Some(order);
        self.page = Page::OrderConfirmation;
    }

    /// Opens the public registration form.
    pub fn to_registration(&mut self) {
        self.page = Page::RestaurantRegistration;
    }

    /// Submits a registration: a valid form mints an application, hands it
    /// to the relay and moves to the thank-you page.
    ///
    /// # Errors
    ///
    /// Returns the violated [`RegistrationError`]; the page does not change.
    pub fn submit_registration(
        &mut self,
        form: &RegistrationForm,
    ) -> Result<(), RegistrationError> {
        let application = form.submit(self.ids.as_mut())?;

        self.relay.submit(application);
        self.page = Page::RegistrationThankYou;

        Ok(())
    }

    /// Opens the restaurant operator login.
    pub fn to_restaurant_login(&mut self) {
        self.page = Page::RestaurantLogin;
    }

    /// Opens the administrator login.
    pub fn to_admin_login(&mut self) {
        self.page = Page::AdminLogin;
    }

    /// Opens the staff login.
    pub fn to_staff_login(&mut self) {
        self.page = Page::StaffLogin;
    }

    /// Enters the restaurant dashboard as an operator.
    pub fn to_restaurant_dashboard(&mut self) {
        self.role = Some(Role::Restaurant);
        self.page = Page::RestaurantDashboard;
    }

    /// Enters the admin dashboard; pending registrations queued on the
    /// relay are delivered into the admin queue on entry.
    pub fn to_admin_dashboard(&mut self) {
        self.role = Some(Role::Admin);
        self.page = Page::AdminDashboard;
        self.relay.deliver(&mut self.admin_queue);
    }

    /// Enters the staff dashboard.
    pub fn to_staff_dashboard(&mut self) {
        self.role = Some(Role::Staff);
        self.page = Page::StaffDashboard;
    }

    /// Adds an item to the cart, routing cross-restaurant conflicts through
    /// the switch guard.
    ///
    /// # Errors
    ///
    /// Propagates every [`CartError`] except the conflict, which surfaces
    /// as [`AddOutcome::ConfirmationRequired`].
    pub fn add_to_cart(&mut self, item: NewCartItem) -> Result<AddOutcome, CartError> {
        self.guard
            .add_to_cart(&mut self.cart, item, self.ids.as_mut())
    }

    /// Changes a line item's quantity; zero removes it.
    pub fn update_cart_item(&mut self, id: CartItemId, quantity: u32) {
        self.cart.set_quantity(id, quantity);
    }

    /// The switch-confirmation dialog contents, while a switch is pending.
    #[must_use]
    pub fn switch_prompt(&self) -> Option<SwitchPrompt> {
        self.guard.prompt(&self.cart)
    }

    /// Confirms the pending restaurant switch.
    ///
    /// # Errors
    ///
    /// Propagates [`CartError`]s from seeding the cart.
    pub fn confirm_switch(&mut self) -> Result<Option<CartItemId>, CartError> {
        self.guard.confirm(&mut self.cart, self.ids.as_mut())
    }

    /// Cancels the pending restaurant switch.
    pub fn cancel_switch(&mut self) {
        self.guard.cancel();
    }

    /// Approves a pending application. Unknown ids are a silent no-op.
    pub fn approve_application(&mut self, id: ApplicationId) -> Option<RestaurantApplication> {
        self.admin_queue.approve(id)
    }

    /// Rejects a pending application. Unknown ids are a silent no-op.
    pub fn reject_application(&mut self, id: ApplicationId) -> Option<RestaurantApplication> {
        self.admin_queue.reject(id)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(iso::USD)
    }
}
