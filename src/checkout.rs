//! Checkout
//!
//! A strictly linear pipeline: cart review, payment capture, delivery
//! capture, complete. Validation failures block in place and name the
//! violated rule; nothing is charged and nothing is retried. Completing the
//! delivery stage synthesizes the immutable [`OrderDetails`], clears the
//! cart and leaves the pipeline spent.

use jiff::Span;
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;
use tracing::info;

use crate::{
    cart::{Cart, CartError},
    clock::Clock,
    ids::OrderNumberSource,
    order::OrderDetails,
    pricing::{self, PriceBreakdown, TipError, TipPreset},
};

const CARD_NUMBER_DIGITS: usize = 16;
const SECURITY_CODE_DIGITS: usize = 3;
const PHONE_DIGITS: usize = 10;
const DELIVERY_ESTIMATE_MINUTES: i64 = 45;

/// Accepted card networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardType {
    /// VISA
    Visa,
    /// MasterCard
    Mastercard,
    /// Discover
    Discover,
    /// American Express
    Amex,
}

/// Payment form validation failures. Reported in place; always
/// user-correctable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaymentError {
    /// No card type chosen.
    #[error("please select a card type")]
    MissingCardType,

    /// Card number must be exactly 16 digits.
    #[error("please enter a valid 16-digit card number")]
    CardNumberLength,

    /// Security code must be exactly 3 digits.
    #[error("please enter a valid 3-digit security code")]
    SecurityCodeLength,

    /// A required text field was left blank.
    #[error("{0} is required")]
    MissingField(&'static str),
}

/// Delivery form validation failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeliveryError {
    /// Contact phone must be exactly 10 digits.
    #[error("please enter a valid 10-digit phone number")]
    PhoneLength,

    /// A required text field was left blank.
    #[error("{0} is required")]
    MissingField(&'static str),
}

/// Errors from driving the pipeline itself.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The pipeline was asked to do something its current stage does not
    /// allow (stages cannot be skipped).
    #[error("operation not valid in the {0:?} stage")]
    WrongStage(Stage),

    /// Checkout needs a non-empty cart.
    #[error("the cart is empty")]
    EmptyCart,

    /// Payment form failure surfaced by [`CheckoutPipeline::submit_payment`].
    #[error(transparent)]
    Payment(#[from] PaymentError),

    /// Delivery form failure surfaced by [`CheckoutPipeline::submit_delivery`].
    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    /// Tip entry failure.
    #[error(transparent)]
    Tip(#[from] TipError),

    /// Wrapped money arithmetic error.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// Wrapped cart error while totalling.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Delivery estimate fell outside the representable time range.
    #[error(transparent)]
    Time(#[from] jiff::Error),
}

/// Keeps only ASCII digits, truncated to `max` characters; this mirrors the
/// storefront inputs, which strip non-digits as they are typed.
#[must_use]
pub fn digits_only(raw: &str, max: usize) -> String {
    raw.chars().filter(char::is_ascii_digit).take(max).collect()
}

/// Credit card details captured at the payment stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentForm {
    /// Chosen card network.
    pub card_type: Option<CardType>,

    /// Card number, digits only.
    pub card_number: String,

    /// Holder first name.
    pub first_name: String,

    /// Holder last name.
    pub last_name: String,

    /// Billing address.
    pub billing_address: String,

    /// Expiry month, 1 through 12.
    pub expiry_month: Option<u8>,

    /// Expiry year.
    pub expiry_year: Option<u16>,

    /// Security code, digits only.
    pub security_code: String,
}

impl PaymentForm {
    /// Creates an empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the card number with non-digits stripped, as the input does.
    pub fn set_card_number(&mut self, raw: &str) {
        self.card_number = digits_only(raw, CARD_NUMBER_DIGITS);
    }

    /// Stores the security code with non-digits stripped.
    pub fn set_security_code(&mut self, raw: &str) {
        self.security_code = digits_only(raw, SECURITY_CODE_DIGITS);
    }

    fn validate(&self) -> Result<(), PaymentError> {
        if self.card_type.is_none() {
            return Err(PaymentError::MissingCardType);
        }

        if self.card_number.len() != CARD_NUMBER_DIGITS {
            return Err(PaymentError::CardNumberLength);
        }

        if self.first_name.trim().is_empty() {
            return Err(PaymentError::MissingField("first name"));
        }

        if self.last_name.trim().is_empty() {
            return Err(PaymentError::MissingField("last name"));
        }

        if self.billing_address.trim().is_empty() {
            return Err(PaymentError::MissingField("billing address"));
        }

        if self.expiry_month.is_none() {
            return Err(PaymentError::MissingField("expiry month"));
        }

        if self.expiry_year.is_none() {
            return Err(PaymentError::MissingField("expiry year"));
        }

        if self.security_code.len() != SECURITY_CODE_DIGITS {
            return Err(PaymentError::SecurityCodeLength);
        }

        Ok(())
    }
}

/// Delivery details captured at the final stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryForm {
    /// Building number.
    pub building_number: String,

    /// Street name.
    pub street_name: String,

    /// Apartment or unit; omitted from the address when blank.
    pub apartment: String,

    /// City.
    pub city: String,

    /// State.
    pub state: String,

    /// Contact person for the delivery.
    pub contact_name: String,

    /// Contact phone, digits only.
    pub contact_phone: String,
}

impl DeliveryForm {
    /// Creates an empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the contact phone with non-digits stripped, as the input does.
    pub fn set_contact_phone(&mut self, raw: &str) {
        self.contact_phone = digits_only(raw, PHONE_DIGITS);
    }

    fn validate(&self) -> Result<(), DeliveryError> {
        if self.building_number.trim().is_empty() {
            return Err(DeliveryError::MissingField("building number"));
        }

        if self.street_name.trim().is_empty() {
            return Err(DeliveryError::MissingField("street name"));
        }

        if self.city.trim().is_empty() {
            return Err(DeliveryError::MissingField("city"));
        }

        if self.state.trim().is_empty() {
            return Err(DeliveryError::MissingField("state"));
        }

        if self.contact_name.trim().is_empty() {
            return Err(DeliveryError::MissingField("contact name"));
        }

        if self.contact_phone.len() != PHONE_DIGITS {
            return Err(DeliveryError::PhoneLength);
        }

        Ok(())
    }

    /// Comma-joined address; the apartment segment is omitted when blank.
    #[must_use]
    pub fn assembled_address(&self) -> String {
        let apartment = self.apartment.trim();

        if apartment.is_empty() {
            format!(
                "{} {}, {}, {}",
                self.building_number.trim(),
                self.street_name.trim(),
                self.city.trim(),
                self.state.trim()
            )
        } else {
            format!(
                "{} {}, {}, {}, {}",
                self.building_number.trim(),
                self.street_name.trim(),
                apartment,
                self.city.trim(),
                self.state.trim()
            )
        }
    }
}

/// The pipeline's current stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Read-only review of the cart and price figures.
    CartReview,

    /// Card capture; a form-validation gate only, nothing is charged.
    Payment,

    /// Delivery capture; submission synthesizes the order.
    Delivery,

    /// The order has been synthesized; the pipeline accepts nothing further.
    Complete,
}

/// Checkout Pipeline
///
/// Owns the tip entry and the captured payment details while the customer
/// walks the three stages. The cart itself stays outside and is only
/// borrowed, mutably at completion alone.
#[derive(Debug)]
pub struct CheckoutPipeline {
    stage: Stage,
    tip_input: String,
    payment: Option<PaymentForm>,
}

impl CheckoutPipeline {
    /// Starts a checkout at the review stage.
    #[must_use]
    pub fn new() -> Self {
        Self {
            stage: Stage::CartReview,
            tip_input: String::new(),
            payment: None,
        }
    }

    /// The current stage.
    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Raw contents of the tip field.
    #[must_use]
    pub fn tip_input(&self) -> &str {
        &self.tip_input
    }

    /// Replaces the free-form tip entry.
    ///
    /// # Errors
    ///
    /// Returns [`TipError::Negative`] and leaves the previous entry in place
    /// when the new value is negative.
    pub fn set_tip_input(&mut self, raw: &str, currency: &'static Currency) -> Result<(), TipError> {
        pricing::parse_tip(raw, currency)?;
        self.tip_input = raw.trim().to_string();

        Ok(())
    }

    /// Fills the tip field from a preset: the percentage of the current
    /// subtotal, rounded to cents.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError::Cart`] if the subtotal cannot be computed.
    pub fn select_tip_preset(
        &mut self,
        cart: &Cart,
        preset: TipPreset,
    ) -> Result<(), CheckoutError> {
        let subtotal = cart.subtotal()?;
        let tip = pricing::preset_tip(&subtotal, preset);

        self.tip_input = format!("{:.2}", tip.amount());

        Ok(())
    }

    /// Whether a preset button should display as active: re-derived from the
    /// current tip value, never remembered from the last click. An empty
    /// field selects nothing.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError::Cart`] if the subtotal cannot be computed.
    pub fn tip_preset_selected(
        &self,
        cart: &Cart,
        preset: TipPreset,
    ) -> Result<bool, CheckoutError> {
        if self.tip_input.is_empty() {
            return Ok(false);
        }

        let subtotal = cart.subtotal()?;
        let tip = self.tip(cart.currency())?;

        Ok(pricing::preset_selected(&subtotal, &tip, preset))
    }

    fn tip(&self, currency: &'static Currency) -> Result<Money<'static, Currency>, TipError> {
        pricing::parse_tip(&self.tip_input, currency)
    }

    /// The current price figures; identical to what the cart view derives.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] if totalling or tip parsing fails.
    pub fn price_breakdown(&self, cart: &Cart) -> Result<PriceBreakdown, CheckoutError> {
        let subtotal = cart.subtotal()?;
        let tip = self.tip(cart.currency())?;

        Ok(pricing::breakdown(subtotal, tip)?)
    }

    /// Advances from review to payment.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::WrongStage`] outside the review stage.
    /// - [`CheckoutError::EmptyCart`] when there is nothing to buy.
    pub fn proceed_to_payment(&mut self, cart: &Cart) -> Result<(), CheckoutError> {
        if self.stage != Stage::CartReview {
            return Err(CheckoutError::WrongStage(self.stage));
        }

        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        self.stage = Stage::Payment;

        Ok(())
    }

    /// Validates the card form and advances to delivery. Nothing is charged.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::WrongStage`] outside the payment stage.
    /// - [`CheckoutError::Payment`] naming the violated rule; the pipeline
    ///   stays at the payment stage.
    pub fn submit_payment(&mut self, form: PaymentForm) -> Result<(), CheckoutError> {
        if self.stage != Stage::Payment {
            return Err(CheckoutError::WrongStage(self.stage));
        }

        form.validate()?;

        self.payment = Some(form);
        self.stage = Stage::Delivery;

        Ok(())
    }

    /// Steps one stage back: delivery returns to payment, payment to review.
    /// At review, and once complete, this is a no-op.
    pub fn back(&mut self) {
        self.stage = match self.stage {
            Stage::CartReview | Stage::Payment => Stage::CartReview,
            Stage::Delivery => Stage::Payment,
            Stage::Complete => Stage::Complete,
        };
    }

    /// Validates the delivery form, synthesizes the order and clears the
    /// cart. The returned [`OrderDetails`] is immutable; the pipeline moves
    /// to [`Stage::Complete`] and accepts nothing further.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::WrongStage`] outside the delivery stage.
    /// - [`CheckoutError::Delivery`] naming the violated rule; the cart and
    ///   the pipeline are left untouched, so a corrected form can be
    ///   resubmitted.
    pub fn submit_delivery(
        &mut self,
        form: &DeliveryForm,
        cart: &mut Cart,
        clock: &dyn Clock,
        order_numbers: &mut dyn OrderNumberSource,
    ) -> Result<OrderDetails, CheckoutError> {
        if self.stage != Stage::Delivery {
            return Err(CheckoutError::WrongStage(self.stage));
        }

        form.validate()?;

        let breakdown = self.price_breakdown(cart)?;
        let now = clock.now();
        let estimated = now.checked_add(Span::new().minutes(DELIVERY_ESTIMATE_MINUTES))?;

        let order = OrderDetails::new(
            order_numbers.next(),
            cart.restaurant_name().unwrap_or_default().to_string(),
            now.strftime("%-m/%-d/%Y, %-I:%M:%S %p").to_string(),
            cart.snapshot(),
            breakdown,
            form.assembled_address(),
            form.contact_name.trim().to_string(),
            form.contact_phone.clone(),
            estimated.strftime("%-I:%M:%S %p").to_string(),
        );

        info!(order_number = %order.order_number(), "order placed");
        cart.clear();
        self.stage = Stage::Complete;

        Ok(order)
    }
}

impl Default for CheckoutPipeline {
    fn default() -> Self {
        Self::new()
    }
}
