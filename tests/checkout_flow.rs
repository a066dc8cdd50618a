//! End-to-end checkout flows over the shipped storefront fixture set.
//!
//! Walks the customer path the way the storefront drives it: pick a
//! restaurant from the catalog, add menu items (conflicts arbitrated by the
//! switch guard), review the price figures, pass the payment gate and
//! complete delivery. The expected figures for the reference cart:
//!
//! - 2 × Margherita at $18.99 gives a subtotal of $37.98
//! - service charge is 8.25% of the subtotal: 3.13335, displayed as $3.13
//! - the 20% tip preset fills the field with 7.60 (rounded at selection)
//! - grand total is 37.98 + 3.13335 + 7.60 = 48.70935, displayed as $48.71

use std::str::FromStr;

use jiff::Zoned;
use rust_decimal::Decimal;
use rusty_money::iso::USD;
use testresult::TestResult;

use frontdash::{
    cart::Cart,
    catalog::{Catalog, CatalogError, MenuItemKey},
    checkout::{CardType, CheckoutPipeline, DeliveryForm, PaymentForm, Stage},
    clock::FixedClock,
    fixtures::Fixture,
    guard::{AddOutcome, SwitchGuard},
    ids::{FixedOrderNumbers, SequentialIds},
    pricing::{TipPreset, display_amount},
};

fn menu_item(catalog: &Catalog, restaurant: &str, dish: &str) -> Option<MenuItemKey> {
    let (key, _) = catalog.restaurants().find(|(_, r)| r.name == restaurant)?;

    catalog
        .menu_for(key)
        .find(|(_, item)| item.name == dish)
        .map(|(item_key, _)| item_key)
}

fn valid_payment() -> PaymentForm {
    let mut form = PaymentForm::new();
    form.card_type = Some(CardType::Visa);
    form.set_card_number("1234567890123456");
    form.first_name = "Jordan".to_string();
    form.last_name = "Lee".to_string();
    form.billing_address = "12 Elm Street".to_string();
    form.expiry_month = Some(8);
    form.expiry_year = Some(2027);
    form.set_security_code("123");

    form
}

fn valid_delivery() -> DeliveryForm {
    let mut form = DeliveryForm::new();
    form.building_number = "12".to_string();
    form.street_name = "Elm Street".to_string();
    form.apartment = "Apt 4B".to_string();
    form.city = "Springfield".to_string();
    form.state = "IL".to_string();
    form.contact_name = "Jordan Lee".to_string();
    form.set_contact_phone("5551234567");

    form
}

#[test]
fn reference_cart_checks_out_with_the_published_figures() -> TestResult {
    let fixture = Fixture::from_set("storefront")?;
    let catalog = fixture.catalog();
    let mut cart = Cart::new(USD);
    let mut ids = SequentialIds::default();

    let margherita =
        menu_item(catalog, "Tony's Pizza Palace", "Margherita").ok_or("missing dish")?;
    cart.add(catalog.order_line(margherita, 2)?, &mut ids)?;

    let mut pipeline = CheckoutPipeline::new();
    pipeline.select_tip_preset(&cart, TipPreset::Twenty)?;

    let parts = pipeline.price_breakdown(&cart)?;
    assert_eq!(display_amount(&parts.subtotal), Decimal::from_str("37.98")?);
    assert_eq!(
        display_amount(&parts.service_charge),
        Decimal::from_str("3.13")?
    );
    assert_eq!(display_amount(&parts.tip), Decimal::from_str("7.60")?);
    assert_eq!(
        display_amount(&parts.grand_total),
        Decimal::from_str("48.71")?
    );

    pipeline.proceed_to_payment(&cart)?;
    pipeline.submit_payment(valid_payment())?;

    let at: Zoned = "2026-03-14T12:00:00[America/New_York]".parse()?;
    let clock = FixedClock::new(at);
    let mut orders = FixedOrderNumbers::new(vec!["X9Y8Z7W6V".to_string()]);
    let order = pipeline.submit_delivery(&valid_delivery(), &mut cart, &clock, &mut orders)?;

    assert!(cart.is_empty(), "checkout must clear the cart");
    assert_eq!(order.order_number().as_str(), "X9Y8Z7W6V");
    assert_eq!(
        order.delivery_address(),
        "12 Elm Street, Apt 4B, Springfield, IL"
    );
    assert_eq!(order.estimated_delivery(), "12:45:00 PM");
    assert_eq!(order.breakdown(), &parts, "confirmation shows the same figures");

    // The confirmation receipt renders without error and includes the token.
    let mut rendered = Vec::new();
    order.write_to(&mut rendered)?;
    assert!(String::from_utf8(rendered)?.contains("X9Y8Z7W6V"));

    Ok(())
}

#[test]
fn switching_restaurants_needs_confirmation_and_seeds_the_cart() -> TestResult {
    let fixture = Fixture::from_set("storefront")?;
    let catalog = fixture.catalog();
    let mut cart = Cart::new(USD);
    let mut ids = SequentialIds::default();
    let mut guard = SwitchGuard::new();

    let roll = menu_item(catalog, "Sakura Sushi", "Salmon Roll").ok_or("missing dish")?;
    let pizza = menu_item(catalog, "Tony's Pizza Palace", "Margherita").ok_or("missing dish")?;

    guard.add_to_cart(&mut cart, catalog.order_line(roll, 1)?, &mut ids)?;
    let outcome = guard.add_to_cart(&mut cart, catalog.order_line(pizza, 1)?, &mut ids)?;

    assert_eq!(outcome, AddOutcome::ConfirmationRequired);
    assert_eq!(cart.restaurant_name(), Some("Sakura Sushi"));

    guard.confirm(&mut cart, &mut ids)?;

    assert_eq!(cart.len(), 1);
    assert_eq!(cart.restaurant_name(), Some("Tony's Pizza Palace"));
    let only = cart.iter().next().ok_or("expected the seeded item")?;
    assert_eq!(only.quantity(), 1);

    Ok(())
}

#[test]
fn closed_restaurants_and_unavailable_dishes_cannot_be_ordered() -> TestResult {
    let fixture = Fixture::from_set("storefront")?;
    let catalog = fixture.catalog();

    let pancakes = menu_item(catalog, "Night Owl Diner", "Pancakes").ok_or("missing dish")?;
    assert!(matches!(
        catalog.order_line(pancakes, 1),
        Err(CatalogError::RestaurantClosed(_))
    ));

    let tiramisu = menu_item(catalog, "Tony's Pizza Palace", "Tiramisu").ok_or("missing dish")?;
    assert!(matches!(
        catalog.order_line(tiramisu, 1),
        Err(CatalogError::ItemUnavailable(_))
    ));

    Ok(())
}

#[test]
fn payment_gate_rejects_fifteen_digits_and_accepts_sixteen() -> TestResult {
    let fixture = Fixture::from_set("storefront")?;
    let catalog = fixture.catalog();
    let mut cart = Cart::new(USD);
    let mut ids = SequentialIds::default();

    let pad_thai = menu_item(catalog, "Bangkok Garden", "Pad Thai").ok_or("missing dish")?;
    cart.add(catalog.order_line(pad_thai, 1)?, &mut ids)?;

    let mut pipeline = CheckoutPipeline::new();
    pipeline.proceed_to_payment(&cart)?;

    let mut short = valid_payment();
    short.set_card_number("123456789012345");
    assert!(pipeline.submit_payment(short).is_err());
    assert_eq!(pipeline.stage(), Stage::Payment);

    let mut full = valid_payment();
    full.set_card_number("1234567890123456");
    pipeline.submit_payment(full)?;
    assert_eq!(pipeline.stage(), Stage::Delivery);

    Ok(())
}
