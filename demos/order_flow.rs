//! Order Flow Example
//!
//! Walks a full customer order against a fixture catalog: fill a cart from
//! one restaurant's menu, apply the 20% tip preset, pass the payment and
//! delivery stages, and print the confirmation receipt.
//!
//! Use `-f` to load a fixture set by name
//! Use `-r` to pick the restaurant to order from
//! Use `-n` to set the quantity of each ordered dish

use std::io;

use anyhow::{Context, Result};
use clap::Parser;

use frontdash::{
    cart::Cart,
    checkout::{CardType, CheckoutPipeline, DeliveryForm, PaymentForm},
    clock::SystemClock,
    fixtures::Fixture,
    ids::{RandomOrderNumbers, SequentialIds},
    pricing::TipPreset,
    utils::DemoOrderArgs,
};

/// Order Flow Example
#[expect(clippy::print_stdout, reason = "Example code")]
pub fn main() -> Result<()> {
    let args = DemoOrderArgs::parse();

    let fixture = Fixture::from_set(&args.fixture)?;
    let catalog = fixture.catalog();

    let (restaurant_key, restaurant) = catalog
        .restaurants()
        .find(|(_, r)| r.name == args.restaurant)
        .with_context(|| format!("no restaurant named {:?} in the fixture", args.restaurant))?;

    let currency = catalog
        .menu_for(restaurant_key)
        .next()
        .map(|(_, item)| item.price.currency())
        .context("the restaurant has an empty menu")?;

    let mut cart = Cart::new(currency);
    let mut ids = SequentialIds::default();

    for (key, item) in catalog.menu_for(restaurant_key) {
        if !item.available {
            continue;
        }

        let line = catalog.order_line(key, args.quantity)?;
        cart.add(line, &mut ids)?;
        println!("added {} x {} ({})", args.quantity, item.name, item.price);
    }

    println!("\nordering from {} ({})", restaurant.name, restaurant.cuisine);

    let mut pipeline = CheckoutPipeline::new();
    pipeline.select_tip_preset(&cart, TipPreset::Twenty)?;
    pipeline.proceed_to_payment(&cart)?;

    let mut payment = PaymentForm::new();
    payment.card_type = Some(CardType::Visa);
    payment.set_card_number("4111111111111111");
    payment.first_name = "Jordan".to_string();
    payment.last_name = "Lee".to_string();
    payment.billing_address = "12 Elm Street".to_string();
    payment.expiry_month = Some(8);
    payment.expiry_year = Some(2027);
    payment.set_security_code("123");
    pipeline.submit_payment(payment)?;

    let mut delivery = DeliveryForm::new();
    delivery.building_number = "12".to_string();
    delivery.street_name = "Elm Street".to_string();
    delivery.city = "Springfield".to_string();
    delivery.state = "IL".to_string();
    delivery.contact_name = "Jordan Lee".to_string();
    delivery.set_contact_phone("555-123-4567");

    let order = pipeline.submit_delivery(
        &delivery,
        &mut cart,
        &SystemClock,
        &mut RandomOrderNumbers,
    )?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    println!();
    order.write_to(&mut handle)?;

    Ok(())
}
