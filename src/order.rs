//! Orders
//!
//! An [`OrderDetails`] is synthesized exactly once per completed checkout
//! and is immutable from then on. It carries a snapshot of the cart lines
//! and the price breakdown as they were at submission time, plus rendered
//! date strings; nothing here is recomputed later.

use std::{fmt, io};

use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{cart::CartItem, pricing::PriceBreakdown};

/// Errors that can occur when rendering an order confirmation.
#[derive(Debug, Error)]
pub enum OrderRenderError {
    /// IO error while writing the receipt.
    #[error("IO error")]
    Io,
}

/// Opaque order token, unique per checkout.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Wraps a token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The token as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Everything the confirmation screen shows for a completed order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDetails {
    order_number: OrderNumber,
    restaurant_name: String,
    order_date: String,
    items: Vec<CartItem>,
    breakdown: PriceBreakdown,
    delivery_address: String,
    contact_name: String,
    contact_phone: String,
    estimated_delivery: String,
}

impl OrderDetails {
    /// Assembles an order. Called by the checkout pipeline only; every field
    /// is fixed from this point on.
    #[must_use]
    #[expect(
        clippy::too_many_arguments,
        reason = "one-shot constructor for an immutable record"
    )]
    pub(crate) fn new(
        order_number: OrderNumber,
        restaurant_name: String,
        order_date: String,
        items: Vec<CartItem>,
        breakdown: PriceBreakdown,
        delivery_address: String,
        contact_name: String,
        contact_phone: String,
        estimated_delivery: String,
    ) -> Self {
        Self {
            order_number,
            restaurant_name,
            order_date,
            items,
            breakdown,
            delivery_address,
            contact_name,
            contact_phone,
            estimated_delivery,
        }
    }

    /// The order token.
    #[must_use]
    pub fn order_number(&self) -> &OrderNumber {
        &self.order_number
    }

    /// Restaurant the order was placed with.
    #[must_use]
    pub fn restaurant_name(&self) -> &str {
        &self.restaurant_name
    }

    /// When the order was placed, rendered for display.
    #[must_use]
    pub fn order_date(&self) -> &str {
        &self.order_date
    }

    /// Snapshot of the cart lines at checkout time.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// The price figures at checkout time.
    #[must_use]
    pub fn breakdown(&self) -> &PriceBreakdown {
        &self.breakdown
    }

    /// Assembled delivery address.
    #[must_use]
    pub fn delivery_address(&self) -> &str {
        &self.delivery_address
    }

    /// Contact person for the delivery.
    #[must_use]
    pub fn contact_name(&self) -> &str {
        &self.contact_name
    }

    /// Contact phone, digits only.
    #[must_use]
    pub fn contact_phone(&self) -> &str {
        &self.contact_phone
    }

    /// Estimated delivery time, rendered for display.
    #[must_use]
    pub fn estimated_delivery(&self) -> &str {
        &self.estimated_delivery
    }

    /// Prints the confirmation receipt: an item table followed by the
    /// summary block.
    ///
    /// # Errors
    ///
    /// Returns [`OrderRenderError::Io`] if the receipt cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), OrderRenderError> {
        let mut builder = Builder::default();

        builder.push_record(["", "Item", "Qty", "Unit Price", "Line Total"]);

        let mut item_boundary_rows: SmallVec<[usize; 16]> = SmallVec::new();

        for (idx, item) in self.items.iter().enumerate() {
            item_boundary_rows.push(idx + 1);

            builder.push_record([
                format!("#{:<3}", idx + 1),
                item.name().to_string(),
                format!("x{}", item.quantity()),
                format!("{}", item.unit_price()),
                format!("{}", item.line_total()),
            ]);
        }

        write_item_table(&mut out, builder, &item_boundary_rows)?;
        self.write_summary(&mut out)?;

        Ok(())
    }

    fn write_summary(&self, out: &mut impl io::Write) -> Result<(), OrderRenderError> {
        let parts = &self.breakdown;

        writeln!(out, "\nOrder #{}  ({})", self.order_number, self.order_date)
            .map_err(|_err| OrderRenderError::Io)?;
        writeln!(out, "Restaurant:       {}", self.restaurant_name)
            .map_err(|_err| OrderRenderError::Io)?;
        writeln!(out, "Subtotal:         {}", parts.subtotal).map_err(|_err| OrderRenderError::Io)?;
        writeln!(out, "Service (8.25%):  {}", parts.service_charge)
            .map_err(|_err| OrderRenderError::Io)?;
        writeln!(out, "Tips:             {}", parts.tip).map_err(|_err| OrderRenderError::Io)?;
        writeln!(out, "Grand Total:      {}", parts.grand_total)
            .map_err(|_err| OrderRenderError::Io)?;
        writeln!(out, "Deliver to:       {}", self.delivery_address)
            .map_err(|_err| OrderRenderError::Io)?;
        writeln!(
            out,
            "Contact:          {} ({})",
            self.contact_name, self.contact_phone
        )
        .map_err(|_err| OrderRenderError::Io)?;
        writeln!(out, "Estimated by:     {}", self.estimated_delivery)
            .map_err(|_err| OrderRenderError::Io)?;

        Ok(())
    }
}

fn write_item_table(
    out: &mut impl io::Write,
    builder: Builder,
    item_boundary_rows: &[usize],
) -> Result<(), OrderRenderError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    for &row in item_boundary_rows {
        if row > 1 {
            theme.insert_horizontal_line(row, separator);
        }
    }

    table.with(theme);
    table.modify(Rows::first(), Alignment::center());
    table.modify(Columns::new(2..5), Alignment::right());

    writeln!(out, "\n{table}").map_err(|_err| OrderRenderError::Io)
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::USD};
    use testresult::TestResult;

    use crate::{
        cart::{Cart, NewCartItem},
        ids::SequentialIds,
        pricing,
    };

    use super::*;

    fn sample_order() -> Result<OrderDetails, Box<dyn std::error::Error>> {
        let mut cart = Cart::new(USD);
        let mut ids = SequentialIds::default();

        cart.add(
            NewCartItem {
                name: "Margherita".to_string(),
                unit_price: Money::from_minor(1899, USD),
                quantity: 2,
                restaurant_name: "Tony's Pizza Palace".to_string(),
            },
            &mut ids,
        )?;

        let subtotal = cart.subtotal()?;
        let tip = pricing::preset_tip(&subtotal, pricing::TipPreset::Twenty);
        let breakdown = pricing::breakdown(subtotal, tip)?;

        Ok(OrderDetails::new(
            OrderNumber::new("A1B2C3D4E"),
            "Tony's Pizza Palace".to_string(),
            "3/14/2026, 12:00:00 PM".to_string(),
            cart.snapshot(),
            breakdown,
            "12 Elm Street, Springfield, IL".to_string(),
            "Jordan Lee".to_string(),
            "5551234567".to_string(),
            "12:45:00 PM".to_string(),
        ))
    }

    #[test]
    fn receipt_contains_items_and_totals() -> TestResult {
        let order = sample_order()?;
        let mut rendered = Vec::new();

        order.write_to(&mut rendered)?;
        let text = String::from_utf8(rendered)?;

        assert!(text.contains("Margherita"), "missing item row:\n{text}");
        assert!(text.contains("x2"), "missing quantity:\n{text}");
        assert!(text.contains("$48.71"), "missing grand total:\n{text}");
        assert!(text.contains("Order #A1B2C3D4E"), "missing order number:\n{text}");
        assert!(text.contains("12:45:00 PM"), "missing ETA:\n{text}");

        Ok(())
    }
}
