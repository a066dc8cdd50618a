//! Pricing
//!
//! Pure calculations shared by the cart view and the checkout pipeline:
//! subtotal, fixed-rate service charge, tip handling and grand total. The
//! service charge is derived from the subtotal only and is never recomputed
//! after a tip is applied; intermediate values keep full `Decimal` precision
//! and are rounded to two places only for display.

use std::str::FromStr;

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

/// Platform service charge: 8.25% of the subtotal.
pub const SERVICE_CHARGE_PERCENT: f64 = 0.0825;

/// Tolerance used to decide whether the current tip matches a preset: one cent.
const PRESET_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Errors from tip entry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TipError {
    /// Tips are non-negative.
    #[error("tip cannot be negative")]
    Negative,
}

/// Percentage-of-subtotal tip presets offered at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TipPreset {
    /// 18% of the subtotal.
    Eighteen,
    /// 20% of the subtotal.
    Twenty,
    /// 25% of the subtotal.
    TwentyFive,
}

impl TipPreset {
    /// Every preset, in display order.
    pub const ALL: [TipPreset; 3] = [TipPreset::Eighteen, TipPreset::Twenty, TipPreset::TwentyFive];

    /// The preset as whole percentage points.
    #[must_use]
    pub fn points(self) -> u32 {
        match self {
            TipPreset::Eighteen => 18,
            TipPreset::Twenty => 20,
            TipPreset::TwentyFive => 25,
        }
    }

    fn rate(self) -> Percentage {
        Percentage::from(f64::from(self.points()) / 100.0)
    }
}

/// The four monetary figures shown on the cart, payment and confirmation
/// screens. Both views derive them through [`breakdown`], so they agree
/// bit for bit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBreakdown {
    /// Sum of line totals.
    pub subtotal: Money<'static, Currency>,

    /// 8.25% of the subtotal.
    pub service_charge: Money<'static, Currency>,

    /// Tip, preset-derived or free-form.
    pub tip: Money<'static, Currency>,

    /// `subtotal + service_charge + tip`.
    pub grand_total: Money<'static, Currency>,
}

/// Calculates the service charge from a subtotal, at full precision.
#[must_use]
pub fn service_charge(subtotal: &Money<'static, Currency>) -> Money<'static, Currency> {
    let amount = Percentage::from(SERVICE_CHARGE_PERCENT) * *subtotal.amount();

    Money::from_decimal(amount, subtotal.currency())
}

/// Calculates a preset tip: the percentage of the subtotal, rounded to two
/// decimal places at selection time (the rounded value is what lands in the
/// free-form field).
#[must_use]
pub fn preset_tip(
    subtotal: &Money<'static, Currency>,
    preset: TipPreset,
) -> Money<'static, Currency> {
    let amount = (preset.rate() * *subtotal.amount())
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    Money::from_decimal(amount, subtotal.currency())
}

/// Parses a free-form tip entry. Empty or unparseable input is a zero tip.
///
/// # Errors
///
/// Returns [`TipError::Negative`] for a parseable negative amount.
pub fn parse_tip(
    input: &str,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, TipError> {
    let Ok(amount) = Decimal::from_str(input.trim()) else {
        return Ok(Money::from_minor(0, currency));
    };

    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(TipError::Negative);
    }

    Ok(Money::from_decimal(amount, currency))
}

/// Whether the current tip value matches a preset of the current subtotal,
/// within a cent. Selection is re-derived from the value each time, not
/// remembered from the last click, so changing the cart deselects a preset
/// whose amount no longer lines up.
#[must_use]
pub fn preset_selected(
    subtotal: &Money<'static, Currency>,
    tip: &Money<'static, Currency>,
    preset: TipPreset,
) -> bool {
    let expected = preset_tip(subtotal, preset);
    let delta = (*tip.amount() - *expected.amount()).abs();

    delta < PRESET_TOLERANCE
}

/// Combines a subtotal and tip into the full breakdown.
///
/// # Errors
///
/// Returns a [`MoneyError`] if money arithmetic fails (for example, on a
/// currency mismatch between subtotal and tip).
pub fn breakdown(
    subtotal: Money<'static, Currency>,
    tip: Money<'static, Currency>,
) -> Result<PriceBreakdown, MoneyError> {
    let service_charge = service_charge(&subtotal);
    let grand_total = subtotal.add(service_charge)?.add(tip)?;

    Ok(PriceBreakdown {
        subtotal,
        service_charge,
        tip,
        grand_total,
    })
}

/// Rounds a money amount to the two places shown on screen.
#[must_use]
pub fn display_amount(money: &Money<'static, Currency>) -> Decimal {
    money
        .amount()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
