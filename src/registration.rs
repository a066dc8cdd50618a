//! Registration
//!
//! A prospective restaurant fills in the public registration form; a valid
//! submission becomes a [`RestaurantApplication`] carried by the
//! [relay](crate::relay) into the administrator's pending queue. Validation
//! is deliberately shallow (the email check is just "contains an `@`"),
//! matching the storefront form.

use std::{fmt, str::FromStr};

use jiff::civil::{self, Weekday};
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use smallvec::{SmallVec, smallvec};
use thiserror::Error;

use crate::{checkout::digits_only, ids::IdSource};

const PHONE_DIGITS: usize = 10;

/// Registration form validation failures. Reported in place; always
/// user-correctable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistrationError {
    /// Restaurant name must be non-empty.
    #[error("restaurant name is required")]
    MissingName,

    /// Phone must be exactly 10 digits and cannot begin with `0`.
    #[error("phone number must be 10 digits and cannot start with 0")]
    Phone,

    /// Email must contain an `@`.
    #[error("please enter a valid email address")]
    Email,

    /// At least one menu line needs a name and a parseable, non-negative
    /// price.
    #[error("please add at least one menu item with name and price")]
    NoMenuItems,
}

/// Identifier of an application, unique within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ApplicationId(u64);

impl ApplicationId {
    /// Wraps a raw id.
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// One weekday's opening hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpeningHour {
    /// Day of the week.
    pub day: Weekday,

    /// Opening time.
    pub open: civil::Time,

    /// Closing time.
    pub close: civil::Time,

    /// Closed all day; `open`/`close` are ignored when set.
    pub closed: bool,
}

/// The form's default week: weekdays 9-22, Friday until 23, weekend from 10.
#[must_use]
pub fn default_week() -> [OpeningHour; 7] {
    let entry = |day, open_h, close_h| OpeningHour {
        day,
        open: civil::time(open_h, 0, 0, 0),
        close: civil::time(close_h, 0, 0, 0),
        closed: false,
    };

    [
        entry(Weekday::Monday, 9, 22),
        entry(Weekday::Tuesday, 9, 22),
        entry(Weekday::Wednesday, 9, 22),
        entry(Weekday::Thursday, 9, 22),
        entry(Weekday::Friday, 9, 23),
        entry(Weekday::Saturday, 10, 23),
        entry(Weekday::Sunday, 10, 21),
    ]
}

/// A raw menu line as typed into the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuLine {
    /// Dish name.
    pub name: String,

    /// Price, free-form text.
    pub price: String,

    /// Whether the dish is offered as available.
    pub available: bool,
}

/// A validated menu entry carried on an application.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuEntry {
    /// Dish name, trimmed.
    pub name: String,

    /// Image URL, empty until the restaurant uploads one.
    pub image: String,

    /// Parsed price.
    pub price: Money<'static, Currency>,

    /// Whether the dish is offered as available.
    pub available: bool,
}

/// A submitted registration awaiting administrator approval or rejection.
#[derive(Debug, Clone, PartialEq)]
pub struct RestaurantApplication {
    /// Session-unique identifier, minted at submission.
    pub id: ApplicationId,

    /// Restaurant name.
    pub name: String,

    /// Optional header image URL.
    pub image: Option<String>,

    /// Street address.
    pub street_address: String,

    /// Contact numbers, in the order given.
    pub phone_numbers: SmallVec<[String; 2]>,

    /// Contact person.
    pub contact_person: String,

    /// Contact email.
    pub email: String,

    /// One entry per weekday.
    pub opening_hours: [OpeningHour; 7],

    /// Valid menu lines only.
    pub menu: Vec<MenuEntry>,
}

/// The public registration form.
#[derive(Debug, Clone)]
pub struct RegistrationForm {
    /// Restaurant name.
    pub name: String,

    /// Street address.
    pub street_address: String,

    /// Contact phone, digits only.
    pub phone: String,

    /// Contact person.
    pub contact_person: String,

    /// Contact email.
    pub email: String,

    /// Optional header image URL.
    pub image: Option<String>,

    /// Menu lines as typed.
    pub menu: Vec<MenuLine>,

    /// Opening hours, prefilled with [`default_week`].
    pub hours: [OpeningHour; 7],

    /// The currency menu prices are quoted in.
    pub currency: &'static Currency,
}

impl RegistrationForm {
    /// Creates an empty form with the default week and one blank menu line.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            name: String::new(),
            street_address: String::new(),
            phone: String::new(),
            contact_person: String::new(),
            email: String::new(),
            image: None,
            menu: vec![MenuLine {
                available: true,
                ..MenuLine::default()
            }],
            hours: default_week(),
            currency,
        }
    }

    /// Stores the phone with non-digits stripped, as the input does.
    pub fn set_phone(&mut self, raw: &str) {
        self.phone = digits_only(raw, PHONE_DIGITS);
    }

    /// Menu lines that carry both a name and a parseable, non-negative
    /// price; only these make it onto the application.
    fn valid_menu_entries(&self) -> Vec<MenuEntry> {
        self.menu
            .iter()
            .filter_map(|line| {
                let name = line.name.trim();
                if name.is_empty() {
                    return None;
                }

                let price = Decimal::from_str(line.price.trim()).ok()?;
                if price.is_sign_negative() && !price.is_zero() {
                    return None;
                }

                Some(MenuEntry {
                    name: name.to_string(),
                    image: String::new(),
                    price: Money::from_decimal(price, self.currency),
                    available: line.available,
                })
            })
            .collect()
    }

    /// Validates the form and mints an application.
    ///
    /// # Errors
    ///
    /// Returns the first violated [`RegistrationError`], in the order the
    /// form checks them: name, phone, email, menu.
    pub fn submit(
        &self,
        ids: &mut dyn IdSource,
    ) -> Result<RestaurantApplication, RegistrationError> {
        if self.name.trim().is_empty() {
            return Err(RegistrationError::MissingName);
        }

        if self.phone.len() != PHONE_DIGITS || self.phone.starts_with('0') {
            return Err(RegistrationError::Phone);
        }

        if !self.email.contains('@') {
            return Err(RegistrationError::Email);
        }

        let menu = self.valid_menu_entries();
        if menu.is_empty() {
            return Err(RegistrationError::NoMenuItems);
        }

        Ok(RestaurantApplication {
            id: ApplicationId::new(ids.next()),
            name: self.name.trim().to_string(),
            image: self.image.clone(),
            street_address: self.street_address.trim().to_string(),
            phone_numbers: smallvec![self.phone.clone()],
            contact_person: self.contact_person.trim().to_string(),
            email: self.email.trim().to_string(),
            opening_hours: self.hours,
            menu,
        })
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use crate::ids::SequentialIds;

    use super::*;

    fn filled_form() -> RegistrationForm {
        let mut form = RegistrationForm::new(USD);
        form.name = "Bella Italia".to_string();
        form.street_address = "1200 Market Street".to_string();
        form.set_phone("415-555-0198");
        form.contact_person = "Marco Romano".to_string();
        form.email = "marco@bellaitalia.com".to_string();
        form.menu = vec![
            MenuLine {
                name: "Lasagna".to_string(),
                price: "15.50".to_string(),
                available: true,
            },
            MenuLine {
                name: String::new(),
                price: "9.99".to_string(),
                available: true,
            },
        ];

        form
    }

    #[test]
    fn valid_form_mints_an_application() -> TestResult {
        let mut ids = SequentialIds::default();
        let application = filled_form().submit(&mut ids)?;

        assert_eq!(application.name, "Bella Italia");
        assert_eq!(application.phone_numbers.as_slice(), ["4155550198"]);
        assert_eq!(application.menu.len(), 1, "nameless lines are dropped");
        assert_eq!(
            application.menu.first().map(|e| e.name.as_str()),
            Some("Lasagna")
        );

        Ok(())
    }

    #[test]
    fn leading_zero_phone_is_rejected() {
        let mut ids = SequentialIds::default();
        let mut form = filled_form();
        form.set_phone("0551234567");

        assert_eq!(form.submit(&mut ids), Err(RegistrationError::Phone));

        form.set_phone("5551234567");
        assert!(form.submit(&mut ids).is_ok());
    }

    #[test]
    fn short_phone_is_rejected() {
        let mut ids = SequentialIds::default();
        let mut form = filled_form();
        form.set_phone("555123456");

        assert_eq!(form.submit(&mut ids), Err(RegistrationError::Phone));
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut ids = SequentialIds::default();
        let mut form = filled_form();
        form.name = "   ".to_string();

        assert_eq!(form.submit(&mut ids), Err(RegistrationError::MissingName));
    }

    #[test]
    fn email_must_contain_an_at_sign() {
        let mut ids = SequentialIds::default();
        let mut form = filled_form();
        form.email = "marco.bellaitalia.com".to_string();

        assert_eq!(form.submit(&mut ids), Err(RegistrationError::Email));
    }

    #[test]
    fn menu_needs_one_priced_named_line() {
        let mut ids = SequentialIds::default();
        let mut form = filled_form();
        form.menu = vec![
            MenuLine {
                name: "Mystery Dish".to_string(),
                price: "free".to_string(),
                available: true,
            },
            MenuLine {
                name: "Refund Special".to_string(),
                price: "-5".to_string(),
                available: true,
            },
        ];

        assert_eq!(form.submit(&mut ids), Err(RegistrationError::NoMenuItems));
    }

    #[test]
    fn ids_are_unique_within_a_session() -> TestResult {
        let mut ids = SequentialIds::default();
        let form = filled_form();

        let first = form.submit(&mut ids)?;
        let second = form.submit(&mut ids)?;

        assert_ne!(first.id, second.id);

        Ok(())
    }

    #[test]
    fn default_week_matches_the_form_prefill() {
        let week = default_week();

        assert_eq!(week.len(), 7);
        let friday = week
            .iter()
            .find(|hour| hour.day == Weekday::Friday)
            .copied();
        assert_eq!(
            friday.map(|hour| hour.close),
            Some(civil::time(23, 0, 0, 0))
        );
        assert!(week.iter().all(|hour| !hour.closed));
    }
}
