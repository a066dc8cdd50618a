//! FrontDash
//!
//! The in-memory ordering core of the FrontDash food-delivery storefront:
//! a single-restaurant cart with a confirmation guard for switches, a pure
//! pricing calculator, a linear three-stage checkout that synthesizes an
//! immutable order, and a registration-to-approval relay for prospective
//! restaurants. Stores are owned and single-writer; nothing here performs
//! I/O beyond receipt rendering and fixture loading.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod clock;
pub mod fixtures;
pub mod guard;
pub mod ids;
pub mod order;
pub mod pricing;
pub mod registration;
pub mod relay;
pub mod router;
pub mod utils;
