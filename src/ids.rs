//! Id Sources
//!
//! Cart items, registration applications and order numbers all need fresh
//! identifiers. The sources are injected so tests can supply deterministic
//! sequences while the shipped defaults mirror the storefront's behaviour
//! (millisecond timestamps for ids, random tokens for order numbers).

use std::fmt;

use jiff::Timestamp;
use rand::seq::SliceRandom;

use crate::order::OrderNumber;

/// A source of fresh numeric identifiers, unique within a session.
pub trait IdSource: fmt::Debug {
    /// Returns the next identifier.
    fn next(&mut self) -> u64;
}

/// Monotonic counter. The default source for tests and demos.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    /// Creates a counter starting at `start`.
    #[must_use]
    pub fn new(start: u64) -> Self {
        Self { next: start }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new(1)
    }
}

impl IdSource for SequentialIds {
    fn next(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Millisecond-timestamp ids, bumped past the last issued value so two
/// requests inside the same millisecond still get distinct ids.
#[derive(Debug, Clone, Default)]
pub struct TimestampIds {
    last: u64,
}

impl TimestampIds {
    /// Creates a fresh timestamp-based source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdSource for TimestampIds {
    fn next(&mut self) -> u64 {
        let now = u64::try_from(Timestamp::now().as_millisecond()).unwrap_or(0);
        self.last = if now > self.last { now } else { self.last + 1 };

        self.last
    }
}

/// A source of order-number tokens.
pub trait OrderNumberSource: fmt::Debug {
    /// Returns the next order number.
    fn next(&mut self) -> OrderNumber;
}

const ORDER_NUMBER_LEN: usize = 9;
const ORDER_NUMBER_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Random 9-character uppercase alphanumeric order numbers.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomOrderNumbers;

impl OrderNumberSource for RandomOrderNumbers {
    fn next(&mut self) -> OrderNumber {
        let mut rng = rand::thread_rng();
        let token: String = (0..ORDER_NUMBER_LEN)
            .map(|_| char::from(*ORDER_NUMBER_CHARSET.choose(&mut rng).unwrap_or(&b'0')))
            .collect();

        OrderNumber::new(token)
    }
}

/// Hands out a fixed list of order numbers, then falls back to a counter.
///
/// Intended for tests and demos that need reproducible output.
#[derive(Debug, Clone, Default)]
pub struct FixedOrderNumbers {
    queued: Vec<String>,
    cursor: usize,
}

impl FixedOrderNumbers {
    /// Creates a source that yields `tokens` in order.
    pub fn new(tokens: impl Into<Vec<String>>) -> Self {
        Self {
            queued: tokens.into(),
            cursor: 0,
        }
    }
}

impl OrderNumberSource for FixedOrderNumbers {
    fn next(&mut self) -> OrderNumber {
        let token = self
            .queued
            .get(self.cursor)
            .cloned()
            .unwrap_or_else(|| format!("ORDER{:04}", self.cursor));
        self.cursor += 1;

        OrderNumber::new(token)
    }
}
