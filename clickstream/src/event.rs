use std::fmt;

use chrono::Utc;
use fake::faker::internet::en::{UserAgent, IPv4};
use fake::Fake;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{random_uuid, Catalog};
use crate::error::SimError;

pub const PAGE_URL_PREFIX: &str = "https://example.com/products/";
pub const MAX_QUANTITY: u8 = 3;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    PageView,
    AddToCart,
    Purchase,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Event {
    pub event_id: Uuid,
    pub event_type: EventType,
    pub user_id: Uuid,
    pub product_id: Uuid,
    /// Seconds since the Unix epoch, with sub-second precision
    pub timestamp: f64,
    pub session_id: Uuid,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: u8,
    pub user_agent: String,
    pub page_url: String,
    pub ip_address: String,
}

/// Weighted draw over [`EventType`], normalized by `WeightedIndex`.
#[derive(Debug, Clone)]
pub struct EventTypeDistribution {
    index: WeightedIndex<f64>,
}

/// Builds one [`Event`] per draw from a borrowed [`Catalog`].
#[derive(Debug, Clone)]
pub struct EventGenerator<'a> {
    catalog: &'a Catalog,
    event_types: EventTypeDistribution,
}

impl EventType {
    pub const ALL: [EventType; 3] = [EventType::PageView, EventType::AddToCart, EventType::Purchase];

    /// Share of generated traffic this event type should account for.
    #[must_use]
    pub fn weight(self) -> f64 {
        match self {
            EventType::PageView => 0.6,
            EventType::AddToCart => 0.25,
            EventType::Purchase => 0.15,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            EventType::PageView => "page_view",
            EventType::AddToCart => "add_to_cart",
            EventType::Purchase => "purchase",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl EventTypeDistribution {
    /// # Errors
    /// Errors when the weights are all zero, negative, or not finite
    pub fn new() -> Result<Self, SimError> {
        let index = WeightedIndex::new(EventType::ALL.into_iter().map(EventType::weight))?;
        Ok(EventTypeDistribution { index })
    }
}

impl Distribution<EventType> for EventTypeDistribution {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> EventType {
        EventType::ALL[self.index.sample(rng)]
    }
}

/// Only `page_view` is fixed at a single unit; cart and purchase events carry 1 to 3.
fn quantity_for<R: Rng + ?Sized>(event_type: EventType, rng: &mut R) -> u8 {
    match event_type {
        EventType::PageView => 1,
        EventType::AddToCart | EventType::Purchase => rng.gen_range(1..=MAX_QUANTITY),
    }
}

#[allow(clippy::cast_precision_loss)]
fn epoch_seconds() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

impl<'a> EventGenerator<'a> {
    /// # Errors
    /// Errors when the event type weights cannot form a distribution
    pub fn new(catalog: &'a Catalog) -> Result<Self, SimError> {
        Ok(EventGenerator {
            catalog,
            event_types: EventTypeDistribution::new()?,
        })
    }

    /// Draws one event; see the [`Distribution`] impl.
    #[must_use]
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Event {
        self.sample(rng)
    }
}

impl Distribution<Event> for EventGenerator<'_> {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Event {
        let event_type = self.event_types.sample(rng);
        let product = self.catalog.choose(rng);
        let quantity = quantity_for(event_type, rng);

        Event {
            event_id: random_uuid(rng),
            event_type,
            user_id: random_uuid(rng),
            product_id: product.id,
            timestamp: epoch_seconds(),
            session_id: random_uuid(rng),
            price: product.price,
            quantity,
            user_agent: UserAgent().fake_with_rng(rng),
            page_url: format!("{}{}", PAGE_URL_PREFIX, product.id),
            ip_address: IPv4().fake_with_rng(rng),
        }
    }
}
