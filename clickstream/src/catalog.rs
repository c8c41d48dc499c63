use rand::Rng;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::{Builder, Uuid};

use crate::error::SimError;

pub const NUM_DECIMAL_PLACES: u32 = 2;

/// Name and price (in cents) of every product the store lists by default.
const DEFAULT_LISTINGS: [(&str, i64); 10] = [
    ("Wireless Earbuds", 4999),
    ("Smart Watch", 19999),
    ("Bluetooth Speaker", 7999),
    ("Laptop", 89999),
    ("Smartphone", 69999),
    ("Tablet", 34999),
    ("Headphones", 14999),
    ("Camera", 49999),
    ("Gaming Console", 39999),
    ("External Hard Drive", 8999),
];

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

/// The fixed set of products events are drawn from.
///
/// A `Catalog` is never empty, so drawing from it cannot fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

/// Draws a random (v4) UUID from `rng` so seeded runs stay reproducible.
#[must_use]
pub fn random_uuid<R: Rng + ?Sized>(rng: &mut R) -> Uuid {
    Builder::from_random_bytes(rng.gen()).into_uuid()
}

impl Product {
    #[must_use]
    pub fn new(id: Uuid, name: impl Into<String>, price: Decimal) -> Self {
        Product {
            id,
            name: name.into(),
            price,
        }
    }
}

impl Catalog {
    /// Builds the default listings, each with a freshly generated id.
    #[must_use]
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let products = DEFAULT_LISTINGS
            .iter()
            .map(|&(name, cents)| {
                Product::new(
                    random_uuid(rng),
                    name,
                    Decimal::new(cents, NUM_DECIMAL_PLACES),
                )
            })
            .collect();
        Catalog { products }
    }

    /// # Errors
    /// Errors when `products` is empty
    pub fn from_products(products: Vec<Product>) -> Result<Self, SimError> {
        if products.is_empty() {
            return Err(SimError::EmptyCatalog);
        }
        Ok(Catalog { products })
    }

    /// Picks one product uniformly at random.
    #[must_use]
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> &Product {
        &self.products[rng.gen_range(0..self.products.len())]
    }

    #[must_use]
    pub fn get(&self, id: &Uuid) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Never true for a constructed catalog.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
