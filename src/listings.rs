//! Car listings and the stores that serve them.
//!
//! The interface for every store is the [`ListingSource`] trait, which returns
//! the complete catalogue in one call. The store used by the CLI is a hosted
//! JSON database (see [`firebase`]) whose `cars.json` document maps opaque keys
//! to car records. Each record is annotated with its key, which becomes the
//! [`Car::id`] used by `show`.
//!
//! Filtering mirrors the catalogue screen: a free-text search over brand and
//! model, combined with a [`Category`] chip.

pub(crate) mod firebase;

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub(crate) use firebase::FirebaseListings;

#[derive(Debug, Error)]
pub(crate) enum Error {
    #[error("invalid listings api base: {0}")]
    InvalidApiBase(reqwest::Error),

    #[error("invalid listings endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("a request to the listings store failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("the listings store responded with status {0}")]
    UnexpectedStatus(StatusCode),

    #[error("the listings store returned a malformed document: {0}")]
    MalformedDocument(#[from] serde_json::Error),
}

/// A car for sale, as stored in the listings document.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Car {
    /// The key of the record in the store. Not part of the record itself.
    #[serde(default, skip_deserializing)]
    pub id: String,
    pub brand: String,
    pub model: String,
    #[serde(default)]
    pub year: u32,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub transmission: String,
    #[serde(default)]
    pub fuel_type: String,
    #[serde(default)]
    pub seating_capacity: u32,
    #[serde(default)]
    pub image: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// The category chips offered by the catalogue.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub(crate) enum Category {
    #[default]
    All,
    #[strum(serialize = "SUV")]
    #[serde(rename = "SUV")]
    Suv,
    Sedan,
    Hatchback,
    Coupe,
}

impl Category {
    pub(crate) fn matches(&self, car: &Car) -> bool {
        match self {
            Category::All => true,
            category => car.kind == category.to_string(),
        }
    }
}

/// A catalogue query. The default query matches every car.
#[derive(Debug, Default, Clone)]
pub(crate) struct Filter {
    pub search: String,
    pub category: Category,
}

impl Filter {
    /// A car matches when its brand or model contains the search text
    /// (ignoring case) and it belongs to the selected category.
    pub(crate) fn matches(&self, car: &Car) -> bool {
        let search = self.search.to_lowercase();

        let matches_search = car.brand.to_lowercase().contains(&search)
            || car.model.to_lowercase().contains(&search);

        matches_search && self.category.matches(car)
    }

    pub(crate) fn apply(&self, cars: Vec<Car>) -> Vec<Car> {
        cars.into_iter().filter(|car| self.matches(car)).collect()
    }
}

/// Converts the raw listings document into cars, annotating each record with
/// its key. An empty store is encoded as `null`.
pub(crate) fn annotate(document: Option<BTreeMap<String, Car>>) -> Vec<Car> {
    document
        .unwrap_or_default()
        .into_iter()
        .map(|(id, mut car)| {
            car.id = id;
            car
        })
        .collect()
}

/// Formats a price as whole US dollars with thousands separators, e.g.
/// `$ 25,000`.
pub(crate) fn format_price(price: f64) -> String {
    let rounded = price.round();
    let digits = format!("{}", rounded.abs() as u64);

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }

        grouped.push(c);
    }

    if rounded < 0.0 {
        format!("$ -{}", grouped)
    } else {
        format!("$ {}", grouped)
    }
}

/// A read-only store of car listings.
#[async_trait]
pub(crate) trait ListingSource: Send + Sync {
    /// Returns every car in the store.
    async fn fetch_all(&self) -> Result<Vec<Car>, Error>;

    /// Returns the car with the given id, if any.
    async fn fetch_one(&self, id: &str) -> Result<Option<Car>, Error> {
        let cars = self.fetch_all().await?;

        Ok(cars.into_iter().find(|car| car.id == id))
    }
}
