//! The bounded set of listings visible to search.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What the search oracle is told about one listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingSummary {
    pub id: String,
    pub title: String,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nightly_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_guests: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub amenities: Vec<String>,
}

impl ListingSummary {
    pub fn new(id: impl Into<String>, title: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            city: city.into(),
            nightly_price: None,
            max_guests: None,
            amenities: Vec::new(),
        }
    }

    pub fn with_price(mut self, nightly_price: f64) -> Self {
        self.nightly_price = Some(nightly_price);
        self
    }

    pub fn with_max_guests(mut self, max_guests: u32) -> Self {
        self.max_guests = Some(max_guests);
        self
    }

    pub fn with_amenities<I, S>(mut self, amenities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.amenities = amenities.into_iter().map(Into::into).collect();
        self
    }
}

/// Listings a search session may recommend.
///
/// Later entries with a repeated id are dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingCorpus {
    listings: Vec<ListingSummary>,
    index: HashMap<String, usize>,
}

impl ListingCorpus {
    pub fn new(listings: impl IntoIterator<Item = ListingSummary>) -> Self {
        let mut corpus = Self::default();
        for listing in listings {
            if !corpus.index.contains_key(&listing.id) {
                corpus.index.insert(listing.id.clone(), corpus.listings.len());
                corpus.listings.push(listing);
            }
        }
        corpus
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&ListingSummary> {
        self.index.get(id).map(|&i| &self.listings[i])
    }

    pub fn listings(&self) -> &[ListingSummary] {
        &self.listings
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}
