//! Listing search, filtering and ordering for the public browser.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::property::{ListingType, Property};

/// Listing type filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingFilter {
    #[default]
    All,
    Sale,
    Rent,
}

impl ListingFilter {
    fn matches(self, listing: ListingType) -> bool {
        match self {
            Self::All => true,
            Self::Sale => listing == ListingType::Sale,
            Self::Rent => listing == ListingType::Rent,
        }
    }
}

/// Sort order for listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    PriceLow,
    PriceHigh,
    #[default]
    Newest,
    Oldest,
    YearNew,
    YearOld,
}

impl SortOption {
    fn compare(self, a: &Property, b: &Property) -> Ordering {
        match self {
            Self::PriceLow => a.price.cmp(&b.price),
            Self::PriceHigh => b.price.cmp(&a.price),
            Self::Newest => b.listed_date.cmp(&a.listed_date),
            Self::Oldest => a.listed_date.cmp(&b.listed_date),
            Self::YearNew => year(b).cmp(&year(a)),
            Self::YearOld => year(a).cmp(&year(b)),
        }
    }
}

fn year(property: &Property) -> i32 {
    property.details.year_built.unwrap_or(0)
}

/// Browser query: free-text search, type filter, favorites toggle and order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingQuery {
    pub search: String,
    pub listing: ListingFilter,
    pub favorites_only: bool,
    pub sort: SortOption,
}

impl ListingQuery {
    /// Whether `property` passes every filter.
    #[must_use]
    pub fn matches(&self, property: &Property) -> bool {
        let needle = self.search.trim().to_lowercase();
        let matches_search = needle.is_empty()
            || property.title.to_lowercase().contains(&needle)
            || property.location.city.to_lowercase().contains(&needle)
            || property.address().to_lowercase().contains(&needle);

        matches_search
            && self.listing.matches(property.listing)
            && (!self.favorites_only || property.is_liked)
    }

    /// Filter then stable-sort.
    #[must_use]
    pub fn apply<'a>(&self, properties: &'a [Property]) -> Vec<&'a Property> {
        let mut selected: Vec<&Property> = properties.iter().filter(|p| self.matches(p)).collect();
        selected.sort_by(|a, b| self.sort.compare(a, b));
        selected
    }
}

/// Image carousel position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Gallery {
    index: usize,
    len: usize,
}

impl Gallery {
    #[must_use]
    pub const fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    pub fn next(&mut self) -> usize {
        if self.len > 0 {
            self.index = (self.index + 1) % self.len;
        }
        self.index
    }

    pub fn previous(&mut self) -> usize {
        if self.len > 0 {
            self.index = (self.index + self.len - 1) % self.len;
        }
        self.index
    }
}
