//! Property listing records.
//!
//! Field names serialize in camelCase to match the JSON documents held by
//! the hosted data store.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::financial::{FinancialSummary, Financials};
use super::id::PropertyId;
use super::money::Amount;

/// Whether the listing is offered for sale or for rent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingType {
    Sale,
    Rent,
}

/// Lifecycle status of a listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyStatus {
    #[default]
    Active,
    Pending,
    Sold,
    Rented,
}

impl PropertyStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Pending => "pending",
            Self::Sold => "sold",
            Self::Rented => "rented",
        }
    }
}

impl fmt::Display for PropertyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of dwelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Apartment,
    House,
    Condo,
    Townhouse,
    Other,
}

impl PropertyType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Apartment => "apartment",
            Self::House => "house",
            Self::Condo => "condo",
            Self::Townhouse => "townhouse",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(default)]
    pub address: Option<String>,
    pub city: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Details {
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub sqft: u32,
    #[serde(default)]
    pub year_built: Option<i32>,
    pub property_type: PropertyType,
    #[serde(default)]
    pub lot_size: Option<u32>,
    #[serde(default)]
    pub parking: Option<u32>,
    #[serde(default)]
    pub floors: Option<u32>,
    #[serde(default)]
    pub furnished: Option<bool>,
    #[serde(default)]
    pub pet_friendly: Option<bool>,
}

/// Listing agent contact card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// A property listing with optional financial tracking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: PropertyId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: Amount,
    #[serde(default)]
    pub images: Vec<String>,
    pub location: Location,
    pub details: Details,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(rename = "type")]
    pub listing: ListingType,
    #[serde(default)]
    pub status: PropertyStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financials: Option<Financials>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sold_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<Agent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listed_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_liked: bool,
}

impl Property {
    /// Check required fields and non-negative amounts.
    ///
    /// # Errors
    /// Returns the first violated rule.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.title.trim().is_empty() {
            return Err(DomainError::MissingField { field: "title" });
        }
        if self.location.city.trim().is_empty() {
            return Err(DomainError::MissingField { field: "city" });
        }
        non_negative("price", Some(self.price))?;

        if let Some(financials) = &self.financials {
            non_negative("purchasePrice", financials.purchase_price)?;
            non_negative("projectCosts", financials.project_costs)?;
            non_negative("soldPrice", financials.sold_price)?;
            non_negative("rentalIncome", financials.rental_income)?;
            non_negative("totalRentalEarned", financials.total_rental_earned)?;
        }
        Ok(())
    }

    /// Freshly derived financial figures for this property.
    #[must_use]
    pub fn financial_summary(&self) -> FinancialSummary {
        self.financials
            .as_ref()
            .map_or_else(FinancialSummary::empty, FinancialSummary::derive)
    }

    /// Record a sale and archive the listing.
    ///
    /// Stored derived fields are rewritten from the new inputs.
    ///
    /// # Errors
    /// Returns [`DomainError::NonPositiveSoldPrice`] if `sold_price <= 0`.
    pub fn mark_as_sold(&mut self, sold_price: Amount, at: DateTime<Utc>) -> Result<(), DomainError> {
        if sold_price <= Decimal::ZERO {
            return Err(DomainError::NonPositiveSoldPrice { price: sold_price });
        }

        let financials = self.financials.get_or_insert_with(Financials::default);
        financials.sold_price = Some(sold_price);
        FinancialSummary::derive(financials).write_back(financials);

        self.status = PropertyStatus::Sold;
        self.sold_date = Some(at);
        self.is_archived = true;
        self.updated_date = Some(at);
        Ok(())
    }

    /// The address line, or an empty string when not recorded.
    #[must_use]
    pub fn address(&self) -> &str {
        self.location.address.as_deref().unwrap_or("")
    }
}

fn non_negative(field: &'static str, amount: Option<Amount>) -> Result<(), DomainError> {
    match amount {
        Some(amount) if amount < Decimal::ZERO => Err(DomainError::NegativeAmount { field, amount }),
        _ => Ok(()),
    }
}
