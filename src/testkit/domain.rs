//! Builders for property records used across tests.
//!
//! Each builder returns a valid record; tests tweak the fields they care
//! about instead of spelling out the whole listing.

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;

use crate::domain::financial::Financials;
use crate::domain::property::{Details, Location};
use crate::domain::{ListingType, Property, PropertyId, PropertyStatus, PropertyType, UserId, UserProfile};
use crate::domain::user::Role;

/// An active apartment for sale in Lisboa with no financial data.
pub fn property(id: &str) -> Property {
    Property {
        id: PropertyId::new(id),
        title: format!("Listing {id}"),
        description: String::new(),
        price: Decimal::new(250_000, 0),
        images: vec![format!("https://images.example/{id}.jpg")],
        location: Location {
            address: None,
            city: "Lisboa".to_string(),
            ..Location::default()
        },
        details: Details {
            bedrooms: 2,
            bathrooms: 1,
            sqft: 900,
            year_built: Some(2000),
            property_type: PropertyType::Apartment,
            lot_size: None,
            parking: None,
            floors: None,
            furnished: None,
            pet_friendly: None,
        },
        features: Vec::new(),
        amenities: Vec::new(),
        listing: ListingType::Sale,
        status: PropertyStatus::Active,
        financials: None,
        sold_date: None,
        is_archived: false,
        agent: None,
        listed_date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single(),
        updated_date: None,
        is_liked: false,
    }
}

/// A sold apartment bought for `purchase_price` with no project costs.
pub fn sold_property(id: &str, purchase_price: Decimal, sold_price: Decimal) -> Property {
    let mut property = property(id);
    property.status = PropertyStatus::Sold;
    property.is_archived = true;
    property.financials = Some(Financials {
        purchase_price: Some(purchase_price),
        sold_price: Some(sold_price),
        ..Financials::default()
    });
    property
}

/// A stored profile row.
pub fn profile(id: &str, name: &str, role: Role) -> UserProfile {
    UserProfile {
        id: UserId::new(id),
        name: name.to_string(),
        email: Some(format!("{id}@luzion.pt")),
        role,
        created_at: None,
        updated_at: None,
    }
}
