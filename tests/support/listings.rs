use std::path::{Path, PathBuf};

use propdesk::domain::{Financials, ListingType, Property, PropertyStatus, PropertyType};
use propdesk::testkit::domain::{property, sold_property};
use rust_decimal_macros::dec;

/// Three sales (a profit, a loss and one with nothing invested), one
/// rental and one open listing.
///
/// Expected roll-up: 400 000 sold against 300 000 invested for 100 000
/// profit; 14 400 rent collected at 1 200 a month.
pub fn portfolio() -> Vec<Property> {
    let gain = sold_property("gain", dec!(200000), dec!(260000));

    let mut loss = sold_property("loss", dec!(100000), dec!(90000));
    loss.details.property_type = PropertyType::House;

    let mut gift = property("gift");
    gift.status = PropertyStatus::Sold;
    gift.financials = Some(Financials {
        sold_price: Some(dec!(50000)),
        ..Financials::default()
    });

    let mut rental = property("rental");
    rental.listing = ListingType::Rent;
    rental.status = PropertyStatus::Rented;
    rental.financials = Some(Financials {
        rental_income: Some(dec!(1200)),
        total_rental_earned: Some(dec!(14400)),
        ..Financials::default()
    });

    vec![gain, loss, gift, rental, property("open")]
}

/// Write `listings` as a JSON array under `dir`.
pub fn write(dir: &Path, listings: &[Property]) -> PathBuf {
    let path = dir.join("listings.json");
    std::fs::write(&path, serde_json::to_string_pretty(listings).unwrap()).unwrap();
    path
}
