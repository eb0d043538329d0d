//! Portfolio-wide financial roll-ups.
//!
//! Every report that counts "sold" or "rented" properties goes through the
//! predicates in this module so the figures agree across views.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use super::financial::{profit_margin, Margin};
use super::money::Amount;
use super::property::{ListingType, Property, PropertyStatus, PropertyType};

/// A completed sale.
#[must_use]
pub fn is_sold(property: &Property) -> bool {
    property.status == PropertyStatus::Sold
}

/// Currently let to a tenant.
#[must_use]
pub fn is_rented(property: &Property) -> bool {
    property.status == PropertyStatus::Rented
}

/// A rental listing that has collected income.
#[must_use]
pub fn earns_rental_income(property: &Property) -> bool {
    property.listing == ListingType::Rent
        && property
            .financials
            .as_ref()
            .and_then(|f| f.total_rental_earned)
            .is_some_and(|earned| earned > Decimal::ZERO)
}

/// Open for offers.
#[must_use]
pub fn is_active(property: &Property) -> bool {
    property.status == PropertyStatus::Active
}

/// Per-type figures for sold properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeBreakdown {
    pub count: usize,
    pub total_sales: Amount,
    pub total_profit: Amount,
}

/// Financial roll-up across a property collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub sold_count: usize,
    pub total_sales: Amount,
    /// Investment across sold properties only.
    pub total_investment: Amount,
    pub total_profit: Amount,
    /// Total profit over total investment.
    pub aggregate_margin: Margin,
    /// Mean of the applicable per-property margins.
    pub average_margin: Margin,
    pub rental_count: usize,
    pub total_rental_income: Amount,
    pub monthly_rental_income: Amount,
    pub total_earnings: Amount,
    pub total_properties: usize,
    pub active_listings: usize,
    pub by_type: BTreeMap<PropertyType, TypeBreakdown>,
}

impl PortfolioSummary {
    /// Compute the roll-up, deriving every per-property figure afresh.
    #[must_use]
    pub fn from_properties(properties: &[Property]) -> Self {
        let mut sold_count = 0;
        let mut total_sales = Decimal::ZERO;
        let mut total_investment = Decimal::ZERO;
        let mut total_profit = Decimal::ZERO;
        let mut margin_sum = Decimal::ZERO;
        let mut margin_count: u32 = 0;
        let mut by_type: BTreeMap<PropertyType, TypeBreakdown> = BTreeMap::new();

        for property in properties.iter().filter(|p| is_sold(p)) {
            let summary = property.financial_summary();
            let sale = summary.sold_price.unwrap_or_default();
            // A sold record without a price still counts as sold, at zero profit.
            let profit = summary.profit.unwrap_or_default();

            sold_count += 1;
            total_sales += sale;
            total_investment += summary.total_investment;
            total_profit += profit;
            if let Margin::Percent(value) = summary.margin {
                margin_sum += value;
                margin_count += 1;
            }

            let entry = by_type.entry(property.details.property_type).or_default();
            entry.count += 1;
            entry.total_sales += sale;
            entry.total_profit += profit;
        }

        let rentals: Vec<&Property> = properties
            .iter()
            .filter(|p| earns_rental_income(p))
            .collect();
        let total_rental_income = rentals
            .iter()
            .filter_map(|p| p.financials.as_ref().and_then(|f| f.total_rental_earned))
            .sum::<Decimal>();
        let monthly_rental_income = properties
            .iter()
            .filter(|p| is_rented(p))
            .filter_map(|p| p.financials.as_ref().and_then(|f| f.rental_income))
            .sum::<Decimal>();

        let average_margin = if margin_count == 0 {
            Margin::NotApplicable
        } else {
            Margin::Percent(margin_sum / Decimal::from(margin_count))
        };

        Self {
            sold_count,
            total_sales,
            total_investment,
            total_profit,
            aggregate_margin: profit_margin(total_profit, total_investment),
            average_margin,
            rental_count: rentals.len(),
            total_rental_income,
            monthly_rental_income,
            total_earnings: total_profit + total_rental_income,
            total_properties: properties.len(),
            active_listings: properties.iter().filter(|p| is_active(p)).count(),
            by_type,
        }
    }
}

/// Listing inventory counts and values for the admin overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary {
    pub total_properties: usize,
    pub active_properties: usize,
    pub sold_properties: usize,
    pub total_value: Amount,
    /// Sold price, or list price when no sale price was recorded.
    pub total_sold_value: Amount,
}

impl InventorySummary {
    #[must_use]
    pub fn from_properties(properties: &[Property]) -> Self {
        let sold: Vec<&Property> = properties.iter().filter(|p| is_sold(p)).collect();
        Self {
            total_properties: properties.len(),
            active_properties: properties.iter().filter(|p| is_active(p)).count(),
            sold_properties: sold.len(),
            total_value: properties.iter().map(|p| p.price).sum(),
            total_sold_value: sold
                .iter()
                .map(|p| {
                    p.financials
                        .as_ref()
                        .and_then(|f| f.sold_price)
                        .unwrap_or(p.price)
                })
                .sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::financial::Financials;
    use crate::testkit::domain::{property, sold_property};
    use rust_decimal_macros::dec;

    #[test]
    fn rollup_sums_sold_profit_only() {
        let properties = vec![
            sold_property("a", dec!(50000), dec!(60000)),
            sold_property("b", dec!(10000), dec!(8000)),
            property("c"),
        ];

        let summary = PortfolioSummary::from_properties(&properties);

        assert_eq!(summary.sold_count, 2);
        assert_eq!(summary.total_profit, dec!(8000));
        assert_eq!(summary.total_sales, dec!(68000));
        assert_eq!(summary.total_investment, dec!(60000));
        assert_eq!(summary.active_listings, 1);
        assert_eq!(summary.total_properties, 3);
    }

    #[test]
    fn average_margin_skips_not_applicable() {
        let mut free = sold_property("free", dec!(0), dec!(1000));
        free.financials.as_mut().unwrap().purchase_price = None;
        let properties = vec![
            sold_property("a", dec!(100), dec!(120)),
            sold_property("b", dec!(100), dec!(110)),
            free,
        ];

        let summary = PortfolioSummary::from_properties(&properties);

        assert_eq!(summary.average_margin, Margin::Percent(dec!(15)));
        assert_eq!(summary.sold_count, 3);
    }

    #[test]
    fn empty_portfolio_has_no_margin() {
        let summary = PortfolioSummary::from_properties(&[]);
        assert_eq!(summary.average_margin, Margin::NotApplicable);
        assert_eq!(summary.aggregate_margin, Margin::NotApplicable);
        assert_eq!(summary.total_profit, dec!(0));
    }

    #[test]
    fn rental_income_uses_shared_predicates() {
        let mut rented = property("r");
        rented.listing = ListingType::Rent;
        rented.status = PropertyStatus::Rented;
        rented.financials = Some(Financials {
            rental_income: Some(dec!(1200)),
            total_rental_earned: Some(dec!(14400)),
            ..Financials::default()
        });

        let mut listed = property("l");
        listed.listing = ListingType::Rent;
        listed.financials = Some(Financials {
            rental_income: Some(dec!(900)),
            total_rental_earned: Some(dec!(0)),
            ..Financials::default()
        });

        let summary = PortfolioSummary::from_properties(&[rented, listed]);

        assert_eq!(summary.rental_count, 1);
        assert_eq!(summary.total_rental_income, dec!(14400));
        assert_eq!(summary.monthly_rental_income, dec!(1200));
        assert_eq!(summary.total_earnings, dec!(14400));
    }

    #[test]
    fn breakdown_groups_by_property_type() {
        let mut house = sold_property("h", dec!(100), dec!(150));
        house.details.property_type = PropertyType::House;
        let properties = vec![
            house,
            sold_property("a1", dec!(100), dec!(90)),
            sold_property("a2", dec!(100), dec!(130)),
        ];

        let summary = PortfolioSummary::from_properties(&properties);

        let apartments = &summary.by_type[&PropertyType::Apartment];
        assert_eq!(apartments.count, 2);
        assert_eq!(apartments.total_profit, dec!(20));
        assert_eq!(summary.by_type[&PropertyType::House].total_sales, dec!(150));
    }

    #[test]
    fn inventory_falls_back_to_list_price() {
        let mut unpriced = property("x");
        unpriced.status = PropertyStatus::Sold;
        unpriced.price = dec!(500);
        let properties = vec![sold_property("a", dec!(100), dec!(200)), unpriced, property("c")];

        let inventory = InventorySummary::from_properties(&properties);

        assert_eq!(inventory.sold_properties, 2);
        assert_eq!(inventory.active_properties, 1);
        assert_eq!(inventory.total_sold_value, dec!(700));
    }
}
