//! Investment, profit and margin derivation for a single property.
//!
//! Every figure shown for a property is derived here from the raw monetary
//! inputs. Values precomputed by older writers (`totalInvestment`, `profit`,
//! `profitMargin` on the stored record) are never trusted.
//!
//! # Examples
//!
//! ```
//! use propdesk::domain::financial::{profit, profit_margin, total_investment, Margin};
//! use rust_decimal_macros::dec;
//!
//! let investment = total_investment(Some(dec!(200000)), Some(dec!(50000)));
//! let gain = profit(Some(dec!(300000)), investment).unwrap();
//!
//! assert_eq!(investment, dec!(250000));
//! assert_eq!(gain, dec!(50000));
//! assert_eq!(profit_margin(gain, investment), Margin::Percent(dec!(20)));
//! assert_eq!(profit_margin(gain, dec!(0)), Margin::NotApplicable);
//! ```

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};

use super::money::Amount;

/// Raw financial inputs recorded on a property.
///
/// The `total_investment`, `profit` and `profit_margin` fields mirror what
/// the hosted store may hold. They are written back on updates for
/// compatibility but never read for display; use [`FinancialSummary`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Financials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_price: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_costs: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_investment: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sold_price: Option<Amount>,
    /// Monthly rental income.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rental_income: Option<Amount>,
    /// Cumulative rental income collected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_rental_earned: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profit: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profit_margin: Option<Decimal>,
}

/// Profit expressed as a percentage of total investment.
///
/// `NotApplicable` replaces the infinite or undefined result of dividing by
/// a zero investment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Margin {
    Percent(Decimal),
    NotApplicable,
}

impl Margin {
    /// The percentage, if applicable.
    #[must_use]
    pub const fn value(self) -> Option<Decimal> {
        match self {
            Self::Percent(value) => Some(value),
            Self::NotApplicable => None,
        }
    }

    #[must_use]
    pub const fn is_applicable(self) -> bool {
        matches!(self, Self::Percent(_))
    }
}

impl fmt::Display for Margin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Percent(value) => write!(f, "{:.1}%", value.round_dp(1)),
            Self::NotApplicable => write!(f, "n/a"),
        }
    }
}

impl Serialize for Margin {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value().serialize(serializer)
    }
}

/// Sum of purchase price and project costs; absent values count as zero.
#[must_use]
pub fn total_investment(purchase_price: Option<Amount>, project_costs: Option<Amount>) -> Amount {
    purchase_price.unwrap_or_default() + project_costs.unwrap_or_default()
}

/// Sale price minus investment, or `None` when no sale is recorded.
#[must_use]
pub fn profit(sold_price: Option<Amount>, total_investment: Amount) -> Option<Amount> {
    sold_price.map(|sold| sold - total_investment)
}

/// Profit as a percentage of investment.
///
/// A zero (or negative) investment yields [`Margin::NotApplicable`].
#[must_use]
pub fn profit_margin(profit: Amount, total_investment: Amount) -> Margin {
    if total_investment <= Decimal::ZERO {
        return Margin::NotApplicable;
    }
    profit
        .checked_div(total_investment)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map_or(Margin::NotApplicable, Margin::Percent)
}

/// Derived financial view of one property, recomputed on every read.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub purchase_price: Amount,
    pub project_costs: Amount,
    pub total_investment: Amount,
    pub sold_price: Option<Amount>,
    pub profit: Option<Amount>,
    /// `NotApplicable` when unsold or when investment is zero.
    pub margin: Margin,
    pub monthly_rental_income: Option<Amount>,
    pub total_rental_earned: Amount,
}

impl FinancialSummary {
    /// Derive the summary from raw inputs, ignoring stored derived fields.
    #[must_use]
    pub fn derive(financials: &Financials) -> Self {
        let investment = total_investment(financials.purchase_price, financials.project_costs);
        let profit = profit(financials.sold_price, investment);
        let margin = profit.map_or(Margin::NotApplicable, |p| profit_margin(p, investment));

        Self {
            purchase_price: financials.purchase_price.unwrap_or_default(),
            project_costs: financials.project_costs.unwrap_or_default(),
            total_investment: investment,
            sold_price: financials.sold_price,
            profit,
            margin,
            monthly_rental_income: financials.rental_income,
            total_rental_earned: financials.total_rental_earned.unwrap_or_default(),
        }
    }

    /// Summary for a property with no financial record at all.
    #[must_use]
    pub fn empty() -> Self {
        Self::derive(&Financials::default())
    }

    /// Overwrite the stored derived fields on `financials` with fresh values.
    pub fn write_back(&self, financials: &mut Financials) {
        financials.total_investment = Some(self.total_investment);
        financials.profit = self.profit;
        financials.profit_margin = self.margin.value();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn total_investment_treats_absent_as_zero() {
        assert_eq!(total_investment(None, None), dec!(0));
        assert_eq!(total_investment(Some(dec!(0)), Some(dec!(0))), dec!(0));
        assert_eq!(
            total_investment(Some(dec!(100000)), Some(dec!(25000))),
            dec!(125000)
        );
        assert_eq!(total_investment(Some(dec!(100000)), None), dec!(100000));
    }

    #[test]
    fn profit_requires_a_sale() {
        assert_eq!(profit(Some(dec!(150000)), dec!(125000)), Some(dec!(25000)));
        assert_eq!(profit(None, dec!(125000)), None);
        assert_eq!(profit(Some(dec!(100000)), dec!(125000)), Some(dec!(-25000)));
    }

    #[test]
    fn margin_is_percentage_of_investment() {
        assert_eq!(
            profit_margin(dec!(25000), dec!(125000)),
            Margin::Percent(dec!(20))
        );
        assert_eq!(
            profit_margin(dec!(-2000), dec!(10000)),
            Margin::Percent(dec!(-20))
        );
    }

    #[test]
    fn margin_on_zero_investment_is_not_applicable() {
        for profit in [dec!(0), dec!(1), dec!(-1), dec!(999999999)] {
            assert_eq!(profit_margin(profit, dec!(0)), Margin::NotApplicable);
        }
    }

    #[test]
    fn margin_display_uses_one_decimal() {
        assert_eq!(Margin::Percent(dec!(20)).to_string(), "20.0%");
        assert_eq!(Margin::Percent(dec!(33.333)).to_string(), "33.3%");
        assert_eq!(Margin::NotApplicable.to_string(), "n/a");
    }

    #[test]
    fn margin_serializes_as_nullable_number() {
        assert_eq!(
            serde_json::to_string(&Margin::NotApplicable).unwrap(),
            "null"
        );
        assert_eq!(
            serde_json::to_value(Margin::Percent(dec!(20.5))).unwrap(),
            serde_json::to_value(Some(dec!(20.5))).unwrap()
        );
    }

    #[test]
    fn summary_ignores_stale_stored_fields() {
        let financials = Financials {
            purchase_price: Some(dec!(200000)),
            project_costs: Some(dec!(50000)),
            total_investment: Some(dec!(1)),
            sold_price: Some(dec!(300000)),
            profit: Some(dec!(7)),
            profit_margin: Some(dec!(99)),
            ..Financials::default()
        };

        let summary = FinancialSummary::derive(&financials);

        assert_eq!(summary.total_investment, dec!(250000));
        assert_eq!(summary.profit, Some(dec!(50000)));
        assert_eq!(summary.margin, Margin::Percent(dec!(20)));
    }

    #[test]
    fn unsold_summary_has_no_profit_or_margin() {
        let financials = Financials {
            purchase_price: Some(dec!(100)),
            ..Financials::default()
        };
        let summary = FinancialSummary::derive(&financials);
        assert_eq!(summary.profit, None);
        assert_eq!(summary.margin, Margin::NotApplicable);
    }

    #[test]
    fn write_back_refreshes_derived_fields() {
        let mut financials = Financials {
            sold_price: Some(dec!(5000)),
            profit_margin: Some(dec!(12)),
            ..Financials::default()
        };
        FinancialSummary::derive(&financials).write_back(&mut financials);

        assert_eq!(financials.total_investment, Some(dec!(0)));
        assert_eq!(financials.profit, Some(dec!(5000)));
        assert_eq!(financials.profit_margin, None);
    }

    #[test]
    fn financials_deserialize_from_camel_case() {
        let json = r#"{"purchasePrice": 1000, "projectCosts": 250.5, "totalRentalEarned": 30}"#;
        let financials: Financials = serde_json::from_str(json).unwrap();
        assert_eq!(financials.purchase_price, Some(dec!(1000)));
        assert_eq!(financials.project_costs, Some(dec!(250.5)));
        assert_eq!(financials.total_rental_earned, Some(dec!(30)));
        assert_eq!(financials.sold_price, None);
    }
}
