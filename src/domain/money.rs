//! Monetary type for prices, costs and income.

use rust_decimal::Decimal;

/// Amount of money in euros, represented as a Decimal for precision.
pub type Amount = Decimal;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn amounts_are_exact_decimals() {
        let purchase: Amount = dec!(100000.10);
        let costs: Amount = dec!(0.20);

        assert_eq!(purchase + costs, dec!(100000.30));
    }
}
