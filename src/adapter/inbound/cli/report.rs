//! Portfolio report over an exported listings file.

use std::path::Path;

use rust_decimal::Decimal;
use serde_json::json;
use tabled::builder::Builder;

use super::command::ReportArgs;
use crate::adapter::inbound::cli::output;
use crate::domain::locale::{format_currency, format_margin, Labels};
use crate::domain::{Amount, InventorySummary, Language, PortfolioSummary, Property};
use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::settings::Config;

/// Read a JSON array of property records.
///
/// # Errors
/// Returns an error if the file cannot be read or is not a property array.
pub fn load_listings(path: &Path) -> Result<Vec<Property>> {
    let content = std::fs::read_to_string(path)?;
    let listings = serde_json::from_str(&content)?;
    Ok(listings)
}

/// The explicit `--lang`, else the stored language preference.
pub(super) fn resolve_language(config: &Config, lang: Option<Language>) -> Language {
    lang.unwrap_or_else(|| bootstrap::build_preferences(config).language())
}

/// Color an amount by its sign.
pub(super) fn signed(amount: Amount, language: Language) -> String {
    let text = format_currency(amount, language);
    if amount < Decimal::ZERO {
        output::negative(text)
    } else {
        output::positive(text)
    }
}

/// Execute the `report` command.
pub fn execute(config: &Config, args: &ReportArgs) -> Result<()> {
    let listings = load_listings(&args.file)?;
    let language = resolve_language(config, args.lang);

    let portfolio = PortfolioSummary::from_properties(&listings);
    let inventory = InventorySummary::from_properties(&listings);

    if output::is_json() {
        output::json_output(json!({
            "command": "report",
            "language": language,
            "portfolio": portfolio,
            "inventory": inventory,
        }));
        return Ok(());
    }
    if output::is_quiet() {
        return Ok(());
    }

    let labels = Labels::for_language(language);
    let money = |amount| format_currency(amount, language);

    output::header(env!("CARGO_PKG_VERSION"));
    output::section(labels.financial_report);
    output::field(labels.properties_analyzed, portfolio.sold_count);
    output::field(labels.total_sales, money(portfolio.total_sales));
    output::field(labels.total_investment, money(portfolio.total_investment));
    output::field(labels.total_profit, signed(portfolio.total_profit, language));
    output::field(
        labels.aggregate_margin,
        format_margin(portfolio.aggregate_margin, language),
    );
    output::field(
        labels.average_margin,
        format_margin(portfolio.average_margin, language),
    );
    output::field(labels.rental_income, money(portfolio.total_rental_income));
    output::field(
        labels.monthly_rental_income,
        money(portfolio.monthly_rental_income),
    );
    output::field(labels.total_earnings, signed(portfolio.total_earnings, language));

    if !portfolio.by_type.is_empty() {
        output::section(labels.property_type);
        output::lines(&breakdown_table(&portfolio, language));
    }

    output::section(labels.inventory);
    output::field(labels.total_properties, inventory.total_properties);
    output::field(labels.active_listings, inventory.active_properties);
    output::field(labels.total_value, money(inventory.total_value));
    output::field(labels.total_sold_value, money(inventory.total_sold_value));

    Ok(())
}

fn breakdown_table(portfolio: &PortfolioSummary, language: Language) -> String {
    let labels = Labels::for_language(language);
    let mut builder = Builder::default();
    builder.push_record([
        labels.property_type.to_string(),
        labels.count.to_string(),
        labels.total_sales.to_string(),
        labels.total_profit.to_string(),
    ]);
    for (kind, row) in &portfolio.by_type {
        builder.push_record([
            kind.to_string(),
            row.count.to_string(),
            format_currency(row.total_sales, language),
            format_currency(row.total_profit, language),
        ]);
    }
    builder.build().to_string()
}
