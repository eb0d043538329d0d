//! Financial summary for a single listing.

use serde_json::json;

use super::command::PropertyArgs;
use super::report::{load_listings, resolve_language, signed};
use crate::adapter::inbound::cli::output;
use crate::domain::locale::{format_currency, format_margin, Labels};
use crate::domain::Property;
use crate::error::{Result, ServiceError};
use crate::infrastructure::config::settings::Config;

fn find(listings: Vec<Property>, id: &str) -> Result<Property> {
    listings
        .into_iter()
        .find(|p| p.id.as_str() == id)
        .ok_or_else(|| ServiceError::NotFound(format!("property {id}")).into())
}

/// Execute the `property` command.
pub fn execute(config: &Config, args: &PropertyArgs) -> Result<()> {
    let property = find(load_listings(&args.file)?, &args.id)?;
    let language = resolve_language(config, args.lang);
    let summary = property.financial_summary();

    if output::is_json() {
        output::json_output(json!({
            "command": "property",
            "id": property.id,
            "title": property.title,
            "status": property.status,
            "summary": summary,
        }));
        return Ok(());
    }
    if output::is_quiet() {
        return Ok(());
    }

    let labels = Labels::for_language(language);
    let money = |amount| format_currency(amount, language);

    output::header(env!("CARGO_PKG_VERSION"));
    output::section(&property.title);
    output::field(labels.status, property.status);
    output::field(labels.purchase_price, money(summary.purchase_price));
    output::field(labels.project_costs, money(summary.project_costs));
    output::field(labels.total_investment, money(summary.total_investment));
    match (summary.sold_price, summary.profit) {
        (Some(sold), Some(profit)) => {
            output::field(labels.sold_price, money(sold));
            output::field(labels.profit, signed(profit, language));
        }
        _ => output::field(labels.sold_price, output::muted(labels.not_sold)),
    }
    output::field(labels.margin, format_margin(summary.margin, language));
    if let Some(rent) = summary.monthly_rental_income {
        output::field(labels.monthly_rental_income, money(rent));
    }
    output::field(labels.rental_income, money(summary.total_rental_earned));

    Ok(())
}
