//! Language selection and locale-aware formatting of money and margins.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::financial::Margin;
use super::money::Amount;

/// Interface language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Portuguese (the default).
    #[default]
    Pt,
    /// English.
    En,
}

impl Language {
    /// The code persisted in preference storage.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Pt => "pt",
            Self::En => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pt" => Ok(Self::Pt),
            "en" => Ok(Self::En),
            other => Err(DomainError::UnsupportedLanguage(other.to_string())),
        }
    }
}

/// Format a euro amount with two decimals.
///
/// `pt`: `1 234,56 €`, `en`: `€1,234.56`.
#[must_use]
pub fn format_currency(amount: Amount, language: Language) -> String {
    let rounded = amount.round_dp(2);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    match language {
        Language::Pt => format!("{sign}{},{fraction} €", group_digits(whole, ' ')),
        Language::En => format!("{sign}€{}.{fraction}", group_digits(whole, ',')),
    }
}

/// Format a margin with one decimal, or the localized "not available" text.
#[must_use]
pub fn format_margin(margin: Margin, language: Language) -> String {
    match (margin, language) {
        (Margin::Percent(value), Language::Pt) => {
            format!("{:.1}%", value.round_dp(1)).replace('.', ",")
        }
        (Margin::Percent(value), Language::En) => format!("{:.1}%", value.round_dp(1)),
        (Margin::NotApplicable, Language::Pt) => "n/d".to_string(),
        (Margin::NotApplicable, Language::En) => "n/a".to_string(),
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}

/// Report labels in one language.
#[derive(Debug, Clone, Copy)]
pub struct Labels {
    pub financial_report: &'static str,
    pub properties_analyzed: &'static str,
    pub total_sales: &'static str,
    pub total_profit: &'static str,
    pub total_investment: &'static str,
    pub average_margin: &'static str,
    pub aggregate_margin: &'static str,
    pub rental_income: &'static str,
    pub monthly_rental_income: &'static str,
    pub total_earnings: &'static str,
    pub inventory: &'static str,
    pub total_properties: &'static str,
    pub active_listings: &'static str,
    pub total_value: &'static str,
    pub total_sold_value: &'static str,
    pub property_type: &'static str,
    pub count: &'static str,
    pub purchase_price: &'static str,
    pub project_costs: &'static str,
    pub sold_price: &'static str,
    pub profit: &'static str,
    pub margin: &'static str,
    pub status: &'static str,
    pub not_sold: &'static str,
}

const PT: Labels = Labels {
    financial_report: "Dashboard Financeiro",
    properties_analyzed: "Propriedades Analisadas",
    total_sales: "Vendas Totais",
    total_profit: "Lucro Total",
    total_investment: "Investimento Total",
    average_margin: "Margem Média",
    aggregate_margin: "Margem Global",
    rental_income: "Rendimento de Arrendamento",
    monthly_rental_income: "Renda Mensal",
    total_earnings: "Ganhos Totais",
    inventory: "Inventário",
    total_properties: "Total de Propriedades",
    active_listings: "Anúncios Ativos",
    total_value: "Valor Total",
    total_sold_value: "Valor Vendido",
    property_type: "Tipo",
    count: "Quantidade",
    purchase_price: "Preço de Compra",
    project_costs: "Custos do Projeto",
    sold_price: "Preço de Venda",
    profit: "Lucro",
    margin: "Margem",
    status: "Estado",
    not_sold: "Não vendido",
};

const EN: Labels = Labels {
    financial_report: "Financial Dashboard",
    properties_analyzed: "Properties Analyzed",
    total_sales: "Total Sales",
    total_profit: "Total Profit",
    total_investment: "Total Investment",
    average_margin: "Average Margin",
    aggregate_margin: "Overall Margin",
    rental_income: "Rental Income",
    monthly_rental_income: "Monthly Rent",
    total_earnings: "Total Earnings",
    inventory: "Inventory",
    total_properties: "Total Properties",
    active_listings: "Active Listings",
    total_value: "Total Value",
    total_sold_value: "Sold Value",
    property_type: "Type",
    count: "Count",
    purchase_price: "Purchase Price",
    project_costs: "Project Costs",
    sold_price: "Sold Price",
    profit: "Profit",
    margin: "Margin",
    status: "Status",
    not_sold: "Not sold",
};

impl Labels {
    #[must_use]
    pub const fn for_language(language: Language) -> &'static Labels {
        match language {
            Language::Pt => &PT,
            Language::En => &EN,
        }
    }
}
