//! Input checks for calculation requests and lead forms.
//!
//! Validation reports every problem at once instead of stopping at the
//! first. The calculator itself does not validate; callers run these
//! checks first and decide what to do with the report.

use crate::calculation::calculator::CalculationInput;
use crate::core::catalog::{ScenarioCatalog, ScenarioType};
use crate::core::currency::FxRateTable;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_INVESTMENT: Decimal = dec!(1000);
pub const MAX_INVESTMENT: Decimal = dec!(100000000);
/// Below this, projections get a precision warning.
pub const SMALL_INVESTMENT: Decimal = dec!(10000);
/// Above this, projections get a custom-analysis warning.
pub const LARGE_INVESTMENT: Decimal = dec!(10000000);

const MAX_EMAIL_LEN: usize = 254;
const MAX_MESSAGE_LEN: usize = 1000;

static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
static NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z\s'-]+$").unwrap());
static SCRIPT_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<script\b.*?</script>").unwrap());
static JAVASCRIPT_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)javascript:").unwrap());
static EVENT_HANDLER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)on\w+\s*=").unwrap());

/// Collected errors and warnings. Valid when `errors` is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for error in &self.errors {
            writeln!(f, "error: {error}")?;
        }
        for warning in &self.warnings {
            writeln!(f, "warning: {warning}")?;
        }
        Ok(())
    }
}

/// Check a calculation request against the catalog and rate table.
pub fn validate_calculation(
    input: &CalculationInput,
    catalog: &ScenarioCatalog,
    rates: &FxRateTable,
) -> ValidationReport {
    let mut report = validate_investment(input.investment);

    let category = if input.category.is_empty() {
        report.error("Please select a valid category");
        None
    } else {
        let category = catalog.category(&input.category);
        if category.is_none() {
            report.error("Selected category is not available");
        }
        category
    };

    if input.scenario_type.is_empty() {
        report.error("Please select a valid scenario");
    } else if input.scenario_type.parse::<ScenarioType>().is_err() {
        report.error("Selected scenario is not available");
    }

    if let (Some(category), Some(specific)) = (category, input.specific_scenario.as_deref()) {
        if !specific.is_empty() && !category.scenarios.contains_key(specific) {
            report.error("Selected specific scenario is not available for this category");
        }
    }

    if input.currency.as_str().is_empty() {
        report.error("Currency is required");
    } else if !rates.is_supported(&input.currency) {
        report.error("Selected currency is not supported");
    }

    report
}

/// Range check on the entered investment amount.
pub fn validate_investment(investment: Decimal) -> ValidationReport {
    let mut report = ValidationReport::new();
    if investment.is_zero() {
        report.error("Investment amount is required");
    } else if investment < MIN_INVESTMENT {
        report.error("Investment must be at least $1,000");
    } else if investment > MAX_INVESTMENT {
        report.error("Investment cannot exceed $100,000,000");
    } else if investment < SMALL_INVESTMENT {
        report.warn("Small investments may have limited ROI accuracy");
    } else if investment > LARGE_INVESTMENT {
        report.warn("Large investments may require custom analysis");
    }
    report
}

pub fn validate_email(email: &str) -> Vec<String> {
    if email.is_empty() {
        vec!["Email address is required".to_string()]
    } else if !EMAIL.is_match(email) {
        vec!["Please enter a valid email address".to_string()]
    } else if email.chars().count() > MAX_EMAIL_LEN {
        vec!["Email address is too long".to_string()]
    } else {
        Vec::new()
    }
}

/// Only digits count; separators and `+` are ignored.
pub fn validate_phone(phone: Option<&str>) -> Vec<String> {
    let Some(phone) = phone.filter(|p| !p.is_empty()) else {
        return Vec::new();
    };
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    if digits < 10 {
        vec!["Phone number must be at least 10 digits".to_string()]
    } else if digits > 15 {
        vec!["Phone number is too long".to_string()]
    } else {
        Vec::new()
    }
}

pub fn validate_company(company: &str) -> Vec<String> {
    let len = company.chars().count();
    if company.is_empty() {
        vec!["Company name is required".to_string()]
    } else if len < 2 {
        vec!["Company name must be at least 2 characters".to_string()]
    } else if len > 100 {
        vec!["Company name is too long".to_string()]
    } else {
        Vec::new()
    }
}

/// `field` is the label used in messages, e.g. `First name`.
pub fn validate_name(name: &str, field: &str) -> Vec<String> {
    let len = name.chars().count();
    if name.is_empty() {
        vec![format!("{field} is required")]
    } else if len < 2 {
        vec![format!("{field} must be at least 2 characters")]
    } else if len > 50 {
        vec![format!("{field} is too long")]
    } else if !NAME.is_match(name) {
        vec![format!(
            "{field} can only contain letters, spaces, hyphens, and apostrophes"
        )]
    } else {
        Vec::new()
    }
}

pub fn validate_message(message: Option<&str>) -> Vec<String> {
    match message {
        Some(m) if m.chars().count() > MAX_MESSAGE_LEN => {
            vec!["Message is too long (maximum 1000 characters)".to_string()]
        }
        _ => Vec::new(),
    }
}

/// Strip markup that could execute when a stored field is rendered.
///
/// Trims, then removes `<script>` blocks, `javascript:` schemes, inline
/// `on*=` handlers and any remaining angle brackets.
pub fn sanitize_input(input: &str) -> String {
    let out = SCRIPT_BLOCK.replace_all(input.trim(), "");
    let out = JAVASCRIPT_URL.replace_all(&out, "");
    let out = EVENT_HANDLER.replace_all(&out, "");
    out.chars().filter(|c| *c != '<' && *c != '>').collect()
}

/// Apply [`sanitize_input`] to every string inside a JSON value.
pub fn sanitize_json(value: &serde_json::Value) -> serde_json::Value {
    use serde_json::Value;
    match value {
        Value::String(s) => Value::String(sanitize_input(s)),
        Value::Array(items) => Value::Array(items.iter().map(sanitize_json).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, v)| (key.clone(), sanitize_json(v)))
                .collect(),
        ),
        other => other.clone(),
    }
}
