use crate::calculation::projection::Projection;
use crate::calculation::recommendation::recommend;
use crate::calculation::result::{
    CalculationResult, ConfidenceInterval, FactorImpact, IndustryBenchmark,
};
use crate::calculation::risk::RiskRating;
use crate::core::catalog::{ScenarioCatalog, ScenarioType, ScenarioTypeProfile};
use crate::core::currency::{CurrencyCode, FxRateTable};
use crate::core::rounding::whole;
use crate::core::selector::{ScenarioSelector, Selection};
use crate::error::{RoiError, RoiResult};
use crate::recording::{CalculationRecord, RecordedEvent, Recorder, RequestInfo};
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Lower confidence bound as a share of net return.
const CONFIDENCE_LOW: Decimal = dec!(0.7);
/// Upper confidence bound as a share of net return.
const CONFIDENCE_HIGH: Decimal = dec!(1.3);

/// One calculation request.
///
/// Accepts the field names the web client sends: `scenario` is an alias
/// for `scenarioType`, and `currency` defaults to USD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationInput {
    pub investment: Decimal,
    pub category: String,
    #[serde(alias = "scenario")]
    pub scenario_type: String,
    #[serde(default)]
    pub specific_scenario: Option<String>,
    #[serde(default)]
    pub currency: CurrencyCode,
}

impl CalculationInput {
    pub fn new(
        investment: Decimal,
        category: impl Into<String>,
        scenario_type: impl Into<String>,
    ) -> Self {
        Self {
            investment,
            category: category.into(),
            scenario_type: scenario_type.into(),
            specific_scenario: None,
            currency: CurrencyCode::usd(),
        }
    }

    pub fn with_specific_scenario(mut self, key: impl Into<String>) -> Self {
        self.specific_scenario = Some(key.into());
        self
    }

    pub fn with_currency(mut self, currency: CurrencyCode) -> Self {
        self.currency = currency;
        self
    }
}

/// Default-scenario results for all three scenario types.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioComparison {
    pub conservative: Option<CalculationResult>,
    pub realistic: Option<CalculationResult>,
    pub optimistic: Option<CalculationResult>,
}

impl ScenarioComparison {
    pub fn get(&self, scenario_type: ScenarioType) -> Option<&CalculationResult> {
        match scenario_type {
            ScenarioType::Conservative => self.conservative.as_ref(),
            ScenarioType::Realistic => self.realistic.as_ref(),
            ScenarioType::Optimistic => self.optimistic.as_ref(),
        }
    }
}

impl fmt::Display for ScenarioComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Scenario Comparison ===")?;
        writeln!(
            f,
            "{:<14} {:>16} {:>8} {:>12} {:>8}",
            "Scenario", "Net Return", "ROI", "Break-even", "Risk"
        )?;
        for scenario_type in ScenarioType::ALL {
            match self.get(scenario_type) {
                Some(result) => {
                    let break_even = result
                        .break_even_months
                        .map(|m| format!("{m} mo"))
                        .unwrap_or_else(|| "never".to_string());
                    writeln!(
                        f,
                        "{:<14} {:>16} {:>8} {:>12} {:>8}",
                        scenario_type,
                        result.net_return_formatted,
                        result.roi_formatted,
                        break_even,
                        result.risk_rating.to_string()
                    )?;
                }
                None => writeln!(f, "{:<14} {:>16}", scenario_type, "unavailable")?,
            }
        }
        Ok(())
    }
}

/// The ROI calculator.
///
/// Holds the catalog and rate table by value; both are read-only after
/// construction. When a [`Recorder`] is attached every successful
/// calculation is handed to it without waiting.
pub struct RoiCalculator {
    catalog: ScenarioCatalog,
    rates: FxRateTable,
    recorder: Option<Recorder>,
}

impl RoiCalculator {
    pub fn new(catalog: ScenarioCatalog, rates: FxRateTable) -> Self {
        Self {
            catalog,
            rates,
            recorder: None,
        }
    }

    pub fn with_recorder(mut self, recorder: Recorder) -> Self {
        self.recorder = Some(recorder);
        self
    }

    pub fn catalog(&self) -> &ScenarioCatalog {
        &self.catalog
    }

    pub fn rates(&self) -> &FxRateTable {
        &self.rates
    }

    pub fn recorder(&self) -> Option<&Recorder> {
        self.recorder.as_ref()
    }

    /// Calculate without request metadata.
    pub fn calculate(&self, input: &CalculationInput) -> RoiResult<CalculationResult> {
        self.calculate_with_request(input, None)
    }

    /// Calculate a projection and, if a recorder is attached, record it.
    ///
    /// Fails only when the category or scenario type is unknown. An
    /// unknown specific scenario falls back to the category default and an
    /// unknown currency is priced at rate 1.
    pub fn calculate_with_request(
        &self,
        input: &CalculationInput,
        request: Option<&RequestInfo>,
    ) -> RoiResult<CalculationResult> {
        let selection = ScenarioSelector::new(&self.catalog)
            .resolve(&input.category, input.specific_scenario.as_deref())?;
        let scenario_type: ScenarioType =
            input
                .scenario_type
                .parse()
                .map_err(|_| RoiError::InvalidScenarioType {
                    scenario: input.scenario_type.clone(),
                })?;
        let profile = self.catalog.profile(scenario_type);

        let usd_investment =
            self.rates
                .convert(input.investment, &input.currency, &self.rates.base_currency);
        let projection = Projection::compute(usd_investment, selection.entry, profile);
        let result = self.build_result(input, &selection, profile, projection);

        log::info!(
            "calculated {} {} / {} / {}: roi={}%",
            input.investment,
            input.currency,
            selection.category_key,
            scenario_type,
            result.roi
        );

        if let Some(recorder) = &self.recorder {
            recorder.record(RecordedEvent::Calculation(CalculationRecord::new(
                input,
                &selection,
                scenario_type,
                request.cloned(),
                &result,
            )));
        }

        Ok(result)
    }

    /// Run all three scenario types on the category default scenario.
    ///
    /// A failing leg is logged and left empty; it does not abort the others.
    pub fn compare(
        &self,
        investment: Decimal,
        category: &str,
        currency: &CurrencyCode,
    ) -> ScenarioComparison {
        let run = |scenario_type: ScenarioType| {
            let input = CalculationInput::new(investment, category, scenario_type.key())
                .with_currency(currency.clone());
            match self.calculate(&input) {
                Ok(result) => Some(result),
                Err(e) => {
                    log::warn!("{scenario_type} comparison failed: {e}");
                    None
                }
            }
        };

        ScenarioComparison {
            conservative: run(ScenarioType::Conservative),
            realistic: run(ScenarioType::Realistic),
            optimistic: run(ScenarioType::Optimistic),
        }
    }

    fn build_result(
        &self,
        input: &CalculationInput,
        selection: &Selection<'_>,
        profile: &ScenarioTypeProfile,
        projection: Projection,
    ) -> CalculationResult {
        let currency = &input.currency;
        let base = &self.rates.base_currency;
        let display = |usd: Decimal| self.rates.convert(usd, base, currency);
        let formatted = |usd: Decimal| self.rates.format(display(usd), currency);
        let hundred = Decimal::ONE_HUNDRED;

        let entry = selection.entry;
        let net_return = projection.net_return;
        let roi = whole((projection.risk_adjusted_roi - Decimal::ONE) * hundred);

        let factor_analysis = entry
            .factors
            .iter()
            .map(|(factor, weight)| FactorImpact {
                factor: humanize_factor(factor),
                weight: whole(*weight * hundred),
                impact: whole(net_return * *weight),
                impact_formatted: formatted(net_return * *weight),
            })
            .collect();

        let confidence_interval = ConfidenceInterval {
            low: whole(net_return * CONFIDENCE_LOW),
            high: whole(net_return * CONFIDENCE_HIGH),
            low_formatted: formatted(net_return * CONFIDENCE_LOW),
            high_formatted: formatted(net_return * CONFIDENCE_HIGH),
        };

        let industry_benchmark = IndustryBenchmark {
            average_roi: whole((entry.average_roi - Decimal::ONE) * hundred),
            timeframe: entry.timeframe_months.get(),
            performance_vs_benchmark: whole(
                (projection.risk_adjusted_roi / entry.average_roi - Decimal::ONE) * hundred,
            ),
        };

        let recommendations = recommend(
            input.investment,
            projection.risk_adjusted_roi,
            entry.timeframe_months.get(),
            profile.risk_factor,
        );

        CalculationResult {
            investment: whole(input.investment),
            investment_formatted: self.rates.format(input.investment, currency),
            category: selection.category.name.clone(),
            scenario: profile.name.clone(),
            specific_scenario: entry.name.clone(),
            currency: currency.clone(),

            total_return: whole(display(projection.gross_return)),
            total_return_formatted: formatted(projection.gross_return),
            net_return: whole(display(net_return)),
            net_return_formatted: formatted(net_return),

            roi,
            roi_formatted: format!("{roi}%"),

            time_to_roi: entry.timeframe_months.get(),
            break_even_months: projection.break_even_months,

            monthly_return: whole(display(projection.monthly_return)),
            monthly_return_formatted: formatted(projection.monthly_return),
            annual_return: whole(display(projection.annual_return)),
            annual_return_formatted: formatted(projection.annual_return),

            monthly_returns: projection
                .monthly_returns
                .iter()
                .map(|v| whole(display(*v)))
                .collect(),
            cumulative_returns: projection
                .cumulative_returns
                .iter()
                .map(|v| whole(display(*v)))
                .collect(),

            factor_analysis,
            risk_level: profile.risk_factor,
            risk_rating: RiskRating::from_risk_factor(profile.risk_factor),
            adoption_rate: whole(profile.adoption_rate * hundred),
            confidence_interval,

            research_source: entry.research_source.clone(),
            calculated_at: Utc::now(),
            calculation_id: format!("calc_{}", Uuid::new_v4().simple()),

            industry_benchmark,
            recommendations,

            projection,
        }
    }
}

/// `leadVolumeIncrease` -> `Lead Volume Increase`.
///
/// Every uppercase letter starts a new word, so acronyms split per letter
/// (`technicalSEO` -> `Technical S E O`).
pub fn humanize_factor(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 8);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            out.push(' ');
        }
        out.push(ch);
    }
    let mut chars = out.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
