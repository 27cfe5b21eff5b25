use crate::calculation::projection::Projection;
use crate::calculation::recommendation::Recommendation;
use crate::calculation::risk::RiskRating;
use crate::core::currency::CurrencyCode;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Contribution of one weighted factor to the net return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorImpact {
    /// Humanized factor name, e.g. `Lead Volume Increase`.
    pub factor: String,
    /// Weight as a whole percentage.
    pub weight: i64,
    /// USD impact, rounded.
    pub impact: i64,
    /// Impact in the display currency.
    pub impact_formatted: String,
}

/// ±30% band around the net return. Raw bounds are USD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfidenceInterval {
    pub low: i64,
    pub high: i64,
    pub low_formatted: String,
    pub high_formatted: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndustryBenchmark {
    /// Catalog average ROI as a net percentage.
    #[serde(rename = "averageROI")]
    pub average_roi: i64,
    pub timeframe: u32,
    /// Risk-adjusted ROI relative to the catalog average, in percent.
    pub performance_vs_benchmark: i64,
}

/// The full output of one ROI calculation.
///
/// `totalReturn`, `netReturn`, `monthlyReturn`, `annualReturn` and the two
/// series are converted to the display currency. `investment` is the
/// amount as entered. Factor impacts and confidence bounds are raw USD;
/// their `*Formatted` strings are in the display currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub investment: i64,
    pub investment_formatted: String,
    /// Category display name.
    pub category: String,
    /// Scenario type display name.
    pub scenario: String,
    /// Selected scenario display name.
    pub specific_scenario: String,
    pub currency: CurrencyCode,

    pub total_return: i64,
    pub total_return_formatted: String,
    pub net_return: i64,
    pub net_return_formatted: String,

    /// Net ROI in whole percent.
    pub roi: i64,
    pub roi_formatted: String,

    #[serde(rename = "timeToROI")]
    pub time_to_roi: u32,
    /// `null` when the projection never breaks even.
    pub break_even_months: Option<u64>,

    pub monthly_return: i64,
    pub monthly_return_formatted: String,
    pub annual_return: i64,
    pub annual_return_formatted: String,

    pub monthly_returns: Vec<i64>,
    pub cumulative_returns: Vec<i64>,

    pub factor_analysis: Vec<FactorImpact>,
    /// The scenario type's raw risk factor.
    #[serde(with = "rust_decimal::serde::float")]
    pub risk_level: Decimal,
    pub risk_rating: RiskRating,
    /// Adoption rate in whole percent.
    pub adoption_rate: i64,
    pub confidence_interval: ConfidenceInterval,

    pub research_source: String,
    pub calculated_at: DateTime<Utc>,
    pub calculation_id: String,

    pub industry_benchmark: IndustryBenchmark,
    pub recommendations: Vec<Recommendation>,

    /// USD figures the display fields were derived from.
    #[serde(skip)]
    pub projection: Projection,
}

impl fmt::Display for CalculationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== ROI Projection ===")?;
        writeln!(f, "Category:        {}", self.category)?;
        writeln!(f, "Scenario:        {} ({})", self.specific_scenario, self.scenario)?;
        writeln!(f, "Investment:      {}", self.investment_formatted)?;
        writeln!(f, "Total Return:    {}", self.total_return_formatted)?;
        writeln!(f, "Net Return:      {}", self.net_return_formatted)?;
        writeln!(f, "ROI:             {}", self.roi_formatted)?;
        writeln!(f, "Monthly Return:  {}", self.monthly_return_formatted)?;
        writeln!(f, "Annual Return:   {}", self.annual_return_formatted)?;
        writeln!(f, "Time to ROI:     {} months", self.time_to_roi)?;
        match self.break_even_months {
            Some(months) => writeln!(f, "Break-even:      {} months", months)?,
            None => writeln!(f, "Break-even:      never")?,
        }
        writeln!(f, "Risk:            {} ({})", self.risk_rating, self.risk_level)?;
        writeln!(
            f,
            "Confidence:      {} to {}",
            self.confidence_interval.low_formatted, self.confidence_interval.high_formatted
        )?;
        writeln!(
            f,
            "Benchmark:       {}% over {} months ({:+}% vs. benchmark)",
            self.industry_benchmark.average_roi,
            self.industry_benchmark.timeframe,
            self.industry_benchmark.performance_vs_benchmark
        )?;

        if !self.factor_analysis.is_empty() {
            writeln!(f, "\n--- Factors ---")?;
            for factor in &self.factor_analysis {
                writeln!(
                    f,
                    "  {:<32} {:>3}%  {}",
                    factor.factor, factor.weight, factor.impact_formatted
                )?;
            }
        }

        if !self.recommendations.is_empty() {
            writeln!(f, "\n--- Recommendations ---")?;
            for rec in &self.recommendations {
                writeln!(f, "  [{:?}] {}: {}", rec.priority, rec.title, rec.description)?;
            }
        }

        writeln!(f, "\nSource: {}", self.research_source)
    }
}
