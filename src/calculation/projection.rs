use crate::core::catalog::{ScenarioEntry, ScenarioTypeProfile};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Longest time series ever produced, in months.
pub const MAX_SERIES_MONTHS: u32 = 60;
/// Months projected past the scenario timeframe.
pub const SERIES_TAIL_MONTHS: u32 = 12;

/// USD-space figures for one calculation, kept at full decimal precision.
///
/// Every display field of a result is derived from these values. The
/// projection is linear: each month of the series carries the same gain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub usd_investment: Decimal,
    /// `average_roi * multiplier`.
    pub base_roi: Decimal,
    /// `base_roi * (1 - risk_factor)`.
    pub risk_adjusted_roi: Decimal,
    pub gross_return: Decimal,
    /// Always `gross_return - usd_investment`.
    pub net_return: Decimal,
    pub monthly_return: Decimal,
    pub annual_return: Decimal,
    /// `None` when the monthly return is zero, i.e. never breaks even.
    pub break_even_months: Option<u64>,
    pub monthly_returns: Vec<Decimal>,
    pub cumulative_returns: Vec<Decimal>,
}

impl Projection {
    /// Run the projection for a USD investment.
    ///
    /// # Algorithm
    ///
    /// 1. `base = average_roi * multiplier`, `adjusted = base * (1 - risk_factor)`.
    /// 2. `gross = investment * adjusted`, `net = gross - investment`.
    /// 3. `monthly = net / timeframe`, `annual = monthly * 12`.
    /// 4. `break_even = ceil(investment / |monthly|)`.
    /// 5. For `min(timeframe + 12, 60)` months, append `monthly * adoption_rate`
    ///    and its running total.
    pub fn compute(
        usd_investment: Decimal,
        entry: &ScenarioEntry,
        profile: &ScenarioTypeProfile,
    ) -> Self {
        let timeframe = entry.timeframe_months.get();

        let base_roi = entry.average_roi * profile.multiplier;
        let risk_adjusted_roi = base_roi * (Decimal::ONE - profile.risk_factor);

        let gross_return = usd_investment * risk_adjusted_roi;
        let net_return = gross_return - usd_investment;
        let monthly_return = net_return / Decimal::from(timeframe);
        let annual_return = monthly_return * Decimal::from(12);

        // A negative monthly return still yields a positive month count.
        let break_even_months = usd_investment
            .checked_div(monthly_return.abs())
            .and_then(|months| months.ceil().to_u64());

        let horizon = Self::horizon_months(timeframe);
        let monthly_gain = monthly_return * profile.adoption_rate;
        let monthly_returns = vec![monthly_gain; horizon];
        let mut cumulative = Decimal::ZERO;
        let cumulative_returns = monthly_returns
            .iter()
            .map(|gain| {
                cumulative += *gain;
                cumulative
            })
            .collect();

        log::debug!(
            "projection: usd_investment={usd_investment} adjusted_roi={risk_adjusted_roi} net={net_return} months={horizon}"
        );

        Self {
            usd_investment,
            base_roi,
            risk_adjusted_roi,
            gross_return,
            net_return,
            monthly_return,
            annual_return,
            break_even_months,
            monthly_returns,
            cumulative_returns,
        }
    }

    /// Length of the monthly series for a scenario timeframe.
    pub fn horizon_months(timeframe_months: u32) -> usize {
        timeframe_months
            .saturating_add(SERIES_TAIL_MONTHS)
            .min(MAX_SERIES_MONTHS) as usize
    }
}
