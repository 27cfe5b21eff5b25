//! Rule-based advisory messages attached to every calculation.
//!
//! Rules are evaluated independently, in declaration order. The ROI rules
//! leave `[1.5, 3.0]` uncovered and the timeframe rules leave `[6, 18]`
//! uncovered, so a result may carry no recommendation at all.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

pub const LOW_ROI_THRESHOLD: Decimal = dec!(1.5);
pub const HIGH_ROI_THRESHOLD: Decimal = dec!(3.0);
pub const LONG_TERM_MONTHS: u32 = 18;
pub const QUICK_RETURN_MONTHS: u32 = 6;
pub const HIGH_RISK_FACTOR: Decimal = dec!(0.25);
pub const LARGE_INVESTMENT: Decimal = dec!(1_000_000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    Warning,
    Success,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub title: String,
    pub description: String,
    pub priority: Priority,
}

impl Recommendation {
    fn new(kind: RecommendationKind, title: &str, description: &str, priority: Priority) -> Self {
        Self {
            kind,
            title: title.to_string(),
            description: description.to_string(),
            priority,
        }
    }
}

/// Generate recommendations for one calculation.
///
/// `investment` is the amount as entered, in the caller's currency.
pub fn recommend(
    investment: Decimal,
    risk_adjusted_roi: Decimal,
    timeframe_months: u32,
    risk_factor: Decimal,
) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    if risk_adjusted_roi < LOW_ROI_THRESHOLD {
        recommendations.push(Recommendation::new(
            RecommendationKind::Warning,
            "Consider Alternative Options",
            "This investment shows lower than average returns. Consider exploring other categories or scenarios.",
            Priority::High,
        ));
    }
    if risk_adjusted_roi > HIGH_ROI_THRESHOLD {
        recommendations.push(Recommendation::new(
            RecommendationKind::Success,
            "Excellent ROI Potential",
            "This investment shows strong return potential. Consider prioritizing this initiative.",
            Priority::High,
        ));
    }
    if timeframe_months > LONG_TERM_MONTHS {
        recommendations.push(Recommendation::new(
            RecommendationKind::Info,
            "Long-term Investment",
            "This is a long-term investment. Ensure you have adequate resources and patience for the full timeline.",
            Priority::Medium,
        ));
    }
    if timeframe_months < QUICK_RETURN_MONTHS {
        recommendations.push(Recommendation::new(
            RecommendationKind::Success,
            "Quick Returns",
            "This investment offers relatively quick returns, making it ideal for immediate impact.",
            Priority::Medium,
        ));
    }
    if risk_factor > HIGH_RISK_FACTOR {
        recommendations.push(Recommendation::new(
            RecommendationKind::Warning,
            "High Risk Investment",
            "This investment carries higher risk. Consider implementing strong change management and monitoring.",
            Priority::High,
        ));
    }
    if investment > LARGE_INVESTMENT {
        recommendations.push(Recommendation::new(
            RecommendationKind::Info,
            "Large Investment",
            "For investments of this size, consider phased implementation and detailed risk assessment.",
            Priority::Medium,
        ));
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(recs: &[Recommendation]) -> Vec<&str> {
        recs.iter().map(|r| r.title.as_str()).collect()
    }

    #[test]
    fn test_excellent_and_quick() {
        let recs = recommend(dec!(50000), dec!(3.5), 4, dec!(0.1));
        assert_eq!(titles(&recs), vec!["Excellent ROI Potential", "Quick Returns"]);
        assert_eq!(recs[0].kind, RecommendationKind::Success);
        assert_eq!(recs[0].priority, Priority::High);
        assert_eq!(recs[1].priority, Priority::Medium);
    }

    #[test]
    fn test_middle_band_is_silent() {
        let recs = recommend(dec!(50000), dec!(2.0), 12, dec!(0.2));
        assert!(recs.is_empty());
    }

    #[test]
    fn test_boundaries_are_exclusive() {
        assert!(recommend(dec!(1_000_000), dec!(1.5), 18, dec!(0.25)).is_empty());
        assert!(recommend(dec!(1000), dec!(3.0), 6, dec!(0.0)).is_empty());
    }

    #[test]
    fn test_all_warnings_in_rule_order() {
        let recs = recommend(dec!(2_000_000), dec!(1.2), 24, dec!(0.3));
        assert_eq!(
            titles(&recs),
            vec![
                "Consider Alternative Options",
                "Long-term Investment",
                "High Risk Investment",
                "Large Investment",
            ]
        );
    }

    #[test]
    fn test_serialized_shape() {
        let recs = recommend(dec!(50000), dec!(1.0), 12, dec!(0.1));
        let json = serde_json::to_value(&recs[0]).unwrap();
        assert_eq!(json["type"], "warning");
        assert_eq!(json["priority"], "high");
        assert_eq!(json["title"], "Consider Alternative Options");
    }
}
