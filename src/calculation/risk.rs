use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Risk factors above this are rated High.
pub const HIGH_RISK_THRESHOLD: Decimal = dec!(0.30);
/// Risk factors above this (and not High) are rated Medium.
pub const MEDIUM_RISK_THRESHOLD: Decimal = dec!(0.15);

/// Coarse risk tier derived from a scenario type's risk factor.
///
/// Variants are ordered `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskRating {
    Low,
    Medium,
    High,
}

impl RiskRating {
    pub fn from_risk_factor(risk_factor: Decimal) -> Self {
        if risk_factor > HIGH_RISK_THRESHOLD {
            RiskRating::High
        } else if risk_factor > MEDIUM_RISK_THRESHOLD {
            RiskRating::Medium
        } else {
            RiskRating::Low
        }
    }
}

impl fmt::Display for RiskRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskRating::Low => "Low",
            RiskRating::Medium => "Medium",
            RiskRating::High => "High",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds_are_exclusive() {
        assert_eq!(RiskRating::from_risk_factor(dec!(0.15)), RiskRating::Low);
        assert_eq!(RiskRating::from_risk_factor(dec!(0.1501)), RiskRating::Medium);
        assert_eq!(RiskRating::from_risk_factor(dec!(0.30)), RiskRating::Medium);
        assert_eq!(RiskRating::from_risk_factor(dec!(0.31)), RiskRating::High);
    }

    #[test]
    fn test_builtin_profiles_rating() {
        assert_eq!(RiskRating::from_risk_factor(dec!(0.1)), RiskRating::Low);
        assert_eq!(RiskRating::from_risk_factor(dec!(0.2)), RiskRating::Medium);
        assert_eq!(RiskRating::from_risk_factor(dec!(0.3)), RiskRating::Medium);
    }

    #[test]
    fn test_serializes_as_label() {
        let json = serde_json::to_string(&RiskRating::High).unwrap();
        assert_eq!(json, "\"High\"");
    }
}
