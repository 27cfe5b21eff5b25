use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// The catalog shipped with the engine.
const BUILTIN_CATALOG: &str = include_str!("../../data/catalog.json");

/// A named ROI scenario within a category.
///
/// Multipliers are gross return factors: an `average_roi` of 2.4 means the
/// investment is expected to come back 2.4 times over `timeframe_months`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioEntry {
    pub name: String,
    pub description: String,
    pub average_roi: Decimal,
    pub timeframe_months: NonZeroU32,
    /// Factor weights in declaration order. Not required to sum to 1.
    #[serde(default)]
    pub factors: IndexMap<String, Decimal>,
    pub research_source: String,
    /// Product features the scenario relies on.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
    /// Selling points, used by the platform-comparison scenarios.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub advantages: Vec<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub competitor_comparison: IndexMap<String, CompetitorBenchmark>,
    /// Published benchmark figures, keyed by metric, kept as display text.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub industry_benchmarks: IndexMap<String, String>,
}

/// How a competing product performs on the same initiative.
///
/// Catalogs quote either ROI and timeframe or cost and rollout effort.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompetitorBenchmark {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_roi: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeframe_months: Option<u32>,
    /// Per-seat monthly price in USD.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_cost: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implementation: Option<String>,
}

impl fmt::Display for CompetitorBenchmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(roi) = self.average_roi {
            parts.push(format!("{roi}x ROI"));
        }
        if let Some(months) = self.timeframe_months {
            parts.push(format!("{months} months"));
        }
        if let Some(cost) = self.monthly_cost {
            parts.push(format!("${cost}/mo"));
        }
        if let Some(complexity) = &self.complexity {
            parts.push(format!("{complexity} complexity"));
        }
        if let Some(implementation) = &self.implementation {
            parts.push(format!("{implementation} rollout"));
        }
        f.write_str(&parts.join(", "))
    }
}

/// A group of scenarios. The first declared scenario is the default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub description: String,
    pub scenarios: IndexMap<String, ScenarioEntry>,
}

impl Category {
    /// The first-declared scenario, used when no valid key is given.
    pub fn default_scenario(&self) -> Option<(&str, &ScenarioEntry)> {
        self.scenarios
            .get_index(0)
            .map(|(key, entry)| (key.as_str(), entry))
    }
}

/// The three global adjustment profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioType {
    Conservative,
    Realistic,
    Optimistic,
}

impl ScenarioType {
    pub const ALL: [ScenarioType; 3] = [
        ScenarioType::Conservative,
        ScenarioType::Realistic,
        ScenarioType::Optimistic,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            ScenarioType::Conservative => "conservative",
            ScenarioType::Realistic => "realistic",
            ScenarioType::Optimistic => "optimistic",
        }
    }
}

impl fmt::Display for ScenarioType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Error)]
#[error("unknown scenario type '{0}'")]
pub struct ParseScenarioTypeError(pub String);

impl FromStr for ScenarioType {
    type Err = ParseScenarioTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "conservative" => Ok(ScenarioType::Conservative),
            "realistic" => Ok(ScenarioType::Realistic),
            "optimistic" => Ok(ScenarioType::Optimistic),
            other => Err(ParseScenarioTypeError(other.to_string())),
        }
    }
}

/// Multipliers applied on top of a scenario's base ROI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioTypeProfile {
    pub name: String,
    pub description: String,
    pub multiplier: Decimal,
    /// Fraction discounted from the adjusted ROI, in `[0, 1)`.
    pub risk_factor: Decimal,
    /// Share of the monthly return realized in the time series, in `(0, 1]`.
    pub adoption_rate: Decimal,
}

/// Exactly one profile per [`ScenarioType`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioProfiles {
    pub conservative: ScenarioTypeProfile,
    pub realistic: ScenarioTypeProfile,
    pub optimistic: ScenarioTypeProfile,
}

impl ScenarioProfiles {
    pub fn get(&self, scenario_type: ScenarioType) -> &ScenarioTypeProfile {
        match scenario_type {
            ScenarioType::Conservative => &self.conservative,
            ScenarioType::Realistic => &self.realistic,
            ScenarioType::Optimistic => &self.optimistic,
        }
    }
}

/// Errors raised while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("category '{0}' declares no scenarios")]
    EmptyCategory(String),
    #[error("scenario '{category}/{scenario}': {reason}")]
    InvalidScenario {
        category: String,
        scenario: String,
        reason: String,
    },
    #[error("scenario type '{scenario_type}': {reason}")]
    InvalidProfile {
        scenario_type: ScenarioType,
        reason: String,
    },
}

/// Immutable scenario catalog: categories, their scenarios, and the
/// scenario-type profiles.
///
/// Construct once, then share by reference. Category and scenario order
/// follow the source document.
///
/// # Examples
///
/// ```
/// use roi_engine::core::catalog::ScenarioCatalog;
///
/// let catalog = ScenarioCatalog::builtin().unwrap();
/// let marketing = catalog.category("marketing-hub").unwrap();
/// let (key, _) = marketing.default_scenario().unwrap();
/// assert_eq!(key, "lead-generation-improvement");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioCatalog {
    scenario_types: ScenarioProfiles,
    categories: IndexMap<String, Category>,
}

impl ScenarioCatalog {
    /// The embedded catalog.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json_str(BUILTIN_CATALOG)
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let catalog: ScenarioCatalog = serde_json::from_str(json)?;
        catalog.validate()?;
        log::debug!(
            "loaded catalog: {} categories, {} scenarios",
            catalog.categories.len(),
            catalog.scenario_count()
        );
        Ok(catalog)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        for scenario_type in ScenarioType::ALL {
            let profile = self.scenario_types.get(scenario_type);
            let invalid = |reason: &str| CatalogError::InvalidProfile {
                scenario_type,
                reason: reason.to_string(),
            };
            if profile.multiplier <= Decimal::ZERO {
                return Err(invalid("multiplier must be positive"));
            }
            if profile.risk_factor < Decimal::ZERO || profile.risk_factor >= Decimal::ONE {
                return Err(invalid("risk_factor must be in [0, 1)"));
            }
            if profile.adoption_rate <= Decimal::ZERO || profile.adoption_rate > Decimal::ONE {
                return Err(invalid("adoption_rate must be in (0, 1]"));
            }
        }

        for (category_key, category) in &self.categories {
            if category.scenarios.is_empty() {
                return Err(CatalogError::EmptyCategory(category_key.clone()));
            }
            for (scenario_key, entry) in &category.scenarios {
                if entry.average_roi <= Decimal::ZERO {
                    return Err(CatalogError::InvalidScenario {
                        category: category_key.clone(),
                        scenario: scenario_key.clone(),
                        reason: format!("average_roi must be positive, got {}", entry.average_roi),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn category(&self, key: &str) -> Option<&Category> {
        self.categories.get(key)
    }

    /// Like [`category`](Self::category), also returning the stored key.
    pub fn category_entry(&self, key: &str) -> Option<(&str, &Category)> {
        self.categories
            .get_key_value(key)
            .map(|(k, c)| (k.as_str(), c))
    }

    /// Categories in declaration order, keyed by id.
    pub fn categories(&self) -> impl Iterator<Item = (&str, &Category)> {
        self.categories.iter().map(|(key, c)| (key.as_str(), c))
    }

    pub fn profile(&self, scenario_type: ScenarioType) -> &ScenarioTypeProfile {
        self.scenario_types.get(scenario_type)
    }

    /// Total number of scenarios across all categories.
    pub fn scenario_count(&self) -> usize {
        self.categories.values().map(|c| c.scenarios.len()).sum()
    }

    /// Listing view of every category.
    pub fn category_summaries(&self) -> Vec<CategorySummary> {
        self.categories
            .iter()
            .map(|(key, c)| CategorySummary {
                id: key.clone(),
                name: c.name.clone(),
                description: c.description.clone(),
                scenario_count: c.scenarios.len(),
            })
            .collect()
    }

    /// Listing view of one category's scenarios, `None` for unknown ids.
    pub fn scenario_summaries(&self, category: &str) -> Option<Vec<ScenarioSummary>> {
        let category = self.categories.get(category)?;
        Some(
            category
                .scenarios
                .iter()
                .map(|(key, s)| ScenarioSummary {
                    id: key.clone(),
                    name: s.name.clone(),
                    description: s.description.clone(),
                    average_roi: s.average_roi,
                    timeframe: s.timeframe_months.get(),
                    research_source: s.research_source.clone(),
                    features: s.features.clone(),
                    advantages: s.advantages.clone(),
                    competitor_comparison: s.competitor_comparison.clone(),
                    industry_benchmarks: s.industry_benchmarks.clone(),
                })
                .collect(),
        )
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub scenario_count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "averageROI", with = "rust_decimal::serde::float")]
    pub average_roi: Decimal,
    pub timeframe: u32,
    pub research_source: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub advantages: Vec<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub competitor_comparison: IndexMap<String, CompetitorBenchmark>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub industry_benchmarks: IndexMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = ScenarioCatalog::builtin().unwrap();
        assert_eq!(catalog.categories().count(), 6);
        assert_eq!(catalog.scenario_count(), 31);
    }

    #[test]
    fn test_builtin_profiles() {
        let catalog = ScenarioCatalog::builtin().unwrap();
        let realistic = catalog.profile(ScenarioType::Realistic);
        assert_eq!(realistic.multiplier, dec!(1.0));
        assert_eq!(realistic.risk_factor, dec!(0.2));
        assert_eq!(realistic.adoption_rate, dec!(0.8));
        assert_eq!(catalog.profile(ScenarioType::Optimistic).risk_factor, dec!(0.3));
    }

    #[test]
    fn test_declaration_order_is_kept() {
        let catalog = ScenarioCatalog::builtin().unwrap();
        let ids: Vec<&str> = catalog.categories().map(|(k, _)| k).collect();
        assert_eq!(ids[0], "marketing-hub");
        assert_eq!(ids[5], "industry-specific");

        let sales = catalog.category("sales-hub").unwrap();
        let factors: Vec<&String> = sales.scenarios["sales-automation"].factors.keys().collect();
        assert_eq!(
            factors,
            vec!["timeSavings", "followUpConsistency", "leadNurturing"]
        );
    }

    #[test]
    fn test_scenario_type_parse() {
        assert_eq!("optimistic".parse::<ScenarioType>().unwrap(), ScenarioType::Optimistic);
        assert!("aggressive".parse::<ScenarioType>().is_err());
        assert!("Realistic".parse::<ScenarioType>().is_err());
    }

    #[test]
    fn test_empty_category_rejected() {
        let mut catalog = ScenarioCatalog::builtin().unwrap();
        catalog.categories.insert(
            "empty".to_string(),
            Category {
                name: "Empty".to_string(),
                description: String::new(),
                scenarios: IndexMap::new(),
            },
        );
        let err = catalog.validate().unwrap_err();
        assert!(matches!(err, CatalogError::EmptyCategory(ref c) if c == "empty"));
    }

    #[test]
    fn test_zero_timeframe_rejected_by_parser() {
        let json = r#"{
            "scenario_types": {
                "conservative": {"name": "c", "description": "", "multiplier": 0.7, "risk_factor": 0.1, "adoption_rate": 0.6},
                "realistic": {"name": "r", "description": "", "multiplier": 1.0, "risk_factor": 0.2, "adoption_rate": 0.8},
                "optimistic": {"name": "o", "description": "", "multiplier": 1.3, "risk_factor": 0.3, "adoption_rate": 0.95}
            },
            "categories": {
                "x": {"name": "X", "description": "", "scenarios": {
                    "y": {"name": "Y", "description": "", "average_roi": 2.0, "timeframe_months": 0, "research_source": "n/a"}
                }}
            }
        }"#;
        assert!(matches!(
            ScenarioCatalog::from_json_str(json),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_invalid_risk_factor_rejected() {
        let mut catalog = ScenarioCatalog::builtin().unwrap();
        catalog.scenario_types.optimistic.risk_factor = dec!(1.0);
        assert!(matches!(
            catalog.validate(),
            Err(CatalogError::InvalidProfile {
                scenario_type: ScenarioType::Optimistic,
                ..
            })
        ));
    }

    #[test]
    fn test_scenario_enrichment_loaded() {
        let catalog = ScenarioCatalog::builtin().unwrap();
        let lead_gen = &catalog.category("marketing-hub").unwrap().scenarios["lead-generation-improvement"];
        assert_eq!(lead_gen.features[0], "Landing Pages");
        let marketo = &lead_gen.competitor_comparison["Marketo"];
        assert_eq!(marketo.average_roi, Some(dec!(2.8)));
        assert_eq!(marketo.timeframe_months, Some(8));
        assert_eq!(marketo.to_string(), "2.8x ROI, 8 months");

        let migration = &catalog.category("competitive-analysis").unwrap().scenarios["hubspot-vs-salesforce"];
        assert_eq!(migration.advantages.len(), 4);
        let salesforce = &migration.competitor_comparison["Salesforce Professional"];
        assert_eq!(salesforce.monthly_cost, Some(dec!(150)));
        assert_eq!(
            salesforce.to_string(),
            "$150/mo, High complexity, 6-12 months rollout"
        );

        let saas = &catalog.category("industry-specific").unwrap().scenarios["saas-customer-acquisition"];
        assert_eq!(saas.industry_benchmarks["CAC Reduction"], "35%");
        assert!(saas.competitor_comparison.is_empty());
    }

    #[test]
    fn test_enrichment_fields_are_optional() {
        let json = r#"{
            "scenario_types": {
                "conservative": {"name": "c", "description": "", "multiplier": 0.7, "risk_factor": 0.1, "adoption_rate": 0.6},
                "realistic": {"name": "r", "description": "", "multiplier": 1.0, "risk_factor": 0.2, "adoption_rate": 0.8},
                "optimistic": {"name": "o", "description": "", "multiplier": 1.3, "risk_factor": 0.3, "adoption_rate": 0.95}
            },
            "categories": {
                "x": {"name": "X", "description": "", "scenarios": {
                    "y": {"name": "Y", "description": "", "average_roi": 2.0, "timeframe_months": 6, "research_source": "n/a"}
                }}
            }
        }"#;
        let catalog = ScenarioCatalog::from_json_str(json).unwrap();
        let summary = &catalog.scenario_summaries("x").unwrap()[0];
        assert!(summary.features.is_empty());
        let value = serde_json::to_value(summary).unwrap();
        assert!(value.get("competitorComparison").is_none());
        assert!(value.get("features").is_none());
    }

    #[test]
    fn test_summaries() {
        let catalog = ScenarioCatalog::builtin().unwrap();
        let summaries = catalog.category_summaries();
        assert_eq!(summaries[0].id, "marketing-hub");
        assert_eq!(summaries[0].scenario_count, 8);

        let scenarios = catalog.scenario_summaries("service-hub").unwrap();
        assert_eq!(scenarios.len(), 5);
        assert_eq!(scenarios[0].timeframe, 4);
        assert!(catalog.scenario_summaries("nope").is_none());
    }
}
