use crate::core::catalog::{Category, ScenarioCatalog, ScenarioEntry};
use crate::error::{RoiError, RoiResult};

/// A resolved catalog scenario.
#[derive(Debug, Clone, Copy)]
pub struct Selection<'a> {
    pub category_key: &'a str,
    pub category: &'a Category,
    pub scenario_key: &'a str,
    pub entry: &'a ScenarioEntry,
}

/// Resolves `(category, specific scenario)` against a catalog.
///
/// An unknown category is an error. A missing, empty or unknown scenario
/// key falls back to the category's first-declared scenario; the
/// selection returned is the same either way.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioSelector<'a> {
    catalog: &'a ScenarioCatalog,
}

impl<'a> ScenarioSelector<'a> {
    pub fn new(catalog: &'a ScenarioCatalog) -> Self {
        Self { catalog }
    }

    pub fn resolve(&self, category: &str, specific: Option<&str>) -> RoiResult<Selection<'a>> {
        let invalid = || RoiError::InvalidCategory {
            category: category.to_string(),
        };
        let (category_key, category_data) = self.catalog.category_entry(category).ok_or_else(invalid)?;

        if let Some(key) = specific.filter(|key| !key.is_empty()) {
            if let Some((scenario_key, entry)) = category_data.scenarios.get_key_value(key) {
                return Ok(Selection {
                    category_key,
                    category: category_data,
                    scenario_key: scenario_key.as_str(),
                    entry,
                });
            }
            log::warn!("scenario '{key}' not found in '{category_key}'; using the category default");
        }

        // Loaded catalogs never hold empty categories.
        let (scenario_key, entry) = category_data.default_scenario().ok_or_else(invalid)?;
        Ok(Selection {
            category_key,
            category: category_data,
            scenario_key,
            entry,
        })
    }
}
