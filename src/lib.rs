//! # roi-engine
//!
//! Scenario-based marketing ROI projection engine with multi-currency
//! reporting.
//!
//! Given an investment, a catalog category, a scenario type and a display
//! currency, the engine projects returns from static lookup tables and
//! hands each result to an optional fire-and-forget recorder.
//!
//! ## Architecture
//!
//! - **core**: Scenario catalog, scenario selection, currency conversion
//! - **calculation**: USD projection, risk tiers, recommendations, results
//! - **recording**: Non-blocking event recorder, sinks, lead submissions
//! - **validation**: Calling-layer checks for requests and lead forms
//! - **config**: Catalog and recorder wiring from flags or environment

pub mod calculation;
pub mod config;
pub mod core;
pub mod error;
pub mod recording;
pub mod validation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::calculation::calculator::{CalculationInput, RoiCalculator, ScenarioComparison};
    pub use crate::calculation::result::CalculationResult;
    pub use crate::calculation::risk::RiskRating;
    pub use crate::config::EngineConfig;
    pub use crate::core::catalog::{ScenarioCatalog, ScenarioType};
    pub use crate::core::currency::{CurrencyCode, FxRateTable};
    pub use crate::error::{RoiError, RoiResult};
    pub use crate::recording::{LeadSubmission, MemorySink, Recorder, RecordedEvent};
}
