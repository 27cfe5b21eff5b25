use thiserror::Error;

/// Failures that stop a calculation before any figure is produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoiError {
    #[error("invalid category '{category}'")]
    InvalidCategory { category: String },

    #[error("invalid scenario type '{scenario}'; expected conservative, realistic or optimistic")]
    InvalidScenarioType { scenario: String },
}

pub type RoiResult<T> = Result<T, RoiError>;
