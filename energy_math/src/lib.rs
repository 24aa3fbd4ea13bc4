//! # Energy Math
//!
//! Numerical primitives for energy consumption analysis.
//! This crate provides the least-squares trend fit, descriptive statistics
//! and trailing averages used by the forecasting and analytics layers.

use thiserror::Error;

pub mod moving_averages;
pub mod regression;
pub mod statistics;

pub use regression::LinearFit;

/// Errors that can occur in numerical calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for numerical operations
pub type Result<T> = std::result::Result<T, MathError>;
