use anyhow::{Result, anyhow};
use std::collections::HashMap;

pub mod debt_mechanics;
pub mod registry;
pub mod series;

/// A pure per-date formula over upstream series values.
pub trait CompositeFormula: Send + Sync + std::fmt::Debug {
    /// Returns the metric id this formula produces (e.g., "govtDebtToRevenue")
    fn slug(&self) -> &str;

    fn name(&self) -> &str;

    /// Upstream series ids the formula reads, in declaration order.
    fn required_inputs(&self) -> &[&'static str];

    /// Evaluate for one aligned date. Fails when an input is missing or a
    /// divisor is zero; the caller skips that date.
    fn evaluate(&self, inputs: &HashMap<&str, f64>) -> Result<f64>;
}

/// Looks up one declared input.
pub fn input(inputs: &HashMap<&str, f64>, series_id: &str) -> Result<f64> {
    inputs
        .get(series_id)
        .copied()
        .ok_or_else(|| anyhow!("missing input {}", series_id))
}

pub fn checked_div(numerator: f64, denominator: f64) -> Result<f64> {
    if denominator == 0.0 {
        return Err(anyhow!("division by zero"));
    }
    Ok(numerator / denominator)
}
