//! Small helpers shared by the harness, results and comparison code

use std::time::Duration;

/// Duration as fractional milliseconds
pub fn duration_ms(duration: Duration) -> f64 {
    duration.as_nanos() as f64 / 1_000_000.0
}

/// Statistical utilities
pub mod stats {
    /// Arithmetic mean; `None` for an empty slice
    pub fn mean(values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }

    /// Geometric mean of strictly positive values; `None` if empty or any
    /// value is not positive
    pub fn geomean(values: &[f64]) -> Option<f64> {
        if values.is_empty() || values.iter().any(|v| *v <= 0.0 || !v.is_finite()) {
            return None;
        }
        let log_sum: f64 = values.iter().map(|v| v.ln()).sum();
        Some((log_sum / values.len() as f64).exp())
    }
}
