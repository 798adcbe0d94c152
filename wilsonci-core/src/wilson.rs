//! Wilson score interval for a binomial proportion.
//!
//! Pure functions: no state, no IO. Identical inputs give bit-identical output,
//! so callers are free to invoke these from any thread.
use statrs::distribution::{ContinuousCDF, Normal};

use crate::error::CiError;
use crate::types::{ConfidenceInterval, IntervalMethod, ProportionEstimate};

/// Inverse CDF of the standard normal distribution.
///
/// Returns `None` unless `p` lies strictly between 0 and 1.
pub fn normal_quantile(p: f64) -> Option<f64> {
    if !(p > 0.0 && p < 1.0) {
        return None;
    }
    let standard = Normal::new(0.0, 1.0).ok()?;
    Some(standard.inverse_cdf(p))
}

/// Two-sided critical value for `confidence_level`: Φ⁻¹((1 + level) / 2).
///
/// About 1.959964 for 0.95.
pub fn z_for_confidence(confidence_level: f64) -> Option<f64> {
    if !is_valid_level(confidence_level) {
        return None;
    }
    normal_quantile((1.0 + confidence_level) / 2.0)
}

fn is_valid_level(confidence_level: f64) -> bool {
    // Also rejects NaN.
    confidence_level > 0.0 && confidence_level < 1.0
}

/// Wilson score interval for `successes` out of `total` at `confidence_level`.
///
/// Fails with `CiError::InvalidInput` when `total == 0`, `successes > total`,
/// or the confidence level is outside the open interval (0, 1).
///
/// ```rust
/// use wilsonci_core::wilson_interval;
///
/// let ci = wilson_interval(21, 42, 0.95).unwrap();
/// assert!((ci.lower_bound - 0.35526).abs() < 1e-4);
/// assert!((ci.upper_bound - 0.64474).abs() < 1e-4);
/// ```
pub fn wilson_interval(successes: u64, total: u64, confidence_level: f64) -> Result<ConfidenceInterval, CiError> {
    let estimate = checked_estimate(successes, total, confidence_level)?;
    compute_interval(&estimate, confidence_level, IntervalMethod::Wilson)
}

/// Same as `wilson_interval`, with the continuity correction applied.
pub fn wilson_interval_corrected(
    successes: u64,
    total: u64,
    confidence_level: f64,
) -> Result<ConfidenceInterval, CiError> {
    let estimate = checked_estimate(successes, total, confidence_level)?;
    compute_interval(&estimate, confidence_level, IntervalMethod::WilsonContinuityCorrected)
}

/// Counts are validated here rather than through `ProportionEstimate::new`
/// so the error also reports the requested confidence level.
fn checked_estimate(successes: u64, total: u64, confidence_level: f64) -> Result<ProportionEstimate, CiError> {
    if total == 0 {
        return Err(CiError::level("total must be greater than zero", successes, total, confidence_level));
    }
    if successes > total {
        return Err(CiError::level("successes exceeds total", successes, total, confidence_level));
    }
    ProportionEstimate::new(successes, total)
}

/// Interval for an already-validated estimate using the chosen method.
pub fn compute_interval(
    estimate: &ProportionEstimate,
    confidence_level: f64,
    method: IntervalMethod,
) -> Result<ConfidenceInterval, CiError> {
    let successes = estimate.numerator();
    let total = estimate.denominator();
    let z = z_for_confidence(confidence_level).ok_or_else(|| {
        CiError::level("confidence level must be strictly between 0 and 1", successes, total, confidence_level)
    })?;

    let (lower, upper) = match method {
        IntervalMethod::Wilson => wilson_bounds(successes, total, z),
        IntervalMethod::WilsonContinuityCorrected => corrected_bounds(successes, total, z),
    };

    // Clamp to [0, 1] and keep the point estimate inside the interval; both only
    // matter at p̂ = 0 or p̂ = 1 where rounding can leave bounds a few ulps off.
    let p_hat = estimate.point_estimate();
    let mut lower = lower.clamp(0.0, 1.0).min(p_hat);
    let mut upper = upper.clamp(0.0, 1.0).max(p_hat);
    if successes == 0 {
        lower = 0.0;
    }
    if successes == total {
        upper = 1.0;
    }

    Ok(ConfidenceInterval {
        lower_bound: lower,
        upper_bound: upper,
        confidence_level,
    })
}

fn wilson_bounds(successes: u64, total: u64, z: f64) -> (f64, f64) {
    let n = total as f64;
    let p_hat = successes as f64 / n;
    let z2 = z * z;

    let denominator = 1.0 + z2 / n;
    let center = p_hat + z2 / (2.0 * n);
    let margin = z * (p_hat * (1.0 - p_hat) / n + z2 / (4.0 * n * n)).sqrt();

    ((center - margin) / denominator, (center + margin) / denominator)
}

/// Newcombe (1998) method 4. Each bound is the Wilson bound evaluated half a
/// success further out, so the result always contains the plain interval.
fn corrected_bounds(successes: u64, total: u64, z: f64) -> (f64, f64) {
    let n = total as f64;
    let p_hat = successes as f64 / n;
    let q_hat = 1.0 - p_hat;
    let z2 = z * z;
    let denominator = 2.0 * (n + z2);

    let lower = if successes == 0 {
        0.0
    } else {
        let radicand = (z2 - 2.0 - 1.0 / n + 4.0 * p_hat * (n * q_hat + 1.0)).max(0.0);
        (2.0 * n * p_hat + z2 - 1.0 - z * radicand.sqrt()) / denominator
    };
    let upper = if successes == total {
        1.0
    } else {
        let radicand = (z2 + 2.0 - 1.0 / n + 4.0 * p_hat * (n * q_hat - 1.0)).max(0.0);
        (2.0 * n * p_hat + z2 + 1.0 + z * radicand.sqrt()) / denominator
    };

    (lower, upper)
}
