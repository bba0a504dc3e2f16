//! Correlation analysis.
//!
//! Pearson product-moment correlation over the two value columns of a
//! paired series.
//!
//! # Examples
//!
//! ```
//! use concordat::correlation::pearson;
//!
//! let x = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let y = [2.0, 4.0, 6.0, 8.0, 10.0];
//! let r = pearson(&x, &y);
//! assert!((r.into_value().unwrap() - 1.0).abs() < 1e-10);
//! ```

use statrs::statistics::Statistics;

use crate::computed::{Computed, UndefinedReason};

/// Computes the Pearson product-moment correlation coefficient.
///
/// # Algorithm
///
/// r = cov(x,y) / (σ_x · σ_y)
///
/// with sample covariance and sample standard deviations (ddof = 1), the
/// same convention used by every other statistic in this crate. The result
/// is clamped to [-1, 1] against floating-point drift.
///
/// # Undefined when
///
/// - fewer than 2 pairs,
/// - either variance is exactly zero,
/// - the slices differ in length.
///
/// # References
///
/// Pearson (1895). "Note on regression and inheritance in the case of
/// two parents". Proceedings of the Royal Society of London, 58, 240–242.
pub fn pearson(x: &[f64], y: &[f64]) -> Computed<f64> {
    let n = x.len();
    if n != y.len() {
        return Computed::Undefined(UndefinedReason::MismatchedLengths);
    }
    if n < 2 {
        return Computed::insufficient(2, n);
    }

    let sx = x.std_dev();
    let sy = y.std_dev();
    if sx == 0.0 || sy == 0.0 {
        return Computed::Undefined(UndefinedReason::ZeroVariance);
    }

    let r = (x.covariance(y) / (sx * sy)).clamp(-1.0, 1.0);
    Computed::Value(r)
}
