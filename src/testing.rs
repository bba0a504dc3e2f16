//! Hypothesis testing.
//!
//! Two-sample F-test for equality of variances. Unlike the paired
//! statistics in [`crate::agreement`] and [`crate::equivalence`], this test
//! compares the dispersion of the two groups directly, so the inputs are
//! treated as independent samples and may differ in length.
//!
//! # Examples
//!
//! ```
//! use concordat::testing::{variance_ratio_test, LargerVariance};
//!
//! let x = [10.0, 14.0, 9.0, 13.0, 11.0];
//! let y = [10.9, 11.1, 11.0, 10.8, 11.2];
//! let f = variance_ratio_test(&x, &y).into_value().unwrap();
//! assert!(f.f_statistic >= 1.0);
//! assert_eq!(f.larger_variance, LargerVariance::X);
//! ```

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, FisherSnedecor};
use statrs::statistics::Statistics;

use crate::computed::{Computed, UndefinedReason};

/// Significance level of the test.
const ALPHA: f64 = 0.05;

/// Which sample carried the larger variance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LargerVariance {
    /// var(x) > var(y).
    X,
    /// var(y) > var(x).
    Y,
    /// The variances are exactly equal.
    Equal,
}

/// Result of the two-sample variance-ratio test at α = 0.05.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarianceRatioTest {
    /// Sample size of x.
    pub n_x: usize,
    /// Sample size of y.
    pub n_y: usize,
    /// Sample variance of x (ddof = 1).
    pub var_x: f64,
    /// Sample variance of y (ddof = 1).
    pub var_y: f64,
    /// max(var) / min(var); ≥ 1 by construction.
    pub f_statistic: f64,
    /// F inverse CDF at 1 − α with df1 = n_x − 1, df2 = n_y − 1.
    pub f_critical: f64,
    /// Which group had the larger variance.
    pub larger_variance: LargerVariance,
    /// `true` iff `f_statistic > f_critical`.
    pub reject_null: bool,
}

impl VarianceRatioTest {
    /// Plain-language H₀ verdict for presentation.
    pub fn verdict(&self) -> &'static str {
        if self.reject_null {
            "variances differ (reject null)"
        } else {
            "variances equal (fail to reject null)"
        }
    }
}

/// Runs the two-sample F-test for equal variances.
///
/// # Algorithm
///
/// F = max(var_x, var_y) / min(var_x, var_y), so the statistic is always
/// ≥ 1 regardless of which input is noisier. The critical value keeps the
/// fixed degrees-of-freedom order df1 = n_x − 1, df2 = n_y − 1.
///
/// # Not computable when
///
/// - either group has fewer than 2 observations,
/// - either variance is exactly zero (the ratio would be 0 or ∞, neither
///   of which is a meaningful F value).
///
/// # References
///
/// Snedecor & Cochran (1989). "Statistical Methods", 8th edition.
pub fn variance_ratio_test(x: &[f64], y: &[f64]) -> Computed<VarianceRatioTest> {
    let n_x = x.len();
    let n_y = y.len();
    if n_x < 2 || n_y < 2 {
        return Computed::insufficient(2, n_x.min(n_y));
    }

    let var_x = x.variance();
    let var_y = y.variance();
    if var_x == 0.0 || var_y == 0.0 {
        return Computed::Undefined(UndefinedReason::ZeroVariance);
    }

    let (f_statistic, larger_variance) = if var_x > var_y {
        (var_x / var_y, LargerVariance::X)
    } else if var_y > var_x {
        (var_y / var_x, LargerVariance::Y)
    } else {
        (1.0, LargerVariance::Equal)
    };

    let df1 = (n_x - 1) as f64;
    let df2 = (n_y - 1) as f64;
    let Ok(f_dist) = FisherSnedecor::new(df1, df2) else {
        return Computed::insufficient(2, n_x.min(n_y));
    };
    let f_critical = f_dist.inverse_cdf(1.0 - ALPHA);

    Computed::Value(VarianceRatioTest {
        n_x,
        n_y,
        var_x,
        var_y,
        f_statistic,
        f_critical,
        larger_variance,
        reject_null: f_statistic > f_critical,
    })
}
