//! Regression analysis.
//!
//! Ordinary least-squares simple linear regression of y on x, with the
//! fitted line evaluated at every observed x for plotting.
//!
//! # Examples
//!
//! ```
//! use concordat::regression::simple_linear_regression;
//!
//! let x = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let y = [2.1, 3.9, 6.1, 7.9, 10.1];
//! let fit = simple_linear_regression(&x, &y).into_value().unwrap();
//! assert!((fit.slope - 2.0).abs() < 0.1);
//! assert!((fit.intercept - 0.1).abs() < 0.2);
//! ```

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::computed::{Computed, UndefinedReason};

/// Result of a simple linear regression: y = intercept + slope · x.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionFit {
    /// Slope coefficient (β₁).
    pub slope: f64,
    /// Intercept (β₀).
    pub intercept: f64,
    /// Fitted values ŷᵢ at each observed xᵢ, in input order.
    pub fitted: Vec<f64>,
    /// Sample size.
    pub n: usize,
}

impl RegressionFit {
    /// Evaluates the fitted line at an arbitrary x.
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Computes simple linear regression (OLS closed-form).
///
/// # Algorithm
///
/// β₁ = cov(x,y) / var(x)
/// β₀ = ȳ - β₁·x̄
///
/// with sample covariance and sample variance (ddof = 1).
///
/// # Undefined when
///
/// - fewer than 2 pairs,
/// - var(x) is exactly zero (a vertical point cloud has no OLS line),
/// - the slices differ in length.
///
/// # References
///
/// Draper & Smith (1998). "Applied Regression Analysis", 3rd edition.
pub fn simple_linear_regression(x: &[f64], y: &[f64]) -> Computed<RegressionFit> {
    let n = x.len();
    if n != y.len() {
        return Computed::Undefined(UndefinedReason::MismatchedLengths);
    }
    if n < 2 {
        return Computed::insufficient(2, n);
    }

    let x_var = x.variance();
    if x_var == 0.0 {
        return Computed::Undefined(UndefinedReason::ZeroVariance);
    }

    let slope = x.covariance(y) / x_var;
    let intercept = y.mean() - slope * x.mean();
    let fitted = x.iter().map(|&xi| intercept + slope * xi).collect();

    Computed::Value(RegressionFit {
        slope,
        intercept,
        fitted,
        n,
    })
}
