//! Equivalence testing.
//!
//! Paired-sample equivalence test: a 95% confidence interval for the mean
//! difference x − y, compared against asymmetric bounds derived from the
//! mean of the y series. Equivalence is the *confirmation* that the
//! difference lies within pre-specified acceptable bounds — not the mere
//! failure to detect any difference.
//!
//! The margin is fixed at +25% / −20% of mean(y), an 80–125%-style
//! asymmetric policy carried over from the measurement-comparison domain
//! this crate serves. It is deliberately not configurable.
//!
//! # Examples
//!
//! ```
//! use concordat::equivalence::paired_equivalence;
//!
//! let x = [100.0, 101.0, 99.0, 100.5];
//! let y = [100.2, 100.8, 99.1, 100.4];
//! let eq = paired_equivalence(&x, &y).into_value().unwrap();
//! assert!(eq.equivalent);
//! ```

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};
use statrs::statistics::Statistics;

use crate::computed::{Computed, UndefinedReason};

/// Two-sided significance level of the confidence interval.
const ALPHA: f64 = 0.05;
/// Upper equivalence bound as a fraction of mean(y).
const UPPER_MARGIN: f64 = 0.25;
/// Lower equivalence bound as a fraction of mean(y).
const LOWER_MARGIN: f64 = -0.20;

/// Result of the paired equivalence test at fixed 95% confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquivalenceTest {
    /// Number of pairs.
    pub n: usize,
    /// Mean of the paired differences x̄ − ȳ.
    pub mean_diff: f64,
    /// Lower end of the 95% CI for the mean difference.
    pub ci_low: f64,
    /// Upper end of the 95% CI for the mean difference.
    pub ci_high: f64,
    /// Lower equivalence bound, −0.20 · mean(y).
    pub lower_bound: f64,
    /// Upper equivalence bound, +0.25 · mean(y).
    pub upper_bound: f64,
    /// `true` iff `ci_low > lower_bound && ci_high < upper_bound`
    /// (strict on both sides).
    pub equivalent: bool,
}

/// Runs the paired equivalence test.
///
/// # Algorithm
///
/// Differences dᵢ = xᵢ − yᵢ; CI = d̄ ± t₀.₉₇₅,ₙ₋₁ · s_d / √n with the
/// sample standard deviation (ddof = 1). The bounds are fractions of
/// mean(y); equivalence holds iff the CI lies strictly inside them.
///
/// A zero s_d degenerates the CI to the point [d̄, d̄]; that is a valid
/// outcome, not an undefined one.
///
/// # Not applicable when
///
/// - fewer than 2 pairs (the t-interval needs at least one degree of
///   freedom),
/// - the slices differ in length.
///
/// # References
///
/// Schuirmann (1987). "A comparison of the Two One-Sided Tests Procedure
/// and the Power Approach for assessing the equivalence of average
/// bioavailability". J Pharmacokinet Biopharm, 15, 657–680.
pub fn paired_equivalence(x: &[f64], y: &[f64]) -> Computed<EquivalenceTest> {
    let n = x.len();
    if n != y.len() {
        return Computed::Undefined(UndefinedReason::MismatchedLengths);
    }
    if n < 2 {
        return Computed::insufficient(2, n);
    }

    let diffs: Vec<f64> = x.iter().zip(y.iter()).map(|(&a, &b)| a - b).collect();
    let d = diffs.as_slice();
    let mean_diff = d.mean();
    let sd_diff = d.std_dev();

    let df = (n - 1) as f64;
    let Ok(t_dist) = StudentsT::new(0.0, 1.0, df) else {
        return Computed::insufficient(2, n);
    };
    let t_crit = t_dist.inverse_cdf(1.0 - ALPHA / 2.0);
    let margin = t_crit * sd_diff / (n as f64).sqrt();

    let ci_low = mean_diff - margin;
    let ci_high = mean_diff + margin;

    let mean_y = y.mean();
    let lower_bound = LOWER_MARGIN * mean_y;
    let upper_bound = UPPER_MARGIN * mean_y;

    Computed::Value(EquivalenceTest {
        n,
        mean_diff,
        ci_low,
        ci_high,
        lower_bound,
        upper_bound,
        equivalent: ci_low > lower_bound && ci_high < upper_bound,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_computation_matches() {
        // diffs = [10, 7, 9, 9]: mean 8.75, sd ≈ 1.258306, se ≈ 0.629153,
        // t(0.975, 3) ≈ 3.182446 → CI ≈ [6.7477, 10.7523].
        // mean(y) = 91.5 → bounds [−18.3, 22.875]; CI strictly inside.
        let x = [100.0, 102.0, 98.0, 101.0];
        let y = [90.0, 95.0, 89.0, 92.0];
        let eq = paired_equivalence(&x, &y).into_value().expect("should compute");

        assert_eq!(eq.n, 4);
        assert!((eq.mean_diff - 8.75).abs() < 1e-12);
        assert!((eq.ci_low - 6.7477).abs() < 1e-3, "ci_low = {}", eq.ci_low);
        assert!((eq.ci_high - 10.7523).abs() < 1e-3, "ci_high = {}", eq.ci_high);
        assert!((eq.lower_bound + 18.3).abs() < 1e-12);
        assert!((eq.upper_bound - 22.875).abs() < 1e-12);
        assert!(eq.equivalent);
    }

    #[test]
    fn large_systematic_offset_fails() {
        // x is ~40% above y; the CI for the difference sits far above
        // +25% of mean(y).
        let x = [140.0, 141.0, 139.0, 140.5];
        let y = [100.0, 100.5, 99.5, 100.0];
        let eq = paired_equivalence(&x, &y).into_value().expect("should compute");
        assert!(!eq.equivalent);
        assert!(eq.ci_low > eq.upper_bound);
    }

    #[test]
    fn bounds_are_asymmetric_fractions_of_mean_y() {
        let x = [10.0, 11.0, 9.0];
        let y = [10.0, 10.0, 10.0];
        let eq = paired_equivalence(&x, &y).into_value().expect("should compute");
        assert!((eq.upper_bound - 2.5).abs() < 1e-12); // +0.25 · 10
        assert!((eq.lower_bound + 2.0).abs() < 1e-12); // −0.20 · 10
    }

    #[test]
    fn identical_series_degenerate_ci_is_equivalent() {
        // sd of the differences is 0 → CI collapses to [0, 0], strictly
        // inside the bounds for any positive mean(y).
        let x = [5.0, 6.0, 7.0];
        let eq = paired_equivalence(&x, &x).into_value().expect("should compute");
        assert!(eq.mean_diff.abs() < 1e-15);
        assert!((eq.ci_low - eq.ci_high).abs() < 1e-15);
        assert!(eq.equivalent);
    }

    #[test]
    fn strict_inequality_on_the_bound() {
        // Zero-mean y makes both bounds 0; a CI of exactly [0, 0] must
        // fail the strict comparison.
        let x = [1.0, -1.0];
        let y = [1.0, -1.0];
        let eq = paired_equivalence(&x, &y).into_value().expect("should compute");
        assert!((eq.lower_bound).abs() < 1e-15);
        assert!((eq.upper_bound).abs() < 1e-15);
        assert!(!eq.equivalent);
    }

    #[test]
    fn wider_ci_can_only_break_equivalence() {
        // Same mean difference and bounds; larger spread in the diffs
        // widens the CI and flips the verdict from true to false.
        let y = [100.0, 100.0, 100.0, 100.0];
        let tight_x = [101.0, 101.2, 100.8, 101.0];
        let wide_x = [131.0, 71.2, 130.8, 71.0];

        let tight = paired_equivalence(&tight_x, &y).into_value().expect("tight");
        let wide = paired_equivalence(&wide_x, &y).into_value().expect("wide");

        assert!(tight.equivalent);
        assert!(!wide.equivalent);
        assert!(wide.ci_high - wide.ci_low > tight.ci_high - tight.ci_low);
    }

    #[test]
    fn not_applicable_below_two_pairs() {
        assert_eq!(paired_equivalence(&[1.0], &[2.0]), Computed::insufficient(2, 1));
        assert_eq!(paired_equivalence(&[], &[]), Computed::insufficient(2, 0));
    }

    #[test]
    fn length_mismatch_undefined() {
        assert_eq!(
            paired_equivalence(&[1.0, 2.0], &[1.0]),
            Computed::Undefined(UndefinedReason::MismatchedLengths)
        );
    }
}
