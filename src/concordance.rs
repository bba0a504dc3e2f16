//! Concordance analysis.
//!
//! Lin's concordance correlation coefficient (CCC), an agreement measure
//! combining precision (correlation) and accuracy (bias) between two
//! measurement methods.
//!
//! # Examples
//!
//! ```
//! use concordat::concordance::lin_ccc;
//!
//! let x = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let ccc = lin_ccc(&x, &x).into_value().unwrap();
//! assert!((ccc - 1.0).abs() < 1e-10);
//! ```

use statrs::statistics::Statistics;

use crate::computed::{Computed, UndefinedReason};

/// Computes Lin's concordance correlation coefficient.
///
/// # Algorithm
///
/// ccc = 2·cov(x,y) / (var(x) + var(y) + (x̄ − ȳ)²)
///
/// with sample covariance and sample variances (ddof = 1). CCC is symmetric
/// in x and y; it reaches 1 only for perfect agreement (identical series)
/// and is penalized both by scatter and by a mean offset.
///
/// # Undefined when
///
/// - fewer than 2 pairs,
/// - the denominator is exactly zero (both series constant with equal
///   means — the degenerate case),
/// - the slices differ in length.
///
/// # References
///
/// Lin (1989). "A concordance correlation coefficient to evaluate
/// reproducibility". Biometrics, 45(1), 255–268.
pub fn lin_ccc(x: &[f64], y: &[f64]) -> Computed<f64> {
    let n = x.len();
    if n != y.len() {
        return Computed::Undefined(UndefinedReason::MismatchedLengths);
    }
    if n < 2 {
        return Computed::insufficient(2, n);
    }

    let mean_x = x.mean();
    let mean_y = y.mean();
    let var_x = x.variance();
    let var_y = y.variance();
    let cov = x.covariance(y);

    let denominator = var_x + var_y + (mean_x - mean_y).powi(2);
    if denominator == 0.0 {
        return Computed::Undefined(UndefinedReason::DegenerateDenominator);
    }

    Computed::Value(2.0 * cov / denominator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_series_is_one() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let ccc = lin_ccc(&x, &x).into_value().expect("should compute");
        assert!((ccc - 1.0).abs() < 1e-10);
    }

    #[test]
    fn offset_penalizes_below_correlation() {
        // Perfectly correlated but shifted: r would be 1, CCC must be < 1.
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [3.0, 4.0, 5.0, 6.0, 7.0];
        let ccc = lin_ccc(&x, &y).into_value().expect("should compute");
        assert!(ccc < 1.0);
        assert!(ccc > 0.0);
        // var = 2.5 each, offset² = 4 → ccc = 5/9
        assert!((ccc - 5.0 / 9.0).abs() < 1e-10);
    }

    #[test]
    fn symmetric_in_x_and_y() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [1.2, 1.9, 3.3, 3.8, 5.1];
        let a = lin_ccc(&x, &y).into_value().expect("should compute");
        let b = lin_ccc(&y, &x).into_value().expect("should compute");
        assert!((a - b).abs() < 1e-12);
    }

    #[test]
    fn anticorrelated_is_negative() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [5.0, 4.0, 3.0, 2.0, 1.0];
        let ccc = lin_ccc(&x, &y).into_value().expect("should compute");
        assert!(ccc < 0.0);
    }

    #[test]
    fn insufficient_data() {
        assert_eq!(lin_ccc(&[1.0], &[1.0]), Computed::insufficient(2, 1));
        assert_eq!(lin_ccc(&[], &[]), Computed::insufficient(2, 0));
    }

    #[test]
    fn degenerate_denominator_undefined() {
        // Both constant with equal means: var_x = var_y = 0, offset = 0.
        assert_eq!(
            lin_ccc(&[3.0, 3.0, 3.0], &[3.0, 3.0, 3.0]),
            Computed::Undefined(UndefinedReason::DegenerateDenominator)
        );
    }

    #[test]
    fn constant_but_offset_is_defined_zero() {
        // Both constant, different means: denominator is the offset² > 0,
        // covariance is 0 → CCC = 0, a value, not a marker.
        let ccc = lin_ccc(&[3.0, 3.0], &[4.0, 4.0]).into_value().expect("should compute");
        assert!(ccc.abs() < 1e-15);
    }

    #[test]
    fn length_mismatch_undefined() {
        assert_eq!(
            lin_ccc(&[1.0, 2.0], &[1.0]),
            Computed::Undefined(UndefinedReason::MismatchedLengths)
        );
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn ccc_bounded(
            data in proptest::collection::vec(-1e5_f64..1e5, 2..=50).prop_flat_map(|x| {
                let n = x.len();
                (Just(x), proptest::collection::vec(-1e5_f64..1e5, n..=n))
            })
        ) {
            let (x, y) = data;
            if let Some(ccc) = lin_ccc(&x, &y).into_value() {
                prop_assert!((-1.0 - 1e-9..=1.0 + 1e-9).contains(&ccc), "ccc out of bounds: {ccc}");
            }
        }

        #[test]
        fn ccc_symmetric(
            data in proptest::collection::vec(-1e5_f64..1e5, 2..=50).prop_flat_map(|x| {
                let n = x.len();
                (Just(x), proptest::collection::vec(-1e5_f64..1e5, n..=n))
            })
        ) {
            let (x, y) = data;
            let a = lin_ccc(&x, &y);
            let b = lin_ccc(&y, &x);
            match (a.into_value(), b.into_value()) {
                (Some(a), Some(b)) => prop_assert!((a - b).abs() < 1e-9, "not symmetric: {a} vs {b}"),
                (None, None) => {}
                _ => prop_assert!(false, "one orientation undefined but not the other"),
            }
        }

        #[test]
        fn ccc_never_exceeds_pearson_magnitude(
            data in proptest::collection::vec(-1e3_f64..1e3, 3..=40).prop_flat_map(|x| {
                let n = x.len();
                (Just(x), proptest::collection::vec(-1e3_f64..1e3, n..=n))
            })
        ) {
            let (x, y) = data;
            let ccc = lin_ccc(&x, &y).into_value();
            let r = crate::correlation::pearson(&x, &y).into_value();
            if let (Some(ccc), Some(r)) = (ccc, r) {
                prop_assert!(ccc.abs() <= r.abs() + 1e-9,
                    "|ccc| = {} exceeds |r| = {}", ccc.abs(), r.abs());
            }
        }
    }
}
