//! Agreement analysis.
//!
//! Bland-Altman comparison of two measurement methods: per-pair mean and
//! difference, mean difference (bias), standard deviation of the
//! differences, and the 95% limits of agreement bias ± 1.96·SD.
//!
//! # Examples
//!
//! ```
//! use concordat::agreement::bland_altman;
//!
//! let x = [10.0, 12.0, 11.0, 13.0];
//! let y = [10.5, 11.5, 11.5, 12.5];
//! let ba = bland_altman(&x, &y);
//! assert_eq!(ba.n, 4);
//! assert!(ba.bias.is_defined());
//! assert!(ba.loa_upper.is_defined());
//! ```

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::computed::{Computed, UndefinedReason};

/// Normal-approximation multiplier for the 95% limits of agreement.
/// Fixed per Bland & Altman (1986); not configurable.
const LOA_MULTIPLIER: f64 = 1.96;

/// One point of the Bland-Altman plot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgreementPoint {
    /// (xᵢ + yᵢ) / 2.
    pub mean: f64,
    /// xᵢ − yᵢ.
    pub diff: f64,
}

/// Bland-Altman summary plus the full per-pair series for plotting.
///
/// `bias` needs n ≥ 1 (a single difference is its own mean); `sd_diff` and
/// both limits need n ≥ 2. A zero SD yields limits equal to the bias —
/// values, not markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlandAltman {
    /// Number of pairs.
    pub n: usize,
    /// Per-pair (mean, diff) points, in input order.
    pub points: Vec<AgreementPoint>,
    /// Mean difference x̄ − ȳ.
    pub bias: Computed<f64>,
    /// Sample standard deviation of the differences (ddof = 1).
    pub sd_diff: Computed<f64>,
    /// bias − 1.96·sd.
    pub loa_lower: Computed<f64>,
    /// bias + 1.96·sd.
    pub loa_upper: Computed<f64>,
}

/// Computes the Bland-Altman analysis of two paired series.
///
/// # References
///
/// Bland & Altman (1986). "Statistical methods for assessing agreement
/// between two methods of clinical measurement". The Lancet, 327(8476),
/// 307–310.
pub fn bland_altman(x: &[f64], y: &[f64]) -> BlandAltman {
    if x.len() != y.len() {
        let undefined = Computed::Undefined(UndefinedReason::MismatchedLengths);
        return BlandAltman {
            n: 0,
            points: Vec::new(),
            bias: undefined,
            sd_diff: undefined,
            loa_lower: undefined,
            loa_upper: undefined,
        };
    }

    let n = x.len();
    let points: Vec<AgreementPoint> = x
        .iter()
        .zip(y.iter())
        .map(|(&xi, &yi)| AgreementPoint {
            mean: (xi + yi) / 2.0,
            diff: xi - yi,
        })
        .collect();
    let diffs: Vec<f64> = points.iter().map(|p| p.diff).collect();

    let (bias, sd_diff, loa_lower, loa_upper) = if n >= 2 {
        let b = diffs.as_slice().mean();
        let sd = diffs.as_slice().std_dev();
        (
            Computed::Value(b),
            Computed::Value(sd),
            Computed::Value(b - LOA_MULTIPLIER * sd),
            Computed::Value(b + LOA_MULTIPLIER * sd),
        )
    } else {
        // A single difference is its own mean; sd and limits need n >= 2.
        let bias = if n == 1 {
            Computed::Value(diffs[0])
        } else {
            Computed::insufficient(1, 0)
        };
        (
            bias,
            Computed::insufficient(2, n),
            Computed::insufficient(2, n),
            Computed::insufficient(2, n),
        )
    };

    BlandAltman {
        n,
        points,
        bias,
        sd_diff,
        loa_lower,
        loa_upper,
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn limits_bracket_bias(
            data in proptest::collection::vec(-1e4_f64..1e4, 2..=50).prop_flat_map(|x| {
                let n = x.len();
                (Just(x), proptest::collection::vec(-1e4_f64..1e4, n..=n))
            })
        ) {
            let (x, y) = data;
            let ba = bland_altman(&x, &y);
            let bias = ba.bias.into_value().expect("bias");
            let lower = ba.loa_lower.into_value().expect("lower");
            let upper = ba.loa_upper.into_value().expect("upper");
            prop_assert!(lower <= bias + 1e-9 && bias <= upper + 1e-9,
                "limits [{lower}, {upper}] do not bracket bias {bias}");
        }

        #[test]
        fn swap_negates_diffs(
            data in proptest::collection::vec(-1e4_f64..1e4, 1..=30).prop_flat_map(|x| {
                let n = x.len();
                (Just(x), proptest::collection::vec(-1e4_f64..1e4, n..=n))
            })
        ) {
            let (x, y) = data;
            let ab = bland_altman(&x, &y);
            let ba = bland_altman(&y, &x);
            for (p, q) in ab.points.iter().zip(ba.points.iter()) {
                prop_assert!((p.diff + q.diff).abs() < 1e-9);
                prop_assert!((p.mean - q.mean).abs() < 1e-9);
            }
        }
    }
}
