//! Result assembly.
//!
//! Collects every statistic of one comparison into a single immutable
//! [`AgreementResult`] for the presentation layer. Pure aggregation: no
//! computation of its own beyond packaging, and no field is silently
//! dropped — a statistic whose precondition failed is present as an
//! explicit [`Computed::Undefined`] marker.
//!
//! # Examples
//!
//! ```
//! use concordat::pairing::{MeasurementPair, PairedSeries};
//! use concordat::report::analyze;
//!
//! let pairs = (1..=5)
//!     .map(|i| MeasurementPair { id: vec![format!("T{i}")], x: i as f64, y: i as f64 })
//!     .collect();
//! let series = PairedSeries::new("A", "B", "mg/L", pairs);
//! let result = analyze(&series);
//! assert!((result.pearson_r.into_value().unwrap() - 1.0).abs() < 1e-10);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::agreement::{bland_altman, BlandAltman};
use crate::computed::Computed;
use crate::concordance::lin_ccc;
use crate::correlation::pearson;
use crate::equivalence::{paired_equivalence, EquivalenceTest};
use crate::pairing::PairedSeries;
use crate::plot::{bland_altman_plot, regression_plot, scatter_plot, PlotBundle};
use crate::regression::{simple_linear_regression, RegressionFit};
use crate::testing::{variance_ratio_test, LargerVariance, VarianceRatioTest};

/// The complete output bundle of one comparison.
///
/// Immutable; owned by the presentation layer that requested the analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgreementResult {
    /// Group label of the x side.
    pub group_x: String,
    /// Group label of the y side.
    pub group_y: String,
    /// Unit the comparison was restricted to.
    pub unit: String,
    /// Number of valid pairs.
    pub n: usize,
    /// Pearson correlation coefficient.
    pub pearson_r: Computed<f64>,
    /// OLS regression of y on x, with the fitted line.
    pub regression: Computed<RegressionFit>,
    /// Lin's concordance correlation coefficient.
    pub ccc: Computed<f64>,
    /// Bland-Altman bias, SD of differences, and limits of agreement.
    pub bland_altman: BlandAltman,
    /// Paired equivalence test against the fixed +25%/−20% margin.
    pub equivalence: Computed<EquivalenceTest>,
    /// Two-sample F-test for equal variances.
    pub variance_ratio: Computed<VarianceRatioTest>,
    /// Plot-ready series for the presentation layer.
    pub plots: PlotBundle,
}

impl AgreementResult {
    /// Group label of the side with the larger variance, `"equal"` when the
    /// variances tie, or `None` when the F-test was not computable.
    pub fn larger_variance_label(&self) -> Option<String> {
        self.variance_ratio.value().map(|f| match f.larger_variance {
            LargerVariance::X => self.group_x.clone(),
            LargerVariance::Y => self.group_y.clone(),
            LargerVariance::Equal => "equal".to_string(),
        })
    }

    /// H₀ verdict string of the F-test, or `None` when not computable.
    pub fn h0_verdict(&self) -> Option<&'static str> {
        self.variance_ratio.value().map(VarianceRatioTest::verdict)
    }

    /// `true` iff the equivalence test ran and concluded equivalence.
    pub fn is_equivalent(&self) -> Option<bool> {
        self.equivalence.value().map(|eq| eq.equivalent)
    }
}

/// Runs the full comparison pipeline over one paired series.
///
/// Each statistic is computed independently; a precondition failure in one
/// leaves the others intact. An empty series yields a fully assembled
/// result whose statistics are all undefined markers.
pub fn analyze(series: &PairedSeries) -> AgreementResult {
    let xs = series.xs();
    let ys = series.ys();

    let pearson_r = pearson(&xs, &ys);
    let regression = simple_linear_regression(&xs, &ys);
    let ccc = lin_ccc(&xs, &ys);
    let ba = bland_altman(&xs, &ys);
    let equivalence = paired_equivalence(&xs, &ys);
    let variance_ratio = variance_ratio_test(&xs, &ys);

    let plots = PlotBundle {
        scatter: scatter_plot(series),
        regression: regression_plot(&xs, &regression, &pearson_r, &ccc),
        bland_altman: bland_altman_plot(&ba),
    };

    debug!(
        group_x = %series.group_x(),
        group_y = %series.group_y(),
        unit = %series.unit(),
        n = series.len(),
        pearson_defined = pearson_r.is_defined(),
        ccc_defined = ccc.is_defined(),
        equivalence_defined = equivalence.is_defined(),
        f_test_defined = variance_ratio.is_defined(),
        "assembled agreement result"
    );

    AgreementResult {
        group_x: series.group_x().to_string(),
        group_y: series.group_y().to_string(),
        unit: series.unit().to_string(),
        n: series.len(),
        pearson_r,
        regression,
        ccc,
        bland_altman: ba,
        equivalence,
        variance_ratio,
        plots,
    }
}
