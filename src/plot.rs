//! Plot-ready series for the presentation layer.
//!
//! The engine computes data; any plotting layer renders it. Three series
//! groups are produced: the raw paired scatter with an identity line, the
//! fitted regression line with an agreement annotation, and the
//! Bland-Altman cloud with labeled horizontal reference lines.
//!
//! Undefined statistics surface in annotations as the explicit "n/a"
//! marker — never 0 and never a blank.

use serde::{Deserialize, Serialize};

use crate::agreement::{AgreementPoint, BlandAltman};
use crate::computed::Computed;
use crate::pairing::PairedSeries;
use crate::regression::RegressionFit;

/// A single (x, y) point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct XyPoint {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

/// Raw paired values plus the identity line y = x.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPlot {
    /// One point per measurement pair, in series order.
    pub points: Vec<XyPoint>,
    /// Endpoints of the identity line, spanning the joint min/max of both
    /// axes; `None` when the series is empty.
    pub identity_span: Option<(f64, f64)>,
}

/// Fitted regression line evaluated at the observed x values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionPlot {
    /// Line points (xᵢ, ŷᵢ); empty when the fit is undefined.
    pub line: Vec<XyPoint>,
    /// Agreement annotation, e.g. `"r = 0.9987 | Lin CCC = 0.9876"`.
    pub annotation: String,
}

/// A labeled horizontal reference line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLine {
    /// Display label carrying the numeric value, e.g. `"Bias: -1.25"`.
    pub label: String,
    /// Height of the line.
    pub value: f64,
}

/// Bland-Altman cloud plus its reference lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlandAltmanPlot {
    /// Per-pair (mean, diff) points.
    pub points: Vec<AgreementPoint>,
    /// Bias and ±1.96 SD lines; only lines whose statistic is defined.
    pub reference_lines: Vec<ReferenceLine>,
}

/// All plot series of one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotBundle {
    /// Raw paired scatter with identity line.
    pub scatter: ScatterPlot,
    /// Regression line and agreement annotation.
    pub regression: RegressionPlot,
    /// Bland-Altman cloud and reference lines.
    pub bland_altman: BlandAltmanPlot,
}

/// Formats a statistic for an annotation, rendering an undefined marker
/// as `"n/a"`.
pub fn format_stat(stat: &Computed<f64>, decimals: usize) -> String {
    match stat.value() {
        Some(v) => format!("{v:.decimals$}"),
        None => "n/a".to_string(),
    }
}

/// Builds the raw scatter series with the identity line span.
pub fn scatter_plot(series: &PairedSeries) -> ScatterPlot {
    let points: Vec<XyPoint> = series
        .pairs()
        .iter()
        .map(|p| XyPoint { x: p.x, y: p.y })
        .collect();

    let identity_span = points
        .iter()
        .flat_map(|p| [p.x, p.y])
        .fold(None, |span: Option<(f64, f64)>, v| match span {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        });

    ScatterPlot {
        points,
        identity_span,
    }
}

/// Builds the regression line series with the r / CCC annotation.
pub fn regression_plot(
    xs: &[f64],
    fit: &Computed<RegressionFit>,
    pearson_r: &Computed<f64>,
    ccc: &Computed<f64>,
) -> RegressionPlot {
    let line = match fit.value() {
        Some(fit) => xs
            .iter()
            .zip(fit.fitted.iter())
            .map(|(&x, &y)| XyPoint { x, y })
            .collect(),
        None => Vec::new(),
    };

    RegressionPlot {
        line,
        annotation: format!(
            "r = {} | Lin CCC = {}",
            format_stat(pearson_r, 4),
            format_stat(ccc, 4)
        ),
    }
}

/// Builds the Bland-Altman series with bias and limit lines.
pub fn bland_altman_plot(ba: &BlandAltman) -> BlandAltmanPlot {
    let mut reference_lines = Vec::with_capacity(3);
    if let Some(&bias) = ba.bias.value() {
        reference_lines.push(ReferenceLine {
            label: format!("Bias: {bias:.2}"),
            value: bias,
        });
    }
    if let Some(&upper) = ba.loa_upper.value() {
        reference_lines.push(ReferenceLine {
            label: format!("+1.96 SD: {upper:.2}"),
            value: upper,
        });
    }
    if let Some(&lower) = ba.loa_lower.value() {
        reference_lines.push(ReferenceLine {
            label: format!("-1.96 SD: {lower:.2}"),
            value: lower,
        });
    }

    BlandAltmanPlot {
        points: ba.points.clone(),
        reference_lines,
    }
}
