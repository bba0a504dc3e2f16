//! Per-statistic outcome type.
//!
//! A statistic whose precondition fails reports an explicit
//! [`Computed::Undefined`] marker with a reason instead of a NaN, a silent 0,
//! or a panic. Failures stay local to one statistic, so the remaining fields
//! of a result bundle are still renderable. Presentation layers must render
//! the marker explicitly (e.g. "n/a"), never as 0, blank, or a stale value.
//!
//! # Examples
//!
//! ```
//! use concordat::computed::{Computed, UndefinedReason};
//! use concordat::correlation::pearson;
//!
//! let r = pearson(&[1.0], &[2.0]);
//! assert_eq!(
//!     r,
//!     Computed::Undefined(UndefinedReason::InsufficientData { required: 2, actual: 1 })
//! );
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a statistic could not be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UndefinedReason {
    /// Fewer observations than the statistic's minimum sample size.
    InsufficientData {
        /// Minimum number of observations the statistic needs.
        required: usize,
        /// Number of observations actually available.
        actual: usize,
    },
    /// A sample variance required by the statistic is exactly zero.
    ZeroVariance,
    /// The statistic's denominator evaluates to exactly zero.
    DegenerateDenominator,
    /// The two input slices differ in length.
    ///
    /// Cannot occur for slices taken from one [`crate::pairing::PairedSeries`];
    /// the slice-level functions are public and must not panic on misuse.
    MismatchedLengths,
}

impl fmt::Display for UndefinedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UndefinedReason::InsufficientData { required, actual } => {
                write!(f, "insufficient data (need at least {required}, have {actual})")
            }
            UndefinedReason::ZeroVariance => write!(f, "not computable (zero variance)"),
            UndefinedReason::DegenerateDenominator => {
                write!(f, "not computable (degenerate denominator)")
            }
            UndefinedReason::MismatchedLengths => {
                write!(f, "not computable (input lengths differ)")
            }
        }
    }
}

/// Outcome of a single statistic: a finite value or an explicit marker.
///
/// Serializes with an explicit `value`/`undefined` tag so an undefined
/// statistic can never be mistaken for a real one by a consumer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Computed<T> {
    /// The statistic was computable.
    Value(T),
    /// The statistic's precondition failed.
    Undefined(UndefinedReason),
}

impl<T> Computed<T> {
    /// Marker for a statistic that needs at least `required` observations.
    pub fn insufficient(required: usize, actual: usize) -> Self {
        Computed::Undefined(UndefinedReason::InsufficientData { required, actual })
    }

    /// Returns the value, or `None` if undefined.
    pub fn value(&self) -> Option<&T> {
        match self {
            Computed::Value(v) => Some(v),
            Computed::Undefined(_) => None,
        }
    }

    /// Consumes the outcome, returning the value or `None`.
    pub fn into_value(self) -> Option<T> {
        match self {
            Computed::Value(v) => Some(v),
            Computed::Undefined(_) => None,
        }
    }

    /// Returns the reason, or `None` if the statistic was computed.
    pub fn reason(&self) -> Option<UndefinedReason> {
        match self {
            Computed::Value(_) => None,
            Computed::Undefined(r) => Some(*r),
        }
    }

    /// `true` when a value was computed.
    pub fn is_defined(&self) -> bool {
        matches!(self, Computed::Value(_))
    }

    /// Maps the contained value, preserving an undefined marker.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Computed<U> {
        match self {
            Computed::Value(v) => Computed::Value(f(v)),
            Computed::Undefined(r) => Computed::Undefined(r),
        }
    }
}
