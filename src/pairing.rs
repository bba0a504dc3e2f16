//! Pairing and alignment of measurement records.
//!
//! Joins two measurement groups (e.g. device A vs device B) on shared
//! identity keys to produce exactly one `(x, y)` pair per key tuple present
//! in both groups — inner join semantics. Rows with a missing value on
//! either side are dropped *after* the join, since a row is only droppable
//! once both sides are known.
//!
//! Structural problems (a missing key column, an empty key list) are hard
//! errors; an empty join result is not — downstream statistics detect
//! n < 2 and degrade per-statistic.
//!
//! # Examples
//!
//! ```
//! use concordat::pairing::{pair, PairingSpec, Record};
//!
//! let records = vec![
//!     Record::new("A", "mg/L", Some(1.0)).with_key("test", "T1"),
//!     Record::new("B", "mg/L", Some(1.1)).with_key("test", "T1"),
//!     Record::new("A", "mg/L", Some(2.0)).with_key("test", "T2"),
//! ];
//! let spec = PairingSpec::new("A", "B", "mg/L", ["test"]);
//! let series = pair(&records, &spec).unwrap();
//! assert_eq!(series.len(), 1); // T2 has no B-side partner
//! ```

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// A single measurement row handed over by the ingestion layer.
///
/// Identity fields live in a name → value map so callers choose which of
/// them act as join keys per analysis. The ingestion layer is responsible
/// for numeric coercion (`value: None` marks a value it could not coerce),
/// duplicate-row resolution, and trimming incidental whitespace from names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Identity fields by column name (e.g. "test", "sample", "lot").
    pub keys: BTreeMap<String, String>,
    /// Group label, e.g. the device or instrument name.
    pub group: String,
    /// Unit or category label.
    pub unit: String,
    /// Measurement value; `None` when the source cell was not numeric.
    pub value: Option<f64>,
}

impl Record {
    /// Creates a record with no identity keys yet.
    pub fn new(group: impl Into<String>, unit: impl Into<String>, value: Option<f64>) -> Self {
        Record {
            keys: BTreeMap::new(),
            group: group.into(),
            unit: unit.into(),
            value,
        }
    }

    /// Adds one identity key column.
    pub fn with_key(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.keys.insert(name.into(), value.into());
        self
    }
}

/// Which rows to pair, and on which identity columns to join them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairingSpec {
    /// Group label providing the x side.
    pub group_x: String,
    /// Group label providing the y side.
    pub group_y: String,
    /// Unit the comparison is restricted to.
    pub unit: String,
    /// Ordered join-key column names; every record of both groups must
    /// carry all of them.
    pub join_keys: Vec<String>,
}

impl PairingSpec {
    /// Convenience constructor.
    pub fn new<K: Into<String>>(
        group_x: impl Into<String>,
        group_y: impl Into<String>,
        unit: impl Into<String>,
        join_keys: impl IntoIterator<Item = K>,
    ) -> Self {
        PairingSpec {
            group_x: group_x.into(),
            group_y: group_y.into(),
            unit: unit.into(),
            join_keys: join_keys.into_iter().map(Into::into).collect(),
        }
    }
}

/// Structural pairing failure. Fatal to the whole analysis.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PairingError {
    /// A record lacks one of the requested join-key columns.
    #[error("required key column `{column}` is missing from a record in group `{group}`")]
    MissingColumn {
        /// Group label of the offending record.
        group: String,
        /// Name of the absent key column.
        column: String,
    },
    /// The join-key list is empty; a keyless join is meaningless.
    #[error("no join keys specified")]
    NoJoinKeys,
}

/// One aligned observation pair.
///
/// Invariant: both `x` and `y` are finite. Upheld by [`PairedSeries::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementPair {
    /// Join-key values, in the order of [`PairingSpec::join_keys`].
    pub id: Vec<String>,
    /// Measurement from the x-side group.
    pub x: f64,
    /// Measurement from the y-side group.
    pub y: f64,
}

/// An ordered sequence of aligned pairs sharing one unit and one group pairing.
///
/// `len()` is the sole driver of every sample-size-dependent computation
/// downstream (degrees of freedom = n − 1). The series is read-only input
/// to every statistic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairedSeries {
    group_x: String,
    group_y: String,
    unit: String,
    pairs: Vec<MeasurementPair>,
}

impl PairedSeries {
    /// Builds a series, silently discarding any pair with a non-finite side.
    pub fn new(
        group_x: impl Into<String>,
        group_y: impl Into<String>,
        unit: impl Into<String>,
        pairs: Vec<MeasurementPair>,
    ) -> Self {
        let pairs = pairs
            .into_iter()
            .filter(|p| p.x.is_finite() && p.y.is_finite())
            .collect();
        PairedSeries {
            group_x: group_x.into(),
            group_y: group_y.into(),
            unit: unit.into(),
            pairs,
        }
    }

    /// Group label of the x side.
    pub fn group_x(&self) -> &str {
        &self.group_x
    }

    /// Group label of the y side.
    pub fn group_y(&self) -> &str {
        &self.group_y
    }

    /// Unit shared by all pairs.
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// The aligned pairs, in join order.
    pub fn pairs(&self) -> &[MeasurementPair] {
        &self.pairs
    }

    /// Number of valid pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// `true` when no key tuple matched.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// The x-side values, in pair order.
    pub fn xs(&self) -> Vec<f64> {
        self.pairs.iter().map(|p| p.x).collect()
    }

    /// The y-side values, in pair order.
    pub fn ys(&self) -> Vec<f64> {
        self.pairs.iter().map(|p| p.y).collect()
    }
}

/// Aligns two measurement groups into a [`PairedSeries`].
///
/// Restricts `records` to the spec's unit, splits them by the two group
/// labels, and inner-joins on the join-key tuple. Duplicate key tuples
/// within one group resolve last-wins; the ingestion layer owns
/// de-duplication. Zero matching keys yield an empty series, not an error.
///
/// # Errors
///
/// [`PairingError::MissingColumn`] if any record of either group lacks a
/// join-key column; [`PairingError::NoJoinKeys`] if the key list is empty.
pub fn pair(records: &[Record], spec: &PairingSpec) -> Result<PairedSeries, PairingError> {
    if spec.join_keys.is_empty() {
        return Err(PairingError::NoJoinKeys);
    }

    let mut x_side: BTreeMap<Vec<String>, Option<f64>> = BTreeMap::new();
    let mut y_side: BTreeMap<Vec<String>, Option<f64>> = BTreeMap::new();

    for record in records {
        if record.unit != spec.unit {
            continue;
        }
        let side = if record.group == spec.group_x {
            &mut x_side
        } else if record.group == spec.group_y {
            &mut y_side
        } else {
            continue;
        };
        let key = key_tuple(record, &spec.join_keys)?;
        side.insert(key, record.value);
    }

    let mut pairs = Vec::new();
    let mut dropped = 0usize;
    for (key, x) in &x_side {
        let Some(y) = y_side.get(key) else { continue };
        match (x, y) {
            (Some(x), Some(y)) if x.is_finite() && y.is_finite() => {
                pairs.push(MeasurementPair {
                    id: key.clone(),
                    x: *x,
                    y: *y,
                });
            }
            _ => dropped += 1,
        }
    }

    debug!(
        group_x = %spec.group_x,
        group_y = %spec.group_y,
        unit = %spec.unit,
        matched = pairs.len(),
        dropped_missing = dropped,
        "paired measurement records"
    );

    Ok(PairedSeries::new(
        spec.group_x.clone(),
        spec.group_y.clone(),
        spec.unit.clone(),
        pairs,
    ))
}

/// Sorted distinct units among records carrying any of the given group labels.
///
/// Supports unit selection in a presentation layer: only units that actually
/// occur in the groups being compared are offered.
pub fn available_units(records: &[Record], groups: &[&str]) -> Vec<String> {
    let set: BTreeSet<&str> = records
        .iter()
        .filter(|r| groups.contains(&r.group.as_str()))
        .map(|r| r.unit.as_str())
        .collect();
    set.into_iter().map(String::from).collect()
}

/// Number of distinct join-key tuples for which *every* listed group has a
/// record, across all units.
///
/// This is the "n tests available" count a presentation layer shows next to
/// each comparison option before a unit is chosen.
///
/// # Errors
///
/// Same structural errors as [`pair`].
pub fn complete_key_count(
    records: &[Record],
    join_keys: &[String],
    groups: &[&str],
) -> Result<usize, PairingError> {
    if join_keys.is_empty() {
        return Err(PairingError::NoJoinKeys);
    }

    let mut seen: BTreeMap<Vec<String>, BTreeSet<&str>> = BTreeMap::new();
    for record in records {
        if !groups.contains(&record.group.as_str()) {
            continue;
        }
        let key = key_tuple(record, join_keys)?;
        seen.entry(key).or_default().insert(record.group.as_str());
    }

    Ok(seen.values().filter(|g| g.len() == groups.len()).count())
}

fn key_tuple(record: &Record, join_keys: &[String]) -> Result<Vec<String>, PairingError> {
    join_keys
        .iter()
        .map(|name| {
            record
                .keys
                .get(name)
                .cloned()
                .ok_or_else(|| PairingError::MissingColumn {
                    group: record.group.clone(),
                    column: name.clone(),
                })
        })
        .collect()
}
