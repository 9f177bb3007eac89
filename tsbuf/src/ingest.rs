//! Input normalization for `add`.
//!
//! Every accepted input shape is a variant of [`Ingest`]. Normalization turns
//! any variant into a `Vec<Sample>` of complete 4-tuples, or fails without
//! producing anything. The buffer appends only after normalization succeeds,
//! so a rejected call never leaves partial data behind.
//!
//! # Accepted shapes
//!
//! | variant | row / field layout | missing fields |
//! |---|---|---|
//! | [`Ingest::Pairs`] | `(time, value)`, each plain or uncertain | carried std_dev, else [`EMPTY_UNC`] |
//! | [`Ingest::Triples`] | `(time, value, value_unc)` | `time_unc` = [`EMPTY_UNC`] |
//! | [`Ingest::Quads`] | `(time, time_unc, value, value_unc)` | none |
//! | [`Ingest::Rows`] | rows of 2, 3 or 4 scalars, arity set by the first row | as above |
//! | [`Ingest::Series`] | parallel `time`, `time_unc`, `value`, `value_unc` | see [`SeriesInput`] |
//! | [`Ingest::Single`] | one scalar sample | see [`SingleInput`] |

use crate::error::{IngestError, Result};
use crate::sample::{EMPTY_UNC, EMPTY_VALUE, Sample, Scalar, UFloat};

/// One `add` call's worth of input.
#[derive(Debug, Clone, PartialEq)]
pub enum Ingest {
    /// Batched `(time, value)` rows.
    Pairs(Vec<(Scalar, Scalar)>),
    /// Batched `(time, value, value_unc)` rows.
    Triples(Vec<[f64; 3]>),
    /// Batched `(time, time_unc, value, value_unc)` rows.
    Quads(Vec<[f64; 4]>),
    /// Batched rows whose arity is only known at runtime.
    Rows(Vec<Vec<Scalar>>),
    /// Parallel sequences.
    Series(SeriesInput),
    /// A single sample given as scalars.
    Single(SingleInput),
}

impl Ingest {
    /// Normalizes the input into complete samples, in input order.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::ShapeMismatch`] if parallel sequences resolve to
    /// different lengths, and [`IngestError::UnsupportedShape`] if the input
    /// does not fit any accepted layout.
    pub fn normalize(self) -> Result<Vec<Sample>> {
        match self {
            Self::Pairs(rows) => Ok(rows.into_iter().map(|(t, v)| pair(t, v)).collect()),
            Self::Triples(rows) => Ok(rows.into_iter().map(triple).collect()),
            Self::Quads(rows) => Ok(rows.into_iter().map(Sample::from_array).collect()),
            Self::Rows(rows) => normalize_rows(&rows),
            Self::Series(series) => series.normalize(),
            Self::Single(single) => Ok(vec![single.normalize()]),
        }
    }
}

impl From<SeriesInput> for Ingest {
    fn from(series: SeriesInput) -> Self {
        Self::Series(series)
    }
}

impl From<SingleInput> for Ingest {
    fn from(single: SingleInput) -> Self {
        Self::Single(single)
    }
}

#[inline]
fn pair(time: Scalar, value: Scalar) -> Sample {
    let (t, ut) = time.split_or(EMPTY_UNC);
    let (v, uv) = value.split_or(EMPTY_UNC);
    Sample::new(t, ut, v, uv)
}

#[inline]
fn triple([t, v, uv]: [f64; 3]) -> Sample {
    Sample::new(t, EMPTY_UNC, v, uv)
}

/// Plain numbers from a 3- or 4-row; uncertain elements are only valid in pairs.
fn plain_row<const N: usize>(row: &[Scalar], index: usize) -> Result<[f64; N]> {
    let mut out = [0.0; N];
    for (slot, scalar) in out.iter_mut().zip(row) {
        match scalar {
            Scalar::Plain(v) => *slot = *v,
            Scalar::Uncertain(_) => {
                return Err(IngestError::UnsupportedShape {
                    reason: format!(
                        "row {index}: values with uncertainty are only accepted in 2-element rows"
                    ),
                }
                .into());
            }
        }
    }
    Ok(out)
}

fn normalize_rows(rows: &[Vec<Scalar>]) -> Result<Vec<Sample>> {
    let Some(arity) = rows.first().map(Vec::len) else {
        return Ok(Vec::new());
    };

    if !(2..=4).contains(&arity) {
        return Err(IngestError::UnsupportedShape {
            reason: format!("rows must have 2, 3 or 4 elements, got {arity}"),
        }
        .into());
    }

    let mut samples = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        if row.len() != arity {
            return Err(IngestError::UnsupportedShape {
                reason: format!(
                    "row {index} has {} elements, expected {arity} like the first row",
                    row.len()
                ),
            }
            .into());
        }

        let sample = match arity {
            2 => pair(row[0], row[1]),
            3 => triple(plain_row::<3>(row, index)?),
            _ => Sample::from_array(plain_row::<4>(row, index)?),
        };
        samples.push(sample);
    }

    Ok(samples)
}

/// A time or value field of a [`SeriesInput`].
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// A sequence of plain numbers.
    Plain(Vec<f64>),
    /// A sequence of numbers carrying their own uncertainty.
    Uncertain(Vec<UFloat>),
    /// One scalar repeated for every sample.
    Broadcast(Scalar),
}

impl From<Vec<f64>> for Column {
    fn from(values: Vec<f64>) -> Self {
        Self::Plain(values)
    }
}

impl From<Vec<UFloat>> for Column {
    fn from(values: Vec<UFloat>) -> Self {
        Self::Uncertain(values)
    }
}

impl From<f64> for Column {
    fn from(value: f64) -> Self {
        Self::Broadcast(Scalar::Plain(value))
    }
}

impl From<UFloat> for Column {
    fn from(value: UFloat) -> Self {
        Self::Broadcast(Scalar::Uncertain(value))
    }
}

/// An uncertainty field of a [`SeriesInput`].
#[derive(Debug, Clone, PartialEq)]
pub enum Spread {
    /// One uncertainty repeated for every sample.
    Broadcast(f64),
    /// One uncertainty per sample.
    PerSample(Vec<f64>),
}

impl Default for Spread {
    fn default() -> Self {
        Self::Broadcast(EMPTY_UNC)
    }
}

impl From<f64> for Spread {
    fn from(unc: f64) -> Self {
        Self::Broadcast(unc)
    }
}

impl From<Vec<f64>> for Spread {
    fn from(unc: Vec<f64>) -> Self {
        Self::PerSample(unc)
    }
}

impl Spread {
    fn resolve(self, n: usize) -> Vec<f64> {
        match self {
            Self::Broadcast(u) => vec![u; n],
            Self::PerSample(u) => u,
        }
    }
}

/// Parallel sequences of times, values and their uncertainties.
///
/// The length of `time` fixes the batch length `n`:
///
/// - an [`Column::Uncertain`] field supplies its own uncertainty and the
///   matching [`Spread`] is ignored
/// - a [`Column::Broadcast`] value is repeated `n` times
/// - a [`Spread::Broadcast`] uncertainty is repeated `n` times
/// - all four resolved sequences must then have length `n`
///
/// `time` itself must be a sequence; a single timestamp belongs in
/// [`SingleInput`].
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesInput {
    /// Timestamps.
    pub time: Column,
    /// Timestamp uncertainties.
    pub time_unc: Spread,
    /// Values.
    pub value: Column,
    /// Value uncertainties.
    pub value_unc: Spread,
}

impl SeriesInput {
    /// Creates a series input with default (empty) uncertainties.
    pub fn new(time: impl Into<Column>, value: impl Into<Column>) -> Self {
        Self {
            time: time.into(),
            time_unc: Spread::default(),
            value: value.into(),
            value_unc: Spread::default(),
        }
    }

    /// Sets the timestamp uncertainties.
    #[must_use]
    pub fn with_time_unc(mut self, time_unc: impl Into<Spread>) -> Self {
        self.time_unc = time_unc.into();
        self
    }

    /// Sets the value uncertainties.
    #[must_use]
    pub fn with_value_unc(mut self, value_unc: impl Into<Spread>) -> Self {
        self.value_unc = value_unc.into();
        self
    }

    /// Resolves the four fields into samples.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::UnsupportedShape`] if `time` is not a sequence,
    /// or [`IngestError::ShapeMismatch`] if the resolved lengths differ.
    pub fn normalize(self) -> Result<Vec<Sample>> {
        let n = match &self.time {
            Column::Plain(t) => t.len(),
            Column::Uncertain(t) => t.len(),
            Column::Broadcast(_) => {
                return Err(IngestError::UnsupportedShape {
                    reason: "time must be a sequence for parallel input; use a single sample instead"
                        .to_string(),
                }
                .into());
            }
        };

        let (t, ut) = resolve_column(self.time, self.time_unc, n);
        let (v, uv) = resolve_column(self.value, self.value_unc, n);

        if !(ut.len() == n && v.len() == n && uv.len() == n) {
            return Err(IngestError::ShapeMismatch {
                time: n,
                time_unc: ut.len(),
                value: v.len(),
                value_unc: uv.len(),
            }
            .into());
        }

        Ok(t.into_iter()
            .zip(ut)
            .zip(v.into_iter().zip(uv))
            .map(|((t, ut), (v, uv))| Sample::new(t, ut, v, uv))
            .collect())
    }
}

/// Splits a column into values and uncertainties, broadcasting to `n`.
fn resolve_column(column: Column, spread: Spread, n: usize) -> (Vec<f64>, Vec<f64>) {
    match column {
        Column::Plain(values) => (values, spread.resolve(n)),
        Column::Uncertain(values) => values.iter().map(|u| (u.nominal, u.std_dev)).unzip(),
        Column::Broadcast(scalar) => match scalar.split() {
            (value, Some(unc)) => (vec![value; n], vec![unc; n]),
            (value, None) => (vec![value; n], spread.resolve(n)),
        },
    }
}

/// A single sample given as scalars.
///
/// An uncertain `time` or `value` supplies its own uncertainty and the
/// separate `*_unc` field is ignored. A plain one takes `*_unc`, or
/// [`EMPTY_UNC`] when that is `None`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SingleInput {
    /// Timestamp.
    pub time: Scalar,
    /// Timestamp uncertainty.
    pub time_unc: Option<f64>,
    /// Value.
    pub value: Scalar,
    /// Value uncertainty.
    pub value_unc: Option<f64>,
}

impl SingleInput {
    /// Creates a single-sample input.
    pub fn new(time: impl Into<Scalar>, value: impl Into<Scalar>) -> Self {
        Self {
            time: time.into(),
            time_unc: None,
            value: value.into(),
            value_unc: None,
        }
    }

    /// Creates a single-sample input with no value, only a timestamp.
    pub fn at(time: impl Into<Scalar>) -> Self {
        Self::new(time, EMPTY_VALUE)
    }

    /// Sets the timestamp uncertainty.
    #[must_use]
    pub fn with_time_unc(mut self, time_unc: f64) -> Self {
        self.time_unc = Some(time_unc);
        self
    }

    /// Sets the value uncertainty.
    #[must_use]
    pub fn with_value_unc(mut self, value_unc: f64) -> Self {
        self.value_unc = Some(value_unc);
        self
    }

    /// Resolves the input into a sample.
    pub fn normalize(self) -> Sample {
        let (t, ut) = self.time.split_or(self.time_unc.unwrap_or(EMPTY_UNC));
        let (v, uv) = self.value.split_or(self.value_unc.unwrap_or(EMPTY_UNC));
        Sample::new(t, ut, v, uv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TsBufError;

    fn u(nominal: f64, std_dev: f64) -> UFloat {
        UFloat::new(nominal, std_dev)
    }

    #[test]
    fn test_pairs_plain_and_uncertain() {
        let samples = Ingest::Pairs(vec![
            (Scalar::Plain(1.0), Scalar::Plain(10.0)),
            (u(2.0, 0.1).into(), Scalar::Plain(20.0)),
            (Scalar::Plain(3.0), u(30.0, 0.5).into()),
        ])
        .normalize()
        .unwrap();

        assert_eq!(samples, vec![
            Sample::new(1.0, EMPTY_UNC, 10.0, EMPTY_UNC),
            Sample::new(2.0, 0.1, 20.0, EMPTY_UNC),
            Sample::new(3.0, EMPTY_UNC, 30.0, 0.5),
        ]);
    }

    #[test]
    fn test_triples_and_quads() {
        let triples = Ingest::Triples(vec![[1.0, 10.0, 0.2]]).normalize().unwrap();
        assert_eq!(triples, vec![Sample::new(1.0, EMPTY_UNC, 10.0, 0.2)]);

        let quads = Ingest::Quads(vec![[1.0, 0.01, 10.0, 0.2]]).normalize().unwrap();
        assert_eq!(quads, vec![Sample::new(1.0, 0.01, 10.0, 0.2)]);
    }

    #[test]
    fn test_rows_follow_first_row_arity() {
        let rows = vec![
            vec![Scalar::Plain(1.0), Scalar::Plain(10.0), Scalar::Plain(0.1)],
            vec![Scalar::Plain(2.0), Scalar::Plain(20.0), Scalar::Plain(0.2)],
        ];
        let samples = Ingest::Rows(rows).normalize().unwrap();

        assert_eq!(samples[1], Sample::new(2.0, EMPTY_UNC, 20.0, 0.2));
    }

    #[test]
    fn test_rows_reject_bad_arity() {
        let rows = vec![vec![Scalar::Plain(1.0)]];
        let err = Ingest::Rows(rows).normalize().unwrap_err();
        assert!(matches!(
            err,
            TsBufError::Ingest(IngestError::UnsupportedShape { .. })
        ));

        let rows = vec![vec![Scalar::Plain(0.0); 5]];
        assert!(Ingest::Rows(rows).normalize().is_err());
    }

    #[test]
    fn test_rows_reject_ragged() {
        let rows = vec![
            vec![Scalar::Plain(1.0), Scalar::Plain(10.0)],
            vec![Scalar::Plain(2.0), Scalar::Plain(20.0), Scalar::Plain(0.2)],
        ];
        let err = Ingest::Rows(rows).normalize().unwrap_err();
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn test_rows_reject_uncertain_in_quads() {
        let rows = vec![vec![
            Scalar::Plain(1.0),
            Scalar::Plain(0.0),
            u(10.0, 0.1).into(),
            Scalar::Plain(0.1),
        ]];
        assert!(Ingest::Rows(rows).normalize().is_err());
    }

    #[test]
    fn test_rows_empty() {
        assert!(Ingest::Rows(Vec::new()).normalize().unwrap().is_empty());
    }

    #[test]
    fn test_series_broadcasts_scalar_uncertainty() {
        let samples = SeriesInput::new(vec![1.0, 2.0, 3.0], vec![10.0, 20.0, 30.0])
            .with_value_unc(0.5)
            .normalize()
            .unwrap();

        assert_eq!(samples.len(), 3);
        assert!(samples.iter().all(|s| s.value_unc == 0.5));
        assert!(samples.iter().all(|s| s.time_unc == EMPTY_UNC));
    }

    #[test]
    fn test_series_uncertain_columns_override_spread() {
        let samples = SeriesInput::new(
            vec![u(1.0, 0.1), u(2.0, 0.2)],
            vec![u(10.0, 1.0), u(20.0, 2.0)],
        )
        .with_time_unc(99.0)
        .with_value_unc(vec![99.0])
        .normalize()
        .unwrap();

        assert_eq!(samples, vec![
            Sample::new(1.0, 0.1, 10.0, 1.0),
            Sample::new(2.0, 0.2, 20.0, 2.0),
        ]);
    }

    #[test]
    fn test_series_broadcast_value() {
        let samples = SeriesInput::new(vec![1.0, 2.0], u(5.0, 0.5))
            .normalize()
            .unwrap();
        assert_eq!(samples, vec![
            Sample::new(1.0, EMPTY_UNC, 5.0, 0.5),
            Sample::new(2.0, EMPTY_UNC, 5.0, 0.5),
        ]);

        let samples = SeriesInput::new(vec![1.0, 2.0], 7.0)
            .with_value_unc(vec![0.1, 0.2])
            .normalize()
            .unwrap();
        assert_eq!(samples[1], Sample::new(2.0, EMPTY_UNC, 7.0, 0.2));
    }

    #[test]
    fn test_series_shape_mismatch() {
        let err = SeriesInput::new(vec![1.0, 2.0, 3.0], vec![10.0, 20.0])
            .normalize()
            .unwrap_err();

        match err {
            TsBufError::Ingest(IngestError::ShapeMismatch {
                time,
                time_unc,
                value,
                value_unc,
            }) => {
                assert_eq!((time, time_unc, value, value_unc), (3, 3, 2, 3));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_series_uncertainty_length_mismatch() {
        let result = SeriesInput::new(vec![1.0, 2.0], vec![10.0, 20.0])
            .with_time_unc(vec![0.1, 0.2, 0.3])
            .normalize();
        assert!(result.is_err());
    }

    #[test]
    fn test_series_rejects_scalar_time() {
        let result = SeriesInput::new(1.0, vec![10.0]).normalize();
        assert!(matches!(
            result,
            Err(TsBufError::Ingest(IngestError::UnsupportedShape { .. }))
        ));
    }

    #[test]
    fn test_series_empty() {
        let samples = SeriesInput::new(Vec::<f64>::new(), Vec::<f64>::new())
            .normalize()
            .unwrap();
        assert!(samples.is_empty());
    }

    #[test]
    fn test_single_defaults() {
        let sample = SingleInput::at(4.0).normalize();
        assert_eq!(sample.time, 4.0);
        assert_eq!(sample.time_unc, EMPTY_UNC);
        assert!(sample.value.is_nan());
        assert_eq!(sample.value_unc, EMPTY_UNC);
    }

    #[test]
    fn test_single_explicit_and_carried() {
        let sample = SingleInput::new(1.0, 2.0)
            .with_time_unc(0.1)
            .with_value_unc(0.2)
            .normalize();
        assert_eq!(sample, Sample::new(1.0, 0.1, 2.0, 0.2));

        let sample = SingleInput::new(u(1.0, 0.3), u(2.0, 0.4))
            .with_time_unc(9.0)
            .normalize();
        assert_eq!(sample, Sample::new(1.0, 0.3, 2.0, 0.4));
    }
}
