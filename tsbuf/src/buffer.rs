//! The time-series buffer: ingestion, FIFO storage and formatted reads.

use std::fmt;
use std::num::NonZeroUsize;

use crate::config::{BufferConfig, DEFAULT_CAPACITY};
use crate::error::Result;
use crate::format::{Output, ReturnType, format};
use crate::ingest::{Ingest, SeriesInput, SingleInput};
use crate::ring::{RingIter, SampleRing, Window};
use crate::sample::Scalar;

/// A bounded FIFO buffer of time-series samples with uncertainty.
///
/// Samples are added through [`add`](Self::add) (or one of the typed
/// shortcuts), kept in insertion order, and read back through
/// [`pop`](Self::pop) (oldest, removing) or [`show`](Self::show) (newest,
/// non-removing) in the layout fixed by the buffer's [`ReturnType`]. Once
/// full, every further sample evicts the oldest one.
///
/// # Examples
///
/// ```rust
/// use tsbuf::{Output, ReturnType, TimeSeriesBuffer, Window};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut buffer = TimeSeriesBuffer::new(3, ReturnType::List)?;
/// buffer.add_quads(vec![
///     [1.0, 0.0, 10.0, 0.1],
///     [2.0, 0.0, 20.0, 0.1],
///     [3.0, 0.0, 30.0, 0.1],
///     [4.0, 0.0, 40.0, 0.1],
/// ])?;
/// assert_eq!(buffer.len(), 3);
///
/// let oldest = buffer.pop(1).into_samples();
/// assert_eq!(oldest[0].time, 2.0);
///
/// let rest = buffer.show(Window::All);
/// assert_eq!(rest.len(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TimeSeriesBuffer {
    ring: SampleRing,
    return_type: ReturnType,
    /// Samples dropped by capacity eviction since construction.
    evicted: u64,
}

impl TimeSeriesBuffer {
    /// Creates an empty buffer.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidCapacity`](crate::ConfigError::InvalidCapacity)
    /// if `capacity` is zero.
    pub fn new(capacity: usize, return_type: ReturnType) -> Result<Self> {
        Self::with_config(&BufferConfig {
            capacity,
            return_type,
        })
    }

    /// Creates an empty buffer from a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration does not validate.
    pub fn with_config(config: &BufferConfig) -> Result<Self> {
        let capacity = config.validate()?;
        Ok(Self::from_parts(capacity, config.return_type))
    }

    fn from_parts(capacity: NonZeroUsize, return_type: ReturnType) -> Self {
        Self {
            ring: SampleRing::new(capacity),
            return_type,
            evicted: 0,
        }
    }

    /// Returns the number of stored samples.
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    /// Returns `true` if no samples are stored.
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Returns the maximum number of samples held.
    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    /// Returns the layout used by `pop` and `show`.
    pub fn return_type(&self) -> ReturnType {
        self.return_type
    }

    /// Returns how many samples capacity eviction has dropped so far.
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    /// Iterates over the stored samples, oldest first, without formatting.
    pub fn samples(&self) -> RingIter<'_> {
        self.ring.iter()
    }

    /// Adds one or more samples.
    ///
    /// The whole input is normalized before anything is stored, so on error
    /// the buffer is unchanged. Within a batch, eviction applies per sample:
    /// a batch larger than the capacity leaves only its newest samples.
    ///
    /// Returns the number of samples appended.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError`](crate::IngestError) if the input cannot be
    /// normalized.
    pub fn add(&mut self, input: impl Into<Ingest>) -> Result<usize> {
        let samples = input.into().normalize()?;
        let added = samples.len();

        for sample in samples {
            if self.ring.append(sample).is_some() {
                self.evicted += 1;
            }
        }

        Ok(added)
    }

    /// Adds `(time, value)` rows; either element may carry its own uncertainty.
    ///
    /// # Errors
    ///
    /// Never fails for this shape; the `Result` mirrors [`add`](Self::add).
    pub fn add_pairs<T, V>(&mut self, rows: impl IntoIterator<Item = (T, V)>) -> Result<usize>
    where
        T: Into<Scalar>,
        V: Into<Scalar>,
    {
        self.add(Ingest::Pairs(
            rows.into_iter().map(|(t, v)| (t.into(), v.into())).collect(),
        ))
    }

    /// Adds `(time, value, value_unc)` rows.
    ///
    /// # Errors
    ///
    /// Never fails for this shape; the `Result` mirrors [`add`](Self::add).
    pub fn add_triples(&mut self, rows: impl IntoIterator<Item = [f64; 3]>) -> Result<usize> {
        self.add(Ingest::Triples(rows.into_iter().collect()))
    }

    /// Adds `(time, time_unc, value, value_unc)` rows.
    ///
    /// # Errors
    ///
    /// Never fails for this shape; the `Result` mirrors [`add`](Self::add).
    pub fn add_quads(&mut self, rows: impl IntoIterator<Item = [f64; 4]>) -> Result<usize> {
        self.add(Ingest::Quads(rows.into_iter().collect()))
    }

    /// Adds rows of 2, 3 or 4 scalars whose arity is set by the first row.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::UnsupportedShape`](crate::IngestError::UnsupportedShape)
    /// for a bad or inconsistent arity.
    pub fn add_rows(&mut self, rows: Vec<Vec<Scalar>>) -> Result<usize> {
        self.add(Ingest::Rows(rows))
    }

    /// Adds parallel sequences.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::ShapeMismatch`](crate::IngestError::ShapeMismatch)
    /// if the resolved lengths differ.
    pub fn add_series(&mut self, series: SeriesInput) -> Result<usize> {
        self.add(Ingest::Series(series))
    }

    /// Adds a single sample.
    ///
    /// # Errors
    ///
    /// Never fails for this shape; the `Result` mirrors [`add`](Self::add).
    pub fn add_single(&mut self, single: SingleInput) -> Result<usize> {
        self.add(Ingest::Single(single))
    }

    /// Removes and returns up to `n_samples` of the oldest samples.
    pub fn pop(&mut self, n_samples: usize) -> Output {
        format(&self.ring.pop_front(n_samples), self.return_type)
    }

    /// Returns the newest samples selected by `window`, oldest first,
    /// without removing them.
    ///
    /// A plain `usize` selects that many samples; [`Window::All`] selects
    /// the whole buffer.
    pub fn show(&self, window: impl Into<Window>) -> Output {
        format(&self.ring.peek_back(window.into()), self.return_type)
    }

    /// Drops every stored sample. Capacity, layout and the eviction count
    /// are kept.
    pub fn clear(&mut self) {
        self.ring.clear();
    }
}

impl Default for TimeSeriesBuffer {
    /// A buffer built from [`BufferConfig::default`].
    fn default() -> Self {
        Self::from_parts(DEFAULT_CAPACITY, BufferConfig::default().return_type)
    }
}

impl fmt::Display for TimeSeriesBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<TimeSeriesBuffer> ({}/{})", self.len(), self.capacity())
    }
}
