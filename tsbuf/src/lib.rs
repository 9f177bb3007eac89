//! # tsbuf
//!
//! Bounded FIFO buffer for streaming time-series samples with uncertainty.
//!
//! tsbuf stores samples of the form `(time, time_unc, value, value_unc)` in a
//! fixed-capacity ring. Producers add samples in batches of whatever shape
//! they have at hand (rows, parallel sequences, values that already carry a
//! standard deviation); consumers read them back in insertion order, in one
//! of several array layouts.
//!
//! ## Key Properties
//!
//! - Fixed capacity chosen at construction; the oldest sample is evicted first
//! - Every stored sample is a complete 4-tuple; omitted fields get documented markers
//! - Ingestion is all-or-nothing: a rejected call never leaves partial data
//! - Output layout (`list`, `array`, `arrays`, `uarray`, `uarrays`) fixed per buffer
//! - Single-owner, synchronous, in-memory; no background work, no I/O
//!
//! ## Quick Start
//!
//! ```rust
//! use tsbuf::{Output, ReturnType, SeriesInput, TimeSeriesBuffer, UFloat, Window};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut buffer = TimeSeriesBuffer::new(100, ReturnType::Array)?;
//!
//! // Rows of (time, value, value_unc)
//! buffer.add_triples([[0.0, 20.1, 0.2], [1.0, 20.3, 0.2]])?;
//!
//! // Parallel sequences, uncertainty broadcast across the batch
//! buffer.add_series(
//!     SeriesInput::new(vec![2.0, 3.0], vec![20.2, 20.4]).with_value_unc(0.1),
//! )?;
//!
//! // Pairs of values that carry their own standard deviation
//! buffer.add_pairs([(UFloat::new(4.0, 0.01), UFloat::new(20.6, 0.3))])?;
//!
//! // Oldest two samples, removed, as an (n, 4) table
//! if let Output::Array(table) = buffer.pop(2) {
//!     assert_eq!(table.shape(), &[2, 4]);
//! }
//!
//! // Everything left, not removed
//! assert_eq!(buffer.show(Window::All).len(), 3);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`TimeSeriesBuffer`] — Top-level handle; owns the ring and the output layout
//! - [`Ingest`] — Closed set of accepted input shapes, normalized before storing
//! - [`Output`] — Samples converted to the configured [`ReturnType`]
//! - [`BufferConfig`] — Capacity and layout, buildable from JSON
//!
//! ## Modules
//!
//! For lower-level access, the individual modules are also public:
//!
//! - [`buffer`] — Buffer lifecycle, add, pop, show
//! - [`ingest`] — Input shapes and their normalization
//! - [`ring`] — Fixed-capacity sample ring
//! - [`format`] — Output layouts
//! - [`sample`] — Sample and uncertain-value types
//! - [`config`] — Buffer configuration
//! - [`error`] — Error types

pub mod buffer;
pub mod config;
pub mod error;
pub mod format;
pub mod ingest;
pub mod ring;
pub mod sample;

// Re-export primary API types at crate root for convenience.
pub use buffer::TimeSeriesBuffer;
pub use config::BufferConfig;
pub use error::{ConfigError, IngestError, ReadError, Result, TsBufError};
pub use format::{Output, ReturnType};
pub use ingest::{Column, Ingest, SeriesInput, SingleInput, Spread};
pub use ring::Window;
pub use sample::{EMPTY_UNC, EMPTY_VALUE, Sample, Scalar, UFloat};
