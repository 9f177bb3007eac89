//! Error types for the tsbuf time-series buffer.

use thiserror::Error;

/// The main error type for all tsbuf operations.
///
/// Every error is raised before the buffer is touched, so a failed call
/// always leaves the buffer exactly as it was.
#[derive(Error, Debug)]
pub enum TsBufError {
    /// Error constructing or configuring a buffer.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Error normalizing input for an `add` call.
    #[error("ingest error: {0}")]
    Ingest(#[from] IngestError),

    /// Error selecting samples for a read.
    #[error("read error: {0}")]
    Read(#[from] ReadError),
}

/// Errors that can occur when building a buffer from configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Capacity must be a positive number of samples.
    #[error("invalid capacity {capacity} (must be > 0)")]
    InvalidCapacity {
        /// The rejected capacity.
        capacity: usize,
    },

    /// The return type name is not one of the known layouts.
    #[error("unknown return type '{name}' (expected one of list, array, arrays, uarray, uarrays)")]
    UnknownReturnType {
        /// The name that was supplied.
        name: String,
    },

    /// The configuration file could not be read.
    #[error("failed to read config '{}': {source}", path.display())]
    Read {
        /// The config file path.
        path: std::path::PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration could not be parsed.
    #[error("failed to parse config: {source}")]
    Parse {
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

/// Errors that can occur while normalizing input samples.
#[derive(Error, Debug)]
pub enum IngestError {
    /// Parallel sequences resolved to different lengths.
    #[error(
        "lengths of time ({time}), time_unc ({time_unc}), value ({value}) and value_unc ({value_unc}) don't match"
    )]
    ShapeMismatch {
        /// Resolved length of the time sequence.
        time: usize,
        /// Resolved length of the time uncertainty sequence.
        time_unc: usize,
        /// Resolved length of the value sequence.
        value: usize,
        /// Resolved length of the value uncertainty sequence.
        value_unc: usize,
    },

    /// The input does not match any accepted shape.
    #[error("unsupported input shape: {reason}")]
    UnsupportedShape {
        /// Why the shape was rejected.
        reason: String,
    },

    /// A text scalar could not be parsed.
    #[error("cannot parse '{input}' as a number or 'nominal+/-std_dev'")]
    ParseScalar {
        /// The offending text.
        input: String,
    },
}

/// Errors that can occur when selecting samples to read.
#[derive(Error, Debug)]
pub enum ReadError {
    /// A signed sample count that is neither `-1` nor non-negative.
    #[error("invalid sample count {n} (use -1 for all samples)")]
    InvalidWindow {
        /// The rejected count.
        n: i64,
    },
}

/// Type alias for `Result<T, TsBufError>`.
pub type Result<T> = std::result::Result<T, TsBufError>;
