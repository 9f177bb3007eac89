//! Buffer configuration.
//!
//! A [`BufferConfig`] fixes the two construction-time parameters of a
//! buffer: its capacity and its output layout. It can be built in code or
//! read from JSON; missing fields take the defaults below.
//!
//! ```json
//! { "capacity": 500, "return_type": "uarrays" }
//! ```

use std::num::NonZeroUsize;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::format::ReturnType;

/// Default number of samples a buffer holds.
pub const DEFAULT_CAPACITY: NonZeroUsize = NonZeroUsize::new(10).unwrap();

/// Construction parameters for a [`TimeSeriesBuffer`](crate::TimeSeriesBuffer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferConfig {
    /// Maximum number of samples held before the oldest are evicted.
    pub capacity: usize,

    /// Layout returned by `pop` and `show`.
    pub return_type: ReturnType,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY.get(),
            return_type: ReturnType::default(),
        }
    }
}

impl BufferConfig {
    /// Creates a configuration, validating it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidCapacity`] if `capacity` is zero.
    pub fn new(capacity: usize, return_type: ReturnType) -> Result<Self> {
        let config = Self {
            capacity,
            return_type,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration and returns the capacity as non-zero.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidCapacity`] if `capacity` is zero.
    pub fn validate(&self) -> Result<NonZeroUsize> {
        NonZeroUsize::new(self.capacity).ok_or_else(|| {
            ConfigError::InvalidCapacity {
                capacity: self.capacity,
            }
            .into()
        })
    }

    /// Parses and validates a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or an unknown
    /// `return_type`, and [`ConfigError::InvalidCapacity`] for a zero capacity.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse { source: e })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read, otherwise
    /// the errors of [`BufferConfig::from_json_str`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json_str(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TsBufError;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = BufferConfig::default();
        assert_eq!(config.capacity, 10);
        assert_eq!(config.return_type, ReturnType::Array);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = BufferConfig::new(0, ReturnType::List).unwrap_err();
        assert!(matches!(
            err,
            TsBufError::Config(ConfigError::InvalidCapacity { capacity: 0 })
        ));
    }

    #[test]
    fn test_from_json_partial() {
        let config = BufferConfig::from_json_str(r#"{ "return_type": "uarrays" }"#).unwrap();
        assert_eq!(config.capacity, DEFAULT_CAPACITY.get());
        assert_eq!(config.return_type, ReturnType::UArrays);
    }

    #[test]
    fn test_from_json_rejects_unknown_return_type() {
        let err = BufferConfig::from_json_str(r#"{ "return_type": "matrix" }"#).unwrap_err();
        assert!(matches!(err, TsBufError::Config(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_from_json_rejects_zero_capacity() {
        assert!(BufferConfig::from_json_str(r#"{ "capacity": 0 }"#).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("buffer.json");
        std::fs::write(&path, r#"{ "capacity": 50, "return_type": "list" }"#).unwrap();

        let config = BufferConfig::load(&path).unwrap();
        assert_eq!(config, BufferConfig::new(50, ReturnType::List).unwrap());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let err = BufferConfig::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, TsBufError::Config(ConfigError::Read { .. })));
    }
}
