//! Value types stored in and accepted by the buffer.
//!
//! A [`Sample`] is the canonical stored unit: a complete
//! `(time, time_unc, value, value_unc)` tuple. Inputs may be plain numbers
//! or [`UFloat`]s, which bundle a nominal value with its standard deviation;
//! [`Scalar`] is the sum of the two.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::IngestError;

/// Marker for a value that was not supplied.
pub const EMPTY_VALUE: f64 = f64::NAN;

/// Marker for an uncertainty that was not supplied.
///
/// Indistinguishable from a measured zero uncertainty.
pub const EMPTY_UNC: f64 = 0.0;

/// A nominal value together with its standard deviation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct UFloat {
    /// The nominal (best estimate) value.
    pub nominal: f64,
    /// The standard uncertainty of the nominal value.
    pub std_dev: f64,
}

impl UFloat {
    /// Creates a new uncertain value.
    pub const fn new(nominal: f64, std_dev: f64) -> Self {
        Self { nominal, std_dev }
    }

    /// Returns the nominal value.
    pub const fn nominal(&self) -> f64 {
        self.nominal
    }

    /// Returns the standard deviation.
    pub const fn std_dev(&self) -> f64 {
        self.std_dev
    }
}

impl fmt::Display for UFloat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+/-{}", self.nominal, self.std_dev)
    }
}

impl FromStr for UFloat {
    type Err = IngestError;

    /// Parses `nominal+/-std_dev` (or `nominal±std_dev`).
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let err = || IngestError::ParseScalar {
            input: s.to_string(),
        };

        let (nominal, std_dev) = s
            .split_once("+/-")
            .or_else(|| s.split_once('±'))
            .ok_or_else(err)?;

        let nominal = nominal.trim().parse().map_err(|_| err())?;
        let std_dev = std_dev.trim().parse().map_err(|_| err())?;
        Ok(Self::new(nominal, std_dev))
    }
}

/// A single input element: a plain number or a number with uncertainty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    /// A number without attached uncertainty.
    Plain(f64),
    /// A number carrying its own standard deviation.
    Uncertain(UFloat),
}

impl Scalar {
    /// Splits the scalar into its value and, if carried, its uncertainty.
    pub const fn split(self) -> (f64, Option<f64>) {
        match self {
            Self::Plain(v) => (v, None),
            Self::Uncertain(u) => (u.nominal, Some(u.std_dev)),
        }
    }

    /// Returns the value and its uncertainty, using `fallback` when none is carried.
    pub fn split_or(self, fallback: f64) -> (f64, f64) {
        let (value, unc) = self.split();
        (value, unc.unwrap_or(fallback))
    }

    /// Returns `true` for [`Scalar::Uncertain`].
    pub const fn is_uncertain(&self) -> bool {
        matches!(self, Self::Uncertain(_))
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Self::Plain(value)
    }
}

impl From<UFloat> for Scalar {
    fn from(value: UFloat) -> Self {
        Self::Uncertain(value)
    }
}

impl FromStr for Scalar {
    type Err = IngestError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.contains("+/-") || s.contains('±') {
            return s.parse::<UFloat>().map(Self::Uncertain);
        }
        s.parse::<f64>()
            .map(Self::Plain)
            .map_err(|_| IngestError::ParseScalar {
                input: s.to_string(),
            })
    }
}

/// One stored record: `(time, time_unc, value, value_unc)`.
///
/// Samples are always complete; fields that were not supplied hold
/// [`EMPTY_VALUE`] or [`EMPTY_UNC`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Timestamp.
    pub time: f64,
    /// Uncertainty of the timestamp.
    pub time_unc: f64,
    /// Measured value.
    pub value: f64,
    /// Uncertainty of the value.
    pub value_unc: f64,
}

impl Sample {
    /// Creates a sample from its four fields.
    pub const fn new(time: f64, time_unc: f64, value: f64, value_unc: f64) -> Self {
        Self {
            time,
            time_unc,
            value,
            value_unc,
        }
    }

    /// Creates a sample from a `[time, time_unc, value, value_unc]` row.
    pub const fn from_array(row: [f64; 4]) -> Self {
        Self::new(row[0], row[1], row[2], row[3])
    }

    /// Returns the sample as a `[time, time_unc, value, value_unc]` row.
    pub const fn to_array(&self) -> [f64; 4] {
        [self.time, self.time_unc, self.value, self.value_unc]
    }

    /// Creates a sample from an uncertain time and an uncertain value.
    pub const fn from_ufloats(time: UFloat, value: UFloat) -> Self {
        Self::new(time.nominal, time.std_dev, value.nominal, value.std_dev)
    }

    /// Returns `time +/- time_unc`.
    pub const fn time_ufloat(&self) -> UFloat {
        UFloat::new(self.time, self.time_unc)
    }

    /// Returns `value +/- value_unc`.
    pub const fn value_ufloat(&self) -> UFloat {
        UFloat::new(self.value, self.value_unc)
    }
}

impl From<[f64; 4]> for Sample {
    fn from(row: [f64; 4]) -> Self {
        Self::from_array(row)
    }
}

impl From<(f64, f64, f64, f64)> for Sample {
    fn from((time, time_unc, value, value_unc): (f64, f64, f64, f64)) -> Self {
        Self::new(time, time_unc, value, value_unc)
    }
}
