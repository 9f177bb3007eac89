//! Output layouts for samples read from the buffer.
//!
//! The buffer stores canonical [`Sample`]s; this module converts a run of
//! them into the layout selected by [`ReturnType`]. Formatting never fails:
//! an empty run produces correctly shaped empty containers (`(0, 4)`,
//! `(0, 2)` or length-0 columns).

use std::fmt;
use std::str::FromStr;

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::ConfigError;
use crate::sample::{Sample, UFloat};

/// Layout produced by `pop` and `show`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnType {
    /// `Vec` of samples, verbatim.
    List,
    /// One `(n, 4)` table with columns `time, time_unc, value, value_unc`.
    #[default]
    Array,
    /// Four length-`n` columns.
    Arrays,
    /// One `(n, 2)` table of `time +/- time_unc` and `value +/- value_unc`.
    UArray,
    /// Two length-`n` columns of uncertain time and value.
    UArrays,
}

impl ReturnType {
    /// All return types, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::List,
        Self::Array,
        Self::Arrays,
        Self::UArray,
        Self::UArrays,
    ];

    /// Returns the lowercase name of this return type.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Array => "array",
            Self::Arrays => "arrays",
            Self::UArray => "uarray",
            Self::UArrays => "uarrays",
        }
    }
}

impl fmt::Display for ReturnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReturnType {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|rt| rt.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownReturnType {
                name: s.to_string(),
            })
    }
}

/// Samples converted to one of the [`ReturnType`] layouts.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// See [`ReturnType::List`].
    List(Vec<Sample>),
    /// See [`ReturnType::Array`].
    Array(Array2<f64>),
    /// See [`ReturnType::Arrays`].
    Arrays {
        /// Timestamps.
        time: Array1<f64>,
        /// Timestamp uncertainties.
        time_unc: Array1<f64>,
        /// Values.
        value: Array1<f64>,
        /// Value uncertainties.
        value_unc: Array1<f64>,
    },
    /// See [`ReturnType::UArray`].
    UArray(Array2<UFloat>),
    /// See [`ReturnType::UArrays`].
    UArrays {
        /// Uncertain timestamps.
        time: Array1<UFloat>,
        /// Uncertain values.
        value: Array1<UFloat>,
    },
}

/// Converts `samples` into the layout selected by `return_type`.
///
/// # Examples
///
/// ```rust
/// use tsbuf::format::{format, Output, ReturnType};
/// use tsbuf::Sample;
///
/// let samples = [Sample::new(1.0, 0.0, 10.0, 0.5)];
/// let Output::Array(table) = format(&samples, ReturnType::Array) else {
///     unreachable!()
/// };
/// assert_eq!(table.shape(), &[1, 4]);
/// assert_eq!(table[[0, 2]], 10.0);
/// ```
pub fn format(samples: &[Sample], return_type: ReturnType) -> Output {
    let n = samples.len();
    match return_type {
        ReturnType::List => Output::List(samples.to_vec()),
        ReturnType::Array => {
            Output::Array(Array2::from_shape_fn((n, 4), |(i, j)| samples[i].to_array()[j]))
        }
        ReturnType::Arrays => Output::Arrays {
            time: samples.iter().map(|s| s.time).collect(),
            time_unc: samples.iter().map(|s| s.time_unc).collect(),
            value: samples.iter().map(|s| s.value).collect(),
            value_unc: samples.iter().map(|s| s.value_unc).collect(),
        },
        ReturnType::UArray => Output::UArray(Array2::from_shape_fn((n, 2), |(i, j)| {
            if j == 0 {
                samples[i].time_ufloat()
            } else {
                samples[i].value_ufloat()
            }
        })),
        ReturnType::UArrays => Output::UArrays {
            time: samples.iter().map(Sample::time_ufloat).collect(),
            value: samples.iter().map(Sample::value_ufloat).collect(),
        },
    }
}

impl Output {
    /// Returns the layout of this output.
    pub const fn return_type(&self) -> ReturnType {
        match self {
            Self::List(_) => ReturnType::List,
            Self::Array(_) => ReturnType::Array,
            Self::Arrays { .. } => ReturnType::Arrays,
            Self::UArray(_) => ReturnType::UArray,
            Self::UArrays { .. } => ReturnType::UArrays,
        }
    }

    /// Returns the number of samples held.
    pub fn len(&self) -> usize {
        match self {
            Self::List(samples) => samples.len(),
            Self::Array(table) => table.nrows(),
            Self::Arrays { time, .. } => time.len(),
            Self::UArray(table) => table.nrows(),
            Self::UArrays { time, .. } => time.len(),
        }
    }

    /// Returns `true` if no samples are held.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Converts the output back into canonical samples, oldest first.
    pub fn into_samples(self) -> Vec<Sample> {
        match self {
            Self::List(samples) => samples,
            Self::Array(table) => table
                .rows()
                .into_iter()
                .map(|row| Sample::new(row[0], row[1], row[2], row[3]))
                .collect(),
            Self::Arrays {
                time,
                time_unc,
                value,
                value_unc,
            } => time
                .iter()
                .zip(&time_unc)
                .zip(value.iter().zip(&value_unc))
                .map(|((&t, &ut), (&v, &uv))| Sample::new(t, ut, v, uv))
                .collect(),
            Self::UArray(table) => table
                .rows()
                .into_iter()
                .map(|row| Sample::from_ufloats(row[0], row[1]))
                .collect(),
            Self::UArrays { time, value } => time
                .iter()
                .zip(&value)
                .map(|(&t, &v)| Sample::from_ufloats(t, v))
                .collect(),
        }
    }

    /// Renders the output as JSON, keeping its shape.
    ///
    /// A `list` output uses the serde representation of [`Sample`]. Non-finite
    /// numbers (such as an empty value marker) become `null`.
    ///
    /// # Errors
    ///
    /// Returns the serializer's error if a sample cannot be converted.
    pub fn to_json(&self) -> serde_json::Result<Value> {
        let ufloat = |u: &UFloat| json!({ "nominal": u.nominal, "std_dev": u.std_dev });

        let json = match self {
            Self::List(samples) => serde_json::to_value(samples)?,
            Self::Array(table) => table
                .rows()
                .into_iter()
                .map(|row| row.iter().copied().collect::<Value>())
                .collect(),
            Self::Arrays {
                time,
                time_unc,
                value,
                value_unc,
            } => json!({
                "time": time.to_vec(),
                "time_unc": time_unc.to_vec(),
                "value": value.to_vec(),
                "value_unc": value_unc.to_vec(),
            }),
            Self::UArray(table) => table
                .rows()
                .into_iter()
                .map(|row| row.iter().map(ufloat).collect::<Value>())
                .collect(),
            Self::UArrays { time, value } => json!({
                "time": time.iter().map(ufloat).collect::<Value>(),
                "value": value.iter().map(ufloat).collect::<Value>(),
            }),
        };
        Ok(json)
    }
}
