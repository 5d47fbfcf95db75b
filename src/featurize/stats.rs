//! Statistical reduction of property lists.
//!
//! Every featurizer that summarizes a variable-length list of values
//! (cation properties, electronegativity differences, oxidation states)
//! reduces it to the same five statistics through [`Summary`].

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown statistic '{0}' (expected minimum, maximum, range, mean or std_dev)")]
pub struct ParseStatError(String);

/// One of the five summary statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stat {
    Minimum,
    Maximum,
    Range,
    Mean,
    StdDev,
}

impl Stat {
    /// All statistics in label order.
    pub const ALL: [Stat; 5] = [
        Stat::Minimum,
        Stat::Maximum,
        Stat::Range,
        Stat::Mean,
        Stat::StdDev,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Stat::Minimum => "minimum",
            Stat::Maximum => "maximum",
            Stat::Range => "range",
            Stat::Mean => "mean",
            Stat::StdDev => "std_dev",
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Stat {
    type Err = ParseStatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "minimum" | "min" => Ok(Stat::Minimum),
            "maximum" | "max" => Ok(Stat::Maximum),
            "range" => Ok(Stat::Range),
            "mean" | "avg" => Ok(Stat::Mean),
            "std_dev" | "std" => Ok(Stat::StdDev),
            _ => Err(ParseStatError(s.to_string())),
        }
    }
}

/// Minimum, maximum, range, mean and population standard deviation of a
/// list of values.
///
/// An empty list reduces to all zeros; callers that need to distinguish
/// "no values" from "all zero" must check the input length themselves.
///
/// # Examples
///
/// ```
/// use ionfeat::{Stat, Summary};
///
/// let summary = Summary::of(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
/// assert_eq!(summary.minimum, 2.0);
/// assert_eq!(summary.range, 7.0);
/// assert_eq!(summary.mean, 5.0);
/// assert_eq!(summary.get(Stat::StdDev), 2.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Summary {
    pub minimum: f64,
    pub maximum: f64,
    pub range: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl Summary {
    pub fn of(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        // Sorting first keeps the floating-point sums independent of input order.
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let n = sorted.len() as f64;
        let minimum = sorted[0];
        let maximum = sorted[sorted.len() - 1];
        let mean = sorted.iter().sum::<f64>() / n;
        let variance = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        Self {
            minimum,
            maximum,
            range: maximum - minimum,
            mean,
            std_dev: variance.sqrt(),
        }
    }

    pub fn get(&self, stat: Stat) -> f64 {
        match stat {
            Stat::Minimum => self.minimum,
            Stat::Maximum => self.maximum,
            Stat::Range => self.range,
            Stat::Mean => self.mean,
            Stat::StdDev => self.std_dev,
        }
    }

    /// The selected statistics, in the order given.
    pub fn select(&self, stats: &[Stat]) -> Vec<f64> {
        stats.iter().map(|&stat| self.get(stat)).collect()
    }
}
