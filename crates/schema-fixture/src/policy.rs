//! Default producer ranges and fixture configuration.
//!
//! Built-in producers fall back to a [`DefaultPolicy`] whenever a schema
//! leaves a bound unspecified. The policy and the seed are usually supplied
//! in code, but [`FixtureConfig`] can also be loaded from JSON so the same
//! fixture set can be regenerated with different ranges.

use std::fs;
use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

use crate::error::ConfigError;

/// Default recursion limit for a generation run.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// How plain strings are built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StringStyle {
    /// Space separated lorem words.
    #[default]
    Lorem,
    /// ASCII letters and digits.
    Alphanumeric,
}

/// Ranges used by built-in producers when a schema is silent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DefaultPolicy {
    /// Shortest generated string.
    pub string_min_len: usize,
    /// Longest generated string.
    pub string_max_len: usize,
    /// Plain string construction.
    pub string_style: StringStyle,
    /// Lower numeric bound.
    pub number_min: i64,
    /// Upper numeric bound.
    pub number_max: i64,
    /// Earliest generated timestamp.
    pub date_min: DateTime<Utc>,
    /// Latest generated timestamp.
    pub date_max: DateTime<Utc>,
    /// Fewest array elements.
    pub array_min_len: usize,
    /// Most array elements.
    pub array_max_len: usize,
    /// Probability that an optional value is present.
    pub optional_presence: f64,
}

impl Default for DefaultPolicy {
    fn default() -> Self {
        Self {
            string_min_len: 4,
            string_max_len: 24,
            string_style: StringStyle::Lorem,
            number_min: 0,
            number_max: 1000,
            // 2000-01-01T00:00:00Z and 2030-12-31T23:59:59Z
            date_min: epoch_seconds(946_684_800),
            date_max: epoch_seconds(1_924_991_999),
            array_min_len: 1,
            array_max_len: 3,
            optional_presence: 0.8,
        }
    }
}

impl DefaultPolicy {
    /// Checks that every range is non-empty and the probability is valid.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRange`] for an inverted range and
    /// [`ConfigError::InvalidProbability`] for a probability outside
    /// `[0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("string length", self.string_min_len, self.string_max_len)?;
        check_range("number", self.number_min, self.number_max)?;
        check_range("date", self.date_min, self.date_max)?;
        check_range("array length", self.array_min_len, self.array_max_len)?;
        if !(0.0..=1.0).contains(&self.optional_presence) {
            return Err(ConfigError::InvalidProbability {
                setting: "optionalPresence",
                value: self.optional_presence.to_string(),
            });
        }
        Ok(())
    }
}

/// Seed, policy, and depth limit for a [`crate::Fixture`].
///
/// Generators are closures and are attached in code with
/// [`crate::Fixture::extend`].
///
/// # Example
///
/// ```
/// use schema_fixture::FixtureConfig;
///
/// let config = FixtureConfig::from_json(r#"{
///     "seed": 38,
///     "policy": {"arrayMinLen": 2, "arrayMaxLen": 2}
/// }"#).expect("valid config");
///
/// assert_eq!(config.seed, 38);
/// assert_eq!(config.policy.array_max_len, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureConfig {
    /// RNG seed for every generation run.
    pub seed: u64,
    /// Default producer ranges.
    #[serde(default)]
    pub policy: DefaultPolicy,
    /// Deepest path allowed before generation aborts.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl FixtureConfig {
    /// Creates a configuration with default policy and depth limit.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            policy: DefaultPolicy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Parses and validates a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseError`] for malformed JSON and the
    /// policy validation errors otherwise.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        config.policy.validate()?;
        Ok(config)
    }

    /// Loads a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::IoError`] if the file cannot be read, or any
    /// error from [`FixtureConfig::from_json`].
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Self::from_json(&contents)
    }
}

const fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn epoch_seconds(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(seconds, 0)
        .single()
        .unwrap_or_default()
}

fn check_range<T>(setting: &'static str, min: T, max: T) -> Result<(), ConfigError>
where
    T: PartialOrd + ToString,
{
    if min > max {
        return Err(ConfigError::InvalidRange {
            setting,
            min: min.to_string(),
            max: max.to_string(),
        });
    }
    Ok(())
}
