//! Error types for the schema-fixture crate.
//!
//! Generation errors abort the whole run; no partial fixture is returned.
//! Configuration errors cover loading and validating [`crate::FixtureConfig`].

use std::path::PathBuf;

use thiserror::Error;

use crate::path::Path;

/// Errors that abort a generation run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// A custom schema has no structural default and no generator matched.
    #[error("no generator registered for custom schema '{schema}' at {path}")]
    UnsupportedSchema {
        /// Location of the node.
        path: Path,
        /// Name of the custom schema.
        schema: String,
    },

    /// A generator filter failed while deciding whether it applies.
    #[error("generator '{generator}' failed to match at {path}: {message}")]
    GeneratorMatch {
        /// Location of the node being matched.
        path: Path,
        /// Label of the generator whose filter failed.
        generator: String,
        /// Failure reported by the filter.
        message: String,
    },

    /// The traversal went deeper than the configured limit.
    #[error("schema nesting exceeds {max_depth} levels at {path}")]
    SchemaTooDeep {
        /// Location where the limit was hit.
        path: Path,
        /// Configured depth limit.
        max_depth: usize,
    },

    /// A custom producer rejected the node it was asked to fill.
    #[error("producer failed at {path}: {message}")]
    Producer {
        /// Location of the node.
        path: Path,
        /// Failure reported by the producer.
        message: String,
    },

    /// The declared bounds of a node admit no value.
    #[error("empty range at {path}: minimum {min} exceeds maximum {max}")]
    InvalidBounds {
        /// Location of the node.
        path: Path,
        /// Effective lower bound.
        min: String,
        /// Effective upper bound.
        max: String,
    },
}

/// Errors raised while loading or validating fixture configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file at '{path}': {message}")]
    IoError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The configuration JSON is malformed or missing required fields.
    #[error("invalid config JSON: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
    },

    /// A policy range has its minimum above its maximum.
    #[error("invalid {setting} range: minimum {min} exceeds maximum {max}")]
    InvalidRange {
        /// Name of the range.
        setting: &'static str,
        /// Configured minimum.
        min: String,
        /// Configured maximum.
        max: String,
    },

    /// A probability lies outside `[0, 1]`.
    #[error("{setting} must be between 0 and 1, found {value}")]
    InvalidProbability {
        /// Name of the setting.
        setting: &'static str,
        /// Configured value.
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::PathSegment;

    fn nested_path() -> Path {
        let mut path = Path::root();
        path.push(PathSegment::from("resolution"));
        path.push(PathSegment::from("height"));
        path
    }

    #[test]
    fn unsupported_schema_formats_correctly() {
        let err = GenerationError::UnsupportedSchema {
            path: nested_path(),
            schema: "px".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "no generator registered for custom schema 'px' at resolution.height"
        );
    }

    #[test]
    fn generator_match_formats_correctly() {
        let err = GenerationError::GeneratorMatch {
            path: nested_path(),
            generator: "pixels".to_owned(),
            message: "boom".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "generator 'pixels' failed to match at resolution.height: boom"
        );
    }

    #[test]
    fn schema_too_deep_formats_correctly() {
        let err = GenerationError::SchemaTooDeep {
            path: Path::root(),
            max_depth: 0,
        };
        assert_eq!(err.to_string(), "schema nesting exceeds 0 levels at <root>");
    }

    #[test]
    fn invalid_bounds_formats_correctly() {
        let err = GenerationError::InvalidBounds {
            path: nested_path(),
            min: "5".to_owned(),
            max: "2".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "empty range at resolution.height: minimum 5 exceeds maximum 2"
        );
    }

    #[test]
    fn config_io_error_formats_correctly() {
        let err = ConfigError::IoError {
            path: PathBuf::from("/tmp/fixture.json"),
            message: "file not found".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "failed to read config file at '/tmp/fixture.json': file not found"
        );
    }

    #[test]
    fn config_range_error_formats_correctly() {
        let err = ConfigError::InvalidRange {
            setting: "number",
            min: "9".to_owned(),
            max: "3".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "invalid number range: minimum 9 exceeds maximum 3"
        );
    }

    #[test]
    fn config_probability_error_formats_correctly() {
        let err = ConfigError::InvalidProbability {
            setting: "optionalPresence",
            value: "1.5".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "optionalPresence must be between 0 and 1, found 1.5"
        );
    }
}
