//! Error module - Typed failures for every pipeline stage
//!
//! Each stage fails closed: the pipeline stops at the first error and hands it
//! to the caller unchanged.

use std::path::PathBuf;

use thiserror::Error;

/// A configuration value outside the declared schema.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("invalid value '{value}' for option '{option}' (allowed: {})", .allowed.join(", "))]
    InvalidConfiguration {
        option: String,
        value: String,
        allowed: Vec<String>,
    },

    #[error("unknown option '{name}'")]
    UnknownOption { name: String },

    #[error("option '{option}' expects a {expected} value, got '{value}'")]
    InvalidValue {
        option: String,
        value: String,
        expected: &'static str,
    },

    #[error("malformed option assignment '{raw}' (expected key=value)")]
    MalformedAssignment { raw: String },
}

/// Failure while producing the backend descriptors.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no cross-compilation descriptor for architecture '{0}'")]
    UnsupportedArchitecture(String),
}

/// Failure while driving the external build backend.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("required tool '{tool}' (version {version}) was not found on PATH")]
    ToolMissing { tool: String, version: String },

    #[error("failed to launch '{tool}': {source}")]
    Launch {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("backend {step} step failed ({})", exit_description(.code))]
    StepFailed { step: &'static str, code: Option<i32> },
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}

/// Failure while staging artifacts into the package root.
#[derive(Debug, Error)]
pub enum PackageError {
    #[error("required artifact '{artifact}' is missing: {}", .path.display())]
    MissingArtifact { artifact: String, path: PathBuf },

    #[error("{action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to scan {}: {source}", .root.display())]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Any stage failure, as seen by the pipeline caller.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Package(#[from] PackageError),
}
