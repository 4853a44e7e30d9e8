use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while probing the node or preparing output.
///
/// Probe and parse errors never leave the extractors; they are turned into
/// fallback values there. Only configuration, target and I/O errors reach
/// the command handlers.
#[derive(Error, Debug)]
pub enum ConfGenError {
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' exited with {status}")]
    CommandFailed { program: String, status: String },

    #[error("'{program}' did not finish within {after:?}")]
    Timeout { program: String, after: Duration },

    #[error("I/O error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse {what}: {detail}")]
    Parse { what: &'static str, detail: String },

    #[error("unknown target '{0}' (expected one of: slurm, gres, all)")]
    UnknownTarget(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("NVML error: {0}")]
    Nvml(String),
}

impl ConfGenError {
    pub fn parse(what: &'static str, detail: impl Into<String>) -> Self {
        ConfGenError::Parse {
            what,
            detail: detail.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfGenError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<nvml_wrapper::error::NvmlError> for ConfGenError {
    fn from(err: nvml_wrapper::error::NvmlError) -> Self {
        ConfGenError::Nvml(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ConfGenError>;
