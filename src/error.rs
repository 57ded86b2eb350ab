use std::{error::Error, fmt, io};

/// Failures while pulling records out of the raw digit streams.
#[derive(Debug)]
pub enum IngestError {
    /// An underlying read failed for reasons other than exhaustion.
    Io(io::Error),

    /// A stream ended before a full record could be read.
    Truncated {
        stream: &'static str,
        expected: usize,
    },

    /// The label byte does not name one of the ten digit classes.
    LabelOutOfRange { value: u8 },
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestError::Io(e) => write!(f, "io error: {e}"),
            IngestError::Truncated { stream, expected } => {
                write!(
                    f,
                    "{stream} stream ended mid-record: expected {expected} more bytes"
                )
            }
            IngestError::LabelOutOfRange { value } => {
                write!(f, "label byte {value} is outside 0..=9")
            }
        }
    }
}

impl Error for IngestError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            IngestError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for IngestError {
    fn from(e: io::Error) -> Self {
        IngestError::Io(e)
    }
}

/// Failures when a requested configuration cannot produce the fixed shapes.
#[derive(Debug)]
pub enum ConfigError {
    /// A matrix or vector does not have the expected dimension.
    ShapeMismatch {
        /// Human-readable context for the mismatch (e.g. "kernel rows").
        what: &'static str,
        /// Observed value.
        got: usize,
        /// Expected value.
        expected: usize,
    },

    /// A convolution pass was requested with zero kernels.
    NoKernels,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ShapeMismatch {
                what,
                got,
                expected,
            } => {
                write!(f, "shape mismatch for {what}: got {got}, expected {expected}")
            }
            ConfigError::NoKernels => write!(f, "kernel count must be at least 1"),
        }
    }
}

impl Error for ConfigError {}
