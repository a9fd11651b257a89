//! Errors raised while rendering or writing a log line.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    /// The sink rejected the write.
    #[error("failed to write log line: {0}")]
    Io(#[from] std::io::Error),

    /// The sink accepted fewer bytes than requested.
    #[error("incomplete log write (expected={expected}, actual={actual})")]
    ShortWrite { expected: usize, actual: usize },

    /// A bound frame carries both a group name and attributes.
    #[error("invalid group and attribute settings")]
    InvalidFrame,

    /// The line buffer rejected formatted output.
    #[error("failed to format log line")]
    Format(#[from] std::fmt::Error),
}

pub type RenderResult<T> = Result<T, RenderError>;
