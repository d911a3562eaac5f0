use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the neighbour-search core.
///
/// Library code never panics on bad input: every constructor and entry point validates
/// its arguments and reports one of these variants instead.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid grid resolution, domain size, cutoff, radius, position or identity set.
    ///
    /// Raised before any entity is placed; the whole invocation fails and no result is emitted.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A position lies outside `[0, domain_size)` on at least one axis.
    ///
    /// Placement still succeeds (the grid clamps or wraps), so this is a diagnostic
    /// pointing at an upstream data issue rather than a fatal condition.
    #[error("position ({x}, {y}) is outside the domain [0, {domain_size})")]
    OutOfRange { x: f64, y: f64, domain_size: f64 },

    /// Malformed static input.
    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Propagated I/O errors from input readers.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Error::Configuration(message.into())
    }

    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Error::Parse {
            line,
            message: message.into(),
        }
    }
}
