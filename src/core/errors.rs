//! Error types for glyph generation
//!
//! Failure classes:
//! - Invalid input: configuration that must be fixed before anything runs
//! - Degenerate trace: recovered locally with a blank glyph
//! - Interop / resource: abort the current variant only

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = GenerationError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The tracer found nothing to outline for a signal that should be visible
    #[error("Trace of signal {value} produced no contours")]
    TraceDegenerate { value: u64 },

    #[error("{stage} failed: {message}")]
    Interop {
        stage: &'static str,
        message: String,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Resource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Variant '{variant}' failed at U+{codepoint:04X}: {source}")]
    Glyph {
        variant: String,
        codepoint: u32,
        #[source]
        source: Box<GenerationError>,
    },
}

impl GenerationError {
    pub fn interop(stage: &'static str, message: impl Into<String>) -> Self {
        Self::Interop {
            stage,
            message: message.into(),
        }
    }

    pub fn resource(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Resource {
            path: path.into(),
            source,
        }
    }

    /// Attach the variant and codepoint that were being generated
    pub fn at_glyph(self, variant: &str, codepoint: char) -> Self {
        match self {
            // already located, keep the innermost position
            located @ Self::Glyph { .. } => located,
            other => Self::Glyph {
                variant: variant.to_string(),
                codepoint: codepoint as u32,
                source: Box::new(other),
            },
        }
    }
}

/// Whether an I/O failure is worth a second attempt (locks, interrupted syscalls)
fn is_transient(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::Interrupted
            | io::ErrorKind::WouldBlock
            | io::ErrorKind::TimedOut
            | io::ErrorKind::PermissionDenied
    )
}

/// Run a file operation, retrying once on a transient failure.
pub fn retry_io<T>(path: &std::path::Path, mut op: impl FnMut() -> io::Result<T>) -> Result<T> {
    match op() {
        Ok(value) => Ok(value),
        Err(err) if is_transient(&err) => {
            tracing::warn!("Retrying {} after transient error: {}", path.display(), err);
            op().map_err(|e| GenerationError::resource(path, e))
        }
        Err(err) => Err(GenerationError::resource(path, err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_retry_io_recovers_from_one_transient_failure() {
        let mut attempts = 0;
        let result = retry_io(Path::new("scratch.svg"), || {
            attempts += 1;
            if attempts == 1 {
                Err(io::Error::from(io::ErrorKind::Interrupted))
            } else {
                Ok(attempts)
            }
        });
        assert_eq!(result.unwrap(), 2);
    }

    #[test]
    fn test_retry_io_gives_up_on_permanent_failure() {
        let mut attempts = 0;
        let result: Result<()> = retry_io(Path::new("scratch.png"), || {
            attempts += 1;
            Err(io::Error::from(io::ErrorKind::NotFound))
        });
        assert_eq!(attempts, 1);
        assert!(matches!(result, Err(GenerationError::Resource { .. })));
    }

    #[test]
    fn test_glyph_location_is_not_nested() {
        let err = GenerationError::interop("rasterize", "boom")
            .at_glyph("Regular", 'A')
            .at_glyph("Regular", 'B');
        match err {
            GenerationError::Glyph { codepoint, .. } => assert_eq!(codepoint, 'A' as u32),
            other => panic!("unexpected error: {other}"),
        }
    }
}
