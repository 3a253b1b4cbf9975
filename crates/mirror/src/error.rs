//! Error types shared across the mirror engine.

use std::error::Error;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Result type for mirror operations.
pub type MirrorResult<T> = Result<T, MirrorError>;

/// Error produced when configuring a session or applying a mutation fails.
#[derive(Debug)]
pub struct MirrorError {
    kind: MirrorErrorKind,
}

impl MirrorError {
    const fn new(kind: MirrorErrorKind) -> Self {
        Self { kind }
    }

    /// Constructs an error for a selection pattern that is an absolute path.
    #[must_use]
    pub fn absolute_pattern(pattern: impl Into<String>) -> Self {
        Self::new(MirrorErrorKind::AbsolutePattern {
            pattern: pattern.into(),
        })
    }

    /// Constructs an error for a missing destination root.
    #[must_use]
    pub const fn missing_destination() -> Self {
        Self::new(MirrorErrorKind::MissingDestination)
    }

    /// Constructs an error for a relative path that would escape the
    /// destination root.
    #[must_use]
    pub fn path_escape(path: &Path) -> Self {
        Self::new(MirrorErrorKind::PathEscape {
            path: path.to_path_buf(),
        })
    }

    /// Constructs an I/O error with action context.
    #[must_use]
    pub fn io(action: &'static str, path: PathBuf, source: io::Error) -> Self {
        Self::new(MirrorErrorKind::Io {
            action,
            path,
            source,
        })
    }

    /// Constructs an error forwarded from the change event source.
    #[must_use]
    pub fn source_failure(message: impl Into<String>) -> Self {
        Self::new(MirrorErrorKind::Source {
            message: message.into(),
        })
    }

    /// Returns the specific failure.
    #[must_use]
    pub const fn kind(&self) -> &MirrorErrorKind {
        &self.kind
    }

    /// Reports whether this error was raised at session construction.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self.kind,
            MirrorErrorKind::AbsolutePattern { .. } | MirrorErrorKind::MissingDestination
        )
    }
}

impl fmt::Display for MirrorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            MirrorErrorKind::AbsolutePattern { pattern } => {
                write!(
                    f,
                    "selection pattern '{pattern}' must not be absolute; \
                     use the source working directory option instead"
                )
            }
            MirrorErrorKind::MissingDestination => {
                write!(f, "a destination root must be specified")
            }
            MirrorErrorKind::PathEscape { path } => {
                write!(
                    f,
                    "relative path '{}' would escape the destination root",
                    path.display()
                )
            }
            MirrorErrorKind::Io {
                action,
                path,
                source,
            } => {
                write!(f, "failed to {} '{}': {}", action, path.display(), source)
            }
            MirrorErrorKind::Source { message } => {
                write!(f, "change event source reported an error: {message}")
            }
        }
    }
}

impl Error for MirrorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            MirrorErrorKind::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Classification of mirror failures.
#[derive(Debug)]
pub enum MirrorErrorKind {
    /// The selection pattern handed to the session was absolute.
    AbsolutePattern {
        /// The offending pattern.
        pattern: String,
    },
    /// No destination root was supplied.
    MissingDestination,
    /// A relative path was absolute or contained parent-directory segments.
    PathEscape {
        /// The offending relative path.
        path: PathBuf,
    },
    /// A filesystem mutation or stat failed.
    Io {
        /// Short description of the attempted action.
        action: &'static str,
        /// Path the action was applied to.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },
    /// The change event source surfaced a failure of its own.
    Source {
        /// Human-readable description forwarded from the source.
        message: String,
    },
}
