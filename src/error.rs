mod error_kind;

use std::fmt::{Display, Formatter};

pub use self::error_kind::ErrorKind;

/// Worker specific error type.
#[derive(Debug)]
pub struct Error {
    root_cause: anyhow::Error,
    kind: ErrorKind,
}

impl Error {
    /// Wraps the root cause of a task error that aborts the task run before any fetch is issued.
    pub fn malformed_task_with_root_cause(root_cause: anyhow::Error) -> Self {
        Self {
            root_cause,
            kind: ErrorKind::MalformedTask,
        }
    }

    /// Returns the kind of the error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.root_cause)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.root_cause.source()
    }
}
