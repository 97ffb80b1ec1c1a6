//! Error taxonomy and diagnostic reporting (spec §7).
//!
//! Every fallible core operation returns `Result<T, Error>`. `Error` always
//! carries the [`ErrorKind`] (for programmatic matching and the exit-code
//! mapping in spec §6) and a [`SchemaPath`] breadcrumb (spec §7: "emitted
//! through a logging sink with a path breadcrumb").

use std::fmt;
use thiserror::Error as ThisError;
use yang_ir::SchemaPath;

/// Error taxonomy (spec §7), plus the `Success` case needed for the
/// exit-code mapping in spec §6 (never carried by [`Error`] itself).
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ErrorKind {
    Success,
    InvalidArg,
    OutOfMemory,
    NotFound,
    Denied,
    Exists,
    Syntax,
    Reference,
    Internal,
    System,
    Validation,
}

impl ErrorKind {
    /// Exit-code mapping from spec §6.
    pub const fn exit_code(self) -> i32 {
        match self {
            ErrorKind::Success => 0,
            ErrorKind::InvalidArg => 1,
            ErrorKind::OutOfMemory => 2,
            ErrorKind::NotFound => 3,
            ErrorKind::Denied => 4,
            ErrorKind::Exists => 5,
            ErrorKind::Syntax => 6,
            ErrorKind::Reference => 7,
            ErrorKind::Internal => 8,
            ErrorKind::System => 9,
            ErrorKind::Validation => 10,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// A compiler error: a kind, a human message, the schema-tree breadcrumb of
/// the offending node, and an optional underlying cause.
#[derive(ThisError, Debug)]
#[error("{kind}: {message} (at {path})")]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
    pub path: SchemaPath,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl Error {
    pub fn new(kind: ErrorKind, path: SchemaPath, message: impl Into<String>) -> Self {
        let message = message.into();
        tracing::warn!(kind = ?kind, %path, %message, "schema error");
        Error {
            kind,
            message,
            path,
            source: None,
        }
    }

    pub fn with_source(
        mut self,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn invalid_arg(path: SchemaPath, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArg, path, message)
    }

    pub fn not_found(path: SchemaPath, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, path, message)
    }

    pub fn denied(path: SchemaPath, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Denied, path, message)
    }

    pub fn exists(path: SchemaPath, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Exists, path, message)
    }

    pub fn syntax(path: SchemaPath, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Syntax, path, message)
    }

    pub fn reference(path: SchemaPath, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Reference, path, message)
    }

    pub fn internal(path: SchemaPath, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, path, message)
    }

    pub fn validation(path: SchemaPath, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, path, message)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
