use std::io;

use thiserror::Error;

/// Failures reported by the mock file system.
///
/// Argument errors carry the name of the offending parameter, exactly as a
/// conventional file API reports it (`sourceFileName`, `destFileName`,
/// `path`, `contents`, `encoding`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FsError {
    #[error("{} (Parameter '{param}')", null_message(.param))]
    NullArgument { param: &'static str },

    #[error("Empty file name is not legal. (Parameter '{param}')")]
    EmptyPath { param: &'static str },

    #[error("The path is not of a legal form.")]
    MalformedPath { param: &'static str },

    #[error("Illegal characters in path.")]
    IllegalCharacters { param: &'static str },

    #[error("The file \"{path}\" could not be found.")]
    SourceNotFound { path: String },

    #[error("A file can not be created if it already exists.")]
    DestinationExists,

    #[error("Could not find a part of the path '{path}'.")]
    DestinationDirectoryNotFound { path: String },

    #[error("Could not find file '{path}'.")]
    NotFound { path: String },

    #[error("Access to the path '{path}' is denied.")]
    AccessDenied { path: String },

    /// A stream operation failed inside a composed façade call.
    #[error("{message}")]
    Io { kind: io::ErrorKind, message: String },
}

const PATH_PARAMS: [&str; 3] = ["sourceFileName", "destFileName", "path"];

fn null_message(param: &str) -> &'static str {
    if PATH_PARAMS.contains(&param) {
        "File name cannot be null."
    } else {
        "Value cannot be null."
    }
}

impl FsError {
    /// Name of the argument that was rejected, if this is an argument error.
    pub fn param(&self) -> Option<&'static str> {
        match self {
            FsError::NullArgument { param }
            | FsError::EmptyPath { param }
            | FsError::MalformedPath { param }
            | FsError::IllegalCharacters { param } => Some(param),
            _ => None,
        }
    }

    /// True for the errors raised by argument checks, before any store access.
    pub fn is_argument_error(&self) -> bool {
        self.param().is_some()
    }
}

impl From<FsError> for io::Error {
    fn from(err: FsError) -> Self {
        let kind = match &err {
            FsError::NullArgument { .. }
            | FsError::EmptyPath { .. }
            | FsError::MalformedPath { .. }
            | FsError::IllegalCharacters { .. } => io::ErrorKind::InvalidInput,
            FsError::SourceNotFound { .. }
            | FsError::NotFound { .. }
            | FsError::DestinationDirectoryNotFound { .. } => io::ErrorKind::NotFound,
            FsError::DestinationExists => io::ErrorKind::AlreadyExists,
            FsError::AccessDenied { .. } => io::ErrorKind::PermissionDenied,
            FsError::Io { kind, .. } => *kind,
        };
        io::Error::new(kind, err)
    }
}

impl From<io::Error> for FsError {
    fn from(err: io::Error) -> Self {
        FsError::Io {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}
