//! Argument checks that run before the store is touched.
//!
//! The checks fire in a fixed order: null, empty, blank, illegal characters.
//! Callers match on which one fires first, so the order is part of the contract.

use super::error::FsError;
use super::platform::Platform;
use super::{Result, utils};

/// Which argument of an operation a path was passed as.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PathRole {
    Source,
    Destination,
    Path,
}

impl PathRole {
    /// Parameter name reported in argument errors.
    pub fn param_name(&self) -> &'static str {
        match self {
            PathRole::Source => "sourceFileName",
            PathRole::Destination => "destFileName",
            PathRole::Path => "path",
        }
    }
}

/// Validates a raw path and hands it back unchanged on success.
pub fn validate_path(platform: Platform, path: Option<&str>, role: PathRole) -> Result<&str> {
    let param = role.param_name();
    let path = path.ok_or(FsError::NullArgument { param })?;

    if path.is_empty() {
        return Err(FsError::EmptyPath { param });
    }
    if path.trim().is_empty() {
        return Err(FsError::MalformedPath { param });
    }

    let illegal_in_path = path.chars().any(|c| platform.is_invalid_path_char(c));
    let illegal_in_name = utils::file_name(platform, path)
        .chars()
        .any(|c| platform.is_invalid_file_name_char(c));
    if illegal_in_path || illegal_in_name {
        return Err(FsError::IllegalCharacters { param });
    }

    Ok(path)
}

/// Rejects an absent non-path argument (`contents`, `encoding`, ...).
pub fn require<T>(value: Option<T>, param: &'static str) -> Result<T> {
    value.ok_or(FsError::NullArgument { param })
}
