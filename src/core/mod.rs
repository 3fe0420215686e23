mod error;
mod platform;
pub mod utils;
mod validate;

pub use error::FsError;
pub use platform::Platform;
pub use validate::{PathRole, require, validate_path};

use crate::Entry;

/// Storage backend the mock file system sits on.
///
/// Every `path` argument is a normalized absolute path in the backend's
/// platform form; normalization and argument checks happen one level up.
pub trait FsBackend {
    fn platform(&self) -> Platform;

    /// Checks for an explicit entry (file or directory) at `path`.
    fn exists(&self, path: &str) -> bool;
    fn is_file(&self, path: &str) -> bool;
    /// Explicit directories and implicit ancestors of any entry both count.
    fn is_dir(&self, path: &str) -> bool;

    fn node(&self, path: &str) -> Result<&Entry>;
    fn node_mut(&mut self, path: &str) -> Result<&mut Entry>;

    fn put_file(&mut self, path: &str, content: &[u8]) -> Result<()>;
    fn remove_file(&mut self, path: &str) -> Result<()>;
    fn mkdir(&mut self, path: &str) -> Result<()>;
    fn rename(&mut self, from: &str, to: &str) -> Result<()>;

    /// Immediate children of a directory, implicit subdirectories included.
    fn ls(&self, path: &str) -> Result<Vec<String>>;
}

pub type Result<T> = std::result::Result<T, FsError>;
