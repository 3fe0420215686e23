//! The file operation façade: argument checks, then store access, in a fixed order.

use std::cell::RefCell;
use std::io::{Read, Write};
use std::rc::Rc;

use tracing::debug;

use crate::core::{FsBackend, FsError, PathRole, Platform, Result, require, utils, validate_path};
use crate::vfs::encoding::Encoding;
use crate::vfs::stream::{FileStream, OpenMode, StreamOptions};
use crate::{Entry, FileAttributes, MapFS};

/// An in-memory file system with the call surface of a conventional file API.
///
/// Every operation checks its arguments before it looks at the store, so a
/// rejected call never leaves partial state behind. Path arguments take
/// `&str` or `None`; `None` stands for a missing argument and is reported as
/// `NullArgument` with the parameter name of the conventional API.
///
/// ### Example
///
/// ```
/// use mockfs_kit::{Entry, MockFileSystem, Platform};
///
/// let fs = MockFileSystem::from_entries(
///     Platform::Unix,
///     [("/docs/note.txt", Entry::file("Hello"))],
/// );
/// fs.move_file("/docs/note.txt", "/docs/moved.txt").unwrap();
/// assert_eq!(fs.read_all_text("/docs/moved.txt").unwrap(), "Hello");
/// ```
pub struct MockFileSystem {
    store: Rc<RefCell<MapFS>>,
    platform: Platform,
    cwd: String, // absolute normalized path
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFileSystem {
    /// Creates an empty file system following the host's conventions.
    pub fn new() -> Self {
        Self::with_platform(Platform::host())
    }

    /// Creates an empty file system following `platform`'s conventions.
    /// The current directory is the platform's root (`/` or `C:\`).
    pub fn with_platform(platform: Platform) -> Self {
        Self {
            store: Rc::new(RefCell::new(MapFS::new(platform))),
            platform,
            cwd: platform.default_cwd().to_string(),
        }
    }

    /// Creates a file system pre-populated with `entries`.
    ///
    /// Paths are normalized against the platform's root. Parent directories are
    /// not created: they exist implicitly as long as something lives below them.
    pub fn from_entries<I, P>(platform: Platform, entries: I) -> Self
    where
        I: IntoIterator<Item = (P, Entry)>,
        P: AsRef<str>,
    {
        let fs = Self::with_platform(platform);
        {
            let mut store = fs.store.borrow_mut();
            for (path, entry) in entries {
                store.insert(&fs.resolve(path.as_ref()), entry);
            }
        }
        fs
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Current directory, against which relative paths are resolved.
    pub fn cwd(&self) -> &str {
        &self.cwd
    }

    /// Changes the current directory. It must exist, explicitly or implicitly.
    pub fn set_cwd<'a>(&mut self, path: impl Into<Option<&'a str>>) -> Result<()> {
        let raw = validate_path(self.platform, path.into(), PathRole::Path)?;
        let target = self.resolve(raw);
        if !self.store.borrow().is_dir(&target) {
            return Err(FsError::DestinationDirectoryNotFound { path: raw.to_string() });
        }
        self.cwd = target;
        Ok(())
    }

    fn resolve(&self, path: &str) -> String {
        utils::normalize(self.platform, &self.cwd, path)
    }

    fn checked(&self, path: Option<&str>, role: PathRole) -> Result<String> {
        let raw = validate_path(self.platform, path, role)?;
        Ok(self.resolve(raw))
    }

    /// Moves a file.
    ///
    /// Checks, in this order: both paths are well formed (source first), the
    /// source file exists, source and destination differ (otherwise nothing
    /// happens), the destination is free, the destination's directory exists.
    /// The move itself is a single store step.
    pub fn move_file<'a>(
        &self,
        source: impl Into<Option<&'a str>>,
        destination: impl Into<Option<&'a str>>,
    ) -> Result<()> {
        let source = validate_path(self.platform, source.into(), PathRole::Source)?;
        let destination = validate_path(self.platform, destination.into(), PathRole::Destination)?;
        let from = self.resolve(source);
        let to = self.resolve(destination);

        let mut store = self.store.borrow_mut();
        if !store.is_file(&from) {
            return Err(FsError::SourceNotFound { path: source.to_string() });
        }
        if utils::key(self.platform, &from) == utils::key(self.platform, &to) {
            debug!(path = %from, "move onto itself");
            return Ok(());
        }
        if store.exists(&to) || store.is_dir(&to) {
            return Err(FsError::DestinationExists);
        }
        let parent_exists = utils::parent(self.platform, &to).is_some_and(|dir| store.is_dir(&dir));
        if !parent_exists {
            return Err(FsError::DestinationDirectoryNotFound {
                path: destination.to_string(),
            });
        }
        store.rename(&from, &to)
    }

    /// Appends each line followed by the platform's line terminator, creating
    /// the file if needed. Lines are encoded as UTF-8.
    pub fn append_all_lines<'a, I>(
        &self,
        path: impl Into<Option<&'a str>>,
        contents: Option<I>,
    ) -> Result<()>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.append_all_lines_with_encoding(path, contents, Some(Encoding::default()))
    }

    /// Like [`MockFileSystem::append_all_lines`] with an explicit encoding.
    /// `contents` is checked first, then `encoding`, then `path`.
    pub fn append_all_lines_with_encoding<'a, I>(
        &self,
        path: impl Into<Option<&'a str>>,
        contents: Option<I>,
        encoding: Option<Encoding>,
    ) -> Result<()>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let contents = require(contents, "contents")?;
        let encoding = require(encoding, "encoding")?;
        let path = self.checked(path.into(), PathRole::Path)?;

        let new_line = self.platform.new_line();
        let mut bytes = Vec::new();
        for line in contents {
            bytes.extend(encoding.encode(line.as_ref()));
            bytes.extend(encoding.encode(new_line));
        }

        let mut stream = self.open_checked(&path, OpenMode::Append, StreamOptions::new())?;
        stream.write_all(&bytes)?;
        stream.close();
        Ok(())
    }

    /// Opens a stream on a file. See [`OpenMode`] for what each mode does.
    pub fn open<'a>(&self, path: impl Into<Option<&'a str>>, mode: OpenMode) -> Result<FileStream> {
        self.open_with_options(path, mode, StreamOptions::new())
    }

    pub fn open_with_options<'a>(
        &self,
        path: impl Into<Option<&'a str>>,
        mode: OpenMode,
        options: StreamOptions,
    ) -> Result<FileStream> {
        let path = self.checked(path.into(), PathRole::Path)?;
        self.open_checked(&path, mode, options)
    }

    fn open_checked(&self, path: &str, mode: OpenMode, options: StreamOptions) -> Result<FileStream> {
        FileStream::open(Rc::clone(&self.store), path, mode, options)
    }

    /// True if `path` is a file. Malformed paths are reported as absent.
    pub fn file_exists(&self, path: &str) -> bool {
        self.checked(Some(path), PathRole::Path)
            .is_ok_and(|p| self.store.borrow().is_file(&p))
    }

    /// True if `path` is a directory, explicit or implicit.
    pub fn directory_exists(&self, path: &str) -> bool {
        self.checked(Some(path), PathRole::Path)
            .is_ok_and(|p| self.store.borrow().is_dir(&p))
    }

    pub fn read_all_bytes(&self, path: &str) -> Result<Vec<u8>> {
        let mut stream = self.open(path, OpenMode::Read)?;
        let mut bytes = Vec::new();
        stream.read_to_end(&mut bytes)?;
        Ok(bytes)
    }

    pub fn read_all_text(&self, path: &str) -> Result<String> {
        self.read_all_text_with_encoding(path, Encoding::default())
    }

    pub fn read_all_text_with_encoding(&self, path: &str, encoding: Encoding) -> Result<String> {
        Ok(encoding.decode(&self.read_all_bytes(path)?))
    }

    /// Replaces the content of a file, creating it if needed.
    pub fn write_all_bytes(&self, path: &str, bytes: &[u8]) -> Result<()> {
        let mut stream = self.open(path, OpenMode::Truncate)?;
        stream.write_all(bytes)?;
        stream.close();
        Ok(())
    }

    pub fn write_all_text(&self, path: &str, text: &str) -> Result<()> {
        self.write_all_bytes(path, text.as_bytes())
    }

    /// Deletes a file. A missing file is not an error, a missing directory is.
    pub fn delete(&self, path: &str) -> Result<()> {
        let target = self.checked(Some(path), PathRole::Path)?;
        let mut store = self.store.borrow_mut();
        if store.is_dir(&target) {
            return Err(FsError::AccessDenied { path: path.to_string() });
        }
        if !store.exists(&target) {
            let parent_exists = utils::parent(self.platform, &target).is_some_and(|dir| store.is_dir(&dir));
            return if parent_exists {
                Ok(())
            } else {
                Err(FsError::DestinationDirectoryNotFound { path: path.to_string() })
            };
        }
        store.remove_file(&target)
    }

    /// Creates a directory and any missing parents.
    pub fn create_directory(&self, path: &str) -> Result<()> {
        let target = self.checked(Some(path), PathRole::Path)?;
        self.store.borrow_mut().mkdir(&target)
    }

    /// Puts `entry` at `path`, replacing what was there. Fails with
    /// `AccessDenied` if a file sits where a parent directory should be.
    pub fn add_file(&self, path: &str, entry: Entry) -> Result<()> {
        let target = self.checked(Some(path), PathRole::Path)?;
        let mut store = self.store.borrow_mut();
        store.check_ancestors(&target)?;
        store.insert(&target, entry);
        Ok(())
    }

    pub fn add_directory(&self, path: &str) -> Result<()> {
        self.create_directory(path)
    }

    /// Snapshot of the entry stored at `path`.
    pub fn get_file(&self, path: &str) -> Option<Entry> {
        let target = self.checked(Some(path), PathRole::Path).ok()?;
        self.store.borrow().node(&target).ok().cloned()
    }

    pub fn set_attributes(&self, path: &str, attributes: FileAttributes) -> Result<()> {
        let target = self.checked(Some(path), PathRole::Path)?;
        *self.store.borrow_mut().node_mut(&target)?.attributes_mut() = attributes;
        Ok(())
    }

    /// Immediate children of a directory, as absolute paths.
    pub fn list_directory(&self, path: &str) -> Result<Vec<String>> {
        let target = self.checked(Some(path), PathRole::Path)?;
        self.store
            .borrow()
            .ls(&target)
            .map_err(|_| FsError::DestinationDirectoryNotFound { path: path.to_string() })
    }

    /// Every stored path, in key order.
    pub fn all_paths(&self) -> Vec<String> {
        self.store.borrow().paths().map(str::to_string).collect()
    }
}

impl std::fmt::Debug for MockFileSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockFileSystem")
            .field("platform", &self.platform)
            .field("cwd", &self.cwd)
            .field("entries", &self.store.borrow().len())
            .finish()
    }
}
