//! Buffered byte stream bound to one file of the store.
//!
//! A [`FileStream`] works on a private copy of the file's bytes. The store only
//! sees them again on [`Write::flush`] or when the stream is closed.

use std::cell::RefCell;
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};
use std::rc::Rc;

use tracing::{debug, trace, warn};

use crate::MapFS;
use crate::core::{FsBackend, FsError, Result};

/// How a file is opened.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OpenMode {
    /// File must exist. Read-only, positioned at the start.
    Read,
    /// Creates a missing file. Old content is kept and overwritten from the start.
    Write,
    /// Creates a missing file. Positioned after the old content.
    Append,
    /// Creates a missing file. Old content is discarded.
    Truncate,
}

/// Behaviour applied when a stream is closed.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct StreamOptions {
    delete_on_close: bool,
}

impl StreamOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes the file from the store once the stream is closed.
    pub fn delete_on_close(mut self, delete: bool) -> Self {
        self.delete_on_close = delete;
        self
    }

    pub fn is_delete_on_close(&self) -> bool {
        self.delete_on_close
    }
}

/// An open file.
///
/// Implements [`Read`], [`Write`] and [`Seek`] over an in-memory buffer. On
/// flush the whole buffer of a writable stream, independent of the current
/// position, replaces the file's content, provided the file still exists. Read
/// streams leave the store alone. A file removed while the
/// stream is open is not brought back.
///
/// The stream closes itself when dropped, so the final flush and the
/// delete-on-close behaviour happen on every exit path. Two streams open on the
/// same file do not see each other's writes; whichever flushes last wins.
pub struct FileStream {
    store: Rc<RefCell<MapFS>>,
    path: String,
    buffer: Cursor<Vec<u8>>,
    can_write: bool,
    options: StreamOptions,
    closed: bool,
}

impl FileStream {
    /// Opens the normalized `path` of `store`.
    ///
    /// Fails with `NotFound` if a missing file is opened for reading, and with
    /// `AccessDenied` if `path` is a directory or a read-only file is opened
    /// for writing. Every other mode creates a missing file as empty.
    pub(crate) fn open(
        store: Rc<RefCell<MapFS>>,
        path: &str,
        mode: OpenMode,
        options: StreamOptions,
    ) -> Result<FileStream> {
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut fs = store.borrow_mut();
            if fs.exists(path) {
                let entry = fs.node(path)?;
                let denied = entry.is_dir() || (mode != OpenMode::Read && entry.attributes().read_only);
                if denied {
                    return Err(FsError::AccessDenied { path: path.to_string() });
                }
                if mode != OpenMode::Truncate {
                    buffer.get_mut().extend_from_slice(entry.content().unwrap_or_default());
                    if mode == OpenMode::Append {
                        let end = buffer.get_ref().len() as u64;
                        buffer.set_position(end);
                    }
                }
            } else if fs.is_dir(path) {
                return Err(FsError::AccessDenied { path: path.to_string() });
            } else if mode == OpenMode::Read {
                return Err(FsError::NotFound { path: path.to_string() });
            } else {
                fs.put_file(path, &[])?;
            }
        }

        debug!(path, ?mode, delete_on_close = options.is_delete_on_close(), "open stream");
        Ok(FileStream {
            store,
            path: path.to_string(),
            buffer,
            can_write: mode != OpenMode::Read,
            options,
            closed: false,
        })
    }

    /// Normalized path the stream is bound to.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn can_read(&self) -> bool {
        !self.closed
    }

    pub fn can_write(&self) -> bool {
        self.can_write && !self.closed
    }

    pub fn can_seek(&self) -> bool {
        !self.closed
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Length of the buffered content.
    pub fn len(&self) -> u64 {
        self.buffer.get_ref().len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn position(&self) -> u64 {
        self.buffer.position()
    }

    /// Truncates or zero-extends the buffer. The position is clamped to the
    /// new length.
    pub fn set_len(&mut self, len: u64) -> io::Result<()> {
        self.check_writable()?;
        let len = usize::try_from(len)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "length out of range"))?;
        self.buffer.get_mut().resize(len, 0);
        if self.buffer.position() > len as u64 {
            self.buffer.set_position(len as u64);
        }
        Ok(())
    }

    /// Flushes and applies the close behaviour. Later calls do nothing.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.sync();
        if self.options.is_delete_on_close() {
            let mut fs = self.store.borrow_mut();
            if fs.is_file(&self.path) {
                if let Err(err) = fs.remove_file(&self.path) {
                    warn!(path = %self.path, %err, "delete on close failed");
                }
            }
        }
        self.closed = true;
        debug!(path = %self.path, "close stream");
    }

    /// Writes the buffer back to the store, if the file is still there.
    /// Read streams never write back.
    fn sync(&self) {
        if !self.can_write {
            return;
        }
        let mut fs = self.store.borrow_mut();
        let written = match fs.node_mut(&self.path) {
            Ok(entry) => entry.set_content(self.buffer.get_ref()),
            Err(_) => false,
        };
        if written {
            trace!(path = %self.path, len = self.buffer.get_ref().len(), "flush");
        } else {
            trace!(path = %self.path, "flush skipped: file is gone");
        }
    }

    fn check_open(&self) -> io::Result<()> {
        if self.closed {
            return Err(io::Error::other("cannot access a closed stream"));
        }
        Ok(())
    }

    fn check_writable(&self) -> io::Result<()> {
        self.check_open()?;
        if !self.can_write {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "stream does not support writing",
            ));
        }
        Ok(())
    }
}

impl std::fmt::Debug for FileStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStream")
            .field("path", &self.path)
            .field("len", &self.len())
            .field("position", &self.position())
            .field("can_write", &self.can_write)
            .field("options", &self.options)
            .field("closed", &self.closed)
            .finish()
    }
}

impl Read for FileStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.check_open()?;
        self.buffer.read(buf)
    }
}

impl Write for FileStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.check_writable()?;
        self.buffer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.check_open()?;
        self.sync();
        Ok(())
    }
}

impl Seek for FileStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.check_open()?;
        self.buffer.seek(pos)
    }
}

impl Drop for FileStream {
    fn drop(&mut self) {
        self.close();
    }
}
