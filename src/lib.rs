//! An in-memory mock of a hierarchical file system, for Rust tests.
//! Files and directories live in a map; nothing ever touches the actual disk.
//!
//! ### Overview
//!
//! `mockfs-kit` mimics the call surface of a conventional file API: path
//! arguments are validated the same way, failures carry the same messages,
//! and Windows or Unix path rules can be emulated on any host.
//!
//! **Key ideas**:
//! - **Store**: `MapFS` holds every node in a flat ordered map keyed by normalized path.
//!   Directories may be implicit: any ancestor of a stored file exists.
//! - **Streams**: `FileStream` buffers a file's bytes and writes them back on flush and on close.
//!   Dropping a stream closes it.
//! - **Façade**: `MockFileSystem` checks arguments first and only then touches the store,
//!   so a rejected call leaves nothing behind.
//! - **Errors**: every failure is an `FsError` with the message a real file API would give.

mod core;
mod vfs;

pub use core::{FsBackend, FsError, PathRole, Platform, Result, utils};
pub use vfs::{
    Encoding, Entry, EntryType, FileAttributes, FileStream, MapFS, MockFileSystem, OpenMode,
    StreamOptions, Timestamps,
};
