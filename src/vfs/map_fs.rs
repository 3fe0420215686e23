//! This module provides the node store: a flat, ordered map from normalized paths to entries.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::Entry;
use crate::core::{FsBackend, FsError, Platform, Result, utils};

/// The authoritative store of the mock file system. Files and directories live
/// in a single ordered map keyed by path, with no tree structure behind it.
///
/// ### Internal state
///
/// * `platform`: the emulated platform. It decides the key form: on a
///   case-insensitive platform keys are lower-cased, so `C:\Foo` and `c:\foo`
///   address the same node.
///
/// * `entries`: the storage map.
///   - Key: canonical form of an **absolute normalized path**.
///   - Value: the path as it was first given (for display) and the `Entry`.
///   - Uses `BTreeMap` for:
///     - Prefix queries (implicit directories, `ls`).
///     - Deterministic iteration.
///
/// ### Invariants
///
/// 1. **Root existence**: the root of the platform's default volume (`/` or
///    `C:\`) is always present as a `Directory`.
/// 2. **Path normalization**: every path handed to the store is absolute and
///    normalized; the store does not resolve `.`/`..` itself.
/// 3. **Implicit ancestors**: parents of a file need not be stored. Any prefix
///    of an existing entry answers `is_dir() == true`.
/// 4. **Uniqueness**: no two keys share a canonical form.
///
/// ### Thread Safety
///
/// Not thread‑safe. The façade shares it with open streams through
/// `Rc<RefCell<MapFS>>`, which keeps it on one thread.
#[derive(Debug, Clone)]
pub struct MapFS {
    platform: Platform,
    entries: BTreeMap<String, (String, Entry)>,
}

impl MapFS {
    /// Creates a store holding only the default root directory.
    pub fn new(platform: Platform) -> Self {
        let root = platform.default_cwd();
        let mut entries = BTreeMap::new();
        entries.insert(utils::key(platform, root), (root.to_string(), Entry::directory()));
        Self { platform, entries }
    }

    fn key(&self, path: &str) -> String {
        utils::key(self.platform, path)
    }

    /// Puts `entry` at `path` unconditionally, replacing whatever was there.
    /// Used for seeding; no ancestors are created.
    pub fn insert(&mut self, path: &str, entry: Entry) -> Option<Entry> {
        debug!(path, kind = ?entry.entry_type(), "insert entry");
        self.entries
            .insert(self.key(path), (path.to_string(), entry))
            .map(|(_, old)| old)
    }

    /// All stored paths in key order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|(p, _)| p.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fails with `AccessDenied` if any ancestor of `path` is a stored file:
    /// nothing may be created below a file.
    pub(crate) fn check_ancestors(&self, path: &str) -> Result<()> {
        let mut current = utils::parent(self.platform, path);
        while let Some(dir) = current {
            if self.is_file(&dir) {
                return Err(FsError::AccessDenied { path: path.to_string() });
            }
            current = utils::parent(self.platform, &dir);
        }
        Ok(())
    }

    /// Stored entries strictly below the directory whose canonical key is `key`.
    fn descendants(&self, key: &str) -> impl Iterator<Item = (&String, &(String, Entry))> {
        let platform = self.platform;
        let prefix = utils::child_prefix(platform, key);
        self.entries
            .range(prefix.clone()..)
            .take_while(move |(k, _)| k.starts_with(&prefix))
            .filter(move |(k, _)| !utils::is_root(platform, k))
    }
}

impl FsBackend for MapFS {
    fn platform(&self) -> Platform {
        self.platform
    }

    fn exists(&self, path: &str) -> bool {
        self.entries.contains_key(&self.key(path))
    }

    fn is_file(&self, path: &str) -> bool {
        self.entries
            .get(&self.key(path))
            .is_some_and(|(_, e)| e.is_file())
    }

    fn is_dir(&self, path: &str) -> bool {
        let key = self.key(path);
        match self.entries.get(&key) {
            Some((_, entry)) => entry.is_dir(),
            None => self.descendants(&key).next().is_some(),
        }
    }

    fn node(&self, path: &str) -> Result<&Entry> {
        self.entries
            .get(&self.key(path))
            .map(|(_, e)| e)
            .ok_or_else(|| FsError::NotFound { path: path.to_string() })
    }

    fn node_mut(&mut self, path: &str) -> Result<&mut Entry> {
        let key = self.key(path);
        self.entries
            .get_mut(&key)
            .map(|(_, e)| e)
            .ok_or_else(|| FsError::NotFound { path: path.to_string() })
    }

    /// Writes `content` to the file at `path`, creating it if needed.
    fn put_file(&mut self, path: &str, content: &[u8]) -> Result<()> {
        let key = self.key(path);
        match self.entries.get_mut(&key) {
            Some((_, entry)) => {
                if !entry.set_content(content) {
                    return Err(FsError::AccessDenied { path: path.to_string() });
                }
            }
            None => {
                self.check_ancestors(path)?;
                self.entries
                    .insert(key, (path.to_string(), Entry::file(content)));
            }
        }
        debug!(path, len = content.len(), "put file");
        Ok(())
    }

    fn remove_file(&mut self, path: &str) -> Result<()> {
        let key = self.key(path);
        match self.entries.get(&key) {
            None => Err(FsError::NotFound { path: path.to_string() }),
            Some((_, entry)) if entry.is_dir() => {
                Err(FsError::AccessDenied { path: path.to_string() })
            }
            Some(_) => {
                self.entries.remove(&key);
                debug!(path, "remove file");
                Ok(())
            }
        }
    }

    /// Creates directory and all its parents (if needed).
    /// Existing directories are left as they are.
    fn mkdir(&mut self, path: &str) -> Result<()> {
        // Collect the missing chain first so that a file in the way leaves
        // the store untouched.
        let mut missing = Vec::new();
        let mut current = Some(path.to_string());
        while let Some(dir) = current {
            match self.entries.get(&self.key(&dir)) {
                Some((_, entry)) if entry.is_dir() => break,
                Some(_) => return Err(FsError::AccessDenied { path: dir }),
                None => {
                    current = utils::parent(self.platform, &dir);
                    missing.push(dir);
                }
            }
        }

        for dir in missing.into_iter().rev() {
            debug!(path = %dir, "mkdir");
            self.entries
                .insert(self.key(&dir), (dir, Entry::directory()));
        }
        Ok(())
    }

    /// Moves the entry at `from` to `to` in one step. A reader never observes
    /// both paths empty or both paths filled.
    fn rename(&mut self, from: &str, to: &str) -> Result<()> {
        let from_key = self.key(from);
        let to_key = self.key(to);
        if from_key == to_key {
            return if self.entries.contains_key(&from_key) {
                Ok(())
            } else {
                Err(FsError::NotFound { path: from.to_string() })
            };
        }
        if self.entries.contains_key(&to_key) || self.descendants(&to_key).next().is_some() {
            return Err(FsError::DestinationExists);
        }
        self.check_ancestors(to)?;
        let (_, entry) = self
            .entries
            .remove(&from_key)
            .ok_or_else(|| FsError::NotFound { path: from.to_string() })?;
        self.entries.insert(to_key, (to.to_string(), entry));
        debug!(from, to, "rename");
        Ok(())
    }

    /// Lists the immediate children of a directory.
    ///
    /// Subdirectories that only exist implicitly, as ancestors of a stored
    /// file, are listed too. The directory itself is not included.
    fn ls(&self, path: &str) -> Result<Vec<String>> {
        if !self.is_dir(path) {
            return Err(FsError::NotFound { path: path.to_string() });
        }
        let depth = utils::depth(self.platform, path) + 1;
        let mut seen = BTreeSet::new();
        let mut children = Vec::new();
        let key = self.key(path);
        for (_, (display, _)) in self.descendants(&key) {
            let child = utils::ancestor(self.platform, display, depth);
            if seen.insert(self.key(&child)) {
                children.push(child);
            }
        }
        Ok(children)
    }
}
