use std::time::SystemTime;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EntryType {
    File,
    Directory,
}

/// Attribute flags carried by every node.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct FileAttributes {
    pub read_only: bool,
    pub hidden: bool,
    pub archive: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Timestamps {
    pub created: SystemTime,
    pub modified: SystemTime,
    pub accessed: SystemTime,
}

impl Timestamps {
    pub fn now() -> Self {
        let now = SystemTime::now();
        Self {
            created: now,
            modified: now,
            accessed: now,
        }
    }

    fn touch(&mut self) {
        let now = SystemTime::now();
        self.modified = now;
        self.accessed = now;
    }
}

impl Default for Timestamps {
    fn default() -> Self {
        Self::now()
    }
}

/// A node of the mock file system: either a file with content or a directory.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    File {
        content: Vec<u8>,
        attributes: FileAttributes,
        times: Timestamps,
    },
    Directory {
        attributes: FileAttributes,
        times: Timestamps,
    },
}

impl Entry {
    /// New file entry; `content` may be bytes or text.
    pub fn file<C: Into<Vec<u8>>>(content: C) -> Entry {
        Entry::File {
            content: content.into(),
            attributes: FileAttributes::default(),
            times: Timestamps::now(),
        }
    }

    pub fn directory() -> Entry {
        Entry::Directory {
            attributes: FileAttributes::default(),
            times: Timestamps::now(),
        }
    }

    pub fn with_attributes(mut self, attributes: FileAttributes) -> Entry {
        *self.attributes_mut() = attributes;
        self
    }

    pub fn entry_type(&self) -> EntryType {
        match self {
            Entry::File { .. } => EntryType::File,
            Entry::Directory { .. } => EntryType::Directory,
        }
    }

    pub fn is_file(&self) -> bool {
        self.entry_type() == EntryType::File
    }

    pub fn is_dir(&self) -> bool {
        self.entry_type() == EntryType::Directory
    }

    /// File bytes; `None` for directories.
    pub fn content(&self) -> Option<&[u8]> {
        match self {
            Entry::File { content, .. } => Some(content),
            Entry::Directory { .. } => None,
        }
    }

    /// File content decoded as UTF-8, lossily.
    pub fn text_content(&self) -> Option<String> {
        self.content()
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// Replaces the content of a file. Returns false for directories.
    pub fn set_content(&mut self, data: &[u8]) -> bool {
        match self {
            Entry::File { content, times, .. } => {
                content.clear();
                content.extend_from_slice(data);
                times.touch();
                true
            }
            Entry::Directory { .. } => false,
        }
    }

    pub fn len(&self) -> u64 {
        self.content().map_or(0, |c| c.len() as u64)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn attributes(&self) -> FileAttributes {
        match self {
            Entry::File { attributes, .. } | Entry::Directory { attributes, .. } => *attributes,
        }
    }

    pub fn attributes_mut(&mut self) -> &mut FileAttributes {
        match self {
            Entry::File { attributes, .. } | Entry::Directory { attributes, .. } => attributes,
        }
    }

    pub fn times(&self) -> Timestamps {
        match self {
            Entry::File { times, .. } | Entry::Directory { times, .. } => *times,
        }
    }
}
