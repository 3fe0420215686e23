//! Rules of the emulated platform: separators, case policy, forbidden characters.

/// The platform whose path conventions the mock file system reproduces.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Drive-letter roots, `\` separators, case-insensitive names, strict characters.
    Windows,
    /// Single `/` root, case-sensitive names, anything but `/` allowed in a name.
    Unix,
}

impl Default for Platform {
    fn default() -> Self {
        Self::host()
    }
}

impl Platform {
    /// The platform this process runs on.
    pub fn host() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }

    pub fn separator(&self) -> char {
        match self {
            Platform::Windows => '\\',
            Platform::Unix => '/',
        }
    }

    /// Separator accepted on input and rewritten to [`Platform::separator`].
    pub fn alt_separator(&self) -> Option<char> {
        match self {
            Platform::Windows => Some('/'),
            Platform::Unix => None,
        }
    }

    pub fn is_separator(&self, c: char) -> bool {
        c == self.separator() || Some(c) == self.alt_separator()
    }

    pub fn is_case_sensitive(&self) -> bool {
        matches!(self, Platform::Unix)
    }

    pub fn new_line(&self) -> &'static str {
        match self {
            Platform::Windows => "\r\n",
            Platform::Unix => "\n",
        }
    }

    /// Current directory of a freshly created file system.
    pub fn default_cwd(&self) -> &'static str {
        match self {
            Platform::Windows => "C:\\",
            Platform::Unix => "/",
        }
    }

    /// Characters that may not appear anywhere in a path.
    pub fn is_invalid_path_char(&self, c: char) -> bool {
        match self {
            Platform::Windows => matches!(c, '"' | '<' | '>' | '|') || (c as u32) < 0x20,
            Platform::Unix => false,
        }
    }

    /// Characters that may not appear in the final segment of a path.
    /// Separators are not included here; they split segments instead.
    pub fn is_invalid_file_name_char(&self, c: char) -> bool {
        match self {
            Platform::Windows => self.is_invalid_path_char(c) || matches!(c, ':' | '*' | '?'),
            Platform::Unix => false,
        }
    }
}
