//! Path helpers working on plain strings, so that one platform's rules can be
//! emulated on any host.

use super::platform::Platform;

/// Splits an explicit root off `path`.
/// Returns `(Some(root), rest)` for `C:...` (Windows) or `/...` (Unix) and
/// `(None, path)` otherwise. The returned root always ends with the separator
/// and `rest` never starts with one.
pub fn split_root(platform: Platform, path: &str) -> (Option<String>, &str) {
    let sep = platform.separator();
    match platform {
        Platform::Windows => {
            let mut chars = path.chars();
            match (chars.next(), chars.next()) {
                (Some(drive), Some(':')) if drive.is_ascii_alphabetic() => {
                    let rest = &path[2..];
                    let rest = rest.strip_prefix(|c: char| platform.is_separator(c)).unwrap_or(rest);
                    (Some(format!("{drive}:{sep}")), rest)
                }
                _ => (None, path),
            }
        }
        Platform::Unix => match path.strip_prefix(sep) {
            Some(rest) => (Some(sep.to_string()), rest),
            None => (None, path),
        },
    }
}

/// Makes `path` absolute against `cwd` and removes `.`, `..`, repeated and
/// trailing separators. `cwd` must already be normalized.
pub fn normalize(platform: Platform, cwd: &str, path: &str) -> String {
    let sep = platform.separator();
    let path: String = path
        .chars()
        .map(|c| if platform.is_separator(c) { sep } else { c })
        .collect();

    let (cwd_root, cwd_rest) = match split_root(platform, cwd) {
        (Some(root), rest) => (root, rest),
        (None, _) => (platform.default_cwd().to_string(), ""),
    };
    let (root, rest) = match split_root(platform, &path) {
        (Some(root), rest) => (root, rest.to_string()),
        // `\foo` on Windows: rooted on the current drive
        (None, rest) if rest.starts_with(sep) => (cwd_root, rest.to_string()),
        (None, rest) => (cwd_root, format!("{cwd_rest}{sep}{rest}")),
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in rest.split(sep) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }

    let mut result = root;
    result.push_str(&segments.join(&sep.to_string()));
    result
}

/// Canonical form used as the store key.
pub fn key(platform: Platform, normalized: &str) -> String {
    if platform.is_case_sensitive() {
        normalized.to_string()
    } else {
        normalized.to_lowercase()
    }
}

/// True if the normalized `path` is a volume root (`/`, `C:\`).
pub fn is_root(platform: Platform, path: &str) -> bool {
    matches!(split_root(platform, path), (Some(_), ""))
}

/// Parent of a normalized path, or `None` for a root.
pub fn parent(platform: Platform, path: &str) -> Option<String> {
    let (root, rest) = split_root(platform, path);
    let root = root?;
    if rest.is_empty() {
        return None;
    }
    match rest.rfind(platform.separator()) {
        Some(idx) => Some(format!("{root}{}", &rest[..idx])),
        None => Some(root),
    }
}

/// Prefix shared by every descendant of the normalized `dir`.
pub fn child_prefix(platform: Platform, dir: &str) -> String {
    let sep = platform.separator();
    if dir.ends_with(sep) {
        dir.to_string()
    } else {
        format!("{dir}{sep}")
    }
}

/// Number of segments below the root of a normalized path.
pub fn depth(platform: Platform, path: &str) -> usize {
    let (_, rest) = split_root(platform, path);
    rest.split(platform.separator())
        .filter(|s| !s.is_empty())
        .count()
}

/// The ancestor of a normalized path that is `depth` segments below the root.
pub fn ancestor(platform: Platform, path: &str, depth: usize) -> String {
    let sep = platform.separator();
    let (root, rest) = split_root(platform, path);
    let mut result = root.unwrap_or_default();
    let segments: Vec<&str> = rest.split(sep).filter(|s| !s.is_empty()).take(depth).collect();
    result.push_str(&segments.join(&sep.to_string()));
    result
}

/// Final segment of a raw, not yet normalized path.
/// The drive prefix never counts as part of the name.
pub fn file_name(platform: Platform, path: &str) -> &str {
    let path = match split_root(platform, path) {
        (Some(_), rest) if platform == Platform::Windows => rest,
        _ => path,
    };
    match path.rfind(|c: char| platform.is_separator(c)) {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}
