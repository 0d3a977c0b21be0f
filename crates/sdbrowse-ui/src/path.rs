//! Path arithmetic over '/'-separated storage paths.
//!
//! Paths are plain text rooted at "/". Nothing here touches storage; the
//! current directory's ancestry is always recomputed from the text.

use heapless::String;

/// Maximum stored path length in bytes
pub const PATH_CAPACITY: usize = 128;

/// The root path
pub const ROOT: &str = "/";

/// Bounded path text
pub type PathBuf = String<PATH_CAPACITY>;

/// Copy `text` into a bounded string, dropping whatever does not fit.
/// Truncation always lands on a char boundary.
pub(crate) fn bounded<const N: usize>(text: &str) -> String<N> {
    let mut out = String::new();
    push_truncated(&mut out, text);
    out
}

pub(crate) fn push_truncated<const N: usize>(out: &mut String<N>, text: &str) {
    for ch in text.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
}

/// The root path as an owned value
pub fn root() -> PathBuf {
    bounded(ROOT)
}

pub fn is_root(path: &str) -> bool {
    path == ROOT
}

/// Join a directory path and a child name
pub fn join(base: &str, name: &str) -> PathBuf {
    let mut out = PathBuf::new();
    if !is_root(base) {
        push_truncated(&mut out, base);
    }
    push_truncated(&mut out, "/");
    push_truncated(&mut out, name);
    out
}

/// Parent directory of `path`; the parent of root is root
pub fn parent(path: &str) -> PathBuf {
    if is_root(path) {
        return root();
    }
    let trimmed = path.strip_suffix('/').unwrap_or(path);
    match trimmed.rfind('/') {
        None | Some(0) => root(),
        Some(i) => bounded(&trimmed[..i]),
    }
}

/// Last segment of `path` ("" for root)
pub fn basename(path: &str) -> &str {
    path.rfind('/').map(|i| &path[i + 1..]).unwrap_or(path)
}
