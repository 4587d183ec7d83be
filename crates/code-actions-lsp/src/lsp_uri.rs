//! `file://` URI helpers.

use code_actions::{Document, DocumentSource};
use std::path::{Path, PathBuf};

/// Convert a local path to a `file://` URI.
///
/// Relative paths are resolved against the current directory. The path is not canonicalized:
/// engine documents are keyed by the path the host opened them with.
pub fn path_to_file_uri(path: &Path) -> String {
    let abs = if path.is_relative() {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    } else {
        path.to_path_buf()
    };
    let mut path_str = abs.to_string_lossy().into_owned();

    if cfg!(windows) {
        path_str = path_str.replace('\\', "/");
        if !path_str.starts_with('/') {
            path_str.insert(0, '/');
        }
    }

    format!("file://{}", percent_encode_path(&path_str))
}

/// Percent-encode everything but unreserved URI bytes and `/`.
pub fn percent_encode_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for &b in path.as_bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'/' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Decode `%XX` escapes. Malformed escapes are kept literally.
pub fn percent_decode_path(path: &str) -> String {
    let bytes = path.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%'
            && let (Some(hi), Some(lo)) = (
                bytes.get(i + 1).copied().and_then(hex_value),
                bytes.get(i + 2).copied().and_then(hex_value),
            )
        {
            out.push((hi << 4) | lo);
            i += 3;
            continue;
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Convert a `file://` URI back into a path. Returns `None` for other schemes.
pub fn file_uri_to_path(uri: &str) -> Option<PathBuf> {
    let rest = uri.strip_prefix("file://")?;
    let rest = rest.strip_prefix("localhost").unwrap_or(rest);
    let mut path_str = percent_decode_path(rest);

    if cfg!(windows) {
        // `/C:/...` -> `C:/...`
        if path_str.starts_with('/') && path_str.get(2..3) == Some(":") {
            path_str.remove(0);
        }
        path_str = path_str.replace('/', "\\");
    }

    Some(PathBuf::from(path_str))
}

/// Find the open document a `file://` URI refers to.
pub fn document_for_uri<'a>(source: &'a dyn DocumentSource, uri: &str) -> Option<&'a Document> {
    let path = file_uri_to_path(uri)?;
    source.find_open_document(&path)
}
