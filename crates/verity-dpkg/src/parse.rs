//! Line-level parsers for dpkg metadata and `dpkg -S` output.
//!
//! Metadata files are parsed as bytes: dpkg stores paths verbatim, and they are
//! not guaranteed to be UTF-8.

use std::ffi::OsStr;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use verity_core::constants::MD5_HEX_LEN;

/// Lines of a metadata file without their terminators.
pub fn split_lines(content: &[u8]) -> impl Iterator<Item = &[u8]> {
    let body = content.strip_suffix(b"\n").unwrap_or(content);
    (!body.is_empty())
        .then_some(body)
        .into_iter()
        .flat_map(|body| body.split(|&b| b == b'\n'))
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
}

/// Parse one `<hex>  <relative path>` line of a `.md5sums` file.
///
/// Paths are relative to `/`. Returns `None` for blank or malformed lines.
pub fn parse_md5sums_line(line: &[u8]) -> Option<(PathBuf, String)> {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    if line.trim_ascii().is_empty() {
        return None;
    }
    let split = line.windows(2).position(|pair| pair == b"  ")?;
    let (hash, rel) = (&line[..split], &line[split + 2..]);
    if hash.len() != MD5_HEX_LEN || !hash.iter().all(u8::is_ascii_hexdigit) {
        return None;
    }
    let start = rel.iter().position(|&b| b != b'/')?;
    let hash = hash.iter().map(|b| char::from(b.to_ascii_lowercase())).collect();
    Some((Path::new("/").join(OsStr::from_bytes(&rel[start..])), hash))
}

/// Parse one line of a `.conffiles` file, dropping trailing flags such as
/// `remove-on-upgrade` or `obsolete`.
pub fn parse_conffiles_line(line: &[u8]) -> Option<PathBuf> {
    let path = line.split(u8::is_ascii_whitespace).find(|token| !token.is_empty())?;
    path.starts_with(b"/").then(|| PathBuf::from(OsStr::from_bytes(path)))
}

/// Package name from a metadata file name: `libc6:amd64.md5sums` -> `libc6:amd64`.
pub fn package_from_file_name(file_name: &str, extension: &str) -> Option<String> {
    let stem = file_name.strip_suffix(extension)?.strip_suffix('.')?;
    (!stem.is_empty()).then(|| stem.to_string())
}

/// Diverted paths from the dpkg diversion database.
///
/// Records are three lines each: the diverted path, where it was diverted to,
/// and the diverting package. A truncated trailing record still counts.
pub fn parse_diversions(content: &[u8]) -> Vec<PathBuf> {
    let lines: Vec<&[u8]> = split_lines(content).collect();
    lines
        .chunks(3)
        .filter_map(|record| {
            let diverted = record[0].trim_ascii();
            diverted
                .starts_with(b"/")
                .then(|| PathBuf::from(OsStr::from_bytes(diverted)))
        })
        .collect()
}

/// Owning packages from `dpkg -S` output (`pkg1, pkg2: /path`).
///
/// `diversion by ...` lines are ignored.
pub fn parse_dpkg_search(output: &str) -> Vec<String> {
    let mut packages = Vec::new();
    for line in output.lines() {
        if line.starts_with("diversion by ") {
            continue;
        }
        let Some((owners, _path)) = line.split_once(": ") else {
            continue;
        };
        for owner in owners.split(", ").map(str::trim).filter(|o| !o.is_empty()) {
            if !packages.iter().any(|p| p == owner) {
                packages.push(owner.to_string());
            }
        }
    }
    packages
}
