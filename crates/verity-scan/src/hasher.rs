//! MD5 content hashing, the digest dpkg records in `*.md5sums`.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use md5::{Digest, Md5};
use verity_core::constants::HASH_BUFFER_SIZE;

/// Lowercase hex MD5 of `content`.
pub fn hash_content(content: &[u8]) -> String {
    format!("{:x}", Md5::digest(content))
}

/// Streams files through MD5, reusing one read buffer.
pub struct FileHasher {
    buf: Vec<u8>,
}

impl FileHasher {
    pub fn new() -> Self {
        Self {
            buf: vec![0; HASH_BUFFER_SIZE],
        }
    }

    /// Lowercase hex MD5 of the file at `path`.
    pub fn hash_file(&mut self, path: &Path) -> io::Result<String> {
        let mut file = File::open(path)?;
        let mut hasher = Md5::new();
        loop {
            let n = match file.read(&mut self.buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            hasher.update(&self.buf[..n]);
        }
        Ok(format!("{:x}", hasher.finalize()))
    }
}

impl Default for FileHasher {
    fn default() -> Self {
        Self::new()
    }
}
