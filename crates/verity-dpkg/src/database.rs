//! Loading the md5sums manifest and conffile exemptions from the info directory.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use verity_core::config::DpkgConfig;
use verity_core::errors::ProviderError;
use verity_core::traits::ManifestProvider;
use verity_core::types::{ExemptionSet, Manifest};

use crate::parse::{package_from_file_name, parse_conffiles_line, parse_md5sums_line, split_lines};

const MD5SUMS_EXT: &str = "md5sums";
const CONFFILES_EXT: &str = "conffiles";

/// Everything read from the `*.md5sums` files.
#[derive(Debug, Clone, Default)]
pub struct DpkgDatabase {
    pub manifest: Manifest,
    /// Path to owning package, from the md5sums file the path came from.
    pub owners: FxHashMap<PathBuf, String>,
    /// Lines that could not be parsed.
    pub malformed: usize,
}

/// Reads package metadata from a dpkg info directory.
#[derive(Debug, Clone)]
pub struct DpkgProvider {
    info_dir: PathBuf,
}

/// Entries of one metadata file.
struct PackageFile {
    package: String,
    entries: Vec<(PathBuf, String)>,
    malformed: usize,
}

impl DpkgProvider {
    pub fn new(info_dir: impl Into<PathBuf>) -> Self {
        Self {
            info_dir: info_dir.into(),
        }
    }

    pub fn from_config(config: &DpkgConfig) -> Self {
        Self::new(config.effective_info_dir())
    }

    pub fn info_dir(&self) -> &Path {
        &self.info_dir
    }

    /// Load the manifest together with the owner index.
    ///
    /// Metadata files are read in parallel; they are processed in file-name
    /// order so a path listed by two packages deterministically goes to the
    /// later one.
    pub fn load_database(&self) -> Result<DpkgDatabase, ProviderError> {
        let files = self.metadata_files(MD5SUMS_EXT)?;

        let parsed: Vec<PackageFile> = files
            .par_iter()
            .map(|(package, path)| read_md5sums(package, path))
            .collect::<Result<_, _>>()?;

        let mut map: FxHashMap<PathBuf, String> = FxHashMap::default();
        let mut owners: FxHashMap<PathBuf, String> = FxHashMap::default();
        let mut malformed = 0;
        for file in parsed {
            malformed += file.malformed;
            for (path, hash) in file.entries {
                owners.insert(path.clone(), file.package.clone());
                map.insert(path, hash);
            }
        }

        let manifest = Manifest::from_map(map);
        tracing::info!(
            packages = files.len(),
            entries = manifest.len(),
            malformed,
            "loaded md5sums manifest"
        );
        Ok(DpkgDatabase {
            manifest,
            owners,
            malformed,
        })
    }

    /// `(package, path)` for every `*.<extension>` file, sorted by file name.
    fn metadata_files(&self, extension: &str) -> Result<Vec<(String, PathBuf)>, ProviderError> {
        if !self.info_dir.is_dir() {
            return Err(ProviderError::DatabaseMissing {
                path: self.info_dir.clone(),
            });
        }
        let io_err = |source: std::io::Error| ProviderError::Io {
            path: self.info_dir.clone(),
            source,
        };

        let mut files = Vec::new();
        for entry in fs::read_dir(&self.info_dir).map_err(io_err)? {
            let entry = entry.map_err(io_err)?;
            let name = entry.file_name();
            let Some(package) = name.to_str().and_then(|n| package_from_file_name(n, extension)) else {
                continue;
            };
            files.push((package, entry.path()));
        }
        files.sort_by(|a, b| a.1.cmp(&b.1));
        Ok(files)
    }
}

fn read_md5sums(package: &str, path: &Path) -> Result<PackageFile, ProviderError> {
    let content = fs::read(path).map_err(|source| ProviderError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut entries = Vec::new();
    let mut malformed = 0;
    for (lineno, line) in split_lines(&content).enumerate() {
        if line.trim_ascii().is_empty() {
            continue;
        }
        match parse_md5sums_line(line) {
            Some(entry) => entries.push(entry),
            None => {
                malformed += 1;
                tracing::warn!(file = %path.display(), line = lineno + 1, "skipping malformed md5sums line");
            }
        }
    }
    Ok(PackageFile {
        package: package.to_string(),
        entries,
        malformed,
    })
}

impl ManifestProvider for DpkgProvider {
    fn load_manifest(&self) -> Result<Manifest, ProviderError> {
        Ok(self.load_database()?.manifest)
    }

    fn load_exemptions(&self) -> Result<ExemptionSet, ProviderError> {
        let files = self.metadata_files(CONFFILES_EXT)?;
        let mut exemptions = ExemptionSet::new();
        for (_, path) in &files {
            let content = fs::read(path).map_err(|source| ProviderError::Io {
                path: path.clone(),
                source,
            })?;
            for conffile in split_lines(&content).filter_map(parse_conffiles_line) {
                exemptions.insert(conffile);
            }
        }
        tracing::info!(packages = files.len(), conffiles = exemptions.len(), "loaded conffiles");
        Ok(exemptions)
    }
}
