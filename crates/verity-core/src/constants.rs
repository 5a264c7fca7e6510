//! Shared constants for verity.

/// verity version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// dpkg's per-package metadata directory.
pub const DEFAULT_DPKG_INFO_DIR: &str = "/var/lib/dpkg/info";

/// dpkg's diversion database.
pub const DEFAULT_DPKG_DIVERSIONS_FILE: &str = "/var/lib/dpkg/diversions";

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/verity/verity.toml";

/// Aggregator deadline when none is configured (one hour).
pub const DEFAULT_TIMEOUT_SECS: u64 = 3600;

/// Above this many cores the worker count is halved.
pub const WORKER_HALVING_THRESHOLD: usize = 4;

/// Read buffer used while hashing file content.
pub const HASH_BUFFER_SIZE: usize = 64 * 1024;

/// Length of an MD5 digest in hex characters.
pub const MD5_HEX_LEN: usize = 32;

/// Missing paths starting with one of these are man pages.
pub const DEFAULT_MAN_PREFIXES: &[&str] = &["/usr/share/man"];

/// Missing paths containing one of these are translation files.
pub const DEFAULT_LOCALE_MARKERS: &[&str] = &["translations", "locale"];

/// Missing paths containing one of these are help documentation.
pub const DEFAULT_HELP_MARKERS: &[&str] = &["help"];

/// Answers accepted as "yes" at the reinstall prompt (compared lowercased).
pub const AFFIRMATIVE_ANSWERS: &[&str] = &["y", "yes", "yeah", "sure", "yep", "go ahead", "1"];
