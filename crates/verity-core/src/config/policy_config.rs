//! Noise-suppression rules for missing files.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_HELP_MARKERS, DEFAULT_LOCALE_MARKERS, DEFAULT_MAN_PREFIXES};

/// Empty lists fall back to the built-in rules.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct PolicyConfig {
    /// Path prefixes of man pages.
    pub man_prefixes: Vec<String>,
    /// Substrings marking translation files.
    pub locale_markers: Vec<String>,
    /// Substrings marking help documentation.
    pub help_markers: Vec<String>,
}

impl PolicyConfig {
    pub fn effective_man_prefixes(&self) -> Vec<String> {
        or_defaults(&self.man_prefixes, DEFAULT_MAN_PREFIXES)
    }

    pub fn effective_locale_markers(&self) -> Vec<String> {
        or_defaults(&self.locale_markers, DEFAULT_LOCALE_MARKERS)
    }

    pub fn effective_help_markers(&self) -> Vec<String> {
        or_defaults(&self.help_markers, DEFAULT_HELP_MARKERS)
    }
}

fn or_defaults(values: &[String], defaults: &[&str]) -> Vec<String> {
    if values.is_empty() {
        defaults.iter().map(|s| (*s).to_string()).collect()
    } else {
        values.to_vec()
    }
}
