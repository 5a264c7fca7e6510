//! Noise filters for files that are commonly absent without anything being
//! wrong (stripped man pages, translations, help docs).

use std::path::Path;

use verity_core::config::PolicyConfig;
use verity_core::types::IgnoreReason;

/// Ordered ignore rules; the first match wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnorePolicy {
    man_prefixes: Vec<String>,
    locale_markers: Vec<String>,
    help_markers: Vec<String>,
}

impl IgnorePolicy {
    pub fn from_config(config: &PolicyConfig) -> Self {
        Self {
            man_prefixes: config.effective_man_prefixes(),
            locale_markers: config.effective_locale_markers(),
            help_markers: config.effective_help_markers(),
        }
    }

    /// Why a missing `path` can be ignored, if it can.
    ///
    /// Matching is on the raw path string: man pages by prefix, the others by
    /// substring anywhere in the path.
    pub fn classify(&self, path: &Path) -> Option<IgnoreReason> {
        let path = path.to_string_lossy();
        if self.man_prefixes.iter().any(|p| path.starts_with(p.as_str())) {
            return Some(IgnoreReason::ManPage);
        }
        if self.locale_markers.iter().any(|m| path.contains(m.as_str())) {
            return Some(IgnoreReason::Locale);
        }
        if self.help_markers.iter().any(|m| path.contains(m.as_str())) {
            return Some(IgnoreReason::Help);
        }
        None
    }
}

impl Default for IgnorePolicy {
    fn default() -> Self {
        Self::from_config(&PolicyConfig::default())
    }
}
