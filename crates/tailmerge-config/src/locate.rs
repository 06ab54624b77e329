//! Config file discovery.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::extract::ConfigFlavor;

/// Config filenames, in lookup order. TypeScript wins over JavaScript.
pub const CONFIG_CANDIDATES: &[&str] = &[
    "tailwind.config.ts",
    "tailwind.config.js",
    "tailwind.config.mjs",
    "tailwind.config.cjs",
    "tailwind.config.mts",
    "tailwind.config.cts",
];

/// A located config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    /// Full path to the file
    pub path: PathBuf,

    /// Source language, from the extension
    pub flavor: ConfigFlavor,
}

/// Find the config file in `root`.
pub fn find_config(root: &Path) -> Result<ConfigFile, ConfigError> {
    for name in CONFIG_CANDIDATES {
        let path = root.join(name);
        if path.is_file() {
            tracing::debug!("Found config at {}", path.display());
            return Ok(ConfigFile {
                flavor: ConfigFlavor::from_path(&path),
                path,
            });
        }
    }

    Err(ConfigError::ConfigNotFound {
        root: root.to_path_buf(),
        tried: CONFIG_CANDIDATES.iter().map(|s| s.to_string()).collect(),
    })
}
