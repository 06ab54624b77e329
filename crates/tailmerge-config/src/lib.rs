//! Merge design-system keyframes and animations into Tailwind config files.
//!
//! This crate parses a project's `tailwind.config.{ts,js}` without evaluating
//! it, merges new entries into `theme.extend.keyframes` and
//! `theme.extend.animation`, and writes the file back in its own export style.

pub mod error;
pub mod extract;
pub mod locate;
pub mod merge;
pub mod merger;
pub mod patch;
pub mod presets;
pub mod serialize;
pub mod value;

pub use error::ConfigError;
pub use extract::{extract_config, ConfigFlavor, ExtractedConfig, ModuleFormat};
pub use locate::{find_config, ConfigFile, CONFIG_CANDIDATES};
pub use merge::{apply_patch, MergeReport};
pub use merger::{merge_config, transform, ConfigMerger, MergeOutcome, Transformed};
pub use patch::MergePatch;
pub use presets::Preset;
pub use value::{ConfigValue, Entry, Object};
