//! Merging a patch into `theme.extend`.
//!
//! Only `theme.extend.keyframes` and `theme.extend.animation` are touched:
//! - Missing `theme`, `extend`, `keyframes`, `animation` are created empty
//! - Existing entries not in the patch are kept in place
//! - Entries in both are replaced by the patch, keeping their position
//!   unless a later spread would override them, in which case they move last
//! - New entries are appended

use crate::error::ConfigError;
use crate::patch::MergePatch;
use crate::value::{ConfigValue, Entry, Object};

/// What a merge changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeReport {
    pub added_keyframes: Vec<String>,
    pub replaced_keyframes: Vec<String>,
    pub added_animations: Vec<String>,
    pub replaced_animations: Vec<String>,
}

impl MergeReport {
    /// Total number of entries written.
    pub fn total(&self) -> usize {
        self.added_keyframes.len()
            + self.replaced_keyframes.len()
            + self.added_animations.len()
            + self.replaced_animations.len()
    }
}

/// Merge `patch` into the config object in place.
///
/// Fails if one of the levels on the way to `keyframes`/`animation` exists
/// but is not an object literal, since it cannot be merged without
/// evaluating the file.
pub fn apply_patch(config: &mut Object, patch: &MergePatch) -> Result<MergeReport, ConfigError> {
    let mut report = MergeReport::default();

    let theme = child_object(config, "theme", "theme")?;
    let extend = child_object(theme, "extend", "theme.extend")?;

    let keyframes = child_object(extend, "keyframes", "theme.extend.keyframes")?;
    for (name, definition) in patch.keyframe_values() {
        match keyframes.insert(name, definition) {
            Some(_) => {
                tracing::warn!("Replacing existing keyframes '{}'", name);
                if keyframes.move_after_spreads(name) {
                    tracing::warn!("Moved keyframes '{}' after a spread that overrode it", name);
                }
                report.replaced_keyframes.push(name.to_string());
            }
            None => report.added_keyframes.push(name.to_string()),
        }
    }

    let animation = child_object(extend, "animation", "theme.extend.animation")?;
    for (name, shorthand) in patch.animation_values() {
        match animation.insert(name, shorthand) {
            Some(_) => {
                tracing::warn!("Replacing existing animation '{}'", name);
                if animation.move_after_spreads(name) {
                    tracing::warn!("Moved animation '{}' after a spread that overrode it", name);
                }
                report.replaced_animations.push(name.to_string());
            }
            None => report.added_animations.push(name.to_string()),
        }
    }

    Ok(report)
}

/// Get the object stored under `key`, creating it if absent.
fn child_object<'o>(
    parent: &'o mut Object,
    key: &str,
    path: &str,
) -> Result<&'o mut Object, ConfigError> {
    if !parent.contains_key(key) {
        let shorthand = parent
            .entries()
            .iter()
            .any(|e| matches!(e, Entry::Verbatim(src) if src.trim() == key));
        if shorthand {
            return Err(ConfigError::parse(
                "<source>",
                format!("`{}` is a shorthand reference, not an object literal; cannot merge", path),
            ));
        }
        parent.insert(key, ConfigValue::Object(Object::new()));
    }

    match parent.get_mut(key) {
        Some(ConfigValue::Object(object)) => Ok(object),
        Some(other) => Err(ConfigError::parse(
            "<source>",
            format!("`{}` is {}, not an object literal; cannot merge", path, other.kind()),
        )),
        None => Err(ConfigError::parse(
            "<source>",
            format!("`{}` could not be created", path),
        )),
    }
}
