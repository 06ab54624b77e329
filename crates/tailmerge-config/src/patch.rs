//! Merge patches: the keyframes and animations to install.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ConfigError;
use crate::value::ConfigValue;

/// Keyframes and animation entries to merge into `theme.extend`.
///
/// ```json
/// {
///   "keyframes": { "bounce": { "0%": { "transform": "translateY(0)" } } },
///   "animation": { "bounce": "bounce 0.5s ease" }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MergePatch {
    /// Keyframe name -> percentage/`from`/`to` -> CSS properties
    #[serde(default)]
    pub keyframes: Map<String, Value>,

    /// Animation name -> shorthand string
    #[serde(default)]
    pub animation: Map<String, Value>,
}

impl MergePatch {
    /// Create an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a keyframes definition.
    pub fn with_keyframes(mut self, name: impl Into<String>, definition: Value) -> Self {
        self.keyframes.insert(name.into(), definition);
        self
    }

    /// Add an animation shorthand.
    pub fn with_animation(mut self, name: impl Into<String>, shorthand: impl Into<String>) -> Self {
        self.animation
            .insert(name.into(), Value::String(shorthand.into()));
        self
    }

    /// Whether the patch has no entries at all.
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty() && self.animation.is_empty()
    }

    /// Combine another patch into this one; `other` wins on collisions.
    pub fn extend(&mut self, other: MergePatch) {
        self.keyframes.extend(other.keyframes);
        self.animation.extend(other.animation);
    }

    /// Decode a patch from JSON.
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let patch: MergePatch =
            serde_json::from_str(content).map_err(|e| ConfigError::PatchError(e.to_string()))?;
        patch.validate()?;
        Ok(patch)
    }

    /// Decode a patch from TOML.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let patch: MergePatch =
            toml::from_str(content).map_err(|e| ConfigError::PatchError(e.to_string()))?;
        patch.validate()?;
        Ok(patch)
    }

    /// Load a patch file, choosing the decoder by extension.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::PatchError(format!("failed to read {}: {}", path.display(), e))
        })?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content),
            Some("toml") => Self::from_toml_str(&content),
            _ => Err(ConfigError::PatchError(format!(
                "unsupported patch file {}: expected .json or .toml",
                path.display()
            ))),
        }
    }

    /// Check the patch shape.
    ///
    /// Keyframe definitions must be objects and animations must be strings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, definition) in &self.keyframes {
            check_name("keyframes", name)?;
            if !definition.is_object() {
                return Err(ConfigError::PatchError(format!(
                    "keyframes.{} must be an object of steps",
                    name
                )));
            }
        }

        for (name, shorthand) in &self.animation {
            check_name("animation", name)?;
            if !shorthand.is_string() {
                return Err(ConfigError::PatchError(format!(
                    "animation.{} must be a string",
                    name
                )));
            }
        }

        Ok(())
    }

    /// Keyframe entries converted to config values.
    pub(crate) fn keyframe_values(&self) -> impl Iterator<Item = (&str, ConfigValue)> + '_ {
        self.keyframes
            .iter()
            .map(|(name, value)| (name.as_str(), ConfigValue::from(value.clone())))
    }

    /// Animation entries converted to config values.
    pub(crate) fn animation_values(&self) -> impl Iterator<Item = (&str, ConfigValue)> + '_ {
        self.animation
            .iter()
            .map(|(name, value)| (name.as_str(), ConfigValue::from(value.clone())))
    }
}

fn check_name(section: &str, name: &str) -> Result<(), ConfigError> {
    if name.trim().is_empty() {
        return Err(ConfigError::PatchError(format!(
            "{} entry has an empty name",
            section
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn decodes_json_patch() {
        let patch = MergePatch::from_json_str(
            r#"{
                "animation": { "bounce": "bounce 0.5s ease" },
                "keyframes": { "bounce": { "0%": { "transform": "translateY(0)" } } }
            }"#,
        )
        .unwrap();

        assert_eq!(patch.animation["bounce"], "bounce 0.5s ease");
        assert!(patch.keyframes["bounce"]["0%"].is_object());
    }

    #[test]
    fn decodes_toml_patch() {
        let patch = MergePatch::from_toml_str(
            r#"
[animation]
fade-in = "fade-in 0.2s ease-out"

[keyframes.fade-in.from]
opacity = "0"

[keyframes.fade-in.to]
opacity = "1"
"#,
        )
        .unwrap();

        assert_eq!(patch.animation["fade-in"], "fade-in 0.2s ease-out");
        let steps: Vec<_> = patch.keyframes["fade-in"]
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(steps, vec!["from", "to"]);
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let patch = MergePatch::from_json_str("{}").unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn rejects_non_string_animation() {
        let result = MergePatch::from_json_str(r#"{ "animation": { "spin": 3 } }"#);
        assert!(matches!(result, Err(ConfigError::PatchError(ref m)) if m.contains("animation.spin")));
    }

    #[test]
    fn rejects_non_object_keyframes() {
        let result = MergePatch::from_json_str(r#"{ "keyframes": { "spin": "nope" } }"#);
        assert!(matches!(result, Err(ConfigError::PatchError(_))));
    }

    #[test]
    fn extend_prefers_other() {
        let mut base = MergePatch::new()
            .with_animation("spin", "spin 1s linear")
            .with_animation("ping", "ping 1s");
        base.extend(MergePatch::new().with_animation("spin", "spin 3s linear"));

        assert_eq!(base.animation["spin"], "spin 3s linear");
        assert_eq!(base.animation.len(), 2);
    }

    #[test]
    fn load_picks_decoder_by_extension() {
        let temp = tempdir().unwrap();
        let json_path = temp.path().join("patch.json");
        fs::write(&json_path, r#"{ "animation": { "spin": "spin 1s" } }"#).unwrap();
        let yaml_path = temp.path().join("patch.yaml");
        fs::write(&yaml_path, "animation: {}").unwrap();

        assert_eq!(
            MergePatch::load(&json_path).unwrap(),
            MergePatch::new().with_animation("spin", "spin 1s")
        );
        assert!(matches!(
            MergePatch::load(&yaml_path),
            Err(ConfigError::PatchError(_))
        ));
    }

    #[test]
    fn builder_keeps_definitions() {
        let patch = MergePatch::new().with_keyframes("fade", json!({ "from": { "opacity": "0" } }));
        assert_eq!(patch.keyframe_values().count(), 1);
    }
}
