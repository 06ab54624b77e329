//! The config merger: locate, extract, merge, serialize, persist.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::ConfigError;
use crate::extract::{extract_config, ConfigFlavor, ModuleFormat};
use crate::locate::{find_config, ConfigFile};
use crate::merge::{apply_patch, MergeReport};
use crate::patch::MergePatch;
use crate::serialize::splice_config;

/// Result of the pure text transform.
#[derive(Debug, Clone)]
pub struct Transformed {
    /// New file contents
    pub text: String,

    /// Export style of the config
    pub format: ModuleFormat,

    /// Entries added or replaced
    pub report: MergeReport,
}

/// Result of merging into a config file on disk.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// File that was rewritten
    pub path: PathBuf,

    /// Export style of the config
    pub format: ModuleFormat,

    /// Entries added or replaced
    pub report: MergeReport,

    /// Whether the new contents differ from the old ones
    pub changed: bool,
}

/// Merge `patch` into the config source text.
///
/// This is the whole merge without any I/O. The output is checked to
/// re-extract cleanly before it is returned.
pub fn transform(
    source: &str,
    flavor: ConfigFlavor,
    patch: &MergePatch,
) -> Result<Transformed, ConfigError> {
    patch.validate()?;

    let extracted = extract_config(source, flavor)?;
    let mut object = extracted.object.clone();
    let report = apply_patch(&mut object, patch)?;
    let text = splice_config(source, &extracted, &object);

    extract_config(&text, flavor).map_err(|e| {
        ConfigError::parse("<source>", format!("merged output does not re-parse: {}", e))
    })?;

    Ok(Transformed {
        text,
        format: extracted.format,
        report,
    })
}

/// Merges patches into the config file of one project.
#[derive(Debug, Clone)]
pub struct ConfigMerger {
    root: PathBuf,
}

impl ConfigMerger {
    /// Create a merger for the project at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create a merger for the current working directory.
    pub fn current_dir() -> Result<Self, ConfigError> {
        let root = std::env::current_dir().map_err(|source| ConfigError::ConfigReadError {
            path: PathBuf::from("."),
            source,
        })?;
        Ok(Self::new(root))
    }

    /// Project root this merger works on.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Locate the config file without reading it.
    pub fn locate(&self) -> Result<ConfigFile, ConfigError> {
        find_config(&self.root)
    }

    /// Compute the merged file contents without writing them.
    pub fn dry_run(&self, patch: &MergePatch) -> Result<(ConfigFile, Transformed), ConfigError> {
        let file = self.locate()?;
        let source = read_config(&file.path)?;
        let transformed =
            transform(&source, file.flavor, patch).map_err(|e| e.with_path(&file.path))?;
        Ok((file, transformed))
    }

    /// Merge `patch` into the config file and write it back.
    ///
    /// The file is replaced atomically; on any error it is left untouched.
    pub fn merge(&self, patch: &MergePatch) -> Result<MergeOutcome, ConfigError> {
        let file = self.locate()?;
        let source = read_config(&file.path)?;
        let transformed =
            transform(&source, file.flavor, patch).map_err(|e| e.with_path(&file.path))?;

        persist(&file.path, &transformed.text)?;

        tracing::info!(
            "Merged {} keyframes and {} animations into {}",
            transformed.report.added_keyframes.len() + transformed.report.replaced_keyframes.len(),
            transformed.report.added_animations.len()
                + transformed.report.replaced_animations.len(),
            file.path.display()
        );

        Ok(MergeOutcome {
            changed: transformed.text != source,
            path: file.path,
            format: transformed.format,
            report: transformed.report,
        })
    }
}

/// Merge `patch` into the config under `project_root` (or the current directory).
pub fn merge_config(
    patch: &MergePatch,
    project_root: Option<&Path>,
) -> Result<MergeOutcome, ConfigError> {
    let merger = match project_root {
        Some(root) => ConfigMerger::new(root),
        None => ConfigMerger::current_dir()?,
    };
    merger.merge(patch)
}

fn read_config(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::ConfigReadError {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `text` to a sibling temp file, then rename it over `path`.
fn persist(path: &Path, text: &str) -> Result<(), ConfigError> {
    let write_error = |source: std::io::Error| ConfigError::ConfigWriteError {
        path: path.to_path_buf(),
        source,
    };

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir).map_err(write_error)?;
    tmp.write_all(text.as_bytes()).map_err(write_error)?;
    tmp.as_file().sync_all().map_err(write_error)?;

    if let Ok(metadata) = fs::metadata(path) {
        tmp.as_file()
            .set_permissions(metadata.permissions())
            .map_err(write_error)?;
    }

    tmp.persist(path).map_err(|e| write_error(e.error))?;
    tracing::debug!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::tempdir;

    const TS_CONFIG: &str = r#"import type { Config } from "tailwindcss";

const config: Config = {
  darkMode: ["class"],
  content: ["./src/**/*.{ts,tsx}"],
  theme: {
    extend: {
      colors: { border: "hsl(var(--border))" },
      animation: { spin: "spin 1s linear" },
    },
  },
  plugins: [require("tailwindcss-animate")],
};

export default config;
"#;

    const JS_CONFIG: &str = r#"/** @type {import('tailwindcss').Config} */
module.exports = {
  content: ['./index.html'],
  theme: {
    extend: {
      keyframes: {
        fadeIn: { from: { opacity: 0 }, to: { opacity: 1 } },
      },
    },
  },
}
"#;

    fn bounce_patch() -> MergePatch {
        MergePatch::new()
            .with_animation("bounce", "bounce 0.5s ease")
            .with_keyframes(
                "bounce",
                json!({
                    "0%": { "transform": "translateY(0)" },
                    "50%": { "transform": "translateY(-10px)" }
                }),
            )
    }

    fn extend_section(text: &str, flavor: ConfigFlavor, key: &str) -> crate::value::Object {
        let extracted = extract_config(text, flavor).unwrap();
        extracted
            .object
            .get("theme")
            .and_then(|v| v.as_object())
            .and_then(|t| t.get("extend"))
            .and_then(|v| v.as_object())
            .and_then(|e| e.get(key))
            .and_then(|v| v.as_object())
            .cloned()
            .unwrap()
    }

    #[test]
    fn merges_example_scenario() {
        let result = transform(TS_CONFIG, ConfigFlavor::TypeScript, &bounce_patch()).unwrap();

        let animation = extend_section(&result.text, ConfigFlavor::TypeScript, "animation");
        assert_eq!(animation.keys().collect::<Vec<_>>(), vec!["spin", "bounce"]);
        assert_eq!(
            animation.get("bounce").and_then(|v| v.as_str()),
            Some("bounce 0.5s ease")
        );

        let keyframes = extend_section(&result.text, ConfigFlavor::TypeScript, "keyframes");
        assert!(keyframes.contains_key("bounce"));

        assert!(result.text.starts_with("import type { Config } from \"tailwindcss\";\n\nconst config: Config = {\n"));
        assert!(result.text.ends_with("};\n\nexport default config;\n"));
        assert!(result.text.contains("plugins: [require(\"tailwindcss-animate\")],"));
        assert_eq!(result.format, ModuleFormat::EsModule);
    }

    #[test]
    fn preserves_unrelated_keys() {
        let before = extract_config(TS_CONFIG, ConfigFlavor::TypeScript).unwrap().object;

        let result = transform(TS_CONFIG, ConfigFlavor::TypeScript, &bounce_patch()).unwrap();
        let after = extract_config(&result.text, ConfigFlavor::TypeScript).unwrap().object;

        for key in ["darkMode", "content", "plugins"] {
            assert_eq!(before.get(key), after.get(key), "{} changed", key);
        }
        let colors = |o: &crate::value::Object| {
            o.get("theme")
                .and_then(|v| v.as_object())
                .and_then(|t| t.get("extend"))
                .and_then(|v| v.as_object())
                .and_then(|e| e.get("colors"))
                .cloned()
        };
        assert_eq!(colors(&before), colors(&after));
    }

    #[test]
    fn merging_twice_is_idempotent() {
        let once = transform(JS_CONFIG, ConfigFlavor::JavaScript, &bounce_patch()).unwrap();
        let twice = transform(&once.text, ConfigFlavor::JavaScript, &bounce_patch()).unwrap();

        assert_eq!(once.text, twice.text);
        assert_eq!(twice.report.replaced_animations, vec!["bounce"]);
    }

    #[test]
    fn empty_patch_is_fixed_point_of_output() {
        let merged = transform(JS_CONFIG, ConfigFlavor::JavaScript, &bounce_patch()).unwrap();
        let again = transform(&merged.text, ConfigFlavor::JavaScript, &MergePatch::new()).unwrap();

        assert_eq!(merged.text, again.text);
        assert_eq!(again.report.total(), 0);
    }

    const VARIED_CONFIG: &str = r#"const base = require('./base');

module.exports = {
  ...base,
  prefix: 'tw-',
  quoted: 'it\'s',
  tab: "a\tb",
  lone: '\uD800x',
  spacing: { .5: '2px', 0x10: '4rem', 1e3: 'huge', 'px': '1px' },
  holes: [1,,],
  gaps: [,],
  sparse: ['a', , 'b'],
  negative: -1,
  nothing: null,
  important: false,
  template: `${base.prefix}-x`,
  matcher: /^bg-/,
  safelist: ['p-1', { pattern: /m-\d/ }],
  build() { return 1; },
  [base.key]: true,
  theme: {
    extend: {
      colors: { brand: '#000', ...base.colors },
    },
  },
};
"#;

    #[test]
    fn untouched_keys_survive_varied_literals() {
        let before = extract_config(VARIED_CONFIG, ConfigFlavor::JavaScript).unwrap().object;

        let result = transform(VARIED_CONFIG, ConfigFlavor::JavaScript, &bounce_patch()).unwrap();
        let after = extract_config(&result.text, ConfigFlavor::JavaScript).unwrap().object;

        for key in before.keys().filter(|k| *k != "theme") {
            assert_eq!(before.get(key), after.get(key), "{} changed", key);
        }
        let verbatim = |o: &crate::value::Object| {
            o.entries()
                .iter()
                .filter(|e| matches!(e, crate::value::Entry::Verbatim(_)))
                .cloned()
                .collect::<Vec<_>>()
        };
        assert_eq!(verbatim(&before), verbatim(&after));
        assert_eq!(
            extend_section(VARIED_CONFIG, ConfigFlavor::JavaScript, "colors"),
            extend_section(&result.text, ConfigFlavor::JavaScript, "colors")
        );

        let again = transform(&result.text, ConfigFlavor::JavaScript, &bounce_patch()).unwrap();
        assert_eq!(result.text, again.text);
    }

    #[test]
    fn keeps_commonjs_export_style() {
        let result = transform(JS_CONFIG, ConfigFlavor::JavaScript, &bounce_patch()).unwrap();

        assert_eq!(result.format, ModuleFormat::CommonJs);
        assert!(result.text.starts_with(
            "/** @type {import('tailwindcss').Config} */\nmodule.exports = {\n  content: ['./index.html'],\n"
        ));
        let keyframes = extend_section(&result.text, ConfigFlavor::JavaScript, "keyframes");
        assert_eq!(keyframes.keys().collect::<Vec<_>>(), vec!["fadeIn", "bounce"]);
    }

    #[test]
    fn patch_replaces_existing_keyframes() {
        let patch = MergePatch::new().with_keyframes(
            "fadeIn",
            json!({ "0%": { "opacity": "0" }, "100%": { "opacity": "1" } }),
        );

        let result = transform(JS_CONFIG, ConfigFlavor::JavaScript, &patch).unwrap();

        assert!(result.text.contains("        fadeIn: {\n          '0%': {\n            opacity: '0',"));
        assert_eq!(result.report.replaced_keyframes, vec!["fadeIn"]);
    }

    #[test]
    fn merge_writes_file_in_place() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("tailwind.config.ts");
        fs::write(&path, TS_CONFIG).unwrap();

        let outcome = ConfigMerger::new(temp.path()).merge(&bounce_patch()).unwrap();

        assert_eq!(outcome.path, path);
        assert!(outcome.changed);
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("bounce: 'bounce 0.5s ease',"));
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
    }

    #[test]
    fn merge_config_with_missing_file_creates_nothing() {
        let temp = tempdir().unwrap();

        let result = merge_config(&bounce_patch(), Some(temp.path()));

        assert!(matches!(result, Err(ConfigError::ConfigNotFound { .. })));
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn parse_failure_leaves_file_untouched() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("tailwind.config.js");
        let original = "module.exports = loadConfig();\n";
        fs::write(&path, original).unwrap();

        let result = ConfigMerger::new(temp.path()).merge(&bounce_patch());

        assert!(matches!(
            result,
            Err(ConfigError::ConfigParseError { path: ref p, .. }) if *p == path
        ));
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
    }

    #[test]
    fn dry_run_does_not_write() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("tailwind.config.js");
        fs::write(&path, JS_CONFIG).unwrap();

        let (file, transformed) = ConfigMerger::new(temp.path())
            .dry_run(&bounce_patch())
            .unwrap();

        assert_eq!(file.path, path);
        assert!(transformed.text.contains("bounce"));
        assert_eq!(fs::read_to_string(&path).unwrap(), JS_CONFIG);
    }

    #[cfg(unix)]
    #[test]
    fn write_failure_is_reported() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempdir().unwrap();
        let path = temp.path().join("tailwind.config.js");
        fs::write(&path, JS_CONFIG).unwrap();
        fs::set_permissions(temp.path(), fs::Permissions::from_mode(0o555)).unwrap();

        let result = ConfigMerger::new(temp.path()).merge(&bounce_patch());

        fs::set_permissions(temp.path(), fs::Permissions::from_mode(0o755)).unwrap();
        // Root ignores directory permissions, so only check when the write was refused.
        if let Err(err) = result {
            assert!(matches!(err, ConfigError::ConfigWriteError { .. }));
            assert_eq!(fs::read_to_string(&path).unwrap(), JS_CONFIG);
        }
    }
}
