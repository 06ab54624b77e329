//! Create a starter Tailwind config in a project.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tailmerge_config::{find_config, ConfigError};

use crate::InitFormat;

/// Run the init command.
pub fn run(root: Option<PathBuf>, format: InitFormat, yes: bool) -> Result<()> {
    let root = match root {
        Some(root) => root,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    // Check if a config already exists
    match find_config(&root) {
        Ok(existing) if !yes => {
            tracing::warn!(
                "{} already exists. Use --yes to overwrite.",
                existing.path.display()
            );
            return Ok(());
        }
        Ok(_) | Err(ConfigError::ConfigNotFound { .. }) => {}
        Err(e) => return Err(e.into()),
    }

    let (name, content) = match format {
        InitFormat::Esm => ("tailwind.config.ts", DEFAULT_TS_CONFIG),
        InitFormat::Cjs => ("tailwind.config.js", DEFAULT_JS_CONFIG),
    };

    let path = root.join(name);
    fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Created {}", path.display());
    tracing::info!("Run 'tailmerge merge --preset <name>' to install animations.");

    Ok(())
}

const DEFAULT_TS_CONFIG: &str = r#"import type { Config } from 'tailwindcss'

export default {
  darkMode: ['class'],
  content: ['./index.html', './src/**/*.{ts,tsx}'],
  theme: {
    extend: {
      keyframes: {},
      animation: {},
    },
  },
  plugins: [],
} satisfies Config
"#;

const DEFAULT_JS_CONFIG: &str = r#"/** @type {import('tailwindcss').Config} */
module.exports = {
  darkMode: ['class'],
  content: ['./index.html', './src/**/*.{js,jsx}'],
  theme: {
    extend: {
      keyframes: {},
      animation: {},
    },
  },
  plugins: [],
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tailmerge_config::{extract_config, transform, ConfigFlavor, MergePatch, ModuleFormat};
    use tempfile::tempdir;

    #[test]
    fn starter_configs_are_fixed_points() {
        for (source, flavor, format) in [
            (DEFAULT_TS_CONFIG, ConfigFlavor::TypeScript, ModuleFormat::EsModule),
            (DEFAULT_JS_CONFIG, ConfigFlavor::JavaScript, ModuleFormat::CommonJs),
        ] {
            let extracted = extract_config(source, flavor).unwrap();
            assert_eq!(extracted.format, format);

            let merged = transform(source, flavor, &MergePatch::new()).unwrap();
            assert_eq!(merged.text, source);
        }
    }

    #[test]
    fn writes_config_for_format() {
        let temp = tempdir().unwrap();

        run(Some(temp.path().to_path_buf()), InitFormat::Cjs, false).unwrap();

        let written = fs::read_to_string(temp.path().join("tailwind.config.js")).unwrap();
        assert_eq!(written, DEFAULT_JS_CONFIG);
    }

    #[test]
    fn keeps_existing_config_without_yes() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("tailwind.config.ts");
        fs::write(&path, "export default {}\n").unwrap();

        run(Some(temp.path().to_path_buf()), InitFormat::Esm, false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "export default {}\n");

        run(Some(temp.path().to_path_buf()), InitFormat::Esm, true).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), DEFAULT_TS_CONFIG);
    }
}
