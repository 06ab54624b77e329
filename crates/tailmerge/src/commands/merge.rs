//! Merge keyframes and animations into the project's Tailwind config.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tailmerge_config::{presets, ConfigMerger, MergePatch};

/// Combine the requested presets and patch file into one patch.
///
/// Presets apply in the order given; the patch file wins over all of them.
fn build_patch(patch_file: Option<&Path>, preset_names: &[String]) -> Result<MergePatch> {
    let mut patch = MergePatch::new();

    for name in preset_names {
        let preset = presets::get(name).with_context(|| {
            format!(
                "Unknown preset '{}'. Available: {}",
                name,
                presets::PRESET_NAMES.join(", ")
            )
        })?;
        patch.extend(preset.patch);
    }

    if let Some(path) = patch_file {
        let file_patch = MergePatch::load(path)
            .with_context(|| format!("Failed to load patch {}", path.display()))?;
        tracing::info!("Loaded patch from {}", path.display());
        patch.extend(file_patch);
    }

    Ok(patch)
}

/// Run the merge command.
pub fn run(
    root: Option<PathBuf>,
    patch_file: Option<PathBuf>,
    preset_names: Vec<String>,
    dry_run: bool,
) -> Result<()> {
    let patch = build_patch(patch_file.as_deref(), &preset_names)?;
    if patch.is_empty() {
        tracing::warn!("Patch is empty; the config will only be reformatted");
    }

    let merger = match root {
        Some(root) => ConfigMerger::new(root),
        None => ConfigMerger::current_dir()?,
    };

    if dry_run {
        let (file, transformed) = merger.dry_run(&patch)?;
        tracing::info!(
            "Dry run: {} ({}) would gain {} entries",
            file.path.display(),
            transformed.format,
            transformed.report.total()
        );
        print!("{}", transformed.text);
        return Ok(());
    }

    let outcome = merger.merge(&patch)?;
    let report = &outcome.report;

    for name in &report.added_keyframes {
        tracing::info!("Added keyframes '{}'", name);
    }
    for name in &report.added_animations {
        tracing::info!("Added animation '{}'", name);
    }
    if !outcome.changed {
        tracing::info!("{} already up to date", outcome.path.display());
    }

    tracing::info!(
        "Updated {} ({}): {} added, {} replaced",
        outcome.path.display(),
        outcome.format,
        report.added_keyframes.len() + report.added_animations.len(),
        report.replaced_keyframes.len() + report.replaced_animations.len()
    );

    Ok(())
}
