//! List built-in presets.

use tailmerge_config::presets;

/// Run the presets command.
pub fn run() {
    for preset in presets::all() {
        println!("{:<12} {}", preset.name, preset.description);
        println!(
            "{:<12}   keyframes: {}",
            "",
            preset.patch.keyframes.keys().cloned().collect::<Vec<_>>().join(", ")
        );
        println!(
            "{:<12}   animation: {}",
            "",
            preset.patch.animation.keys().cloned().collect::<Vec<_>>().join(", ")
        );
    }
}
