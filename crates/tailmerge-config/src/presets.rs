//! Built-in animation presets used by the component library.

use serde_json::json;

use crate::patch::MergePatch;

/// A named, built-in merge patch.
#[derive(Debug, Clone)]
pub struct Preset {
    /// Preset name, as accepted on the command line
    pub name: &'static str,

    /// One-line summary
    pub description: &'static str,

    /// Entries the preset installs
    pub patch: MergePatch,
}

/// Names of all presets, in display order.
pub const PRESET_NAMES: &[&str] = &["accordion", "collapsible", "fade", "slide", "pulse"];

/// Look up a preset by name.
pub fn get(name: &str) -> Option<Preset> {
    let preset = match name {
        "accordion" => Preset {
            name: "accordion",
            description: "Accordion content open/close",
            patch: MergePatch::new()
                .with_keyframes(
                    "accordion-down",
                    json!({
                        "from": { "height": "0" },
                        "to": { "height": "var(--radix-accordion-content-height)" }
                    }),
                )
                .with_keyframes(
                    "accordion-up",
                    json!({
                        "from": { "height": "var(--radix-accordion-content-height)" },
                        "to": { "height": "0" }
                    }),
                )
                .with_animation("accordion-down", "accordion-down 0.2s ease-out")
                .with_animation("accordion-up", "accordion-up 0.2s ease-out"),
        },
        "collapsible" => Preset {
            name: "collapsible",
            description: "Collapsible content open/close",
            patch: MergePatch::new()
                .with_keyframes(
                    "collapsible-down",
                    json!({
                        "from": { "height": "0" },
                        "to": { "height": "var(--radix-collapsible-content-height)" }
                    }),
                )
                .with_keyframes(
                    "collapsible-up",
                    json!({
                        "from": { "height": "var(--radix-collapsible-content-height)" },
                        "to": { "height": "0" }
                    }),
                )
                .with_animation("collapsible-down", "collapsible-down 0.2s ease-out")
                .with_animation("collapsible-up", "collapsible-up 0.2s ease-out"),
        },
        "fade" => Preset {
            name: "fade",
            description: "Opacity fade in/out for overlays and cards",
            patch: MergePatch::new()
                .with_keyframes(
                    "fade-in",
                    json!({ "from": { "opacity": "0" }, "to": { "opacity": "1" } }),
                )
                .with_keyframes(
                    "fade-out",
                    json!({ "from": { "opacity": "1" }, "to": { "opacity": "0" } }),
                )
                .with_animation("fade-in", "fade-in 0.3s ease-out")
                .with_animation("fade-out", "fade-out 0.3s ease-in"),
        },
        "slide" => Preset {
            name: "slide",
            description: "Slide-in transitions for sliders and drawers",
            patch: MergePatch::new()
                .with_keyframes(
                    "slide-in-left",
                    json!({
                        "from": { "transform": "translateX(-100%)" },
                        "to": { "transform": "translateX(0)" }
                    }),
                )
                .with_keyframes(
                    "slide-in-right",
                    json!({
                        "from": { "transform": "translateX(100%)" },
                        "to": { "transform": "translateX(0)" }
                    }),
                )
                .with_keyframes(
                    "slide-in-up",
                    json!({
                        "from": { "transform": "translateY(100%)", "opacity": "0" },
                        "to": { "transform": "translateY(0)", "opacity": "1" }
                    }),
                )
                .with_animation("slide-in-left", "slide-in-left 0.3s ease-out")
                .with_animation("slide-in-right", "slide-in-right 0.3s ease-out")
                .with_animation("slide-in-up", "slide-in-up 0.4s ease-out"),
        },
        "pulse" => Preset {
            name: "pulse",
            description: "Soft scale pulse for buttons and badges",
            patch: MergePatch::new()
                .with_keyframes(
                    "soft-pulse",
                    json!({
                        "0%, 100%": { "transform": "scale(1)", "opacity": "1" },
                        "50%": { "transform": "scale(1.05)", "opacity": "0.85" }
                    }),
                )
                .with_animation("soft-pulse", "soft-pulse 2s ease-in-out infinite"),
        },
        _ => return None,
    };

    Some(preset)
}

/// All presets, in display order.
pub fn all() -> Vec<Preset> {
    PRESET_NAMES.iter().filter_map(|name| get(name)).collect()
}
