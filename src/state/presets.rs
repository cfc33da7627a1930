//! Fixed registry of one-click timer presets

use serde::Serialize;

/// A named duration shortcut
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Preset {
    pub id: &'static str,
    pub minutes: u32,
    pub label: &'static str,
}

/// All presets offered to views, in display order
pub const PRESETS: &[Preset] = &[
    Preset { id: "focus-25", minutes: 25, label: "Focus" },
    Preset { id: "break-5", minutes: 5, label: "Break" },
    Preset { id: "break-15", minutes: 15, label: "Break" },
    Preset { id: "focus-45", minutes: 45, label: "Focus" },
    Preset { id: "focus-60", minutes: 60, label: "Focus" },
];

/// Label applied when a user enters their own duration
pub const CUSTOM_LABEL: &str = "Custom";

/// The preset a freshly created timer starts with
pub fn default_preset() -> &'static Preset {
    &PRESETS[0]
}

/// Look up a preset by its id
pub fn find(id: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|preset| preset.id == id)
}
