//! Style variants and colour presets offered by the studio

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Quick-pick foreground colours
pub const COLOR_PRESETS: [&str; 12] = [
    "#000000", "#ffffff", "#1a73e8", "#DC3545", "#28A745", "#FFC107", "#6F42C1", "#17A2B8",
    "#FD7E14", "#E83E8C", "#20C997", "#6610F2",
];

/// Dot / corner shape preset applied uniformly to a generated code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DotStyle {
    /// Modules merge into their neighbours with rounded outer corners
    #[default]
    Rounded,
    /// Plain square modules
    Square,
    /// Every module drawn as a circle
    Dots,
    /// Top-left and bottom-right corners rounded
    Classy,
    /// Classy with extra rounding on exposed corners
    ClassyRounded,
}

impl DotStyle {
    /// All variants in display order
    pub const ALL: [DotStyle; 5] = [
        DotStyle::Rounded,
        DotStyle::Square,
        DotStyle::Dots,
        DotStyle::Classy,
        DotStyle::ClassyRounded,
    ];

    /// Stable identifier used in config files and on the command line
    pub fn key(self) -> &'static str {
        match self {
            DotStyle::Rounded => "rounded",
            DotStyle::Square => "square",
            DotStyle::Dots => "dots",
            DotStyle::Classy => "classy",
            DotStyle::ClassyRounded => "classy-rounded",
        }
    }

    /// Human-readable name
    pub fn name(self) -> &'static str {
        match self {
            DotStyle::Rounded => "Rounded",
            DotStyle::Square => "Square",
            DotStyle::Dots => "Dots",
            DotStyle::Classy => "Classy",
            DotStyle::ClassyRounded => "Classy Rounded",
        }
    }

    /// Single glyph hinting at the shape
    pub fn preview(self) -> char {
        match self {
            DotStyle::Rounded => '●',
            DotStyle::Square => '■',
            DotStyle::Dots => '•',
            DotStyle::Classy => '◆',
            DotStyle::ClassyRounded => '◇',
        }
    }
}

impl fmt::Display for DotStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for DotStyle {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        DotStyle::ALL
            .into_iter()
            .find(|style| style.key() == normalized)
            .ok_or_else(|| {
                format!(
                    "Unknown style '{value}', expected one of: {}",
                    DotStyle::ALL.map(DotStyle::key).join(", ")
                )
            })
    }
}
