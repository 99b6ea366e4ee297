//! Theme system for the chat TUI
//!
//! Color palettes for every widget. Presets are selected through
//! `ui.theme` in the config file.

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Available theme presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemePreset {
    #[default]
    CatppuccinMocha,
    Nord,
    OneDark,
}

impl ThemePreset {
    pub fn display_name(&self) -> &'static str {
        match self {
            ThemePreset::CatppuccinMocha => "Catppuccin Mocha",
            ThemePreset::Nord => "Nord",
            ThemePreset::OneDark => "One Dark",
        }
    }
}

/// Color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    // Backgrounds
    pub bg_main: Color,
    pub bg_dark: Color,

    // Borders
    pub border: Color,
    pub border_focused: Color,

    // Text
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,

    // Accents
    pub cyan: Color,
    pub blue: Color,
    pub green: Color,
    pub yellow: Color,
    pub red: Color,

    // Messages
    pub user_bubble: Color,
    pub assistant_bubble: Color,
    pub user_bubble_bg: Color,
    pub assistant_bubble_bg: Color,
    /// Background of the selected message and of the highlighted excerpt
    pub highlight_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::catppuccin_mocha()
    }
}

impl Theme {
    pub fn from_preset(preset: ThemePreset) -> Self {
        match preset {
            ThemePreset::CatppuccinMocha => Self::catppuccin_mocha(),
            ThemePreset::Nord => Self::nord(),
            ThemePreset::OneDark => Self::one_dark(),
        }
    }

    /// Catppuccin Mocha theme
    pub fn catppuccin_mocha() -> Self {
        Self {
            bg_main: Color::Rgb(30, 30, 46), // base
            bg_dark: Color::Rgb(24, 24, 37), // mantle

            border: Color::Rgb(69, 71, 90),            // surface1
            border_focused: Color::Rgb(137, 180, 250), // blue

            text_primary: Color::Rgb(205, 214, 244),   // text
            text_secondary: Color::Rgb(166, 173, 200), // subtext0
            text_muted: Color::Rgb(108, 112, 134),     // overlay0

            cyan: Color::Rgb(148, 226, 213),   // teal
            blue: Color::Rgb(137, 180, 250),   // blue
            green: Color::Rgb(166, 227, 161),  // green
            yellow: Color::Rgb(249, 226, 175), // yellow
            red: Color::Rgb(243, 139, 168),    // red

            user_bubble: Color::Rgb(137, 180, 250),
            assistant_bubble: Color::Rgb(166, 227, 161),
            user_bubble_bg: Color::Rgb(35, 40, 60),
            assistant_bubble_bg: Color::Rgb(35, 50, 45),
            highlight_bg: Color::Rgb(69, 64, 50),
        }
    }

    /// Nord theme
    pub fn nord() -> Self {
        Self {
            bg_main: Color::Rgb(46, 52, 64), // nord0
            bg_dark: Color::Rgb(36, 41, 51),

            border: Color::Rgb(67, 76, 94),            // nord2
            border_focused: Color::Rgb(136, 192, 208), // nord8

            text_primary: Color::Rgb(236, 239, 244),   // nord6
            text_secondary: Color::Rgb(216, 222, 233), // nord4
            text_muted: Color::Rgb(97, 110, 136),

            cyan: Color::Rgb(143, 188, 187),   // nord7
            blue: Color::Rgb(129, 161, 193),   // nord9
            green: Color::Rgb(163, 190, 140),  // nord14
            yellow: Color::Rgb(235, 203, 139), // nord13
            red: Color::Rgb(191, 97, 106),     // nord11

            user_bubble: Color::Rgb(136, 192, 208),
            assistant_bubble: Color::Rgb(163, 190, 140),
            user_bubble_bg: Color::Rgb(52, 60, 76),
            assistant_bubble_bg: Color::Rgb(50, 60, 60),
            highlight_bg: Color::Rgb(76, 72, 60),
        }
    }

    /// One Dark theme
    pub fn one_dark() -> Self {
        Self {
            bg_main: Color::Rgb(40, 44, 52),
            bg_dark: Color::Rgb(33, 37, 43),

            border: Color::Rgb(53, 59, 69),
            border_focused: Color::Rgb(97, 175, 239),

            text_primary: Color::Rgb(171, 178, 191),
            text_secondary: Color::Rgb(152, 160, 173),
            text_muted: Color::Rgb(92, 99, 112),

            cyan: Color::Rgb(86, 182, 194),
            blue: Color::Rgb(97, 175, 239),
            green: Color::Rgb(152, 195, 121),
            yellow: Color::Rgb(229, 192, 123),
            red: Color::Rgb(224, 108, 117),

            user_bubble: Color::Rgb(97, 175, 239),
            assistant_bubble: Color::Rgb(152, 195, 121),
            user_bubble_bg: Color::Rgb(40, 50, 65),
            assistant_bubble_bg: Color::Rgb(45, 55, 48),
            highlight_bg: Color::Rgb(66, 60, 45),
        }
    }
}
