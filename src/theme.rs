// Theme context shared by all renderers.
// One instance lives on the App and is passed down by reference.

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

/// Colors used by the renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub fg: Color,
    pub bg: Color,
    pub muted: Color,
    pub accent: Color,
    pub selected: Color,
    pub error: Color,
    pub highlight_bg: Color,
}

const LIGHT: Palette = Palette {
    fg: Color::Black,
    bg: Color::White,
    muted: Color::DarkGray,
    accent: Color::Blue,
    selected: Color::Rgb(187, 46, 31),
    error: Color::Red,
    highlight_bg: Color::Gray,
};

const DARK: Palette = Palette {
    fg: Color::White,
    bg: Color::Black,
    muted: Color::Gray,
    accent: Color::Cyan,
    selected: Color::Rgb(255, 191, 116),
    error: Color::LightRed,
    highlight_bg: Color::DarkGray,
};

/// Theme state owned by the application root.
#[derive(Debug, Clone, Default)]
pub struct ThemeContext {
    theme: Theme,
}

impl ThemeContext {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn toggle(&mut self) {
        self.theme = self.theme.toggled();
    }

    pub fn palette(&self) -> Palette {
        match self.theme {
            Theme::Light => LIGHT,
            Theme::Dark => DARK,
        }
    }
}
