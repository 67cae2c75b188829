use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};

use crate::loader::SectionStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeVariant {
    #[default]
    Dark,
    Light,
}

/// Colors shared by every widget
#[derive(Debug, Clone, PartialEq)]
pub struct ColorPalette {
    pub background: Color,
    pub surface: Color,

    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,

    pub border: Color,
    pub border_focused: Color,
    pub selection: Color,
    pub selection_text: Color,

    // Status colors
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,

    pub accent: Color,
    pub disabled: Color,
}

impl ColorPalette {
    pub fn professional_dark() -> Self {
        Self {
            background: Color::Rgb(16, 16, 20),
            surface: Color::Rgb(24, 24, 28),

            text_primary: Color::Rgb(224, 224, 230),
            text_secondary: Color::Rgb(160, 160, 168),
            text_muted: Color::Rgb(112, 112, 120),

            border: Color::Rgb(64, 64, 72),
            border_focused: Color::Rgb(88, 166, 255),
            selection: Color::Rgb(88, 166, 255),
            selection_text: Color::Rgb(16, 16, 20),

            success: Color::Rgb(76, 175, 80),
            warning: Color::Rgb(255, 193, 7),
            error: Color::Rgb(244, 67, 54),
            info: Color::Rgb(33, 150, 243),

            accent: Color::Rgb(88, 166, 255),
            disabled: Color::Rgb(96, 96, 104),
        }
    }

    pub fn professional_light() -> Self {
        Self {
            background: Color::Rgb(250, 250, 252),
            surface: Color::Rgb(242, 242, 245),

            text_primary: Color::Rgb(32, 32, 40),
            text_secondary: Color::Rgb(96, 96, 104),
            text_muted: Color::Rgb(144, 144, 152),

            border: Color::Rgb(208, 208, 216),
            border_focused: Color::Rgb(0, 122, 255),
            selection: Color::Rgb(0, 122, 255),
            selection_text: Color::Rgb(250, 250, 252),

            success: Color::Rgb(52, 199, 89),
            warning: Color::Rgb(255, 149, 0),
            error: Color::Rgb(255, 59, 48),
            info: Color::Rgb(0, 122, 255),

            accent: Color::Rgb(0, 122, 255),
            disabled: Color::Rgb(174, 174, 178),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub variant: ThemeVariant,
    pub palette: ColorPalette,
}

impl Default for Theme {
    fn default() -> Self {
        Self::new(ThemeVariant::default())
    }
}

impl Theme {
    pub fn new(variant: ThemeVariant) -> Self {
        let palette = match variant {
            ThemeVariant::Dark => ColorPalette::professional_dark(),
            ThemeVariant::Light => ColorPalette::professional_light(),
        };
        Self { variant, palette }
    }

    /// Accent color for a section status
    pub fn status_color(&self, status: SectionStatus) -> Color {
        match status {
            SectionStatus::Idle => self.palette.text_muted,
            SectionStatus::Loading => self.palette.info,
            SectionStatus::Ready => self.palette.success,
            SectionStatus::Error => self.palette.error,
        }
    }

    pub fn text(&self) -> Style {
        Style::default().fg(self.palette.text_primary)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.palette.text_muted)
    }

    pub fn border(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.palette.border_focused)
        } else {
            Style::default().fg(self.palette.border)
        }
    }

    pub fn selected(&self) -> Style {
        Style::default()
            .fg(self.palette.selection_text)
            .bg(self.palette.selection)
            .add_modifier(Modifier::BOLD)
    }

    pub fn header(&self) -> Style {
        Style::default()
            .fg(self.palette.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn bar(&self) -> Style {
        Style::default()
            .fg(self.palette.text_secondary)
            .bg(self.palette.surface)
    }
}
