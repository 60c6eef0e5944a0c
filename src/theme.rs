use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};

/// A colour as written in settings: `"#rrggbb"`, a named terminal colour,
/// an `{ r, g, b }` table or a 256-colour index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThemeColor {
    Rgb { r: u8, g: u8, b: u8 },
    Indexed(u8),
    Spec(String),
}

impl ThemeColor {
    pub fn to_color(&self) -> Color {
        match self {
            ThemeColor::Rgb { r, g, b } => Color::Rgb(*r, *g, *b),
            ThemeColor::Indexed(idx) => Color::Indexed(*idx),
            ThemeColor::Spec(s) if s.starts_with('#') => Self::parse_hex(s),
            ThemeColor::Spec(s) => Self::parse_named(s),
        }
    }

    fn parse_named(name: &str) -> Color {
        match name.to_lowercase().as_str() {
            "black" => Color::Black,
            "red" => Color::Red,
            "green" => Color::Green,
            "yellow" => Color::Yellow,
            "blue" => Color::Blue,
            "magenta" => Color::Magenta,
            "cyan" => Color::Cyan,
            "gray" | "grey" => Color::Gray,
            "darkgray" | "darkgrey" | "dark_gray" => Color::DarkGray,
            "lightred" | "light_red" => Color::LightRed,
            "lightgreen" | "light_green" => Color::LightGreen,
            "lightyellow" | "light_yellow" => Color::LightYellow,
            "lightblue" | "light_blue" => Color::LightBlue,
            "lightmagenta" | "light_magenta" => Color::LightMagenta,
            "lightcyan" | "light_cyan" => Color::LightCyan,
            "white" => Color::White,
            _ => Color::Reset,
        }
    }

    fn parse_hex(hex: &str) -> Color {
        let hex = hex.trim_start_matches('#');
        if hex.len() == 6
            && let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            )
        {
            return Color::Rgb(r, g, b);
        }
        Color::Reset
    }
}

/// The `[theme]` settings table. Every field is optional and replaces the
/// matching palette entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg_primary: Option<ThemeColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg_selected: Option<ThemeColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_primary: Option<ThemeColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_secondary: Option<ThemeColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_muted: Option<ThemeColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<ThemeColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent: Option<ThemeColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<ThemeColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ThemeColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<ThemeColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<ThemeColor>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTheme {
    pub bg_primary: Color,
    pub bg_selected: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub border: Color,
    pub accent: Color,
    pub link: Color,
    pub error: Color,
    pub warning: Color,
    pub success: Color,
    pub depth_colors: Vec<Color>,
}

impl Default for ResolvedTheme {
    fn default() -> Self {
        Self {
            bg_primary: Color::Rgb(0x0f, 0x0f, 0x0f),
            bg_selected: Color::Rgb(0x36, 0x36, 0x36),
            text_primary: Color::Rgb(0xff, 0xff, 0xff),
            text_secondary: Color::Rgb(0xb3, 0xb3, 0xb3),
            text_muted: Color::Rgb(0x80, 0x80, 0x80),
            border: Color::Rgb(0x40, 0x40, 0x40),
            accent: Color::Rgb(0xff, 0x6b, 0x35),
            link: Color::Rgb(0x4a, 0x90, 0xe2),
            error: Color::Rgb(0xd9, 0x53, 0x4f),
            warning: Color::Rgb(0xf0, 0xad, 0x4e),
            success: Color::Rgb(0x5c, 0xb8, 0x5c),
            depth_colors: vec![
                Color::Cyan,
                Color::Green,
                Color::Yellow,
                Color::Magenta,
                Color::Blue,
                Color::Red,
            ],
        }
    }
}

impl ResolvedTheme {
    pub fn with_overrides(mut self, overrides: &ThemeOverrides) -> Self {
        let slots = [
            (&mut self.bg_primary, &overrides.bg_primary),
            (&mut self.bg_selected, &overrides.bg_selected),
            (&mut self.text_primary, &overrides.text_primary),
            (&mut self.text_secondary, &overrides.text_secondary),
            (&mut self.text_muted, &overrides.text_muted),
            (&mut self.border, &overrides.border),
            (&mut self.accent, &overrides.accent),
            (&mut self.link, &overrides.link),
            (&mut self.error, &overrides.error),
            (&mut self.warning, &overrides.warning),
            (&mut self.success, &overrides.success),
        ];
        for (slot, value) in slots {
            if let Some(color) = value {
                *slot = color.to_color();
            }
        }
        self
    }

    pub fn depth_color(&self, depth: usize) -> Color {
        if self.depth_colors.is_empty() {
            return self.accent;
        }
        self.depth_colors[depth % self.depth_colors.len()]
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn selection_style(&self) -> Style {
        Style::default().bg(self.bg_selected)
    }

    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.text_primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn text_style(&self) -> Style {
        Style::default().fg(self.text_primary)
    }

    pub fn secondary_style(&self) -> Style {
        Style::default().fg(self.text_secondary)
    }

    pub fn dim_style(&self) -> Style {
        Style::default().fg(self.text_muted)
    }

    pub fn link_style(&self) -> Style {
        Style::default().fg(self.link)
    }

    pub fn accent_style(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn active_tab_style(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    pub fn warning_style(&self) -> Style {
        Style::default().fg(self.warning)
    }

    pub fn success_style(&self) -> Style {
        Style::default().fg(self.success)
    }

    pub fn spinner_style(&self) -> Style {
        Style::default().fg(self.warning)
    }

    pub fn status_bar_style(&self) -> Style {
        Style::default().bg(self.bg_selected).fg(self.text_primary)
    }
}
