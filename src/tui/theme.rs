use ratatui::style::Color;

use crate::model::UiConfig;
use crate::ops::session::DISCARD_STYLE_CLASS;

/// Parsed color theme for the dialogs
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    /// Destructive actions (discard, erase)
    pub destructive: Color,
    pub border: Color,
    /// Title bar background
    pub title_bg: Color,
    pub show_key_hints: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x0C, 0x00, 0x1B),
            text: Color::Rgb(0xB0, 0xAA, 0xFF),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0xFB, 0x41, 0x96),
            dim: Color::Rgb(0x7D, 0x78, 0xBF),
            destructive: Color::Rgb(0xFF, 0x44, 0x44),
            border: Color::Rgb(0x44, 0xDD, 0xFF),
            title_bg: Color::Rgb(0x3D, 0x14, 0x38),
            show_key_hints: true,
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

impl Theme {
    /// Create a theme from UI config, falling back to defaults
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme {
            show_key_hints: ui.show_key_hints,
            ..Theme::default()
        };

        for (key, value) in &ui.colors {
            if let Some(color) = parse_hex_color(value) {
                match key.as_str() {
                    "background" => theme.background = color,
                    "text" => theme.text = color,
                    "text_bright" => theme.text_bright = color,
                    "highlight" => theme.highlight = color,
                    "dim" => theme.dim = color,
                    "destructive" => theme.destructive = color,
                    "border" => theme.border = color,
                    "title_bg" => theme.title_bg = color,
                    _ => {}
                }
            }
        }

        theme
    }

    /// Foreground for a control carrying the host style class `class`
    pub fn class_color(&self, class: &str) -> Color {
        match class {
            DISCARD_STYLE_CLASS => self.destructive,
            _ => self.text,
        }
    }
}
