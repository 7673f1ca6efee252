//! Colours: built-in palettes plus optional `key = #RRGGBB` overrides from a file.

use crate::Palette;
use ratatui::style::Color;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

/// Token and UI colours.
#[derive(Debug, Clone)]
pub struct Theme {
    /// One colour per token kind (index 0..=5).
    pub tokens: [Color; 6],
    pub detonator: Color,
    pub bg: Color,
    pub frame: Color,
    pub text: Color,
    pub accent: Color,
    pub muted: Color,
    pub cursor: Color,
    pub selected: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
    #[error("line {0}: expected `key = #RRGGBB`")]
    Syntax(usize),
}

impl Default for Theme {
    fn default() -> Self {
        Self::for_palette(Palette::Normal)
    }
}

impl Theme {
    pub fn for_palette(palette: Palette) -> Self {
        let tokens = match palette {
            Palette::Normal => [
                Color::Rgb(0xE0, 0x6C, 0x75), // red
                Color::Rgb(0x61, 0xAF, 0xEF), // blue
                Color::Rgb(0x98, 0xC3, 0x79), // green
                Color::Rgb(0xE5, 0xC0, 0x7B), // yellow
                Color::Rgb(0xC6, 0x78, 0xDD), // magenta
                Color::Rgb(0x56, 0xB6, 0xC2), // cyan
            ],
            Palette::HighContrast => [
                Color::Rgb(0xFF, 0x00, 0x00),
                Color::Rgb(0x00, 0x88, 0xFF),
                Color::Rgb(0x00, 0xFF, 0x00),
                Color::Rgb(0xFF, 0xFF, 0x00),
                Color::Rgb(0xFF, 0x00, 0xFF),
                Color::Rgb(0x00, 0xFF, 0xFF),
            ],
            // Avoids relying on red against green.
            Palette::Colorblind => [
                Color::Rgb(0xEE, 0x77, 0x33), // orange
                Color::Rgb(0x00, 0x77, 0xBB), // blue
                Color::Rgb(0x00, 0x99, 0x88), // teal
                Color::Rgb(0xBB, 0xBB, 0x00), // yellow
                Color::Rgb(0xEE, 0x33, 0x77), // magenta
                Color::Rgb(0xCC, 0x33, 0x11), // red
            ],
        };
        Self {
            tokens,
            detonator: Color::Rgb(0xFF, 0xFF, 0xFF),
            bg: Color::Rgb(0x28, 0x2C, 0x34),
            frame: Color::Rgb(0x3F, 0x44, 0x4F),
            text: Color::Rgb(0xAB, 0xB2, 0xBF),
            accent: Color::Rgb(0xE5, 0xC0, 0x7B),
            muted: Color::Rgb(0x5C, 0x63, 0x70),
            cursor: Color::Rgb(0x4B, 0x52, 0x63),
            selected: Color::Rgb(0x6B, 0x5B, 0x2E),
        }
    }

    /// Palette defaults, overridden by `path` when it exists.
    pub fn load(path: Option<&Path>, palette: Palette) -> Result<Self, ThemeError> {
        let mut theme = Self::for_palette(palette);
        if let Some(p) = path.filter(|p| p.exists()) {
            let text = std::fs::read_to_string(p)?;
            theme.apply_overrides(&text)?;
        }
        Ok(theme)
    }

    fn apply_overrides(&mut self, text: &str) -> Result<(), ThemeError> {
        for (n, line) in text.lines().enumerate() {
            let line = line.trim();
            let comment = line.starts_with("//")
                || line.starts_with(';')
                || (line.starts_with('#') && !line.contains('='));
            if line.is_empty() || comment {
                continue;
            }
            let (key, value) = line.split_once('=').ok_or(ThemeError::Syntax(n + 1))?;
            let color = parse_hex(value)?;
            let key = key.trim();
            let slot = match key {
                "detonator" => &mut self.detonator,
                "bg" => &mut self.bg,
                "frame" => &mut self.frame,
                "text" => &mut self.text,
                "accent" => &mut self.accent,
                "muted" => &mut self.muted,
                "cursor" => &mut self.cursor,
                "selected" => &mut self.selected,
                _ => match key
                    .strip_prefix("token")
                    .and_then(|i| i.parse::<usize>().ok())
                    .and_then(|i| self.tokens.get_mut(i))
                {
                    Some(slot) => slot,
                    None => {
                        warn!(key, "unknown theme key");
                        continue;
                    }
                },
            };
            *slot = color;
        }
        Ok(())
    }

    #[inline]
    pub fn token(&self, kind: u8) -> Color {
        self.tokens[(kind as usize) % self.tokens.len()]
    }
}

/// Parse "#RRGGBB" or "#RGB".
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let hex = s.trim().trim_matches('"').trim_start_matches('#');
    let bad = || ThemeError::InvalidHex(s.trim().to_string());
    let v = u32::from_str_radix(hex, 16).map_err(|_| bad())?;
    match hex.len() {
        6 => Ok(Color::Rgb((v >> 16) as u8, (v >> 8) as u8, v as u8)),
        3 => {
            let nib = |shift: u32| ((v >> shift) & 0xF) as u8 * 17;
            Ok(Color::Rgb(nib(8), nib(4), nib(0)))
        }
        _ => Err(bad()),
    }
}
