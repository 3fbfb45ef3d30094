use std::fmt;
use std::str::FromStr;

use ratatui::style::Color as TermColor;
use serde::{Deserialize, Serialize};

use crate::error::WmError;

/// 8-bit RGBA color. Parsed from and rendered to CSS notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(0xff, 0xff, 0xff);
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Move each channel toward black (`amount < 0`) or white
    /// (`amount > 0`). `amount` is clamped to `-1.0..=1.0`.
    pub fn shade(self, amount: f32) -> Self {
        let amount = amount.clamp(-1.0, 1.0);
        let adjust = |c: u8| {
            let c = f32::from(c);
            let target = if amount < 0.0 { 0.0 } else { 255.0 };
            (c + (target - c) * amount.abs()).round() as u8
        };
        Self {
            r: adjust(self.r),
            g: adjust(self.g),
            b: adjust(self.b),
            a: self.a,
        }
    }

    /// Alpha-composite `self` over an opaque `background`.
    pub fn over(self, background: Rgba) -> Rgba {
        let alpha = u32::from(self.a);
        let mix = |fg: u8, bg: u8| {
            ((u32::from(fg) * alpha + u32::from(bg) * (255 - alpha) + 127) / 255) as u8
        };
        Rgba::rgb(
            mix(self.r, background.r),
            mix(self.g, background.g),
            mix(self.b, background.b),
        )
    }

    pub fn to_css(self) -> String {
        if self.a == 0xff {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!(
                "rgba({}, {}, {}, {:.2})",
                self.r,
                self.g,
                self.b,
                f32::from(self.a) / 255.0
            )
        }
    }

    /// Map to a terminal color. Truecolor terminals (`COLORTERM` contains
    /// `truecolor` or `24bit`) get the exact value, everything else the
    /// nearest entry of the xterm 6x6x6 cube.
    pub fn to_terminal(self) -> TermColor {
        if let Ok(var) = std::env::var("COLORTERM") {
            let lv = var.to_lowercase();
            if lv.contains("truecolor") || lv.contains("24bit") {
                return TermColor::Rgb(self.r, self.g, self.b);
            }
        }
        TermColor::Indexed(xterm_cube_index(self.r, self.g, self.b))
    }
}

fn xterm_cube_index(r: u8, g: u8, b: u8) -> u8 {
    let level = |v: u8| ((u16::from(v) * 5 + 127) / 255) as u8;
    16 + 36 * level(r) + 6 * level(g) + level(b)
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

impl FromStr for Rgba {
    type Err = WmError;

    /// Accepts `#rgb`, `#rrggbb` and `#rrggbbaa`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || WmError::invalid("color", s);
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        match hex.len() {
            3 => {
                let nibble = |i: usize| {
                    u8::from_str_radix(&hex[i..i + 1], 16)
                        .map(|v| v * 17)
                        .map_err(|_| invalid())
                };
                Ok(Rgba::rgb(nibble(0)?, nibble(1)?, nibble(2)?))
            }
            6 => Ok(Rgba::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Rgba::rgb(byte(0)?, byte(2)?, byte(4)?).with_alpha(byte(6)?)),
            _ => Err(invalid()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_forms() {
        assert_eq!("#888".parse::<Rgba>(), Ok(Rgba::rgb(0x88, 0x88, 0x88)));
        assert_eq!("#ff5c5c".parse::<Rgba>(), Ok(Rgba::rgb(0xff, 0x5c, 0x5c)));
        assert_eq!(
            "#ffffff33".parse::<Rgba>(),
            Ok(Rgba::WHITE.with_alpha(0x33))
        );
    }

    #[test]
    fn rejects_malformed_colors() {
        for bad in ["888", "#88", "#ggg", "#12345", "red", ""] {
            assert!(bad.parse::<Rgba>().is_err(), "input {bad:?}");
        }
    }

    #[test]
    fn css_output_round_trips_opaque_colors() {
        let c = Rgba::rgb(0x12, 0xab, 0xef);
        assert_eq!(c.to_css(), "#12abef");
        assert_eq!(Rgba::WHITE.with_alpha(51).to_css(), "rgba(255, 255, 255, 0.20)");
    }

    #[test]
    fn shade_moves_toward_black_or_white() {
        let base = Rgba::rgb(100, 100, 100);
        assert_eq!(base.shade(-1.0), Rgba::BLACK);
        assert_eq!(base.shade(1.0), Rgba::WHITE);
        assert_eq!(base.shade(0.0), base);
        assert!(base.shade(-0.2).r < base.r);
    }

    #[test]
    fn over_composites_alpha() {
        let half_white = Rgba::WHITE.with_alpha(128);
        let blended = half_white.over(Rgba::BLACK);
        assert_eq!(blended.r, 128);
        assert_eq!(Rgba::WHITE.over(Rgba::BLACK), Rgba::WHITE);
    }

    #[test]
    fn terminal_mapping_yields_a_color_variant() {
        match Rgba::rgb(200, 100, 0).to_terminal() {
            TermColor::Rgb(_, _, _) | TermColor::Indexed(_) => {}
            other => panic!("unexpected color variant {other:?}"),
        }
    }

    #[test]
    fn cube_index_corners() {
        assert_eq!(xterm_cube_index(0, 0, 0), 16);
        assert_eq!(xterm_cube_index(255, 255, 255), 231);
    }
}
