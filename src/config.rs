//! Manager-wide configuration and parsing of user supplied dimensions.

use crate::constants::{
    BASE_Z_INDEX, DEFAULT_MIN_HEIGHT, DEFAULT_MIN_WIDTH, DEFAULT_WINDOW_HEIGHT,
    DEFAULT_WINDOW_TITLE, DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_X, DEFAULT_WINDOW_Y, HEADER_HEIGHT,
    MAXIMIZE_MARGIN, PLACEMENT_MARGIN, STAGGER_STEP,
};
use crate::error::WmError;
use crate::layout::{Point, Size};

/// Defaults and spacing rules a [`WindowManager`](crate::window::WindowManager)
/// applies to every window it creates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WmConfig {
    pub default_title: String,
    pub default_size: Size,
    /// Origin of the first staggered window.
    pub default_origin: Point,
    pub default_min_size: Size,
    pub stagger_step: i32,
    pub placement_margin: i32,
    pub maximize_margin: i32,
    pub header_height: u32,
    pub base_z_index: u32,
}

impl Default for WmConfig {
    fn default() -> Self {
        Self {
            default_title: DEFAULT_WINDOW_TITLE.to_string(),
            default_size: Size::new(DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT),
            default_origin: Point::new(DEFAULT_WINDOW_X, DEFAULT_WINDOW_Y),
            default_min_size: Size::new(DEFAULT_MIN_WIDTH, DEFAULT_MIN_HEIGHT),
            stagger_step: STAGGER_STEP,
            placement_margin: PLACEMENT_MARGIN,
            maximize_margin: MAXIMIZE_MARGIN,
            header_height: HEADER_HEIGHT,
            base_z_index: BASE_Z_INDEX,
        }
    }
}

/// Parse a CSS-ish pixel dimension: `"400"`, `"400px"` or `"400.6px"`
/// (rounded). Negative, empty and non-numeric values are rejected.
pub fn parse_px(field: &'static str, value: &str) -> Result<u32, WmError> {
    let trimmed = value.trim();
    let number = trimmed
        .strip_suffix("px")
        .unwrap_or(trimmed)
        .trim_end();
    let parsed: f64 = number
        .parse()
        .map_err(|_| WmError::invalid(field, value))?;
    if !parsed.is_finite() || parsed < 0.0 || parsed > f64::from(u32::MAX) {
        return Err(WmError::invalid(field, value));
    }
    Ok(parsed.round() as u32)
}

/// [`parse_px`] that logs and falls back instead of failing.
pub fn parse_px_or(field: &'static str, value: &str, fallback: u32) -> u32 {
    match parse_px(field, value) {
        Ok(px) => px,
        Err(err) => {
            tracing::warn!(%err, fallback, "falling back to last known dimension");
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_documented_values() {
        let cfg = WmConfig::default();
        assert_eq!(cfg.default_size, Size::new(400, 300));
        assert_eq!(cfg.default_origin, Point::new(100, 100));
        assert_eq!(cfg.default_min_size, Size::new(200, 150));
        assert_eq!(cfg.stagger_step, 30);
        assert_eq!(cfg.placement_margin, 50);
    }

    #[test]
    fn parse_px_accepts_common_forms() {
        assert_eq!(parse_px("width", "400"), Ok(400));
        assert_eq!(parse_px("width", "400px"), Ok(400));
        assert_eq!(parse_px("width", " 250 px "), Ok(250));
        assert_eq!(parse_px("width", "99.6px"), Ok(100));
    }

    #[test]
    fn parse_px_rejects_garbage() {
        for bad in ["", "px", "wide", "-5px", "NaN", "inf", "12em"] {
            assert_eq!(
                parse_px("height", bad),
                Err(WmError::invalid("height", bad)),
                "input {bad:?}"
            );
        }
    }

    #[test]
    fn parse_px_or_falls_back() {
        assert_eq!(parse_px_or("height", "oops", 300), 300);
        assert_eq!(parse_px_or("height", "320px", 300), 320);
    }
}
