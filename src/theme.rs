use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::colors::Rgba;
use crate::error::WmError;

// Window chrome colors. Content colors are a fixed neutral pair so window
// bodies stay readable whatever chrome color a caller picks.

pub const DEFAULT_BASE: Rgba = Rgba::rgb(0x88, 0x88, 0x88);
pub const HEADER_TEXT: Rgba = Rgba::WHITE;
pub const CONTENT_BG: Rgba = Rgba::WHITE;
pub const CONTENT_TEXT: Rgba = Rgba::rgb(0x33, 0x33, 0x33);
pub const BUTTON_BG: Rgba = Rgba::WHITE.with_alpha(0x33);
pub const BUTTON_HOVER_BG: Rgba = Rgba::WHITE.with_alpha(0x4d);
pub const CLOSE_HOVER_BG: Rgba = Rgba::rgb(0xff, 0x5c, 0x5c);

/// Style record a renderer applies to a window's chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeStyle {
    pub border_color: Rgba,
    pub header_bg: Rgba,
    pub header_text: Rgba,
    pub button_bg: Rgba,
    pub button_hover_bg: Rgba,
    pub content_bg: Rgba,
    pub content_text: Rgba,
    pub resizer_color: Rgba,
}

impl ThemeStyle {
    /// Derive a full style from a single chrome color.
    pub fn from_base(base: Rgba) -> Self {
        Self {
            border_color: base.shade(-0.2),
            header_bg: base,
            header_text: HEADER_TEXT,
            button_bg: BUTTON_BG,
            button_hover_bg: BUTTON_HOVER_BG,
            content_bg: CONTENT_BG,
            content_text: CONTENT_TEXT,
            resizer_color: base.shade(-0.35),
        }
    }

    /// Force the content pair back to the neutral defaults.
    pub fn neutralized(self) -> Self {
        Self {
            content_bg: CONTENT_BG,
            content_text: CONTENT_TEXT,
            ..self
        }
    }

    pub fn with_header(self, overrides: HeaderOverrides) -> Self {
        Self {
            header_bg: overrides.background.unwrap_or(self.header_bg),
            header_text: overrides.text.unwrap_or(self.header_text),
            ..self
        }
    }
}

impl Default for ThemeStyle {
    fn default() -> Self {
        Self::from_base(DEFAULT_BASE)
    }
}

/// Which theme a window uses: a registered name or a base color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeSelection {
    Named(String),
    Base(Rgba),
}

impl Default for ThemeSelection {
    fn default() -> Self {
        ThemeSelection::Base(DEFAULT_BASE)
    }
}

/// Per-window header colors that win over the theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderOverrides {
    pub background: Option<Rgba>,
    pub text: Option<Rgba>,
}

pub trait ThemeProvider: std::fmt::Debug {
    /// Resolve a selection. Must never fail: unknown names fall back to the
    /// default style.
    fn style(&self, selection: &ThemeSelection) -> ThemeStyle;
}

/// Named themes plus base-color derivation.
#[derive(Debug, Clone, Default)]
pub struct ThemeRegistry {
    themes: BTreeMap<String, ThemeStyle>,
}

impl ThemeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a named theme. The content pair is neutralized.
    pub fn register(&mut self, name: impl Into<String>, style: ThemeStyle) {
        let name = name.into();
        tracing::debug!(theme = %name, "registered theme");
        self.themes.insert(name, style.neutralized());
    }

    pub fn register_base(&mut self, name: impl Into<String>, base: Rgba) {
        self.register(name, ThemeStyle::from_base(base));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.themes.contains_key(name)
    }

    pub fn try_style(&self, selection: &ThemeSelection) -> Result<ThemeStyle, WmError> {
        match selection {
            ThemeSelection::Base(base) => Ok(ThemeStyle::from_base(*base)),
            ThemeSelection::Named(name) => self
                .themes
                .get(name)
                .copied()
                .ok_or_else(|| WmError::not_found("theme", name)),
        }
    }
}

impl ThemeProvider for ThemeRegistry {
    fn style(&self, selection: &ThemeSelection) -> ThemeStyle {
        self.try_style(selection).unwrap_or_else(|err| {
            tracing::warn!(%err, "using default theme");
            ThemeStyle::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_color_drives_chrome_only() {
        let base = Rgba::rgb(0x33, 0x66, 0x99);
        let style = ThemeStyle::from_base(base);
        assert_eq!(style.header_bg, base);
        assert_eq!(style.header_text, HEADER_TEXT);
        assert_eq!(style.content_bg, CONTENT_BG);
        assert_eq!(style.content_text, CONTENT_TEXT);
        assert_ne!(style.border_color, base);
    }

    #[test]
    fn registered_themes_keep_neutral_content() {
        let mut registry = ThemeRegistry::new();
        let loud = ThemeStyle {
            content_bg: Rgba::rgb(255, 0, 0),
            content_text: Rgba::rgb(0, 255, 0),
            ..ThemeStyle::from_base(Rgba::rgb(10, 20, 30))
        };
        registry.register("loud", loud);
        let style = registry.style(&ThemeSelection::Named("loud".into()));
        assert_eq!(style.content_bg, CONTENT_BG);
        assert_eq!(style.content_text, CONTENT_TEXT);
        assert_eq!(style.header_bg, Rgba::rgb(10, 20, 30));
    }

    #[test]
    fn unknown_theme_falls_back_to_default() {
        let registry = ThemeRegistry::new();
        let selection = ThemeSelection::Named("missing".into());
        assert!(registry.try_style(&selection).is_err());
        assert_eq!(registry.style(&selection), ThemeStyle::default());
    }

    #[test]
    fn header_overrides_win() {
        let style = ThemeStyle::default().with_header(HeaderOverrides {
            background: Some(Rgba::BLACK),
            text: None,
        });
        assert_eq!(style.header_bg, Rgba::BLACK);
        assert_eq!(style.header_text, HEADER_TEXT);
    }
}
