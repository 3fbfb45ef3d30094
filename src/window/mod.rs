pub mod decorator;
pub mod interaction;

mod window_manager;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::colors::Rgba;
use crate::config::parse_px;
use crate::layout::floating::{ChromeFlags, clamp_position, clamp_size};
use crate::layout::{Bounds, Size};
use crate::theme::{HeaderOverrides, ThemeSelection};

pub use interaction::{Gesture, InteractionController};
pub use window_manager::{WindowHandle, WindowManager};

/// Opaque window identity. Allocated from a per-manager counter and never
/// reused, so a stale id can only ever miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(u64);

impl WindowId {
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WindowMode {
    #[default]
    Normal,
    Minimized,
    Maximized,
}

/// Creation config. Every field is optional; unset fields take the
/// manager's defaults. Also used as the body of registered window types.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowConfig {
    pub title: Option<String>,
    pub content: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub theme: Option<ThemeSelection>,
    pub header: HeaderOverrides,
    pub resizable: Option<bool>,
    pub allow_minimize: Option<bool>,
    pub allow_maximize: Option<bool>,
    pub min_size: Option<Size>,
    pub max_size: Option<Size>,
}

impl WindowConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Size from CSS-style strings such as `"480px"`. A malformed value is
    /// logged and left unset so the default applies.
    pub fn size_spec(mut self, width: &str, height: &str) -> Self {
        self.width = spec_or_default("width", width);
        self.height = spec_or_default("height", height);
        self
    }

    pub fn position(mut self, x: i32, y: i32) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    pub fn base_color(mut self, color: Rgba) -> Self {
        self.theme = Some(ThemeSelection::Base(color));
        self
    }

    pub fn named_theme(mut self, name: impl Into<String>) -> Self {
        self.theme = Some(ThemeSelection::Named(name.into()));
        self
    }

    pub fn header_color(mut self, color: Rgba) -> Self {
        self.header.background = Some(color);
        self
    }

    pub fn header_text_color(mut self, color: Rgba) -> Self {
        self.header.text = Some(color);
        self
    }

    pub fn resizable(mut self, resizable: bool) -> Self {
        self.resizable = Some(resizable);
        self
    }

    pub fn allow_minimize(mut self, allow: bool) -> Self {
        self.allow_minimize = Some(allow);
        self
    }

    pub fn allow_maximize(mut self, allow: bool) -> Self {
        self.allow_maximize = Some(allow);
        self
    }

    pub fn min_size(mut self, size: Size) -> Self {
        self.min_size = Some(size);
        self
    }

    pub fn max_size(mut self, size: Size) -> Self {
        self.max_size = Some(size);
        self
    }

    /// Fields set on `self` win over `base`.
    pub fn merged_over(&self, base: &WindowConfig) -> WindowConfig {
        WindowConfig {
            title: self.title.clone().or_else(|| base.title.clone()),
            content: self.content.clone().or_else(|| base.content.clone()),
            width: self.width.or(base.width),
            height: self.height.or(base.height),
            x: self.x.or(base.x),
            y: self.y.or(base.y),
            theme: self.theme.clone().or_else(|| base.theme.clone()),
            header: HeaderOverrides {
                background: self.header.background.or(base.header.background),
                text: self.header.text.or(base.header.text),
            },
            resizable: self.resizable.or(base.resizable),
            allow_minimize: self.allow_minimize.or(base.allow_minimize),
            allow_maximize: self.allow_maximize.or(base.allow_maximize),
            min_size: self.min_size.or(base.min_size),
            max_size: self.max_size.or(base.max_size),
        }
    }
}

fn spec_or_default(field: &'static str, value: &str) -> Option<u32> {
    match parse_px(field, value) {
        Ok(px) => Some(px),
        Err(err) => {
            tracing::warn!(%err, "ignoring malformed size, using default");
            None
        }
    }
}

/// Partial property update. Never touches bounds or mode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowProperties {
    pub title: Option<String>,
    pub theme: Option<ThemeSelection>,
    pub header_color: Option<Rgba>,
    pub header_text_color: Option<Rgba>,
    pub resizable: Option<bool>,
    pub allow_minimize: Option<bool>,
    pub allow_maximize: Option<bool>,
}

impl WindowProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn base_color(mut self, color: Rgba) -> Self {
        self.theme = Some(ThemeSelection::Base(color));
        self
    }

    pub fn named_theme(mut self, name: impl Into<String>) -> Self {
        self.theme = Some(ThemeSelection::Named(name.into()));
        self
    }

    pub fn header_color(mut self, color: Rgba) -> Self {
        self.header_color = Some(color);
        self
    }

    pub fn header_text_color(mut self, color: Rgba) -> Self {
        self.header_text_color = Some(color);
        self
    }

    pub fn resizable(mut self, resizable: bool) -> Self {
        self.resizable = Some(resizable);
        self
    }

    pub fn allow_minimize(mut self, allow: bool) -> Self {
        self.allow_minimize = Some(allow);
        self
    }

    pub fn allow_maximize(mut self, allow: bool) -> Self {
        self.allow_maximize = Some(allow);
        self
    }
}

/// Per-window record. Owned by the manager; callers read it through
/// accessors and mutate it through manager operations or a
/// [`WindowHandle`].
#[derive(Debug, Clone, PartialEq)]
pub struct WindowState {
    pub(crate) id: WindowId,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) bounds: Bounds,
    pub(crate) saved_bounds: Bounds,
    pub(crate) mode: WindowMode,
    pub(crate) resizable: bool,
    pub(crate) allow_minimize: bool,
    pub(crate) allow_maximize: bool,
    pub(crate) z_index: u32,
    pub(crate) min_size: Size,
    pub(crate) max_size: Option<Size>,
    pub(crate) theme: ThemeSelection,
    pub(crate) header: HeaderOverrides,
}

impl WindowState {
    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn saved_bounds(&self) -> Bounds {
        self.saved_bounds
    }

    pub fn mode(&self) -> WindowMode {
        self.mode
    }

    pub fn is_normal(&self) -> bool {
        self.mode == WindowMode::Normal
    }

    pub fn resizable(&self) -> bool {
        self.resizable
    }

    pub fn allow_minimize(&self) -> bool {
        self.allow_minimize
    }

    pub fn allow_maximize(&self) -> bool {
        self.allow_maximize
    }

    pub fn z_index(&self) -> u32 {
        self.z_index
    }

    pub fn min_size(&self) -> Size {
        self.min_size
    }

    pub fn max_size(&self) -> Option<Size> {
        self.max_size
    }

    pub fn theme(&self) -> &ThemeSelection {
        &self.theme
    }

    pub fn header(&self) -> HeaderOverrides {
        self.header
    }

    /// Rectangle a renderer draws: the header strip only while minimized.
    pub fn visible_bounds(&self, header_height: u32) -> Bounds {
        match self.mode {
            WindowMode::Minimized => Bounds {
                height: header_height,
                ..self.bounds
            },
            WindowMode::Normal | WindowMode::Maximized => self.bounds,
        }
    }

    pub fn chrome_flags(&self) -> ChromeFlags {
        ChromeFlags {
            resizable: self.resizable,
            allow_minimize: self.allow_minimize,
            allow_maximize: self.allow_maximize,
            normal: self.is_normal(),
            minimized: self.mode == WindowMode::Minimized,
        }
    }

    pub fn snapshot(&self, header_height: u32) -> WindowSnapshot {
        WindowSnapshot {
            id: self.id,
            title: self.title.clone(),
            content: self.content.clone(),
            bounds: self.bounds,
            visible_bounds: self.visible_bounds(header_height),
            header_height,
            mode: self.mode,
            theme: self.theme.clone(),
            header: self.header,
            resizable: self.resizable,
            allow_minimize: self.allow_minimize,
            allow_maximize: self.allow_maximize,
            z_index: self.z_index,
        }
    }

    pub(crate) fn clamp_to_constraints(&self, size: Size) -> Size {
        clamp_size(size.width, size.height, self.min_size, self.max_size)
    }

    /// Normal -> Maximized. `target` is the viewport-minus-margin rectangle.
    pub(crate) fn enter_maximized(&mut self, target: Bounds) {
        debug_assert_eq!(self.mode, WindowMode::Normal);
        self.saved_bounds = self.bounds;
        self.bounds = target.with_size(self.clamp_to_constraints(target.size()));
        self.mode = WindowMode::Maximized;
    }

    /// Maximized -> Normal. The viewport may have shrunk since the window
    /// was maximized, so the restored origin is pulled back on screen.
    pub(crate) fn leave_maximized(&mut self, viewport: Size) {
        debug_assert_eq!(self.mode, WindowMode::Maximized);
        let saved = self.saved_bounds;
        let origin = clamp_position(saved.x, saved.y, saved.width, saved.height, viewport);
        self.saved_bounds = saved.with_origin(origin);
        self.bounds = self.saved_bounds;
        self.mode = WindowMode::Normal;
    }

    /// Normal -> Minimized. Only the height is remembered; the header keeps
    /// the current width and origin.
    pub(crate) fn enter_minimized(&mut self) {
        debug_assert_eq!(self.mode, WindowMode::Normal);
        self.saved_bounds.height = self.bounds.height;
        self.mode = WindowMode::Minimized;
    }

    /// Minimized -> Normal.
    pub(crate) fn leave_minimized(&mut self) {
        debug_assert_eq!(self.mode, WindowMode::Minimized);
        self.bounds.height = self.saved_bounds.height;
        self.mode = WindowMode::Normal;
    }
}

/// Serializable projection of a window handed to renderers and host
/// bridges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowSnapshot {
    pub id: WindowId,
    pub title: String,
    pub content: String,
    pub bounds: Bounds,
    pub visible_bounds: Bounds,
    /// Header strip height the manager lays out and hit-tests with.
    pub header_height: u32,
    pub mode: WindowMode,
    pub theme: ThemeSelection,
    pub header: HeaderOverrides,
    pub resizable: bool,
    pub allow_minimize: bool,
    pub allow_maximize: bool,
    pub z_index: u32,
}

impl WindowSnapshot {
    pub fn chrome_flags(&self) -> ChromeFlags {
        ChromeFlags {
            resizable: self.resizable,
            allow_minimize: self.allow_minimize,
            allow_maximize: self.allow_maximize,
            normal: self.mode == WindowMode::Normal,
            minimized: self.mode == WindowMode::Minimized,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> WindowState {
        let bounds = Bounds::new(100, 100, 400, 300);
        WindowState {
            id: WindowId::new(1),
            title: "t".into(),
            content: String::new(),
            bounds,
            saved_bounds: bounds,
            mode: WindowMode::Normal,
            resizable: true,
            allow_minimize: true,
            allow_maximize: true,
            z_index: 11,
            min_size: Size::new(200, 150),
            max_size: None,
            theme: ThemeSelection::default(),
            header: HeaderOverrides::default(),
        }
    }

    #[test]
    fn maximize_then_restore_is_identity() {
        let mut w = state();
        let before = w.bounds();
        w.enter_maximized(Bounds::new(20, 20, 960, 760));
        assert_eq!(w.mode(), WindowMode::Maximized);
        assert_eq!(w.bounds(), Bounds::new(20, 20, 960, 760));
        w.leave_maximized(Size::new(1000, 800));
        assert_eq!(w.bounds(), before);
        assert!(w.is_normal());
    }

    #[test]
    fn maximize_respects_max_size() {
        let mut w = state();
        w.max_size = Some(Size::new(800, 600));
        w.enter_maximized(Bounds::new(20, 20, 960, 760));
        assert_eq!(w.bounds(), Bounds::new(20, 20, 800, 600));
    }

    #[test]
    fn minimized_window_collapses_to_header() {
        let mut w = state();
        w.enter_minimized();
        assert_eq!(w.visible_bounds(40), Bounds::new(100, 100, 400, 40));
        assert_eq!(w.saved_bounds().height, 300);
        w.leave_minimized();
        assert_eq!(w.visible_bounds(40), Bounds::new(100, 100, 400, 300));
    }

    #[test]
    fn config_merge_prefers_overrides() {
        let base = WindowConfig::new().title("Base").size(500, 400).resizable(false);
        let merged = WindowConfig::new().title("Mine").merged_over(&base);
        assert_eq!(merged.title.as_deref(), Some("Mine"));
        assert_eq!(merged.width, Some(500));
        assert_eq!(merged.resizable, Some(false));
        assert_eq!(merged.x, None);
    }

    #[test]
    fn malformed_size_spec_leaves_defaults() {
        let cfg = WindowConfig::new().size_spec("480px", "tall");
        assert_eq!(cfg.width, Some(480));
        assert_eq!(cfg.height, None);
    }

    #[test]
    fn window_id_display() {
        assert_eq!(WindowId::new(7).to_string(), "window-7");
    }
}
