use std::collections::BTreeMap;
use std::fmt;

use super::{
    Gesture, InteractionController, WindowConfig, WindowId, WindowMode, WindowProperties,
    WindowSnapshot, WindowState,
};
use crate::colors::Rgba;
use crate::config::{WmConfig, parse_px_or};
use crate::error::WmError;
use crate::layout::floating::{
    self, HitRegion, clamp_position, clamp_size, constraints_conflict, maximized_bounds,
    staggered_origin,
};
use crate::layout::{Bounds, Point, Size, ViewportProvider};
use crate::theme::{ThemeProvider, ThemeRegistry, ThemeSelection, ThemeStyle};

/// Registry of live windows plus everything that arbitrates between them:
/// stacking order, the shared gesture slot and the type templates.
pub struct WindowManager {
    windows: BTreeMap<WindowId, WindowState>,
    templates: BTreeMap<String, WindowConfig>,
    config: WmConfig,
    viewport: Box<dyn ViewportProvider>,
    themes: Box<dyn ThemeProvider>,
    interaction: InteractionController,
    next_id: u64,
    z_counter: u32,
}

impl fmt::Debug for WindowManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowManager")
            .field("windows", &self.windows.len())
            .field("templates", &self.templates.keys().collect::<Vec<_>>())
            .field("viewport", &self.viewport.viewport())
            .field("interaction", &self.interaction)
            .field("z_counter", &self.z_counter)
            .finish_non_exhaustive()
    }
}

impl WindowManager {
    pub fn new(viewport: impl ViewportProvider + 'static) -> Self {
        Self::with_config(viewport, WmConfig::default())
    }

    pub fn with_config(viewport: impl ViewportProvider + 'static, config: WmConfig) -> Self {
        Self {
            windows: BTreeMap::new(),
            templates: BTreeMap::new(),
            z_counter: config.base_z_index,
            config,
            viewport: Box::new(viewport),
            themes: Box::new(ThemeRegistry::new()),
            interaction: InteractionController::new(),
            next_id: 1,
        }
    }

    pub fn with_theme_provider(mut self, themes: impl ThemeProvider + 'static) -> Self {
        self.themes = Box::new(themes);
        self
    }

    pub fn config(&self) -> &WmConfig {
        &self.config
    }

    pub fn viewport(&self) -> Size {
        self.viewport.viewport()
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    fn next_z(&mut self) -> u32 {
        if self.z_counter == u32::MAX {
            self.renumber_z_order();
        }
        self.z_counter += 1;
        self.z_counter
    }

    /// Counter exhausted: repack the live stack into consecutive values,
    /// keeping the relative order.
    fn renumber_z_order(&mut self) {
        let order = self.draw_order();
        let mut z = self.config.base_z_index.min(u32::MAX / 2);
        for id in &order {
            z += 1;
            if let Some(window) = self.windows.get_mut(id) {
                window.z_index = z;
            }
        }
        tracing::debug!(windows = order.len(), top = z, "renumbered z-order");
        self.z_counter = z;
    }

    /// Create and register a window. Unset config fields take the manager
    /// defaults; a window without an explicit position cascades from the
    /// default origin by one stagger step per live window.
    pub fn create_window(&mut self, config: WindowConfig) -> WindowId {
        let viewport = self.viewport();
        let defaults = &self.config;

        let min_size = config.min_size.unwrap_or(defaults.default_min_size);
        if constraints_conflict(min_size, config.max_size) {
            tracing::warn!(
                min = %min_size,
                max = ?config.max_size,
                "max size below min size, ignoring the ceiling on that axis"
            );
        }
        let size = clamp_size(
            config.width.unwrap_or(defaults.default_size.width),
            config.height.unwrap_or(defaults.default_size.height),
            min_size,
            config.max_size,
        );

        let staggered = staggered_origin(
            defaults.default_origin,
            self.windows.len(),
            defaults.stagger_step,
            size,
            viewport,
            defaults.placement_margin,
        );
        let origin = match (config.x, config.y) {
            (None, None) => staggered,
            (x, y) => clamp_position(
                x.unwrap_or(staggered.x),
                y.unwrap_or(staggered.y),
                size.width,
                size.height,
                viewport,
            ),
        };

        let id = WindowId::new(self.next_id);
        self.next_id += 1;
        let bounds = Bounds::new(origin.x, origin.y, size.width, size.height);
        let state = WindowState {
            id,
            title: config
                .title
                .unwrap_or_else(|| defaults.default_title.clone()),
            content: config.content.unwrap_or_default(),
            bounds,
            saved_bounds: bounds,
            mode: WindowMode::Normal,
            resizable: config.resizable.unwrap_or(true),
            allow_minimize: config.allow_minimize.unwrap_or(true),
            allow_maximize: config.allow_maximize.unwrap_or(true),
            z_index: 0,
            min_size,
            max_size: config.max_size,
            theme: config.theme.unwrap_or_default(),
            header: config.header,
        };
        tracing::debug!(window_id = %id, title = %state.title, ?bounds, "window created");
        self.windows.insert(id, state);
        self.bring_to_front(id);
        id
    }

    /// Store creation defaults under `name`, replacing any earlier template.
    /// The template title defaults to the type name.
    pub fn register_window_type(&mut self, name: impl Into<String>, config: WindowConfig) {
        let name = name.into();
        if name.is_empty() {
            tracing::warn!("ignoring window type with an empty name");
            return;
        }
        let config = WindowConfig {
            title: config.title.or_else(|| Some(name.clone())),
            ..config
        };
        tracing::debug!(window_type = %name, "registered window type");
        self.templates.insert(name, config);
    }

    pub fn window_types(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    /// Create a window from a registered template. Template positions are
    /// ignored; every instance cascades like an unpositioned window.
    pub fn try_create_window_by_type(&mut self, name: &str) -> Result<WindowId, WmError> {
        self.try_create_window_by_type_with(name, WindowConfig::default())
    }

    /// As [`try_create_window_by_type`](Self::try_create_window_by_type),
    /// with per-instance overrides layered over the template.
    pub fn try_create_window_by_type_with(
        &mut self,
        name: &str,
        overrides: WindowConfig,
    ) -> Result<WindowId, WmError> {
        let template = self
            .templates
            .get(name)
            .ok_or_else(|| WmError::not_found("window type", name))?;
        let config = WindowConfig {
            x: None,
            y: None,
            ..template.clone()
        };
        Ok(self.create_window(overrides.merged_over(&config)))
    }

    pub fn create_window_by_type(&mut self, name: &str) -> Option<WindowId> {
        self.try_create_window_by_type(name)
            .inspect_err(|err| tracing::warn!(%err, "cannot create window"))
            .ok()
    }

    /// Remove a window. Closing an unknown or already closed id is a no-op
    /// that returns `false`. A gesture on the window ends with it.
    pub fn close_window(&mut self, id: WindowId) -> bool {
        if self.windows.remove(&id).is_none() {
            tracing::debug!(window_id = %id, "close ignored, window not found");
            return false;
        }
        if self.interaction.release_window(id) {
            tracing::debug!(window_id = %id, "cleared gesture on closed window");
        }
        tracing::debug!(window_id = %id, "window closed");
        true
    }

    pub fn try_bring_to_front(&mut self, id: WindowId) -> Result<(), WmError> {
        if !self.windows.contains_key(&id) {
            return Err(WmError::not_found("window", id));
        }
        let z = self.next_z();
        if let Some(window) = self.windows.get_mut(&id) {
            window.z_index = z;
        }
        tracing::trace!(window_id = %id, z_index = z, "raised");
        Ok(())
    }

    pub fn bring_to_front(&mut self, id: WindowId) -> bool {
        self.try_bring_to_front(id)
            .inspect_err(|err| tracing::warn!(%err, "cannot raise window"))
            .is_ok()
    }

    fn window_state_mut(&mut self, id: WindowId, action: &'static str) -> Option<&mut WindowState> {
        let window = self.windows.get_mut(&id);
        if window.is_none() {
            tracing::warn!(window_id = %id, action, "window not found");
        }
        window
    }

    /// Collapse to the header. A maximized window is restored first. Refused
    /// when minimizing is disabled for the window.
    pub fn minimize(&mut self, id: WindowId) -> bool {
        let viewport = self.viewport();
        let Some(window) = self.window_state_mut(id, "minimize") else {
            return false;
        };
        if !window.allow_minimize {
            tracing::debug!(window_id = %id, "minimize disabled");
            return false;
        }
        match window.mode {
            WindowMode::Minimized => return false,
            WindowMode::Maximized => window.leave_maximized(viewport),
            WindowMode::Normal => {}
        }
        window.enter_minimized();
        tracing::debug!(window_id = %id, "minimized");
        true
    }

    /// Fill the viewport minus the maximize margin. A minimized window is
    /// un-minimized first. Refused when maximizing is disabled.
    pub fn maximize(&mut self, id: WindowId) -> bool {
        let target = maximized_bounds(self.viewport(), self.config.maximize_margin);
        let Some(window) = self.window_state_mut(id, "maximize") else {
            return false;
        };
        if !window.allow_maximize {
            tracing::debug!(window_id = %id, "maximize disabled");
            return false;
        }
        match window.mode {
            WindowMode::Maximized => return false,
            WindowMode::Minimized => window.leave_minimized(),
            WindowMode::Normal => {}
        }
        window.enter_maximized(target);
        tracing::debug!(window_id = %id, bounds = ?window.bounds, "maximized");
        true
    }

    /// Return to normal mode. Always permitted, whatever the chrome flags.
    pub fn restore(&mut self, id: WindowId) -> bool {
        let viewport = self.viewport();
        let Some(window) = self.window_state_mut(id, "restore") else {
            return false;
        };
        match window.mode {
            WindowMode::Normal => return false,
            WindowMode::Minimized => window.leave_minimized(),
            WindowMode::Maximized => window.leave_maximized(viewport),
        }
        tracing::debug!(window_id = %id, bounds = ?window.bounds, "restored");
        true
    }

    /// Header minimize button.
    pub fn toggle_minimize(&mut self, id: WindowId) -> bool {
        match self.windows.get(&id) {
            Some(window) if !window.allow_minimize => false,
            Some(window) if window.mode == WindowMode::Minimized => self.restore(id),
            _ => self.minimize(id),
        }
    }

    /// Header maximize button.
    pub fn toggle_maximize(&mut self, id: WindowId) -> bool {
        match self.windows.get(&id) {
            Some(window) if !window.allow_maximize => false,
            Some(window) if window.mode == WindowMode::Maximized => self.restore(id),
            _ => self.maximize(id),
        }
    }

    pub fn try_set_window_properties(
        &mut self,
        id: WindowId,
        properties: WindowProperties,
    ) -> Result<(), WmError> {
        let window = self
            .windows
            .get_mut(&id)
            .ok_or_else(|| WmError::not_found("window", id))?;
        let WindowProperties {
            title,
            theme,
            header_color,
            header_text_color,
            resizable,
            allow_minimize,
            allow_maximize,
        } = properties;
        if let Some(title) = title {
            window.title = title;
        }
        if let Some(theme) = theme {
            window.theme = theme;
        }
        if let Some(color) = header_color {
            window.header.background = Some(color);
        }
        if let Some(color) = header_text_color {
            window.header.text = Some(color);
        }
        if let Some(resizable) = resizable {
            window.resizable = resizable;
        }
        if let Some(allow) = allow_minimize {
            window.allow_minimize = allow;
        }
        if let Some(allow) = allow_maximize {
            window.allow_maximize = allow;
        }
        tracing::debug!(window_id = %id, "properties updated");
        Ok(())
    }

    pub fn set_window_properties(&mut self, id: WindowId, properties: WindowProperties) -> bool {
        self.try_set_window_properties(id, properties)
            .inspect_err(|err| tracing::warn!(%err, "cannot update window properties"))
            .is_ok()
    }

    pub fn window(&self, id: WindowId) -> Option<&WindowState> {
        self.windows.get(&id)
    }

    /// Mutable per-window handle, or `None` once the window is closed.
    pub fn window_mut(&mut self, id: WindowId) -> Option<WindowHandle<'_>> {
        let viewport = self.viewport();
        self.windows
            .get_mut(&id)
            .map(|window| WindowHandle { window, viewport })
    }

    pub fn try_window_mut(&mut self, id: WindowId) -> Result<WindowHandle<'_>, WmError> {
        self.window_mut(id)
            .ok_or_else(|| WmError::not_found("window", id))
    }

    /// Live windows in creation order.
    pub fn windows(&self) -> impl Iterator<Item = &WindowState> {
        self.windows.values()
    }

    /// First window, in creation order, whose title matches exactly.
    pub fn window_by_title(&self, title: &str) -> Option<&WindowState> {
        self.windows.values().find(|window| window.title == title)
    }

    /// Ids from bottom to top of the stack.
    pub fn draw_order(&self) -> Vec<WindowId> {
        let mut order: Vec<_> = self.windows.values().map(|w| (w.z_index, w.id)).collect();
        order.sort_unstable();
        order.into_iter().map(|(_, id)| id).collect()
    }

    pub fn topmost(&self) -> Option<WindowId> {
        self.windows
            .values()
            .max_by_key(|window| window.z_index)
            .map(|window| window.id)
    }

    /// Topmost window under `point` and the region it was hit in.
    pub fn hit_test(&self, point: Point) -> Option<(WindowId, HitRegion)> {
        let header_height = self.config.header_height;
        self.draw_order().into_iter().rev().find_map(|id| {
            let window = self.windows.get(&id)?;
            let region = floating::hit_test(
                window.visible_bounds(header_height),
                header_height,
                window.chrome_flags(),
                point,
            )?;
            Some((id, region))
        })
    }

    pub fn snapshot(&self, id: WindowId) -> Option<WindowSnapshot> {
        self.windows
            .get(&id)
            .map(|window| window.snapshot(self.config.header_height))
    }

    /// Snapshots in draw order, bottom first.
    pub fn snapshots(&self) -> Vec<WindowSnapshot> {
        self.draw_order()
            .into_iter()
            .filter_map(|id| self.snapshot(id))
            .collect()
    }

    pub fn snapshots_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.snapshots())
    }

    /// Resolved chrome style, header overrides applied.
    pub fn style_for(&self, id: WindowId) -> Option<ThemeStyle> {
        let window = self.windows.get(&id)?;
        Some(self.themes.style(&window.theme).with_header(window.header))
    }

    pub fn active_gesture(&self) -> Option<Gesture> {
        self.interaction.active()
    }

    /// Pointer pressed on `region` of window `id`. The window is raised
    /// before anything else happens; header controls run their lifecycle
    /// operation, header and resize regions start a gesture. Ignored
    /// entirely while another gesture is running.
    pub fn pointer_down(&mut self, id: WindowId, region: HitRegion, at: Point) -> bool {
        if self.interaction.is_active() {
            tracing::trace!(window_id = %id, "pointer down ignored, gesture in progress");
            return false;
        }
        if !self.bring_to_front(id) {
            return false;
        }
        match region {
            HitRegion::Close => self.close_window(id),
            HitRegion::Minimize => self.toggle_minimize(id),
            HitRegion::Maximize => self.toggle_maximize(id),
            HitRegion::Header => match self.windows.get(&id) {
                Some(window) => self.interaction.begin_drag(window, at),
                None => false,
            },
            HitRegion::Resize(edge) => match self.windows.get(&id) {
                Some(window) => self.interaction.begin_resize(window, edge, at),
                None => false,
            },
            HitRegion::Content => true,
        }
    }

    /// Hit-test `at` and route the press to whatever is under it.
    pub fn pointer_down_at(&mut self, at: Point) -> Option<(WindowId, HitRegion)> {
        if self.interaction.is_active() {
            return None;
        }
        let (id, region) = self.hit_test(at)?;
        self.pointer_down(id, region, at);
        Some((id, region))
    }

    pub fn pointer_move(&mut self, at: Point) -> bool {
        let viewport = self.viewport();
        self.interaction.pointer_move(&mut self.windows, viewport, at)
    }

    pub fn pointer_up(&mut self) -> Option<WindowId> {
        self.interaction.pointer_up(&mut self.windows)
    }

    pub fn cancel_gesture(&mut self) -> Option<WindowId> {
        self.interaction.cancel(&mut self.windows)
    }
}

/// Mutable view of one window, from [`WindowManager::window_mut`].
#[derive(Debug)]
pub struct WindowHandle<'a> {
    window: &'a mut WindowState,
    viewport: Size,
}

impl WindowHandle<'_> {
    pub fn id(&self) -> WindowId {
        self.window.id
    }

    pub fn state(&self) -> &WindowState {
        self.window
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.window.title = title.into();
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.window.content = content.into();
    }

    /// Resize programmatically. The size is clamped to the constraints.
    /// Outside normal mode it becomes the size restored later; the live
    /// bounds of a maximized window are left alone.
    pub fn set_size(&mut self, width: u32, height: u32) {
        let size = self.window.clamp_to_constraints(Size::new(width, height));
        let window = &mut *self.window;
        window.saved_bounds = window.saved_bounds.with_size(size);
        match window.mode {
            WindowMode::Normal => {
                window.bounds = window.bounds.with_size(size);
                self.keep_on_screen();
            }
            WindowMode::Minimized => {
                window.bounds = window.bounds.with_size(size);
            }
            WindowMode::Maximized => {}
        }
        tracing::debug!(window_id = %self.window.id, %size, "size set");
    }

    /// [`set_size`](Self::set_size) from CSS-style strings such as
    /// `"480px"`. A malformed dimension keeps its last known value.
    pub fn set_size_spec(&mut self, width: &str, height: &str) {
        let current = self.window.saved_bounds;
        let width = parse_px_or("width", width, current.width);
        let height = parse_px_or("height", height, current.height);
        self.set_size(width, height);
    }

    pub fn set_base_color(&mut self, color: Rgba) {
        self.window.theme = ThemeSelection::Base(color);
    }

    pub fn set_theme(&mut self, name: impl Into<String>) {
        self.window.theme = ThemeSelection::Named(name.into());
    }

    pub fn set_header_color(&mut self, color: Rgba) {
        self.window.header.background = Some(color);
    }

    pub fn set_header_text_color(&mut self, color: Rgba) {
        self.window.header.text = Some(color);
    }

    /// Replace the size constraints and re-clamp both the live and the
    /// restore bounds. A ceiling below the floor is kept but ignored on
    /// that axis.
    pub fn update_size_constraints(&mut self, min: Size, max: Option<Size>) {
        if let Some(max) = max
            && constraints_conflict(min, Some(max))
        {
            let err = WmError::ConstraintConflict { min, max };
            tracing::warn!(window_id = %self.window.id, %err, "conflicting size constraints");
        }
        let window = &mut *self.window;
        window.min_size = min;
        window.max_size = max;
        let clamp = |b: Bounds| b.with_size(clamp_size(b.width, b.height, min, max));
        window.bounds = clamp(window.bounds);
        window.saved_bounds = clamp(window.saved_bounds);
        if window.is_normal() {
            self.keep_on_screen();
        }
    }

    fn keep_on_screen(&mut self) {
        let bounds = self.window.bounds;
        let origin = clamp_position(bounds.x, bounds.y, bounds.width, bounds.height, self.viewport);
        self.window.bounds = bounds.with_origin(origin);
        self.window.saved_bounds = self.window.saved_bounds.with_origin(origin);
    }
}
