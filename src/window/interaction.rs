//! Pointer-driven drag and resize.
//!
//! One controller serves every window. It owns a single gesture slot, so two
//! windows can never be in a drag or resize at the same time, and a stray
//! pointer-down while a gesture runs is ignored until pointer-up.

use std::collections::BTreeMap;

use super::{WindowId, WindowMode, WindowState};
use crate::layout::floating::{HeaderDrag, ResizeDrag, ResizeEdge, apply_resize, clamp_position};
use crate::layout::{Point, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Drag(HeaderDrag<WindowId>),
    Resize(ResizeDrag<WindowId>),
}

impl Gesture {
    pub fn window(&self) -> WindowId {
        match self {
            Gesture::Drag(drag) => drag.id,
            Gesture::Resize(drag) => drag.id,
        }
    }
}

#[derive(Debug, Default)]
pub struct InteractionController {
    active: Option<Gesture>,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<Gesture> {
        self.active
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Start moving `window` by its header. Only normal windows move.
    pub fn begin_drag(&mut self, window: &WindowState, pointer: Point) -> bool {
        if self.active.is_some() || !window.is_normal() {
            return false;
        }
        let bounds = window.bounds();
        self.active = Some(Gesture::Drag(HeaderDrag {
            id: window.id(),
            offset: Point::new(pointer.x - bounds.x, pointer.y - bounds.y),
            committed: bounds,
        }));
        tracing::debug!(window_id = %window.id(), ?pointer, "drag started");
        true
    }

    /// Start resizing `window` from `edge`. Refused for fixed-size windows
    /// and for anything not in normal mode.
    pub fn begin_resize(&mut self, window: &WindowState, edge: ResizeEdge, pointer: Point) -> bool {
        if self.active.is_some() || !window.is_normal() || !window.resizable() {
            return false;
        }
        self.active = Some(Gesture::Resize(ResizeDrag {
            id: window.id(),
            edge,
            start_bounds: window.bounds(),
            start_pointer: pointer,
        }));
        tracing::debug!(window_id = %window.id(), ?edge, ?pointer, "resize started");
        true
    }

    /// Apply one pointer-move frame. Returns whether any bounds changed.
    pub fn pointer_move(
        &mut self,
        windows: &mut BTreeMap<WindowId, WindowState>,
        viewport: Size,
        pointer: Point,
    ) -> bool {
        let Some(gesture) = self.active else {
            return false;
        };
        let Some(window) = windows.get_mut(&gesture.window()) else {
            self.active = None;
            return false;
        };
        if !window.is_normal() {
            tracing::debug!(window_id = %window.id, "window left normal mode, dropping gesture");
            self.active = None;
            return false;
        }

        match gesture {
            Gesture::Drag(drag) => {
                let origin = clamp_position(
                    pointer.x - drag.offset.x,
                    pointer.y - drag.offset.y,
                    window.bounds.width,
                    window.bounds.height,
                    viewport,
                );
                if origin == window.bounds.origin() {
                    return false;
                }
                window.bounds = window.bounds.with_origin(origin);
                tracing::trace!(window_id = %drag.id, x = origin.x, y = origin.y, "drag");
                true
            }
            Gesture::Resize(drag) => {
                if !window.resizable {
                    return false;
                }
                let Some(next) = apply_resize(&drag, pointer, window.min_size, window.max_size)
                else {
                    tracing::trace!(window_id = %drag.id, "resize frame rejected");
                    return false;
                };
                if next == window.bounds {
                    return false;
                }
                window.bounds = next;
                tracing::trace!(window_id = %drag.id, bounds = ?next, "resize");
                true
            }
        }
    }

    /// End the gesture and commit the final bounds as the restore point.
    pub fn pointer_up(&mut self, windows: &mut BTreeMap<WindowId, WindowState>) -> Option<WindowId> {
        let gesture = self.active.take()?;
        let id = gesture.window();
        let window = windows.get_mut(&id)?;
        match gesture {
            Gesture::Drag(_) => {
                if window.mode != WindowMode::Maximized {
                    window.saved_bounds.x = window.bounds.x;
                    window.saved_bounds.y = window.bounds.y;
                }
            }
            Gesture::Resize(_) => {
                if window.is_normal() {
                    window.saved_bounds = window.bounds;
                }
            }
        }
        tracing::debug!(window_id = %id, bounds = ?window.bounds, "gesture committed");
        Some(id)
    }

    /// Abort the gesture, putting the window back where it was when the
    /// gesture began.
    pub fn cancel(&mut self, windows: &mut BTreeMap<WindowId, WindowState>) -> Option<WindowId> {
        let gesture = self.active.take()?;
        let id = gesture.window();
        let window = windows.get_mut(&id)?;
        if window.is_normal() {
            window.bounds = match gesture {
                Gesture::Drag(drag) => drag.committed,
                Gesture::Resize(drag) => drag.start_bounds,
            };
        }
        tracing::debug!(window_id = %id, "gesture cancelled");
        Some(id)
    }

    /// Forget a gesture targeting `id`. Called when the window goes away.
    pub fn release_window(&mut self, id: WindowId) -> bool {
        if self.active.is_some_and(|gesture| gesture.window() == id) {
            self.active = None;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Bounds;
    use crate::theme::{HeaderOverrides, ThemeSelection};

    const VIEWPORT: Size = Size::new(1000, 800);

    fn window(id: u64, bounds: Bounds) -> WindowState {
        WindowState {
            id: WindowId::new(id),
            title: format!("w{id}"),
            content: String::new(),
            bounds,
            saved_bounds: bounds,
            mode: WindowMode::Normal,
            resizable: true,
            allow_minimize: true,
            allow_maximize: true,
            z_index: 10 + id as u32,
            min_size: Size::new(200, 150),
            max_size: None,
            theme: ThemeSelection::default(),
            header: HeaderOverrides::default(),
        }
    }

    fn registry(list: &[WindowState]) -> BTreeMap<WindowId, WindowState> {
        list.iter().cloned().map(|w| (w.id(), w)).collect()
    }

    #[test]
    fn drag_moves_by_captured_offset_and_clamps() {
        let a = window(1, Bounds::new(100, 100, 400, 300));
        let mut windows = registry(&[a.clone()]);
        let mut ctl = InteractionController::new();
        assert!(ctl.begin_drag(&a, Point::new(150, 110)));

        assert!(ctl.pointer_move(&mut windows, VIEWPORT, Point::new(250, 210)));
        assert_eq!(windows[&a.id()].bounds().origin(), Point::new(200, 200));

        ctl.pointer_move(&mut windows, VIEWPORT, Point::new(-500, -500));
        assert_eq!(windows[&a.id()].bounds().origin(), Point::new(0, 0));

        ctl.pointer_move(&mut windows, VIEWPORT, Point::new(5000, 5000));
        assert_eq!(windows[&a.id()].bounds().origin(), Point::new(600, 500));

        assert_eq!(ctl.pointer_up(&mut windows), Some(a.id()));
        assert_eq!(windows[&a.id()].saved_bounds().origin(), Point::new(600, 500));
        assert!(!ctl.is_active());
    }

    #[test]
    fn second_pointer_down_is_ignored_while_active() {
        let a = window(1, Bounds::new(100, 100, 400, 300));
        let b = window(2, Bounds::new(300, 300, 400, 300));
        let mut ctl = InteractionController::new();
        assert!(ctl.begin_drag(&a, Point::new(110, 110)));
        assert!(!ctl.begin_drag(&b, Point::new(310, 310)));
        assert!(!ctl.begin_resize(&b, ResizeEdge::East, Point::new(699, 400)));
        assert_eq!(ctl.active().map(|g| g.window()), Some(a.id()));
    }

    #[test]
    fn resize_refused_for_fixed_or_non_normal_windows() {
        let mut fixed = window(1, Bounds::new(100, 100, 400, 300));
        fixed.resizable = false;
        let mut ctl = InteractionController::new();
        assert!(!ctl.begin_resize(&fixed, ResizeEdge::East, Point::new(499, 200)));

        let mut maxed = window(2, Bounds::new(100, 100, 400, 300));
        maxed.mode = WindowMode::Maximized;
        assert!(!ctl.begin_resize(&maxed, ResizeEdge::East, Point::new(499, 200)));
        assert!(!ctl.begin_drag(&maxed, Point::new(150, 110)));
    }

    #[test]
    fn west_resize_holds_right_edge_across_gesture() {
        let a = window(1, Bounds::new(300, 100, 400, 300));
        let right = a.bounds().right();
        let mut windows = registry(&[a.clone()]);
        let mut ctl = InteractionController::new();
        assert!(ctl.begin_resize(&a, ResizeEdge::West, Point::new(300, 200)));
        for x in [250, 100, 0, -40, -200, 320, 600, 450] {
            ctl.pointer_move(&mut windows, VIEWPORT, Point::new(x, 200));
            let b = windows[&a.id()].bounds();
            assert_eq!(b.right(), right, "pointer x = {x}");
            assert!(b.x >= 0);
        }
        ctl.pointer_up(&mut windows);
        assert_eq!(windows[&a.id()].saved_bounds(), windows[&a.id()].bounds());
    }

    #[test]
    fn west_resize_past_left_edge_keeps_previous_frame() {
        let a = window(1, Bounds::new(50, 100, 400, 300));
        let mut windows = registry(&[a.clone()]);
        let mut ctl = InteractionController::new();
        ctl.begin_resize(&a, ResizeEdge::West, Point::new(50, 200));
        assert!(ctl.pointer_move(&mut windows, VIEWPORT, Point::new(20, 200)));
        assert_eq!(windows[&a.id()].bounds(), Bounds::new(20, 100, 430, 300));
        assert!(!ctl.pointer_move(&mut windows, VIEWPORT, Point::new(-10, 200)));
        assert_eq!(windows[&a.id()].bounds(), Bounds::new(20, 100, 430, 300));
    }

    #[test]
    fn cancel_reverts_to_committed_bounds() {
        let a = window(1, Bounds::new(100, 100, 400, 300));
        let mut windows = registry(&[a.clone()]);
        let mut ctl = InteractionController::new();
        ctl.begin_resize(&a, ResizeEdge::SouthEast, Point::new(499, 399));
        ctl.pointer_move(&mut windows, VIEWPORT, Point::new(700, 600));
        assert_ne!(windows[&a.id()].bounds(), a.bounds());
        assert_eq!(ctl.cancel(&mut windows), Some(a.id()));
        assert_eq!(windows[&a.id()].bounds(), a.bounds());
        assert!(!ctl.is_active());
    }

    #[test]
    fn gesture_on_vanished_window_is_dropped() {
        let a = window(1, Bounds::new(100, 100, 400, 300));
        let mut windows = registry(&[a.clone()]);
        let mut ctl = InteractionController::new();
        ctl.begin_drag(&a, Point::new(110, 110));
        windows.clear();
        assert!(!ctl.pointer_move(&mut windows, VIEWPORT, Point::new(200, 200)));
        assert!(!ctl.is_active());
    }

    #[test]
    fn release_window_only_clears_matching_gesture() {
        let a = window(1, Bounds::new(100, 100, 400, 300));
        let mut ctl = InteractionController::new();
        ctl.begin_drag(&a, Point::new(110, 110));
        assert!(!ctl.release_window(WindowId::new(99)));
        assert!(ctl.is_active());
        assert!(ctl.release_window(a.id()));
        assert!(!ctl.is_active());
    }
}
