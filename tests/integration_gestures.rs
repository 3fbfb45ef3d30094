use dom_wm::layout::floating::{HitRegion, ResizeEdge};
use dom_wm::{Bounds, Point, SharedViewport, Size, WindowConfig, WindowManager, WindowMode};

fn manager() -> WindowManager {
    WindowManager::new(Size::new(1000, 800))
}

#[test]
fn drag_stays_inside_viewport() {
    let mut wm = manager();
    let id = wm.create_window(WindowConfig::new());
    assert!(wm.pointer_down(id, HitRegion::Header, Point::new(120, 110)));
    for (x, y) in [(-300, 50), (2000, -90), (2000, 2000), (400, 400)] {
        wm.pointer_move(Point::new(x, y));
        let b = wm.window(id).map(|w| w.bounds()).unwrap_or_default();
        assert!(b.x >= 0 && b.y >= 0, "{b:?}");
        assert!(b.right() <= 1000 && b.bottom() <= 800, "{b:?}");
    }
    assert_eq!(wm.pointer_up(), Some(id));
}

#[test]
fn drag_follows_a_shrinking_viewport() {
    let viewport = SharedViewport::new(Size::new(1000, 800));
    let mut wm = WindowManager::new(viewport.clone());
    let id = wm.create_window(WindowConfig::new());
    wm.pointer_down(id, HitRegion::Header, Point::new(120, 110));
    viewport.set(Size::new(600, 500));
    wm.pointer_move(Point::new(900, 900));
    assert_eq!(
        wm.window(id).map(|w| w.bounds()),
        Some(Bounds::new(200, 200, 400, 300))
    );
}

#[test]
fn west_resize_holds_right_edge() {
    let mut wm = manager();
    let id = wm.create_window(WindowConfig::new().position(300, 100));
    let right = wm.window(id).map(|w| w.bounds().right());
    wm.pointer_down(id, HitRegion::Resize(ResizeEdge::West), Point::new(302, 250));
    for x in [250, 0, -100, 500, 650, 120] {
        wm.pointer_move(Point::new(x, 250));
        assert_eq!(wm.window(id).map(|w| w.bounds().right()), right, "pointer x = {x}");
    }
    wm.pointer_up();
}

#[test]
fn resize_disabled_outside_normal_mode() {
    let mut wm = manager();
    let id = wm.create_window(WindowConfig::new());
    wm.maximize(id);
    let before = wm.window(id).map(|w| w.bounds());
    assert!(!wm.pointer_down(id, HitRegion::Resize(ResizeEdge::SouthEast), Point::new(979, 779)));
    wm.pointer_move(Point::new(500, 500));
    assert_eq!(wm.window(id).map(|w| w.bounds()), before);
    assert!(wm.active_gesture().is_none());
}

#[test]
fn only_one_gesture_at_a_time() {
    let mut wm = manager();
    let a = wm.create_window(WindowConfig::new());
    let b = wm.create_window(WindowConfig::new());
    wm.pointer_down(a, HitRegion::Header, Point::new(120, 110));
    assert!(!wm.pointer_down(b, HitRegion::Resize(ResizeEdge::East), Point::new(528, 300)));
    assert!(!wm.pointer_down(b, HitRegion::Close, Point::new(0, 0)));
    assert_eq!(wm.len(), 2);
    wm.pointer_up();
    assert!(wm.pointer_down(b, HitRegion::Close, Point::new(0, 0)));
    assert_eq!(wm.len(), 1);
}

#[test]
fn mode_change_mid_drag_drops_gesture() {
    let mut wm = manager();
    let id = wm.create_window(WindowConfig::new());
    wm.pointer_down(id, HitRegion::Header, Point::new(120, 110));
    wm.minimize(id);
    assert!(!wm.pointer_move(Point::new(600, 600)));
    assert!(wm.active_gesture().is_none());
    assert_eq!(wm.window(id).map(|w| w.mode()), Some(WindowMode::Minimized));
    assert_eq!(
        wm.window(id).map(|w| w.bounds().origin()),
        Some(Point::new(100, 100))
    );
}

#[test]
fn clamp_size_floor() {
    let size = dom_wm::layout::floating::clamp_size(50, 50, Size::new(200, 150), None);
    assert_eq!(size, Size::new(200, 150));
}
