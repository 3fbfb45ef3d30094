use dom_wm::{Bounds, Size, WindowConfig, WindowManager, WindowMode};

#[test]
fn default_placement_cascades() {
    let mut wm = WindowManager::new(Size::new(1280, 800));
    let first = wm.create_window(WindowConfig::new());
    let second = wm.create_window(WindowConfig::new());
    assert_eq!(
        wm.window(first).map(|w| w.bounds()),
        Some(Bounds::new(100, 100, 400, 300))
    );
    assert_eq!(
        wm.window(second).map(|w| w.bounds()),
        Some(Bounds::new(130, 130, 400, 300))
    );
}

#[test]
fn raise_gives_highest_z() {
    let mut wm = WindowManager::new(Size::new(1280, 800));
    let ids: Vec<_> = (0..4).map(|_| wm.create_window(WindowConfig::new())).collect();
    wm.bring_to_front(ids[1]);
    let top = wm.window(ids[1]).map(|w| w.z_index()).unwrap_or_default();
    for id in ids.iter().filter(|id| **id != ids[1]) {
        assert!(wm.window(*id).map(|w| w.z_index()).unwrap_or_default() < top);
    }
    assert_eq!(wm.draw_order().last(), Some(&ids[1]));
}

#[test]
fn operations_on_closed_window_are_no_ops() {
    let mut wm = WindowManager::new(Size::new(1280, 800));
    let id = wm.create_window(WindowConfig::new());
    assert!(wm.close_window(id));
    assert!(!wm.close_window(id));
    assert!(!wm.minimize(id));
    assert!(!wm.restore(id));
    assert!(wm.snapshot(id).is_none());
    assert!(wm.style_for(id).is_none());
    assert!(wm.try_window_mut(id).is_err());
}

#[test]
fn ids_are_never_reused() {
    let mut wm = WindowManager::new(Size::new(1280, 800));
    let first = wm.create_window(WindowConfig::new());
    wm.close_window(first);
    let second = wm.create_window(WindowConfig::new());
    assert_ne!(first, second);
    assert!(wm.window(first).is_none());
    assert_eq!(wm.window(second).map(|w| w.mode()), Some(WindowMode::Normal));
}
