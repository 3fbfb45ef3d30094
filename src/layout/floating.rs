use serde::{Deserialize, Serialize};

use super::{Bounds, Point, Size, to_i32};
use crate::constants::{
    HEADER_BUTTON_GAP, HEADER_BUTTON_SIZE, HEADER_PADDING_X, RESIZE_CORNER_SIZE,
    RESIZE_EDGE_THICKNESS,
};

/// Resize affordances a window exposes. Only the right, left and bottom
/// edges plus the bottom-right corner are grabbable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeEdge {
    East,
    West,
    South,
    SouthEast,
}

impl ResizeEdge {
    pub const ALL: [ResizeEdge; 4] = [
        ResizeEdge::SouthEast,
        ResizeEdge::East,
        ResizeEdge::West,
        ResizeEdge::South,
    ];

    /// CSS cursor / class suffix for the affordance.
    pub fn css_name(self) -> &'static str {
        match self {
            ResizeEdge::East => "e",
            ResizeEdge::West => "w",
            ResizeEdge::South => "s",
            ResizeEdge::SouthEast => "se",
        }
    }
}

/// What a pointer landed on inside a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HitRegion {
    Close,
    Minimize,
    Maximize,
    Header,
    Resize(ResizeEdge),
    Content,
}

/// Chrome switches that decide which hit regions exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChromeFlags {
    pub resizable: bool,
    pub allow_minimize: bool,
    pub allow_maximize: bool,
    /// Resize affordances only exist while the window is in normal mode.
    pub normal: bool,
    /// Minimized windows collapse to their header.
    pub minimized: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeHandle {
    pub rect: Bounds,
    pub edge: ResizeEdge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderButton {
    pub rect: Bounds,
    pub region: HitRegion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderDrag<Id: Copy + Eq> {
    pub id: Id,
    /// Pointer position relative to the window origin at gesture start.
    pub offset: Point,
    /// Bounds when the gesture began; a cancelled drag reverts to these.
    pub committed: Bounds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeDrag<Id: Copy + Eq> {
    pub id: Id,
    pub edge: ResizeEdge,
    pub start_bounds: Bounds,
    pub start_pointer: Point,
}

/// Keep a window of `width`×`height` fully inside the viewport. Axes where
/// the window is larger than the viewport pin to 0.
pub fn clamp_position(x: i32, y: i32, width: u32, height: u32, viewport: Size) -> Point {
    let max_x = (i64::from(viewport.width) - i64::from(width)).max(0);
    let max_y = (i64::from(viewport.height) - i64::from(height)).max(0);
    Point {
        x: i64::from(x).clamp(0, max_x) as i32,
        y: i64::from(y).clamp(0, max_y) as i32,
    }
}

/// Apply the min floor, then the max ceiling. A ceiling below the floor on
/// an axis is ignored for that axis so a window never ends up below `min`.
pub fn clamp_size(width: u32, height: u32, min: Size, max: Option<Size>) -> Size {
    let clamp_axis = |value: u32, floor: u32, ceiling: Option<u32>| {
        let value = value.max(floor);
        match ceiling {
            Some(ceiling) if ceiling >= floor => value.min(ceiling),
            _ => value,
        }
    };
    Size {
        width: clamp_axis(width, min.width, max.map(|m| m.width)),
        height: clamp_axis(height, min.height, max.map(|m| m.height)),
    }
}

/// Whether `max` is smaller than `min` on either axis.
pub fn constraints_conflict(min: Size, max: Option<Size>) -> bool {
    max.is_some_and(|max| max.width < min.width || max.height < min.height)
}

fn grow(start: u32, delta: i64) -> u32 {
    (i64::from(start) + delta).clamp(0, i64::from(u32::MAX)) as u32
}

/// Compute the bounds for one resize frame.
///
/// Returns `None` when the frame must be rejected: a west resize whose left
/// edge would cross 0 leaves the window where it was, so the right edge
/// never moves.
pub fn apply_resize<Id: Copy + Eq>(
    drag: &ResizeDrag<Id>,
    pointer: Point,
    min: Size,
    max: Option<Size>,
) -> Option<Bounds> {
    let start = drag.start_bounds;
    let dx = i64::from(pointer.x) - i64::from(drag.start_pointer.x);
    let dy = i64::from(pointer.y) - i64::from(drag.start_pointer.y);

    match drag.edge {
        ResizeEdge::East => {
            let size = clamp_size(grow(start.width, dx), start.height, min, max);
            Some(start.with_size(size))
        }
        ResizeEdge::South => {
            let size = clamp_size(start.width, grow(start.height, dy), min, max);
            Some(start.with_size(size))
        }
        ResizeEdge::SouthEast => {
            let size = clamp_size(grow(start.width, dx), grow(start.height, dy), min, max);
            Some(start.with_size(size))
        }
        ResizeEdge::West => {
            let size = clamp_size(grow(start.width, -dx), start.height, min, max);
            let new_left =
                i64::from(start.x) - (i64::from(size.width) - i64::from(start.width));
            if new_left < 0 {
                return None;
            }
            Some(Bounds {
                x: new_left as i32,
                y: start.y,
                width: size.width,
                height: size.height,
            })
        }
    }
}

/// Full viewport minus `margin` on every side.
pub fn maximized_bounds(viewport: Size, margin: i32) -> Bounds {
    let inset = u32::try_from(margin.max(0)).unwrap_or(0).saturating_mul(2);
    Bounds {
        x: margin.max(0),
        y: margin.max(0),
        width: viewport.width.saturating_sub(inset),
        height: viewport.height.saturating_sub(inset),
    }
}

/// Cascade origin for the `index`-th window: `base + index * step`, pulled
/// back so the window ends at least `margin` before the right and bottom
/// viewport edges, and never negative.
pub fn staggered_origin(
    base: Point,
    index: usize,
    step: i32,
    size: Size,
    viewport: Size,
    margin: i32,
) -> Point {
    let offset = i64::try_from(index)
        .unwrap_or(i64::MAX)
        .saturating_mul(i64::from(step));
    let axis = |base: i32, extent: u32, room: u32| {
        let wanted = i64::from(base).saturating_add(offset);
        let limit = i64::from(room) - i64::from(extent) - i64::from(margin);
        wanted.min(limit).clamp(0, i64::from(i32::MAX)) as i32
    };
    Point {
        x: axis(base.x, size.width, viewport.width),
        y: axis(base.y, size.height, viewport.height),
    }
}

/// Header strip of a window.
pub fn header_rect(rect: Bounds, header_height: u32) -> Bounds {
    Bounds {
        height: header_height.min(rect.height),
        ..rect
    }
}

/// Header controls laid out right to left: close, maximize, minimize.
pub fn header_buttons(rect: Bounds, header_height: u32, flags: ChromeFlags) -> Vec<HeaderButton> {
    let header = header_rect(rect, header_height);
    let size = HEADER_BUTTON_SIZE.min(header.height);
    let top = header.y + to_i32(header.height.saturating_sub(size) / 2);
    let mut right = header.right() - to_i32(HEADER_PADDING_X);
    let mut buttons = Vec::with_capacity(3);
    let mut regions = vec![HitRegion::Close];
    if flags.allow_maximize {
        regions.push(HitRegion::Maximize);
    }
    if flags.allow_minimize {
        regions.push(HitRegion::Minimize);
    }
    for region in regions {
        let left = right - to_i32(size);
        if left < header.x {
            break;
        }
        buttons.push(HeaderButton {
            rect: Bounds::new(left, top, size, size),
            region,
        });
        right = left - to_i32(HEADER_BUTTON_GAP);
    }
    buttons
}

pub fn resize_handles_for_region(rect: Bounds, flags: ChromeFlags) -> Vec<ResizeHandle> {
    let mut handles = Vec::new();
    if !flags.resizable || !flags.normal || rect.width == 0 || rect.height == 0 {
        return handles;
    }
    let corner = RESIZE_CORNER_SIZE.min(rect.width).min(rect.height);
    let thickness = RESIZE_EDGE_THICKNESS.min(rect.width);
    handles.push(ResizeHandle {
        rect: Bounds::new(
            rect.right() - to_i32(corner),
            rect.bottom() - to_i32(corner),
            corner,
            corner,
        ),
        edge: ResizeEdge::SouthEast,
    });
    handles.push(ResizeHandle {
        rect: Bounds::new(
            rect.right() - to_i32(thickness),
            rect.y,
            thickness,
            rect.height,
        ),
        edge: ResizeEdge::East,
    });
    handles.push(ResizeHandle {
        rect: Bounds::new(rect.x, rect.y, thickness, rect.height),
        edge: ResizeEdge::West,
    });
    let thickness = RESIZE_EDGE_THICKNESS.min(rect.height);
    handles.push(ResizeHandle {
        rect: Bounds::new(
            rect.x,
            rect.bottom() - to_i32(thickness),
            rect.width,
            thickness,
        ),
        edge: ResizeEdge::South,
    });
    handles
}

/// Resolve which region of a window (drawn at `rect`) a point falls on.
/// Resize affordances sit above everything else, then header controls,
/// then the title bar, then content.
pub fn hit_test(
    rect: Bounds,
    header_height: u32,
    flags: ChromeFlags,
    point: Point,
) -> Option<HitRegion> {
    if !rect.contains(point) {
        return None;
    }
    if let Some(handle) = resize_handles_for_region(rect, flags)
        .into_iter()
        .find(|handle| handle.rect.contains(point))
    {
        return Some(HitRegion::Resize(handle.edge));
    }
    if let Some(button) = header_buttons(rect, header_height, flags)
        .into_iter()
        .find(|button| button.rect.contains(point))
    {
        return Some(button.region);
    }
    if header_rect(rect, header_height).contains(point) {
        return Some(HitRegion::Header);
    }
    if flags.minimized {
        return None;
    }
    Some(HitRegion::Content)
}
