pub mod floating;

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Pointer or origin position in pixels. Signed so pointer deltas and
/// off-viewport pointer coordinates stay representable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Signed rectangle origin with unsigned size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Bounds {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i32 {
        self.x.saturating_add(to_i32(self.width))
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(to_i32(self.height))
    }

    pub fn with_origin(self, origin: Point) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            ..self
        }
    }

    pub fn with_size(self, size: Size) -> Self {
        Self {
            width: size.width,
            height: size.height,
            ..self
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        rect_contains(*self, point)
    }
}

pub fn rect_contains(rect: Bounds, point: Point) -> bool {
    if rect.width == 0 || rect.height == 0 {
        return false;
    }
    point.x >= rect.x && point.x < rect.right() && point.y >= rect.y && point.y < rect.bottom()
}

/// Lossless-where-it-matters conversion for pixel sizes, which never get
/// anywhere near `i32::MAX` in a real document.
pub(crate) fn to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Supplies the current viewport size on demand. The manager asks for it
/// every time it needs to clamp, so hosts only have to keep it current.
pub trait ViewportProvider {
    fn viewport(&self) -> Size;
}

impl ViewportProvider for Size {
    fn viewport(&self) -> Size {
        *self
    }
}

impl<F: Fn() -> Size> ViewportProvider for F {
    fn viewport(&self) -> Size {
        self()
    }
}

/// Viewport shared between the host event loop and the manager.
#[derive(Debug, Clone, Default)]
pub struct SharedViewport {
    inner: Rc<Cell<Size>>,
}

impl SharedViewport {
    pub fn new(size: Size) -> Self {
        Self {
            inner: Rc::new(Cell::new(size)),
        }
    }

    pub fn set(&self, size: Size) {
        self.inner.set(size);
    }
}

impl ViewportProvider for SharedViewport {
    fn viewport(&self) -> Size {
        self.inner.get()
    }
}
