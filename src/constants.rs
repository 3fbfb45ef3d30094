//! Shared crate-wide constants.
//!
//! All distances are CSS pixels.

/// Width given to a window whose config does not specify one.
pub const DEFAULT_WINDOW_WIDTH: u32 = 400;

/// Height given to a window whose config does not specify one.
pub const DEFAULT_WINDOW_HEIGHT: u32 = 300;

/// Origin of the first window when no explicit position is configured.
pub const DEFAULT_WINDOW_X: i32 = 100;
pub const DEFAULT_WINDOW_Y: i32 = 100;

pub const DEFAULT_WINDOW_TITLE: &str = "New Window";

/// Smallest size a window may be resized to unless its config overrides it.
pub const DEFAULT_MIN_WIDTH: u32 = 200;
pub const DEFAULT_MIN_HEIGHT: u32 = 150;

/// Offset applied per live window when staggering default origins, so new
/// windows cascade instead of stacking exactly on top of each other.
pub const STAGGER_STEP: i32 = 30;

/// Gap kept between a staggered window and the right/bottom viewport edges.
pub const PLACEMENT_MARGIN: i32 = 50;

/// Inset from every viewport edge used for maximized windows.
pub const MAXIMIZE_MARGIN: i32 = 20;

/// Height of the title bar. A minimized window collapses to exactly this.
pub const HEADER_HEIGHT: u32 = 40;

/// Stacking base. The first window created receives `BASE_Z_INDEX + 1`.
pub const BASE_Z_INDEX: u32 = 10;

/// Width of the east/west resize strips.
pub const RESIZE_EDGE_THICKNESS: u32 = 5;

/// Side length of the south-east resize corner.
pub const RESIZE_CORNER_SIZE: u32 = 15;

/// Side length of a header control button and the gap between buttons.
pub const HEADER_BUTTON_SIZE: u32 = 24;
pub const HEADER_BUTTON_GAP: u32 = 5;

/// Horizontal padding inside the title bar.
pub const HEADER_PADDING_X: u32 = 12;
