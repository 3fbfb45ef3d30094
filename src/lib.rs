//! Floating window manager state machine for browser-hosted desktops.
//!
//! The crate owns window geometry, stacking and the drag/resize gesture
//! state. Hosts feed it pointer events and render the snapshots it produces
//! through a [`Renderer`](window::decorator::Renderer).

pub mod colors;
pub mod config;
pub mod constants;
pub mod error;
pub mod event_loop;
pub mod layout;
pub mod theme;
pub mod tracing_sub;
pub mod window;

pub use error::WmError;
pub use layout::{Bounds, Point, SharedViewport, Size, ViewportProvider};
pub use window::{
    WindowConfig, WindowHandle, WindowId, WindowManager, WindowMode, WindowProperties,
    WindowSnapshot, WindowState,
};
