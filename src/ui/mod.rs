//! Overlay presentation: frame rendering and the X11 surface showing it

pub mod overlay;
pub mod renderer;

pub use overlay::{OverlayError, OverlaySurface, X11Overlay};
pub use renderer::{FrameLayout, OverlayRenderer, OverlayStyle, RendererError};
