//! Target window lookup
//!
//! This module handles:
//! - Resolving `:ACTIVE:` through `_NET_ACTIVE_WINDOW`
//! - Validating literal window ids
//! - Reading a window's geometry in root coordinates
//! - Handing input focus back once the overlay is gone

use std::fmt;

use x11rb::connection::Connection;
use x11rb::errors::{ConnectionError, ReplyError};
use x11rb::protocol::xproto::{AtomEnum, ConnectionExt as _, InputFocus, Window};

use crate::config::WindowSpec;
use crate::domain::core::PixelRect;
use crate::platform::Display;

/// Error types for window lookup
#[derive(Debug, thiserror::Error)]
pub enum WindowError {
    /// `_NET_ACTIVE_WINDOW` is missing or names no window
    #[error("No active window found (is an EWMH window manager running?)")]
    NoActiveWindow,

    /// The id does not name an existing window
    #[error("Invalid window reference {window}: {source}")]
    InvalidWindowReference {
        window: TargetWindow,
        #[source]
        source: ReplyError,
    },

    #[error("X connection error: {0}")]
    Connection(#[from] ConnectionError),

    #[error("X request failed: {0}")]
    Reply(#[from] ReplyError),
}

/// Handle of the window being moved and resized
///
/// Resolved once per session and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetWindow(Window);

impl TargetWindow {
    pub fn new(id: Window) -> Self {
        Self(id)
    }

    /// The X window id
    pub fn id(self) -> Window {
        self.0
    }
}

impl fmt::Display for TargetWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

/// Interprets the first value of `_NET_ACTIVE_WINDOW`
///
/// The property is absent without an EWMH window manager and holds `None`
/// (0) while nothing is focused.
pub fn active_window_from_property(value: Option<u32>) -> Result<TargetWindow, WindowError> {
    match value {
        Some(id) if id != x11rb::NONE => Ok(TargetWindow::new(id)),
        _ => Err(WindowError::NoActiveWindow),
    }
}

/// Gets the window the window manager reports as active
pub fn get_active_window(display: &Display) -> Result<TargetWindow, WindowError> {
    let reply = display
        .conn()
        .get_property(
            false,
            display.root(),
            display.atoms()._NET_ACTIVE_WINDOW,
            AtomEnum::WINDOW,
            0,
            1,
        )?
        .reply()?;

    let value = reply.value32().and_then(|mut values| values.next());
    active_window_from_property(value)
}

/// Turns a window reference into a validated target
///
/// # Returns
/// The target, or WindowError::InvalidWindowReference if the server does
/// not know the window
pub fn resolve_target(display: &Display, reference: WindowSpec) -> Result<TargetWindow, WindowError> {
    let target = match reference {
        WindowSpec::Active => get_active_window(display)?,
        WindowSpec::Id(id) => TargetWindow::new(id),
    };

    let geometry = window_geometry(display, target)?;
    log::info!("Target window {} currently at {}", target, geometry);
    Ok(target)
}

/// Window geometry with its position in root coordinates
///
/// Under a reparenting window manager this is the client area, not the
/// frame.
pub fn window_geometry(display: &Display, target: TargetWindow) -> Result<PixelRect, WindowError> {
    let invalid = |source: ReplyError| WindowError::InvalidWindowReference {
        window: target,
        source,
    };

    let conn = display.conn();
    let geometry = conn.get_geometry(target.id())?.reply().map_err(invalid)?;
    let origin = conn
        .translate_coordinates(target.id(), display.root(), 0, 0)?
        .reply()
        .map_err(invalid)?;

    Ok(PixelRect::new(
        origin.dst_x.into(),
        origin.dst_y.into(),
        geometry.width.into(),
        geometry.height.into(),
    ))
}

/// Gives keyboard focus back to the target
pub fn restore_focus(display: &Display, target: TargetWindow) -> Result<(), WindowError> {
    display
        .conn()
        .set_input_focus(InputFocus::PARENT, target.id(), x11rb::CURRENT_TIME)?;
    display.conn().flush()?;
    Ok(())
}
