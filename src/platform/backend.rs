//! Geometry application backends
//!
//! Three ways of getting a rectangle onto the target window:
//! - `ConfigureBackend`: plain ConfigureWindow, not waited on
//! - `MessageBackend`: `_NET_MOVERESIZE_WINDOW` asking the window manager
//! - `DirectBackend`: checked ConfigureWindow plus a geometry read-back
//!
//! The backend is picked once per session by [`applier_for`].

use x11rb::connection::Connection;
use x11rb::errors::{ConnectionError, ReplyError};
use x11rb::protocol::xproto::{
    Atom, ClientMessageData, ClientMessageEvent, ConfigureWindowAux, ConnectionExt as _,
    EventMask, CLIENT_MESSAGE_EVENT,
};

use crate::config::Method;
use crate::domain::core::PixelRect;
use crate::platform::window::{window_geometry, TargetWindow, WindowError};
use crate::platform::Display;

/// NorthWest gravity, the coordinates are those of the frame's top-left corner
const GRAVITY_NORTH_WEST: u32 = 1;
/// x, y, width and height are all present
const MOVERESIZE_ALL_FIELDS: u32 = 0xf << 8;
/// Request comes from a pager/tool rather than the application
const SOURCE_PAGER: u32 = 2 << 12;

/// Errors that can occur while applying geometry
#[derive(Debug, thiserror::Error)]
pub enum ApplyError {
    #[error("Failed to send geometry request: {0}")]
    Connection(#[from] ConnectionError),

    #[error("Server rejected geometry {rect} for window {window}: {source}")]
    Rejected {
        window: TargetWindow,
        rect: PixelRect,
        #[source]
        source: ReplyError,
    },

    #[error("Failed to read back window geometry: {0}")]
    ReadBack(#[from] WindowError),
}

/// Pushes a rectangle onto a window
pub trait GeometryApplier {
    /// Moves and resizes `window` to `rect` (screen coordinates)
    fn apply(&self, window: TargetWindow, rect: PixelRect) -> Result<(), ApplyError>;
}

impl<T: GeometryApplier + ?Sized> GeometryApplier for Box<T> {
    fn apply(&self, window: TargetWindow, rect: PixelRect) -> Result<(), ApplyError> {
        (**self).apply(window, rect)
    }
}

/// Picks the backend for a session
pub fn applier_for<'a>(method: Method, display: &'a Display) -> Box<dyn GeometryApplier + 'a> {
    log::info!("Applying geometry with the {} method", method);
    match method {
        Method::Configure => Box::new(ConfigureBackend::new(display)),
        Method::Message => Box::new(MessageBackend::new(display)),
        Method::Direct => Box::new(DirectBackend::new(display)),
    }
}

/// ConfigureWindow values for a rectangle
pub fn configure_aux(rect: PixelRect) -> ConfigureWindowAux {
    ConfigureWindowAux::new()
        .x(rect.x)
        .y(rect.y)
        .width(rect.width)
        .height(rect.height)
}

/// `_NET_MOVERESIZE_WINDOW` client message for a rectangle
///
/// Positions are sent as their two's complement bit pattern so windows can
/// land on monitors left of or above the origin.
pub fn moveresize_message(
    window: TargetWindow,
    message_type: Atom,
    rect: PixelRect,
) -> ClientMessageEvent {
    let flags = GRAVITY_NORTH_WEST | MOVERESIZE_ALL_FIELDS | SOURCE_PAGER;
    let data = ClientMessageData::from([
        flags,
        rect.x as u32,
        rect.y as u32,
        rect.width,
        rect.height,
    ]);

    ClientMessageEvent {
        response_type: CLIENT_MESSAGE_EVENT,
        format: 32,
        sequence: 0,
        window: window.id(),
        type_: message_type,
        data,
    }
}

/// Fire-and-forget ConfigureWindow on the target
pub struct ConfigureBackend<'a> {
    display: &'a Display,
}

impl<'a> ConfigureBackend<'a> {
    pub fn new(display: &'a Display) -> Self {
        Self { display }
    }
}

impl GeometryApplier for ConfigureBackend<'_> {
    fn apply(&self, window: TargetWindow, rect: PixelRect) -> Result<(), ApplyError> {
        log::debug!("configure {} -> {}", window, rect);
        let conn = self.display.conn();
        conn.configure_window(window.id(), &configure_aux(rect))?;
        conn.flush()?;
        Ok(())
    }
}

fn same_size(a: PixelRect, b: PixelRect) -> bool {
    (a.width, a.height) == (b.width, b.height)
}

/// Asks the window manager to move/resize through EWMH
pub struct MessageBackend<'a> {
    display: &'a Display,
}

impl<'a> MessageBackend<'a> {
    pub fn new(display: &'a Display) -> Self {
        Self { display }
    }
}

impl GeometryApplier for MessageBackend<'_> {
    fn apply(&self, window: TargetWindow, rect: PixelRect) -> Result<(), ApplyError> {
        log::debug!("_NET_MOVERESIZE_WINDOW {} -> {}", window, rect);
        let conn = self.display.conn();
        let event = moveresize_message(window, self.display.atoms()._NET_MOVERESIZE_WINDOW, rect);
        conn.send_event(
            false,
            self.display.root(),
            EventMask::SUBSTRUCTURE_REDIRECT | EventMask::SUBSTRUCTURE_NOTIFY,
            event,
        )?;
        conn.flush()?;
        Ok(())
    }
}

/// Checked ConfigureWindow that waits for the server's verdict
///
/// The size is read back right after the request as a best-effort check.
/// Position is not compared: under a reparenting window manager the client
/// sits inside a frame, and the manager may not have acted yet. A size the
/// manager adjusted (size hints, increments) is a warning, not an error.
pub struct DirectBackend<'a> {
    display: &'a Display,
}

impl<'a> DirectBackend<'a> {
    pub fn new(display: &'a Display) -> Self {
        Self { display }
    }
}

impl GeometryApplier for DirectBackend<'_> {
    fn apply(&self, window: TargetWindow, rect: PixelRect) -> Result<(), ApplyError> {
        log::debug!("direct configure {} -> {}", window, rect);
        self.display
            .conn()
            .configure_window(window.id(), &configure_aux(rect))?
            .check()
            .map_err(|source| ApplyError::Rejected {
                window,
                rect,
                source,
            })?;

        let actual = window_geometry(self.display, window)?;
        if !same_size(actual, rect) {
            log::warn!("Window {} ended up at {} instead of {}", window, actual, rect);
        }
        Ok(())
    }
}
