//! X11 platform layer
//!
//! Owns the display connection and the few queries the session needs before
//! and during selection. Window resolution lives in [`window`], geometry
//! application in [`backend`].

pub mod backend;
pub mod window;

use x11rb::connection::Connection;
use x11rb::errors::{ConnectError, ConnectionError, ReplyError};
use x11rb::protocol::xproto::{ConnectionExt as _, Screen, Window};
use x11rb::rust_connection::RustConnection;

use crate::input::KeyboardMap;

pub use backend::{applier_for, ApplyError, GeometryApplier};
pub use window::{resolve_target, TargetWindow, WindowError};

// Interned once per connection
x11rb::atom_manager! {
    pub Atoms: AtomsCookie {
        _NET_ACTIVE_WINDOW,
        _NET_MOVERESIZE_WINDOW,
        _NET_WM_WINDOW_TYPE,
        _NET_WM_WINDOW_TYPE_DESKTOP,
    }
}

/// Errors talking to the X server outside of a specific operation
#[derive(Debug, thiserror::Error)]
pub enum DisplayError {
    #[error("Failed to connect to the X server: {0}")]
    Connect(#[from] ConnectError),

    #[error("X connection error: {0}")]
    Connection(#[from] ConnectionError),

    #[error("X request failed: {0}")]
    Reply(#[from] ReplyError),
}

/// An open display connection with its default screen
pub struct Display {
    conn: RustConnection,
    screen_num: usize,
    atoms: Atoms,
}

impl Display {
    /// Connects to `name`, or to `$DISPLAY` when None
    pub fn connect(name: Option<&str>) -> Result<Self, DisplayError> {
        let (conn, screen_num) = RustConnection::connect(name)?;
        let atoms = Atoms::new(&conn)?.reply()?;

        let display = Self {
            conn,
            screen_num,
            atoms,
        };

        let screen = display.screen();
        log::info!(
            "Connected to X11, screen {}, root window 0x{:x}, {}x{}",
            screen_num,
            screen.root,
            screen.width_in_pixels,
            screen.height_in_pixels
        );

        Ok(display)
    }

    pub fn conn(&self) -> &RustConnection {
        &self.conn
    }

    pub fn atoms(&self) -> &Atoms {
        &self.atoms
    }

    pub fn screen(&self) -> &Screen {
        &self.conn.setup().roots[self.screen_num]
    }

    pub fn root(&self) -> Window {
        self.screen().root
    }

    /// Fetches the keycode to keysym table
    pub fn keyboard_map(&self) -> Result<KeyboardMap, DisplayError> {
        let setup = self.conn.setup();
        let count = setup.max_keycode - setup.min_keycode + 1;
        let reply = self
            .conn
            .get_keyboard_mapping(setup.min_keycode, count)?
            .reply()?;

        Ok(KeyboardMap::new(
            setup.min_keycode,
            reply.keysyms_per_keycode,
            reply.keysyms,
        ))
    }

    /// Current pointer position in root coordinates
    ///
    /// # Returns
    /// None when the pointer is on another screen or the query fails
    pub fn pointer_position(&self) -> Option<(i32, i32)> {
        let reply = self.conn.query_pointer(self.root()).ok()?.reply().ok()?;
        if !reply.same_screen {
            return None;
        }
        Some((reply.root_x.into(), reply.root_y.into()))
    }
}
