//! Input handling for the selection session
//!
//! Display-specific code turns X events into [`InputEvent`]s; the
//! [`interpreter`] turns those into selection decisions.

pub mod interpreter;
pub mod keyboard;

pub use interpreter::{Decision, InputInterpreter, PointerButton};
pub use keyboard::{Direction, KeyAction, KeyboardMap};

/// Errors raised while waiting for input
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Lost connection to the display: {0}")]
    Connection(#[from] x11rb::errors::ConnectionError),

    /// The server reported an error for an earlier request
    #[error("X protocol error: {0:?}")]
    Protocol(x11rb::x11_utils::X11Error),

    #[error("Input source closed")]
    Closed,
}

/// Raw input, already translated out of the display protocol
///
/// Pointer coordinates are in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    PointerMoved { x: i32, y: i32 },
    ButtonPressed { button: PointerButton, x: i32, y: i32 },
    ButtonReleased { button: PointerButton, x: i32, y: i32 },
    Key(KeyAction),
    /// The overlay lost input focus or its grab
    FocusLost,
    /// The overlay contents were damaged
    Exposed,
}

/// A blocking source of input events
pub trait InputSource {
    /// Waits for the next event, without timeout
    fn next_event(&mut self) -> Result<InputEvent, InputError>;
}
