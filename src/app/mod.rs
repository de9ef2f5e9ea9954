//! Session orchestration
//!
//! Wires the interpreter, renderer, overlay and geometry backend into one
//! event loop and tracks where the session stands.

pub mod controller;
pub mod state;

pub use controller::{AppError, SessionController};
pub use state::{SessionOutcome, SessionState};
