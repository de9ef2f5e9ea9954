//! grid-resize
//!
//! Lays a grid over part of the screen, lets the user pick a rectangle of
//! cells with pointer or keyboard, and moves/resizes an X11 window to match.

pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod input;
pub mod platform;
pub mod ui;
