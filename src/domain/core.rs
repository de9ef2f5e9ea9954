//! Core domain types and operations
//!
//! This module defines pure geometry types in screen pixel space. Nothing in
//! here knows about X11 or about how a rectangle ends up on screen.

use std::fmt;

/// Rectangle in screen pixel coordinates
///
/// This is the fundamental building block for all geometric calculations:
/// grid cells, selections and the final window geometry are all `PixelRect`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    /// Creates a new rectangle
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Creates a rectangle from its left/top and right/bottom edges
    ///
    /// The right and bottom edges are exclusive. Inverted edges produce an
    /// empty rectangle rather than wrapping around.
    pub fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            x: left,
            y: top,
            width: (right - left).max(0) as u32,
            height: (bottom - top).max(0) as u32,
        }
    }

    /// Returns the exclusive right edge coordinate
    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    /// Returns the exclusive bottom edge coordinate
    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    /// Returns true if this rectangle contains the given point
    pub fn contains_point(&self, px: i32, py: i32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// Returns this rectangle shifted by the given offset
    ///
    /// Used to move between screen space and overlay-local space.
    pub fn translate(&self, dx: i32, dy: i32) -> PixelRect {
        PixelRect::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

/// X geometry notation: `WIDTHxHEIGHT+X+Y`
impl fmt::Display for PixelRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}{:+}{:+}", self.width, self.height, self.x, self.y)
    }
}
