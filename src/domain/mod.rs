//! Domain logic and core data structures
//!
//! This module contains the pure geometry of the grid: cells, selections and
//! pixel rectangles. It is independent of X11 and of how input arrives.

pub mod core;
pub mod grid;
pub mod selection;
