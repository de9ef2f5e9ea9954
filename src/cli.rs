//! Command line surface
//!
//! Arguments are kept as raw strings here; `config::SessionConfig::from_cli`
//! turns them into typed, validated values.

use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(name = "grid-resize")]
#[command(version, about = "Select a region of a screen grid and move/resize an X11 window to it")]
pub struct Cli {
    /// Window to resize: `:ACTIVE:` or a window id (decimal or 0x hex)
    #[arg(value_name = "WINDOW")]
    pub window: String,

    /// Screen area covered by the grid, as x,y,width,height
    #[arg(value_name = "DIMENSIONS", allow_hyphen_values = true)]
    pub dimensions: String,

    /// Grid size as columns,rows
    #[arg(value_name = "CELLS")]
    pub cells: String,

    /// Highlight color as r,g,b with components in 0.0..=1.0
    #[arg(long, value_name = "R,G,B", default_value = "0.898,0.513,0.964")]
    pub color: String,

    /// Move/resize the window while the selection changes
    #[arg(long, action = ArgAction::SetTrue)]
    pub live: bool,

    /// How the geometry is applied (configure, message or direct)
    #[arg(long, short = 'm', value_name = "METHOD", default_value = "configure")]
    pub method: String,

    /// Do not draw grid lines on the overlay
    #[arg(long, action = ArgAction::SetTrue)]
    pub no_grid_lines: bool,

    /// X display to connect to (defaults to $DISPLAY)
    #[arg(long, value_name = "NAME")]
    pub display: Option<String>,
}
