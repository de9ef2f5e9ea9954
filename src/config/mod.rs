//! Session configuration
//!
//! Validates the raw command line into the immutable settings a session runs
//! with. Nothing here talks to the display; window references are only parsed,
//! resolution happens in `platform::window`.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::cli::Cli;
use crate::domain::core::PixelRect;
use crate::domain::grid::{GridError, GridSpec};

/// Errors produced while validating arguments
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Invalid {what} '{value}': expected {expected}")]
    InvalidList {
        what: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("Color component {component} is outside 0.0..=1.0")]
    ColorOutOfRange { component: f32 },

    #[error("Unknown method '{0}': expected configure, message or direct")]
    UnknownMethod(String),

    #[error("Invalid window '{0}': expected :ACTIVE: or a window id")]
    InvalidWindow(String),

    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Parses exactly `count` comma separated values
///
/// # Arguments
/// * `text` - Input such as `"0,0,1920,1080"`
/// * `count` - Number of values required
/// * `what` - Argument name used in the error
/// * `expected` - Format description used in the error
pub fn parse_list<T: FromStr>(
    text: &str,
    count: usize,
    what: &'static str,
    expected: &'static str,
) -> Result<Vec<T>, ConfigError> {
    let invalid = || ConfigError::InvalidList {
        what,
        value: text.to_string(),
        expected,
    };

    let values = text
        .split(',')
        .map(|part| part.trim().parse::<T>().map_err(|_| invalid()))
        .collect::<Result<Vec<T>, ConfigError>>()?;

    if values.len() != count {
        return Err(invalid());
    }
    Ok(values)
}

/// An RGB color with components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    /// Light gray the focused cell is blended toward
    pub const HIGHLIGHT: Rgb = Rgb::new(0.9, 0.9, 0.9);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Linear blend toward `other`; `weight` 0.0 keeps self, 1.0 yields other
    pub fn lerp(self, other: Rgb, weight: f32) -> Rgb {
        let mix = |a: f32, b: f32| a + (b - a) * weight;
        Rgb::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Rgb::new(0.898, 0.513, 0.964)
    }
}

impl FromStr for Rgb {
    type Err = ConfigError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let parts = parse_list::<f32>(text, 3, "color", "r,g,b")?;
        if let Some(&component) = parts.iter().find(|c| !(0.0..=1.0).contains(*c)) {
            return Err(ConfigError::ColorOutOfRange { component });
        }
        Ok(Rgb::new(parts[0], parts[1], parts[2]))
    }
}

/// How the final geometry reaches the target window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    /// Plain ConfigureWindow request, not waited on
    #[default]
    Configure,
    /// `_NET_MOVERESIZE_WINDOW` request to the window manager
    Message,
    /// Checked ConfigureWindow followed by a geometry read-back
    Direct,
}

impl FromStr for Method {
    type Err = ConfigError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text.to_ascii_lowercase().as_str() {
            "configure" => Ok(Method::Configure),
            "message" => Ok(Method::Message),
            "direct" => Ok(Method::Direct),
            _ => Err(ConfigError::UnknownMethod(text.to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Configure => "configure",
            Method::Message => "message",
            Method::Direct => "direct",
        };
        f.write_str(name)
    }
}

/// Unresolved reference to the window being resized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowSpec {
    /// Whatever `_NET_ACTIVE_WINDOW` names at startup
    Active,
    /// A literal window id
    Id(u32),
}

impl FromStr for WindowSpec {
    type Err = ConfigError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim();
        if text == ":ACTIVE:" {
            return Ok(WindowSpec::Active);
        }

        let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => text.parse::<u32>(),
        };

        match parsed {
            Ok(id) if id != 0 => Ok(WindowSpec::Id(id)),
            _ => Err(ConfigError::InvalidWindow(text.to_string())),
        }
    }
}

/// Everything a session needs, fixed before the overlay appears
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub window: WindowSpec,
    pub grid: GridSpec,
    pub color: Rgb,
    pub live: bool,
    pub method: Method,
    pub grid_lines: bool,
    pub display: Option<String>,
}

impl SessionConfig {
    /// Validates parsed command line arguments
    ///
    /// # Returns
    /// The session settings, or the first ConfigError found
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let window = cli.window.parse::<WindowSpec>()?;

        let area = parse_list::<i64>(&cli.dimensions, 4, "dimensions", "x,y,width,height")?;
        let area = area_from_values(&area).ok_or_else(|| ConfigError::InvalidList {
            what: "dimensions",
            value: cli.dimensions.clone(),
            expected: "x,y,width,height",
        })?;

        let cells = parse_list::<u32>(&cli.cells, 2, "cells", "columns,rows")?;
        let grid = GridSpec::new(area, cells[0], cells[1])?;

        Ok(Self {
            window,
            grid,
            color: cli.color.parse()?,
            live: cli.live,
            method: cli.method.parse()?,
            grid_lines: !cli.no_grid_lines,
            display: cli.display.clone(),
        })
    }
}

/// Builds the grid area, rejecting values that don't fit X coordinates
fn area_from_values(values: &[i64]) -> Option<PixelRect> {
    let x = i16::try_from(values[0]).ok()?;
    let y = i16::try_from(values[1]).ok()?;
    let width = u16::try_from(values[2]).ok()?;
    let height = u16::try_from(values[3]).ok()?;
    Some(PixelRect::new(x.into(), y.into(), width.into(), height.into()))
}
