//! Session controller
//!
//! Runs one selection session: draws the overlay, feeds input through the
//! interpreter and pushes geometry to the target window. The display surface
//! and the geometry backend are traits, so the whole loop runs against test
//! doubles as well as against X.

use crate::app::state::SessionOutcome;
use crate::config::{ConfigError, SessionConfig};
use crate::domain::core::PixelRect;
use crate::domain::grid::{CellCoord, GridError, GridSpec};
use crate::domain::selection::Selection;
use crate::input::{Decision, InputError, InputInterpreter, InputSource};
use crate::platform::{ApplyError, DisplayError, GeometryApplier, TargetWindow, WindowError};
use crate::ui::{FrameLayout, OverlayError, OverlayRenderer, OverlayStyle, OverlaySurface, RendererError};

/// Application errors that can end a session
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid arguments: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Display(#[from] DisplayError),

    #[error(transparent)]
    Window(#[from] WindowError),

    #[error("Overlay error: {0}")]
    Overlay(#[from] OverlayError),

    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Rendering error: {0}")]
    Render(#[from] RendererError),

    #[error("Failed to apply geometry: {0}")]
    Apply(#[from] ApplyError),

    #[error("Selection error: {0}")]
    Grid(#[from] GridError),
}

/// Starting selection: the cell under the pointer, else the top-left cell
pub fn initial_selection(grid: &GridSpec, pointer: Option<(i32, i32)>) -> Selection {
    let cell = pointer
        .map(|(x, y)| grid.cell_from_pixel(x, y))
        .unwrap_or(CellCoord::new(0, 0));
    Selection::single(cell)
}

/// Drives a single selection session to completion
pub struct SessionController<S, A> {
    surface: S,
    applier: A,
    target: TargetWindow,
    grid: GridSpec,
    style: OverlayStyle,
    live: bool,
    interpreter: InputInterpreter,
    renderer: OverlayRenderer,
}

impl<S, A> SessionController<S, A>
where
    S: OverlaySurface + InputSource,
    A: GeometryApplier,
{
    /// Prepares a session; nothing is drawn until [`run`](Self::run)
    ///
    /// # Arguments
    /// * `config` - Validated session settings
    /// * `target` - Window that receives the geometry
    /// * `initial` - Selection shown in the first frame
    /// * `surface` - Overlay to draw on and read input from
    /// * `applier` - Backend chosen for the session's method
    pub fn new(
        config: &SessionConfig,
        target: TargetWindow,
        initial: Selection,
        surface: S,
        applier: A,
    ) -> Result<Self, AppError> {
        let area = config.grid.area();
        let renderer = OverlayRenderer::new(area.width, area.height)?;

        Ok(Self {
            surface,
            applier,
            target,
            grid: config.grid,
            style: OverlayStyle::from_config(config),
            live: config.live,
            interpreter: InputInterpreter::new(config.grid, initial),
            renderer,
        })
    }

    /// Runs the event loop until the user commits or cancels
    ///
    /// The surface is dropped before this returns on every path, so grabs
    /// and the overlay are gone before the final geometry is applied.
    pub fn run(mut self) -> Result<SessionOutcome, AppError> {
        log::info!(
            "Selecting on a {}x{} grid over {} for window {}",
            self.grid.dimensions().0,
            self.grid.dimensions().1,
            self.grid.area(),
            self.target
        );
        self.redraw()?;

        loop {
            let event = self.surface.next_event()?;

            match self.interpreter.handle(event)? {
                Decision::Unchanged => {}
                Decision::Redraw => self.redraw()?,
                Decision::SelectionChanged(rect) => {
                    self.redraw()?;
                    if self.live {
                        self.applier.apply(self.target, rect)?;
                    }
                }
                Decision::Committed(rect) => return self.commit(rect),
                Decision::Cancelled => {
                    log::info!("Selection cancelled");
                    return Ok(SessionOutcome::Cancelled);
                }
            }
        }
    }

    fn redraw(&mut self) -> Result<(), AppError> {
        let layout = FrameLayout::from_selection(&self.grid, self.interpreter.selection(), &self.style)?;
        let frame = self.renderer.render(&layout)?;
        self.surface.present(frame)?;
        Ok(())
    }

    /// Releases the overlay, then applies the final rectangle once
    fn commit(self, rect: PixelRect) -> Result<SessionOutcome, AppError> {
        let SessionController {
            surface,
            applier,
            target,
            ..
        } = self;
        drop(surface);

        applier.apply(target, rect)?;
        log::info!("Window {} moved to {}", target, rect);
        Ok(SessionOutcome::Committed(rect))
    }
}
