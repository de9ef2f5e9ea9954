use std::process::ExitCode;

use clap::Parser;

use grid_resize::app::controller::{initial_selection, AppError, SessionController};
use grid_resize::app::state::SessionOutcome;
use grid_resize::cli::Cli;
use grid_resize::config::SessionConfig;
use grid_resize::platform::{self, applier_for, resolve_target, Display};
use grid_resize::ui::X11Overlay;

/// Exit status for any error
const EXIT_ERROR: u8 = 2;

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(outcome) => {
            if let SessionOutcome::Committed(rect) = outcome {
                println!("Resize: {}", rect);
            }
            ExitCode::from(outcome.exit_code() as u8)
        }
        Err(e) => {
            log::error!("{}", e);
            eprintln!("grid-resize: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn run(cli: &Cli) -> Result<SessionOutcome, AppError> {
    let config = SessionConfig::from_cli(cli)?;

    let display = Display::connect(config.display.as_deref())?;
    let target = resolve_target(&display, config.window)?;
    let initial = initial_selection(&config.grid, display.pointer_position());

    let overlay = X11Overlay::new(&display, config.grid.area(), display.keyboard_map()?)?;
    let applier = applier_for(config.method, &display);

    let outcome = SessionController::new(&config, target, initial, overlay, applier)?.run()?;

    if let Err(e) = platform::window::restore_focus(&display, target) {
        log::warn!("Failed to hand focus back to {}: {}", target, e);
    }
    Ok(outcome)
}
