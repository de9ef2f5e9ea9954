//! Selection state machine
//!
//! Turns raw pointer and key events into selection updates and into the three
//! decisions the session cares about: the selection changed, the user
//! committed, or the user cancelled. Once the session has left `Selecting`
//! every further event is ignored.

use crate::app::state::SessionState;
use crate::domain::core::PixelRect;
use crate::domain::grid::{CellCoord, GridError, GridSpec};
use crate::domain::selection::Selection;
use crate::input::InputEvent;
use crate::input::keyboard::{Direction, KeyAction};

/// Pointer buttons the selection distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Button 1: press anchors, release commits
    Primary,
    /// Button 2
    Middle,
    /// Button 3: while held the anchor follows the pointer
    Secondary,
    /// Wheel and extra buttons
    Other(u8),
}

impl PointerButton {
    /// Convert an X button number to a PointerButton
    pub fn from_x11(detail: u8) -> Self {
        match detail {
            1 => PointerButton::Primary,
            2 => PointerButton::Middle,
            3 => PointerButton::Secondary,
            other => PointerButton::Other(other),
        }
    }
}

/// Outcome of feeding one event to the interpreter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Nothing visible changed
    Unchanged,
    /// The selected rectangle changed
    SelectionChanged(PixelRect),
    /// The overlay contents must be drawn again, selection untouched
    Redraw,
    /// The user accepted the selection
    Committed(PixelRect),
    /// The user aborted the session
    Cancelled,
}

/// Interprets input events against a grid
#[derive(Debug, Clone)]
pub struct InputInterpreter {
    grid: GridSpec,
    state: SessionState,
    selection: Selection,
    /// Set while the secondary button is held
    anchor_follows_pointer: bool,
}

impl InputInterpreter {
    /// Creates an interpreter in the `Selecting` state
    ///
    /// Both ends of `initial` are clamped into the grid.
    pub fn new(grid: GridSpec, initial: Selection) -> Self {
        let selection = Selection::spanning(
            grid.clamp_cell(initial.anchor()),
            grid.clamp_cell(initial.current()),
        );

        Self {
            grid,
            state: SessionState::Selecting,
            selection,
            anchor_follows_pointer: false,
        }
    }

    /// Returns the current session state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Returns the current selection
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Screen rectangle of the current selection
    pub fn current_rect(&self) -> Result<PixelRect, GridError> {
        self.grid.pixel_rect(&self.selection)
    }

    /// Feeds one event through the state machine
    ///
    /// # Returns
    /// The resulting decision, or GridError::MalformedSelection if the
    /// selection somehow left the grid
    pub fn handle(&mut self, event: InputEvent) -> Result<Decision, GridError> {
        if self.state.is_terminal() {
            return Ok(Decision::Unchanged);
        }

        let before = self.selection.normalized();

        match event {
            InputEvent::PointerMoved { x, y } => {
                let cell = self.grid.cell_from_pixel(x, y);
                if self.anchor_follows_pointer {
                    self.selection.reset_to(cell);
                } else {
                    self.selection.extend_to(cell);
                }
            }
            InputEvent::ButtonPressed { button, x, y } => match button {
                PointerButton::Primary => {
                    self.selection.reset_to(self.grid.cell_from_pixel(x, y));
                }
                PointerButton::Secondary => {
                    self.selection.reset_to(self.grid.cell_from_pixel(x, y));
                    self.anchor_follows_pointer = true;
                }
                _ => {}
            },
            InputEvent::ButtonReleased { button, .. } => match button {
                PointerButton::Primary => return self.commit(),
                PointerButton::Secondary => self.anchor_follows_pointer = false,
                _ => {}
            },
            InputEvent::Key(action) => match action {
                KeyAction::Move(direction) => self.step(direction),
                KeyAction::Anchor => self.selection.reanchor(),
                KeyAction::Confirm => return self.commit(),
                KeyAction::Cancel => return Ok(self.cancel()),
                KeyAction::Ignored => {}
            },
            InputEvent::FocusLost => return Ok(self.cancel()),
            InputEvent::Exposed => return Ok(Decision::Redraw),
        }

        if self.selection.normalized() == before {
            return Ok(Decision::Unchanged);
        }

        let rect = self.current_rect()?;
        log::debug!(
            "selection {} -> {}: {}",
            self.selection.anchor(),
            self.selection.current(),
            rect
        );
        Ok(Decision::SelectionChanged(rect))
    }

    /// Moves the current cell one step, staying inside the grid
    fn step(&mut self, direction: Direction) {
        let (columns, rows) = self.grid.dimensions();
        let (dx, dy) = direction.delta();
        let current = self.selection.current();

        let col = (current.col as i64 + dx as i64).clamp(0, columns as i64 - 1) as u32;
        let row = (current.row as i64 + dy as i64).clamp(0, rows as i64 - 1) as u32;
        self.selection.extend_to(CellCoord::new(col, row));
    }

    fn commit(&mut self) -> Result<Decision, GridError> {
        let rect = self.current_rect()?;
        self.state = SessionState::Committed;
        Ok(Decision::Committed(rect))
    }

    fn cancel(&mut self) -> Decision {
        self.state = SessionState::Cancelled;
        Decision::Cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interpreter_at(col: u32, row: u32) -> InputInterpreter {
        let grid = GridSpec::new(PixelRect::new(0, 0, 1920, 1080), 8, 6).unwrap();
        InputInterpreter::new(grid, Selection::single(CellCoord::new(col, row)))
    }

    /// Screen position in the middle of a cell of the 8x6 full HD grid
    fn center_of(col: u32, row: u32) -> (i32, i32) {
        (col as i32 * 240 + 120, row as i32 * 180 + 90)
    }

    fn move_to(interpreter: &mut InputInterpreter, col: u32, row: u32) -> Decision {
        let (x, y) = center_of(col, row);
        interpreter.handle(InputEvent::PointerMoved { x, y }).unwrap()
    }

    #[test]
    fn pointer_move_extends_selection() {
        let mut interpreter = interpreter_at(1, 1);

        let decision = move_to(&mut interpreter, 3, 2);
        assert_eq!(decision, Decision::SelectionChanged(PixelRect::new(240, 180, 720, 360)));
        assert_eq!(interpreter.selection().anchor(), CellCoord::new(1, 1));
        assert_eq!(interpreter.selection().current(), CellCoord::new(3, 2));
        assert_eq!(interpreter.state(), SessionState::Selecting);
    }

    #[test]
    fn motion_within_same_cell_is_unchanged() {
        let mut interpreter = interpreter_at(1, 1);
        move_to(&mut interpreter, 2, 2);

        let decision = interpreter
            .handle(InputEvent::PointerMoved { x: 481, y: 361 })
            .unwrap();
        assert_eq!(decision, Decision::Unchanged);
    }

    #[test]
    fn pointer_outside_grid_is_clamped() {
        let mut interpreter = interpreter_at(0, 0);

        let decision = interpreter
            .handle(InputEvent::PointerMoved { x: 5000, y: -200 })
            .unwrap();
        assert_eq!(decision, Decision::SelectionChanged(PixelRect::new(0, 0, 1920, 180)));
        assert_eq!(interpreter.selection().current(), CellCoord::new(7, 0));
    }

    #[test]
    fn primary_press_starts_new_rectangle() {
        let mut interpreter = interpreter_at(0, 0);
        move_to(&mut interpreter, 4, 4);

        let (x, y) = center_of(2, 3);
        let decision = interpreter
            .handle(InputEvent::ButtonPressed { button: PointerButton::Primary, x, y })
            .unwrap();

        assert_eq!(decision, Decision::SelectionChanged(PixelRect::new(480, 540, 240, 180)));
        assert!(interpreter.selection().is_single_cell());
        assert_eq!(interpreter.state(), SessionState::Selecting);
    }

    #[test]
    fn drag_then_release_commits() {
        let mut interpreter = interpreter_at(0, 0);

        let (x, y) = center_of(1, 1);
        interpreter
            .handle(InputEvent::ButtonPressed { button: PointerButton::Primary, x, y })
            .unwrap();
        move_to(&mut interpreter, 3, 2);

        let (x, y) = center_of(3, 2);
        let decision = interpreter
            .handle(InputEvent::ButtonReleased { button: PointerButton::Primary, x, y })
            .unwrap();

        assert_eq!(decision, Decision::Committed(PixelRect::new(240, 180, 720, 360)));
        assert_eq!(interpreter.state(), SessionState::Committed);
    }

    #[test]
    fn secondary_drag_moves_anchor() {
        let mut interpreter = interpreter_at(0, 0);

        let (x, y) = center_of(2, 2);
        interpreter
            .handle(InputEvent::ButtonPressed { button: PointerButton::Secondary, x, y })
            .unwrap();
        move_to(&mut interpreter, 5, 4);
        assert!(interpreter.selection().is_single_cell());
        assert_eq!(interpreter.selection().anchor(), CellCoord::new(5, 4));

        let (x, y) = center_of(5, 4);
        interpreter
            .handle(InputEvent::ButtonReleased { button: PointerButton::Secondary, x, y })
            .unwrap();
        move_to(&mut interpreter, 6, 5);

        assert_eq!(interpreter.selection().anchor(), CellCoord::new(5, 4));
        assert_eq!(interpreter.selection().current(), CellCoord::new(6, 5));
        assert_eq!(interpreter.state(), SessionState::Selecting);
    }

    #[test]
    fn keyboard_moves_are_clamped() {
        let mut interpreter = interpreter_at(0, 0);

        let decision = interpreter
            .handle(InputEvent::Key(KeyAction::Move(Direction::Left)))
            .unwrap();
        assert_eq!(decision, Decision::Unchanged);

        let decision = interpreter
            .handle(InputEvent::Key(KeyAction::Move(Direction::Right)))
            .unwrap();
        assert_eq!(decision, Decision::SelectionChanged(PixelRect::new(0, 0, 480, 180)));

        for _ in 0..10 {
            interpreter
                .handle(InputEvent::Key(KeyAction::Move(Direction::Down)))
                .unwrap();
        }
        assert_eq!(interpreter.selection().current(), CellCoord::new(1, 5));
    }

    #[test]
    fn anchor_key_then_confirm() {
        let mut interpreter = interpreter_at(0, 0);
        interpreter.handle(InputEvent::Key(KeyAction::Move(Direction::Right))).unwrap();
        interpreter.handle(InputEvent::Key(KeyAction::Anchor)).unwrap();
        interpreter.handle(InputEvent::Key(KeyAction::Move(Direction::Right))).unwrap();
        interpreter.handle(InputEvent::Key(KeyAction::Move(Direction::Down))).unwrap();

        let decision = interpreter.handle(InputEvent::Key(KeyAction::Confirm)).unwrap();
        assert_eq!(decision, Decision::Committed(PixelRect::new(240, 0, 480, 360)));
    }

    #[test]
    fn cancel_key_and_focus_loss_cancel() {
        let mut interpreter = interpreter_at(3, 3);
        let decision = interpreter.handle(InputEvent::Key(KeyAction::Cancel)).unwrap();
        assert_eq!(decision, Decision::Cancelled);
        assert_eq!(interpreter.state(), SessionState::Cancelled);

        let mut interpreter = interpreter_at(3, 3);
        let decision = interpreter.handle(InputEvent::FocusLost).unwrap();
        assert_eq!(decision, Decision::Cancelled);
    }

    #[test]
    fn terminal_states_ignore_events() {
        let mut interpreter = interpreter_at(1, 1);
        interpreter.handle(InputEvent::Key(KeyAction::Cancel)).unwrap();

        assert_eq!(move_to(&mut interpreter, 4, 4), Decision::Unchanged);
        assert_eq!(
            interpreter.handle(InputEvent::Key(KeyAction::Confirm)).unwrap(),
            Decision::Unchanged
        );
        assert_eq!(interpreter.state(), SessionState::Cancelled);
        assert_eq!(interpreter.selection().current(), CellCoord::new(1, 1));

        let mut interpreter = interpreter_at(1, 1);
        interpreter.handle(InputEvent::Key(KeyAction::Confirm)).unwrap();
        assert_eq!(interpreter.handle(InputEvent::FocusLost).unwrap(), Decision::Unchanged);
        assert_eq!(interpreter.state(), SessionState::Committed);
    }

    #[test]
    fn expose_requests_redraw_only() {
        let mut interpreter = interpreter_at(2, 2);
        assert_eq!(interpreter.handle(InputEvent::Exposed).unwrap(), Decision::Redraw);
        assert_eq!(interpreter.selection(), &Selection::single(CellCoord::new(2, 2)));
    }

    #[test]
    fn initial_selection_is_clamped() {
        let interpreter = interpreter_at(40, 9);
        assert_eq!(interpreter.selection().current(), CellCoord::new(7, 5));
        assert_eq!(
            interpreter.current_rect().unwrap(),
            PixelRect::new(1680, 900, 240, 180)
        );
    }

    #[test]
    fn x11_button_numbers() {
        assert_eq!(PointerButton::from_x11(1), PointerButton::Primary);
        assert_eq!(PointerButton::from_x11(2), PointerButton::Middle);
        assert_eq!(PointerButton::from_x11(3), PointerButton::Secondary);
        assert_eq!(PointerButton::from_x11(4), PointerButton::Other(4));
    }
}
