//! The instruction model: what a single transition does to a tape and to the
//! machine's current state.

use std::fmt;

use crate::types::{Direction, MachineError, State, Symbol};

/// A single transition's effect.
///
/// The shape follows the arity of the configuration encoding:
/// `"R"` moves only, `["R", "q1"]` also switches state, and `["R", "q1", "x"]`
/// additionally writes `x` under the head before moving.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Instruction {
    /// Stop the machine. Produced when no key matches the scanned symbol.
    #[default]
    Halt,
    /// Move the head without touching the state or the cell.
    Move { direction: Direction },
    /// Move the head and switch to `state`.
    MoveState { direction: Direction, state: State },
    /// Write `write` under the head, switch to `state`, then move.
    MoveStateWrite {
        direction: Direction,
        state: State,
        write: Symbol,
    },
}

impl Instruction {
    /// Builds an instruction from its space-delimited string form, e.g. `"R q1 1"`.
    pub fn from_text(text: &str) -> Result<Self, MachineError> {
        let parts: Vec<&str> = text.split(' ').collect();
        Self::from_parts(&parts)
    }

    /// Builds an instruction from an ordered `[direction, new_state, write]` sequence
    /// of one to three elements.
    pub fn from_parts<S: AsRef<str>>(parts: &[S]) -> Result<Self, MachineError> {
        match parts {
            [direction] => Ok(Instruction::Move {
                direction: direction.as_ref().parse()?,
            }),
            [direction, state] => Ok(Instruction::MoveState {
                direction: direction.as_ref().parse()?,
                state: state.as_ref().to_string(),
            }),
            [direction, state, write] => Ok(Instruction::MoveStateWrite {
                direction: direction.as_ref().parse()?,
                state: state.as_ref().to_string(),
                write: parse_write_symbol(write.as_ref())?,
            }),
            _ => Err(MachineError::InvalidInstruction(format!(
                "expected 1 to 3 fields, found {}",
                parts.len()
            ))),
        }
    }

    /// The direction to move the head, absent for `Halt`.
    pub fn direction(&self) -> Option<Direction> {
        match self {
            Instruction::Halt => None,
            Instruction::Move { direction }
            | Instruction::MoveState { direction, .. }
            | Instruction::MoveStateWrite { direction, .. } => Some(*direction),
        }
    }

    /// The state the machine switches to, if any.
    pub fn new_state(&self) -> Option<&str> {
        match self {
            Instruction::MoveState { state, .. } | Instruction::MoveStateWrite { state, .. } => {
                Some(state)
            }
            _ => None,
        }
    }

    /// The symbol written under the head, if any.
    pub fn write(&self) -> Option<Symbol> {
        match self {
            Instruction::MoveStateWrite { write, .. } => Some(*write),
            _ => None,
        }
    }

    /// Returns `true` for the halt instruction.
    pub fn stopped(&self) -> bool {
        matches!(self, Instruction::Halt)
    }
}

fn parse_write_symbol(write: &str) -> Result<Symbol, MachineError> {
    let mut chars = write.chars();
    match (chars.next(), chars.next()) {
        (Some(symbol), None) => Ok(symbol),
        _ => Err(MachineError::InvalidInstruction(format!(
            "write symbol \"{}\" must be a single character",
            write
        ))),
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Halt => write!(f, "halt"),
            Instruction::Move { direction } => write!(f, "{}", direction),
            Instruction::MoveState { direction, state } => write!(f, "{} {}", direction, state),
            Instruction::MoveStateWrite {
                direction,
                state,
                write,
            } => write!(f, "{} {} {}", direction, state, write),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity_selects_shape() {
        assert_eq!(
            Instruction::from_parts(&["R"]).unwrap(),
            Instruction::Move {
                direction: Direction::Right
            }
        );
        assert_eq!(
            Instruction::from_parts(&["L", "q1"]).unwrap(),
            Instruction::MoveState {
                direction: Direction::Left,
                state: "q1".to_string()
            }
        );
        assert_eq!(
            Instruction::from_parts(&["D", "q2", "x"]).unwrap(),
            Instruction::MoveStateWrite {
                direction: Direction::Down,
                state: "q2".to_string(),
                write: 'x'
            }
        );
    }

    #[test]
    fn test_text_form_matches_parts() {
        assert_eq!(
            Instruction::from_text("R carry 1").unwrap(),
            Instruction::from_parts(&["R", "carry", "1"]).unwrap()
        );
        assert_eq!(
            Instruction::from_text("L").unwrap(),
            Instruction::from_parts(&["L"]).unwrap()
        );
    }

    #[test]
    fn test_invalid_arity() {
        let empty: [&str; 0] = [];
        assert!(matches!(
            Instruction::from_parts(&empty),
            Err(MachineError::InvalidInstruction(_))
        ));
        assert!(matches!(
            Instruction::from_text("R q1 1 extra"),
            Err(MachineError::InvalidInstruction(_))
        ));
    }

    #[test]
    fn test_multi_char_write_is_invalid() {
        assert!(matches!(
            Instruction::from_parts(&["R", "q1", "ab"]),
            Err(MachineError::InvalidInstruction(_))
        ));
        assert!(matches!(
            Instruction::from_parts(&["R", "q1", ""]),
            Err(MachineError::InvalidInstruction(_))
        ));
    }

    #[test]
    fn test_unknown_direction() {
        assert_eq!(
            Instruction::from_text("X q1"),
            Err(MachineError::UnexpectedDirection("X".to_string()))
        );
    }

    #[test]
    fn test_accessors() {
        let instruction = Instruction::from_parts(&["U", "up", "#"]).unwrap();
        assert_eq!(instruction.direction(), Some(Direction::Up));
        assert_eq!(instruction.new_state(), Some("up"));
        assert_eq!(instruction.write(), Some('#'));
        assert!(!instruction.stopped());

        let instruction = Instruction::from_text("L").unwrap();
        assert_eq!(instruction.new_state(), None);
        assert_eq!(instruction.write(), None);
    }

    #[test]
    fn test_halt_is_default_and_empty() {
        let halt = Instruction::default();
        assert!(halt.stopped());
        assert_eq!(halt.direction(), None);
        assert_eq!(halt.new_state(), None);
        assert_eq!(halt.write(), None);
    }

    #[test]
    fn test_display_uses_text_form() {
        assert_eq!(Instruction::from_text("R q1 x").unwrap().to_string(), "R q1 x");
        assert_eq!(Instruction::from_text("L q0").unwrap().to_string(), "L q0");
        assert_eq!(Instruction::Halt.to_string(), "halt");
    }
}
