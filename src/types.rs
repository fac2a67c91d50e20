//! This module defines the core types shared across the simulator: state and symbol
//! aliases, head directions, default constants, and the error type.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// The label of a machine state.
pub type State = String;

/// The value stored in a single tape cell.
pub type Symbol = char;

/// The default blank symbol used on the tapes.
pub const DEFAULT_BLANK_SYMBOL: Symbol = ' ';

/// Represents the possible directions a tape head can move.
///
/// One-dimensional tapes only understand `Left` and `Right`. Two-dimensional
/// tapes also accept `Up` and `Down`, where the row index grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Move the head one position to the left (`L`).
    Left,
    /// Move the head one position to the right (`R`).
    Right,
    /// Move the head one row up (`U`).
    Up,
    /// Move the head one row down (`D`).
    Down,
}

impl Direction {
    /// Returns the letter used for this direction in machine configurations.
    pub fn letter(self) -> char {
        match self {
            Direction::Left => 'L',
            Direction::Right => 'R',
            Direction::Up => 'U',
            Direction::Down => 'D',
        }
    }
}

impl FromStr for Direction {
    type Err = MachineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "L" => Ok(Direction::Left),
            "R" => Ok(Direction::Right),
            "U" => Ok(Direction::Up),
            "D" => Ok(Direction::Down),
            other => Err(MachineError::UnexpectedDirection(other.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Represents the errors that can occur while loading or running a machine.
///
/// None of them are recovered internally: each one points at a malformed
/// configuration rather than a transient fault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MachineError {
    /// The configuration source is not well-formed structured data.
    #[error("Configuration decode error: {0}")]
    ConfigDecode(String),
    /// A state was requested that the transition table does not declare.
    #[error("Unexpected state \"{0}\", not found")]
    UnexpectedState(State),
    /// An instruction named a direction the tape does not understand.
    #[error("Unexpected direction: \"{0}\"")]
    UnexpectedDirection(String),
    /// An instruction encoding had an arity outside 1..=3 or a malformed field.
    #[error("Invalid instruction: {0}")]
    InvalidInstruction(String),
    /// A head move that would leave the addressable range of the tape.
    #[error("Head cannot move past position {0}")]
    HeadOutOfRange(String),
    /// A tape index outside the machine's tape collection.
    #[error("Tape index {index} is out of range (machine has {len} tapes)")]
    TapeIndex { index: usize, len: usize },
    /// A file system error while reading a configuration file.
    #[error("File error: {0}")]
    File(String),
}
