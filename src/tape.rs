//! Sparse tapes the machine reads from and writes to.
//!
//! Both tape kinds keep only non-blank cells in a map; every position missing
//! from the map reads as the blank symbol, and writing the blank symbol removes
//! the entry. Bounds are always computed from the map, never cached.

use std::collections::HashMap;
use std::fmt;

use crate::instruction::Instruction;
use crate::types::{Direction, MachineError, Symbol, DEFAULT_BLANK_SYMBOL};

/// The capabilities the machine needs from a tape.
pub trait TapeOps {
    /// Returns the symbol under the head.
    fn read_pointer(&self) -> Symbol;

    /// Applies an instruction: writes its symbol (if any) under the head, then
    /// moves the head in its direction.
    fn do_instruction(&mut self, instruction: &Instruction) -> Result<(), MachineError>;
}

/// A one-dimensional tape, unbounded in both directions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: HashMap<i64, Symbol>,
    head: i64,
    blank: Symbol,
}

impl Tape {
    /// Creates a tape holding `content` from position 0, one symbol per character.
    pub fn new(content: &str, head: i64, blank: Symbol) -> Self {
        let cells = (0..)
            .zip(content.chars())
            .filter(|&(_, symbol)| symbol != blank)
            .collect();

        Self { cells, head, blank }
    }

    /// Returns the symbol at `position`.
    pub fn read(&self, position: i64) -> Symbol {
        self.cells.get(&position).copied().unwrap_or(self.blank)
    }

    /// Stores `symbol` at `position`. Writing the blank symbol clears the cell.
    pub fn write(&mut self, position: i64, symbol: Symbol) {
        if symbol == self.blank {
            self.cells.remove(&position);
        } else {
            self.cells.insert(position, symbol);
        }
    }

    /// Returns the head position.
    pub fn head(&self) -> i64 {
        self.head
    }

    /// Returns the blank symbol of this tape.
    pub fn blank(&self) -> Symbol {
        self.blank
    }

    /// Returns the number of non-blank cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns the lowest and highest occupied positions, or `None` for an empty tape.
    pub fn bounds(&self) -> Option<(i64, i64)> {
        let min = self.cells.keys().min()?;
        let max = self.cells.keys().max()?;
        Some((*min, *max))
    }

    /// Returns the occupied range as a string, blanks filled in.
    pub fn content(&self) -> String {
        match self.bounds() {
            Some((min, max)) => (min..=max).map(|position| self.read(position)).collect(),
            None => String::new(),
        }
    }

    fn delta(direction: Direction) -> Result<i64, MachineError> {
        match direction {
            Direction::Left => Ok(-1),
            Direction::Right => Ok(1),
            other => Err(MachineError::UnexpectedDirection(other.to_string())),
        }
    }
}

impl Default for Tape {
    fn default() -> Self {
        Self::new("", 0, DEFAULT_BLANK_SYMBOL)
    }
}

impl TapeOps for Tape {
    fn read_pointer(&self) -> Symbol {
        self.read(self.head)
    }

    fn do_instruction(&mut self, instruction: &Instruction) -> Result<(), MachineError> {
        if let Some(symbol) = instruction.write() {
            self.write(self.head, symbol);
        }

        let direction = instruction
            .direction()
            .ok_or_else(|| MachineError::UnexpectedDirection(instruction.to_string()))?;
        self.head = self
            .head
            .checked_add(Self::delta(direction)?)
            .ok_or_else(|| MachineError::HeadOutOfRange(self.head.to_string()))?;

        Ok(())
    }
}

/// Renders the occupied range, followed by the head offset from its start
/// when the head is elsewhere, and the blank symbol when it is not a space.
///
/// ```text
/// Tape("0110", 2, blank='_')
/// ```
impl fmt::Display for Tape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start = self.bounds().map_or(self.head, |(min, _)| min);
        write!(f, "Tape({:?}", self.content())?;
        if self.head != start {
            write!(f, ", {}", i128::from(self.head) - i128::from(start))?;
        }
        if self.blank != DEFAULT_BLANK_SYMBOL {
            write!(f, ", blank={:?}", self.blank)?;
        }
        write!(f, ")")
    }
}

/// A cell coordinate on a two-dimensional tape. `y` grows downwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position2D {
    pub x: i64,
    pub y: i64,
}

impl Position2D {
    /// Creates a position from its column and row.
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    fn offset(self, (dx, dy): (i64, i64)) -> Option<Self> {
        Some(Self::new(self.x.checked_add(dx)?, self.y.checked_add(dy)?))
    }
}

impl fmt::Display for Position2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.x, self.y)
    }
}

impl From<[i64; 2]> for Position2D {
    fn from([x, y]: [i64; 2]) -> Self {
        Self::new(x, y)
    }
}

/// A two-dimensional tape, unbounded in every direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape2D {
    cells: HashMap<Position2D, Symbol>,
    head: Position2D,
    blank: Symbol,
}

impl Tape2D {
    /// Creates a tape from rows of text. Row `y` holds its characters at `x = 0..`.
    /// Rows may differ in length.
    pub fn new<S: AsRef<str>>(rows: &[S], head: Position2D, blank: Symbol) -> Self {
        let mut cells = HashMap::new();
        for (y, row) in (0..).zip(rows) {
            for (x, symbol) in (0..).zip(row.as_ref().chars()) {
                if symbol != blank {
                    cells.insert(Position2D::new(x, y), symbol);
                }
            }
        }

        Self { cells, head, blank }
    }

    /// Returns the symbol at `position`.
    pub fn read(&self, position: Position2D) -> Symbol {
        self.cells.get(&position).copied().unwrap_or(self.blank)
    }

    /// Stores `symbol` at `position`. Writing the blank symbol clears the cell.
    pub fn write(&mut self, position: Position2D, symbol: Symbol) {
        if symbol == self.blank {
            self.cells.remove(&position);
        } else {
            self.cells.insert(position, symbol);
        }
    }

    /// Returns the head position.
    pub fn head(&self) -> Position2D {
        self.head
    }

    /// Returns the blank symbol of this tape.
    pub fn blank(&self) -> Symbol {
        self.blank
    }

    /// Returns the number of non-blank cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns the top-left and bottom-right corners of the occupied bounding box.
    pub fn bounds(&self) -> Option<(Position2D, Position2D)> {
        let min_x = self.cells.keys().map(|p| p.x).min()?;
        let max_x = self.cells.keys().map(|p| p.x).max()?;
        let min_y = self.cells.keys().map(|p| p.y).min()?;
        let max_y = self.cells.keys().map(|p| p.y).max()?;
        Some((Position2D::new(min_x, min_y), Position2D::new(max_x, max_y)))
    }

    /// Returns the rows of the occupied bounding box, blanks filled in.
    pub fn rows(&self) -> Vec<String> {
        let Some((min, max)) = self.bounds() else {
            return Vec::new();
        };

        (min.y..=max.y)
            .map(|y| {
                (min.x..=max.x)
                    .map(|x| self.read(Position2D::new(x, y)))
                    .collect()
            })
            .collect()
    }

    fn delta(direction: Direction) -> (i64, i64) {
        match direction {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
        }
    }
}

impl Default for Tape2D {
    fn default() -> Self {
        Self::new::<&str>(&[], Position2D::default(), DEFAULT_BLANK_SYMBOL)
    }
}

impl TapeOps for Tape2D {
    fn read_pointer(&self) -> Symbol {
        self.read(self.head)
    }

    fn do_instruction(&mut self, instruction: &Instruction) -> Result<(), MachineError> {
        if let Some(symbol) = instruction.write() {
            self.write(self.head, symbol);
        }

        let direction = instruction
            .direction()
            .ok_or_else(|| MachineError::UnexpectedDirection(instruction.to_string()))?;
        self.head = self
            .head
            .offset(Self::delta(direction))
            .ok_or_else(|| MachineError::HeadOutOfRange(self.head.to_string()))?;

        Ok(())
    }
}

/// Renders the bounding box row by row, then the head position.
impl fmt::Display for Tape2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            writeln!(f, "{}", row)?;
        }
        write!(f, "head: {}", self.head)
    }
}

/// The closed set of tape kinds a machine can own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnyTape {
    /// A one-dimensional tape.
    Linear(Tape),
    /// A two-dimensional tape.
    Planar(Tape2D),
}

impl AnyTape {
    /// Returns the blank symbol of the underlying tape.
    pub fn blank(&self) -> Symbol {
        match self {
            AnyTape::Linear(tape) => tape.blank(),
            AnyTape::Planar(tape) => tape.blank(),
        }
    }

    pub fn as_linear(&self) -> Option<&Tape> {
        match self {
            AnyTape::Linear(tape) => Some(tape),
            AnyTape::Planar(_) => None,
        }
    }

    pub fn as_planar(&self) -> Option<&Tape2D> {
        match self {
            AnyTape::Planar(tape) => Some(tape),
            AnyTape::Linear(_) => None,
        }
    }
}

impl TapeOps for AnyTape {
    fn read_pointer(&self) -> Symbol {
        match self {
            AnyTape::Linear(tape) => tape.read_pointer(),
            AnyTape::Planar(tape) => tape.read_pointer(),
        }
    }

    fn do_instruction(&mut self, instruction: &Instruction) -> Result<(), MachineError> {
        match self {
            AnyTape::Linear(tape) => tape.do_instruction(instruction),
            AnyTape::Planar(tape) => tape.do_instruction(instruction),
        }
    }
}

impl From<Tape> for AnyTape {
    fn from(tape: Tape) -> Self {
        AnyTape::Linear(tape)
    }
}

impl From<Tape2D> for AnyTape {
    fn from(tape: Tape2D) -> Self {
        AnyTape::Planar(tape)
    }
}

impl fmt::Display for AnyTape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnyTape::Linear(tape) => fmt::Display::fmt(tape, f),
            AnyTape::Planar(tape) => fmt::Display::fmt(tape, f),
        }
    }
}
