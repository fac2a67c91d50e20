//! This crate provides the execution engine of a Turing machine simulator.
//! It includes the instruction model, the transition table and its resolution
//! rules, sparse one- and two-dimensional tapes, the machine that drives them,
//! and a JSON configuration loader.

pub mod instruction;
pub mod loader;
pub mod machine;
pub mod programs;
pub mod table;
pub mod tape;
pub mod types;

/// Re-exports the `Instruction` enum from the instruction module.
pub use instruction::Instruction;
/// Re-exports the configuration entry points from the loader module.
pub use loader::{parse, MachineConfig, MachineLoader};
/// Re-exports the `Machine` struct and its bounded-run outcome.
pub use machine::{Machine, RunOutcome};
/// Re-exports `ProgramCatalog`, `ProgramInfo`, and `PROGRAMS` from the programs module.
pub use programs::{ProgramCatalog, ProgramInfo, PROGRAMS};
/// Re-exports the transition table types.
pub use table::{Rule, TransitionTable};
/// Re-exports the tape kinds and the capability trait the machine drives them through.
pub use tape::{AnyTape, Position2D, Tape, Tape2D, TapeOps};
/// Re-exports shared types and the error enum from the types module.
pub use types::{Direction, MachineError, State, Symbol, DEFAULT_BLANK_SYMBOL};
