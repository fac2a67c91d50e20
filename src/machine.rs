//! This module defines the `Machine` struct, which drives a transition table over
//! one of its tapes. It owns the current-state cursor and the step/run loop.

use tracing::{debug, trace};

use crate::table::TransitionTable;
use crate::tape::{AnyTape, TapeOps};
use crate::types::{MachineError, State};

/// Represents the outcome of a bounded run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The machine reached the halt instruction after `steps` transitions.
    Halted { steps: usize },
    /// The step limit was reached before the machine halted.
    StepLimit,
}

/// A Turing machine: a transition table, the current state, and the tapes it can run on.
///
/// The tapes are independent of each other; a run drives exactly one of them.
#[derive(Debug, Clone)]
pub struct Machine {
    table: TransitionTable,
    state: State,
    tapes: Vec<AnyTape>,
}

impl Machine {
    /// Creates a new machine positioned at the table's start state.
    pub fn new(table: TransitionTable, tapes: Vec<AnyTape>) -> Self {
        Self {
            state: table.start_state().to_string(),
            table,
            tapes,
        }
    }

    /// Executes a single step of the machine on `tape`.
    ///
    /// Reads the symbol under the head, resolves the instruction for the current
    /// state, switches state when the instruction names one, and applies the
    /// instruction to the tape.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` if an instruction was applied.
    /// * `Ok(false)` if the halt instruction was resolved. The state is left unchanged.
    /// * `Err(MachineError)` if the state is undeclared or the direction is not
    ///   supported by the tape.
    pub fn step<T: TapeOps + ?Sized>(&mut self, tape: &mut T) -> Result<bool, MachineError> {
        advance(&self.table, &mut self.state, tape)
    }

    /// Executes a single step on the owned tape at `index`.
    pub fn step_tape(&mut self, index: usize) -> Result<bool, MachineError> {
        let len = self.tapes.len();
        let tape = self
            .tapes
            .get_mut(index)
            .ok_or(MachineError::TapeIndex { index, len })?;

        advance(&self.table, &mut self.state, tape)
    }

    /// Runs the machine on the tape at `index` until it halts.
    ///
    /// There is no step limit: a machine that never halts runs forever.
    /// Use [`Machine::run_for`] for a bounded run.
    pub fn run(&mut self, index: usize) -> Result<(), MachineError> {
        let len = self.tapes.len();
        let tape = self
            .tapes
            .get_mut(index)
            .ok_or(MachineError::TapeIndex { index, len })?;
        let (table, state) = (&self.table, &mut self.state);

        let mut steps = 0usize;
        while advance(table, state, tape)? {
            steps += 1;
        }

        debug!(tape = index, steps, state = %state, "machine halted");
        Ok(())
    }

    /// Runs the machine on the tape at `index` for at most `max_steps` transitions.
    pub fn run_for(&mut self, index: usize, max_steps: usize) -> Result<RunOutcome, MachineError> {
        let len = self.tapes.len();
        let tape = self
            .tapes
            .get_mut(index)
            .ok_or(MachineError::TapeIndex { index, len })?;
        let (table, state) = (&self.table, &mut self.state);

        for steps in 0..max_steps {
            if !advance(table, state, tape)? {
                debug!(tape = index, steps, state = %state, "machine halted");
                return Ok(RunOutcome::Halted { steps });
            }
        }

        // One more lookup tells whether the last transition left the machine halted.
        if table.get_instruction(state, tape.read_pointer())?.stopped() {
            return Ok(RunOutcome::Halted { steps: max_steps });
        }

        debug!(tape = index, max_steps, state = %state, "step limit reached");
        Ok(RunOutcome::StepLimit)
    }

    /// Returns the current state of the machine.
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Returns the transition table.
    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    /// Returns the machine's tapes.
    pub fn tapes(&self) -> &[AnyTape] {
        &self.tapes
    }

    /// Returns the machine's tapes for direct manipulation or external stepping.
    pub fn tapes_mut(&mut self) -> &mut [AnyTape] {
        &mut self.tapes
    }

    /// Returns the tape at `index`.
    pub fn tape(&self, index: usize) -> Result<&AnyTape, MachineError> {
        self.tapes.get(index).ok_or(MachineError::TapeIndex {
            index,
            len: self.tapes.len(),
        })
    }
}

fn advance<T: TapeOps + ?Sized>(
    table: &TransitionTable,
    state: &mut State,
    tape: &mut T,
) -> Result<bool, MachineError> {
    let symbol = tape.read_pointer();
    let instruction = table.get_instruction(state, symbol)?;

    if instruction.stopped() {
        trace!(state = %state, symbol = ?symbol, "halt");
        return Ok(false);
    }

    trace!(state = %state, symbol = ?symbol, instruction = %instruction, "step");

    if let Some(next) = instruction.new_state() {
        *state = next.to_string();
    }

    tape.do_instruction(&instruction)?;

    Ok(true)
}
