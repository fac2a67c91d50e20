//! The transition table: maps the current state and the symbol under the head to
//! an [`Instruction`].

use std::collections::HashMap;

use crate::instruction::Instruction;
use crate::types::{MachineError, State, Symbol};

/// One symbol key of a state together with the instruction it selects.
///
/// A key may list several characters (`"01"`), in which case it acts as a
/// character class matching any of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub key: String,
    pub instruction: Instruction,
}

impl Rule {
    /// Creates a rule selecting `instruction` for symbols matching `key`.
    pub fn new(key: impl Into<String>, instruction: Instruction) -> Self {
        Self {
            key: key.into(),
            instruction,
        }
    }
}

/// The transition rules of a machine, keyed by state.
///
/// Rules of a state are kept in declaration order, which decides between
/// overlapping class keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionTable {
    states: HashMap<State, Vec<Rule>>,
    start_state: State,
    else_sign: Option<String>,
}

impl TransitionTable {
    /// Creates a table from each state's rules in declaration order.
    ///
    /// A key declared twice within one state keeps its first position and the
    /// last instruction given for it.
    ///
    /// # Returns
    ///
    /// * `Err(MachineError::UnexpectedState)` if `start_state` is not one of the states.
    pub fn new<I, R>(
        states: I,
        start_state: impl Into<State>,
        else_sign: Option<String>,
    ) -> Result<Self, MachineError>
    where
        I: IntoIterator<Item = (State, R)>,
        R: IntoIterator<Item = Rule>,
    {
        let mut table = HashMap::new();
        for (state, rules) in states {
            let mut ordered: Vec<Rule> = Vec::new();
            for rule in rules {
                match ordered.iter_mut().find(|r| r.key == rule.key) {
                    Some(existing) => existing.instruction = rule.instruction,
                    None => ordered.push(rule),
                }
            }
            table.insert(state, ordered);
        }

        let start_state = start_state.into();
        if !table.contains_key(&start_state) {
            return Err(MachineError::UnexpectedState(start_state));
        }

        Ok(Self {
            states: table,
            start_state,
            else_sign,
        })
    }

    /// Resolves the instruction for `state` reading `symbol`.
    ///
    /// Resolution order, first match wins:
    /// 1. a key equal to the symbol,
    /// 2. the first declared key containing the symbol,
    /// 3. the else-sign key, if configured and declared for this state,
    /// 4. [`Instruction::Halt`].
    pub fn get_instruction(&self, state: &str, symbol: Symbol) -> Result<Instruction, MachineError> {
        let rules = self
            .states
            .get(state)
            .ok_or_else(|| MachineError::UnexpectedState(state.to_string()))?;

        let mut buf = [0u8; 4];
        let exact: &str = symbol.encode_utf8(&mut buf);

        let rule = rules
            .iter()
            .find(|rule| rule.key == exact)
            .or_else(|| rules.iter().find(|rule| rule.key.contains(symbol)))
            .or_else(|| {
                self.else_sign
                    .as_deref()
                    .and_then(|sign| rules.iter().find(|rule| rule.key == sign))
            });

        Ok(rule
            .map(|rule| rule.instruction.clone())
            .unwrap_or_default())
    }

    /// Returns the state the machine starts in.
    pub fn start_state(&self) -> &str {
        &self.start_state
    }

    /// Returns the configured fallback key.
    pub fn else_sign(&self) -> Option<&str> {
        self.else_sign.as_deref()
    }

    /// Checks whether `state` is declared in the table.
    pub fn contains_state(&self, state: &str) -> bool {
        self.states.contains_key(state)
    }

    /// Returns the rules of `state` in declaration order.
    pub fn rules(&self, state: &str) -> Option<&[Rule]> {
        self.states.get(state).map(Vec::as_slice)
    }

    /// Returns every declared state, sorted for deterministic output.
    pub fn states(&self) -> Vec<&str> {
        let mut states: Vec<&str> = self.states.keys().map(String::as_str).collect();
        states.sort_unstable();
        states
    }
}
