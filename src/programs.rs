//! A catalogue of demo machines compiled into the library.

use tracing::warn;

use crate::loader::parse;
use crate::machine::Machine;
use crate::types::MachineError;

// Default embedded programs
const PROGRAM_TEXTS: [(&str, &str); 4] = [
    (
        "binary-increment",
        include_str!("../demos/binary-increment.json"),
    ),
    ("invert-bits", include_str!("../demos/invert-bits.json")),
    ("busy-beaver-2", include_str!("../demos/busy-beaver-2.json")),
    ("walk-2d", include_str!("../demos/walk-2d.json")),
];

lazy_static::lazy_static! {
    pub static ref PROGRAMS: Vec<ProgramInfo> = load_programs();
}

/// A parsed demo program and some facts about it.
#[derive(Debug, Clone)]
pub struct ProgramInfo {
    pub name: &'static str,
    pub source: &'static str,
    pub start_state: String,
    pub state_count: usize,
    pub tape_count: usize,
    machine: Machine,
}

fn load_programs() -> Vec<ProgramInfo> {
    PROGRAM_TEXTS
        .iter()
        .filter_map(|&(name, source)| match parse(source) {
            Ok(machine) => Some(ProgramInfo {
                name,
                source,
                start_state: machine.table().start_state().to_string(),
                state_count: machine.table().states().len(),
                tape_count: machine.tapes().len(),
                machine,
            }),
            Err(e) => {
                warn!(program = name, error = %e, "failed to parse embedded program");
                None
            }
        })
        .collect()
}

/// Lookup of the embedded demo programs by name.
pub struct ProgramCatalog;

impl ProgramCatalog {
    /// Lists the names of all embedded programs.
    pub fn names() -> Vec<&'static str> {
        PROGRAMS.iter().map(|program| program.name).collect()
    }

    /// Get information about a program by its name
    pub fn info(name: &str) -> Result<&'static ProgramInfo, MachineError> {
        PROGRAMS
            .iter()
            .find(|program| program.name == name)
            .ok_or_else(|| MachineError::ConfigDecode(format!("Program '{}' not found", name)))
    }

    /// Returns the JSON source of a program.
    pub fn source(name: &str) -> Result<&'static str, MachineError> {
        Self::info(name).map(|program| program.source)
    }

    /// Returns a fresh machine for a program, in its start state with untouched tapes.
    pub fn machine(name: &str) -> Result<Machine, MachineError> {
        Self::info(name).map(|program| program.machine.clone())
    }
}
