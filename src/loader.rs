//! This module turns a JSON machine configuration into a ready-to-run [`Machine`],
//! and provides `MachineLoader` for reading configurations from files.
//!
//! ```json
//! {
//!   "start-state": "carry",
//!   "blank-symbol": " ",
//!   "states": {
//!     "carry": { "1": ["L", "carry", "0"], "0 ": ["L", "done", "1"] },
//!     "done": {}
//!   },
//!   "inputs": [{ "tape": "00011", "position": 4 }]
//! }
//! ```

use std::fmt;
use std::fs;
use std::marker::PhantomData;
use std::path::Path;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use tracing::debug;

use crate::instruction::Instruction;
use crate::machine::Machine;
use crate::table::{Rule, TransitionTable};
use crate::tape::{AnyTape, Position2D, Tape, Tape2D};
use crate::types::{MachineError, Symbol, DEFAULT_BLANK_SYMBOL};

/// A JSON object decoded into its entries in document order.
///
/// A repeated key keeps the position of its first occurrence and the value of
/// its last one.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V>(pub Vec<(String, V)>);

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedMapVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
            type Value = OrderedMap<V>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries: Vec<(String, V)> = Vec::new();
                while let Some((key, value)) = access.next_entry::<String, V>()? {
                    match entries.iter_mut().find(|(k, _)| *k == key) {
                        Some(entry) => entry.1 = value,
                        None => entries.push((key, value)),
                    }
                }
                Ok(OrderedMap(entries))
            }
        }

        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

/// An instruction as written in the configuration: `"R q1 x"` or `["R", "q1", "x"]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawInstruction {
    Text(String),
    Parts(Vec<String>),
}

impl TryFrom<RawInstruction> for Instruction {
    type Error = MachineError;

    fn try_from(raw: RawInstruction) -> Result<Self, Self::Error> {
        match raw {
            RawInstruction::Text(text) => Instruction::from_text(&text),
            RawInstruction::Parts(parts) => Instruction::from_parts(&parts),
        }
    }
}

/// Which tape kind every input of a configuration uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum TapeType {
    #[default]
    #[serde(rename = "tape")]
    Linear,
    #[serde(rename = "2d")]
    Planar,
}

/// Initial tape content: a string for linear tapes, rows of text for planar ones.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TapeContent {
    Line(String),
    Rows(Vec<String>),
}

/// Initial head position: an integer for linear tapes, `[x, y]` for planar ones.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum HeadPosition {
    Scalar(i64),
    Vector([i64; 2]),
}

/// One entry of `inputs`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InputConfig {
    pub tape: TapeContent,
    #[serde(default)]
    pub position: Option<HeadPosition>,
}

/// The whole configuration document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MachineConfig {
    pub start_state: String,
    pub states: OrderedMap<OrderedMap<RawInstruction>>,
    #[serde(default)]
    pub else_sign: Option<String>,
    #[serde(default = "default_blank")]
    pub blank_symbol: Symbol,
    #[serde(default, rename = "type")]
    pub tape_type: TapeType,
    #[serde(default)]
    pub inputs: Vec<InputConfig>,
}

fn default_blank() -> Symbol {
    DEFAULT_BLANK_SYMBOL
}

impl MachineConfig {
    /// Builds the machine described by this configuration.
    ///
    /// # Returns
    ///
    /// * `Err(MachineError::UnexpectedState)` if the start state is not declared.
    /// * `Err(MachineError::InvalidInstruction)` or `Err(MachineError::UnexpectedDirection)`
    ///   if an instruction encoding is malformed.
    /// * `Err(MachineError::ConfigDecode)` if an input does not fit the tape type.
    pub fn build(self) -> Result<Machine, MachineError> {
        let states = self
            .states
            .0
            .into_iter()
            .map(|(state, keys)| {
                keys.0
                    .into_iter()
                    .map(|(key, raw)| Instruction::try_from(raw).map(|i| Rule::new(key, i)))
                    .collect::<Result<Vec<_>, MachineError>>()
                    .map(|rules| (state, rules))
            })
            .collect::<Result<Vec<_>, MachineError>>()?;

        let table = TransitionTable::new(states, self.start_state, self.else_sign)?;

        let tapes = self
            .inputs
            .into_iter()
            .enumerate()
            .map(|(i, input)| build_tape(self.tape_type, input, self.blank_symbol, i))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            start_state = table.start_state(),
            tapes = tapes.len(),
            "machine configured"
        );

        Ok(Machine::new(table, tapes))
    }
}

fn build_tape(
    tape_type: TapeType,
    input: InputConfig,
    blank: Symbol,
    index: usize,
) -> Result<AnyTape, MachineError> {
    match (tape_type, input.tape, input.position) {
        (TapeType::Linear, TapeContent::Line(line), None) => Ok(Tape::new(&line, 0, blank).into()),
        (TapeType::Linear, TapeContent::Line(line), Some(HeadPosition::Scalar(head))) => {
            Ok(Tape::new(&line, head, blank).into())
        }
        (TapeType::Planar, TapeContent::Rows(rows), None) => {
            Ok(Tape2D::new(&rows, Position2D::default(), blank).into())
        }
        (TapeType::Planar, TapeContent::Rows(rows), Some(HeadPosition::Vector(head))) => {
            Ok(Tape2D::new(&rows, head.into(), blank).into())
        }
        (TapeType::Linear, _, _) => Err(MachineError::ConfigDecode(format!(
            "input {index}: a \"tape\" machine expects a string tape and an integer position"
        ))),
        (TapeType::Planar, _, _) => Err(MachineError::ConfigDecode(format!(
            "input {index}: a \"2d\" machine expects a list of rows and an [x, y] position"
        ))),
    }
}

/// Parses the given JSON source into a ready-to-run `Machine`.
///
/// # Returns
///
/// * `Err(MachineError::ConfigDecode)` if the source is not a well-formed configuration.
/// * `Err(MachineError::UnexpectedState)` if `start-state` is not one of `states`.
pub fn parse(source: &str) -> Result<Machine, MachineError> {
    let config: MachineConfig =
        serde_json::from_str(source).map_err(|e| MachineError::ConfigDecode(e.to_string()))?;

    config.build()
}

/// `MachineLoader` is a utility struct for loading machine configurations from files.
pub struct MachineLoader;

impl MachineLoader {
    /// Loads a machine from the JSON file at `path`.
    ///
    /// # Returns
    ///
    /// * `Err(MachineError::File)` if the file cannot be read.
    /// * Any error of [`parse`] for its content.
    pub fn load_machine(path: &Path) -> Result<Machine, MachineError> {
        let content = fs::read_to_string(path).map_err(|e| {
            MachineError::File(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        debug!(path = %path.display(), "loading machine");
        parse(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    const BINARY_INCREMENT: &str = r#"{
        "start-state": "carry",
        "states": {
            "carry": { "1": ["L", "carry", "0"], "0 ": ["L", "done", "1"] },
            "done": {}
        },
        "inputs": [
            { "tape": "00011", "position": 4 },
            { "tape": "0111", "position": 3 }
        ]
    }"#;

    #[test]
    fn test_parse_and_run() {
        let mut machine = parse(BINARY_INCREMENT).unwrap();
        assert_eq!(machine.tapes().len(), 2);
        assert_eq!(machine.state(), "carry");

        machine.run(0).unwrap();
        let tape = machine.tape(0).unwrap().as_linear().unwrap();
        assert_eq!(tape.content(), "00100");
    }

    #[test]
    fn test_key_order_is_preserved() {
        let source = r#"{
            "start-state": "s",
            "states": { "s": { "z1": "R", "a1": "L", "1": "R s" } }
        }"#;
        let machine = parse(source).unwrap();
        let keys: Vec<&str> = machine
            .table()
            .rules("s")
            .unwrap()
            .iter()
            .map(|rule| rule.key.as_str())
            .collect();
        assert_eq!(keys, vec!["z1", "a1", "1"]);
    }

    #[test]
    fn test_defaults() {
        let machine = parse(r#"{ "start-state": "s", "states": { "s": {} } }"#).unwrap();
        assert!(machine.tapes().is_empty());
        assert_eq!(machine.table().else_sign(), None);

        let machine =
            parse(r#"{ "start-state": "s", "states": { "s": {} }, "inputs": [{ "tape": "ab" }] }"#)
                .unwrap();
        let tape = machine.tape(0).unwrap().as_linear().unwrap();
        assert_eq!(tape.head(), 0);
        assert_eq!(tape.blank(), ' ');
    }

    #[test]
    fn test_else_sign_and_blank_symbol() {
        let source = r#"{
            "start-state": "s",
            "else-sign": "*",
            "blank-symbol": "_",
            "states": { "s": { "0": "R", "*": "L s x" } },
            "inputs": [{ "tape": "0_q" }]
        }"#;
        let machine = parse(source).unwrap();
        assert_eq!(machine.table().else_sign(), Some("*"));
        assert_eq!(
            machine.table().get_instruction("s", 'q').unwrap(),
            Instruction::from_text("L s x").unwrap()
        );

        let tape = machine.tape(0).unwrap().as_linear().unwrap();
        assert_eq!(tape.blank(), '_');
        assert_eq!(tape.len(), 2);
    }

    #[test]
    fn test_planar_inputs() {
        let source = r#"{
            "type": "2d",
            "start-state": "s",
            "states": { "s": { "a": ["D", "s"] } },
            "inputs": [
                { "tape": ["ab", "c"], "position": [1, 0] },
                { "tape": ["xyz"] }
            ]
        }"#;
        let machine = parse(source).unwrap();

        let first = machine.tape(0).unwrap().as_planar().unwrap();
        assert_eq!(first.head(), Position2D::new(1, 0));
        assert_eq!(first.read(Position2D::new(0, 1)), 'c');

        let second = machine.tape(1).unwrap().as_planar().unwrap();
        assert_eq!(second.head(), Position2D::default());
        assert_eq!(
            machine.table().get_instruction("s", 'a').unwrap().direction(),
            Some(Direction::Down)
        );
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            parse("{ not json"),
            Err(MachineError::ConfigDecode(_))
        ));
        assert!(matches!(
            parse(r#"{ "states": { "s": {} } }"#),
            Err(MachineError::ConfigDecode(_))
        ));
        assert!(matches!(
            parse(r#"{ "start-state": "s", "states": { "s": {} }, "type": "graph" }"#),
            Err(MachineError::ConfigDecode(_))
        ));
        assert!(matches!(
            parse(r#"{ "start-state": "s", "states": { "s": {} }, "blank-symbol": "__" }"#),
            Err(MachineError::ConfigDecode(_))
        ));
    }

    #[test]
    fn test_input_shape_must_match_type() {
        let linear_with_rows = r#"{
            "start-state": "s", "states": { "s": {} },
            "inputs": [{ "tape": ["ab"] }]
        }"#;
        assert!(matches!(
            parse(linear_with_rows),
            Err(MachineError::ConfigDecode(_))
        ));

        let planar_with_scalar = r#"{
            "type": "2d", "start-state": "s", "states": { "s": {} },
            "inputs": [{ "tape": ["ab"], "position": 3 }]
        }"#;
        assert!(matches!(
            parse(planar_with_scalar),
            Err(MachineError::ConfigDecode(_))
        ));
    }

    #[test]
    fn test_head_at_range_limit_fails_instead_of_wrapping() {
        let source = format!(
            r#"{{
                "start-state": "s",
                "states": {{ "s": {{ " ": "R" }} }},
                "inputs": [{{ "tape": "", "position": {} }}]
            }}"#,
            i64::MAX
        );
        let mut machine = parse(&source).unwrap();
        assert_eq!(
            machine.run(0),
            Err(MachineError::HeadOutOfRange(i64::MAX.to_string()))
        );
    }

    #[test]
    fn test_missing_start_state() {
        let source = r#"{ "start-state": "q9", "states": { "q0": {} } }"#;
        assert_eq!(
            parse(source).unwrap_err(),
            MachineError::UnexpectedState("q9".to_string())
        );
    }

    #[test]
    fn test_invalid_instruction_arity() {
        let source = r#"{
            "start-state": "s",
            "states": { "s": { "0": ["R", "s", "1", "extra"] } }
        }"#;
        assert!(matches!(
            parse(source),
            Err(MachineError::InvalidInstruction(_))
        ));

        let source = r#"{ "start-state": "s", "states": { "s": { "0": [] } } }"#;
        assert!(matches!(
            parse(source),
            Err(MachineError::InvalidInstruction(_))
        ));
    }

    #[test]
    fn test_load_machine_from_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("increment.json");

        let mut file = File::create(&file_path).unwrap();
        file.write_all(BINARY_INCREMENT.as_bytes()).unwrap();

        let mut machine = MachineLoader::load_machine(&file_path).unwrap();
        machine.run(1).unwrap();
        let tape = machine.tape(1).unwrap().as_linear().unwrap();
        assert_eq!(tape.content(), "1000");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let result = MachineLoader::load_machine(&dir.path().join("absent.json"));
        assert!(matches!(result, Err(MachineError::File(_))));
    }
}
