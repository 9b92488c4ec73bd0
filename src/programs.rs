//! A small catalogue of sample machines, embedded as JSON descriptions and parsed on
//! first use.

use crate::analyzer::DescriptionError;
use crate::encoder::GodelNumber;
use crate::machine::Machine;
use crate::tape::Tape;
use crate::types::{Description, Symbol, TuringMachineError};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

// Default embedded programs
const PROGRAM_TEXTS: [&str; 3] = [
    include_str!("../programs/unary-increment.json"),
    include_str!("../programs/binary-increment.json"),
    include_str!("../programs/busy-beaver-2.json"),
];

lazy_static::lazy_static! {
    pub static ref PROGRAMS: RwLock<Vec<Program>> = RwLock::new(Vec::new());
}

/// A named machine description together with the tape it is meant to run on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub name: String,
    #[serde(flatten)]
    pub description: Description,
    /// Initial tape content, starting at index 0.
    #[serde(default)]
    pub tape: Vec<Symbol>,
}

impl Program {
    /// Validates the description and builds its machine.
    pub fn machine(&self) -> Result<Machine, DescriptionError> {
        Machine::new(self.description.clone())
    }

    /// Builds the program's initial tape.
    pub fn tape(&self) -> Tape {
        Tape::new(
            self.tape.iter().cloned(),
            self.description.signature.blank.clone(),
        )
    }
}

/// Summary of a catalogue entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramInfo {
    pub index: usize,
    pub name: String,
    pub state_count: usize,
    pub symbol_count: usize,
    pub rule_count: usize,
    /// The Gödel number, for machines total over their non-finish states.
    pub godel: Option<GodelNumber>,
}

pub struct ProgramManager;

impl ProgramManager {
    /// Parses and validates the embedded programs, replacing the current catalogue.
    ///
    /// Entries that fail to parse or validate are skipped with a warning.
    pub fn load() -> Result<(), TuringMachineError> {
        let programs: Vec<Program> = PROGRAM_TEXTS
            .iter()
            .filter_map(|text| match serde_json::from_str::<Program>(text) {
                Ok(program) => match program.machine() {
                    Ok(_) => Some(program),
                    Err(e) => {
                        tracing::warn!(name = %program.name, "skipping invalid program: {e}");
                        None
                    }
                },
                Err(e) => {
                    tracing::warn!("failed to parse program: {e}");
                    None
                }
            })
            .collect();

        tracing::debug!(count = programs.len(), "program catalogue loaded");

        let mut guard = PROGRAMS
            .write()
            .map_err(|_| TuringMachineError::Catalog("Failed to acquire write lock".to_string()))?;
        *guard = programs;

        Ok(())
    }

    /// Loads the catalogue unless it is already populated.
    fn ensure_loaded() -> Result<(), TuringMachineError> {
        let loaded = PROGRAMS
            .read()
            .map(|programs| !programs.is_empty())
            .unwrap_or(false);

        if loaded {
            Ok(())
        } else {
            Self::load()
        }
    }

    fn with_programs<T>(f: impl FnOnce(&[Program]) -> T) -> Result<T, TuringMachineError> {
        Self::ensure_loaded()?;

        PROGRAMS
            .read()
            .map(|programs| f(&programs))
            .map_err(|_| TuringMachineError::Catalog("Failed to acquire read lock".to_string()))
    }

    /// Get the number of available programs
    pub fn count() -> usize {
        Self::with_programs(|programs| programs.len()).unwrap_or(0)
    }

    /// Get a program by its index
    pub fn get_by_index(index: usize) -> Result<Program, TuringMachineError> {
        Self::with_programs(|programs| programs.get(index).cloned())?.ok_or_else(|| {
            TuringMachineError::Catalog(format!("Program index {} out of range", index))
        })
    }

    /// Get a program by its name
    pub fn get_by_name(name: &str) -> Result<Program, TuringMachineError> {
        Self::with_programs(|programs| programs.iter().find(|p| p.name == name).cloned())?
            .ok_or_else(|| TuringMachineError::Catalog(format!("Program '{}' not found", name)))
    }

    /// List all program names
    pub fn list_names() -> Vec<String> {
        Self::with_programs(|programs| programs.iter().map(|p| p.name.clone()).collect())
            .unwrap_or_default()
    }

    /// Get information about a program by its index
    pub fn info(index: usize) -> Result<ProgramInfo, TuringMachineError> {
        let program = Self::get_by_index(index)?;
        let machine = program.machine()?;
        let signature = machine.signature();

        Ok(ProgramInfo {
            index,
            name: program.name,
            state_count: signature.states.len(),
            symbol_count: signature.tape_alphabet.len(),
            rule_count: machine.rules().values().map(|row| row.len()).sum(),
            godel: machine.encode().ok(),
        })
    }
}
