//! This crate provides the core of a deterministic single-tape Turing machine interpreter.
//! It includes modules for validating machine descriptions, executing them over a
//! bidirectionally unbounded tape, and converting rule sets to and from Gödel numbers.

pub mod analyzer;
pub mod encoder;
pub mod machine;
pub mod parser;
pub mod programs;
pub mod run;
pub mod tape;
pub mod types;

/// Re-exports the `Rule` enum generated by `pest` for the Gödel number grammar.
pub use crate::parser::Rule as GrammarRule;
/// Re-exports the validation entry point, the individual checks and their error type.
pub use analyzer::{
    analyze, check_distinct, check_states, check_symbols, check_totality, DescriptionError,
};
/// Re-exports the Gödel number codec.
pub use encoder::{decode, encode, GodelNumber};
/// Re-exports the `Machine` struct from the machine module.
pub use machine::Machine;
/// Re-exports the sample program catalogue.
pub use programs::{Program, ProgramInfo, ProgramManager, PROGRAMS};
/// Re-exports the execution cursor and its display snapshot.
pub use run::{Configuration, Run};
/// Re-exports the tape and its display window.
pub use tape::{Tape, Window};
/// Re-exports the description, outcome and error types from the types module.
pub use types::{
    ruleset, Atom, DecodeError, Description, Direction, LookupError, Mode, Rule, Ruleset,
    Signature, State, Step, Symbol, Transition, TuringMachineError,
};
