//! This module defines the core data structures and types used throughout the interpreter,
//! including atoms, transition rules, machine descriptions, execution outcomes and error types.

use serde::{Deserialize, Serialize};
use std::collections::{hash_map::Entry, HashMap};
use std::fmt;
use thiserror::Error;

use crate::analyzer::DescriptionError;
use crate::parser::Rule as GrammarRule;

/// Separator written in front of every encoded transition block.
pub const PAIR_SEPARATOR: &str = "11";
/// Separator between the five unary fields of a transition block.
pub const FIELD_SEPARATOR: char = '1';
/// Marker terminating a Gödel number.
pub const END_MARKER: &str = "111";
/// Digit repeated to write a unary run-length.
pub const UNARY_DIGIT: char = '0';
/// Number of cells shown on each side of the head by default.
pub const DEFAULT_DISPLAY_SPAN: usize = 8;

/// An opaque atom used for both states and tape symbols.
///
/// Atoms carry no numeric meaning; only equality, hashing and ordering are used.
/// They serialize untagged, so `0` and `"q0"` are both valid JSON atoms.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Atom {
    Int(i64),
    Name(String),
}

/// A control state of the machine.
pub type State = Atom;
/// A symbol of the tape alphabet.
pub type Symbol = Atom;

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Int(value) => write!(f, "{value}"),
            Atom::Name(name) => f.write_str(name),
        }
    }
}

impl From<i64> for Atom {
    fn from(value: i64) -> Self {
        Atom::Int(value)
    }
}

impl From<i32> for Atom {
    fn from(value: i32) -> Self {
        Atom::Int(value.into())
    }
}

impl From<&str> for Atom {
    fn from(name: &str) -> Self {
        Atom::Name(name.to_string())
    }
}

impl From<String> for Atom {
    fn from(name: String) -> Self {
        Atom::Name(name)
    }
}

impl From<char> for Atom {
    fn from(c: char) -> Self {
        Atom::Name(c.to_string())
    }
}

/// Represents the possible directions the head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Keep the head in the same position.
    Stay,
    /// Move the head one position to the right.
    Right,
}

impl Direction {
    /// Returns the Gödel direction code: Left=1, Stay=2, Right=3.
    pub fn code(self) -> usize {
        match self {
            Direction::Left => 1,
            Direction::Stay => 2,
            Direction::Right => 3,
        }
    }

    /// Maps a Gödel direction code back to a `Direction`.
    pub fn from_code(code: usize) -> Option<Self> {
        match code {
            1 => Some(Direction::Left),
            2 => Some(Direction::Stay),
            3 => Some(Direction::Right),
            _ => None,
        }
    }

    /// Offset applied to the head position.
    pub fn offset(self) -> isize {
        match self {
            Direction::Left => -1,
            Direction::Stay => 0,
            Direction::Right => 1,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Direction::Left => 'L',
            Direction::Stay => 'S',
            Direction::Right => 'R',
        };
        write!(f, "{c}")
    }
}

/// The right-hand side of a transition rule: what to do after reading a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transition {
    /// The state the machine moves to.
    pub next_state: State,
    /// The symbol written over the one just read.
    pub write: Symbol,
    /// Where the head moves after writing.
    pub direction: Direction,
}

impl Transition {
    pub fn new(next_state: impl Into<State>, write: impl Into<Symbol>, direction: Direction) -> Self {
        Self {
            next_state: next_state.into(),
            write: write.into(),
            direction,
        }
    }
}

/// A single rule in flat form: `δ(state, read) = (next_state, write, direction)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub state: State,
    pub read: Symbol,
    pub next_state: State,
    pub write: Symbol,
    pub direction: Direction,
}

impl Rule {
    pub fn new(
        state: impl Into<State>,
        read: impl Into<Symbol>,
        next_state: impl Into<State>,
        write: impl Into<Symbol>,
        direction: Direction,
    ) -> Self {
        Self {
            state: state.into(),
            read: read.into(),
            next_state: next_state.into(),
            write: write.into(),
            direction,
        }
    }
}

/// Transition rules indexed by state, then by the symbol read.
pub type Ruleset = HashMap<State, HashMap<Symbol, Transition>>;

/// Builds a `Ruleset` from flat rules.
///
/// Repeating a rule verbatim is harmless, but giving one `(state, symbol)` key two
/// different transitions would make the machine nondeterministic and is rejected with
/// every conflicting key listed.
pub fn ruleset<I>(rules: I) -> Result<Ruleset, DescriptionError>
where
    I: IntoIterator<Item = Rule>,
{
    let mut set = Ruleset::new();
    let mut conflicts = Vec::new();

    for rule in rules {
        let Rule {
            state,
            read,
            next_state,
            write,
            direction,
        } = rule;
        let transition = Transition {
            next_state,
            write,
            direction,
        };

        match set.entry(state.clone()).or_default().entry(read.clone()) {
            Entry::Occupied(existing) => {
                if *existing.get() != transition {
                    conflicts.push((state, read));
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(transition);
            }
        }
    }

    if conflicts.is_empty() {
        Ok(set)
    } else {
        conflicts.sort();
        conflicts.dedup();
        Err(DescriptionError::ConflictingRules(conflicts))
    }
}

/// Serializes a `Ruleset` as a sorted list of flat `Rule`s.
mod rule_list {
    use super::{ruleset, Rule, Ruleset};
    use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(rules: &Ruleset, serializer: S) -> Result<S::Ok, S::Error> {
        let mut flat: Vec<Rule> = rules
            .iter()
            .flat_map(|(state, row)| {
                row.iter().map(move |(read, t)| Rule {
                    state: state.clone(),
                    read: read.clone(),
                    next_state: t.next_state.clone(),
                    write: t.write.clone(),
                    direction: t.direction,
                })
            })
            .collect();
        flat.sort_by(|a, b| (&a.state, &a.read).cmp(&(&b.state, &b.read)));
        flat.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Ruleset, D::Error> {
        let flat = Vec::<Rule>::deserialize(deserializer)?;
        ruleset(flat).map_err(D::Error::custom)
    }
}

/// The rule-free part of a machine description: `(Q, Sigma, Gamma, space, start, finish)`.
///
/// The order of `states` and `tape_alphabet` is significant: it fixes the indices used
/// by the Gödel encoding, so decoding needs the same signature that encoding used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// The state set `Q`, in declaration order.
    pub states: Vec<State>,
    /// The input alphabet `Sigma`; must be a subset of the tape alphabet.
    pub input_alphabet: Vec<Symbol>,
    /// The tape alphabet `Gamma`, in declaration order.
    pub tape_alphabet: Vec<Symbol>,
    /// The symbol filling every cell that was never written.
    pub blank: Symbol,
    /// The state a run starts in.
    pub start: State,
    /// The unique halting state.
    pub finish: State,
}

/// The validation mode applied when a machine is constructed.
///
/// - `Normal` (default): only membership of states and symbols is checked; a missing
///   rule surfaces as a lookup error when a run reaches it.
/// - `Strict`: every non-finish state must additionally define a rule for every symbol
///   of the tape alphabet.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    Strict,
}

/// A complete machine description, the input to `Machine::new`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    #[serde(flatten)]
    pub signature: Signature,
    #[serde(default)]
    pub mode: Mode,
    #[serde(with = "rule_list")]
    pub rules: Ruleset,
}

impl Description {
    /// Creates a description validated in `Mode::Normal`.
    pub fn new(signature: Signature, rules: Ruleset) -> Self {
        Self {
            signature,
            mode: Mode::Normal,
            rules,
        }
    }

    /// Switches the description to `Mode::Strict`.
    pub fn strict(mut self) -> Self {
        self.mode = Mode::Strict;
        self
    }
}

/// Represents the outcome of a single execution step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A transition was applied and the machine has not reached the finish state.
    Continue,
    /// The machine is in the finish state.
    Halt,
}

/// Raised when no rule covers the current `(state, symbol)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The state has no rules at all.
    #[error("No rules defined for state {0}")]
    UnknownState(State),
    /// The state has rules, but none for this symbol.
    #[error("No rule defined for state {0} and symbol {1}")]
    UndefinedTransition(State, Symbol),
}

/// Raised when a Gödel number does not describe a rule set over the given signature.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("Malformed Gödel number: {0}")]
    Syntax(#[from] Box<pest::error::Error<GrammarRule>>),
    #[error("State index {index} is out of range (Q has {len} states)")]
    StateIndex { index: usize, len: usize },
    #[error("Symbol index {index} is out of range (Gamma has {len} symbols)")]
    SymbolIndex { index: usize, len: usize },
    #[error("Invalid direction code {0} (expected 1, 2 or 3)")]
    DirectionCode(usize),
    #[error("Transition for state {0} and symbol {1} is encoded more than once")]
    DuplicatePair(State, Symbol),
}

/// Represents the errors surfaced by the interpreter.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuringMachineError {
    /// The machine description violates a well-formedness rule.
    #[error("Invalid machine description: {0}")]
    Description(#[from] DescriptionError),
    /// A run reached a configuration no rule covers.
    #[error(transparent)]
    Lookup(#[from] LookupError),
    /// A Gödel number could not be decoded.
    #[error("Gödel number decoding error: {0}")]
    Decode(#[from] DecodeError),
    /// The built-in program catalogue could not serve a request.
    #[error("Program catalogue error: {0}")]
    Catalog(String),
}
