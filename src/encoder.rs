//! This module provides the Gödel number codec: a bijection between the rule set of a
//! machine and a string of unary run-lengths over `{0, 1}`.
//!
//! Every transition of a non-finish state becomes one block, in `Q × Gamma` declaration
//! order:
//!
//! ```text
//! 11 <state> 1 <read> 1 <next state> 1 <write> 1 <direction>
//! ```
//!
//! where each field is a 1-based index (or direction code Left=1, Stay=2, Right=3)
//! written as that many `0`s. The number ends with `111`.

use crate::machine::Machine;
use crate::parser::parse;
use crate::types::{
    DecodeError, Description, Direction, LookupError, Mode, Ruleset, Signature, Transition,
    TuringMachineError, END_MARKER, FIELD_SEPARATOR, PAIR_SEPARATOR, UNARY_DIGIT,
};
use serde::{Deserialize, Serialize};
use std::collections::{hash_map::Entry, HashMap};
use std::fmt;
use std::str::FromStr;

/// A grammar-checked Gödel number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GodelNumber(String);

impl GodelNumber {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the number of digits.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for GodelNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for GodelNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for GodelNumber {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)?;
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for GodelNumber {
    type Error = DecodeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        parse(&s)?;
        Ok(Self(s))
    }
}

impl From<GodelNumber> for String {
    fn from(number: GodelNumber) -> Self {
        number.0
    }
}

/// Encodes the rule set of `machine` as a Gödel number.
///
/// Rules keyed on the finish state are never consulted and are left out. Every other
/// `(state, symbol)` pair must have a rule, which strict validation guarantees.
///
/// # Returns
///
/// * `Ok(GodelNumber)` for a machine that is total over its non-finish states.
/// * `Err(LookupError)` naming the first pair without a rule otherwise.
pub fn encode(machine: &Machine) -> Result<GodelNumber, LookupError> {
    let states = positions(machine.states());
    let symbols = positions(machine.tape_alphabet());
    let mut number = String::new();

    for state in machine.states() {
        if machine.is_finish(state) {
            continue;
        }

        for symbol in machine.tape_alphabet() {
            let transition = machine.action(state, symbol)?;

            // Validation guarantees every rule refers to members of Q and Gamma.
            write_block(
                &mut number,
                [
                    states[state],
                    symbols[symbol],
                    states[&transition.next_state],
                    symbols[&transition.write],
                    transition.direction.code(),
                ],
            );
        }
    }

    number.push_str(END_MARKER);
    Ok(GodelNumber(number))
}

/// Maps each atom to its 1-based position.
fn positions<T: Eq + std::hash::Hash>(items: &[T]) -> HashMap<&T, usize> {
    items.iter().enumerate().map(|(i, item)| (item, i + 1)).collect()
}

fn write_block(number: &mut String, fields: [usize; 5]) {
    number.push_str(PAIR_SEPARATOR);
    for (i, run) in fields.into_iter().enumerate() {
        if i > 0 {
            number.push(FIELD_SEPARATOR);
        }
        number.extend(std::iter::repeat(UNARY_DIGIT).take(run));
    }
}

/// Decodes a Gödel number into a machine over `signature`.
///
/// The number carries only the rules, so `signature` must be the one used to encode it.
/// The rebuilt description is validated in `mode` like any other.
///
/// # Returns
///
/// * `Ok(Machine)` if the number is well formed and the resulting description is valid.
/// * `Err(TuringMachineError::Decode)` if the grammar or an index is violated.
/// * `Err(TuringMachineError::Description)` if the decoded machine fails validation.
pub fn decode(
    number: &str,
    signature: Signature,
    mode: Mode,
) -> Result<Machine, TuringMachineError> {
    let blocks = parse(number)?;
    let mut rules = Ruleset::new();

    for block in &blocks {
        let state = nth(&signature.states, block.state).ok_or(DecodeError::StateIndex {
            index: block.state,
            len: signature.states.len(),
        })?;
        let read = nth(&signature.tape_alphabet, block.read).ok_or(DecodeError::SymbolIndex {
            index: block.read,
            len: signature.tape_alphabet.len(),
        })?;
        let next_state =
            nth(&signature.states, block.next_state).ok_or(DecodeError::StateIndex {
                index: block.next_state,
                len: signature.states.len(),
            })?;
        let write = nth(&signature.tape_alphabet, block.write).ok_or(DecodeError::SymbolIndex {
            index: block.write,
            len: signature.tape_alphabet.len(),
        })?;
        let direction = Direction::from_code(block.direction)
            .ok_or(DecodeError::DirectionCode(block.direction))?;

        match rules.entry(state.clone()).or_default().entry(read.clone()) {
            Entry::Occupied(_) => {
                return Err(DecodeError::DuplicatePair(state.clone(), read.clone()).into());
            }
            Entry::Vacant(slot) => {
                slot.insert(Transition {
                    next_state: next_state.clone(),
                    write: write.clone(),
                    direction,
                });
            }
        }
    }

    tracing::debug!(blocks = blocks.len(), digits = number.len(), "decoded Gödel number");

    Ok(Machine::new(Description {
        signature,
        mode,
        rules,
    })?)
}

/// Returns the item at a 1-based position.
fn nth<T>(items: &[T], position: usize) -> Option<&T> {
    position.checked_sub(1).and_then(|i| items.get(i))
}
