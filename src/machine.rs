//! This module defines the `Machine` struct, a validated and immutable Turing machine
//! description. It answers rule lookups for runs and converts to and from Gödel numbers.

use crate::analyzer::{analyze, DescriptionError};
use crate::encoder::{self, GodelNumber};
use crate::tape::Tape;
use crate::types::{
    Description, LookupError, Mode, Ruleset, Signature, State, Symbol, Transition,
    TuringMachineError,
};

/// A validated single-tape Turing machine.
///
/// A `Machine` only exists if its description passed validation, and it never changes
/// afterwards, so one machine can be shared by any number of concurrent runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Machine {
    signature: Signature,
    rules: Ruleset,
    mode: Mode,
}

impl Machine {
    /// Validates `description` and builds a machine from it.
    ///
    /// # Returns
    ///
    /// * `Ok(Machine)` if every check required by the description's mode passes.
    /// * `Err(DescriptionError)` describing every violation of the first failing check.
    pub fn new(description: Description) -> Result<Self, DescriptionError> {
        analyze(&description)?;

        let Description {
            signature,
            mode,
            rules,
        } = description;

        tracing::debug!(
            states = signature.states.len(),
            symbols = signature.tape_alphabet.len(),
            rules = rules.values().map(|row| row.len()).sum::<usize>(),
            ?mode,
            "machine validated"
        );

        Ok(Self {
            signature,
            rules,
            mode,
        })
    }

    /// Builds a machine from a Gödel number and the signature used to encode it.
    pub fn decode(
        number: &str,
        signature: Signature,
        mode: Mode,
    ) -> Result<Self, TuringMachineError> {
        encoder::decode(number, signature, mode)
    }

    /// Encodes the rule set as a Gödel number.
    ///
    /// Fails with the first `(state, symbol)` pair of a non-finish state that has no rule.
    pub fn encode(&self) -> Result<GodelNumber, LookupError> {
        encoder::encode(self)
    }

    /// Looks up the transition for `symbol` read in `state`.
    pub fn action(&self, state: &State, symbol: &Symbol) -> Result<&Transition, LookupError> {
        self.rules
            .get(state)
            .ok_or_else(|| LookupError::UnknownState(state.clone()))?
            .get(symbol)
            .ok_or_else(|| LookupError::UndefinedTransition(state.clone(), symbol.clone()))
    }

    /// Returns true if `state` is the halting state.
    pub fn is_finish(&self, state: &State) -> bool {
        *state == self.signature.finish
    }

    /// Creates a tape over this machine's blank, with `content` starting at index 0.
    pub fn tape<I>(&self, content: I) -> Tape
    where
        I: IntoIterator<Item = Symbol>,
    {
        Tape::new(content, self.signature.blank.clone())
    }

    /// Returns the 1-based position of `state` in `Q`.
    pub fn state_index(&self, state: &State) -> Option<usize> {
        self.signature
            .states
            .iter()
            .position(|s| s == state)
            .map(|i| i + 1)
    }

    /// Returns the 1-based position of `symbol` in `Gamma`.
    pub fn symbol_index(&self, symbol: &Symbol) -> Option<usize> {
        self.signature
            .tape_alphabet
            .iter()
            .position(|s| s == symbol)
            .map(|i| i + 1)
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn states(&self) -> &[State] {
        &self.signature.states
    }

    pub fn input_alphabet(&self) -> &[Symbol] {
        &self.signature.input_alphabet
    }

    pub fn tape_alphabet(&self) -> &[Symbol] {
        &self.signature.tape_alphabet
    }

    pub fn blank(&self) -> &Symbol {
        &self.signature.blank
    }

    pub fn start(&self) -> &State {
        &self.signature.start
    }

    pub fn finish(&self) -> &State {
        &self.signature.finish
    }

    pub fn rules(&self) -> &Ruleset {
        &self.rules
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the description this machine was built from.
    pub fn to_description(&self) -> Description {
        Description {
            signature: self.signature.clone(),
            mode: self.mode,
            rules: self.rules.clone(),
        }
    }
}

impl TryFrom<Description> for Machine {
    type Error = DescriptionError;

    fn try_from(description: Description) -> Result<Self, Self::Error> {
        Self::new(description)
    }
}
