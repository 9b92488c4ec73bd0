//! This module defines `Run`, the execution cursor that drives a `Machine` over a `Tape`.
//!
//! A run is `Running` until its state equals the machine's finish state and `Halted`
//! afterwards. Nothing bounds the number of steps: a description that never reaches
//! its finish state runs forever under `run`, so callers that need a budget should
//! call `step` themselves.

use crate::machine::Machine;
use crate::tape::{Tape, Window};
use crate::types::{LookupError, State, Step};
use std::fmt;

/// A machine executing over its own tape.
#[derive(Debug, Clone)]
pub struct Run<'m> {
    machine: &'m Machine,
    tape: Tape,
    state: State,
    head: isize,
    steps: usize,
}

/// A snapshot of a run for display: current state, head position and the tape around it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub state: State,
    pub head: isize,
    pub window: Window,
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}: {}", self.state, self.head, self.window)
    }
}

impl<'m> Run<'m> {
    /// Starts a run in the machine's start state with the head at index 0.
    pub fn new(machine: &'m Machine, tape: Tape) -> Self {
        Self {
            machine,
            tape,
            state: machine.start().clone(),
            head: 0,
            steps: 0,
        }
    }

    /// Executes a single transition.
    ///
    /// Reads the symbol under the head, writes the replacement, moves to the next state
    /// and moves the head. Calling `step` on a halted run changes nothing.
    ///
    /// # Returns
    ///
    /// * `Ok(Step::Continue)` if a transition was applied and the run is still going.
    /// * `Ok(Step::Halt)` if the run is (now) in the finish state.
    /// * `Err(LookupError)` if no rule covers the current state and symbol; the run is
    ///   left untouched.
    pub fn step(&mut self) -> Result<Step, LookupError> {
        if self.is_halted() {
            return Ok(Step::Halt);
        }

        let symbol = self.tape.read(self.head);
        let transition = self.machine.action(&self.state, symbol)?;

        tracing::trace!(
            step = self.steps,
            state = %self.state,
            head = self.head,
            read = %symbol,
            next = %transition.next_state,
            write = %transition.write,
            direction = %transition.direction,
            "step"
        );

        self.tape.write(self.head, transition.write.clone());
        self.state = transition.next_state.clone();
        self.head += transition.direction.offset();
        self.steps += 1;

        Ok(if self.is_halted() {
            Step::Halt
        } else {
            Step::Continue
        })
    }

    /// Steps until the run halts and returns the number of steps taken by this call.
    ///
    /// This never returns for a description that does not halt on this tape.
    pub fn run(&mut self) -> Result<usize, LookupError> {
        let start = self.steps;
        while self.step()? == Step::Continue {}
        Ok(self.steps - start)
    }

    /// Returns true once the finish state has been reached.
    pub fn is_halted(&self) -> bool {
        self.machine.is_finish(&self.state)
    }

    /// Returns the current state and the `span` cells on either side of the head.
    pub fn configuration(&mut self, span: usize) -> Configuration {
        Configuration {
            state: self.state.clone(),
            head: self.head,
            window: self.tape.display(self.head, span),
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn head(&self) -> isize {
        self.head
    }

    /// Returns the number of transitions applied so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn machine(&self) -> &'m Machine {
        self.machine
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    /// Ends the run and hands back its tape.
    pub fn into_tape(self) -> Tape {
        self.tape
    }
}
