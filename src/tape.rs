//! This module defines the `Tape`, a sequence of symbols indexed by every integer.
//!
//! Only a finite window is materialized: a `Vec` plus an `origin` offset giving the
//! physical slot of logical index 0. Accessing an index outside the window grows the
//! backing storage geometrically in that direction, filling new cells with the blank.

use crate::types::Symbol;
use std::fmt;
use std::ops::{Index, IndexMut};

/// A logically infinite tape backed by finite storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<Symbol>,
    origin: usize,
    blank: Symbol,
}

impl Tape {
    /// Creates a tape whose logical index 0 holds the first symbol of `content`.
    pub fn new<I>(content: I, blank: Symbol) -> Self
    where
        I: IntoIterator<Item = Symbol>,
    {
        Self::with_origin(content, 0, blank)
    }

    /// Creates a tape whose logical index 0 is the `origin`-th symbol of `content`.
    ///
    /// Content shorter than `origin + 1` is padded with blanks on the right.
    pub fn with_origin<I>(content: I, origin: usize, blank: Symbol) -> Self
    where
        I: IntoIterator<Item = Symbol>,
    {
        let mut cells: Vec<Symbol> = content.into_iter().collect();
        if cells.len() <= origin {
            cells.resize(origin + 1, blank.clone());
        }

        Self {
            cells,
            origin,
            blank,
        }
    }

    /// Returns the blank symbol.
    pub fn blank(&self) -> &Symbol {
        &self.blank
    }

    /// Returns the lowest materialized logical index.
    pub fn min(&self) -> isize {
        -(self.origin as isize)
    }

    /// Returns the highest materialized logical index.
    pub fn max(&self) -> isize {
        self.cells.len() as isize - self.origin as isize - 1
    }

    /// Returns the number of materialized cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Reads the symbol at `index`, materializing it first if needed.
    pub fn read(&mut self, index: isize) -> &Symbol {
        let slot = self.slot(index);
        &self.cells[slot]
    }

    /// Writes `symbol` at `index`, materializing it first if needed.
    pub fn write(&mut self, index: isize, symbol: Symbol) {
        let slot = self.slot(index);
        self.cells[slot] = symbol;
    }

    /// Reads the symbol at `index` without growing; unmaterialized cells read as blank.
    pub fn get(&self, index: isize) -> &Symbol {
        if index < self.min() || index > self.max() {
            return &self.blank;
        }
        &self.cells[(index + self.origin as isize) as usize]
    }

    /// Returns the `span` symbols left of `index`, the symbol at `index` and the `span`
    /// symbols right of it.
    pub fn display(&mut self, index: isize, span: usize) -> Window {
        let span = span as isize;
        let lo = self.slot(index - span);
        let hi = self.slot(index + span);
        let center = self.slot(index);

        Window {
            left: self.cells[lo..center].to_vec(),
            center: self.cells[center].clone(),
            right: self.cells[center + 1..=hi].to_vec(),
        }
    }

    /// Returns every materialized cell, lowest index first.
    pub fn symbols(&self) -> &[Symbol] {
        &self.cells
    }

    /// Returns the cells between the first and last non-blank symbol, inclusive.
    pub fn trimmed(&self) -> &[Symbol] {
        let is_mark = |symbol: &Symbol| *symbol != self.blank;
        match (
            self.cells.iter().position(is_mark),
            self.cells.iter().rposition(is_mark),
        ) {
            (Some(first), Some(last)) => &self.cells[first..=last],
            _ => &[],
        }
    }

    /// Grows the tape until `index` is materialized and returns its physical slot.
    ///
    /// The origin is only updated after the grown cells are in place, so every existing
    /// logical index keeps its value.
    fn slot(&mut self, index: isize) -> usize {
        while index < self.min() {
            self.extend_left();
        }
        while index > self.max() {
            self.extend_right();
        }
        (index + self.origin as isize) as usize
    }

    fn extend_left(&mut self) {
        let grow = self.cells.len().max(1);
        self.cells
            .splice(0..0, std::iter::repeat(self.blank.clone()).take(grow));
        self.origin += grow;
        tracing::trace!(grow, len = self.cells.len(), origin = self.origin, "tape grew left");
    }

    fn extend_right(&mut self) {
        let grow = self.cells.len().max(1);
        self.cells.resize(self.cells.len() + grow, self.blank.clone());
        tracing::trace!(grow, len = self.cells.len(), origin = self.origin, "tape grew right");
    }
}

impl Index<isize> for Tape {
    type Output = Symbol;

    fn index(&self, index: isize) -> &Symbol {
        self.get(index)
    }
}

impl IndexMut<isize> for Tape {
    fn index_mut(&mut self, index: isize) -> &mut Symbol {
        let slot = self.slot(index);
        &mut self.cells[slot]
    }
}

/// The neighbourhood of a tape cell, as returned by `Tape::display`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    pub left: Vec<Symbol>,
    pub center: Symbol,
    pub right: Vec<Symbol>,
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for symbol in &self.left {
            write!(f, "{symbol} ")?;
        }
        write!(f, "[{}]", self.center)?;
        for symbol in &self.right {
            write!(f, " {symbol}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Atom;
    use proptest::prelude::*;

    fn binary(content: &[i64]) -> Tape {
        Tape::new(content.iter().map(|&v| Atom::Int(v)), Atom::Int(0))
    }

    #[test]
    fn test_growth_is_transparent() {
        let mut tape = binary(&[1]);

        assert_eq!(*tape.read(5), Atom::Int(0));
        assert_eq!(*tape.read(-5), Atom::Int(0));
        assert_eq!(*tape.read(0), Atom::Int(1));
    }

    #[test]
    fn test_growth_doubles() {
        let mut tape = binary(&[1, 1]);
        assert_eq!((tape.min(), tape.max()), (0, 1));

        tape.read(2);
        assert_eq!(tape.len(), 4);
        assert_eq!((tape.min(), tape.max()), (0, 3));

        tape.read(-1);
        assert_eq!(tape.len(), 8);
        assert_eq!((tape.min(), tape.max()), (-4, 3));

        // Inside the materialized range nothing changes.
        tape.read(-4);
        tape.write(3, Atom::Int(1));
        assert_eq!(tape.len(), 8);
    }

    #[test]
    fn test_empty_tape_grows() {
        let mut tape = Tape::new(Vec::new(), Atom::from('_'));
        assert_eq!(tape.len(), 1);

        tape.write(-3, Atom::from('x'));
        assert_eq!(*tape.read(-3), Atom::from('x'));
        assert_eq!(*tape.read(0), Atom::from('_'));
    }

    #[test]
    fn test_write_then_read() {
        let mut tape = binary(&[1, 0, 1]);
        tape.write(-2, Atom::Int(1));
        tape[7] = Atom::Int(1);

        assert_eq!(*tape.read(-2), Atom::Int(1));
        assert_eq!(tape[7], Atom::Int(1));
        assert_eq!(tape[2], Atom::Int(1));
        assert_eq!(tape[1], Atom::Int(0));
    }

    #[test]
    fn test_index_does_not_grow() {
        let tape = binary(&[1]);
        assert_eq!(tape[-100], Atom::Int(0));
        assert_eq!(tape[100], Atom::Int(0));
        assert_eq!(tape.len(), 1);
    }

    #[test]
    fn test_with_origin() {
        let mut tape = Tape::with_origin("abc".chars().map(Atom::from), 1, Atom::from('_'));

        assert_eq!(*tape.read(-1), Atom::from('a'));
        assert_eq!(*tape.read(0), Atom::from('b'));
        assert_eq!(*tape.read(1), Atom::from('c'));

        let padded = Tape::with_origin(Vec::new(), 2, Atom::from('_'));
        assert_eq!((padded.min(), padded.max()), (-2, 0));
    }

    #[test]
    fn test_display_window() {
        let mut tape = Tape::new("abc".chars().map(Atom::from), Atom::from('_'));
        let window = tape.display(1, 2);

        assert_eq!(
            window,
            Window {
                left: vec![Atom::from('_'), Atom::from('a')],
                center: Atom::from('b'),
                right: vec![Atom::from('c'), Atom::from('_')],
            }
        );
        assert_eq!(window.to_string(), "_ a [b] c _");

        let window = tape.display(0, 0);
        assert!(window.left.is_empty() && window.right.is_empty());
        assert_eq!(window.center, Atom::from('a'));
    }

    #[test]
    fn test_trimmed() {
        let mut tape = Tape::new("a".chars().map(Atom::from), Atom::from('_'));
        tape.write(3, Atom::from('b'));
        tape.read(-6);

        let trimmed: String = tape.trimmed().iter().map(ToString::to_string).collect();
        assert_eq!(trimmed, "a__b");

        let blank = Tape::new(Vec::new(), Atom::from('_'));
        assert!(blank.trimmed().is_empty());
    }

    proptest! {
        #[test]
        fn growth_matches_infinite_tape(
            seed in proptest::collection::vec(0i64..3, 0..8),
            writes in proptest::collection::vec((-64isize..64, 0i64..3), 0..32),
            probes in proptest::collection::vec(-128isize..128, 0..32),
        ) {
            let mut tape = binary(&seed);
            let mut model = std::collections::HashMap::new();
            for (i, &v) in seed.iter().enumerate() {
                model.insert(i as isize, v);
            }
            for &(index, value) in &writes {
                tape.write(index, Atom::Int(value));
                model.insert(index, value);
            }
            for &index in &probes {
                let expected = Atom::Int(model.get(&index).copied().unwrap_or(0));
                prop_assert_eq!(tape[index].clone(), expected.clone());
                prop_assert_eq!(tape.read(index).clone(), expected);
            }
        }
    }
}
