//! This module provides the well-formedness checks a machine description must pass
//! before a `Machine` can be built from it. Every check collects all of its violations
//! and reports them in a single error instead of stopping at the first one.

use crate::types::{Description, Mode, Ruleset, Signature, State, Symbol};
use std::collections::HashSet;
use std::fmt::Display;
use std::hash::Hash;
use thiserror::Error;

/// Represents the violations found while validating a machine description.
///
/// Each variant holds the complete, sorted set of offenders for one check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptionError {
    /// `Q` lists a state more than once.
    #[error("Duplicate states in Q: {}", list(.0))]
    DuplicateStates(Vec<State>),
    /// `Sigma` or `Gamma` lists a symbol more than once.
    #[error("Duplicate symbols in the alphabets: {}", list(.0))]
    DuplicateSymbols(Vec<Symbol>),
    /// Symbols used outside the tape alphabet.
    #[error("{}", unknown_symbols(.input, .rules, .blank))]
    UnknownSymbols {
        /// Symbols of the input alphabet missing from the tape alphabet.
        input: Vec<Symbol>,
        /// Symbols referenced by rules but missing from the tape alphabet.
        rules: Vec<Symbol>,
        /// The blank symbol, when it is missing from the tape alphabet.
        blank: Option<Symbol>,
    },
    /// States used outside `Q`.
    #[error("{}", unknown_states(.rules, .start, .finish))]
    UnknownStates {
        /// States referenced by rules (as keys or targets) but missing from `Q`.
        rules: Vec<State>,
        /// The start state, when it is missing from `Q`.
        start: Option<State>,
        /// The finish state, when it is missing from `Q`.
        finish: Option<State>,
    },
    /// The rule set is not total over the non-finish states.
    #[error("{}", incomplete(.states, .transitions))]
    Incomplete {
        /// Non-finish states without any rule.
        states: Vec<State>,
        /// `(state, symbol)` pairs missing a rule for a state that has some rules.
        transitions: Vec<(State, Symbol)>,
    },
    /// One `(state, symbol)` key was given two different transitions.
    #[error("Conflicting rules for: {}", pairs(.0))]
    ConflictingRules(Vec<(State, Symbol)>),
}

fn list<T: Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn pairs(items: &[(State, Symbol)]) -> String {
    items
        .iter()
        .map(|(state, symbol)| format!("({state}, {symbol})"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn unknown_symbols(input: &[Symbol], rules: &[Symbol], blank: &Option<Symbol>) -> String {
    let mut parts = Vec::new();
    if !input.is_empty() {
        parts.push(format!(
            "symbols in the input alphabet but not in the tape alphabet: {}",
            list(input)
        ));
    }
    if !rules.is_empty() {
        parts.push(format!(
            "symbols referenced by rules but not in the tape alphabet: {}",
            list(rules)
        ));
    }
    if let Some(blank) = blank {
        parts.push(format!("blank symbol {blank} is not in the tape alphabet"));
    }
    parts.join("; ")
}

fn unknown_states(rules: &[State], start: &Option<State>, finish: &Option<State>) -> String {
    let mut parts = Vec::new();
    if !rules.is_empty() {
        parts.push(format!(
            "states referenced by rules but not in Q: {}",
            list(rules)
        ));
    }
    if let Some(start) = start {
        parts.push(format!("start state {start} is not in Q"));
    }
    if let Some(finish) = finish {
        parts.push(format!("finish state {finish} is not in Q"));
    }
    parts.join("; ")
}

fn incomplete(states: &[State], transitions: &[(State, Symbol)]) -> String {
    let mut parts = Vec::new();
    if !states.is_empty() {
        parts.push(format!("states without rules: {}", list(states)));
    }
    if !transitions.is_empty() {
        parts.push(format!("missing transitions: {}", pairs(transitions)));
    }
    parts.join("; ")
}

/// Validates a description, running the strict totality check only in `Mode::Strict`.
///
/// Checks run in order (distinctness, symbols, states, totality) and the first failing
/// check's error is returned.
pub fn analyze(description: &Description) -> Result<(), DescriptionError> {
    let Description {
        signature,
        mode,
        rules,
    } = description;

    let checks: [fn(&Signature, &Ruleset) -> Result<(), DescriptionError>; 3] = [
        |s, _| check_distinct(&s.states, &s.input_alphabet, &s.tape_alphabet),
        |s, r| check_symbols(&s.input_alphabet, &s.tape_alphabet, &s.blank, r),
        |s, r| check_states(&s.states, &s.start, &s.finish, r),
    ];

    checks.iter().try_for_each(|check| check(signature, rules))?;

    if *mode == Mode::Strict {
        check_totality(
            &signature.states,
            &signature.tape_alphabet,
            &signature.finish,
            rules,
        )?;
    }

    Ok(())
}

/// Returns the sorted atoms occurring more than once in `items`.
fn duplicates<T: Clone + Eq + Hash + Ord>(items: &[T]) -> Vec<T> {
    let mut seen = HashSet::new();
    let mut repeated: Vec<T> = items
        .iter()
        .filter(|item| !seen.insert(*item))
        .cloned()
        .collect();
    repeated.sort();
    repeated.dedup();
    repeated
}

/// Checks that `Q`, `Sigma` and `Gamma` contain no repeated atoms.
pub fn check_distinct(
    states: &[State],
    input_alphabet: &[Symbol],
    tape_alphabet: &[Symbol],
) -> Result<(), DescriptionError> {
    let repeated = duplicates(states);
    if !repeated.is_empty() {
        return Err(DescriptionError::DuplicateStates(repeated));
    }

    let mut repeated = duplicates(input_alphabet);
    repeated.extend(duplicates(tape_alphabet));
    repeated.sort();
    repeated.dedup();
    if !repeated.is_empty() {
        return Err(DescriptionError::DuplicateSymbols(repeated));
    }

    Ok(())
}

/// Checks that `Sigma`, the blank and every symbol read or written by a rule belong to `Gamma`.
pub fn check_symbols(
    input_alphabet: &[Symbol],
    tape_alphabet: &[Symbol],
    blank: &Symbol,
    rules: &Ruleset,
) -> Result<(), DescriptionError> {
    let gamma: HashSet<&Symbol> = tape_alphabet.iter().collect();

    let mut input: Vec<Symbol> = input_alphabet
        .iter()
        .filter(|symbol| !gamma.contains(symbol))
        .cloned()
        .collect();
    input.sort();
    input.dedup();

    let mut referenced: Vec<Symbol> = rules
        .values()
        .flat_map(|row| {
            row.iter()
                .flat_map(|(read, transition)| [read, &transition.write])
        })
        .filter(|symbol| !gamma.contains(symbol))
        .cloned()
        .collect();
    referenced.sort();
    referenced.dedup();

    let blank = (!gamma.contains(blank)).then(|| blank.clone());

    if input.is_empty() && referenced.is_empty() && blank.is_none() {
        return Ok(());
    }

    Err(DescriptionError::UnknownSymbols {
        input,
        rules: referenced,
        blank,
    })
}

/// Checks that the start and finish states and every state used by a rule belong to `Q`.
pub fn check_states(
    states: &[State],
    start: &State,
    finish: &State,
    rules: &Ruleset,
) -> Result<(), DescriptionError> {
    let q: HashSet<&State> = states.iter().collect();

    let mut referenced: Vec<State> = rules
        .iter()
        .flat_map(|(state, row)| {
            std::iter::once(state).chain(row.values().map(|transition| &transition.next_state))
        })
        .filter(|state| !q.contains(state))
        .cloned()
        .collect();
    referenced.sort();
    referenced.dedup();

    let start = (!q.contains(start)).then(|| start.clone());
    let finish = (!q.contains(finish)).then(|| finish.clone());

    if referenced.is_empty() && start.is_none() && finish.is_none() {
        return Ok(());
    }

    Err(DescriptionError::UnknownStates {
        rules: referenced,
        start,
        finish,
    })
}

/// Checks that every non-finish state has a rule for every symbol of `Gamma`.
///
/// States with no rules at all are reported once, as states; states with some rules
/// have each missing `(state, symbol)` pair reported.
pub fn check_totality(
    states: &[State],
    tape_alphabet: &[Symbol],
    finish: &State,
    rules: &Ruleset,
) -> Result<(), DescriptionError> {
    let mut missing_states = Vec::new();
    let mut missing_transitions = Vec::new();

    for state in states.iter().filter(|state| *state != finish) {
        match rules.get(state) {
            None => missing_states.push(state.clone()),
            Some(row) => missing_transitions.extend(
                tape_alphabet
                    .iter()
                    .filter(|symbol| !row.contains_key(*symbol))
                    .map(|symbol| (state.clone(), symbol.clone())),
            ),
        }
    }

    if missing_states.is_empty() && missing_transitions.is_empty() {
        return Ok(());
    }

    missing_states.sort();
    missing_states.dedup();
    missing_transitions.sort();
    missing_transitions.dedup();

    Err(DescriptionError::Incomplete {
        states: missing_states,
        transitions: missing_transitions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ruleset, Atom, Direction, Rule};

    fn atoms<T: Into<Atom> + Copy>(items: &[T]) -> Vec<Atom> {
        items.iter().map(|&item| item.into()).collect()
    }

    fn create_test_signature() -> Signature {
        Signature {
            states: atoms(&["q0", "q1"]),
            input_alphabet: atoms(&['1']),
            tape_alphabet: atoms(&['0', '1']),
            blank: '0'.into(),
            start: "q0".into(),
            finish: "q1".into(),
        }
    }

    fn create_test_rules() -> Ruleset {
        ruleset([
            Rule::new("q0", '0', "q1", '1', Direction::Stay),
            Rule::new("q0", '1', "q0", '1', Direction::Right),
        ])
        .unwrap()
    }

    #[test]
    fn test_valid_description_passes() {
        let description = Description::new(create_test_signature(), create_test_rules()).strict();
        assert_eq!(analyze(&description), Ok(()));
    }

    #[test]
    fn test_input_symbol_missing_from_tape_alphabet() {
        let result = check_symbols(
            &atoms(&['a', 'b']),
            &atoms(&['a']),
            &'a'.into(),
            &Ruleset::new(),
        );

        assert_eq!(
            result,
            Err(DescriptionError::UnknownSymbols {
                input: atoms(&['b']),
                rules: vec![],
                blank: None,
            })
        );
        assert!(result.unwrap_err().to_string().contains('b'));
    }

    #[test]
    fn test_symbol_violations_are_collected() {
        let rules = ruleset([
            Rule::new("q0", 'x', "q0", 'y', Direction::Right),
            Rule::new("q0", '0', "q0", 'z', Direction::Left),
        ])
        .unwrap();

        let result = check_symbols(&atoms(&['1', 'w']), &atoms(&['0', '1']), &'_'.into(), &rules);

        assert_eq!(
            result,
            Err(DescriptionError::UnknownSymbols {
                input: atoms(&['w']),
                rules: atoms(&['x', 'y', 'z']),
                blank: Some('_'.into()),
            })
        );
    }

    #[test]
    fn test_start_state_missing_from_q() {
        let result = check_states(
            &atoms(&["q0", "q1"]),
            &"start".into(),
            &"q1".into(),
            &Ruleset::new(),
        );

        let error = result.unwrap_err();
        assert_eq!(
            error,
            DescriptionError::UnknownStates {
                rules: vec![],
                start: Some("start".into()),
                finish: None,
            }
        );
        assert!(error.to_string().contains("start state start is not in Q"));
    }

    #[test]
    fn test_state_violations_are_collected() {
        let rules = ruleset([
            Rule::new("q0", '0', "q7", '0', Direction::Right),
            Rule::new("q9", '0', "q0", '0', Direction::Right),
        ])
        .unwrap();

        let result = check_states(&atoms(&["q0", "q1"]), &"q0".into(), &"qf".into(), &rules);

        assert_eq!(
            result,
            Err(DescriptionError::UnknownStates {
                rules: atoms(&["q7", "q9"]),
                start: None,
                finish: Some("qf".into()),
            })
        );
    }

    #[test]
    fn test_totality_names_missing_pair() {
        let rules = ruleset([Rule::new("q0", '0', "q1", '1', Direction::Stay)]).unwrap();

        let result = check_totality(&atoms(&["q0", "q1"]), &atoms(&['0', '1']), &"q1".into(), &rules);

        let error = result.unwrap_err();
        assert_eq!(
            error,
            DescriptionError::Incomplete {
                states: vec![],
                transitions: vec![("q0".into(), '1'.into())],
            }
        );
        assert!(error.to_string().contains("(q0, 1)"));
    }

    #[test]
    fn test_totality_reports_states_without_rules() {
        let rules = ruleset([
            Rule::new("q0", '0', "q1", '0', Direction::Right),
            Rule::new("q0", '1', "q1", '1', Direction::Right),
        ])
        .unwrap();

        let result = check_totality(
            &atoms(&["q0", "q1", "q2"]),
            &atoms(&['0', '1']),
            &"q2".into(),
            &rules,
        );

        assert_eq!(
            result,
            Err(DescriptionError::Incomplete {
                states: atoms(&["q1"]),
                transitions: vec![],
            })
        );
    }

    #[test]
    fn test_totality_ignores_finish_state() {
        let rules = create_test_rules();
        assert_eq!(
            check_totality(&atoms(&["q0", "q1"]), &atoms(&['0', '1']), &"q1".into(), &rules),
            Ok(())
        );
    }

    #[test]
    fn test_normal_mode_skips_totality() {
        let rules = ruleset([Rule::new("q0", '1', "q0", '1', Direction::Right)]).unwrap();
        let description = Description::new(create_test_signature(), rules);

        assert_eq!(analyze(&description), Ok(()));
        assert!(matches!(
            analyze(&description.strict()),
            Err(DescriptionError::Incomplete { .. })
        ));
    }

    #[test]
    fn test_duplicates_are_rejected() {
        assert_eq!(
            check_distinct(&atoms(&["q0", "q1", "q0"]), &[], &[]),
            Err(DescriptionError::DuplicateStates(atoms(&["q0"])))
        );
        assert_eq!(
            check_distinct(&atoms(&["q0"]), &atoms(&['a', 'a']), &atoms(&['a', 'b', 'b'])),
            Err(DescriptionError::DuplicateSymbols(atoms(&['a', 'b'])))
        );
    }

    #[test]
    fn test_checks_run_in_order() {
        let mut signature = create_test_signature();
        signature.input_alphabet = atoms(&['9']);
        signature.start = "nowhere".into();

        let description = Description::new(signature, create_test_rules());

        // The symbol check runs before the state check.
        assert!(matches!(
            analyze(&description),
            Err(DescriptionError::UnknownSymbols { .. })
        ));
    }
}
