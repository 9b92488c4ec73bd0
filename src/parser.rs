//! This module provides the parser for Gödel numbers, utilizing the `pest` crate.
//! It checks a number against the grammar in `godel.pest` and extracts the unary
//! run-lengths of every encoded transition block.

use crate::types::DecodeError;
use pest::{iterators::Pair, Parser as PestParser};
use pest_derive::Parser as PestParser;

/// Derives a `PestParser` for the Gödel number grammar defined in `godel.pest`.
#[derive(PestParser)]
#[grammar = "godel.pest"]
pub struct GodelParser;

/// The five run-lengths of one encoded transition, each a 1-based index or direction code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub state: usize,
    pub read: usize,
    pub next_state: usize,
    pub write: usize,
    pub direction: usize,
}

/// Parses a Gödel number into its transition blocks, in encoding order.
///
/// # Returns
///
/// * `Ok(Vec<Block>)` if the input matches the grammar; `"111"` yields no blocks.
/// * `Err(DecodeError::Syntax)` with the offending position otherwise.
pub fn parse(input: &str) -> Result<Vec<Block>, DecodeError> {
    let pairs = GodelParser::parse(Rule::number, input).map_err(Box::new)?;

    Ok(pairs
        .flat_map(Pair::into_inner)
        .filter(|pair| pair.as_rule() == Rule::block)
        .map(parse_block)
        .collect())
}

/// Converts a `Pair<Rule::block>` into its run-lengths.
fn parse_block(pair: Pair<Rule>) -> Block {
    let runs: Vec<usize> = pair.into_inner().map(|run| run.as_str().len()).collect();

    let [state, read, next_state, write, direction] = runs[..] else {
        unreachable!("the grammar admits exactly five runs per block");
    };

    Block {
        state,
        read,
        next_state,
        write,
        direction,
    }
}
