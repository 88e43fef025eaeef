use std::str::FromStr;

use rand::Rng;

use crate::constants::{ALL_MOVES, N_MOVE};
use crate::cubie::CubieCube;
use crate::moves::invert;
use crate::solver::{solve_with_tables, SolverTables};
use crate::{error::Error, Move};

/// Parse a maneuver in face turn notation, e.g. "R U R' U2".
pub fn scramble_from_str(s: &str) -> Result<Vec<Move>, Error> {
    s.split_whitespace().map(Move::from_str).collect()
}

pub fn scramble_to_str(s: &[Move]) -> String {
    s.iter().map(Move::to_string).collect::<Vec<_>>().join(" ")
}

/// Random maneuver of `length` moves without two successive turns of the same face, and with
/// turns of opposite faces in a fixed order.
pub fn gen_scramble(length: usize) -> Vec<Move> {
    let mut rng = rand::thread_rng();
    let mut scramble: Vec<Move> = Vec::with_capacity(length);
    while scramble.len() < length {
        let m = ALL_MOVES[rng.gen_range(0..N_MOVE)];
        match scramble.last() {
            Some(&prev) if m.is_redundant_after(prev) => continue,
            _ => scramble.push(m),
        }
    }
    scramble
}

/// Scramble leading to a uniformly random cube: the inverse of a solution of a random cube.
pub fn gen_random_state_scramble(
    tables: &SolverTables,
    max_length: usize,
    timeout: f32,
) -> Result<Vec<Move>, Error> {
    let mut cc = CubieCube::default();
    cc.randomize();
    let result = solve_with_tables(tables, &cc, max_length, timeout)?;
    Ok(invert(&result.solution))
}
