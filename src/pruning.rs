use std::collections::VecDeque;
use std::path::Path;
use std::thread::{self, ScopedJoinHandle};

use log::debug;

use crate::constants::*;
use crate::coord::{Coord, CoordCube};
use crate::moves::{Move, MoveTables};
use crate::{error::Error, load_or_create};

/// Marks entries the breadth first search has not reached yet.
pub const UNVISITED: u8 = 15;

/// Depths packed two per byte, the entry at an even index in the low nibble.
pub struct PruneTable {
    pub data: Vec<u8>,
}

impl PruneTable {
    /// A table of `n` unvisited entries.
    pub fn new(n: usize) -> Self {
        Self {
            data: vec![0xff; (n + 1) / 2],
        }
    }

    pub fn get(&self, ix: usize) -> u8 {
        let y = self.data[ix / 2];
        if ix % 2 == 0 {
            y & 0x0f
        } else {
            y >> 4
        }
    }

    pub fn set(&mut self, ix: usize, value: u8) {
        let y = &mut self.data[ix / 2];
        if ix % 2 == 0 {
            *y = (*y & 0xf0) | (value & 0x0f);
        } else {
            *y = (*y & 0x0f) | (value << 4);
        }
    }
}

/// Index of the phase 1 tables for a twist or flip value `c`.
pub fn phase1_index(c: u16, frbr: u16) -> usize {
    N_SLICE1 * c as usize + frbr as usize / N_SLICE2
}

/// Index of the phase 2 tables for an urfdlf or urdf value `c`.
pub fn phase2_index(c: u16, frbr: u16, parity: u16) -> usize {
    (N_SLICE2 * c as usize + frbr as usize) * N_PARITY + parity as usize
}

/// The pruning tables cut the search tree during the search.
///
/// Each entry is the exact number of moves needed to solve the two coordinates it is indexed by,
/// which is a lower bound for the whole cube.
pub struct PruningTables {
    pub twist_slice: PruneTable,
    pub flip_slice: PruneTable,
    pub urfdlf_parity: PruneTable,
    pub urdf_parity: PruneTable,
}

impl PruningTables {
    /// Create/load the four tables, each on its own thread.
    pub fn new(mv: &MoveTables, dir: Option<&Path>) -> Result<Self, Error> {
        thread::scope(|s| {
            let twist = s.spawn(|| {
                load_prune_table(dir, "prun_twist_slice", N_TWIST * N_SLICE1, || {
                    phase1_table(mv, Coord::Twist)
                })
            });
            let flip = s.spawn(|| {
                load_prune_table(dir, "prun_flip_slice", N_FLIP * N_SLICE1, || {
                    phase1_table(mv, Coord::Flip)
                })
            });
            let urfdlf = s.spawn(|| {
                load_prune_table(dir, "prun_urfdlf_parity", N_URFDLF * N_SLICE2 * N_PARITY, || {
                    phase2_table(mv, Coord::UrfDlf)
                })
            });
            let urdf = s.spawn(|| {
                load_prune_table(dir, "prun_urdf_parity", N_URDF * N_SLICE2 * N_PARITY, || {
                    phase2_table(mv, Coord::UrDf)
                })
            });
            Ok(Self {
                twist_slice: join_table(twist)?,
                flip_slice: join_table(flip)?,
                urfdlf_parity: join_table(urfdlf)?,
                urdf_parity: join_table(urdf)?,
            })
        })
    }

    /// Lower bound for the moves to reach the phase 2 subgroup.
    pub fn phase1_bound(&self, cc: &CoordCube) -> u8 {
        self.twist_slice
            .get(phase1_index(cc.twist, cc.frbr))
            .max(self.flip_slice.get(phase1_index(cc.flip, cc.frbr)))
    }

    /// Lower bound for the phase 2 moves to solve a phase 2 cube, from corners and slice only.
    pub fn corner_bound(&self, cc: &CoordCube) -> u8 {
        self.urfdlf_parity.get(phase2_index(cc.urfdlf, cc.frbr, cc.parity))
    }

    /// Lower bound for the phase 2 moves to solve a phase 2 cube.
    pub fn phase2_bound(&self, cc: &CoordCube) -> u8 {
        self.corner_bound(cc)
            .max(self.urdf_parity.get(phase2_index(cc.urdf, cc.frbr, cc.parity)))
    }
}

fn join_table(
    handle: ScopedJoinHandle<'_, Result<PruneTable, Error>>,
) -> Result<PruneTable, Error> {
    handle
        .join()
        .map_err(|_| Error::InternalConsistency("pruning table generation panicked".to_string()))?
}

fn load_prune_table<F>(
    dir: Option<&Path>,
    name: &str,
    n: usize,
    create: F,
) -> Result<PruneTable, Error>
where
    F: FnOnce() -> Result<PruneTable, Error>,
{
    let data = load_or_create(dir, name, (n + 1) / 2, || create().map(|t| t.data))?;
    Ok(PruneTable { data })
}

/// Phase 1 table over the twist or flip coordinate and the slice part of frbr.
fn phase1_table(mv: &MoveTables, coord: Coord) -> Result<PruneTable, Error> {
    let table = mv.table(coord);
    let frbr = &mv.frbr;
    create_prune_table(coord.size() * N_SLICE1, &ALL_MOVES, |i, m| {
        let c = i / N_SLICE1;
        let slice = i % N_SLICE1;
        let c = table[N_MOVE * c + m as usize];
        let frbr = frbr[N_MOVE * (slice * N_SLICE2) + m as usize];
        phase1_index(c, frbr)
    })
}

/// Phase 2 table over the urfdlf or urdf coordinate, the slice order and the corner parity.
fn phase2_table(mv: &MoveTables, coord: Coord) -> Result<PruneTable, Error> {
    let table = mv.table(coord);
    let frbr = &mv.frbr;
    let parity = &mv.parity;
    create_prune_table(coord.size() * N_SLICE2 * N_PARITY, &PHASE2_MOVES, |i, m| {
        let p = i % N_PARITY;
        let c = i / N_PARITY / N_SLICE2;
        let f = i / N_PARITY % N_SLICE2;
        phase2_index(
            table[N_MOVE * c + m as usize],
            frbr[N_MOVE * f + m as usize],
            parity[N_MOVE * p + m as usize],
        )
    })
}

/// Breadth first search from the solved index 0.
pub fn create_prune_table<F>(n: usize, moves: &[Move], successor: F) -> Result<PruneTable, Error>
where
    F: Fn(usize, Move) -> usize,
{
    let mut table = PruneTable::new(n);
    table.set(0, 0);
    let mut queue = VecDeque::from([0]);
    let mut done = 1;
    let mut depth = 0;
    while let Some(i) = queue.pop_front() {
        let d = table.get(i);
        if d > depth {
            debug!("Depth: {} done: {}/{}", d, done, n);
            depth = d;
        }
        for &m in moves {
            let j = successor(i, m);
            if j >= n {
                return Err(Error::InternalConsistency(format!(
                    "index {} outside a pruning table of {} entries",
                    j, n
                )));
            }
            if table.get(j) == UNVISITED {
                if d + 1 >= UNVISITED {
                    return Err(Error::InternalConsistency(format!(
                        "pruning depth {} does not fit a nibble",
                        d + 1
                    )));
                }
                table.set(j, d + 1);
                queue.push_back(j);
                done += 1;
            }
        }
    }
    debug!("Depth: {} done: {}/{}", depth, done, n);
    Ok(table)
}
