use std::fmt;

use rand::{seq::SliceRandom, Rng};

use self::Corner::*;
use self::Edge::*;
use crate::constants::*;
use crate::coord::Coord;
use crate::error::{Error, InputFault};
use crate::facelet::FaceCube;
use crate::moves::{Move, B_MOVE, D_MOVE, F_MOVE, L_MOVE, R_MOVE, U_MOVE};

/// The names of the corner positions of the cube. Corner URF e.g. has an U(p), a R(ight) and a F(ront) facelet.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
#[repr(u8)]
pub enum Corner {
    URF,
    UFL,
    ULB,
    UBR,
    DFR,
    DLF,
    DBL,
    DRB,
}

pub const ALL_CORNERS: [Corner; 8] = [URF, UFL, ULB, UBR, DFR, DLF, DBL, DRB];

/// The names of the edge positions of the cube. Edge UR e.g. has an U(p) and R(ight) facelet.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
#[repr(u8)]
pub enum Edge {
    UR,
    UF,
    UL,
    UB,
    DR,
    DF,
    DL,
    DB,
    FR,
    FL,
    BL,
    BR,
}

pub const ALL_EDGES: [Edge; 12] = [UR, UF, UL, UB, DR, DF, DL, DB, FR, FL, BL, BR];

/// Represent a cube on the cubie level.
///
/// `cp[i]` is the corner cubie sitting at corner position `i` and `co[i]` its orientation,
/// likewise `ep` and `eo` for the edges. A move is the cube obtained by applying it to the
/// solved cube, and `a * b` is `a` followed by `b`.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct CubieCube {
    /// Corner permutation, relative to SOLVED_STATE.
    pub cp: [Corner; 8],
    /// Corner orientation, 3 possible values: 0 (correctly oriented), 1 (twisted clockwise), 2 (twisted counter-clockwise).
    pub co: [u8; 8],
    /// Edge permutation, relative to SOLVED_STATE.
    pub ep: [Edge; 12],
    /// Edge orientation, 2 possible values: 0 (correctly oriented), 1 (flipped).
    pub eo: [u8; 12],
}

/// Solved cube on the cubie level.
pub const SOLVED_CUBIE_CUBE: CubieCube = CubieCube {
    cp: ALL_CORNERS,
    co: [0; 8],
    ep: ALL_EDGES,
    eo: [0; 12],
};

impl Default for CubieCube {
    fn default() -> Self {
        SOLVED_CUBIE_CUBE
    }
}

/// The facelet string of the cube.
impl fmt::Display for CubieCube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", FaceCube::from(self))
    }
}

impl std::ops::Mul for CubieCube {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        let mut res = self;
        res.multiply(&rhs);
        res
    }
}

/// Cube reached from the solved cube by a move sequence.
impl From<&[Move]> for CubieCube {
    fn from(moves: &[Move]) -> Self {
        CubieCube::default().apply_moves(moves)
    }
}

impl From<&Vec<Move>> for CubieCube {
    fn from(moves: &Vec<Move>) -> Self {
        Self::from(moves.as_slice())
    }
}

/// The six basic quarter turn cubes, indexed by face U, R, F, D, L, B.
pub fn basic_move_cubes() -> [CubieCube; 6] {
    [U_MOVE, R_MOVE, F_MOVE, D_MOVE, L_MOVE, B_MOVE]
}

impl CubieCube {
    /// Multiply this cubie cube with another cubie cube b, restricted to the corners.
    pub fn corner_multiply(&mut self, b: CubieCube) {
        let mut cp = [URF; 8];
        let mut co = [0; 8];
        for i in 0..8 {
            let j = b.cp[i] as usize;
            cp[i] = self.cp[j];
            co[i] = (self.co[j] + b.co[i]) % 3;
        }
        self.cp = cp;
        self.co = co;
    }

    /// Multiply this cubie cube with another cubie cube b, restricted to the edges.
    pub fn edge_multiply(&mut self, b: CubieCube) {
        let mut ep = [UR; 12];
        let mut eo = [0; 12];
        for i in 0..12 {
            let j = b.ep[i] as usize;
            ep[i] = self.ep[j];
            eo[i] = (self.eo[j] + b.eo[i]) % 2;
        }
        self.ep = ep;
        self.eo = eo;
    }

    pub fn multiply(&mut self, b: &CubieCube) {
        self.corner_multiply(*b);
        self.edge_multiply(*b);
    }

    /// Apply a single move.
    pub fn apply_move(self, m: Move) -> Self {
        let mc = basic_move_cubes()[m.face() as usize];
        let mut res = self;
        for _ in 0..m.turn().quarter_turns() {
            res.multiply(&mc);
        }
        res
    }

    /// Apply a move sequence, first move first.
    pub fn apply_moves(self, moves: &[Move]) -> Self {
        moves.iter().fold(self, |cc, &m| cc.apply_move(m))
    }

    pub fn multiply_moves(&mut self, moves: &[Move]) {
        *self = self.apply_moves(moves);
    }

    /// The cube undoing this one: `self * self.inverse_cubie_cube()` is solved.
    pub fn inverse_cubie_cube(&self) -> Self {
        let mut inv = SOLVED_CUBIE_CUBE;
        for i in 0..8 {
            inv.cp[self.cp[i] as usize] = ALL_CORNERS[i];
        }
        for i in 0..8 {
            inv.co[i] = (3 - self.co[inv.cp[i] as usize]) % 3;
        }
        for i in 0..12 {
            inv.ep[self.ep[i] as usize] = ALL_EDGES[i];
        }
        for i in 0..12 {
            inv.eo[i] = (2 - self.eo[inv.ep[i] as usize]) % 2;
        }
        inv
    }

    /// Give the parity of the corner permutation.
    pub fn corner_parity(&self) -> u8 {
        parity(&self.cp.map(|c| c as u8))
    }

    /// Give the parity of the edge permutation. A solvable cube has the same corner and edge parity.
    pub fn edge_parity(&self) -> u8 {
        parity(&self.ep.map(|e| e as u8))
    }

    /// Check that the cubies form a cube reachable by face turns.
    pub fn verify(&self) -> Result<(), Error> {
        let mut edge_count = [0; 12];
        for e in self.ep {
            edge_count[e as usize] += 1;
            if edge_count[e as usize] > 1 {
                return Err(InputFault::DuplicateEdge(e as usize).into());
            }
        }
        if self.eo.iter().map(|&o| o as u32).sum::<u32>() % 2 != 0 {
            return Err(InputFault::Flip.into());
        }
        let mut corner_count = [0; 8];
        for c in self.cp {
            corner_count[c as usize] += 1;
            if corner_count[c as usize] > 1 {
                return Err(InputFault::DuplicateCorner(c as usize).into());
            }
        }
        if self.co.iter().map(|&o| o as u32).sum::<u32>() % 3 != 0 {
            return Err(InputFault::Twist.into());
        }
        if self.edge_parity() != self.corner_parity() {
            return Err(InputFault::Parity.into());
        }
        Ok(())
    }

    pub fn is_solvable(&self) -> bool {
        self.verify().is_ok()
    }

    /// Draw a uniformly random solvable cube.
    pub fn randomize(&mut self) {
        let mut rng = rand::thread_rng();
        self.cp.shuffle(&mut rng);
        self.ep.shuffle(&mut rng);
        if self.edge_parity() != self.corner_parity() {
            self.ep.swap(0, 1);
        }
        self.set_twist(rng.gen_range(0..N_TWIST) as u16);
        self.set_flip(rng.gen_range(0..N_FLIP) as u16);
    }

    pub fn coordinate(&self, coord: Coord) -> u16 {
        match coord {
            Coord::Twist => self.get_twist(),
            Coord::Flip => self.get_flip(),
            Coord::FrBr => self.get_frbr(),
            Coord::UrfDlf => self.get_urfdlf(),
            Coord::UrUl => self.get_urul(),
            Coord::UbDf => self.get_ubdf(),
            Coord::UrDf => self.get_urdf().unwrap_or(UNDEFINED),
            Coord::Parity => self.corner_parity() as u16,
        }
    }

    /// Set the cubies `coord` reads so that it takes `value`; other cubies are reset to a
    /// canonical arrangement.
    pub fn set_coordinate(&mut self, coord: Coord, value: u16) {
        match coord {
            Coord::Twist => self.set_twist(value),
            Coord::Flip => self.set_flip(value),
            Coord::FrBr => self.set_frbr(value),
            Coord::UrfDlf => self.set_urfdlf(value),
            Coord::UrUl => self.set_urul(value),
            Coord::UbDf => self.set_ubdf(value),
            Coord::UrDf => self.set_urdf(value),
            Coord::Parity => self.set_parity(value),
        }
    }

    /// The twist of the 8 corners. 0 <= twist < 2187.
    pub fn get_twist(&self) -> u16 {
        self.co[..7].iter().fold(0, |acc, &o| 3 * acc + o as u16)
    }

    pub fn set_twist(&mut self, twist: u16) {
        let mut twist = twist;
        let mut twist_parity = 0;
        for i in (0..7).rev() {
            self.co[i] = (twist % 3) as u8;
            twist_parity += self.co[i];
            twist /= 3;
        }
        self.co[7] = (3 - twist_parity % 3) % 3;
    }

    /// The flip of the 12 edges. 0 <= flip < 2048.
    pub fn get_flip(&self) -> u16 {
        self.eo[..11].iter().fold(0, |acc, &o| 2 * acc + o as u16)
    }

    pub fn set_flip(&mut self, flip: u16) {
        let mut flip = flip;
        let mut flip_parity = 0;
        for i in (0..11).rev() {
            self.eo[i] = (flip % 2) as u8;
            flip_parity += self.eo[i];
            flip /= 2;
        }
        self.eo[11] = (2 - flip_parity % 2) % 2;
    }

    /// Placement of the FR, FL, BL and BR edges. 0 <= frbr < 11880, frbr = 0 for the solved cube.
    ///
    /// `frbr / 24` is the phase 1 slice coordinate, `frbr < 24` in phase 2.
    pub fn get_frbr(&self) -> u16 {
        encode_placement(&self.ep.map(|e| e as u8), FR as u8..BR as u8 + 1, true)
    }

    pub fn set_frbr(&mut self, idx: u16) {
        let ep = decode_placement(idx, 12, FR as u8..BR as u8 + 1, true);
        self.ep = ep_from_indices(&ep);
    }

    /// Placement of the URF, UFL, ULB, UBR, DFR and DLF corners. 0 <= urfdlf < 20160.
    pub fn get_urfdlf(&self) -> u16 {
        encode_placement(&self.cp.map(|c| c as u8), URF as u8..DLF as u8 + 1, false)
    }

    pub fn set_urfdlf(&mut self, idx: u16) {
        let cp = decode_placement(idx, 8, URF as u8..DLF as u8 + 1, false);
        self.cp = cp_from_indices(&cp);
    }

    /// Placement of the UR, UF and UL edges. 0 <= urul < 1320, urul < 336 in phase 2.
    pub fn get_urul(&self) -> u16 {
        encode_placement(&self.ep.map(|e| e as u8), UR as u8..UL as u8 + 1, false)
    }

    pub fn set_urul(&mut self, idx: u16) {
        let ep = decode_placement(idx, 12, UR as u8..UL as u8 + 1, false);
        self.ep = ep_from_indices(&ep);
    }

    /// Placement of the UB, DR and DF edges. 0 <= ubdf < 1320, ubdf < 336 in phase 2, ubdf = 114 for the solved cube.
    pub fn get_ubdf(&self) -> u16 {
        encode_placement(&self.ep.map(|e| e as u8), UB as u8..DF as u8 + 1, false)
    }

    pub fn set_ubdf(&mut self, idx: u16) {
        let ep = decode_placement(idx, 12, UB as u8..DF as u8 + 1, false);
        self.ep = ep_from_indices(&ep);
    }

    /// Placement of the UR, UF, UL, UB, DR and DF edges, 0 <= urdf < 20160.
    ///
    /// `None` unless the FR, FL, BL and BR edges are in the middle slice, as in phase 2.
    pub fn get_urdf(&self) -> Option<u16> {
        if self.ep[FR as usize..].iter().any(|&e| e < FR) {
            return None;
        }
        Some(encode_placement(&self.ep.map(|e| e as u8), UR as u8..DF as u8 + 1, false))
    }

    pub fn set_urdf(&mut self, idx: u16) {
        let ep = decode_placement(idx, 12, UR as u8..DF as u8 + 1, false);
        self.ep = ep_from_indices(&ep);
    }

    /// Any corner permutation with the given parity.
    pub fn set_parity(&mut self, parity: u16) {
        self.cp = ALL_CORNERS;
        if parity % 2 == 1 {
            self.cp.swap(0, 1);
        }
    }
}

/// Every cube at most `depth` moves of `generators` away from solved, with its exact distance.
#[cfg(test)]
pub(crate) fn cubes_within(generators: &[Move], depth: usize) -> Vec<(CubieCube, usize)> {
    let solved = CubieCube::default();
    let mut seen = std::collections::HashSet::from([solved.to_string()]);
    let mut layer = vec![solved];
    let mut res = vec![(solved, 0)];
    for d in 1..=depth {
        let mut next = Vec::new();
        for cc in &layer {
            for &m in generators {
                let c = cc.apply_move(m);
                if seen.insert(c.to_string()) {
                    next.push(c);
                    res.push((c, d));
                }
            }
        }
        layer = next;
    }
    res
}

fn cp_from_indices(idx: &[u8]) -> [Corner; 8] {
    let mut cp = ALL_CORNERS;
    for (c, &i) in cp.iter_mut().zip(idx) {
        *c = ALL_CORNERS[i as usize];
    }
    cp
}

fn ep_from_indices(idx: &[u8]) -> [Edge; 12] {
    let mut ep = ALL_EDGES;
    for (e, &i) in ep.iter_mut().zip(idx) {
        *e = ALL_EDGES[i as usize];
    }
    ep
}

/// Number of inversions mod 2.
fn parity(perm: &[u8]) -> u8 {
    let mut s = 0;
    for i in (1..perm.len()).rev() {
        for j in (0..i).rev() {
            if perm[j] > perm[i] {
                s += 1;
            }
        }
    }
    (s % 2) as u8
}

/// Rank of the order of `pieces`, a permutation of `first..first + pieces.len()`.
fn perm_index(pieces: &[u8], first: u8) -> usize {
    let mut p = pieces.to_vec();
    let mut b = 0;
    for j in (1..p.len()).rev() {
        let mut k = 0;
        while p[j] != j as u8 + first {
            p[..=j].rotate_left(1);
            k += 1;
        }
        b = (j + 1) * b + k;
    }
    b
}

/// Inverse of [perm_index].
fn perm_from_index(pieces: std::ops::Range<u8>, mut b: usize) -> Vec<u8> {
    let mut p: Vec<u8> = pieces.collect();
    for j in 1..p.len() {
        let k = b % (j + 1);
        b /= j + 1;
        p[..=j].rotate_right(k);
    }
    p
}

/// Rank where the cubies `pieces` sit in `perm` and in which order.
///
/// The positions are ranked with the combinatorial number system, scanning from the
/// first position, or from the last one when `from_back` is set. The result is
/// `position_rank * k! + order_rank` for `k` pieces.
pub(crate) fn encode_placement(perm: &[u8], pieces: std::ops::Range<u8>, from_back: bool) -> u16 {
    let k = pieces.len();
    let n = perm.len();
    let mut found = vec![0; k];
    let mut a = 0;
    let mut x = 0;
    if from_back {
        for j in (0..n).rev() {
            if pieces.contains(&perm[j]) {
                a += cnk(n - 1 - j, x + 1);
                found[k - 1 - x] = perm[j];
                x += 1;
            }
        }
    } else {
        for j in 0..n {
            if pieces.contains(&perm[j]) {
                a += cnk(j, x + 1);
                found[x] = perm[j];
                x += 1;
            }
        }
    }
    (a * factorial(k) + perm_index(&found, pieces.start)) as u16
}

/// Positions of `pieces` encoded in `value`, `None` for the other positions of an `n` slot permutation.
pub(crate) fn placement_slots(
    value: u16,
    n: usize,
    pieces: std::ops::Range<u8>,
    from_back: bool,
) -> Vec<Option<u8>> {
    let k = pieces.len();
    let mut a = value as usize / factorial(k);
    let chosen = perm_from_index(pieces, value as usize % factorial(k));
    let mut slots = vec![None; n];
    let mut x = k;
    if from_back {
        for j in 0..n {
            if x > 0 && a >= cnk(n - 1 - j, x) {
                slots[j] = Some(chosen[k - x]);
                a -= cnk(n - 1 - j, x);
                x -= 1;
            }
        }
    } else {
        for j in (0..n).rev() {
            if x > 0 && a >= cnk(j, x) {
                slots[j] = Some(chosen[x - 1]);
                a -= cnk(j, x);
                x -= 1;
            }
        }
    }
    slots
}

/// Complete a partial permutation with the missing cubies in ascending order.
pub(crate) fn fill_slots(slots: &[Option<u8>]) -> Vec<u8> {
    let mut rest = (0..slots.len() as u8).filter(|i| !slots.contains(&Some(*i)));
    slots
        .iter()
        .map(|s| match s {
            Some(i) => *i,
            None => rest.next().unwrap_or_default(),
        })
        .collect()
}

/// Inverse of [encode_placement].
pub(crate) fn decode_placement(
    value: u16,
    n: usize,
    pieces: std::ops::Range<u8>,
    from_back: bool,
) -> Vec<u8> {
    fill_slots(&placement_slots(value, n, pieces, from_back))
}
