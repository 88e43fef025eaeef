use std::{fmt, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

use self::Move::*;
use crate::constants::*;
use crate::coord::Coord;
use crate::cubie::{self, Corner::*, CubieCube, Edge::*};
use crate::facelet::{Color, ALL_COLORS};
use crate::{error::Error, load_or_create};

/// Layer moves, Up, Right, Front, Down, Left, Back.
///
/// $ clockwise, $2 double, $3 counter-clockwise.
#[rustfmt::skip]
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum Move {
    U, U2, U3,
    R, R2, R3,
    F, F2, F3,
    D, D2, D3,
    L, L2, L3,
    B, B2, B3,
}

/// Amount a face is turned by, looking at the face.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum Turn {
    Clockwise,
    Half,
    CounterClockwise,
}

impl Turn {
    /// Number of clockwise quarter turns, 1 to 3.
    pub fn quarter_turns(self) -> u8 {
        self as u8 + 1
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            U3 => write!(f, "U'"),
            D3 => write!(f, "D'"),
            R3 => write!(f, "R'"),
            L3 => write!(f, "L'"),
            F3 => write!(f, "F'"),
            B3 => write!(f, "B'"),
            _ => write!(f, "{:?}", self),
        }
    }
}

impl FromStr for Move {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "R" => Ok(R),
            "R'" => Ok(R3),
            "R2" => Ok(R2),
            "L" => Ok(L),
            "L'" => Ok(L3),
            "L2" => Ok(L2),
            "U" => Ok(U),
            "U'" => Ok(U3),
            "U2" => Ok(U2),
            "D" => Ok(D),
            "D'" => Ok(D3),
            "D2" => Ok(D2),
            "F" => Ok(F),
            "F'" => Ok(F3),
            "F2" => Ok(F2),
            "B" => Ok(B),
            "B'" => Ok(B3),
            "B2" => Ok(B2),
            _ => Err(Error::InvalidScramble(s.to_string())),
        }
    }
}

#[rustfmt::skip]
impl Move {
    /// Move index, `3 * face + quarter_turns - 1`.
    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: u8) -> Option<Self> {
        ALL_MOVES.get(id as usize).copied()
    }

    pub fn from_face_turn(face: Color, turn: Turn) -> Self {
        ALL_MOVES[3 * face as usize + turn as usize]
    }

    pub fn face(self) -> Color {
        ALL_COLORS[self as usize / 3]
    }

    pub fn turn(self) -> Turn {
        match self as u8 % 3 {
            0 => Turn::Clockwise,
            1 => Turn::Half,
            _ => Turn::CounterClockwise,
        }
    }

    /// True for the moves which keep a cube inside the phase 2 subgroup.
    pub fn is_phase2(self) -> bool {
        PHASE2_MOVES.contains(&self)
    }

    /// True if `self` is never needed right after `prev`: both turn the same face, or they turn
    /// opposite faces and the pair is not in U R F before D L B order.
    pub fn is_redundant_after(self, prev: Move) -> bool {
        let diff = prev as i8 / 3 - self as i8 / 3;
        diff == 0 || diff == 3
    }

    pub fn is_same_layer(&self, other: Move) -> bool {
        self.face() == other.face()
    }

    pub fn get_inverse(self) -> Self {
        match self {
            U => U3,
            U3 => U,
            D => D3,
            D3 => D,
            R => R3,
            R3 => R,
            L => L3,
            L3 => L,
            F => F3,
            F3 => F,
            B => B3,
            B3 => B,
            _ => self,
        }
    }
}

/// Merge neighbouring moves of the same face, dropping those that cancel out.
pub fn simplify(moves: &[Move]) -> Vec<Move> {
    let mut res: Vec<Move> = Vec::with_capacity(moves.len());
    for &m in moves {
        match res.last() {
            Some(&prev) if prev.is_same_layer(m) => {
                res.pop();
                let quarter_turns = (prev.turn().quarter_turns() + m.turn().quarter_turns()) % 4;
                if quarter_turns != 0 {
                    res.push(ALL_MOVES[3 * m.face() as usize + quarter_turns as usize - 1]);
                }
            }
            _ => res.push(m),
        }
    }
    res
}

/// The inverse of a move sequence.
pub fn invert(moves: &[Move]) -> Vec<Move> {
    moves.iter().rev().map(|m| m.get_inverse()).collect()
}

/// The basic six cube moves described by permutations and changes in orientation.
///
/// U_MOVE
pub const U_MOVE: CubieCube = CubieCube {
    cp: [UBR, URF, UFL, ULB, DFR, DLF, DBL, DRB],
    co: [0, 0, 0, 0, 0, 0, 0, 0],
    ep: [UB, UR, UF, UL, DR, DF, DL, DB, FR, FL, BL, BR],
    eo: [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
};

/// R_MOVE
pub const R_MOVE: CubieCube = CubieCube {
    cp: [DFR, UFL, ULB, URF, DRB, DLF, DBL, UBR], //permutation of the corners
    co: [2, 0, 0, 1, 1, 0, 0, 2],                 //changes of the orientations of the corners
    ep: [FR, UF, UL, UB, BR, DF, DL, DB, DR, FL, BL, UR], //permutation of the edges
    eo: [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],     //changes of the orientations of the edges
};

/// F_MOVE
pub const F_MOVE: CubieCube = CubieCube {
    cp: [UFL, DLF, ULB, UBR, URF, DFR, DBL, DRB],
    co: [1, 2, 0, 0, 2, 1, 0, 0],
    ep: [UR, FL, UL, UB, DR, FR, DL, DB, UF, DF, BL, BR],
    eo: [0, 1, 0, 0, 0, 1, 0, 0, 1, 1, 0, 0],
};

/// D_MOVE
pub const D_MOVE: CubieCube = CubieCube {
    cp: [URF, UFL, ULB, UBR, DLF, DBL, DRB, DFR],
    co: [0, 0, 0, 0, 0, 0, 0, 0],
    ep: [UR, UF, UL, UB, DF, DL, DB, DR, FR, FL, BL, BR],
    eo: [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
};

/// L_MOVE
pub const L_MOVE: CubieCube = CubieCube {
    cp: [URF, ULB, DBL, UBR, DFR, UFL, DLF, DRB],
    co: [0, 1, 2, 0, 0, 2, 1, 0],
    ep: [UR, UF, BL, UB, DR, DF, FL, DB, FR, UL, DL, BR],
    eo: [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
};

/// B_MOVE
pub const B_MOVE: CubieCube = CubieCube {
    cp: [URF, UFL, UBR, DRB, DFR, DLF, ULB, DBL],
    co: [0, 0, 1, 2, 0, 0, 2, 1],
    ep: [UR, UF, UL, BR, DR, DF, DL, BL, FR, FL, UB, DB],
    eo: [0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 1, 1],
};

/// Move tables of all coordinates, entry `N_MOVE * value + move` is the value after the move.
pub struct MoveTables {
    pub twist: Vec<u16>,
    pub flip: Vec<u16>,
    pub frbr: Vec<u16>,
    pub urfdlf: Vec<u16>,
    pub urul: Vec<u16>,
    pub ubdf: Vec<u16>,
    /// Only phase 2 moves are defined, the others hold UNDEFINED.
    pub urdf: Vec<u16>,
    pub parity: Vec<u16>,
}

impl MoveTables {
    /// Load the tables from `dir`, creating the missing ones.
    pub fn new(dir: Option<&Path>) -> Result<Self, Error> {
        let load = |coord: Coord| {
            load_or_create(
                dir,
                &format!("move_{}", coord.name()),
                coord.size() * N_MOVE,
                || Ok(create_move_table(coord)),
            )
        };
        Ok(Self {
            twist: load(Coord::Twist)?,
            flip: load(Coord::Flip)?,
            frbr: load(Coord::FrBr)?,
            urfdlf: load(Coord::UrfDlf)?,
            urul: load(Coord::UrUl)?,
            ubdf: load(Coord::UbDf)?,
            urdf: load(Coord::UrDf)?,
            parity: load(Coord::Parity)?,
        })
    }

    pub fn table(&self, coord: Coord) -> &[u16] {
        match coord {
            Coord::Twist => &self.twist,
            Coord::Flip => &self.flip,
            Coord::FrBr => &self.frbr,
            Coord::UrfDlf => &self.urfdlf,
            Coord::UrUl => &self.urul,
            Coord::UbDf => &self.ubdf,
            Coord::UrDf => &self.urdf,
            Coord::Parity => &self.parity,
        }
    }

    /// Value of `coord` after move `m`.
    pub fn apply(&self, coord: Coord, value: u16, m: Move) -> u16 {
        self.table(coord)[N_MOVE * value as usize + m as usize]
    }
}

/// Move table for one coordinate.
///
/// Each face is turned four times: after the first three turns the quarter, half and
/// inverse turn values are recorded, the fourth restores the representative.
pub fn create_move_table(coord: Coord) -> Vec<u16> {
    let mut a = CubieCube::default();
    let bmc = cubie::basic_move_cubes();
    let mut table = vec![UNDEFINED; coord.size() * N_MOVE];
    for i in 0..coord.size() {
        a.set_coordinate(coord, i as u16);
        for face in ALL_COLORS {
            let mc = bmc[face as usize];
            for k in 0..3 {
                if coord.on_corners() {
                    a.corner_multiply(mc);
                } else {
                    a.edge_multiply(mc);
                }
                let m = ALL_MOVES[3 * face as usize + k];
                if coord.phase2_only() && !m.is_phase2() {
                    continue;
                }
                table[N_MOVE * i + m as usize] = a.coordinate(coord);
            }
            if coord.on_corners() {
                a.corner_multiply(mc);
            } else {
                a.edge_multiply(mc);
            }
        }
    }
    table
}

#[cfg(test)]
mod test {
    use rand::Rng;

    use crate::coord::ALL_COORDS;
    use crate::moves::*;

    #[test]
    fn test_move_twist() {
        let move_twist = create_move_table(Coord::Twist);
        assert_eq!(move_twist.len(), 39366);
        assert_eq!(move_twist[39365], 1995);
        assert_eq!(move_twist[3936], 142);
        assert_eq!(move_twist[393], 158);
        assert_eq!(move_twist[39], 1505);
        assert_eq!(move_twist[3], 1494);
    }

    #[test]
    fn test_move_flip() {
        let move_flip = create_move_table(Coord::Flip);
        assert_eq!(move_flip.len(), 36864);
        assert_eq!(move_flip[36863], 1910);
        assert_eq!(move_flip[3686], 204);
        assert_eq!(move_flip[368], 54);
        assert_eq!(move_flip[36], 2);
        assert_eq!(move_flip[3], 0);
    }

    #[test]
    fn test_move_frbr() {
        let move_frbr = create_move_table(Coord::FrBr);
        assert_eq!(move_frbr.len(), 213840);
        assert_eq!(move_frbr[213839], 11687);
        assert_eq!(move_frbr[21383], 2849);
        assert_eq!(move_frbr[2138], 3490);
        assert_eq!(move_frbr[213], 1914);
        assert_eq!(move_frbr[2], 0);
    }

    #[test]
    fn test_move_parity() {
        let move_parity = create_move_table(Coord::Parity);
        for m in ALL_MOVES {
            let flips = m.turn() != Turn::Half;
            assert_eq!(move_parity[m as usize], flips as u16);
            assert_eq!(move_parity[N_MOVE + m as usize], !flips as u16);
        }
    }

    #[test]
    fn test_orientation_tables_exhaustive() {
        for coord in [Coord::Twist, Coord::Flip, Coord::Parity] {
            let table = create_move_table(coord);
            for i in 0..coord.size() {
                let mut cc = CubieCube::default();
                cc.set_coordinate(coord, i as u16);
                for m in ALL_MOVES {
                    let next = cc.apply_move(m).coordinate(coord);
                    assert_eq!(table[N_MOVE * i + m as usize], next, "{:?} {} {}", coord, i, m);
                }
            }
        }
    }

    #[test]
    fn test_move_urdf_phase2_only() {
        let move_urdf = create_move_table(Coord::UrDf);
        for m in ALL_MOVES {
            assert_eq!(move_urdf[N_MOVE * 7 + m as usize] == UNDEFINED, !m.is_phase2());
        }
    }

    #[test]
    fn test_tables_match_cubies() {
        let tables: Vec<Vec<u16>> = ALL_COORDS.iter().map(|&c| create_move_table(c)).collect();
        let mut rng = rand::thread_rng();
        for _ in 0..50 {
            let mut cc = CubieCube::default();
            cc.randomize();
            // walk phase 2 moves from a phase 2 cube as well, URDF is undefined elsewhere
            let mut p2 = CubieCube::default();
            for _ in 0..20 {
                p2 = p2.apply_move(PHASE2_MOVES[rng.gen_range(0..PHASE2_MOVES.len())]);
            }
            for (coord, table) in ALL_COORDS.iter().zip(&tables) {
                for m in ALL_MOVES {
                    if !coord.phase2_only() {
                        let next = cc.apply_move(m).coordinate(*coord);
                        let i = N_MOVE * cc.coordinate(*coord) as usize + m as usize;
                        assert_eq!(table[i], next);
                    }
                    if m.is_phase2() {
                        let next = p2.apply_move(m).coordinate(*coord);
                        let i = N_MOVE * p2.coordinate(*coord) as usize + m as usize;
                        assert_eq!(table[i], next);
                    }
                }
            }
        }
    }

    #[test]
    fn test_notation() {
        for m in ALL_MOVES {
            assert_eq!(Move::from_str(&m.to_string()).unwrap(), m);
            assert_eq!(Move::from_id(m.id()), Some(m));
            assert_eq!(Move::from_face_turn(m.face(), m.turn()), m);
        }
        assert_eq!(Move::from_id(18), None);
        assert_eq!(R3.to_string(), "R'");
        assert_eq!(B2.face(), Color::B);
        assert_eq!(B2.turn(), Turn::Half);
        assert!(matches!(Move::from_str("X"), Err(Error::InvalidScramble(_))));
    }

    #[test]
    fn test_simplify() {
        assert_eq!(simplify(&[R, R]), vec![R2]);
        assert_eq!(simplify(&[R, R3]), vec![]);
        assert_eq!(simplify(&[U, R, R3, U]), vec![U2]);
        assert_eq!(simplify(&[R2, R3, U]), vec![R, U]);
        assert_eq!(simplify(&[R, L, R]), vec![R, L, R]);
    }

    #[test]
    fn test_invert() {
        let moves = [R, U2, F3];
        assert_eq!(invert(&moves), vec![F, U2, R3]);
        assert_eq!(
            CubieCube::default().apply_moves(&moves).apply_moves(&invert(&moves)),
            CubieCube::default()
        );
    }

    #[test]
    fn test_redundant_after() {
        assert!(R.is_redundant_after(R2));
        assert!(U.is_redundant_after(D));
        assert!(F3.is_redundant_after(B2));
        assert!(!D.is_redundant_after(U));
        assert!(!L.is_redundant_after(R3));
        assert!(!U.is_redundant_after(R));
    }
}
