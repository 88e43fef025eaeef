use crate::moves::Move::{self, *};

/// 3^7 possible corner orientations in phase 1
pub const N_TWIST: usize = 2187;
/// 2^11 possible edge orientations in phase 1
pub const N_FLIP: usize = 2048;
/// 12!/8! positions and orders of the FR, FL, BL and BR edges
pub const N_FRBR: usize = 11880;
/// 8!/2! positions and orders of the corners URF, UFL, ULB, UBR, DFR and DLF
pub const N_URFDLF: usize = 20160;
/// 12!/9! positions and orders of the edges UR, UF and UL
pub const N_URUL: usize = 1320;
/// 12!/9! positions and orders of the edges UB, DR and DF
pub const N_UBDF: usize = 1320;
/// 8!/2! permutations of the edges UR, UF, UL, UB, DR and DF in phase 2
pub const N_URDF: usize = 20160;
/// Corner (= edge) permutation parity
pub const N_PARITY: usize = 2;

/// Binomial(12,4) positions of the slice edges, the phase 1 part of FRBR
pub const N_SLICE1: usize = 495;
/// 4! orders of the slice edges, the phase 2 part of FRBR
pub const N_SLICE2: usize = 24;
/// URUL and UBDF values with their edges in the first 8 positions (Binomial(8,3) * 3!)
pub const N_MERGE: usize = 336;

pub const N_MOVE: usize = 18;

/// Longest move sequence a search context can hold.
pub const MAX_DEPTH: usize = 31;

/// Marks move and merge table entries that are never looked up.
pub const UNDEFINED: u16 = u16::MAX;

/// Value of UBDF on the solved cube.
pub const SOLVED_UBDF: u16 = 114;

pub const SOLVED_FACELETS: &str = "UUUUUUUUURRRRRRRRRFFFFFFFFFDDDDDDDDDLLLLLLLLLBBBBBBBBB";

#[rustfmt::skip]
pub const ALL_MOVES: [Move; N_MOVE] = [
    U, U2, U3,
    R, R2, R3,
    F, F2, F3,
    D, D2, D3,
    L, L2, L3,
    B, B2, B3,
];

/// Moves which keep a cube inside the phase 2 subgroup.
pub const PHASE2_MOVES: [Move; 10] = [U, U2, U3, R2, F2, D, D2, D3, L2, B2];

/// Binomial coefficient, 0 if n < k.
pub const fn cnk(n: usize, k: usize) -> usize {
    if n < k {
        return 0;
    }
    let k = if k > n / 2 { n - k } else { k };
    let mut s = 1;
    let mut i = 0;
    while i < k {
        s = s * (n - i) / (i + 1);
        i += 1;
    }
    s
}

pub const fn factorial(n: usize) -> usize {
    let mut f = 1;
    let mut i = 2;
    while i <= n {
        f *= i;
        i += 1;
    }
    f
}
