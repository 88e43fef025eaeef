use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cubie::{CubieCube, ALL_CORNERS, ALL_EDGES};
use crate::error::{Error, InputFault};

/// Names the colors of the cube facelets: up, right, face, down, left, back.
///
/// A color doubles as the name of the face whose center carries it.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum Color {
    U,
    R,
    F,
    D,
    L,
    B,
}

pub const ALL_COLORS: [Color; 6] = [Color::U, Color::R, Color::F, Color::D, Color::L, Color::B];

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl TryFrom<char> for Color {
    type Error = Error;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            'U' => Ok(Color::U),
            'R' => Ok(Color::R),
            'F' => Ok(Color::F),
            'D' => Ok(Color::D),
            'L' => Ok(Color::L),
            'B' => Ok(Color::B),
            _ => Err(InputFault::Character(value).into()),
        }
    }
}

/// The names of the facelet positions of the cube.
/// ```text
///              |************|
///              |*U1**U2**U3*|
///              |************|
///              |*U4**U5**U6*|
///              |************|
///              |*U7**U8**U9*|
///              |************|
/// |************|************|************|************|
/// |*L1**L2**L3*|*F1**F2**F3*|*R1**R2**R3*|*B1**B2**B3*|
/// |************|************|************|************|
/// |*L4**L5**L6*|*F4**F5**F6*|*R4**R5**R6*|*B4**B5**B6*|
/// |************|************|************|************|
/// |*L7**L8**L9*|*F7**F8**F9*|*R7**R8**R9*|*B7**B8**B9*|
/// |************|************|************|************|
///              |************|
///              |*D1**D2**D3*|
///              |************|
///              |*D4**D5**D6*|
///              |************|
///              |*D7**D8**D9*|
///              |************|
/// ```
/// A cube definition string "UBL..." means that in position U1 we have the U-color, in position U2 we have the
/// B-color, in position U3 we have the L color etc. according to the order U1, U2, U3, U4, U5, U6, U7, U8, U9, R1, R2,
/// R3, R4, R5, R6, R7, R8, R9, F1, F2, F3, F4, F5, F6, F7, F8, F9, D1, D2, D3, D4, D5, D6, D7, D8, D9, L1, L2, L3, L4,
/// L5, L6, L7, L8, L9, B1, B2, B3, B4, B5, B6, B7, B8, B9.
///
/// Facelet index of Xn is 9 * X + n - 1.
pub const CORNER_FACELET: [[usize; 3]; 8] = [
    [8, 9, 20],   // U9, R1, F3
    [6, 18, 38],  // U7, F1, L3
    [0, 36, 47],  // U1, L1, B3
    [2, 45, 11],  // U3, B1, R3
    [29, 26, 15], // D3, F9, R7
    [27, 44, 24], // D1, L9, F7
    [33, 53, 42], // D7, B9, L7
    [35, 17, 51], // D9, R9, B7
];

pub const EDGE_FACELET: [[usize; 2]; 12] = [
    [5, 10],  // U6, R2
    [7, 19],  // U8, F2
    [3, 37],  // U4, L2
    [1, 46],  // U2, B2
    [32, 16], // D6, R8
    [28, 25], // D2, F8
    [30, 43], // D4, L8
    [34, 52], // D8, B8
    [23, 12], // F6, R4
    [21, 41], // F4, L6
    [50, 39], // B6, L4
    [48, 14], // B4, R6
];

/// Colors of the corner cubies, starting with the U or D facelet and going clockwise.
pub const CORNER_COLOR: [[Color; 3]; 8] = {
    use Color::*;
    [
        [U, R, F],
        [U, F, L],
        [U, L, B],
        [U, B, R],
        [D, F, R],
        [D, L, F],
        [D, B, L],
        [D, R, B],
    ]
};

pub const EDGE_COLOR: [[Color; 2]; 12] = {
    use Color::*;
    [
        [U, R],
        [U, F],
        [U, L],
        [U, B],
        [D, R],
        [D, F],
        [D, L],
        [D, B],
        [F, R],
        [F, L],
        [B, L],
        [B, R],
    ]
};

/// Cube on the facelet level.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct FaceCube {
    pub f: [Color; 54],
}

impl Default for FaceCube {
    fn default() -> Self {
        let mut f = [Color::U; 54];
        for (i, color) in ALL_COLORS.into_iter().enumerate() {
            f[9 * i..9 * i + 9].fill(color);
        }
        Self { f }
    }
}

impl fmt::Display for FaceCube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for color in self.f {
            write!(f, "{}", color)?;
        }
        Ok(())
    }
}

/// Parse a cube definition string; see [CORNER_FACELET] for the facelet order.
impl TryFrom<&str> for FaceCube {
    type Error = Error;

    fn try_from(cube_string: &str) -> Result<Self, Self::Error> {
        let len = cube_string.chars().count();
        if len != 54 {
            return Err(InputFault::Length(len).into());
        }

        let mut f = [Color::U; 54];
        let mut count = [0; 6];
        for (i, c) in cube_string.chars().enumerate() {
            let color = Color::try_from(c)?;
            f[i] = color;
            count[color as usize] += 1;
        }

        for color in ALL_COLORS {
            if count[color as usize] != 9 {
                return Err(InputFault::ColorCount(color, count[color as usize]).into());
            }
        }
        for color in ALL_COLORS {
            if f[9 * color as usize + 4] != color {
                return Err(InputFault::Center(color).into());
            }
        }
        Ok(Self { f })
    }
}

impl From<&CubieCube> for FaceCube {
    fn from(cc: &CubieCube) -> Self {
        let mut fc = FaceCube::default();
        for i in 0..8 {
            let j = cc.cp[i] as usize; // cornercubie with index j is at cornerposition with index i
            let ori = cc.co[i] as usize; // orientation of this cubie
            for k in 0..3 {
                fc.f[CORNER_FACELET[i][(k + ori) % 3]] = CORNER_COLOR[j][k];
            }
        }
        for i in 0..12 {
            let j = cc.ep[i] as usize;
            let ori = cc.eo[i] as usize;
            for k in 0..2 {
                fc.f[EDGE_FACELET[i][(k + ori) % 2]] = EDGE_COLOR[j][k];
            }
        }
        fc
    }
}

/// Identify the cubies behind the facelets and check that they form a solvable cube.
impl TryFrom<&FaceCube> for CubieCube {
    type Error = Error;

    fn try_from(fc: &FaceCube) -> Result<Self, Self::Error> {
        let mut cc = CubieCube::default();
        for i in 0..8 {
            let fac = CORNER_FACELET[i];
            // the U or D facelet of the cubie fixes its orientation
            let ori = (0..3)
                .find(|&o| matches!(fc.f[fac[o]], Color::U | Color::D))
                .ok_or(InputFault::Corner(i))?;
            let colors = [fc.f[fac[ori]], fc.f[fac[(ori + 1) % 3]], fc.f[fac[(ori + 2) % 3]]];
            let j = CORNER_COLOR
                .iter()
                .position(|c| *c == colors)
                .ok_or(InputFault::Corner(i))?;
            cc.cp[i] = ALL_CORNERS[j];
            cc.co[i] = ori as u8;
        }
        for i in 0..12 {
            let colors = [fc.f[EDGE_FACELET[i][0]], fc.f[EDGE_FACELET[i][1]]];
            let (j, ori) = EDGE_COLOR
                .iter()
                .enumerate()
                .find_map(|(j, c)| {
                    if *c == colors {
                        Some((j, 0))
                    } else if [c[1], c[0]] == colors {
                        Some((j, 1))
                    } else {
                        None
                    }
                })
                .ok_or(InputFault::Edge(i))?;
            cc.ep[i] = ALL_EDGES[j];
            cc.eo[i] = ori;
        }
        cc.verify()?;
        Ok(cc)
    }
}

#[cfg(test)]
mod test {
    use crate::constants::SOLVED_FACELETS;
    use crate::facelet::*;
    use crate::moves::Move::*;

    const CUBE: &str = "RLLBUFUUUBDURRBBUBRLRRFDFDDLLLUDFLRRDDFRLFDBUBFFLBBDUF";

    fn fault(s: &str) -> InputFault {
        match FaceCube::try_from(s).and_then(|fc| CubieCube::try_from(&fc)) {
            Err(Error::MalformedInput(fault)) => fault,
            other => panic!("expected malformed input, got {:?}", other),
        }
    }

    #[test]
    fn test_facecube_round_trip() {
        let fc = FaceCube::try_from(CUBE).unwrap();
        assert_eq!(fc.to_string(), CUBE);
        let cc = CubieCube::try_from(&fc).unwrap();
        assert_eq!(FaceCube::from(&cc).to_string(), CUBE);
    }

    #[test]
    fn test_solved() {
        let fc = FaceCube::default();
        assert_eq!(fc.to_string(), SOLVED_FACELETS);
        assert_eq!(CubieCube::try_from(&fc).unwrap(), CubieCube::default());
    }

    #[test]
    fn test_single_move_facelets() {
        let cc = CubieCube::default().apply_moves(&[U]);
        assert_eq!(
            FaceCube::from(&cc).to_string(),
            "UUUUUUUUUBBBRRRRRRRRRFFFFFFDDDDDDDDDFFFLLLLLLLLLBBBBBB"
        );
        let cc = CubieCube::default().apply_moves(&[R]);
        assert_eq!(
            FaceCube::from(&cc).to_string(),
            "UUFUUFUUFRRRRRRRRRFFDFFDFFDDDBDDBDDBLLLLLLLLLUBBUBBUBB"
        );
    }

    #[test]
    fn test_length() {
        assert_eq!(fault(&format!("{}U", SOLVED_FACELETS)), InputFault::Length(55));
        assert_eq!(fault(&SOLVED_FACELETS[1..]), InputFault::Length(53));
    }

    #[test]
    fn test_invalid_character() {
        let s = SOLVED_FACELETS.replacen('U', "X", 1);
        assert_eq!(fault(&s), InputFault::Character('X'));
    }

    #[test]
    fn test_color_count() {
        // one R sticker painted U: U appears 10 times
        let s = SOLVED_FACELETS.replacen('R', "U", 1);
        assert_eq!(fault(&s), InputFault::ColorCount(Color::U, 10));
    }

    #[test]
    fn test_center() {
        // swap the U and R centers
        let mut f: Vec<char> = SOLVED_FACELETS.chars().collect();
        f.swap(4, 13);
        let s: String = f.into_iter().collect();
        assert_eq!(fault(&s), InputFault::Center(Color::U));
    }

    #[test]
    fn test_twisted_corner() {
        // rotate the stickers of the URF corner in place
        let mut f: Vec<char> = SOLVED_FACELETS.chars().collect();
        let [a, b, c] = CORNER_FACELET[0];
        let (x, y, z) = (f[a], f[b], f[c]);
        f[a] = z;
        f[b] = x;
        f[c] = y;
        let s: String = f.into_iter().collect();
        assert_eq!(fault(&s), InputFault::Twist);
    }

    #[test]
    fn test_flipped_edge() {
        let mut f: Vec<char> = SOLVED_FACELETS.chars().collect();
        let [a, b] = EDGE_FACELET[0];
        f.swap(a, b);
        let s: String = f.into_iter().collect();
        assert_eq!(fault(&s), InputFault::Flip);
    }

    #[test]
    fn test_parity() {
        // swap the UR and UF edges: a single transposition
        let mut f: Vec<char> = SOLVED_FACELETS.chars().collect();
        let [ur_u, ur_r] = EDGE_FACELET[0];
        let [uf_u, uf_f] = EDGE_FACELET[1];
        f.swap(ur_u, uf_u);
        f.swap(ur_r, uf_f);
        let s: String = f.into_iter().collect();
        assert_eq!(fault(&s), InputFault::Parity);
    }

    #[test]
    fn test_unknown_cubie() {
        // the URF corner shows two U stickers
        let mut f: Vec<char> = SOLVED_FACELETS.chars().collect();
        let [_, r1, _] = CORNER_FACELET[0];
        let [u1, _, _] = CORNER_FACELET[2];
        f.swap(r1, u1);
        let s: String = f.into_iter().collect();
        assert_eq!(fault(&s), InputFault::Corner(0));
    }
}
