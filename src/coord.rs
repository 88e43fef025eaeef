use std::{fmt, path::Path};

use crate::constants::*;
use crate::cubie::{encode_placement, fill_slots, placement_slots, CubieCube, Edge::*};
use crate::moves::{Move, MoveTables};
use crate::{error::Error, load_or_create};

/// The coordinates the search tracks.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Coord {
    Twist,
    Flip,
    FrBr,
    UrfDlf,
    UrUl,
    UbDf,
    UrDf,
    Parity,
}

pub const ALL_COORDS: [Coord; 8] = [
    Coord::Twist,
    Coord::Flip,
    Coord::FrBr,
    Coord::UrfDlf,
    Coord::UrUl,
    Coord::UbDf,
    Coord::UrDf,
    Coord::Parity,
];

impl Coord {
    /// Number of values of the coordinate.
    pub fn size(self) -> usize {
        match self {
            Coord::Twist => N_TWIST,
            Coord::Flip => N_FLIP,
            Coord::FrBr => N_FRBR,
            Coord::UrfDlf => N_URFDLF,
            Coord::UrUl => N_URUL,
            Coord::UbDf => N_UBDF,
            Coord::UrDf => N_URDF,
            Coord::Parity => N_PARITY,
        }
    }

    /// Corner coordinates only depend on `cp` and `co`, the others on `ep` and `eo`.
    pub fn on_corners(self) -> bool {
        matches!(self, Coord::Twist | Coord::UrfDlf | Coord::Parity)
    }

    /// URDF is only defined while the slice edges are in the slice.
    pub fn phase2_only(self) -> bool {
        self == Coord::UrDf
    }

    pub fn name(self) -> &'static str {
        match self {
            Coord::Twist => "twist",
            Coord::Flip => "flip",
            Coord::FrBr => "frbr",
            Coord::UrfDlf => "urfdlf",
            Coord::UrUl => "urul",
            Coord::UbDf => "ubdf",
            Coord::UrDf => "urdf",
            Coord::Parity => "parity",
        }
    }
}

/// Represent a cube on the coordinate level.
///
/// In phase 1 a state is determined by twist, flip and the slice part `frbr / 24`.
///
/// In phase 2 a state is determined by urfdlf, urdf, `frbr % 24` and parity.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct CoordCube {
    pub twist: u16,
    pub flip: u16,
    pub frbr: u16,
    pub urfdlf: u16,
    pub urul: u16,
    pub ubdf: u16,
    pub urdf: u16, // UNDEFINED outside phase 2
    pub parity: u16,
}

impl Default for CoordCube {
    fn default() -> Self {
        Self {
            twist: 0,
            flip: 0,
            frbr: 0,
            urfdlf: 0,
            urul: 0,
            ubdf: SOLVED_UBDF,
            urdf: 0,
            parity: 0,
        }
    }
}

impl fmt::Display for CoordCube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(twist: {}, flip: {}, slice: {}, FRBR: {}, URFDLF: {}, URUL: {}, UBDF: {}, URDF: {}, parity: {})",
            self.twist,
            self.flip,
            self.frbr / N_SLICE2 as u16,
            self.frbr,
            self.urfdlf,
            self.urul,
            self.ubdf,
            self.urdf,
            self.parity
        )
    }
}

impl From<&CubieCube> for CoordCube {
    fn from(cc: &CubieCube) -> Self {
        Self {
            twist: cc.get_twist(),
            flip: cc.get_flip(),
            frbr: cc.get_frbr(),
            urfdlf: cc.get_urfdlf(),
            urul: cc.get_urul(),
            ubdf: cc.get_ubdf(),
            urdf: cc.get_urdf().unwrap_or(UNDEFINED),
            parity: cc.corner_parity() as u16,
        }
    }
}

impl CoordCube {
    /// True inside the phase 2 subgroup.
    pub fn in_phase2(&self) -> bool {
        self.twist == 0 && self.flip == 0 && (self.frbr as usize) < N_SLICE2
    }

    /// Update the phase 1 coordinates twist, flip and frbr.
    pub fn phase1_move(&self, mv: &MoveTables, m: Move) -> Self {
        let mut res = *self;
        res.twist = mv.apply(Coord::Twist, self.twist, m);
        res.flip = mv.apply(Coord::Flip, self.flip, m);
        res.frbr = mv.apply(Coord::FrBr, self.frbr, m);
        res
    }

    /// Update the coordinates which are carried from phase 1 into phase 2.
    pub fn transition_move(&self, mv: &MoveTables, m: Move) -> Self {
        let mut res = *self;
        res.urfdlf = mv.apply(Coord::UrfDlf, self.urfdlf, m);
        res.urul = mv.apply(Coord::UrUl, self.urul, m);
        res.ubdf = mv.apply(Coord::UbDf, self.ubdf, m);
        res.parity = mv.apply(Coord::Parity, self.parity, m);
        res
    }

    /// Update the phase 2 coordinates frbr, urfdlf, urdf and parity.
    pub fn phase2_move(&self, mv: &MoveTables, m: Move) -> Result<Self, Error> {
        if self.urdf == UNDEFINED {
            return Err(Error::InternalConsistency(format!(
                "phase 2 move {} outside the phase 2 subgroup",
                m
            )));
        }
        let urdf = mv.apply(Coord::UrDf, self.urdf, m);
        if urdf == UNDEFINED {
            return Err(Error::InternalConsistency(format!("{} is not a phase 2 move", m)));
        }
        let mut res = *self;
        res.frbr = mv.apply(Coord::FrBr, self.frbr, m);
        res.urfdlf = mv.apply(Coord::UrfDlf, self.urfdlf, m);
        res.urdf = urdf;
        res.parity = mv.apply(Coord::Parity, self.parity, m);
        Ok(res)
    }
}

/// The merge table gives the phase 2 coordinate urdf from the urul and ubdf coordinates.
pub struct MergeTable {
    pub urdf: Vec<u16>,
}

impl MergeTable {
    pub fn new(dir: Option<&Path>) -> Result<Self, Error> {
        Ok(Self {
            urdf: load_or_create(dir, "merge_urdf", N_MERGE * N_MERGE, || {
                Ok(create_merge_table())
            })?,
        })
    }

    /// Combine urul and ubdf of a phase 2 cube.
    pub fn merge(&self, urul: u16, ubdf: u16) -> Result<u16, Error> {
        let (i, j) = (urul as usize, ubdf as usize);
        if i >= N_MERGE || j >= N_MERGE {
            return Err(Error::InternalConsistency(format!(
                "urul {} and ubdf {} do not belong to a phase 2 cube",
                urul, ubdf
            )));
        }
        match self.urdf[N_MERGE * i + j] {
            UNDEFINED => Err(Error::InternalConsistency(format!(
                "urul {} and ubdf {} share a position",
                urul, ubdf
            ))),
            urdf => Ok(urdf),
        }
    }
}

/// Create the merge table. Pairs placing two edges on the same position are UNDEFINED.
pub fn create_merge_table() -> Vec<u16> {
    let mut table = vec![UNDEFINED; N_MERGE * N_MERGE];
    let ur_ul = UR as u8..UL as u8 + 1;
    let ub_df = UB as u8..DF as u8 + 1;
    let ur_df = UR as u8..DF as u8 + 1;
    let ubdf_slots: Vec<Vec<Option<u8>>> = (0..N_MERGE)
        .map(|j| placement_slots(j as u16, 12, ub_df.clone(), false))
        .collect();
    for i in 0..N_MERGE {
        let urul_slots = placement_slots(i as u16, 12, ur_ul.clone(), false);
        for (j, slots) in ubdf_slots.iter().enumerate() {
            if urul_slots.iter().zip(slots).any(|(a, b)| a.is_some() && b.is_some()) {
                continue;
            }
            let merged: Vec<Option<u8>> = urul_slots
                .iter()
                .zip(slots)
                .map(|(a, b)| a.or(*b))
                .collect();
            table[N_MERGE * i + j] = encode_placement(&fill_slots(&merged), ur_df.clone(), false);
        }
    }
    table
}

#[cfg(test)]
mod test {
    use rand::Rng;

    use crate::coord::*;
    use crate::facelet::FaceCube;
    use crate::moves::Move;

    #[test]
    fn test_coordcube() {
        let mv = MoveTables::new(None).unwrap();
        let fc =
            FaceCube::try_from("RLLBUFUUUBDURRBBUBRLRRFDFDDLLLUDFLRRDDFRLFDBUBFFLBBDUF").unwrap();
        let cc = CubieCube::try_from(&fc).unwrap();
        let mut cdc = CoordCube::from(&cc);
        assert_eq!(cdc.twist, 149);
        assert_eq!(cdc.flip, 1514);
        assert_eq!(cdc.frbr, 1701);
        assert_eq!(cdc.urdf, UNDEFINED);
        assert!(cdc.phase2_move(&mv, Move::U).is_err());
        cdc = cdc.phase1_move(&mv, Move::U2);
        assert_eq!(cdc.twist, 1229);
        assert_eq!(cdc.flip, 1898);
        assert_eq!(cdc.frbr, 5061);
        cdc = cdc.phase1_move(&mv, Move::R2);
        assert_eq!(cdc.frbr, 5116);
    }

    #[test]
    fn test_moves_match_cubies() {
        let mv = MoveTables::new(None).unwrap();
        let mut cc = CubieCube::default();
        cc.randomize();
        for m in ALL_MOVES {
            let next = CoordCube::from(&cc.apply_move(m));
            let cdc = CoordCube::from(&cc).phase1_move(&mv, m).transition_move(&mv, m);
            assert_eq!((cdc.twist, cdc.flip, cdc.frbr), (next.twist, next.flip, next.frbr));
            assert_eq!(
                (cdc.urfdlf, cdc.urul, cdc.ubdf, cdc.parity),
                (next.urfdlf, next.urul, next.ubdf, next.parity)
            );
        }

        let cc = CubieCube::default().apply_moves(&[Move::U, Move::R2, Move::D3, Move::B2]);
        let cdc = CoordCube::from(&cc);
        assert!(cdc.in_phase2());
        for m in PHASE2_MOVES {
            assert_eq!(cdc.phase2_move(&mv, m).unwrap(), CoordCube {
                twist: 0,
                flip: 0,
                urul: cdc.urul,
                ubdf: cdc.ubdf,
                ..CoordCube::from(&cc.apply_move(m))
            });
        }
        assert!(cdc.phase2_move(&mv, Move::R).is_err());
    }

    #[test]
    fn test_solved_coordcube() {
        assert_eq!(CoordCube::from(&CubieCube::default()), CoordCube::default());
    }

    #[test]
    fn test_create_merge_table() {
        let merge = create_merge_table();
        assert_eq!(merge.len(), N_MERGE * N_MERGE);
        assert_eq!(merge[0], UNDEFINED);
        assert_eq!(merge[SOLVED_UBDF as usize], 0);
    }

    #[test]
    fn test_merge_matches_cubies() {
        let em = MergeTable {
            urdf: create_merge_table(),
        };
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let mut cc = CubieCube::default();
            for _ in 0..25 {
                cc = cc.apply_move(PHASE2_MOVES[rng.gen_range(0..PHASE2_MOVES.len())]);
            }
            assert_eq!(Some(em.merge(cc.get_urul(), cc.get_ubdf()).unwrap()), cc.get_urdf());
        }
        assert!(em.merge(0, 0).is_err());
        assert!(em.merge(N_MERGE as u16, 0).is_err());
    }
}
