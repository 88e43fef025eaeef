use std::fmt;

use bincode::error::{DecodeError, EncodeError};
use thiserror::Error;

use crate::facelet::Color;

/// Errors reported by the solver and its table machinery.
#[derive(Debug, Error)]
pub enum Error {
    /// The facelet string or cube does not describe a physical, solvable cube.
    #[error("malformed cube: {0}")]
    MalformedInput(InputFault),
    /// No solution within the given number of moves.
    #[error("no solution found within {0} moves")]
    NoSolutionFound(usize),
    /// A table lookup fell outside what the tables were generated for.
    #[error("internal table inconsistency: {0}")]
    InternalConsistency(String),
    #[error("invalid scramble: {0}")]
    InvalidScramble(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl Error {
    pub fn is_malformed_input(&self) -> bool {
        matches!(self, Error::MalformedInput(_))
    }
}

impl From<InputFault> for Error {
    fn from(fault: InputFault) -> Self {
        Error::MalformedInput(fault)
    }
}

/// The check a facelet string or cubie cube failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFault {
    /// The facelet string does not have 54 characters.
    Length(usize),
    /// A character outside U, R, F, D, L, B.
    Character(char),
    /// A color does not appear exactly 9 times.
    ColorCount(Color, usize),
    /// A center facelet is not the color of its face.
    Center(Color),
    /// No corner cubie carries the colors found at this corner position.
    Corner(usize),
    /// No edge cubie carries the colors found at this edge position.
    Edge(usize),
    /// A corner cubie appears more than once.
    DuplicateCorner(usize),
    /// An edge cubie appears more than once.
    DuplicateEdge(usize),
    /// The corner orientations do not sum to 0 mod 3.
    Twist,
    /// The edge orientations do not sum to 0 mod 2.
    Flip,
    /// Corner and edge permutation parities differ.
    Parity,
}

impl fmt::Display for InputFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputFault::Length(n) => write!(f, "expected 54 facelets, got {}", n),
            InputFault::Character(c) => write!(f, "invalid facelet color '{}'", c),
            InputFault::ColorCount(c, n) => write!(f, "color {} appears {} times", c, n),
            InputFault::Center(c) => write!(f, "center of face {} has the wrong color", c),
            InputFault::Corner(i) => write!(f, "no corner matches the colors at corner {}", i),
            InputFault::Edge(i) => write!(f, "no edge matches the colors at edge {}", i),
            InputFault::DuplicateCorner(i) => write!(f, "corner {} appears more than once", i),
            InputFault::DuplicateEdge(i) => write!(f, "edge {} appears more than once", i),
            InputFault::Twist => write!(f, "twisted corner"),
            InputFault::Flip => write!(f, "flipped edge"),
            InputFault::Parity => write!(f, "corner and edge parity differ"),
        }
    }
}
