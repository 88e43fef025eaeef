//! A crate for solving the 3x3 Rubik's cube from its facelet string with [Kociemba's two phase algorithm](http://kociemba.org/cube.htm).
//!
//! ```rust,no_run
//! use twophase::solver::solve;
//!
//! let result = solve("BLDBURUDBLBBBRRLFURRDDFDFUDRLFRDULLLRUFLLFUFDRFUUBDFBB", 24, 1.0).unwrap();
//! println!("{:?} ({} moves)", result.solution, result.solution.len());
//! ```

#[macro_use]
extern crate lazy_static;

/// Module containing functions for scrambling the cube.
pub mod scramble;

pub mod error;

/// Module containing 3x3 cube constants.
pub mod constants;
pub mod coord;
pub mod cubie;
pub mod facelet;
pub mod moves;
pub mod pruning;
pub mod solver;

use std::{
    fs,
    path::{Path, PathBuf},
};

use bincode::{
    config::{self, Configuration},
    decode_from_slice, encode_to_vec,
    error::DecodeError,
    Decode, Encode,
};
use log::{info, warn};

use crate::error::Error;
pub use crate::{cubie::CubieCube, moves::Move};

const CONFIG: Configuration = config::standard();

/// Environment variable naming the directory the generated tables are cached in.
pub const TABLES_ENV: &str = "TWOPHASE_TABLES";

pub fn write_table<P, T: Encode>(path: P, table: &T) -> Result<(), Error>
where
    P: AsRef<Path>,
{
    let encoded = encode_to_vec(table, CONFIG)?;
    fs::write(path, encoded)?;
    Ok(())
}

pub fn decode_table<T: Decode<()>>(bytes: &[u8]) -> Result<T, Error> {
    let (decoded, written) = decode_from_slice(bytes, CONFIG)?;
    let additional = bytes.len() - written;

    if additional != 0 {
        return Err(DecodeError::UnexpectedEnd { additional })?;
    }
    Ok(decoded)
}

/// The cache directory configured through [TABLES_ENV], if any.
pub fn table_dir() -> Option<PathBuf> {
    std::env::var_os(TABLES_ENV).map(PathBuf::from)
}

/// Load table `name` from `dir`, or create it with `create` and store it there.
///
/// Without a directory the table is always created in memory. A cached file that
/// does not decode to `len` entries is ignored and overwritten.
pub(crate) fn load_or_create<E, F>(
    dir: Option<&Path>,
    name: &str,
    len: usize,
    create: F,
) -> Result<Vec<E>, Error>
where
    Vec<E>: Encode + Decode<()>,
    F: FnOnce() -> Result<Vec<E>, Error>,
{
    let Some(dir) = dir else {
        info!("Creating {} table...", name);
        return create();
    };
    let path = dir.join(name);
    if let Ok(bytes) = fs::read(&path) {
        match decode_table::<Vec<E>>(&bytes) {
            Ok(table) if table.len() == len => {
                info!("Loading {} table...", path.display());
                return Ok(table);
            }
            Ok(table) => warn!(
                "Ignoring {}: expected {} entries, found {}",
                path.display(),
                len,
                table.len()
            ),
            Err(err) => warn!("Ignoring {}: {}", path.display(), err),
        }
    }

    info!("Creating {} table...", path.display());
    let table = create()?;
    let stored = fs::create_dir_all(dir)
        .map_err(Error::from)
        .and_then(|_| write_table(&path, &table));
    if let Err(err) = stored {
        warn!("Could not write {}: {}", path.display(), err);
    }
    Ok(table)
}
