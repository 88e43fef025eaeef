use std::path::Path;
use std::time::{Duration, Instant};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::coord::{Coord, CoordCube, MergeTable};
use crate::cubie::CubieCube;
use crate::error::Error;
use crate::facelet::FaceCube;
use crate::moves::{simplify, Move, MoveTables};
use crate::pruning::PruningTables;
use crate::table_dir;

/// All data tables.
///
/// * `mv`: [MoveTables]
/// * `pr`: [PruningTables]
/// * `em`: [MergeTable]
pub struct SolverTables {
    pub mv: MoveTables,
    pub pr: PruningTables,
    pub em: MergeTable,
}

impl SolverTables {
    /// Create the tables, or load them from `dir` when they were cached there.
    pub fn new(dir: Option<&Path>) -> Result<Self, Error> {
        let start = Instant::now();
        let mv = MoveTables::new(dir)?;
        let pr = PruningTables::new(&mv, dir)?;
        let em = MergeTable::new(dir)?;
        info!("Tables ready in {:?}", start.elapsed());
        Ok(Self { mv, pr, em })
    }
}

lazy_static! {
    static ref SOLVERTABLES: Result<SolverTables, String> =
        SolverTables::new(table_dir().as_deref()).map_err(|e| e.to_string());
}

/// The process wide tables, built on first use.
pub fn solver_tables() -> Result<&'static SolverTables, Error> {
    match &*SOLVERTABLES {
        Ok(tables) => Ok(tables),
        Err(e) => Err(Error::InternalConsistency(format!("tables unavailable: {}", e))),
    }
}

/// Solution result:
/// * solution: a Move vector.
/// * solve_time: time to get solution(not include load data tables time.).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct SolutionResult {
    pub solution: Vec<Move>,
    pub solve_time: Duration,
}

/// Solve a cube defined by cubestring to a position defined by goalstring.
///
/// # Parameters
/// * `cubestring`: The format of the string is given in the [FaceCube] defined.
/// * `goalstring`: The format of the string is given in the [FaceCube] defined.
/// * `max_length`: Longest accepted maneuver.
/// * `timeout`: Seconds after which the best solution found so far is returned. If there has not been found
///     any solution yet the computation continues until a first solution appears.
///
/// # Examples
/// ```rust,no_run
/// use twophase::solver::solver;
///
/// let result = solver(
///     "RLLBUFUUUBDURRBBUBRLRRFDFDDLLLUDFLRRDDFRLFDBUBFFLBBDUF",
///     "UUUUUUUUURRRRRRRRRFFFFFFFFFDDDDDDDDDLLLLLLLLLBBBBBBBBB",
///     20,
///     3.0,
/// )
/// .unwrap();
/// println!("{:?}, ({}), ({:?})", result.solution, result.solution.len(), result.solve_time);
/// ```
pub fn solver(
    cubestring: &str,
    goalstring: &str,
    max_length: usize,
    timeout: f32,
) -> Result<SolutionResult, Error> {
    let cc0 = CubieCube::try_from(&FaceCube::try_from(cubestring)?)?;
    let ccg = CubieCube::try_from(&FaceCube::try_from(goalstring)?)?;
    // cc0 * solution = ccg  <=>  ccg^-1 * cc0 * solution = id
    let cc = ccg.inverse_cubie_cube() * cc0;
    solve_cubie(&cc, max_length, timeout)
}

/// Solve a cube defined by its facelet string.
///
/// Returns the shortest maneuver the two phase search finds within `timeout` seconds, an empty
/// maneuver for the solved cube, and [Error::NoSolutionFound] when there is none with at most
/// `max_length` moves.
///
/// # Examples
/// ```rust,no_run
/// use twophase::solver::solve;
///
/// let result = solve("RLLBUFUUUBDURRBBUBRLRRFDFDDLLLUDFLRRDDFRLFDBUBFFLBBDUF", 20, 3.0).unwrap();
/// println!("{:?}, ({}), ({:?})", result.solution, result.solution.len(), result.solve_time);
/// ```
pub fn solve(cubestring: &str, max_length: usize, timeout: f32) -> Result<SolutionResult, Error> {
    let fc = FaceCube::try_from(cubestring)?;
    let cc = CubieCube::try_from(&fc)?;
    solve_cubie(&cc, max_length, timeout)
}

/// Solve a cube given on the cubie level.
pub fn solve_cubie(
    cc: &CubieCube,
    max_length: usize,
    timeout: f32,
) -> Result<SolutionResult, Error> {
    cc.verify()?;
    let tables = solver_tables()?;
    solve_with_tables(tables, cc, max_length, timeout)
}

/// Solve with tables owned by the caller, e.g. loaded from a directory of their own.
pub fn solve_with_tables(
    tables: &SolverTables,
    cc: &CubieCube,
    max_length: usize,
    timeout: f32,
) -> Result<SolutionResult, Error> {
    cc.verify()?;
    let timeout = Duration::try_from_secs_f32(timeout.max(0.0)).unwrap_or(Duration::MAX);
    let start_time = Instant::now();
    let mut ctx = SearchContext::new(tables, cc, max_length, timeout, start_time);
    match ctx.run()? {
        Some(solution) => {
            let solve_time = start_time.elapsed();
            debug!("Solved with {} moves in {:?}", solution.len(), solve_time);
            Ok(SolutionResult {
                solution,
                solve_time,
            })
        }
        None => Err(Error::NoSolutionFound(max_length)),
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum Flow {
    Continue,
    Stop,
}

/// The state of one search: the coordinates and move at every depth of the current path and
/// the best maneuver so far.
pub struct SearchContext<'a> {
    tables: &'a SolverTables,
    start: CoordCube,
    cubes: [CoordCube; MAX_DEPTH + 1],
    path: [Move; MAX_DEPTH],
    best: Option<Vec<Move>>,
    max_length: usize,
    timeout: Duration,
    start_time: Instant,
}

impl<'a> SearchContext<'a> {
    pub fn new(
        tables: &'a SolverTables,
        cc: &CubieCube,
        max_length: usize,
        timeout: Duration,
        start_time: Instant,
    ) -> Self {
        let start = CoordCube::from(cc);
        let mut cubes = [CoordCube::default(); MAX_DEPTH + 1];
        cubes[0] = start;
        Self {
            tables,
            start,
            cubes,
            path: [Move::U; MAX_DEPTH],
            best: None,
            max_length: max_length.min(MAX_DEPTH),
            timeout,
            start_time,
        }
    }

    /// Iterative deepening over the phase 1 length. Stops when no shorter maneuver is possible or
    /// the timeout has passed after a first solution.
    pub fn run(&mut self) -> Result<Option<Vec<Move>>, Error> {
        let mut togo1 = 0;
        while togo1 <= self.max_length && self.best.as_ref().map_or(true, |b| togo1 < b.len()) {
            debug!("Phase 1 depth {}", togo1);
            if self.phase1(0, togo1)? == Flow::Stop {
                break;
            }
            togo1 += 1;
        }
        Ok(self.best.take())
    }

    fn phase1(&mut self, depth: usize, togo1: usize) -> Result<Flow, Error> {
        let cc = self.cubes[depth];
        let dist = self.tables.pr.phase1_bound(&cc) as usize;
        if dist > togo1 - depth {
            return Ok(Flow::Continue);
        }
        if depth == togo1 {
            return self.hand_off(depth);
        }
        for m in ALL_MOVES {
            if depth > 0 && m.is_redundant_after(self.path[depth - 1]) {
                continue;
            }
            // In the subgroup with less than 5 moves left, phase 2 generates the phase 2 moves.
            if dist == 0 && togo1 - depth < 5 && m.is_phase2() {
                continue;
            }
            self.cubes[depth + 1] = cc.phase1_move(&self.tables.mv, m);
            self.path[depth] = m;
            if self.phase1(depth + 1, togo1)? == Flow::Stop {
                return Ok(Flow::Stop);
            }
        }
        Ok(Flow::Continue)
    }

    /// Set up the phase 2 coordinates at the end of a phase 1 maneuver and search phase 2.
    fn hand_off(&mut self, depth: usize) -> Result<Flow, Error> {
        if self.best.is_some() && self.start_time.elapsed() > self.timeout {
            return Ok(Flow::Stop);
        }
        let limit = match &self.best {
            Some(best) if best.is_empty() => return Ok(Flow::Stop),
            Some(best) => self.max_length.min(best.len() - 1),
            None => self.max_length,
        };
        let Some(togo2_limit) = limit.checked_sub(depth) else {
            return Ok(Flow::Continue);
        };

        let tables = self.tables;
        let mut cc = self.cubes[depth];
        cc.urfdlf = self.start.urfdlf;
        cc.parity = self.start.parity;
        for &m in &self.path[..depth] {
            cc.urfdlf = tables.mv.apply(Coord::UrfDlf, cc.urfdlf, m);
            cc.parity = tables.mv.apply(Coord::Parity, cc.parity, m);
        }
        // precheck speeds up the computation
        if tables.pr.corner_bound(&cc) as usize > togo2_limit {
            return Ok(Flow::Continue);
        }

        cc.urul = self.start.urul;
        cc.ubdf = self.start.ubdf;
        for &m in &self.path[..depth] {
            cc.urul = tables.mv.apply(Coord::UrUl, cc.urul, m);
            cc.ubdf = tables.mv.apply(Coord::UbDf, cc.ubdf, m);
        }
        cc.urdf = tables.em.merge(cc.urul, cc.ubdf)?;
        self.cubes[depth] = cc;

        let dist2 = tables.pr.phase2_bound(&cc) as usize;
        for togo2 in dist2..=togo2_limit {
            if self.phase2(depth, depth + togo2, depth)? {
                break;
            }
        }
        Ok(Flow::Continue)
    }

    /// Depth first search of phase 2 maneuvers ending at `togo2`. The first move is not checked
    /// against the last phase 1 move, solutions are simplified instead.
    fn phase2(&mut self, depth: usize, togo2: usize, phase1_len: usize) -> Result<bool, Error> {
        let cc = self.cubes[depth];
        let dist = self.tables.pr.phase2_bound(&cc) as usize;
        if dist > togo2 - depth {
            return Ok(false);
        }
        if dist == 0 {
            let solution = simplify(&self.path[..depth]);
            debug!(
                "Found {} moves ({} in phase 1) after {:?}",
                solution.len(),
                phase1_len,
                self.start_time.elapsed()
            );
            self.best = Some(solution);
            return Ok(true);
        }
        for m in PHASE2_MOVES {
            if depth > phase1_len && m.is_redundant_after(self.path[depth - 1]) {
                continue;
            }
            self.cubes[depth + 1] = cc.phase2_move(&self.tables.mv, m)?;
            self.path[depth] = m;
            if self.phase2(depth + 1, togo2, phase1_len)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

#[cfg(test)]
mod test {
    use rand::Rng;

    use crate::cubie::cubes_within;
    use crate::moves::Move::*;
    use crate::moves::{invert, Move};
    use crate::solver::*;

    fn solved_by(cubestring: &str, solution: &[Move]) -> bool {
        let fc = FaceCube::try_from(cubestring).unwrap();
        let cc = CubieCube::try_from(&fc).unwrap().apply_moves(solution);
        cc == CubieCube::default()
    }

    fn cube_string(moves: &[Move]) -> String {
        CubieCube::from(moves).to_string()
    }

    #[test]
    fn test_solve() {
        let cube = "RLLBUFUUUBDURRBBUBRLRRFDFDDLLLUDFLRRDDFRLFDBUBFFLBBDUF";
        let result = solve(cube, 20, 3.0).unwrap();
        assert!(result.solution.len() <= 20);
        assert!(solved_by(cube, &result.solution));
    }

    #[test]
    fn test_solve_scramble() {
        let cube = "BLDBURUDBLBBBRRLFURRDDFDFUDRLFRDULLLRUFLLFUFDRFUUBDFBB";
        let result = solve(cube, 24, 1.0).unwrap();
        assert!(result.solution.len() <= 24);
        assert!(solved_by(cube, &result.solution));
    }

    #[test]
    fn test_solved_cube() {
        let result = solve(SOLVED_FACELETS, 20, 1.0).unwrap();
        assert!(result.solution.is_empty());
    }

    #[test]
    fn test_single_moves() {
        for m in ALL_MOVES {
            let result = solve(&cube_string(&[m]), 20, 1.0).unwrap();
            assert_eq!(result.solution, vec![m.get_inverse()]);
        }
    }

    #[test]
    fn test_short_maneuvers() {
        let result = solve(&cube_string(&[R, U]), 20, 1.0).unwrap();
        assert_eq!(result.solution, vec![U3, R3]);
        let result = solve(&cube_string(&[L, R2]), 20, 1.0).unwrap();
        assert_eq!(result.solution, vec![L3, R2]);
    }

    #[test]
    fn test_random_scrambles() {
        let mut rng = rand::thread_rng();
        for k in 1..=6 {
            let moves: Vec<Move> = (0..k).map(|_| ALL_MOVES[rng.gen_range(0..N_MOVE)]).collect();
            let cube = cube_string(&moves);
            let result = solve(&cube, 20, 10.0).unwrap();
            assert!(result.solution.len() <= k);
            assert!(solved_by(&cube, &result.solution));
            assert_eq!(CubieCube::from(&result.solution), CubieCube::from(&invert(&moves)));
        }
    }

    #[test]
    fn test_optimal_short_distances() {
        let tables = solver_tables().unwrap();
        for (i, (cc, d)) in cubes_within(&ALL_MOVES, 4).into_iter().enumerate() {
            if d == 4 && i % 15 != 0 {
                continue;
            }
            let result = solve_with_tables(tables, &cc, 20, 10.0).unwrap();
            assert_eq!(result.solution.len(), d, "{}", cc);
            assert_eq!(cc.apply_moves(&result.solution), CubieCube::default());
        }
    }

    #[test]
    fn test_no_solution() {
        let cube = "BLDBURUDBLBBBRRLFURRDDFDFUDRLFRDULLLRUFLLFUFDRFUUBDFBB";
        assert!(matches!(solve(cube, 0, 1.0), Err(Error::NoSolutionFound(0))));
        assert!(matches!(
            solve(&cube_string(&[R, U, F]), 2, 1.0),
            Err(Error::NoSolutionFound(2))
        ));
    }

    #[test]
    fn test_malformed_input() {
        let cube = format!("{}U", SOLVED_FACELETS);
        assert!(solve(&cube, 20, 1.0).unwrap_err().is_malformed_input());
        let cube = SOLVED_FACELETS.replacen('R', "U", 1);
        assert!(solve(&cube, 20, 1.0).unwrap_err().is_malformed_input());
        let mut cc = CubieCube::default();
        cc.co[0] = 1;
        assert!(solve_cubie(&cc, 20, 1.0).unwrap_err().is_malformed_input());
    }

    #[test]
    fn test_solver() {
        let cube = cube_string(&[R, U, F2, D3]);
        let goal = cube_string(&[R]);
        let result = solver(&cube, &goal, 20, 1.0).unwrap();
        let fc = FaceCube::try_from(cube.as_str()).unwrap();
        let reached = CubieCube::try_from(&fc).unwrap().apply_moves(&result.solution);
        assert_eq!(reached.to_string(), goal);
        assert!(result.solution.len() <= 3);
    }

    #[test]
    fn test_concurrent_solves() {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                std::thread::spawn(|| {
                    let mut cc = CubieCube::default();
                    cc.randomize();
                    let cube = cc.to_string();
                    let result = solve(&cube, 30, 0.1).unwrap();
                    assert!(solved_by(&cube, &result.solution));
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
    }
}
