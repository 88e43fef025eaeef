use clap::{Parser, Subcommand};
use crossterm::{
    cursor::{MoveLeft, MoveRight, MoveUp},
    execute,
    style::{Attribute, Color as TermColor, SetBackgroundColor, Stylize},
};
use env_logger::TimestampPrecision;
use log::{info, LevelFilter};
use spinners::Spinner;
use std::{
    io::{self, stdout},
    path::PathBuf,
    time::Instant,
};
use twophase::{
    cubie::CubieCube,
    error::Error,
    facelet::{Color, FaceCube},
    scramble::{gen_random_state_scramble, gen_scramble, scramble_from_str, scramble_to_str},
    solver::{solve_with_tables, solver_tables, SolverTables},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
struct Cli {
    /// Increase logging verbosity (can be repeated)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Directory the generated tables are cached in
    #[arg(long, global = true)]
    tables: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "solves the cube using two-phase algorithm")]
    #[clap(group(
    clap::ArgGroup::new("state")
        .required(true)
        .args(&["scramble", "facelet"]),
    ))]
    Solve {
        #[arg(short, long)]
        scramble: Option<String>,

        #[arg(short, long)]
        facelet: Option<String>,

        #[arg(short, long, default_value_t = 20)]
        max: usize,

        #[arg(short, long, default_value_t = 3.0)]
        timeout: f32,

        #[arg(short, long)]
        preview: bool,
    },

    #[command(about = "generates scramble")]
    Scramble {
        #[arg(short, long, default_value_t = 20)]
        number: usize,

        /// Scramble to a uniformly random cube instead of turning random faces
        #[arg(short, long)]
        random_state: bool,

        /// Longest random state scramble
        #[arg(short, long, default_value_t = 24)]
        max: usize,

        #[arg(short, long)]
        preview: bool,
    },
}

/// Run `f` with the tables cached in `dir`, or with the process wide tables.
fn with_tables<T>(
    dir: &Option<PathBuf>,
    f: impl FnOnce(&SolverTables) -> Result<T, Error>,
) -> Result<T, Error> {
    match dir {
        Some(dir) => {
            info!("Caching tables in {}", dir.display());
            f(&SolverTables::new(Some(dir.as_path()))?)
        }
        None => f(solver_tables()?),
    }
}

fn solve(
    scramble: &Option<String>,
    facelet: &Option<String>,
    max: usize,
    timeout: f32,
    preview: bool,
    tables: &Option<PathBuf>,
) -> Result<(), Error> {
    let fc = if let Some(scramble) = scramble {
        let scramble = scramble_from_str(scramble)?;
        FaceCube::from(&CubieCube::from(&scramble))
    } else if let Some(facelet) = facelet {
        FaceCube::try_from(facelet.as_str())?
    } else {
        return Ok(());
    };
    if preview {
        print_facelet(&fc)?;
    }
    let cc = CubieCube::try_from(&fc)?;

    let start = Instant::now();
    let mut spinner = Spinner::new(spinners::Spinners::Dots, "Solving".to_owned());
    let result = with_tables(tables, |t| solve_with_tables(t, &cc, max, timeout));
    let end = Instant::now();

    spinner.stop_with_newline();
    let result = result?;

    println!("Solution: {}", scramble_to_str(&result.solution));
    println!("Move count: {}", result.solution.len());
    println!("Solve time: {:?}", result.solve_time);
    println!("Total time: {:?}", end - start);

    Ok(())
}

fn color_to_termcolor(color: Color) -> TermColor {
    match color {
        Color::U => TermColor::White,
        Color::R => TermColor::Red,
        Color::F => TermColor::Green,
        Color::D => TermColor::Yellow,
        Color::L => TermColor::DarkYellow,
        Color::B => TermColor::Blue,
    }
}

fn print_face(face: &[Color], offset: u16) -> Result<(), io::Error> {
    for i in 0..3 {
        let layer = format!(
            "{}  {}  {}  {}",
            SetBackgroundColor(color_to_termcolor(face[3 * i])),
            SetBackgroundColor(color_to_termcolor(face[(3 * i) + 1])),
            SetBackgroundColor(color_to_termcolor(face[(3 * i) + 2])),
            SetBackgroundColor(TermColor::Reset)
        );

        println!("{layer}");

        if offset != 0 {
            execute!(stdout(), MoveRight(offset))?;
        }
    }

    Ok(())
}

/// Print the cube net, U on top of L F R B, D below.
fn print_facelet(facelet: &FaceCube) -> Result<(), io::Error> {
    let stdout = stdout();

    println!();
    execute!(&stdout, MoveRight(6))?;
    print_face(&facelet.f[0..9], 6)?; // U
    execute!(&stdout, MoveLeft(6))?;
    print_face(&facelet.f[36..45], 0)?; // L
    execute!(&stdout, MoveRight(6), MoveUp(3))?;
    print_face(&facelet.f[18..27], 6)?; // F
    execute!(&stdout, MoveLeft(12), MoveUp(3), MoveRight(12))?;
    print_face(&facelet.f[9..18], 12)?; // R
    execute!(&stdout, MoveLeft(12), MoveUp(3), MoveRight(18))?;
    print_face(&facelet.f[45..54], 18)?; // B
    execute!(&stdout, MoveLeft(12))?;
    print_face(&facelet.f[27..36], 6)?; // D
    execute!(&stdout, MoveLeft(12))?;
    println!();

    Ok(())
}

fn scramble(
    number: usize,
    random_state: bool,
    max: usize,
    preview: bool,
    tables: &Option<PathBuf>,
) -> Result<(), Error> {
    let ss = if random_state {
        with_tables(tables, |t| gen_random_state_scramble(t, max, 1.0))?
    } else {
        gen_scramble(number)
    };
    println!("Scramble: {}", scramble_to_str(&ss));
    if preview {
        let fc = FaceCube::from(&CubieCube::from(&ss));
        print_facelet(&fc)?;
    }
    Ok(())
}

fn main() {
    let program = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match program.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .format_timestamp(Some(TimestampPrecision::Millis))
        .parse_default_env()
        .init();

    let result = match &program.command {
        Some(Commands::Solve {
            scramble,
            facelet,
            max,
            timeout,
            preview,
        }) => solve(scramble, facelet, *max, *timeout, *preview, &program.tables),
        Some(Commands::Scramble {
            number,
            random_state,
            max,
            preview,
        }) => scramble(*number, *random_state, *max, *preview, &program.tables),
        _ => Ok(()),
    };

    if let Err(error) = result {
        let styled = "Error:".with(TermColor::Red).attribute(Attribute::Bold);
        println!("{styled} {error}");
        std::process::exit(1);
    }
}
