//! Solves a text maze and animates the search in the terminal.
use std::io::IsTerminal;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anstream::eprintln;
use anstream::print;
use clap::Parser;
use owo_colors::OwoColorize;

use maze_search::Error;
use maze_search::algorithms::solver::Solver;
use maze_search::algorithms::strategy::NeighbourOrder;
use maze_search::algorithms::strategy::Strategy;
use maze_search::observer::Headless;
use maze_search::problems::grid::Grid;
use maze_search::renderer::GridView;
use maze_search::renderer::TerminalRenderer;
use maze_search::solution::Solution;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Command line arguments
#[derive(Parser, Debug)]
#[clap(long_version = maze_search::build::CLAP_LONG_VERSION)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Maze file. 'A' is the start, 'B' the goal, ' ' is floor and anything
    /// else is a wall.
    #[arg()]
    pub maze: PathBuf,

    #[arg(short, long, env = "MAZE_STRATEGY", value_enum, default_value_t = Strategy::BreadthFirst)]
    pub strategy: Strategy,

    /// Pause between frames. Defaults to 10ms for uninformed search and
    /// 100ms for greedy search.
    #[arg(short, long, env = "MAZE_DELAY_MS")]
    pub delay_ms: Option<u64>,

    /// Seeds the neighbour shuffle.
    #[arg(long, env = "MAZE_SEED", conflicts_with = "fixed_order")]
    pub seed: Option<u64>,

    /// Expand neighbours up, down, left, right instead of shuffling them.
    #[arg(long)]
    pub fixed_order: bool,

    /// Only print the solved maze.
    #[arg(long)]
    pub headless: bool,

    #[command(flatten)]
    color: colorchoice_clap::Color,
}

fn write_summary(
    mut out: impl Write,
    solution: &Solution,
    num_explored: usize,
) -> std::io::Result<()> {
    writeln!(out, "goal found!")?;
    writeln!(out)?;
    writeln!(out, "path distance: {}", solution.len())?;
    writeln!(out)?;
    writeln!(out, "node explored: {num_explored}")?;
    out.flush()
}

fn run(args: &Args) -> Result<(), Error> {
    let grid = Grid::load(args.maze.as_path())?;
    log::info!("Loaded {:?} from {:?}", grid, args.maze);

    let order = match (args.fixed_order, args.seed) {
        (true, _) => NeighbourOrder::Fixed,
        (false, Some(seed)) => NeighbourOrder::seeded(seed),
        (false, None) => NeighbourOrder::random(),
    };
    let mut solver = Solver::new(&grid, args.strategy, order);

    // Cursor controls only mean something on a terminal.
    let animate = !args.headless && std::io::stdout().is_terminal();
    if !args.headless && !animate {
        log::info!("stdout is not a terminal, printing the solved maze only");
    }

    let solution = if animate {
        let delay = args
            .delay_ms
            .map(Duration::from_millis)
            .unwrap_or_else(|| args.strategy.default_delay());
        // The raw stream keeps the cursor controls that anstream would strip.
        let stdout = std::io::stdout();
        let colored = anstream::AutoStream::choice(&stdout) != anstream::ColorChoice::Never;
        let mut renderer = TerminalRenderer::new(stdout.lock(), delay).with_color(colored);
        solver.solve(&mut renderer)?
    } else {
        let solution = solver.solve(&mut Headless)?;
        print!("{}", GridView::new(&grid).with_solution(&solution));
        solution
    };

    write_summary(anstream::stdout().lock(), &solution, solver.num_explored())?;

    if log::log_enabled!(log::Level::Debug) {
        solver.write_memory_stats(std::io::stderr().lock())?;
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    args.color.write_global();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
