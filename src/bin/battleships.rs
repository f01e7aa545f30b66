//! Demo CLI exercising the battleships engine end to end: generate a
//! puzzle at a requested size/difficulty, print it, optionally verify it
//! with the exhaustive solver, or decode-and-solve an existing puzzle
//! description string. The host process itself (menus, rendering, move
//! input) is out of scope (§1); this is developer-facing crate hygiene,
//! grounded on `justinpombrio-solvomatic`'s own `argh`-derived `Config`
//! dispatching to library calls, and the teacher's own `main`/`game`
//! demo function.

use argh::FromArgs;
use tracing::info;

use battleships_engine::config::Parameters;
use battleships_engine::exhaustive_solver;
use battleships_engine::generator;
use battleships_engine::logical_solver::{self, Difficulty};
use battleships_engine::protocol;
use battleships_engine::rng::StdPuzzleRng;
use battleships_engine::validator;

/// Battleships puzzle engine demo CLI.
#[derive(Debug, FromArgs)]
struct Cli {
    #[argh(subcommand)]
    command: Command,
}

#[derive(Debug, FromArgs)]
#[argh(subcommand)]
enum Command {
    Generate(GenerateArgs),
    Solve(SolveArgs),
}

/// generate a puzzle, print it, and grade it
#[derive(Debug, FromArgs)]
#[argh(subcommand, name = "generate")]
struct GenerateArgs {
    /// grid height (7..=25)
    #[argh(option, default = "10")]
    height: usize,

    /// grid width (7..=25)
    #[argh(option, default = "10")]
    width: usize,

    /// difficulty level: 0=Basic, 1=Intermediate, 2=Advanced, 3=Unreasonable
    #[argh(option, default = "0")]
    difficulty: i32,

    /// RNG seed, for reproducible generation
    #[argh(option)]
    seed: Option<u64>,

    /// also run the exhaustive solver over the generated clues
    #[argh(switch)]
    verify: bool,
}

/// decode a puzzle description string and exhaustively solve it
#[derive(Debug, FromArgs)]
#[argh(subcommand, name = "solve")]
struct SolveArgs {
    /// grid height
    #[argh(option)]
    height: usize,

    /// grid width
    #[argh(option)]
    width: usize,

    /// the puzzle description string (§6.2)
    #[argh(positional)]
    description: String,

    /// recursive call budget for the exhaustive solver
    #[argh(option, default = "500_000")]
    call_limit: usize,
}

fn main() {
    tracing_subscriber::fmt::init();
    let cli: Cli = argh::from_env();
    match cli.command {
        Command::Generate(args) => run_generate(args),
        Command::Solve(args) => run_solve(args),
    }
}

fn run_generate(args: GenerateArgs) {
    let params = match Parameters::validate(args.height, args.width, args.difficulty) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("invalid parameters: {e}");
            std::process::exit(1);
        }
    };

    let mut rng = match args.seed {
        Some(seed) => StdPuzzleRng::from_seed(seed),
        None => StdPuzzleRng::from_entropy(),
    };

    let puzzle = generator::generate(&params, &mut rng);
    info!(
        fast_return = puzzle.fast_return_used,
        ships = ?puzzle.clues.ships,
        "generated puzzle"
    );

    println!("Solution:");
    print!("{}", puzzle.solution.to_board(&puzzle.clues).render());
    println!("Puzzle description string:");
    println!("{}", protocol::render_puzzle_description(&puzzle.clues));

    let ground_truth = puzzle.solution.to_board(&puzzle.clues);
    let report = validator::validate(&puzzle.clues, &ground_truth);
    println!("Validator on ground truth: solved={}", report.solved);

    if args.verify {
        match exhaustive_solver::solve(&puzzle.clues, args.call_limit) {
            Ok(_) => println!("Exhaustive solver: unique solution confirmed."),
            Err(e) => println!("Exhaustive solver: {e}"),
        }
        let logical = logical_solver::solve(&puzzle.clues, Difficulty::Unreasonable);
        println!(
            "Logical solver (fully advanced): {:?}, {}/{} occupied",
            logical.status,
            logical.occ_count,
            puzzle.clues.ships_sum()
        );
    }
}

fn run_solve(args: SolveArgs) {
    let clues = match protocol::parse_puzzle_description(&args.description, args.height, args.width) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("invalid puzzle description: {e}");
            std::process::exit(1);
        }
    };

    match exhaustive_solver::solve(&clues, args.call_limit) {
        Ok(solution) => println!("{}", protocol::render_solver_move(&clues, &solution)),
        Err(e) => {
            println!("{e}");
            std::process::exit(1);
        }
    }
}
