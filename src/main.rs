//! # Cascade Main Entry Point
//!
//! Runs a headless match-3 session: either a scripted list of swaps or an
//! autoplayer that picks productive swaps, printing the board as it goes.

use cascade::{
    describe_event, parse_swap, productive_swaps, render_board, render_status, CascadeError, CascadeResult,
    GameState, LevelCatalog, LevelData, MessageLog, Position, ScoreRules, SwapRequest,
};
use clap::{Parser, ValueEnum};
use log::{debug, error, info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Point values used for scoring.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Scoring {
    Light,
    Classic,
}

/// Command line arguments for the Cascade engine.
#[derive(Parser, Debug)]
#[command(name = "cascade")]
#[command(about = "A match-3 puzzle engine with cascading resolution and special pieces")]
#[command(version)]
struct Args {
    /// Random seed for board generation and refills
    #[arg(short, long)]
    seed: Option<u64>,

    /// Board width (ignored when a level file is given)
    #[arg(long, default_value_t = cascade::config::DEFAULT_BOARD_WIDTH)]
    width: i32,

    /// Board height (ignored when a level file is given)
    #[arg(long, default_value_t = cascade::config::DEFAULT_BOARD_HEIGHT)]
    height: i32,

    /// Number of piece colors (ignored when a level file is given)
    #[arg(long, default_value_t = 5)]
    colors: usize,

    /// JSON file with level definitions
    #[arg(long)]
    levels: Option<std::path::PathBuf>,

    /// Level number to play from the level file
    #[arg(long)]
    level: Option<u32>,

    /// Maximum autoplay turns when no swaps are scripted
    #[arg(long, default_value_t = 20)]
    turns: u32,

    /// Scripted swap "x1,y1:x2,y2"; repeat for several turns
    #[arg(long = "swap")]
    swaps: Vec<String>,

    /// Scoring preset
    #[arg(long, value_enum, default_value_t = Scoring::Light)]
    scoring: Scoring,

    /// Only print the final summary
    #[arg(short, long)]
    quiet: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() {
    let args = Args::parse();
    initialize_logging(&args.log_level);

    if let Err(err) = run(&args) {
        error!("{}", err);
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

/// Initializes env_logger; RUST_LOG still overrides the flag.
fn initialize_logging(log_level: &str) {
    let level = match log_level.to_lowercase().as_str() {
        "error" => log::LevelFilter::Error,
        "warn" => log::LevelFilter::Warn,
        "info" => log::LevelFilter::Info,
        "debug" => log::LevelFilter::Debug,
        "trace" => log::LevelFilter::Trace,
        _ => log::LevelFilter::Warn,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .format_target(false)
        .parse_default_env()
        .init();
}

fn run(args: &Args) -> CascadeResult<()> {
    let seed = args.seed.unwrap_or_else(rand::random);
    info!("Starting Cascade v{} with seed {}", cascade::VERSION, seed);

    let level = select_level(args)?;
    let rules = match args.scoring {
        Scoring::Light => ScoreRules::light(),
        Scoring::Classic => ScoreRules::classic(),
    };
    let mut game = GameState::new(level, rules, seed)?;
    let mut log = MessageLog::default();

    if !args.quiet {
        println!("{}", render_status(&game));
        println!("{}\n", render_board(game.board()));
    }

    let script = args
        .swaps
        .iter()
        .map(|text| parse_swap(text))
        .collect::<CascadeResult<Vec<SwapRequest>>>()?;

    if script.is_empty() {
        autoplay(&mut game, &mut log, args, seed)?;
    } else {
        for swap in script {
            if game.is_game_ended() {
                warn!("level over, ignoring remaining swaps");
                break;
            }
            play_turn(&mut game, &mut log, swap, args.quiet);
        }
    }

    println!("{}", render_status(&game));
    println!("{}", serde_json::to_string_pretty(game.statistics())?);
    Ok(())
}

/// Picks the level: from the catalog when given, otherwise the test level
/// sized by the command line.
fn select_level(args: &Args) -> CascadeResult<LevelData> {
    match &args.levels {
        Some(path) => {
            let mut catalog = LevelCatalog::load_file(path)?;
            if let Some(number) = args.level {
                catalog.load_by_number(number)?;
            }
            Ok(catalog.current().clone())
        }
        None => {
            if args.level.is_some() {
                return Err(CascadeError::InvalidConfig(
                    "--level needs --levels".to_string(),
                ));
            }
            let level = LevelData {
                board_width: args.width,
                board_height: args.height,
                gem_colors: args.colors,
                ..LevelData::test_level()
            };
            level.validate()?;
            Ok(level)
        }
    }
}

/// Plays productive swaps (random when none exists) until the level ends or
/// the turn budget runs out.
fn autoplay(game: &mut GameState, log: &mut MessageLog, args: &Args, seed: u64) -> CascadeResult<()> {
    let mut rng = StdRng::seed_from_u64(seed ^ 0x5eed);
    for turn in 0..args.turns {
        if game.is_game_ended() {
            break;
        }
        let swap = match productive_swaps(game.board()).choose(&mut rng) {
            Some(&(from, to)) => SwapRequest::new(from, to),
            None => random_swap(game, &mut rng)?,
        };
        debug!("autoplay turn {}: {}", turn + 1, swap);
        play_turn(game, log, swap, args.quiet);
    }
    Ok(())
}

fn random_swap(game: &GameState, rng: &mut StdRng) -> CascadeResult<SwapRequest> {
    let board = game.board();
    if board.width() < 2 {
        return Err(CascadeError::InvalidState("board too narrow to swap".to_string()));
    }
    let from = Position::new(rng.gen_range(0..board.width() - 1), rng.gen_range(0..board.height()));
    Ok(SwapRequest::new(from, Position::new(from.x + 1, from.y)))
}

fn play_turn(game: &mut GameState, log: &mut MessageLog, swap: SwapRequest, quiet: bool) {
    match game.run_turn(swap.from, swap.to) {
        Ok(report) => {
            log.record_events(&report.events);
            if !quiet {
                let described = report.events.iter().filter_map(describe_event).count();
                println!("swap {} (+{} points)", swap, report.points);
                for message in log.recent(described.min(5)) {
                    println!("  {}", message);
                }
                println!("{}", render_status(game));
                println!("{}\n", render_board(game.board()));
            }
        }
        Err(err) => {
            warn!("swap {} refused: {}", swap, err);
            if !quiet {
                println!("swap {} refused: {}", swap, err);
            }
        }
    }
}
