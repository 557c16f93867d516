//! CLI front-end: flag parsing, board printing, and the human/AI game
//! loop. The engine itself is I/O-free; everything here is a consumer of
//! its public operations.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};

use squava::board::Move;
use squava::engine::{BoardView, Engine};
use squava::notation::{format_square, parse_square};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum PlayerKind {
    Human,
    Mcts,
}

#[derive(Parser, Debug)]
#[command(name = "squava", about = "Three-player Squava: 4-in-a-row wins, 3-in-a-row eliminates")]
struct Args {
    /// Player 1 type
    #[arg(long, value_enum, default_value_t = PlayerKind::Human)]
    p1: PlayerKind,

    /// Player 2 type
    #[arg(long, value_enum, default_value_t = PlayerKind::Human)]
    p2: PlayerKind,

    /// Player 3 type
    #[arg(long, value_enum, default_value_t = PlayerKind::Human)]
    p3: PlayerKind,

    /// MCTS iterations per move
    #[arg(long, default_value_t = 1000)]
    iterations: usize,

    /// Random seed (0 for time-based)
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

const NAMES: [&str; 3] = ["Player 1", "Player 2", "Player 3"];
const SYMBOLS: [char; 3] = ['X', 'O', 'Z'];

fn main() -> ExitCode {
    env_logger::init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "warn"),
    );

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                    ExitCode::SUCCESS
                }
                _ => ExitCode::FAILURE,
            };
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    if args.iterations == 0 {
        bail!("--iterations must be positive");
    }

    let seed = if args.seed == 0 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .context("system clock is before the epoch")?
            .as_nanos() as u64
            | 1
    } else {
        args.seed
    };

    let kinds = [args.p1, args.p2, args.p3];
    let mut engine = Engine::new();
    engine.new_game(seed);
    engine.ai_mut().verbose = true;

    println!("Starting 3-Player Squava!");
    println!("Random Seed: {}", engine.seed());
    println!("Board Size: 8x8");
    println!("Rules: 4-in-a-row wins. 3-in-a-row loses.");

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut move_count = 1usize;

    loop {
        let view = engine.board_view();
        if view.terminal {
            print_board(&view);
            announce_result(&engine, &view);
            return Ok(());
        }

        let mover = view.player_id as usize;
        print_board(&view);
        println!("Move {}: {} ({})", move_count, NAMES[mover], SYMBOLS[mover]);

        let cell = match kinds[mover] {
            PlayerKind::Mcts => {
                println!("{} is thinking...", NAMES[mover]);
                let cell = engine
                    .best_move(Some(args.iterations))
                    .expect("non-terminal state has a move");
                println!(
                    "{} chooses {}",
                    NAMES[mover],
                    format_square(Move::from_index(cell))
                );
                cell
            }
            PlayerKind::Human => prompt_human(&mut input, &engine, mover)?,
        };

        let prev_mask = view.active_mask;
        engine
            .apply_move(cell)
            .expect("validated move was rejected");
        move_count += 1;

        let now_mask = engine.board_view().active_mask;
        if now_mask != prev_mask {
            let gone = (prev_mask & !now_mask).trailing_zeros() as usize;
            println!("Result: {} Eliminated (3-in-a-row)", NAMES[gone]);
        }
    }
}

/// Read moves until one passes the engine's own validation rules.
fn prompt_human(input: &mut impl BufRead, engine: &Engine, mover: usize) -> Result<u8> {
    loop {
        let forced = engine.forced_moves();
        if forced != 0 {
            let cells: Vec<String> = squava::board::moves_from_mask(forced)
                .into_iter()
                .map(format_square)
                .collect();
            println!(
                "FORCED MOVE! You must block the next player. Valid moves: {}",
                cells.join(", ")
            );
        }
        print!(
            "{} ({}), enter your move (e.g., A1): ",
            NAMES[mover], SYMBOLS[mover]
        );
        io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            bail!("stdin closed before the game finished");
        }

        let mv = match parse_square(&line) {
            Ok(mv) => mv,
            Err(_) => {
                println!("Invalid format. Use algebraic (A1).");
                continue;
            }
        };
        let idx = mv.to_index();
        let view = engine.board_view();
        if view.p.iter().fold(0, |acc, p| acc | p) & (1u64 << idx) != 0 {
            println!("Cell already occupied.");
            continue;
        }
        if forced != 0 && forced & (1u64 << idx) == 0 {
            println!("Invalid move. You must block the opponent or win immediately.");
            continue;
        }
        return Ok(idx);
    }
}

fn print_board(view: &BoardView) {
    print!("   ");
    for c in 0..8u8 {
        print!("{} ", (b'A' + c) as char);
    }
    println!();
    for r in 0..8u8 {
        print!("{:2} ", r + 1);
        for c in 0..8u8 {
            let mask = 1u64 << (r * 8 + c);
            let symbol = (0..3)
                .find(|&p| view.p[p] & mask != 0)
                .map(|p| SYMBOLS[p])
                .unwrap_or('.');
            print!("{} ", symbol);
        }
        println!();
    }
}

fn announce_result(engine: &Engine, view: &BoardView) {
    if view.winner_id >= 0 {
        let winner = view.winner_id as usize;
        let (has_run, _) = engine.state().board.check_player(winner as u8);
        if has_run {
            println!("Result: {} Wins (4-in-a-row)", NAMES[winner]);
        } else {
            println!("Result: {} Wins (Last Standing)", NAMES[winner]);
        }
    } else {
        println!("Result: Draw");
    }
}
