use anyhow::Result;
use clap::Parser;
use indicatif::ProgressBar;
use tracing::{info, Level};

use std::io::{stdin, stdout, Write};
use std::thread;
use std::time::Duration;

use connect4_alphabeta::arrayboard::ArrayBoard;
use connect4_alphabeta::eval::{is_loss, is_win};
use connect4_alphabeta::solver::MIN_DEPTH;
use connect4_alphabeta::*;

/// Play Connect 4 against an iterative-deepening alpha-beta agent
#[derive(Parser)]
#[command(name = "connect4", about = "Play Connect 4 against an alpha-beta search agent")]
struct Cli {
    /// Starting position as 1-indexed column digits, e.g. 4453
    #[arg(long, default_value = "")]
    moves: String,

    /// Let the agent play for player 1
    #[arg(long)]
    ai_one: bool,

    /// Let the agent play for player 2
    #[arg(long)]
    ai_two: bool,

    /// Thinking time per agent move, in milliseconds
    #[arg(long, default_value_t = 1000)]
    think_ms: u64,

    /// Depth of the first search iteration
    #[arg(long, default_value_t = MIN_DEPTH)]
    min_depth: usize,

    /// Stop deepening after this depth
    #[arg(long)]
    max_depth: Option<usize>,

    /// Log search progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    let mut board = ArrayBoard::from_moves(&cli.moves)?;
    let config = SolverConfig {
        min_depth: cli.min_depth,
        max_depth: cli.max_depth,
        ..SolverConfig::default()
    };
    // reject a bad configuration before the game starts
    Solver::with_config(config)?;

    let stdin = stdin();

    println!("Welcome to Connect 4\n");

    // game loop
    loop {
        board.display()?;

        match board.state() {
            GameState::Playing => {
                let agent_to_move = match board.active_player() {
                    Player::One => cli.ai_one,
                    Player::Two => cli.ai_two,
                };

                let next_move = if agent_to_move {
                    // slow down play if both players are AI
                    if cli.ai_one && cli.ai_two {
                        thread::sleep(Duration::from_secs(1));
                    }
                    agent_move(&board, config, cli.think_ms)? + 1

                // human player
                } else {
                    print!("Move input > ");
                    stdout().flush()?;
                    let mut input_str = String::new();
                    if stdin.read_line(&mut input_str)? == 0 {
                        // stdin closed
                        return Ok(());
                    }

                    match input_str.trim().parse::<usize>() {
                        Err(_) => {
                            println!("Invalid number: {}", input_str.trim());
                            continue;
                        }
                        Ok(column) => column,
                    }
                };

                if let Err(err) = board.play_checked(next_move) {
                    println!("{}", err);
                    // try the move again
                    continue;
                }
            }

            // end states
            GameState::Won(player) => {
                println!("{} wins!", player);
                info!(moves = board.moves(), "game over");
                break;
            }
            GameState::Draw => {
                println!("Draw!");
                info!(moves = board.moves(), "game over");
                break;
            }
        }
    }
    Ok(())
}

/// Searches for `think_ms` and returns the zero-indexed column chosen
fn agent_move(board: &ArrayBoard, config: SolverConfig, think_ms: u64) -> Result<usize> {
    // a fresh token per move, so a late timer cannot cancel the next search
    let cancel = CancelToken::new();
    let mut solver = Solver::with_config(config)?.with_cancel_token(cancel.clone());

    let timer = cancel.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_millis(think_ms));
        timer.cancel();
    });

    let spinner = ProgressBar::new_spinner();
    spinner.enable_steady_tick(100);
    spinner.set_message("AI is thinking...");

    let selection = solver.solve(board, |selection| {
        spinner.set_message(&format!(
            "AI is thinking... depth {}, best move {}",
            selection.depth,
            selection.column + 1
        ));
    })?;
    spinner.finish_and_clear();

    let player = board.active_player();
    if is_win(selection.value) {
        println!("{} can force a win.", player);
    } else if is_loss(selection.value) {
        println!("{} can force a win.", player.other());
    }
    println!(
        "Best move: {} (searched to depth {}, {} positions)",
        selection.column + 1,
        selection.depth,
        solver.node_count
    );
    Ok(selection.column)
}
