//! Xiangqi Bot - plays the engine against itself.
//!
//! Runs one game from the starting layout (or a given FEN), taking early
//! replies from the opening book and searching the rest. Ctrl+C cancels the
//! running search and ends the game.

mod selfplay;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use selfplay::SelfPlay;
use tokio::signal;
use tracing_subscriber::EnvFilter;
use xiangqi_engine::Game;
use xiangqi_openings::{builtin_book, OpeningBook, DEFAULT_MAX_PLIES};
use xiangqi_search::{Difficulty, Engine, SearchConfig};

/// Xiangqi Bot - plays the engine against itself.
#[derive(Parser)]
#[command(name = "xiangqi-bot")]
#[command(about = "Plays a game of xiangqi between two copies of the engine")]
struct Args {
    /// Difficulty preset
    #[arg(long, default_value = "professional")]
    difficulty: Difficulty,

    /// TOML search configuration; overrides --difficulty
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stop after this many plies
    #[arg(long, default_value = "200")]
    max_plies: usize,

    /// Never consult the opening book
    #[arg(long)]
    no_book: bool,

    /// JSON opening book to use instead of the built-in one
    #[arg(long)]
    book: Option<PathBuf>,

    /// Plies for which the opening book is consulted
    #[arg(long, default_value_t = DEFAULT_MAX_PLIES)]
    book_plies: usize,

    /// Starting board in FEN; disables the opening book
    #[arg(long)]
    fen: Option<String>,

    /// Seed for opening book choices
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            tracing::info!("Config: {:?}", path);
            SearchConfig::load(path)?
        }
        None => args.difficulty.config(),
    };
    tracing::info!(
        max_depth = config.max_depth,
        time_limit_ms = config.time_limit_ms,
        quiescence_depth = config.quiescence_depth,
        "Search limits"
    );

    let mut game = match &args.fen {
        Some(fen) => Game::from_fen(fen)?,
        None => Game::new(),
    };

    let book = if args.no_book || args.fen.is_some() {
        None
    } else {
        let book = match &args.book {
            Some(path) => {
                tracing::info!("Opening book: {:?}", path);
                OpeningBook::load(path)?
            }
            None => builtin_book(),
        };
        Some(book.with_max_plies(args.book_plies))
    };

    let engine = Arc::new(Engine::new(config));

    // Shutdown flag
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_clone = Arc::clone(&shutdown);
    let engine_clone = Arc::clone(&engine);
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received");
            shutdown_clone.store(true, Ordering::SeqCst);
            engine_clone.cancel();
        }
    });

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let runner = SelfPlay::new(Arc::clone(&engine), book, args.max_plies);
    let outcome = runner.play(&mut game, &mut rng, &shutdown).await?;

    let record: Vec<&str> = outcome.plies.iter().map(|p| p.wxf.as_str()).collect();
    println!("{}", game.board());
    println!("{}", record.join(" "));
    println!("{}", game.to_fen());

    match outcome.result {
        Some(result) => tracing::info!(%result, plies = game.ply_count(), "Game over"),
        None => tracing::info!(plies = game.ply_count(), "Stopped without a result"),
    }

    Ok(())
}
