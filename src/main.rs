//! Renju GUI
//!
//! A graphical interface for playing renju against the AI or another player,
//! plus a headless self-play mode.

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use renju::storage::SaveStore;
use renju::ui::RenjuApp;
use renju::{AiEngine, GameSession, GameSettings, MoveOutcome};

/// Renju with forbidden moves and tiered AI opponents
#[derive(Parser, Debug)]
#[command(name = "renju", version, about, long_about = None)]
struct Args {
    /// Settings file (JSON); defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Play one AI-vs-AI game in the terminal instead of opening a window
    #[arg(long)]
    self_play: bool,

    /// Directory for save slots and the autosave
    #[arg(long, default_value = "./saves")]
    save_dir: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .init();

    let settings = match &args.config {
        Some(path) => GameSettings::load(path)?,
        None => GameSettings::default(),
    };
    info!(?settings, "settings loaded");

    if args.self_play {
        self_play(settings);
        return Ok(());
    }

    let store = SaveStore::new(args.save_dir);
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 750.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Renju"),
        ..Default::default()
    };

    eframe::run_native(
        "Renju",
        options,
        Box::new(move |cc| Ok(Box::new(RenjuApp::new(cc, settings, store)))),
    )?;
    Ok(())
}

/// Both sides played by the AI with the configured tiers
fn self_play(settings: GameSettings) {
    let mut engine = AiEngine::new(settings.rule_config());
    let mut session = GameSession::new(settings);
    for player in [renju::Stone::Black, renju::Stone::White] {
        engine.set_difficulty(player, session.difficulty(player));
    }

    loop {
        let player = session.current_player();
        let mut board = session.board().clone();
        let Some(decision) = engine.compute_move(&mut board, player) else {
            warn!("no move available");
            break;
        };
        println!(
            "{:>3}. {:<5} {:<4} score {:>12.1} ({} ms, {})",
            session.history().len() + 1,
            player.name(),
            decision.notation,
            decision.score,
            decision.thinking_time_ms,
            decision.difficulty
        );

        let (x, y) = (decision.pos.x as i32, decision.pos.y as i32);
        match session.play_ai(x, y, decision.score) {
            Ok(MoveOutcome::Continue) => {}
            Ok(MoveOutcome::Win { winner, .. }) => {
                println!("{} wins after {} moves", winner.name(), session.history().len());
                break;
            }
            Ok(MoveOutcome::Draw) => {
                println!("Draw after {} moves", session.history().len());
                break;
            }
            Err(err) => {
                warn!(%err, "engine move rejected");
                break;
            }
        }
    }
}
