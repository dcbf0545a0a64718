use anyhow::{Context, Result};
use clap::Parser;
use simon_says::game::{GameConfig, GameController};
use simon_says::modes::HumanMode;
use simon_says::sound::{SilentPlayer, SoundPlayer, TerminalBell};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "simon_says")]
#[command(version, about = "Color-sequence memory game for the terminal")]
struct Cli {
    /// JSON file with timing settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// How long each pad stays lit during playback (ms)
    #[arg(long)]
    highlight_ms: Option<u64>,

    /// Time between the starts of two playback highlights (ms)
    #[arg(long)]
    sequence_delay_ms: Option<u64>,

    /// Pause after a completed round (ms)
    #[arg(long)]
    round_pause_ms: Option<u64>,

    /// Seed for a reproducible sequence
    #[arg(long)]
    seed: Option<u64>,

    /// Disable the terminal bell
    #[arg(long)]
    mute: bool,

    /// Write logs to this file (the terminal is taken by the game)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => GameConfig::default(),
        };

        if let Some(ms) = self.highlight_ms {
            config.highlight_ms = ms;
        }
        if let Some(ms) = self.sequence_delay_ms {
            config.sequence_delay_ms = ms;
        }
        if let Some(ms) = self.round_pause_ms {
            config.round_pause_ms = ms;
        }

        config.validate().context("Invalid game configuration")?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_tracing(path)?;
    }

    let config = cli.game_config()?;
    tracing::info!(?config, seed = ?cli.seed, "starting");

    let controller = match cli.seed {
        Some(seed) => GameController::seeded(config, seed),
        None => GameController::new(config),
    };
    let sound: Arc<dyn SoundPlayer> = if cli.mute {
        Arc::new(SilentPlayer)
    } else {
        Arc::new(TerminalBell)
    };

    let mut human_mode = HumanMode::new(controller, sound);
    human_mode.run().await?;

    Ok(())
}

fn init_tracing(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();

    Ok(())
}
