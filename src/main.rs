//! gemswap: swap-and-match gem puzzle in the terminal.

mod app;
mod input;
mod theme;
mod ui;

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, ValueEnum};
use gemswap::EngineConfig;
use gemswap::leaderboard;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Options derived from CLI that affect the game outside the engine itself.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub engine: EngineConfig,
    pub time_limit: Duration,
    pub seed: Option<u64>,
    /// Where scores are kept; None keeps them in memory only.
    pub leaderboard_path: Option<PathBuf>,
    pub frame_interval: Duration,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;
    let theme = theme::Theme::load(args.theme.as_deref(), args.palette).unwrap_or_else(|e| {
        warn!(error = %e, "theme file ignored, using the built-in palette");
        eprintln!("gemswap: theme file ignored: {e}");
        theme::Theme::for_palette(args.palette)
    });
    let config = GameConfig {
        engine: EngineConfig {
            size: args.size,
            kinds: args.kinds,
            max_combo: args.max_combo,
            combo_timeout: Duration::from_millis(args.combo_timeout_ms),
            cascade_limit: args.cascade_limit,
        },
        time_limit: Duration::from_secs(args.time_limit),
        seed: args.seed,
        leaderboard_path: if args.no_save {
            None
        } else {
            Some(args.leaderboard.unwrap_or_else(leaderboard::default_path))
        },
        frame_interval: Duration::from_secs_f64(1.0 / args.frame_rate.clamp(1.0, 120.0)),
    };
    config.engine.validate()?;
    let mut app = App::new(config, theme)?;
    app.run()?;
    Ok(())
}

/// Logs go to a file only; the terminal belongs to the board.
fn init_logging(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Swap-and-match gem puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "gemswap",
    version,
    about = "Swap neighbouring gems to line up three or more of a kind before the clock runs out.",
    long_about = "gemswap is a timed match-3 puzzle for the terminal.\n\n\
        Swap two neighbouring gems to line up three or more of the same kind. Threes clear, \
        fours wipe their whole row or column, and fives leave a detonator behind. Set a \
        detonator off to wipe its row and column. Quick successive clears build a combo \
        that adds bonus points.\n\n\
        CONTROLS:\n  Arrows / hjkl  Move cursor   Space / Enter  Select, swap or detonate\n  \
        x              Detonate       Esc            Drop selection\n  \
        r              Restart        q / Ctrl-C     Quit\n\n\
        The leaderboard keeps the top ten scores and is wiped at the top of every hour."
)]
pub struct Args {
    /// Board side length in cells.
    #[arg(short, long, default_value = "8", value_name = "N")]
    pub size: usize,

    /// Number of distinct gem kinds.
    #[arg(short, long, default_value = "4", value_name = "N")]
    pub kinds: u8,

    /// Game length in seconds.
    #[arg(short = 't', long, default_value = "60", value_name = "SECS")]
    pub time_limit: u64,

    /// Combo window: a clear within this many ms of the last one extends the combo.
    #[arg(long, default_value = "5000", value_name = "MS")]
    pub combo_timeout_ms: u64,

    /// Combo ceiling.
    #[arg(long, default_value = "10", value_name = "N")]
    pub max_combo: u32,

    /// Abort a cascade that has not settled after this many rounds.
    #[arg(long, default_value = "100", value_name = "N")]
    pub cascade_limit: usize,

    /// Fixed seed: every game (and restart) deals the same board.
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Path to a theme file of `key = #RRGGBB` lines (token0..token5, detonator, bg, ...).
    #[arg(long, value_name = "FILE")]
    pub theme: Option<PathBuf>,

    /// Colour palette: normal, high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,

    /// Leaderboard file. Defaults to $XDG_CONFIG_HOME/gemswap/leaderboard.
    #[arg(long, value_name = "FILE")]
    pub leaderboard: Option<PathBuf>,

    /// Keep scores in memory only.
    #[arg(long)]
    pub no_save: bool,

    /// Write logs to this file (filter with RUST_LOG, default info).
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Target render frames per second.
    #[arg(long, default_value = "30.0", value_name = "RATE")]
    pub frame_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}
