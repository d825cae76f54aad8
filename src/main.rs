mod app;
mod audio;

use clap::Parser;
use color_eyre::eyre::WrapErr;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::fs::File;
use std::io::stdout;
use std::path::{Path, PathBuf};

use mini_galaga::GameConfig;

use crate::app::App;
use crate::audio::AudioManager;

#[derive(Parser)]
#[command(name = "mini-galaga")]
#[command(about = "Shoot the falling invaders before they reach the bottom")]
struct Args {
    /// JSON file overriding game constants
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for enemy spawn positions
    #[arg(long)]
    seed: Option<u64>,

    /// Where log output goes; the terminal itself is taken by the game
    #[arg(long, default_value = "mini-galaga.log")]
    log_file: PathBuf,

    /// Disable sound effects
    #[arg(long)]
    mute: bool,

    /// Sound effect volume
    #[arg(long, default_value_t = 0.05)]
    volume: f32,
}

fn init_logging(path: &Path) -> color_eyre::Result<()> {
    let file = File::create(path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    init_logging(&args.log_file)?;

    let config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };

    let audio_manager = if args.mute {
        None
    } else {
        match AudioManager::new(args.volume) {
            Ok(audio) => Some(audio),
            Err(err) => {
                log::warn!("Failed to initialize audio, continuing without sound: {err}");
                None
            }
        }
    };

    // Setup terminal manually for full control
    enable_raw_mode().wrap_err("failed to enable raw mode")?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = App::new(config, args.seed, audio_manager).run(&mut terminal);

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
