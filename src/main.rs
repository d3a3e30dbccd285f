mod display;

use std::fs::OpenOptions;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use log::{error, info, warn};
use rand::thread_rng;

use fuel_rush::audio::SoundSystem;
use fuel_rush::compute::{init_state, loop_control, restart, run_ended, tick, LoopControl};
use fuel_rush::config::GameConfig;
use fuel_rush::entities::GameState;
use fuel_rush::high_score::{default_score_path, HighScoreStore};
use fuel_rush::input::{Command, InputTracker};

use display::Screen;

const DEFAULT_CONFIG_PATH: &str = "./fuel_rush.ini";
const LOG_FILE_NAME: &str = ".fuel_rush.log";

/// Fuel Rush: steer through traffic, grab fuel, clear five stages.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// INI file with game tunables (default: ./fuel_rush.ini if present).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Where the high score is kept (default: ~/.fuel_rush_score).
    #[arg(long, value_name = "PATH")]
    score_file: Option<PathBuf>,

    /// Log file; the terminal itself is taken by the game.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Frames per second.
    #[arg(long)]
    fps: Option<u32>,

    /// Start without sound.
    #[arg(long)]
    mute: bool,
}

fn init_logging(path: &Path) {
    let builder = || env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => builder()
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init(),
        Err(e) => {
            eprintln!("cannot open log file {}: {e}; logging disabled", path.display());
            builder().filter_level(log::LevelFilter::Off).init();
        }
    }
}

fn load_config(cli: &Cli) -> GameConfig {
    let mut config = GameConfig::default();
    let path = cli
        .config
        .clone()
        .or_else(|| Some(PathBuf::from(DEFAULT_CONFIG_PATH)).filter(|p| p.exists()));
    if let Some(path) = path {
        if let Err(e) = config.load_from_file(&path) {
            warn!("{e}; using defaults");
        }
    }
    if let Some(fps) = cli.fps {
        config.fps = fps.max(1);
    }
    if let Some(path) = &cli.score_file {
        config.score_file = Some(path.clone());
    }
    config
}

// ── Title ─────────────────────────────────────────────────────────────────────

/// Returns `true` → start a run, `false` → quit.
fn show_title<W: Write>(
    out: &mut W,
    screen: &mut Screen,
    tracker: &mut InputTracker,
    rx: &mpsc::Receiver<Event>,
    high_score: u32,
) -> std::io::Result<bool> {
    display::render_title(out, screen, high_score)?;

    // Block until the user makes a choice
    while let Ok(ev) = rx.recv() {
        match tracker.apply(&ev, 0) {
            Command::Confirm => return Ok(true),
            Command::Quit => return Ok(false),
            Command::Resize(cols, rows) => {
                screen.resize(cols, rows);
                tracker.set_buttons(screen.buttons());
                display::render_title(out, screen, high_score)?;
            }
            Command::None => {}
        }
    }
    Ok(false)
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs frames until the player quits.  Terminal phases keep rendering; a
/// confirm on them starts a fresh run in place.
fn game_loop<W: Write>(
    out: &mut W,
    screen: &mut Screen,
    tracker: &mut InputTracker,
    rx: &mpsc::Receiver<Event>,
    config: &GameConfig,
    store: &mut HighScoreStore,
    sound: &SoundSystem,
) -> std::io::Result<()> {
    let mut rng = thread_rng();
    let mut state: GameState = init_state(config, store.best());
    let frame_time = config.frame_duration();
    let mut frame: u64 = 0;

    info!("run started (best {})", store.best());

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        let mut control = LoopControl::Continue;
        while let Ok(ev) = rx.try_recv() {
            let command = tracker.apply(&ev, frame);
            if let Command::Resize(cols, rows) = command {
                screen.resize(cols, rows);
                tracker.set_buttons(screen.buttons());
            }
            match loop_control(state.phase, command) {
                LoopControl::Continue => {}
                other => control = other,
            }
        }

        match control {
            LoopControl::Quit => return Ok(()),
            LoopControl::Restart => {
                state = restart(&state, config);
                tracker.clear();
                screen.invalidate();
                info!("run restarted (best {})", state.high_score);
            }
            LoopControl::Continue => {}
        }

        // ── Simulate ──────────────────────────────────────────────────────────
        let now = Instant::now();
        let (next, cues) = tick(&state, tracker.state(frame), now, config, &mut rng);
        if let Some(best) = run_ended(&state, &next) {
            info!("run ended ({:?}) with score {}", next.phase, next.score);
            if let Err(e) = store.submit(best) {
                error!("{e}");
            }
        }
        state = next;
        for cue in cues {
            sound.play(cue);
        }

        display::render(out, screen, &state, now)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    let cli = Cli::parse();
    let log_path = cli
        .log_file
        .clone()
        .unwrap_or_else(|| default_score_path().with_file_name(LOG_FILE_NAME));
    init_logging(&log_path);
    info!("fuel_rush {} starting", env!("CARGO_PKG_VERSION"));

    let config = load_config(&cli);
    let score_path = config.score_file.clone().unwrap_or_else(default_score_path);

    let mut store = HighScoreStore::open(score_path);

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = run(&mut out, &rx, &config, &mut store, cli.mute);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        error!("terminal error: {e}");
    }
    info!("bye");
    result
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &GameConfig,
    store: &mut HighScoreStore,
    mute: bool,
) -> std::io::Result<()> {
    let (cols, rows) = terminal::size()?;
    let mut screen = Screen::new(cols, rows);
    let mut tracker = InputTracker::new();
    tracker.set_buttons(screen.buttons());

    if !show_title(out, &mut screen, &mut tracker, rx, store.best())? {
        return Ok(());
    }

    // Audio starts on the first real interaction, like the title asks.
    let mut sound = if mute {
        SoundSystem::disabled()
    } else {
        SoundSystem::init()
    };
    sound.start_music();

    screen.invalidate();
    tracker.clear();
    let result = game_loop(out, &mut screen, &mut tracker, rx, config, store, &sound);

    sound.stop_music();
    sound.shutdown();
    result
}
