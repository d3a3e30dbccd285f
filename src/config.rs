//! Game tunables.
//!
//! Every constant the simulation uses lives in [`GameConfig`].  Defaults are
//! the stock arcade values; an INI file can override any subset of them.
//!
//! ```ini
//! [car]
//! speed = 3
//!
//! [fuel]
//! decay = 0.03
//! gain = 20
//!
//! [stage]
//! distance = 2000
//! increment = 500
//! final = 5
//! initial_speed = 3
//! speed_increment = 0.5
//! lives = 3
//!
//! [spawn]
//! enemy_chance = 0.015
//! fuel_chance = 0.01
//! max_enemies = 5
//!
//! [timing]
//! fps = 60
//! invincible_ms = 2000
//!
//! [storage]
//! score_file = /home/me/.fuel_rush_score
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use configparser::ini::Ini;
use log::info;

use crate::error::ConfigError;

// ── Canvas & track geometry ──────────────────────────────────────────────────

pub const CANVAS_WIDTH: f32 = 320.0;
pub const CANVAS_HEIGHT: f32 = 480.0;
pub const TRACK_LEFT: f32 = 60.0;
pub const TRACK_RIGHT: f32 = 260.0;
pub const CENTER_LINE_X: f32 = 160.0;

pub const CAR_WIDTH: f32 = 40.0;
pub const CAR_HEIGHT: f32 = 60.0;
pub const CAR_START_X: f32 = 140.0;
pub const CAR_START_Y: f32 = 380.0;

pub const FUEL_SIZE: f32 = 20.0;
pub const FUEL_MAX: f32 = 100.0;

pub const ENEMY_LANES: [f32; 4] = [70.0, 120.0, 170.0, 220.0];
pub const FUEL_LANES: [f32; 3] = [80.0, 140.0, 200.0];
pub const ENEMY_SPAWN_Y: f32 = -100.0;
pub const FUEL_SPAWN_Y: f32 = -20.0;

/// Hit-box shrink applied by the collision test on every side.
pub const COLLISION_MARGIN: f32 = 5.0;

/// Swerving enemies flip direction every this many frames.
pub const SWERVE_PERIOD: u32 = 60;

/// One flicker half-period while invincible.
pub const FLICKER_MS: u128 = 100;

/// Chance per frame (while steering) of an engine cue.
pub const ENGINE_CUE_CHANCE: f64 = 0.3;

// ── Defaults for the tunable set ─────────────────────────────────────────────

const DEFAULT_CAR_SPEED: f32 = 3.0;
const DEFAULT_FUEL_DECAY: f32 = 0.03;
const DEFAULT_FUEL_GAIN: f32 = 20.0;
const DEFAULT_STAGE_DISTANCE: u32 = 2000;
const DEFAULT_STAGE_INCREMENT: u32 = 500;
const DEFAULT_FINAL_STAGE: u32 = 5;
const DEFAULT_INITIAL_SPEED: f32 = 3.0;
const DEFAULT_SPEED_INCREMENT: f32 = 0.5;
const DEFAULT_INITIAL_LIVES: u32 = 3;
const DEFAULT_ENEMY_CHANCE: f64 = 0.015;
const DEFAULT_FUEL_CHANCE: f64 = 0.01;
const DEFAULT_MAX_ENEMIES: usize = 5;
const DEFAULT_FPS: u32 = 60;
const DEFAULT_INVINCIBLE_MS: u64 = 2000;

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Horizontal pixels per frame while a direction is held.
    pub car_speed: f32,
    /// Base fuel lost per frame; scaled by `1 + 0.2 * (stage - 1)`.
    pub fuel_decay: f32,
    pub fuel_gain: f32,
    /// Goal distance of stage 1.
    pub stage_distance: u32,
    /// Added to the goal distance on every stage bump.
    pub stage_increment: u32,
    pub final_stage: u32,
    pub initial_speed: f32,
    pub speed_increment: f32,
    pub initial_lives: u32,
    pub enemy_chance: f64,
    pub fuel_chance: f64,
    pub max_enemies: usize,
    pub fps: u32,
    pub invincible_ms: u64,
    /// Where the high score is stored; `None` means the home-directory default.
    pub score_file: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            car_speed: DEFAULT_CAR_SPEED,
            fuel_decay: DEFAULT_FUEL_DECAY,
            fuel_gain: DEFAULT_FUEL_GAIN,
            stage_distance: DEFAULT_STAGE_DISTANCE,
            stage_increment: DEFAULT_STAGE_INCREMENT,
            final_stage: DEFAULT_FINAL_STAGE,
            initial_speed: DEFAULT_INITIAL_SPEED,
            speed_increment: DEFAULT_SPEED_INCREMENT,
            initial_lives: DEFAULT_INITIAL_LIVES,
            enemy_chance: DEFAULT_ENEMY_CHANCE,
            fuel_chance: DEFAULT_FUEL_CHANCE,
            max_enemies: DEFAULT_MAX_ENEMIES,
            fps: DEFAULT_FPS,
            invincible_ms: DEFAULT_INVINCIBLE_MS,
            score_file: None,
        }
    }
}

impl GameConfig {
    pub fn invincible_duration(&self) -> Duration {
        Duration::from_millis(self.invincible_ms)
    }

    /// Wall-clock length of one frame at the configured rate.
    pub fn frame_duration(&self) -> Duration {
        Duration::from_micros(1_000_000 / u64::from(self.fps.max(1)))
    }

    /// Overlay values from an INI file.  Keys that are missing or do not
    /// parse keep their current value.
    pub fn load_from_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let mut ini = Ini::new();
        ini.load(path).map_err(|reason| ConfigError::Load {
            path: path.to_path_buf(),
            reason,
        })?;
        self.apply_ini(&ini);

        info!(
            "Loaded config from {}: car_speed={}, stages={}, lives={}, fps={}",
            path.display(),
            self.car_speed,
            self.final_stage,
            self.initial_lives,
            self.fps
        );
        Ok(())
    }

    /// Same as [`load_from_file`](Self::load_from_file) but from INI text.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), ConfigError> {
        let mut ini = Ini::new();
        ini.read(text.to_string()).map_err(|reason| ConfigError::Load {
            path: PathBuf::from("<string>"),
            reason,
        })?;
        self.apply_ini(&ini);
        Ok(())
    }

    fn apply_ini(&mut self, ini: &Ini) {
        // Non-finite floats and integers that overflow `u32` are ignored.
        let float = |section: &str, key: &str| {
            ini.getfloat(section, key)
                .ok()
                .flatten()
                .map(|v| v as f32)
                .filter(|v| v.is_finite())
        };
        let uint = |section: &str, key: &str| ini.getuint(section, key).ok().flatten();
        let uint32 = |section: &str, key: &str| uint(section, key).and_then(|v| u32::try_from(v).ok());
        let chance = |section: &str, key: &str| {
            ini.getfloat(section, key)
                .ok()
                .flatten()
                .filter(|v| v.is_finite())
                .map(|v| v.clamp(0.0, 1.0))
        };

        if let Some(v) = float("car", "speed").filter(|v| *v >= 0.0) {
            self.car_speed = v;
        }
        if let Some(v) = float("fuel", "decay").filter(|v| *v >= 0.0) {
            self.fuel_decay = v;
        }
        if let Some(v) = float("fuel", "gain").filter(|v| *v >= 0.0) {
            self.fuel_gain = v;
        }
        if let Some(v) = uint32("stage", "distance") {
            self.stage_distance = v;
        }
        if let Some(v) = uint32("stage", "increment") {
            self.stage_increment = v;
        }
        if let Some(v) = uint32("stage", "final") {
            self.final_stage = v.max(1);
        }
        // Traffic and fuel must always move down the screen.
        if let Some(v) = float("stage", "initial_speed").filter(|v| *v > 0.0) {
            self.initial_speed = v;
        }
        if let Some(v) = float("stage", "speed_increment").filter(|v| *v >= 0.0) {
            self.speed_increment = v;
        }
        if let Some(v) = uint32("stage", "lives") {
            self.initial_lives = v.max(1);
        }
        if let Some(v) = chance("spawn", "enemy_chance") {
            self.enemy_chance = v;
        }
        if let Some(v) = chance("spawn", "fuel_chance") {
            self.fuel_chance = v;
        }
        if let Some(v) = uint("spawn", "max_enemies").and_then(|v| usize::try_from(v).ok()) {
            self.max_enemies = v;
        }
        if let Some(v) = uint32("timing", "fps") {
            self.fps = v.max(1);
        }
        if let Some(v) = uint("timing", "invincible_ms") {
            self.invincible_ms = v;
        }
        if let Some(v) = ini.get("storage", "score_file") {
            self.score_file = Some(PathBuf::from(v));
        }
    }
}
