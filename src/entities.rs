/// All game entity types: plain data plus the few per-entity rules
/// (sizes, speeds, invincibility queries) that do not need the whole state.

use std::time::Instant;

use crate::collision::Rect;
use crate::config::{
    GameConfig, CAR_HEIGHT, CAR_START_X, CAR_START_Y, CAR_WIDTH, FLICKER_MS, FUEL_MAX, FUEL_SIZE,
};

// ── Colours ───────────────────────────────────────────────────────────────────

/// A 24-bit colour, kept free of any terminal type so the simulation does not
/// depend on the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    /// Blend `self` over `under` at `alpha` (0.0 = `under`, 1.0 = `self`).
    pub fn blend(self, under: Rgb, alpha: f32) -> Rgb {
        let mix = |a: u8, b: u8| (a as f32 * alpha + b as f32 * (1.0 - alpha)).round() as u8;
        Rgb(mix(self.0, under.0), mix(self.1, under.1), mix(self.2, under.2))
    }
}

/// Road and verge colours for one stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StageTheme {
    pub road: Rgb,
    pub background: Rgb,
}

/// Forest, desert, snow, night, forest again.
pub const STAGE_THEMES: [StageTheme; 5] = [
    StageTheme { road: Rgb(0x44, 0x44, 0x44), background: Rgb(0x22, 0x8B, 0x22) },
    StageTheme { road: Rgb(0xC2, 0xB2, 0x80), background: Rgb(0xED, 0xC9, 0xAF) },
    StageTheme { road: Rgb(0xDD, 0xDD, 0xDD), background: Rgb(0xFF, 0xFF, 0xFF) },
    StageTheme { road: Rgb(0x22, 0x22, 0x22), background: Rgb(0x00, 0x00, 0x00) },
    StageTheme { road: Rgb(0x44, 0x44, 0x44), background: Rgb(0x22, 0x8B, 0x22) },
];

/// Theme for a 1-based stage; wraps past the end of the table.
pub fn theme_for(stage: u32) -> StageTheme {
    STAGE_THEMES[(stage.saturating_sub(1) as usize) % STAGE_THEMES.len()]
}

// ── Enums ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyKind {
    Normal,
    Fast,
    Truck,
}

/// Horizontal-motion rule of an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pattern {
    Straight,
    Zigzag,
    Swerve,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Playing,
    GameOver,
    /// Final stage cleared.
    Ending,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        self != Phase::Playing
    }
}

// ── Player car ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Car {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    /// Collisions are ignored until this instant.
    pub invincible_until: Option<Instant>,
}

impl Car {
    pub fn new() -> Self {
        Car {
            x: CAR_START_X,
            y: CAR_START_Y,
            w: CAR_WIDTH,
            h: CAR_HEIGHT,
            invincible_until: None,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    pub fn reset_position(&mut self) {
        self.x = CAR_START_X;
        self.y = CAR_START_Y;
    }

    pub fn is_invincible(&self, now: Instant) -> bool {
        self.invincible_until.is_some_and(|until| now < until)
    }

    /// True on the "dim" half of the invincibility flicker.
    pub fn flicker_dim(&self, now: Instant) -> bool {
        match self.invincible_until {
            Some(until) if now < until => {
                let remaining = until.duration_since(now).as_millis();
                (remaining / FLICKER_MS) % 2 == 1
            }
            _ => false,
        }
    }
}

impl Default for Car {
    fn default() -> Self {
        Self::new()
    }
}

// ── Fuel pickup ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Fuel {
    pub x: f32,
    pub y: f32,
}

impl Fuel {
    pub fn new(x: f32, y: f32) -> Self {
        Fuel { x, y }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, FUEL_SIZE, FUEL_SIZE)
    }
}

// ── Traffic ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub kind: EnemyKind,
    pub pattern: Pattern,
    pub color: Rgb,
    /// Pixels per frame, already adjusted for `kind`.
    pub speed: f32,
    /// Swerve direction, +1.0 or -1.0.
    pub dir: f32,
    /// Frames since spawn, used by the swerve pattern.
    pub counter: u32,
}

impl Enemy {
    /// Build an enemy of `kind` at the current game speed.  Trucks are big
    /// and slow, fast cars outrun the road.
    pub fn new(x: f32, y: f32, kind: EnemyKind, base_speed: f32, pattern: Pattern) -> Self {
        let (w, h, color, speed) = match kind {
            EnemyKind::Truck => (60.0, 100.0, Rgb(0x80, 0x80, 0x80), base_speed - 1.0),
            EnemyKind::Fast => (40.0, 60.0, Rgb(0xFF, 0xFF, 0x00), base_speed + 2.0),
            EnemyKind::Normal => (40.0, 60.0, Rgb(0x00, 0x00, 0xFF), base_speed),
        };
        Enemy {
            x,
            y,
            w,
            h,
            kind,
            pattern,
            color,
            speed,
            dir: 1.0,
            counter: 0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// The two steering flags, however they were produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
}

impl InputState {
    pub fn is_moving(&self) -> bool {
        self.left || self.right
    }
}

// ── Sound cues ────────────────────────────────────────────────────────────────

/// Fire-and-forget sound requests produced by a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundCue {
    Engine,
    Collision,
    FuelPickup,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire state of one run.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub car: Car,
    pub fuels: Vec<Fuel>,
    pub enemies: Vec<Enemy>,
    /// Frames survived this run.
    pub score: u32,
    /// Best score including this run, committed when a run ends.
    pub high_score: u32,
    /// 0.0 ..= 100.0
    pub fuel: f32,
    pub stage: u32,
    pub distance: u32,
    pub goal_distance: u32,
    pub lives: u32,
    /// Road scroll rate in pixels per frame; fuel and traffic derive from it.
    pub speed: f32,
    /// Accumulated scroll used to animate the centre line.
    pub road_offset: f32,
    pub phase: Phase,
    pub frame: u64,
}

impl GameState {
    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }

    /// Fuel as a bar width percentage, never negative.
    pub fn fuel_percent(&self) -> f32 {
        self.fuel.clamp(0.0, FUEL_MAX)
    }

    pub fn theme(&self) -> StageTheme {
        theme_for(self.stage)
    }

    pub fn is_final_stage(&self, config: &GameConfig) -> bool {
        self.stage >= config.final_stage
    }
}
