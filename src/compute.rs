/// Game-logic functions.
///
/// [`tick`] takes an immutable reference to the current `GameState` and
/// returns a brand-new one together with the sound cues the frame produced.
/// Side effects are limited to the injected RNG; time enters only through the
/// `now` instant the caller samples once per frame.

use std::time::Instant;

use log::info;
use rand::Rng;

use crate::collision::collides;
use crate::config::{
    GameConfig, CANVAS_HEIGHT, COLLISION_MARGIN, ENGINE_CUE_CHANCE, FUEL_MAX, SWERVE_PERIOD,
    TRACK_LEFT, TRACK_RIGHT,
};
use crate::entities::{Car, Enemy, Fuel, GameState, InputState, Pattern, Phase, SoundCue};
use crate::input::Command;
use crate::spawner::{maybe_spawn_enemy, maybe_spawn_fuel};

/// Vertical distance over which a zigzagging enemy completes one radian.
const ZIGZAG_WAVELENGTH: f32 = 30.0;
/// Horizontal pixels per frame for zigzag amplitude and swerve drift.
const LATERAL_STEP: f32 = 2.0;
/// Extra fuel decay per stage past the first, as a fraction of the base.
const DECAY_PER_STAGE: f32 = 0.2;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the state of a fresh run.
pub fn init_state(config: &GameConfig, high_score: u32) -> GameState {
    GameState {
        car: Car::new(),
        fuels: Vec::new(),
        enemies: Vec::new(),
        score: 0,
        high_score,
        fuel: FUEL_MAX,
        stage: 1,
        distance: 0,
        goal_distance: config.stage_distance,
        lives: config.initial_lives,
        speed: config.initial_speed,
        road_offset: 0.0,
        phase: Phase::Playing,
        frame: 0,
    }
}

/// Throw away the current run and start over, keeping the best score.
pub fn restart(state: &GameState, config: &GameConfig) -> GameState {
    init_state(config, state.high_score.max(state.score))
}

// ── Outer loop decision ──────────────────────────────────────────────────────

/// What the frame loop does next.  Independent of rendering: terminal phases
/// keep rendering with `Continue` until an explicit restart or quit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Restart,
    Quit,
}

/// Decide the loop's next step from one input command.  A confirm only
/// restarts once the run is over.
pub fn loop_control(phase: Phase, command: Command) -> LoopControl {
    match command {
        Command::Quit => LoopControl::Quit,
        Command::Confirm if phase.is_terminal() => LoopControl::Restart,
        _ => LoopControl::Continue,
    }
}

/// The best score to persist if `next` is the frame where the run ended.
pub fn run_ended(prev: &GameState, next: &GameState) -> Option<u32> {
    if !prev.phase.is_terminal() && next.phase.is_terminal() {
        Some(next.high_score)
    } else {
        None
    }
}

// ── Movement (pure) ──────────────────────────────────────────────────────────

fn clamp_to_track(x: f32, w: f32) -> f32 {
    x.max(TRACK_LEFT).min(TRACK_RIGHT - w)
}

/// Steer the car one frame.  Both flags held cancel out.
pub fn move_car(car: &Car, input: InputState, speed: f32) -> Car {
    let mut x = car.x;
    if input.left {
        x -= speed;
    }
    if input.right {
        x += speed;
    }
    Car {
        x: clamp_to_track(x, car.w),
        ..car.clone()
    }
}

pub fn move_fuel(fuel: &Fuel, speed: f32) -> Fuel {
    Fuel {
        y: fuel.y + speed,
        ..fuel.clone()
    }
}

pub fn move_enemy(enemy: &Enemy) -> Enemy {
    let mut e = enemy.clone();
    e.y += e.speed;
    match e.pattern {
        Pattern::Straight => {}
        Pattern::Zigzag => {
            e.x += (e.y / ZIGZAG_WAVELENGTH).sin() * LATERAL_STEP;
        }
        Pattern::Swerve => {
            e.counter += 1;
            if e.counter % SWERVE_PERIOD == 0 {
                e.dir = -e.dir;
            }
            e.x = clamp_to_track(e.x + e.dir * LATERAL_STEP, e.w);
        }
    }
    e
}

// ── Bookkeeping ──────────────────────────────────────────────────────────────

/// Record the current score as the best if it beats it.
pub fn commit_high_score(state: &mut GameState) {
    if state.score > state.high_score {
        state.high_score = state.score;
    }
}

/// Take one life.  The last one ends the run; otherwise the car goes back to
/// the start line and ignores traffic for the invincibility window.
pub fn lose_life(state: &mut GameState, now: Instant, config: &GameConfig) {
    state.lives = state.lives.saturating_sub(1);
    if state.lives == 0 {
        state.phase = Phase::GameOver;
        commit_high_score(state);
        info!("game over: score {}, stage {}", state.score, state.stage);
        return;
    }
    state.car.invincible_until = Some(now + config.invincible_duration());
    state.car.reset_position();
    info!("life lost, {} left", state.lives);
}

/// Move on to the next stage: longer, faster, and with an empty road.
pub fn next_stage(state: &mut GameState, config: &GameConfig) {
    state.stage += 1;
    state.distance = 0;
    state.goal_distance += config.stage_increment;
    state.speed += config.speed_increment;
    state.fuels.clear();
    state.enemies.clear();
    info!(
        "stage {} (goal {}, speed {})",
        state.stage, state.goal_distance, state.speed
    );
}

/// Fuel burnt per frame on `stage`.
pub fn fuel_decay(stage: u32, config: &GameConfig) -> f32 {
    config.fuel_decay * (1.0 + DECAY_PER_STAGE * stage.saturating_sub(1) as f32)
}

/// Finish the stage if its goal distance has been passed.
pub fn advance_progress(state: &mut GameState, config: &GameConfig) {
    if state.distance <= state.goal_distance {
        return;
    }
    if state.is_final_stage(config) {
        state.phase = Phase::Ending;
        commit_high_score(state);
        info!("all stages cleared with score {}", state.score);
    } else {
        next_stage(state, config);
    }
}

// ── Per-frame tick (RNG and clock are injected) ──────────────────────────────

/// Advance the simulation by one frame.
///
/// Terminal phases are frozen: the state comes back unchanged and silent.
/// At most one life is lost per frame, whatever combination of traffic and
/// an empty tank caused it.
pub fn tick(
    state: &GameState,
    input: InputState,
    now: Instant,
    config: &GameConfig,
    rng: &mut impl Rng,
) -> (GameState, Vec<SoundCue>) {
    if state.phase.is_terminal() {
        return (state.clone(), Vec::new());
    }

    let mut s = state.clone();
    let mut cues = Vec::new();
    s.frame += 1;

    // ── 1. Timers & road ─────────────────────────────────────────────────────
    if !s.car.is_invincible(now) {
        s.car.invincible_until = None;
    }
    s.road_offset += s.speed;

    // ── 2. Car ───────────────────────────────────────────────────────────────
    s.car = move_car(&s.car, input, config.car_speed);
    if input.is_moving() && rng.gen_bool(ENGINE_CUE_CHANCE) {
        cues.push(SoundCue::Engine);
    }

    // ── 3. Spawn ─────────────────────────────────────────────────────────────
    if let Some(enemy) = maybe_spawn_enemy(&s.enemies, s.stage, s.speed, config, rng) {
        s.enemies.push(enemy);
    }
    if let Some(fuel) = maybe_spawn_fuel(config, rng) {
        s.fuels.push(fuel);
    }

    // ── 4. Move & cull ───────────────────────────────────────────────────────
    let speed = s.speed;
    s.fuels = s
        .fuels
        .iter()
        .map(|f| move_fuel(f, speed))
        .filter(|f| f.y < CANVAS_HEIGHT)
        .collect();
    s.enemies = s
        .enemies
        .iter()
        .map(move_enemy)
        .filter(|e| e.y < CANVAS_HEIGHT)
        .collect();

    // ── 5. Fuel pickups ──────────────────────────────────────────────────────
    let car_rect = s.car.rect();
    let before = s.fuels.len();
    s.fuels
        .retain(|f| !collides(&car_rect, &f.rect(), COLLISION_MARGIN));
    for _ in s.fuels.len()..before {
        s.fuel = (s.fuel + config.fuel_gain).min(FUEL_MAX);
        cues.push(SoundCue::FuelPickup);
    }

    // ── 6. Traffic collisions ────────────────────────────────────────────────
    let mut life_lost = false;
    if !s.car.is_invincible(now) {
        let hit = s
            .enemies
            .iter()
            .position(|e| collides(&car_rect, &e.rect(), COLLISION_MARGIN));
        if let Some(i) = hit {
            s.enemies.remove(i);
            lose_life(&mut s, now, config);
            life_lost = true;
            cues.push(SoundCue::Collision);
        }
    }
    if s.phase.is_terminal() {
        return (s, cues);
    }

    // ── 7. Progress & fuel ───────────────────────────────────────────────────
    s.score += 1;
    s.distance += 1;
    s.fuel = (s.fuel - fuel_decay(s.stage, config)).clamp(0.0, FUEL_MAX);

    if s.fuel <= 0.0 && !life_lost {
        lose_life(&mut s, now, config);
    }
    if s.phase.is_terminal() {
        return (s, cues);
    }

    advance_progress(&mut s, config);
    (s, cues)
}
