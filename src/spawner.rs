/// Per-frame creation of traffic and fuel.
///
/// Every draw goes through the injected RNG so callers control determinism.

use log::debug;
use rand::Rng;

use crate::config::{GameConfig, ENEMY_LANES, ENEMY_SPAWN_Y, FUEL_LANES, FUEL_SPAWN_Y};
use crate::entities::{Enemy, EnemyKind, Fuel, Pattern};

const ENEMY_KINDS: [EnemyKind; 3] = [EnemyKind::Normal, EnemyKind::Fast, EnemyKind::Truck];

/// Chance that a stage ≥ 2 enemy zigzags.
const ZIGZAG_CHANCE: f64 = 0.3;
/// Upper bound of the swerve band; swerve covers `[ZIGZAG_CHANCE, SWERVE_CEILING)`.
const SWERVE_CEILING: f64 = 0.6;
/// First stage with zigzagging traffic.
const ZIGZAG_STAGE: u32 = 2;
/// First stage with swerving traffic.
const SWERVE_STAGE: u32 = 4;

/// Pick an enemy kind; a second truck is downgraded to a normal car.
pub fn pick_kind(rng: &mut impl Rng, truck_active: bool) -> EnemyKind {
    let kind = ENEMY_KINDS[rng.gen_range(0..ENEMY_KINDS.len())];
    if kind == EnemyKind::Truck && truck_active {
        EnemyKind::Normal
    } else {
        kind
    }
}

/// Pick a movement pattern for `stage`.
pub fn pick_pattern(rng: &mut impl Rng, stage: u32) -> Pattern {
    if stage < ZIGZAG_STAGE {
        return Pattern::Straight;
    }
    let r: f64 = rng.gen();
    if r < ZIGZAG_CHANCE {
        Pattern::Zigzag
    } else if r < SWERVE_CEILING && stage >= SWERVE_STAGE {
        Pattern::Swerve
    } else {
        Pattern::Straight
    }
}

/// Maybe create one enemy.  Nothing spawns once `max_enemies` are active.
pub fn maybe_spawn_enemy(
    enemies: &[Enemy],
    stage: u32,
    speed: f32,
    config: &GameConfig,
    rng: &mut impl Rng,
) -> Option<Enemy> {
    if enemies.len() >= config.max_enemies {
        return None;
    }
    if !rng.gen_bool(config.enemy_chance) {
        return None;
    }

    let lane = ENEMY_LANES[rng.gen_range(0..ENEMY_LANES.len())];
    let truck_active = enemies.iter().any(|e| e.kind == EnemyKind::Truck);
    let kind = pick_kind(rng, truck_active);
    let pattern = pick_pattern(rng, stage);

    debug!("spawn {:?}/{:?} at lane {}", kind, pattern, lane);
    Some(Enemy::new(lane, ENEMY_SPAWN_Y, kind, speed, pattern))
}

/// Maybe create one fuel pickup.
pub fn maybe_spawn_fuel(config: &GameConfig, rng: &mut impl Rng) -> Option<Fuel> {
    if !rng.gen_bool(config.fuel_chance) {
        return None;
    }
    let lane = FUEL_LANES[rng.gen_range(0..FUEL_LANES.len())];
    Some(Fuel::new(lane, FUEL_SPAWN_Y))
}
