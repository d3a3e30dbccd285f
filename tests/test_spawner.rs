use std::time::{Duration, Instant};

use fuel_rush::compute::{init_state, tick};
use fuel_rush::config::*;
use fuel_rush::entities::*;
use fuel_rush::spawner::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn always_spawn() -> GameConfig {
    GameConfig {
        enemy_chance: 1.0,
        fuel_chance: 1.0,
        ..GameConfig::default()
    }
}

// ── Enemy spawning ────────────────────────────────────────────────────────────

#[test]
fn enemies_spawn_in_lanes_above_screen() {
    let config = always_spawn();
    let mut rng = seeded_rng();
    for _ in 0..200 {
        let e = maybe_spawn_enemy(&[], 1, 3.0, &config, &mut rng).expect("chance is 1.0");
        assert!(ENEMY_LANES.contains(&e.x));
        assert_eq!(e.y, ENEMY_SPAWN_Y);
    }
}

#[test]
fn no_spawn_at_zero_chance() {
    let config = GameConfig {
        enemy_chance: 0.0,
        ..GameConfig::default()
    };
    let mut rng = seeded_rng();
    for _ in 0..200 {
        assert!(maybe_spawn_enemy(&[], 1, 3.0, &config, &mut rng).is_none());
    }
}

#[test]
fn spawning_stops_at_the_cap() {
    let config = always_spawn();
    let mut rng = seeded_rng();
    let full: Vec<Enemy> = (0..config.max_enemies)
        .map(|i| Enemy::new(ENEMY_LANES[i % 4], 0.0, EnemyKind::Normal, 3.0, Pattern::Straight))
        .collect();
    assert!(maybe_spawn_enemy(&full, 1, 3.0, &config, &mut rng).is_none());
    assert!(maybe_spawn_enemy(&full[1..], 1, 3.0, &config, &mut rng).is_some());
}

#[test]
fn only_one_truck_at_a_time() {
    let config = always_spawn();
    let mut rng = seeded_rng();
    let truck = Enemy::new(70.0, 0.0, EnemyKind::Truck, 3.0, Pattern::Straight);
    for _ in 0..1000 {
        let e = maybe_spawn_enemy(std::slice::from_ref(&truck), 1, 3.0, &config, &mut rng)
            .expect("chance is 1.0");
        assert_ne!(e.kind, EnemyKind::Truck);
    }
}

#[test]
fn kinds_are_roughly_uniform_without_a_truck() {
    let mut rng = seeded_rng();
    let mut counts = [0u32; 3];
    for _ in 0..3000 {
        match pick_kind(&mut rng, false) {
            EnemyKind::Normal => counts[0] += 1,
            EnemyKind::Fast => counts[1] += 1,
            EnemyKind::Truck => counts[2] += 1,
        }
    }
    for c in counts {
        assert!((800..1200).contains(&c), "{counts:?}");
    }
}

#[test]
fn downgraded_trucks_become_normal_cars() {
    let mut rng = seeded_rng();
    let mut normal = 0;
    for _ in 0..3000 {
        if pick_kind(&mut rng, true) == EnemyKind::Normal {
            normal += 1;
        }
    }
    // Normal's own third plus every would-be truck.
    assert!((1800..2200).contains(&normal), "{normal}");
}

#[test]
fn never_two_trucks_on_the_road() {
    let config = GameConfig {
        enemy_chance: 1.0,
        fuel_chance: 0.0,
        max_enemies: 10,
        ..GameConfig::default()
    };
    let mut rng = seeded_rng();
    let now = Instant::now();
    let mut s = init_state(&config, 0);
    s.car.invincible_until = Some(now + Duration::from_secs(3600));

    for _ in 0..2000 {
        s = tick(&s, InputState::default(), now, &config, &mut rng).0;
        let trucks = s.enemies.iter().filter(|e| e.kind == EnemyKind::Truck).count();
        assert!(trucks <= 1);
        assert!(s.enemies.len() <= config.max_enemies);
    }
}

// ── Patterns ──────────────────────────────────────────────────────────────────

fn pattern_counts(stage: u32) -> [u32; 3] {
    let mut rng = seeded_rng();
    let mut counts = [0u32; 3];
    for _ in 0..3000 {
        match pick_pattern(&mut rng, stage) {
            Pattern::Straight => counts[0] += 1,
            Pattern::Zigzag => counts[1] += 1,
            Pattern::Swerve => counts[2] += 1,
        }
    }
    counts
}

#[test]
fn first_stage_is_all_straight() {
    assert_eq!(pattern_counts(1), [3000, 0, 0]);
}

#[test]
fn middle_stages_add_zigzag_only() {
    for stage in [2, 3] {
        let [straight, zigzag, swerve] = pattern_counts(stage);
        assert_eq!(swerve, 0);
        assert!((750..1050).contains(&zigzag), "{zigzag}");
        assert!(straight > zigzag);
    }
}

#[test]
fn late_stages_add_swerve() {
    let [straight, zigzag, swerve] = pattern_counts(4);
    assert!((750..1050).contains(&zigzag), "{zigzag}");
    assert!((750..1050).contains(&swerve), "{swerve}");
    assert!((1050..1350).contains(&straight), "{straight}");
}

// ── Fuel spawning ─────────────────────────────────────────────────────────────

#[test]
fn fuel_spawns_in_fuel_lanes() {
    let config = always_spawn();
    let mut rng = seeded_rng();
    for _ in 0..200 {
        let f = maybe_spawn_fuel(&config, &mut rng).expect("chance is 1.0");
        assert!(FUEL_LANES.contains(&f.x));
        assert_eq!(f.y, FUEL_SPAWN_Y);
    }
}

#[test]
fn fuel_spawn_rate_matches_chance() {
    let config = GameConfig::default();
    let mut rng = seeded_rng();
    let spawned = (0..20_000)
        .filter(|_| maybe_spawn_fuel(&config, &mut rng).is_some())
        .count();
    // 1% of 20 000.
    assert!((140..260).contains(&spawned), "{spawned}");
}
