use std::time::Duration;

use fuel_rush::config::GameConfig;

use tempfile::tempdir;

#[test]
fn defaults_are_the_arcade_values() {
    let c = GameConfig::default();
    assert_eq!(c.car_speed, 3.0);
    assert_eq!(c.fuel_decay, 0.03);
    assert_eq!(c.fuel_gain, 20.0);
    assert_eq!(c.stage_distance, 2000);
    assert_eq!(c.stage_increment, 500);
    assert_eq!(c.final_stage, 5);
    assert_eq!(c.initial_speed, 3.0);
    assert_eq!(c.speed_increment, 0.5);
    assert_eq!(c.initial_lives, 3);
    assert_eq!(c.enemy_chance, 0.015);
    assert_eq!(c.fuel_chance, 0.01);
    assert_eq!(c.max_enemies, 5);
    assert_eq!(c.fps, 60);
    assert_eq!(c.invincible_duration(), Duration::from_millis(2000));
    assert_eq!(c.score_file, None);
}

#[test]
fn frame_duration_follows_fps() {
    let c = GameConfig {
        fps: 50,
        ..GameConfig::default()
    };
    assert_eq!(c.frame_duration(), Duration::from_millis(20));
    assert_eq!(GameConfig::default().frame_duration(), Duration::from_micros(16_666));
}

#[test]
fn ini_overrides_only_given_keys() {
    let mut c = GameConfig::default();
    c.load_from_str(
        "[car]\nspeed = 4.5\n\n[stage]\nfinal = 3\nlives = 5\n\n[storage]\nscore_file = /tmp/best\n",
    )
    .unwrap();
    assert_eq!(c.car_speed, 4.5);
    assert_eq!(c.final_stage, 3);
    assert_eq!(c.initial_lives, 5);
    assert_eq!(c.score_file.as_deref(), Some(std::path::Path::new("/tmp/best")));
    // Untouched.
    assert_eq!(c.stage_distance, 2000);
    assert_eq!(c.fps, 60);
}

#[test]
fn ini_values_are_sanitised() {
    let mut c = GameConfig::default();
    c.load_from_str("[spawn]\nenemy_chance = 7\nfuel_chance = -1\n\n[timing]\nfps = 0\n\n[stage]\nlives = 0\n")
        .unwrap();
    assert_eq!(c.enemy_chance, 1.0);
    assert_eq!(c.fuel_chance, 0.0);
    assert_eq!(c.fps, 1);
    assert_eq!(c.initial_lives, 1);

    let mut c = GameConfig::default();
    c.load_from_str("[spawn]\nenemy_chance = nan\nfuel_chance = inf\n").unwrap();
    assert_eq!(c.enemy_chance, 0.015);
    assert_eq!(c.fuel_chance, 0.01);
}

#[test]
fn nan_chance_does_not_break_a_frame() {
    use std::time::Instant;

    use fuel_rush::compute::{init_state, tick};
    use fuel_rush::entities::InputState;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    let mut c = GameConfig::default();
    c.load_from_str("[spawn]\nenemy_chance = NaN\nfuel_chance = nan\n").unwrap();
    let s = init_state(&c, 0);
    let (next, _) = tick(&s, InputState::default(), Instant::now(), &c, &mut StdRng::seed_from_u64(42));
    assert_eq!(next.frame, 1);
}

#[test]
fn negative_rates_keep_defaults() {
    let mut c = GameConfig::default();
    c.load_from_str(
        "[car]\nspeed = -3\n\n[fuel]\ndecay = -1\ngain = -20\n\n[stage]\ninitial_speed = -3\nspeed_increment = -0.5\n",
    )
    .unwrap();
    assert_eq!(c, GameConfig::default());

    c.load_from_str("[stage]\ninitial_speed = 0\n").unwrap();
    assert_eq!(c.initial_speed, 3.0);
}

#[test]
fn out_of_range_integers_keep_defaults() {
    let mut c = GameConfig::default();
    c.load_from_str("[stage]\ndistance = 4294967301\nincrement = 99999999999\n\n[timing]\nfps = 4294967296\n")
        .unwrap();
    assert_eq!(c.stage_distance, 2000);
    assert_eq!(c.stage_increment, 500);
    assert_eq!(c.fps, 60);

    c.load_from_str("[stage]\ndistance = 4294967295\n").unwrap();
    assert_eq!(c.stage_distance, u32::MAX);
}

#[test]
fn unparsable_values_keep_defaults() {
    let mut c = GameConfig::default();
    c.load_from_str("[timing]\nfps = fast\n").unwrap();
    assert_eq!(c.fps, 60);
}

#[test]
fn load_from_file_reads_ini() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("fuel_rush.ini");
    std::fs::write(&path, "[fuel]\ngain = 35\n").unwrap();
    let mut c = GameConfig::default();
    c.load_from_file(&path).unwrap();
    assert_eq!(c.fuel_gain, 35.0);
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempdir().unwrap();
    let mut c = GameConfig::default();
    assert!(c.load_from_file(&dir.path().join("absent.ini")).is_err());
    assert_eq!(c, GameConfig::default());
}
