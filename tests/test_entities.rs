use std::time::{Duration, Instant};

use fuel_rush::config::*;
use fuel_rush::entities::*;

#[test]
fn enums_compare_by_value() {
    assert_eq!(EnemyKind::Truck, EnemyKind::Truck);
    assert_ne!(EnemyKind::Truck, EnemyKind::Fast);
    assert_ne!(Pattern::Zigzag, Pattern::Swerve);
    assert!(!Phase::Playing.is_terminal());
    assert!(Phase::GameOver.is_terminal());
    assert!(Phase::Ending.is_terminal());
}

#[test]
fn car_starts_at_start_line() {
    let car = Car::default();
    assert_eq!((car.x, car.y), (CAR_START_X, CAR_START_Y));
    assert_eq!((car.w, car.h), (CAR_WIDTH, CAR_HEIGHT));
    assert_eq!(car.invincible_until, None);
}

#[test]
fn reset_position_keeps_invincibility() {
    let until = Instant::now() + Duration::from_secs(2);
    let mut car = Car::new();
    car.x = 60.0;
    car.invincible_until = Some(until);
    car.reset_position();
    assert_eq!(car.x, CAR_START_X);
    assert_eq!(car.invincible_until, Some(until));
}

#[test]
fn invincibility_window_is_half_open() {
    let t0 = Instant::now();
    let mut car = Car::new();
    assert!(!car.is_invincible(t0));

    car.invincible_until = Some(t0 + Duration::from_millis(2000));
    assert!(car.is_invincible(t0));
    assert!(car.is_invincible(t0 + Duration::from_millis(1999)));
    assert!(!car.is_invincible(t0 + Duration::from_millis(2000)));
}

#[test]
fn flicker_alternates_every_hundred_ms() {
    let t0 = Instant::now();
    let mut car = Car::new();
    car.invincible_until = Some(t0 + Duration::from_millis(2000));

    // 2000 ms left → bucket 20 → bright.
    assert!(!car.flicker_dim(t0));
    // 1950 ms left → bucket 19 → dim.
    assert!(car.flicker_dim(t0 + Duration::from_millis(50)));
    // 1850 ms left → bucket 18 → bright.
    assert!(!car.flicker_dim(t0 + Duration::from_millis(150)));
    // Expired: never dim.
    assert!(!car.flicker_dim(t0 + Duration::from_millis(2500)));
}

#[test]
fn enemy_kinds_have_their_own_size_and_speed() {
    let normal = Enemy::new(70.0, -100.0, EnemyKind::Normal, 4.0, Pattern::Straight);
    let fast = Enemy::new(70.0, -100.0, EnemyKind::Fast, 4.0, Pattern::Straight);
    let truck = Enemy::new(70.0, -100.0, EnemyKind::Truck, 4.0, Pattern::Straight);

    assert_eq!((normal.w, normal.h, normal.speed), (40.0, 60.0, 4.0));
    assert_eq!((fast.w, fast.h, fast.speed), (40.0, 60.0, 6.0));
    assert_eq!((truck.w, truck.h, truck.speed), (60.0, 100.0, 3.0));
    assert_ne!(normal.color, fast.color);
    assert_ne!(fast.color, truck.color);
    assert_eq!(normal.dir, 1.0);
    assert_eq!(normal.counter, 0);
}

#[test]
fn fuel_rect_is_square() {
    let r = Fuel::new(80.0, 10.0).rect();
    assert_eq!((r.x, r.y, r.w, r.h), (80.0, 10.0, FUEL_SIZE, FUEL_SIZE));
}

#[test]
fn themes_cycle_through_five_stages() {
    assert_eq!(theme_for(1), STAGE_THEMES[0]);
    assert_eq!(theme_for(4).background, Rgb::BLACK);
    assert_eq!(theme_for(5), theme_for(1));
    assert_eq!(theme_for(6), theme_for(1));
    assert_eq!(theme_for(0), theme_for(1));
}

#[test]
fn blend_mixes_channels() {
    let c = Rgb::WHITE.blend(Rgb::BLACK, 0.5);
    assert_eq!(c, Rgb(128, 128, 128));
    assert_eq!(Rgb(10, 20, 30).blend(Rgb::WHITE, 1.0), Rgb(10, 20, 30));
    assert_eq!(Rgb(10, 20, 30).blend(Rgb::WHITE, 0.0), Rgb::WHITE);
}

#[test]
fn fuel_percent_is_clamped() {
    let mut s = fuel_rush::compute::init_state(&GameConfig::default(), 0);
    s.fuel = -3.0;
    assert_eq!(s.fuel_percent(), 0.0);
    s.fuel = 42.5;
    assert_eq!(s.fuel_percent(), 42.5);
}

#[test]
fn final_stage_follows_config() {
    let config = GameConfig {
        final_stage: 2,
        ..GameConfig::default()
    };
    let mut s = fuel_rush::compute::init_state(&config, 0);
    assert!(!s.is_final_stage(&config));
    s.stage = 2;
    assert!(s.is_final_stage(&config));
}

#[test]
fn game_state_clone_is_independent() {
    let original = fuel_rush::compute::init_state(&GameConfig::default(), 0);
    let mut copy = original.clone();
    copy.score = 99;
    copy.enemies.push(Enemy::new(70.0, 0.0, EnemyKind::Normal, 3.0, Pattern::Straight));
    assert_eq!(original.score, 0);
    assert!(original.enemies.is_empty());
}
