pub mod audio;
pub mod canvas;
pub mod collision;
pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod high_score;
pub mod hud;
pub mod input;
pub mod spawner;
