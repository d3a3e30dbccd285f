/// Change-only HUD bookkeeping.
///
/// The renderer asks [`HudCache::sync`] which fields differ from what is
/// already on screen and rewrites only those.

use crate::entities::GameState;

/// One HUD field that needs rewriting.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HudField {
    Score(u32),
    HighScore(u32),
    Stage(u32),
    Lives(u32),
    /// Fuel bar width in percent, 0..=100.
    Fuel(u32),
}

#[derive(Clone, Debug, Default)]
pub struct HudCache {
    score: Option<u32>,
    high_score: Option<u32>,
    stage: Option<u32>,
    lives: Option<u32>,
    fuel: Option<u32>,
}

fn changed(slot: &mut Option<u32>, value: u32) -> bool {
    if *slot == Some(value) {
        false
    } else {
        *slot = Some(value);
        true
    }
}

impl HudCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget what is on screen so the next sync rewrites everything.
    pub fn invalidate(&mut self) {
        *self = Self::default();
    }

    /// Fields whose value differs from the last sync.  Fuel is compared by
    /// its integer floor so the bar is not redrawn for sub-percent decay.
    pub fn sync(&mut self, state: &GameState) -> Vec<HudField> {
        let mut fields = Vec::new();
        if changed(&mut self.score, state.score) {
            fields.push(HudField::Score(state.score));
        }
        if changed(&mut self.high_score, state.high_score) {
            fields.push(HudField::HighScore(state.high_score));
        }
        if changed(&mut self.stage, state.stage) {
            fields.push(HudField::Stage(state.stage));
        }
        if changed(&mut self.lives, state.lives) {
            fields.push(HudField::Lives(state.lives));
        }
        let fuel = state.fuel_percent().floor() as u32;
        if changed(&mut self.fuel, fuel) {
            fields.push(HudField::Fuel(fuel));
        }
        fields
    }
}
