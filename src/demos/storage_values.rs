//! Save and load two integer values through [`ValueStorage`].
//!
//! R rolls a random score and hi-score, Enter saves them to slots 0 and 1,
//! Space loads them back. Slots never written load as 0.

use bevy_ecs::prelude::*;
use log::{error, info};

use crate::driver::Game;
use crate::error::EngineError;
use crate::platform::AssetLoader;
use crate::render::{Color, Frame};
use crate::resources::input::{InputState, Key};
use crate::resources::storage::ValueStorage;

pub const SCORE_SLOT: usize = 0;
pub const HISCORE_SLOT: usize = 1;

#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Scores {
    pub score: i32,
    pub hiscore: i32,
    pub frames: u32,
}

/// Random source for score rolls.
#[derive(Resource)]
pub struct ScoreRng(pub fastrand::Rng);

pub fn roll_scores(input: Res<InputState>, mut rng: ResMut<ScoreRng>, mut scores: ResMut<Scores>) {
    if input.is_pressed(Key::R) {
        scores.score = rng.0.i32(1000..=2000);
        scores.hiscore = rng.0.i32(2000..=4000);
    }
}

pub fn persist_scores(
    input: Res<InputState>,
    mut storage: ResMut<ValueStorage>,
    mut scores: ResMut<Scores>,
) {
    if input.is_pressed(Key::Enter) {
        let saved = storage
            .save_value(SCORE_SLOT, scores.score)
            .and_then(|_| storage.save_value(HISCORE_SLOT, scores.hiscore));
        match saved {
            Ok(()) => info!("Saved score {} / hi-score {}", scores.score, scores.hiscore),
            Err(e) => error!("Saving scores failed: {}", e),
        }
    } else if input.is_pressed(Key::Space) {
        let loaded = storage
            .load_value(SCORE_SLOT)
            .and_then(|score| Ok((score, storage.load_value(HISCORE_SLOT)?)));
        match loaded {
            Ok((score, hiscore)) => {
                scores.score = score;
                scores.hiscore = hiscore;
            }
            Err(e) => error!("Loading scores failed: {}", e),
        }
    }
}

pub fn count_frames(mut scores: ResMut<Scores>) {
    scores.frames += 1;
}

pub struct StorageValuesGame {
    seed: Option<u64>,
    update: Schedule,
}

impl StorageValuesGame {
    pub fn new() -> Self {
        let mut update = Schedule::default();
        update.add_systems((roll_scores, persist_scores, count_frames).chain());
        Self { seed: None, update }
    }

    /// Deterministic score rolls.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Default for StorageValuesGame {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for StorageValuesGame {
    fn load(&mut self, world: &mut World, _assets: &mut dyn AssetLoader) -> Result<(), EngineError> {
        let rng = match self.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        world.insert_resource(ScoreRng(rng));
        world.insert_resource(Scores::default());
        if !world.contains_resource::<ValueStorage>() {
            world.insert_resource(ValueStorage::in_memory());
        }
        Ok(())
    }

    fn update(&mut self, world: &mut World, _dt: f32) {
        self.update.run(world);
    }

    fn draw(&self, world: &World, frame: &mut Frame<'_>) {
        let scores = world.resource::<Scores>();
        frame.clear(Color::RAYWHITE);
        frame.text(format!("SCORE: {}", scores.score), 280, 130, 40, Color::MAROON);
        frame.text(format!("HI-SCORE: {}", scores.hiscore), 210, 200, 50, Color::BLACK);
        frame.text(format!("frames: {}", scores.frames), 10, 10, 20, Color::LIME);
        frame.text("Press R to generate random numbers", 220, 40, 20, Color::LIGHTGRAY);
        frame.text("Press ENTER to SAVE values", 250, 310, 20, Color::LIGHTGRAY);
        frame.text("Press SPACE to LOAD values", 252, 350, 20, Color::LIGHTGRAY);
    }
}
