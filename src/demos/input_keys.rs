//! Move a ball around with the arrow keys.

use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::driver::Game;
use crate::error::EngineError;
use crate::platform::AssetLoader;
use crate::render::{Color, Frame};
use crate::resources::frametime::FrameTime;
use crate::resources::input::{InputState, Key};
use crate::resources::screensize::ScreenSize;

/// Pixels per second.
pub const BALL_SPEED: f32 = 120.0;
const BALL_RADIUS: f32 = 50.0;

#[derive(Resource, Debug, Clone, Copy)]
pub struct KeyBall {
    pub position: Vec2,
}

pub fn steer_ball(input: Res<InputState>, time: Res<FrameTime>, mut ball: ResMut<KeyBall>) {
    let mut dir = Vec2::ZERO;
    if input.is_down(Key::Right) {
        dir.x += 1.0;
    }
    if input.is_down(Key::Left) {
        dir.x -= 1.0;
    }
    if input.is_down(Key::Up) {
        dir.y -= 1.0;
    }
    if input.is_down(Key::Down) {
        dir.y += 1.0;
    }
    ball.position += dir * BALL_SPEED * time.delta;
}

pub struct InputKeysGame {
    update: Schedule,
}

impl InputKeysGame {
    pub fn new() -> Self {
        let mut update = Schedule::default();
        update.add_systems(steer_ball);
        Self { update }
    }
}

impl Default for InputKeysGame {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for InputKeysGame {
    fn load(&mut self, world: &mut World, _assets: &mut dyn AssetLoader) -> Result<(), EngineError> {
        let position = world.resource::<ScreenSize>().center();
        world.insert_resource(KeyBall { position });
        Ok(())
    }

    fn update(&mut self, world: &mut World, _dt: f32) {
        self.update.run(world);
    }

    fn draw(&self, world: &World, frame: &mut Frame<'_>) {
        let ball = world.resource::<KeyBall>();
        frame.clear(Color::RAYWHITE);
        frame.text("move the ball with arrow keys", 10, 10, 20, Color::DARKGRAY);
        frame.circle(ball.position, BALL_RADIUS, Color::MAROON);
    }
}
