//! A ball bouncing off the screen edges. Space pauses it.

use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::driver::Game;
use crate::error::EngineError;
use crate::platform::AssetLoader;
use crate::render::{Color, Frame};
use crate::resources::frametime::FrameTime;
use crate::resources::input::{InputState, Key};
use crate::resources::screensize::ScreenSize;

pub const BALL_RADIUS: f32 = 20.0;
/// Initial velocity in pixels per second.
pub const BALL_VELOCITY: Vec2 = Vec2::new(300.0, 240.0);
/// "PAUSED" is shown for this many paused frames, then hidden as long.
const BLINK_FRAMES: u32 = 30;

#[derive(Resource, Debug, Clone, Copy)]
pub struct BouncingBall {
    pub position: Vec2,
    pub velocity: Vec2,
    pub paused: bool,
    /// Frames spent paused.
    pub paused_frames: u32,
}

impl BouncingBall {
    pub fn paused_label_visible(&self) -> bool {
        self.paused && (self.paused_frames / BLINK_FRAMES) % 2 == 0
    }
}

pub fn toggle_pause(input: Res<InputState>, mut ball: ResMut<BouncingBall>) {
    if input.is_pressed(Key::Space) {
        ball.paused = !ball.paused;
    }
}

pub fn move_ball(time: Res<FrameTime>, screen: Res<ScreenSize>, mut ball: ResMut<BouncingBall>) {
    if ball.paused {
        ball.paused_frames += 1;
        return;
    }
    let delta = ball.velocity * time.delta;
    ball.position += delta;

    let (w, h) = (screen.w as f32, screen.h as f32);
    if ball.position.x >= w - BALL_RADIUS {
        ball.velocity.x = -ball.velocity.x.abs();
    } else if ball.position.x <= BALL_RADIUS {
        ball.velocity.x = ball.velocity.x.abs();
    }
    if ball.position.y >= h - BALL_RADIUS {
        ball.velocity.y = -ball.velocity.y.abs();
    } else if ball.position.y <= BALL_RADIUS {
        ball.velocity.y = ball.velocity.y.abs();
    }
}

pub struct BouncingBallGame {
    update: Schedule,
}

impl BouncingBallGame {
    pub fn new() -> Self {
        let mut update = Schedule::default();
        update.add_systems((toggle_pause, move_ball).chain());
        Self { update }
    }
}

impl Default for BouncingBallGame {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for BouncingBallGame {
    fn load(&mut self, world: &mut World, _assets: &mut dyn AssetLoader) -> Result<(), EngineError> {
        let position = world.resource::<ScreenSize>().center();
        world.insert_resource(BouncingBall {
            position,
            velocity: BALL_VELOCITY,
            paused: false,
            paused_frames: 0,
        });
        Ok(())
    }

    fn update(&mut self, world: &mut World, _dt: f32) {
        self.update.run(world);
    }

    fn draw(&self, world: &World, frame: &mut Frame<'_>) {
        let ball = world.resource::<BouncingBall>();
        let screen = world.resource::<ScreenSize>();

        frame.clear(Color::RAYWHITE);
        frame.circle(ball.position, BALL_RADIUS, Color::MAROON);
        frame.text(
            "PRESS SPACE to PAUSE BALL MOVEMENT",
            10,
            screen.h - 25,
            20,
            Color::LIGHTGRAY,
        );
        if ball.paused_label_visible() {
            frame.text("PAUSED", 350, 200, 30, Color::GRAY);
        }
        frame.fps(10, 10);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paused_label_blinks_every_thirty_frames() {
        let mut ball = BouncingBall {
            position: Vec2::ZERO,
            velocity: BALL_VELOCITY,
            paused: true,
            paused_frames: 0,
        };
        assert!(ball.paused_label_visible());
        ball.paused_frames = 29;
        assert!(ball.paused_label_visible());
        ball.paused_frames = 30;
        assert!(!ball.paused_label_visible());
        ball.paused_frames = 60;
        assert!(ball.paused_label_visible());
        ball.paused = false;
        assert!(!ball.paused_label_visible());
    }
}
