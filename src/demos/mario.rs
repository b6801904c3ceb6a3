//! The Mario walkthrough: walk left and right, hold space to jump.
//!
//! Horizontal movement is `move_speed * dt`, clamped to `[0, width]`. While
//! space is held Mario rises by `jump_force * dt` and the force decays by
//! `gravity * dt`, so holding it long enough brings him back down. Falling
//! past the bottom edge lands him there and restores the jump force.

use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::driver::Game;
use crate::error::EngineError;
use crate::platform::AssetLoader;
use crate::render::{Color, Frame};
use crate::resources::frametime::FrameTime;
use crate::resources::input::{InputState, Key};
use crate::resources::screensize::ScreenSize;
use crate::resources::texturestore::TextureStore;

pub const MARIO_TEXTURE: &str = "mario";
pub const MARIO_PATH: &str = "./assets/mario_1.png";

/// Tunables of the walkthrough.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarioSettings {
    pub start: Vec2,
    pub size: Vec2,
    /// Pixels per second.
    pub move_speed: f32,
    /// Initial upward speed in pixels per second.
    pub jump_force: f32,
    /// Jump force lost per second.
    pub gravity: f32,
}

impl Default for MarioSettings {
    fn default() -> Self {
        Self {
            start: Vec2::new(400.0, 200.0),
            size: Vec2::new(32.0, 32.0),
            move_speed: 300.0,
            jump_force: 1200.0,
            gravity: 3600.0,
        }
    }
}

#[derive(Resource, Debug, Clone, Copy)]
pub struct Mario {
    pub position: Vec2,
    pub jump_force: f32,
    pub settings: MarioSettings,
}

impl Mario {
    pub fn new(settings: MarioSettings) -> Self {
        Self {
            position: settings.start,
            jump_force: settings.jump_force,
            settings,
        }
    }
}

pub fn mario_walk(
    input: Res<InputState>,
    time: Res<FrameTime>,
    screen: Res<ScreenSize>,
    mut mario: ResMut<Mario>,
) {
    let step = mario.settings.move_speed * time.delta;
    if input.is_down(Key::Right) {
        mario.position.x += step;
    }
    if input.is_down(Key::Left) {
        mario.position.x -= step;
    }
    mario.position.x = mario.position.x.clamp(0.0, screen.w as f32);
}

pub fn mario_jump(
    input: Res<InputState>,
    time: Res<FrameTime>,
    screen: Res<ScreenSize>,
    mut mario: ResMut<Mario>,
) {
    if input.is_down(Key::Space) {
        mario.position.y -= mario.jump_force * time.delta;
        mario.jump_force -= mario.settings.gravity * time.delta;
    }
    let floor = screen.h as f32;
    if mario.position.y > floor {
        mario.position.y = floor;
        mario.jump_force = mario.settings.jump_force;
    }
}

pub struct MarioGame {
    settings: MarioSettings,
    update: Schedule,
}

impl MarioGame {
    pub fn new() -> Self {
        Self::with_settings(MarioSettings::default())
    }

    pub fn with_settings(settings: MarioSettings) -> Self {
        let mut update = Schedule::default();
        update.add_systems((mario_walk, mario_jump).chain());
        Self { settings, update }
    }
}

impl Default for MarioGame {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for MarioGame {
    fn load(&mut self, world: &mut World, assets: &mut dyn AssetLoader) -> Result<(), EngineError> {
        world
            .resource_mut::<TextureStore>()
            .acquire(MARIO_TEXTURE, MARIO_PATH, assets)?;
        world.insert_resource(Mario::new(self.settings));
        Ok(())
    }

    fn update(&mut self, world: &mut World, _dt: f32) {
        self.update.run(world);
    }

    fn draw(&self, world: &World, frame: &mut Frame<'_>) {
        let mario = world.resource::<Mario>();
        frame.clear(Color::RAYWHITE);
        frame.text("Mario", 10, 10, 32, Color::DARKGRAY);
        if let Some(texture) = world.resource::<TextureStore>().get(MARIO_TEXTURE) {
            frame.texture(
                texture,
                mario.position,
                mario.settings.size,
                Vec2::new(0.5, 1.0),
                0.0,
                Color::WHITE,
            );
        }
    }
}
