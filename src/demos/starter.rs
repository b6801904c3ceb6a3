//! Getting-started template: a crate texture spinning at the screen centre.

use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::driver::Game;
use crate::error::EngineError;
use crate::platform::AssetLoader;
use crate::render::{Color, Frame};
use crate::resources::frametime::FrameTime;
use crate::resources::screensize::ScreenSize;
use crate::resources::texturestore::TextureStore;

pub const CRATE_TEXTURE: &str = "crate";
pub const CRATE_PATH: &str = "./assets/crate_1.png";
/// Spin speed in degrees per second.
pub const SPIN_SPEED: f32 = 45.0;
const CRATE_SIZE: f32 = 100.0;

/// Current crate rotation in degrees.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct CrateSpin {
    pub rotation: f32,
}

pub fn spin_crate(time: Res<FrameTime>, mut spin: ResMut<CrateSpin>) {
    spin.rotation += SPIN_SPEED * time.delta;
}

pub struct StarterGame {
    update: Schedule,
}

impl StarterGame {
    pub fn new() -> Self {
        let mut update = Schedule::default();
        update.add_systems(spin_crate);
        Self { update }
    }
}

impl Default for StarterGame {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for StarterGame {
    fn load(&mut self, world: &mut World, assets: &mut dyn AssetLoader) -> Result<(), EngineError> {
        world
            .resource_mut::<TextureStore>()
            .acquire(CRATE_TEXTURE, CRATE_PATH, assets)?;
        world.insert_resource(CrateSpin::default());
        Ok(())
    }

    fn update(&mut self, world: &mut World, _dt: f32) {
        self.update.run(world);
    }

    fn draw(&self, world: &World, frame: &mut Frame<'_>) {
        let screen = *world.resource::<ScreenSize>();
        let center = screen.center();
        let rotation = world.resource::<CrateSpin>().rotation;

        frame.clear(Color::RAYWHITE);
        frame.text("Hello World", 10, 10, 32, Color::DARKGRAY);

        if let Some(texture) = world.resource::<TextureStore>().get(CRATE_TEXTURE) {
            frame.texture(
                texture,
                center,
                Vec2::splat(CRATE_SIZE),
                Vec2::splat(0.5),
                rotation,
                Color::WHITE,
            );
        }

        let (w, h) = (screen.w as f32, screen.h as f32);
        frame.line(Vec2::new(0.0, center.y), Vec2::new(w, center.y), Color::DARKGRAY);
        frame.line(Vec2::new(center.x, 0.0), Vec2::new(center.x, h), Color::DARKGRAY);
    }
}
