//! Screen size resource.
//!
//! Stores the current framebuffer dimensions in pixels. Refreshed by the
//! driver from the platform at the start of every frame.

use bevy_ecs::prelude::Resource;
use glam::Vec2;

/// Current screen size in pixels.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSize {
    /// Width in pixels.
    pub w: i32,
    /// Height in pixels.
    pub h: i32,
}

impl ScreenSize {
    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.w as f32, self.h as f32)
    }

    pub fn center(&self) -> Vec2 {
        self.as_vec2() * 0.5
    }
}
