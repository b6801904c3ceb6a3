use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::render::{Color, Frame, Rect};
use crate::resources::debugmode::DebugMode;
use crate::resources::frametime::FrameTime;
use crate::resources::input::InputState;
use crate::resources::screensize::ScreenSize;

/// Draw the debug overlay on top of the game's frame while [`DebugMode`] is
/// present. Reads the world only.
pub fn render_debug_overlay(world: &World, frame: &mut Frame<'_>, fps: u32) {
    if !world.contains_resource::<DebugMode>() {
        return;
    }
    let screen = *world.resource::<ScreenSize>();
    let time = *world.resource::<FrameTime>();
    let mouse = world
        .get_resource::<InputState>()
        .map(InputState::mouse_position)
        .unwrap_or(Vec2::ZERO);

    frame.rect(Rect::new(0.0, 0.0, 330.0, 56.0), Color::BLACK.fade(0.5));
    let text = format!("DEBUG MODE (press F11 to toggle) | FPS: {}", fps);
    frame.text(text, 10, 10, 10, Color::WHITE);

    let text = format!(
        "Frame: {} | dt: {:.4} (raw {:.4}) | elapsed: {:.2}s",
        time.frame_count, time.delta, time.raw_delta, time.elapsed
    );
    frame.text(text, 10, 26, 10, Color::WHITE);

    let text = format!("Mouse screen: ({:.1}, {:.1})", mouse.x, mouse.y);
    frame.text(text, 10, 42, 10, Color::WHITE);

    frame.text(
        format!("{}x{}", screen.w, screen.h),
        10,
        screen.h - 20,
        10,
        Color::DARKGRAY,
    );
}
