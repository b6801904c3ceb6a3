//! Draw commands and the scoped frame they are issued through.
//!
//! Games never talk to a backend directly while drawing. They receive a
//! [`Frame`], which opened the backend's frame on creation and closes it when
//! dropped, so the render target is released even if a draw call panics.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::platform::{Renderer, TextureId, TextureInfo};

/// RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const WHITE: Color = Color::new(255, 255, 255, 255);
    pub const BLACK: Color = Color::new(0, 0, 0, 255);
    pub const RAYWHITE: Color = Color::new(245, 245, 245, 255);
    pub const LIGHTGRAY: Color = Color::new(200, 200, 200, 255);
    pub const GRAY: Color = Color::new(130, 130, 130, 255);
    pub const DARKGRAY: Color = Color::new(80, 80, 80, 255);
    pub const MAROON: Color = Color::new(190, 33, 55, 255);
    pub const RED: Color = Color::new(230, 41, 55, 255);
    pub const ORANGE: Color = Color::new(255, 161, 0, 255);
    pub const GOLD: Color = Color::new(255, 203, 0, 255);
    pub const YELLOW: Color = Color::new(253, 249, 0, 255);
    pub const LIME: Color = Color::new(0, 158, 47, 255);
    pub const GREEN: Color = Color::new(0, 228, 48, 255);
    pub const SKYBLUE: Color = Color::new(102, 191, 255, 255);
    pub const BLUE: Color = Color::new(0, 121, 241, 255);
    pub const VIOLET: Color = Color::new(135, 60, 190, 255);
    pub const PURPLE: Color = Color::new(200, 122, 255, 255);
    pub const PINK: Color = Color::new(255, 109, 194, 255);
    pub const BROWN: Color = Color::new(127, 106, 79, 255);
    pub const BEIGE: Color = Color::new(211, 176, 131, 255);

    /// Same color with alpha scaled by `alpha` (clamped to `0.0..=1.0`).
    pub fn fade(self, alpha: f32) -> Self {
        let alpha = alpha.clamp(0.0, 1.0);
        Self {
            a: (255.0 * alpha) as u8,
            ..self
        }
    }
}

/// Axis-aligned rectangle in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// One draw call, as recorded or replayed by a backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum DrawCmd {
    Clear {
        color: Color,
    },
    Text {
        text: String,
        x: i32,
        y: i32,
        size: i32,
        color: Color,
    },
    Line {
        start: Vec2,
        end: Vec2,
        color: Color,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    Rect {
        rect: Rect,
        color: Color,
    },
    RectLines {
        rect: Rect,
        color: Color,
    },
    /// Whole texture stretched into `dest`, rotated `rotation` degrees
    /// around `origin` (relative to `dest`'s top-left corner).
    Texture {
        texture: TextureId,
        dest: Rect,
        origin: Vec2,
        rotation: f32,
        tint: Color,
    },
    Fps {
        x: i32,
        y: i32,
    },
}

/// An open frame on a [`Renderer`].
///
/// Created by [`Frame::begin`]; the frame is ended when the value is dropped.
pub struct Frame<'a> {
    renderer: &'a mut dyn Renderer,
    issued: usize,
}

impl<'a> Frame<'a> {
    /// Open a frame on `renderer`.
    pub fn begin(renderer: &'a mut dyn Renderer) -> Self {
        renderer.begin_frame();
        Self {
            renderer,
            issued: 0,
        }
    }

    /// Number of commands issued so far in this frame.
    pub fn issued(&self) -> usize {
        self.issued
    }

    /// Submit a raw command.
    pub fn submit(&mut self, cmd: DrawCmd) {
        self.issued += 1;
        self.renderer.submit(cmd);
    }

    pub fn clear(&mut self, color: Color) {
        self.submit(DrawCmd::Clear { color });
    }

    pub fn text(&mut self, text: impl Into<String>, x: i32, y: i32, size: i32, color: Color) {
        self.submit(DrawCmd::Text {
            text: text.into(),
            x,
            y,
            size,
            color,
        });
    }

    pub fn line(&mut self, start: Vec2, end: Vec2, color: Color) {
        self.submit(DrawCmd::Line { start, end, color });
    }

    pub fn circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.submit(DrawCmd::Circle {
            center,
            radius,
            color,
        });
    }

    pub fn rect(&mut self, rect: Rect, color: Color) {
        self.submit(DrawCmd::Rect { rect, color });
    }

    pub fn rect_lines(&mut self, rect: Rect, color: Color) {
        self.submit(DrawCmd::RectLines { rect, color });
    }

    pub fn fps(&mut self, x: i32, y: i32) {
        self.submit(DrawCmd::Fps { x, y });
    }

    /// Draw a whole texture into `width` x `height` at (`x`, `y`).
    ///
    /// `origin` is given as a fraction of the destination size, so
    /// `(0.5, 0.5)` rotates around and positions by the centre and
    /// `(0.5, 1.0)` by the bottom-middle.
    pub fn texture(
        &mut self,
        texture: &TextureInfo,
        pos: Vec2,
        size: Vec2,
        origin: Vec2,
        rotation: f32,
        tint: Color,
    ) {
        self.submit(DrawCmd::Texture {
            texture: texture.id,
            dest: Rect::new(pos.x, pos.y, size.x, size.y),
            origin: origin * size,
            rotation,
            tint,
        });
    }
}

impl Drop for Frame<'_> {
    fn drop(&mut self) {
        self.renderer.end_frame();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Log {
        events: Vec<String>,
    }

    impl Renderer for Log {
        fn begin_frame(&mut self) {
            self.events.push("begin".into());
        }
        fn submit(&mut self, cmd: DrawCmd) {
            self.events.push(format!("{cmd:?}"));
        }
        fn end_frame(&mut self) {
            self.events.push("end".into());
        }
    }

    #[test]
    fn frame_brackets_commands() {
        let mut log = Log::default();
        {
            let mut frame = Frame::begin(&mut log);
            frame.clear(Color::RAYWHITE);
            assert_eq!(frame.issued(), 1);
        }
        assert_eq!(log.events.len(), 3);
        assert_eq!(log.events[0], "begin");
        assert_eq!(log.events[2], "end");
    }

    #[test]
    fn frame_ends_when_drawing_panics() {
        let mut log = Log::default();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let mut frame = Frame::begin(&mut log);
            frame.clear(Color::BLACK);
            panic!("draw failed");
        }));
        assert!(result.is_err());
        assert_eq!(log.events.first().map(String::as_str), Some("begin"));
        assert_eq!(log.events.last().map(String::as_str), Some("end"));
    }

    #[test]
    fn texture_origin_is_scaled_by_size() {
        let mut log = Log::default();
        let tex = TextureInfo {
            id: TextureId(3),
            width: 16,
            height: 16,
        };
        let mut cmds = Vec::new();
        {
            let mut frame = Frame::begin(&mut log);
            frame.texture(
                &tex,
                Vec2::new(400.0, 200.0),
                Vec2::new(32.0, 32.0),
                Vec2::new(0.5, 1.0),
                0.0,
                Color::WHITE,
            );
        }
        cmds.push(DrawCmd::Texture {
            texture: TextureId(3),
            dest: Rect::new(400.0, 200.0, 32.0, 32.0),
            origin: Vec2::new(16.0, 32.0),
            rotation: 0.0,
            tint: Color::WHITE,
        });
        assert_eq!(log.events[1], format!("{:?}", cmds[0]));
    }

    #[test]
    fn fade_scales_alpha() {
        assert_eq!(Color::MAROON.fade(0.0).a, 0);
        assert_eq!(Color::MAROON.fade(1.0).a, 255);
        assert_eq!(Color::MAROON.fade(2.0).a, 255);
        assert_eq!(Color::MAROON.fade(0.5).r, Color::MAROON.r);
    }

    #[test]
    fn draw_commands_serialize_with_tag() {
        let json = serde_json::to_string(&DrawCmd::Fps { x: 10, y: 10 }).unwrap();
        assert_eq!(json, r#"{"cmd":"fps","x":10,"y":10}"#);
    }
}
