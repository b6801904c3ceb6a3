//! Raylib-backed platform.
//!
//! Opens the window, polls keyboard and mouse, owns every loaded
//! `Texture2D`, and replays each frame's draw commands inside raylib's
//! drawing scope. Texture handles handed to games are plain ids; the
//! textures themselves never leave this struct.

use std::path::Path;

use glam::Vec2;
use raylib::prelude::*;
use rustc_hash::FxHashMap;

use crate::error::EngineError;
use crate::platform::{AssetLoader, InputSource, Platform, Renderer, TextureId, TextureInfo};
use crate::render::{self, DrawCmd};
use crate::resources::gameconfig::GameConfig;
use crate::resources::input::Key;

fn keyboard_key(key: Key) -> KeyboardKey {
    match key {
        Key::Up => KeyboardKey::KEY_UP,
        Key::Down => KeyboardKey::KEY_DOWN,
        Key::Left => KeyboardKey::KEY_LEFT,
        Key::Right => KeyboardKey::KEY_RIGHT,
        Key::Space => KeyboardKey::KEY_SPACE,
        Key::Enter => KeyboardKey::KEY_ENTER,
        Key::Escape => KeyboardKey::KEY_ESCAPE,
        Key::P => KeyboardKey::KEY_P,
        Key::R => KeyboardKey::KEY_R,
        Key::W => KeyboardKey::KEY_W,
        Key::A => KeyboardKey::KEY_A,
        Key::S => KeyboardKey::KEY_S,
        Key::D => KeyboardKey::KEY_D,
        Key::F10 => KeyboardKey::KEY_F10,
        Key::F11 => KeyboardKey::KEY_F11,
        Key::F12 => KeyboardKey::KEY_F12,
    }
}

fn color(c: render::Color) -> Color {
    Color::new(c.r, c.g, c.b, c.a)
}

fn vector(v: Vec2) -> Vector2 {
    Vector2::new(v.x, v.y)
}

fn rectangle(r: render::Rect) -> Rectangle {
    Rectangle::new(r.x, r.y, r.width, r.height)
}

/// Window, input and GPU resources of one raylib session.
pub struct RaylibPlatform {
    rl: RaylibHandle,
    thread: RaylibThread,
    textures: FxHashMap<TextureId, Texture2D>,
    next_texture: u32,
    pending: Vec<DrawCmd>,
}

impl RaylibPlatform {
    /// Open the window described by `config`.
    pub fn new(config: &GameConfig) -> Result<Self, EngineError> {
        let mut builder = raylib::init();
        builder
            .size(config.window_width as i32, config.window_height as i32)
            .title(&config.title)
            .resizable();
        if config.vsync {
            builder.vsync();
        }
        let (mut rl, thread) = builder.build();
        if !rl.is_window_ready() {
            return Err(EngineError::Platform("raylib window failed to open".into()));
        }
        rl.set_target_fps(config.target_fps);
        // The driver handles the exit key itself.
        rl.set_exit_key(None);

        Ok(Self {
            rl,
            thread,
            textures: FxHashMap::default(),
            next_texture: 0,
            pending: Vec::new(),
        })
    }
}

impl InputSource for RaylibPlatform {
    fn key_down(&self, key: Key) -> bool {
        self.rl.is_key_down(keyboard_key(key))
    }

    fn mouse_position(&self) -> Vec2 {
        let pos = self.rl.get_mouse_position();
        Vec2::new(pos.x, pos.y)
    }
}

impl Renderer for RaylibPlatform {
    fn begin_frame(&mut self) {
        self.pending.clear();
    }

    fn submit(&mut self, cmd: DrawCmd) {
        self.pending.push(cmd);
    }

    fn end_frame(&mut self) {
        let Self {
            rl,
            thread,
            textures,
            pending,
            ..
        } = self;
        let mut d = rl.begin_drawing(thread);
        for cmd in pending.drain(..) {
            match cmd {
                DrawCmd::Clear { color: c } => d.clear_background(color(c)),
                DrawCmd::Text {
                    text,
                    x,
                    y,
                    size,
                    color: c,
                } => d.draw_text(&text, x, y, size, color(c)),
                DrawCmd::Line {
                    start,
                    end,
                    color: c,
                } => d.draw_line_v(vector(start), vector(end), color(c)),
                DrawCmd::Circle {
                    center,
                    radius,
                    color: c,
                } => d.draw_circle_v(vector(center), radius, color(c)),
                DrawCmd::Rect { rect, color: c } => d.draw_rectangle_rec(rectangle(rect), color(c)),
                DrawCmd::RectLines { rect, color: c } => {
                    d.draw_rectangle_lines_ex(rectangle(rect), 1.0, color(c))
                }
                DrawCmd::Texture {
                    texture,
                    dest,
                    origin,
                    rotation,
                    tint,
                } => {
                    if let Some(tex) = textures.get(&texture) {
                        let src = Rectangle::new(0.0, 0.0, tex.width as f32, tex.height as f32);
                        d.draw_texture_pro(
                            tex,
                            src,
                            rectangle(dest),
                            vector(origin),
                            rotation,
                            color(tint),
                        );
                    }
                }
                DrawCmd::Fps { x, y } => d.draw_fps(x, y),
            }
        }
        // Dropping `d` ends raylib's drawing scope.
    }
}

impl AssetLoader for RaylibPlatform {
    fn load_texture(&mut self, path: &Path) -> Result<TextureInfo, String> {
        let texture = self
            .rl
            .load_texture(&self.thread, &path.to_string_lossy())
            .map_err(|e| e.to_string())?;
        self.next_texture += 1;
        let id = TextureId(self.next_texture);
        let info = TextureInfo {
            id,
            width: texture.width.max(0) as u32,
            height: texture.height.max(0) as u32,
        };
        self.textures.insert(id, texture);
        Ok(info)
    }

    fn unload_texture(&mut self, id: TextureId) {
        // Texture2D unloads on drop.
        self.textures.remove(&id);
    }
}

impl Platform for RaylibPlatform {
    fn should_close(&self) -> bool {
        self.rl.window_should_close()
    }

    fn frame_time(&mut self) -> f32 {
        self.rl.get_frame_time()
    }

    fn screen_size(&self) -> (i32, i32) {
        (self.rl.get_screen_width(), self.rl.get_screen_height())
    }

    fn fps(&self) -> u32 {
        self.rl.get_fps()
    }
}
