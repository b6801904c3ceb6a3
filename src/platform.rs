//! Collaborator traits the frame loop drives.
//!
//! A backend implements [`InputSource`], [`Renderer`] and [`AssetLoader`], and
//! ties them together with [`Platform`], which adds the window-level pieces:
//! the close signal, frame timing and screen size.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::render::DrawCmd;
use crate::resources::input::Key;

/// Opaque texture handle issued by an [`AssetLoader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextureId(pub u32);

/// A loaded texture: its handle and pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureInfo {
    pub id: TextureId,
    pub width: u32,
    pub height: u32,
}

/// Polled input. State is as of the most recent platform poll.
pub trait InputSource {
    fn key_down(&self, key: Key) -> bool;
    fn mouse_position(&self) -> Vec2;
}

/// Retained-mode render target.
///
/// `submit` is only called between `begin_frame` and `end_frame`; use
/// [`Frame`](crate::render::Frame) rather than calling these directly.
pub trait Renderer {
    fn begin_frame(&mut self);
    fn submit(&mut self, cmd: DrawCmd);
    fn end_frame(&mut self);
}

/// Acquires and releases GPU-side resources.
pub trait AssetLoader {
    /// Load the texture at `path`. The error is a backend-specific reason.
    fn load_texture(&mut self, path: &Path) -> Result<TextureInfo, String>;
    /// Release a texture previously returned by [`load_texture`](Self::load_texture).
    fn unload_texture(&mut self, id: TextureId);
}

/// A complete backend for one session.
pub trait Platform: InputSource + Renderer + AssetLoader {
    /// Whether the platform asked the session to end (window close button,
    /// frame limit, ...).
    fn should_close(&self) -> bool;
    /// Seconds elapsed since the previous frame sample.
    fn frame_time(&mut self) -> f32;
    /// Current framebuffer size in pixels.
    fn screen_size(&self) -> (i32, i32);
    /// Frames per second as measured by the platform.
    fn fps(&self) -> u32;
}
