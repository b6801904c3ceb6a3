//! Windowless platform with scripted input and recorded output.
//!
//! Each call to [`Platform::frame_time`] starts a new scripted frame: it pops
//! the next dt and the next [`FrameInput`] (falling back to the fixed dt and
//! to no keys held). Draw commands submitted between `begin_frame` and
//! `end_frame` are recorded per frame and optionally handed to a sink.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use glam::Vec2;
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use crate::platform::{AssetLoader, InputSource, Platform, Renderer, TextureId, TextureInfo};
use crate::render::DrawCmd;
use crate::resources::input::Key;

const VIRTUAL_TEXTURE_SIZE: u32 = 64;

/// Callback receiving `(frame_index, commands)` after every frame.
pub type FrameSink = Box<dyn FnMut(u64, &[DrawCmd])>;

/// Input held during one scripted frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameInput {
    pub held: SmallVec<[Key; 4]>,
    pub mouse: Vec2,
}

impl FrameInput {
    /// No keys held, mouse at the origin.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Hold `keys` for the frame.
    pub fn holding(keys: &[Key]) -> Self {
        Self {
            held: keys.iter().copied().collect(),
            mouse: Vec2::ZERO,
        }
    }

    pub fn with_mouse(mut self, mouse: Vec2) -> Self {
        self.mouse = mouse;
        self
    }
}

/// Headless [`Platform`] used by tests and `--headless` runs.
pub struct HeadlessPlatform {
    width: i32,
    height: i32,
    dt: f32,
    dt_script: VecDeque<f32>,
    input_script: VecDeque<FrameInput>,
    current: FrameInput,
    last_dt: f32,
    max_frames: Option<u64>,
    frames_completed: u64,
    in_frame: bool,
    pending: Vec<DrawCmd>,
    record: bool,
    recorded: Vec<Vec<DrawCmd>>,
    sink: Option<FrameSink>,
    next_texture: u32,
    live: FxHashMap<TextureId, PathBuf>,
    released: Vec<TextureId>,
    missing: FxHashSet<PathBuf>,
}

impl HeadlessPlatform {
    /// A `width` x `height` screen with a fixed dt of 1/60 s and no frame
    /// limit.
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            dt: 1.0 / 60.0,
            dt_script: VecDeque::new(),
            input_script: VecDeque::new(),
            current: FrameInput::idle(),
            last_dt: 0.0,
            max_frames: None,
            frames_completed: 0,
            in_frame: false,
            pending: Vec::new(),
            record: true,
            recorded: Vec::new(),
            sink: None,
            next_texture: 0,
            live: FxHashMap::default(),
            released: Vec::new(),
            missing: FxHashSet::default(),
        }
    }

    /// Fixed dt used when the dt script is exhausted.
    pub fn with_fixed_dt(mut self, dt: f32) -> Self {
        self.dt = dt;
        self
    }

    /// Per-frame dt values, consumed one per frame.
    pub fn with_dt_script(mut self, dts: impl IntoIterator<Item = f32>) -> Self {
        self.dt_script.extend(dts);
        self
    }

    /// Per-frame input, consumed one per frame.
    pub fn with_input_script(mut self, inputs: impl IntoIterator<Item = FrameInput>) -> Self {
        self.input_script.extend(inputs);
        self
    }

    /// Signal close once `frames` frames have been completed.
    pub fn with_max_frames(mut self, frames: u64) -> Self {
        self.max_frames = Some(frames);
        self
    }

    /// Make loading `path` fail as if the file did not exist.
    pub fn with_missing_asset(mut self, path: impl Into<PathBuf>) -> Self {
        self.missing.insert(path.into());
        self
    }

    /// Keep (default) or discard per-frame recordings.
    pub fn with_recording(mut self, record: bool) -> Self {
        self.record = record;
        self
    }

    /// Hand every finished frame to `sink`.
    pub fn with_sink(mut self, sink: FrameSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Recorded draw commands, one entry per completed frame.
    pub fn frames(&self) -> &[Vec<DrawCmd>] {
        &self.recorded
    }

    pub fn frames_completed(&self) -> u64 {
        self.frames_completed
    }

    /// Textures loaded and not yet released.
    pub fn live_textures(&self) -> usize {
        self.live.len()
    }

    /// Released texture ids, in release order.
    pub fn released_textures(&self) -> &[TextureId] {
        &self.released
    }
}

impl InputSource for HeadlessPlatform {
    fn key_down(&self, key: Key) -> bool {
        self.current.held.contains(&key)
    }

    fn mouse_position(&self) -> Vec2 {
        self.current.mouse
    }
}

impl Renderer for HeadlessPlatform {
    fn begin_frame(&mut self) {
        debug_assert!(!self.in_frame, "begin_frame called twice");
        self.in_frame = true;
        self.pending.clear();
    }

    fn submit(&mut self, cmd: DrawCmd) {
        debug_assert!(self.in_frame, "draw command outside of a frame");
        self.pending.push(cmd);
    }

    fn end_frame(&mut self) {
        self.in_frame = false;
        let cmds = std::mem::take(&mut self.pending);
        if let Some(sink) = self.sink.as_mut() {
            sink(self.frames_completed, &cmds);
        }
        if self.record {
            self.recorded.push(cmds);
        }
        self.frames_completed += 1;
    }
}

impl AssetLoader for HeadlessPlatform {
    fn load_texture(&mut self, path: &Path) -> Result<TextureInfo, String> {
        if self.missing.contains(path) {
            return Err(format!("{} not found", path.display()));
        }
        self.next_texture += 1;
        let id = TextureId(self.next_texture);
        self.live.insert(id, path.to_path_buf());
        Ok(TextureInfo {
            id,
            width: VIRTUAL_TEXTURE_SIZE,
            height: VIRTUAL_TEXTURE_SIZE,
        })
    }

    fn unload_texture(&mut self, id: TextureId) {
        if self.live.remove(&id).is_some() {
            self.released.push(id);
        } else {
            log::warn!("Texture {:?} released twice or never loaded", id);
        }
    }
}

impl Platform for HeadlessPlatform {
    fn should_close(&self) -> bool {
        self.max_frames
            .is_some_and(|max| self.frames_completed >= max)
    }

    fn frame_time(&mut self) -> f32 {
        self.current = self.input_script.pop_front().unwrap_or_default();
        self.last_dt = self.dt_script.pop_front().unwrap_or(self.dt);
        self.last_dt
    }

    fn screen_size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    fn fps(&self) -> u32 {
        if self.last_dt > 0.0 {
            (1.0 / self.last_dt).round() as u32
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{Color, Frame};

    #[test]
    fn input_script_advances_per_frame() {
        let mut p = HeadlessPlatform::new(800, 450).with_input_script([
            FrameInput::holding(&[Key::Right]),
            FrameInput::idle().with_mouse(Vec2::new(5.0, 6.0)),
        ]);
        p.frame_time();
        assert!(p.key_down(Key::Right));
        p.frame_time();
        assert!(!p.key_down(Key::Right));
        assert_eq!(p.mouse_position(), Vec2::new(5.0, 6.0));
        p.frame_time();
        assert_eq!(p.mouse_position(), Vec2::ZERO);
    }

    #[test]
    fn dt_script_then_fixed() {
        let mut p = HeadlessPlatform::new(800, 450)
            .with_fixed_dt(0.5)
            .with_dt_script([1.0, 2.0]);
        assert_eq!(p.frame_time(), 1.0);
        assert_eq!(p.frame_time(), 2.0);
        assert_eq!(p.frame_time(), 0.5);
        assert_eq!(p.fps(), 2);
    }

    #[test]
    fn frames_are_recorded_and_close_after_limit() {
        let mut p = HeadlessPlatform::new(800, 450).with_max_frames(2);
        for _ in 0..2 {
            assert!(!p.should_close());
            let mut frame = Frame::begin(&mut p);
            frame.clear(Color::RAYWHITE);
        }
        assert!(p.should_close());
        assert_eq!(p.frames().len(), 2);
        assert_eq!(p.frames()[1], vec![DrawCmd::Clear { color: Color::RAYWHITE }]);
    }

    #[test]
    fn missing_assets_fail_and_live_count_tracks_loads() {
        let mut p = HeadlessPlatform::new(800, 450).with_missing_asset("gone.png");
        assert!(p.load_texture(Path::new("gone.png")).is_err());
        let tex = p.load_texture(Path::new("here.png")).unwrap();
        assert_eq!(p.live_textures(), 1);
        p.unload_texture(tex.id);
        assert_eq!(p.live_textures(), 0);
        assert_eq!(p.released_textures(), &[tex.id]);
    }
}
