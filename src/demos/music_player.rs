//! Module music streaming through the audio thread.
//!
//! Space restarts the track, P pauses and resumes it. Colored circle waves
//! pulse while the music plays and a bar at the bottom tracks progress as
//! reported by [`AudioMessage::MusicProgress`].
//!
//! The track loads on the audio thread, so a load failure arrives as a reply
//! a frame or two into the session and fails it from there.

use arrayvec::ArrayVec;
use bevy_ecs::prelude::*;
use glam::Vec2;
use log::{error, info};

use crate::driver::Game;
use crate::error::EngineError;
use crate::events::audio::{AudioCmd, AudioMessage};
use crate::platform::AssetLoader;
use crate::render::{Color, Frame, Rect};
use crate::resources::audio::AudioBridge;
use crate::resources::frametime::FrameTime;
use crate::resources::input::{InputState, Key};
use crate::resources::screensize::ScreenSize;
use crate::resources::worldsignals::WorldSignals;

pub const MUSIC_ID: &str = "mini1111";
pub const MUSIC_PATH: &str = "./resources/mini1111.xm";
pub const MAX_WAVES: usize = 64;

const WAVE_COLORS: [Color; 14] = [
    Color::ORANGE,
    Color::RED,
    Color::GOLD,
    Color::LIME,
    Color::BLUE,
    Color::VIOLET,
    Color::BROWN,
    Color::LIGHTGRAY,
    Color::PINK,
    Color::YELLOW,
    Color::GREEN,
    Color::SKYBLUE,
    Color::PURPLE,
    Color::BEIGE,
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleWave {
    pub position: Vec2,
    pub radius: f32,
    pub alpha: f32,
    /// Alpha change per second; negative while fading out.
    pub speed: f32,
    pub color: Color,
}

impl CircleWave {
    fn spawn(rng: &mut fastrand::Rng, screen: ScreenSize) -> Self {
        let radius = rng.i32(10..=40);
        let x = rng.i32(radius..=(screen.w - radius).max(radius));
        let y = rng.i32(radius..=(screen.h - radius).max(radius));
        Self {
            position: Vec2::new(x as f32, y as f32),
            radius: radius as f32,
            alpha: 0.0,
            speed: rng.i32(1..=100) as f32 / 20000.0 * 60.0,
            color: WAVE_COLORS[rng.usize(..WAVE_COLORS.len())],
        }
    }
}

#[derive(Resource)]
pub struct Waves {
    pub waves: ArrayVec<CircleWave, MAX_WAVES>,
    rng: fastrand::Rng,
}

#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct MusicState {
    pub playing: bool,
    pub paused: bool,
    /// Fraction of the track played, `0.0..=1.0`.
    pub progress: f32,
}

pub fn track_music(
    mut reader: MessageReader<AudioMessage>,
    mut music: ResMut<MusicState>,
    mut signals: ResMut<WorldSignals>,
) {
    for msg in reader.read() {
        match msg {
            AudioMessage::MusicPlayStarted { id } if id == MUSIC_ID => {
                music.playing = true;
            }
            AudioMessage::MusicStopped { id } | AudioMessage::MusicFinished { id }
                if id == MUSIC_ID =>
            {
                music.playing = false;
            }
            AudioMessage::MusicProgress { id, played, length } if id == MUSIC_ID => {
                if *length > 0.0 {
                    music.progress = (played / length).clamp(0.0, 1.0);
                }
            }
            AudioMessage::MusicLoadFailed { id, error } if id == MUSIC_ID => {
                error!("Could not load music '{}': {}", id, error);
                signals.fail(EngineError::ResourceLoad {
                    key: id.clone(),
                    path: MUSIC_PATH.into(),
                    reason: error.clone(),
                });
            }
            _ => {}
        }
    }
}

pub fn music_controls(
    input: Res<InputState>,
    mut music: ResMut<MusicState>,
    mut writer: MessageWriter<AudioCmd>,
) {
    if input.is_pressed(Key::Space) {
        writer.write(AudioCmd::StopMusic {
            id: MUSIC_ID.into(),
        });
        writer.write(AudioCmd::PlayMusic {
            id: MUSIC_ID.into(),
            looped: true,
        });
        music.paused = false;
        music.progress = 0.0;
    }
    if input.is_pressed(Key::P) {
        music.paused = !music.paused;
        let id = MUSIC_ID.to_string();
        if music.paused {
            writer.write(AudioCmd::PauseMusic { id });
        } else {
            writer.write(AudioCmd::ResumeMusic { id });
        }
    }
}

pub fn animate_waves(
    time: Res<FrameTime>,
    screen: Res<ScreenSize>,
    music: Res<MusicState>,
    mut waves: ResMut<Waves>,
) {
    if music.paused {
        return;
    }
    let dt = time.delta;
    let screen = *screen;
    let Waves { waves, rng } = &mut *waves;
    for wave in waves.iter_mut() {
        wave.alpha += wave.speed * dt;
        wave.radius += wave.speed * 10.0 * dt;
        if wave.alpha > 1.0 {
            wave.speed = -wave.speed.abs();
        }
        if wave.alpha <= 0.0 && wave.speed < 0.0 {
            *wave = CircleWave::spawn(rng, screen);
        }
    }
}

pub struct MusicPlayerGame {
    seed: Option<u64>,
    update: Schedule,
}

impl MusicPlayerGame {
    pub fn new() -> Self {
        let mut update = Schedule::default();
        update.add_systems((track_music, music_controls, animate_waves).chain());
        Self { seed: None, update }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Default for MusicPlayerGame {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for MusicPlayerGame {
    fn load(&mut self, world: &mut World, _assets: &mut dyn AssetLoader) -> Result<(), EngineError> {
        if !world.contains_resource::<AudioBridge>() {
            return Err(EngineError::Audio("no audio thread running".into()));
        }
        let mut rng = match self.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        let screen = *world.resource::<ScreenSize>();
        let waves = (0..MAX_WAVES)
            .map(|_| CircleWave::spawn(&mut rng, screen))
            .collect();
        world.insert_resource(Waves { waves, rng });
        world.insert_resource(MusicState::default());

        let mut cmds = world.resource_mut::<Messages<AudioCmd>>();
        cmds.write(AudioCmd::LoadMusic {
            id: MUSIC_ID.into(),
            path: MUSIC_PATH.into(),
        });
        cmds.write(AudioCmd::PlayMusic {
            id: MUSIC_ID.into(),
            looped: true,
        });
        info!("Queued music '{}' from {}", MUSIC_ID, MUSIC_PATH);
        Ok(())
    }

    fn update(&mut self, world: &mut World, _dt: f32) {
        self.update.run(world);
    }

    fn draw(&self, world: &World, frame: &mut Frame<'_>) {
        let screen = world.resource::<ScreenSize>();
        let music = world.resource::<MusicState>();

        frame.clear(Color::RAYWHITE);
        for wave in world.resource::<Waves>().waves.iter().rev() {
            frame.circle(wave.position, wave.radius, wave.color.fade(wave.alpha));
        }

        let (w, h) = (screen.w as f32, screen.h as f32);
        let bar = Rect::new(20.0, h - 20.0 - 12.0, w - 40.0, 12.0);
        frame.rect(bar, Color::LIGHTGRAY);
        frame.rect(
            Rect::new(bar.x, bar.y, bar.width * music.progress, bar.height),
            Color::MAROON,
        );
        frame.rect_lines(bar, Color::GRAY);
    }

    fn unload(&mut self, world: &mut World) {
        if let Some(bridge) = world.get_resource::<AudioBridge>() {
            let _ = bridge.tx_cmd.send(AudioCmd::UnloadMusic {
                id: MUSIC_ID.into(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waves_spawn_inside_the_screen() {
        let mut rng = fastrand::Rng::with_seed(7);
        let screen = ScreenSize { w: 800, h: 450 };
        for _ in 0..200 {
            let wave = CircleWave::spawn(&mut rng, screen);
            assert!((10.0..=40.0).contains(&wave.radius));
            assert!(wave.position.x >= wave.radius && wave.position.x <= 800.0 - wave.radius);
            assert!(wave.position.y >= wave.radius && wave.position.y <= 450.0 - wave.radius);
            assert!(wave.speed > 0.0);
            assert_eq!(wave.alpha, 0.0);
        }
    }
}
