//! The frame loop driver.
//!
//! [`FrameLoop`] owns one session: the session [`World`], the [`Game`] and the
//! [`Platform`]. [`FrameLoop::run`] executes
//!
//! 1. `load` once,
//! 2. while the termination predicate is false: sample dt, poll input, advance
//!    the audio collaborator, `update(dt)`, then `draw` inside a [`Frame`],
//! 3. `unload` once, then release every texture still held by
//!    [`TextureStore`] and stop the audio thread.
//!
//! The predicate (platform close signal, exit key, a quit or failure raised
//! through [`WorldSignals`]) is only evaluated at the top of an iteration, so
//! a frame that has started always runs both its update and its draw.

use bevy_ecs::observer::Observer;
use bevy_ecs::prelude::*;
use log::{debug, info, warn};

use crate::error::EngineError;
use crate::events::switchdebug::switch_debug_observer;
use crate::platform::{AssetLoader, Platform};
use crate::render::Frame;
use crate::resources::audio::{AudioThreadFn, setup_audio, shutdown_audio};
use crate::resources::frametime::FrameTime;
use crate::resources::gameconfig::GameConfig;
use crate::resources::input::InputState;
use crate::resources::screensize::ScreenSize;
use crate::resources::storage::ValueStorage;
use crate::resources::texturestore::TextureStore;
use crate::resources::worldsignals::WorldSignals;
use crate::systems::audio::audio_schedule;
use crate::systems::input::update_input_state;
use crate::systems::render::render_debug_overlay;
use crate::systems::time::update_frame_time;

/// An application driven by [`FrameLoop`].
///
/// Application state lives in the session world as resources; the
/// implementing type usually only holds its update [`Schedule`].
pub trait Game {
    /// Acquire everything the session needs. An error aborts the session.
    fn load(&mut self, world: &mut World, assets: &mut dyn AssetLoader) -> Result<(), EngineError>;

    /// Advance application state by `dt` seconds. Must not draw.
    ///
    /// `dt` is the same value the driver stored in [`FrameTime::delta`], so
    /// systems may read either.
    fn update(&mut self, world: &mut World, dt: f32);

    /// Issue this frame's draw calls. Must not mutate application state.
    fn draw(&self, world: &World, frame: &mut Frame<'_>);

    /// Release game-owned state. Textures in [`TextureStore`] are released
    /// by the driver afterwards.
    fn unload(&mut self, _world: &mut World) {}
}

impl<G: Game + ?Sized> Game for Box<G> {
    fn load(&mut self, world: &mut World, assets: &mut dyn AssetLoader) -> Result<(), EngineError> {
        (**self).load(world, assets)
    }

    fn update(&mut self, world: &mut World, dt: f32) {
        (**self).update(world, dt)
    }

    fn draw(&self, world: &World, frame: &mut Frame<'_>) {
        (**self).draw(world, frame)
    }

    fn unload(&mut self, world: &mut World) {
        (**self).unload(world)
    }
}

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Uninitialized,
    Loaded,
    Running,
    Unloaded,
}

impl SessionPhase {
    /// Whether `self -> next` is a legal transition.
    pub fn can_transition_to(self, next: SessionPhase) -> bool {
        use SessionPhase::*;
        matches!(
            (self, next),
            (Uninitialized, Loaded)
                | (Uninitialized, Unloaded)
                | (Loaded, Running)
                | (Loaded, Unloaded)
                | (Running, Unloaded)
        )
    }
}

/// What is left of a session after [`FrameLoop::run`] returns.
pub struct RunSummary<G, P> {
    pub game: G,
    pub platform: P,
    /// The session world as it was after unload.
    pub world: World,
    /// Number of completed frames.
    pub frames: u64,
    /// Number of textures the driver released at unload.
    pub textures_released: usize,
    /// Phase the session ended in; always [`SessionPhase::Unloaded`].
    pub phase: SessionPhase,
}

/// Drives one session of a [`Game`] on a [`Platform`].
pub struct FrameLoop<G: Game, P: Platform> {
    game: G,
    platform: P,
    world: World,
    config: GameConfig,
    audio: Option<Schedule>,
    phase: SessionPhase,
}

impl<G: Game, P: Platform> FrameLoop<G, P> {
    /// Create a session and populate its world with the driver-owned
    /// resources: [`FrameTime`], [`InputState`], [`WorldSignals`],
    /// [`ScreenSize`], [`TextureStore`], [`ValueStorage`] and the
    /// [`GameConfig`] itself.
    pub fn new(game: G, platform: P, config: GameConfig) -> Self {
        let mut world = World::new();
        world.insert_resource(FrameTime::default().with_time_scale(config.time_scale));
        world.insert_resource(InputState::default());
        world.insert_resource(WorldSignals::default());
        let (w, h) = platform.screen_size();
        world.insert_resource(ScreenSize { w, h });
        world.insert_resource(TextureStore::new());
        world.insert_resource(ValueStorage::file(config.storage_path.clone()));
        world.insert_resource(config.clone());
        world.spawn(Observer::new(switch_debug_observer));
        world.flush();

        Self {
            game,
            platform,
            world,
            config,
            audio: None,
            phase: SessionPhase::Uninitialized,
        }
    }

    /// Start an audio thread running `thread_fn` and advance it every frame.
    pub fn with_audio(mut self, thread_fn: AudioThreadFn) -> Self {
        setup_audio(&mut self.world, thread_fn);
        self.audio = Some(audio_schedule());
        self
    }

    /// Access the session world before the session runs, e.g. to replace a
    /// resource.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    fn transition(&mut self, next: SessionPhase) {
        debug_assert!(
            self.phase.can_transition_to(next),
            "illegal session transition {:?} -> {:?}",
            self.phase,
            next
        );
        debug!("Session {:?} -> {:?}", self.phase, next);
        self.phase = next;
    }

    /// Run the session to completion.
    ///
    /// Returns the load error if the game could not acquire its resources;
    /// anything acquired before the failure has been released by then. A
    /// failure raised through [`WorldSignals::fail`] while running ends the
    /// session the same way a quit does and is returned after unload.
    pub fn run(mut self) -> Result<RunSummary<G, P>, EngineError> {
        info!("Loading session '{}'", self.config.title);
        if let Err(e) = self.game.load(&mut self.world, &mut self.platform) {
            warn!("Load failed, releasing partially acquired resources");
            self.release_resources();
            self.transition(SessionPhase::Unloaded);
            return Err(e);
        }
        self.world.flush();
        self.transition(SessionPhase::Loaded);

        let mut frames: u64 = 0;
        while !self.should_terminate() {
            if self.phase == SessionPhase::Loaded {
                self.transition(SessionPhase::Running);
            }
            self.step();
            frames += 1;
        }
        info!("Session ended after {} frames", frames);

        self.game.unload(&mut self.world);
        let textures_released = self.release_resources();
        self.transition(SessionPhase::Unloaded);

        if let Some(e) = self.world.resource_mut::<WorldSignals>().take_failure() {
            warn!("Session failed after {} frames", frames);
            return Err(e);
        }

        Ok(RunSummary {
            game: self.game,
            platform: self.platform,
            world: self.world,
            frames,
            textures_released,
            phase: self.phase,
        })
    }

    /// Termination predicate, checked once per iteration before the frame.
    fn should_terminate(&self) -> bool {
        if self.platform.should_close() {
            debug!("Platform requested close");
            return true;
        }
        let signals = self.world.resource::<WorldSignals>();
        if let Some(e) = signals.failure() {
            debug!("Session failed: {}", e);
            return true;
        }
        if signals.quit_requested() {
            debug!("Quit requested by the game");
            return true;
        }
        match self.config.exit_key {
            Some(key) => self.world.resource::<InputState>().is_pressed(key),
            None => false,
        }
    }

    /// One frame: timing, input, audio advance, update, draw.
    fn step(&mut self) {
        let raw_dt = self.platform.frame_time();
        let dt = update_frame_time(&mut self.world, raw_dt, self.config.delta_policy);

        let (w, h) = self.platform.screen_size();
        {
            let mut screen = self.world.resource_mut::<ScreenSize>();
            if screen.w != w || screen.h != h {
                screen.w = w;
                screen.h = h;
            }
        }

        update_input_state(&mut self.world, &self.platform);
        self.world.flush();

        if let Some(audio) = self.audio.as_mut() {
            audio.run(&mut self.world);
        }

        self.game.update(&mut self.world, dt);
        self.world.flush();

        let fps = self.platform.fps();
        {
            let mut frame = Frame::begin(&mut self.platform);
            self.game.draw(&self.world, &mut frame);
            render_debug_overlay(&self.world, &mut frame, fps);
        }

        self.world.clear_trackers();
    }

    fn release_resources(&mut self) -> usize {
        let released = self
            .world
            .resource_mut::<TextureStore>()
            .release_all(&mut self.platform);
        if released > 0 {
            info!("Released {} textures", released);
        }
        if shutdown_audio(&mut self.world) {
            info!("Audio thread stopped");
        }
        self.audio = None;
        released
    }
}

#[cfg(test)]
mod tests {
    use super::SessionPhase::*;

    #[test]
    fn legal_transitions() {
        assert!(Uninitialized.can_transition_to(Loaded));
        assert!(Loaded.can_transition_to(Running));
        assert!(Running.can_transition_to(Unloaded));
        assert!(Loaded.can_transition_to(Unloaded));
        assert!(Uninitialized.can_transition_to(Unloaded));
    }

    #[test]
    fn no_restart_after_unload() {
        assert!(!Unloaded.can_transition_to(Loaded));
        assert!(!Unloaded.can_transition_to(Running));
        assert!(!Unloaded.can_transition_to(Uninitialized));
        assert!(!Running.can_transition_to(Loaded));
        assert!(!Uninitialized.can_transition_to(Running));
    }
}
