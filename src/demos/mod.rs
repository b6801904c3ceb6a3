//! Sample applications running on the frame loop.
//!
//! - [`starter`] – spinning crate template
//! - [`mario`] – the Mario walkthrough
//! - [`input_keys`] – arrow-key ball
//! - [`bouncing_ball`] – pausable bouncing ball
//! - [`storage_values`] – two-slot value save/load
//! - [`music_player`] – module music streaming with a progress bar

pub mod bouncing_ball;
pub mod input_keys;
pub mod mario;
pub mod music_player;
pub mod starter;
pub mod storage_values;

use clap::ValueEnum;

use crate::driver::Game;

/// Selectable demo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DemoKind {
    Starter,
    Mario,
    InputKeys,
    BouncingBall,
    StorageValues,
    MusicPlayer,
}

impl DemoKind {
    /// Default window title.
    pub fn title(self) -> &'static str {
        match self {
            DemoKind::Starter => "Getting Started",
            DemoKind::Mario => "Mario Walkthrough",
            DemoKind::InputKeys => "keyboard input",
            DemoKind::BouncingBall => "bouncing ball",
            DemoKind::StorageValues => "storage save/load values",
            DemoKind::MusicPlayer => "module playing (streaming)",
        }
    }

    /// Whether the demo needs the audio thread.
    pub fn uses_audio(self) -> bool {
        matches!(self, DemoKind::MusicPlayer)
    }

    pub fn build(self) -> Box<dyn Game> {
        match self {
            DemoKind::Starter => Box::new(starter::StarterGame::new()),
            DemoKind::Mario => Box::new(mario::MarioGame::new()),
            DemoKind::InputKeys => Box::new(input_keys::InputKeysGame::new()),
            DemoKind::BouncingBall => Box::new(bouncing_ball::BouncingBallGame::new()),
            DemoKind::StorageValues => Box::new(storage_values::StorageValuesGame::new()),
            DemoKind::MusicPlayer => Box::new(music_player::MusicPlayerGame::new()),
        }
    }
}
