//! Driver systems.
//!
//! Submodules overview
//! - [`audio`] – audio thread bodies and the bridge systems (poll/forward message queues)
//! - [`input`] – poll the platform and update [`crate::resources::input::InputState`]
//! - [`render`] – debug overlay drawn after the game's frame
//! - [`time`] – update [`crate::resources::frametime::FrameTime`] from the platform's dt

pub mod audio;
pub mod input;
pub mod render;
pub mod time;
