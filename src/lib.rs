//! rayloop: a real-time frame loop driver.
//!
//! A session runs `load → (update, draw)* → unload` against a [`Platform`]
//! that supplies input, timing, texture loading and a renderer. Application
//! state lives in a `bevy_ecs` [`World`](bevy_ecs::world::World) owned by
//! the session.
//!
//! - [`driver`] – [`FrameLoop`](driver::FrameLoop) and the [`Game`](driver::Game) contract
//! - [`platform`] – collaborator traits implemented by backends
//! - [`backend`] – headless and raylib platforms
//! - [`render`] – draw commands and the scoped [`Frame`](render::Frame)
//! - [`resources`] – session resources (input, timing, textures, storage, config)
//! - [`events`] – audio commands/replies and the debug toggle
//! - [`systems`] – per-frame systems run by the driver
//! - [`demos`] – sample applications
//!
//! [`Platform`]: platform::Platform

pub mod backend;
pub mod demos;
pub mod driver;
pub mod error;
pub mod events;
pub mod platform;
pub mod render;
pub mod resources;
pub mod systems;
