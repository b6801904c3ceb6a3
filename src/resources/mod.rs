//! ECS resources made available to systems.
//!
//! Long-lived data the driver inserts into the session world. Games read them
//! during update and draw and add their own state next to them.
//!
//! Overview
//! - `audio` – bridge and channels for the background audio thread
//! - `debugmode` – presence toggles the debug overlay
//! - `frametime` – per-frame delta, elapsed time and the delta policy
//! - `gameconfig` – INI-backed session configuration
//! - `input` – per-frame keyboard and mouse state
//! - `screensize` – current framebuffer dimensions in pixels
//! - `storage` – two-slot style integer value storage
//! - `texturestore` – loaded textures keyed by string IDs
//! - `worldsignals` – named flags and values, including the quit flag
pub mod audio;
pub mod debugmode;
pub mod frametime;
pub mod gameconfig;
pub mod input;
pub mod screensize;
pub mod storage;
pub mod texturestore;
pub mod worldsignals;
