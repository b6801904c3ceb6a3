//! Platform backends.
//!
//! - [`headless`] – scripted input, recorded draw commands, virtual textures
//! - `raylib` – window, input, textures and drawing through raylib (feature
//!   `raylib`)
pub mod headless;
#[cfg(feature = "raylib")]
pub mod raylib;
