//! Event types and observers.
//!
//! Submodules:
//! - [`audio`] – commands and messages for the background audio thread
//! - [`switchdebug`] – toggle the debug overlay on/off
pub mod audio;
pub mod switchdebug;
