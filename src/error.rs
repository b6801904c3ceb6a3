//! Engine error types.
//!
//! Every fallible library call returns [`EngineError`]. Only resource loading
//! is treated as fatal by the driver; the rest are reported to the caller.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while driving a session.
#[derive(Error, Debug)]
pub enum EngineError {
    /// A required resource could not be acquired during load.
    #[error("failed to load resource '{key}' from {path}: {reason}")]
    ResourceLoad {
        /// Store key the resource was requested under.
        key: String,
        /// Path the resource was loaded from.
        path: PathBuf,
        /// Backend-provided reason.
        reason: String,
    },

    /// A handle key was acquired twice without being released in between.
    #[error("resource '{0}' is already acquired")]
    AlreadyAcquired(String),

    /// Reading or writing the value storage file failed.
    #[error("storage error on {path}: {source}")]
    Storage {
        /// Storage file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A storage slot beyond the addressable range was written.
    #[error("storage slot {0} is out of range")]
    SlotOutOfRange(usize),

    /// The configuration file could not be read or written.
    #[error("configuration error: {0}")]
    Config(String),

    /// The audio thread could not be reached.
    #[error("audio error: {0}")]
    Audio(String),

    /// The platform backend failed to initialize.
    #[error("platform error: {0}")]
    Platform(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_load_message_names_key_and_path() {
        let err = EngineError::ResourceLoad {
            key: "crate".into(),
            path: PathBuf::from("./assets/crate_1.png"),
            reason: "file not found".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'crate'"));
        assert!(msg.contains("./assets/crate_1.png"));
        assert!(msg.contains("file not found"));
    }

    #[test]
    fn already_acquired_message() {
        let err = EngineError::AlreadyAcquired("mario".into());
        assert_eq!(err.to_string(), "resource 'mario' is already acquired");
    }
}
