//! Session signals raised by the game and read by the driver.
//!
//! Systems ask for the end of the session through [`WorldSignals`]. A quit
//! is honoured once the current frame has been drawn. A failure also ends
//! the session, and [`FrameLoop::run`](crate::driver::FrameLoop::run)
//! returns it as its error after unloading.

use bevy_ecs::prelude::Resource;
use log::warn;

use crate::error::EngineError;

#[derive(Debug, Default, Resource)]
pub struct WorldSignals {
    quit: bool,
    failure: Option<EngineError>,
}

impl WorldSignals {
    /// Ask the driver to end the session after the current frame.
    pub fn request_quit(&mut self) {
        self.quit = true;
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// End the session with `error`. Only the first failure is kept.
    pub fn fail(&mut self, error: EngineError) {
        if self.failure.is_some() {
            warn!("Session already failed, dropping: {}", error);
        } else {
            self.failure = Some(error);
        }
        self.quit = true;
    }

    pub fn failure(&self) -> Option<&EngineError> {
        self.failure.as_ref()
    }

    pub fn take_failure(&mut self) -> Option<EngineError> {
        self.failure.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quit_is_sticky() {
        let mut signals = WorldSignals::default();
        assert!(!signals.quit_requested());
        signals.request_quit();
        signals.request_quit();
        assert!(signals.quit_requested());
        assert!(signals.failure().is_none());
    }

    #[test]
    fn failure_requests_quit_and_keeps_the_first_error() {
        let mut signals = WorldSignals::default();
        signals.fail(EngineError::Audio("device lost".into()));
        signals.fail(EngineError::Platform("second".into()));
        assert!(signals.quit_requested());
        assert!(matches!(
            signals.take_failure(),
            Some(EngineError::Audio(msg)) if msg == "device lost"
        ));
        assert!(signals.take_failure().is_none());
    }
}
