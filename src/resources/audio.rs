//! ECS resources that bridge the main thread with the background audio thread.
//!
//! Use [`setup_audio`] once during initialization to spawn the audio thread
//! and insert the [`AudioBridge`] and message resources. Call
//! [`shutdown_audio`] during teardown to gracefully stop the thread and free
//! audio resources.

use crate::events::audio::{AudioCmd, AudioMessage};
use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, Sender, unbounded};

/// Body of an audio thread: consumes commands until [`AudioCmd::Shutdown`]
/// and reports outcomes.
pub type AudioThreadFn = fn(Receiver<AudioCmd>, Sender<AudioMessage>);

/// Shared bridge between the ECS world and the audio thread.
///
/// This resource is created by [`setup_audio`]. Systems send commands by
/// writing [`AudioCmd`] messages; the bridge forwards them once per frame.
#[derive(Resource)]
pub struct AudioBridge {
    /// Sender for [`AudioCmd`] messages (ECS -> audio thread).
    pub tx_cmd: Sender<AudioCmd>,
    /// Receiver for [`AudioMessage`] messages (audio thread -> ECS).
    pub rx_msg: Receiver<AudioMessage>,
    /// Join handle for the background audio thread.
    pub handle: std::thread::JoinHandle<()>,
}

/// Spawn the audio thread and register bridge resources.
///
/// This function:
/// - Creates command/event channels.
/// - Spawns the background thread running `thread_fn`.
/// - Inserts [`AudioBridge`] and initializes `Messages<AudioMessage>` and
///   `Messages<AudioCmd>` so that systems can send commands and poll for
///   events.
pub fn setup_audio(world: &mut World, thread_fn: AudioThreadFn) {
    let (tx_cmd, rx_cmd) = unbounded::<AudioCmd>();
    let (tx_msg, rx_msg) = unbounded::<AudioMessage>();

    let handle = std::thread::spawn(move || thread_fn(rx_cmd, tx_msg));

    world.insert_resource(AudioBridge {
        tx_cmd,
        rx_msg,
        handle,
    });
    world.insert_resource(Messages::<AudioMessage>::default());
    world.insert_resource(Messages::<AudioCmd>::default());
}

/// Gracefully request shutdown of the audio thread and join it.
///
/// If the bridge resource exists, sends [`AudioCmd::Shutdown`], waits for the
/// thread to exit, and removes the resource from the world. Returns `false`
/// when there was no bridge to shut down.
pub fn shutdown_audio(world: &mut World) -> bool {
    if let Some(bridge) = world.remove_resource::<AudioBridge>() {
        let _ = bridge.tx_cmd.send(AudioCmd::Shutdown);
        if bridge.handle.join().is_err() {
            log::error!("Audio thread panicked during shutdown");
        }
        true
    } else {
        false
    }
}
