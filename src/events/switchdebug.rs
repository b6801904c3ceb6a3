//! Event and observer to toggle the debug overlay.
//!
//! Emitting a [`SwitchDebugEvent`] flips the presence of the [`DebugMode`]
//! resource. The driver draws its overlay only while the resource exists.
use crate::resources::debugmode::DebugMode;
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::info;

/// Event used to toggle the [`DebugMode`] resource on/off.
///
/// This carries no data; the observer simply switches the presence of the
/// resource.
#[derive(Event, Debug, Clone, Copy)]
pub struct SwitchDebugEvent {}

/// Observer that toggles the [`DebugMode`] resource.
///
/// - If `DebugMode` is present, it is removed (debug disabled).
/// - If absent, it is inserted (debug enabled).
pub fn switch_debug_observer(
    _trigger: On<SwitchDebugEvent>,
    mut commands: Commands,
    debug_mode: Option<Res<DebugMode>>,
) {
    if debug_mode.is_some() {
        commands.remove_resource::<DebugMode>();
        info!("Debug mode disabled");
    } else {
        commands.insert_resource(DebugMode {});
        info!("Debug mode enabled");
    }
}
