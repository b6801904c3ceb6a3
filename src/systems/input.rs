//! Input systems.
//!
//! - [`update_input_state`] polls an [`InputSource`] each frame and writes the
//!   results into [`InputState`].
//! - Pressing F11 triggers
//!   [`SwitchDebugEvent`](crate::events::switchdebug::SwitchDebugEvent).
use bevy_ecs::prelude::*;

use crate::events::switchdebug::SwitchDebugEvent;
use crate::platform::InputSource;
use crate::resources::input::{InputState, Key};

/// Poll `source` for every tracked key and the mouse, updating the
/// `InputState` resource.
pub fn update_input_state<S: InputSource + ?Sized>(world: &mut World, source: &S) {
    let debug_pressed = {
        let mut input = world.resource_mut::<InputState>();
        for key in Key::ALL {
            input.apply_key(key, source.key_down(key));
        }
        input.set_mouse_position(source.mouse_position());
        input.is_pressed(Key::F11)
    };

    if debug_pressed {
        world.trigger(SwitchDebugEvent {});
    }
}
