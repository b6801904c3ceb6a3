//! Integration tests for the audio bridge: commands written as bevy messages
//! reach the audio thread and its replies come back as messages.

use std::time::{Duration, Instant};

use bevy_ecs::message::Messages;
use bevy_ecs::prelude::*;

use rayloop::events::audio::{AudioCmd, AudioMessage};
use rayloop::resources::audio::{AudioBridge, setup_audio, shutdown_audio};
use rayloop::systems::audio::{audio_schedule, silent_audio_thread};

#[derive(Resource, Default)]
struct Received(Vec<AudioMessage>);

fn collect_replies(mut reader: MessageReader<AudioMessage>, mut received: ResMut<Received>) {
    received.0.extend(reader.read().cloned());
}

/// Advance the bridge until `done` holds or a second has passed.
fn pump_until(world: &mut World, done: impl Fn(&[AudioMessage]) -> bool) {
    let mut audio = audio_schedule();
    let mut collect = Schedule::default();
    collect.add_systems(collect_replies);

    let deadline = Instant::now() + Duration::from_secs(1);
    while Instant::now() < deadline {
        audio.run(world);
        collect.run(world);
        if done(&world.resource::<Received>().0) {
            return;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn commands_round_trip_through_the_silent_thread() {
    let mut world = World::new();
    world.init_resource::<Received>();
    setup_audio(&mut world, silent_audio_thread);

    {
        let mut cmds = world.resource_mut::<Messages<AudioCmd>>();
        cmds.write(AudioCmd::LoadMusic {
            id: "theme".into(),
            path: "theme.xm".into(),
        });
        cmds.write(AudioCmd::PlayMusic {
            id: "theme".into(),
            looped: true,
        });
    }

    pump_until(&mut world, |msgs| msgs.len() >= 2);

    let received = &world.resource::<Received>().0;
    assert_eq!(
        received.as_slice(),
        &[
            AudioMessage::MusicLoaded { id: "theme".into() },
            AudioMessage::MusicPlayStarted { id: "theme".into() },
        ]
    );

    assert!(shutdown_audio(&mut world));
    assert!(!world.contains_resource::<AudioBridge>());
}

#[test]
fn shutdown_without_bridge_is_a_no_op() {
    let mut world = World::new();
    assert!(!shutdown_audio(&mut world));
}

#[test]
fn commands_are_forwarded_once() {
    let mut world = World::new();
    world.init_resource::<Received>();
    setup_audio(&mut world, silent_audio_thread);

    world
        .resource_mut::<Messages<AudioCmd>>()
        .write(AudioCmd::LoadFx {
            id: "jump".into(),
            path: "jump.wav".into(),
        });

    // Keep pumping well past the first reply; a duplicate forward would
    // produce a second FxLoaded.
    pump_until(&mut world, |_| false);

    let loaded = world
        .resource::<Received>()
        .0
        .iter()
        .filter(|m| matches!(m, AudioMessage::FxLoaded { .. }))
        .count();
    assert_eq!(loaded, 1);
    shutdown_audio(&mut world);
}
