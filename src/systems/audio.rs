//! Audio systems and audio thread bodies.
//!
//! This module hosts the background audio threads and the systems that bridge
//! them with the session world:
//! - [`silent_audio_thread`] bookkeeps commands without producing sound; it
//!   backs headless sessions and tests.
//! - `raylib_audio_thread` (feature `raylib`) owns the Raylib audio device
//!   and all `Music`/`Sound` handles.
//! - [`poll_audio_messages`] non-blockingly drains the audio thread's replies
//!   into the ECS message queue each frame.
//! - [`forward_audio_cmds`] sends the frame's [`AudioCmd`] messages to the
//!   thread.
//!
//! [`audio_schedule`] chains them in the order the driver runs once per
//! frame, before the game's update.

use crate::events::audio::{AudioCmd, AudioMessage};
use crate::resources::audio::AudioBridge;
use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, Sender};
use log::{debug, warn};
use rustc_hash::FxHashSet;

/// Drain any pending events from the audio thread and enqueue them into the
/// ECS [`Messages<AudioMessage>`] mailbox.
pub fn poll_audio_messages(bridge: Res<AudioBridge>, mut writer: MessageWriter<AudioMessage>) {
    writer.write_batch(bridge.rx_msg.try_iter());
}

/// Advance the ECS message queue for [`AudioMessage`].
///
/// Run this after [`poll_audio_messages`] so replies written this frame are
/// visible to readers in the same frame.
pub fn update_bevy_audio_messages(mut events: ResMut<Messages<AudioMessage>>) {
    events.update();
}

/// Forward ECS AudioCmd messages to the audio thread via the AudioBridge sender.
pub fn forward_audio_cmds(bridge: Res<AudioBridge>, mut reader: MessageReader<AudioCmd>) {
    for cmd in reader.read() {
        // ignore send error on shutdown
        let _ = bridge.tx_cmd.send(cmd.clone());
    }
}

/// Advance the ECS message queue for AudioCmd so same-frame readers can observe writes.
pub fn update_bevy_audio_cmds(mut msgs: ResMut<Messages<AudioCmd>>) {
    msgs.update();
}

/// Per-frame audio advance: commands out, replies in.
pub fn audio_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            update_bevy_audio_cmds,
            forward_audio_cmds,
            poll_audio_messages,
            update_bevy_audio_messages,
        )
            .chain(),
    );
    schedule
}

/// Audio thread that tracks state but plays nothing.
///
/// Every load succeeds, sound effects finish immediately and music never
/// reports progress. Blocks on the command channel until
/// [`AudioCmd::Shutdown`] or until the sender is dropped.
pub fn silent_audio_thread(rx_cmd: Receiver<AudioCmd>, tx_evt: Sender<AudioMessage>) {
    debug!("[audio] silent thread starting");
    let mut musics: FxHashSet<String> = FxHashSet::default();
    let mut sounds: FxHashSet<String> = FxHashSet::default();

    while let Ok(cmd) = rx_cmd.recv() {
        let reply = match cmd {
            AudioCmd::LoadMusic { id, .. } => {
                musics.insert(id.clone());
                Some(AudioMessage::MusicLoaded { id })
            }
            AudioCmd::UnloadMusic { id } => musics
                .remove(&id)
                .then_some(AudioMessage::MusicUnloaded { id }),
            AudioCmd::UnloadAllMusic => {
                musics.clear();
                Some(AudioMessage::MusicUnloadedAll)
            }
            AudioCmd::PlayMusic { id, .. } => musics
                .contains(&id)
                .then_some(AudioMessage::MusicPlayStarted { id }),
            AudioCmd::StopMusic { id } => musics
                .contains(&id)
                .then_some(AudioMessage::MusicStopped { id }),
            AudioCmd::PauseMusic { id } => musics
                .contains(&id)
                .then_some(AudioMessage::MusicPaused { id }),
            AudioCmd::ResumeMusic { id } => musics
                .contains(&id)
                .then_some(AudioMessage::MusicResumed { id }),
            AudioCmd::VolumeMusic { id, vol } => musics
                .contains(&id)
                .then_some(AudioMessage::MusicVolumeChanged { id, vol }),
            AudioCmd::LoadFx { id, .. } => {
                sounds.insert(id.clone());
                Some(AudioMessage::FxLoaded { id })
            }
            AudioCmd::PlayFx { id } => sounds
                .contains(&id)
                .then_some(AudioMessage::FxFinished { id }),
            AudioCmd::UnloadFx { id } => sounds
                .remove(&id)
                .then_some(AudioMessage::FxUnloaded { id }),
            AudioCmd::UnloadAllFx => {
                sounds.clear();
                Some(AudioMessage::FxUnloadedAll)
            }
            AudioCmd::Shutdown => {
                musics.clear();
                sounds.clear();
                let _ = tx_evt.send(AudioMessage::MusicUnloadedAll);
                let _ = tx_evt.send(AudioMessage::FxUnloadedAll);
                break;
            }
        };
        match reply {
            Some(msg) => {
                let _ = tx_evt.send(msg);
            }
            None => warn!("[audio] command ignored: id not loaded"),
        }
    }
    debug!("[audio] silent thread exiting");
}

/// Entry point of the Raylib audio thread.
///
/// Responsibilities:
/// - Initialize the Raylib audio device once for the life of the thread.
/// - Own all `Music` and `Sound` handles, preventing use from other threads.
/// - React to [`AudioCmd`] inputs to load/unload and control playback.
/// - Pump music streams, detect track ends and report playback progress.
///
/// This function blocks until it receives [`AudioCmd::Shutdown`], at which
/// point it unloads resources and exits cleanly.
#[cfg(feature = "raylib")]
pub fn raylib_audio_thread(rx_cmd: Receiver<AudioCmd>, tx_evt: Sender<AudioMessage>) {
    use log::info;
    use raylib::core::audio::{Music, RaylibAudio, Sound};
    use rustc_hash::FxHashMap;
    use std::time::{Duration, Instant};

    const PROGRESS_INTERVAL: Duration = Duration::from_millis(50);

    let audio = match RaylibAudio::init_audio_device() {
        Ok(device) => device,
        Err(e) => {
            log::error!("[audio] failed to initialize audio device: {}", e);
            return;
        }
    };

    info!(
        "[audio] thread starting (id={:?})",
        std::thread::current().id()
    );

    let mut musics: FxHashMap<String, Music> = FxHashMap::default();
    let mut playing: FxHashSet<String> = FxHashSet::default();
    let mut looped: FxHashSet<String> = FxHashSet::default();
    let mut sounds: FxHashMap<String, Sound> = FxHashMap::default();
    let mut fx_playing: FxHashSet<String> = FxHashSet::default();
    let mut last_progress = Instant::now();

    'run: loop {
        // 1) Drain commands
        for cmd in rx_cmd.try_iter() {
            match cmd {
                AudioCmd::LoadMusic { id, path } => match audio.new_music(&path) {
                    Ok(music) => {
                        info!("[audio] loaded id='{}' path='{}'", id, path);
                        musics.insert(id.clone(), music);
                        let _ = tx_evt.send(AudioMessage::MusicLoaded { id });
                    }
                    Err(e) => {
                        warn!("[audio] load failed id='{}' path='{}' error='{}'", id, path, e);
                        let _ = tx_evt.send(AudioMessage::MusicLoadFailed {
                            id,
                            error: e.to_string(),
                        });
                    }
                },
                AudioCmd::PlayMusic {
                    id,
                    looped: want_loop,
                } => {
                    if let Some(music) = musics.get(&id) {
                        debug!("[audio] play start id='{}' looped={}", id, want_loop);
                        music.seek_stream(0.0);
                        music.play_stream();
                        playing.insert(id.clone());
                        if want_loop {
                            looped.insert(id.clone());
                        } else {
                            looped.remove(&id);
                        }
                        let _ = tx_evt.send(AudioMessage::MusicPlayStarted { id });
                    } else {
                        warn!("[audio] play failed id='{}' reason='not loaded'", id);
                    }
                }
                AudioCmd::StopMusic { id } => {
                    if let Some(music) = musics.get(&id) {
                        music.stop_stream();
                        playing.remove(&id);
                        let _ = tx_evt.send(AudioMessage::MusicStopped { id });
                    }
                }
                AudioCmd::PauseMusic { id } => {
                    if let Some(music) = musics.get(&id) {
                        music.pause_stream();
                        playing.remove(&id);
                        let _ = tx_evt.send(AudioMessage::MusicPaused { id });
                    }
                }
                AudioCmd::ResumeMusic { id } => {
                    if let Some(music) = musics.get(&id) {
                        music.resume_stream();
                        playing.insert(id.clone());
                        let _ = tx_evt.send(AudioMessage::MusicResumed { id });
                    }
                }
                AudioCmd::VolumeMusic { id, vol } => {
                    if let Some(music) = musics.get(&id) {
                        music.set_volume(vol);
                        let _ = tx_evt.send(AudioMessage::MusicVolumeChanged { id, vol });
                    }
                }
                AudioCmd::UnloadMusic { id } => {
                    if musics.remove(&id).is_some() {
                        playing.remove(&id);
                        looped.remove(&id);
                        let _ = tx_evt.send(AudioMessage::MusicUnloaded { id });
                    }
                }
                AudioCmd::UnloadAllMusic => {
                    musics.clear();
                    playing.clear();
                    looped.clear();
                    let _ = tx_evt.send(AudioMessage::MusicUnloadedAll);
                }
                AudioCmd::LoadFx { id, path } => match audio.new_sound(&path) {
                    Ok(sound) => {
                        info!("[audio] fx loaded id='{}' path='{}'", id, path);
                        sounds.insert(id.clone(), sound);
                        let _ = tx_evt.send(AudioMessage::FxLoaded { id });
                    }
                    Err(e) => {
                        warn!("[audio] fx load failed id='{}' path='{}' error='{}'", id, path, e);
                        let _ = tx_evt.send(AudioMessage::FxLoadFailed {
                            id,
                            error: e.to_string(),
                        });
                    }
                },
                AudioCmd::PlayFx { id } => {
                    if let Some(sound) = sounds.get(&id) {
                        sound.play();
                        fx_playing.insert(id);
                    } else {
                        warn!("[audio] fx play failed id='{}' reason='not loaded'", id);
                    }
                }
                AudioCmd::UnloadFx { id } => {
                    if sounds.remove(&id).is_some() {
                        fx_playing.remove(&id);
                        let _ = tx_evt.send(AudioMessage::FxUnloaded { id });
                    }
                }
                AudioCmd::UnloadAllFx => {
                    sounds.clear();
                    fx_playing.clear();
                    let _ = tx_evt.send(AudioMessage::FxUnloadedAll);
                }
                AudioCmd::Shutdown => {
                    info!("[audio] shutdown requested");
                    musics.clear();
                    playing.clear();
                    looped.clear();
                    let _ = tx_evt.send(AudioMessage::MusicUnloadedAll);
                    sounds.clear();
                    fx_playing.clear();
                    let _ = tx_evt.send(AudioMessage::FxUnloadedAll);
                    break 'run;
                }
            }
        }

        // 2) Pump streaming + detect ends
        let report_progress = last_progress.elapsed() >= PROGRESS_INTERVAL;
        let mut ended: Vec<String> = Vec::new();
        for id in playing.iter() {
            if let Some(music) = musics.get(id) {
                let len = music.get_time_length();
                let played = music.get_time_played();
                if music.is_stream_playing() {
                    music.update_stream();
                    if report_progress {
                        let _ = tx_evt.send(AudioMessage::MusicProgress {
                            id: id.clone(),
                            played,
                            length: len,
                        });
                    }
                } else if played >= len - 0.01 {
                    ended.push(id.clone());
                }
            }
        }
        if report_progress {
            last_progress = Instant::now();
        }
        for id in ended.iter() {
            if looped.contains(id) {
                if let Some(music) = musics.get(id) {
                    music.seek_stream(0.0);
                    music.play_stream();
                    let _ = tx_evt.send(AudioMessage::MusicPlayStarted { id: id.clone() });
                }
            } else {
                playing.remove(id);
                let _ = tx_evt.send(AudioMessage::MusicFinished { id: id.clone() });
            }
        }

        let fx_ended: Vec<String> = fx_playing
            .iter()
            .filter(|id| !sounds.get(*id).map(|s| s.is_playing()).unwrap_or(false))
            .cloned()
            .collect();
        for id in fx_ended {
            fx_playing.remove(&id);
            let _ = tx_evt.send(AudioMessage::FxFinished { id });
        }
        std::thread::sleep(Duration::from_millis(10));
    } // 'run

    info!(
        "[audio] thread exiting (id={:?})",
        std::thread::current().id()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    fn run_silent(cmds: Vec<AudioCmd>) -> Vec<AudioMessage> {
        let (tx_cmd, rx_cmd) = unbounded();
        let (tx_msg, rx_msg) = unbounded();
        for cmd in cmds {
            tx_cmd.send(cmd).unwrap();
        }
        tx_cmd.send(AudioCmd::Shutdown).unwrap();
        silent_audio_thread(rx_cmd, tx_msg);
        rx_msg.try_iter().collect()
    }

    #[test]
    fn silent_thread_acks_music_lifecycle() {
        let msgs = run_silent(vec![
            AudioCmd::LoadMusic {
                id: "theme".into(),
                path: "theme.xm".into(),
            },
            AudioCmd::PlayMusic {
                id: "theme".into(),
                looped: true,
            },
            AudioCmd::PauseMusic { id: "theme".into() },
            AudioCmd::ResumeMusic { id: "theme".into() },
        ]);
        assert_eq!(
            msgs,
            vec![
                AudioMessage::MusicLoaded { id: "theme".into() },
                AudioMessage::MusicPlayStarted { id: "theme".into() },
                AudioMessage::MusicPaused { id: "theme".into() },
                AudioMessage::MusicResumed { id: "theme".into() },
                AudioMessage::MusicUnloadedAll,
                AudioMessage::FxUnloadedAll,
            ]
        );
    }

    #[test]
    fn silent_thread_ignores_unknown_ids() {
        let msgs = run_silent(vec![
            AudioCmd::PlayMusic {
                id: "nope".into(),
                looped: false,
            },
            AudioCmd::PlayFx { id: "nope".into() },
        ]);
        assert_eq!(
            msgs,
            vec![AudioMessage::MusicUnloadedAll, AudioMessage::FxUnloadedAll]
        );
    }

    #[test]
    fn silent_thread_fx_finishes_immediately() {
        let msgs = run_silent(vec![
            AudioCmd::LoadFx {
                id: "jump".into(),
                path: "jump.wav".into(),
            },
            AudioCmd::PlayFx { id: "jump".into() },
        ]);
        assert_eq!(msgs[0], AudioMessage::FxLoaded { id: "jump".into() });
        assert_eq!(msgs[1], AudioMessage::FxFinished { id: "jump".into() });
    }
}
