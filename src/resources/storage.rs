//! Integer value storage.
//!
//! A flat store of `i32` slots. The file-backed variant uses the same layout
//! as raylib's storage file: slot `N` lives at byte offset `4 * N` as a
//! little-endian `i32`, and the file is zero-filled when a write extends it.
//! Reading a slot that was never written yields `0`. Slots at or above
//! [`MAX_SLOTS`] cannot be written and always read as `0`.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use bevy_ecs::prelude::Resource;
use log::debug;

use crate::error::EngineError;

const SLOT_SIZE: usize = std::mem::size_of::<i32>();

/// Number of addressable slots (a 4 MiB storage file).
pub const MAX_SLOTS: usize = 1 << 20;

#[derive(Debug, Clone)]
enum Backing {
    File(PathBuf),
    Memory(Vec<i32>),
}

/// Slot-addressed integer storage resource.
#[derive(Resource, Debug, Clone)]
pub struct ValueStorage {
    backing: Backing,
}

impl ValueStorage {
    /// Storage persisted to `path`. The file is created on first save.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            backing: Backing::File(path.into()),
        }
    }

    /// Storage kept in memory for the lifetime of the resource.
    pub fn in_memory() -> Self {
        Self {
            backing: Backing::Memory(Vec::new()),
        }
    }

    /// Path of the backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        match &self.backing {
            Backing::File(path) => Some(path),
            Backing::Memory(_) => None,
        }
    }

    /// Write `value` into `slot`, growing the store as needed.
    pub fn save_value(&mut self, slot: usize, value: i32) -> Result<(), EngineError> {
        if slot >= MAX_SLOTS {
            return Err(EngineError::SlotOutOfRange(slot));
        }
        match &mut self.backing {
            Backing::Memory(values) => {
                if values.len() <= slot {
                    values.resize(slot + 1, 0);
                }
                values[slot] = value;
                Ok(())
            }
            Backing::File(path) => {
                let mut bytes = read_or_empty(path)?;
                let end = (slot + 1) * SLOT_SIZE;
                if bytes.len() < end {
                    bytes.resize(end, 0);
                }
                bytes[slot * SLOT_SIZE..end].copy_from_slice(&value.to_le_bytes());
                fs::write(&*path, &bytes).map_err(|source| EngineError::Storage {
                    path: path.clone(),
                    source,
                })?;
                debug!("storage: slot {} <- {} ({:?})", slot, value, path);
                Ok(())
            }
        }
    }

    /// Read `slot`, returning `0` when it was never written.
    pub fn load_value(&self, slot: usize) -> Result<i32, EngineError> {
        if slot >= MAX_SLOTS {
            return Ok(0);
        }
        match &self.backing {
            Backing::Memory(values) => Ok(values.get(slot).copied().unwrap_or(0)),
            Backing::File(path) => {
                let bytes = read_or_empty(path)?;
                let start = slot * SLOT_SIZE;
                let value = bytes
                    .get(start..start + SLOT_SIZE)
                    .and_then(|raw| raw.try_into().ok())
                    .map(i32::from_le_bytes)
                    .unwrap_or(0);
                Ok(value)
            }
        }
    }
}

fn read_or_empty(path: &Path) -> Result<Vec<u8>, EngineError> {
    match fs::read(path) {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
        Err(source) => Err(EngineError::Storage {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("rayloop-storage-{}-{}.data", std::process::id(), name))
    }

    #[test]
    fn memory_unwritten_slot_is_zero() {
        let storage = ValueStorage::in_memory();
        assert_eq!(storage.load_value(0).unwrap(), 0);
        assert_eq!(storage.load_value(7).unwrap(), 0);
    }

    #[test]
    fn memory_save_and_load() {
        let mut storage = ValueStorage::in_memory();
        storage.save_value(1, 3210).unwrap();
        assert_eq!(storage.load_value(1).unwrap(), 3210);
        assert_eq!(storage.load_value(0).unwrap(), 0);
    }

    #[test]
    fn slots_past_the_limit_are_rejected() {
        let mut storage = ValueStorage::in_memory();
        assert!(matches!(
            storage.save_value(usize::MAX, 1),
            Err(EngineError::SlotOutOfRange(usize::MAX))
        ));
        assert!(matches!(
            storage.save_value(MAX_SLOTS, 1),
            Err(EngineError::SlotOutOfRange(_))
        ));
        assert_eq!(storage.load_value(usize::MAX).unwrap(), 0);

        let path = temp_path("limit");
        let mut storage = ValueStorage::file(&path);
        assert!(storage.save_value(usize::MAX, 1).is_err());
        assert_eq!(storage.load_value(usize::MAX).unwrap(), 0);
        assert!(!path.exists());
    }

    #[test]
    fn file_missing_reads_zero() {
        let storage = ValueStorage::file(temp_path("missing"));
        assert_eq!(storage.load_value(0).unwrap(), 0);
    }

    #[test]
    fn file_layout_is_little_endian_slots() {
        let path = temp_path("layout");
        let _ = fs::remove_file(&path);
        let mut storage = ValueStorage::file(&path);

        storage.save_value(1, 0x0102_0304).unwrap();
        let bytes = fs::read(&path).unwrap();
        assert_eq!(bytes, vec![0, 0, 0, 0, 4, 3, 2, 1]);

        storage.save_value(0, -1).unwrap();
        assert_eq!(storage.load_value(0).unwrap(), -1);
        assert_eq!(storage.load_value(1).unwrap(), 0x0102_0304);
        assert_eq!(storage.load_value(2).unwrap(), 0);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn file_values_survive_a_new_handle() {
        let path = temp_path("reopen");
        let _ = fs::remove_file(&path);
        ValueStorage::file(&path).save_value(0, 1500).unwrap();

        let reopened = ValueStorage::file(&path);
        assert_eq!(reopened.load_value(0).unwrap(), 1500);
        assert_eq!(reopened.path(), Some(path.as_path()));

        let _ = fs::remove_file(&path);
    }
}
