//! Texture handle store.
//!
//! Every texture a game uses is acquired through [`TextureStore`] during load
//! and released by the driver at unload, so acquisition and release stay
//! symmetric: a key cannot be acquired twice without a release in between,
//! and [`TextureStore::release_all`] frees handles in reverse acquisition
//! order, dependents before the resources they were built from.

use std::path::Path;

use bevy_ecs::prelude::Resource;
use log::{debug, info};
use rustc_hash::FxHashMap;

use crate::error::EngineError;
use crate::platform::{AssetLoader, TextureInfo};

/// Loaded textures keyed by string IDs.
#[derive(Resource, Debug, Default)]
pub struct TextureStore {
    map: FxHashMap<String, TextureInfo>,
    order: Vec<String>,
}

impl TextureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `path` through `assets` and register it under `key`.
    pub fn acquire(
        &mut self,
        key: impl Into<String>,
        path: impl AsRef<Path>,
        assets: &mut dyn AssetLoader,
    ) -> Result<TextureInfo, EngineError> {
        let key = key.into();
        let path = path.as_ref();
        if self.map.contains_key(&key) {
            return Err(EngineError::AlreadyAcquired(key));
        }
        let info = assets
            .load_texture(path)
            .map_err(|reason| EngineError::ResourceLoad {
                key: key.clone(),
                path: path.to_path_buf(),
                reason,
            })?;
        info!(
            "Texture '{}' loaded from {:?} ({}x{})",
            key, path, info.width, info.height
        );
        self.map.insert(key.clone(), info);
        self.order.push(key);
        Ok(info)
    }

    /// Get a texture by its key.
    pub fn get(&self, key: &str) -> Option<&TextureInfo> {
        self.map.get(key)
    }

    /// Release a single texture. Returns `false` if `key` was not held.
    pub fn release(&mut self, key: &str, assets: &mut dyn AssetLoader) -> bool {
        let Some(info) = self.map.remove(key) else {
            return false;
        };
        self.order.retain(|k| k != key);
        debug!("Texture '{}' released", key);
        assets.unload_texture(info.id);
        true
    }

    /// Release every held texture, most recently acquired first.
    /// Returns the number of textures released.
    pub fn release_all(&mut self, assets: &mut dyn AssetLoader) -> usize {
        let mut released = 0;
        while let Some(key) = self.order.pop() {
            if let Some(info) = self.map.remove(&key) {
                debug!("Texture '{}' released", key);
                assets.unload_texture(info.id);
                released += 1;
            }
        }
        released
    }

    /// Number of textures currently held.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::TextureId;
    use std::path::PathBuf;

    #[derive(Default)]
    struct FakeAssets {
        next: u32,
        unloaded: Vec<TextureId>,
    }

    impl AssetLoader for FakeAssets {
        fn load_texture(&mut self, path: &Path) -> Result<TextureInfo, String> {
            if path.to_string_lossy().contains("missing") {
                return Err("file not found".into());
            }
            self.next += 1;
            Ok(TextureInfo {
                id: TextureId(self.next),
                width: 8,
                height: 8,
            })
        }

        fn unload_texture(&mut self, id: TextureId) {
            self.unloaded.push(id);
        }
    }

    #[test]
    fn acquire_then_get() {
        let mut assets = FakeAssets::default();
        let mut store = TextureStore::new();
        let info = store.acquire("crate", "crate.png", &mut assets).unwrap();
        assert_eq!(store.get("crate"), Some(&info));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn double_acquire_is_rejected() {
        let mut assets = FakeAssets::default();
        let mut store = TextureStore::new();
        store.acquire("crate", "crate.png", &mut assets).unwrap();
        let err = store.acquire("crate", "crate.png", &mut assets).unwrap_err();
        assert!(matches!(err, EngineError::AlreadyAcquired(k) if k == "crate"));
        assert_eq!(assets.next, 1);
    }

    #[test]
    fn failed_load_reports_key_and_path() {
        let mut assets = FakeAssets::default();
        let mut store = TextureStore::new();
        let err = store
            .acquire("mario", "missing/mario.png", &mut assets)
            .unwrap_err();
        match err {
            EngineError::ResourceLoad { key, path, reason } => {
                assert_eq!(key, "mario");
                assert_eq!(path, PathBuf::from("missing/mario.png"));
                assert_eq!(reason, "file not found");
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(store.is_empty());
    }

    #[test]
    fn release_all_is_reverse_order_and_once() {
        let mut assets = FakeAssets::default();
        let mut store = TextureStore::new();
        let a = store.acquire("a", "a.png", &mut assets).unwrap();
        let b = store.acquire("b", "b.png", &mut assets).unwrap();
        let c = store.acquire("c", "c.png", &mut assets).unwrap();

        assert_eq!(store.release_all(&mut assets), 3);
        assert_eq!(assets.unloaded, vec![c.id, b.id, a.id]);
        assert_eq!(store.release_all(&mut assets), 0);
        assert_eq!(assets.unloaded.len(), 3);
    }

    #[test]
    fn release_single_then_reacquire() {
        let mut assets = FakeAssets::default();
        let mut store = TextureStore::new();
        store.acquire("a", "a.png", &mut assets).unwrap();
        assert!(store.release("a", &mut assets));
        assert!(!store.release("a", &mut assets));
        assert!(store.acquire("a", "a.png", &mut assets).is_ok());
        assert_eq!(store.release_all(&mut assets), 1);
    }
}
