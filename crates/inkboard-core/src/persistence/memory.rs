//! In-memory scene store.

use super::{BoxFuture, SceneStore, ScenePayload, StorageError, StorageResult, new_scene_id};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
#[derive(Default)]
pub struct MemoryStore {
    scenes: RwLock<HashMap<(String, String), ScenePayload>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Other(format!("Lock error: {e}"))
}

impl SceneStore for MemoryStore {
    fn save<'a>(
        &'a self,
        owner: &'a str,
        scene_id: Option<&'a str>,
        payload: &'a ScenePayload,
    ) -> BoxFuture<'a, StorageResult<String>> {
        Box::pin(async move {
            let mut scenes = self.scenes.write().map_err(lock_error)?;
            let id = scene_id.map_or_else(new_scene_id, str::to_string);
            scenes.insert((owner.to_string(), id.clone()), payload.clone());
            Ok(id)
        })
    }

    fn load<'a>(&'a self, owner: &'a str, scene_id: &'a str) -> BoxFuture<'a, StorageResult<ScenePayload>> {
        Box::pin(async move {
            let scenes = self.scenes.read().map_err(lock_error)?;
            scenes
                .get(&(owner.to_string(), scene_id.to_string()))
                .cloned()
                .ok_or_else(|| StorageError::NotFound(scene_id.to_string()))
        })
    }

    fn list<'a>(&'a self, owner: &'a str) -> BoxFuture<'a, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let scenes = self.scenes.read().map_err(lock_error)?;
            let mut ids: Vec<String> = scenes
                .keys()
                .filter(|(o, _)| o == owner)
                .map(|(_, id)| id.clone())
                .collect();
            ids.sort();
            Ok(ids)
        })
    }

    fn delete<'a>(&'a self, owner: &'a str, scene_id: &'a str) -> BoxFuture<'a, StorageResult<()>> {
        Box::pin(async move {
            let mut scenes = self.scenes.write().map_err(lock_error)?;
            scenes.remove(&(owner.to_string(), scene_id.to_string()));
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::block_on;

    fn payload(name: &str) -> ScenePayload {
        ScenePayload::new(&[], name, "Board1")
    }

    #[test]
    fn test_save_assigns_id_and_loads() {
        let store = MemoryStore::new();
        let p = payload("first");
        let id = block_on(store.save("alice", None, &p)).unwrap();
        assert!(uuid::Uuid::parse_str(&id).is_ok());
        assert_eq!(block_on(store.load("alice", &id)).unwrap(), p);
    }

    #[test]
    fn test_save_overwrites_existing_id() {
        let store = MemoryStore::new();
        let id = block_on(store.save("alice", None, &payload("v1"))).unwrap();
        let same = block_on(store.save("alice", Some(&id), &payload("v2"))).unwrap();
        assert_eq!(id, same);
        assert_eq!(block_on(store.load("alice", &id)).unwrap().name, "v2");
        assert_eq!(block_on(store.list("alice")).unwrap().len(), 1);
    }

    #[test]
    fn test_owners_isolated() {
        let store = MemoryStore::new();
        let id = block_on(store.save("alice", None, &payload("mine"))).unwrap();
        assert!(matches!(
            block_on(store.load("bob", &id)),
            Err(StorageError::NotFound(_))
        ));
        assert!(block_on(store.list("bob")).unwrap().is_empty());
    }

    #[test]
    fn test_delete() {
        let store = MemoryStore::new();
        let id = block_on(store.save("alice", None, &payload("gone"))).unwrap();
        block_on(store.delete("alice", &id)).unwrap();
        assert!(block_on(store.load("alice", &id)).is_err());
    }
}
