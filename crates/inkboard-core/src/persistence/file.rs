//! File-based scene store.

use super::{BoxFuture, SceneStore, ScenePayload, StorageError, StorageResult, new_scene_id};
use std::fs;
use std::path::PathBuf;

/// Stores scenes as JSON files, one directory per owner.
pub struct FileStore {
    base_path: PathBuf,
}

/// Replace anything that is not safe in a file name.
fn sanitize(id: &str) -> String {
    id.chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

impl FileStore {
    /// Create a store rooted at `base_path`, creating the directory if needed.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        fs::create_dir_all(&base_path).map_err(|e| {
            StorageError::Io(format!("Failed to create storage directory: {e}"))
        })?;
        Ok(Self { base_path })
    }

    /// Store under the platform data directory (`<data>/inkboard/scenes`).
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;
        Self::new(base.join("inkboard").join("scenes"))
    }

    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }

    fn owner_dir(&self, owner: &str) -> PathBuf {
        self.base_path.join(sanitize(owner))
    }

    fn scene_path(&self, owner: &str, scene_id: &str) -> PathBuf {
        self.owner_dir(owner).join(format!("{}.json", sanitize(scene_id)))
    }
}

impl SceneStore for FileStore {
    fn save<'a>(
        &'a self,
        owner: &'a str,
        scene_id: Option<&'a str>,
        payload: &'a ScenePayload,
    ) -> BoxFuture<'a, StorageResult<String>> {
        Box::pin(async move {
            let id = scene_id.map_or_else(new_scene_id, str::to_string);
            let json = payload
                .to_json()
                .map_err(|e| StorageError::Serialization(e.to_string()))?;
            let dir = self.owner_dir(owner);
            fs::create_dir_all(&dir)
                .map_err(|e| StorageError::Io(format!("Failed to create {}: {e}", dir.display())))?;
            let path = self.scene_path(owner, &id);
            fs::write(&path, json)
                .map_err(|e| StorageError::Io(format!("Failed to write {}: {e}", path.display())))?;
            log::info!("Saved scene {id} to {}", path.display());
            Ok(id)
        })
    }

    fn load<'a>(&'a self, owner: &'a str, scene_id: &'a str) -> BoxFuture<'a, StorageResult<ScenePayload>> {
        Box::pin(async move {
            let path = self.scene_path(owner, scene_id);
            if !path.exists() {
                return Err(StorageError::NotFound(scene_id.to_string()));
            }
            let json = fs::read_to_string(&path)
                .map_err(|e| StorageError::Io(format!("Failed to read {}: {e}", path.display())))?;
            ScenePayload::from_json(&json).map_err(|e| {
                StorageError::Serialization(format!("Failed to parse {}: {e}", path.display()))
            })
        })
    }

    fn list<'a>(&'a self, owner: &'a str) -> BoxFuture<'a, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let dir = self.owner_dir(owner);
            if !dir.exists() {
                return Ok(Vec::new());
            }
            let entries = fs::read_dir(&dir)
                .map_err(|e| StorageError::Io(format!("Failed to read directory: {e}")))?;
            let mut ids: Vec<String> = entries
                .flatten()
                .map(|entry| entry.path())
                .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
                .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(str::to_string))
                .collect();
            ids.sort();
            Ok(ids)
        })
    }

    fn delete<'a>(&'a self, owner: &'a str, scene_id: &'a str) -> BoxFuture<'a, StorageResult<()>> {
        Box::pin(async move {
            let path = self.scene_path(owner, scene_id);
            if path.exists() {
                fs::remove_file(&path).map_err(|e| {
                    StorageError::Io(format!("Failed to delete {}: {e}", path.display()))
                })?;
            }
            Ok(())
        })
    }
}
