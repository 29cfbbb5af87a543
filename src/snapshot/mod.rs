//! Snapshots of the entity store for debugging and replay
//!
//! A snapshot lists every entity with its component references and every
//! index with its members. Output is sorted where the store itself makes no
//! ordering promise, so two snapshots of equal stores are byte-identical.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::SnapshotConfig;
use crate::ecs::EntityStore;
use crate::error::{SnapshotError, StoreError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub frame: u64,
    pub entity_count: usize,
    /// Entities in creation order
    pub entities: Vec<EntitySnapshot>,
    /// Indices sorted by key
    pub indices: Vec<IndexSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub id: String,
    pub components: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSnapshot {
    pub key: String,
    pub types: Vec<String>,
    pub members: Vec<String>,
}

impl StoreSnapshot {
    pub fn capture(frame: u64, store: &EntityStore) -> Self {
        let entities: Vec<EntitySnapshot> = store
            .entities()
            .map(|entity| EntitySnapshot {
                id: entity.id.clone(),
                components: entity
                    .components()
                    .map(|(ty, instance)| (ty.to_string(), instance.to_string()))
                    .collect(),
            })
            .collect();

        let mut indices: Vec<IndexSnapshot> = store
            .indices()
            .map(|index| {
                let mut members = index.members().to_vec();
                members.sort();
                IndexSnapshot {
                    key: index.key().to_string(),
                    types: index.types().to_vec(),
                    members,
                }
            })
            .collect();
        indices.sort_by(|a, b| a.key.cmp(&b.key));

        Self {
            frame,
            entity_count: entities.len(),
            entities,
            indices,
        }
    }

    /// Rebuild a store by replaying entity creation, attachments and index
    /// creation. Index membership is recomputed rather than trusted.
    pub fn restore(&self) -> Result<EntityStore, StoreError> {
        let mut store = EntityStore::new();
        for entity in &self.entities {
            store.create(&entity.id)?;
            for (ty, instance) in &entity.components {
                store.add(ty, instance, &entity.id)?;
            }
        }
        for index in &self.indices {
            store.index(&index.types)?;
        }
        Ok(store)
    }
}

/// Writes snapshots at a fixed frame interval
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    output_dir: PathBuf,
    every_frames: u64,
}

impl SnapshotWriter {
    pub fn new(output_dir: impl AsRef<Path>, every_frames: u64) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            every_frames,
        }
    }

    pub fn from_config(config: &SnapshotConfig) -> Self {
        Self::new(&config.output_dir, config.every_frames)
    }

    pub fn should_write(&self, frame: u64) -> bool {
        self.every_frames != 0 && frame != 0 && frame % self.every_frames == 0
    }

    pub fn path_for(&self, frame: u64) -> PathBuf {
        self.output_dir.join(format!("frame_{frame:06}.json"))
    }

    pub fn maybe_write(
        &self,
        frame: u64,
        store: &EntityStore,
    ) -> Result<Option<PathBuf>, SnapshotError> {
        if !self.should_write(frame) {
            return Ok(None);
        }
        self.write(&StoreSnapshot::capture(frame, store)).map(Some)
    }

    pub fn write(&self, snapshot: &StoreSnapshot) -> Result<PathBuf, SnapshotError> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.path_for(snapshot.frame);
        let json = serde_json::to_string_pretty(snapshot)?;
        fs::write(&path, json)?;
        debug!("wrote snapshot {}", path.display());
        Ok(path)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<StoreSnapshot, SnapshotError> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}
