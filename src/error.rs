//! Error types for the entity store, the system sequencer and their
//! supporting configuration and snapshot layers.
//!
//! Every variant describes a rejected precondition or an I/O failure; none of
//! them leave the owning structure in a modified state.

use std::io;

use thiserror::Error;

/// Rejected operations on an [`EntityStore`](crate::ecs::EntityStore).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("entity id must not be empty")]
    EmptyEntityId,
    #[error("entity '{0}' already exists")]
    DuplicateEntity(String),
    #[error("entity '{0}' does not exist")]
    UnknownEntity(String),
    #[error("entity '{entity}' already has a '{component}' component")]
    DuplicateComponent { entity: String, component: String },
    #[error("component type name must not be empty")]
    EmptyComponentType,
    #[error("component type '{0}' contains the index key separator")]
    SeparatorInComponentType(String),
    #[error("an index needs at least one component type")]
    EmptyIndex,
}

/// Rejected registrations on a [`SystemSequencer`](crate::scheduler::SystemSequencer).
#[derive(Debug, Error)]
pub enum SequencerError {
    #[error("system factory failed: {source}")]
    FactoryFailed {
        #[source]
        source: anyhow::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("config yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("config validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("snapshot serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
