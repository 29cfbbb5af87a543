//! In-memory entity registry with composite component indices, plus an
//! ordered sequencer that drives subsystems once per frame.

pub mod config;
pub mod ecs;
pub mod error;
pub mod logging;
pub mod scheduler;
pub mod snapshot;

pub use config::CoreConfig;
pub use ecs::{Entity, EntityId, EntityStore, IndexKey};
pub use error::{ConfigError, SequencerError, SnapshotError, StoreError};
pub use scheduler::{FrameStats, Registration, System, SystemSequencer};
pub use snapshot::{SnapshotWriter, StoreSnapshot};
