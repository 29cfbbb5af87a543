//! Entity registry
//!
//! Entities are identified by caller-chosen string ids and carry references
//! to component instances keyed by component type name. Composite indices
//! answer "which entities have all of these types" without rescanning.

pub mod entity;
pub mod index;
pub mod store;

pub use entity::{Entity, EntityId, InstanceId};
pub use index::{ComponentIndex, IndexKey, KEY_SEPARATOR};
pub use store::EntityStore;
