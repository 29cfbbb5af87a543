//! Composite component indices
//!
//! An index tracks every entity whose component set covers a fixed list of
//! component types. The key is the list joined with [`KEY_SEPARATOR`] in the
//! order it was requested, so `["a", "b"]` and `["b", "a"]` are distinct
//! indices over the same type set.

use std::collections::HashSet;
use std::fmt;

use crate::error::StoreError;

use super::entity::Entity;
use super::EntityId;

pub const KEY_SEPARATOR: &str = ",";

/// Canonical key of an index plus the component types it was built from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexKey {
    key: String,
    types: Vec<String>,
}

impl IndexKey {
    /// Builds a key from a list of type names.
    pub fn new<I, S>(types: I) -> Result<Self, StoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names = Vec::new();
        for ty in types {
            names.push(validate_component_type(ty.as_ref())?.to_string());
        }
        if names.is_empty() {
            return Err(StoreError::EmptyIndex);
        }

        Ok(Self {
            key: names.join(KEY_SEPARATOR),
            types: names,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.key
    }

    /// Component types in request order
    pub fn types(&self) -> &[String] {
        &self.types
    }
}

impl fmt::Display for IndexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

impl AsRef<str> for IndexKey {
    fn as_ref(&self) -> &str {
        &self.key
    }
}

impl PartialEq<str> for IndexKey {
    fn eq(&self, other: &str) -> bool {
        self.key == other
    }
}

impl PartialEq<&str> for IndexKey {
    fn eq(&self, other: &&str) -> bool {
        self.key == *other
    }
}

/// Rejects names that are empty or would alias another key once joined.
fn validate_component_type(name: &str) -> Result<&str, StoreError> {
    if name.is_empty() {
        return Err(StoreError::EmptyComponentType);
    }
    if name.contains(KEY_SEPARATOR) {
        return Err(StoreError::SeparatorInComponentType(name.to_string()));
    }
    Ok(name)
}

/// Entity membership of a single index
#[derive(Debug, Clone)]
pub struct ComponentIndex {
    key: IndexKey,
    members: Vec<EntityId>,
    lookup: HashSet<EntityId>,
}

impl ComponentIndex {
    pub fn new(key: IndexKey) -> Self {
        Self {
            key,
            members: Vec::new(),
            lookup: HashSet::new(),
        }
    }

    pub fn key(&self) -> &IndexKey {
        &self.key
    }

    pub fn types(&self) -> &[String] {
        self.key.types()
    }

    pub fn members(&self) -> &[EntityId] {
        &self.members
    }

    pub fn contains(&self, entity_id: &str) -> bool {
        self.lookup.contains(entity_id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn matches(&self, entity: &Entity) -> bool {
        entity.has_all(self.types())
    }

    /// Adds the entity when it qualifies and is not yet tracked. Returns
    /// whether membership changed.
    pub fn track(&mut self, entity: &Entity) -> bool {
        if self.lookup.contains(&entity.id) || !self.matches(entity) {
            return false;
        }
        self.lookup.insert(entity.id.clone());
        self.members.push(entity.id.clone());
        true
    }
}
