//! EntityStore - owns entities, their component references and the indices
//! derived from them

use std::collections::HashMap;

use log::{debug, warn};

use super::entity::Entity;
use super::index::{ComponentIndex, IndexKey};
use super::EntityId;
use crate::error::StoreError;

/// EntityStore holds all entities and every index created over them
#[derive(Debug, Default)]
pub struct EntityStore {
    entities: HashMap<EntityId, Entity>,
    /// Entity ids in creation order, so index scans are deterministic
    order: Vec<EntityId>,
    indices: HashMap<String, ComponentIndex>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty entity under `id`
    pub fn create(&mut self, id: &str) -> Result<(), StoreError> {
        if id.is_empty() {
            warn!("rejected entity creation: empty id");
            return Err(StoreError::EmptyEntityId);
        }
        if self.entities.contains_key(id) {
            warn!("rejected entity creation: '{id}' already exists");
            return Err(StoreError::DuplicateEntity(id.to_string()));
        }

        self.entities.insert(id.to_string(), Entity::new(id));
        self.order.push(id.to_string());
        debug!("created entity '{id}'");
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entities.contains_key(id)
    }

    /// Number of entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entities in creation order
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.order.iter().filter_map(|id| self.entities.get(id))
    }

    /// Attach `instance` of `component_type` to `entity_id`.
    ///
    /// Every existing index the entity now satisfies picks it up; indices
    /// created later discover it through their own scan.
    pub fn add(
        &mut self,
        component_type: &str,
        instance: &str,
        entity_id: &str,
    ) -> Result<(), StoreError> {
        let Some(entity) = self.entities.get_mut(entity_id) else {
            warn!("rejected '{component_type}' attachment: entity '{entity_id}' does not exist");
            return Err(StoreError::UnknownEntity(entity_id.to_string()));
        };

        if !entity.attach(component_type, instance) {
            warn!("rejected '{component_type}' attachment: entity '{entity_id}' already has one");
            return Err(StoreError::DuplicateComponent {
                entity: entity_id.to_string(),
                component: component_type.to_string(),
            });
        }
        debug!("attached '{component_type}' instance '{instance}' to '{entity_id}'");

        let entity = &*entity;
        for index in self.indices.values_mut() {
            let relevant = index.types().iter().any(|ty| ty == component_type);
            if relevant && index.track(entity) {
                debug!("entity '{entity_id}' joined index '{}'", index.key());
            }
        }
        Ok(())
    }

    /// Create (or look up) the index over `types` and return its key.
    ///
    /// A new index is populated from every entity already in the store;
    /// asking again for the same types hands back the existing index
    /// untouched.
    pub fn index<I, S>(&mut self, types: I) -> Result<IndexKey, StoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let key = IndexKey::new(types).inspect_err(|err| warn!("rejected index: {err}"))?;

        if self.indices.contains_key(key.as_str()) {
            return Ok(key);
        }

        let mut index = ComponentIndex::new(key.clone());
        for entity in self.order.iter().filter_map(|id| self.entities.get(id)) {
            index.track(entity);
        }
        debug!("created index '{key}' with {} entities", index.len());
        self.indices.insert(key.as_str().to_string(), index);
        Ok(key)
    }

    /// Entity ids tracked by the index under `key`.
    ///
    /// `None` means no such index was ever created; an index with no
    /// qualifying entities yields an empty slice.
    pub fn get_all(&self, key: impl AsRef<str>) -> Option<&[EntityId]> {
        self.indices
            .get(key.as_ref())
            .map(ComponentIndex::members)
    }

    pub fn has_index(&self, key: impl AsRef<str>) -> bool {
        self.indices.contains_key(key.as_ref())
    }

    pub fn index_keys(&self) -> impl Iterator<Item = &IndexKey> {
        self.indices.values().map(ComponentIndex::key)
    }

    pub(crate) fn indices(&self) -> impl Iterator<Item = &ComponentIndex> {
        self.indices.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(ids: &[EntityId]) -> Vec<&str> {
        let mut ids: Vec<&str> = ids.iter().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    #[test]
    fn test_create_rejects_empty_and_duplicate_ids() {
        let mut store = EntityStore::new();

        assert_eq!(store.create(""), Err(StoreError::EmptyEntityId));
        assert!(store.create("test").is_ok());
        assert_eq!(
            store.create("test"),
            Err(StoreError::DuplicateEntity("test".into()))
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_duplicate_create_keeps_existing_state() {
        let mut store = EntityStore::new();
        store.create("test").unwrap();
        store.add("fizz", "1", "test").unwrap();

        assert!(store.create("test").is_err());
        assert_eq!(store.get("test").unwrap().component("fizz"), Some("1"));
    }

    #[test]
    fn test_get_returns_matching_entity() {
        let mut store = EntityStore::new();
        assert!(store.get("test1").is_none());

        store.create("test1").unwrap();
        store.create("test2").unwrap();

        assert_eq!(store.get("test1").unwrap().id, "test1");
        assert_eq!(store.get("test2").unwrap().id, "test2");
    }

    #[test]
    fn test_add_validates_entity_and_type() {
        let mut store = EntityStore::new();
        assert_eq!(
            store.add("component", "componentID", "entity"),
            Err(StoreError::UnknownEntity("entity".into()))
        );

        store.create("test").unwrap();
        assert!(store.add("fizz", "1", "test").is_ok());
        assert_eq!(
            store.add("fizz", "2", "test"),
            Err(StoreError::DuplicateComponent {
                entity: "test".into(),
                component: "fizz".into(),
            })
        );
        assert_eq!(store.get("test").unwrap().component("fizz"), Some("1"));
    }

    #[test]
    fn test_add_accepts_any_type_name() {
        let mut store = EntityStore::new();
        store.create("e1").unwrap();

        assert!(store.add("a,b", "1", "e1").is_ok());
        assert!(store.add("", "2", "e1").is_ok());
        assert_eq!(store.get("e1").unwrap().component("a,b"), Some("1"));
        assert_eq!(store.get("e1").unwrap().component(""), Some("2"));

        assert_eq!(
            store.index(["a,b"]),
            Err(StoreError::SeparatorInComponentType("a,b".into()))
        );
        assert_eq!(store.index([""]), Err(StoreError::EmptyComponentType));
    }

    #[test]
    fn test_index_keys() {
        let mut store = EntityStore::new();

        assert_eq!(
            store.index(Vec::<&str>::new()),
            Err(StoreError::EmptyIndex)
        );
        assert_eq!(store.index(["test"]).unwrap(), "test");
        assert_eq!(store.index(["test1", "test2"]).unwrap(), "test1,test2");
    }

    #[test]
    fn test_get_all_distinguishes_missing_from_empty() {
        let mut store = EntityStore::new();
        assert!(store.get_all("bla").is_none());

        store.index(["bla"]).unwrap();
        assert_eq!(store.get_all("bla"), Some(&[][..]));
    }

    #[test]
    fn test_index_scans_existing_entities() {
        let mut store = EntityStore::new();
        for id in ["test1", "test2", "test3", "test4"] {
            store.create(id).unwrap();
        }
        store.add("fizz", "1", "test1").unwrap();
        store.add("fizz", "2", "test2").unwrap();
        store.add("fizz", "3", "test3").unwrap();
        store.add("buzz", "3", "test3").unwrap();

        let fizz = store.index(["fizz"]).unwrap();
        assert_eq!(
            sorted(store.get_all(&fizz).unwrap()),
            vec!["test1", "test2", "test3"]
        );

        let fizz_buzz = store.index(["fizz", "buzz"]).unwrap();
        assert_ne!(fizz, fizz_buzz);
        assert_eq!(sorted(store.get_all(&fizz_buzz).unwrap()), vec!["test3"]);
    }

    #[test]
    fn test_add_maintains_existing_indices() {
        let mut store = EntityStore::new();
        let key = store.index(["position", "velocity"]).unwrap();

        store.create("ship").unwrap();
        store.add("position", "p1", "ship").unwrap();
        assert_eq!(store.get_all(&key).unwrap().len(), 0);

        store.add("velocity", "v1", "ship").unwrap();
        assert_eq!(store.get_all(&key).unwrap(), ["ship".to_string()]);
    }

    #[test]
    fn test_repeated_index_is_idempotent() {
        let mut store = EntityStore::new();
        store.create("a").unwrap();
        store.add("fizz", "1", "a").unwrap();

        let first = store.index(["fizz"]).unwrap();
        store.create("b").unwrap();
        store.add("fizz", "2", "b").unwrap();
        let second = store.index(["fizz"]).unwrap();

        assert_eq!(first, second);
        assert_eq!(sorted(store.get_all(&second).unwrap()), vec!["a", "b"]);
        assert_eq!(store.index_keys().count(), 1);
    }

    #[test]
    fn test_argument_order_creates_distinct_indices() {
        let mut store = EntityStore::new();
        let ab = store.index(["a", "b"]).unwrap();
        let ba = store.index(["b", "a"]).unwrap();

        assert_ne!(ab, ba);
        assert!(store.has_index("a,b"));
        assert!(store.has_index("b,a"));
    }
}
