//! Entity records

use std::collections::HashMap;

/// Entity ID type - caller-chosen string key
pub type EntityId = String;

/// Reference to a component instance held elsewhere. The store only keeps
/// the reference, never the component data.
pub type InstanceId = String;

/// Entity record: its own id plus one instance reference per component type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub id: EntityId,
    components: HashMap<String, InstanceId>,
}

impl Entity {
    pub fn new(id: impl Into<EntityId>) -> Self {
        Self {
            id: id.into(),
            components: HashMap::new(),
        }
    }

    /// Instance attached under `component_type`, if any
    pub fn component(&self, component_type: &str) -> Option<&str> {
        self.components.get(component_type).map(String::as_str)
    }

    pub fn has_component(&self, component_type: &str) -> bool {
        self.components.contains_key(component_type)
    }

    /// True when every type in `types` is attached.
    pub fn has_all<S: AsRef<str>>(&self, types: &[S]) -> bool {
        types.iter().all(|t| self.has_component(t.as_ref()))
    }

    pub fn component_types(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(String::as_str)
    }

    pub fn components(&self) -> impl Iterator<Item = (&str, &str)> {
        self.components
            .iter()
            .map(|(ty, instance)| (ty.as_str(), instance.as_str()))
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Records an attachment. Returns false, leaving the first instance in
    /// place, when the type is already attached.
    pub(crate) fn attach(&mut self, component_type: &str, instance: &str) -> bool {
        if self.components.contains_key(component_type) {
            return false;
        }
        self.components
            .insert(component_type.to_string(), instance.to_string());
        true
    }
}
