#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Immutable registry of segment definitions.
//!
//! The catalog is built once from host-supplied content lists and never
//! mutated afterwards. Duplicate identifiers fail construction outright so
//! misconfigured content surfaces before a run starts instead of during one.

use std::collections::HashMap;

use ridgeline_core::{RegistryError, SegmentCategory, SegmentDefinition, SegmentId};

/// Registry of every segment definition available to a run.
#[derive(Clone, Debug, Default)]
pub struct SegmentCatalog {
    definitions: Vec<SegmentDefinition>,
    index: HashMap<SegmentId, usize>,
}

impl SegmentCatalog {
    /// Builds a catalog from host-supplied definitions.
    ///
    /// Fails on the first duplicate identifier without registering it.
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = SegmentDefinition>,
    ) -> Result<Self, RegistryError> {
        let mut catalog = Self::default();
        for definition in definitions {
            catalog.register(definition)?;
        }
        Ok(catalog)
    }

    fn register(&mut self, definition: SegmentDefinition) -> Result<(), RegistryError> {
        let id = definition.id().clone();
        if self.index.contains_key(&id) {
            return Err(RegistryError::DuplicateId(id));
        }
        let _ = self.index.insert(id, self.definitions.len());
        self.definitions.push(definition);
        Ok(())
    }

    /// Looks up a definition by identifier.
    pub fn get(&self, id: &SegmentId) -> Result<&SegmentDefinition, RegistryError> {
        self.index
            .get(id)
            .map(|&slot| &self.definitions[slot])
            .ok_or_else(|| RegistryError::UnknownSegment(id.clone()))
    }

    /// Iterates every definition belonging to the given category.
    pub fn of_category(
        &self,
        category: SegmentCategory,
    ) -> impl Iterator<Item = &SegmentDefinition> {
        self.definitions
            .iter()
            .filter(move |definition| definition.category() == category)
    }

    /// Iterates every registered definition in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &SegmentDefinition> {
        self.definitions.iter()
    }

    /// Number of registered definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Reports whether the catalog holds no definitions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
