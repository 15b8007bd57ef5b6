//! In-memory part registry.
//!
//! An ordered collection of part definitions keyed by a stable [`PartId`].
//! Part types are not unique: lookups by type resolve to the first entry in
//! registration order. The registry is an owned value; whoever holds it (the
//! session) decides its lifetime.

use chrono::{DateTime, Utc};
use serde::Serialize;

use partquote_core::{DomainError, DomainResult, Entity, ExpectedVersion, PartId};

use crate::part::PartDefinition;

/// A definition as stored in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisteredPart {
    id: PartId,
    definition: PartDefinition,
    registered_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RegisteredPart {
    pub fn id_typed(&self) -> PartId {
        self.id
    }

    pub fn definition(&self) -> &PartDefinition {
        &self.definition
    }

    pub fn part_type(&self) -> &str {
        self.definition.part_type()
    }

    pub fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl Entity for RegisteredPart {
    type Id = PartId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Ordered, in-memory registry of part definitions.
#[derive(Debug, Clone, Default)]
pub struct PartRegistry {
    parts: Vec<RegisteredPart>,
    version: u64,
}

impl PartRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a definition, preserving registration order.
    ///
    /// No uniqueness check is made on the part type.
    pub fn register(&mut self, definition: PartDefinition) -> PartId {
        self.append(definition, Utc::now())
    }

    /// Append only if the registry is still at `expected` version.
    pub fn register_expecting(
        &mut self,
        definition: PartDefinition,
        expected: ExpectedVersion,
    ) -> DomainResult<PartId> {
        expected.check(self.version)?;
        Ok(self.append(definition, Utc::now()))
    }

    fn append(&mut self, definition: PartDefinition, at: DateTime<Utc>) -> PartId {
        let id = PartId::new();
        tracing::debug!(
            part_id = %id,
            part_type = definition.part_type(),
            ranges = definition.ranges().len(),
            variations = definition.variations().len(),
            "part registered"
        );
        self.parts.push(RegisteredPart {
            id,
            definition,
            registered_at: at,
            updated_at: at,
        });
        self.version += 1;
        id
    }

    /// First registered part with this exact part type.
    pub fn find_by_type(&self, part_type: &str) -> Option<&RegisteredPart> {
        self.parts.iter().find(|p| p.part_type() == part_type)
    }

    pub fn get(&self, id: PartId) -> Option<&RegisteredPart> {
        self.position(id).map(|index| &self.parts[index])
    }

    fn position(&self, id: PartId) -> Option<usize> {
        self.parts.iter().position(|p| *p.id() == id)
    }

    /// Replace the definition of an existing entry, keeping its id and position.
    pub fn update(&mut self, id: PartId, definition: PartDefinition) -> DomainResult<()> {
        let index = self.position(id).ok_or_else(DomainError::not_found)?;
        let entry = &mut self.parts[index];

        tracing::debug!(
            part_id = %id,
            from = entry.part_type(),
            to = definition.part_type(),
            "part updated"
        );
        entry.definition = definition;
        entry.updated_at = Utc::now();
        self.version += 1;
        Ok(())
    }

    pub fn remove(&mut self, id: PartId) -> DomainResult<RegisteredPart> {
        let index = self.position(id).ok_or_else(DomainError::not_found)?;

        let removed = self.parts.remove(index);
        tracing::debug!(part_id = %id, part_type = removed.part_type(), "part removed");
        self.version += 1;
        Ok(removed)
    }

    /// Entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredPart> {
        self.parts.iter()
    }

    /// Distinct part types in first-registered order.
    pub fn part_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = Vec::new();
        for part in &self.parts {
            if !types.contains(&part.part_type()) {
                types.push(part.part_type());
            }
        }
        types
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Monotonic mutation counter (+1 per register/update/remove).
    pub fn version(&self) -> u64 {
        self.version
    }
}
