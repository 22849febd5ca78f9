// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Deterministic id assignment for components.

use std::collections::HashSet;

use crate::{Component, Error};

/// The set of component ids in use during one synthesis run.
///
/// Ids handed out by [`claim`][IdRegistry::claim] never collide with ids
/// that were reserved or claimed earlier in the same run.
#[derive(Debug, Default)]
pub(crate) struct IdRegistry {
    in_use: HashSet<String>,
}

impl IdRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Marks an explicitly declared id as used.
    ///
    /// Returns an error if the id is already in use.
    pub(crate) fn reserve(&mut self, id: &str) -> Result<(), Error> {
        if !self.in_use.insert(id.to_string()) {
            return Err(Error::duplicate_definition(format!(
                "Component id {id} is declared more than once."
            )));
        }
        Ok(())
    }

    /// Returns `base` if it is unused, otherwise `base` with the first free
    /// numeric suffix appended (`base_1`, `base_2`, ...).  The returned id is
    /// marked as used.
    pub(crate) fn claim(&mut self, base: &str) -> String {
        let mut id = base.to_string();
        let mut suffix = 0;
        while self.in_use.contains(&id) {
            suffix += 1;
            id = format!("{base}_{suffix}");
        }
        self.in_use.insert(id.clone());
        id
    }
}

/// Assigns an id to every component that doesn't have one yet.
///
/// All declared ids are reserved first, so that a generated id never takes
/// an id that a later component declares explicitly.  Generated ids are then
/// handed out in declaration order.
pub(crate) fn assign_ids(
    components: &mut [Component],
    registry: &mut IdRegistry,
) -> Result<(), Error> {
    for component in components.iter() {
        if let Some(id) = component.id() {
            registry.reserve(id)?;
        }
    }

    for component in components.iter_mut().filter(|c| c.id().is_none()) {
        let id = registry.claim(&component.base_id());
        tracing::debug!("Assigned id {id} to {} at {}.", component.kind(), component.location());
        component.set_id(id);
    }

    Ok(())
}
