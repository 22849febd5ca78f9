// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module is only compiled when running unit tests and contains features
//! that are shared by the tests of all modules.
//!
//! - the `SpecificationBuilder`, which can declaratively build specifications
//!   for use in tests.
//! - `triples`, which renders the connections of a specification in their
//!   textual form, for easy comparison.

use crate::registry::{self, IdRegistry};
use crate::{Component, Connection, Error, NetworkLink, Specification, SynthesisConfig};

/// A builder for creating specifications easily, for use in tests.
pub(crate) struct SpecificationBuilder {
    components: Vec<Component>,
    network_links: Vec<NetworkLink>,
}

impl SpecificationBuilder {
    /// Creates a new, empty `SpecificationBuilder`.
    pub(crate) fn new() -> Self {
        SpecificationBuilder {
            components: Vec::new(),
            network_links: Vec::new(),
        }
    }

    /// Adds the given component.
    pub(crate) fn component(&mut self, component: Component) -> &mut Self {
        self.components.push(component);
        self
    }

    /// Adds an unlimited source.
    pub(crate) fn source(&mut self, location: &str, outflow: &str) -> &mut Self {
        self.component(Component::source(location, outflow))
    }

    /// Adds a load.
    pub(crate) fn load(&mut self, location: &str, inflow: &str) -> &mut Self {
        self.component(Component::load(location, inflow))
    }

    /// Adds a converter with the default lossflow.
    pub(crate) fn converter(&mut self, location: &str, inflow: &str, outflow: &str) -> &mut Self {
        self.component(Component::converter(location, inflow, outflow, 0.9))
    }

    /// Adds a store.
    pub(crate) fn store(&mut self, location: &str, flow: &str) -> &mut Self {
        self.component(Component::store(location, flow, 100.0))
    }

    /// Adds a network link.
    pub(crate) fn link(&mut self, from: &str, to: &str, flow: &str) -> &mut Self {
        self.network_links.push(NetworkLink::new(from, to, flow));
        self
    }

    /// Returns the specification as declared.
    pub(crate) fn build(&self) -> Specification {
        Specification::new(self.components.clone(), self.network_links.clone())
    }

    /// Returns the specification with ids assigned to all components, but
    /// without any wiring.
    pub(crate) fn with_ids(&self) -> Result<Specification, Error> {
        let mut components = self.components.clone();
        registry::assign_ids(&mut components, &mut IdRegistry::new())?;
        Ok(Specification::new(components, self.network_links.clone()))
    }

    /// Synthesizes the specification with the default configuration.
    pub(crate) fn synthesize(&self) -> Result<Specification, Error> {
        self.synthesize_with(&SynthesisConfig::default())
    }

    /// Synthesizes the specification with the given configuration.
    pub(crate) fn synthesize_with(&self, config: &SynthesisConfig) -> Result<Specification, Error> {
        crate::synthesize(self.build(), config)
    }
}

/// Returns the connections of the given specification as
/// `[from, to, flow]` triples, in connection list order.
pub(crate) fn triples(spec: &Specification) -> Vec<[String; 3]> {
    spec.connections().iter().map(Connection::to_triple).collect()
}
