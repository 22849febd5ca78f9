// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for retrieving components and connections from a [`TopologyGraph`].

use petgraph::graph::NodeIndex;

use crate::iterators::{Components, Connections, Neighbors};
use crate::{Component, Error, TopologyGraph};

/// `Component` and `Connection` retrieval.
impl TopologyGraph {
    /// Returns the component with the given `component_id`, if it exists.
    pub fn component(&self, component_id: &str) -> Result<&Component, Error> {
        self.index_of(component_id).map(|i| &self.graph[i])
    }

    /// Returns an iterator over the components in the graph.
    pub fn components(&self) -> Components<'_> {
        Components {
            iter: self.graph.raw_nodes().iter(),
        }
    }

    /// Returns an iterator over the connections in the graph, in the order
    /// they were added.
    pub fn connections(&self) -> Connections<'_> {
        Connections {
            iter: self.graph.raw_edges().iter(),
        }
    }

    /// Returns an iterator over the *predecessors* of the component with the
    /// given `component_id`.
    ///
    /// A predecessor connected through several ports is returned once per
    /// connection.
    ///
    /// Returns an error if the given `component_id` does not exist.
    pub fn predecessors(&self, component_id: &str) -> Result<Neighbors<'_>, Error> {
        self.index_of(component_id).map(|index| Neighbors {
            graph: &self.graph,
            iter: self
                .graph
                .neighbors_directed(index, petgraph::Direction::Incoming),
        })
    }

    /// Returns an iterator over the *successors* of the component with the
    /// given `component_id`.
    ///
    /// A successor connected through several ports is returned once per
    /// connection.
    ///
    /// Returns an error if the given `component_id` does not exist.
    pub fn successors(&self, component_id: &str) -> Result<Neighbors<'_>, Error> {
        self.index_of(component_id).map(|index| Neighbors {
            graph: &self.graph,
            iter: self
                .graph
                .neighbors_directed(index, petgraph::Direction::Outgoing),
        })
    }

    pub(crate) fn index_of(&self, component_id: &str) -> Result<NodeIndex, Error> {
        self.node_indices
            .get(component_id)
            .copied()
            .ok_or_else(|| {
                Error::component_not_found(format!("Component with id {component_id} not found."))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::SpecificationBuilder;
    use crate::Connection;

    fn graph() -> Result<TopologyGraph, Error> {
        let mut builder = SpecificationBuilder::new();
        builder
            .load("b1", "electricity")
            .load("b1", "heating")
            .converter("b1", "electricity", "heating")
            .source("c1", "electricity")
            .source("c2", "electricity")
            .link("c1", "b1", "electricity")
            .link("c2", "b1", "electricity");
        TopologyGraph::try_from_specification(&builder.synthesize()?)
    }

    #[test]
    fn test_component() -> Result<(), Error> {
        let graph = graph()?;

        assert_eq!(
            graph.component("b1_electricity"),
            Ok(&Component::load("b1", "electricity").with_id("b1_electricity"))
        );
        assert_eq!(
            graph.component("b1_electricity_bus").map(|c| c.kind()),
            Ok(crate::ComponentKind::Muxer)
        );
        assert_eq!(
            graph.component("b9"),
            Err(Error::component_not_found("Component with id b9 not found."))
        );

        Ok(())
    }

    #[test]
    fn test_components() -> Result<(), Error> {
        let graph = graph()?;

        assert_eq!(graph.components().count(), 7);
        assert!(graph
            .components()
            .filter(|c| c.kind() == crate::ComponentKind::Source)
            .filter_map(|c| c.id())
            .eq(["c1_electricity_source", "c2_electricity_source"]));
        // Synthesized muxers come after the declared components.
        assert_eq!(
            graph.components().last().and_then(|c| c.id()),
            Some("b1_electricity_bus_1")
        );

        Ok(())
    }

    #[test]
    fn test_connections() -> Result<(), Error> {
        let graph = graph()?;

        assert_eq!(
            graph
                .connections()
                .map(Connection::to_triple)
                .collect::<Vec<_>>(),
            [
                ["b1_electricity_bus:OUT(0)", "b1_electricity:IN(0)", "electricity"],
                ["b1_electricity_bus:OUT(1)", "b1_heating_generator:IN(0)", "electricity"],
                ["b1_heating_generator:OUT(0)", "b1_heating:IN(0)", "heating"],
                // The link muxer merges both links into the site bus.
                ["b1_electricity_bus_1:OUT(0)", "b1_electricity_bus:IN(0)", "electricity"],
                ["c1_electricity_source:OUT(0)", "b1_electricity_bus_1:IN(0)", "electricity"],
                ["c2_electricity_source:OUT(0)", "b1_electricity_bus_1:IN(1)", "electricity"],
            ]
        );

        Ok(())
    }

    #[test]
    fn test_neighbors() -> Result<(), Error> {
        let graph = graph()?;

        assert!(graph
            .predecessors("c1_electricity_source")
            .is_ok_and(|mut x| x.next().is_none()));

        let mut predecessors = graph
            .predecessors("b1_electricity_bus_1")?
            .filter_map(|c| c.id())
            .collect::<Vec<_>>();
        predecessors.sort();
        assert_eq!(predecessors, ["c1_electricity_source", "c2_electricity_source"]);

        assert!(graph
            .successors("b1_heating_generator")
            .is_ok_and(|x| x.filter_map(|c| c.id()).eq(["b1_heating"])));

        assert!(graph
            .successors("b1_heating")
            .is_ok_and(|mut x| x.next().is_none()));

        assert!(graph
            .predecessors("b9")
            .is_err_and(|e| e == Error::component_not_found("Component with id b9 not found.")));
        assert!(graph
            .successors("b9")
            .is_err_and(|e| e == Error::component_not_found("Component with id b9 not found.")));

        Ok(())
    }
}
