// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for creating [`TopologyGraph`] instances from given components and
//! connections.

use petgraph::graph::DiGraph;

use crate::{Component, Connection, Error, Specification};

use super::{NodeIndexMap, TopologyGraph};

/// `TopologyGraph` instantiation.
impl TopologyGraph {
    /// Creates a new [`TopologyGraph`] from the given components and
    /// connections.
    ///
    /// Returns an error if the graph is invalid.
    pub fn try_new<NodeIterator, EdgeIterator>(
        components: NodeIterator,
        connections: EdgeIterator,
    ) -> Result<Self, Error>
    where
        NodeIterator: IntoIterator<Item = Component>,
        EdgeIterator: IntoIterator<Item = Connection>,
    {
        let (graph, indices) = Self::create_graph(components)?;

        let mut tg = Self {
            graph,
            node_indices: indices,
        };
        tg.add_connections(connections)?;

        tg.validate()?;

        Ok(tg)
    }

    /// Creates a new [`TopologyGraph`] from the components and connections of
    /// a synthesized specification.
    pub fn try_from_specification(spec: &Specification) -> Result<Self, Error> {
        Self::try_new(
            spec.components().iter().cloned(),
            spec.connections().iter().cloned(),
        )
    }

    fn create_graph(
        components: impl IntoIterator<Item = Component>,
    ) -> Result<(DiGraph<Component, Connection>, NodeIndexMap), Error> {
        let mut graph = DiGraph::new();
        let mut indices = NodeIndexMap::new();

        for component in components {
            let Some(cid) = component.id().map(str::to_string) else {
                return Err(Error::malformed_specification(format!(
                    "{} at location {} has no id.",
                    component.kind(),
                    component.location()
                )));
            };
            if indices.contains_key(&cid) {
                return Err(Error::duplicate_definition(format!(
                    "Duplicate component id found: {cid}"
                )));
            }

            let idx = graph.add_node(component);
            indices.insert(cid, idx);
        }

        Ok((graph, indices))
    }

    fn add_connections(
        &mut self,
        connections: impl IntoIterator<Item = Connection>,
    ) -> Result<(), Error> {
        for connection in connections {
            let sid = connection.from().component_id();
            let did = connection.to().component_id();

            if sid == did {
                return Err(Error::invalid_connection(format!(
                    "Connection:({sid}, {did}) Can't connect a component to itself."
                )));
            }
            for cid in [sid, did] {
                if !self.node_indices.contains_key(cid) {
                    return Err(Error::invalid_connection(format!(
                        "Connection:({sid}, {did}) Can't find a component with id {cid}"
                    )));
                }
            }

            let source_idx = self.node_indices[sid];
            let dest_idx = self.node_indices[did];
            self.graph.add_edge(source_idx, dest_idx, connection);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Port;

    fn nodes_and_edges() -> Result<(Vec<Component>, Vec<Connection>), Error> {
        let components = vec![
            Component::load("b1", "electricity").with_id("b1_electricity"),
            Component::source("utility", "electricity").with_id("grid"),
            Component::muxer("b1", "electricity", 1, 2).with_id("bus"),
            Component::load("b1", "electricity").with_id("b1_electricity_1"),
        ];
        let connections = vec![
            Connection::try_new(
                Port::outflow("grid", 0),
                Port::inflow("bus", 0),
                "electricity",
            )?,
            Connection::try_new(
                Port::outflow("bus", 0),
                Port::inflow("b1_electricity", 0),
                "electricity",
            )?,
            Connection::try_new(
                Port::outflow("bus", 1),
                Port::inflow("b1_electricity_1", 0),
                "electricity",
            )?,
        ];

        Ok((components, connections))
    }

    #[test]
    fn test_component_validation() -> Result<(), Error> {
        let (mut components, connections) = nodes_and_edges()?;

        assert!(TopologyGraph::try_new(components.clone(), connections.clone()).is_ok());

        components.push(Component::load("b2", "electricity").with_id("grid"));
        assert!(
            TopologyGraph::try_new(components.clone(), connections.clone())
                .is_err_and(|e| e == Error::duplicate_definition("Duplicate component id found: grid"))
        );

        components.pop();
        components.push(Component::load("b2", "electricity"));
        assert!(
            TopologyGraph::try_new(components.clone(), connections.clone()).is_err_and(|e| e
                == Error::malformed_specification("Load at location b2 has no id."))
        );

        Ok(())
    }

    #[test]
    fn test_connection_validation() -> Result<(), Error> {
        let (components, mut connections) = nodes_and_edges()?;

        connections.push(Connection::try_new(
            Port::outflow("bus", 1),
            Port::inflow("bus", 0),
            "electricity",
        )?);
        assert!(
            TopologyGraph::try_new(components.clone(), connections.clone()).is_err_and(|e| e
                == Error::invalid_connection(
                    "Connection:(bus, bus) Can't connect a component to itself."
                ))
        );

        connections.pop();
        connections.push(Connection::try_new(
            Port::outflow("grid", 0),
            Port::inflow("b9", 0),
            "electricity",
        )?);
        assert!(
            TopologyGraph::try_new(components.clone(), connections.clone()).is_err_and(|e| e
                == Error::invalid_connection(
                    "Connection:(grid, b9) Can't find a component with id b9"
                ))
        );

        connections.pop();
        assert!(TopologyGraph::try_new(components, connections).is_ok());

        Ok(())
    }
}
