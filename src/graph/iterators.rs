// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Iterators over components and connections in a `TopologyGraph`.

use petgraph::graph::DiGraph;

use crate::{Component, Connection};

/// An iterator over the components in a `TopologyGraph`.
pub struct Components<'a> {
    pub(crate) iter: std::slice::Iter<'a, petgraph::graph::Node<Component>>,
}

impl<'a> Iterator for Components<'a> {
    type Item = &'a Component;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|n| &n.weight)
    }
}

/// An iterator over the connections in a `TopologyGraph`.
pub struct Connections<'a> {
    pub(crate) iter: std::slice::Iter<'a, petgraph::graph::Edge<Connection>>,
}

impl<'a> Iterator for Connections<'a> {
    type Item = &'a Connection;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|e| &e.weight)
    }
}

/// An iterator over the neighbors of a component in a `TopologyGraph`.
pub struct Neighbors<'a> {
    pub(crate) graph: &'a DiGraph<Component, Connection>,
    pub(crate) iter: petgraph::graph::Neighbors<'a, Connection>,
}

impl<'a> Iterator for Neighbors<'a> {
    type Item = &'a Component;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|i| &self.graph[i])
    }
}
