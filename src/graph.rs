// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! A graph representation of a synthesized topology: the components of an
//! energy network and the port-level connections between them.

mod creation;
pub mod iterators;
mod retrieval;
mod validation;

use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

use crate::{Component, Connection};

/// `Component`s stored in a `DiGraph` instance can be addressed with
/// `NodeIndex`es.
///
/// `NodeIndexMap` stores the corresponding `NodeIndex` for any component id,
/// so that nodes in the `DiGraph` can be retrieved from their ids.
pub(crate) type NodeIndexMap = HashMap<String, NodeIndex>;

/// A graph representation of the components of an energy network and the
/// connections between them.
///
/// Connections are stored as edge weights.  Two components can be joined by
/// more than one connection, through different ports.
pub struct TopologyGraph {
    graph: DiGraph<Component, Connection>,
    node_indices: NodeIndexMap,
}
