// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

/*!
# Energy Network Topology

This is a library for wiring up the components of a multi-location energy
network.

An energy network is declared as a set of components (sources, loads,
converters, stores, pass-throughs and, optionally, muxers), each placed at a
named location, and a set of network links that carry a flow from one
location to another.  The declaration says nothing about which ports of which
components are connected.  [`synthesize`] fills that gap: it produces a fully
wired, point-to-point connection list, inserting muxers wherever a flow fans
in or out.

## Synthesis

Synthesis runs in four stages:

- Every component without an explicit id gets a deterministic one, derived
  from its kind, location and flow, for example `b1_electricity` for a load
  of electricity at location `b1`.
- The components at every location are grouped by flow and by the role they
  play for that flow: sources and converters supply it, loads and converters
  draw it, and stores and pass-throughs buffer it.
- For every such group, producers are wired to consumers, directly when
  there is one of each and through a muxer (a bus) otherwise.  Stores, if
  present, sit between the producers and the consumers.
- Network links are resolved last.  Each link connects the export point of
  its source location to the import point of its destination location,
  through an additional muxer where several links share one point.

Synthesized muxers are added to the specification, and every connection
names its ports: `b1_electricity_bus:OUT(0) -> b1_electricity:IN(0)`.

If the declared topology can't be wired unambiguously, synthesis fails with
an [`Error`] naming the offending location and flow.  Synthesis never
returns a partial result.

## Records

[`SpecificationRecords`] is the serializable form of a specification, with
one list per component kind.  [`synthesize_records`] reads a specification
from records and returns the records of the synthesized result, including
the `connection` list of `[from, to, flow]` triples.

## The topology graph

The synthesized result can be loaded into a [`TopologyGraph`], a
[`petgraph`]-backed view that validates the connections (ports exist, carry
the connection's flow and are used at most once, and muxers are fully
connected) and supports neighbor queries.
*/

mod bus;
mod classifier;
mod links;
mod registry;
mod synthesis;
pub use synthesis::{synthesize, synthesize_records};

mod component;
pub use component::{Attributes, Component};

mod component_kind;
pub use component_kind::{ComponentKind, Role};

mod config;
pub use config::{SynthesisConfig, DEFAULT_LOSSFLOW};

mod connection;
pub use connection::{Connection, Direction, Port};

pub use links::NetworkLink;

mod specification;
pub use specification::{
    ConverterRecord, LoadRecord, MuxerRecord, NetworkLinkRecord, PassThroughRecord, SourceRecord,
    Specification, SpecificationRecords, StoreRecord,
};

mod graph;
pub use graph::{iterators, TopologyGraph};

mod error;
pub use error::{Error, ErrorKind};

#[cfg(test)]
mod test_utils;
