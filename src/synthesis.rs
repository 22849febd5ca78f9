// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! The synthesis driver, and the state it shares with the bus insertion
//! engine and the link resolver.

use crate::classifier::Classifier;
use crate::connection::ConnectPoints;
use crate::registry::{self, IdRegistry};
use crate::{
    Component, Connection, Error, Port, Specification, SpecificationRecords, SynthesisConfig,
    TopologyGraph,
};

/// Mutable state of one synthesis run.
pub(crate) struct SynthesisContext<'a> {
    pub(crate) config: &'a SynthesisConfig,
    pub(crate) registry: IdRegistry,
    pub(crate) components: Vec<Component>,
    pub(crate) connections: Vec<Connection>,
    pub(crate) connect_points: ConnectPoints,
}

impl<'a> SynthesisContext<'a> {
    pub(crate) fn new(
        config: &'a SynthesisConfig,
        registry: IdRegistry,
        components: Vec<Component>,
    ) -> Self {
        Self {
            config,
            registry,
            components,
            connections: vec![],
            connect_points: ConnectPoints::default(),
        }
    }

    /// Appends a connection to the connection list.
    pub(crate) fn connect(&mut self, from: Port, to: Port, flow: &str) -> Result<(), Error> {
        let connection = Connection::try_new(from, to, flow)?;
        tracing::debug!("Connecting {connection}.");
        self.connections.push(connection);
        Ok(())
    }

    /// Creates a muxer at `location` for `flow`, adds it to the components
    /// and returns its id.
    pub(crate) fn synthesize_muxer(
        &mut self,
        location: &str,
        flow: &str,
        num_inflows: usize,
        num_outflows: usize,
    ) -> String {
        let mut muxer = Component::muxer(location, flow, num_inflows, num_outflows);
        let id = self.registry.claim(&muxer.base_id());
        tracing::debug!(
            "Synthesized muxer {id} with {num_inflows} in / {num_outflows} out for {flow} at {location}."
        );
        muxer.set_id(id.clone());
        self.components.push(muxer);
        id
    }
}

/// Wires up the given specification.
///
/// Assigns ids to all components that don't have one, inserts muxers
/// wherever a flow fans in or out at a location, and resolves every network
/// link into a connection.  The returned specification carries the
/// synthesized muxers after the declared components, and the complete
/// connection list.
///
/// Returns an error if the specification can't be wired.  The input is
/// consumed either way and must not be reused.
pub fn synthesize(spec: Specification, config: &SynthesisConfig) -> Result<Specification, Error> {
    if !spec.connections().is_empty() {
        return Err(Error::malformed_specification(format!(
            "Specification already has {} connections; synthesis must run on a raw specification.",
            spec.connections().len()
        )));
    }
    spec.validate()?;

    let (mut components, network_links) = spec.into_parts();
    let num_declared = components.len();

    let mut registry = IdRegistry::new();
    registry::assign_ids(&mut components, &mut registry)?;

    let sites = Classifier::new(&components, &network_links).sites()?;

    let mut ctx = SynthesisContext::new(config, registry, components);
    for site in &sites {
        ctx.insert_buses(site)?;
    }
    ctx.resolve_links(&network_links)?;

    let spec = Specification::from_parts(ctx.components, network_links, ctx.connections);
    TopologyGraph::try_from_specification(&spec).map_err(|e| {
        Error::internal(format!("Synthesized topology failed validation: {e}"))
    })?;

    tracing::info!(
        "Synthesized {} connections over {} sites, adding {} muxers.",
        spec.connections().len(),
        sites.len(),
        spec.components().len() - num_declared
    );

    Ok(spec)
}

/// Reads a specification from its records, wires it up, and returns the
/// records of the result.
///
/// See [`synthesize`].
pub fn synthesize_records(
    records: SpecificationRecords,
    config: &SynthesisConfig,
) -> Result<SpecificationRecords, Error> {
    let spec = Specification::try_from_records(records, config)?;
    Ok(synthesize(spec, config)?.into_records())
}
