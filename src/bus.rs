// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! The bus insertion engine: wires up every flow at every location, either
//! directly or through muxers, and records where each location meets its
//! network links.

use crate::classifier::FlowSite;
use crate::synthesis::SynthesisContext;
use crate::{Error, Port, Role};

/// One end of a wiring decision at a site.
#[derive(Clone, Debug, PartialEq)]
enum Endpoint {
    /// A local component.  Its port is the `OUT(0)` port for producers and
    /// the `IN(0)` port for consumers.
    Component { role: Role, port: Port },
    /// The network links arriving at the site, for producers, or leaving it,
    /// for consumers.
    Link,
}

impl Endpoint {
    fn describe(&self) -> String {
        match self {
            Endpoint::Component { role, port } => format!("{role} {}", port.component_id()),
            Endpoint::Link => "NetworkLink".to_string(),
        }
    }
}

impl FlowSite {
    /// Returns the endpoints that supply the flow, in port-assignment order.
    fn producers(&self) -> Vec<Endpoint> {
        let mut producers = self.endpoints_where(Role::is_supply, |id| Port::outflow(id, 0));
        if self.imports > 0 {
            producers.push(Endpoint::Link);
        }
        producers
    }

    /// Returns the endpoints that draw the flow, in port-assignment order.
    fn consumers(&self) -> Vec<Endpoint> {
        let mut consumers = self.endpoints_where(Role::is_demand, |id| Port::inflow(id, 0));
        if self.exports > 0 {
            consumers.push(Endpoint::Link);
        }
        consumers
    }

    fn endpoints_where(
        &self,
        pred: impl Fn(&Role) -> bool,
        port: impl Fn(&str) -> Port,
    ) -> Vec<Endpoint> {
        let mut endpoints = vec![];
        for (role, ids) in self.endpoints.iter().filter(|(role, _)| pred(*role)) {
            for id in ids {
                endpoints.push(Endpoint::Component {
                    role: *role,
                    port: port(id.as_str()),
                });
            }
        }
        endpoints
    }
}

/// Bus insertion.
impl SynthesisContext<'_> {
    /// Wires up all endpoints of the given site.
    ///
    /// Returns an error if the site's endpoints can't be wired by any rule.
    pub(crate) fn insert_buses(&mut self, site: &FlowSite) -> Result<(), Error> {
        let producers = site.producers();
        let consumers = site.consumers();
        let stores = site.ids(Role::Store);

        tracing::debug!(
            "Wiring {} at {}: {} producers, {} consumers, {} stores.",
            site.flow,
            site.location,
            producers.len(),
            consumers.len(),
            stores.len()
        );

        if stores.is_empty() {
            return self.wire_without_stores(site, &producers, &consumers);
        }

        if let Some(muxer) = &site.declared_muxer {
            return Err(Error::ambiguous_topology(format!(
                "Declared muxer {} can't be combined with stores for {} at location {}.",
                muxer.id, site.flow, site.location
            )));
        }
        self.wire_store_outflows(site, stores, &consumers)?;
        self.wire_store_inflows(site, &producers, stores)
    }

    /// Wires producers to consumers, through a single bus if either side has
    /// more than one endpoint.
    fn wire_without_stores(
        &mut self,
        site: &FlowSite,
        producers: &[Endpoint],
        consumers: &[Endpoint],
    ) -> Result<(), Error> {
        if let Some(muxer) = &site.declared_muxer {
            if producers.is_empty() || consumers.is_empty() {
                return Err(Error::ambiguous_topology(format!(
                    "Declared muxer {} needs both producers and consumers of {} at location {}.",
                    muxer.id, site.flow, site.location
                )));
            }
        }

        match (producers, consumers) {
            ([], []) => Ok(()),
            ([Endpoint::Link], []) => Err(Error::unresolved_link(format!(
                "Location {} has no inbound connect-point for {}: nothing there consumes it.",
                site.location, site.flow
            ))),
            ([], [Endpoint::Link]) => Err(Error::unresolved_link(format!(
                "Location {} has no outbound connect-point for {}: nothing there supplies it.",
                site.location, site.flow
            ))),
            (_, []) => self.idle(site, "producers", producers),
            ([], _) => self.idle(site, "consumers", consumers),
            ([producer], [consumer]) if site.declared_muxer.is_none() => {
                self.wire_direct(site, producer, consumer)
            }
            _ => {
                let bus = self.bus(site, producers.len(), consumers.len())?;
                for (index, producer) in producers.iter().enumerate() {
                    self.feed(site, producer, Port::inflow(&bus, index))?;
                }
                for (index, consumer) in consumers.iter().enumerate() {
                    self.drain(site, Port::outflow(&bus, index), consumer)?;
                }
                Ok(())
            }
        }
    }

    /// Connects a sole producer to a sole consumer.
    fn wire_direct(
        &mut self,
        site: &FlowSite,
        producer: &Endpoint,
        consumer: &Endpoint,
    ) -> Result<(), Error> {
        match (producer, consumer) {
            (Endpoint::Link, Endpoint::Link) => Err(Error::ambiguous_topology(format!(
                "{} only passes through location {}: inbound links can't be wired \
                 to outbound links without a local component.",
                site.flow, site.location
            ))),
            (
                Endpoint::Link,
                Endpoint::Component {
                    role: Role::InternalLoad,
                    port,
                },
            ) => Err(Error::ambiguous_topology(format!(
                "Unsupported topology for {} at location {}: a network link feeding \
                 converter {} with no store in between.",
                site.flow,
                site.location,
                port.component_id()
            ))),
            (Endpoint::Link, Endpoint::Component { port, .. }) => self
                .connect_points
                .record_inbound(&site.location, &site.flow, port.clone()),
            (Endpoint::Component { port, .. }, consumer) => {
                self.drain(site, port.clone(), consumer)
            }
        }
    }

    /// Wires the outflows of the stores to the consumers.
    fn wire_store_outflows(
        &mut self,
        site: &FlowSite,
        stores: &[String],
        consumers: &[Endpoint],
    ) -> Result<(), Error> {
        match (stores, consumers) {
            (_, []) => self.idle(site, "stores without consumers", &[]),
            ([store], [consumer]) => self.drain(site, Port::outflow(store, 0), consumer),
            _ => {
                let bus = self.synthesize_muxer(
                    &site.location,
                    &site.flow,
                    stores.len(),
                    consumers.len(),
                );
                for (index, store) in stores.iter().enumerate() {
                    self.connect(Port::outflow(store, 0), Port::inflow(&bus, index), &site.flow)?;
                }
                for (index, consumer) in consumers.iter().enumerate() {
                    self.drain(site, Port::outflow(&bus, index), consumer)?;
                }
                Ok(())
            }
        }
    }

    /// Wires the producers to the inflows of the stores.
    fn wire_store_inflows(
        &mut self,
        site: &FlowSite,
        producers: &[Endpoint],
        stores: &[String],
    ) -> Result<(), Error> {
        match (producers, stores) {
            ([], _) => self.idle(site, "stores without producers", &[]),
            ([producer], [store]) => self.feed(site, producer, Port::inflow(store, 0)),
            _ => {
                let bus = self.synthesize_muxer(
                    &site.location,
                    &site.flow,
                    producers.len(),
                    stores.len(),
                );
                for (index, producer) in producers.iter().enumerate() {
                    self.feed(site, producer, Port::inflow(&bus, index))?;
                }
                for (index, store) in stores.iter().enumerate() {
                    self.connect(Port::outflow(&bus, index), Port::inflow(store, 0), &site.flow)?;
                }
                Ok(())
            }
        }
    }

    /// Returns the id of the bus for a site without stores: the declared
    /// muxer if there is one, or a newly synthesized one.
    fn bus(
        &mut self,
        site: &FlowSite,
        num_inflows: usize,
        num_outflows: usize,
    ) -> Result<String, Error> {
        match &site.declared_muxer {
            Some(muxer)
                if muxer.num_inflows == num_inflows && muxer.num_outflows == num_outflows =>
            {
                tracing::debug!("Using declared muxer {} as bus.", muxer.id);
                Ok(muxer.id.clone())
            }
            Some(muxer) => Err(Error::ambiguous_topology(format!(
                "Declared muxer {} has {} in / {} out, but {} at location {} needs \
                 {num_inflows} in / {num_outflows} out.",
                muxer.id, muxer.num_inflows, muxer.num_outflows, site.flow, site.location
            ))),
            None => Ok(self.synthesize_muxer(&site.location, &site.flow, num_inflows, num_outflows)),
        }
    }

    /// Lets `producer` feed the flow into `sink`.
    fn feed(&mut self, site: &FlowSite, producer: &Endpoint, sink: Port) -> Result<(), Error> {
        match producer {
            Endpoint::Component { port, .. } => self.connect(port.clone(), sink, &site.flow),
            Endpoint::Link => self
                .connect_points
                .record_inbound(&site.location, &site.flow, sink),
        }
    }

    /// Lets `consumer` draw the flow from `source`.
    fn drain(&mut self, site: &FlowSite, source: Port, consumer: &Endpoint) -> Result<(), Error> {
        match consumer {
            Endpoint::Component { port, .. } => self.connect(source, port.clone(), &site.flow),
            Endpoint::Link => self
                .connect_points
                .record_outbound(&site.location, &site.flow, source),
        }
    }

    /// Handles endpoints that have nothing to connect to.
    fn idle(&self, site: &FlowSite, what: &str, endpoints: &[Endpoint]) -> Result<(), Error> {
        let names = endpoints
            .iter()
            .map(Endpoint::describe)
            .collect::<Vec<_>>()
            .join(", ");
        let desc = if names.is_empty() {
            format!("Only {what} for {} at location {}.", site.flow, site.location)
        } else {
            format!(
                "Only {what} for {} at location {}: {names}.",
                site.flow, site.location
            )
        };

        if !self.config.allow_idle_flows {
            return Err(Error::ambiguous_topology(desc));
        }
        tracing::warn!("{desc} Leaving them unconnected.");
        Ok(())
    }
}
