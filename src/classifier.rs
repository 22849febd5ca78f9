// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Queries that group components and network links by location, flow and
//! role.

use std::collections::{BTreeMap, BTreeSet};

use crate::{Attributes, Component, Error, NetworkLink, Role};

/// A muxer declared in the input, as seen from its site.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct DeclaredMuxer {
    pub(crate) id: String,
    pub(crate) num_inflows: usize,
    pub(crate) num_outflows: usize,
}

/// A snapshot of every endpoint of one flow at one location.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct FlowSite {
    pub(crate) location: String,
    pub(crate) flow: String,
    /// Component ids per role, in declaration order.
    pub(crate) endpoints: BTreeMap<Role, Vec<String>>,
    pub(crate) declared_muxer: Option<DeclaredMuxer>,
    /// Number of network links leaving the location with this flow.
    pub(crate) exports: usize,
    /// Number of network links arriving at the location with this flow.
    pub(crate) imports: usize,
}

impl FlowSite {
    /// Returns the ids of the components in the given role.
    pub(crate) fn ids(&self, role: Role) -> &[String] {
        self.endpoints.get(&role).map(Vec::as_slice).unwrap_or_default()
    }
}

/// Read-only queries over the components and network links of a
/// specification.
pub(crate) struct Classifier<'a> {
    components: &'a [Component],
    links: &'a [NetworkLink],
}

impl<'a> Classifier<'a> {
    pub(crate) fn new(components: &'a [Component], links: &'a [NetworkLink]) -> Self {
        Self { components, links }
    }

    /// Returns every location referenced by a component, in sorted order.
    pub(crate) fn locations(&self) -> BTreeSet<&'a str> {
        self.components.iter().map(|c| c.location()).collect()
    }

    /// Returns every flow touching the given location, in sorted order.
    ///
    /// This includes the flows of all components at the location and the
    /// flows of all network links starting or ending there.
    pub(crate) fn flows_at(&self, location: &str) -> BTreeSet<&'a str> {
        let component_flows = self
            .components
            .iter()
            .filter(|c| c.location() == location)
            .flat_map(|c| c.flows());
        let link_flows = self
            .links
            .iter()
            .filter(|l| l.source_location() == location || l.destination_location() == location)
            .map(|l| l.flow());
        component_flows.chain(link_flows).collect()
    }

    /// Returns the components at `location` that play `role` for `flow`, in
    /// declaration order.
    pub(crate) fn components_in_role(
        &self,
        location: &'a str,
        flow: &'a str,
        role: Role,
    ) -> impl Iterator<Item = &'a Component> + 'a {
        self.components
            .iter()
            .filter(move |c| c.location() == location && c.has_role(flow, role))
    }

    /// Returns the muxers declared at `location` for `flow`.
    pub(crate) fn declared_muxers(
        &self,
        location: &'a str,
        flow: &'a str,
    ) -> impl Iterator<Item = &'a Component> + 'a {
        self.components.iter().filter(move |c| {
            c.is_muxer() && c.location() == location && c.flows().contains(&flow)
        })
    }

    /// Returns the network links carrying `flow` away from `location`.
    pub(crate) fn outbound_links(
        &self,
        location: &'a str,
        flow: &'a str,
    ) -> impl Iterator<Item = &'a NetworkLink> + 'a {
        self.links
            .iter()
            .filter(move |l| l.source_location() == location && l.flow() == flow)
    }

    /// Returns the network links carrying `flow` to `location`.
    pub(crate) fn inbound_links(
        &self,
        location: &'a str,
        flow: &'a str,
    ) -> impl Iterator<Item = &'a NetworkLink> + 'a {
        self.links
            .iter()
            .filter(move |l| l.destination_location() == location && l.flow() == flow)
    }

    /// Returns a snapshot of every (location, flow) pair, sorted by location
    /// and then by flow.
    ///
    /// Returns an error if a component has no id yet, or if more than one
    /// muxer is declared for the same location and flow.
    pub(crate) fn sites(&self) -> Result<Vec<FlowSite>, Error> {
        let mut sites = vec![];
        for location in self.locations() {
            for flow in self.flows_at(location) {
                sites.push(self.site(location, flow)?);
            }
        }
        Ok(sites)
    }

    fn site(&self, location: &'a str, flow: &'a str) -> Result<FlowSite, Error> {
        let mut endpoints = BTreeMap::new();
        for role in Role::ALL {
            let ids = self
                .components_in_role(location, flow, role)
                .map(|c| c.assigned_id().map(str::to_string))
                .collect::<Result<Vec<_>, _>>()?;
            if !ids.is_empty() {
                endpoints.insert(role, ids);
            }
        }

        let mut muxers = self.declared_muxers(location, flow);
        let declared_muxer = match muxers.next() {
            Some(muxer) => {
                if let Some(other) = muxers.next() {
                    return Err(Error::duplicate_definition(format!(
                        "Muxers {} and {} are both declared for {flow} at location {location}.",
                        muxer.assigned_id()?,
                        other.assigned_id()?
                    )));
                }
                let Attributes::Muxer {
                    num_inflows,
                    num_outflows,
                    ..
                } = muxer.attributes()
                else {
                    return Err(Error::internal(format!(
                        "Component {} is not a muxer.",
                        muxer.assigned_id()?
                    )));
                };
                Some(DeclaredMuxer {
                    id: muxer.assigned_id()?.to_string(),
                    num_inflows: *num_inflows,
                    num_outflows: *num_outflows,
                })
            }
            None => None,
        };

        Ok(FlowSite {
            location: location.to_string(),
            flow: flow.to_string(),
            endpoints,
            declared_muxer,
            exports: self.outbound_links(location, flow).count(),
            imports: self.inbound_links(location, flow).count(),
        })
    }
}
