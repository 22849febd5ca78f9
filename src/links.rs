// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Network links, and their resolution into connections between the
//! connect-points of their locations.

use std::collections::{BTreeMap, VecDeque};

use crate::synthesis::SynthesisContext;
use crate::{Error, Port};

/// A declared transport of one flow from one location to another.
///
/// The components at either end are not named: they are inferred from the
/// wiring of the flow at each location.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NetworkLink {
    source_location: String,
    destination_location: String,
    flow: String,
}

impl NetworkLink {
    /// Creates a new network link.
    pub fn new(
        source_location: impl Into<String>,
        destination_location: impl Into<String>,
        flow: impl Into<String>,
    ) -> Self {
        Self {
            source_location: source_location.into(),
            destination_location: destination_location.into(),
            flow: flow.into(),
        }
    }

    /// Returns the location the link carries the flow away from.
    pub fn source_location(&self) -> &str {
        &self.source_location
    }

    /// Returns the location the link carries the flow to.
    pub fn destination_location(&self) -> &str {
        &self.destination_location
    }

    /// Returns the flow carried by the link.
    pub fn flow(&self) -> &str {
        &self.flow
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        for (field, value) in [
            ("source_location", &self.source_location),
            ("destination_location", &self.destination_location),
            ("flow", &self.flow),
        ] {
            if value.trim().is_empty() {
                return Err(Error::malformed_specification(format!(
                    "{self}: attribute `{field}` is empty."
                )));
            }
        }
        if self.source_location == self.destination_location {
            return Err(Error::malformed_specification(format!(
                "{self}: a link can't start and end at the same location."
            )));
        }
        Ok(())
    }
}

impl std::fmt::Display for NetworkLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "NetworkLink({} -> {}, {})",
            self.source_location, self.destination_location, self.flow
        )
    }
}

/// `(location, flow)` key of the link tallies and queues.
type SiteKey<'l> = (&'l str, &'l str);

/// Link resolution.
impl SynthesisContext<'_> {
    /// Connects the connect-points of every network link's locations.
    ///
    /// A location whose connect-point serves more than one link of the same
    /// flow gets a muxer dedicated to those links.  Links are then resolved
    /// in declaration order, each taking the next free port on either side.
    ///
    /// Returns an error if a location has no connect-point for a link, or if
    /// the connect-points don't match up with the links.
    pub(crate) fn resolve_links(&mut self, links: &[NetworkLink]) -> Result<(), Error> {
        let mut source_counts: BTreeMap<SiteKey, usize> = BTreeMap::new();
        let mut dest_counts: BTreeMap<SiteKey, usize> = BTreeMap::new();
        for link in links {
            *source_counts
                .entry((link.source_location(), link.flow()))
                .or_default() += 1;
            *dest_counts
                .entry((link.destination_location(), link.flow()))
                .or_default() += 1;
        }

        let mut outgoing = BTreeMap::new();
        for ((location, flow), count) in source_counts {
            let point = self
                .connect_points
                .outbound(location, flow)
                .cloned()
                .ok_or_else(|| {
                    Error::unresolved_link(format!(
                        "Location {location} has no outbound connect-point for {flow}."
                    ))
                })?;
            outgoing.insert((location, flow), self.fan_out(location, flow, point, count)?);
        }

        let mut incoming = BTreeMap::new();
        for ((location, flow), count) in dest_counts {
            let point = self
                .connect_points
                .inbound(location, flow)
                .cloned()
                .ok_or_else(|| {
                    Error::unresolved_link(format!(
                        "Location {location} has no inbound connect-point for {flow}."
                    ))
                })?;
            incoming.insert((location, flow), self.fan_in(location, flow, point, count)?);
        }

        for link in links {
            let from = outgoing
                .get_mut(&(link.source_location(), link.flow()))
                .and_then(VecDeque::pop_front)
                .ok_or_else(|| {
                    Error::unresolved_link(format!(
                        "{link}: no free outbound connect-point left at {}.",
                        link.source_location()
                    ))
                })?;
            let to = incoming
                .get_mut(&(link.destination_location(), link.flow()))
                .and_then(VecDeque::pop_front)
                .ok_or_else(|| {
                    Error::unresolved_link(format!(
                        "{link}: no free inbound connect-point left at {}.",
                        link.destination_location()
                    ))
                })?;
            self.connect(from, to, link.flow())?;
        }

        for (side, queues) in [("outbound", &outgoing), ("inbound", &incoming)] {
            if let Some(((location, flow), queue)) = queues.iter().find(|(_, q)| !q.is_empty()) {
                return Err(Error::unresolved_link(format!(
                    "{} {side} connect-points for {flow} at {location} were left unused.",
                    queue.len()
                )));
            }
        }

        Ok(())
    }

    /// Returns the ports that links leaving `location` with `flow` start at.
    fn fan_out(
        &mut self,
        location: &str,
        flow: &str,
        point: Port,
        count: usize,
    ) -> Result<VecDeque<Port>, Error> {
        if count == 1 {
            return Ok(VecDeque::from([point]));
        }
        let bus = self.synthesize_muxer(location, flow, 1, count);
        self.connect(point, Port::inflow(&bus, 0), flow)?;
        Ok((0..count).map(|i| Port::outflow(&bus, i)).collect())
    }

    /// Returns the ports that links arriving at `location` with `flow` end
    /// at.
    fn fan_in(
        &mut self,
        location: &str,
        flow: &str,
        point: Port,
        count: usize,
    ) -> Result<VecDeque<Port>, Error> {
        if count == 1 {
            return Ok(VecDeque::from([point]));
        }
        let bus = self.synthesize_muxer(location, flow, count, 1);
        self.connect(Port::outflow(&bus, 0), point, flow)?;
        Ok((0..count).map(|i| Port::inflow(&bus, i)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{triples, SpecificationBuilder};
    use crate::{Component, Specification, SynthesisConfig};

    #[test]
    fn test_fan_out_to_several_locations() -> Result<(), Error> {
        let mut builder = SpecificationBuilder::new();
        builder
            .source("plant", "cooling")
            .load("b1", "cooling")
            .load("b2", "cooling")
            .link("plant", "b2", "cooling")
            .link("plant", "b1", "cooling");
        let spec = builder.synthesize()?;

        assert_eq!(
            triples(&spec),
            [
                ["plant_cooling_source:OUT(0)", "plant_cooling_bus:IN(0)", "cooling"],
                ["plant_cooling_bus:OUT(0)", "b2_cooling:IN(0)", "cooling"],
                ["plant_cooling_bus:OUT(1)", "b1_cooling:IN(0)", "cooling"],
            ]
        );

        Ok(())
    }

    #[test]
    fn test_parallel_links() -> Result<(), Error> {
        let mut builder = SpecificationBuilder::new();
        builder
            .source("c1", "electricity")
            .load("b1", "electricity")
            .link("c1", "b1", "electricity")
            .link("c1", "b1", "electricity");
        let spec = builder.synthesize()?;

        assert_eq!(
            triples(&spec),
            [
                ["c1_electricity_source:OUT(0)", "c1_electricity_bus:IN(0)", "electricity"],
                ["b1_electricity_bus:OUT(0)", "b1_electricity:IN(0)", "electricity"],
                ["c1_electricity_bus:OUT(0)", "b1_electricity_bus:IN(0)", "electricity"],
                ["c1_electricity_bus:OUT(1)", "b1_electricity_bus:IN(1)", "electricity"],
            ]
        );

        Ok(())
    }

    #[test]
    fn test_missing_location() {
        let mut builder = SpecificationBuilder::new();
        builder
            .load("b1", "electricity")
            .link("utility", "b1", "electricity");

        assert_eq!(
            builder.synthesize(),
            Err(Error::unresolved_link(
                "Location utility has no outbound connect-point for electricity."
            ))
        );
    }

    #[test]
    fn test_missing_destination() {
        let mut builder = SpecificationBuilder::new();
        builder
            .source("utility", "electricity")
            .link("utility", "b2", "electricity");

        assert_eq!(
            builder.synthesize(),
            Err(Error::unresolved_link(
                "Location b2 has no inbound connect-point for electricity."
            ))
        );
    }

    #[test]
    fn test_self_link() {
        let spec = Specification::new(
            [Component::load("b1", "electricity")],
            [NetworkLink::new("b1", "b1", "electricity")],
        );

        assert_eq!(
            crate::synthesize(spec, &SynthesisConfig::default()),
            Err(Error::malformed_specification(
                "NetworkLink(b1 -> b1, electricity): a link can't start and end at the same \
                 location."
            ))
        );
    }
}
