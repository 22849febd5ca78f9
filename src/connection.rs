// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Ports, connections and the connect-point index.
//!
//! A port is written as `<id>:OUT(<index>)` or `<id>:IN(<index>)`, with
//! zero-based indices.  Downstream tooling consumes exactly this format.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

use crate::Error;

/// The direction of a port.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    /// An inflow port, receiving a flow.
    In,
    /// An outflow port, emitting a flow.
    Out,
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::In => write!(f, "IN"),
            Direction::Out => write!(f, "OUT"),
        }
    }
}

/// An indexed attachment point on a component.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Port {
    component_id: String,
    direction: Direction,
    index: usize,
}

impl Port {
    /// Creates the inflow port `index` of the given component.
    pub fn inflow(component_id: impl Into<String>, index: usize) -> Self {
        Self {
            component_id: component_id.into(),
            direction: Direction::In,
            index,
        }
    }

    /// Creates the outflow port `index` of the given component.
    pub fn outflow(component_id: impl Into<String>, index: usize) -> Self {
        Self {
            component_id: component_id.into(),
            direction: Direction::Out,
            index,
        }
    }

    /// Returns the id of the component the port belongs to.
    pub fn component_id(&self) -> &str {
        &self.component_id
    }

    /// Returns the direction of the port.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns the index of the port.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl Display for Port {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}({})", self.component_id, self.direction, self.index)
    }
}

impl FromStr for Port {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || Error::malformed_specification(format!("Invalid port: {s:?}"));

        let (component_id, rest) = s.rsplit_once(':').ok_or_else(malformed)?;
        let (direction, rest) = if let Some(rest) = rest.strip_prefix("OUT(") {
            (Direction::Out, rest)
        } else if let Some(rest) = rest.strip_prefix("IN(") {
            (Direction::In, rest)
        } else {
            return Err(malformed());
        };
        let index = rest
            .strip_suffix(')')
            .and_then(|index| index.parse::<usize>().ok())
            .ok_or_else(malformed)?;
        if component_id.is_empty() {
            return Err(malformed());
        }

        Ok(Self {
            component_id: component_id.to_string(),
            direction,
            index,
        })
    }
}

/// A connection from an outflow port to an inflow port, carrying a flow.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Connection {
    from: Port,
    to: Port,
    flow: String,
}

impl Connection {
    /// Creates a new connection.
    ///
    /// Returns an error if `from` is not an outflow port or `to` is not an
    /// inflow port.
    pub fn try_new(from: Port, to: Port, flow: impl Into<String>) -> Result<Self, Error> {
        if from.direction != Direction::Out || to.direction != Direction::In {
            return Err(Error::invalid_connection(format!(
                "Connection:({from}, {to}) must run from an OUT port to an IN port."
            )));
        }
        Ok(Self {
            from,
            to,
            flow: flow.into(),
        })
    }

    /// Returns the outflow port the connection starts at.
    pub fn from(&self) -> &Port {
        &self.from
    }

    /// Returns the inflow port the connection ends at.
    pub fn to(&self) -> &Port {
        &self.to
    }

    /// Returns the flow carried by the connection.
    pub fn flow(&self) -> &str {
        &self.flow
    }

    /// Returns the connection as a `[from, to, flow]` triple of strings.
    pub fn to_triple(&self) -> [String; 3] {
        [self.from.to_string(), self.to.to_string(), self.flow.clone()]
    }

    /// Parses a `[from, to, flow]` triple of strings.
    pub fn try_from_triple([from, to, flow]: &[String; 3]) -> Result<Self, Error> {
        Self::try_new(from.parse()?, to.parse()?, flow.as_str())
    }
}

impl Display for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {} [{}]", self.from, self.to, self.flow)
    }
}

/// `(location, flow)` key of the connect-point index.
type SiteKey = (String, String);

/// The ports at which each location presents its internal wiring of a flow
/// to the network links.
///
/// An outbound connect-point is an outflow port carrying the flow towards
/// the links leaving a location; an inbound connect-point is an inflow port
/// receiving it from the links arriving there.
#[derive(Debug, Default)]
pub(crate) struct ConnectPoints {
    outbound: BTreeMap<SiteKey, Port>,
    inbound: BTreeMap<SiteKey, Port>,
}

impl ConnectPoints {
    pub(crate) fn record_outbound(
        &mut self,
        location: &str,
        flow: &str,
        port: Port,
    ) -> Result<(), Error> {
        Self::record(&mut self.outbound, "outbound", location, flow, port)
    }

    pub(crate) fn record_inbound(
        &mut self,
        location: &str,
        flow: &str,
        port: Port,
    ) -> Result<(), Error> {
        Self::record(&mut self.inbound, "inbound", location, flow, port)
    }

    pub(crate) fn outbound(&self, location: &str, flow: &str) -> Option<&Port> {
        self.outbound.get(&(location.to_string(), flow.to_string()))
    }

    pub(crate) fn inbound(&self, location: &str, flow: &str) -> Option<&Port> {
        self.inbound.get(&(location.to_string(), flow.to_string()))
    }

    fn record(
        points: &mut BTreeMap<SiteKey, Port>,
        side: &str,
        location: &str,
        flow: &str,
        port: Port,
    ) -> Result<(), Error> {
        let key = (location.to_string(), flow.to_string());
        if let Some(existing) = points.get(&key) {
            return Err(Error::internal(format!(
                "Location {location} already has an {side} connect-point for {flow}: {existing}."
            )));
        }
        points.insert(key, port);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_format() {
        assert_eq!(
            Port::outflow("utility_electricity_source", 0).to_string(),
            "utility_electricity_source:OUT(0)"
        );
        assert_eq!(Port::inflow("b1_electricity", 3).to_string(), "b1_electricity:IN(3)");

        assert_eq!("b1_bus:OUT(12)".parse::<Port>(), Ok(Port::outflow("b1_bus", 12)));
        assert_eq!("a:b:IN(0)".parse::<Port>(), Ok(Port::inflow("a:b", 0)));
        for bad in ["b1_bus", "b1_bus:OUT", "b1_bus:OUT(x)", ":IN(0)", "b1:SIDE(0)"] {
            assert_eq!(
                bad.parse::<Port>(),
                Err(Error::malformed_specification(format!("Invalid port: {bad:?}")))
            );
        }
    }

    #[test]
    fn test_connection() {
        let conn = Connection::try_new(
            Port::outflow("c1_electricity_source", 0),
            Port::inflow("b1_electricity_bus", 1),
            "electricity",
        )
        .unwrap();
        assert_eq!(
            conn.to_triple(),
            [
                "c1_electricity_source:OUT(0)",
                "b1_electricity_bus:IN(1)",
                "electricity"
            ]
        );
        assert_eq!(
            conn.to_string(),
            "c1_electricity_source:OUT(0) -> b1_electricity_bus:IN(1) [electricity]"
        );
        assert_eq!(Connection::try_from_triple(&conn.to_triple()), Ok(conn));

        assert_eq!(
            Connection::try_new(Port::inflow("a", 0), Port::inflow("b", 0), "electricity"),
            Err(Error::invalid_connection(
                "Connection:(a:IN(0), b:IN(0)) must run from an OUT port to an IN port."
            ))
        );
    }

    #[test]
    fn test_connect_points() {
        let mut points = ConnectPoints::default();
        assert!(points
            .record_outbound("utility", "electricity", Port::outflow("src", 0))
            .is_ok());
        assert!(points
            .record_inbound("utility", "electricity", Port::inflow("bus", 0))
            .is_ok());
        assert_eq!(
            points.outbound("utility", "electricity"),
            Some(&Port::outflow("src", 0))
        );
        assert_eq!(points.inbound("utility", "natural_gas"), None);
        assert_eq!(
            points.record_outbound("utility", "electricity", Port::outflow("other", 0)),
            Err(Error::internal(
                "Location utility already has an outbound connect-point for electricity: \
                 src:OUT(0)."
            ))
        );
    }
}
