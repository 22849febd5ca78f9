// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for validating a [`TopologyGraph`].

mod invariant_checks;

use std::collections::HashSet;

use crate::{Error, TopologyGraph};

pub(crate) struct TopologyGraphValidator<'a> {
    tg: &'a TopologyGraph,
}

impl TopologyGraph {
    /// Checks that every connection uses existing ports carrying its flow,
    /// that no port is used twice, and that every muxer port is in use.
    pub(crate) fn validate(&self) -> Result<(), Error> {
        let validator = TopologyGraphValidator { tg: self };

        let mut used_ports = HashSet::new();
        for connection in self.connections() {
            validator.ensure_ports_exist(connection)?;
            validator.ensure_flow_matches(connection)?;
            for port in [connection.from(), connection.to()] {
                if !used_ports.insert(port) {
                    return Err(Error::invalid_connection(format!(
                        "{connection}: port {port} is already used by another connection."
                    )));
                }
            }
        }

        for muxer in self.components().filter(|c| c.is_muxer()) {
            validator.ensure_saturated(muxer)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Component, Connection, Error, Port, TopologyGraph};

    fn components() -> Vec<Component> {
        vec![
            Component::source("b1", "natural_gas").with_id("gas"),
            Component::converter("b1", "natural_gas", "heating", 0.9).with_id("boiler"),
            Component::load("b1", "heating").with_id("heat"),
            Component::load("b1", "heating").with_id("heat_1"),
            Component::muxer("b1", "heating", 1, 2).with_id("bus"),
        ]
    }

    fn connect(from: Port, to: Port, flow: &str) -> Result<Connection, Error> {
        Connection::try_new(from, to, flow)
    }

    fn wiring() -> Result<Vec<Connection>, Error> {
        Ok(vec![
            connect(Port::outflow("gas", 0), Port::inflow("boiler", 0), "natural_gas")?,
            connect(Port::outflow("boiler", 0), Port::inflow("bus", 0), "heating")?,
            connect(Port::outflow("bus", 0), Port::inflow("heat", 0), "heating")?,
            connect(Port::outflow("bus", 1), Port::inflow("heat_1", 0), "heating")?,
        ])
    }

    #[test]
    fn test_valid_graph() -> Result<(), Error> {
        // The boiler's lossflow port stays unconnected.
        assert!(TopologyGraph::try_new(components(), wiring()?).is_ok());
        Ok(())
    }

    #[test]
    fn test_port_range() -> Result<(), Error> {
        let mut connections = wiring()?;
        connections[3] = connect(Port::outflow("bus", 2), Port::inflow("heat_1", 0), "heating")?;

        assert_eq!(
            TopologyGraph::try_new(components(), connections).err(),
            Some(Error::invalid_connection(
                "bus:OUT(2) -> heat_1:IN(0) [heating]: bus has no port OUT(2), only 2 OUT ports."
            ))
        );
        Ok(())
    }

    #[test]
    fn test_flow_mismatch() -> Result<(), Error> {
        let mut connections = wiring()?;
        connections[0] = connect(Port::outflow("gas", 0), Port::inflow("boiler", 0), "heating")?;
        assert_eq!(
            TopologyGraph::try_new(components(), connections).err(),
            Some(Error::invalid_connection(
                "gas:OUT(0) -> boiler:IN(0) [heating]: port gas:OUT(0) carries natural_gas."
            ))
        );

        // Lossflow ports carry the lossflow only.
        let mut connections = wiring()?;
        connections[2] = connect(Port::outflow("boiler", 1), Port::inflow("heat", 0), "heating")?;
        connections[1] = connect(Port::outflow("bus", 0), Port::inflow("heat_1", 0), "heating")?;
        connections.pop();
        assert_eq!(
            TopologyGraph::try_new(components(), connections).err(),
            Some(Error::invalid_connection(
                "boiler:OUT(1) -> heat:IN(0) [heating]: port boiler:OUT(1) carries waste_heat."
            ))
        );
        Ok(())
    }

    #[test]
    fn test_port_reuse() -> Result<(), Error> {
        let mut connections = wiring()?;
        connections[3] = connect(Port::outflow("bus", 0), Port::inflow("heat_1", 0), "heating")?;

        assert_eq!(
            TopologyGraph::try_new(components(), connections).err(),
            Some(Error::invalid_connection(
                "bus:OUT(0) -> heat_1:IN(0) [heating]: port bus:OUT(0) is already used by \
                 another connection."
            ))
        );
        Ok(())
    }

    #[test]
    fn test_unsaturated_muxer() -> Result<(), Error> {
        let mut connections = wiring()?;
        connections.pop();

        assert_eq!(
            TopologyGraph::try_new(components(), connections).err(),
            Some(Error::invalid_connection(
                "Muxer bus has 1 of its 2 OUT ports connected."
            ))
        );
        Ok(())
    }
}
