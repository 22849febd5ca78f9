// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Helper methods for checking invariants of a [`TopologyGraph`].

use crate::{Component, Connection, Direction, Error};

use super::TopologyGraphValidator;

impl TopologyGraphValidator<'_> {
    /// Checks that both ports of the given connection exist on their
    /// components.
    pub(super) fn ensure_ports_exist(&self, connection: &Connection) -> Result<(), Error> {
        for port in [connection.from(), connection.to()] {
            let component = self.tg.component(port.component_id())?;
            let num_ports = component.num_ports(port.direction());
            if port.index() >= num_ports {
                return Err(Error::invalid_connection(format!(
                    "{connection}: {} has no port {}({}), only {num_ports} {} ports.",
                    port.component_id(),
                    port.direction(),
                    port.index(),
                    port.direction()
                )));
            }
        }
        Ok(())
    }

    /// Checks that both ports of the given connection carry its flow.
    pub(super) fn ensure_flow_matches(&self, connection: &Connection) -> Result<(), Error> {
        for port in [connection.from(), connection.to()] {
            let component = self.tg.component(port.component_id())?;
            match component.port_flow(port.direction(), port.index()) {
                Some(flow) if flow == connection.flow() => {}
                Some(flow) => {
                    return Err(Error::invalid_connection(format!(
                        "{connection}: port {port} carries {flow}."
                    )))
                }
                None => {
                    return Err(Error::internal(format!(
                        "{connection}: port {port} was not checked for existence."
                    )))
                }
            }
        }
        Ok(())
    }

    /// Checks that every port of the given muxer is connected.
    ///
    /// Ports are known to be in range and used at most once, so counting the
    /// connections on either side is enough.
    pub(super) fn ensure_saturated(&self, muxer: &Component) -> Result<(), Error> {
        let id = muxer.assigned_id()?;
        for (direction, neighbors) in [
            (Direction::In, self.tg.predecessors(id)?),
            (Direction::Out, self.tg.successors(id)?),
        ] {
            let connected = neighbors.count();
            let num_ports = muxer.num_ports(direction);
            if connected != num_ports {
                return Err(Error::invalid_connection(format!(
                    "Muxer {id} has {connected} of its {num_ports} {direction} ports connected."
                )));
            }
        }
        Ok(())
    }
}
