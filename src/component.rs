// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module defines the `Component` struct and its kind-specific
//! `Attributes`.

use crate::config::DEFAULT_LOSSFLOW;
use crate::connection::Direction;
use crate::{ComponentKind, Error, Role};

/// The kind-specific attributes of a component.
#[derive(Clone, Debug, PartialEq)]
pub enum Attributes {
    Source {
        outflow: String,
        is_limited: bool,
        max_outflow: Option<f64>,
    },
    Load {
        inflow: String,
    },
    Converter {
        inflow: String,
        outflow: String,
        lossflow: String,
        efficiency: f64,
    },
    Store {
        flow: String,
        capacity: f64,
        max_inflow: Option<f64>,
    },
    Muxer {
        flow: String,
        num_inflows: usize,
        num_outflows: usize,
    },
    PassThrough {
        flow: String,
    },
}

/// A component of an energy system, placed at a location.
///
/// Components without an id get one assigned during synthesis.
#[derive(Clone, Debug, PartialEq)]
pub struct Component {
    id: Option<String>,
    location: String,
    attributes: Attributes,
}

impl Component {
    /// Creates a new component without an id.
    pub fn new(location: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            id: None,
            location: location.into(),
            attributes,
        }
    }

    /// Creates an unlimited source of `outflow` at `location`.
    pub fn source(location: impl Into<String>, outflow: impl Into<String>) -> Self {
        Self::new(
            location,
            Attributes::Source {
                outflow: outflow.into(),
                is_limited: false,
                max_outflow: None,
            },
        )
    }

    /// Creates a load consuming `inflow` at `location`.
    pub fn load(location: impl Into<String>, inflow: impl Into<String>) -> Self {
        Self::new(
            location,
            Attributes::Load {
                inflow: inflow.into(),
            },
        )
    }

    /// Creates a converter from `inflow` to `outflow` at `location`, with the
    /// default lossflow.
    pub fn converter(
        location: impl Into<String>,
        inflow: impl Into<String>,
        outflow: impl Into<String>,
        efficiency: f64,
    ) -> Self {
        Self::new(
            location,
            Attributes::Converter {
                inflow: inflow.into(),
                outflow: outflow.into(),
                lossflow: DEFAULT_LOSSFLOW.to_string(),
                efficiency,
            },
        )
    }

    /// Creates a store of `flow` at `location`.
    pub fn store(location: impl Into<String>, flow: impl Into<String>, capacity: f64) -> Self {
        Self::new(
            location,
            Attributes::Store {
                flow: flow.into(),
                capacity,
                max_inflow: None,
            },
        )
    }

    /// Creates a muxer of `flow` at `location`.
    pub fn muxer(
        location: impl Into<String>,
        flow: impl Into<String>,
        num_inflows: usize,
        num_outflows: usize,
    ) -> Self {
        Self::new(
            location,
            Attributes::Muxer {
                flow: flow.into(),
                num_inflows,
                num_outflows,
            },
        )
    }

    /// Creates a pass-through of `flow` at `location`.
    pub fn pass_through(location: impl Into<String>, flow: impl Into<String>) -> Self {
        Self::new(location, Attributes::PassThrough { flow: flow.into() })
    }

    /// Returns the component with the given id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Returns the id of the component, if one has been declared or assigned.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub(crate) fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }

    /// Returns the id of a component that must have one by now.
    pub(crate) fn assigned_id(&self) -> Result<&str, Error> {
        self.id().ok_or_else(|| {
            Error::internal(format!(
                "{} at location {} has no id.",
                self.kind(),
                self.location
            ))
        })
    }

    /// Returns the location of the component.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Returns the kind-specific attributes of the component.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Returns the flows the component exchanges with its location.
    ///
    /// A converter's lossflow is not included: it leaves the system and is
    /// never wired.
    pub fn flows(&self) -> Vec<&str> {
        match &self.attributes {
            Attributes::Source { outflow, .. } => vec![outflow.as_str()],
            Attributes::Load { inflow } => vec![inflow.as_str()],
            Attributes::Converter {
                inflow, outflow, ..
            } => vec![inflow.as_str(), outflow.as_str()],
            Attributes::Store { flow, .. }
            | Attributes::Muxer { flow, .. }
            | Attributes::PassThrough { flow } => vec![flow.as_str()],
        }
    }

    /// Returns true if the component plays `role` for `flow`.
    ///
    /// Muxers don't play any role: they only ever relay between endpoints.
    pub fn has_role(&self, flow: &str, role: Role) -> bool {
        match (&self.attributes, role) {
            (Attributes::Source { outflow, .. }, Role::Source) => outflow == flow,
            (Attributes::Converter { outflow, .. }, Role::Converter) => outflow == flow,
            (Attributes::Converter { inflow, .. }, Role::InternalLoad) => inflow == flow,
            (Attributes::Store { flow: f, .. }, Role::Store)
            | (Attributes::PassThrough { flow: f }, Role::Store) => f == flow,
            (Attributes::Load { inflow }, Role::Load) => inflow == flow,
            _ => false,
        }
    }

    /// Returns the number of ports the component has in the given direction.
    pub fn num_ports(&self, direction: Direction) -> usize {
        match (&self.attributes, direction) {
            (Attributes::Source { .. }, Direction::In) => 0,
            (Attributes::Load { .. }, Direction::Out) => 0,
            (Attributes::Converter { .. }, Direction::Out) => 2,
            (Attributes::Muxer { num_inflows, .. }, Direction::In) => *num_inflows,
            (Attributes::Muxer { num_outflows, .. }, Direction::Out) => *num_outflows,
            _ => 1,
        }
    }

    /// Returns the flow carried by the given port, or `None` if the
    /// component has no such port.
    pub fn port_flow(&self, direction: Direction, index: usize) -> Option<&str> {
        if index >= self.num_ports(direction) {
            return None;
        }
        let flow = match (&self.attributes, direction) {
            (Attributes::Load { inflow }, _) => inflow,
            (Attributes::Source { outflow, .. }, _) => outflow,
            (Attributes::Converter { inflow, .. }, Direction::In) => inflow,
            (Attributes::Converter { outflow, .. }, Direction::Out) if index == 0 => outflow,
            (Attributes::Converter { lossflow, .. }, Direction::Out) => lossflow,
            (Attributes::Store { flow, .. }, _)
            | (Attributes::Muxer { flow, .. }, _)
            | (Attributes::PassThrough { flow }, _) => flow,
        };
        Some(flow.as_str())
    }

    /// Returns the id the component is given when it doesn't declare one,
    /// before any collision suffix is appended.
    pub(crate) fn base_id(&self) -> String {
        let location = &self.location;
        match &self.attributes {
            Attributes::Source { outflow, .. } => format!("{location}_{outflow}_source"),
            Attributes::Load { inflow } => format!("{location}_{inflow}"),
            Attributes::Converter { outflow, .. } => format!("{location}_{outflow}_generator"),
            Attributes::Store { flow, .. } => format!("{location}_{flow}_store"),
            Attributes::Muxer { flow, .. } => format!("{location}_{flow}_bus"),
            Attributes::PassThrough { flow } => format!("{location}_{flow}_pass_through"),
        }
    }

    /// Checks that the attributes of the component are usable.
    ///
    /// `context` names the component in error messages.
    pub(crate) fn validate(&self, context: &str) -> Result<(), Error> {
        if let Some(id) = &self.id {
            ensure_not_empty(id, "id", context)?;
        }
        ensure_not_empty(&self.location, "location", context)?;
        for flow in self.flows() {
            ensure_not_empty(flow, "flow", context)?;
        }
        match &self.attributes {
            Attributes::Source {
                is_limited: true,
                max_outflow: None,
                ..
            } => Err(Error::malformed_specification(format!(
                "{context}: a limited source needs a `max_outflow`."
            ))),
            Attributes::Converter { lossflow, .. } => ensure_not_empty(lossflow, "lossflow", context),
            Attributes::Muxer {
                num_inflows,
                num_outflows,
                ..
            } if *num_inflows == 0 || *num_outflows == 0 => {
                Err(Error::malformed_specification(format!(
                    "{context}: a muxer needs at least one inflow and one outflow port, \
                     found {num_inflows} in / {num_outflows} out."
                )))
            }
            _ => Ok(()),
        }
    }
}

impl Component {
    /// Returns the kind of the component.
    pub fn kind(&self) -> ComponentKind {
        match self.attributes {
            Attributes::Source { .. } => ComponentKind::Source,
            Attributes::Load { .. } => ComponentKind::Load,
            Attributes::Converter { .. } => ComponentKind::Converter,
            Attributes::Store { .. } => ComponentKind::Store,
            Attributes::Muxer { .. } => ComponentKind::Muxer,
            Attributes::PassThrough { .. } => ComponentKind::PassThrough,
        }
    }

    /// Returns true if the component is a muxer.
    pub fn is_muxer(&self) -> bool {
        self.kind() == ComponentKind::Muxer
    }
}

fn ensure_not_empty(value: &str, field: &str, context: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        return Err(Error::malformed_specification(format!(
            "{context}: attribute `{field}` is empty."
        )));
    }
    Ok(())
}
