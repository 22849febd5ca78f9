// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module defines the `ComponentKind` enum, which represents the kind of
//! a component, and the `Role` enum, which represents the part a component
//! plays for a flow at its location.

use std::fmt::Display;

/// Represents the kind of a component.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Source,
    Load,
    Converter,
    Store,
    Muxer,
    PassThrough,
}

impl Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComponentKind::Source => write!(f, "Source"),
            ComponentKind::Load => write!(f, "Load"),
            ComponentKind::Converter => write!(f, "Converter"),
            ComponentKind::Store => write!(f, "Store"),
            ComponentKind::Muxer => write!(f, "Muxer"),
            ComponentKind::PassThrough => write!(f, "PassThrough"),
        }
    }
}

/// The role a component plays for one flow at its location.
///
/// The variants are declared in port-assignment order: when several
/// endpoints share a bus, sources get the lowest ports, followed by
/// converters, stores, loads and internal loads.  Deriving `Ord` makes this
/// ordering available wherever roles are sorted or iterated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    /// A source producing the flow.
    Source,
    /// A converter producing the flow as its outflow.
    Converter,
    /// A store or pass-through that both absorbs and re-emits the flow.
    Store,
    /// An end-use load consuming the flow.
    Load,
    /// A converter consuming the flow as its inflow.
    InternalLoad,
}

impl Role {
    /// All roles, in port-assignment order.
    pub const ALL: [Role; 5] = [
        Role::Source,
        Role::Converter,
        Role::Store,
        Role::Load,
        Role::InternalLoad,
    ];

    /// Returns true if endpoints in this role feed the flow into a location.
    pub fn is_supply(&self) -> bool {
        matches!(self, Role::Source | Role::Converter)
    }

    /// Returns true if endpoints in this role draw the flow from a location.
    pub fn is_demand(&self) -> bool {
        matches!(self, Role::Load | Role::InternalLoad)
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Source => write!(f, "Source"),
            Role::Converter => write!(f, "Converter"),
            Role::Store => write!(f, "Store"),
            Role::Load => write!(f, "Load"),
            Role::InternalLoad => write!(f, "InternalLoad"),
        }
    }
}
