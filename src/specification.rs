// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! The input and output of topology synthesis.
//!
//! [`SpecificationRecords`] is the serializable mapping from component-kind
//! keys to lists of attribute records, as produced by tabular loaders.
//! [`Specification`] is its typed form, which synthesis works on.

use serde::{Deserialize, Serialize};

use crate::{Attributes, Component, Connection, Error, NetworkLink, SynthesisConfig};

/// A record of the `source_component` table.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    /// The component id, assigned during synthesis if missing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// The location of the component.
    #[serde(default)]
    pub location: Option<String>,
    /// The flow the component produces.
    #[serde(default)]
    pub outflow: Option<String>,
    /// Whether the source has a maximum outflow.
    #[serde(default)]
    pub is_limited: bool,
    /// The maximum outflow of a limited source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_outflow: Option<f64>,
}

/// A record of the `load_component` table.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadRecord {
    /// The component id, assigned during synthesis if missing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// The location of the component.
    #[serde(default)]
    pub location: Option<String>,
    /// The flow the component consumes.
    #[serde(default)]
    pub inflow: Option<String>,
}

/// A record of the `converter_component` table.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConverterRecord {
    /// The component id, assigned during synthesis if missing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// The location of the component.
    #[serde(default)]
    pub location: Option<String>,
    /// The flow the component consumes.
    #[serde(default)]
    pub inflow: Option<String>,
    /// The flow the component produces.
    #[serde(default)]
    pub outflow: Option<String>,
    /// The flow the converter rejects. Defaults to the configured lossflow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lossflow: Option<String>,
    /// The conversion efficiency.
    #[serde(default)]
    pub efficiency: Option<f64>,
}

/// A record of the `storage_component` table.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreRecord {
    /// The component id, assigned during synthesis if missing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// The location of the component.
    #[serde(default)]
    pub location: Option<String>,
    /// The flow the component carries.
    #[serde(default)]
    pub flow: Option<String>,
    /// The storage capacity.
    #[serde(default)]
    pub capacity: Option<f64>,
    /// The maximum inflow of the store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_inflow: Option<f64>,
}

/// A record of the `muxer_component` table.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MuxerRecord {
    /// The component id, assigned during synthesis if missing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// The location of the component.
    #[serde(default)]
    pub location: Option<String>,
    /// The flow the component carries.
    #[serde(default)]
    pub flow: Option<String>,
    /// The number of inflow ports.
    #[serde(default)]
    pub num_inflows: Option<usize>,
    /// The number of outflow ports.
    #[serde(default)]
    pub num_outflows: Option<usize>,
}

/// A record of the `pass_through_component` table.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PassThroughRecord {
    /// The component id, assigned during synthesis if missing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// The location of the component.
    #[serde(default)]
    pub location: Option<String>,
    /// The flow the component carries.
    #[serde(default)]
    pub flow: Option<String>,
}

/// A record of the `network_link` table.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkLinkRecord {
    /// The location the link starts at.
    #[serde(default)]
    pub source_location: Option<String>,
    /// The location the link ends at.
    #[serde(default)]
    pub destination_location: Option<String>,
    /// The flow carried by the link.
    #[serde(default)]
    pub flow: Option<String>,
}

/// The serializable form of a specification.
///
/// Every attribute is optional at this level, so that a missing attribute
/// is reported as a [`MalformedSpecification`][crate::ErrorKind] error that
/// names the offending record, instead of as a deserialization failure.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SpecificationRecords {
    #[serde(default)]
    pub source_component: Vec<SourceRecord>,
    #[serde(default)]
    pub load_component: Vec<LoadRecord>,
    #[serde(default)]
    pub converter_component: Vec<ConverterRecord>,
    #[serde(default)]
    pub storage_component: Vec<StoreRecord>,
    #[serde(default)]
    pub muxer_component: Vec<MuxerRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pass_through_component: Vec<PassThroughRecord>,
    #[serde(default)]
    pub network_link: Vec<NetworkLinkRecord>,
    /// `[from, to, flow]` triples, e.g.
    /// `["utility_electricity_source:OUT(0)", "b1_electricity:IN(0)", "electricity"]`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub connection: Vec<[String; 3]>,
}

/// A set of components and the network links between their locations,
/// together with the connections between them once synthesized.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Specification {
    components: Vec<Component>,
    network_links: Vec<NetworkLink>,
    connections: Vec<Connection>,
}

impl Specification {
    /// Creates a new, unsynthesized specification.
    pub fn new(
        components: impl IntoIterator<Item = Component>,
        network_links: impl IntoIterator<Item = NetworkLink>,
    ) -> Self {
        Self {
            components: components.into_iter().collect(),
            network_links: network_links.into_iter().collect(),
            connections: vec![],
        }
    }

    pub(crate) fn from_parts(
        components: Vec<Component>,
        network_links: Vec<NetworkLink>,
        connections: Vec<Connection>,
    ) -> Self {
        Self {
            components,
            network_links,
            connections,
        }
    }

    pub(crate) fn into_parts(self) -> (Vec<Component>, Vec<NetworkLink>) {
        (self.components, self.network_links)
    }

    /// Returns the components, in declaration order, followed by any
    /// synthesized muxers.
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Returns the component with the given id, if it exists.
    pub fn component(&self, id: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.id() == Some(id))
    }

    /// Returns the network links, in declaration order.
    pub fn network_links(&self) -> &[NetworkLink] {
        &self.network_links
    }

    /// Returns the connections, in the order they were created.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Checks that all components and network links are usable.
    pub(crate) fn validate(&self) -> Result<(), Error> {
        for (index, component) in self.components.iter().enumerate() {
            let context = match component.id() {
                Some(id) => format!("{} {id}", component.kind()),
                None => format!("{} #{index} at {}", component.kind(), component.location()),
            };
            component.validate(&context)?;
        }
        for link in &self.network_links {
            link.validate()?;
        }
        Ok(())
    }

    /// Builds a specification from its records.
    ///
    /// Converters without a lossflow get the one from `config`.  Any
    /// `connection` triples are parsed too, so that an already synthesized
    /// specification can be read back.
    ///
    /// Returns an error if a required attribute is missing or empty.
    pub fn try_from_records(
        records: SpecificationRecords,
        config: &SynthesisConfig,
    ) -> Result<Self, Error> {
        let mut components = vec![];

        for (index, r) in records.source_component.into_iter().enumerate() {
            let ctx = format!("source_component[{index}]");
            let attributes = Attributes::Source {
                outflow: required(r.outflow, "outflow", &ctx)?,
                is_limited: r.is_limited,
                max_outflow: r.max_outflow,
            };
            components.push(component(r.id, r.location, attributes, &ctx)?);
        }
        for (index, r) in records.load_component.into_iter().enumerate() {
            let ctx = format!("load_component[{index}]");
            let attributes = Attributes::Load {
                inflow: required(r.inflow, "inflow", &ctx)?,
            };
            components.push(component(r.id, r.location, attributes, &ctx)?);
        }
        for (index, r) in records.converter_component.into_iter().enumerate() {
            let ctx = format!("converter_component[{index}]");
            let attributes = Attributes::Converter {
                inflow: required(r.inflow, "inflow", &ctx)?,
                outflow: required(r.outflow, "outflow", &ctx)?,
                lossflow: r.lossflow.unwrap_or_else(|| config.lossflow().to_string()),
                efficiency: required(r.efficiency, "efficiency", &ctx)?,
            };
            components.push(component(r.id, r.location, attributes, &ctx)?);
        }
        for (index, r) in records.storage_component.into_iter().enumerate() {
            let ctx = format!("storage_component[{index}]");
            let attributes = Attributes::Store {
                flow: required(r.flow, "flow", &ctx)?,
                capacity: required(r.capacity, "capacity", &ctx)?,
                max_inflow: r.max_inflow,
            };
            components.push(component(r.id, r.location, attributes, &ctx)?);
        }
        for (index, r) in records.muxer_component.into_iter().enumerate() {
            let ctx = format!("muxer_component[{index}]");
            let attributes = Attributes::Muxer {
                flow: required(r.flow, "flow", &ctx)?,
                num_inflows: required(r.num_inflows, "num_inflows", &ctx)?,
                num_outflows: required(r.num_outflows, "num_outflows", &ctx)?,
            };
            components.push(component(r.id, r.location, attributes, &ctx)?);
        }
        for (index, r) in records.pass_through_component.into_iter().enumerate() {
            let ctx = format!("pass_through_component[{index}]");
            let attributes = Attributes::PassThrough {
                flow: required(r.flow, "flow", &ctx)?,
            };
            components.push(component(r.id, r.location, attributes, &ctx)?);
        }

        let mut network_links = vec![];
        for (index, r) in records.network_link.into_iter().enumerate() {
            let ctx = format!("network_link[{index}]");
            network_links.push(NetworkLink::new(
                required(r.source_location, "source_location", &ctx)?,
                required(r.destination_location, "destination_location", &ctx)?,
                required(r.flow, "flow", &ctx)?,
            ));
        }

        let connections = records
            .connection
            .iter()
            .map(Connection::try_from_triple)
            .collect::<Result<Vec<_>, _>>()?;

        let spec = Self::from_parts(components, network_links, connections);
        spec.validate()?;
        Ok(spec)
    }

    /// Converts the specification back into its records.
    ///
    /// Components of each kind keep their relative order, so synthesized
    /// muxers come after the declared ones.
    pub fn into_records(self) -> SpecificationRecords {
        let mut records = SpecificationRecords {
            connection: self.connections.iter().map(Connection::to_triple).collect(),
            ..Default::default()
        };

        for component in self.components {
            let id = component.id().map(str::to_string);
            let location = Some(component.location().to_string());
            match component.attributes().clone() {
                Attributes::Source {
                    outflow,
                    is_limited,
                    max_outflow,
                } => records.source_component.push(SourceRecord {
                    id,
                    location,
                    outflow: Some(outflow),
                    is_limited,
                    max_outflow,
                }),
                Attributes::Load { inflow } => records.load_component.push(LoadRecord {
                    id,
                    location,
                    inflow: Some(inflow),
                }),
                Attributes::Converter {
                    inflow,
                    outflow,
                    lossflow,
                    efficiency,
                } => records.converter_component.push(ConverterRecord {
                    id,
                    location,
                    inflow: Some(inflow),
                    outflow: Some(outflow),
                    lossflow: Some(lossflow),
                    efficiency: Some(efficiency),
                }),
                Attributes::Store {
                    flow,
                    capacity,
                    max_inflow,
                } => records.storage_component.push(StoreRecord {
                    id,
                    location,
                    flow: Some(flow),
                    capacity: Some(capacity),
                    max_inflow,
                }),
                Attributes::Muxer {
                    flow,
                    num_inflows,
                    num_outflows,
                } => records.muxer_component.push(MuxerRecord {
                    id,
                    location,
                    flow: Some(flow),
                    num_inflows: Some(num_inflows),
                    num_outflows: Some(num_outflows),
                }),
                Attributes::PassThrough { flow } => {
                    records.pass_through_component.push(PassThroughRecord {
                        id,
                        location,
                        flow: Some(flow),
                    })
                }
            }
        }

        records.network_link = self
            .network_links
            .into_iter()
            .map(|link| NetworkLinkRecord {
                source_location: Some(link.source_location().to_string()),
                destination_location: Some(link.destination_location().to_string()),
                flow: Some(link.flow().to_string()),
            })
            .collect();

        records
    }
}

fn required<T>(value: Option<T>, field: &str, context: &str) -> Result<T, Error> {
    value.ok_or_else(|| {
        Error::malformed_specification(format!(
            "{context}: missing required attribute `{field}`."
        ))
    })
}

fn component(
    id: Option<String>,
    location: Option<String>,
    attributes: Attributes,
    context: &str,
) -> Result<Component, Error> {
    let component = Component::new(required(location, "location", context)?, attributes);
    Ok(match id {
        Some(id) => component.with_id(id),
        None => component,
    })
}
