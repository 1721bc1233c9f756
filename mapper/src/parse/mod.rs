//! Descriptor to [`DeviceInstance`] translation.
//!
//! [`parse_device`] ties the builders together and joins their output by
//! property name: visitors get a copy of the schema property they target,
//! twins and data properties get a copy of the visitor for their property.

use std::collections::HashMap;

use compact_str::CompactString;
use mapper_common::{
    DeviceId,
    dmi::Device,
    model::{DeviceInstance, DeviceModel, Property, PropertyVisitor},
};

use crate::Result;

pub mod data;
pub mod model;
pub mod protocol;
pub mod twin;
pub mod visitor;

pub use self::{
    data::build_data_properties,
    model::parse_device_model,
    protocol::{ProtocolVariant, build_protocol, resolve},
    twin::build_twins,
    visitor::build_property_visitors,
};

/// Assembles the instance for `device`.
///
/// Without a `model` the instance carries no cross references at all, since
/// visitors are only indexed once they matched a schema property.
pub fn parse_device(device: &Device, model: Option<&DeviceModel>) -> Result<DeviceInstance> {
    let _span = tracing::debug_span!("parse_device", device = %device.name).entered();

    let protocol = resolve(device)?;

    let mut instance = DeviceInstance {
        id: DeviceId::from(&device.name),
        name: device.name.as_str().into(),
        protocol_name: protocol.kind().instance_name(&device.name),
        model: device.spec.device_model_reference.as_str().into(),
        twins: build_twins(device),
        data_properties: build_data_properties(device),
        property_visitors: visitor::build_with_protocol(device, protocol)?,
    };

    let index = match model {
        Some(model) => attach_properties(&mut instance.property_visitors, model),
        None => HashMap::new(),
    };

    let visitor_for = |property_name: &str| {
        index
            .get(property_name)
            .map(|&i| Box::new(instance.property_visitors[i].clone()))
    };

    for twin in &mut instance.twins {
        twin.visitor = visitor_for(twin.property_name.as_str());
        if twin.visitor.is_none() {
            tracing::debug!(property = %twin.property_name, "twin has no visitor");
        }
    }

    for data in &mut instance.data_properties {
        data.visitor = visitor_for(data.property_name.as_str());
    }

    Ok(instance)
}

/// Copies the matching schema property into each visitor and returns the
/// visitors that matched, indexed by property name.
///
/// When several visitors target the same property the last one is indexed.
fn attach_properties(
    visitors: &mut [PropertyVisitor],
    model: &DeviceModel,
) -> HashMap<CompactString, usize> {
    tracing::debug!(model = %model.name, properties = model.properties.len(), "attaching schema");

    let mut schema = HashMap::<&str, &Property>::new();
    for property in &model.properties {
        schema.entry(property.name.as_str()).or_insert(property);
    }

    let mut index = HashMap::new();

    for (i, visitor) in visitors.iter_mut().enumerate() {
        let Some(&property) = schema.get(visitor.property_name.as_str()) else {
            tracing::debug!(property = %visitor.property_name, "visitor matches no schema property");
            continue;
        };

        tracing::debug!(property = %property.name, "visitor matched schema property");
        visitor.property = property.clone();

        if index.insert(property.name.clone(), i).is_some() {
            tracing::warn!(
                property = %property.name,
                "more than one visitor for property, the last one is used",
            );
        }
    }

    index
}
