use mapper_common::{
    dmi::{Device, DevicePropertyVisitor},
    model::{Property, PropertyVisitor},
};

use super::protocol::{self, ProtocolVariant};
use crate::Result;

/// Property visitors of a device, with their protocol block serialized.
///
/// All or nothing: if the protocol can't be resolved or any visitor fails to
/// serialize, no visitors are returned.
pub fn build_property_visitors(device: &Device) -> Result<Vec<PropertyVisitor>> {
    let visitors = &device.spec.property_visitors;
    if visitors.is_empty() {
        return Ok(Vec::new());
    }

    build_with_protocol(device, protocol::resolve(device)?)
}

/// Same as [`build_property_visitors`], for a device whose protocol is
/// already resolved.
pub(crate) fn build_with_protocol(
    device: &Device,
    variant: ProtocolVariant<'_>,
) -> Result<Vec<PropertyVisitor>> {
    device
        .spec
        .property_visitors
        .iter()
        .map(|visitor| build_property_visitor(device, variant, visitor))
        .collect()
}

fn build_property_visitor(
    device: &Device,
    variant: ProtocolVariant<'_>,
    visitor: &DevicePropertyVisitor,
) -> Result<PropertyVisitor> {
    Ok(PropertyVisitor {
        name: visitor.property_name.as_str().into(),
        property_name: visitor.property_name.as_str().into(),
        model_name: device.spec.device_model_reference.as_str().into(),
        collect_cycle: visitor.collect_cycle,
        report_cycle: visitor.report_cycle,
        protocol: variant.kind(),
        visitor_config: variant.visitor_config(visitor)?,
        property: Property::default(),
    })
}
