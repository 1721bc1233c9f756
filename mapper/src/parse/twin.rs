use mapper_common::{
    dmi::{self, Device, TwinProperty},
    model::{Metadata, Twin, TwinValue},
};

const TIMESTAMP: &str = "timestamp";
const TYPE: &str = "type";

/// One twin per twin in the device status, in order.
pub fn build_twins(device: &Device) -> Vec<Twin> {
    device.twins().iter().map(build_twin).collect()
}

fn build_twin(twin: &dmi::Twin) -> Twin {
    Twin {
        property_name: twin.property_name.as_str().into(),
        desired: twin_value(&twin.desired),
        reported: twin_value(&twin.reported),
        visitor: None,
    }
}

fn twin_value(prop: &TwinProperty) -> TwinValue {
    TwinValue {
        value: prop.value.clone(),
        metadata: Metadata {
            timestamp: prop.meta(TIMESTAMP).to_owned(),
            ty: prop.meta(TYPE).to_owned(),
        },
    }
}
