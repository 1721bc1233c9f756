use std::borrow::Cow;

use mapper_common::{
    dmi::{Device, DevicePropertyVisitor},
    model::{DataMetadata, DataProperty},
};

/// Data properties of a device.
///
/// Only visitors carrying a customized data mapping produce one; the rest are
/// skipped.
pub fn build_data_properties(device: &Device) -> Vec<DataProperty> {
    device
        .spec
        .property_visitors
        .iter()
        .filter_map(build_data_property)
        .collect()
}

fn build_data_property(visitor: &DevicePropertyVisitor) -> Option<DataProperty> {
    let data = visitor.data()?;

    let timestamp = data.get("timestamp").map(text).map_or(0, |text| {
        text.parse::<i64>().unwrap_or_else(|e| {
            tracing::debug!(property = %visitor.property_name, %text, "bad data timestamp: {e}");
            0
        })
    });

    let ty = data.get("type").map(text).unwrap_or_default();

    Some(DataProperty {
        property_name: visitor.property_name.as_str().into(),
        metadata: DataMetadata { timestamp, ty: ty.into_owned() },
        visitor: None,
    })
}

// Customized values are free-form; strings are taken as-is, other scalars in
// their JSON rendering.
fn text(value: &serde_json::Value) -> Cow<'_, str> {
    match value {
        serde_json::Value::String(s) => Cow::Borrowed(s.as_str()),
        serde_json::Value::Null => Cow::Borrowed(""),
        other => Cow::Owned(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(visitors: serde_json::Value) -> Device {
        serde_json::from_value(serde_json::json!({
            "name": "dev1",
            "spec": { "propertyVisitors": visitors },
        }))
        .unwrap()
    }

    #[test]
    fn only_visitors_with_data() {
        let device = device(serde_json::json!([
            { "propertyName": "temp", "customizedValues": { "data": { "timestamp": "1712345678", "type": "int" } } },
            { "propertyName": "humidity" },
            { "propertyName": "on", "customizedValues": {} },
            { "propertyName": "mode", "customizedValues": { "data": {} } },
        ]));

        let data = build_data_properties(&device);

        let with_data = device
            .spec
            .property_visitors
            .iter()
            .filter(|v| v.data().is_some())
            .count();
        assert_eq!(data.len(), with_data);

        assert_eq!(data, vec![
            DataProperty {
                property_name: "temp".into(),
                metadata: DataMetadata { timestamp: 1712345678, ty: "int".into() },
                visitor: None,
            },
            DataProperty {
                property_name: "mode".into(),
                metadata: DataMetadata::default(),
                visitor: None,
            },
        ]);
    }

    #[test]
    fn malformed_timestamp_is_zero() {
        let device = device(serde_json::json!([
            { "propertyName": "a", "customizedValues": { "data": { "timestamp": "yesterday" } } },
            { "propertyName": "b", "customizedValues": { "data": { "timestamp": 1712345678 } } },
            { "propertyName": "c", "customizedValues": { "data": { "timestamp": null, "type": 3 } } },
            { "propertyName": "d", "customizedValues": { "data": { "timestamp": " 17 " } } },
        ]));

        let data = build_data_properties(&device);

        let timestamps = data.iter().map(|d| d.metadata.timestamp).collect::<Vec<_>>();
        assert_eq!(timestamps, [0, 1712345678, 0, 0]);
        assert_eq!(data[2].metadata.ty, "3");
    }

    #[test]
    fn no_visitors() {
        assert!(build_data_properties(&Device::default()).is_empty());
    }
}
