use mapper_common::{
    dmi::{self, PropertyType},
    model::{DataType, DeviceModel, Property},
};

/// Converts a model descriptor into its schema.
///
/// Never fails: a model without a spec has no properties, and a property
/// without a type descriptor is kept with no data type.
pub fn parse_device_model(model: &dmi::DeviceModel) -> DeviceModel {
    DeviceModel {
        name: model.name.as_str().into(),
        properties: model.properties().iter().map(parse_property).collect(),
    }
}

fn parse_property(property: &dmi::ModelProperty) -> Property {
    let mut out = Property {
        name: property.name.as_str().into(),
        description: property.description.clone(),
        ..Default::default()
    };

    apply_type(&mut out, &property.ty);

    out
}

// Descriptors are checked in a fixed order, the first one set wins.
fn apply_type(p: &mut Property, ty: &PropertyType) {
    if let Some(t) = &ty.string {
        p.data_type = Some(DataType::String);
        p.access_mode = t.access_mode.as_str().into();
        p.default_value = t.default_value.clone();
    } else if let Some(t) = &ty.bytes {
        p.data_type = Some(DataType::Bytes);
        p.access_mode = t.access_mode.as_str().into();
    } else if let Some(t) = &ty.boolean {
        p.data_type = Some(DataType::Boolean);
        p.access_mode = t.access_mode.as_str().into();
        p.default_value = t.default_value.to_string();
    } else if let Some(t) = &ty.int {
        p.data_type = Some(DataType::Int);
        p.access_mode = t.access_mode.as_str().into();
        p.default_value = t.default_value.to_string();
        p.minimum = t.minimum;
        p.maximum = t.maximum;
        p.unit = t.unit.as_str().into();
    } else if let Some(t) = &ty.double {
        p.data_type = Some(DataType::Double);
        p.access_mode = t.access_mode.as_str().into();
        p.default_value = t.default_value.to_string();
        p.minimum = t.minimum as i64;
        p.maximum = t.maximum as i64;
        p.unit = t.unit.as_str().into();
    } else if let Some(t) = &ty.float {
        p.data_type = Some(DataType::Float);
        p.access_mode = t.access_mode.as_str().into();
        p.default_value = t.default_value.to_string();
        p.minimum = t.minimum as i64;
        p.maximum = t.maximum as i64;
        p.unit = t.unit.as_str().into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(properties: serde_json::Value) -> dmi::DeviceModel {
        serde_json::from_value(serde_json::json!({
            "name": "thermostat",
            "spec": { "properties": properties },
        }))
        .unwrap()
    }

    #[test]
    fn int_property() {
        let schema = parse_device_model(&model(serde_json::json!([{
            "name": "temp",
            "description": "room temperature",
            "type": {
                "int": {
                    "accessMode": "ReadWrite",
                    "defaultValue": 20,
                    "minimum": 0,
                    "maximum": 100,
                    "unit": "°C",
                },
            },
        }])));

        assert_eq!(schema.name, "thermostat");
        assert_eq!(schema.properties, vec![Property {
            name: "temp".into(),
            description: "room temperature".into(),
            data_type: Some(DataType::Int),
            access_mode: "ReadWrite".into(),
            default_value: "20".into(),
            minimum: 0,
            maximum: 100,
            unit: "°C".into(),
        }]);
        assert_eq!(schema.properties[0].data_type.unwrap().as_str(), "int");
    }

    #[test]
    fn defaults_rendered_as_text() {
        let schema = parse_device_model(&model(serde_json::json!([
            { "name": "label", "type": { "string": { "accessMode": "ReadOnly", "defaultValue": "idle" } } },
            { "name": "on", "type": { "boolean": { "accessMode": "ReadWrite", "defaultValue": true } } },
            { "name": "ratio", "type": { "float": { "defaultValue": 0.5 } } },
            { "name": "blob", "type": { "bytes": { "accessMode": "ReadOnly" } } },
        ])));

        let defaults = schema
            .properties
            .iter()
            .map(|p| (p.name.as_str(), p.default_value.as_str()))
            .collect::<Vec<_>>();

        assert_eq!(defaults, [("label", "idle"), ("on", "true"), ("ratio", "0.5"), ("blob", "")]);
        assert_eq!(schema.property("blob").unwrap().data_type, Some(DataType::Bytes));
        assert_eq!(schema.property("blob").unwrap().access_mode, "ReadOnly");
    }

    #[test]
    fn fractional_bounds_are_truncated() {
        let schema = parse_device_model(&model(serde_json::json!([{
            "name": "pressure",
            "type": { "double": { "minimum": -1.9, "maximum": 99.99, "unit": "bar" } },
        }])));

        let p = &schema.properties[0];
        assert_eq!(p.data_type, Some(DataType::Double));
        assert_eq!((p.minimum, p.maximum), (-1, 99));
        assert_eq!(p.unit, "bar");
    }

    #[test]
    fn untyped_property_is_kept() {
        let schema = parse_device_model(&model(serde_json::json!([
            { "name": "mystery", "description": "no type" },
        ])));

        assert_eq!(schema.properties.len(), 1);
        assert_eq!(schema.properties[0].name, "mystery");
        assert_eq!(schema.properties[0].data_type, None);
        assert_eq!(schema.properties[0].access_mode, "");
    }

    #[test]
    fn string_descriptor_takes_precedence() {
        let schema = parse_device_model(&model(serde_json::json!([{
            "name": "both",
            "type": {
                "int": { "maximum": 10 },
                "string": { "defaultValue": "x" },
            },
        }])));

        assert_eq!(schema.properties[0].data_type, Some(DataType::String));
        assert_eq!(schema.properties[0].maximum, 0);
    }

    #[test]
    fn empty_model() {
        let schema = parse_device_model(&dmi::DeviceModel {
            name: "empty".into(),
            spec: None,
        });
        assert_eq!(schema.name, "empty");
        assert!(schema.properties.is_empty());

        assert!(parse_device_model(&model(serde_json::json!([])))
            .properties
            .is_empty());
    }
}
