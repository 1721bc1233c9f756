use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceModel {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spec: Option<DeviceModelSpec>,
}

impl DeviceModel {
    pub fn properties(&self) -> &[ModelProperty] {
        self.spec.as_ref().map(|spec| spec.properties.as_slice()).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceModelSpec {
    pub properties: Vec<ModelProperty>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelProperty {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub ty: PropertyType,
}

/// Type descriptor of a model property. Exactly one field is expected to be
/// set; an all-empty descriptor is accepted and means "untyped".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyType {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub string: Option<StringType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<BytesType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boolean: Option<BooleanType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub int: Option<IntType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub double: Option<DoubleType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub float: Option<FloatType>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StringType {
    pub access_mode: String,
    pub default_value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BytesType {
    pub access_mode: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BooleanType {
    pub access_mode: String,
    pub default_value: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IntType {
    pub access_mode: String,
    pub default_value: i64,
    pub minimum: i64,
    pub maximum: i64,
    pub unit: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DoubleType {
    pub access_mode: String,
    pub default_value: f64,
    pub minimum: f64,
    pub maximum: f64,
    pub unit: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FloatType {
    pub access_mode: String,
    pub default_value: f32,
    pub minimum: f32,
    pub maximum: f32,
    pub unit: String,
}
