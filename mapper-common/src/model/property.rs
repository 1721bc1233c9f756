use core::fmt::Display;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Primitive type of a model property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    String,
    Bytes,
    Boolean,
    Int,
    Double,
    Float,
}

impl DataType {
    pub const fn as_str(self) -> &'static str {
        match self {
            DataType::String => "string",
            DataType::Bytes => "bytes",
            DataType::Boolean => "boolean",
            DataType::Int => "int",
            DataType::Double => "double",
            DataType::Float => "float",
        }
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a device model's schema.
///
/// `minimum`/`maximum`/`unit` are only filled in for numeric types. Bounds of
/// `double` and `float` properties are truncated to integers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Property {
    pub name: CompactString,
    pub description: String,
    /// `None` when the model gave no type descriptor; written as `""`
    #[serde(with = "data_type_text")]
    pub data_type: Option<DataType>,
    pub access_mode: CompactString,
    pub default_value: String,
    pub minimum: i64,
    pub maximum: i64,
    pub unit: CompactString,
}

/// A device model's schema, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceModel {
    pub name: CompactString,
    pub properties: Vec<Property>,
}

impl DeviceModel {
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }
}

mod data_type_text {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::DataType;

    pub fn serialize<S: Serializer>(ty: &Option<DataType>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(ty.map_or("", DataType::as_str))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<DataType>, D::Error> {
        let text = String::deserialize(d)?;
        if text.is_empty() {
            return Ok(None);
        }

        DataType::deserialize(serde::de::value::StrDeserializer::<D::Error>::new(&text)).map(Some)
    }
}
