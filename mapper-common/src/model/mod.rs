//! Protocol-agnostic device representation handed to drivers and to twin
//! reporting.
//!
//! Cross references ([`PropertyVisitor::property`], [`Twin::visitor`],
//! [`DataProperty::visitor`]) are copies taken when the instance is
//! assembled. Changing a visitor afterwards does not affect the twins and
//! data properties that already carry one.

use core::{fmt::Display, str::FromStr};

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::{ConfigBlob, DeviceId};

mod property;
pub use property::*;

/// Protocol kinds, in the order they take precedence when a device names
/// more than one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProtocolKind {
    Modbus,
    Opcua,
    Bluetooth,
    CustomizedProtocol,
}

impl ProtocolKind {
    pub const ALL: [ProtocolKind; 4] = [
        ProtocolKind::Modbus,
        ProtocolKind::Opcua,
        ProtocolKind::Bluetooth,
        ProtocolKind::CustomizedProtocol,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            ProtocolKind::Modbus => "modbus",
            ProtocolKind::Opcua => "opcua",
            ProtocolKind::Bluetooth => "bluetooth",
            ProtocolKind::CustomizedProtocol => "customized-protocol",
        }
    }

    /// Composite protocol name of a device, eg. `modbus-dev1`.
    pub fn instance_name(self, device: &str) -> CompactString {
        let mut name = CompactString::const_new(self.as_str());
        name.push('-');
        name.push_str(device);
        name
    }
}

impl Display for ProtocolKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProtocolKind {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProtocolKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or("unknown protocol kind")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Protocol {
    /// `<kind>-<device name>`
    pub name: CompactString,
    pub protocol: ProtocolKind,
    pub protocol_configs: ConfigBlob,
    pub protocol_common_config: ConfigBlob,
}

/// How to read or write one property of a device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyVisitor {
    pub name: CompactString,
    pub property_name: CompactString,
    pub model_name: CompactString,
    /// Milliseconds
    pub collect_cycle: i64,
    /// Milliseconds
    pub report_cycle: i64,
    pub protocol: ProtocolKind,
    pub visitor_config: ConfigBlob,
    /// Copy of the matching schema entry; default if nothing matched
    #[serde(default)]
    pub property: Property,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    pub timestamp: String,
    #[serde(rename = "type")]
    pub ty: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TwinValue {
    pub value: String,
    pub metadata: Metadata,
}

/// Desired/reported state of one property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Twin {
    pub property_name: CompactString,
    pub desired: TwinValue,
    pub reported: TwinValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visitor: Option<Box<PropertyVisitor>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataMetadata {
    /// Unix timestamp; zero when the source value was missing or malformed
    pub timestamp: i64,
    #[serde(rename = "type")]
    pub ty: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataProperty {
    pub property_name: CompactString,
    pub metadata: DataMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visitor: Option<Box<PropertyVisitor>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInstance {
    pub id: DeviceId,
    pub name: CompactString,
    /// Same as [`Protocol::name`]
    pub protocol_name: CompactString,
    /// Name of the device model this instance refers to
    pub model: CompactString,
    pub twins: Vec<Twin>,
    pub data_properties: Vec<DataProperty>,
    pub property_visitors: Vec<PropertyVisitor>,
}

impl DeviceInstance {
    pub fn twin(&self, property_name: &str) -> Option<&Twin> {
        self.twins.iter().find(|t| t.property_name == property_name)
    }

    pub fn data_property(&self, property_name: &str) -> Option<&DataProperty> {
        self.data_properties
            .iter()
            .find(|d| d.property_name == property_name)
    }
}
