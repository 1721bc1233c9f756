//! Device management interface descriptors, as sent by the management plane.
//!
//! These mirror the wire format one to one; nothing is validated on the way
//! in. `mapper::parse` turns them into [`crate::model`] types.
//!
//! # Example Device
//!
//! ```json
//! {
//!   "name": "dev1",
//!   "spec": {
//!     "deviceModelReference": "thermostat",
//!     "protocol": { "modbus": { "slaveID": 1 } },
//!     "propertyVisitors": [
//!       { "propertyName": "temp", "collectCycle": 1000, "modbus": { "register": "HoldingRegister" } }
//!     ]
//!   },
//!   "status": {
//!     "twins": [ { "propertyName": "temp", "desired": { "value": "20" } } ]
//!   }
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

mod model;
mod protocol;
pub use model::*;
pub use protocol::*;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Device {
    pub name: String,
    pub spec: DeviceSpec,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DeviceStatus>,
}

impl Device {
    pub fn twins(&self) -> &[Twin] {
        self.status.as_ref().map(|status| status.twins.as_slice()).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeviceSpec {
    pub device_model_reference: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<ProtocolConfig>,
    pub property_visitors: Vec<DevicePropertyVisitor>,
}

/// How to reach one property of the device.
///
/// Like [`ProtocolConfig`], the four protocol blocks are mutually exclusive;
/// the one that matters is picked by the device's protocol, not by which one
/// happens to be set here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DevicePropertyVisitor {
    pub property_name: String,
    /// Milliseconds between reports to the management plane
    pub report_cycle: i64,
    /// Milliseconds between reads from the device
    pub collect_cycle: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customized_values: Option<CustomizedValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modbus: Option<ModbusVisitor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opcua: Option<OpcuaVisitor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bluetooth: Option<BluetoothVisitor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customized_protocol: Option<CustomizedVisitor>,
}

impl DevicePropertyVisitor {
    /// The visitor's customized data mapping, if it has one.
    pub fn data(&self) -> Option<&BTreeMap<String, serde_json::Value>> {
        self.customized_values.as_ref()?.data.as_ref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceStatus {
    pub twins: Vec<Twin>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Twin {
    pub property_name: String,
    pub desired: TwinProperty,
    pub reported: TwinProperty,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TwinProperty {
    pub value: String,
    pub metadata: BTreeMap<String, String>,
}

impl TwinProperty {
    /// Looks up a metadata key, treating a missing key as empty.
    pub fn meta(&self, key: &str) -> &str {
        self.metadata.get(key).map_or("", String::as_str)
    }
}
