//! Protocol blocks carried by a device and by each of its property visitors.
//!
//! Every block here is forwarded to drivers as an opaque payload, so the
//! mapper never looks inside them beyond checking which one is present.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Device level protocol selection.
///
/// At most one of the four protocol blocks is expected to be set. `common`
/// applies regardless of which one it is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProtocolConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modbus: Option<ModbusProtocol>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opcua: Option<OpcuaProtocol>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bluetooth: Option<BluetoothProtocol>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customized_protocol: Option<CustomizedProtocol>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub common: Option<ProtocolCommon>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModbusProtocol {
    #[serde(rename = "slaveID")]
    pub slave_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OpcuaProtocol {
    pub url: String,
    pub user_name: String,
    pub password: String,
    pub security_policy: String,
    pub security_mode: String,
    pub certificate: String,
    pub private_key: String,
    pub timeout: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BluetoothProtocol {
    pub mac_address: String,
}

/// Vendor protocol; `config_data` is free-form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomizedProtocol {
    pub protocol_name: String,
    pub config_data: serde_json::Map<String, serde_json::Value>,
}

/// Transport settings shared by every protocol kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProtocolCommon {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub com: Option<SerialPort>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tcp: Option<Tcp>,
    pub comm_type: String,
    pub reconn_timeout: i64,
    pub reconn_retry_times: i64,
    pub collect_timeout: i64,
    pub collect_retry_times: i64,
    pub collect_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customized_values: Option<CustomizedValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SerialPort {
    pub serial_port: String,
    pub baud_rate: i64,
    pub data_bits: i64,
    pub parity: String,
    pub stop_bits: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tcp {
    pub ip: String,
    pub port: i64,
}

/// Free-form values attached to a protocol or a visitor.
///
/// `data` being absent is meaningful: visitors without it carry no data
/// property.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomizedValue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<BTreeMap<String, serde_json::Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModbusVisitor {
    /// Register table, eg. `CoilRegister`, `HoldingRegister`
    pub register: String,
    pub offset: i64,
    pub limit: i64,
    pub scale: f64,
    pub is_swap: bool,
    pub is_register_swap: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OpcuaVisitor {
    #[serde(rename = "nodeID")]
    pub node_id: String,
    pub browse_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BluetoothVisitor {
    #[serde(rename = "characteristicUUID")]
    pub characteristic_uuid: String,
    pub data_write: BTreeMap<String, Vec<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_converter: Option<BluetoothReadConverter>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BluetoothReadConverter {
    pub start_index: i64,
    pub end_index: i64,
    pub shift_left: u64,
    pub shift_right: u64,
    pub order_of_operations: Vec<BluetoothOperation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BluetoothOperation {
    pub operation_type: String,
    pub operation_value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomizedVisitor {
    pub protocol_name: String,
    pub config_data: serde_json::Map<String, serde_json::Value>,
}
