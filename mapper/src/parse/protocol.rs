use mapper_common::{
    ConfigBlob,
    dmi::{
        BluetoothProtocol, CustomizedProtocol, Device, DevicePropertyVisitor, ModbusProtocol,
        OpcuaProtocol, ProtocolConfig,
    },
    model::{Protocol, ProtocolKind},
};

use crate::{Error, Result};

/// The protocol block a device was resolved to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProtocolVariant<'a> {
    Modbus(&'a ModbusProtocol),
    Opcua(&'a OpcuaProtocol),
    Bluetooth(&'a BluetoothProtocol),
    Customized(&'a CustomizedProtocol),
}

impl ProtocolVariant<'_> {
    pub fn kind(self) -> ProtocolKind {
        match self {
            ProtocolVariant::Modbus(_) => ProtocolKind::Modbus,
            ProtocolVariant::Opcua(_) => ProtocolKind::Opcua,
            ProtocolVariant::Bluetooth(_) => ProtocolKind::Bluetooth,
            ProtocolVariant::Customized(_) => ProtocolKind::CustomizedProtocol,
        }
    }

    /// Serializes the selected device level block.
    pub fn config(self) -> Result<ConfigBlob> {
        let blob = match self {
            ProtocolVariant::Modbus(config) => ConfigBlob::encode(config),
            ProtocolVariant::Opcua(config) => ConfigBlob::encode(config),
            ProtocolVariant::Bluetooth(config) => ConfigBlob::encode(config),
            ProtocolVariant::Customized(config) => ConfigBlob::encode(config),
        };

        Ok(blob?)
    }

    /// Serializes the visitor block of the same kind. A visitor without one
    /// yields a `null` payload.
    pub fn visitor_config(self, visitor: &DevicePropertyVisitor) -> Result<ConfigBlob> {
        let blob = match self {
            ProtocolVariant::Modbus(_) => ConfigBlob::encode(&visitor.modbus),
            ProtocolVariant::Opcua(_) => ConfigBlob::encode(&visitor.opcua),
            ProtocolVariant::Bluetooth(_) => ConfigBlob::encode(&visitor.bluetooth),
            ProtocolVariant::Customized(_) => ConfigBlob::encode(&visitor.customized_protocol),
        };

        Ok(blob?)
    }
}

fn populated(config: &ProtocolConfig) -> impl Iterator<Item = ProtocolVariant<'_>> {
    [
        config.modbus.as_ref().map(ProtocolVariant::Modbus),
        config.opcua.as_ref().map(ProtocolVariant::Opcua),
        config.bluetooth.as_ref().map(ProtocolVariant::Bluetooth),
        config.customized_protocol.as_ref().map(ProtocolVariant::Customized),
    ]
    .into_iter()
    .flatten()
}

/// Picks the protocol a device speaks.
///
/// Blocks are checked in [`ProtocolKind::ALL`] order and the first populated
/// one wins. Extra populated blocks are ignored with a warning.
pub fn resolve(device: &Device) -> Result<ProtocolVariant<'_>> {
    let unresolved = || Error::UnresolvedProtocol { device: device.name.clone() };

    let mut variants = device
        .spec
        .protocol
        .as_ref()
        .map(populated)
        .into_iter()
        .flatten();

    let selected = variants.next().ok_or_else(unresolved)?;

    let ignored = variants.map(|v| v.kind().as_str()).collect::<Vec<_>>();
    if !ignored.is_empty() {
        tracing::warn!(
            device = %device.name,
            selected = %selected.kind(),
            ?ignored,
            "device declares more than one protocol, using the first by priority",
        );
    }

    Ok(selected)
}

/// Resolves the device protocol and serializes its configuration.
pub fn build_protocol(device: &Device) -> Result<Protocol> {
    let variant = resolve(device)?;
    let kind = variant.kind();

    let common = device
        .spec
        .protocol
        .as_ref()
        .and_then(|p| p.common.as_ref());

    Ok(Protocol {
        name: kind.instance_name(&device.name),
        protocol: kind,
        protocol_configs: variant.config()?,
        protocol_common_config: ConfigBlob::encode(&common)?,
    })
}

#[cfg(test)]
mod tests {
    use mapper_common::dmi::{ModbusVisitor, ProtocolCommon, Tcp};
    use tracing_test::traced_test;

    use super::*;

    fn device(protocol: serde_json::Value) -> Device {
        serde_json::from_value(serde_json::json!({
            "name": "dev1",
            "spec": { "protocol": protocol },
        }))
        .unwrap()
    }

    #[test]
    fn resolves_single_protocol() {
        let cases = [
            (serde_json::json!({ "modbus": { "slaveID": 1 } }), ProtocolKind::Modbus),
            (serde_json::json!({ "opcua": { "url": "opc.tcp://plc:4840" } }), ProtocolKind::Opcua),
            (
                serde_json::json!({ "bluetooth": { "macAddress": "a4:c1:38:16:4b:6d" } }),
                ProtocolKind::Bluetooth,
            ),
            (
                serde_json::json!({ "customizedProtocol": { "protocolName": "acme" } }),
                ProtocolKind::CustomizedProtocol,
            ),
        ];

        for (protocol, kind) in cases {
            assert_eq!(resolve(&device(protocol)).unwrap().kind(), kind);
        }
    }

    #[test]
    fn unresolved_without_protocol() {
        let bare = Device { name: "dev1".into(), ..Default::default() };
        assert!(matches!(
            resolve(&bare),
            Err(Error::UnresolvedProtocol { device }) if device == "dev1"
        ));

        let common_only = device(serde_json::json!({ "common": { "commType": "tcp" } }));
        assert!(matches!(resolve(&common_only), Err(Error::UnresolvedProtocol { .. })));
    }

    #[test]
    #[traced_test]
    fn first_by_priority_wins() {
        let device = device(serde_json::json!({
            "customizedProtocol": { "protocolName": "acme" },
            "bluetooth": { "macAddress": "a4:c1:38:16:4b:6d" },
            "opcua": { "url": "opc.tcp://plc:4840" },
        }));

        let variant = resolve(&device).unwrap();
        assert_eq!(variant.kind(), ProtocolKind::Opcua);
        assert!(matches!(variant, ProtocolVariant::Opcua(o) if o.url == "opc.tcp://plc:4840"));

        assert!(logs_contain("more than one protocol"));
        assert!(logs_contain("customized-protocol"));
    }

    #[test]
    fn modbus_protocol() {
        let device = device(serde_json::json!({
            "modbus": { "slaveID": 1 },
            "common": { "tcp": { "ip": "10.0.0.2", "port": 502 } },
        }));

        let protocol = build_protocol(&device).unwrap();

        assert_eq!(protocol.name, "modbus-dev1");
        assert_eq!(protocol.protocol, ProtocolKind::Modbus);
        assert_eq!(
            protocol.protocol_configs.decode::<ModbusProtocol>().unwrap(),
            ModbusProtocol { slave_id: 1 }
        );

        let common = protocol
            .protocol_common_config
            .decode::<ProtocolCommon>()
            .unwrap();
        assert_eq!(common.tcp, Some(Tcp { ip: "10.0.0.2".into(), port: 502 }));
    }

    #[test]
    fn missing_common_is_null() {
        let protocol =
            build_protocol(&device(serde_json::json!({ "bluetooth": {} }))).unwrap();

        assert_eq!(protocol.name, "bluetooth-dev1");
        assert_eq!(protocol.protocol_common_config.as_bytes(), b"null");
        assert_eq!(
            protocol.protocol_configs.decode::<serde_json::Value>().unwrap(),
            serde_json::json!({ "macAddress": "" })
        );
    }

    #[test]
    fn build_protocol_fails_unresolved() {
        let bare = Device { name: "dev1".into(), ..Default::default() };
        assert!(matches!(build_protocol(&bare), Err(Error::UnresolvedProtocol { .. })));
    }

    #[test]
    fn visitor_config_follows_device_kind() {
        let modbus = ModbusProtocol { slave_id: 1 };
        let visitor = DevicePropertyVisitor {
            property_name: "temp".into(),
            modbus: Some(ModbusVisitor {
                register: "HoldingRegister".into(),
                offset: 2,
                limit: 1,
                ..Default::default()
            }),
            ..Default::default()
        };

        let blob = ProtocolVariant::Modbus(&modbus)
            .visitor_config(&visitor)
            .unwrap();
        assert_eq!(blob.decode::<ModbusVisitor>().unwrap().offset, 2);

        let opcua = OpcuaProtocol::default();
        let blob = ProtocolVariant::Opcua(&opcua)
            .visitor_config(&visitor)
            .unwrap();
        assert_eq!(blob.as_bytes(), b"null");
    }
}
