//! Process configuration.
//!
//! A YAML file, overlaid with `MAPPER_` environment variables (nested keys
//! separated by `__`, eg. `MAPPER_MQTT__SERVER`), overlaid with command line
//! flags. [`Config::validate`] turns it into the [`Settings`] the rest of the
//! mapper runs with; any error there is fatal at startup.
//!
//! ```yaml
//! mqtt:
//!   server: tcp://127.0.0.1:1883
//! grpc_server:
//!   socket_path: /etc/kubeedge/modbus.sock
//! common:
//!   name: modbus-mapper
//!   protocol: modbus
//! dev_init:
//!   mode: register
//! ```

use std::{
    env, fmt, fs, io,
    path::{Path, PathBuf},
};

use figment::{
    Figment,
    providers::{Env, Format as _, Yaml},
};
use serde::{
    Deserialize, Deserializer, Serialize,
    de::{self, Visitor},
};

pub const DEFAULT_CONFIG_FILE: &str = "./config.yaml";
pub const DEFAULT_METASERVER_ADDR: &str = "http://127.0.0.1:10550";
pub const DEFAULT_NAMESPACE: &str = "default";
/// Fallback source of the device profile in configmap mode
pub const DEVICE_PROFILE_ENV: &str = "DEVICE_PROFILE";

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("can not read config file {path}: {source}")]
    ConfigFile { path: PathBuf, source: io::Error },
    #[error("failed to load configuration: {0}")]
    Load(#[from] figment::Error),
    #[error("both certification and private key must be provided")]
    CertificatePair,
    #[error("can not read device profile {path}: {source}")]
    DeviceProfile { path: PathBuf, source: io::Error },
    #[error("can not parse configmap: device profile is empty")]
    EmptyDeviceProfile,
    #[error("unsupported dev init mode {0}")]
    UnsupportedInitMode(String),
}

/// Configuration as written, before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub mqtt: Mqtt,
    pub http_server: HttpServer,
    pub grpc_server: GrpcServer,
    pub common: Common,
    pub dev_init: DevInit,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Mqtt {
    #[serde(rename = "server", deserialize_with = "text")]
    pub server_address: String,
    #[serde(deserialize_with = "text")]
    pub username: String,
    #[serde(deserialize_with = "text")]
    pub password: String,
    /// Certificate file path
    #[serde(rename = "certification")]
    pub cert: String,
    /// Private key file path
    #[serde(rename = "privatekey")]
    pub private_key: String,
}

impl Mqtt {
    /// Certificate and key paths, if TLS is configured.
    pub fn tls(&self) -> Option<(&str, &str)> {
        (!self.cert.is_empty()).then_some((self.cert.as_str(), self.private_key.as_str()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpServer {
    #[serde(deserialize_with = "text")]
    pub host: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrpcServer {
    pub socket_path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Common {
    #[serde(deserialize_with = "text")]
    pub name: String,
    #[serde(deserialize_with = "text")]
    pub version: String,
    #[serde(deserialize_with = "text")]
    pub api_version: String,
    pub protocol: String,
    pub address: String,
    pub edgecore_sock: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DevInit {
    /// `configmap`, `register` or `metaserver`; empty means `metaserver`
    pub mode: String,
    /// Path of the device profile, in configmap mode
    pub configmap: String,
    pub metaserver: MetaServer,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaServer {
    #[serde(deserialize_with = "text")]
    pub addr: String,
    #[serde(deserialize_with = "text")]
    pub namespace: String,
}

/// Reads a free-text value. Unquoted YAML scalars and environment values
/// like `1234` or `true` arrive typed, and are taken as their text.
fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    struct Text;

    impl Visitor<'_> for Text {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string or scalar")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_owned())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i128<E: de::Error>(self, v: i128) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u128<E: de::Error>(self, v: u128) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_char<E: de::Error>(self, v: char) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_unit<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }
    }

    d.deserialize_any(Text)
}

/// Command line values that take precedence over the file and environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub metaserver_addr: Option<String>,
    pub mqtt_address: Option<String>,
    pub mqtt_username: Option<String>,
    pub mqtt_password: Option<String>,
    pub mqtt_certification: Option<String>,
    pub mqtt_privatekey: Option<String>,
}

impl Config {
    /// File and environment layers for `path`. The file must exist.
    pub fn figment(path: impl AsRef<Path>) -> Result<Figment, Error> {
        let path = path.as_ref();

        let yaml = fs::read_to_string(path)
            .map_err(|source| Error::ConfigFile { path: path.to_owned(), source })?;

        Ok(Figment::new()
            .merge(Yaml::string(&yaml))
            .merge(Env::prefixed("MAPPER_").split("__")))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let config = Self::figment(path.as_ref())?.extract()?;
        tracing::debug!(path = %path.as_ref().display(), "loaded configuration");
        Ok(config)
    }

    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        let Overrides {
            metaserver_addr,
            mqtt_address,
            mqtt_username,
            mqtt_password,
            mqtt_certification,
            mqtt_privatekey,
        } = overrides;

        let pairs = [
            (&mut self.dev_init.metaserver.addr, metaserver_addr),
            (&mut self.mqtt.server_address, mqtt_address),
            (&mut self.mqtt.username, mqtt_username),
            (&mut self.mqtt.password, mqtt_password),
            (&mut self.mqtt.cert, mqtt_certification),
            (&mut self.mqtt.private_key, mqtt_privatekey),
        ];

        for (field, value) in pairs {
            if let Some(value) = value {
                *field = value;
            }
        }

        self
    }

    pub fn validate(self) -> Result<Settings, Error> {
        if self.mqtt.cert.is_empty() != self.mqtt.private_key.is_empty() {
            return Err(Error::CertificatePair);
        }

        let dev_init = self.dev_init.resolve()?;
        tracing::info!(mode = dev_init.mode(), "device initialization mode");

        Ok(Settings {
            mqtt: self.mqtt,
            http_server: self.http_server,
            grpc_server: self.grpc_server,
            common: self.common,
            dev_init,
        })
    }
}

impl DevInit {
    fn resolve(self) -> Result<DeviceInit, Error> {
        match self.mode.as_str() {
            "configmap" => Ok(DeviceInit::Configmap {
                profile: read_device_profile(Path::new(&self.configmap))?,
            }),
            "register" => Ok(DeviceInit::Register),
            "" | "metaserver" => {
                let MetaServer { addr, namespace } = self.metaserver;
                Ok(DeviceInit::MetaServer {
                    addr: non_empty_or(addr, DEFAULT_METASERVER_ADDR),
                    namespace: non_empty_or(namespace, DEFAULT_NAMESPACE),
                })
            }
            other => Err(Error::UnsupportedInitMode(other.to_owned())),
        }
    }
}

fn non_empty_or(value: String, default: &str) -> String {
    if value.is_empty() { default.to_owned() } else { value }
}

// A missing file falls back to the environment; any other read error is fatal.
fn read_device_profile(path: &Path) -> Result<String, Error> {
    let profile = match fs::read_to_string(path) {
        Ok(profile) => profile,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no device profile file, using {DEVICE_PROFILE_ENV}");
            env::var(DEVICE_PROFILE_ENV).unwrap_or_default()
        }
        Err(source) => return Err(Error::DeviceProfile { path: path.to_owned(), source }),
    };

    match profile.trim() {
        "" => Err(Error::EmptyDeviceProfile),
        profile => Ok(profile.to_owned()),
    }
}

/// Validated configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub mqtt: Mqtt,
    pub http_server: HttpServer,
    pub grpc_server: GrpcServer,
    pub common: Common,
    pub dev_init: DeviceInit,
}

/// Where device and model descriptors come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceInit {
    /// Read once from a local device profile
    Configmap { profile: String },
    /// Registered through the management API
    Register,
    /// Queried from the local meta service
    MetaServer { addr: String, namespace: String },
}

impl DeviceInit {
    pub fn mode(&self) -> &'static str {
        match self {
            DeviceInit::Configmap { .. } => "configmap",
            DeviceInit::Register => "register",
            DeviceInit::MetaServer { .. } => "metaserver",
        }
    }
}
