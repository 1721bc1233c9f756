use core::fmt::Debug;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use bytes::Bytes;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de::DeserializeOwned};

/// Opaque, protocol-specific configuration payload.
///
/// The contents are JSON produced by the mapper, but only the driver for the
/// matching protocol knows what shape to expect. In documents the payload is
/// carried as standard base64 text.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct ConfigBlob(Bytes);

impl ConfigBlob {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    /// Encodes `value` as JSON.
    pub fn encode<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Self> {
        serde_json::to_vec(value).map(Self::new)
    }

    /// Reads the payload back as `T`, for use by the driver that owns it.
    pub fn decode<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.0)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl Debug for ConfigBlob {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match core::str::from_utf8(&self.0) {
            Ok(s) => f.debug_tuple("ConfigBlob").field(&s).finish(),
            Err(_) => f.debug_tuple("ConfigBlob").field(&&self.0[..]).finish(),
        }
    }
}

impl Serialize for ConfigBlob {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(&self.0))
    }
}

impl<'de> Deserialize<'de> for ConfigBlob {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        STANDARD
            .decode(text)
            .map(Self::new)
            .map_err(serde::de::Error::custom)
    }
}
