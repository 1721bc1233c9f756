use core::{fmt::Display, ops::Deref};

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Identifier of a device instance, as assigned by the management plane.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(pub CompactString);

impl DeviceId {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl<T: AsRef<str>> From<T> for DeviceId {
    fn from(value: T) -> Self {
        DeviceId(CompactString::from(value.as_ref()))
    }
}

impl Deref for DeviceId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl<T: AsRef<str> + ?Sized> PartialEq<T> for DeviceId {
    fn eq(&self, other: &T) -> bool {
        self.0.as_str() == other.as_ref()
    }
}

impl Display for DeviceId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.0.fmt(f)
    }
}
