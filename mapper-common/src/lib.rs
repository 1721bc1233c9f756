//! Shared definitions for the edge mapper.
//!
//! [`dmi`] holds the descriptors as they arrive from the device management
//! interface, [`model`] the normalized form drivers consume.

pub mod dmi;
pub mod model;

mod blob;
mod string;
pub use blob::*;
pub use string::*;
