//! Translates device management descriptors into the protocol-agnostic
//! [`DeviceInstance`](common::model::DeviceInstance) drivers work with.
//!
//! Everything under [`parse`] is a pure, synchronous transform: no I/O, no
//! shared state, and the same input always yields the same output. The only
//! side effect is `tracing` events.

pub mod config;
pub mod log;
pub mod parse;

pub use mapper_common as common;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("can not parse device protocol of '{device}'")]
    UnresolvedProtocol { device: String },
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("config error: {0}")]
    Config(#[from] config::Error),
}
