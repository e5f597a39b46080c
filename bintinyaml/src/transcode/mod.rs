//! Transcoders from tinyaml values to formats implemented by external crates.

pub mod cbor;
pub mod toml;
pub mod yaml;
