/*
[INPUT]:  Chain and login identifiers used across the adapter
[OUTPUT]: Typed Rust enums with serialization support
[POS]:    Data layer - shared enumerations
[UPDATE]: When supporting new chain namespaces or login paths
*/

use serde::{Deserialize, Serialize};

/// Chain namespace of the configured network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ChainNamespace {
    #[default]
    #[serde(rename = "eip155")]
    Eip155,
}

/// How the active session was established
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginKind {
    /// Hosted social login
    Delegated,
    /// Raw private key import
    PrivateKey,
}
