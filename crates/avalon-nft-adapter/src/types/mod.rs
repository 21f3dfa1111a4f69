/*
[INPUT]:  Chain, contract and JSON-RPC schema definitions
[OUTPUT]: Typed Rust structs/enums with serialization support
[POS]:    Data layer - type definitions shared by every layer
[UPDATE]: When schemas change or new types are added
*/

pub mod enums;
pub mod models;
pub mod requests;
pub mod responses;

pub use enums::*;
pub use models::*;
pub use requests::*;
pub use responses::*;
