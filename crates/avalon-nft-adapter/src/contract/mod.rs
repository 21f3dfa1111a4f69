/*
[INPUT]:  Provider handle and the collection's contract address
[OUTPUT]: Ownership, enumeration and metadata query results
[POS]:    Contract layer - read-only ERC-721 access
[UPDATE]: When adding contract queries or aggregation routines
*/

pub mod abi;
pub mod reader;

pub use abi::IERC721Enumerable;
pub use reader::{AVALON_CONTRACT_ADDRESS, DEFAULT_MAX_ENUMERABLE, NftReader, ReaderConfig};
