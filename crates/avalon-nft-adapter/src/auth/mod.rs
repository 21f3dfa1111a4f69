/*
[INPUT]:  Login configuration, private keys and hosted login grants
[OUTPUT]: Wallet signers, sessions and connected providers
[POS]:    Auth layer - handles both provider construction paths
[UPDATE]: When login paths or signature methods change
*/

pub mod evm_wallet;
pub mod factory;
pub mod login;
pub mod session;
pub mod wallet;

pub use evm_wallet::{EvmWalletSigner, validate_private_key};
pub use factory::{LoginPath, ProviderFactory};
pub use login::{LoginFlow, LoginGrant, MockLoginFlow};
pub use session::{SessionData, SessionManager};
pub use wallet::{MockWalletSigner, WalletSigner};
