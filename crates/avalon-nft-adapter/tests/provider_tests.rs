/*
[INPUT]:  Login paths, mock login flows and mock RPC endpoints
[OUTPUT]: Test results for provider construction and session lifecycle
[POS]:    Integration tests - authentication and provider
[UPDATE]: When login paths or provider capabilities change
*/

mod common;

use std::sync::Arc;

use avalon_nft_adapter::{
    Address, AvalonError, ChainConfig, LoginGrant, LoginKind, MockLoginFlow, NftReader, Provider,
    ProviderFactory, U256, UserInfo,
};
use common::{TEST_ADDRESS, TEST_KEY, encode, setup_mock_server};
use serde_json::json;
use tokio_test::assert_ok;
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, ResponseTemplate};

fn grant() -> LoginGrant {
    LoginGrant {
        private_key: TEST_KEY.trim_start_matches("0x").to_string(),
        user_info: UserInfo {
            email: Some("knight@avalon.example".to_string()),
            name: Some("Galahad".to_string()),
            login_type: Some("google".to_string()),
            ..UserInfo::default()
        },
    }
}

fn offline_chain() -> ChainConfig {
    ChainConfig::rinkeby("http://127.0.0.1:8545")
}

#[tokio::test]
async fn test_invalid_private_key_never_touches_network() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let factory = ProviderFactory::private_key(ChainConfig::rinkeby(server.uri()), "0x1234");
    let err = factory.connect().await.unwrap_err();
    assert!(matches!(err, AvalonError::InvalidKey(_)));
    assert!(factory.sessions().current().is_none());
}

#[tokio::test]
async fn test_private_key_provider_signs_locally() {
    let server = setup_mock_server().await;
    let factory = ProviderFactory::private_key(ChainConfig::rinkeby(server.uri()), TEST_KEY);
    let provider = assert_ok!(factory.connect().await);

    let accounts = assert_ok!(provider.accounts().await);
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].to_checksum(None), TEST_ADDRESS);

    let signature = assert_ok!(provider.sign_message(b"hello avalon").await);
    assert!(signature.starts_with("0x"));
    assert_eq!(signature.len(), 2 + 65 * 2);

    let chain_id = assert_ok!(provider.request("eth_chainId", json!([])).await);
    assert_eq!(chain_id, json!("0x4"));
}

#[tokio::test]
async fn test_delegated_connect_requires_init() {
    let flow = Arc::new(MockLoginFlow::new(grant()));
    let factory = ProviderFactory::delegated("avalon-client", offline_chain(), flow.clone());

    assert!(!factory.is_initialized());
    assert!(matches!(
        factory.connect().await,
        Err(AvalonError::NotInitialized)
    ));
    assert_eq!(flow.login_calls(), 0);
}

#[tokio::test]
async fn test_delegated_login_exposes_user_info() {
    let flow = Arc::new(MockLoginFlow::new(grant()));
    let factory = ProviderFactory::delegated("avalon-client", offline_chain(), flow.clone());

    assert_ok!(factory.init().await);
    assert_ok!(factory.init().await);
    assert_eq!(flow.init_calls(), 1);
    assert_eq!(flow.init_client_id().as_deref(), Some("avalon-client"));

    let provider = assert_ok!(factory.connect().await);
    assert_eq!(provider.address().to_checksum(None), TEST_ADDRESS);
    assert_eq!(factory.kind(), LoginKind::Delegated);

    let info = assert_ok!(factory.user_info().await);
    assert_eq!(info.name.as_deref(), Some("Galahad"));
    assert_eq!(info.login_type.as_deref(), Some("google"));
}

#[tokio::test]
async fn test_cancelled_login_is_authentication_error() {
    let flow = Arc::new(MockLoginFlow::cancelled());
    let factory = ProviderFactory::delegated("avalon-client", offline_chain(), flow.clone());
    assert_ok!(factory.init().await);

    let err = factory.connect().await.unwrap_err();
    assert!(matches!(err, AvalonError::Authentication { .. }));
    assert!(factory.sessions().current().is_none());
}

#[tokio::test]
async fn test_logout_invalidates_provider_and_reader() {
    let flow = Arc::new(MockLoginFlow::new(grant()));
    let factory = ProviderFactory::delegated("avalon-client", offline_chain(), flow.clone());
    assert_ok!(factory.init().await);

    let provider = Arc::new(assert_ok!(factory.connect().await));
    let reader = assert_ok!(NftReader::new(provider.clone()));

    assert_ok!(factory.logout().await);
    assert_eq!(flow.logout_calls(), 1);
    assert!(!provider.is_valid());

    assert!(matches!(
        provider.sign_message(b"after logout").await,
        Err(AvalonError::ProviderInvalidated)
    ));
    assert!(matches!(
        reader.balance_of().await,
        Err(AvalonError::ProviderInvalidated)
    ));
    assert!(matches!(
        reader.owner_of_first_token().await,
        Err(AvalonError::ProviderInvalidated)
    ));
}

#[tokio::test]
async fn test_contract_reads_are_forwarded_as_eth_call() {
    let server = setup_mock_server().await;
    let first_owner = Address::repeat_byte(0x42);
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"method": "eth_call"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": encode(first_owner).to_string(),
        })))
        .expect(1)
        .mount(&server)
        .await;

    let factory = ProviderFactory::private_key(ChainConfig::rinkeby(server.uri()), TEST_KEY);
    let provider = Arc::new(assert_ok!(factory.connect().await));
    let reader = assert_ok!(NftReader::new(provider));

    assert_eq!(assert_ok!(reader.owner_of_first_token().await), first_owner);
}

#[tokio::test]
async fn test_nonexistent_token_revert_from_node() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"method": "eth_call"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {
                "code": 3,
                "message": "execution reverted: ERC721Metadata: URI query for nonexistent token",
                "data": "0x08c379a0",
            },
        })))
        .mount(&server)
        .await;

    let factory = ProviderFactory::private_key(ChainConfig::rinkeby(server.uri()), TEST_KEY);
    let provider = Arc::new(assert_ok!(factory.connect().await));
    let reader = assert_ok!(NftReader::new(provider));

    let err = reader.token_uri(U256::from(12345)).await.unwrap_err();
    assert!(matches!(err, AvalonError::TokenNotFound { .. }));
}
