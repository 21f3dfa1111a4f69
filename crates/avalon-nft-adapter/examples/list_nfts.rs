/*
[INPUT]:  Private key and RPC endpoint from the environment
[OUTPUT]: Console listing of owned Avalon NFTs with image URLs
[POS]:    Examples - private-key login and NFT listing demonstration
[UPDATE]: When ProviderFactory or NftReader API changes
*/

use std::sync::Arc;

use avalon_nft_adapter::*;

/// Example: list the caller's NFTs
///
/// 1. Build a factory for the private-key path
/// 2. Connect to get a provider
/// 3. Read balance and enumerate tokens
/// 4. Resolve each token's image through the IPFS gateway
///
/// Run with `AVALON_PRIVATE_KEY=0x... AVALON_RPC_URL=https://... cargo run --example list_nfts`
#[tokio::main]
async fn main() {
    println!("=== Avalon NFT Listing Example ===\n");

    let Ok(private_key) = std::env::var("AVALON_PRIVATE_KEY") else {
        eprintln!("Set AVALON_PRIVATE_KEY to a hex-encoded secp256k1 key");
        return;
    };
    let rpc_url = std::env::var("AVALON_RPC_URL")
        .unwrap_or_else(|_| "https://rinkeby.infura.io/v3/YOUR_PROJECT_ID".to_string());

    // Step 1-2: Connect
    let factory = ProviderFactory::private_key(ChainConfig::rinkeby(rpc_url), private_key);
    let provider = match factory.connect().await {
        Ok(p) => Arc::new(p),
        Err(e) => {
            eprintln!("Failed to connect: {}", e);
            return;
        }
    };
    println!("✓ Connected as {}", provider.address());

    // Step 3: Balance
    let reader = match NftReader::new(provider.clone()) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Failed to create reader: {}", e);
            return;
        }
    };
    match reader.balance_of().await {
        Ok(balance) => println!("✓ Balance: {} token(s)", balance),
        Err(e) => {
            eprintln!("Failed to read balance: {}", e);
            return;
        }
    }

    // Step 4: Tokens with images
    match reader.list_owned_nfts_with_images().await {
        Ok(nfts) => {
            for nft in nfts {
                println!("  #{} -> {}", nft.token_id, nft.image_url);
            }
        }
        Err(e) => eprintln!("Failed to list NFTs: {}", e),
    }

    if let Err(e) = factory.logout().await {
        eprintln!("Logout failed: {}", e);
    }
    println!("\n✓ Listing example complete");
}
