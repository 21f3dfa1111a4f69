/*
[INPUT]:  Parsed subcommand, connected provider and NFT reader
[OUTPUT]: JSON value describing the command result
[POS]:    Command layer - maps CLI verbs onto adapter operations
[UPDATE]: When adding commands or changing their output shape
*/

use anyhow::{Context, Result};
use avalon_nft_adapter::{NftReader, Provider, SigningProvider, U256};
use clap::Subcommand;
use serde_json::{Value, json};
use tracing::debug;

/// Viewer subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the connected account
    Accounts,
    /// Native balance of the connected account, in wei
    Balance,
    /// Sign a personal message with the connected account
    SignMessage {
        message: String,
    },
    /// Owner of token 0
    OwnerOfFirst,
    /// Metadata URI of a token (token 0 when omitted)
    TokenUri {
        #[arg(value_parser = parse_token_id)]
        token_id: Option<U256>,
    },
    /// Number of tokens held by the account
    NftCount,
    /// Ids of every token held by the account
    TokenIds,
    /// Every held token with its image URL
    Nfts,
}

fn parse_token_id(raw: &str) -> std::result::Result<U256, String> {
    raw.parse::<U256>()
        .map_err(|e| format!("invalid token id {raw:?}: {e}"))
}

/// Run one command and describe its result as JSON
pub async fn execute(command: &Command, provider: &SigningProvider, reader: &NftReader) -> Result<Value> {
    debug!(?command, "executing command");
    let output = match command {
        Command::Accounts => {
            let accounts = provider.accounts().await.context("accounts")?;
            json!({ "accounts": accounts })
        }
        Command::Balance => {
            let wei = provider.native_balance().await.context("native balance")?;
            json!({
                "account": provider.address(),
                "wei": wei.to_string(),
                "ticker": provider.chain().ticker,
            })
        }
        Command::SignMessage { message } => {
            let signature = provider
                .sign_message(message.as_bytes())
                .await
                .context("sign message")?;
            json!({ "message": message, "signature": signature })
        }
        Command::OwnerOfFirst => {
            let owner = reader.owner_of_first_token().await.context("ownerOf(0)")?;
            json!({ "tokenId": "0", "owner": owner })
        }
        Command::TokenUri { token_id } => {
            let token_id = token_id.unwrap_or(U256::ZERO);
            let uri = reader
                .token_uri(token_id)
                .await
                .with_context(|| format!("tokenURI({token_id})"))?;
            json!({ "tokenId": token_id.to_string(), "uri": uri })
        }
        Command::NftCount => {
            let count = reader.balance_of().await.context("balanceOf")?;
            json!({ "count": count.to_string() })
        }
        Command::TokenIds => {
            let ids = reader.list_owned_token_ids().await.context("list token ids")?;
            let ids: Vec<String> = ids.iter().map(U256::to_string).collect();
            json!({ "tokenIds": ids })
        }
        Command::Nfts => {
            let nfts = reader
                .list_owned_nfts_with_images()
                .await
                .context("list nfts")?;
            json!({ "nfts": nfts })
        }
    };
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_token_id() {
        assert_eq!(parse_token_id("7").unwrap(), U256::from(7));
        assert_eq!(parse_token_id("0x10").unwrap(), U256::from(16));
        assert!(parse_token_id("seven").is_err());
    }
}
