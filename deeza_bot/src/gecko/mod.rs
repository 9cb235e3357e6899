pub mod dto;
pub mod handler;

use anyhow::Result;
use async_trait::async_trait;
use deeza_core::helpers::dto::TokenInfo;

/// Market-data lookup used to resolve token symbols to addresses and to
/// convert USD amounts into token amounts. Best-effort: a `None` means the
/// caller should tell the user the price could not be fetched.
#[async_trait]
pub trait TokenLookup: Send + Sync {
    async fn search_token(&self, query: &str) -> Result<Option<TokenInfo>>;
    async fn pool_price_usd(&self, pool_address: &str) -> Result<Option<f64>>;
}
