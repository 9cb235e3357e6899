use anyhow::Result;
use async_trait::async_trait;
use deeza_core::helpers::dto::TokenInfo;
use reqwest::Client;

use crate::gecko::dto::{PoolResponse, PoolSearchResponse, TokenResponse};
use crate::gecko::TokenLookup;

const GECKOTERMINAL_BASE: &str = "https://api.geckoterminal.com/api/v2";
const NETWORK: &str = "somnia";

/// GeckoTerminal client scoped to the Somnia network.
#[derive(Clone)]
pub struct GeckoTerminal {
    client: Client,
}

impl GeckoTerminal {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for GeckoTerminal {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenLookup for GeckoTerminal {
    async fn search_token(&self, query: &str) -> Result<Option<TokenInfo>> {
        // Addresses resolve directly; symbols go through pool search.
        if query.starts_with("0x") {
            let url = format!("{}/networks/{}/tokens/{}", GECKOTERMINAL_BASE, NETWORK, query);
            let response: TokenResponse = self.client.get(&url).send().await?.json().await?;
            let Some(attributes) = response.data.and_then(|d| d.attributes) else {
                return Ok(None);
            };
            return Ok(Some(TokenInfo {
                token_address: query.to_string(),
                token_symbol: attributes.symbol.unwrap_or_else(|| "UNKNOWN".to_string()),
                token_name: attributes.name.unwrap_or_else(|| "Unknown Token".to_string()),
                pool_address: None,
                liquidity: 0.0,
            }));
        }

        let url = format!(
            "{}/search/pools?query={}&network={}",
            GECKOTERMINAL_BASE, query, NETWORK
        );
        let response: PoolSearchResponse = self.client.get(&url).send().await?.json().await?;
        let Some(best_pool) = response.data.into_iter().next() else {
            return Ok(None);
        };

        let token_address = best_pool
            .relationships
            .as_ref()
            .and_then(|r| r.base_token.as_ref())
            .and_then(|t| t.data.as_ref())
            .and_then(|d| d.id.as_ref())
            .and_then(|id| id.split('_').nth(1))
            .unwrap_or(query)
            .to_string();
        let attributes = best_pool.attributes;
        let base = attributes.as_ref().and_then(|a| a.base_token.as_ref());

        Ok(Some(TokenInfo {
            token_address,
            token_symbol: base
                .and_then(|b| b.symbol.clone())
                .unwrap_or_else(|| query.to_string()),
            token_name: base
                .and_then(|b| b.name.clone())
                .unwrap_or_else(|| "Unknown Token".to_string()),
            pool_address: Some(best_pool.id),
            liquidity: attributes
                .as_ref()
                .and_then(|a| a.reserve_in_usd.as_ref())
                .and_then(|r| r.parse().ok())
                .unwrap_or(0.0),
        }))
    }

    async fn pool_price_usd(&self, pool_address: &str) -> Result<Option<f64>> {
        let url = format!(
            "{}/networks/{}/pools/{}",
            GECKOTERMINAL_BASE, NETWORK, pool_address
        );
        let response: PoolResponse = self.client.get(&url).send().await?.json().await?;
        let price = response
            .data
            .and_then(|p| p.attributes)
            .and_then(|a| a.base_token_price_usd)
            .and_then(|p| p.parse::<f64>().ok())
            .filter(|p| *p > 0.0);
        Ok(price)
    }
}
