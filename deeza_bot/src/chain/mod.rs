pub mod handler;
pub mod retry;

use alloy_primitives::{Address, B256, U256};
use async_trait::async_trait;
use deeza_core::helpers::dto::GiftRecord;
use deeza_core::helpers::error::ChainError;

/// The gift contract surface the orchestrator depends on. State-changing
/// calls return the transaction hash; reads return decoded records.
#[async_trait]
pub trait GiftChain: Send + Sync {
    async fn create_gift(
        &self,
        id: B256,
        code: &str,
        content_link: &str,
        recipient: Address,
        token: Address,
        amount: U256,
    ) -> Result<B256, ChainError>;

    async fn release(&self, id: B256) -> Result<B256, ChainError>;

    async fn extend_claim_time(&self, id: B256, minutes: u64) -> Result<B256, ChainError>;

    /// Errors with `NotFound` when the id maps to an empty slot.
    async fn get_gift(&self, id: B256) -> Result<GiftRecord, ChainError>;

    async fn gifts_by_gifter(&self, gifter: Address) -> Result<Vec<GiftRecord>, ChainError>;

    async fn gifts_by_recipient(&self, recipient: Address) -> Result<Vec<GiftRecord>, ChainError>;

    /// Authoritative chain time for lockout math; local clocks drift.
    async fn block_timestamp(&self) -> Result<u64, ChainError>;

    async fn native_balance(&self, address: Address) -> Result<U256, ChainError>;

    async fn token_balance(&self, token: Address, address: Address) -> Result<U256, ChainError>;

    /// Testnet-only registration bonus mint.
    async fn mint_bonus(&self, to: Address, amount: U256) -> Result<B256, ChainError>;
}
