use alloy_network::{EthereumWallet, TransactionBuilder};
use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_rpc_types::{BlockNumberOrTag, TransactionRequest};
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::{sol, SolCall};
use anyhow::Result;
use async_trait::async_trait;
use deeza_core::helpers::dto::GiftRecord;
use deeza_core::helpers::error::ChainError;
use url::Url;

use crate::chain::retry::{with_retry, DEFAULT_ATTEMPTS, RELEASE_ATTEMPTS, RETRY_DELAY};
use crate::chain::GiftChain;

sol! {
    struct Gift {
        address gifter;
        address recipient;
        address token;
        uint256 amount;
        string code;
        string ipfsLink;
        address claimer;
        uint256 claimDeadline;
        uint8 attempts;
        bool deposited;
        bool claimed;
    }

    function createGift(bytes32 id, string code, string ipfsLink, address recipient, address token, uint256 amount) external;
    function release(bytes32 id) external;
    function extendClaimTime(bytes32 id, uint256 duration) external;
    function getGift(bytes32 id) external view returns (Gift gift);
    function getGiftsByGifter(address gifter) external view returns (Gift[] gifts);
    function getGiftsByRecipient(address recipient) external view returns (Gift[] gifts);
    function balanceOf(address account) external view returns (uint256);
    function mint(address to, uint256 amount) external;
}

impl From<Gift> for GiftRecord {
    fn from(gift: Gift) -> Self {
        GiftRecord {
            gifter: gift.gifter,
            recipient: gift.recipient,
            token: gift.token,
            amount: gift.amount,
            code: gift.code,
            content_link: gift.ipfsLink,
            claimer: gift.claimer,
            claim_deadline: gift.claimDeadline.saturating_to::<u64>(),
            attempts: gift.attempts,
            deposited: gift.deposited,
            claimed: gift.claimed,
        }
    }
}

/// Gift contract gateway over a Somnia JSON-RPC endpoint. The bot's own key
/// signs every state-changing call; reads go through the same provider.
#[derive(Clone)]
pub struct SomniaGiftChain {
    provider: DynProvider,
    contract: Address,
    zazz_token: Option<Address>,
}

impl SomniaGiftChain {
    pub fn new(
        rpc_url: &str,
        contract: Address,
        bot_private_key: &str,
        zazz_token: Option<Address>,
    ) -> Result<Self> {
        let signer: PrivateKeySigner = bot_private_key.parse()?;
        let wallet = EthereumWallet::from(signer);
        let url: Url = rpc_url.parse()?;
        let provider = ProviderBuilder::new().wallet(wallet).connect_http(url).erased();
        Ok(Self {
            provider,
            contract,
            zazz_token,
        })
    }

    async fn send_call(&self, to: Address, calldata: Vec<u8>) -> Result<B256, ChainError> {
        let tx = TransactionRequest::default().to(to).input(calldata.into());
        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| ChainError::from_rpc_message(&e.to_string()))?;
        let receipt = pending
            .get_receipt()
            .await
            .map_err(|e| ChainError::from_rpc_message(&e.to_string()))?;
        if !receipt.status() {
            return Err(ChainError::Network("transaction reverted".to_string()));
        }
        Ok(receipt.transaction_hash)
    }

    async fn read_call(&self, to: Address, calldata: Vec<u8>) -> Result<Bytes, ChainError> {
        let tx = TransactionRequest::default().to(to).input(calldata.into());
        self.provider
            .call(tx)
            .await
            .map_err(|e| ChainError::from_rpc_message(&e.to_string()))
    }
}

#[async_trait]
impl GiftChain for SomniaGiftChain {
    async fn create_gift(
        &self,
        id: B256,
        code: &str,
        content_link: &str,
        recipient: Address,
        token: Address,
        amount: U256,
    ) -> Result<B256, ChainError> {
        let call = createGiftCall {
            id,
            code: code.to_string(),
            ipfsLink: content_link.to_string(),
            recipient,
            token,
            amount,
        };
        with_retry(
            || self.send_call(self.contract, call.abi_encode()),
            DEFAULT_ATTEMPTS,
            RETRY_DELAY,
        )
        .await
    }

    async fn release(&self, id: B256) -> Result<B256, ChainError> {
        let call = releaseCall { id };
        with_retry(
            || self.send_call(self.contract, call.abi_encode()),
            RELEASE_ATTEMPTS,
            RETRY_DELAY,
        )
        .await
    }

    async fn extend_claim_time(&self, id: B256, minutes: u64) -> Result<B256, ChainError> {
        let call = extendClaimTimeCall {
            id,
            duration: U256::from(minutes),
        };
        with_retry(
            || self.send_call(self.contract, call.abi_encode()),
            DEFAULT_ATTEMPTS,
            RETRY_DELAY,
        )
        .await
    }

    async fn get_gift(&self, id: B256) -> Result<GiftRecord, ChainError> {
        let call = getGiftCall { id };
        let data = with_retry(
            || self.read_call(self.contract, call.abi_encode()),
            DEFAULT_ATTEMPTS,
            RETRY_DELAY,
        )
        .await?;
        let gift = getGiftCall::abi_decode_returns(&data)
            .map_err(|e| ChainError::Network(format!("decode error: {}", e)))?;
        let record = GiftRecord::from(gift);
        if !record.exists() {
            return Err(ChainError::NotFound);
        }
        Ok(record)
    }

    async fn gifts_by_gifter(&self, gifter: Address) -> Result<Vec<GiftRecord>, ChainError> {
        let call = getGiftsByGifterCall { gifter };
        let data = with_retry(
            || self.read_call(self.contract, call.abi_encode()),
            DEFAULT_ATTEMPTS,
            RETRY_DELAY,
        )
        .await?;
        let gifts = getGiftsByGifterCall::abi_decode_returns(&data)
            .map_err(|e| ChainError::Network(format!("decode error: {}", e)))?;
        Ok(gifts.into_iter().map(GiftRecord::from).collect())
    }

    async fn gifts_by_recipient(&self, recipient: Address) -> Result<Vec<GiftRecord>, ChainError> {
        let call = getGiftsByRecipientCall { recipient };
        let data = with_retry(
            || self.read_call(self.contract, call.abi_encode()),
            DEFAULT_ATTEMPTS,
            RETRY_DELAY,
        )
        .await?;
        let gifts = getGiftsByRecipientCall::abi_decode_returns(&data)
            .map_err(|e| ChainError::Network(format!("decode error: {}", e)))?;
        Ok(gifts.into_iter().map(GiftRecord::from).collect())
    }

    async fn block_timestamp(&self) -> Result<u64, ChainError> {
        let block = with_retry(
            || async {
                self.provider
                    .get_block_by_number(BlockNumberOrTag::Latest)
                    .await
                    .map_err(|e| ChainError::from_rpc_message(&e.to_string()))
            },
            DEFAULT_ATTEMPTS,
            RETRY_DELAY,
        )
        .await?
        .ok_or_else(|| ChainError::Network("no latest block".to_string()))?;
        Ok(block.header.timestamp)
    }

    async fn native_balance(&self, address: Address) -> Result<U256, ChainError> {
        with_retry(
            || async {
                self.provider
                    .get_balance(address)
                    .await
                    .map_err(|e| ChainError::from_rpc_message(&e.to_string()))
            },
            DEFAULT_ATTEMPTS,
            RETRY_DELAY,
        )
        .await
    }

    async fn token_balance(&self, token: Address, address: Address) -> Result<U256, ChainError> {
        let call = balanceOfCall { account: address };
        let data = with_retry(
            || self.read_call(token, call.abi_encode()),
            DEFAULT_ATTEMPTS,
            RETRY_DELAY,
        )
        .await?;
        balanceOfCall::abi_decode_returns(&data)
            .map_err(|e| ChainError::Network(format!("decode error: {}", e)))
    }

    async fn mint_bonus(&self, to: Address, amount: U256) -> Result<B256, ChainError> {
        let token = self
            .zazz_token
            .ok_or_else(|| ChainError::Network("ZAZZ token address not configured".to_string()))?;
        let call = mintCall { to, amount };
        with_retry(
            || self.send_call(token, call.abi_encode()),
            DEFAULT_ATTEMPTS,
            RETRY_DELAY,
        )
        .await
    }
}
