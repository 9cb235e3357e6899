//! Deterministic stand-ins for the model, the chain, the content store and
//! the token lookup, shared by the unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use alloy_primitives::{Address, B256, U256};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use deeza_core::helpers::dto::{ContentBlob, GiftRecord, TokenInfo};
use deeza_core::helpers::error::ChainError;

use crate::ai::dto::{
    ConfirmVerdict, IntentAction, IntentParams, Judgment, ParsedIntent, QuestionAnswer,
};
use crate::ai::DeezaAi;
use crate::chain::GiftChain;
use crate::gecko::TokenLookup;
use crate::ipfs::ContentStore;

/// Scripted model: queued intents, a fixed semantic verdict and an optional
/// canned question/answer pair. Everything else degrades like the real
/// implementation's fallbacks.
pub struct ScriptedAi {
    intents: Mutex<Vec<ParsedIntent>>,
    semantic: bool,
    question_answer: Option<QuestionAnswer>,
}

impl ScriptedAi {
    pub fn new() -> Self {
        Self {
            intents: Mutex::new(Vec::new()),
            semantic: false,
            question_answer: None,
        }
    }

    pub fn semantic_verdict(mut self, verdict: bool) -> Self {
        self.semantic = verdict;
        self
    }

    pub fn with_question(mut self, question: &str, answer: &str) -> Self {
        self.question_answer = Some(QuestionAnswer {
            question: question.to_string(),
            answer: answer.to_string(),
        });
        self
    }

    pub fn push_intent(&self, action: IntentAction, params: IntentParams) {
        self.intents.lock().unwrap().push(ParsedIntent {
            action,
            params,
            message: String::new(),
        });
    }
}

impl Default for ScriptedAi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DeezaAi for ScriptedAi {
    async fn parse_intent(&self, _text: &str, _active_flow: Option<&str>) -> ParsedIntent {
        let mut intents = self.intents.lock().unwrap();
        if intents.is_empty() {
            ParsedIntent::fallback()
        } else {
            intents.remove(0)
        }
    }

    async fn judge_semantic(&self, _user_answer: &str, _expected: &str) -> Judgment {
        Judgment {
            correct: self.semantic,
            reason: "scripted".to_string(),
        }
    }

    async fn proof_to_question(&self, proof: &str) -> QuestionAnswer {
        self.question_answer.clone().unwrap_or_else(|| QuestionAnswer {
            question: proof.to_string(),
            answer: proof.to_string(),
        })
    }

    async fn classify_confirmation(&self, _text: &str) -> ConfirmVerdict {
        // Force the orchestrator down its keyword fallback path.
        ConfirmVerdict::Unclear
    }

    async fn enhance_message(&self, message: &str) -> String {
        message.to_string()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CreatedGift {
    pub id: B256,
    pub code: String,
    pub content_link: String,
    pub recipient: Address,
    pub token: Address,
    pub amount: U256,
}

/// In-memory gift contract with injectable failures.
#[derive(Default)]
pub struct FakeChain {
    pub gifts: Mutex<HashMap<B256, GiftRecord>>,
    pub created: Mutex<Vec<CreatedGift>>,
    pub released: Mutex<Vec<B256>>,
    pub extended: Mutex<Vec<(B256, u64)>>,
    pub minted: Mutex<Vec<(Address, U256)>>,
    pub now: u64,
    pub fail_create: Mutex<Option<ChainError>>,
    pub fail_release: Mutex<Option<ChainError>>,
}

impl FakeChain {
    pub fn new() -> Self {
        Self {
            now: 1_000_000,
            ..Default::default()
        }
    }

    pub fn insert_gift(&self, id: B256, gift: GiftRecord) {
        self.gifts.lock().unwrap().insert(id, gift);
    }
}

#[async_trait]
impl GiftChain for FakeChain {
    async fn create_gift(
        &self,
        id: B256,
        code: &str,
        content_link: &str,
        recipient: Address,
        token: Address,
        amount: U256,
    ) -> Result<B256, ChainError> {
        if let Some(error) = self.fail_create.lock().unwrap().clone() {
            return Err(error);
        }
        self.created.lock().unwrap().push(CreatedGift {
            id,
            code: code.to_string(),
            content_link: content_link.to_string(),
            recipient,
            token,
            amount,
        });
        self.gifts.lock().unwrap().insert(
            id,
            GiftRecord {
                gifter: Address::repeat_byte(0xEE),
                recipient,
                token,
                amount,
                code: code.to_string(),
                content_link: content_link.to_string(),
                claimer: Address::ZERO,
                claim_deadline: 0,
                attempts: 0,
                deposited: false,
                claimed: false,
            },
        );
        Ok(B256::repeat_byte(0x11))
    }

    async fn release(&self, id: B256) -> Result<B256, ChainError> {
        if let Some(error) = self.fail_release.lock().unwrap().clone() {
            return Err(error);
        }
        let mut gifts = self.gifts.lock().unwrap();
        let gift = gifts.get_mut(&id).ok_or(ChainError::NotFound)?;
        if gift.claimed {
            return Err(ChainError::AlreadyClaimed);
        }
        gift.claimed = true;
        self.released.lock().unwrap().push(id);
        Ok(B256::repeat_byte(0x22))
    }

    async fn extend_claim_time(&self, id: B256, minutes: u64) -> Result<B256, ChainError> {
        self.extended.lock().unwrap().push((id, minutes));
        if let Some(gift) = self.gifts.lock().unwrap().get_mut(&id) {
            gift.claim_deadline = self.now + minutes * 60;
        }
        Ok(B256::repeat_byte(0x33))
    }

    async fn get_gift(&self, id: B256) -> Result<GiftRecord, ChainError> {
        self.gifts
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(ChainError::NotFound)
    }

    async fn gifts_by_gifter(&self, gifter: Address) -> Result<Vec<GiftRecord>, ChainError> {
        Ok(self
            .gifts
            .lock()
            .unwrap()
            .values()
            .filter(|g| g.gifter == gifter)
            .cloned()
            .collect())
    }

    async fn gifts_by_recipient(&self, recipient: Address) -> Result<Vec<GiftRecord>, ChainError> {
        Ok(self
            .gifts
            .lock()
            .unwrap()
            .values()
            .filter(|g| g.recipient == recipient)
            .cloned()
            .collect())
    }

    async fn block_timestamp(&self) -> Result<u64, ChainError> {
        Ok(self.now)
    }

    async fn native_balance(&self, _address: Address) -> Result<U256, ChainError> {
        Ok(U256::from(5u64) * U256::from(10u64).pow(U256::from(18u64)))
    }

    async fn token_balance(&self, _token: Address, _address: Address) -> Result<U256, ChainError> {
        Ok(U256::ZERO)
    }

    async fn mint_bonus(&self, to: Address, amount: U256) -> Result<B256, ChainError> {
        self.minted.lock().unwrap().push((to, amount));
        Ok(B256::repeat_byte(0x44))
    }
}

/// In-memory content store with an injectable upload failure.
#[derive(Default)]
pub struct FakeContent {
    pub blobs: Mutex<HashMap<String, ContentBlob>>,
    pub fail_put: Mutex<bool>,
}

impl FakeContent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, link: &str, blob: ContentBlob) {
        self.blobs.lock().unwrap().insert(link.to_string(), blob);
    }
}

#[async_trait]
impl ContentStore for FakeContent {
    async fn put(&self, blob: &ContentBlob) -> Result<String> {
        if *self.fail_put.lock().unwrap() {
            return Err(anyhow!("upload unavailable"));
        }
        let mut blobs = self.blobs.lock().unwrap();
        let link = format!("https://gateway.test/ipfs/blob{}", blobs.len());
        blobs.insert(link.clone(), blob.clone());
        Ok(link)
    }

    async fn get(&self, link: &str) -> Result<ContentBlob> {
        self.blobs
            .lock()
            .unwrap()
            .get(link)
            .cloned()
            .ok_or_else(|| anyhow!("blob not found: {}", link))
    }
}

/// Static symbol table plus fixed pool prices.
#[derive(Default)]
pub struct FakeTokens {
    pub tokens: HashMap<String, TokenInfo>,
    pub prices: HashMap<String, f64>,
}

impl FakeTokens {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, symbol: &str, address: Address, pool: Option<&str>) -> Self {
        self.tokens.insert(
            symbol.to_uppercase(),
            TokenInfo {
                token_address: address.to_string(),
                token_symbol: symbol.to_uppercase(),
                token_name: symbol.to_string(),
                pool_address: pool.map(|p| p.to_string()),
                liquidity: 1_000_000.0,
            },
        );
        self
    }

    pub fn with_price(mut self, pool: &str, price: f64) -> Self {
        self.prices.insert(pool.to_string(), price);
        self
    }
}

#[async_trait]
impl TokenLookup for FakeTokens {
    async fn search_token(&self, query: &str) -> Result<Option<TokenInfo>> {
        Ok(self.tokens.get(&query.to_uppercase()).cloned())
    }

    async fn pool_price_usd(&self, pool_address: &str) -> Result<Option<f64>> {
        Ok(self.prices.get(pool_address).copied())
    }
}
