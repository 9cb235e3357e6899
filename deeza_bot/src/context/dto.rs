use alloy_primitives::B256;
use serde::{Deserialize, Serialize};

/// Everything gathered while building a gift, before it exists on chain.
/// Lives only inside the sender's conversation context.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GiftDraft {
    pub recipient: String,
    pub recipient_wallet: String,
    pub recipient_chat_id: Option<i64>,
    pub amount: f64,
    pub token: String,
    /// None means the chain's native token (zero-address sentinel on chain).
    pub token_address: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub gift_id: Option<B256>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub expected_answer: Option<String>,
    #[serde(default)]
    pub proofs: Vec<String>,
    #[serde(default)]
    pub content_link: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Claim attempt in progress: what was asked, what counts as correct and how
/// many strikes the claimer already has.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ClaimSession {
    pub gift_id: B256,
    pub code: String,
    pub question: String,
    pub expected_answers: Vec<String>,
    pub attempts: u8,
    pub recipient_wallet: String,
    /// Set when a release failed transiently; lets the user retry with a bare
    /// "yes" instead of answering the question again.
    #[serde(default)]
    pub pending_release: bool,
}

/// Which multi-turn flow the user is in, with the data gathered so far.
/// No variant means idle (free-text intent parsing applies).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum FlowState {
    RegisterWallet,
    RegisterWalletConfirm {
        old_address: String,
        new_address: String,
    },
    SendGiftProof(GiftDraft),
    SendGiftMessage(GiftDraft),
    SendGiftConfirm(GiftDraft),
    ClaimGift(ClaimSession),
}

impl FlowState {
    pub fn describe(&self) -> &'static str {
        match self {
            FlowState::RegisterWallet => "wallet registration",
            FlowState::RegisterWalletConfirm { .. } => "wallet update confirmation",
            FlowState::SendGiftProof(_) => "gift creation (proof setup)",
            FlowState::SendGiftMessage(_) => "gift creation (message)",
            FlowState::SendGiftConfirm(_) => "gift creation (final confirmation)",
            FlowState::ClaimGift(_) => "gift claim",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConversationContext {
    pub chat_id: i64,
    pub state: FlowState,
    pub updated_at: i64,
}

/// Single-slot quick action with a short shelf life, used by the TTL'd flow
/// family (quick actions) as opposed to the indefinite gift contexts.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PendingAction {
    pub action: String,
    pub created_at: i64,
}
