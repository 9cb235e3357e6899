use serde::Deserialize;

/// Closed action vocabulary the intent parser maps onto.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntentAction {
    RegisterWallet,
    SendGift,
    SetProof,
    ClaimGift,
    ShowGifts,
    Chat,
}

impl IntentAction {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "register_wallet" => Some(Self::RegisterWallet),
            "send_gift" => Some(Self::SendGift),
            "set_proof" => Some(Self::SetProof),
            "claim_gift" => Some(Self::ClaimGift),
            "show_gifts" => Some(Self::ShowGifts),
            "chat" => Some(Self::Chat),
            _ => None,
        }
    }
}

/// Parameters extracted alongside the action. All optional; the orchestrator
/// treats them as untrusted and re-validates everything.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct IntentParams {
    pub recipient: Option<String>,
    pub amount: Option<f64>,
    pub amount_usd: Option<f64>,
    pub token: Option<String>,
    pub code: Option<String>,
    pub proof: Option<String>,
    #[serde(rename = "type")]
    pub list_kind: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParsedIntent {
    pub action: IntentAction,
    pub params: IntentParams,
    pub message: String,
}

impl ParsedIntent {
    /// Deterministic fallback when the model produces nothing usable.
    pub fn fallback() -> Self {
        Self {
            action: IntentAction::Chat,
            params: IntentParams::default(),
            message: "I had trouble understanding that. Can you try rephrasing?".to_string(),
        }
    }
}

/// Raw wire shape of the model's intent JSON before validation.
#[derive(Debug, Deserialize)]
pub struct RawIntent {
    pub action: String,
    #[serde(default)]
    pub params: IntentParams,
    #[serde(default)]
    pub message: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Judgment {
    pub correct: bool,
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct RawJudgment {
    pub correct: bool,
    #[serde(default)]
    pub reason: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct QuestionAnswer {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Deserialize)]
pub struct RawQuestionAnswer {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfirmVerdict {
    Confirm,
    Cancel,
    Unclear,
}

#[derive(Debug, Deserialize)]
pub struct RawConfirm {
    #[serde(rename = "isConfirm", default)]
    pub is_confirm: bool,
    #[serde(rename = "isCancel", default)]
    pub is_cancel: bool,
}
