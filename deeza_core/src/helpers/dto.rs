use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

/// Mirror of the on-chain gift tuple. The contract is the source of truth;
/// this struct only carries what a read call returned.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GiftRecord {
    pub gifter: Address,
    pub recipient: Address,
    pub token: Address,
    pub amount: U256,
    pub code: String,
    pub content_link: String,
    pub claimer: Address,
    pub claim_deadline: u64,
    pub attempts: u8,
    pub deposited: bool,
    pub claimed: bool,
}

impl GiftRecord {
    pub fn exists(&self) -> bool {
        self.gifter != Address::ZERO || self.deposited
    }

    pub fn is_native(&self) -> bool {
        self.token == Address::ZERO
    }

    /// A gift can be claimed once funds are in and nobody has taken it,
    /// subject to any active lockout deadline.
    pub fn claimable(&self, now: u64) -> bool {
        self.deposited && !self.claimed && (self.claim_deadline == 0 || now >= self.claim_deadline)
    }
}

/// The id of a gift is the keccak hash of its human-typed code.
pub type GiftId = B256;

/// Off-chain payload stored next to each gift: the proof question, the
/// accepted answers and an optional personal message.
///
/// Older uploads carry a single `answer` string instead of a `proofs` array
/// and may omit `message` entirely; both shapes deserialize into this struct.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "ContentBlobWire", into = "ContentBlobWire")]
pub struct ContentBlob {
    pub question: String,
    pub expected_answers: Vec<String>,
    pub message: Option<String>,
    pub gifter: Option<String>,
    pub recipient: Option<String>,
}

impl ContentBlob {
    pub fn canonical_answer(&self) -> Option<&str> {
        self.expected_answers.first().map(|s| s.as_str())
    }
}

#[derive(Serialize, Deserialize)]
struct ContentBlobWire {
    #[serde(default)]
    question: String,
    #[serde(default)]
    answer: Option<serde_json::Value>,
    #[serde(default)]
    proofs: Option<Vec<String>>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    gifter: Option<String>,
    #[serde(default)]
    recipient: Option<String>,
}

impl From<ContentBlobWire> for ContentBlob {
    fn from(wire: ContentBlobWire) -> Self {
        let mut expected_answers = wire.proofs.unwrap_or_default();
        if expected_answers.is_empty() {
            expected_answers = match wire.answer {
                Some(serde_json::Value::String(s)) if !s.is_empty() => vec![s],
                Some(serde_json::Value::Array(items)) => items
                    .into_iter()
                    .filter_map(|v| v.as_str().map(|s| s.to_string()))
                    .collect(),
                _ => Vec::new(),
            };
        }
        Self {
            question: wire.question,
            expected_answers,
            message: wire.message.filter(|m| !m.trim().is_empty()),
            gifter: wire.gifter,
            recipient: wire.recipient,
        }
    }
}

impl From<ContentBlob> for ContentBlobWire {
    fn from(blob: ContentBlob) -> Self {
        Self {
            question: blob.question,
            answer: blob
                .expected_answers
                .first()
                .map(|s| serde_json::Value::String(s.clone())),
            proofs: Some(blob.expected_answers),
            message: blob.message,
            gifter: blob.gifter,
            recipient: blob.recipient,
        }
    }
}

/// Token metadata resolved from the market-data lookup.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenInfo {
    pub token_address: String,
    pub token_symbol: String,
    pub token_name: String,
    pub pool_address: Option<String>,
    pub liquidity: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_blob_reads_proofs_array() {
        let json = r#"{"question":"What is your dog's name?","proofs":["luna","moon"],"message":"happy bday"}"#;
        let blob: ContentBlob = serde_json::from_str(json).unwrap();
        assert_eq!(blob.expected_answers, vec!["luna", "moon"]);
        assert_eq!(blob.canonical_answer(), Some("luna"));
        assert_eq!(blob.message.as_deref(), Some("happy bday"));
    }

    #[test]
    fn test_content_blob_reads_legacy_answer_string() {
        let json = r#"{"question":"What is your dog's name?","answer":"luna"}"#;
        let blob: ContentBlob = serde_json::from_str(json).unwrap();
        assert_eq!(blob.expected_answers, vec!["luna"]);
        assert_eq!(blob.message, None);
    }

    #[test]
    fn test_content_blob_round_trip_keeps_both_shapes() {
        let blob = ContentBlob {
            question: "q".to_string(),
            expected_answers: vec!["a".to_string(), "b".to_string()],
            message: None,
            gifter: Some("alice".to_string()),
            recipient: Some("bob".to_string()),
        };
        let json = serde_json::to_value(blob.clone()).unwrap();
        assert_eq!(json["answer"], "a");
        assert_eq!(json["proofs"], serde_json::json!(["a", "b"]));
        let back: ContentBlob = serde_json::from_value(json).unwrap();
        assert_eq!(back, blob);
    }

    #[test]
    fn test_claimable_gates() {
        let mut gift = GiftRecord {
            gifter: Address::repeat_byte(1),
            recipient: Address::repeat_byte(2),
            token: Address::ZERO,
            amount: U256::from(10u64),
            code: "bob42".to_string(),
            content_link: "ipfs://x".to_string(),
            claimer: Address::ZERO,
            claim_deadline: 0,
            attempts: 0,
            deposited: false,
            claimed: false,
        };
        assert!(!gift.claimable(100));
        gift.deposited = true;
        assert!(gift.claimable(100));
        gift.claim_deadline = 200;
        assert!(!gift.claimable(100));
        assert!(gift.claimable(200));
        gift.claimed = true;
        assert!(!gift.claimable(500));
    }
}
