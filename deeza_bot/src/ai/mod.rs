pub mod dto;
pub mod handler;
pub mod prompt;

use async_trait::async_trait;

use crate::ai::dto::{ConfirmVerdict, Judgment, ParsedIntent, QuestionAnswer};

/// Every model call the orchestrator makes, behind one seam so the state
/// machine is testable with a scripted stand-in. Implementations must never
/// error out of these methods: malformed model output degrades to the
/// deterministic fallback baked into each return type.
#[async_trait]
pub trait DeezaAi: Send + Sync {
    /// Map free text onto the closed action vocabulary. Falls back to
    /// `chat` with a generic message when the model output is unusable.
    async fn parse_intent(&self, text: &str, active_flow: Option<&str>) -> ParsedIntent;

    /// Lenient semantic equivalence check, used only after the exact and
    /// substring heuristics have failed. Falls back to incorrect.
    async fn judge_semantic(&self, user_answer: &str, expected: &str) -> Judgment;

    /// Turn a gifter's proof statement ("his dog's name is Luna") into a
    /// recipient-facing question and canonical answer. Falls back to using
    /// the statement for both.
    async fn proof_to_question(&self, proof: &str) -> QuestionAnswer;

    /// Is this reply a confirmation, a cancellation or neither? Falls back
    /// to `Unclear`, which the orchestrator resolves with keyword matching.
    async fn classify_confirmation(&self, text: &str) -> ConfirmVerdict;

    /// Cosmetic warm-up of a gifter's message for the claim success screen.
    /// Falls back to the original text.
    async fn enhance_message(&self, message: &str) -> String;
}
