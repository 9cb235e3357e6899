use anyhow::Result;
use async_trait::async_trait;
use open_ai_rust_responses_by_sshift::{Client as OAIClient, Model, Request};
use serde::de::DeserializeOwned;

use crate::ai::dto::{
    ConfirmVerdict, IntentAction, Judgment, ParsedIntent, QuestionAnswer, RawConfirm, RawIntent,
    RawJudgment, RawQuestionAnswer,
};
use crate::ai::prompt;
use crate::ai::DeezaAi;

/// OpenAI-backed implementation of the Deeza model calls.
#[derive(Clone)]
pub struct AI {
    openai_client: OAIClient,
    intent_instructions: String,
}

impl AI {
    pub fn new(openai_api_key: &str, native_token: &str) -> Result<Self> {
        let openai_client = OAIClient::new(openai_api_key)?;
        Ok(Self {
            openai_client,
            intent_instructions: prompt::intent_instructions(native_token),
        })
    }

    async fn complete(&self, model: Model, input: String, max_tokens: u32) -> Result<String> {
        let request = Request::builder()
            .model(model)
            .input(input)
            .max_output_tokens(max_tokens)
            .temperature(0.2)
            .build();
        let response = self.openai_client.responses.create(request).await?;
        Ok(response.output_text().trim().to_string())
    }

    /// Pull the first JSON object out of a model reply and deserialize it.
    fn extract_json<T: DeserializeOwned>(text: &str) -> Option<T> {
        let start = text.find('{')?;
        let end = text.rfind('}')?;
        if end <= start {
            return None;
        }
        serde_json::from_str(&text[start..=end]).ok()
    }
}

#[async_trait]
impl DeezaAi for AI {
    async fn parse_intent(&self, text: &str, active_flow: Option<&str>) -> ParsedIntent {
        let mut input = self.intent_instructions.clone();
        if let Some(flow) = active_flow {
            input.push_str(&format!("\n\nContext: the user is in the {} flow.", flow));
        }
        input.push_str(&format!("\n\nUser message: {}", text));

        let raw = match self.complete(Model::GPT41, input, 500).await {
            Ok(output) => output,
            Err(e) => {
                log::error!("intent parse request failed: {}", e);
                return ParsedIntent::fallback();
            }
        };

        let Some(raw_intent) = Self::extract_json::<RawIntent>(&raw) else {
            return ParsedIntent::fallback();
        };
        let Some(action) = IntentAction::from_name(&raw_intent.action) else {
            return ParsedIntent::fallback();
        };
        ParsedIntent {
            action,
            params: raw_intent.params,
            message: raw_intent.message,
        }
    }

    async fn judge_semantic(&self, user_answer: &str, expected: &str) -> Judgment {
        let input = prompt::judge_prompt(expected, user_answer);
        let raw = match self.complete(Model::GPT41Nano, input, 200).await {
            Ok(output) => output,
            Err(e) => {
                log::error!("judge request failed: {}", e);
                return Judgment {
                    correct: false,
                    reason: "Error judging answer".to_string(),
                };
            }
        };
        match Self::extract_json::<RawJudgment>(&raw) {
            Some(verdict) => {
                log::info!(
                    "[judge] expected \"{}\", got \"{}\" -> {} ({})",
                    expected,
                    user_answer,
                    verdict.correct,
                    verdict.reason
                );
                Judgment {
                    correct: verdict.correct,
                    reason: verdict.reason,
                }
            }
            None => Judgment {
                correct: false,
                reason: "Failed to parse response".to_string(),
            },
        }
    }

    async fn proof_to_question(&self, proof: &str) -> QuestionAnswer {
        let fallback = QuestionAnswer {
            question: proof.to_string(),
            answer: proof.to_string(),
        };
        let input = prompt::proof_prompt(proof);
        let raw = match self.complete(Model::GPT41Nano, input, 100).await {
            Ok(output) => output,
            Err(e) => {
                log::error!("proof transform failed: {}", e);
                return fallback;
            }
        };
        match Self::extract_json::<RawQuestionAnswer>(&raw) {
            Some(qa) if !qa.question.is_empty() && !qa.answer.is_empty() => QuestionAnswer {
                question: qa.question,
                answer: qa.answer.to_lowercase(),
            },
            _ => fallback,
        }
    }

    async fn classify_confirmation(&self, text: &str) -> ConfirmVerdict {
        let input = prompt::confirm_prompt(text);
        let raw = match self.complete(Model::GPT41Nano, input, 100).await {
            Ok(output) => output,
            Err(e) => {
                log::error!("confirmation classify failed: {}", e);
                return ConfirmVerdict::Unclear;
            }
        };
        match Self::extract_json::<RawConfirm>(&raw) {
            Some(RawConfirm { is_cancel: true, .. }) => ConfirmVerdict::Cancel,
            Some(RawConfirm {
                is_confirm: true, ..
            }) => ConfirmVerdict::Confirm,
            _ => ConfirmVerdict::Unclear,
        }
    }

    async fn enhance_message(&self, message: &str) -> String {
        let input = prompt::enhance_prompt(message);
        match self.complete(Model::GPT41Nano, input, 150).await {
            Ok(enhanced) if !enhanced.is_empty() => {
                let trimmed = enhanced
                    .strip_prefix('"')
                    .and_then(|s| s.strip_suffix('"'))
                    .unwrap_or(&enhanced);
                trimmed.to_string()
            }
            Ok(_) => message.to_string(),
            Err(e) => {
                log::error!("message enhance failed: {}", e);
                message.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_ignores_surrounding_prose() {
        let raw = "Sure! Here you go:\n{\"correct\": true, \"reason\": \"same name\"}\nDone.";
        let verdict: RawJudgment = AI::extract_json(raw).unwrap();
        assert!(verdict.correct);
        assert_eq!(verdict.reason, "same name");
    }

    #[test]
    fn test_extract_json_rejects_garbage() {
        assert!(AI::extract_json::<RawJudgment>("no json here").is_none());
        assert!(AI::extract_json::<RawJudgment>("} backwards {").is_none());
    }

    #[test]
    fn test_intent_action_names() {
        assert_eq!(
            IntentAction::from_name("SEND_GIFT"),
            Some(IntentAction::SendGift)
        );
        assert_eq!(IntentAction::from_name("chat"), Some(IntentAction::Chat));
        assert_eq!(IntentAction::from_name("dance"), None);
    }
}
