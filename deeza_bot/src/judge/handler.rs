use std::sync::Arc;

use crate::ai::dto::Judgment;
use crate::ai::DeezaAi;

/// Decides whether a claimer's free-text answer satisfies an expected-answer
/// set. Cheap deterministic checks run first; only paraphrases reach the
/// semantic classifier.
#[derive(Clone)]
pub struct AnswerJudge {
    ai: Arc<dyn DeezaAi>,
}

impl AnswerJudge {
    pub fn new(ai: Arc<dyn DeezaAi>) -> Self {
        Self { ai }
    }

    pub async fn judge(&self, user_answer: &str, expected: &str) -> Judgment {
        let user_lower = user_answer.trim().to_lowercase();
        let expected_lower = expected.trim().to_lowercase();

        if user_lower == expected_lower {
            return Judgment {
                correct: true,
                reason: "Exact match".to_string(),
            };
        }

        if !user_lower.is_empty()
            && !expected_lower.is_empty()
            && (user_lower.contains(&expected_lower) || expected_lower.contains(&user_lower))
        {
            return Judgment {
                correct: true,
                reason: "Partial match".to_string(),
            };
        }

        self.ai.judge_semantic(user_answer, expected).await
    }

    /// Judge against every expected answer in order; the first correct
    /// verdict wins.
    pub async fn judge_any(&self, user_answer: &str, expected_answers: &[String]) -> Judgment {
        for expected in expected_answers {
            let judgment = self.judge(user_answer, expected).await;
            if judgment.correct {
                return judgment;
            }
        }
        Judgment {
            correct: false,
            reason: "No match".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::ScriptedAi;

    fn judge_with_semantic(verdict: bool) -> AnswerJudge {
        AnswerJudge::new(Arc::new(ScriptedAi::new().semantic_verdict(verdict)))
    }

    #[tokio::test]
    async fn test_exact_match_is_case_insensitive() {
        let judge = judge_with_semantic(false);
        let judgment = judge.judge("Charles", "charles").await;
        assert!(judgment.correct);
        assert_eq!(judgment.reason, "Exact match");
    }

    #[tokio::test]
    async fn test_substring_match_both_directions() {
        let judge = judge_with_semantic(false);
        assert!(judge.judge("my dog is Luna", "Luna").await.correct);
        assert!(judge.judge("luna", "her name is Luna").await.correct);
    }

    #[tokio::test]
    async fn test_semantic_fallback_verdict_is_authoritative() {
        let judge = judge_with_semantic(false);
        let judgment = judge.judge("blue", "red").await;
        assert!(!judgment.correct);

        let judge = judge_with_semantic(true);
        assert!(judge.judge("ny", "new york").await.correct);
    }

    #[tokio::test]
    async fn test_judge_any_short_circuits_on_first_correct() {
        let judge = judge_with_semantic(false);
        let expected = vec!["red".to_string(), "charles".to_string()];
        let judgment = judge.judge_any("Charles", &expected).await;
        assert!(judgment.correct);

        let judgment = judge.judge_any("green", &expected).await;
        assert!(!judgment.correct);
        assert_eq!(judgment.reason, "No match");
    }

    #[tokio::test]
    async fn test_empty_answer_never_matches_by_substring() {
        let judge = judge_with_semantic(false);
        assert!(!judge.judge("", "luna").await.correct);
    }
}
