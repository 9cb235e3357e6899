//! Claiming: eligibility gates, answer judging, the wrong-wallet guard,
//! release retries and the three-strikes lockout.

use anyhow::Result;
use deeza_core::helpers::error::ChainError;
use deeza_core::helpers::utils::{derive_gift_id, format_lockout, short_address};
use rand::Rng;

use crate::context::dto::{ClaimSession, FlowState};
use crate::flow::dto::{Inbound, Reply};
use crate::flow::GiftFlow;
use crate::registry::dto::User;
use crate::utils::{contains_confirm_word, format_units};

const ENCOURAGEMENTS: &[&str] = &[
    "😏 Nice try! But nope, that's not quite right. {left} - you got this! 💪",
    "🤔 Hmm, not quite right! {left} remaining. Think harder! 🧠",
    "😄 Almost there but not quite! {left} left. Keep going! 🚀",
];

impl GiftFlow {
    /// `claim_gift` intent: run every eligibility gate before any claim
    /// context exists, then ask the question.
    pub(crate) async fn start_claim(
        &self,
        user: &User,
        inbound: &Inbound,
        code: Option<&str>,
    ) -> Result<Vec<Reply>> {
        let chat_id = inbound.chat_id;

        let Some(code) = code.map(str::trim).filter(|c| !c.is_empty()) else {
            return Ok(vec![Reply::plain(
                chat_id,
                "I need a gift code! Try: \"claim john42\" 😉",
            )]);
        };
        let Some(wallet) = user.wallet() else {
            return Ok(vec![Reply::plain(
                chat_id,
                "⚠️ You need to register your wallet first!\n\nSay \"register me\" and provide your wallet address. 😉",
            )]);
        };

        let gift_id = derive_gift_id(code);
        let gift = match self.chain.get_gift(gift_id).await {
            Ok(gift) => gift,
            Err(ChainError::NotFound) => {
                return Ok(vec![Reply::plain(
                    chat_id,
                    "🤔 Gift not found. Double-check that code - maybe a typo? 😉",
                )]);
            }
            Err(e) => {
                log::error!("gift fetch failed: {}", e);
                return Ok(vec![Reply::plain(
                    chat_id,
                    "😕 Error fetching gift details. The network might be slow - try again in a moment! 😉",
                )]);
            }
        };

        if gift.claimed {
            return Ok(vec![Reply::plain(
                chat_id,
                "🎁 This gift has already been claimed! Someone beat you to it. 😅",
            )]);
        }
        if !gift.deposited {
            return Ok(vec![Reply::plain(
                chat_id,
                "⏳ Gift not deposited yet. Wait for the gifter to deposit the funds first! 😉",
            )]);
        }
        if gift.claim_deadline > 0 {
            // Chain time, not wall-clock: the lockout deadline was set by the
            // contract against block timestamps.
            let now = match self.chain.block_timestamp().await {
                Ok(now) => now,
                Err(e) => {
                    log::error!("block timestamp fetch failed: {}", e);
                    return Ok(vec![Reply::plain(
                        chat_id,
                        "😕 Error fetching gift details. The network might be slow - try again in a moment! 😉",
                    )]);
                }
            };
            if now < gift.claim_deadline {
                return Ok(vec![Reply::plain(
                    chat_id,
                    format!(
                        "🔒 You're locked out from wrong answers! Wait {} before trying again. 😉",
                        format_lockout(gift.claim_deadline - now)
                    ),
                )]);
            }
        }

        let blob = match self.content.get(&gift.content_link).await {
            Ok(blob) => blob,
            Err(e) => {
                log::error!("content fetch failed: {}", e);
                return Ok(vec![Reply::plain(
                    chat_id,
                    "😕 Error fetching gift details. The network might be slow - try again in a moment! 😉",
                )]);
            }
        };
        if blob.expected_answers.is_empty() {
            return Ok(vec![Reply::plain(
                chat_id,
                "⚠️ Error: this gift has no proof configured. Contact the gifter.",
            )]);
        }

        let question = if blob.question.is_empty() {
            "What's the proof?".to_string()
        } else {
            blob.question.clone()
        };
        let session = ClaimSession {
            gift_id,
            code: code.to_string(),
            question: question.clone(),
            expected_answers: blob.expected_answers,
            attempts: gift.attempts,
            recipient_wallet: wallet.to_string(),
            pending_release: false,
        };
        self.contexts
            .save(chat_id, FlowState::ClaimGift(session))?;

        Ok(vec![Reply::plain(
            chat_id,
            format!(
                "Alright mate! 😉 To claim this gift, you'll need to answer a question. Here we go:\n\n{}",
                question
            ),
        )])
    }

    /// `ClaimGift` context: judge the answer, or retry a stuck release on a
    /// bare confirmation.
    pub(crate) async fn handle_claim_answer(
        &self,
        user: &User,
        inbound: &Inbound,
        session: ClaimSession,
    ) -> Result<Vec<Reply>> {
        let chat_id = inbound.chat_id;
        let answer = inbound.text.trim();

        // A failed release stays retryable without re-asking the question.
        if session.pending_release && contains_confirm_word(answer) {
            return self.try_release(inbound, session).await;
        }

        let judgment = self.judge.judge_any(answer, &session.expected_answers).await;
        log::info!(
            "[flow] chat {} claim answer for {}: correct={} ({})",
            chat_id,
            session.code,
            judgment.correct,
            judgment.reason
        );

        if judgment.correct {
            // Prefer the wallet captured at claim start, fall back to the
            // registration. A mismatch means the claim belongs elsewhere.
            let resolved_wallet = if session.recipient_wallet.is_empty() {
                user.wallet().unwrap_or_default().to_string()
            } else {
                session.recipient_wallet.clone()
            };
            if resolved_wallet.is_empty() {
                self.contexts.clear(chat_id)?;
                return Ok(vec![Reply::plain(
                    chat_id,
                    "⚠️ Error: Recipient wallet not found. Contact support.",
                )]);
            }
            if let Some(wallet) = user.wallet() {
                if !resolved_wallet.eq_ignore_ascii_case(wallet) {
                    self.contexts.clear(chat_id)?;
                    return Ok(vec![Reply::plain(
                        chat_id,
                        format!(
                            "⚠️ This gift is for a different wallet address. You're claiming from {} but the gift is for {}.",
                            short_address(wallet),
                            short_address(&resolved_wallet)
                        ),
                    )]);
                }
            }
            return self.try_release(inbound, session).await;
        }

        let attempts = session.attempts + 1;
        if attempts >= self.config.max_wrong_attempts {
            // Third strike: contract-level lockout, best-effort.
            if let Err(e) = self
                .chain
                .extend_claim_time(session.gift_id, self.config.lockout_minutes)
                .await
            {
                log::error!("extend claim time failed: {}", e);
            }
            self.contexts.clear(chat_id)?;
            return Ok(vec![Reply::plain(
                chat_id,
                format!(
                    "😅 Oops! Wrong answer {} times. Locked for {} minutes - give it another shot later! 😉",
                    attempts, self.config.lockout_minutes
                ),
            )]);
        }

        let mut updated = session;
        updated.attempts = attempts;
        self.contexts
            .save(chat_id, FlowState::ClaimGift(updated))?;

        let remaining = self.config.max_wrong_attempts - attempts;
        let left = if remaining == 1 {
            "1 more attempt".to_string()
        } else {
            format!("{} more attempts", remaining)
        };
        let pick = rand::thread_rng().gen_range(0..ENCOURAGEMENTS.len());
        Ok(vec![Reply::plain(
            chat_id,
            ENCOURAGEMENTS[pick].replace("{left}", &left),
        )])
    }

    /// Release the gift. Terminal rejections clear the context; transient
    /// errors keep it with `pending_release` so a bare "yes" retries.
    async fn try_release(&self, inbound: &Inbound, session: ClaimSession) -> Result<Vec<Reply>> {
        let chat_id = inbound.chat_id;

        // An already-claimed gift is an expected race outcome, not an error.
        let gift = match self.chain.get_gift(session.gift_id).await {
            Ok(gift) => {
                if gift.claimed {
                    self.contexts.clear(chat_id)?;
                    return Ok(vec![Reply::plain(
                        chat_id,
                        "⚠️ This gift has already been claimed! Someone beat you to it. 😅",
                    )]);
                }
                Some(gift)
            }
            Err(ChainError::NotFound) => {
                self.contexts.clear(chat_id)?;
                return Ok(vec![Reply::plain(
                    chat_id,
                    "🤔 Gift not found anymore. Please try claiming again.",
                )]);
            }
            Err(_) => None,
        };

        match self.chain.release(session.gift_id).await {
            Ok(tx_hash) => {
                let mut success = String::from("🎉 BOOM! Correct answer! Gift claimed successfully! 🚀");
                if let Some(gift) = &gift {
                    let token_name = if gift.is_native() {
                        self.config.native_symbol.clone()
                    } else if self.config.is_testnet {
                        "ZAZZ".to_string()
                    } else {
                        "TOKEN".to_string()
                    };
                    success.push_str(&format!(
                        "\n\n💰 You received: {} {}",
                        format_units(gift.amount, 18),
                        token_name
                    ));
                }
                success.push_str(&format!(
                    "\n\n🔗 View transaction: {}/tx/{}",
                    self.config.explorer_url, tx_hash
                ));

                // The gifter's message is a cosmetic extra; failures here must
                // never block the success report.
                if let Some(gift) = &gift {
                    if let Ok(blob) = self.content.get(&gift.content_link).await {
                        if let Some(message) = blob.message.filter(|m| !m.trim().is_empty()) {
                            let warmed = self.ai.enhance_message(&message).await;
                            success.push_str(&format!(
                                "\n\n💬 Message from the gifter:\n\"{}\"",
                                warmed
                            ));
                        }
                    }
                }

                self.contexts.clear(chat_id)?;
                Ok(vec![Reply::plain(chat_id, success)])
            }
            Err(ChainError::LockedOut(_)) => {
                self.contexts.clear(chat_id)?;
                Ok(vec![Reply::plain(
                    chat_id,
                    "🔒 Oops! You're still locked out from wrong answers. Wait a bit and try again later! 😉",
                )])
            }
            Err(ChainError::Unauthorized) => {
                self.contexts.clear(chat_id)?;
                Ok(vec![Reply::plain(
                    chat_id,
                    "⚠️ Bot configuration error. Contact support.",
                )])
            }
            Err(ChainError::AlreadyClaimed) => {
                self.contexts.clear(chat_id)?;
                Ok(vec![Reply::plain(
                    chat_id,
                    "⚠️ This gift has already been claimed! Someone beat you to it. 😅",
                )])
            }
            Err(error) => {
                let mut retryable = session;
                retryable.pending_release = true;
                self.contexts
                    .save(chat_id, FlowState::ClaimGift(retryable))?;
                Ok(vec![Reply::plain(
                    chat_id,
                    format!(
                        "😕 Error releasing gift: {}. Say \"yes\" to try again in a moment!",
                        error
                    ),
                )])
            }
        }
    }
}
