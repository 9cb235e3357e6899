//! Gift creation: recipient/amount/token validation, proof capture, the
//! optional message, the content upload and the final on-chain create.

use std::str::FromStr;

use alloy_primitives::Address;
use anyhow::Result;
use deeza_core::helpers::dto::ContentBlob;
use deeza_core::helpers::utils::{derive_gift_id, extract_wallet_address, generate_gift_code, short_address};

use crate::ai::dto::{ConfirmVerdict, IntentParams};
use crate::context::dto::{FlowState, GiftDraft};
use crate::flow::dto::{to_base_units, Inbound, Reply};
use crate::flow::GiftFlow;
use crate::registry::dto::User;
use crate::utils::{contains_cancel_word, contains_confirm_word, escape_html, is_skip};

impl GiftFlow {
    /// `send_gift` intent while idle: validate everything the parser
    /// extracted, then open the proof step.
    pub(crate) async fn start_send_gift(
        &self,
        user: &User,
        inbound: &Inbound,
        params: &IntentParams,
    ) -> Result<Vec<Reply>> {
        let chat_id = inbound.chat_id;

        if user.wallet().is_none() {
            return Ok(vec![Reply::plain(
                chat_id,
                "⚠️ You need to register your wallet first!\n\nSay \"register me\" and provide your wallet address. 😉",
            )]);
        }

        let recipient = params
            .recipient
            .as_deref()
            .map(|r| r.trim_start_matches('@').to_string())
            .unwrap_or_default();
        if recipient.is_empty() {
            return Ok(vec![Reply::plain(
                chat_id,
                "I need a recipient! Try: \"gift @john 10 USDC\" 😉",
            )]);
        }

        // A registered handle wins; otherwise accept an address pasted right
        // in the message.
        let recipient_user = self.users.get_by_handle(&recipient);
        let recipient_wallet = match recipient_user
            .as_ref()
            .and_then(|u| u.wallet().map(|w| w.to_string()))
        {
            Some(wallet) => wallet,
            None => match extract_wallet_address(&inbound.text) {
                Some(address) => address,
                None => {
                    return Ok(vec![Reply::plain(
                        chat_id,
                        format!(
                            "⚠️ @{} is not registered yet!\n\nThey need to register by saying \"register me\", OR you can provide their wallet address: \"gift @{} 5 USDC 0x...\"",
                            recipient, recipient
                        ),
                    )]);
                }
            },
        };

        let token = params.token.clone().unwrap_or_else(|| "USDC".to_string());

        let amount = if let Some(usd) = params.amount_usd {
            if self.config.is_testnet && token.eq_ignore_ascii_case("ZAZZ") {
                usd
            } else {
                match self.convert_usd_to_tokens(&token, usd).await {
                    Some(amount) => amount,
                    None => {
                        return Ok(vec![Reply::plain(
                            chat_id,
                            format!("Couldn't get price for {}. Try again.", token),
                        )]);
                    }
                }
            }
        } else {
            params.amount.unwrap_or(0.0)
        };

        if !amount.is_finite() || amount <= 0.0 {
            return Ok(vec![Reply::plain(
                chat_id,
                "I need an amount! Try: \"gift @john 10 USDC\" 😉",
            )]);
        }
        if amount > self.config.max_amount {
            return Ok(vec![Reply::plain(
                chat_id,
                format!(
                    "That's too generous - the maximum per gift is {} tokens. Try a smaller amount. 😉",
                    self.config.max_amount
                ),
            )]);
        }

        let token_address = match self.resolve_token_address(&token).await {
            Ok(address) => address,
            Err(reply) => return Ok(vec![Reply::plain(chat_id, reply)]),
        };

        let draft = GiftDraft {
            recipient: recipient.clone(),
            recipient_wallet,
            recipient_chat_id: recipient_user.map(|u| u.chat_id),
            amount,
            token,
            token_address,
            code: None,
            gift_id: None,
            question: None,
            expected_answer: None,
            proofs: Vec::new(),
            content_link: None,
            message: None,
        };
        self.contexts
            .save(chat_id, FlowState::SendGiftProof(draft))?;

        Ok(vec![Reply::plain(
            chat_id,
            format!("What should @{} prove?", recipient),
        )])
    }

    /// None = native token (zero address on chain). Err carries the
    /// user-facing explanation; lookup failures count as "not found".
    async fn resolve_token_address(
        &self,
        token: &str,
    ) -> std::result::Result<Option<String>, String> {
        let not_found = format!(
            "Couldn't find token {}. Make sure the symbol is correct.",
            token
        );
        if self.is_native_symbol(token) {
            return Ok(None);
        }
        if self.config.is_testnet {
            // Every ERC-20 request maps to the mock token on testnet.
            return self
                .config
                .zazz_address
                .clone()
                .map(Some)
                .ok_or(not_found);
        }
        match self.tokens.search_token(token).await {
            Ok(Some(info)) => Ok(Some(info.token_address)),
            Ok(None) => Err(not_found),
            Err(e) => {
                log::error!("token search failed: {}", e);
                Err(not_found)
            }
        }
    }

    async fn convert_usd_to_tokens(&self, token: &str, usd: f64) -> Option<f64> {
        let symbol = if self.is_native_symbol(token) {
            self.config.native_symbol.clone()
        } else {
            token.to_string()
        };
        let info = self.tokens.search_token(&symbol).await.ok().flatten()?;
        let pool = info.pool_address?;
        let price = self.tokens.pool_price_usd(&pool).await.ok().flatten()?;
        if price <= 0.0 {
            return None;
        }
        Some(usd / price)
    }

    /// `SendGiftProof`: any non-empty text is the proof statement.
    pub(crate) async fn handle_proof_step(
        &self,
        inbound: &Inbound,
        mut draft: GiftDraft,
    ) -> Result<Vec<Reply>> {
        let proof = inbound.text.trim();
        if proof.is_empty() {
            return Ok(vec![Reply::plain(
                inbound.chat_id,
                "Please provide the proof they need to answer. 😉",
            )]);
        }

        let qa = self.ai.proof_to_question(proof).await;
        let code = generate_gift_code(&draft.recipient);
        let gift_id = derive_gift_id(&code);
        log::info!(
            "[flow] chat {} proof -> question \"{}\", code {}",
            inbound.chat_id,
            qa.question,
            code
        );

        draft.code = Some(code);
        draft.gift_id = Some(gift_id);
        draft.question = Some(qa.question);
        draft.expected_answer = Some(qa.answer.to_lowercase());
        draft.proofs = vec![proof.to_string()];
        self.contexts
            .save(inbound.chat_id, FlowState::SendGiftMessage(draft))?;

        Ok(vec![Reply::plain(
            inbound.chat_id,
            "Great! 😉 Would you like to add a personal message to this gift? (optional)\n\nYou can say:\n• A message like \"Happy birthday!\" or \"Thanks for everything\"\n• Or just say \"skip\" or \"no\" to continue without a message",
        )])
    }

    /// `SendGiftMessage`: capture or skip the message, then upload the blob.
    /// An upload failure discards the draft; the link is required for every
    /// later step.
    pub(crate) async fn handle_message_step(
        &self,
        user: &User,
        inbound: &Inbound,
        mut draft: GiftDraft,
    ) -> Result<Vec<Reply>> {
        let chat_id = inbound.chat_id;
        let message = if is_skip(&inbound.text) {
            None
        } else {
            Some(inbound.text.trim().to_string())
        };

        let mut expected_answers = Vec::new();
        if let Some(answer) = &draft.expected_answer {
            expected_answers.push(answer.clone());
        }
        for proof in &draft.proofs {
            if !expected_answers.iter().any(|a| a == proof) {
                expected_answers.push(proof.clone());
            }
        }

        let blob = ContentBlob {
            question: draft.question.clone().unwrap_or_default(),
            expected_answers,
            message: message.clone(),
            gifter: user.handle.clone(),
            recipient: Some(draft.recipient.clone()),
        };

        let link = match self.content.put(&blob).await {
            Ok(link) => link,
            Err(e) => {
                log::error!("content upload failed: {}", e);
                self.contexts.clear(chat_id)?;
                return Ok(vec![Reply::plain(
                    chat_id,
                    format!("⚠️ Error uploading gift data: {}", e),
                )]);
            }
        };

        draft.content_link = Some(link);
        draft.message = message;
        let summary = self.confirmation_summary(&draft);
        self.contexts
            .save(chat_id, FlowState::SendGiftConfirm(draft))?;

        Ok(vec![Reply::html(chat_id, summary)])
    }

    fn confirmation_summary(&self, draft: &GiftDraft) -> String {
        let display_token = self.display_token_name(&draft.token);
        let recipient_info = if self.users.get_by_handle(&draft.recipient).is_some() {
            format!(
                "@{}\n📍 {}",
                draft.recipient,
                short_address(&draft.recipient_wallet)
            )
        } else {
            short_address(&draft.recipient_wallet)
        };
        let message_note = match &draft.message {
            Some(message) => format!("\n💬 <b>Message:</b> {}", escape_html(message)),
            None => String::new(),
        };
        let testnet_note = if self.config.is_testnet {
            "\n\n🧪 Testnet: All ERC20 tokens use ZAZZ mock token"
        } else {
            ""
        };
        format!(
            "🎁 <b>Gift Summary</b>\n\n<b>Recipient:</b> {}\n<b>Amount:</b> {} {}\n<b>Proof Required:</b> {}\n<b>Gift Code:</b> <code>{}</code>{}{}\n\nShall I create this gift? (yes/no)",
            escape_html(&recipient_info),
            draft.amount,
            display_token,
            escape_html(draft.question.as_deref().unwrap_or("")),
            draft.code.as_deref().unwrap_or(""),
            message_note,
            testnet_note
        )
    }

    pub(crate) fn display_token_name(&self, token: &str) -> String {
        if self.is_native_symbol(token) {
            self.config.native_symbol.clone()
        } else {
            token.to_uppercase()
        }
    }

    /// `SendGiftConfirm`: classify the reply, then create on chain. A
    /// transient network failure keeps the draft so a bare "yes" retries.
    pub(crate) async fn handle_confirm_step(
        &self,
        user: &User,
        inbound: &Inbound,
        draft: GiftDraft,
    ) -> Result<Vec<Reply>> {
        let chat_id = inbound.chat_id;
        let text = inbound.text.trim();

        let verdict = match self.ai.classify_confirmation(text).await {
            ConfirmVerdict::Unclear => {
                // Keyword fallback when the classifier can't decide.
                if contains_cancel_word(text) {
                    ConfirmVerdict::Cancel
                } else if contains_confirm_word(text) {
                    ConfirmVerdict::Confirm
                } else {
                    ConfirmVerdict::Unclear
                }
            }
            verdict => verdict,
        };

        match verdict {
            ConfirmVerdict::Cancel => {
                self.contexts.clear(chat_id)?;
                Ok(vec![Reply::plain(
                    chat_id,
                    "❌ Gift creation cancelled. No worries! 😉",
                )])
            }
            ConfirmVerdict::Unclear => Ok(vec![Reply::plain(
                chat_id,
                "I didn't catch that. Say 'yes' to create the gift or 'no' to cancel. 😉",
            )]),
            ConfirmVerdict::Confirm => self.create_gift_on_chain(user, inbound, draft).await,
        }
    }

    async fn create_gift_on_chain(
        &self,
        user: &User,
        inbound: &Inbound,
        draft: GiftDraft,
    ) -> Result<Vec<Reply>> {
        let chat_id = inbound.chat_id;

        let (Some(gift_id), Some(code), Some(content_link)) =
            (draft.gift_id, draft.code.clone(), draft.content_link.clone())
        else {
            self.contexts.clear(chat_id)?;
            return Ok(vec![Reply::plain(
                chat_id,
                "⚠️ This gift draft is incomplete. Please start over.",
            )]);
        };

        let Ok(recipient) = Address::from_str(&draft.recipient_wallet) else {
            self.contexts.clear(chat_id)?;
            return Ok(vec![Reply::plain(
                chat_id,
                format!(
                    "⚠️ Recipient @{} doesn't have a valid wallet!\n\nThey need to register first with: \"register me\"",
                    draft.recipient
                ),
            )]);
        };
        let token_address = match &draft.token_address {
            Some(address) => Address::from_str(address).unwrap_or(Address::ZERO),
            None => Address::ZERO,
        };
        let amount_units = to_base_units(draft.amount);

        log::info!(
            "[flow] creating gift {} for {} ({} {})",
            code,
            draft.recipient,
            draft.amount,
            draft.token
        );

        if let Err(error) = self
            .chain
            .create_gift(
                gift_id,
                &code,
                &content_link,
                recipient,
                token_address,
                amount_units,
            )
            .await
        {
            if error.is_retryable() {
                // Keep the draft so the user can re-confirm once the network
                // settles.
                return Ok(vec![Reply::plain(
                    chat_id,
                    "⚠️ RPC timeout - Somnia network is slow right now.\n\nYour gift data is saved! Try again in a moment with: \"yes\"",
                )]);
            }
            self.contexts.clear(chat_id)?;
            return Ok(vec![Reply::plain(
                chat_id,
                format!("⚠️ Error creating gift: {}", error),
            )]);
        }

        self.contexts.clear(chat_id)?;

        let display_token = self.display_token_name(&draft.token);
        let mut replies = Vec::new();

        let recipient_notified = if let Some(recipient_chat) = draft.recipient_chat_id {
            replies.push(Reply::notice(
                recipient_chat,
                format!(
                    "🎁 <b>You received a gift from @{}!</b>\n\n💰 Amount: {} {}\n🔐 Code: <code>{}</code>\n\nTo claim it, say: \"claim {}\" 😉",
                    user.handle.as_deref().unwrap_or(&user.display_name),
                    draft.amount,
                    display_token,
                    code,
                    code
                ),
            ));
            true
        } else {
            false
        };

        let token_display = match &draft.token_address {
            Some(address) => address.clone(),
            None => format!("NATIVE token ({})", self.config.native_symbol),
        };
        let notified_note = if recipient_notified {
            "✉️ Recipient has been notified!"
        } else {
            "⚠️ Recipient is not registered - share the code with them!"
        };
        replies.push(Reply::html(
            chat_id,
            format!(
                "✅ <b>Gift Created Successfully!</b>\n\n📦 <b>Deposit your {} here:</b>\n{}\n\n🎁 <b>Gift Code:</b> <code>{}</code>\n💰 <b>Amount:</b> {} {}\n👤 <b>Recipient:</b> @{}\n📍 <b>Token:</b> {}\n\n{}\n\n<b>Next Step:</b> Paste your code on the deposit page to send the funds!",
                display_token,
                self.config.deposit_url,
                code,
                draft.amount,
                display_token,
                draft.recipient,
                token_display,
                notified_note
            ),
        ));
        Ok(replies)
    }
}
