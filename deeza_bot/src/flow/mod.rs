pub mod claim;
pub mod dto;
pub mod register;
pub mod send;
pub mod show;

use std::sync::Arc;

use anyhow::Result;

use crate::ai::dto::IntentAction;
use crate::ai::DeezaAi;
use crate::chain::GiftChain;
use crate::context::dto::FlowState;
use crate::context::handler::ContextStore;
use crate::flow::dto::{FlowConfig, Inbound, Reply};
use crate::gecko::TokenLookup;
use crate::ipfs::ContentStore;
use crate::judge::handler::AnswerJudge;
use crate::registry::dto::User;
use crate::registry::handler::UserRegistry;
use crate::utils::is_cancel_utterance;

/// The conversation orchestrator: one entry point per inbound message,
/// driving registration, gift creation, claiming and everything between
/// across the context store, the registry, the chain and the content store.
pub struct GiftFlow {
    pub(crate) users: UserRegistry,
    pub(crate) contexts: ContextStore,
    pub(crate) ai: Arc<dyn DeezaAi>,
    pub(crate) judge: AnswerJudge,
    pub(crate) chain: Arc<dyn GiftChain>,
    pub(crate) content: Arc<dyn ContentStore>,
    pub(crate) tokens: Arc<dyn TokenLookup>,
    pub(crate) config: FlowConfig,
}

impl GiftFlow {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        users: UserRegistry,
        contexts: ContextStore,
        ai: Arc<dyn DeezaAi>,
        chain: Arc<dyn GiftChain>,
        content: Arc<dyn ContentStore>,
        tokens: Arc<dyn TokenLookup>,
        config: FlowConfig,
    ) -> Self {
        let judge = AnswerJudge::new(ai.clone());
        Self {
            users,
            contexts,
            ai,
            judge,
            chain,
            content,
            tokens,
            config,
        }
    }

    pub async fn handle_message(&self, inbound: &Inbound) -> Result<Vec<Reply>> {
        let user = self.users.get_or_create(
            inbound.chat_id,
            &inbound.display_name,
            inbound.handle.as_deref(),
        )?;
        let text = inbound.text.trim();
        if text.is_empty() {
            return Ok(vec![]);
        }

        log::info!(
            "[flow] chat {} message: \"{}\"",
            inbound.chat_id,
            text
        );

        // Cancel words win over everything, in any state.
        if is_cancel_utterance(text) {
            return self.cancel(inbound.chat_id);
        }

        // An active context owns the message; free-text intent parsing only
        // runs when the user is idle.
        let context = self.contexts.get(inbound.chat_id);
        match context.map(|c| c.state) {
            Some(FlowState::ClaimGift(session)) => {
                self.handle_claim_answer(&user, inbound, session).await
            }
            Some(FlowState::RegisterWallet) => self.handle_wallet_input(&user, inbound).await,
            Some(FlowState::RegisterWalletConfirm {
                old_address,
                new_address,
            }) => {
                self.handle_change_confirm(&user, inbound, &old_address, &new_address)
                    .await
            }
            Some(FlowState::SendGiftProof(draft)) => self.handle_proof_step(inbound, draft).await,
            Some(FlowState::SendGiftMessage(draft)) => {
                self.handle_message_step(&user, inbound, draft).await
            }
            Some(FlowState::SendGiftConfirm(draft)) => {
                self.handle_confirm_step(&user, inbound, draft).await
            }
            None => self.handle_free_text(&user, inbound).await,
        }
    }

    /// Unconditional reset, shared by the `/cancel` command and the natural
    /// cancel words.
    pub fn cancel(&self, chat_id: i64) -> Result<Vec<Reply>> {
        match self.contexts.get(chat_id) {
            Some(context) => {
                self.contexts.clear(chat_id)?;
                Ok(vec![Reply::plain(
                    chat_id,
                    format!(
                        "✅ Cancelled {}. All state reset! 😉\n\nWhat would you like to do now?",
                        context.state.describe()
                    ),
                )])
            }
            None => Ok(vec![Reply::plain(
                chat_id,
                "Nothing to cancel - you're all clear! 😉\n\nNeed help? Try /start",
            )]),
        }
    }

    pub fn help_text(&self) -> String {
        let network_info = if self.config.is_testnet {
            format!(
                "🧪 TESTNET MODE\n• Native: {}\n• All tokens use ZAZZ (mock token)\n• Register wallet = 100k ZAZZ bonus! 🎁",
                self.config.native_symbol
            )
        } else {
            format!(
                "🌐 MAINNET\n• Native: {}\n• Real token addresses",
                self.config.native_symbol
            )
        };
        format!(
            "Hey there! I'm Deeza — your crypto bro for peer-to-peer gifts on Somnia. 😎\n\n{}\n\n📝 How it works:\n1. Gift crypto: \"gift @john 10 USDC\" or \"gift $20 worth of NIA to @mike\"\n2. Set proof: Tell me what they should prove (e.g., \"his dog's name is Luna\")\n3. They claim: Receiver says \"claim [code]\" and answers your question\n4. I judge: the answer has to match!\n\n💡 Examples:\n• \"gift @friend 5 {}\"\n• \"gift $100 JELLU to @bob\"\n• Or use: \"send\", \"give\", \"transfer\" - I understand them all!\n\n⚙️ Commands:\n• /help or /start - Show this message\n• /cancel - Reset any active process\n• Or just say \"cancel\" anytime!",
            network_info, self.config.native_symbol
        )
    }

    pub(crate) fn is_native_symbol(&self, token: &str) -> bool {
        let upper = token.to_uppercase();
        upper == "SOMI" || upper == "STT" || upper == self.config.native_symbol.to_uppercase()
    }

    /// No active context: keyword quick paths first, then the intent parser.
    pub(crate) async fn handle_free_text(&self, user: &User, inbound: &Inbound) -> Result<Vec<Reply>> {
        let lower = inbound.text.to_lowercase();

        if lower.contains("balance") {
            return self.show_balance(user, inbound).await;
        }
        if self.config.is_testnet
            && lower.contains("zazz")
            && (lower.contains("address") || lower.contains("token"))
        {
            if let Some(zazz) = &self.config.zazz_address {
                return Ok(vec![Reply::plain(
                    inbound.chat_id,
                    format!("🎁 ZAZZ Token Address:\n{}", zazz),
                )]);
            }
        }

        let intent = self.ai.parse_intent(&inbound.text, None).await;
        log::info!("[flow] chat {} intent: {:?}", inbound.chat_id, intent.action);

        match intent.action {
            IntentAction::RegisterWallet => self.start_registration(user, inbound).await,
            IntentAction::Chat if lower.contains("register") => {
                self.start_registration(user, inbound).await
            }
            IntentAction::SendGift => self.start_send_gift(user, inbound, &intent.params).await,
            IntentAction::ClaimGift => {
                self.start_claim(user, inbound, intent.params.code.as_deref())
                    .await
            }
            IntentAction::ShowGifts => {
                self.show_gifts(user, inbound, intent.params.list_kind.as_deref())
                    .await
            }
            IntentAction::SetProof => Ok(vec![Reply::plain(
                inbound.chat_id,
                "There's no gift in progress. Start one first, e.g. \"gift @friend 10 USDC\" 😉",
            )]),
            IntentAction::Chat => {
                let message = if intent.message.is_empty() {
                    "Hey! 😉 How can I help you today?".to_string()
                } else {
                    intent.message
                };
                Ok(vec![Reply::plain(inbound.chat_id, message)])
            }
        }
    }
}
