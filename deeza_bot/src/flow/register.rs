//! Wallet registration: address collection, change confirmation and the
//! one-time testnet bonus.

use std::str::FromStr;

use alloy_primitives::Address;
use anyhow::Result;
use deeza_core::helpers::utils::{extract_wallet_address, short_address};

use crate::context::dto::FlowState;
use crate::flow::dto::{Inbound, Reply};
use crate::flow::GiftFlow;
use crate::registry::dto::User;
use crate::utils::{contains_cancel_word, contains_confirm_word};

impl GiftFlow {
    pub(crate) async fn start_registration(
        &self,
        user: &User,
        inbound: &Inbound,
    ) -> Result<Vec<Reply>> {
        // Fast path: the address is already in the message.
        if let Some(address) = extract_wallet_address(&inbound.text) {
            return self.register_address(user, inbound, &address).await;
        }
        self.contexts
            .save(inbound.chat_id, FlowState::RegisterWallet)?;
        Ok(vec![Reply::plain(
            inbound.chat_id,
            "Okay cool, what's your wallet address? 😉",
        )])
    }

    /// Active `RegisterWallet` context: expect an address, but let the user
    /// escape into another flow instead of trapping them here.
    pub(crate) async fn handle_wallet_input(
        &self,
        user: &User,
        inbound: &Inbound,
    ) -> Result<Vec<Reply>> {
        let lower = inbound.text.trim().to_lowercase();
        let is_send = ["send ", "transfer ", "give ", "gift "]
            .iter()
            .any(|p| lower.starts_with(p));
        let is_claim = lower.starts_with("claim ");
        let is_other = ["show", "balance", "help"]
            .iter()
            .any(|p| lower.starts_with(p));
        if is_send || is_claim || (is_other && !lower.contains("register")) {
            self.contexts.clear(inbound.chat_id)?;
            return self.handle_free_text(user, inbound).await;
        }

        match extract_wallet_address(&inbound.text) {
            Some(address) => self.register_address(user, inbound, &address).await,
            None => Ok(vec![Reply::plain(
                inbound.chat_id,
                "Please provide a valid wallet address (starts with 0x followed by 40 characters), or say 'cancel' to stop. 😉",
            )]),
        }
    }

    async fn register_address(
        &self,
        user: &User,
        inbound: &Inbound,
        address: &str,
    ) -> Result<Vec<Reply>> {
        if let Some(existing) = user.wallet() {
            if !existing.eq_ignore_ascii_case(address) {
                self.contexts.save(
                    inbound.chat_id,
                    FlowState::RegisterWalletConfirm {
                        old_address: existing.to_string(),
                        new_address: address.to_string(),
                    },
                )?;
                return Ok(vec![Reply::plain(
                    inbound.chat_id,
                    format!(
                        "⚠️ You already have a wallet registered:\n{}\n\nNew address: {}\n\nDo you want to change it? (yes/no)",
                        short_address(existing),
                        short_address(address)
                    ),
                )]);
            }
        }

        let is_new_registration = user.wallet().is_none();
        self.users.set_wallet(inbound.chat_id, address)?;
        self.contexts.clear(inbound.chat_id)?;

        let mut text = format!("✅ Wallet registered! {}", short_address(address));
        if is_new_registration && self.config.is_testnet {
            match self.grant_bonus(address).await {
                Ok(true) => {
                    text.push_str("\n\n🎁 You received 100,000 ZAZZ tokens to play with! (Testnet only)");
                }
                Ok(false) => {}
                Err(e) => {
                    log::error!("registration bonus failed: {}", e);
                    text.push_str("\n\n⚠️ Bonus failed to send (check bot config)");
                }
            }
        }
        Ok(vec![Reply::plain(inbound.chat_id, text)])
    }

    /// Ok(false) means no bonus is configured; Ok(true) means it was minted.
    async fn grant_bonus(&self, address: &str) -> Result<bool> {
        if self.config.zazz_address.is_none() {
            log::warn!("ZAZZ token address not set - skipping registration bonus");
            return Ok(false);
        }
        let to = Address::from_str(address)?;
        self.chain
            .mint_bonus(to, self.config.bonus_amount)
            .await
            .map_err(|e| anyhow::anyhow!(e))?;
        Ok(true)
    }

    pub(crate) async fn handle_change_confirm(
        &self,
        _user: &User,
        inbound: &Inbound,
        old_address: &str,
        new_address: &str,
    ) -> Result<Vec<Reply>> {
        let text = inbound.text.trim();
        if contains_confirm_word(text) {
            self.users.set_wallet(inbound.chat_id, new_address)?;
            self.contexts.clear(inbound.chat_id)?;
            return Ok(vec![Reply::plain(
                inbound.chat_id,
                format!(
                    "✅ Wallet address updated!\n\nOld: {}\nNew: {}",
                    short_address(old_address),
                    short_address(new_address)
                ),
            )]);
        }
        if contains_cancel_word(text) {
            self.contexts.clear(inbound.chat_id)?;
            return Ok(vec![Reply::plain(
                inbound.chat_id,
                "Cancelled. Wallet address not changed.",
            )]);
        }
        Ok(vec![Reply::plain(
            inbound.chat_id,
            "Please confirm: say 'yes' to change or 'no' to cancel.",
        )])
    }
}
