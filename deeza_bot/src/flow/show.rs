//! Gift listings and balance inquiries, read straight from the chain.

use std::str::FromStr;

use alloy_primitives::Address;
use anyhow::Result;
use deeza_core::helpers::dto::GiftRecord;
use deeza_core::helpers::utils::short_address;

use crate::flow::dto::{Inbound, Reply};
use crate::flow::GiftFlow;
use crate::registry::dto::User;
use crate::utils::format_units;

const MAX_LISTED: usize = 10;

impl GiftFlow {
    pub(crate) async fn show_gifts(
        &self,
        user: &User,
        inbound: &Inbound,
        kind: Option<&str>,
    ) -> Result<Vec<Reply>> {
        let chat_id = inbound.chat_id;
        let Some(wallet) = user.wallet() else {
            return Ok(vec![Reply::plain(
                chat_id,
                "⚠️ You need to register your wallet first!\n\nSay \"register me\" and provide your wallet address. 😉",
            )]);
        };
        let Ok(address) = Address::from_str(wallet) else {
            return Ok(vec![Reply::plain(
                chat_id,
                "⚠️ Your registered wallet looks invalid. Re-register with \"register me\".",
            )]);
        };

        let kind = kind.unwrap_or("all");
        let sent = self.chain.gifts_by_gifter(address).await;
        let received = self.chain.gifts_by_recipient(address).await;
        let (sent, received) = match (sent, received) {
            (Ok(sent), Ok(received)) => (sent, received),
            _ => {
                return Ok(vec![Reply::plain(
                    chat_id,
                    "😕 Error fetching gifts. The network might be slow - try again in a moment! 😉",
                )]);
            }
        };

        let mut response = String::new();

        if kind == "sent" || kind == "all" {
            if sent.is_empty() {
                response.push_str("📤 Gifts Sent: None yet 😔\n\n");
            } else {
                response.push_str(&format!("📤 Gifts Sent: {}\n", sent.len()));
                for (i, gift) in sent.iter().enumerate() {
                    response.push_str(&format!(
                        "{}. Code: {} - {} {} - {}\n",
                        i + 1,
                        gift.code,
                        format_units(gift.amount, 18),
                        self.listed_token_name(gift),
                        status_glyph(gift)
                    ));
                }
                response.push('\n');
            }
        }

        if kind == "pending" || kind == "active" {
            let pending: Vec<&GiftRecord> = received
                .iter()
                .filter(|g| g.deposited && !g.claimed)
                .collect();
            if pending.is_empty() {
                response.push_str("⏳ Pending Gifts: None 😔\n\n");
            } else {
                response.push_str(&format!("⏳ Pending Gifts: {}\n", pending.len()));
                for (i, gift) in pending.iter().enumerate() {
                    response.push_str(&format!(
                        "{}. Code: {} - {} {}\n   Say \"claim {}\" to claim it! 😉\n",
                        i + 1,
                        gift.code,
                        format_units(gift.amount, 18),
                        self.listed_token_name(gift),
                        gift.code
                    ));
                }
                response.push('\n');
            }
        }

        if kind == "received" || kind == "all" {
            if received.is_empty() {
                response.push_str("📥 Gifts Received: None yet 😔\n\n");
            } else {
                let claimed_count = received.iter().filter(|g| g.claimed).count();
                response.push_str(&format!(
                    "📥 Gifts Received: {} ({} claimed)\n",
                    received.len(),
                    claimed_count
                ));
                for (i, gift) in received.iter().take(MAX_LISTED).enumerate() {
                    response.push_str(&format!(
                        "{}. Code: {} - {} {} - {}\n",
                        i + 1,
                        gift.code,
                        format_units(gift.amount, 18),
                        self.listed_token_name(gift),
                        status_glyph(gift)
                    ));
                }
                if received.len() > MAX_LISTED {
                    response.push_str(&format!("... and {} more\n", received.len() - MAX_LISTED));
                }
            }
        }

        if response.is_empty() {
            response =
                "No gifts found matching your query. Try sending or receiving some gifts! 😉"
                    .to_string();
        }

        Ok(vec![Reply::plain(chat_id, response.trim_end().to_string())])
    }

    fn listed_token_name(&self, gift: &GiftRecord) -> String {
        if gift.is_native() {
            self.config.native_symbol.clone()
        } else if self.config.is_testnet {
            "ZAZZ".to_string()
        } else {
            "TOKEN".to_string()
        }
    }

    pub(crate) async fn show_balance(&self, user: &User, inbound: &Inbound) -> Result<Vec<Reply>> {
        let chat_id = inbound.chat_id;
        let Some(wallet) = user.wallet() else {
            return Ok(vec![Reply::plain(
                chat_id,
                "You need to register your wallet first! Say \"register me\" 😉",
            )]);
        };
        let Ok(address) = Address::from_str(wallet) else {
            return Ok(vec![Reply::plain(
                chat_id,
                "⚠️ Your registered wallet looks invalid. Re-register with \"register me\".",
            )]);
        };

        let native = match self.chain.native_balance(address).await {
            Ok(balance) => balance,
            Err(e) => {
                log::error!("balance fetch failed: {}", e);
                return Ok(vec![Reply::plain(
                    chat_id,
                    "😕 Error fetching your balance. Try again in a moment! 😉",
                )]);
            }
        };

        let mut text = format!(
            "💰 Your Wallet Balance\n\n💎 {}: {} {}",
            self.config.native_symbol,
            format_units(native, 18),
            self.config.native_symbol
        );
        if self.config.is_testnet {
            if let Some(zazz) = &self.config.zazz_address {
                if let Ok(token) = Address::from_str(zazz) {
                    if let Ok(balance) = self.chain.token_balance(token, address).await {
                        text.push_str(&format!("\n🎁 ZAZZ: {} ZAZZ", format_units(balance, 18)));
                    }
                }
            }
        }
        text.push_str(&format!("\n\n📍 Address: {}", short_address(wallet)));
        Ok(vec![Reply::plain(chat_id, text)])
    }
}

fn status_glyph(gift: &GiftRecord) -> &'static str {
    if gift.claimed {
        "✅ Claimed"
    } else if gift.deposited {
        "⏳ Pending"
    } else {
        "❌ Not Deposited"
    }
}
