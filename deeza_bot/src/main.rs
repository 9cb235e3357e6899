use std::env;
use std::str::FromStr;
use std::sync::Arc;

use alloy_primitives::{Address, U256};
use teloxide::dptree;
use teloxide::prelude::*;

mod ai;
mod bot;
mod chain;
mod context;
mod dependencies;
mod flow;
mod gecko;
mod ipfs;
mod judge;
mod registry;
#[cfg(test)]
mod testkit;
mod utils;

use crate::ai::handler::AI;
use crate::bot::handler_tree::handler_tree;
use crate::chain::handler::SomniaGiftChain;
use crate::context::handler::ContextStore;
use crate::dependencies::BotDependencies;
use crate::flow::dto::FlowConfig;
use crate::flow::GiftFlow;
use crate::gecko::handler::GeckoTerminal;
use crate::ipfs::handler::Lighthouse;
use crate::registry::handler::UserRegistry;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();
    log::info!("Starting deeza_bot...");

    let bot = Bot::from_env();

    let is_testnet = env::var("IS_TESTNET").map(|v| v == "true").unwrap_or(false);
    let native_symbol = if is_testnet { "STT" } else { "SOMI" };
    let rpc_url = env::var("SOMNIA_RPC").unwrap_or_else(|_| {
        if is_testnet {
            "https://dream-rpc.somnia.network".to_string()
        } else {
            "https://somnia.publicnode.com".to_string()
        }
    });

    let contract = env::var("DEEZA_CONTRACT").expect("DEEZA_CONTRACT not set");
    let contract = Address::from_str(&contract).expect("DEEZA_CONTRACT is not a valid address");
    let bot_private_key = env::var("BOT_PRIVATE_KEY").expect("BOT_PRIVATE_KEY not set");
    let zazz_address = env::var("ZAZZ_TOKEN_ADDRESS").ok().filter(|a| {
        let valid = Address::from_str(a).map(|p| p != Address::ZERO).unwrap_or(false);
        if !valid && !a.is_empty() {
            log::warn!("ignoring invalid ZAZZ_TOKEN_ADDRESS: {}", a);
        }
        valid
    });
    let openai_api_key = env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY not set");
    let lighthouse_api_key = env::var("LIGHTHOUSE_API_KEY").expect("LIGHTHOUSE_API_KEY not set");
    let db_path = env::var("DEEZA_DB_PATH").unwrap_or_else(|_| "deeza_db".to_string());
    let wallet_connect_url = env::var("WALLET_CONNECT_URL")
        .unwrap_or_else(|_| "https://deeza-website.vercel.app".to_string());

    let db = sled::open(db_path).expect("Failed to open sled DB");
    let users = UserRegistry::new(&db).expect("Failed to open user registry");
    let contexts = ContextStore::new(&db).expect("Failed to open context store");

    let ai = AI::new(&openai_api_key, native_symbol).expect("Failed to create OpenAI client");
    let zazz_parsed = zazz_address
        .as_deref()
        .and_then(|a| Address::from_str(a).ok());
    let chain = SomniaGiftChain::new(&rpc_url, contract, &bot_private_key, zazz_parsed)
        .expect("Failed to create Somnia gateway");
    let content = Lighthouse::new(lighthouse_api_key);
    let tokens = GeckoTerminal::new();

    let config = FlowConfig {
        native_symbol: native_symbol.to_string(),
        is_testnet,
        zazz_address,
        deposit_url: format!("{}/deposit", wallet_connect_url),
        explorer_url: if is_testnet {
            "https://shannon-explorer.somnia.network".to_string()
        } else {
            "https://explorer.somnia.network".to_string()
        },
        lockout_minutes: 30,
        max_wrong_attempts: 3,
        max_amount: 1_000_000_000.0,
        bonus_amount: U256::from(100_000u64) * U256::from(10u64).pow(U256::from(18u64)),
    };

    log::info!(
        "Deeza - Gift Drop Bot 🔥 ({}, native {})",
        if is_testnet { "TESTNET" } else { "MAINNET" },
        native_symbol
    );

    let flow = GiftFlow::new(
        users,
        contexts,
        Arc::new(ai),
        Arc::new(chain),
        Arc::new(content),
        Arc::new(tokens),
        config,
    );
    let bot_deps = BotDependencies {
        flow: Arc::new(flow),
    };

    Dispatcher::builder(bot, handler_tree())
        .dependencies(dptree::deps![bot_deps])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}
