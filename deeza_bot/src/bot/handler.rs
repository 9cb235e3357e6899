//! Bridge between the Telegram transport and the gift flow orchestrator.

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::{ChatAction, ChatId, ParseMode, ReplyParameters};

use crate::dependencies::BotDependencies;
use crate::flow::dto::{Inbound, Reply};

pub async fn handle_message(bot: Bot, msg: Message, bot_deps: BotDependencies) -> Result<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let Some(from) = msg.from.clone() else {
        return Ok(());
    };

    let _ = bot.send_chat_action(msg.chat.id, ChatAction::Typing).await;

    let inbound = Inbound {
        chat_id: msg.chat.id.0,
        text: text.to_string(),
        display_name: from.first_name.clone(),
        handle: from.username.as_ref().map(|u| u.to_lowercase()),
    };

    match bot_deps.flow.handle_message(&inbound).await {
        Ok(replies) => send_replies(&bot, &msg, replies).await,
        Err(e) => {
            log::error!("message handling failed for chat {}: {}", msg.chat.id, e);
            bot.send_message(msg.chat.id, "Something went wrong! Please try again.")
                .await?;
        }
    }
    Ok(())
}

/// Deliver orchestrator replies. Cross-chat notifications are best-effort:
/// a blocked bot or missing chat must not fail the sender's flow.
pub async fn send_replies(bot: &Bot, origin: &Message, replies: Vec<Reply>) {
    for reply in replies {
        let chat_id = ChatId(reply.chat_id);
        let mut request = bot.send_message(chat_id, reply.text.clone());
        if reply.html {
            request = request.parse_mode(ParseMode::Html);
        }
        if reply.reply && chat_id == origin.chat.id {
            request = request.reply_parameters(ReplyParameters::new(origin.id));
        }
        if let Err(e) = request.await {
            log::error!("failed to deliver message to chat {}: {}", reply.chat_id, e);
        }
    }
}
