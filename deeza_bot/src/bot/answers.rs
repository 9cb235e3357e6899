//! Command handlers for the Deeza bot.

use anyhow::Result;
use deeza_core::helpers::bot_commands::Command;
use teloxide::prelude::*;

use crate::bot::handler::send_replies;
use crate::dependencies::BotDependencies;

pub async fn answers(
    bot: Bot,
    msg: Message,
    cmd: Command,
    bot_deps: BotDependencies,
) -> Result<()> {
    match cmd {
        Command::Start | Command::Help => {
            bot.send_message(msg.chat.id, bot_deps.flow.help_text())
                .await?;
        }
        Command::Cancel => {
            let replies = bot_deps.flow.cancel(msg.chat.id.0)?;
            send_replies(&bot, &msg, replies).await;
        }
    }
    Ok(())
}
