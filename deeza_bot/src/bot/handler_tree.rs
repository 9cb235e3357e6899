use anyhow::Result;
use deeza_core::helpers::bot_commands::Command;
use teloxide::{
    dispatching::{DpHandlerDescription, HandlerExt, UpdateFilterExt},
    dptree::{self, Handler},
    types::{Message, Update},
};

use crate::bot::{answers::answers, handler::handle_message};
use crate::dependencies::BotDependencies;

pub fn handler_tree() -> Handler<'static, Result<()>, DpHandlerDescription> {
    dptree::entry().branch(
        Update::filter_message()
            .branch(
                dptree::entry()
                    .filter_command::<Command>()
                    .endpoint(answers),
            )
            .branch(
                // Free text goes to the orchestrator
                dptree::entry()
                    .filter(|msg: Message| {
                        msg.text().map(|t| !t.starts_with('/')).unwrap_or(false)
                    })
                    .endpoint(handle_message),
            ),
    )
}
