use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(
    rename_rule = "lowercase",
    description = "These commands are supported:"
)]
pub enum Command {
    #[command(description = "Show the welcome message and usage examples.")]
    Start,
    #[command(description = "Display this text.")]
    Help,
    #[command(description = "Reset any active process.")]
    Cancel,
}
