//! Utility slash commands

use serenity::builder::CreateApplicationCommand;

/// Creates the utility commands
pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![create_help_command()]
}

/// Creates the help command
fn create_help_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("help")
        .description("Show help for bot commands")
        .to_owned()
}
