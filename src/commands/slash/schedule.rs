//! Schedule slash commands

use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;

/// Creates the schedule commands
pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![
        create_settime_command(),
        create_setrange_command(),
        create_settimezone_command(),
        create_cleartime_command(),
        create_clearrange_command(),
        create_status_command(),
    ]
}

/// Creates the settime command
fn create_settime_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("settime")
        .description("Set the daily voice disconnect time for a user (HH:MM)")
        .create_option(|option| {
            option
                .name("member")
                .description("User to disconnect")
                .kind(CommandOptionType::User)
                .required(true)
        })
        .create_option(|option| {
            option
                .name("time")
                .description("Time in HH:MM (their local time)")
                .kind(CommandOptionType::String)
                .required(true)
        })
        .to_owned()
}

/// Creates the setrange command
fn create_setrange_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("setrange")
        .description("Set a time range during which a user is kept out of voice")
        .create_option(|option| {
            option
                .name("member")
                .description("User to disconnect")
                .kind(CommandOptionType::User)
                .required(true)
        })
        .create_option(|option| {
            option
                .name("range")
                .description("Format: HH:MM-HH:MM (may wrap past midnight)")
                .kind(CommandOptionType::String)
                .required(true)
        })
        .to_owned()
}

/// Creates the settimezone command
fn create_settimezone_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("settimezone")
        .description("Tell the bot your current local time for timezone calibration")
        .create_option(|option| {
            option
                .name("current_time")
                .description("Your current local time in HH:MM")
                .kind(CommandOptionType::String)
                .required(true)
        })
        .to_owned()
}

/// Creates the cleartime command
fn create_cleartime_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("cleartime")
        .description("Remove a daily disconnect time")
        .create_option(|option| {
            option
                .name("member")
                .description("User to clear (defaults to you)")
                .kind(CommandOptionType::User)
                .required(false)
        })
        .to_owned()
}

/// Creates the clearrange command
fn create_clearrange_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("clearrange")
        .description("Remove a disconnect time range")
        .create_option(|option| {
            option
                .name("member")
                .description("User to clear (defaults to you)")
                .kind(CommandOptionType::User)
                .required(false)
        })
        .to_owned()
}

/// Creates the status command
fn create_status_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("status")
        .description("Show current disconnect schedule settings")
        .create_option(|option| {
            option
                .name("member")
                .description("User to inspect (defaults to you)")
                .kind(CommandOptionType::User)
                .required(false)
        })
        .to_owned()
}
