//! Built-in static commands.
//!
//! Commands are listed explicitly in [`builtin_commands`] and folded into a
//! [`Registry`](crate::dispatch::Registry) at startup.

pub mod custom;
pub mod general;

use crate::dispatch::{CommandDescriptor, Parameters};
use crate::error::HandlerError;

/// Group label for informational commands.
pub const GROUP_GENERAL: &str = "General";
/// Group label for custom command management.
pub const GROUP_CUSTOM: &str = "Custom commands";

/// Every built-in command descriptor.
pub fn builtin_commands() -> Vec<CommandDescriptor> {
    vec![
        general::help(),
        general::command_stats(),
        general::custom_commands(),
        custom::create_guild_command(),
        custom::edit_guild_command(),
        custom::delete_guild_command(),
        custom::create_global_command(),
        custom::delete_global_command(),
    ]
}

/// Text value of a required argument.
fn required_text<'p>(params: &'p Parameters, key: &'static str) -> Result<&'p str, HandlerError> {
    params
        .get(key)
        .and_then(|p| p.value.as_text())
        .ok_or(HandlerError::MissingParameter(key))
}
