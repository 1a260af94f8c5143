//! Informational commands: help, usage statistics and the custom command list.

use super::{GROUP_GENERAL, required_text};
use crate::dispatch::{
    ArgumentSpec, ArgumentType, CommandDescriptor, CommandHandler, Context, CustomCommandSnapshot,
    Parameters,
};
use crate::error::HandlerResult;
use async_trait::async_trait;
use std::fmt::Write;

const HELP_COMMAND_ARG: &str = "command";

pub fn help() -> CommandDescriptor {
    CommandDescriptor::new("help", Help)
        .description("List the available commands or show how to use one")
        .group(GROUP_GENERAL)
        .argument(
            ArgumentSpec::new(
                HELP_COMMAND_ARG,
                "The command to show the usage of",
                ArgumentType::SingleToken,
            )
            .optional(),
        )
}

pub fn command_stats() -> CommandDescriptor {
    CommandDescriptor::new("commandstats", CommandStats)
        .description("Show how often each command has been used")
        .group(GROUP_GENERAL)
        .requires_owner(true)
}

pub fn custom_commands() -> CommandDescriptor {
    CommandDescriptor::new("customcommands", CustomCommands)
        .description("List the custom commands available here")
        .group(GROUP_GENERAL)
}

struct Help;

#[async_trait]
impl CommandHandler for Help {
    async fn execute(&self, ctx: &Context<'_>, params: &Parameters) -> HandlerResult {
        let requested = required_text(params, HELP_COMMAND_ARG)?;

        if !requested.is_empty() {
            return match ctx.registry.lookup(requested) {
                Some(descriptor) => {
                    let preamble = format!("**{}**: {}\n\n", descriptor.name, descriptor.description);
                    ctx.success(descriptor.help_format(ctx.prefix, &preamble)).await
                }
                None => {
                    ctx.error(format!("The command `{}` doesn't exist.", requested))
                        .await
                }
            };
        }

        let is_owner = ctx.event.author.is_owner;
        let mut text = String::new();
        let mut current_group: Option<&str> = None;

        for descriptor in ctx.registry.commands() {
            if descriptor.is_owner_only() && !is_owner {
                continue;
            }
            if current_group != Some(descriptor.group.as_str()) {
                if current_group.is_some() {
                    text.push('\n');
                }
                let _ = writeln!(text, "**{}**", descriptor.group);
                current_group = Some(descriptor.group.as_str());
            }
            let _ = writeln!(
                text,
                "`{}` - {}",
                descriptor.usage(ctx.prefix),
                descriptor.description
            );
        }

        ctx.success(text.trim_end()).await
    }
}

struct CommandStats;

#[async_trait]
impl CommandHandler for CommandStats {
    async fn execute(&self, ctx: &Context<'_>, _params: &Parameters) -> HandlerResult {
        let stats = ctx.registry.get_command_stats();
        if stats.is_empty() {
            return ctx.success("No commands have been used yet.").await;
        }

        let lines: Vec<String> = stats
            .iter()
            .map(|(name, count)| format!("`{}`: {}", name, count))
            .collect();
        ctx.success(lines.join("\n")).await
    }
}

struct CustomCommands;

#[async_trait]
impl CommandHandler for CustomCommands {
    async fn execute(&self, ctx: &Context<'_>, _params: &Parameters) -> HandlerResult {
        let snapshot = CustomCommandSnapshot::fetch(ctx.store).await;
        let names: Vec<String> = snapshot
            .visible(ctx.event.guild_id)
            .map(|record| format!("`{}{}`", ctx.prefix, record.name))
            .collect();

        if names.is_empty() {
            return ctx.success("There are no custom commands here.").await;
        }

        ctx.success(format!("**Custom commands:** {}", names.join(", ")))
            .await
    }
}
