//! Custom command management: create, edit and delete guild and global commands.

use super::{GROUP_CUSTOM, required_text};
use crate::db::DbError;
use crate::dispatch::{
    ArgumentSpec, ArgumentType, CommandDescriptor, CommandHandler, CommandScope, Context,
    CustomCommandRecord, Parameters,
};
use crate::error::HandlerResult;
use async_trait::async_trait;
use tracing::info;

const NAME_ARG: &str = "command name";
const OUTPUT_ARG: &str = "command output";

fn name_argument(action: &str) -> ArgumentSpec {
    ArgumentSpec::new(
        NAME_ARG,
        format!("The name of the command to {}", action),
        ArgumentType::SingleToken,
    )
}

fn output_argument() -> ArgumentSpec {
    ArgumentSpec::new(OUTPUT_ARG, "The output of the command", ArgumentType::FreeText)
}

pub fn create_guild_command() -> CommandDescriptor {
    CommandDescriptor::new("createguildcommand", CreateGuildCommand)
        .description("Create a custom command for this server")
        .group(GROUP_CUSTOM)
        .requires_admin(true)
        .guild_only(true)
        .argument(name_argument("create"))
        .argument(output_argument())
}

pub fn edit_guild_command() -> CommandDescriptor {
    CommandDescriptor::new("editguildcommand", EditGuildCommand)
        .description("Change the output of a custom command of this server")
        .group(GROUP_CUSTOM)
        .requires_admin(true)
        .guild_only(true)
        .argument(name_argument("edit"))
        .argument(output_argument())
}

pub fn delete_guild_command() -> CommandDescriptor {
    CommandDescriptor::new("deleteguildcommand", DeleteGuildCommand)
        .description("Delete a custom command of this server")
        .group(GROUP_CUSTOM)
        .requires_admin(true)
        .guild_only(true)
        .argument(name_argument("delete"))
}

pub fn create_global_command() -> CommandDescriptor {
    CommandDescriptor::new("createglobalcommand", CreateGlobalCommand)
        .description("Create a custom command available everywhere")
        .group(GROUP_CUSTOM)
        .requires_owner(true)
        .argument(name_argument("create"))
        .argument(output_argument())
}

pub fn delete_global_command() -> CommandDescriptor {
    CommandDescriptor::new("deleteglobalcommand", DeleteGlobalCommand)
        .description("Delete a custom command available everywhere")
        .group(GROUP_CUSTOM)
        .requires_owner(true)
        .argument(name_argument("delete"))
}

const EMPTY_NAME_TEXT: &str = "The command name can't be empty.";

/// Reply for an insert refused because the name lives in the other scope.
fn conflict_message(name: &str, existing: CommandScope) -> String {
    format!(
        "There is already a {} command with the name `{}`.",
        existing.label(),
        name
    )
}

struct CreateGuildCommand;

#[async_trait]
impl CommandHandler for CreateGuildCommand {
    async fn execute(&self, ctx: &Context<'_>, params: &Parameters) -> HandlerResult {
        let name = required_text(params, NAME_ARG)?;
        let output = required_text(params, OUTPUT_ARG)?;
        let guild = ctx.guild_id()?;

        if name.is_empty() {
            return ctx.error(EMPTY_NAME_TEXT).await;
        }

        if ctx.registry.contains(name) {
            return ctx
                .error(format!("The guild command `{}` already exists.", name))
                .await;
        }

        if ctx.store.exists(name, CommandScope::Global).await? {
            return ctx
                .error(conflict_message(name, CommandScope::Global))
                .await;
        }

        let scope = CommandScope::Guild(guild);
        if ctx.store.exists(name, scope).await? {
            return ctx.error(conflict_message(name, scope)).await;
        }

        let record = CustomCommandRecord::new(name, scope, output, ctx.event.author.id);
        match ctx.store.save(&record).await {
            Ok(()) => {}
            Err(DbError::ScopeConflict { name, existing }) => {
                return ctx.error(conflict_message(&name, existing)).await;
            }
            Err(e) => return Err(e.into()),
        }

        info!(command = %name, guild, author = %ctx.author(), "Registered the custom guild command");
        ctx.success(format!("Created the guild command `{}`: `{}`", name, output))
            .await
    }
}

struct EditGuildCommand;

#[async_trait]
impl CommandHandler for EditGuildCommand {
    async fn execute(&self, ctx: &Context<'_>, params: &Parameters) -> HandlerResult {
        let name = required_text(params, NAME_ARG)?;
        let output = required_text(params, OUTPUT_ARG)?;
        let scope = CommandScope::Guild(ctx.guild_id()?);

        let Some(mut record) = ctx.store.find(name, scope).await? else {
            return ctx
                .error(format!("The guild command `{}` doesn't exist.", name))
                .await;
        };

        record.text = output.to_string();
        ctx.store.save(&record).await?;

        info!(command = %name, scope = %scope, author = %ctx.author(), "Edited custom command");
        ctx.success(format!("Edited the guild command `{}`: `{}`", name, output))
            .await
    }
}

struct DeleteGuildCommand;

#[async_trait]
impl CommandHandler for DeleteGuildCommand {
    async fn execute(&self, ctx: &Context<'_>, params: &Parameters) -> HandlerResult {
        let name = required_text(params, NAME_ARG)?;
        let scope = CommandScope::Guild(ctx.guild_id()?);

        if !ctx.store.delete(name, scope).await? {
            return ctx
                .error(format!("The guild command `{}` doesn't exist.", name))
                .await;
        }

        info!(command = %name, scope = %scope, author = %ctx.author(), "Deleted custom command");
        ctx.success(format!("Deleted the guild command `{}`.", name))
            .await
    }
}

struct CreateGlobalCommand;

#[async_trait]
impl CommandHandler for CreateGlobalCommand {
    async fn execute(&self, ctx: &Context<'_>, params: &Parameters) -> HandlerResult {
        let name = required_text(params, NAME_ARG)?;
        let output = required_text(params, OUTPUT_ARG)?;

        if name.is_empty() {
            return ctx.error(EMPTY_NAME_TEXT).await;
        }

        if ctx.registry.contains(name) || ctx.store.exists(name, CommandScope::Global).await? {
            return ctx
                .error(format!("The global command `{}` already exists.", name))
                .await;
        }

        let record = CustomCommandRecord::new(name, CommandScope::Global, output, ctx.event.author.id);
        match ctx.store.save(&record).await {
            Ok(()) => {}
            Err(DbError::ScopeConflict { name, existing }) => {
                return ctx.error(conflict_message(&name, existing)).await;
            }
            Err(e) => return Err(e.into()),
        }

        info!(command = %name, author = %ctx.author(), "Registered the custom global command");
        ctx.success(format!("Created the global command `{}`: `{}`", name, output))
            .await
    }
}

struct DeleteGlobalCommand;

#[async_trait]
impl CommandHandler for DeleteGlobalCommand {
    async fn execute(&self, ctx: &Context<'_>, params: &Parameters) -> HandlerResult {
        let name = required_text(params, NAME_ARG)?;

        if !ctx.store.delete(name, CommandScope::Global).await? {
            return ctx
                .error(format!("The global command `{}` doesn't exist.", name))
                .await;
        }

        info!(command = %name, author = %ctx.author(), "Deleted custom global command");
        ctx.success(format!("Deleted the global command `{}`.", name))
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::testing::{Harness, admin_in, member_in, owner};
    use crate::dispatch::{
        CommandScope, CustomCommandRecord, DispatchOutcome, ReplyKind,
    };
    use crate::error::AuthorizationDenied;

    fn invoked(command: &str) -> DispatchOutcome {
        DispatchOutcome::Invoked {
            command: command.to_string(),
            succeeded: true,
        }
    }

    #[tokio::test]
    async fn create_guild_command_then_use_it() {
        let harness = Harness::new().await;

        let (outcome, replies) = harness
            .send(admin_in(5, "!createguildcommand rules Be nice to each other"))
            .await;
        assert_eq!(outcome, invoked("createguildcommand"));
        assert_eq!(replies[0].kind, ReplyKind::Success);
        assert_eq!(
            replies[0].text,
            "Created the guild command `rules`: `Be nice to each other`"
        );

        let stored = harness
            .db
            .custom_commands()
            .find("rules", CommandScope::Guild(5))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.owner_id, 20);

        let (outcome, replies) = harness.send(member_in(Some(5), "!rules")).await;
        assert_eq!(
            outcome,
            DispatchOutcome::CustomEchoed {
                command: "rules".into()
            }
        );
        assert_eq!(replies[0].text, "Be nice to each other");
    }

    #[tokio::test]
    async fn create_guild_command_requires_admin() {
        let harness = Harness::new().await;

        let (outcome, replies) = harness
            .send(member_in(Some(5), "!createguildcommand rules x"))
            .await;
        assert_eq!(
            outcome,
            DispatchOutcome::DeniedAtAuth {
                command: "createguildcommand".into(),
                reason: AuthorizationDenied::AdminOnly,
            }
        );
        assert_eq!(
            replies[0].text,
            "You have to be an administrator to use this command."
        );
        assert!(harness.db.custom_commands().list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_guild_command_refuses_static_names() {
        let harness = Harness::new().await;

        let (_, replies) = harness
            .send(admin_in(5, "!createguildcommand help nope"))
            .await;
        assert_eq!(replies[0].kind, ReplyKind::Error);
        assert_eq!(replies[0].text, "The guild command `help` already exists.");
    }

    #[tokio::test]
    async fn create_guild_command_refuses_global_names() {
        let harness = Harness::new().await;
        harness
            .db
            .custom_commands()
            .save(&CustomCommandRecord::new("hello", CommandScope::Global, "hi", 1))
            .await
            .unwrap();

        let (_, replies) = harness
            .send(admin_in(5, "!createguildcommand hello yo"))
            .await;
        assert_eq!(
            replies[0].text,
            "There is already a global command with the name `hello`."
        );
    }

    #[tokio::test]
    async fn create_guild_command_refuses_existing_guild_name() {
        let harness = Harness::new().await;
        harness.send(admin_in(5, "!createguildcommand rules a")).await;

        let (_, replies) = harness.send(admin_in(5, "!createguildcommand rules b")).await;
        assert_eq!(
            replies[0].text,
            "There is already a guild command with the name `rules`."
        );

        // Another guild may reuse the name
        let (_, replies) = harness.send(admin_in(6, "!createguildcommand rules c")).await;
        assert_eq!(replies[0].kind, ReplyKind::Success);
    }

    #[tokio::test]
    async fn create_commands_refuse_empty_names() {
        let harness = Harness::new().await;

        let (outcome, replies) = harness
            .send(admin_in(5, "!createguildcommand  some text"))
            .await;
        assert_eq!(outcome, invoked("createguildcommand"));
        assert_eq!(replies[0].kind, ReplyKind::Error);
        assert_eq!(replies[0].text, "The command name can't be empty.");

        let (_, replies) = harness
            .send(owner(None, "!createglobalcommand  some text"))
            .await;
        assert_eq!(replies[0].text, "The command name can't be empty.");

        assert!(harness.db.custom_commands().list_all().await.unwrap().is_empty());

        let (outcome, replies) = harness.send(member_in(Some(5), "! foo")).await;
        assert_eq!(outcome, DispatchOutcome::NoMatch);
        assert!(replies.is_empty());
    }

    #[tokio::test]
    async fn create_guild_command_with_missing_output_shows_usage() {
        let harness = Harness::new().await;

        let (outcome, replies) = harness.send(admin_in(5, "!createguildcommand rules")).await;
        assert!(matches!(outcome, DispatchOutcome::DeniedAtBind { .. }));
        assert!(replies[0].text.starts_with("Incorrect usage of this command."));
    }

    #[tokio::test]
    async fn edit_guild_command() {
        let harness = Harness::new().await;

        let (_, replies) = harness.send(admin_in(5, "!editguildcommand rules new")).await;
        assert_eq!(replies[0].text, "The guild command `rules` doesn't exist.");

        harness.send(admin_in(5, "!createguildcommand rules old")).await;
        let (_, replies) = harness
            .send(admin_in(5, "!editguildcommand rules new text"))
            .await;
        assert_eq!(replies[0].text, "Edited the guild command `rules`: `new text`");

        let (_, replies) = harness.send(member_in(Some(5), "!rules")).await;
        assert_eq!(replies[0].text, "new text");
    }

    #[tokio::test]
    async fn delete_guild_command() {
        let harness = Harness::new().await;
        harness.send(admin_in(5, "!createguildcommand rules x")).await;

        let (_, replies) = harness.send(admin_in(6, "!deleteguildcommand rules")).await;
        assert_eq!(replies[0].text, "The guild command `rules` doesn't exist.");

        let (_, replies) = harness.send(admin_in(5, "!deleteguildcommand rules")).await;
        assert_eq!(replies[0].text, "Deleted the guild command `rules`.");

        let (outcome, replies) = harness.send(member_in(Some(5), "!rules")).await;
        assert_eq!(outcome, DispatchOutcome::NoMatch);
        assert!(replies.is_empty());
    }

    #[tokio::test]
    async fn guild_commands_denied_in_direct_messages() {
        let harness = Harness::new().await;

        let (outcome, _) = harness.send(owner(None, "!createguildcommand rules x")).await;
        assert_eq!(
            outcome,
            DispatchOutcome::DeniedAtAuth {
                command: "createguildcommand".into(),
                reason: AuthorizationDenied::GuildOnly,
            }
        );
    }

    #[tokio::test]
    async fn global_command_lifecycle() {
        let harness = Harness::new().await;

        let (outcome, _) = harness
            .send(admin_in(5, "!createglobalcommand hello hi"))
            .await;
        assert!(matches!(
            outcome,
            DispatchOutcome::DeniedAtAuth {
                reason: AuthorizationDenied::OwnerOnly,
                ..
            }
        ));

        let (_, replies) = harness
            .send(owner(None, "!createglobalcommand hello hi there"))
            .await;
        assert_eq!(replies[0].text, "Created the global command `hello`: `hi there`");

        let (_, replies) = harness.send(owner(None, "!createglobalcommand hello again")).await;
        assert_eq!(replies[0].text, "The global command `hello` already exists.");

        for guild in [None, Some(5), Some(6)] {
            let (_, replies) = harness.send(member_in(guild, "!hello")).await;
            assert_eq!(replies[0].text, "hi there");
        }

        let (_, replies) = harness.send(owner(None, "!deleteglobalcommand hello")).await;
        assert_eq!(replies[0].text, "Deleted the global command `hello`.");
        let (_, replies) = harness.send(owner(None, "!deleteglobalcommand hello")).await;
        assert_eq!(replies[0].text, "The global command `hello` doesn't exist.");
    }

    #[tokio::test]
    async fn create_global_command_refuses_guild_names() {
        let harness = Harness::new().await;
        harness.send(admin_in(5, "!createguildcommand rules x")).await;

        let (_, replies) = harness.send(owner(None, "!createglobalcommand rules y")).await;
        assert_eq!(
            replies[0].text,
            "There is already a guild command with the name `rules`."
        );
    }

    #[tokio::test]
    async fn create_global_command_refuses_static_names() {
        let harness = Harness::new().await;

        let (_, replies) = harness.send(owner(None, "!createglobalcommand help y")).await;
        assert_eq!(replies[0].text, "The global command `help` already exists.");
    }
}
