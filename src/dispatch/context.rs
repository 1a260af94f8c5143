//! Inbound event types, the handler trait and the context passed to handlers.

use super::custom::CustomCommandStore;
use super::middleware::{Reply, ResponseMiddleware};
use super::model::Parameters;
use super::registry::Registry;
use crate::error::{HandlerError, HandlerResult};
use async_trait::async_trait;

/// Platform snowflake of a guild (server).
pub type GuildId = u64;
/// Platform snowflake of a user.
pub type UserId = u64;

/// Who wrote a message, as reported by the transport.
#[derive(Debug, Clone, Default)]
pub struct Author {
    pub id: UserId,
    /// Display name including discriminator, e.g. `wesley#0001`.
    pub name: String,
    /// Automated accounts are ignored before tokenization.
    pub is_bot: bool,
    /// Whether the author owns this bot process.
    pub is_owner: bool,
    /// Administrator privilege in the guild the message was sent in.
    pub is_guild_admin: bool,
}

/// A message delivered by the transport.
#[derive(Debug, Clone, Default)]
pub struct MessageEvent {
    pub content: String,
    pub author: Author,
    /// `None` for direct messages.
    pub guild_id: Option<GuildId>,
}

impl MessageEvent {
    pub fn is_guild_message(&self) -> bool {
        self.guild_id.is_some()
    }
}

/// Handler invoked by the dispatcher once a static command is authorized and bound.
///
/// Commands without arguments receive an empty [`Parameters`].
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn execute(&self, ctx: &Context<'_>, params: &Parameters) -> HandlerResult;
}

/// Per-invocation context handed to handlers.
pub struct Context<'a> {
    /// The message that triggered the command.
    pub event: &'a MessageEvent,
    /// Reply sink for the originating channel.
    pub sender: ResponseMiddleware<'a>,
    /// Static commands (for collision checks and help listings).
    pub registry: &'a Registry,
    /// Custom command storage.
    pub store: &'a dyn CustomCommandStore,
    /// Configured command prefix.
    pub prefix: &'a str,
}

impl<'a> Context<'a> {
    /// Display name of the author, used as reply footer.
    pub fn author(&self) -> &str {
        &self.event.author.name
    }

    /// Guild the command was sent in.
    pub fn guild_id(&self) -> Result<GuildId, HandlerError> {
        self.event.guild_id.ok_or(HandlerError::GuildRequired)
    }

    pub async fn reply(&self, reply: Reply) -> HandlerResult {
        self.sender.send(reply).await?;
        Ok(())
    }

    pub async fn success(&self, text: impl Into<String>) -> HandlerResult {
        self.reply(Reply::success(text, self.author())).await
    }

    pub async fn error(&self, text: impl Into<String>) -> HandlerResult {
        self.reply(Reply::error(text, self.author())).await
    }
}
