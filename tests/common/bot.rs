//! In-process bot for integration tests.

use dirk::commands::builtin_commands;
use dirk::db::Database;
use dirk::dispatch::{
    Author, CommandDescriptor, DispatchOutcome, Dispatcher, GuildId, MessageEvent, Registry,
    Reply, ResponseMiddleware,
};
use std::sync::Arc;
use tokio::sync::Mutex;

pub const OWNER_ID: u64 = 1000;

/// Dispatcher over the built-in commands plus any extra descriptors.
pub struct TestBot {
    pub db: Database,
    pub dispatcher: Dispatcher,
}

#[allow(dead_code)]
impl TestBot {
    pub async fn spawn() -> anyhow::Result<Self> {
        Self::with_commands(Vec::new()).await
    }

    pub async fn with_commands(extra: Vec<CommandDescriptor>) -> anyhow::Result<Self> {
        let db = Database::new(":memory:").await?;
        let registry = Registry::build(builtin_commands().into_iter().chain(extra));
        let dispatcher = Dispatcher::new("!", Arc::new(registry), Arc::new(db.clone()));
        Ok(Self { db, dispatcher })
    }

    /// Dispatch one event and return the outcome with every captured reply.
    pub async fn send(&self, event: MessageEvent) -> (DispatchOutcome, Vec<Reply>) {
        let buf = Mutex::new(Vec::new());
        let outcome = self
            .dispatcher
            .dispatch(&event, ResponseMiddleware::Capturing(&buf))
            .await;
        (outcome, buf.into_inner())
    }

    /// Dispatch and return only the reply texts.
    pub async fn texts(&self, event: MessageEvent) -> Vec<String> {
        self.send(event)
            .await
            .1
            .into_iter()
            .map(|r| r.text)
            .collect()
    }
}

fn event(author: Author, guild_id: Option<GuildId>, content: &str) -> MessageEvent {
    MessageEvent {
        content: content.to_string(),
        author,
        guild_id,
    }
}

#[allow(dead_code)]
pub fn guild_admin(guild: GuildId, content: &str) -> MessageEvent {
    let author = Author {
        id: 2000,
        name: "admin#0001".to_string(),
        is_guild_admin: true,
        ..Default::default()
    };
    event(author, Some(guild), content)
}

#[allow(dead_code)]
pub fn guild_member(guild: GuildId, content: &str) -> MessageEvent {
    let author = Author {
        id: 3000,
        name: "member#0002".to_string(),
        ..Default::default()
    };
    event(author, Some(guild), content)
}

#[allow(dead_code)]
pub fn direct_message(content: &str) -> MessageEvent {
    let author = Author {
        id: 3000,
        name: "member#0002".to_string(),
        ..Default::default()
    };
    event(author, None, content)
}

#[allow(dead_code)]
pub fn owner(guild: Option<GuildId>, content: &str) -> MessageEvent {
    let author = Author {
        id: OWNER_ID,
        name: "owner#0000".to_string(),
        is_owner: true,
        ..Default::default()
    };
    event(author, guild, content)
}
