//! Console gateway: feeds stdin lines to the dispatcher as message events.
//!
//! Each line becomes one [`MessageEvent`] authored by the configured console
//! identity. Replies are written to the output as they arrive.

use crate::config::{BotConfig, ConsoleConfig};
use crate::dispatch::{Author, DispatchOutcome, Dispatcher, MessageEvent, Reply, ResponseMiddleware};
use crate::telemetry::spans;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{Instrument, debug, info, warn};

/// Replies buffered between the dispatcher and the writer task.
const REPLY_QUEUE_CAPACITY: usize = 64;

/// Line-oriented transport for running the bot without a chat platform.
pub struct ConsoleGateway {
    dispatcher: Arc<Dispatcher>,
    author: Author,
    guild_id: Option<u64>,
}

impl ConsoleGateway {
    pub fn new(dispatcher: Arc<Dispatcher>, bot: &BotConfig, console: &ConsoleConfig) -> Self {
        let user_id = console.user_id.unwrap_or(bot.owner_id);
        let author = Author {
            id: user_id,
            name: console.user_name.clone(),
            is_bot: console.bot,
            is_owner: user_id == bot.owner_id,
            is_guild_admin: console.admin,
        };

        Self {
            dispatcher,
            author,
            guild_id: console.guild_id,
        }
    }

    /// Identity attached to every event.
    pub fn author(&self) -> &Author {
        &self.author
    }

    /// Wrap one input line in a message event.
    pub fn event(&self, line: &str) -> MessageEvent {
        MessageEvent {
            content: line.to_string(),
            author: self.author.clone(),
            guild_id: self.guild_id,
        }
    }

    /// Dispatch every line of `input` in order until end of input.
    ///
    /// Returns `output` once all replies have been written.
    pub async fn run<R, W>(&self, input: R, output: W) -> std::io::Result<W>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<Reply>(REPLY_QUEUE_CAPACITY);
        let writer = tokio::spawn(write_replies(rx, output));

        let span = spans::gateway("console", &self.author.name);
        let result = async {
            info!(guild = ?self.guild_id, "Console gateway ready");
            let mut lines = input.lines();
            while let Some(line) = lines.next_line().await? {
                let event = self.event(&line);
                match self
                    .dispatcher
                    .dispatch(&event, ResponseMiddleware::Direct(&tx))
                    .await
                {
                    DispatchOutcome::NoMatch => debug!("Ignored line"),
                    outcome => debug!(?outcome, "Dispatched line"),
                }
            }
            info!("Console input closed");
            Ok::<_, std::io::Error>(())
        }
        .instrument(span)
        .await;

        drop(tx);
        let output = writer
            .await
            .map_err(|e| std::io::Error::other(format!("reply writer panicked: {}", e)))??;

        result.map(|()| output)
    }
}

async fn write_replies<W>(mut rx: mpsc::Receiver<Reply>, mut output: W) -> std::io::Result<W>
where
    W: AsyncWrite + Unpin,
{
    while let Some(reply) = rx.recv().await {
        let rendered = format!("{}\n", reply);
        if let Err(e) = output.write_all(rendered.as_bytes()).await {
            warn!(error = %e, "Failed to write reply");
            return Err(e);
        }
        output.flush().await?;
    }
    Ok(output)
}
