//! Reply values and the sink they are routed through.
//!
//! Supports both direct forwarding to a transport channel and capturing in
//! memory.
//!
//! # Slow consumers
//!
//! Direct sends use a bounded channel with a timeout. When the transport does
//! not drain its queue in time the reply is dropped and handed back in the
//! error, so a stalled transport cannot wedge a dispatch.

use std::fmt;
use std::time::Duration;
use tokio::sync::{Mutex, mpsc};

/// Time a send may wait for queue space before giving up.
const SEND_TIMEOUT: Duration = Duration::from_secs(5);

/// Presentation hint for a reply. Rendering is up to the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    Success,
    Error,
    /// Raw text, e.g. a custom command echo.
    Plain,
}

/// A message the bot sends back to the channel the command came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub kind: ReplyKind,
    pub text: String,
    /// Display name of the author the reply answers.
    pub footer: Option<String>,
}

impl Reply {
    pub fn success(text: impl Into<String>, author: &str) -> Self {
        Self {
            kind: ReplyKind::Success,
            text: text.into(),
            footer: Some(author.to_string()),
        }
    }

    pub fn error(text: impl Into<String>, author: &str) -> Self {
        Self {
            kind: ReplyKind::Error,
            text: text.into(),
            footer: Some(author.to_string()),
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            kind: ReplyKind::Plain,
            text: text.into(),
            footer: None,
        }
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ReplyKind::Success => write!(f, "[success] {}", self.text)?,
            ReplyKind::Error => write!(f, "[error] {}", self.text)?,
            ReplyKind::Plain => f.write_str(&self.text)?,
        }
        if let Some(footer) = &self.footer {
            write!(f, "\n  requested by {}", footer)?;
        }
        Ok(())
    }
}

/// Middleware for routing replies.
/// Direct forwards to the transport sender; Capturing buffers them.
#[derive(Clone, Copy)]
pub enum ResponseMiddleware<'a> {
    Direct(&'a mpsc::Sender<Reply>),
    Capturing(&'a Mutex<Vec<Reply>>),
}

impl<'a> ResponseMiddleware<'a> {
    /// Send or buffer a reply depending on middleware mode.
    pub async fn send(&self, reply: Reply) -> Result<(), mpsc::error::SendError<Reply>> {
        match self {
            Self::Direct(tx) => match tx.send_timeout(reply, SEND_TIMEOUT).await {
                Ok(()) => Ok(()),
                Err(mpsc::error::SendTimeoutError::Timeout(reply)) => {
                    tracing::warn!(
                        "Reply queue full: transport not draining (timeout after {:?})",
                        SEND_TIMEOUT
                    );
                    Err(mpsc::error::SendError(reply))
                }
                Err(mpsc::error::SendTimeoutError::Closed(reply)) => {
                    Err(mpsc::error::SendError(reply))
                }
            },
            Self::Capturing(buf) => {
                buf.lock().await.push(reply);
                Ok(())
            }
        }
    }
}
