//! Unified error handling for dirk.
//!
//! Every failure here is scoped to a single registration or dispatch; none of
//! them stop the process.

use crate::db::DbError;
use crate::dispatch::Reply;
use thiserror::Error;
use tokio::sync::mpsc;

// ============================================================================
// Registration Errors (startup)
// ============================================================================

/// Why a descriptor was refused by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("command name is not set")]
    MissingName,

    #[error("command {0} has no description")]
    MissingDescription(String),

    #[error("command {0} has no group")]
    MissingGroup(String),

    #[error("command {command}: free text argument `{key}` must be the last argument")]
    FreeTextNotLast { command: String, key: String },

    #[error("command {0} declares more than one free text argument")]
    MultipleFreeText(String),

    #[error("command {0} is already registered")]
    Duplicate(String),
}

// ============================================================================
// Dispatch Errors (per invocation)
// ============================================================================

/// A privilege check that stopped a dispatch before binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthorizationDenied {
    #[error("command is guild only")]
    GuildOnly,

    #[error("command requires the bot owner")]
    OwnerOnly,

    #[error("command requires administrator privileges")]
    AdminOnly,
}

impl AuthorizationDenied {
    /// Message shown to the caller.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::GuildOnly => "This command can only be used inside a server.",
            Self::OwnerOnly => "You have to be the owner of the bot to use this command.",
            Self::AdminOnly => "You have to be an administrator to use this command.",
        }
    }
}

/// Failure to map tokens onto a descriptor's arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("argument count mismatch: expected {expected} ({optional} optional), got {given}")]
    ArgumentCountMismatch {
        expected: usize,
        optional: usize,
        given: usize,
    },
}

// ============================================================================
// Handler Errors (command bodies)
// ============================================================================

/// Errors that can occur inside a command handler.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("database error: {0}")]
    Db(#[from] DbError),

    #[error("send error: {0}")]
    Send(#[from] mpsc::error::SendError<Reply>),

    #[error("command needs a guild context")]
    GuildRequired,

    #[error("missing parameter: {0}")]
    MissingParameter(&'static str),

    #[error("internal error: {0}")]
    Internal(String),
}

impl HandlerError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Db(_) => "db_error",
            Self::Send(_) => "send_error",
            Self::GuildRequired => "guild_required",
            Self::MissingParameter(_) => "missing_parameter",
            Self::Internal(_) => "internal_error",
        }
    }
}

/// Result type for command handlers.
pub type HandlerResult = Result<(), HandlerError>;
