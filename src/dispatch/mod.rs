//! Command dispatch core.
//!
//! This module contains the command model, the static registry, the two-phase
//! tokenizer, the parameter binder, privilege checks, custom command
//! resolution and the [`Dispatcher`] tying them together.
//!
//! ## Flow
//!
//! ```text
//! MessageEvent -> split_invocation -> Registry::lookup
//!     hit:  authorize -> segment_arguments -> ParameterBinder -> CommandHandler
//!     miss: CustomCommandSnapshot::resolve -> echo or silence
//! ```

pub mod auth;
pub mod binder;
pub mod context;
pub mod custom;
pub mod dispatcher;
pub mod middleware;
pub mod model;
pub mod registry;
pub mod tokenizer;

// Re-export commonly used types
pub use binder::{ParameterBinder, TypedBinder};
pub use context::{Author, CommandHandler, Context, GuildId, MessageEvent, UserId};
pub use custom::{CommandScope, CustomCommandRecord, CustomCommandSnapshot, CustomCommandStore};
pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use middleware::{Reply, ReplyKind, ResponseMiddleware};
pub use model::{
    ArgumentSpec, ArgumentType, CommandDescriptor, ParamValue, Parameters, ParsedParameter,
};
pub use registry::Registry;
