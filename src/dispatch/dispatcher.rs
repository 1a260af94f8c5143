//! Per-message dispatch pipeline.
//!
//! Every inbound event walks the same states from scratch:
//!
//! ```text
//! Idle -> PrefixChecked -> NameResolved{Static|Custom|Unmatched}
//!      -> Authorized -> Bound -> Invoked
//! ```
//!
//! Nothing survives between events except the immutable [`Registry`] and the
//! store, which is re-read into a [`CustomCommandSnapshot`] once per event.

use super::auth::authorize;
use super::binder::{ParameterBinder, TypedBinder};
use super::context::{Context, MessageEvent};
use super::custom::{CustomCommandSnapshot, CustomCommandStore};
use super::middleware::{Reply, ResponseMiddleware};
use super::model::{CommandDescriptor, Parameters};
use super::registry::Registry;
use super::tokenizer::{Invocation, segment_arguments, split_invocation};
use crate::error::{AuthorizationDenied, BindError};
use crate::telemetry::{CommandTimer, spans};
use std::sync::Arc;
use tracing::{Instrument, debug, info, warn};

/// Reply sent when a handler fails without replying itself.
const HANDLER_FAILURE_TEXT: &str = "Something went wrong while running this command.";

/// Terminal state of one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A static command handler ran.
    Invoked { command: String, succeeded: bool },
    /// A privilege check failed; no binding happened.
    DeniedAtAuth {
        command: String,
        reason: AuthorizationDenied,
    },
    /// The arguments could not be reconciled; help text was sent.
    DeniedAtBind { command: String, reason: BindError },
    /// A custom command matched and its text was echoed.
    CustomEchoed { command: String },
    /// Not a command, an automated author, or an unknown name. Silent.
    NoMatch,
}

/// Routes prefixed messages to static or custom commands.
pub struct Dispatcher {
    prefix: String,
    registry: Arc<Registry>,
    store: Arc<dyn CustomCommandStore>,
    binder: Box<dyn ParameterBinder>,
}

impl Dispatcher {
    pub fn new(
        prefix: impl Into<String>,
        registry: Arc<Registry>,
        store: Arc<dyn CustomCommandStore>,
    ) -> Self {
        Self::with_binder(prefix, registry, store, Box::new(TypedBinder::new()))
    }

    pub fn with_binder(
        prefix: impl Into<String>,
        registry: Arc<Registry>,
        store: Arc<dyn CustomCommandStore>,
        binder: Box<dyn ParameterBinder>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            registry,
            store,
            binder,
        }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Handle one inbound message, sending any replies through `sender`.
    pub async fn dispatch(
        &self,
        event: &MessageEvent,
        sender: ResponseMiddleware<'_>,
    ) -> DispatchOutcome {
        if event.author.is_bot {
            return DispatchOutcome::NoMatch;
        }

        let Some(invocation) = split_invocation(&event.content, &self.prefix) else {
            return DispatchOutcome::NoMatch;
        };

        let span = spans::dispatch(invocation.name, &event.author.name, event.guild_id);
        async {
            let snapshot = CustomCommandSnapshot::fetch(self.store.as_ref()).await;

            match self.registry.lookup(invocation.name) {
                Some(descriptor) => self.run_static(descriptor, &invocation, event, sender).await,
                None => Self::run_custom(&snapshot, invocation.name, event, sender).await,
            }
        }
        .instrument(span)
        .await
    }

    async fn run_static(
        &self,
        descriptor: &CommandDescriptor,
        invocation: &Invocation<'_>,
        event: &MessageEvent,
        sender: ResponseMiddleware<'_>,
    ) -> DispatchOutcome {
        let author = event.author.name.as_str();
        let command = descriptor.name.clone();

        if let Err(reason) = authorize(descriptor, event) {
            debug!(command = %command, reason = %reason, "Authorization denied");
            send(sender, Reply::error(reason.user_message(), author)).await;
            return DispatchOutcome::DeniedAtAuth { command, reason };
        }

        // Commands without arguments ignore whatever follows the name
        let params = if descriptor.has_arguments() {
            let tokens = segment_arguments(&invocation.tokens, descriptor);
            match self.binder.bind(descriptor, &tokens) {
                Ok(params) => params,
                Err(reason) => {
                    debug!(command = %command, reason = %reason, "Argument binding failed");
                    send(sender, Reply::error(descriptor.incorrect_usage(&self.prefix), author))
                        .await;
                    return DispatchOutcome::DeniedAtBind { command, reason };
                }
            }
        } else {
            Parameters::default()
        };

        let ctx = Context {
            event,
            sender,
            registry: &self.registry,
            store: self.store.as_ref(),
            prefix: &self.prefix,
        };

        self.registry.record_use(&command);
        let result = {
            let _timer = CommandTimer::new(&command);
            descriptor.invoke(&ctx, &params).await
        };

        let succeeded = match result {
            Ok(()) => {
                info!(author = %author, command = %command, "Command executed");
                true
            }
            Err(e) => {
                warn!(
                    author = %author,
                    command = %command,
                    code = e.error_code(),
                    error = %e,
                    "Command failed"
                );
                send(sender, Reply::error(HANDLER_FAILURE_TEXT, author)).await;
                false
            }
        };

        DispatchOutcome::Invoked { command, succeeded }
    }

    async fn run_custom(
        snapshot: &CustomCommandSnapshot,
        name: &str,
        event: &MessageEvent,
        sender: ResponseMiddleware<'_>,
    ) -> DispatchOutcome {
        match snapshot.resolve(name, event.guild_id) {
            Some(record) => {
                debug!(command = %name, scope = %record.scope, "Custom command matched");
                send(sender, Reply::plain(record.text.clone())).await;
                DispatchOutcome::CustomEchoed {
                    command: name.to_string(),
                }
            }
            None => DispatchOutcome::NoMatch,
        }
    }
}

/// Replies are best effort; a failed send is logged and otherwise ignored.
async fn send(sender: ResponseMiddleware<'_>, reply: Reply) {
    if let Err(e) = sender.send(reply).await {
        warn!(error = %e, "Failed to deliver reply");
    }
}
