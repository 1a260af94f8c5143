//! Declarative command shapes and the typed values bound to them.
//!
//! A [`CommandDescriptor`] is built once at startup and never mutated. Each
//! dispatch produces a fresh [`Parameters`] sequence aligned by index with the
//! descriptor's [`ArgumentSpec`] list.

use super::context::{CommandHandler, Context};
use crate::error::HandlerResult;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;

/// How a raw token is coerced into a [`ParamValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentType {
    /// A single whitespace-free word.
    SingleToken,
    /// Absorbs the rest of the message, spaces included. Must be last.
    FreeText,
    Boolean,
    /// A calendar date written as `dd/MM/yyyy`.
    Date,
    Integer,
}

/// One declared argument of a command.
#[derive(Debug, Clone)]
pub struct ArgumentSpec {
    pub key: String,
    pub description: String,
    pub kind: ArgumentType,
    pub optional: bool,
}

impl ArgumentSpec {
    pub fn new(key: impl Into<String>, description: impl Into<String>, kind: ArgumentType) -> Self {
        Self {
            key: key.into(),
            description: description.into(),
            kind,
            optional: false,
        }
    }

    /// Mark the argument as optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    fn usage_token(&self) -> String {
        if self.optional {
            format!("[{}]", self.key)
        } else {
            format!("<{}>", self.key)
        }
    }
}

/// Static declaration of a command: name, metadata, argument shape and handler.
#[derive(Clone)]
pub struct CommandDescriptor {
    pub name: String,
    pub description: String,
    pub group: String,
    /// Tri-state privilege flags; `None` behaves like `Some(false)`.
    pub requires_admin: Option<bool>,
    pub requires_owner: Option<bool>,
    pub guild_only: Option<bool>,
    pub arguments: Vec<ArgumentSpec>,
    handler: Arc<dyn CommandHandler>,
}

impl CommandDescriptor {
    /// Start a descriptor with the given name and handler.
    ///
    /// Description and group start empty; the registry refuses descriptors
    /// that leave them that way.
    pub fn new(name: impl Into<String>, handler: impl CommandHandler + 'static) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            group: String::new(),
            requires_admin: None,
            requires_owner: None,
            guild_only: None,
            arguments: Vec::new(),
            handler: Arc::new(handler),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    pub fn requires_admin(mut self, value: bool) -> Self {
        self.requires_admin = Some(value);
        self
    }

    pub fn requires_owner(mut self, value: bool) -> Self {
        self.requires_owner = Some(value);
        self
    }

    pub fn guild_only(mut self, value: bool) -> Self {
        self.guild_only = Some(value);
        self
    }

    pub fn argument(mut self, argument: ArgumentSpec) -> Self {
        self.arguments.push(argument);
        self
    }

    pub fn is_admin_only(&self) -> bool {
        self.requires_admin.unwrap_or(false)
    }

    pub fn is_owner_only(&self) -> bool {
        self.requires_owner.unwrap_or(false)
    }

    pub fn is_guild_only(&self) -> bool {
        self.guild_only.unwrap_or(false)
    }

    pub fn has_arguments(&self) -> bool {
        !self.arguments.is_empty()
    }

    pub fn optional_count(&self) -> usize {
        self.arguments.iter().filter(|a| a.optional).count()
    }

    /// Whether the last argument swallows the remainder of the message.
    pub fn ends_with_free_text(&self) -> bool {
        self.arguments
            .last()
            .is_some_and(|a| a.kind == ArgumentType::FreeText)
    }

    /// One-line usage, e.g. `!createguildcommand <command name> <command output>`.
    pub fn usage(&self, prefix: &str) -> String {
        let mut usage = format!("{}{}", prefix, self.name);
        for argument in &self.arguments {
            usage.push(' ');
            usage.push_str(&argument.usage_token());
        }
        usage
    }

    /// Usage plus one line per argument, preceded by `preamble`.
    pub fn help_format(&self, prefix: &str, preamble: &str) -> String {
        let mut text = format!("{}**Usage:** `{}`", preamble, self.usage(prefix));
        for argument in &self.arguments {
            text.push_str(&format!("\n`{}`: {}", argument.key, argument.description));
        }
        text
    }

    /// Help text sent when an invocation supplies the wrong number of arguments.
    pub fn incorrect_usage(&self, prefix: &str) -> String {
        self.help_format(prefix, "Incorrect usage of this command.\n\n")
    }

    pub(crate) async fn invoke(&self, ctx: &Context<'_>, params: &Parameters) -> HandlerResult {
        self.handler.execute(ctx, params).await
    }
}

impl fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("name", &self.name)
            .field("group", &self.group)
            .field("requires_admin", &self.requires_admin)
            .field("requires_owner", &self.requires_owner)
            .field("guild_only", &self.guild_only)
            .field("arguments", &self.arguments)
            .finish_non_exhaustive()
    }
}

/// A coerced argument value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Text(String),
    Boolean(bool),
    Date(DateTime<Utc>),
    Integer(i32),
}

impl ParamValue {
    /// The zero value used to fill an omitted optional argument.
    pub fn zero(kind: ArgumentType) -> Self {
        match kind {
            ArgumentType::SingleToken | ArgumentType::FreeText => Self::Text(String::new()),
            ArgumentType::Boolean => Self::Boolean(false),
            ArgumentType::Date => Self::Date(DateTime::<Utc>::UNIX_EPOCH),
            ArgumentType::Integer => Self::Integer(0),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i32> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Date(d) => write!(f, "{}", d.format("%d/%m/%Y")),
            Self::Integer(i) => write!(f, "{}", i),
        }
    }
}

/// One bound argument of a single invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedParameter {
    pub key: String,
    pub value: ParamValue,
    /// False when coercion failed and `value` holds the fallback.
    pub valid: bool,
    /// True when the slot was filled with a zero value because no token was left.
    pub optional: bool,
}

impl ParsedParameter {
    pub fn new(key: impl Into<String>, value: ParamValue, valid: bool) -> Self {
        Self {
            key: key.into(),
            value,
            valid,
            optional: false,
        }
    }

    pub fn set_optional(&mut self, optional: bool) {
        self.optional = optional;
    }
}

/// The ordered parameters handed to a handler. Empty for argument-less commands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters(Vec<ParsedParameter>);

impl Parameters {
    pub fn new(params: Vec<ParsedParameter>) -> Self {
        Self(params)
    }

    /// Look a parameter up by its argument key.
    pub fn get(&self, key: &str) -> Option<&ParsedParameter> {
        self.0.iter().find(|p| p.key == key)
    }

    /// Text of the parameter at `index`, if it is a text value.
    pub fn text(&self, index: usize) -> Option<&str> {
        self.0.get(index).and_then(|p| p.value.as_text())
    }
}

impl std::ops::Deref for Parameters {
    type Target = [ParsedParameter];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
