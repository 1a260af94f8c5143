//! Two-phase tokenizer for prefixed commands.
//!
//! Phase one ([`split_invocation`]) only needs the prefix: it extracts the
//! command name and raw argument tokens. Phase two ([`segment_arguments`])
//! needs the resolved descriptor, because a trailing free text argument changes
//! how the raw tokens are grouped.

use super::model::CommandDescriptor;

/// A prefixed message split into name and raw argument tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation<'a> {
    pub name: &'a str,
    pub tokens: Vec<&'a str>,
}

/// Split `content` into a command name and tokens.
///
/// Returns `None` when `content` does not start with `prefix`. Tokens are
/// separated by single spaces, so doubled spaces produce empty tokens; empty
/// tokens at the end of the message are dropped.
pub fn split_invocation<'a>(content: &'a str, prefix: &str) -> Option<Invocation<'a>> {
    let rest = content.strip_prefix(prefix)?;

    let mut parts = split_spaces(rest);
    let name = if parts.is_empty() { "" } else { parts.remove(0) };

    Some(Invocation {
        name,
        tokens: parts,
    })
}

/// Group raw tokens according to the descriptor's argument shape.
///
/// When the last argument is free text, the tokens are re-joined and split
/// again into at most `arguments.len()` pieces so the final piece keeps its
/// spaces. An empty remainder becomes a single empty token.
pub fn segment_arguments(tokens: &[&str], descriptor: &CommandDescriptor) -> Vec<String> {
    if !descriptor.ends_with_free_text() {
        return tokens.iter().map(|t| t.to_string()).collect();
    }

    tokens
        .join(" ")
        .splitn(descriptor.arguments.len(), ' ')
        .map(str::to_string)
        .collect()
}

fn split_spaces(text: &str) -> Vec<&str> {
    let mut parts: Vec<&str> = text.split(' ').collect();
    while parts.last().is_some_and(|p| p.is_empty()) {
        parts.pop();
    }
    parts
}
