//! Static command registry.
//!
//! The `Registry` is built once at startup from an explicit descriptor list and
//! is read-only afterwards, so lookups from concurrent dispatches need no lock.
//! The only mutable state is a relaxed usage counter per command.

use super::model::{ArgumentType, CommandDescriptor};
use crate::error::RegistrationError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{error, info};

/// Registry of static commands.
#[derive(Debug, Default)]
pub struct Registry {
    commands: HashMap<String, CommandDescriptor>,
    /// Command usage counters for `commandstats`.
    command_counts: HashMap<String, AtomicU64>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from `descriptors`, logging and skipping any that fail
    /// validation.
    pub fn build(descriptors: impl IntoIterator<Item = CommandDescriptor>) -> Self {
        let mut registry = Self::new();
        for descriptor in descriptors {
            let name = descriptor.name.clone();
            match registry.register(descriptor) {
                Ok(()) => info!(command = %name, "Registered command"),
                Err(e) => error!(command = %name, error = %e, "Unable to register command"),
            }
        }
        registry
    }

    /// Admit a descriptor if it is well formed and its name is free.
    pub fn register(&mut self, descriptor: CommandDescriptor) -> Result<(), RegistrationError> {
        validate_descriptor(&descriptor)?;
        if self.commands.contains_key(&descriptor.name) {
            return Err(RegistrationError::Duplicate(descriptor.name));
        }

        self.command_counts
            .insert(descriptor.name.clone(), AtomicU64::new(0));
        self.commands.insert(descriptor.name.clone(), descriptor);
        Ok(())
    }

    /// Exact, case-sensitive lookup.
    pub fn lookup(&self, name: &str) -> Option<&CommandDescriptor> {
        self.commands.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// All commands ordered by group, then name.
    pub fn commands(&self) -> Vec<&CommandDescriptor> {
        let mut commands: Vec<_> = self.commands.values().collect();
        commands.sort_by(|a, b| a.group.cmp(&b.group).then_with(|| a.name.cmp(&b.name)));
        commands
    }

    /// Count one use of `name`. Unknown names are ignored.
    pub fn record_use(&self, name: &str) {
        if let Some(counter) = self.command_counts.get(name) {
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Get command usage statistics, most used first.
    pub fn get_command_stats(&self) -> Vec<(&str, u64)> {
        let mut stats: Vec<_> = self
            .command_counts
            .iter()
            .map(|(cmd, count)| (cmd.as_str(), count.load(Ordering::Relaxed)))
            .filter(|(_, count)| *count > 0) // Only include used commands
            .collect();

        stats.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        stats
    }
}

/// Check the metadata and argument shape of a descriptor.
///
/// At most one free text argument is allowed and it must come last.
pub fn validate_descriptor(descriptor: &CommandDescriptor) -> Result<(), RegistrationError> {
    if descriptor.name.is_empty() {
        return Err(RegistrationError::MissingName);
    }
    if descriptor.description.is_empty() {
        return Err(RegistrationError::MissingDescription(descriptor.name.clone()));
    }
    if descriptor.group.is_empty() {
        return Err(RegistrationError::MissingGroup(descriptor.name.clone()));
    }

    let free_text: Vec<_> = descriptor
        .arguments
        .iter()
        .enumerate()
        .filter(|(_, a)| a.kind == ArgumentType::FreeText)
        .collect();

    if free_text.len() > 1 {
        return Err(RegistrationError::MultipleFreeText(descriptor.name.clone()));
    }
    if let Some((index, argument)) = free_text.first()
        && *index + 1 != descriptor.arguments.len()
    {
        return Err(RegistrationError::FreeTextNotLast {
            command: descriptor.name.clone(),
            key: argument.key.clone(),
        });
    }

    Ok(())
}
