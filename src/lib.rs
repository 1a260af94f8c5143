//! dirk - a prefix-command bot core.
//!
//! Static commands are declared with a [`CommandDescriptor`](dispatch::CommandDescriptor),
//! collected into an immutable [`Registry`](dispatch::Registry) and routed by the
//! [`Dispatcher`](dispatch::Dispatcher). Custom commands are stored in SQLite and
//! echoed when no static command matches.

pub mod commands;
pub mod config;
pub mod db;
pub mod dispatch;
pub mod error;
pub mod gateway;
pub mod telemetry;
