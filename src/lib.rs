//! Idempotent zsh environment bootstrapper.
//!
//! Detects a Debian- or RHEL-family distribution, installs the packages a
//! comfortable zsh setup needs, installs oh-my-zsh with a theme and plugins,
//! renders `~/.zshrc`, fetches fonts and switches the login shell. Every step
//! checks before it acts, so running it again changes nothing.
//!
//! The public API is organised into layers:
//!
//! - **[`platform`]**: classify `/etc/os-release` and pick a package manager
//! - **[`config`]**: parse and validate the TOML manifest
//! - **[`resources`]**: idempotent `check + apply` primitives (packages, links, clones, …)
//! - **[`zshrc`]**: typed rendering of `~/.zshrc`
//! - **[`tasks`]**: named, ordered units of work wired to resources
//! - **[`commands`]**: top-level orchestration
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod platform;
pub mod report;
pub mod resources;
pub mod tasks;
pub mod zshrc;
