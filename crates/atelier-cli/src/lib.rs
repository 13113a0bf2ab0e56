//! Command-line interface for the Atelier content layer.
//!
//! The `atelier` binary loads site content once (`load`), keeps it fresh
//! while a host feeds change signals on stdin (`watch`), publishes edited
//! markdown into the public content root (`sync`), and manages its own
//! configuration (`config`).
//!
//! # Modules
//!
//! - [`cli`]: clap argument definitions
//! - [`config`]: [`AtelierConfig`](config::AtelierConfig) loading
//! - [`app`]: the application and command dispatch
//! - [`config_handlers`]: `config` subcommands
//! - [`sync`]: the content sync command
//! - [`watch`]: stdin-driven refresh loop

pub mod app;
pub mod cli;
pub mod config;
pub mod config_handlers;
pub mod sync;
pub mod watch;

pub use app::AtelierCli;
pub use cli::CliArgs;
pub use config::AtelierConfig;
