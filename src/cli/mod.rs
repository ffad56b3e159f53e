//! CLI module - command-line interface for animedex
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// animedex - a small catalogue of anime with owner-scoped editing
#[derive(Parser)]
#[command(name = "animedex")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a config file (defaults to the usual search locations)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API (default)
    #[command(alias = "daemon")]
    Serve,

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Manage users and their API keys
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Create a user and print its API key
    Add {
        /// Unique username
        username: String,
    },
    /// List all users
    #[command(alias = "ls")]
    List,
    /// Replace a user's API key with a new random one
    RegenerateKey {
        /// Username
        username: String,
    },
}

pub use commands::*;
