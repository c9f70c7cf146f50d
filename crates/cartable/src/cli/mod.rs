//! Command-line interface for cartable.
//!
//! This module provides the CLI structure for the `cartab` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, ConfigCommand, DeleteCommand, EditCommand, ListCommand, OutputFormat,
    ResetCommand, StatusCommand,
};

/// cartab - Keep a searchable table of cars
///
/// Lists, searches, pages, adds, edits and deletes car records kept in a
/// local snapshot. The first run seeds the table from a remote endpoint.
#[derive(Debug, Parser)]
#[command(name = "cartab")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List cars, optionally filtered and paged
    List(ListCommand),

    /// Add a car to the top of the table
    Add(AddCommand),

    /// Change a car's color, price or availability
    Edit(EditCommand),

    /// Delete a car
    Delete(DeleteCommand),

    /// Browse the table interactively
    Browse,

    /// Show storage status
    Status(StatusCommand),

    /// Delete the saved table so the next run seeds it again
    Reset(ResetCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
