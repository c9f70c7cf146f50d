//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::modal::FormField;

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Only show cars with a value containing this text (case-insensitive)
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// Page to show, starting at 1
    #[arg(short, long, default_value = "1")]
    pub page: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Add command arguments. Every field may be left empty.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Manufacturer name
    #[arg(long, default_value = "")]
    pub company: String,

    /// Model name
    #[arg(long, default_value = "")]
    pub model: String,

    /// Vehicle identification number
    #[arg(long, default_value = "")]
    pub vin: String,

    /// Body color
    #[arg(long, default_value = "")]
    pub color: String,

    /// Model year
    #[arg(long, default_value = "")]
    pub year: String,

    /// Price
    #[arg(long, default_value = "")]
    pub price: String,

    /// Availability
    #[arg(long, default_value = "")]
    pub availability: String,
}

impl AddCommand {
    /// The form values this command fills in.
    #[must_use]
    pub fn fields(&self) -> [(FormField, &str); 7] {
        [
            (FormField::Company, &self.company),
            (FormField::Model, &self.model),
            (FormField::Vin, &self.vin),
            (FormField::Color, &self.color),
            (FormField::Year, &self.year),
            (FormField::Price, &self.price),
            (FormField::Availability, &self.availability),
        ]
    }
}

/// Edit command arguments.
#[derive(Debug, Args)]
pub struct EditCommand {
    /// VIN of the car to change
    pub vin: String,

    /// New body color
    #[arg(long)]
    pub color: Option<String>,

    /// New price
    #[arg(long)]
    pub price: Option<String>,

    /// New availability
    #[arg(long)]
    pub availability: Option<String>,
}

impl EditCommand {
    /// The fields this command changes.
    #[must_use]
    pub fn changes(&self) -> Vec<(FormField, &str)> {
        [
            (FormField::Color, &self.color),
            (FormField::Price, &self.price),
            (FormField::Availability, &self.availability),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|v| (field, v)))
        .collect()
    }
}

/// Delete command arguments.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// VIN of the car to delete
    pub vin: String,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Reset command arguments.
#[derive(Debug, Args)]
pub struct ResetCommand {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One line per car
    Plain,
    /// Aligned columns
    #[default]
    Table,
    /// JSON array
    Json,
}
