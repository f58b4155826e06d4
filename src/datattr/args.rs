use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "datattr")]
#[command(version, about = "Mirror JSON bindings onto data-* attributes", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Use the user-wide config instead of ./.datattr
    #[arg(short, long, global = true)]
    pub global: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply a binding to an empty element and print the resulting attributes
    #[command(alias = "a")]
    Apply {
        /// Path to a JSON object, or - for stdin
        binding: String,

        /// Previous binding: applied first, then cleared by the update
        #[arg(long)]
        old: Option<PathBuf>,

        /// Attribute prefix (overrides the stored config)
        #[arg(short, long)]
        name: Option<String>,

        /// Write empty values instead of skipping them
        #[arg(long)]
        empty: bool,

        /// Keep booleans as true/false
        #[arg(long)]
        bools: bool,

        /// Directive modifier flags for this call (e.g. -m empty -m bools)
        #[arg(short, long = "modifier")]
        modifiers: Vec<String>,
    },

    /// Print the attribute text of a single JSON value
    #[command(alias = "n")]
    Normalize {
        /// JSON value; anything that isn't valid JSON is taken as a string
        value: String,

        /// Write empty values instead of skipping them
        #[arg(long)]
        empty: bool,

        /// Keep booleans as true/false
        #[arg(long)]
        bools: bool,
    },

    /// Get or set stored defaults
    Config {
        /// Configuration key (name, empty, bools)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}
