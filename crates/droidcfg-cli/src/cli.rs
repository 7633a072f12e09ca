//! CLI argument definitions for droidcfg.
//!
//! Uses `clap` derive macros to define the command surface. Each command
//! corresponds to a handler in the [`super::commands`] module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "droidcfg",
    version,
    about = "Declarative build target descriptors for Flutter Android apps",
    long_about = "droidcfg validates a Droidcfg.toml build target descriptor (SDK levels, \
                  signing, plugins, dependencies), resolves values inherited from the Flutter \
                  tool, and renders the equivalent build.gradle.kts."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to Droidcfg.toml (default: nearest one in this or a parent directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub manifest: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve and validate the descriptor
    Check {
        /// Override a provider value (e.g. flutter.versionCode=17)
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
        /// Ignore local.properties and use only --set values and SDK defaults
        #[arg(long)]
        offline_defaults: bool,
    },

    /// Print the descriptor with inherited values resolved
    Resolve {
        /// Print JSON instead of TOML
        #[arg(long)]
        json: bool,
        /// Override a provider value (e.g. flutter.versionCode=17)
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
        /// Ignore local.properties and use only --set values and SDK defaults
        #[arg(long)]
        offline_defaults: bool,
    },

    /// Render the descriptor as build.gradle.kts
    Render {
        /// Write to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Create a Droidcfg.toml in the current directory
    Init {
        /// Descriptor template: flutter, android
        #[arg(short, long, default_value = "flutter")]
        template: String,
        /// Project name (default: directory name)
        #[arg(long)]
        name: Option<String>,
        /// Application id (default: com.example.<name>)
        #[arg(long)]
        application_id: Option<String>,
    },

    /// Add a dependency
    Add {
        /// Dependency coordinate (group:artifact[:version])
        dep: String,
        /// Gradle configuration (implementation, api, testImplementation, ...)
        #[arg(short, long)]
        configuration: Option<String>,
    },
}

/// Parse CLI arguments from the process environment.
pub fn parse() -> Cli {
    Cli::parse()
}
