use crate::export::ExportFormat;
use clap::{ArgAction, Parser, Subcommand};

/// Command-line interface definition for glucolog
#[derive(Parser)]
#[command(
    name = "glucolog",
    version = env!("CARGO_PKG_VERSION"),
    about = "Log glucose and insulin readings, review them as a table or chart, export PDF reports",
    long_about = None
)]
pub struct Cli {
    /// Override the data file (forces the local file backend)
    #[arg(global = true, long = "data", value_name = "FILE")]
    pub data: Option<String>,

    /// Use an alternative configuration file
    #[arg(global = true, long = "config-file", value_name = "FILE")]
    pub config_file: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(global = true, short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(global = true, short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the configuration and the data file
    Init,

    /// Show or edit the configuration file
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(long = "editor", help = "Editor to use (vim, nano, or custom path)")]
        editor: Option<String>,
    },

    /// Record a new reading
    Add {
        /// Blood glucose in mg/dL (minimum 20)
        #[arg(long = "glucose", short = 'g')]
        glucose: f64,

        /// Insulin units (minimum 0, usually in 0.5 U steps)
        #[arg(long = "insulin", short = 'i', default_value_t = 0.0)]
        insulin: f64,

        /// Free-text notes
        #[arg(long = "notes", short = 'n', default_value = "")]
        notes: String,

        /// Date of the reading (YYYY-MM-DD, default: today)
        #[arg(long = "date", short = 'd')]
        date: Option<String>,

        /// Time of the reading (HH:MM or HH:MM:SS, default: now)
        #[arg(long = "time", short = 't')]
        time: Option<String>,
    },

    /// Show all readings as a table (most recent first)
    List {
        #[arg(
            long,
            short,
            value_name = "RANGE",
            help = "Filter by year/month/day or a custom range (YYYY, YYYY-MM, YYYY-MM-DD, A:B)"
        )]
        range: Option<String>,

        #[arg(long = "asc", help = "Oldest first")]
        asc: bool,
    },

    /// Plot glucose over time in the terminal
    Chart {
        #[arg(long, short, value_name = "RANGE")]
        range: Option<String>,
    },

    /// Export readings (PDF report, CSV, JSON or XLSX)
    Export {
        #[arg(long, value_enum, default_value = "pdf")]
        format: ExportFormat,

        /// Output file (default: glucose_report_<today>.<ext>)
        #[arg(long, value_name = "FILE")]
        file: Option<String>,

        #[arg(
            long,
            value_name = "RANGE",
            help = "Filter export by year/month/day or a custom range"
        )]
        range: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },
}
