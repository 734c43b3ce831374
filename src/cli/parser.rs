use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for rOvertime
/// CLI application to track shifts against a schedule and report overtime
#[derive(Parser)]
#[command(
    name = "rovertime",
    version = env!("CARGO_PKG_VERSION"),
    about = "Track work sessions against a shift schedule and email overtime reports",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Import a schedule file (xlsx, xls, csv or txt)
    Import {
        /// Path of the schedule file
        file: String,

        #[arg(long, help = "Year of the first bare day number (default: current year)")]
        year: Option<i32>,

        #[arg(long, help = "Month of the first bare day number (default: current month)")]
        month: Option<u32>,
    },

    /// Store a schedule entered by hand
    Manual {
        /// Work days as DATE,START,END (e.g. 2025-01-15,09:00,17:00)
        #[arg(required = true, value_name = "DATE,START,END")]
        entries: Vec<String>,
    },

    /// Show or delete schedules
    Schedule {
        #[arg(long = "print", help = "Print the current schedule")]
        print: bool,

        #[arg(long = "delete", value_name = "ID", help = "Delete a schedule by id")]
        delete: Option<String>,
    },

    /// Start a work session
    Start {
        /// Date of the session (YYYY-MM-DD, default: today)
        date: Option<String>,

        #[arg(
            long = "at",
            value_name = "TIMESTAMP",
            help = "Start time: HH:MM, YYYY-MM-DDTHH:MM or RFC 3339 (default: now)"
        )]
        at: Option<String>,

        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,

        #[arg(long, allow_hyphen_values = true)]
        lon: Option<f64>,
    },

    /// End a work session and compute overtime
    End {
        session_id: String,

        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,

        #[arg(long, allow_hyphen_values = true)]
        lon: Option<f64>,
    },

    /// Edit the start/end times or the date of a session
    Edit {
        session_id: String,

        #[arg(long = "start", help = "New start (HH:MM, YYYY-MM-DDTHH:MM or RFC 3339)")]
        start: Option<String>,

        #[arg(long = "end", help = "New end (HH:MM, YYYY-MM-DDTHH:MM or RFC 3339)")]
        end: Option<String>,

        #[arg(long = "date", help = "New date (YYYY-MM-DD)")]
        date: Option<String>,
    },

    /// Attach a photo (JPEG file) to a session
    Photo {
        session_id: String,

        #[arg(long, value_name = "FILE")]
        file: String,
    },

    /// Show the active session
    Active,

    /// List recent sessions
    History {
        #[arg(long, default_value_t = 30)]
        limit: usize,
    },

    /// Show or change the settings
    Settings {
        #[arg(long = "print", help = "Print the current settings")]
        print: bool,

        #[arg(long)]
        recipient: Option<String>,

        #[arg(long)]
        subject: Option<String>,

        #[arg(long = "template-file", value_name = "FILE", help = "HTML email template")]
        template_file: Option<String>,

        #[arg(long = "reminder-interval", value_name = "MIN")]
        reminder_interval: Option<i64>,

        #[arg(long = "reminder-duration", value_name = "SEC")]
        reminder_duration: Option<i64>,

        #[arg(long = "threshold", value_name = "MIN", help = "Overtime threshold in minutes")]
        threshold: Option<i64>,

        #[arg(long = "auto-send", value_name = "BOOL")]
        auto_send: Option<bool>,

        #[arg(long = "tz-offset", value_name = "HOURS", allow_hyphen_values = true)]
        tz_offset: Option<i32>,

        #[arg(long = "work-lat", allow_hyphen_values = true, requires = "work_lon")]
        work_lat: Option<f64>,

        #[arg(long = "work-lon", allow_hyphen_values = true, requires = "work_lat")]
        work_lon: Option<f64>,

        #[arg(long = "radius", value_name = "METERS", requires = "work_lat")]
        radius: Option<f64>,
    },

    /// Email the overtime report of a session
    Send { session_id: String },

    /// Export work sessions
    Export {
        #[arg(
            long,
            value_enum,
            help = "Output format (default: taken from the file extension)"
        )]
        format: Option<ExportFormat>,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(
            long,
            value_name = "RANGE",
            help = "Filter export by year/month/day or a custom range"
        )]
        range: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Run the HTTP API
    Serve {
        #[arg(long, help = "Port to listen on (default: server_port from config)")]
        port: Option<u16>,
    },
}
