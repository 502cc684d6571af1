use crate::core::export::ExportFormat;
use clap::{Args, Parser, Subcommand};

/// Command-line interface definition for rAttendance
/// Club attendance with geofenced check-ins, backed by SQLite
#[derive(Parser)]
#[command(
    name = "rattendance",
    version = env!("CARGO_PKG_VERSION"),
    about = "Club attendance tracking: admins open a geofenced session, members check in nearby",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Override the credential token registry (YAML)
    #[arg(global = true, long = "tokens")]
    pub tokens: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Latitude / longitude pair, in decimal degrees.
#[derive(Args, Debug, Clone)]
pub struct PointArgs {
    #[arg(long = "lat", allow_negative_numbers = true, help = "Latitude in decimal degrees")]
    pub lat: String,

    #[arg(long = "lon", allow_negative_numbers = true, help = "Longitude in decimal degrees")]
    pub lon: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Inspect the configuration file
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing fields with their default values")]
        migrate: bool,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Manage clubs
    Club {
        #[command(subcommand)]
        action: ClubAction,
    },

    /// Manage club members
    Member {
        #[command(subcommand)]
        action: MemberAction,
    },

    /// Open/close attendance or inspect the session state
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },

    /// Check in to the club's open session
    Checkin {
        #[arg(long)]
        club: Option<String>,

        #[arg(long, help = "Credential token of the member")]
        token: String,

        #[command(flatten)]
        point: PointArgs,

        #[arg(long, help = "Print the outcome as JSON")]
        json: bool,
    },

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long)]
        compress: bool,

        #[arg(long, short = 'f', help = "Overwrite an existing backup file")]
        force: bool,
    },

    /// Export the member roster
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, help = "Export a single club (default: all clubs)")]
        club: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum ClubAction {
    /// Create a club
    Add { name: String },

    /// List clubs
    List,

    /// Show members count and session flag of a club
    Show { name: String },
}

#[derive(Subcommand)]
pub enum MemberAction {
    /// Resolve the member record behind a credential token
    Get {
        #[arg(long)]
        club: Option<String>,

        #[arg(long)]
        token: String,

        #[arg(long, help = "Print the member as JSON")]
        json: bool,
    },

    /// Register the token holder as a member of the club
    New {
        #[arg(long)]
        club: Option<String>,

        #[arg(long)]
        token: String,

        #[arg(long, help = "Display name (default: name from the token registry)")]
        name: Option<String>,
    },

    /// Register many members from a CSV file (name,identity[,is_admin])
    Import {
        #[arg(long)]
        club: Option<String>,

        #[arg(long, value_name = "FILE")]
        file: String,
    },

    /// Grant (or revoke) the admin flag
    Admin {
        #[arg(long)]
        club: Option<String>,

        #[arg(long, help = "Email or phone number of the member")]
        identity: String,

        #[arg(long)]
        revoke: bool,
    },

    /// List the members of a club
    List {
        #[arg(long)]
        club: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum SessionAction {
    /// Flip the attendance flag and re-anchor the session (admins only)
    Toggle {
        #[arg(long)]
        club: Option<String>,

        #[arg(long, help = "Credential token of an admin")]
        token: String,

        #[command(flatten)]
        point: PointArgs,
    },

    /// Print whether the club is accepting check-ins
    State {
        #[arg(long)]
        club: Option<String>,
    },

    /// Show flag, anchor and last update of the session
    Show {
        #[arg(long)]
        club: Option<String>,
    },
}
