use crate::core::authorize::ProjectPolicyKind;
use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for rAsistencia
/// Attendance tracking for construction projects with SQLite
#[derive(Parser)]
#[command(
    name = "rasistencia",
    version = env!("CARGO_PKG_VERSION"),
    about = "Attendance tracking for construction workers: QR check-in, lateness and attendance sheets using SQLite",
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

    /// Show or check the configuration file
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,
    },

    /// Manage the database (migrations, integrity checks, info)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        #[arg(long = "op", help = "Only rows of this operation (e.g. checkin)")]
        operation: Option<String>,

        #[arg(long = "limit", help = "Only the last N rows")]
        limit: Option<usize>,
    },

    /// Manage projects
    Project {
        #[command(subcommand)]
        action: ProjectAction,
    },

    /// Manage workers and their project assignments
    Worker {
        #[command(subcommand)]
        action: WorkerAction,
    },

    /// Manage scanning devices and their authorized projects
    Device {
        #[command(subcommand)]
        action: DeviceAction,
    },

    /// Register a QR scan (prints the JSON response)
    Checkin {
        #[arg(
            long = "worker",
            help = "Worker id",
            conflicts_with = "qr",
            required_unless_present = "qr"
        )]
        worker: Option<i64>,

        #[arg(long = "qr", help = "Scanned QR payload")]
        qr: Option<String>,

        #[arg(long = "device", help = "Scanning device id (default: configured device_id)")]
        device: Option<String>,

        /// Scan instant (YYYY-MM-DD HH:MM:SS); defaults to now
        #[arg(long = "at", hide = true)]
        at: Option<String>,

        #[arg(long = "policy", value_enum, help = "Project resolution policy")]
        policy: Option<ProjectPolicyKind>,

        #[arg(long = "pretty", help = "Pretty-print the JSON response")]
        pretty: bool,

        #[arg(long = "status", help = "Print the response status code before the body")]
        status: bool,
    },

    /// Register attendance manually
    Attend {
        #[arg(long = "project", required_unless_present = "json")]
        project: Option<i64>,

        /// Date (YYYY-MM-DD), default today
        #[arg(long = "date")]
        date: Option<String>,

        #[arg(long = "present", value_delimiter = ',', help = "Worker ids present")]
        present: Vec<i64>,

        #[arg(long = "absent", value_delimiter = ',', help = "Worker ids absent")]
        absent: Vec<i64>,

        #[arg(
            long = "form",
            help = "Mark every worker of the project; those not in --present are absent"
        )]
        form: bool,

        #[arg(long = "json", value_name = "FILE", conflicts_with_all = ["project", "form"])]
        json: Option<String>,
    },

    /// List attendance of a project for a day
    List {
        #[arg(long = "project")]
        project: i64,

        /// Date (YYYY-MM-DD), default today
        #[arg(long = "date")]
        date: Option<String>,
    },

    /// List daily sessions (anchors) for a day
    Sessions {
        /// Date (YYYY-MM-DD), default today
        #[arg(long = "date")]
        date: Option<String>,
    },

    /// Export the attendance sheet of a project
    Export {
        #[arg(long = "project")]
        project: i64,

        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: Option<String>,

        #[arg(
            long,
            value_name = "RANGE",
            conflicts_with_all = ["from", "to"],
            help = "Period: YYYY, YYYY-MM, YYYY-MM-DD or START:END"
        )]
        range: Option<String>,

        #[arg(long = "from", requires = "to")]
        from: Option<String>,

        #[arg(long = "to", requires = "from")]
        to: Option<String>,

        #[arg(long = "days", help = "Weekdays to keep, e.g. 0,2,4 (Monday = 0)")]
        days: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum ProjectAction {
    /// Create a project
    Add {
        name: String,

        #[arg(long = "description")]
        description: Option<String>,
    },
    /// List projects
    List,
}

#[derive(Subcommand)]
pub enum WorkerAction {
    /// Register a worker
    Add {
        #[arg(long = "name")]
        first_name: String,

        #[arg(long = "last-name")]
        last_name: String,

        #[arg(long = "second-last-name", default_value = "")]
        second_last_name: String,

        #[arg(long = "category", default_value = "")]
        category: String,

        #[arg(long = "phone", default_value = "")]
        phone: String,

        #[arg(long = "curp")]
        curp: Option<String>,

        #[arg(long = "nss")]
        nss: Option<String>,

        #[arg(long = "project", help = "Project id (repeatable, first = primary)")]
        projects: Vec<i64>,
    },
    /// List workers
    List {
        #[arg(long = "project")]
        project: Option<i64>,
    },
    /// Associate a worker with a project
    Assign {
        worker: i64,
        project: i64,
    },
    /// Remove a worker from a project
    Unassign {
        worker: i64,
        project: i64,
    },
    /// Print the QR payload of a worker's credential
    Qr {
        worker: i64,
    },
}

#[derive(Subcommand)]
pub enum DeviceAction {
    /// Register a scanning device
    Add {
        id: String,

        #[arg(long = "name")]
        name: String,

        #[arg(long = "project", help = "Authorized project id (repeatable)")]
        projects: Vec<i64>,
    },
    /// List devices
    List,
    /// Authorize a device for a project
    Authorize {
        device: String,
        project: i64,
    },
    /// Revoke a device's authorization for a project
    Revoke {
        device: String,
        project: i64,
    },
}
