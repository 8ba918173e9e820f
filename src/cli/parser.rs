use clap::{Parser, Subcommand};

/// Command-line interface definition for marketops
#[derive(Parser)]
#[command(
    name = "marketops",
    version = env!("CARGO_PKG_VERSION"),
    about = "Field-operations status engine: attendance, task checklists and live market summaries",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Print results as JSON instead of tables
    #[arg(global = true, long = "json")]
    pub json: bool,

    /// Diagnostic output on stderr (debug level)
    #[arg(global = true, long = "verbose", short = 'v')]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Show the effective configuration
    Config {
        /// Print the current configuration
        #[arg(long = "print", help = "Print the effective configuration")]
        print_config: bool,
    },

    /// Register a market
    AddMarket {
        /// Market name
        name: String,
    },

    /// Register an employee
    AddEmployee {
        /// Full name
        name: String,
    },

    /// Punch an employee in or out of a market session
    Punch {
        /// Employee id
        #[arg(long)]
        employee: i64,

        /// Market id
        #[arg(long)]
        market: i64,

        /// Punch in (opens the session)
        #[arg(long = "in", conflicts_with = "punch_out", required_unless_present = "punch_out")]
        punch_in: bool,

        /// Punch out (closes the session)
        #[arg(long = "out")]
        punch_out: bool,

        /// Time of the punch: HH:MM (IST) or RFC 3339. Default: now
        #[arg(long)]
        at: Option<String>,

        /// Business date (YYYY-MM-DD). Default: IST date of the punch
        #[arg(long)]
        date: Option<String>,
    },

    /// Record a checklist task for a session
    Task {
        /// Session id
        #[arg(long)]
        session: i64,

        /// Task kind: offers, commodities, feedback, inspections, planning,
        /// confirmations, outside_rates, market_video, cleaning_video, selfie
        #[arg(long)]
        kind: String,

        /// Stall number (stall confirmations only)
        #[arg(long)]
        stall: Option<i64>,

        /// Free-text details
        #[arg(long, default_value = "")]
        details: String,

        /// Time of the task: HH:MM (IST, on the session date) or RFC 3339
        #[arg(long)]
        at: Option<String>,
    },

    /// Submit next-day planning together with stall confirmations
    Plan {
        /// Session id
        #[arg(long)]
        session: i64,

        /// Confirmed stall numbers, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        stalls: Vec<i64>,

        /// Planning notes
        #[arg(long, default_value = "")]
        notes: String,

        /// Time of the submission: HH:MM (IST, on the session date) or RFC 3339
        #[arg(long)]
        at: Option<String>,
    },

    /// Finalize (or lock) a session: no further changes are accepted
    Finalize {
        /// Session id
        #[arg(long)]
        session: i64,

        /// Lock instead of finalize
        #[arg(long)]
        lock: bool,
    },

    /// Employee attendance status at one market
    Status {
        /// Market id
        #[arg(long)]
        market: i64,

        /// Business date (YYYY-MM-DD). Default: today (IST)
        #[arg(long)]
        date: Option<String>,
    },

    /// Live market summaries
    Live {
        /// Restrict to these markets (repeatable). Default: all markets
        #[arg(long = "market")]
        markets: Vec<i64>,

        /// Business date (YYYY-MM-DD). Default: today (IST)
        #[arg(long)]
        date: Option<String>,

        /// How active employees are counted: live (stored active sessions)
        /// or task (sessions with no task done)
        #[arg(long, default_value = "live")]
        rule: String,
    },

    /// All sessions of a date range with their display labels
    Sessions {
        /// First date (YYYY-MM-DD). Default: today (IST)
        #[arg(long)]
        from: Option<String>,

        /// Last date (YYYY-MM-DD). Default: same as --from
        #[arg(long)]
        to: Option<String>,

        /// Restrict to one market
        #[arg(long)]
        market: Option<i64>,

        /// Reference "today" (YYYY-MM-DD). Default: today (IST)
        #[arg(long, hide = true)]
        today: Option<String>,
    },

    /// Punch a BDO or market manager in or out
    ManagerPunch {
        /// Employee id
        #[arg(long)]
        employee: i64,

        /// Role: bdo or market_manager
        #[arg(long, default_value = "bdo")]
        role: String,

        /// Punch in
        #[arg(long = "in", conflicts_with = "punch_out", required_unless_present = "punch_out")]
        punch_in: bool,

        /// Punch out
        #[arg(long = "out")]
        punch_out: bool,

        /// Time of the punch: HH:MM (IST) or RFC 3339. Default: now
        #[arg(long)]
        at: Option<String>,

        /// Business date (YYYY-MM-DD). Default: IST date of the punch
        #[arg(long)]
        date: Option<String>,
    },

    /// BDO / market-manager day status (time-based)
    Managers {
        /// Business date (YYYY-MM-DD). Default: today (IST)
        #[arg(long)]
        date: Option<String>,
    },

    /// Print the internal audit log
    Log {
        /// Print rows from the internal `log` table
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },
}
