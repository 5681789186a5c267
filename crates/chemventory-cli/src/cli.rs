use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use chemventory_core::VERSION;

/// Chemventory - a small laboratory inventory for chemical stock
#[derive(Parser)]
#[command(name = "chemventory")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding the local cache and session files
    #[arg(long, global = true, env = "CHEMVENTORY_DATA_DIR", value_name = "DIR")]
    pub data_dir: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log backend activity to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Use ASCII symbols only
    #[arg(long, global = true)]
    pub ascii: bool,
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Hosted backend URL to store in the config
    #[arg(long)]
    pub url: Option<String>,

    /// Hosted backend anonymous key to store in the config
    #[arg(long)]
    pub anon_key: Option<String>,

    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `list` command
#[derive(Args)]
pub struct ListArgs {
    /// Case-insensitive search over name, batch, brand and location
    #[arg(value_name = "QUERY")]
    pub query: Option<String>,

    /// Only show expired chemicals
    #[arg(long)]
    pub expired: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Output format (table, plain)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,
}

/// Arguments for the `show` command
#[derive(Args)]
pub struct ShowArgs {
    /// Chemical ID
    #[arg(value_name = "ID")]
    pub id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Record fields shared by `add` and `update`
#[derive(Args, Default)]
pub struct ChemicalFields {
    /// Brand or supplier
    #[arg(long)]
    pub brand: Option<String>,

    /// Physical state as <type>:<unit>, e.g. volume:mL or mass:g
    #[arg(long, value_name = "STATE")]
    pub state: Option<String>,

    /// Date the stock arrived (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub arrival: Option<String>,

    /// Expiration date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub expires: Option<String>,

    /// Safety class (green, blue, white, yellow, red)
    #[arg(long, value_name = "CLASS")]
    pub safety_class: Option<String>,

    /// Storage location
    #[arg(long)]
    pub location: Option<String>,

    /// GHS hazard symbol
    #[arg(long, value_name = "SYMBOL")]
    pub ghs: Option<String>,
}

/// Arguments for the `add` command
#[derive(Args)]
pub struct AddArgs {
    /// Chemical name
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Batch number
    #[arg(long)]
    pub batch: String,

    /// Quantity received
    #[arg(long, default_value_t = 0.0)]
    pub initial: f64,

    /// Quantity on hand (defaults to the initial quantity)
    #[arg(long)]
    pub current: Option<f64>,

    #[command(flatten)]
    pub fields: ChemicalFields,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `update` command
#[derive(Args)]
pub struct UpdateArgs {
    /// Chemical ID
    #[arg(value_name = "ID")]
    pub id: String,

    /// New name
    #[arg(long)]
    pub name: Option<String>,

    /// New batch number
    #[arg(long)]
    pub batch: Option<String>,

    /// New initial quantity
    #[arg(long)]
    pub initial: Option<f64>,

    /// New quantity on hand
    #[arg(long)]
    pub current: Option<f64>,

    #[command(flatten)]
    pub fields: ChemicalFields,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `remove` command
#[derive(Args)]
pub struct RemoveArgs {
    /// Chemical ID
    #[arg(value_name = "ID")]
    pub id: String,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the `import` command
#[derive(Args)]
pub struct ImportArgs {
    /// CSV file to import ("-" reads stdin)
    #[arg(value_name = "FILE")]
    pub file: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `export` command
#[derive(Args)]
pub struct ExportArgs {
    /// Only export chemicals matching this search
    #[arg(value_name = "QUERY")]
    pub query: Option<String>,

    /// Only export expired chemicals
    #[arg(long)]
    pub expired: bool,

    /// Comma-separated column list (defaults to every field)
    #[arg(long, value_name = "COLUMNS")]
    pub columns: Option<String>,

    /// Write to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<String>,
}

/// Arguments for the `dashboard` command
#[derive(Args)]
pub struct DashboardArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `watch` command
#[derive(Args)]
pub struct WatchArgs {
    /// Exit after this many events
    #[arg(long, value_name = "N")]
    pub count: Option<usize>,

    /// Print each event as a JSON line
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `login` command
#[derive(Args)]
pub struct LoginArgs {
    /// Email to sign in with (prompted when omitted)
    #[arg(value_name = "EMAIL")]
    pub email: Option<String>,
}

/// Arguments for the `whoami` command
#[derive(Args)]
pub struct WhoamiArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `users list` command
#[derive(Args)]
pub struct UsersListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `users add` command
#[derive(Args)]
pub struct UsersAddArgs {
    /// Email of the user to add
    #[arg(value_name = "EMAIL")]
    pub email: String,
}

/// Arguments for the `users remove` command
#[derive(Args)]
pub struct UsersRemoveArgs {
    /// Position shown by `users list` (starting at 1)
    #[arg(value_name = "POSITION")]
    pub position: usize,
}

/// Subcommands for the `users` command
#[derive(Subcommand)]
pub enum UsersSubcommand {
    /// List application users
    List(UsersListArgs),
    /// Add an application user
    Add(UsersAddArgs),
    /// Remove an application user
    Remove(UsersRemoveArgs),
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default config file
    Init(InitArgs),

    /// List chemicals
    List(ListArgs),

    /// Show a chemical by ID
    Show(ShowArgs),

    /// Add a chemical
    Add(AddArgs),

    /// Update fields of a chemical
    Update(UpdateArgs),

    /// Remove a chemical
    Remove(RemoveArgs),

    /// Import chemicals from CSV
    Import(ImportArgs),

    /// Export chemicals as CSV
    Export(ExportArgs),

    /// Show expiry and stock alerts
    Dashboard(DashboardArgs),

    /// Store the sample chemicals when the inventory is empty
    Seed,

    /// Print change events until interrupted
    Watch(WatchArgs),

    /// Sign in with an email address
    Login(LoginArgs),

    /// Sign out
    Logout,

    /// Show the signed-in user
    Whoami(WhoamiArgs),

    /// Manage application users (admin only)
    #[command(subcommand)]
    Users(UsersSubcommand),

    /// Generate shell completions
    Completions(CompletionsArgs),
}
