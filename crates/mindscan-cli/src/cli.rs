use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use mindscan_core::VERSION;

/// Mindscan - a private, local-first mood journal
#[derive(Parser)]
#[command(name = "mindscan")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the journal database
    #[arg(long, global = true, env = "MINDSCAN_DB")]
    pub db: Option<String>,

    #[command(subcommand)]
    pub command: Commands,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Credentials shared by every command that acts as a user
#[derive(Args)]
pub struct CredentialArgs {
    /// Account username
    #[arg(short, long)]
    pub user: String,

    /// Account password (falls back to MINDSCAN_PASSWORD, then a prompt)
    #[arg(long)]
    pub password: Option<String>,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for the `signup` command
#[derive(Args)]
pub struct SignupArgs {
    #[command(flatten)]
    pub credentials: CredentialArgs,
}

/// Arguments for the `login` command
#[derive(Args)]
pub struct LoginArgs {
    #[command(flatten)]
    pub credentials: CredentialArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `add` command
#[derive(Args)]
pub struct AddArgs {
    #[command(flatten)]
    pub credentials: CredentialArgs,

    /// Journal text ("-" reads stdin)
    #[arg(long)]
    pub text: Option<String>,

    /// Pre-computed text sentiment in [-1, 1] (skips the text classifier)
    #[arg(long, allow_negative_numbers = true)]
    pub sentiment: Option<f64>,

    /// Pre-computed text emotion label (used with --sentiment)
    #[arg(long, requires = "sentiment")]
    pub emotion: Option<String>,

    /// Facial-expression label from an image (e.g. happy, sad, surprise)
    #[arg(long, conflicts_with = "image")]
    pub face: Option<String>,

    /// Image file to pass to the configured image classifier
    #[arg(long, value_name = "PATH")]
    pub image: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `trends` command
#[derive(Args)]
pub struct TrendsArgs {
    #[command(flatten)]
    pub credentials: CredentialArgs,

    /// Window size in days (default from config, else 7)
    #[arg(long)]
    pub days: Option<u32>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_name = "SHELL")]
    pub shell: Shell,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an account
    Signup(SignupArgs),

    /// Verify credentials and print the user id
    Login(LoginArgs),

    /// Analyze and save a journal entry
    Add(AddArgs),

    /// Show mood trends over recent entries
    Trends(TrendsArgs),

    /// Bring the database schema up to date and report what changed
    Migrate,

    /// Check the database schema
    Check,

    /// Generate shell completions
    Completions(CompletionsArgs),
}
