use clap::{Parser, Subcommand};
use colored::*;
use std::process;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::tasks::TasksCommands;
use taskmaster_client::ClientError;

#[derive(Parser)]
#[command(name = "taskmaster")]
#[command(about = "TaskMaster CLI - manage your tasks from the terminal")]
#[command(version)]
struct Cli {
    /// Override the API base URL for this invocation
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Log requests and session changes to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new account
    Signup {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        username: Option<String>,
    },
    /// Sign in and remember the session
    Login {
        #[arg(long)]
        email: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show who is signed in and which API is used
    Status,
    /// Manage tasks
    #[command(subcommand)]
    Tasks(TasksCommands),
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "taskmaster_client=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = handle_command(cli.command, cli.api_url).await {
        eprintln!("{} {}", "Error:".red().bold(), e);

        if let Some(client_error) = e.downcast_ref::<ClientError>() {
            if client_error.is_auth_error() {
                eprintln!("{}", "Run 'taskmaster login' to sign in again".dimmed());
            } else if client_error.is_network_error() {
                eprintln!(
                    "{}",
                    "Check that the API is reachable or set TASKMASTER_API_URL".dimmed()
                );
            }
        }
        process::exit(1);
    }
}

async fn handle_command(command: Commands, api_url: Option<String>) -> anyhow::Result<()> {
    let mut app = cli::App::connect(api_url.as_deref()).await?;

    match command {
        Commands::Signup { email, username } => cli::auth::signup(&mut app, email, username).await,
        Commands::Login { email } => cli::auth::login(&mut app, email).await,
        Commands::Logout => cli::auth::logout(&mut app).await,
        Commands::Status => cli::auth::status(&app).await,
        Commands::Tasks(tasks_cmd) => cli::tasks::handle_tasks_command(&mut app, tasks_cmd).await,
    }
}
