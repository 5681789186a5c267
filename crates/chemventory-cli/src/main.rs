//! Chemventory CLI - a small laboratory inventory for chemical stock
//!
//! This is the command-line interface for Chemventory. It provides a
//! user-friendly interface to the core library functionality.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod logging;
mod output;
mod ui;

use clap::Parser;

use crate::app::AppContext;
use crate::cli::{Cli, Commands, UsersSubcommand};
use crate::commands::{account, chemicals, dashboard, init, misc, watch};
use crate::errors::CliError;
use crate::ui::print_error;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);
    let ctx = AppContext::new(&cli);

    if let Err(e) = run(&ctx, &cli).await {
        let ui_ctx = ctx.ui_context(false, None);

        let error_msg = format!("{}", e);
        let hint = extract_error_hint(&error_msg);
        let message = match error_msg.find("\nHint:") {
            Some(idx) => &error_msg[..idx],
            None => error_msg.as_str(),
        };

        print_error(&ui_ctx, message, hint.as_deref());
        let code = e.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
        std::process::exit(code);
    }
}

/// Extract a hint from an error message if it contains "Hint:" or similar patterns,
/// or provide contextual hints for common error types.
fn extract_error_hint(error: &str) -> Option<String> {
    if let Some(idx) = error.find("\nHint:") {
        return Some(error[idx + 1..].to_string());
    }

    let error_lower = error.to_lowercase();

    if error_lower.contains("failed to parse config") {
        return Some(
            "Hint: Fix the TOML file, or run `chemventory init --force` to rewrite it.".to_string(),
        );
    }

    if error_lower.contains("unknown safety class") {
        return Some("Hint: Safety classes are green, blue, white, yellow and red.".to_string());
    }

    if error_lower.contains("physical state") {
        return Some("Hint: Use <type>:<unit>, e.g. `--state volume:mL`.".to_string());
    }

    if error_lower.contains("home is not set") {
        return Some("Hint: Set HOME, or pass --data-dir and CHEMVENTORY_CONFIG.".to_string());
    }

    None
}

async fn run(ctx: &AppContext<'_>, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::Init(args)) => init::handle_init(ctx, args)?,
        Some(Commands::List(args)) => chemicals::handle_list(ctx, args).await?,
        Some(Commands::Show(args)) => chemicals::handle_show(ctx, args).await?,
        Some(Commands::Add(args)) => chemicals::handle_add(ctx, args).await?,
        Some(Commands::Update(args)) => chemicals::handle_update(ctx, args).await?,
        Some(Commands::Remove(args)) => chemicals::handle_remove(ctx, args).await?,
        Some(Commands::Import(args)) => chemicals::handle_import(ctx, args).await?,
        Some(Commands::Export(args)) => chemicals::handle_export(ctx, args).await?,
        Some(Commands::Seed) => chemicals::handle_seed(ctx).await?,
        Some(Commands::Dashboard(args)) => dashboard::handle_dashboard(ctx, args).await?,
        Some(Commands::Watch(args)) => watch::handle_watch(ctx, args).await?,
        Some(Commands::Login(args)) => account::handle_login(ctx, args)?,
        Some(Commands::Logout) => account::handle_logout(ctx)?,
        Some(Commands::Whoami(args)) => account::handle_whoami(ctx, args)?,
        Some(Commands::Users(sub)) => match sub {
            UsersSubcommand::List(args) => account::handle_users_list(ctx, args)?,
            UsersSubcommand::Add(args) => account::handle_users_add(ctx, args)?,
            UsersSubcommand::Remove(args) => account::handle_users_remove(ctx, args)?,
        },
        Some(Commands::Completions(args)) => misc::handle_completions(args)?,
        None => {
            println!("Chemventory - a small laboratory inventory for chemical stock");
            println!();
            println!("Use --help for usage information");
        }
    }
    Ok(())
}
