//! Subcommand dispatch and execution.
//!
//! The [`dispatch`] function routes the parsed CLI to the appropriate
//! subcommand handler: [`run`] or [`health`].

pub mod health;
pub mod run;

use crate::cli::{Cli, Commands};
use crate::error::SearchProxyError;

pub async fn dispatch(cli: Cli) -> Result<(), SearchProxyError> {
    match cli.command {
        Some(Commands::Run(args)) => run::execute(*args).await,
        Some(Commands::Health(args)) => health::execute(args).await,
        None => {
            print_welcome();
            Ok(())
        }
    }
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        "\n  search-proxy v{version} \u{2014} tenant-aware catalog and search proxy\n\n  \
         No command provided. To get started:\n\n    \
         search-proxy run                  Start the proxy on :8080\n    \
         search-proxy run --development    Start with verbose errors\n    \
         search-proxy health               Check a running instance\n    \
         search-proxy --help               See all commands and options\n"
    );
}
