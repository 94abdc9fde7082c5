use clap::Parser;
use tracing_subscriber::EnvFilter;
use uusecret::cli::{output, Cli, Commands};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::List => uusecret::cli::commands::list::execute(&cli),
        Commands::Add {
            ref secret,
            ref description,
        } => uusecret::cli::commands::add::execute(&cli, secret, description.as_deref()),
        Commands::Replace { ref path, dry_run } => {
            uusecret::cli::commands::replace::execute(&cli, path, dry_run)
        }
        Commands::Reverse { ref path, dry_run } => {
            uusecret::cli::commands::reverse::execute(&cli, path, dry_run)
        }
        Commands::RotateKey => uusecret::cli::commands::rotate::execute(&cli),
        Commands::InstallHook => uusecret::cli::commands::install_hook::execute(),
        Commands::Completions { ref shell } => uusecret::cli::commands::completions::execute(shell),
    };

    if let Err(e) = result {
        tracing::debug!(error = ?e, "command failed");
        output::error(&e.to_string());
        std::process::exit(1);
    }
}

/// Diagnostics go to stderr so stdout stays clean for tables and
/// completion scripts. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "uusecret=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
