use clap::Parser;
use netwatch::cli::{Cli, Commands};
use netwatch::output;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "netwatch=debug"
    } else {
        "netwatch=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("NETWATCH_LOG")
                .unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match &cli.command {
        Commands::Discover(cmd) => cmd.execute(cli.quiet).await,
        Commands::Probe(cmd) => cmd.execute(cli.quiet).await,
        Commands::Watch(cmd) => cmd.execute(cli.quiet).await,
    };

    if let Err(e) = result {
        output::print_error(&e.to_string());
        std::process::exit(1);
    }
}
