//! droplet-deploy - provision a droplet and install FastNetMon on it

use clap::Parser;
use droplet_deploy::cli::Cli;
use droplet_deploy::domain::DeployError;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,droplet_deploy={}", cli.log_level())));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let code = match cli.run().await {
        Ok(()) => 0,
        Err(e) => {
            debug!(error = ?e, "deployment failed");
            eprintln!("Error: {e:#}");
            e.downcast_ref::<DeployError>()
                .map_or(1, DeployError::exit_code)
        }
    };
    // The stdin reader may still be parked in a blocking read.
    std::process::exit(code);
}
