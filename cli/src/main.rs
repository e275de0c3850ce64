/*!

This is the command line interface for inspecting flavors and the Amazon EC2 network prerequisites
used by the composite machine driver.

!*/

mod flavor;
mod network;

use anyhow::Result;
use clap::Parser;
use composite_driver::{init_logger, DriverSettings};

/// Inspect the flavors and network prerequisites of the rancher composite machine driver.
#[derive(Debug, Parser)]
#[clap(author, version, about)]
struct Args {
    /// Log at debug level. Also enabled by the `MACHINE_DEBUG` environment variable. If the
    /// environment variable `RUST_LOG` is present, it overrides the default logging behavior. See
    /// https://docs.rs/env_logger/latest
    #[clap(long = "debug")]
    debug: bool,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Parser)]
enum Command {
    /// Resolve a flavor and show the provider and default options it selects.
    Flavor(flavor::Flavor),
    /// Find or create the VPC, subnet and security group used for Amazon EC2 machines.
    Network(network::Network),
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let settings = DriverSettings::from_env();
    init_logger(env!("CARGO_CRATE_NAME"), args.debug || settings.debug);
    if let Err(e) = run(args, settings).await {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args, settings: DriverSettings) -> Result<()> {
    match args.command {
        Command::Flavor(flavor) => flavor.run(settings),
        Command::Network(network) => network.run().await,
    }
}
