use anyhow::{Context, Result};
use aws_network::Ec2Network;
use clap::Parser;
use composite_driver::model::constants::NETWORK_RESOURCE_NAME;
use composite_driver::{ensure_network, NetworkSpec};
use log::info;

/// Find or create the network prerequisites in an AWS account and print their identifiers.
#[derive(Debug, Parser)]
pub(crate) struct Network {
    /// The AWS region to use.
    #[clap(long = "region")]
    region: String,

    /// AWS access key. When omitted the default credential chain is used.
    #[clap(long = "access-key")]
    access_key: Option<String>,

    /// AWS secret key.
    #[clap(long = "secret-key")]
    secret_key: Option<String>,

    /// Name of the VPC, subnet and security group.
    #[clap(long = "name", default_value = NETWORK_RESOURCE_NAME)]
    name: String,
}

impl Network {
    pub(crate) async fn run(self) -> Result<()> {
        info!("Resolving network '{}' in region '{}'", self.name, self.region);
        let client = Ec2Network::from_credentials(
            &self.region,
            self.access_key.as_deref(),
            self.secret_key.as_deref(),
        )
        .await;
        let spec = NetworkSpec::default().with_name(&self.name);
        let network = ensure_network(&client, &spec)
            .await
            .context(format!("Unable to set up network '{}'", self.name))?;
        println!(
            "{}",
            serde_json::to_string_pretty(&network)
                .context("Could not create string from network.")?
        );
        Ok(())
    }
}
