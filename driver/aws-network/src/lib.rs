/*!

`aws-network` connects the network resolver in `composite-driver` to Amazon EC2. [`Ec2Network`]
implements [`NetworkClient`] on top of an [`aws_sdk_ec2::Client`], which can be built from a region
and, optionally, static credentials.

!*/

#![deny(
    clippy::expect_used,
    clippy::get_unwrap,
    clippy::panic,
    clippy::panic_in_result_fn,
    clippy::panicking_unwrap,
    clippy::unwrap_in_result,
    clippy::unwrap_used
)]

use aws_config::default_provider::credentials::default_provider;
use aws_config::retry::RetryConfig;
use aws_sdk_ec2::model::{Filter, Tag};
use aws_sdk_ec2::Region;
use aws_smithy_types::retry::RetryMode;
use aws_credential_types::provider::SharedCredentialsProvider;
use aws_credential_types::Credentials;
use aws_types::SdkConfig;
use composite_driver::network::{ApiError, ApiResult, SecurityGroup, Subnet, Vpc};
use composite_driver::NetworkClient;
use log::{info, trace};

const NAME_TAG: &str = "Name";
const CREDENTIALS_PROVIDER_NAME: &str = "rancher-cloud";

/// Load an AWS config for `region`. When both keys are given they are used as static credentials,
/// otherwise the default provider chain is used.
pub async fn aws_config(
    region: &str,
    access_key: Option<&str>,
    secret_key: Option<&str>,
) -> SdkConfig {
    info!("Creating an AWS config for region '{}'", region);
    let credentials = match (access_key, secret_key) {
        (Some(access_key), Some(secret_key)) => {
            SharedCredentialsProvider::new(Credentials::new(
                access_key,
                secret_key,
                None,
                None,
                CREDENTIALS_PROVIDER_NAME,
            ))
        }
        _ => SharedCredentialsProvider::new(default_provider().await),
    };
    aws_config::from_env()
        .retry_config(
            RetryConfig::standard()
                .with_retry_mode(RetryMode::Adaptive)
                .with_max_attempts(5),
        )
        .credentials_provider(credentials)
        .region(Region::new(region.to_string()))
        .load()
        .await
}

/// A [`NetworkClient`] backed by the EC2 API.
#[derive(Debug, Clone)]
pub struct Ec2Network {
    client: aws_sdk_ec2::Client,
}

impl Ec2Network {
    pub fn new(client: aws_sdk_ec2::Client) -> Self {
        Self { client }
    }

    /// Build the EC2 client from an AWS config, see [`aws_config`].
    pub async fn from_credentials(
        region: &str,
        access_key: Option<&str>,
        secret_key: Option<&str>,
    ) -> Self {
        Self::new(aws_sdk_ec2::Client::new(
            &aws_config(region, access_key, secret_key).await,
        ))
    }

    pub fn client(&self) -> &aws_sdk_ec2::Client {
        &self.client
    }
}

fn filter(name: &str, value: &str) -> Filter {
    Filter::builder().name(name).values(value).build()
}

fn name_tag_filter(name: &str) -> Filter {
    filter(&format!("tag:{}", NAME_TAG), name)
}

fn vpc_id_filter(vpc_id: &str) -> Filter {
    filter("vpc-id", vpc_id)
}

fn convert_vpc(vpc: &aws_sdk_ec2::model::Vpc) -> Vpc {
    Vpc {
        vpc_id: vpc.vpc_id().map(str::to_string),
    }
}

fn convert_subnet(subnet: &aws_sdk_ec2::model::Subnet) -> Subnet {
    Subnet {
        subnet_id: subnet.subnet_id().map(str::to_string),
        availability_zone: subnet.availability_zone().map(str::to_string),
    }
}

fn convert_security_group(group: &aws_sdk_ec2::model::SecurityGroup) -> SecurityGroup {
    SecurityGroup {
        group_id: group.group_id().map(str::to_string),
    }
}

#[async_trait::async_trait]
impl NetworkClient for Ec2Network {
    async fn describe_vpcs(&self, name: &str) -> ApiResult<Vec<Vpc>> {
        trace!("DescribeVpcs with Name '{}'", name);
        let output = self
            .client
            .describe_vpcs()
            .filters(name_tag_filter(name))
            .send()
            .await
            .map_err(ApiError::new)?;
        Ok(output
            .vpcs()
            .unwrap_or_default()
            .iter()
            .map(convert_vpc)
            .collect())
    }

    async fn create_vpc(&self, cidr_block: &str) -> ApiResult<Vpc> {
        let output = self
            .client
            .create_vpc()
            .cidr_block(cidr_block)
            .send()
            .await
            .map_err(ApiError::new)?;
        Ok(output.vpc().map(convert_vpc).unwrap_or_default())
    }

    async fn describe_subnets(&self, vpc_id: &str, name: &str) -> ApiResult<Vec<Subnet>> {
        trace!("DescribeSubnets in '{}' with Name '{}'", vpc_id, name);
        let output = self
            .client
            .describe_subnets()
            .filters(vpc_id_filter(vpc_id))
            .filters(name_tag_filter(name))
            .send()
            .await
            .map_err(ApiError::new)?;
        Ok(output
            .subnets()
            .unwrap_or_default()
            .iter()
            .map(convert_subnet)
            .collect())
    }

    async fn create_subnet(&self, vpc_id: &str, cidr_block: &str) -> ApiResult<Subnet> {
        let output = self
            .client
            .create_subnet()
            .vpc_id(vpc_id)
            .cidr_block(cidr_block)
            .send()
            .await
            .map_err(ApiError::new)?;
        Ok(output.subnet().map(convert_subnet).unwrap_or_default())
    }

    async fn describe_security_groups(
        &self,
        vpc_id: &str,
        group_name: &str,
    ) -> ApiResult<Vec<SecurityGroup>> {
        trace!(
            "DescribeSecurityGroups in '{}' named '{}'",
            vpc_id,
            group_name
        );
        let output = self
            .client
            .describe_security_groups()
            .filters(vpc_id_filter(vpc_id))
            .filters(filter("group-name", group_name))
            .send()
            .await
            .map_err(ApiError::new)?;
        Ok(output
            .security_groups()
            .unwrap_or_default()
            .iter()
            .map(convert_security_group)
            .collect())
    }

    async fn create_security_group(
        &self,
        vpc_id: &str,
        group_name: &str,
        description: &str,
    ) -> ApiResult<SecurityGroup> {
        let output = self
            .client
            .create_security_group()
            .vpc_id(vpc_id)
            .group_name(group_name)
            .description(description)
            .send()
            .await
            .map_err(ApiError::new)?;
        Ok(SecurityGroup {
            group_id: output.group_id().map(str::to_string),
        })
    }

    async fn tag_resources(&self, resource_ids: &[String], name: &str) -> ApiResult<()> {
        self.client
            .create_tags()
            .set_resources(Some(resource_ids.to_vec()))
            .tags(Tag::builder().key(NAME_TAG).value(name).build())
            .send()
            .await
            .map_err(ApiError::new)?;
        Ok(())
    }
}
