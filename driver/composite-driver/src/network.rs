/*!

The `network` module finds or creates the VPC, subnet and security group that Amazon EC2 machines
are launched into. Each resource is looked up by a fixed name. When none exists it is created, when
exactly one exists it is reused, and when several exist the lookup fails rather than guessing.

The find-then-create sequence is not atomic. Two processes racing on an empty account can both
create a resource, and later runs will then report it as ambiguous. Nothing created here is rolled
back when a later step fails; the error lists what was left behind instead.

!*/

use crate::error::{self, Result};
use log::{debug, info, trace, warn};
use rancher_cloud_model::constants::{
    NETWORK_RESOURCE_NAME, SUBNET_CIDR_BLOCK, VPC_CIDR_BLOCK,
};
use serde::{Deserialize, Serialize};
use snafu::{OptionExt, ResultExt, Snafu};
use std::fmt::{Display, Formatter};

/// The error returned by a [`NetworkClient`]. It carries the provider's own error untouched.
#[derive(Debug)]
pub struct ApiError {
    inner: Box<dyn std::error::Error + Send + Sync + 'static>,
}

/// The result type returned by [`NetworkClient`] calls.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl ApiError {
    pub fn new<E>(source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        Self {
            inner: source.into(),
        }
    }

    pub fn inner(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.inner.as_ref()
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.inner, f)
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.inner() as &(dyn std::error::Error + 'static))
    }
}

/// The kinds of network resources that are resolved.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ResourceKind {
    Vpc,
    Subnet,
    SecurityGroup,
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(
            match self {
                ResourceKind::Vpc => "VPC",
                ResourceKind::Subnet => "subnet",
                ResourceKind::SecurityGroup => "security group",
            },
            f,
        )
    }
}

/// Errors that occur while resolving a single network resource.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum NetworkError {
    #[snafu(display("Multiple {}s named '{}' found ({})", kind, name, count))]
    AmbiguousResource {
        kind: ResourceKind,
        name: String,
        count: usize,
    },

    #[snafu(display("{} failed: {}", operation, source))]
    Api {
        operation: &'static str,
        source: ApiError,
    },

    #[snafu(display("{} response is missing {}", operation, what))]
    MissingData {
        operation: &'static str,
        what: &'static str,
    },
}

/// A VPC as reported by the provider.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Vpc {
    pub vpc_id: Option<String>,
}

/// A subnet as reported by the provider.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Subnet {
    pub subnet_id: Option<String>,
    pub availability_zone: Option<String>,
}

/// A security group as reported by the provider.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct SecurityGroup {
    pub group_id: Option<String>,
}

/// The subset of a cloud network API that find-or-create needs. It is implemented for the AWS EC2
/// client in the `aws-network` crate and by in-memory fakes in tests.
#[async_trait::async_trait]
pub trait NetworkClient: Send + Sync {
    /// VPCs whose `Name` tag equals `name`.
    async fn describe_vpcs(&self, name: &str) -> ApiResult<Vec<Vpc>>;

    async fn create_vpc(&self, cidr_block: &str) -> ApiResult<Vpc>;

    /// Subnets in `vpc_id` whose `Name` tag equals `name`.
    async fn describe_subnets(&self, vpc_id: &str, name: &str) -> ApiResult<Vec<Subnet>>;

    async fn create_subnet(&self, vpc_id: &str, cidr_block: &str) -> ApiResult<Subnet>;

    /// Security groups in `vpc_id` whose group name equals `group_name`.
    async fn describe_security_groups(
        &self,
        vpc_id: &str,
        group_name: &str,
    ) -> ApiResult<Vec<SecurityGroup>>;

    async fn create_security_group(
        &self,
        vpc_id: &str,
        group_name: &str,
        description: &str,
    ) -> ApiResult<SecurityGroup>;

    /// Set the `Name` tag of every resource in `resource_ids` to `name` in one call.
    async fn tag_resources(&self, resource_ids: &[String], name: &str) -> ApiResult<()>;
}

/// The name and address ranges used when resolving network prerequisites.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct NetworkSpec {
    /// The `Name` tag of the VPC and subnet, and the group name of the security group.
    pub name: String,
    pub vpc_cidr_block: String,
    pub subnet_cidr_block: String,
}

impl Default for NetworkSpec {
    fn default() -> Self {
        Self {
            name: NETWORK_RESOURCE_NAME.to_string(),
            vpc_cidr_block: VPC_CIDR_BLOCK.to_string(),
            subnet_cidr_block: SUBNET_CIDR_BLOCK.to_string(),
        }
    }
}

impl NetworkSpec {
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }
}

/// The identifiers an Amazon EC2 machine is launched with.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkPrerequisites {
    pub vpc_id: String,
    pub subnet_id: String,
    /// The subnet's availability zone, e.g. `us-west-2a`.
    pub availability_zone: String,
    /// The zone letter of `availability_zone`, e.g. `a`.
    pub zone: String,
    pub security_group_id: String,
}

/// Find or create the VPC, subnet and security group described by `spec`, then tag the VPC and
/// subnet so they are found again next time.
pub async fn ensure_network<C>(client: &C, spec: &NetworkSpec) -> Result<NetworkPrerequisites>
where
    C: NetworkClient + ?Sized,
{
    let mut created = Vec::new();
    let result = resolve(client, spec, &mut created).await;
    if result.is_err() && !created.is_empty() {
        warn!(
            "Network setup failed after creating {}; these resources are not removed",
            created.join(", ")
        );
    }
    result.context(error::NetworkSnafu {
        left_behind: created,
    })
}

async fn resolve<C>(
    client: &C,
    spec: &NetworkSpec,
    created: &mut Vec<String>,
) -> std::result::Result<NetworkPrerequisites, NetworkError>
where
    C: NetworkClient + ?Sized,
{
    let vpc_id = find_or_create_vpc(client, spec, created).await?;
    let (subnet_id, availability_zone) =
        find_or_create_subnet(client, spec, &vpc_id, created).await?;

    client
        .tag_resources(&[vpc_id.clone(), subnet_id.clone()], &spec.name)
        .await
        .context(ApiSnafu {
            operation: "CreateTags",
        })?;

    let zone = zone_letter(&availability_zone).context(MissingDataSnafu {
        operation: "DescribeSubnets",
        what: "an availability zone",
    })?;

    let security_group_id = find_or_create_security_group(client, spec, &vpc_id, created).await?;

    let network = NetworkPrerequisites {
        vpc_id,
        subnet_id,
        availability_zone,
        zone,
        security_group_id,
    };
    info!(
        "Using VPC '{}', subnet '{}' in '{}' and security group '{}'",
        network.vpc_id, network.subnet_id, network.availability_zone, network.security_group_id
    );
    Ok(network)
}

/// Find the VPC tagged with `spec.name`, creating it if there is none.
pub async fn find_or_create_vpc<C>(
    client: &C,
    spec: &NetworkSpec,
    created: &mut Vec<String>,
) -> std::result::Result<String, NetworkError>
where
    C: NetworkClient + ?Sized,
{
    let vpcs = client
        .describe_vpcs(&spec.name)
        .await
        .context(ApiSnafu {
            operation: "DescribeVpcs",
        })?;
    trace!("DescribeVpcs returned {:?}", vpcs);

    match unique(ResourceKind::Vpc, &spec.name, vpcs)? {
        Some(vpc) => {
            debug!("Reusing VPC named '{}'", spec.name);
            vpc.vpc_id.context(MissingDataSnafu {
                operation: "DescribeVpcs",
                what: "a VPC id",
            })
        }
        None => {
            let vpc = client
                .create_vpc(&spec.vpc_cidr_block)
                .await
                .context(ApiSnafu {
                    operation: "CreateVpc",
                })?;
            record_created(created, ResourceKind::Vpc, vpc.vpc_id, "CreateVpc", "a VPC id")
        }
    }
}

/// Find the subnet of `vpc_id` tagged with `spec.name`, creating it if there is none. Returns the
/// subnet id and its availability zone.
pub async fn find_or_create_subnet<C>(
    client: &C,
    spec: &NetworkSpec,
    vpc_id: &str,
    created: &mut Vec<String>,
) -> std::result::Result<(String, String), NetworkError>
where
    C: NetworkClient + ?Sized,
{
    let subnets = client
        .describe_subnets(vpc_id, &spec.name)
        .await
        .context(ApiSnafu {
            operation: "DescribeSubnets",
        })?;
    trace!("DescribeSubnets returned {:?}", subnets);

    let (operation, subnet_id, availability_zone) =
        match unique(ResourceKind::Subnet, &spec.name, subnets)? {
            Some(subnet) => {
                debug!("Reusing subnet named '{}'", spec.name);
                let subnet_id = subnet.subnet_id.context(MissingDataSnafu {
                    operation: "DescribeSubnets",
                    what: "a subnet id",
                })?;
                ("DescribeSubnets", subnet_id, subnet.availability_zone)
            }
            None => {
                let subnet = client
                    .create_subnet(vpc_id, &spec.subnet_cidr_block)
                    .await
                    .context(ApiSnafu {
                        operation: "CreateSubnet",
                    })?;
                let subnet_id = record_created(
                    created,
                    ResourceKind::Subnet,
                    subnet.subnet_id,
                    "CreateSubnet",
                    "a subnet id",
                )?;
                ("CreateSubnet", subnet_id, subnet.availability_zone)
            }
        };

    let availability_zone = availability_zone.context(MissingDataSnafu {
        operation,
        what: "an availability zone",
    })?;
    Ok((subnet_id, availability_zone))
}

/// Find the security group of `vpc_id` named `spec.name`, creating it if there is none. The group
/// name doubles as its identifying tag so no separate tagging is needed.
pub async fn find_or_create_security_group<C>(
    client: &C,
    spec: &NetworkSpec,
    vpc_id: &str,
    created: &mut Vec<String>,
) -> std::result::Result<String, NetworkError>
where
    C: NetworkClient + ?Sized,
{
    let groups = client
        .describe_security_groups(vpc_id, &spec.name)
        .await
        .context(ApiSnafu {
            operation: "DescribeSecurityGroups",
        })?;
    trace!("DescribeSecurityGroups returned {:?}", groups);

    match unique(ResourceKind::SecurityGroup, &spec.name, groups)? {
        Some(group) => {
            debug!("Reusing security group named '{}'", spec.name);
            group.group_id.context(MissingDataSnafu {
                operation: "DescribeSecurityGroups",
                what: "a group id",
            })
        }
        None => {
            let group = client
                .create_security_group(vpc_id, &spec.name, &spec.name)
                .await
                .context(ApiSnafu {
                    operation: "CreateSecurityGroup",
                })?;
            record_created(
                created,
                ResourceKind::SecurityGroup,
                group.group_id,
                "CreateSecurityGroup",
                "a group id",
            )
        }
    }
}

/// Add a newly created resource to `created`. A create response without an id still leaves a
/// resource behind, so it is recorded by kind.
fn record_created(
    created: &mut Vec<String>,
    kind: ResourceKind,
    id: Option<String>,
    operation: &'static str,
    what: &'static str,
) -> std::result::Result<String, NetworkError> {
    match id {
        Some(id) => {
            info!("Created {} '{}'", kind, id);
            created.push(id.clone());
            Ok(id)
        }
        None => {
            created.push(format!("{} with unknown id", kind));
            MissingDataSnafu { operation, what }.fail()
        }
    }
}

/// `None` for no matches, the match if there is exactly one, an error otherwise.
fn unique<T>(
    kind: ResourceKind,
    name: &str,
    mut found: Vec<T>,
) -> std::result::Result<Option<T>, NetworkError> {
    match found.len() {
        0 => Ok(None),
        1 => Ok(found.pop()),
        count => AmbiguousResourceSnafu { kind, name, count }.fail(),
    }
}

/// The trailing zone letter of an availability zone such as `us-west-2a`.
fn zone_letter(availability_zone: &str) -> Option<String> {
    availability_zone
        .chars()
        .last()
        .filter(|c| c.is_ascii_alphabetic())
        .map(String::from)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn zone_letter_of_availability_zone() {
        assert_eq!(zone_letter("us-west-2a").as_deref(), Some("a"));
        assert_eq!(zone_letter("eu-central-1c").as_deref(), Some("c"));
        assert_eq!(zone_letter(""), None);
        assert_eq!(zone_letter("us-west-2"), None);
    }

    #[test]
    fn unique_match_counts() {
        assert_eq!(unique::<u8>(ResourceKind::Vpc, "n", vec![]).unwrap(), None);
        assert_eq!(unique(ResourceKind::Vpc, "n", vec![7]).unwrap(), Some(7));
        let err = unique(ResourceKind::Subnet, "Rancher Cloud", vec![1, 2]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Multiple subnets named 'Rancher Cloud' found (2)"
        );
    }

    #[test]
    fn default_spec() {
        let spec = NetworkSpec::default();
        assert_eq!(spec.name, "Rancher Cloud");
        assert_eq!(spec.vpc_cidr_block, "10.0.0.0/16");
        assert_eq!(spec.subnet_cidr_block, "10.0.0.0/24");
    }
}
