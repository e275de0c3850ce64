use composite_driver::network::{
    ApiError, ApiResult, NetworkClient, SecurityGroup, Subnet, Vpc,
};
use std::sync::{Arc, Mutex, MutexGuard};

/// A fake account holding VPCs, subnets and security groups. Clones share the same account, so a
/// test can keep a handle while a driver owns another.
#[derive(Clone, Debug, Default)]
pub(crate) struct MockNetworkClient {
    account: Arc<Mutex<Account>>,
}

#[derive(Debug, Default)]
pub(crate) struct Account {
    vpcs: Vec<Resource>,
    subnets: Vec<Resource>,
    security_groups: Vec<Resource>,
    calls: Vec<String>,
    next_id: u32,
    fail_on: Option<&'static str>,
    omit_id_on: Option<&'static str>,
    zone: Option<String>,
}

#[derive(Clone, Debug)]
struct Resource {
    id: String,
    /// The `Name` tag, or the group name for security groups.
    name: Option<String>,
    vpc_id: Option<String>,
    availability_zone: Option<String>,
    cidr_block: Option<String>,
}

impl Resource {
    fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: None,
            vpc_id: None,
            availability_zone: None,
            cidr_block: None,
        }
    }
}

pub(crate) const AVAILABILITY_ZONE: &str = "us-west-2b";

impl MockNetworkClient {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn account(&self) -> MutexGuard<'_, Account> {
        self.account.lock().unwrap()
    }

    pub(crate) fn with_vpc(self, id: &str, name: &str) -> Self {
        self.account().vpcs.push(Resource {
            name: Some(name.to_string()),
            ..Resource::new(id)
        });
        self
    }

    pub(crate) fn with_subnet(self, id: &str, vpc_id: &str, name: &str, zone: &str) -> Self {
        self.account().subnets.push(Resource {
            name: Some(name.to_string()),
            vpc_id: Some(vpc_id.to_string()),
            availability_zone: Some(zone.to_string()),
            ..Resource::new(id)
        });
        self
    }

    pub(crate) fn with_security_group(self, id: &str, vpc_id: &str, name: &str) -> Self {
        self.account().security_groups.push(Resource {
            name: Some(name.to_string()),
            vpc_id: Some(vpc_id.to_string()),
            ..Resource::new(id)
        });
        self
    }

    /// Make the named operation (e.g. `CreateSubnet`) fail.
    pub(crate) fn failing_on(self, operation: &'static str) -> Self {
        self.account().fail_on = Some(operation);
        self
    }

    /// Make the named create operation succeed without returning an id.
    pub(crate) fn omitting_id_on(self, operation: &'static str) -> Self {
        self.account().omit_id_on = Some(operation);
        self
    }

    /// Create subnets in `zone` instead of [`AVAILABILITY_ZONE`].
    pub(crate) fn creating_subnets_in(self, zone: &str) -> Self {
        self.account().zone = Some(zone.to_string());
        self
    }

    /// Every call made so far, by operation name.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.account().calls.clone()
    }

    /// The create calls made so far. Tagging does not count.
    pub(crate) fn create_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|call| call.starts_with("Create") && call != "CreateTags")
            .collect()
    }

    pub(crate) fn vpc_count(&self) -> usize {
        self.account().vpcs.len()
    }

    pub(crate) fn cidr_block(&self, id: &str) -> Option<String> {
        let account = self.account();
        account
            .vpcs
            .iter()
            .chain(account.subnets.iter())
            .find(|resource| resource.id == id)
            .and_then(|resource| resource.cidr_block.clone())
    }

    pub(crate) fn name_tag(&self, id: &str) -> Option<String> {
        let account = self.account();
        account
            .vpcs
            .iter()
            .chain(account.subnets.iter())
            .chain(account.security_groups.iter())
            .find(|resource| resource.id == id)
            .and_then(|resource| resource.name.clone())
    }

    /// Record the call and fail it if requested.
    fn call(&self, operation: &'static str) -> ApiResult<MutexGuard<'_, Account>> {
        let mut account = self.account();
        account.calls.push(operation.to_string());
        if account.fail_on == Some(operation) {
            return Err(ApiError::new(format!("{} is not authorized", operation)));
        }
        Ok(account)
    }
}

impl Account {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{:08x}", prefix, self.next_id)
    }

    /// The id a create call reports back for `id`.
    fn reported_id(&self, operation: &'static str, id: String) -> Option<String> {
        if self.omit_id_on == Some(operation) {
            None
        } else {
            Some(id)
        }
    }

    fn subnet_zone(&self) -> String {
        self.zone
            .clone()
            .unwrap_or_else(|| AVAILABILITY_ZONE.to_string())
    }
}

#[async_trait::async_trait]
impl NetworkClient for MockNetworkClient {
    async fn describe_vpcs(&self, name: &str) -> ApiResult<Vec<Vpc>> {
        let account = self.call("DescribeVpcs")?;
        Ok(account
            .vpcs
            .iter()
            .filter(|vpc| vpc.name.as_deref() == Some(name))
            .map(|vpc| Vpc {
                vpc_id: Some(vpc.id.clone()),
            })
            .collect())
    }

    async fn create_vpc(&self, cidr_block: &str) -> ApiResult<Vpc> {
        let mut account = self.call("CreateVpc")?;
        let id = account.next_id("vpc");
        account.vpcs.push(Resource {
            cidr_block: Some(cidr_block.to_string()),
            ..Resource::new(&id)
        });
        Ok(Vpc {
            vpc_id: account.reported_id("CreateVpc", id),
        })
    }

    async fn describe_subnets(&self, vpc_id: &str, name: &str) -> ApiResult<Vec<Subnet>> {
        let account = self.call("DescribeSubnets")?;
        Ok(account
            .subnets
            .iter()
            .filter(|subnet| subnet.vpc_id.as_deref() == Some(vpc_id))
            .filter(|subnet| subnet.name.as_deref() == Some(name))
            .map(|subnet| Subnet {
                subnet_id: Some(subnet.id.clone()),
                availability_zone: subnet.availability_zone.clone(),
            })
            .collect())
    }

    async fn create_subnet(&self, vpc_id: &str, cidr_block: &str) -> ApiResult<Subnet> {
        let mut account = self.call("CreateSubnet")?;
        let id = account.next_id("subnet");
        let zone = account.subnet_zone();
        account.subnets.push(Resource {
            vpc_id: Some(vpc_id.to_string()),
            availability_zone: Some(zone.clone()),
            cidr_block: Some(cidr_block.to_string()),
            ..Resource::new(&id)
        });
        Ok(Subnet {
            subnet_id: account.reported_id("CreateSubnet", id),
            availability_zone: Some(zone),
        })
    }

    async fn describe_security_groups(
        &self,
        vpc_id: &str,
        group_name: &str,
    ) -> ApiResult<Vec<SecurityGroup>> {
        let account = self.call("DescribeSecurityGroups")?;
        Ok(account
            .security_groups
            .iter()
            .filter(|group| group.vpc_id.as_deref() == Some(vpc_id))
            .filter(|group| group.name.as_deref() == Some(group_name))
            .map(|group| SecurityGroup {
                group_id: Some(group.id.clone()),
            })
            .collect())
    }

    async fn create_security_group(
        &self,
        vpc_id: &str,
        group_name: &str,
        _description: &str,
    ) -> ApiResult<SecurityGroup> {
        let mut account = self.call("CreateSecurityGroup")?;
        let id = account.next_id("sg");
        account.security_groups.push(Resource {
            name: Some(group_name.to_string()),
            vpc_id: Some(vpc_id.to_string()),
            ..Resource::new(&id)
        });
        Ok(SecurityGroup {
            group_id: account.reported_id("CreateSecurityGroup", id),
        })
    }

    async fn tag_resources(&self, resource_ids: &[String], name: &str) -> ApiResult<()> {
        let mut account = self.call("CreateTags")?;
        let account = &mut *account;
        for resource in account.vpcs.iter_mut().chain(account.subnets.iter_mut()) {
            if resource_ids.contains(&resource.id) {
                resource.name = Some(name.to_string());
            }
        }
        Ok(())
    }
}
