/*!

The `driver` module defines the capability interface every inner provider driver implements, and
the additional hooks the composite needs from the Amazon EC2 driver.

!*/

mod error;

pub use self::error::{DriverError, DriverResult, IntoDriverError};
use crate::network::{NetworkClient, NetworkPrerequisites};
use rancher_cloud_model::{DriverOptions, Flag, MachineState};
use std::path::Path;

/// You implement [`MachineDriver`] for each provider-specific driver that the
/// [`CompositeDriver`](crate::CompositeDriver) can delegate to.
///
/// The composite constructs inner drivers lazily with [`MachineDriver::new`], queries their
/// create-flags to compute defaults and to borrow credential flags, hands them the merged options
/// through [`MachineDriver::set_config_from_flags`], and then forwards every lifecycle call to the
/// one that was selected by the flavor. Errors returned here reach the host unchanged.
#[async_trait::async_trait]
pub trait MachineDriver: Send + Sync {
    /// Create an unconfigured driver for the machine `machine_name` whose state lives under
    /// `store_path`.
    fn new(machine_name: &str, store_path: &Path) -> Self
    where
        Self: Sized;

    /// The name this driver is known by, e.g. `amazonec2`.
    fn driver_name(&self) -> &str;

    /// The flags this driver accepts, with their declared defaults.
    fn create_flags(&self) -> Vec<Flag>;

    /// Configure the driver from a complete option set.
    async fn set_config_from_flags(&mut self, options: &DriverOptions) -> DriverResult<()>;

    async fn pre_create_check(&self) -> DriverResult<()>;

    async fn create(&mut self) -> DriverResult<()>;

    async fn ssh_hostname(&self) -> DriverResult<String>;

    async fn url(&self) -> DriverResult<String>;

    async fn ip(&self) -> DriverResult<String>;

    async fn state(&self) -> DriverResult<MachineState>;

    async fn start(&mut self) -> DriverResult<()>;

    async fn stop(&mut self) -> DriverResult<()>;

    async fn remove(&mut self) -> DriverResult<()>;

    async fn restart(&mut self) -> DriverResult<()>;

    async fn kill(&mut self) -> DriverResult<()>;
}

/// The Amazon EC2 driver additionally exposes its network client so that the composite can find
/// or create the VPC, subnet and security group, and accepts the result afterwards.
#[async_trait::async_trait]
pub trait AmazonDriver: MachineDriver {
    type Client: NetworkClient;

    /// A network client built from the driver's configured region and credentials. This is only
    /// called after [`MachineDriver::set_config_from_flags`] has succeeded.
    async fn network_client(&self) -> DriverResult<Self::Client>;

    /// Record the network prerequisites in the driver's own configuration.
    fn set_network(&mut self, network: &NetworkPrerequisites);
}
