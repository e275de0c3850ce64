/*!

The `composite-driver` library implements a machine driver that fronts several provider drivers
(Amazon EC2, DigitalOcean and Packet). A caller picks a *flavor*, which names a provider and seeds
default options; the [`CompositeDriver`] resolves it, merges the option tiers, configures the
selected inner driver and, for Amazon, makes sure the VPC, subnet and security group the machine
needs exist. Every lifecycle call after that is forwarded to the selected inner driver.

Inner drivers are supplied by the host through the [`MachineDriver`] and [`AmazonDriver`] traits.

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

mod bootstrap;
mod composite;
pub mod driver;
pub mod error;
pub mod flavor;
pub mod merge;
pub mod network;

pub use bootstrap::{init_logger, DriverSettings};
pub use composite::CompositeDriver;
pub use driver::{AmazonDriver, DriverError, DriverResult, IntoDriverError, MachineDriver};
pub use error::{Error, Result};
pub use flavor::{FlavorDirs, FlavorRegistry, FlavorSource, ResolvedFlavor};
pub use network::{ensure_network, NetworkClient, NetworkPrerequisites, NetworkSpec};
pub use rancher_cloud_model as model;
