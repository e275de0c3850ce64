use crate::driver::{AmazonDriver, MachineDriver};
use crate::error::{self, Result};
use crate::flavor::{FlavorSource, ResolvedFlavor};
use crate::merge::{credential_flags, merge_options, prefix_flags, strip_prefix};
use crate::network::{ensure_network, NetworkPrerequisites, NetworkSpec};
use log::{debug, info};
use rancher_cloud_model::constants::{DRIVER_NAME, FLAG_PREFIX, FLAVOR_FLAG};
use rancher_cloud_model::{DriverOptions, Flag, MachineState, ProviderId};
use snafu::OptionExt;
use std::path::{Path, PathBuf};

/// The `CompositeDriver` is the machine driver the host talks to. It takes three injected inner
/// driver types, one per provider, and delegates to whichever one the caller's flavor selects.
///
/// The driver starts out unconfigured. [`CompositeDriver::set_config_from_flags`] resolves the
/// flavor, constructs the inner drivers, merges options, configures the selected driver and, for
/// Amazon EC2, resolves network prerequisites. Only after that succeeds can the lifecycle
/// operations be used; before that they fail with [`Error::NotConfigured`](crate::Error).
pub struct CompositeDriver<A, D, P>
where
    A: AmazonDriver,
    D: MachineDriver,
    P: MachineDriver,
{
    machine_name: String,
    store_path: PathBuf,
    flavors: FlavorSource,
    prefix: String,
    network_spec: NetworkSpec,

    amazonec2: Option<A>,
    digitalocean: Option<D>,
    packet: Option<P>,

    /// Set once configuration has fully succeeded.
    configured: Option<Configured>,
}

#[derive(Debug, Clone)]
struct Configured {
    flavor: ResolvedFlavor,
    network: Option<NetworkPrerequisites>,
}

impl<A, D, P> CompositeDriver<A, D, P>
where
    A: AmazonDriver,
    D: MachineDriver,
    P: MachineDriver,
{
    /// Create an unconfigured composite driver for `machine_name`. Inner drivers are created when
    /// they are first needed.
    pub fn new<S, T>(machine_name: S, store_path: T, flavors: FlavorSource) -> Self
    where
        S: Into<String>,
        T: Into<PathBuf>,
    {
        Self {
            machine_name: machine_name.into(),
            store_path: store_path.into(),
            flavors,
            prefix: FLAG_PREFIX.to_string(),
            network_spec: NetworkSpec::default(),
            amazonec2: None,
            digitalocean: None,
            packet: None,
            configured: None,
        }
    }

    /// Use `prefix` instead of `rancher-` for the flags advertised to the caller.
    pub fn with_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_network_spec(mut self, network_spec: NetworkSpec) -> Self {
        self.network_spec = network_spec;
        self
    }

    /// Use an already constructed Amazon EC2 driver instead of creating one.
    pub fn with_amazonec2(mut self, driver: A) -> Self {
        self.amazonec2 = Some(driver);
        self
    }

    /// Use an already constructed DigitalOcean driver instead of creating one.
    pub fn with_digitalocean(mut self, driver: D) -> Self {
        self.digitalocean = Some(driver);
        self
    }

    /// Use an already constructed Packet driver instead of creating one.
    pub fn with_packet(mut self, driver: P) -> Self {
        self.packet = Some(driver);
        self
    }

    pub fn driver_name(&self) -> &str {
        DRIVER_NAME
    }

    pub fn machine_name(&self) -> &str {
        &self.machine_name
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    /// The provider selected by the configured flavor.
    pub fn provider(&self) -> Option<ProviderId> {
        self.configured
            .as_ref()
            .map(|configured| configured.flavor.provider())
    }

    /// The configured flavor.
    pub fn flavor(&self) -> Option<&ResolvedFlavor> {
        self.configured.as_ref().map(|configured| &configured.flavor)
    }

    /// The network prerequisites injected into the Amazon EC2 driver, if that is the provider.
    pub fn network(&self) -> Option<&NetworkPrerequisites> {
        self.configured
            .as_ref()
            .and_then(|configured| configured.network.as_ref())
    }

    pub fn amazonec2(&self) -> Option<&A> {
        self.amazonec2.as_ref()
    }

    pub fn digitalocean(&self) -> Option<&D> {
        self.digitalocean.as_ref()
    }

    pub fn packet(&self) -> Option<&P> {
        self.packet.as_ref()
    }

    /// The flags advertised to the caller: the flavor selector plus the credential flags of every
    /// inner driver, all carrying the prefix.
    pub fn create_flags(&mut self) -> Vec<Flag> {
        self.ensure_drivers();
        let mut flags = vec![Flag::string(FLAVOR_FLAG)
            .with_usage("Flavor of machine, selects the provider and its default options")];
        let inner_flags: Vec<Flag> = ProviderId::ALL
            .iter()
            .filter_map(|provider| self.driver(*provider))
            .flat_map(|driver| driver.create_flags())
            .collect();
        flags.extend(credential_flags(&inner_flags));
        prefix_flags(&flags, &self.prefix)
    }

    /// Resolve the flavor named by the caller, configure the inner driver it selects and, for
    /// Amazon EC2, find or create its network prerequisites. On failure the driver is left
    /// unconfigured.
    pub async fn set_config_from_flags(&mut self, options: &DriverOptions) -> Result<()> {
        self.configured = None;

        let caller_options = strip_prefix(options, &self.prefix);
        let flavor_name = caller_options
            .string(FLAVOR_FLAG)
            .filter(|name| !name.is_empty())
            .context(error::MissingFlavorSnafu {
                flag: format!("{}{}", self.prefix, FLAVOR_FLAG),
            })?;
        let flavor = self.flavors.resolve(flavor_name)?;
        let provider = flavor.provider();

        self.ensure_drivers();
        let driver = self.driver_mut(provider).context(error::NotConfiguredSnafu {
            operation: "set_config_from_flags",
        })?;
        let driver_options = merge_options(
            &driver.create_flags(),
            &flavor.provider_options,
            &flavor.flavor.driver_options,
            &caller_options,
        );
        debug!(
            "Configuring '{}' driver with {} options",
            driver.driver_name(),
            driver_options.len()
        );
        driver.set_config_from_flags(&driver_options).await?;

        let network = if provider.needs_network() {
            Some(self.setup_amazon().await?)
        } else {
            None
        };

        info!(
            "Machine '{}' configured with flavor '{}' on '{}'",
            self.machine_name, flavor.name, provider
        );
        self.configured = Some(Configured { flavor, network });
        Ok(())
    }

    async fn setup_amazon(&mut self) -> Result<NetworkPrerequisites> {
        let amazonec2 = self
            .amazonec2
            .as_mut()
            .context(error::NotConfiguredSnafu {
                operation: "set_config_from_flags",
            })?;
        let client = amazonec2.network_client().await?;
        let network = ensure_network(&client, &self.network_spec).await?;
        amazonec2.set_network(&network);
        Ok(network)
    }

    pub async fn ssh_hostname(&self) -> Result<String> {
        Ok(self.active("ssh_hostname")?.ssh_hostname().await?)
    }

    pub async fn pre_create_check(&self) -> Result<()> {
        Ok(self.active("pre_create_check")?.pre_create_check().await?)
    }

    pub async fn create(&mut self) -> Result<()> {
        Ok(self.active_mut("create")?.create().await?)
    }

    pub async fn url(&self) -> Result<String> {
        Ok(self.active("url")?.url().await?)
    }

    pub async fn ip(&self) -> Result<String> {
        Ok(self.active("ip")?.ip().await?)
    }

    pub async fn state(&self) -> Result<MachineState> {
        Ok(self.active("state")?.state().await?)
    }

    pub async fn start(&mut self) -> Result<()> {
        Ok(self.active_mut("start")?.start().await?)
    }

    pub async fn stop(&mut self) -> Result<()> {
        Ok(self.active_mut("stop")?.stop().await?)
    }

    pub async fn remove(&mut self) -> Result<()> {
        Ok(self.active_mut("remove")?.remove().await?)
    }

    pub async fn restart(&mut self) -> Result<()> {
        Ok(self.active_mut("restart")?.restart().await?)
    }

    pub async fn kill(&mut self) -> Result<()> {
        Ok(self.active_mut("kill")?.kill().await?)
    }

    fn ensure_drivers(&mut self) {
        if self.amazonec2.is_none() {
            self.amazonec2 = Some(A::new(&self.machine_name, &self.store_path));
        }
        if self.digitalocean.is_none() {
            self.digitalocean = Some(D::new(&self.machine_name, &self.store_path));
        }
        if self.packet.is_none() {
            self.packet = Some(P::new(&self.machine_name, &self.store_path));
        }
    }

    fn driver(&self, provider: ProviderId) -> Option<&dyn MachineDriver> {
        match provider {
            ProviderId::Amazonec2 => self.amazonec2.as_ref().map(|d| d as &dyn MachineDriver),
            ProviderId::DigitalOcean => self.digitalocean.as_ref().map(|d| d as &dyn MachineDriver),
            ProviderId::Packet => self.packet.as_ref().map(|d| d as &dyn MachineDriver),
        }
    }

    fn driver_mut(&mut self, provider: ProviderId) -> Option<&mut dyn MachineDriver> {
        match provider {
            ProviderId::Amazonec2 => self
                .amazonec2
                .as_mut()
                .map(|d| d as &mut dyn MachineDriver),
            ProviderId::DigitalOcean => self
                .digitalocean
                .as_mut()
                .map(|d| d as &mut dyn MachineDriver),
            ProviderId::Packet => self.packet.as_mut().map(|d| d as &mut dyn MachineDriver),
        }
    }

    fn active(&self, operation: &'static str) -> Result<&dyn MachineDriver> {
        self.provider()
            .and_then(|provider| self.driver(provider))
            .context(error::NotConfiguredSnafu { operation })
    }

    fn active_mut(&mut self, operation: &'static str) -> Result<&mut dyn MachineDriver> {
        let provider = self
            .provider()
            .context(error::NotConfiguredSnafu { operation })?;
        self.driver_mut(provider)
            .context(error::NotConfiguredSnafu { operation })
    }
}
