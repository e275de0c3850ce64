use super::MockNetworkClient;
use composite_driver::{
    AmazonDriver, DriverError, DriverResult, MachineDriver, NetworkPrerequisites,
};
use composite_driver::model::{DriverOptions, Flag, MachineState};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Describes one of the providers a [`MockDriver`] can stand in for.
pub(crate) trait Kind: Send + Sync + 'static {
    const NAME: &'static str;
    fn flags() -> Vec<Flag>;
}

pub(crate) struct Amazon;
pub(crate) struct DigitalOcean;
pub(crate) struct Packet;

impl Kind for Amazon {
    const NAME: &'static str = "amazonec2";

    fn flags() -> Vec<Flag> {
        vec![
            Flag::string("amazonec2-access-key").with_env_var("AWS_ACCESS_KEY_ID"),
            Flag::string("amazonec2-secret-key").with_env_var("AWS_SECRET_ACCESS_KEY"),
            Flag::string("amazonec2-region").with_default("us-east-1"),
            Flag::string("amazonec2-instance-type").with_default("t2.micro"),
            Flag::int("amazonec2-root-size").with_default(16_i64),
            Flag::string("amazonec2-vpc-id"),
            Flag::bool("amazonec2-private-address-only"),
        ]
    }
}

impl Kind for DigitalOcean {
    const NAME: &'static str = "digitalocean";

    fn flags() -> Vec<Flag> {
        vec![
            Flag::string("digitalocean-access-token"),
            Flag::string("digitalocean-region").with_default("nyc3"),
            Flag::string("digitalocean-size").with_default("s-1vcpu-1gb"),
        ]
    }
}

impl Kind for Packet {
    const NAME: &'static str = "packet";

    fn flags() -> Vec<Flag> {
        vec![
            Flag::string("packet-api-key"),
            Flag::string("packet-project-id"),
            Flag::string("packet-plan").with_default("baremetal_0"),
            Flag::string_slice("packet-userdata"),
        ]
    }
}

/// A driver that records what it is asked to do. The option `fail-create: true` makes `create`
/// fail, and `fail-configure: true` makes configuration fail.
pub(crate) struct MockDriver<K: Kind> {
    pub(crate) machine_name: String,
    pub(crate) store_path: PathBuf,
    pub(crate) options: Option<DriverOptions>,
    pub(crate) state: MachineState,
    pub(crate) network: Option<NetworkPrerequisites>,
    client: MockNetworkClient,
    calls: Mutex<Vec<&'static str>>,
    kind: PhantomData<K>,
}

impl<K: Kind> MockDriver<K> {
    pub(crate) fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }

    fn option_set(&self, key: &str) -> bool {
        self.options
            .as_ref()
            .map(|options| options.bool(key))
            .unwrap_or(false)
    }
}

impl MockDriver<Amazon> {
    /// An Amazon driver whose network client talks to `client`'s account.
    pub(crate) fn with_client(client: MockNetworkClient) -> Self {
        let mut driver = Self::new("test-machine", Path::new("/tmp/machines"));
        driver.client = client;
        driver
    }
}

#[async_trait::async_trait]
impl<K: Kind> MachineDriver for MockDriver<K> {
    fn new(machine_name: &str, store_path: &Path) -> Self {
        Self {
            machine_name: machine_name.to_string(),
            store_path: store_path.to_path_buf(),
            options: None,
            state: MachineState::None,
            network: None,
            client: MockNetworkClient::new(),
            calls: Mutex::new(Vec::new()),
            kind: PhantomData,
        }
    }

    fn driver_name(&self) -> &str {
        K::NAME
    }

    fn create_flags(&self) -> Vec<Flag> {
        K::flags()
    }

    async fn set_config_from_flags(&mut self, options: &DriverOptions) -> DriverResult<()> {
        self.record("set_config_from_flags");
        if options.bool("fail-configure") {
            return Err(DriverError::new_with_context("invalid region"));
        }
        self.options = Some(options.clone());
        Ok(())
    }

    async fn pre_create_check(&self) -> DriverResult<()> {
        self.record("pre_create_check");
        Ok(())
    }

    async fn create(&mut self) -> DriverResult<()> {
        self.record("create");
        if self.option_set("fail-create") {
            return Err(DriverError::new_with_context("quota exceeded"));
        }
        self.state = MachineState::Running;
        Ok(())
    }

    async fn ssh_hostname(&self) -> DriverResult<String> {
        self.record("ssh_hostname");
        self.ip().await
    }

    async fn url(&self) -> DriverResult<String> {
        self.record("url");
        Ok(format!("tcp://{}:2376", self.ip().await?))
    }

    async fn ip(&self) -> DriverResult<String> {
        self.record("ip");
        match self.state {
            MachineState::None => Err(DriverError::new_with_context("machine does not exist")),
            _ => Ok("203.0.113.10".to_string()),
        }
    }

    async fn state(&self) -> DriverResult<MachineState> {
        self.record("state");
        Ok(self.state)
    }

    async fn start(&mut self) -> DriverResult<()> {
        self.record("start");
        self.state = MachineState::Running;
        Ok(())
    }

    async fn stop(&mut self) -> DriverResult<()> {
        self.record("stop");
        self.state = MachineState::Stopped;
        Ok(())
    }

    async fn remove(&mut self) -> DriverResult<()> {
        self.record("remove");
        self.state = MachineState::None;
        Ok(())
    }

    async fn restart(&mut self) -> DriverResult<()> {
        self.record("restart");
        self.state = MachineState::Running;
        Ok(())
    }

    async fn kill(&mut self) -> DriverResult<()> {
        self.record("kill");
        self.state = MachineState::Stopped;
        Ok(())
    }
}

#[async_trait::async_trait]
impl AmazonDriver for MockDriver<Amazon> {
    type Client = MockNetworkClient;

    async fn network_client(&self) -> DriverResult<Self::Client> {
        self.record("network_client");
        Ok(self.client.clone())
    }

    fn set_network(&mut self, network: &NetworkPrerequisites) {
        self.record("set_network");
        self.network = Some(network.clone());
    }
}
