use crate::error::{self, Result};
use crate::DriverOptions;
use serde::{Deserialize, Serialize};
use serde_plain::{derive_display_from_serialize, derive_fromstr_from_deserialize};
use snafu::ResultExt;
use std::str::FromStr;

/// The cloud or bare-metal backends that the composite driver can delegate to. Each variant
/// corresponds to exactly one inner driver.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    /// Amazon EC2. The only provider whose network prerequisites are resolved by the composite.
    Amazonec2,
    DigitalOcean,
    Packet,
}

derive_display_from_serialize!(ProviderId);
derive_fromstr_from_deserialize!(ProviderId);

impl ProviderId {
    /// All providers, in the order their inner drivers are consulted when borrowing flags.
    pub const ALL: [ProviderId; 3] = [
        ProviderId::Amazonec2,
        ProviderId::DigitalOcean,
        ProviderId::Packet,
    ];

    /// Parse a provider name as found in flavor definitions, e.g. `amazonec2`.
    pub fn parse(value: &str) -> Result<Self> {
        Ok(Self::from_str(value).context(error::UnrecognizedProviderSnafu { value })?)
    }

    /// Whether the composite must find or create network prerequisites for this provider.
    pub fn needs_network(&self) -> bool {
        matches!(self, ProviderId::Amazonec2)
    }
}

/// A named bundle that selects a provider and seeds the inner driver's options.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flavor {
    pub provider: ProviderId,
    #[serde(default)]
    pub driver_options: DriverOptions,
}

impl Flavor {
    pub fn new(provider: ProviderId, driver_options: DriverOptions) -> Self {
        Self {
            provider,
            driver_options,
        }
    }
}
