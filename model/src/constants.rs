/// The name this composite driver registers under with the host.
pub const DRIVER_NAME: &str = "rancher";

/// The prefix added to every create-flag this driver advertises to the host.
pub const FLAG_PREFIX: &str = "rancher-";

/// The name of the create-flag that selects a flavor (before prefixing).
pub const FLAVOR_FLAG: &str = "flavor";

/// Substrings that identify credential flags of inner drivers. Only inner driver flags containing
/// one of these are exposed to the caller; everything else comes from flavor or provider defaults.
pub const CREDENTIAL_FLAG_NAMES: &[&str] = &[
    // Amazon
    "access-key",
    "secret-key",
    // DigitalOcean
    "access-token",
    // Packet
    "api-key",
    "project-id",
];

// Environment variables
pub const ENV_HOME: &str = "RANCHER_CLOUD_HOME";
pub const ENV_FLAVORS_DIR: &str = "FLAVORS_DIR";
pub const ENV_PROVIDERS_DIR: &str = "PROVIDERS_DIR";
pub const ENV_DEBUG: &str = "MACHINE_DEBUG";

// Paths
pub const DEFAULT_HOME: &str = "/usr/local/share/rancher-cloud";
pub const FLAVORS_SUBDIR: &str = "flavors";
pub const PROVIDERS_SUBDIR: &str = "providers";
pub const DEFINITION_EXTENSION: &str = "yaml";

// Network prerequisites
pub const NETWORK_RESOURCE_NAME: &str = "Rancher Cloud";
pub const VPC_CIDR_BLOCK: &str = "10.0.0.0/16";
pub const SUBNET_CIDR_BLOCK: &str = "10.0.0.0/24";
