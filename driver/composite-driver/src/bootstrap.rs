/*!

The `bootstrap` module reads the process environment into the settings the composite driver is
constructed with, and sets up logging.

!*/

use crate::flavor::FlavorDirs;
use env_logger::Builder;
use log::LevelFilter;
use rancher_cloud_model::constants::{
    DEFAULT_HOME, ENV_DEBUG, ENV_FLAVORS_DIR, ENV_HOME, ENV_PROVIDERS_DIR, FLAVORS_SUBDIR,
    PROVIDERS_SUBDIR,
};
use std::path::PathBuf;

/// Settings taken from the environment.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DriverSettings {
    /// Where flavor and provider definitions are read from.
    pub flavor_dirs: FlavorDirs,
    /// Whether debug logging was requested.
    pub debug: bool,
}

impl DriverSettings {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings using `lookup` to resolve environment variables.
    ///
    /// - `RANCHER_CLOUD_HOME` is the base directory (default `/usr/local/share/rancher-cloud`).
    /// - `FLAVORS_DIR` and `PROVIDERS_DIR` override `<base>/flavors` and `<base>/providers`.
    /// - `MACHINE_DEBUG` enables debug logging unless it is empty, `0` or `false`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.is_empty());
        let home = non_empty(ENV_HOME)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_HOME));
        let flavors = non_empty(ENV_FLAVORS_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| home.join(FLAVORS_SUBDIR));
        let providers = non_empty(ENV_PROVIDERS_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| home.join(PROVIDERS_SUBDIR));
        let debug = non_empty(ENV_DEBUG)
            .map(|value| !matches!(value.to_ascii_lowercase().as_str(), "0" | "false"))
            .unwrap_or(false);
        Self {
            flavor_dirs: FlavorDirs::new(flavors, providers),
            debug,
        }
    }
}

/// Extract the value of `RUST_LOG` if it exists, otherwise log the driver crates at `debug` when
/// `debug` is set and at `info` when it is not. Other crates (including the AWS SDK) only log
/// errors.
pub fn init_logger(bin_crate: &str, debug: bool) {
    match std::env::var(env_logger::DEFAULT_FILTER_ENV).ok() {
        Some(_) => {
            // RUST_LOG exists; env_logger will use it.
            Builder::from_default_env().init();
        }
        None => {
            let log_level = if debug {
                LevelFilter::Debug
            } else {
                LevelFilter::Info
            };
            Builder::new()
                .filter_level(LevelFilter::Error)
                .filter(Some(bin_crate), log_level)
                .filter(Some("aws_network"), log_level)
                .filter(Some("composite_driver"), log_level)
                .filter(Some("rancher_cloud_model"), log_level)
                .init();
        }
    }
}
