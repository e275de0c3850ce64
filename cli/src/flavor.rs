use anyhow::{Context, Result};
use clap::Parser;
use composite_driver::{DriverSettings, FlavorDirs};
use std::path::PathBuf;

/// Resolve a flavor from the flavor and provider directories.
#[derive(Debug, Parser)]
pub(crate) struct Flavor {
    /// Name of the flavor.
    name: String,

    /// Directory of flavor definitions. Defaults to `FLAVORS_DIR` or `$RANCHER_CLOUD_HOME/flavors`.
    #[clap(long = "flavors-dir")]
    flavors_dir: Option<PathBuf>,

    /// Directory of provider defaults. Defaults to `PROVIDERS_DIR` or
    /// `$RANCHER_CLOUD_HOME/providers`.
    #[clap(long = "providers-dir")]
    providers_dir: Option<PathBuf>,
}

impl Flavor {
    pub(crate) fn run(self, settings: DriverSettings) -> Result<()> {
        let dirs = FlavorDirs::new(
            self.flavors_dir.unwrap_or(settings.flavor_dirs.flavors),
            self.providers_dir.unwrap_or(settings.flavor_dirs.providers),
        );
        let resolved = dirs
            .resolve(&self.name)
            .context(format!("Unable to resolve flavor '{}'", self.name))?;
        println!(
            "{}",
            serde_json::to_string_pretty(&resolved)
                .context("Could not create string from flavor.")?
        );
        Ok(())
    }
}
