/*!

The `flavor` module resolves a flavor name into the provider it selects, the flavor's default
options and the provider's default options. Flavors come either from a [`FlavorRegistry`] built in
memory or from YAML definitions on disk (see [`FlavorDirs`]).

!*/

use crate::error::{self, Result};
use log::{debug, info};
use rancher_cloud_model::constants::DEFINITION_EXTENSION;
use rancher_cloud_model::{DriverOptions, Flavor, ProviderId};
use serde::{Deserialize, Serialize};
use snafu::{ensure, ResultExt};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Everything the composite needs to know about the selected flavor.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedFlavor {
    pub name: String,
    pub flavor: Flavor,
    /// Defaults shared by every flavor of `flavor.provider`.
    pub provider_options: DriverOptions,
}

impl ResolvedFlavor {
    pub fn provider(&self) -> ProviderId {
        self.flavor.provider
    }
}

/// Where the composite looks up flavors.
#[derive(Debug, Clone)]
pub enum FlavorSource {
    Static(FlavorRegistry),
    Directory(FlavorDirs),
}

impl FlavorSource {
    pub fn resolve(&self, name: &str) -> Result<ResolvedFlavor> {
        let resolved = match self {
            FlavorSource::Static(registry) => registry.resolve(name)?,
            FlavorSource::Directory(dirs) => dirs.resolve(name)?,
        };
        info!(
            "Flavor '{}' selects provider '{}'",
            resolved.name,
            resolved.provider()
        );
        Ok(resolved)
    }
}

impl From<FlavorRegistry> for FlavorSource {
    fn from(registry: FlavorRegistry) -> Self {
        FlavorSource::Static(registry)
    }
}

impl From<FlavorDirs> for FlavorSource {
    fn from(dirs: FlavorDirs) -> Self {
        FlavorSource::Directory(dirs)
    }
}

/// An in-memory table of flavors and provider defaults.
#[derive(Debug, Clone, Default)]
pub struct FlavorRegistry {
    flavors: BTreeMap<String, Flavor>,
    providers: BTreeMap<ProviderId, DriverOptions>,
}

impl FlavorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flavor<S: Into<String>>(mut self, name: S, flavor: Flavor) -> Self {
        self.flavors.insert(name.into(), flavor);
        self
    }

    pub fn with_provider_options(mut self, provider: ProviderId, options: DriverOptions) -> Self {
        self.providers.insert(provider, options);
        self
    }

    pub fn flavor(&self, name: &str) -> Option<&Flavor> {
        self.flavors.get(name)
    }

    pub fn resolve(&self, name: &str) -> Result<ResolvedFlavor> {
        let flavor = self
            .flavor(name)
            .cloned()
            .ok_or_else(|| error::UnrecognizedFlavorSnafu { flavor: name }.build())?;
        let provider_options = self
            .providers
            .get(&flavor.provider)
            .cloned()
            .unwrap_or_default();
        Ok(ResolvedFlavor {
            name: name.to_string(),
            flavor,
            provider_options,
        })
    }
}

/// The directories holding flavor and provider definitions, one `<name>.yaml` file each.
///
/// A flavor file names its provider and default options:
///
/// ```yaml
/// provider: amazonec2
/// driverOptions:
///   amazonec2-instance-type: t2.medium
/// ```
///
/// A provider file is a plain mapping of default options. The providers directory is optional;
/// when it does not exist there are no provider defaults.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FlavorDirs {
    pub flavors: PathBuf,
    pub providers: PathBuf,
}

/// The on-disk shape of a flavor, before the provider name is checked. Older definitions spell the
/// options key `driveroptions`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct FlavorDefinition {
    provider: String,
    #[serde(default, alias = "driveroptions")]
    driver_options: DriverOptions,
}

impl FlavorDirs {
    pub fn new<P1, P2>(flavors: P1, providers: P2) -> Self
    where
        P1: Into<PathBuf>,
        P2: Into<PathBuf>,
    {
        Self {
            flavors: flavors.into(),
            providers: providers.into(),
        }
    }

    /// Read the flavor `name` and the defaults of the provider it selects.
    pub fn resolve(&self, name: &str) -> Result<ResolvedFlavor> {
        ensure!(
            is_plain_name(name),
            error::UnrecognizedFlavorSnafu { flavor: name }
        );
        fs::read_dir(&self.flavors).context(error::ReadDirectorySnafu {
            directory: &self.flavors,
        })?;

        let path = definition_path(&self.flavors, name);
        let contents = match read_definition(&path)? {
            Some(contents) => contents,
            None => return error::UnrecognizedFlavorSnafu { flavor: name }.fail(),
        };
        let definition: FlavorDefinition =
            serde_yaml::from_str(&contents).context(error::ParseFileSnafu { path: &path })?;
        let provider = ProviderId::parse(&definition.provider)
            .context(error::UnrecognizedProviderSnafu { flavor: name })?;

        Ok(ResolvedFlavor {
            name: name.to_string(),
            flavor: Flavor::new(provider, definition.driver_options),
            provider_options: self.provider_options(provider)?,
        })
    }

    fn provider_options(&self, provider: ProviderId) -> Result<DriverOptions> {
        match fs::read_dir(&self.providers) {
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(
                    "Providers directory '{}' does not exist, using no provider defaults",
                    self.providers.display()
                );
                return Ok(DriverOptions::new());
            }
            Err(e) => {
                return Err(e).context(error::ReadDirectorySnafu {
                    directory: &self.providers,
                })
            }
        }

        let path = definition_path(&self.providers, &provider.to_string());
        let contents = match read_definition(&path)? {
            Some(contents) => contents,
            None => {
                return error::ProviderDefinitionMissingSnafu {
                    provider,
                    directory: &self.providers,
                }
                .fail()
            }
        };
        if contents.trim().is_empty() {
            return Ok(DriverOptions::new());
        }
        serde_yaml::from_str(&contents).context(error::ParseFileSnafu { path: &path })
    }
}

fn definition_path(directory: &Path, name: &str) -> PathBuf {
    directory.join(format!("{}.{}", name, DEFINITION_EXTENSION))
}

/// Read a definition file, `None` if it does not exist.
fn read_definition(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).context(error::ReadFileSnafu { path }),
    }
}

/// Flavor names map directly to file names, so they must not be able to leave the directory.
fn is_plain_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(|c: char| c == '/' || c == '\\')
}
