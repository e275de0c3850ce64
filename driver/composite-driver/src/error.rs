use crate::driver::DriverError;
use crate::network::NetworkError;
use rancher_cloud_model::ProviderId;
use snafu::Snafu;
use std::path::PathBuf;

/// The error type returned by the [`CompositeDriver`](crate::CompositeDriver).
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    /// An error returned by an inner driver. It is passed along as-is.
    #[snafu(display("{}", source), context(false))]
    Driver { source: DriverError },

    #[snafu(display("No flavor was provided, use the '{}' flag to select one", flag))]
    MissingFlavor { flag: String },

    #[snafu(display(
        "Unable to set up network prerequisites{}: {}",
        left_behind_message(left_behind),
        source
    ))]
    Network {
        /// Resources created before the failure. They are not rolled back.
        left_behind: Vec<String>,
        source: NetworkError,
    },

    #[snafu(display("'{}' cannot be called before the driver is configured", operation))]
    NotConfigured { operation: &'static str },

    #[snafu(display("Unable to parse '{}': {}", path.display(), source))]
    ParseFile {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[snafu(display(
        "Unrecognized provider '{}': no definition found in '{}'",
        provider,
        directory.display()
    ))]
    ProviderDefinitionMissing {
        provider: ProviderId,
        directory: PathBuf,
    },

    #[snafu(display("Unable to read directory '{}': {}", directory.display(), source))]
    ReadDirectory {
        directory: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Unable to read '{}': {}", path.display(), source))]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Unrecognized flavor '{}'", flavor))]
    UnrecognizedFlavor { flavor: String },

    #[snafu(display("Flavor '{}' uses an unrecognized provider: {}", flavor, source))]
    UnrecognizedProvider {
        flavor: String,
        source: rancher_cloud_model::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

fn left_behind_message(left_behind: &[String]) -> String {
    if left_behind.is_empty() {
        String::new()
    } else {
        format!(" (resources left behind: {})", left_behind.join(", "))
    }
}
