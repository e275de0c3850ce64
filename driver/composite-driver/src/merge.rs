/*!

The `merge` module computes the option set handed to an inner driver, and decides which inner
driver flags are exposed to the caller.

Options come from four tiers, lowest priority first:

1. the inner driver's declared flags and their defaults (no default means `false`),
2. provider defaults,
3. flavor defaults,
4. values supplied by the caller.

Each tier overwrites the keys set by the tiers before it. Values are never merged deeply.

!*/

use log::debug;
use rancher_cloud_model::constants::CREDENTIAL_FLAG_NAMES;
use rancher_cloud_model::{DriverOptions, Flag, OptionValue};
use std::collections::HashSet;

/// Merge the four option tiers for an inner driver that declares `flags`.
pub fn merge_options(
    flags: &[Flag],
    provider_options: &DriverOptions,
    flavor_options: &DriverOptions,
    caller_options: &DriverOptions,
) -> DriverOptions {
    let mut merged: DriverOptions = flags
        .iter()
        .map(|flag| (flag.name.clone(), flag.default_value()))
        .collect();
    merged.overlay(provider_options);
    merged.overlay(flavor_options);
    merged.overlay(caller_options);
    debug!("Merged driver options: {}", redacted(&merged));
    merged
}

/// Remove `prefix` from every key that starts with it. Other keys are kept as they are. When both
/// `x` and `<prefix>x` are present, the prefixed key wins since it is the name that was advertised.
pub fn strip_prefix(options: &DriverOptions, prefix: &str) -> DriverOptions {
    let (prefixed, plain): (Vec<_>, Vec<_>) = options
        .iter()
        .partition(|(key, _)| key.starts_with(prefix));
    plain
        .into_iter()
        .map(|(key, value)| (key.clone(), value.clone()))
        .chain(
            prefixed
                .into_iter()
                .map(|(key, value)| (key[prefix.len()..].to_string(), value.clone())),
        )
        .collect()
}

/// Advertise `flags` under `prefix`.
pub fn prefix_flags(flags: &[Flag], prefix: &str) -> Vec<Flag> {
    flags.iter().map(|flag| flag.with_prefix(prefix)).collect()
}

/// Whether `name` looks like a credential flag, e.g. `amazonec2-access-key`.
pub fn is_credential_flag(name: &str) -> bool {
    CREDENTIAL_FLAG_NAMES
        .iter()
        .any(|credential| name.contains(credential))
}

/// The credential flags among `flags`, each at most once, in their original order.
pub fn credential_flags<'a, I>(flags: I) -> Vec<Flag>
where
    I: IntoIterator<Item = &'a Flag>,
{
    let mut seen = HashSet::new();
    flags
        .into_iter()
        .filter(|flag| is_credential_flag(&flag.name))
        .filter(|flag| seen.insert(flag.name.clone()))
        .cloned()
        .collect()
}

/// Render `options` for logging with credential values hidden.
fn redacted(options: &DriverOptions) -> String {
    options
        .iter()
        .map(|(key, value)| {
            if is_credential_flag(key) && !matches!(value, OptionValue::Bool(false)) {
                format!("{}=<redacted>", key)
            } else {
                format!("{}={}", key, value)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}
