/*!

This test module provides an in-memory [`NetworkClient`] that behaves like a small cloud account,
and mock inner drivers for the three providers, so that the composite driver can be tested without
talking to any cloud.

!*/

#![allow(dead_code)]

pub(crate) mod drivers;
pub(crate) mod network_client;

pub(crate) use drivers::{Amazon, DigitalOcean, MockDriver, Packet};
pub(crate) use network_client::MockNetworkClient;

use composite_driver::CompositeDriver;

pub(crate) type TestDriver =
    CompositeDriver<MockDriver<Amazon>, MockDriver<DigitalOcean>, MockDriver<Packet>>;

/// Show driver logs with `RUST_LOG=debug cargo test`.
pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
