/*!

This library provides the data types shared by the composite machine driver, its inner provider
drivers and the command line tool: flavors, providers, create-flag descriptors, option sets and
machine states.

!*/

#![deny(
    clippy::expect_used,
    clippy::get_unwrap,
    clippy::panic,
    clippy::panic_in_result_fn,
    clippy::panicking_unwrap,
    clippy::unwrap_in_result,
    clippy::unwrap_used
)]

pub use error::{Error, Result};
pub use flag::{Flag, FlagKind};
pub use flavor::{Flavor, ProviderId};
pub use options::{DriverOptions, OptionValue};
pub use state::MachineState;

pub mod constants;
mod error;
mod flag;
mod flavor;
mod options;
mod state;
