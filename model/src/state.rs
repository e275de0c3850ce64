use serde::{Deserialize, Serialize};
use serde_plain::derive_display_from_serialize;

/// The lifecycle state an inner driver reports for its machine.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum MachineState {
    None,
    Running,
    Paused,
    Saved,
    Stopped,
    Stopping,
    Starting,
    Error,
    Timeout,
}

derive_display_from_serialize!(MachineState);

impl Default for MachineState {
    fn default() -> Self {
        Self::None
    }
}
