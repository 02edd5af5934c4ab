use std::fmt;

use shared::domain::{DeviceDirection, DeviceId};
use thiserror::Error;

use crate::{messenger::MessengerError, state::ViewTag};

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("view is not mounted")]
    NotReady,
    #[error("`{action}` is not valid while the view is in {state}")]
    Sequencing {
        action: &'static str,
        state: ViewTag,
    },
    #[error("{direction} device `{device_id}` is not offered by the host")]
    UnknownDevice {
        direction: DeviceDirection,
        device_id: DeviceId,
    },
    #[error("message rates must be finite and non-negative (in={in_rate}, out={out_rate})")]
    InvalidRate { in_rate: f64, out_rate: f64 },
    #[error("host unavailable: {0}")]
    HostUnavailable(#[from] MessengerError),
}

impl ViewError {
    pub fn is_sequencing(&self) -> bool {
        matches!(self, Self::Sequencing { .. })
    }

    pub fn is_not_ready(&self) -> bool {
        matches!(self, Self::NotReady)
    }
}

/// Default device selection came out empty because the host offered no
/// devices in at least one direction. Non-fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndefinedDeviceWarning {
    pub input_missing: bool,
    pub output_missing: bool,
}

impl fmt::Display for UndefinedDeviceWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let describe = |missing: bool| if missing { "undefined" } else { "selected" };
        write!(
            f,
            "undefined device (input: {}) / (output: {})",
            describe(self.input_missing),
            describe(self.output_missing)
        )
    }
}
