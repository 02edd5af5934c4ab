//! View state model: the tagged union the view renders and its payloads.

use std::fmt;

use serde::Serialize;
use shared::domain::{DeviceDirection, DeviceId, DeviceMap};

use crate::error::UndefinedDeviceWarning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewTag {
    Login,
    Working,
    UnrecoverableError,
    ActiveIdle,
    DeviceSelection,
}

impl fmt::Display for ViewTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Login => "LOGIN",
            Self::Working => "WORKING",
            Self::UnrecoverableError => "UNRECOVERABLE_ERROR",
            Self::ActiveIdle => "ACTIVE_IDLE",
            Self::DeviceSelection => "DEVICE_SELECTION",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub bootstrap_address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoginForm {
    pub username: String,
    pub bootstrap_address: String,
    pub error_message: String,
}

impl LoginForm {
    pub fn new(credentials: Credentials, error_message: impl Into<String>) -> Self {
        Self {
            username: credentials.username,
            bootstrap_address: credentials.bootstrap_address,
            error_message: error_message.into(),
        }
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            username: self.username.clone(),
            bootstrap_address: self.bootstrap_address.clone(),
        }
    }
}

/// Devices offered by the host and the ids currently selected from them.
///
/// `None` is the explicit "no selection" value. A selection is always a key
/// of its map unless the map is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeviceSelection {
    pub input_devices: DeviceMap,
    pub output_devices: DeviceMap,
    pub selected_input: Option<DeviceId>,
    pub selected_output: Option<DeviceId>,
}

impl DeviceSelection {
    /// Selects the first offered device in each direction.
    pub fn with_first_devices(input_devices: DeviceMap, output_devices: DeviceMap) -> Self {
        let selected_input = input_devices.first_key().cloned();
        let selected_output = output_devices.first_key().cloned();
        Self {
            input_devices,
            output_devices,
            selected_input,
            selected_output,
        }
    }

    pub fn devices(&self, direction: DeviceDirection) -> &DeviceMap {
        match direction {
            DeviceDirection::Input => &self.input_devices,
            DeviceDirection::Output => &self.output_devices,
        }
    }

    pub fn selected(&self, direction: DeviceDirection) -> Option<&DeviceId> {
        match direction {
            DeviceDirection::Input => self.selected_input.as_ref(),
            DeviceDirection::Output => self.selected_output.as_ref(),
        }
    }

    pub fn undefined_device_warning(&self) -> Option<UndefinedDeviceWarning> {
        let warning = UndefinedDeviceWarning {
            input_missing: self.selected_input.is_none(),
            output_missing: self.selected_output.is_none(),
        };
        (warning.input_missing || warning.output_missing).then_some(warning)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViewState {
    Login(LoginForm),
    Working { message: String },
    UnrecoverableError { message: String },
    ActiveIdle,
    DeviceSelection(DeviceSelection),
}

impl Default for ViewState {
    fn default() -> Self {
        Self::Login(LoginForm::default())
    }
}

impl ViewState {
    pub fn tag(&self) -> ViewTag {
        match self {
            Self::Login(_) => ViewTag::Login,
            Self::Working { .. } => ViewTag::Working,
            Self::UnrecoverableError { .. } => ViewTag::UnrecoverableError,
            Self::ActiveIdle => ViewTag::ActiveIdle,
            Self::DeviceSelection(_) => ViewTag::DeviceSelection,
        }
    }
}

/// Inbound/outbound message rate telemetry, displayed as-is.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MessageRates {
    pub in_rate: f64,
    pub out_rate: f64,
}

impl MessageRates {
    pub fn is_valid(&self) -> bool {
        [self.in_rate, self.out_rate]
            .iter()
            .all(|rate| rate.is_finite() && *rate >= 0.0)
    }
}
