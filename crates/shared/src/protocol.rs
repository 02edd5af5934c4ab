//! Wire messages exchanged between the host process and the view.
//!
//! Both directions use the same framing: one JSON object per line, tagged as
//! `{"type": "...", "payload": {...}}`.

use serde::{Deserialize, Serialize};

use crate::{
    domain::{DeviceId, DeviceMap},
    error::ProtocolError,
};

/// Host-driven transition requests (host -> view).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum HostCommand {
    ToLogin {
        message: String,
        #[serde(default)]
        reset: bool,
    },
    ToUnrecoverableError {
        message: String,
    },
    ToWorking {
        message: String,
    },
    ToIdle,
    ToDeviceSelection {
        input_devices: DeviceMap,
        output_devices: DeviceMap,
    },
    UpdateMessageRates {
        in_rate: f64,
        out_rate: f64,
    },
}

impl HostCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ToLogin { .. } => "to_login",
            Self::ToUnrecoverableError { .. } => "to_unrecoverable_error",
            Self::ToWorking { .. } => "to_working",
            Self::ToIdle => "to_idle",
            Self::ToDeviceSelection { .. } => "to_device_selection",
            Self::UpdateMessageRates { .. } => "update_message_rates",
        }
    }
}

/// User intent forwarded to the host (view -> host).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ViewMessage {
    Login {
        username: String,
        bootstrap_address: String,
    },
    Logout,
    ResetDevices,
    ChooseDevices {
        input_id: Option<DeviceId>,
        output_id: Option<DeviceId>,
    },
    DevicesChosen,
}

impl ViewMessage {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Login { .. } => "login",
            Self::Logout => "logout",
            Self::ResetDevices => "reset_devices",
            Self::ChooseDevices { .. } => "choose_devices",
            Self::DevicesChosen => "devices_chosen",
        }
    }
}

pub fn decode_host_command(line: &str) -> Result<HostCommand, ProtocolError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(ProtocolError::EmptyFrame);
    }
    Ok(serde_json::from_str(line)?)
}

pub fn encode_view_message(message: &ViewMessage) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(message)?)
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
