//! Line-driven stand-in for the embedding host.
//!
//! Plain lines are host frames (`HostCommand`). Lines prefixed with `user:`
//! simulate interaction with the rendered view. Blank lines and `#` comments
//! are ignored.

use anyhow::Context;
use crossbeam_channel::Receiver;
use serde::Deserialize;
use shared::{
    domain::DeviceId,
    protocol::{decode_host_command, HostCommand, ViewMessage},
};
use view_core::{
    ChannelMessenger, UndefinedDeviceWarning, ViewGateway, ViewSnapshot, ViewStore,
};

const USER_PREFIX: &str = "user:";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum UserAction {
    EditCredentials {
        username: String,
        bootstrap_address: String,
    },
    SelectDevices {
        input_id: Option<DeviceId>,
        output_id: Option<DeviceId>,
    },
    Login,
    Logout,
    ResetDevices,
    ChooseDevices,
    DevicesChosen,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HarnessInput {
    Host(HostCommand),
    User(UserAction),
}

impl HarnessInput {
    /// `Ok(None)` for lines that carry nothing to dispatch.
    pub fn parse(line: &str) -> anyhow::Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        if let Some(raw) = line.strip_prefix(USER_PREFIX) {
            let action = serde_json::from_str(raw.trim())
                .with_context(|| format!("malformed user action: {raw}"))?;
            return Ok(Some(Self::User(action)));
        }
        let command = decode_host_command(line).context("malformed host frame")?;
        Ok(Some(Self::Host(command)))
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct LineOutcome {
    pub outbound: Vec<ViewMessage>,
    pub warning: Option<UndefinedDeviceWarning>,
}

pub struct Harness {
    gateway: ViewGateway<ChannelMessenger>,
    outbound: Receiver<ViewMessage>,
}

impl Harness {
    pub fn new(outbound_queue_capacity: usize) -> Self {
        let (messenger, outbound) = ChannelMessenger::bounded(outbound_queue_capacity);
        let mut gateway = ViewGateway::new(messenger);
        gateway.mount(ViewStore::new());
        Self { gateway, outbound }
    }

    pub fn subscribe(
        &mut self,
        hook: impl FnMut(&ViewSnapshot<'_>) + 'static,
    ) -> anyhow::Result<()> {
        self.gateway.subscribe(hook)?;
        Ok(())
    }

    pub fn gateway(&self) -> &ViewGateway<ChannelMessenger> {
        &self.gateway
    }

    pub fn handle_line(&mut self, line: &str) -> anyhow::Result<LineOutcome> {
        let Some(input) = HarnessInput::parse(line)? else {
            return Ok(LineOutcome::default());
        };
        let warning = self.dispatch(input)?;
        let outbound = self.outbound.try_iter().collect();
        Ok(LineOutcome { outbound, warning })
    }

    fn dispatch(&mut self, input: HarnessInput) -> anyhow::Result<Option<UndefinedDeviceWarning>> {
        match input {
            HarnessInput::Host(command) => {
                let name = command.name();
                self.gateway
                    .apply(command)
                    .with_context(|| format!("host transition `{name}` rejected"))
            }
            HarnessInput::User(action) => {
                self.perform(action).context("user action rejected")?;
                Ok(None)
            }
        }
    }

    fn perform(&mut self, action: UserAction) -> Result<(), view_core::ViewError> {
        match action {
            UserAction::EditCredentials {
                username,
                bootstrap_address,
            } => self.gateway.edit_credentials(username, bootstrap_address),
            UserAction::SelectDevices {
                input_id,
                output_id,
            } => self.gateway.select_devices(input_id, output_id),
            UserAction::Login => self.gateway.login(),
            UserAction::Logout => self.gateway.logout(),
            UserAction::ResetDevices => self.gateway.reset_devices(),
            UserAction::ChooseDevices => self.gateway.choose_devices(),
            UserAction::DevicesChosen => self.gateway.devices_chosen(),
        }
    }
}

#[cfg(test)]
#[path = "tests/harness_tests.rs"]
mod tests;
