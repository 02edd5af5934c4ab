//! Transition gateway: the only surface through which the host or the user
//! changes what the view shows.
//!
//! Inbound entry points (`to_*`) replace the store's state and trigger a
//! render. Outbound actions package state into [`ViewMessage`]s for the host
//! and never touch the state themselves.

use shared::{
    domain::{DeviceDirection, DeviceId, DeviceMap},
    protocol::{HostCommand, ViewMessage},
};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{
    error::{UndefinedDeviceWarning, ViewError},
    messenger::HostMessenger,
    state::{Credentials, DeviceSelection, LoginForm, MessageRates, ViewState},
    store::{SubscriptionId, ViewSnapshot, ViewStore},
};

struct MountedView {
    id: Uuid,
    store: ViewStore,
}

impl MountedView {
    fn sequencing(&self, action: &'static str) -> ViewError {
        ViewError::Sequencing {
            action,
            state: self.store.state().tag(),
        }
    }
}

pub struct ViewGateway<M> {
    messenger: M,
    view: Option<MountedView>,
}

impl<M: HostMessenger> ViewGateway<M> {
    pub fn new(messenger: M) -> Self {
        Self {
            messenger,
            view: None,
        }
    }

    /// Attaches a store. Any previously mounted store is returned.
    pub fn mount(&mut self, store: ViewStore) -> (Uuid, Option<ViewStore>) {
        let id = Uuid::new_v4();
        info!(view_id = %id, state = %store.state().tag(), "view mounted");
        let previous = self.view.replace(MountedView { id, store });
        (id, previous.map(|view| view.store))
    }

    pub fn unmount(&mut self) -> Option<ViewStore> {
        let view = self.view.take()?;
        info!(view_id = %view.id, "view unmounted");
        Some(view.store)
    }

    pub fn view_id(&self) -> Option<Uuid> {
        self.view.as_ref().map(|view| view.id)
    }

    pub fn store(&self) -> Result<&ViewStore, ViewError> {
        self.view
            .as_ref()
            .map(|view| &view.store)
            .ok_or(ViewError::NotReady)
    }

    /// Registers a render hook on the mounted store.
    pub fn subscribe(
        &mut self,
        hook: impl FnMut(&ViewSnapshot<'_>) + 'static,
    ) -> Result<SubscriptionId, ViewError> {
        let view = self.view.as_mut().ok_or(ViewError::NotReady)?;
        Ok(view.store.subscribe(hook))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> Result<bool, ViewError> {
        let view = self.view.as_mut().ok_or(ViewError::NotReady)?;
        Ok(view.store.unsubscribe(id))
    }

    /// Routes a decoded host command to its entry point.
    pub fn apply(
        &mut self,
        command: HostCommand,
    ) -> Result<Option<UndefinedDeviceWarning>, ViewError> {
        match command {
            HostCommand::ToLogin { message, reset } => self.to_login(message, reset)?,
            HostCommand::ToUnrecoverableError { message } => {
                self.to_unrecoverable_error(message)?
            }
            HostCommand::ToWorking { message } => self.to_working(message)?,
            HostCommand::ToIdle => self.to_idle()?,
            HostCommand::ToDeviceSelection {
                input_devices,
                output_devices,
            } => return self.to_device_selection(input_devices, output_devices),
            HostCommand::UpdateMessageRates { in_rate, out_rate } => {
                self.update_message_rates(in_rate, out_rate)?
            }
        }
        Ok(None)
    }

    pub fn to_login(&mut self, message: impl Into<String>, reset: bool) -> Result<(), ViewError> {
        let view = self.view.as_mut().ok_or(ViewError::NotReady)?;
        let credentials = if reset {
            Credentials::default()
        } else {
            view.store.remembered_credentials().clone()
        };
        view.store
            .set_state(ViewState::Login(LoginForm::new(credentials, message)));
        debug!(view_id = %view.id, reset, "transitioned to LOGIN");
        Ok(())
    }

    pub fn to_unrecoverable_error(&mut self, message: impl Into<String>) -> Result<(), ViewError> {
        let view = self.view.as_mut().ok_or(ViewError::NotReady)?;
        let message = message.into();
        warn!(view_id = %view.id, %message, "transitioned to UNRECOVERABLE_ERROR");
        view.store
            .set_state(ViewState::UnrecoverableError { message });
        Ok(())
    }

    pub fn to_working(&mut self, message: impl Into<String>) -> Result<(), ViewError> {
        let view = self.view.as_mut().ok_or(ViewError::NotReady)?;
        view.store.set_state(ViewState::Working {
            message: message.into(),
        });
        debug!(view_id = %view.id, "transitioned to WORKING");
        Ok(())
    }

    pub fn to_idle(&mut self) -> Result<(), ViewError> {
        let view = self.view.as_mut().ok_or(ViewError::NotReady)?;
        view.store.set_state(ViewState::ActiveIdle);
        debug!(view_id = %view.id, "transitioned to ACTIVE_IDLE");
        Ok(())
    }

    /// Shows the host's devices with the first of each preselected, and
    /// tells the host about that preselection before committing the state.
    pub fn to_device_selection(
        &mut self,
        input_devices: DeviceMap,
        output_devices: DeviceMap,
    ) -> Result<Option<UndefinedDeviceWarning>, ViewError> {
        let view = self.view.as_mut().ok_or(ViewError::NotReady)?;
        let selection = DeviceSelection::with_first_devices(input_devices, output_devices);

        let warning = selection.undefined_device_warning();
        if let Some(warning) = &warning {
            warn!(
                view_id = %view.id,
                input_devices = selection.input_devices.len(),
                output_devices = selection.output_devices.len(),
                "{warning}; host supplied no devices"
            );
        }

        echo_default_selection(&self.messenger, view.id, &selection);

        view.store.set_state(ViewState::DeviceSelection(selection));
        debug!(view_id = %view.id, "transitioned to DEVICE_SELECTION");
        Ok(warning)
    }

    pub fn update_message_rates(&mut self, in_rate: f64, out_rate: f64) -> Result<(), ViewError> {
        let view = self.view.as_mut().ok_or(ViewError::NotReady)?;
        let rates = MessageRates { in_rate, out_rate };
        if !rates.is_valid() {
            return Err(ViewError::InvalidRate { in_rate, out_rate });
        }
        view.store.set_rates(rates);
        Ok(())
    }

    /// Login form input. Only meaningful while the form is shown.
    pub fn edit_credentials(
        &mut self,
        username: impl Into<String>,
        bootstrap_address: impl Into<String>,
    ) -> Result<(), ViewError> {
        let view = self.view.as_mut().ok_or(ViewError::NotReady)?;
        let ViewState::Login(form) = view.store.state() else {
            return Err(view.sequencing("edit_credentials"));
        };
        let next = LoginForm {
            username: username.into(),
            bootstrap_address: bootstrap_address.into(),
            error_message: form.error_message.clone(),
        };
        view.store.set_state(ViewState::Login(next));
        Ok(())
    }

    /// Device picker input. Ids must come from the maps the host supplied.
    pub fn select_devices(
        &mut self,
        input: Option<DeviceId>,
        output: Option<DeviceId>,
    ) -> Result<(), ViewError> {
        let view = self.view.as_mut().ok_or(ViewError::NotReady)?;
        let ViewState::DeviceSelection(current) = view.store.state() else {
            return Err(view.sequencing("select_devices"));
        };
        ensure_offered(current, DeviceDirection::Input, input.as_ref())?;
        ensure_offered(current, DeviceDirection::Output, output.as_ref())?;

        let next = DeviceSelection {
            selected_input: input,
            selected_output: output,
            ..current.clone()
        };
        view.store.set_state(ViewState::DeviceSelection(next));
        Ok(())
    }

    pub fn login(&self) -> Result<(), ViewError> {
        let view = self.view.as_ref().ok_or(ViewError::NotReady)?;
        let ViewState::Login(form) = view.store.state() else {
            return Err(view.sequencing("login"));
        };
        self.send(ViewMessage::Login {
            username: form.username.clone(),
            bootstrap_address: form.bootstrap_address.clone(),
        })
    }

    pub fn logout(&self) -> Result<(), ViewError> {
        self.view.as_ref().ok_or(ViewError::NotReady)?;
        self.send(ViewMessage::Logout)
    }

    pub fn reset_devices(&self) -> Result<(), ViewError> {
        self.view.as_ref().ok_or(ViewError::NotReady)?;
        self.send(ViewMessage::ResetDevices)
    }

    /// Sends whatever is currently selected in the device picker.
    pub fn choose_devices(&self) -> Result<(), ViewError> {
        let view = self.view.as_ref().ok_or(ViewError::NotReady)?;
        let ViewState::DeviceSelection(selection) = view.store.state() else {
            return Err(view.sequencing("choose_devices"));
        };
        self.send(ViewMessage::ChooseDevices {
            input_id: selection.selected_input.clone(),
            output_id: selection.selected_output.clone(),
        })
    }

    pub fn choose_devices_with(
        &self,
        input_id: Option<DeviceId>,
        output_id: Option<DeviceId>,
    ) -> Result<(), ViewError> {
        let view = self.view.as_ref().ok_or(ViewError::NotReady)?;
        if !matches!(view.store.state(), ViewState::DeviceSelection(_)) {
            return Err(view.sequencing("choose_devices"));
        }
        self.send(ViewMessage::ChooseDevices {
            input_id,
            output_id,
        })
    }

    pub fn devices_chosen(&self) -> Result<(), ViewError> {
        let view = self.view.as_ref().ok_or(ViewError::NotReady)?;
        if !matches!(view.store.state(), ViewState::DeviceSelection(_)) {
            return Err(view.sequencing("devices_chosen"));
        }
        self.send(ViewMessage::DevicesChosen)
    }

    fn send(&self, message: ViewMessage) -> Result<(), ViewError> {
        self.messenger.send(message)?;
        Ok(())
    }
}

/// Reports the computed default selection to the host so both sides agree
/// on what is active. Runs inside `to_device_selection`, before the state is
/// committed, regardless of the current tag.
fn echo_default_selection<M: HostMessenger>(
    messenger: &M,
    view_id: Uuid,
    selection: &DeviceSelection,
) {
    let message = ViewMessage::ChooseDevices {
        input_id: selection.selected_input.clone(),
        output_id: selection.selected_output.clone(),
    };
    if let Err(err) = messenger.send(message) {
        error!(%view_id, %err, "failed to echo default device selection to host");
    }
}

fn ensure_offered(
    selection: &DeviceSelection,
    direction: DeviceDirection,
    device_id: Option<&DeviceId>,
) -> Result<(), ViewError> {
    match device_id {
        Some(id) if !selection.devices(direction).contains(id) => Err(ViewError::UnknownDevice {
            direction,
            device_id: id.clone(),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
#[path = "tests/gateway_tests.rs"]
mod tests;
