//! View state controller for the login / session / device-selection flow.
//!
//! A [`ViewStore`] holds what the view shows and notifies render hooks. A
//! [`ViewGateway`] owns the mounted store and is the single entry point for
//! host-driven transitions and user actions bound for the host.

pub mod error;
pub mod gateway;
pub mod messenger;
pub mod state;
pub mod store;

pub use error::{UndefinedDeviceWarning, ViewError};
pub use gateway::ViewGateway;
pub use messenger::{ChannelMessenger, HostMessenger, MessengerError};
pub use state::{
    Credentials, DeviceSelection, LoginForm, MessageRates, ViewState, ViewTag,
};
pub use store::{RenderHook, SubscriptionId, ViewSnapshot, ViewStore};
