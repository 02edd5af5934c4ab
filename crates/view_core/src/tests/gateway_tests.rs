use crossbeam_channel::Receiver;

use super::*;
use crate::{
    messenger::{ChannelMessenger, MessengerError},
    state::ViewTag,
};

fn mounted() -> (ViewGateway<ChannelMessenger>, Receiver<ViewMessage>) {
    let (messenger, rx) = ChannelMessenger::bounded(16);
    let mut gateway = ViewGateway::new(messenger);
    gateway.mount(ViewStore::new());
    (gateway, rx)
}

fn drain(rx: &Receiver<ViewMessage>) -> Vec<ViewMessage> {
    rx.try_iter().collect()
}

fn state(gateway: &ViewGateway<ChannelMessenger>) -> ViewState {
    gateway.store().expect("mounted").state().clone()
}

fn map(entries: &[(&str, &str)]) -> DeviceMap {
    entries.iter().copied().collect()
}

#[test]
fn inbound_calls_before_mount_are_rejected() {
    let (messenger, rx) = ChannelMessenger::bounded(4);
    let mut gateway = ViewGateway::new(messenger);

    assert!(matches!(gateway.to_idle(), Err(ViewError::NotReady)));
    assert!(matches!(
        gateway.to_login("x", true),
        Err(ViewError::NotReady)
    ));
    assert!(matches!(
        gateway.to_device_selection(map(&[("dev1", "Mic A")]), DeviceMap::new()),
        Err(ViewError::NotReady)
    ));
    assert!(matches!(gateway.logout(), Err(ViewError::NotReady)));
    assert!(drain(&rx).is_empty(), "no echo may leak before mount");
}

#[test]
fn unmount_makes_the_gateway_not_ready_again() {
    let (mut gateway, _rx) = mounted();
    gateway.to_idle().expect("idle");

    let store = gateway.unmount().expect("was mounted");
    assert_eq!(store.state(), &ViewState::ActiveIdle);
    assert!(matches!(
        gateway.to_working("busy"),
        Err(ViewError::NotReady)
    ));
}

#[test]
fn to_login_with_reset_clears_credentials() {
    let (mut gateway, _rx) = mounted();
    gateway
        .edit_credentials("alice", "10.0.0.1:5000")
        .expect("edit");

    gateway.to_login("session expired", true).expect("login");

    assert_eq!(
        state(&gateway),
        ViewState::Login(LoginForm {
            username: String::new(),
            bootstrap_address: String::new(),
            error_message: "session expired".into(),
        })
    );
}

#[test]
fn to_login_without_reset_keeps_credentials_across_other_states() {
    let (mut gateway, _rx) = mounted();
    gateway
        .edit_credentials("alice", "10.0.0.1:5000")
        .expect("edit");
    gateway.to_working("joining overlay").expect("working");

    gateway.to_login("bootstrap unreachable", false).expect("login");

    let ViewState::Login(form) = state(&gateway) else {
        panic!("expected login form");
    };
    assert_eq!(form.username, "alice");
    assert_eq!(form.bootstrap_address, "10.0.0.1:5000");
    assert_eq!(form.error_message, "bootstrap unreachable");
}

#[test]
fn messages_are_stored_verbatim() {
    let (mut gateway, _rx) = mounted();

    gateway.to_working("  Joining… 50%  ").expect("working");
    assert_eq!(
        state(&gateway),
        ViewState::Working {
            message: "  Joining… 50%  ".into()
        }
    );

    gateway
        .to_unrecoverable_error("audio subsystem failed")
        .expect("error");
    assert_eq!(
        state(&gateway),
        ViewState::UnrecoverableError {
            message: "audio subsystem failed".into()
        }
    );
}

#[test]
fn to_idle_twice_equals_once() {
    let (mut gateway, _rx) = mounted();
    gateway.to_idle().expect("first");
    let after_once = state(&gateway);
    gateway.to_idle().expect("second");

    assert_eq!(after_once, ViewState::ActiveIdle);
    assert_eq!(state(&gateway), after_once);
}

#[test]
fn device_selection_defaults_to_first_devices_and_echoes_once() {
    let (mut gateway, rx) = mounted();

    let warning = gateway
        .to_device_selection(
            map(&[("dev1", "Mic A"), ("dev2", "Mic B")]),
            map(&[("out1", "Speaker A")]),
        )
        .expect("selection");

    assert_eq!(warning, None);
    let ViewState::DeviceSelection(selection) = state(&gateway) else {
        panic!("expected device selection");
    };
    assert_eq!(selection.selected_input, Some(DeviceId::new("dev1")));
    assert_eq!(selection.selected_output, Some(DeviceId::new("out1")));
    assert_eq!(
        drain(&rx),
        vec![ViewMessage::ChooseDevices {
            input_id: Some(DeviceId::new("dev1")),
            output_id: Some(DeviceId::new("out1")),
        }]
    );
}

#[test]
fn empty_input_map_warns_and_still_transitions() {
    let (mut gateway, rx) = mounted();

    let warning = gateway
        .to_device_selection(DeviceMap::new(), map(&[("out1", "Speaker A")]))
        .expect("selection");

    assert_eq!(
        warning,
        Some(UndefinedDeviceWarning {
            input_missing: true,
            output_missing: false,
        })
    );
    let ViewState::DeviceSelection(selection) = state(&gateway) else {
        panic!("expected device selection");
    };
    assert_eq!(selection.selected_input, None);
    assert_eq!(
        drain(&rx),
        vec![ViewMessage::ChooseDevices {
            input_id: None,
            output_id: Some(DeviceId::new("out1")),
        }]
    );
}

#[test]
fn both_maps_empty_is_a_warning_not_an_error() {
    let (mut gateway, _rx) = mounted();

    let warning = gateway
        .to_device_selection(DeviceMap::new(), DeviceMap::new())
        .expect("selection");

    assert_eq!(
        warning,
        Some(UndefinedDeviceWarning {
            input_missing: true,
            output_missing: true,
        })
    );
    assert_eq!(
        gateway.store().expect("mounted").state().tag(),
        ViewTag::DeviceSelection
    );
}

#[test]
fn echo_is_sent_before_render_observes_device_selection() {
    let (messenger, rx) = ChannelMessenger::bounded(4);
    let mut gateway = ViewGateway::new(messenger);
    let mut store = ViewStore::new();
    let seen_echo = std::rc::Rc::new(std::cell::Cell::new(false));
    let flag = std::rc::Rc::clone(&seen_echo);
    let echo_rx = rx.clone();
    store.subscribe(move |snapshot| {
        if snapshot.state.tag() == ViewTag::DeviceSelection {
            flag.set(!echo_rx.is_empty());
        }
    });
    gateway.mount(store);

    gateway
        .to_device_selection(map(&[("dev1", "Mic A")]), map(&[("out1", "Speaker A")]))
        .expect("selection");

    assert!(seen_echo.get());
}

#[test]
fn failed_echo_does_not_block_the_transition() {
    let (messenger, rx) = ChannelMessenger::bounded(1);
    drop(rx);
    let mut gateway = ViewGateway::new(messenger);
    gateway.mount(ViewStore::new());

    gateway
        .to_device_selection(map(&[("dev1", "Mic A")]), map(&[("out1", "Speaker A")]))
        .expect("transition completes");

    assert_eq!(
        gateway.store().expect("mounted").state().tag(),
        ViewTag::DeviceSelection
    );
}

#[test]
fn login_sends_current_form_fields() {
    let (mut gateway, rx) = mounted();
    gateway
        .edit_credentials("alice", "10.0.0.1:5000")
        .expect("edit");

    gateway.login().expect("login");

    assert_eq!(
        drain(&rx),
        vec![ViewMessage::Login {
            username: "alice".into(),
            bootstrap_address: "10.0.0.1:5000".into(),
        }]
    );
    assert_eq!(
        gateway.store().expect("mounted").state().tag(),
        ViewTag::Login,
        "outbound actions never change the state"
    );
}

#[test]
fn login_while_working_is_a_sequencing_error() {
    let (mut gateway, rx) = mounted();
    gateway.to_working("connecting").expect("working");

    let err = gateway.login().expect_err("login outside LOGIN");

    assert!(matches!(
        err,
        ViewError::Sequencing {
            action: "login",
            state: ViewTag::Working
        }
    ));
    assert!(err.is_sequencing());
    assert!(drain(&rx).is_empty());
}

#[test]
fn logout_and_reset_devices_are_valid_from_any_state() {
    let (mut gateway, rx) = mounted();
    gateway.to_unrecoverable_error("fatal").expect("error");

    gateway.logout().expect("logout");
    gateway.reset_devices().expect("reset");

    assert_eq!(
        drain(&rx),
        vec![ViewMessage::Logout, ViewMessage::ResetDevices]
    );
}

#[test]
fn device_actions_require_device_selection() {
    let (mut gateway, rx) = mounted();
    gateway.to_idle().expect("idle");

    assert!(matches!(
        gateway.choose_devices(),
        Err(ViewError::Sequencing {
            action: "choose_devices",
            ..
        })
    ));
    assert!(matches!(
        gateway.choose_devices_with(Some(DeviceId::new("dev1")), None),
        Err(ViewError::Sequencing { .. })
    ));
    assert!(matches!(
        gateway.devices_chosen(),
        Err(ViewError::Sequencing {
            action: "devices_chosen",
            ..
        })
    ));
    assert!(drain(&rx).is_empty());
}

#[test]
fn user_selection_is_sent_by_choose_devices_then_confirmed() {
    let (mut gateway, rx) = mounted();
    gateway
        .to_device_selection(
            map(&[("dev1", "Mic A"), ("dev2", "Mic B")]),
            map(&[("out1", "Speaker A"), ("out2", "Speaker B")]),
        )
        .expect("selection");
    drain(&rx);

    gateway
        .select_devices(Some(DeviceId::new("dev2")), Some(DeviceId::new("out2")))
        .expect("select");
    gateway.choose_devices().expect("choose");
    gateway.devices_chosen().expect("confirm");

    assert_eq!(
        drain(&rx),
        vec![
            ViewMessage::ChooseDevices {
                input_id: Some(DeviceId::new("dev2")),
                output_id: Some(DeviceId::new("out2")),
            },
            ViewMessage::DevicesChosen,
        ]
    );
}

#[test]
fn selecting_an_unoffered_device_is_rejected() {
    let (mut gateway, _rx) = mounted();
    gateway
        .to_device_selection(map(&[("dev1", "Mic A")]), map(&[("out1", "Speaker A")]))
        .expect("selection");

    let err = gateway
        .select_devices(Some(DeviceId::new("dev1")), Some(DeviceId::new("hdmi")))
        .expect_err("unknown output");

    assert!(matches!(
        err,
        ViewError::UnknownDevice {
            direction: DeviceDirection::Output,
            ..
        }
    ));
    let ViewState::DeviceSelection(selection) = state(&gateway) else {
        panic!("expected device selection");
    };
    assert_eq!(selection.selected_output, Some(DeviceId::new("out1")));
}

#[test]
fn editing_credentials_outside_login_is_rejected() {
    let (mut gateway, _rx) = mounted();
    gateway.to_idle().expect("idle");

    assert!(matches!(
        gateway.edit_credentials("bob", "host:1"),
        Err(ViewError::Sequencing {
            action: "edit_credentials",
            state: ViewTag::ActiveIdle
        })
    ));
}

#[test]
fn invalid_rates_are_rejected_and_valid_rates_stored() {
    let (mut gateway, _rx) = mounted();

    assert!(matches!(
        gateway.update_message_rates(-1.0, 2.0),
        Err(ViewError::InvalidRate { .. })
    ));
    assert!(matches!(
        gateway.update_message_rates(f64::NAN, 2.0),
        Err(ViewError::InvalidRate { .. })
    ));

    gateway.update_message_rates(4.5, 2.0).expect("rates");
    let rates = gateway.store().expect("mounted").rates();
    assert_eq!(rates.in_rate, 4.5);
    assert_eq!(rates.out_rate, 2.0);
}

#[test]
fn apply_routes_host_commands() {
    let (mut gateway, rx) = mounted();

    gateway
        .apply(HostCommand::ToWorking {
            message: "enumerating devices".into(),
        })
        .expect("working");
    assert_eq!(state(&gateway).tag(), ViewTag::Working);

    let warning = gateway
        .apply(HostCommand::ToDeviceSelection {
            input_devices: DeviceMap::new(),
            output_devices: map(&[("out1", "Speaker A")]),
        })
        .expect("selection");
    assert!(warning.is_some());
    assert_eq!(drain(&rx).len(), 1);
}

#[test]
fn full_queue_surfaces_as_host_unavailable() {
    let (messenger, _rx) = ChannelMessenger::bounded(1);
    let mut gateway = ViewGateway::new(messenger);
    gateway.mount(ViewStore::new());

    gateway.logout().expect("first fits");
    assert!(matches!(
        gateway.logout(),
        Err(ViewError::HostUnavailable(MessengerError::QueueFull))
    ));
}

#[test]
fn not_ready_is_not_a_sequencing_error() {
    let not_ready = ViewError::NotReady;
    assert!(!not_ready.is_sequencing());
    assert!(not_ready.is_not_ready());

    let sequencing = ViewError::Sequencing {
        action: "login",
        state: ViewTag::Working,
    };
    assert!(sequencing.is_sequencing());
    assert!(!sequencing.is_not_ready());
}

#[test]
fn subscribing_requires_a_mounted_view() {
    let (messenger, _rx) = ChannelMessenger::bounded(4);
    let mut gateway = ViewGateway::new(messenger);

    let err = gateway.subscribe(|_| {}).expect_err("nothing mounted");
    assert!(err.is_not_ready());
}

#[test]
fn gateway_subscription_renders_transitions_until_unsubscribed() {
    let (mut gateway, _rx) = mounted();
    let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
    let sink = std::rc::Rc::clone(&seen);
    let id = gateway
        .subscribe(move |snapshot| sink.borrow_mut().push(snapshot.state.tag()))
        .expect("subscribe");

    gateway.to_working("connecting").expect("working");
    assert!(gateway.unsubscribe(id).expect("mounted"));
    gateway.to_idle().expect("idle");

    assert_eq!(*seen.borrow(), vec![ViewTag::Working]);
}
