use super::*;

use shared::domain::DeviceId;
use view_core::{LoginForm, MessageRates};

fn snapshot(state: &ViewState) -> ViewSnapshot<'_> {
    ViewSnapshot {
        state,
        rates: MessageRates {
            in_rate: 1.5,
            out_rate: 0.0,
        },
        revision: 7,
    }
}

#[test]
fn header_shows_tag_revision_and_rates() {
    let state = ViewState::ActiveIdle;
    let text = render_snapshot(&snapshot(&state));
    assert!(text.starts_with("[ACTIVE_IDLE] rev 7  in 1.5/s  out 0.0/s\n"));
}

#[test]
fn login_error_line_only_when_present() {
    let state = ViewState::Login(LoginForm {
        username: "alice".into(),
        bootstrap_address: "10.0.0.1:5000".into(),
        error_message: String::new(),
    });
    let text = render_snapshot(&snapshot(&state));
    assert!(text.contains("username:  alice"));
    assert!(!text.contains("error:"));
}

#[test]
fn device_selection_marks_selected_and_empty_lists() {
    let state = ViewState::DeviceSelection(DeviceSelection {
        input_devices: DeviceMap::new(),
        output_devices: [("out1", "Speaker A"), ("out2", "Speaker B")]
            .into_iter()
            .collect(),
        selected_input: None,
        selected_output: Some(DeviceId::new("out2")),
    });
    let text = render_snapshot(&snapshot(&state));

    assert!(text.contains("input devices:\n    (none)"));
    assert!(text.contains("    out1  Speaker A"));
    assert!(text.contains("  * out2  Speaker B"));
}

#[test]
fn state_json_carries_the_tag() {
    let state = ViewState::Working {
        message: "joining".into(),
    };
    let json = state_json(&snapshot(&state)).expect("serialize");
    assert_eq!(json, r#"{"state":"WORKING","message":"joining"}"#);
}
