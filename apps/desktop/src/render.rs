//! Plain text rendering of view snapshots.

use std::fmt::Write as _;

use shared::domain::{DeviceDirection, DeviceMap};
use view_core::{DeviceSelection, ViewSnapshot, ViewState};

pub fn render_snapshot(snapshot: &ViewSnapshot<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "[{}] rev {}  in {:.1}/s  out {:.1}/s",
        snapshot.state.tag(),
        snapshot.revision,
        snapshot.rates.in_rate,
        snapshot.rates.out_rate
    );

    match snapshot.state {
        ViewState::Login(form) => {
            let _ = writeln!(out, "  username:  {}", form.username);
            let _ = writeln!(out, "  bootstrap: {}", form.bootstrap_address);
            if !form.error_message.is_empty() {
                let _ = writeln!(out, "  error:     {}", form.error_message);
            }
        }
        ViewState::Working { message } => {
            let _ = writeln!(out, "  working: {message}");
        }
        ViewState::UnrecoverableError { message } => {
            let _ = writeln!(out, "  fatal: {message}");
        }
        ViewState::ActiveIdle => {
            let _ = writeln!(out, "  connected");
        }
        ViewState::DeviceSelection(selection) => {
            render_devices(&mut out, selection, DeviceDirection::Input);
            render_devices(&mut out, selection, DeviceDirection::Output);
        }
    }
    out
}

/// Committed state as a single JSON line, for debug logging.
pub fn state_json(snapshot: &ViewSnapshot<'_>) -> serde_json::Result<String> {
    serde_json::to_string(snapshot.state)
}

fn render_devices(out: &mut String, selection: &DeviceSelection, direction: DeviceDirection) {
    let devices: &DeviceMap = selection.devices(direction);
    let selected = selection.selected(direction);
    let _ = writeln!(out, "  {direction} devices:");
    if devices.is_empty() {
        let _ = writeln!(out, "    (none)");
        return;
    }
    for (id, label) in devices.iter() {
        let marker = if Some(id) == selected { '*' } else { ' ' };
        let _ = writeln!(out, "  {marker} {id}  {label}");
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
