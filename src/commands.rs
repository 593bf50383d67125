//! CLI commands
//!
//! Implements the listing command and the three switching flows (next sink,
//! match by name, group rotation), plus the switch itself: make a sink the
//! default and move every running stream to it.

use color_eyre::eyre::{self, Context, Result};
use crossterm::style::Stylize;
use serde::Serialize;
use std::fmt::Write;
use tracing::{info, warn};

use crate::notification::{Notifier, sink_icon};
use crate::pulse::{AudioControl, Sink, SinkInput};
use crate::selector::{select_by_name, select_next, select_next_in_group};
use crate::state::{GroupState, StateStore};
use crate::style::PaswStyle;

/// Collaborators shared by the switching flows
pub struct Session<'a> {
    pub audio: &'a dyn AudioControl,
    /// `None` when notifications are off
    pub notifier: Option<&'a dyn Notifier>,
    pub store: &'a dyn StateStore,
}

/// Result of a switching flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchOutcome {
    Switched { sink: Sink, report: SwitchReport },
    /// No sink name contains the requested needle
    NotFound { needle: String },
    /// The audio server reported no sinks at all
    NoSinks,
}

/// What [`activate`] managed to do
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwitchReport {
    pub default_set: bool,
    pub moved: usize,
    pub failed: usize,
}

// ============================================================================
// Listing
// ============================================================================

#[derive(Debug, Serialize)]
struct ListJson<'a> {
    sinks: &'a [Sink],
    sink_inputs: &'a [SinkInput],
}

/// Print all sinks and all streams (no switch)
///
/// # Errors
/// Returns an error if either listing fails or JSON serialization fails.
pub fn list(audio: &dyn AudioControl, json_output: bool) -> Result<()> {
    let sinks = audio.list_sinks()?;
    let inputs = audio.list_sink_inputs()?;

    if json_output {
        let output = ListJson {
            sinks: &sinks,
            sink_inputs: &inputs,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print!("{}", render_list(&sinks, &inputs));
    }

    Ok(())
}

/// Human-readable listing
#[must_use]
pub fn render_list(sinks: &[Sink], inputs: &[SinkInput]) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", "SINKS:".header());
    let _ = writeln!(out, "{}", "-".repeat(6));
    if sinks.is_empty() {
        let _ = writeln!(out, "  {}", "(none)".dim());
    } else {
        for sink in sinks {
            let marker = if sink.selected { "* " } else { "  " };
            let _ = writeln!(
                out,
                "{}{} {}",
                marker,
                format!("#{}", sink.index).technical(),
                sink.name.as_str().bold()
            );
            let _ = writeln!(out, "    {}", sink.state.as_str().dim());
        }
        let _ = writeln!(out, "\n  {} = running or idle", "*".dim());
    }

    let _ = writeln!(out, "\n{}", "STREAMS:".header());
    let _ = writeln!(out, "{}", "-".repeat(8));
    if inputs.is_empty() {
        let _ = writeln!(out, "  {}", "(none)".dim());
    } else {
        for input in inputs {
            let _ = writeln!(
                out,
                "  {} {} -> sink {}",
                format!("#{}", input.index).technical(),
                input.application_name.as_str().bold(),
                input.sink.to_string().technical()
            );
            let _ = writeln!(out, "    {}", input.state.as_str().dim());
        }
    }

    out
}

// ============================================================================
// Switching
// ============================================================================

/// Make `sink` the default and move every running stream to it
///
/// Streams are re-listed here rather than taken from the snapshot used for
/// selection, so streams started in between are migrated too. Setting the
/// default and each individual move are best effort: failures are logged and
/// counted, not returned.
///
/// # Errors
/// Returns an error only if the fresh stream listing fails.
pub fn activate(audio: &dyn AudioControl, sink: &Sink) -> Result<SwitchReport> {
    let mut report = SwitchReport::default();

    match audio.set_default_sink(sink.index) {
        Ok(()) => report.default_set = true,
        Err(e) => warn!("Could not set default sink to #{}: {}", sink.index, e),
    }

    let inputs = audio
        .list_sink_inputs()
        .context("Failed to list streams to move")?;

    for input in &inputs {
        match audio.move_sink_input(input.index, sink.index) {
            Ok(()) => report.moved += 1,
            Err(e) => {
                report.failed += 1;
                warn!(
                    "Could not move stream #{} ({}) to sink #{}: {}",
                    input.index, input.application_name, sink.index, e
                );
            }
        }
    }

    info!(
        "Switched to #{} {} ({} streams moved, {} failed)",
        sink.index, sink.name, report.moved, report.failed
    );
    Ok(report)
}

/// Switch to the sink after the current one
///
/// # Errors
/// Returns an error if listing sinks or streams fails.
pub fn switch_next(session: &Session<'_>) -> Result<SwitchOutcome> {
    let sinks = session.audio.list_sinks()?;
    let Some(target) = select_next(&sinks) else {
        warn!("No sinks reported by the audio server");
        return Ok(SwitchOutcome::NoSinks);
    };

    let mut state = session.store.load();
    let report = switch_to(session, &mut state, target)?;
    Ok(SwitchOutcome::Switched {
        sink: target.clone(),
        report,
    })
}

/// Switch to the first sink whose name contains `needle`
///
/// # Errors
/// Returns an error if listing sinks or streams fails. A missing match is
/// [`SwitchOutcome::NotFound`], not an error.
pub fn switch_match(session: &Session<'_>, needle: &str) -> Result<SwitchOutcome> {
    let sinks = session.audio.list_sinks()?;
    let mut state = session.store.load();

    match select_by_name(&sinks, needle) {
        Some(target) => {
            let report = switch_to(session, &mut state, target)?;
            Ok(SwitchOutcome::Switched {
                sink: target.clone(),
                report,
            })
        }
        None => Ok(report_missing(session, &mut state, needle)),
    }
}

/// Advance a rotation group and switch to the sink matching the chosen name
///
/// The chosen name is only remembered when a sink matched it; on a miss the
/// rotation position stays where it was.
///
/// Empty names are rejected: they match every sink and cannot be told apart
/// from "no name" in the scratch file, so rotation would never advance.
///
/// # Errors
/// Returns an error if the group is empty, contains an empty name, or listing
/// sinks or streams fails.
pub fn switch_group<S: AsRef<str>>(session: &Session<'_>, group: &[S]) -> Result<SwitchOutcome> {
    if group.iter().any(|name| name.as_ref().is_empty()) {
        eyre::bail!("Rotation group contains an empty name");
    }

    let mut state = session.store.load();
    let Some(name) = select_next_in_group(group, &state) else {
        eyre::bail!("Rotation group is empty");
    };

    let sinks = session.audio.list_sinks()?;
    let Some(target) = select_by_name(&sinks, name) else {
        return Ok(report_missing(session, &mut state, name));
    };

    let report = switch_to(session, &mut state, target)?;
    state.last_matched_name = Some(name.to_string());
    persist(session.store, &state);

    Ok(SwitchOutcome::Switched {
        sink: target.clone(),
        report,
    })
}

/// Activate `target`, print the result and notify if enabled
///
/// Persists a new notification handle only when it changed; callers that
/// also advance the rotation persist the full state themselves.
fn switch_to(session: &Session<'_>, state: &mut GroupState, target: &Sink) -> Result<SwitchReport> {
    let report = activate(session.audio, target)?;
    println!("{} {}", "Switched to:".success(), target.name.as_str().bold());

    let body = format!("new audio sink is {}", target.name);
    if notify(session, state, "Changed audio sink", &body, sink_icon(&target.name)) {
        persist(session.store, state);
    }
    Ok(report)
}

fn report_missing(session: &Session<'_>, state: &mut GroupState, needle: &str) -> SwitchOutcome {
    info!("No device found with name {}", needle);

    let summary = format!("No device found with name {needle}");
    if notify(session, state, &summary, "", "dialog-warning") {
        persist(session.store, state);
    }

    SwitchOutcome::NotFound {
        needle: needle.to_string(),
    }
}

/// Show a notification replacing the previous one; true if the handle changed
///
/// Notification failures are logged and never abort the switch.
fn notify(
    session: &Session<'_>,
    state: &mut GroupState,
    summary: &str,
    body: &str,
    icon: &str,
) -> bool {
    let Some(notifier) = session.notifier else {
        return false;
    };

    match notifier.notify(summary, body, icon, state.notification_handle) {
        Ok(handle) => {
            let changed = handle != state.notification_handle;
            state.notification_handle = handle;
            changed
        }
        Err(e) => {
            warn!("Notification failed: {:#}", e);
            false
        }
    }
}

fn persist(store: &dyn StateStore, state: &GroupState) {
    if let Err(e) = store.save(state) {
        warn!("Could not save group state: {:#}", e);
    }
}
