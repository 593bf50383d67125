//! `PulseAudio` integration
//!
//! Provides sink and stream discovery and control via `pacmd`:
//! - `pacmd list-sinks` / `pacmd list-sink-inputs`: text listings scraped with regexes
//! - `pacmd set-default-sink`: changing the default output
//! - `pacmd move-sink-input`: migrating running streams
//!
//! The listing format is the only contract the parsers depend on. Everything
//! above this module talks to [`AudioControl`], so a structured backend can
//! replace the scraping without touching selection or switching.

use regex::Regex;
use serde::Serialize;
use std::process::Command;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{debug, trace};

// ============================================================================
// Constants
// ============================================================================

/// Literal marker preceding every record's identifier in `pacmd` listings
const RECORD_MARKER: &str = "index: ";

/// Sink states that mean "this is probably the current default"
const SELECTED_STATES: [&str; 2] = ["RUNNING", "IDLE"];

static LEADING_INDEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+").unwrap());
static DEVICE_DESCRIPTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"device\.description = "([^"]*)""#).unwrap());
static APPLICATION_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"application\.name = "([^"]*)""#).unwrap());
static STATE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"state: ([A-Z]*)").unwrap());
static SINK_FIELD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"sink: (\d+)").unwrap());

// ============================================================================
// Errors
// ============================================================================

/// Failures talking to the audio server's control tool
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio control tool '{tool}' could not be started. Is PulseAudio installed?")]
    ToolUnavailable {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{tool} {command}' failed: {stderr}")]
    ToolFailed {
        tool: String,
        command: String,
        stderr: String,
    },

    #[error("missing '{field}' in {record} listing (incompatible pacmd version?)")]
    Parse {
        field: &'static str,
        record: &'static str,
    },
}

// ============================================================================
// Inventory Records
// ============================================================================

/// A playback destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sink {
    /// Server-assigned index (not stable across restarts)
    pub index: u32,
    /// Human-readable `device.description`
    pub name: String,
    pub state: String,
    /// Best-effort "is current default" signal derived from `state`
    pub selected: bool,
}

impl Sink {
    #[must_use]
    pub fn new(index: u32, name: impl Into<String>, state: impl Into<String>) -> Self {
        let state = state.into();
        Self {
            index,
            name: name.into(),
            selected: SELECTED_STATES.contains(&state.as_str()),
            state,
        }
    }
}

/// An active audio stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SinkInput {
    pub index: u32,
    pub application_name: String,
    /// Index of the sink this stream currently plays to
    pub sink: u32,
    pub state: String,
}

// ============================================================================
// Listing Parsers
// ============================================================================

/// Split a listing into per-record chunks, dropping the "N item(s) available." header
fn records(listing: &str) -> impl Iterator<Item = &str> {
    listing.split(RECORD_MARKER).skip(1)
}

fn capture<'a>(
    re: &Regex,
    chunk: &'a str,
    field: &'static str,
    record: &'static str,
) -> Result<&'a str, AudioError> {
    re.captures(chunk)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .ok_or(AudioError::Parse { field, record })
}

fn leading_index(chunk: &str, record: &'static str) -> Result<u32, AudioError> {
    LEADING_INDEX
        .find(chunk)
        .and_then(|m| m.as_str().parse().ok())
        .ok_or(AudioError::Parse {
            field: "index",
            record,
        })
}

/// Parse `pacmd list-sinks` output
///
/// # Errors
/// Returns [`AudioError::Parse`] if any record lacks its index, description or state.
pub fn parse_sinks(listing: &str) -> Result<Vec<Sink>, AudioError> {
    records(listing)
        .map(|chunk| {
            let index = leading_index(chunk, "sink")?;
            let name = capture(&DEVICE_DESCRIPTION, chunk, "device.description", "sink")?;
            let state = capture(&STATE, chunk, "state", "sink")?;
            Ok(Sink::new(index, name, state))
        })
        .collect()
}

/// Parse `pacmd list-sink-inputs` output
///
/// # Errors
/// Returns [`AudioError::Parse`] if any record lacks its index, sink, application name or state.
pub fn parse_sink_inputs(listing: &str) -> Result<Vec<SinkInput>, AudioError> {
    records(listing)
        .map(|chunk| {
            let index = leading_index(chunk, "sink-input")?;
            let sink = capture(&SINK_FIELD, chunk, "sink", "sink-input")?
                .parse()
                .map_err(|_| AudioError::Parse {
                    field: "sink",
                    record: "sink-input",
                })?;
            let application_name =
                capture(&APPLICATION_NAME, chunk, "application.name", "sink-input")?;
            let state = capture(&STATE, chunk, "state", "sink-input")?;
            Ok(SinkInput {
                index,
                application_name: application_name.to_string(),
                sink,
                state: state.to_string(),
            })
        })
        .collect()
}

// ============================================================================
// Control Interface
// ============================================================================

/// Operations this tool needs from the audio server
pub trait AudioControl {
    /// # Errors
    /// Fails if the control tool cannot be run or its output cannot be parsed.
    fn list_sinks(&self) -> Result<Vec<Sink>, AudioError>;

    /// # Errors
    /// Fails if the control tool cannot be run or its output cannot be parsed.
    fn list_sink_inputs(&self) -> Result<Vec<SinkInput>, AudioError>;

    /// # Errors
    /// Fails if the control tool cannot be run or exits non-zero.
    fn set_default_sink(&self, sink: u32) -> Result<(), AudioError>;

    /// # Errors
    /// Fails if the control tool cannot be run or exits non-zero.
    fn move_sink_input(&self, input: u32, sink: u32) -> Result<(), AudioError>;
}

/// `pacmd`-backed [`AudioControl`]
pub struct Pacmd {
    program: String,
}

impl Pacmd {
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn run(&self, args: &[&str]) -> Result<String, AudioError> {
        debug!("Running: {} {}", self.program, args.join(" "));

        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|source| AudioError::ToolUnavailable {
                tool: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AudioError::ToolFailed {
                tool: self.program.clone(),
                command: args.join(" "),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for Pacmd {
    fn default() -> Self {
        Self::new("pacmd")
    }
}

impl AudioControl for Pacmd {
    fn list_sinks(&self) -> Result<Vec<Sink>, AudioError> {
        let sinks = parse_sinks(&self.run(&["list-sinks"])?)?;
        trace!("pacmd reported {} sinks", sinks.len());
        Ok(sinks)
    }

    fn list_sink_inputs(&self) -> Result<Vec<SinkInput>, AudioError> {
        let inputs = parse_sink_inputs(&self.run(&["list-sink-inputs"])?)?;
        trace!("pacmd reported {} sink inputs", inputs.len());
        Ok(inputs)
    }

    fn set_default_sink(&self, sink: u32) -> Result<(), AudioError> {
        self.run(&["set-default-sink", &sink.to_string()])?;
        debug!("Set default sink: {}", sink);
        Ok(())
    }

    fn move_sink_input(&self, input: u32, sink: u32) -> Result<(), AudioError> {
        self.run(&["move-sink-input", &input.to_string(), &sink.to_string()])?;
        debug!("Moved sink input {} to sink {}", input, sink);
        Ok(())
    }
}
