//! Command-line interface definitions
//!
//! Uses clap for argument parsing with derive macros. The mode flags are
//! mutually exclusive; with none of them the next sink is selected.

use clap::Parser;
use clap::builder::NonEmptyStringValueParser;
use std::path::PathBuf;

/// PASW - PulseAudio Switcher
///
/// Switch to the next audio sink and move all playing streams to it.
#[derive(Debug, Parser)]
#[command(name = "pasw")]
#[command(version)]
#[command(
    about = "PulseAudio Switcher - Switch the default audio sink and move running streams to it"
)]
#[command(after_help = "\
BEHAVIOR:
  - Without a mode flag, switches to the sink after the current one (wrapping)
  - The current sink is guessed from its state (RUNNING or IDLE)
  - Every running stream is moved to the newly selected sink
  - A missing device is not an error; with --notify a notification says so

GROUP ROTATION:
  pasw --match-next-group DAC Mic   Cycle DAC -> Mic -> DAC ... across runs
  pasw --group desk                 Same, using a group from the config file
  The last activated name is kept in $XDG_RUNTIME_DIR/pasw-group-state

CONFIG:
  ~/.config/pasw/config.toml (optional)

PULSEAUDIO INTEGRATION:
  Uses pacmd list-sinks / list-sink-inputs, set-default-sink, move-sink-input.")]
pub struct Args {
    /// Print all sinks and streams without switching
    #[arg(short, long, group = "mode")]
    pub list: bool,

    /// With --list, print JSON instead of text
    #[arg(long, requires = "list")]
    pub json: bool,

    /// Switch to the first sink whose name contains NAME
    #[arg(short, long = "match", value_name = "NAME", group = "mode")]
    pub match_name: Option<String>,

    /// Rotate among sinks matching these names, in order, across runs
    #[arg(
        short = 'g',
        long,
        value_name = "NAME",
        num_args = 1..,
        value_parser = NonEmptyStringValueParser::new(),
        group = "mode"
    )]
    pub match_next_group: Option<Vec<String>>,

    /// Rotate among the names of a group defined in the config file
    #[arg(long, value_name = "GROUP", group = "mode")]
    pub group: Option<String>,

    /// Show (or replace) a desktop notification describing the result
    #[arg(short, long)]
    pub notify: bool,

    /// Use this config file instead of the XDG location
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// What a run should do, derived from [`Args`]
#[derive(Debug, PartialEq, Eq)]
pub enum Mode<'a> {
    Next,
    List { json: bool },
    Match(&'a str),
    Rotate(&'a [String]),
    NamedGroup(&'a str),
}

impl Args {
    #[must_use]
    pub fn mode(&self) -> Mode<'_> {
        if self.list {
            Mode::List { json: self.json }
        } else if let Some(name) = &self.match_name {
            Mode::Match(name)
        } else if let Some(names) = &self.match_next_group {
            Mode::Rotate(names)
        } else if let Some(group) = &self.group {
            Mode::NamedGroup(group)
        } else {
            Mode::Next
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("pasw").chain(args.iter().copied()))
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_no_flags_is_next() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.mode(), Mode::Next);
        assert!(!args.notify);
    }

    #[test]
    fn test_match_with_notify() {
        let args = parse(&["--match", "USB", "--notify"]).unwrap();
        assert_eq!(args.mode(), Mode::Match("USB"));
        assert!(args.notify);
    }

    #[test]
    fn test_match_next_group_takes_many_names() {
        let args = parse(&["-g", "DAC", "Mic", "-n"]).unwrap();
        let names = vec!["DAC".to_string(), "Mic".to_string()];
        assert_eq!(args.mode(), Mode::Rotate(&names));
        assert!(args.notify);
    }

    #[test]
    fn test_list_json() {
        let args = parse(&["-l", "--json"]).unwrap();
        assert_eq!(args.mode(), Mode::List { json: true });
    }

    #[test]
    fn test_modes_are_exclusive() {
        assert!(parse(&["--list", "--match", "USB"]).is_err());
        assert!(parse(&["--match", "USB", "--group", "desk"]).is_err());
    }

    #[test]
    fn test_json_requires_list() {
        assert!(parse(&["--json"]).is_err());
    }

    #[test]
    fn test_match_next_group_rejects_empty_name() {
        assert!(parse(&["--match-next-group", "", "Mic"]).is_err());
        assert!(parse(&["-g", "DAC", ""]).is_err());
    }

    #[test]
    fn test_match_next_group_requires_a_name() {
        assert!(parse(&["--match-next-group"]).is_err());
    }
}
