//! PASW binary entry point
//!
//! Loads the config, then dispatches to listing or one of the switching flows.

use clap::Parser;
use color_eyre::eyre::{self, Result};
use pasw::{
    cli::{Args, Mode},
    commands::{self, Session, SwitchOutcome},
    config::Config,
    notification::{DesktopNotifier, Notifier},
    pulse::Pacmd,
    state::FileStateStore,
    style::PaswStyle,
};
use tracing::debug;

/// Initialize logging
///
/// Logs go to stderr. `RUST_LOG` wins over the configured level.
fn init_logging(log_level: &str) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("pasw={log_level}"))),
        )
        .init();
}

fn load_config(args: &Args) -> Result<Config> {
    match &args.config {
        Some(path) if !path.exists() => {
            eyre::bail!("Config file not found: {}", path.display())
        }
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    }
}

fn main() -> Result<()> {
    // Install color-eyre for error reports and panic handling
    color_eyre::install()?;

    let args = Args::parse();
    let config = load_config(&args)?;
    init_logging(&config.settings.log_level);

    let audio = Pacmd::new(config.settings.pacmd.as_str());

    let desktop = DesktopNotifier::new(config.settings.notify_timeout_ms);
    let notifier: Option<&dyn Notifier> =
        (args.notify || config.settings.notify).then_some(&desktop as &dyn Notifier);
    let store = FileStateStore::new(config.state_file());
    debug!("Group state file: {}", store.path().display());

    let session = Session {
        audio: &audio,
        notifier,
        store: &store,
    };

    let outcome = match args.mode() {
        Mode::List { json } => return commands::list(&audio, json),
        Mode::Next => commands::switch_next(&session)?,
        Mode::Match(needle) => commands::switch_match(&session, needle)?,
        Mode::Rotate(names) => commands::switch_group(&session, names)?,
        Mode::NamedGroup(name) => {
            let group = config.group(name).ok_or_else(|| {
                let available: Vec<_> = config.groups.iter().map(|g| g.name.as_str()).collect();
                eyre::eyre!(
                    "Unknown group '{}'. Available: [{}]",
                    name,
                    available.join(", ")
                )
            })?;
            commands::switch_group(&session, group.members.as_slice())?
        }
    };

    debug!("Outcome: {:?}", outcome);
    if let SwitchOutcome::NoSinks = outcome {
        eprintln!("{}", "No audio sinks found".warning());
    }

    Ok(())
}
