//! Group rotation state
//!
//! Remembers, across separate invocations, which name of a rotation group was
//! activated last and which notification bubble to replace. Persisted as a
//! single `name,handle` line in a scratch file. The file is not locked:
//! concurrent invocations race and the last writer wins.

use color_eyre::eyre::{Context, Result};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Scratch file name used under the runtime or temp directory
const STATE_FILE_NAME: &str = "pasw-group-state";

/// Persisted rotation position and notification handle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupState {
    pub last_matched_name: Option<String>,
    /// Handle of the last notification shown (0 = none)
    pub notification_handle: u32,
}

impl GroupState {
    /// Parse the single persisted line
    ///
    /// The handle follows the LAST comma, so names may themselves contain commas.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let (name, handle) = line.trim_end_matches(['\r', '\n']).rsplit_once(',')?;
        let notification_handle = handle.trim().parse().ok()?;
        let last_matched_name = (!name.is_empty()).then(|| name.to_string());
        Some(Self {
            last_matched_name,
            notification_handle,
        })
    }

    /// Render as the persisted line (without trailing newline)
    #[must_use]
    pub fn to_line(&self) -> String {
        format!(
            "{},{}",
            self.last_matched_name.as_deref().unwrap_or_default(),
            self.notification_handle
        )
    }
}

/// Persistence for [`GroupState`]
pub trait StateStore {
    /// Load the state; missing or malformed data yields the default
    fn load(&self) -> GroupState;

    /// Overwrite the stored state
    ///
    /// # Errors
    /// Returns an error if the state cannot be written.
    fn save(&self, state: &GroupState) -> Result<()>;
}

/// [`StateStore`] backed by a single scratch file
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default scratch path
    ///
    /// Prefers `$XDG_RUNTIME_DIR/pasw-group-state`, falls back to the system temp dir.
    #[must_use]
    pub fn default_path() -> PathBuf {
        std::env::var_os("XDG_RUNTIME_DIR")
            .filter(|dir| !dir.is_empty())
            .map_or_else(std::env::temp_dir, PathBuf::from)
            .join(STATE_FILE_NAME)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for FileStateStore {
    fn load(&self) -> GroupState {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) => {
                debug!("No group state at {}: {}", self.path.display(), e);
                return GroupState::default();
            }
        };

        GroupState::parse(&contents).unwrap_or_else(|| {
            debug!(
                "Ignoring malformed group state in {}: {:?}",
                self.path.display(),
                contents
            );
            GroupState::default()
        })
    }

    fn save(&self, state: &GroupState) -> Result<()> {
        fs::write(&self.path, state.to_line())
            .with_context(|| format!("Failed to write group state: {}", self.path.display()))?;
        debug!("Saved group state: {}", state.to_line());
        Ok(())
    }
}

/// In-memory [`StateStore`], used in tests in place of the scratch file
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    state: RefCell<Option<GroupState>>,
}

impl MemoryStateStore {
    #[must_use]
    pub fn with_state(state: GroupState) -> Self {
        Self {
            state: RefCell::new(Some(state)),
        }
    }

    /// Whether anything was ever saved (or seeded)
    #[must_use]
    pub fn is_written(&self) -> bool {
        self.state.borrow().is_some()
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self) -> GroupState {
        self.state.borrow().clone().unwrap_or_default()
    }

    fn save(&self, state: &GroupState) -> Result<()> {
        *self.state.borrow_mut() = Some(state.clone());
        Ok(())
    }
}
