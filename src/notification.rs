//! Desktop notifications
//!
//! Handles sending notifications via notify-rust and icon detection
//! using `FreeDesktop` standard icon names. Each notification asks the server
//! to replace the previous one by handle, so repeated key presses update a
//! single bubble instead of stacking.

use color_eyre::eyre::{Context, Result};
use notify_rust::{Notification, Timeout};
use tracing::debug;

/// Shows or replaces a notification
pub trait Notifier {
    /// Show `summary`/`body`, replacing `previous_handle` when non-zero
    ///
    /// Returns the handle assigned by the notification service.
    ///
    /// # Errors
    /// Returns an error if the notification cannot be sent (e.g., no notification daemon running).
    fn notify(&self, summary: &str, body: &str, icon: &str, previous_handle: u32) -> Result<u32>;
}

/// Session-bus notifier
pub struct DesktopNotifier {
    timeout_ms: u32,
}

impl DesktopNotifier {
    #[must_use]
    pub fn new(timeout_ms: u32) -> Self {
        Self { timeout_ms }
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, summary: &str, body: &str, icon: &str, previous_handle: u32) -> Result<u32> {
        let mut notification = Notification::new();
        notification
            .summary(summary)
            .body(body)
            .appname("PASW")
            .icon(icon)
            .timeout(Timeout::Milliseconds(self.timeout_ms));

        if previous_handle != 0 {
            notification.id(previous_handle);
        }

        let handle = notification
            .show()
            .context("Failed to show notification")?;

        debug!(
            "Notification shown: handle {} (replaced {})",
            handle.id(),
            previous_handle
        );
        Ok(handle.id())
    }
}

/// Guess an icon for a sink from its description using `FreeDesktop` standard names
#[must_use]
pub fn sink_icon(name: &str) -> &'static str {
    let name = name.to_lowercase();

    if name.contains("hdmi") || name.contains("tv") || name.contains("display") {
        "video-display"
    } else if name.contains("headphone") || name.contains("headset") || name.contains("bluetooth")
    {
        "audio-headphones"
    } else {
        // Default for speakers, optical, digital, etc.
        "audio-speakers"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("HDMI / DisplayPort 2 Output", "video-display" ; "hdmi")]
    #[test_case("Living Room TV", "video-display" ; "tv")]
    #[test_case("USB Headset Analog Stereo", "audio-headphones" ; "headset")]
    #[test_case("Headphones", "audio-headphones" ; "headphones")]
    #[test_case("Bluetooth Speaker", "audio-headphones" ; "bluetooth")]
    #[test_case("Built-in Audio Analog Stereo", "audio-speakers" ; "analog")]
    #[test_case("Digital Output (S/PDIF)", "audio-speakers" ; "optical")]
    fn test_sink_icon(name: &str, expected: &str) {
        assert_eq!(sink_icon(name), expected);
    }
}
