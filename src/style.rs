//! Terminal styling utilities
//!
//! Semantic colors for CLI output:
//! - Green/yellow/red for status
//! - Cyan for headers and technical terms
//! - Bold for device names, dim for secondary information

use crossterm::style::Stylize;

/// Extension trait for consistent PASW styling
///
/// Use these methods instead of direct color calls so `--list` output and
/// switch messages share one palette.
///
/// # Examples
///
/// ```
/// use pasw::style::PaswStyle;
///
/// println!("{}", "SINKS:".header());
/// println!("{}", "Switched to:".success());
/// ```
pub trait PaswStyle: Stylize {
    /// Style for section headers (cyan bold)
    fn header(self) -> <<Self as Stylize>::Styled as Stylize>::Styled
    where
        Self: Sized,
        <Self as Stylize>::Styled: Stylize,
    {
        self.cyan().bold()
    }

    /// Style for success/active status (green)
    fn success(self) -> <Self as Stylize>::Styled
    where
        Self: Sized,
    {
        self.green()
    }

    /// Style for warnings and misses (yellow)
    fn warning(self) -> <Self as Stylize>::Styled
    where
        Self: Sized,
    {
        self.yellow()
    }

    /// Style for indices and states (cyan)
    fn technical(self) -> <Self as Stylize>::Styled
    where
        Self: Sized,
    {
        self.cyan()
    }
}

// Implement for all types that implement Stylize (String, &str, etc.)
impl<T: Stylize> PaswStyle for T {}
