//! Output formatting for the `stagehand` CLI.
//!
//! Progress and diagnostics go to stderr; machine-readable results (the bin
//! directory, manifest path) go to stdout.

use camino::Utf8Path;
use std::fmt::Display;
use std::io::Write;

/// Shell configuration snippets for putting a bin directory on `PATH`.
#[derive(Debug, Clone)]
pub struct ShellSnippet {
    /// Export line for bash/zsh.
    pub bash: String,
    /// Set line for fish shell.
    pub fish: String,
    /// Set line for PowerShell.
    pub powershell: String,
}

impl ShellSnippet {
    /// Create shell snippets for the given bin directory.
    ///
    /// # Example
    ///
    /// ```
    /// use camino::Utf8PathBuf;
    /// use stagehand_installer::output::ShellSnippet;
    ///
    /// let path = Utf8PathBuf::from("/home/user/.local/share/stagehand/bitcoin-27.0/bin");
    /// let snippet = ShellSnippet::new(&path);
    ///
    /// assert!(snippet.bash.starts_with("export PATH="));
    /// ```
    #[must_use]
    pub fn new(bin_dir: &Utf8Path) -> Self {
        Self {
            bash: format!("export PATH=\"{bin_dir}:$PATH\""),
            fish: format!("fish_add_path --prepend \"{bin_dir}\""),
            powershell: format!("$env:PATH = \"{bin_dir};$env:PATH\""),
        }
    }

    /// Format the snippet for display to the user.
    #[must_use]
    pub fn display_text(&self) -> String {
        format!(
            concat!(
                "To use the installed binaries from a shell:\n\n",
                "  # bash/zsh\n",
                "  {}\n\n",
                "  # fish\n",
                "  {}\n\n",
                "  # PowerShell\n",
                "  {}"
            ),
            self.bash, self.fish, self.powershell
        )
    }
}

/// Format a success message after provisioning.
#[must_use]
pub fn installed_message(component: &str, version: &str, bin_dir: &Utf8Path) -> String {
    format!("{component} {version} is available in {bin_dir}")
}

/// Format a success message after packaging.
#[must_use]
pub fn packaged_message(count: usize, output_dir: &Utf8Path) -> String {
    let plural = if count == 1 { "package" } else { "packages" };
    format!("Built {count} {plural} into {output_dir}")
}

/// Write a line to stderr, ignoring failures.
///
/// Progress output is best-effort; a closed stderr must not abort an
/// install.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl Display) {
    let _ = writeln!(stderr, "{message}");
}
