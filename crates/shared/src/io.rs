use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tokio::process::Command;

pub const SUMMARY_FILENAME: &str = "hn_summary.md";

/// Default location of the summary file, overwritten on every run
pub fn default_summary_path() -> PathBuf {
    std::env::temp_dir().join(SUMMARY_FILENAME)
}

/// Write the summary text verbatim to `path`, replacing any previous run
pub fn save_summary(path: &Path, text: &str) -> Result<PathBuf> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    fs::write(path, text)
        .with_context(|| format!("Failed to write summary file: {}", path.display()))?;

    Ok(path.to_path_buf())
}

/// External viewer used to preview the saved summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl PreviewCommand {
    /// Parse a whitespace-separated command line such as `qlmanage -p`
    pub fn parse(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace().map(String::from);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    pub fn platform_default() -> Self {
        if cfg!(target_os = "macos") {
            Self {
                program: "qlmanage".to_string(),
                args: vec!["-p".to_string()],
            }
        } else {
            Self {
                program: "xdg-open".to_string(),
                args: Vec::new(),
            }
        }
    }

    /// Open `path` in the viewer and wait for it to close.
    ///
    /// The viewer's own failures are logged and otherwise ignored.
    pub async fn open(&self, path: &Path) {
        let result = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .kill_on_drop(true)
            .status()
            .await;

        match result {
            Ok(status) if !status.success() => {
                tracing::warn!(program = %self.program, %status, "preview exited unsuccessfully")
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(program = %self.program, error = %e, "could not start preview"),
        }
    }
}
