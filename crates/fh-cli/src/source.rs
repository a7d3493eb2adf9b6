//! Reading weekly log documents.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

/// Path that selects standard input instead of a file.
pub const STDIN_PATH: &str = "-";

/// Reads a log document into lines, from a file or from stdin for `-`.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let content = if path.as_os_str() == STDIN_PATH {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("failed to read log from stdin")?;
        content
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read log file {}", path.display()))?
    };

    Ok(split_lines(&content))
}

/// Splits a document into lines. A leading UTF-8 byte order mark is dropped and
/// a single trailing newline does not add an empty line.
pub fn split_lines(content: &str) -> Vec<String> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    content.lines().map(String::from).collect()
}
