//! Session history log and its export formats

use core::fmt;
use core::str::FromStr;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::codec::SymbolStats;
use crate::error::{MorseError, Result};

/// Flat export formats
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Newline-joined lines
    Text,
    /// JSON array of strings, 2-space indent
    Json,
    /// One column, one row per line
    Csv,
    /// One bullet per line
    Markdown,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Text,
        ExportFormat::Json,
        ExportFormat::Csv,
        ExportFormat::Markdown,
    ];

    /// Conventional file extension
    pub const fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Markdown => "md",
        }
    }

    /// Guess the format from a path's extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        ext.parse().ok()
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Text => write!(f, "text"),
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Markdown => write!(f, "markdown"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = MorseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(ExportFormat::Text),
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            other => Err(MorseError::UnknownFormat(other.to_string())),
        }
    }
}

/// Ordered, append-only record of user actions
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionLog {
    lines: Vec<String>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. An entry spanning several lines is stored as
    /// several lines. Blank lines and surrounding whitespace are dropped so
    /// that a text export reads back unchanged.
    pub fn append(&mut self, entry: impl AsRef<str>) {
        self.lines.extend(
            entry
                .as_ref()
                .trim()
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(str::to_owned),
        );
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Replace the whole log with externally supplied text
    pub fn load(&mut self, content: &str) {
        self.lines = content.trim().lines().map(str::to_owned).collect();
        info!(lines = self.lines.len(), "Session loaded");
    }

    /// Dot and dash counts across the whole log
    pub fn stats(&self) -> SymbolStats {
        self.lines.iter().fold(SymbolStats::default(), |acc, line| {
            let line_stats = SymbolStats::count(line);
            SymbolStats {
                dots: acc.dots + line_stats.dots,
                dashes: acc.dashes + line_stats.dashes,
            }
        })
    }

    /// Serialize the log
    pub fn export(&self, format: ExportFormat) -> Result<String> {
        let out = match format {
            ExportFormat::Text => self.lines.join("\n"),
            ExportFormat::Json => serde_json::to_string_pretty(&self.lines)?,
            ExportFormat::Csv => self
                .lines
                .iter()
                .map(|line| format!("{}\r\n", csv_field(line)))
                .collect(),
            ExportFormat::Markdown => self
                .lines
                .iter()
                .map(|line| format!("- {line}"))
                .collect::<Vec<_>>()
                .join("\n"),
        };
        Ok(out)
    }

    /// Export to a file
    pub fn save(&self, path: &Path, format: ExportFormat) -> Result<()> {
        let content = self.export(format)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        info!(path = %path.display(), %format, lines = self.lines.len(), "Session saved");
        Ok(())
    }

    /// Replace the log with a plain text file's contents
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        let content = std::fs::read_to_string(path)?;
        self.load(&content);
        Ok(())
    }
}

/// Quote a CSV field when it contains a delimiter, quote or line break
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
