//! Marker-delimited region replacement in the target playlist
//!
//! The target file is hand-edited outside a region bounded by two literal
//! marker lines. Only the text between the markers is rewritten; everything
//! else is preserved byte-for-byte.

use regex::Regex;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::TargetConfig;
use crate::errors::{AppError, AppResult, SpliceError};

/// Literal start and end marker lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markers {
    pub start: String,
    pub end: String,
}

impl Markers {
    pub fn new<S: Into<String>, E: Into<String>>(start: S, end: E) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Minimal file used when the target does not exist yet
    pub fn bootstrap(&self) -> String {
        format!("{}\n{}", self.start, self.end)
    }

    fn pattern(&self) -> Result<Regex, SpliceError> {
        let pattern = format!(
            "(?s){}.*?{}",
            regex::escape(&self.start),
            regex::escape(&self.end)
        );
        Regex::new(&pattern).map_err(|e| SpliceError::Pattern {
            message: e.to_string(),
        })
    }
}

impl From<&TargetConfig> for Markers {
    fn from(config: &TargetConfig) -> Self {
        Self::new(config.start_marker.clone(), config.end_marker.clone())
    }
}

/// Replace the interior of the single marker region with `content`.
///
/// `content` is trimmed and placed on its own lines between the markers.
pub fn splice(existing: &str, markers: &Markers, content: &str) -> Result<String, SpliceError> {
    let pattern = markers.pattern()?;
    let mut regions = pattern.find_iter(existing);

    let region = regions.next().ok_or(SpliceError::MarkersNotFound)?;
    let extra = regions.count();
    if extra > 0 {
        return Err(SpliceError::DuplicateMarkers { count: extra + 1 });
    }

    let content = content.trim();
    let mut updated = String::with_capacity(existing.len() + content.len());
    updated.push_str(&existing[..region.start()]);
    updated.push_str(&markers.start);
    updated.push('\n');
    updated.push_str(content);
    updated.push('\n');
    updated.push_str(&markers.end);
    updated.push_str(&existing[region.end()..]);
    Ok(updated)
}

/// Outcome of splicing new content into the target file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpliceReport {
    pub path: PathBuf,
    pub updated: String,
    /// The target did not exist and was synthesized from the markers
    pub bootstrapped: bool,
    /// The spliced text equals what is already on disk
    pub unchanged: bool,
}

/// Target playlist file with its marker region
#[derive(Debug, Clone)]
pub struct TargetFile {
    path: PathBuf,
    markers: Markers,
}

impl TargetFile {
    pub fn new<P: Into<PathBuf>>(path: P, markers: Markers) -> Self {
        Self {
            path: path.into(),
            markers,
        }
    }

    pub fn from_config(config: &TargetConfig) -> Self {
        Self::new(config.path.clone(), Markers::from(config))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the current content, synthesizing an empty marker pair when the
    /// file does not exist. The flag is `true` in that case.
    pub fn load(&self) -> AppResult<(String, bool)> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok((content, false)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(
                    "{} not found, creating a new file with empty markers",
                    self.path.display()
                );
                Ok((self.markers.bootstrap(), true))
            }
            Err(e) => Err(AppError::io(self.path.display().to_string(), e)),
        }
    }

    /// Compute the updated file content without writing it
    pub fn render(&self, content: &str) -> AppResult<SpliceReport> {
        let (existing, bootstrapped) = self.load()?;
        let updated = splice(&existing, &self.markers, content)?;
        let unchanged = !bootstrapped && updated == existing;

        Ok(SpliceReport {
            path: self.path.clone(),
            updated,
            bootstrapped,
            unchanged,
        })
    }

    /// Splice `content` into the file and overwrite it.
    ///
    /// The write is a plain whole-file overwrite. Nothing is written when the
    /// marker region cannot be located or the content is already current.
    pub fn update(&self, content: &str) -> AppResult<SpliceReport> {
        let report = self.render(content)?;

        if report.unchanged {
            info!("{} is already up to date", self.path.display());
            return Ok(report);
        }

        std::fs::write(&self.path, &report.updated)
            .map_err(|e| AppError::io(self.path.display().to_string(), e))?;
        info!(
            "Successfully updated {} ({} bytes)",
            self.path.display(),
            report.updated.len()
        );
        Ok(report)
    }
}
