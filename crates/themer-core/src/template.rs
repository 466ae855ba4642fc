//! Per-theme template and asset reading contracts.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::ThemeError;

/// Callback reporting whether a loaded template is still current.
pub type UpToDateCheck = Arc<dyn Fn() -> bool + Send + Sync>;

/// A template as returned by a [`TemplateLoader`].
#[derive(Clone)]
pub struct TemplateSource {
    /// Template text.
    pub source: String,
    /// Where the template came from, if it has a filesystem origin.
    pub filename: Option<PathBuf>,
    /// Freshness check for engines that cache compiled templates.
    pub uptodate: Option<UpToDateCheck>,
}

impl TemplateSource {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            filename: None,
            uptodate: None,
        }
    }

    pub fn with_filename(mut self, filename: impl Into<PathBuf>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_uptodate(mut self, check: UpToDateCheck) -> Self {
        self.uptodate = Some(check);
        self
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.source.as_bytes()
    }

    /// Sources without a freshness check never go stale.
    pub fn is_up_to_date(&self) -> bool {
        self.uptodate.as_ref().map_or(true, |check| check())
    }
}

impl fmt::Debug for TemplateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateSource")
            .field("source", &self.source)
            .field("filename", &self.filename)
            .field("uptodate", &self.uptodate.is_some())
            .finish()
    }
}

/// Reads templates by name from a single theme.
pub trait TemplateLoader: Send + Sync {
    /// Fetch the template called `name`.
    ///
    /// Fails with [`ThemeError::TemplateNotFound`] when the template does not exist.
    fn get_source(&self, name: &str) -> Result<TemplateSource, ThemeError>;
}

/// Reads raw static asset bytes from a single theme.
pub trait StaticResolver: Send + Sync {
    /// Fails with [`ThemeError::AssetNotFound`] when `path` does not exist.
    fn get_static(&self, path: &str) -> Result<Vec<u8>, ThemeError>;
}

/// Split a `/`-separated template or asset name into its segments.
///
/// Empty and `.` segments are dropped. Returns `None` when a segment would
/// leave the theme root (`..`) or smuggles in a backslash. On Windows a
/// segment with `:` is refused as well, since joining a drive prefix replaces
/// the root.
pub fn split_template_path(name: &str) -> Option<Vec<&str>> {
    let mut pieces = Vec::new();
    for piece in name.split('/') {
        match piece {
            "" | "." => continue,
            ".." => return None,
            p if p.contains('\\') => return None,
            p if cfg!(windows) && p.contains(':') => return None,
            p => pieces.push(p),
        }
    }
    if pieces.is_empty() {
        return None;
    }
    Some(pieces)
}
