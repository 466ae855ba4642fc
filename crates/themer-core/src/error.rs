use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors reported by theme, template and asset lookups.
#[derive(Debug, Error)]
pub enum ThemeError {
    /// No registered loader produces a theme with this name.
    #[error("theme not found: {0}")]
    ThemeNotFound(String),

    /// The resolved theme has no template with this name.
    #[error("template not found: {0}")]
    TemplateNotFound(String),

    /// The resolved theme has no static asset at this path.
    #[error("static asset not found: {0}")]
    AssetNotFound(String),

    /// The application was used before `Themer::init_app` ran.
    #[error("themer is not initialized; call Themer::init_app first")]
    NotInitialized,

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("template {0} is not valid UTF-8")]
    InvalidUtf8(String),
}

impl ThemeError {
    /// Whether this is one of the "does not exist" errors.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ThemeError::ThemeNotFound(_)
                | ThemeError::TemplateNotFound(_)
                | ThemeError::AssetNotFound(_)
        )
    }

    /// Map an I/O failure on `path`, turning `NotFound` into `missing`.
    pub fn from_io(path: impl Into<PathBuf>, err: io::Error, missing: ThemeError) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            missing
        } else {
            ThemeError::Io {
                path: path.into(),
                source: err,
            }
        }
    }
}
