//! The `theme` and `theme_static` template functions.

use std::sync::Arc;

use minijinja::{Environment, Value};
use themer_core::{theme_template_path, ThemeError};

use crate::engine::to_engine_error;
use crate::themer::Themer;

/// A static asset resolved in the active theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticAsset {
    pub theme: String,
    pub path: String,
    /// Where the host serves this asset, see [`Themer::static_url`].
    pub url: String,
    pub bytes: Vec<u8>,
}

impl Themer {
    /// Template identifier for `path` inside the active theme.
    ///
    /// Loading the identifier through the engine resolves in that theme even
    /// if the active theme changes before it is loaded.
    pub fn lookup_theme_path(&self, path: &str) -> String {
        theme_template_path(&self.current_theme(), path)
    }

    /// URL of `path` in `theme` below the configured static prefix.
    pub fn static_url(&self, theme: &str, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.config().static_url_prefix.trim_end_matches('/'),
            theme,
            path.trim_start_matches('/')
        )
    }

    /// Resolve `path` in the active theme and read it.
    pub fn lookup_static_theme_path(&self, path: &str) -> Result<StaticAsset, ThemeError> {
        let theme = self.current_theme();
        let bytes = self.serve_static(&theme, path)?;

        Ok(StaticAsset {
            url: self.static_url(&theme, path),
            theme,
            path: path.to_string(),
            bytes,
        })
    }
}

/// Make `theme(path)` and `theme_static(path)` callable from templates.
///
/// `theme_static` yields a safe string so HTML auto-escaping leaves the
/// slashes of the URL alone.
pub(crate) fn register(env: &mut Environment<'static>, themer: &Arc<Themer>) {
    let t = Arc::clone(themer);
    env.add_function("theme", move |path: String| -> String {
        t.lookup_theme_path(&path)
    });

    let t = Arc::clone(themer);
    env.add_function(
        "theme_static",
        move |path: String| -> Result<Value, minijinja::Error> {
            t.lookup_static_theme_path(&path)
                .map(|asset| Value::from_safe_string(asset.url))
                .map_err(to_engine_error)
        },
    );
}
