//! Core contracts shared by every themer component.
//!
//! Nothing in this crate touches the filesystem or a template engine. It
//! defines what a theme is, how theme sources and per-theme template loaders
//! are described, and the error type all lookups report through.
//!
//! - [`Theme`]: a named bundle of templates and static assets
//! - [`ThemeLoader`]: a source that enumerates themes and resolves their assets
//! - [`TemplateLoader`]: reads one template by name from one theme
//! - [`StaticResolver`]: reads raw asset bytes from one theme

mod error;
mod template;
mod theme;

pub use error::ThemeError;
pub use template::{
    split_template_path, StaticResolver, TemplateLoader, TemplateSource, UpToDateCheck,
};
pub use theme::{Theme, ThemeData, ThemeIter, ThemeLoader};

/// Theme name used when no current-theme callback has been registered.
pub const DEFAULT_THEME: &str = "default";

/// Marker at the start of theme-bound template identifiers (a unicode snowman).
///
/// Identifiers have the form `☃/<theme>/<path>`; anything without the marker
/// is an ordinary template name.
pub const MAGIC_PATH_PREFIX: &str = "\u{2603}";

/// Build the theme-bound identifier for `path` inside `theme`.
pub fn theme_template_path(theme: &str, path: &str) -> String {
    format!("{}/{}/{}", MAGIC_PATH_PREFIX, theme, path)
}

/// Split a theme-bound identifier back into `(theme, path)`.
///
/// Returns `None` for names without the marker and for malformed identifiers.
pub fn parse_theme_template_path(name: &str) -> Option<(&str, &str)> {
    let rest = name.strip_prefix(MAGIC_PATH_PREFIX)?.strip_prefix('/')?;
    let (theme, path) = rest.split_once('/')?;
    if theme.is_empty() {
        return None;
    }
    Some((theme, path))
}
