//! Per-request theme selection for minijinja templates and static assets.
//!
//! An application registers one or more theme sources and a callback naming
//! the active theme. Template lookups made through `theme(path)` and static
//! asset lookups made through `theme_static(path)` then resolve inside that
//! theme's files.
//!
//! ```ignore
//! use themer::{Application, AppConfig, Themer};
//!
//! let mut app = Application::new(".", AppConfig::default());
//! // Scans ./themes/<name>/ for themes
//! let themer = Themer::init_app(&mut app, None);
//! themer.current_theme_loader(|| "dark".to_string());
//!
//! let html = app.render_template("index.html", minijinja::context! { title => "Hi" })?;
//! ```
//!
//! Inside templates:
//!
//! ```text
//! {% extends theme("layout.html") %}
//! <link rel="stylesheet" href="{{ theme_static('css/site.css') }}">
//! ```

pub mod app;
pub mod composite;
pub mod config;
pub mod engine;
pub mod globals;
pub mod loader;
mod themer;
#[cfg(feature = "cli")]
pub mod tracing_setup;

pub use app::Application;
pub use composite::ThemeTemplateLoader;
pub use config::{AppConfig, ConfigError, ThemerConfig};
pub use globals::StaticAsset;
pub use loader::{FileSystemStaticResolver, FileSystemTemplateLoader, FileSystemThemeLoader};
pub use themer::{ThemeMatch, ThemeOverride, ThemeResolver, Themer};

pub use themer_core::{
    parse_theme_template_path, theme_template_path, StaticResolver, TemplateLoader,
    TemplateSource, Theme, ThemeData, ThemeError, ThemeIter, ThemeLoader, DEFAULT_THEME,
    MAGIC_PATH_PREFIX,
};
