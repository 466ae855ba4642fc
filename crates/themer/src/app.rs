//! The host application handle.
//!
//! Holds what the theming layer needs from its embedding web application: a
//! root directory, configuration and the minijinja environment templates are
//! rendered with. The installed [`Themer`] lives here too, so request
//! handlers reach it through the application instead of a global.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard};

use minijinja::{Environment, ErrorKind};
use serde::Serialize;
use themer_core::{theme_template_path, TemplateLoader, ThemeError};

use crate::config::{AppConfig, ConfigError};
use crate::engine::{self, to_engine_error, LoadedTemplates};
use crate::loader::FileSystemTemplateLoader;
use crate::themer::Themer;

pub struct Application {
    root_path: PathBuf,
    config: AppConfig,
    env: RwLock<Environment<'static>>,
    loaded: Arc<LoadedTemplates>,
    themer: Option<Arc<Themer>>,
}

impl Application {
    /// Create an application rooted at `root_path`.
    ///
    /// Plain template names resolve in `<root>/<template_folder>` until a
    /// themer is attached, and keep doing so afterwards.
    pub fn new(root_path: impl Into<PathBuf>, config: AppConfig) -> Self {
        let mut app = Self {
            root_path: root_path.into(),
            config,
            env: RwLock::new(Environment::new()),
            loaded: Arc::default(),
            themer: None,
        };
        let fallback = app.template_folder_loader();
        let loaded = Arc::clone(&app.loaded);
        engine::set_plain_loader(app.env_mut(), Some(fallback), loaded);
        app
    }

    /// Create an application from a JSON configuration file, applying
    /// `THEMER_*` environment overrides.
    pub fn from_config_file(
        root_path: impl Into<PathBuf>,
        config_path: impl AsRef<Path>,
    ) -> Result<Self, ConfigError> {
        let mut config = AppConfig::load_from_file(config_path)?;
        config.themer.apply_env_overrides();
        config.validate()?;
        Ok(Self::new(root_path, config))
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Directory holding the application's own, non-themed templates.
    pub fn template_folder(&self) -> PathBuf {
        self.root_path.join(&self.config.template_folder)
    }

    fn template_folder_loader(&self) -> Arc<dyn TemplateLoader> {
        Arc::new(FileSystemTemplateLoader::new(self.template_folder()))
    }

    pub fn env(&self) -> RwLockReadGuard<'_, Environment<'static>> {
        self.env
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn env_mut(&mut self) -> &mut Environment<'static> {
        self.env
            .get_mut()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Templates compiled by the environment since they were last dropped.
    pub fn loaded_templates(&self) -> &LoadedTemplates {
        &self.loaded
    }

    /// Drop compiled templates once any of them went stale.
    fn refresh_templates(&self, themer: &Themer) {
        if !self.loaded.is_stale(themer) {
            return;
        }
        let mut env = self
            .env
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        env.clear_templates();
        self.loaded.clear();
    }

    /// The attached themer.
    pub fn themer(&self) -> Result<&Arc<Themer>, ThemeError> {
        self.themer.as_ref().ok_or(ThemeError::NotInitialized)
    }

    pub(crate) fn install_themer(&mut self, themer: Arc<Themer>) {
        if self.themer.is_some() {
            tracing::warn!("Replacing the themer already attached to this application");
        }
        let fallback = self.template_folder_loader();
        let loaded = Arc::clone(&self.loaded);
        engine::install(self.env_mut(), &themer, Some(fallback), loaded);
        self.themer = Some(themer);
    }

    /// Render `name` from the active theme, falling back to the application's
    /// template folder when the theme (or the template in it) is missing.
    pub fn render_template<S: Serialize>(
        &self,
        name: &str,
        ctx: S,
    ) -> Result<String, minijinja::Error> {
        let themer = self.themer().map_err(to_engine_error)?;
        self.refresh_templates(themer);

        let current = themer.current_theme();
        let env = self.env();

        // The theme is checked on every render; a compiled copy of one of its
        // templates says nothing about whether it still exists
        match themer.find_theme(&current) {
            Ok(_) => match env.get_template(&theme_template_path(&current, name)) {
                Ok(template) => return template.render(ctx),
                Err(err) if err.kind() == ErrorKind::TemplateNotFound => {
                    tracing::debug!("{:?} not themed, falling back: {}", name, err);
                }
                Err(err) => return Err(err),
            },
            Err(err) => tracing::debug!("{:?} not themed, falling back: {}", name, err),
        }

        env.get_template(name)?.render(ctx)
    }
}

impl std::fmt::Debug for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Application")
            .field("root_path", &self.root_path)
            .field("config", &self.config)
            .field("themer", &self.themer)
            .finish()
    }
}
