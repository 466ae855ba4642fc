//! The theme orchestrator.
//!
//! `Themer` owns the ordered list of theme sources and the "which theme is
//! active" decision. Every lookup walks the sources again, in registration
//! order, and the first theme with a matching name wins. Nothing is cached,
//! so sources whose contents change at runtime are always seen current.

use std::cell::RefCell;
use std::collections::HashSet;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use themer_core::{Theme, ThemeError, ThemeLoader, DEFAULT_THEME};

use crate::app::Application;
use crate::composite::ThemeTemplateLoader;
use crate::config::ThemerConfig;
use crate::loader::FileSystemThemeLoader;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn next_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// One `use_theme` override held by the current thread.
struct OverrideEntry {
    themer: u64,
    guard: u64,
    name: String,
}

// Overrides are per thread so concurrent requests sharing a Themer never see
// each other's themes.
thread_local! {
    static OVERRIDES: RefCell<Vec<OverrideEntry>> = const { RefCell::new(Vec::new()) };
}

/// Callback naming the theme that is active right now.
pub type ThemeResolver = Arc<dyn Fn() -> String + Send + Sync>;

/// A theme together with the loader that produced it.
#[derive(Clone)]
pub struct ThemeMatch {
    pub theme: Theme,
    pub loader: Arc<dyn ThemeLoader>,
}

impl ThemeMatch {
    /// Read a static asset, preferring the theme's own resolver.
    pub fn get_static(&self, path: &str) -> Result<Vec<u8>, ThemeError> {
        match self.theme.static_resolver() {
            Some(resolver) => resolver.get_static(path),
            None => self.loader.get_static(&self.theme, path),
        }
    }
}

impl std::fmt::Debug for ThemeMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeMatch")
            .field("theme", &self.theme)
            .field("loader", &self.loader.describe())
            .finish()
    }
}

/// Resolves the active theme and finds themes across registered loaders.
pub struct Themer {
    loaders: Vec<Arc<dyn ThemeLoader>>,
    resolver: RwLock<Option<ThemeResolver>>,
    id: u64,
    config: ThemerConfig,
}

impl Themer {
    /// Create a themer over `loaders` without attaching it to an application.
    pub fn new(loaders: Vec<Arc<dyn ThemeLoader>>, config: ThemerConfig) -> Self {
        Self {
            loaders,
            resolver: RwLock::new(None),
            id: next_id(),
            config,
        }
    }

    /// Attach a themer to `app`.
    ///
    /// With `loaders == None` a single [`FileSystemThemeLoader`] is created for
    /// `<root>/<default_directory>`. `Some(vec![])` registers no loaders at all.
    ///
    /// Installs the theme-aware template loader and the `theme` and
    /// `theme_static` template functions into the application's environment.
    pub fn init_app(
        app: &mut Application,
        loaders: Option<Vec<Arc<dyn ThemeLoader>>>,
    ) -> Arc<Self> {
        let config = app.config().themer.clone();
        let loaders = loaders.unwrap_or_else(|| {
            let dir = app.root_path().join(&config.default_directory);
            tracing::debug!("No theme loaders given, scanning {:?}", dir);
            vec![Arc::new(FileSystemThemeLoader::new(dir)) as Arc<dyn ThemeLoader>]
        });

        let themer = Arc::new(Self::new(loaders, config));
        app.install_themer(Arc::clone(&themer));
        themer
    }

    /// Registered loaders, in lookup order.
    pub fn loaders(&self) -> &[Arc<dyn ThemeLoader>] {
        &self.loaders
    }

    pub fn config(&self) -> &ThemerConfig {
        &self.config
    }

    /// Set the callback used to decide the active theme, replacing any previous one.
    ///
    /// ```ignore
    /// themer.current_theme_loader(move || session.theme_name());
    /// ```
    pub fn current_theme_loader<F>(&self, resolver: F) -> &Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        let mut slot = self
            .resolver
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if slot.is_some() {
            tracing::debug!("Replacing current theme resolver");
        }
        *slot = Some(Arc::new(resolver));
        self
    }

    /// The name of the active theme.
    ///
    /// An explicit [`use_theme`](Self::use_theme) override wins, then the
    /// registered callback, then [`DEFAULT_THEME`].
    pub fn current_theme(&self) -> String {
        if let Some(name) = self.override_name() {
            return name;
        }

        // Clone out so the callback runs without holding the lock
        let resolver = self
            .resolver
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        match resolver {
            Some(resolver) => resolver(),
            None => DEFAULT_THEME.to_string(),
        }
    }

    /// Temporarily force the active theme on this thread until the returned
    /// guard is dropped. Other threads keep their own active theme.
    pub fn use_theme(&self, name: impl Into<String>) -> ThemeOverride<'_> {
        let name = name.into();
        tracing::trace!("Overriding active theme with {:?}", name);
        let guard = next_id();
        OVERRIDES.with(|stack| {
            stack.borrow_mut().push(OverrideEntry {
                themer: self.id,
                guard,
                name,
            })
        });
        ThemeOverride {
            themer: self,
            guard,
            _not_send: PhantomData,
        }
    }

    /// Newest override this thread holds for this themer.
    fn override_name(&self) -> Option<String> {
        OVERRIDES.with(|stack| {
            stack
                .borrow()
                .iter()
                .rev()
                .find(|entry| entry.themer == self.id)
                .map(|entry| entry.name.clone())
        })
    }

    /// Find `name` across all loaders; the first loader with a match wins.
    pub fn find_theme(&self, name: &str) -> Result<ThemeMatch, ThemeError> {
        for loader in &self.loaders {
            if let Some(theme) = loader.themes().find(|theme| theme.name() == name) {
                tracing::trace!("Theme {:?} resolved by {}", name, loader.describe());
                return Ok(ThemeMatch {
                    theme,
                    loader: Arc::clone(loader),
                });
            }
        }

        tracing::debug!(
            "Theme {:?} not found in {} loader(s)",
            name,
            self.loaders.len()
        );
        Err(ThemeError::ThemeNotFound(name.to_string()))
    }

    /// Like [`find_theme`](Self::find_theme), without the producing loader.
    pub fn get_theme_by_name(&self, name: &str) -> Result<Theme, ThemeError> {
        self.find_theme(name).map(|found| found.theme)
    }

    /// The active theme.
    pub fn active_theme(&self) -> Result<ThemeMatch, ThemeError> {
        self.find_theme(&self.current_theme())
    }

    /// Every reachable theme in lookup order; shadowed duplicates are skipped.
    pub fn themes(&self) -> Vec<ThemeMatch> {
        let mut seen = HashSet::new();
        let mut themes = Vec::new();

        for loader in &self.loaders {
            for theme in loader.themes() {
                if seen.insert(theme.name().to_string()) {
                    themes.push(ThemeMatch {
                        theme,
                        loader: Arc::clone(loader),
                    });
                }
            }
        }

        themes
    }

    /// The composite template loader dispatching to the active theme.
    pub fn template_loader(self: &Arc<Self>) -> ThemeTemplateLoader {
        ThemeTemplateLoader::new(Arc::clone(self))
    }

    /// Read `path` from the named theme, as the host's static route would.
    pub fn serve_static(&self, theme: &str, path: &str) -> Result<Vec<u8>, ThemeError> {
        self.find_theme(theme)?.get_static(path)
    }
}

impl std::fmt::Debug for Themer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let loaders: Vec<String> = self.loaders.iter().map(|l| l.describe()).collect();
        f.debug_struct("Themer")
            .field("loaders", &loaders)
            .field("config", &self.config)
            .finish()
    }
}

/// Guard returned by [`Themer::use_theme`]; restores the previous theme on drop.
#[must_use = "the override ends as soon as the guard is dropped"]
pub struct ThemeOverride<'a> {
    themer: &'a Themer,
    guard: u64,
    // Bound to the thread whose override stack holds the entry
    _not_send: PhantomData<*const ()>,
}

impl Drop for ThemeOverride<'_> {
    fn drop(&mut self) {
        let guard = self.guard;
        // try_with: the thread-local may already be gone during thread teardown
        let _ = OVERRIDES.try_with(|stack| {
            stack.borrow_mut().retain(|entry| entry.guard != guard);
        });
        tracing::trace!("Override on themer {} released", self.themer.id);
    }
}
