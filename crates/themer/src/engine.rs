//! minijinja wiring.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use minijinja::{Environment, ErrorKind};
use themer_core::{
    parse_theme_template_path, TemplateLoader, TemplateSource, ThemeError, UpToDateCheck,
    MAGIC_PATH_PREFIX,
};

use crate::composite::ThemeTemplateLoader;
use crate::globals;
use crate::themer::Themer;

/// Convert a themer error into the engine's error, keeping it as the source.
///
/// Every "does not exist" error becomes `ErrorKind::TemplateNotFound`.
pub fn to_engine_error(err: ThemeError) -> minijinja::Error {
    let kind = if err.is_not_found() {
        ErrorKind::TemplateNotFound
    } else {
        ErrorKind::InvalidOperation
    };
    minijinja::Error::new(kind, err.to_string()).with_source(err)
}

#[derive(Clone)]
struct Loaded {
    theme: Option<String>,
    uptodate: Option<UpToDateCheck>,
}

/// Every template the engine has compiled since the last clear.
///
/// minijinja keeps compiled templates by name for the lifetime of the
/// environment. This records enough about each one to tell when that copy no
/// longer matches what the loaders would return.
#[derive(Default)]
pub struct LoadedTemplates {
    entries: Mutex<HashMap<String, Loaded>>,
}

impl LoadedTemplates {
    fn entries(&self) -> MutexGuard<'_, HashMap<String, Loaded>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, name: &str, source: &TemplateSource) {
        let theme = parse_theme_template_path(name).map(|(theme, _)| theme.to_string());
        self.entries().insert(
            name.to_string(),
            Loaded {
                theme,
                uptodate: source.uptodate.clone(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Whether any compiled template is out of date.
    ///
    /// A template is stale when its theme no longer resolves, when its
    /// source reports a change, or when its source cannot report freshness
    /// at all.
    pub fn is_stale(&self, themer: &Themer) -> bool {
        // Snapshot so loaders run without holding the lock
        let loaded: Vec<(String, Loaded)> = self
            .entries()
            .iter()
            .map(|(name, entry)| (name.clone(), entry.clone()))
            .collect();

        loaded.into_iter().any(|(name, entry)| {
            let fresh = entry.uptodate.as_ref().is_some_and(|check| check())
                && entry
                    .theme
                    .as_deref()
                    .map_or(true, |theme| themer.find_theme(theme).is_ok());
            if !fresh {
                tracing::debug!("Compiled template {:?} is stale", name);
            }
            !fresh
        })
    }

    pub fn clear(&self) {
        self.entries().clear();
    }
}

/// Route template names to `fallback` only.
pub(crate) fn set_plain_loader(
    env: &mut Environment<'static>,
    fallback: Option<Arc<dyn TemplateLoader>>,
    loaded: Arc<LoadedTemplates>,
) {
    env.set_loader(move |name| load_plain(fallback.as_deref(), &loaded, name));
}

/// Route theme-bound identifiers through `themer` and everything else to
/// `fallback`, then register the template functions.
pub(crate) fn install(
    env: &mut Environment<'static>,
    themer: &Arc<Themer>,
    fallback: Option<Arc<dyn TemplateLoader>>,
    loaded: Arc<LoadedTemplates>,
) {
    let composite = themer.template_loader();
    env.set_loader(move |name| {
        if name.starts_with(MAGIC_PATH_PREFIX) {
            load_themed(&composite, &loaded, name)
        } else {
            load_plain(fallback.as_deref(), &loaded, name)
        }
    });
    globals::register(env, themer);
}

fn load_themed(
    composite: &ThemeTemplateLoader,
    loaded: &LoadedTemplates,
    name: &str,
) -> Result<Option<String>, minijinja::Error> {
    let source = composite.get_source(name).map_err(to_engine_error)?;
    loaded.record(name, &source);
    Ok(Some(source.source))
}

fn load_plain(
    fallback: Option<&dyn TemplateLoader>,
    loaded: &LoadedTemplates,
    name: &str,
) -> Result<Option<String>, minijinja::Error> {
    let Some(loader) = fallback else {
        return Ok(None);
    };
    match loader.get_source(name) {
        Ok(source) => {
            loaded.record(name, &source);
            Ok(Some(source.source))
        }
        Err(ThemeError::TemplateNotFound(_)) => Ok(None),
        Err(err) => Err(to_engine_error(err)),
    }
}
