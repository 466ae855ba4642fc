use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::{StaticResolver, TemplateLoader, ThemeError};

/// Free-form per-theme data. Loaders may fill it however they like.
pub type ThemeData = Map<String, Value>;

/// Lazy sequence of themes produced by a [`ThemeLoader`].
pub type ThemeIter<'a> = Box<dyn Iterator<Item = Theme> + 'a>;

/// A named bundle of templates and static assets.
#[derive(Clone)]
pub struct Theme {
    name: String,
    template_loader: Arc<dyn TemplateLoader>,
    static_resolver: Option<Arc<dyn StaticResolver>>,
    data: ThemeData,
}

impl Theme {
    pub fn new(name: impl Into<String>, template_loader: Arc<dyn TemplateLoader>) -> Self {
        Self {
            name: name.into(),
            template_loader,
            static_resolver: None,
            data: ThemeData::new(),
        }
    }

    pub fn with_static_resolver(mut self, resolver: Arc<dyn StaticResolver>) -> Self {
        self.static_resolver = Some(resolver);
        self
    }

    pub fn with_data(mut self, data: ThemeData) -> Self {
        self.data = data;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn template_loader(&self) -> &Arc<dyn TemplateLoader> {
        &self.template_loader
    }

    pub fn static_resolver(&self) -> Option<&Arc<dyn StaticResolver>> {
        self.static_resolver.as_ref()
    }

    pub fn data(&self) -> &ThemeData {
        &self.data
    }
}

impl fmt::Debug for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Theme")
            .field("name", &self.name)
            .field("static_resolver", &self.static_resolver.is_some())
            .field("data", &self.data)
            .finish()
    }
}

/// A source of themes: a directory tree, an archive, a database...
///
/// `themes` is called on every lookup, so implementations whose contents
/// change between requests are picked up without any invalidation step.
pub trait ThemeLoader: Send + Sync {
    /// Enumerate every theme this source currently offers.
    fn themes(&self) -> ThemeIter<'_>;

    /// Read the static asset at `path` within `theme`.
    fn get_static(&self, theme: &Theme, path: &str) -> Result<Vec<u8>, ThemeError>;

    /// Short label for logs and listings.
    ///
    /// Defaults to the type name without its path or generic arguments.
    fn describe(&self) -> String {
        let full = std::any::type_name::<Self>();
        let base = full.split('<').next().unwrap_or(full);
        base.rsplit("::")
            .next()
            .unwrap_or("ThemeLoader")
            .to_string()
    }
}
