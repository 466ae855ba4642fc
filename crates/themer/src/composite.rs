//! Template loader that redirects every fetch to the active theme.

use std::sync::Arc;

use themer_core::{
    parse_theme_template_path, TemplateLoader, TemplateSource, ThemeError, MAGIC_PATH_PREFIX,
};

use crate::themer::Themer;

/// Composite loader dispatching to the loader of the resolved theme.
///
/// Theme-bound identifiers (`☃/<theme>/<path>`, see
/// [`theme_template_path`](themer_core::theme_template_path)) name their theme
/// explicitly. Any other name is looked up in the active theme.
#[derive(Debug, Clone)]
pub struct ThemeTemplateLoader {
    themer: Arc<Themer>,
}

impl ThemeTemplateLoader {
    pub fn new(themer: Arc<Themer>) -> Self {
        Self { themer }
    }

    pub fn themer(&self) -> &Arc<Themer> {
        &self.themer
    }
}

impl TemplateLoader for ThemeTemplateLoader {
    fn get_source(&self, name: &str) -> Result<TemplateSource, ThemeError> {
        let (theme, path) = if name.starts_with(MAGIC_PATH_PREFIX) {
            let (theme, path) = parse_theme_template_path(name)
                .ok_or_else(|| ThemeError::TemplateNotFound(name.to_string()))?;
            (theme.to_string(), path)
        } else {
            (self.themer.current_theme(), name)
        };

        let found = self.themer.find_theme(&theme)?;
        tracing::trace!("Loading {:?} from theme {:?}", path, theme);
        found.theme.template_loader().get_source(path)
    }
}
