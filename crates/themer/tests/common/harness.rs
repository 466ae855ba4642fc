//! Builds throwaway application trees for integration tests.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;
use themer::{AppConfig, Application, ThemeLoader, Themer};

/// An application root in a temporary directory.
///
/// ```text
/// <root>/
///   templates/        application templates (fallback)
///   themes/<name>/    one directory per theme
/// ```
pub struct ThemeHarness {
    dir: TempDir,
}

impl ThemeHarness {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write `content` to `relative` below the root, creating parents.
    pub fn write(&self, relative: &str, content: &str) -> &Self {
        let path = self.root().join(relative);
        fs::create_dir_all(path.parent().unwrap()).expect("Failed to create parent dir");
        fs::write(&path, content).expect("Failed to write file");
        self
    }

    /// Write a file inside `themes/<theme>/`.
    pub fn theme_file(&self, theme: &str, relative: &str, content: &str) -> &Self {
        self.write(&format!("themes/{}/{}", theme, relative), content)
    }

    /// Write a file inside the application's own `templates/`.
    pub fn app_template(&self, relative: &str, content: &str) -> &Self {
        self.write(&format!("templates/{}", relative), content)
    }

    pub fn app(&self) -> Application {
        Application::new(self.root(), AppConfig::default())
    }

    /// Application with the default filesystem loader over `themes/`.
    pub fn themed_app(&self) -> (Application, Arc<Themer>) {
        let mut app = self.app();
        let themer = Themer::init_app(&mut app, None);
        (app, themer)
    }

    /// Application with explicitly given loaders.
    pub fn app_with_loaders(
        &self,
        loaders: Vec<Arc<dyn ThemeLoader>>,
    ) -> (Application, Arc<Themer>) {
        let mut app = self.app();
        let themer = Themer::init_app(&mut app, Some(loaders));
        (app, themer)
    }
}
