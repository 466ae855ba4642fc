//! Filesystem-backed themes, templates and static assets.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use themer_core::{
    split_template_path, StaticResolver, TemplateLoader, TemplateSource, Theme, ThemeError,
    ThemeIter, ThemeLoader, UpToDateCheck,
};

/// Predicate deciding whether a theme directory is exposed.
pub type ThemeFilter = Box<dyn Fn(&Path) -> bool + Send + Sync>;

/// Resolve `name` below `root`, refusing anything that lands outside it.
///
/// Returns `None` for names that try to climb out of `root`, including via
/// symlinks, and for paths that do not exist.
fn resolve_within(root: &Path, name: &str) -> Option<PathBuf> {
    let pieces = split_template_path(name)?;
    let joined = pieces.iter().fold(root.to_path_buf(), |path, piece| path.join(piece));

    let canonical_root = root.canonicalize().ok()?;
    let canonical = joined.canonicalize().ok()?;
    if !canonical.starts_with(&canonical_root) {
        tracing::warn!("Refusing {:?}: resolves outside of {:?}", name, root);
        return None;
    }
    Some(joined)
}

fn modified(path: &Path) -> Option<std::time::SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Template loader reading UTF-8 files below one directory.
#[derive(Debug, Clone)]
pub struct FileSystemTemplateLoader {
    root: PathBuf,
}

impl FileSystemTemplateLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl TemplateLoader for FileSystemTemplateLoader {
    fn get_source(&self, name: &str) -> Result<TemplateSource, ThemeError> {
        let not_found = || ThemeError::TemplateNotFound(name.to_string());

        let path = resolve_within(&self.root, name)
            .filter(|p| p.is_file())
            .ok_or_else(not_found)?;

        let bytes = fs::read(&path).map_err(|e| ThemeError::from_io(&path, e, not_found()))?;
        let source =
            String::from_utf8(bytes).map_err(|_| ThemeError::InvalidUtf8(name.to_string()))?;

        // Stale once the file is modified or removed
        let seen = modified(&path);
        let check_path = path.clone();
        let uptodate: UpToDateCheck = Arc::new(move || modified(&check_path) == seen);

        Ok(TemplateSource::new(source)
            .with_filename(path)
            .with_uptodate(uptodate))
    }
}

/// Static asset resolver reading raw bytes below one directory.
#[derive(Debug, Clone)]
pub struct FileSystemStaticResolver {
    root: PathBuf,
}

impl FileSystemStaticResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl StaticResolver for FileSystemStaticResolver {
    fn get_static(&self, path: &str) -> Result<Vec<u8>, ThemeError> {
        let not_found = || ThemeError::AssetNotFound(path.to_string());

        let full = resolve_within(&self.root, path)
            .filter(|p| p.is_file())
            .ok_or_else(not_found)?;

        fs::read(&full).map_err(|e| ThemeError::from_io(&full, e, not_found()))
    }
}

/// A theme loader that treats every immediate subdirectory of `path` as a theme.
pub struct FileSystemThemeLoader {
    path: PathBuf,
    filter: Option<ThemeFilter>,
}

impl FileSystemThemeLoader {
    /// Create a loader scanning the given directory for themes.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            filter: None,
        }
    }

    /// Only expose theme directories for which `filter` returns true.
    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&Path) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(filter));
        self
    }

    /// The directory being scanned for themes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn theme_from_dir(&self, dir: PathBuf) -> Option<Theme> {
        if !dir.is_dir() {
            return None;
        }
        if let Some(filter) = &self.filter {
            if !filter(&dir) {
                tracing::trace!("Theme directory {:?} excluded by filter", dir);
                return None;
            }
        }

        // Theme names must round-trip through template identifiers
        let name = dir.file_name()?.to_str()?.to_string();

        Some(
            Theme::new(name, Arc::new(FileSystemTemplateLoader::new(dir.clone())))
                .with_static_resolver(Arc::new(FileSystemStaticResolver::new(dir))),
        )
    }
}

impl std::fmt::Debug for FileSystemThemeLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSystemThemeLoader")
            .field("path", &self.path)
            .field("filter", &self.filter.is_some())
            .finish()
    }
}

impl ThemeLoader for FileSystemThemeLoader {
    fn themes(&self) -> ThemeIter<'_> {
        let entries = match fs::read_dir(&self.path) {
            Ok(e) => e,
            Err(e) => {
                if self.path.exists() {
                    tracing::warn!("Failed to read themes directory {:?}: {}", self.path, e);
                } else {
                    tracing::debug!("Themes directory {:?} does not exist", self.path);
                }
                return Box::new(std::iter::empty());
            }
        };

        Box::new(
            entries
                .flatten()
                .filter_map(move |entry| self.theme_from_dir(entry.path())),
        )
    }

    fn get_static(&self, theme: &Theme, path: &str) -> Result<Vec<u8>, ThemeError> {
        // A single plain segment, never "..", so the theme stays below self.path
        match split_template_path(theme.name()).as_deref() {
            Some([dir]) => FileSystemStaticResolver::new(self.path.join(dir)).get_static(path),
            _ => Err(ThemeError::AssetNotFound(path.to_string())),
        }
    }

    fn describe(&self) -> String {
        format!("filesystem:{}", self.path.display())
    }
}
