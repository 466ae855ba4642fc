//! Theme sources.
//!
//! This module provides:
//! - `FileSystemThemeLoader`: every subdirectory of a root directory is a theme
//! - `FileSystemTemplateLoader`: reads templates from one theme directory
//! - `FileSystemStaticResolver`: reads static assets from one theme directory
//!
//! Custom sources implement [`ThemeLoader`](themer_core::ThemeLoader) directly.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use themer::loader::FileSystemThemeLoader;
//!
//! // Themes live in ./themes/<name>/, skipping anything starting with '_'
//! let loader = FileSystemThemeLoader::new("themes").with_filter(|path| {
//!     path.file_name()
//!         .and_then(|n| n.to_str())
//!         .is_some_and(|n| !n.starts_with('_'))
//! });
//! let themer = Themer::init_app(&mut app, Some(vec![Arc::new(loader)]));
//! ```

mod filesystem;

pub use filesystem::*;
