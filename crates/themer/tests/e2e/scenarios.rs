// Theme resolution through the composite loader

use crate::common::harness::ThemeHarness;
use std::sync::Arc;
use themer::{
    FileSystemThemeLoader, TemplateLoader, ThemeError, ThemeLoader, Themer, DEFAULT_THEME,
};

#[test]
fn test_get_source_reads_from_current_theme() {
    let harness = ThemeHarness::new();
    harness.theme_file("default", "hello.html", "Hello world!");

    let (_app, themer) = harness.themed_app();
    themer.current_theme_loader(|| "default".to_string());

    let source = themer
        .template_loader()
        .get_source("hello.html")
        .expect("hello.html should load from the default theme");
    assert_eq!(source.as_bytes(), b"Hello world!");
    assert_eq!(
        source.filename,
        Some(harness.root().join("themes/default/hello.html"))
    );
}

#[test]
fn test_get_source_with_unknown_current_theme() {
    let harness = ThemeHarness::new();
    harness.theme_file("default", "hello.html", "Hello world!");

    let (_app, themer) = harness.themed_app();
    themer.current_theme_loader(|| "missing".to_string());

    let err = themer
        .template_loader()
        .get_source("hello.html")
        .expect_err("unknown theme must not resolve");
    assert!(matches!(err, ThemeError::ThemeNotFound(ref name) if name == "missing"));
}

#[test]
fn test_no_resolver_means_default_theme() {
    let harness = ThemeHarness::new();
    harness.theme_file("default", "hello.html", "from default");

    let (_app, themer) = harness.themed_app();
    assert_eq!(themer.current_theme(), DEFAULT_THEME);
    assert_eq!(
        themer.template_loader().get_source("hello.html").unwrap().source,
        "from default"
    );
}

#[test]
fn test_theme_identifier_loads_same_bytes_as_theme_loader() {
    let harness = ThemeHarness::new();
    harness
        .theme_file("dark", "page.html", "<p>dark page</p>")
        .theme_file("light", "page.html", "<p>light page</p>");

    let (app, themer) = harness.themed_app();
    themer.current_theme_loader(|| "dark".to_string());

    let identifier = themer.lookup_theme_path("page.html");
    let through_engine = app
        .env()
        .get_template(&identifier)
        .expect("identifier should load through the engine")
        .source()
        .to_string();

    let direct = themer
        .get_theme_by_name("dark")
        .unwrap()
        .template_loader()
        .get_source("page.html")
        .unwrap();

    assert_eq!(through_engine.as_bytes(), direct.as_bytes());

    // The identifier stays bound to its theme after the active theme changes
    themer.current_theme_loader(|| "light".to_string());
    assert_eq!(
        themer.template_loader().get_source(&identifier).unwrap().source,
        "<p>dark page</p>"
    );
}

#[test]
fn test_first_registered_loader_wins() {
    let first = ThemeHarness::new();
    first.theme_file("default", "hello.html", "first");
    let second = ThemeHarness::new();
    second
        .theme_file("default", "hello.html", "second")
        .theme_file("extra", "hello.html", "extra");

    let loaders: Vec<Arc<dyn ThemeLoader>> = vec![
        Arc::new(FileSystemThemeLoader::new(first.root().join("themes"))),
        Arc::new(FileSystemThemeLoader::new(second.root().join("themes"))),
    ];
    let themer = Themer::new(loaders, Default::default());
    let themer = Arc::new(themer);

    assert_eq!(
        themer.template_loader().get_source("hello.html").unwrap().source,
        "first"
    );

    // Names only present in later loaders still resolve
    themer.current_theme_loader(|| "extra".to_string());
    assert_eq!(
        themer.template_loader().get_source("hello.html").unwrap().source,
        "extra"
    );
}

#[test]
fn test_new_theme_directories_are_picked_up() {
    let harness = ThemeHarness::new();
    harness.theme_file("default", "hello.html", "default");

    let (_app, themer) = harness.themed_app();
    themer.current_theme_loader(|| "late".to_string());
    assert!(themer.active_theme().is_err());

    harness.theme_file("late", "hello.html", "late arrival");
    assert_eq!(
        themer.template_loader().get_source("hello.html").unwrap().source,
        "late arrival"
    );
}

#[test]
fn test_default_directory_from_config() {
    let harness = ThemeHarness::new();
    harness.write("skins/default/hello.html", "skinned");

    let mut config = themer::AppConfig::default();
    config.themer.default_directory = "skins".to_string();
    let mut app = themer::Application::new(harness.root(), config);
    let themer = Themer::init_app(&mut app, None);

    assert_eq!(
        themer.template_loader().get_source("hello.html").unwrap().source,
        "skinned"
    );
}
