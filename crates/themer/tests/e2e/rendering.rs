// Rendering through Application::render_template

use crate::common::harness::ThemeHarness;
use minijinja::{context, ErrorKind};
use themer::MAGIC_PATH_PREFIX;

#[test]
fn test_loading_from_disk() {
    let harness = ThemeHarness::new();
    harness.theme_file("test_theme", "test.html", "This is a test.");

    let (app, themer) = harness.themed_app();
    themer.current_theme_loader(|| "test_theme".to_string());

    assert_eq!(
        app.render_template("test.html", context! {}).unwrap(),
        "This is a test."
    );
}

#[test]
fn test_fallback_to_application_templates() {
    let harness = ThemeHarness::new();
    harness
        .theme_file("test_theme", "test.html", "This is a test.")
        .app_template("fallback.html", "This is a fallback template.");

    let (app, themer) = harness.themed_app();
    themer.current_theme_loader(|| "test_theme".to_string());

    assert_eq!(
        app.render_template("fallback.html", context! {}).unwrap(),
        "This is a fallback template."
    );
}

#[test]
fn test_unknown_theme_falls_back_to_application_templates() {
    let harness = ThemeHarness::new();
    harness.app_template("test.html", "plain");

    let (app, themer) = harness.themed_app();
    themer.current_theme_loader(|| "missing".to_string());

    assert_eq!(app.render_template("test.html", context! {}).unwrap(), "plain");
}

#[test]
fn test_missing_everywhere_is_template_not_found() {
    let harness = ThemeHarness::new();
    let (app, _themer) = harness.app_with_loaders(vec![]);

    let err = app
        .render_template("test.html", context! {})
        .expect_err("nothing provides test.html");
    assert_eq!(err.kind(), ErrorKind::TemplateNotFound);
}

#[test]
fn test_bad_template_path() {
    let harness = ThemeHarness::new();
    let (app, _themer) = harness.themed_app();

    let err = app
        .render_template(&format!("{}/", MAGIC_PATH_PREFIX), context! {})
        .expect_err("a bare marker is not a template");
    assert_eq!(err.kind(), ErrorKind::TemplateNotFound);
}

#[test]
fn test_extends_within_theme() {
    let harness = ThemeHarness::new();
    harness
        .theme_file(
            "dark",
            "layout.html",
            "<body class=\"dark\">{% block content %}{% endblock %}</body>",
        )
        .theme_file(
            "dark",
            "index.html",
            "{% extends theme('layout.html') %}{% block content %}Hi {{ name }}{% endblock %}",
        );

    let (app, themer) = harness.themed_app();
    themer.current_theme_loader(|| "dark".to_string());

    assert_eq!(
        app.render_template("index.html", context! { name => "Ada" })
            .unwrap(),
        "<body class=\"dark\">Hi Ada</body>"
    );
}

#[test]
fn test_switching_theme_between_renders() {
    let harness = ThemeHarness::new();
    harness
        .theme_file("dark", "title.html", "dark")
        .theme_file("light", "title.html", "light");

    let (app, themer) = harness.themed_app();

    {
        let _dark = themer.use_theme("dark");
        assert_eq!(app.render_template("title.html", context! {}).unwrap(), "dark");
    }
    {
        let _light = themer.use_theme("light");
        assert_eq!(app.render_template("title.html", context! {}).unwrap(), "light");
    }
}
