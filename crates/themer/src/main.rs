use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use themer::{AppConfig, Application, Themer, DEFAULT_THEME};

/// Inspect and render themes the way an application using themer would.
#[derive(Parser, Debug)]
#[command(name = "themer", version, about = "Theme-aware template rendering")]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "DIR",
        global = true,
        help = "Application root directory (default: current directory)"
    )]
    root: Option<PathBuf>,

    #[arg(
        short,
        long,
        value_name = "FILE",
        global = true,
        help = "JSON configuration file (default: built-in defaults)"
    )]
    config: Option<PathBuf>,

    #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true,
        help = "Increase log verbosity (-v, -vv, -vvv)"
    )]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the themes visible through the configured loaders
    List,
    /// Render a template from a theme
    Render {
        template: String,
        #[arg(short, long, default_value = DEFAULT_THEME)]
        theme: String,
        #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_var)]
        vars: Vec<(String, String)>,
    },
    /// Print a static asset from a theme, or its URL
    Static {
        path: String,
        #[arg(short, long, default_value = DEFAULT_THEME)]
        theme: String,
        #[arg(long, help = "Print the asset URL instead of its contents")]
        url: bool,
    },
}

fn parse_var(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got {:?}", raw)),
    }
}

fn load_app(cli: &Cli) -> Result<Application> {
    let root = match &cli.root {
        Some(root) => root.clone(),
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };

    match &cli.config {
        Some(path) => Application::from_config_file(&root, path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => {
            let mut config = AppConfig::default();
            config.themer.apply_env_overrides();
            config.validate().context("Invalid THEMER_* override")?;
            Ok(Application::new(root, config))
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    themer::tracing_setup::init_global(cli.verbose);

    let mut app = load_app(&cli)?;
    let themer = Themer::init_app(&mut app, None);
    tracing::debug!("Using {:?}", themer);

    match cli.command {
        Command::List => {
            let themes = themer.themes();
            if themes.is_empty() {
                bail!(
                    "No themes found in {}",
                    app.root_path()
                        .join(&app.config().themer.default_directory)
                        .display()
                );
            }
            for found in themes {
                println!("{}\t{}", found.theme.name(), found.loader.describe());
            }
        }
        Command::Render {
            template,
            theme,
            vars,
        } => {
            themer.current_theme_loader(move || theme.clone());
            let ctx: BTreeMap<String, String> = vars.into_iter().collect();
            let rendered = app
                .render_template(&template, &ctx)
                .with_context(|| format!("Failed to render {}", template))?;
            println!("{}", rendered);
        }
        Command::Static { path, theme, url } => {
            themer.current_theme_loader(move || theme.clone());
            let asset = themer
                .lookup_static_theme_path(&path)
                .with_context(|| format!("Failed to resolve static asset {}", path))?;
            if url {
                println!("{}", asset.url);
            } else {
                io::stdout()
                    .write_all(&asset.bytes)
                    .context("Failed to write asset to stdout")?;
            }
        }
    }

    Ok(())
}
