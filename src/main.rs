//! qrstudio command line entrypoint

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use qrstudio::studio::{Studio, SurfaceFactory};
use qrstudio::surface::{Headless, Surface, TerminalSurface};
use qrstudio::{
    COLOR_PRESETS, DirectorySaver, DotStyle, ExportFormat, PreviewController, SaveAs, StudioConfig,
    StyledQrEngine, logging,
};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "qrstudio",
    version,
    about = "Styled QR codes with live preview and PNG/SVG export"
)]
struct Cli {
    /// Optional configuration file (toml/yaml). Defaults to qrstudio.{toml,yaml} in cwd/XDG config.
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render once and save one or more files
    Export {
        #[command(flatten)]
        settings: SettingsArgs,

        /// Output format; repeat for several
        #[arg(long = "format", short = 'f', value_name = "FORMAT", default_value = "png")]
        formats: Vec<ExportFormat>,

        /// Print a terminal preview before exporting
        #[arg(long, conflicts_with = "json")]
        preview: bool,

        /// Report results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Interactive session with a live terminal preview
    Studio {
        #[command(flatten)]
        settings: SettingsArgs,

        /// Do not draw the preview after each command
        #[arg(long)]
        no_preview: bool,
    },
    /// List styles and quick colours
    Styles {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Overrides applied on top of the configured defaults
#[derive(Args, Debug)]
struct SettingsArgs {
    /// Text or URL to encode
    #[arg(long, short = 'c')]
    content: Option<String>,

    /// Foreground colour (any CSS colour)
    #[arg(long = "fg", value_name = "COLOUR")]
    foreground: Option<String>,

    /// Background colour (any CSS colour)
    #[arg(long = "bg", value_name = "COLOUR")]
    background: Option<String>,

    /// Dot style: rounded, square, dots, classy, classy-rounded
    #[arg(long, short = 's')]
    style: Option<DotStyle>,

    /// Size in pixels (200-500)
    #[arg(long)]
    size: Option<u32>,

    /// Logo image to embed
    #[arg(long, value_name = "PATH")]
    logo: Option<PathBuf>,

    /// Export with a transparent background
    #[arg(long)]
    transparent: bool,

    /// Directory for exported files
    #[arg(long, short = 'o', value_name = "DIR")]
    out_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Command::Styles { json } = cli.command {
        print_styles(json)?;
        return Ok(());
    }

    let config = StudioConfig::load(cli.config.as_deref())?;
    logging::init(&config.logging)?;

    match cli.command {
        Command::Export {
            settings,
            formats,
            preview,
            json,
        } => run_export(&config, settings, formats, preview, json).await,
        Command::Studio {
            settings,
            no_preview,
        } => run_studio(&config, settings, !no_preview).await,
        Command::Styles { .. } => Ok(()),
    }
}

fn build_controller(
    config: &StudioConfig,
    args: &SettingsArgs,
) -> PreviewController<StyledQrEngine> {
    let mut settings = config.defaults.to_settings();
    if let Some(content) = &args.content {
        settings.content = content.clone();
    }
    if let Some(color) = &args.foreground {
        settings.foreground = color.clone();
    }
    if let Some(color) = &args.background {
        settings.background = color.clone();
    }
    if let Some(style) = args.style {
        settings.style = style;
    }
    if let Some(size) = args.size {
        settings.set_size(size);
    }
    if args.transparent {
        settings.transparent_export = true;
    }

    let dir = args
        .out_dir
        .clone()
        .unwrap_or_else(|| config.export.directory.clone());
    info!(dir = %dir.display(), "Export directory");
    let saver: Arc<dyn SaveAs> = Arc::new(DirectorySaver::new(dir));

    PreviewController::new(settings, move |options| {
        StyledQrEngine::new(options, Arc::clone(&saver))
    })
    .with_defaults(config.render_defaults())
    .with_logo_limit(config.logo.max_bytes)
}

async fn run_export(
    config: &StudioConfig,
    args: SettingsArgs,
    formats: Vec<ExportFormat>,
    preview: bool,
    json: bool,
) -> anyhow::Result<()> {
    let mut controller = build_controller(config, &args);
    let surface: Box<dyn Surface> = if preview {
        Box::new(TerminalSurface::stdout())
    } else {
        Box::new(Headless)
    };
    controller.mount(surface).context("Failed to render preview")?;

    let mut logo_error = None;
    if let Some(path) = &args.logo {
        logo_error = controller.upload_logo(path).await.err();
    }

    let mut saved = Vec::new();
    let mut failures = 0usize;
    if logo_error.is_none() {
        for format in formats {
            match controller.export(format).await {
                Ok(path) => saved.push(path),
                Err(_) => failures += 1,
            }
        }
    }

    let notifications = controller.drain_notifications();
    if json {
        let report = json!({
            "files": saved.iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
            "notifications": notifications,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for note in &notifications {
            println!("{note}");
        }
        for path in &saved {
            println!("  {}", path.display());
        }
    }

    if let Some(err) = logo_error {
        return Err(err).context("Logo upload failed");
    }
    if failures > 0 {
        bail!("{failures} export(s) failed");
    }
    Ok(())
}

async fn run_studio(
    config: &StudioConfig,
    args: SettingsArgs,
    preview: bool,
) -> anyhow::Result<()> {
    let controller = build_controller(config, &args);
    let surfaces: SurfaceFactory = if preview {
        Box::new(|| Box::new(TerminalSurface::stdout()) as Box<dyn Surface>)
    } else {
        Box::new(|| Box::new(Headless) as Box<dyn Surface>)
    };

    let mut studio = Studio::new(controller, surfaces, std::io::stdout());
    if let Some(path) = &args.logo {
        studio
            .execute(qrstudio::studio::Command::Logo(path.clone()))
            .await
            .context("Logo upload failed")?;
    }
    studio
        .run(BufReader::new(tokio::io::stdin()))
        .await
        .context("Studio session failed")?;
    Ok(())
}

fn print_styles(json: bool) -> anyhow::Result<()> {
    if json {
        let styles: Vec<_> = DotStyle::ALL
            .iter()
            .map(|style| {
                json!({
                    "key": style.key(),
                    "name": style.name(),
                    "preview": style.preview().to_string(),
                })
            })
            .collect();
        let report = json!({ "styles": styles, "color_presets": COLOR_PRESETS });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Styles:");
    for style in DotStyle::ALL {
        println!("  {} {:<15} ({})", style.preview(), style.name(), style.key());
    }
    println!("Quick colours:");
    for (index, color) in COLOR_PRESETS.iter().enumerate() {
        println!("  {:>2}. {color}", index + 1);
    }
    Ok(())
}
