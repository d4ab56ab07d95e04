//! Command-line interface for the repocard binary.
//!
//! The CLI runs the HTTP badge server, renders single documents through the
//! same pipeline, and lists the built-in colour themes.

use std::{
    fs, io,
    path::{Path, PathBuf},
    process,
    sync::Arc,
};

use clap::{ArgAction, Args, Parser, Subcommand};
use repocard::{
    BadgeService, Error, GitHubSource, NamedTheme, RequestParams, ServiceConfig, THEMES,
    output_error, run_server,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Command line interface for rendering GitHub repository badges.
#[derive(Debug, Parser,)]
#[command(name = "repocard", version, about = "Render SVG badges from GitHub repository metrics")]
struct Cli
{
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand,)]
/// Supported commands exposed by the CLI.
enum Command
{
    /// Serve badges over HTTP.
    Serve(ServeArgs,),
    /// Render a single badge or banner.
    Render(RenderArgs,),
    /// List the built-in colour themes as JSON.
    Themes(ThemesArgs,),
}

/// Options shared by commands that talk to GitHub.
#[derive(Debug, Args, Default,)]
struct SourceArgs
{
    /// Path to an optional YAML service configuration file.
    #[arg(long = "config", value_name = "PATH")]
    config: Option<PathBuf,>,

    /// Token used to authenticate GitHub API requests.
    #[arg(long = "github-token", env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: Option<String,>,

    /// GitHub REST API base URL, overriding the configuration file.
    #[arg(long = "api-base", value_name = "URL")]
    api_base: Option<String,>,
}

#[derive(Debug, Args,)]
/// Arguments accepted by the `serve` subcommand.
struct ServeArgs
{
    #[command(flatten)]
    source: SourceArgs,

    /// Socket address to bind, overriding the configuration file.
    #[arg(long = "bind", value_name = "ADDR")]
    bind: Option<String,>,
}

#[derive(Debug, Args,)]
/// Arguments accepted by the `render` subcommand.
struct RenderArgs
{
    #[command(flatten)]
    source: SourceArgs,

    /// Request parameter in `key=value` form; may be repeated.
    #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_param)]
    params: Vec<(String, String,),>,

    /// File receiving the SVG document instead of standard output.
    #[arg(long = "output", value_name = "PATH")]
    output: Option<PathBuf,>,
}

#[derive(Debug, Args,)]
/// Arguments accepted by the `themes` subcommand.
struct ThemesArgs
{
    /// Output formatted JSON for easier inspection.
    #[arg(long = "pretty", action = ArgAction::SetTrue)]
    pretty: bool,
}

/// Entry point that reports errors and sets the appropriate exit status.
#[actix_web::main]
async fn main()
{
    init_tracing();

    if let Err(error,) = run().await {
        eprintln!("{}", error.to_display_string());
        process::exit(1,);
    }
}

fn init_tracing()
{
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info",),),)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr,),)
        .init();
}

/// Executes the CLI using parsed arguments.
///
/// # Errors
///
/// Propagates configuration, rendering and output errors.
async fn run() -> Result<(), Error,>
{
    let cli = Cli::parse();

    match cli.command {
        Command::Serve(args,) => run_serve(args,).await,
        Command::Render(args,) => run_render(args,).await,
        Command::Themes(args,) => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write_themes(&mut handle, THEMES, args.pretty,)
        }
    }
}

fn parse_param(raw: &str,) -> Result<(String, String,), String,>
{
    let (key, value,) =
        raw.split_once('=',).ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"),)?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("parameter '{raw}' has an empty key"),);
    }
    Ok((key.to_owned(), value.to_owned(),),)
}

/// Loads the configuration file and applies command-line overrides.
fn load_config(source: &SourceArgs, bind: Option<&str,>,) -> Result<ServiceConfig, Error,>
{
    let mut config = match source.config.as_deref() {
        Some(path,) => ServiceConfig::load(path,)?,
        None => ServiceConfig::default(),
    };

    if let Some(bind,) = bind {
        config.bind = bind.to_owned();
    }
    if let Some(api_base,) = source.api_base.as_deref() {
        config.api_base = Some(api_base.to_owned(),);
    }

    config.validate()
}

fn build_service(source: &SourceArgs, config: &ServiceConfig,) -> Result<BadgeService, Error,>
{
    let token = source.github_token.as_deref().map(str::trim,).filter(|token| !token.is_empty(),);
    let github = GitHubSource::new(token, config.api_base.as_deref(),)?;

    Ok(BadgeService::new(Arc::new(github,),)
        .with_max_inline_image_bytes(config.max_inline_image_bytes,),)
}

async fn run_serve(args: ServeArgs,) -> Result<(), Error,>
{
    let config = load_config(&args.source, args.bind.as_deref(),)?;
    let service = build_service(&args.source, &config,)?;
    run_server(service, &config,).await
}

async fn run_render(args: RenderArgs,) -> Result<(), Error,>
{
    let config = load_config(&args.source, None,)?;
    let service = build_service(&args.source, &config,)?;
    let params = RequestParams::merge(args.params, None,);

    let svg = service.render_params(&params,).await?;

    match args.output.as_deref() {
        Some(path,) => write_document(path, &svg,),
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            io::Write::write_all(&mut handle, svg.as_bytes(),)
                .map_err(|source| output_error(Path::new("<stdout>",), source,),)
        }
    }
}

fn write_document(path: &Path, svg: &str,) -> Result<(), Error,>
{
    if let Some(parent,) = path.parent().filter(|parent| !parent.as_os_str().is_empty(),) {
        fs::create_dir_all(parent,).map_err(|source| output_error(parent, source,),)?;
    }
    fs::write(path, svg,).map_err(|source| output_error(path, source,),)
}

fn write_themes<W: io::Write,>(
    writer: &mut W,
    themes: &[NamedTheme],
    pretty: bool,
) -> Result<(), Error,>
{
    if pretty {
        serde_json::to_writer_pretty(writer, themes,)?;
    } else {
        serde_json::to_writer(writer, themes,)?;
    }

    Ok((),)
}
