use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use mapmarkers::loader::{load_all, CatalogSource};
use mapmarkers::rendering::{digest, page::render_page};
use mapmarkers::{CategoryStyleTable, LoaderConfig, MapConfig, MarkerCatalog, PopupEscaping};
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mapmarkers", version, about = "Render point catalogs as map markers")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a catalog as a map page, instruction JSON, or GeoJSON
    Render(RenderArgs),
    /// Validate every record of a catalog and report malformed ones
    Check {
        /// Catalog document path or http(s) URL; repeatable
        #[arg(long, required = true)]
        catalog: Vec<String>,
        /// Request timeout for remote catalogs
        #[arg(long, default_value_t = 30000)]
        timeout_ms: u64,
    },
}

#[derive(clap::Args)]
struct RenderArgs {
    /// Catalog document path or http(s) URL; repeat to merge catalogs in order
    #[arg(long, required = true)]
    catalog: Vec<String>,
    /// JSON object mapping categories to CSS classes
    #[arg(long)]
    styles: Option<PathBuf>,
    /// JSON map config; unset keys keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Overrides `access_token` from the config file
    #[arg(long, env = "MAPBOX_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,
    #[arg(long, value_enum, default_value_t = Format::Page)]
    format: Format,
    /// Output file; stdout when omitted
    #[arg(long, short)]
    output: Option<PathBuf>,
    /// Fail on the first malformed record instead of skipping it
    #[arg(long)]
    strict: bool,
    /// HTML-escape popup titles and descriptions
    #[arg(long)]
    escape_popups: bool,
    /// Fit the initial view to the markers
    #[arg(long)]
    fit: bool,
    /// Request timeout for remote catalogs
    #[arg(long, default_value_t = 30000)]
    timeout_ms: u64,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Page,
    Json,
    Geojson,
}

fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mapmarkers=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn load(locations: &[String], timeout_ms: u64) -> anyhow::Result<Vec<MarkerCatalog>> {
    let sources: Vec<_> = locations.iter().map(|l| CatalogSource::parse(l)).collect();
    let loader = LoaderConfig {
        timeout_ms,
        ..Default::default()
    };
    let mut catalogs = Vec::with_capacity(sources.len());
    for (source, result) in sources.iter().zip(load_all(&sources, &loader).await) {
        let catalog = result.with_context(|| format!("loading catalog {}", source))?;
        info!("loaded {} records from {}", catalog.len(), source);
        catalogs.push(catalog);
    }
    Ok(catalogs)
}

async fn render(args: RenderArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(p) => MapConfig::from_json_file(p)?,
        None => MapConfig::default(),
    };
    if let Some(token) = args.access_token {
        config.access_token = token;
    }
    if args.escape_popups {
        config.popup_escaping = PopupEscaping::Html;
    }
    if args.fit {
        config.fit_to_markers = true;
    }
    // Only pages embed the token, so only pages need a complete config.
    if matches!(args.format, Format::Page) {
        config.validate().context("invalid map config")?;
    }

    let styles = match &args.styles {
        Some(p) => CategoryStyleTable::from_json_file(p)?,
        None => CategoryStyleTable::new(),
    };
    let catalog: MarkerCatalog = load(&args.catalog, args.timeout_ms)
        .await?
        .iter()
        .flat_map(|c| c.iter().cloned())
        .collect();

    let body = match args.format {
        Format::Geojson => serde_json::to_string_pretty(&catalog.to_geojson())?,
        Format::Json | Format::Page => {
            let outcome = config.renderer().render_all(&catalog, &styles);
            let instructions = if args.strict {
                outcome.into_strict()?
            } else {
                let (instructions, skipped) = outcome.partition();
                if !skipped.is_empty() {
                    info!("skipped {} malformed records", skipped.len());
                }
                instructions
            };
            info!("rendered {} markers (digest {})", instructions.len(), digest(&instructions)?);

            if matches!(args.format, Format::Json) {
                serde_json::to_string_pretty(&instructions)?
            } else {
                render_page(config, &instructions)?
            }
        }
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, body).with_context(|| format!("writing {}", path.display()))?;
            info!("wrote {}", path.display());
        }
        None => {
            let mut out = std::io::stdout().lock();
            writeln!(out, "{}", body)?;
        }
    }
    Ok(())
}

async fn check(locations: &[String], timeout_ms: u64) -> anyhow::Result<()> {
    let mut bad = 0;
    for (location, catalog) in locations.iter().zip(load(locations, timeout_ms).await?) {
        let faults = catalog.check();
        for f in &faults {
            eprintln!("{}: {}", location, f);
        }
        if faults.is_empty() {
            println!("{}: {} records ok", location, catalog.len());
        }
        bad += faults.len();
    }
    if bad > 0 {
        bail!("{} malformed records", bad);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Command::Render(args) => render(args).await,
        Command::Check { catalog, timeout_ms } => check(&catalog, timeout_ms).await,
    }
}
