use std::path::PathBuf;

use clap::Parser;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use convergence_visualizer::ascii;
use convergence_visualizer::calendar::Year;
use convergence_visualizer::config::VisualizerConfig;
use convergence_visualizer::convergence::ConvergenceTable;
use convergence_visualizer::error::{Result, VisualizerError};
use convergence_visualizer::explorer;
use convergence_visualizer::export;
use convergence_visualizer::figure::{self, FigureBundle};
use convergence_visualizer::report::Reading;

#[derive(Parser, Debug)]
#[command(name = "convergence_visualizer")]
#[command(about = "Visualize convergence points against time since the Big Bang")]
struct Args {
    /// Year to inspect (negative for BCE, e.g. -5114 for 5114 BCE)
    #[arg(short, long, allow_negative_numbers = true)]
    year: Option<i64>,

    /// TOML config file (defaults are used for missing keys)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Export the 3D helix chart to a PNG file
    #[arg(long)]
    helix_png: Option<String>,

    /// Export the 2D timeline chart to a PNG file
    #[arg(long)]
    timeline_png: Option<String>,

    /// Export both charts as Plotly-compatible JSON
    #[arg(long)]
    export_json: Option<String>,

    /// Export the full text report (e.g., "report.txt")
    #[arg(long)]
    export_report: Option<String>,

    /// Start the interactive terminal explorer
    #[arg(long)]
    explore: bool,

    /// Do not print the ASCII timeline
    #[arg(long)]
    no_ascii: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

fn init_tracing(quiet: bool) {
    // The explorer owns the terminal, so only warnings get through by default
    let default_level = if quiet { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

fn run(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => VisualizerConfig::load(path)?,
        None => VisualizerConfig::default(),
    };

    if args.print_config {
        let text = config
            .to_toml_string()
            .map_err(|e| VisualizerError::InvalidConfig(format!("cannot serialize config: {}", e)))?;
        print!("{}", text);
        return Ok(());
    }

    let year = Year::from(args.year.unwrap_or(config.default_year));

    if args.explore {
        return explorer::run_explorer(config, year);
    }

    let table = ConvergenceTable::reference();
    let reading = Reading::compute(&config.epoch, year);
    debug!("Elapsed time for {}: {} Gyr", year, reading.elapsed_gyr);

    println!("{}", reading.render());
    if !args.no_ascii {
        print!("{}", ascii::render_timeline(&table, year, config.render.ascii_width));
    }

    let needs_helix = args.helix_png.is_some() || args.export_json.is_some();
    let helix = needs_helix.then(|| figure::build_helix_figure(&config.helix, &table, year));
    let timeline = figure::build_timeline_figure(&table, year);

    if let (Some(path), Some(fig)) = (&args.helix_png, &helix) {
        info!("Rendering helix chart...");
        export::export_helix_png(fig, config.render.helix_width, config.render.helix_height, path)?;
        info!("Exported helix chart to {}", path);
    }

    if let Some(path) = &args.timeline_png {
        info!("Rendering timeline chart...");
        export::export_timeline_png(
            &timeline,
            config.render.timeline_width,
            config.render.timeline_height,
            path,
        )?;
        info!("Exported timeline chart to {}", path);
    }

    if let Some(path) = &args.export_report {
        ascii::export_report_file(path, &reading, &table, &config.epoch, config.render.ascii_width)?;
        info!("Exported report to {}", path);
    }

    if let (Some(path), Some(helix)) = (&args.export_json, helix) {
        let bundle = FigureBundle::new(&reading, helix, timeline);
        export::export_figures_json(&bundle, path)?;
        info!("Exported figures to {}", path);
    }

    Ok(())
}

fn main() {
    let args = Args::parse();
    init_tracing(args.explore);

    if let Err(e) = run(args) {
        error!("{}", e);
        std::process::exit(1);
    }
}
