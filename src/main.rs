use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use launch_dash::data::loader;
use launch_dash::state::{DashboardView, FilterState, SliderConfig};
use launch_dash::{LaunchQueryEngine, PayloadPoint, SiteSelector};

#[derive(Parser)]
#[command(
    name = "launch-dash",
    version,
    about = "Query launch records: site success breakdowns and payload scatter data"
)]
struct Cli {
    /// Launch table (.csv, .json or .parquet)
    file: PathBuf,

    /// Print JSON instead of a plain-text table
    #[arg(long, global = true)]
    json: bool,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Payload slider step in kg
    #[arg(long, default_value_t = SliderConfig::DEFAULT_STEP_KG, global = true)]
    step_kg: f64,

    /// Fix the slider's lower bound instead of deriving it from the data
    #[arg(long, requires = "slider_max", global = true)]
    slider_min: Option<f64>,

    /// Fix the slider's upper bound instead of deriving it from the data
    #[arg(long, requires = "slider_min", global = true)]
    slider_max: Option<f64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dataset size, sites, booster categories and payload bounds
    Summary,
    /// Success counts per site, or success vs. failure for one site
    Breakdown {
        /// `ALL` or a site id / label (e.g. ksc_lc, "KSC LC-39A")
        #[arg(long, default_value = "ALL")]
        site: String,
    },
    /// Payload mass against outcome for the selected site and range
    Scatter(SelectionArgs),
    /// Both views at once
    View(SelectionArgs),
}

#[derive(Args)]
struct SelectionArgs {
    /// `ALL` or a site id / label
    #[arg(long, default_value = "ALL")]
    site: String,
    /// Lower payload bound in kg (default: seeded from the data)
    #[arg(long)]
    min_kg: Option<f64>,
    /// Upper payload bound in kg (default: seeded from the data)
    #[arg(long)]
    max_kg: Option<f64>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let dataset = loader::load_file(&cli.file)?;
    let slider = match (cli.slider_min, cli.slider_max) {
        (Some(min), Some(max)) => {
            SliderConfig::fixed(min, max, cli.step_kg).context("invalid slider bounds")?
        }
        _ => SliderConfig::from_dataset(&dataset, cli.step_kg),
    };
    let mut state = FilterState::seeded(&dataset, slider);
    let engine = LaunchQueryEngine::new(dataset);

    match cli.command {
        Commands::Summary => print_summary(&engine, &state, cli.json),
        Commands::Breakdown { site } => {
            let breakdown = engine.site_success_breakdown_for(&site)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&breakdown)?);
            } else {
                println!("{}", breakdown.title());
                for slice in breakdown.slices() {
                    println!("  {:<14} {:>5}  {:>5.1}%", slice.label, slice.count, slice.share * 100.0);
                }
            }
            Ok(())
        }
        Commands::Scatter(args) => {
            apply_selection(&mut state, &args)?;
            let points = engine.payload_correlation_points(state.site, state.payload)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&points)?);
            } else {
                print_points(&points);
            }
            Ok(())
        }
        Commands::View(args) => {
            apply_selection(&mut state, &args)?;
            let view = state.view(&engine)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print_view(&view);
            }
            Ok(())
        }
    }
}

fn apply_selection(state: &mut FilterState, args: &SelectionArgs) -> Result<()> {
    let site: SiteSelector = args.site.parse()?;
    state.set_site(site);
    let min_kg = args.min_kg.unwrap_or(state.payload.min_kg);
    let max_kg = args.max_kg.unwrap_or(state.payload.max_kg);
    state.set_payload_range(min_kg, max_kg)?;
    Ok(())
}

fn print_summary(engine: &LaunchQueryEngine, state: &FilterState, json: bool) -> Result<()> {
    let ds = engine.dataset();
    let sites: Vec<&str> = ds.sites().into_iter().map(|s| s.id()).collect();
    let categories = ds.booster_categories();
    let bounds = ds.payload_bounds();

    if json {
        let summary = serde_json::json!({
            "records": ds.len(),
            "sites": sites,
            "booster_categories": categories,
            "payload_bounds_kg": bounds,
            "slider": state.slider(),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{} launch records", ds.len());
        println!("sites:      {}", sites.join(", "));
        println!(
            "boosters:   {}",
            categories.into_iter().collect::<Vec<_>>().join(", ")
        );
        if let Some((lo, hi)) = bounds {
            println!("payload:    {lo} – {hi} kg");
        }
        let slider = state.slider();
        println!(
            "slider:     {} – {} kg, step {}",
            slider.min_kg, slider.max_kg, slider.step_kg
        );
    }
    Ok(())
}

const POINT_HEADER: &str = "  payload_kg  outcome  booster";

fn print_point(p: &PayloadPoint<'_>, color: Option<&str>) {
    println!(
        "{:>12.1}  {:>7}  {}{}",
        p.payload_mass_kg,
        u8::from(p.outcome),
        p.booster_version_category,
        color.map(|c| format!(" ({c})")).unwrap_or_default()
    );
}

fn print_points(points: &[PayloadPoint<'_>]) {
    println!("{POINT_HEADER}");
    for p in points {
        print_point(p, None);
    }
    println!("{} points", points.len());
}

fn print_view(view: &DashboardView<'_>) {
    println!(
        "site {} | payload {} – {} kg",
        view.site, view.payload.min_kg, view.payload.max_kg
    );
    println!();
    println!("{}", view.title);
    for slice in &view.slices {
        println!("  {:<14} {:>5}  {:>5.1}%", slice.label, slice.count, slice.share * 100.0);
    }
    println!();
    println!("{POINT_HEADER}");
    for p in &view.points {
        print_point(&p.point, Some(&p.color));
    }
    println!("{} points", view.points.len());
    println!();
    println!("legend:");
    for entry in &view.legend {
        println!("  {} {}", entry.color, entry.category);
    }
}
