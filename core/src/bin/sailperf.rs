use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand, ValueHint};
use log::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use sailperf_core::analyze_tour::{analyze_tour, date_from_path, TourInputs};
use sailperf_core::cli::{format_bin_table, load_manifest, print_tour_report};
use sailperf_core::error::PerfError;
use sailperf_core::storage::{load_config, save_dataset_csv, DatasetRow};
use sailperf_core::summary::summarize_bins;
use sailperf_core::track::load_gpx;
use sailperf_core::types::{parse_clock, PerfConfig, TimeWindow};
use sailperf_core::wind::WindArchive;
use sailperf_core::{gather_text, FusedRecord};

#[derive(Parser, Debug)]
#[command(author, version, about = "Sailing performance from GPS tracks and wind observations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fuse one GPX tour with the day's wind and print the angle-bin summary
    Analyze(AnalyzeArgs),
    /// Run every tour in a manifest into one dataset CSV
    Batch(BatchArgs),
}

#[derive(Parser, Debug)]
struct AnalyzeArgs {
    /// GPX track file
    #[arg(long, value_hint = ValueHint::FilePath)]
    gpx: PathBuf,

    /// Wind archive JSON (day -> records)
    #[arg(long, value_hint = ValueHint::FilePath)]
    wind: PathBuf,

    /// Wind day, defaults to the date in the GPX file name
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Local start of the analysed window (HH:MM[:SS])
    #[arg(long, value_parser = clock_arg)]
    start: Option<NaiveTime>,

    /// Local end of the analysed window (HH:MM[:SS])
    #[arg(long, value_parser = clock_arg)]
    end: Option<NaiveTime>,

    /// Config JSON (missing file = defaults)
    #[arg(long, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Write the dataset CSV here
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct BatchArgs {
    /// JSON list of {gpx_path, start_time, end_time[, date]}
    #[arg(long, value_hint = ValueHint::FilePath)]
    manifest: PathBuf,

    #[arg(long, value_hint = ValueHint::FilePath)]
    wind: PathBuf,

    #[arg(long, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    #[arg(short, long, default_value = "all_sailing_performance.csv", value_hint = ValueHint::FilePath)]
    out: PathBuf,
}

fn clock_arg(s: &str) -> Result<NaiveTime, String> {
    parse_clock(s).ok_or_else(|| format!("expected HH:MM or HH:MM:SS, got `{s}`"))
}

fn config_from(path: Option<&PathBuf>) -> Result<PerfConfig> {
    match path {
        Some(p) => load_config(p).with_context(|| format!("loading config {}", p.display())),
        None => Ok(PerfConfig::default()),
    }
}

fn run_analyze(args: AnalyzeArgs) -> Result<()> {
    let mut cfg = config_from(args.config.as_ref())?;
    match (args.start, args.end) {
        (Some(start), Some(end)) => cfg.window = Some(TimeWindow::new(start, end)?),
        (None, None) => {}
        _ => bail!("--start and --end must be given together"),
    }

    let archive = WindArchive::load(&args.wind)
        .with_context(|| format!("loading wind archive {}", args.wind.display()))?;
    let segments =
        load_gpx(&args.gpx).with_context(|| format!("reading {}", args.gpx.display()))?;

    let tour_id = args.gpx.to_string_lossy().into_owned();
    let date = args.date.or_else(|| date_from_path(&tour_id));

    let out = analyze_tour(TourInputs {
        segments: &segments,
        date,
        wind: Some(&archive),
        cfg: &cfg,
    })
    .with_context(|| format!("analysing {tour_id}"))?;

    print_tour_report(&out);

    if let Some(path) = &args.out {
        let rows: Vec<DatasetRow> = out.records.iter().map(|r| DatasetRow::new(&tour_id, r)).collect();
        save_dataset_csv(path, &rows).with_context(|| format!("writing {}", path.display()))?;
    }
    Ok(())
}

fn run_batch(args: BatchArgs) -> Result<()> {
    let base = config_from(args.config.as_ref())?;
    let tours = load_manifest(&args.manifest)
        .with_context(|| format!("reading manifest {}", args.manifest.display()))?;
    let archive = WindArchive::load(&args.wind)
        .with_context(|| format!("loading wind archive {}", args.wind.display()))?;
    info!("batch: {} tour(s), wind for {} day(s)", tours.len(), archive.len());

    let mut rows: Vec<DatasetRow> = Vec::new();
    let mut all: Vec<FusedRecord> = Vec::new();

    for tour in &tours {
        let cfg = PerfConfig {
            window: Some(TimeWindow::new(tour.start_time, tour.end_time)?),
            ..base.clone()
        };
        let segments = load_gpx(&tour.gpx_path).with_context(|| format!("reading {}", tour.gpx_path))?;

        let res = analyze_tour(TourInputs {
            segments: &segments,
            date: tour.date.or_else(|| date_from_path(&tour.gpx_path)),
            wind: Some(&archive),
            cfg: &cfg,
        });
        let out = match res {
            Ok(out) => out,
            Err(e @ PerfError::InsufficientData { .. }) => {
                warn!("batch: skipping {}: {e}", tour.gpx_path);
                continue;
            }
            Err(e) => return Err(e).with_context(|| format!("analysing {}", tour.gpx_path)),
        };

        rows.extend(out.records.iter().map(|r| DatasetRow::new(&tour.gpx_path, r)));
        all.extend(out.records);
    }

    save_dataset_csv(&args.out, &rows).with_context(|| format!("writing {}", args.out.display()))?;
    print!("{}", format_bin_table(&summarize_bins(&all)));
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Analyze(args) => run_analyze(args)?,
        Command::Batch(args) => run_batch(args)?,
    }

    debug!("metrics:\n{}", gather_text());
    Ok(())
}
