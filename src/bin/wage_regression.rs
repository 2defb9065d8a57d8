use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use wagefit::{
    data,
    pipeline::{self, AnalysisConfig},
};

const USAGE: &str = "Usage: wage_regression <data.csv|data.json> [config=<file.json>] [summary=<out.csv>] [plots=<dir>]";

#[derive(Debug, Default)]
struct Args {
    data: PathBuf,
    config: Option<PathBuf>,
    summary: Option<PathBuf>,
    #[cfg_attr(not(feature = "plotting"), allow(dead_code))]
    plots: Option<PathBuf>,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = std::env::args().skip(1);

    //
    // First argument is the dataset
    let Some(data) = args.next() else {
        bail!("Please provide a path to a CSV or JSON wage dataset.\n{USAGE}");
    };
    if matches!(data.as_str(), "help" | "--help" | "-h") {
        println!("{USAGE}");
        std::process::exit(0);
    }

    let mut parsed = Args {
        data: data.into(),
        ..Args::default()
    };
    for arg in args {
        if let Some(option) = arg.strip_prefix("config=") {
            parsed.config = Some(option.into());
        } else if let Some(option) = arg.strip_prefix("summary=") {
            parsed.summary = Some(option.into());
        } else if let Some(option) = arg.strip_prefix("plots=") {
            if !cfg!(feature = "plotting") {
                bail!("`plots=` requires the `plotting` feature");
            }
            parsed.plots = Some(option.into());
        } else {
            bail!("Unknown argument `{arg}`\n{USAGE}");
        }
    }

    Ok(parsed)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = parse_args()?;

    let config = match &args.config {
        Some(path) => AnalysisConfig::from_json_file(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };

    let dataset = data::load_file(&args.data)
        .with_context(|| format!("Failed to load {}", args.data.display()))?;

    println!("{}", dataset.describe());

    let analysis = pipeline::run(dataset, &config).context("Analysis failed")?;

    for variant in &analysis.variants {
        println!("== {} ==", variant.label);
        println!("{}", variant.fit);
        println!("{}", variant.summary());
    }

    let summary = analysis.rmse_summary();
    println!("{summary}");
    if let Some(best) = summary.best() {
        println!("Lowest RMSE: {} ({:.4})", best.model, best.rmse);
    }

    if let Some(path) = &args.summary {
        write_summary(path, &summary)?;
        println!("Wrote summary to {}", path.display());
    }

    #[cfg(feature = "plotting")]
    if let Some(dir) = &args.plots {
        let written =
            wagefit::plotting::render_analysis(dir, &analysis, &Default::default())
                .context("Failed to draw figures")?;
        for path in written {
            println!("Wrote plot to {}", path.display());
        }
    }

    Ok(())
}

fn write_summary(path: &Path, summary: &wagefit::report::RmseSummary) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    summary
        .write_csv(file)
        .with_context(|| format!("Failed to write {}", path.display()))
}
