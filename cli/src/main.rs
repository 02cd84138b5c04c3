//! unpage CLI - PAGE-XML archive to dataset converter

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use unpage::convert::{default_output_dir, SplitOutput};
use unpage::detect::detect_zip_from_path;
use unpage::{
    Converter, DatasetHandle, DatasetSink, ExportMode, ExportOptions, ExportOutput,
    LocalDatasetSink, SplitOptions, WindowConfig,
};

#[derive(Parser)]
#[command(name = "unpage")]
#[command(version)]
#[command(about = "Convert PAGE-XML transcription archives to datasets", long_about = None)]
struct Cli {
    /// Path to the ZIP archive
    #[arg(value_name = "ZIP")]
    zip_path: PathBuf,

    /// Export mode
    #[arg(long, value_enum, default_value = "text")]
    mode: Mode,

    /// Number of lines per window (window mode only)
    #[arg(long, default_value_t = 2, allow_negative_numbers = true)]
    window_size: i64,

    /// Number of lines shared by consecutive windows (window mode only)
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    overlap: i64,

    /// Dataset repository ID (e.g., username/dataset-name); publishing needs a remote sink
    #[arg(long)]
    repo_id: Option<String>,

    /// Only show statistics, don't convert
    #[arg(long)]
    stats_only: bool,

    /// Convert and save the dataset locally
    #[arg(long)]
    local_only: bool,

    /// Directory to save the dataset (with --local-only)
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Share of records in a train split (e.g. 0.8); writes train/ and test/
    #[arg(long, value_name = "FRACTION")]
    split_train: Option<f64>,

    /// Shuffle records before splitting
    #[arg(long)]
    shuffle: bool,

    /// Shuffle seed
    #[arg(long, default_value_t = unpage::convert::DEFAULT_SPLIT_SEED)]
    seed: u64,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Full page image with the PAGE document
    #[value(name = "raw_xml")]
    RawXml,
    /// Full page image with its transcription
    Text,
    /// Region crops
    Region,
    /// Line crops
    Line,
    /// Windows of consecutive lines
    Window,
    /// Polygon-masked region crops
    #[value(name = "polygon_region")]
    PolygonRegion,
    /// Polygon-masked line crops with baselines
    #[value(name = "polygon_line")]
    PolygonLine,
}

impl From<Mode> for ExportMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::RawXml => ExportMode::RawXml,
            Mode::Text => ExportMode::Text,
            Mode::Region => ExportMode::Region,
            Mode::Line => ExportMode::Line,
            Mode::Window => ExportMode::Window,
            Mode::PolygonRegion => ExportMode::PolygonRegion,
            Mode::PolygonLine => ExportMode::PolygonLine,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Check flags before touching the archive.
fn validate(cli: &Cli) -> Result<ExportOptions, String> {
    if !cli.stats_only && !cli.local_only {
        return Err(match &cli.repo_id {
            None => "--repo-id is required unless using --stats-only or --local-only".into(),
            Some(repo_id) => format!(
                "cannot publish to {}: only local datasets are supported, use --local-only",
                repo_id
            ),
        });
    }

    let mut options = ExportOptions::new();
    if cli.mode == Mode::Window {
        if cli.window_size < 1 {
            return Err("--window-size must be at least 1".into());
        }
        if cli.overlap < 0 {
            return Err("--overlap cannot be negative".into());
        }
        if cli.overlap >= cli.window_size {
            return Err("--overlap must be less than --window-size".into());
        }
        let window = WindowConfig::new(cli.window_size as usize, cli.overlap as usize)
            .map_err(|e| e.to_string())?;
        options = options.with_window(window);
    }
    Ok(options)
}

fn split_options(cli: &Cli) -> Option<SplitOptions> {
    cli.split_train.map(|fraction| {
        SplitOptions::new(fraction)
            .with_shuffle(cli.shuffle)
            .with_seed(cli.seed)
    })
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let options = validate(cli)?;
    if !cli.zip_path.exists() {
        return Err(format!("ZIP file not found: {}", cli.zip_path.display()).into());
    }
    detect_zip_from_path(&cli.zip_path)?;
    let mode = ExportMode::from(cli.mode);

    let converter = Converter::open(&cli.zip_path);

    if cli.stats_only {
        return cmd_stats(&converter, mode, &options);
    }

    let output = export_with_progress(&converter, mode, &options)?;
    println!("{}", converter.walk_report()?);
    println!("{}", output.report);

    let sink = LocalDatasetSink::new();
    let parts = match split_options(cli) {
        Some(split) => {
            let (train, test) = SplitOutput::from_output(output, &split)?.into_outputs();
            vec![(Some("train"), train), (Some("test"), test)]
        }
        None => vec![(None, output)],
    };

    let root = cli
        .output_dir
        .clone()
        .unwrap_or_else(|| default_output_dir(mode, options.window));
    for (split, part) in parts {
        let dir = match split {
            Some(name) => root.join(name),
            None => root.clone(),
        };
        save(&sink, part, &dir)?;
    }
    println!("{} {}", "Dataset saved to:".green(), root.display());

    Ok(())
}

fn cmd_stats(
    converter: &Converter,
    mode: ExportMode,
    options: &ExportOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let stats = converter.stats()?;
    print!("{}", stats);

    if mode == ExportMode::Window {
        let window = options.window;
        println!(
            "  Windows (window_size={}, overlap={}): {}",
            window.size(),
            window.overlap(),
            converter.window_count(window)?
        );
    }
    println!();
    print!("{}", converter.walk_report()?);
    Ok(())
}

fn export_with_progress(
    converter: &Converter,
    mode: ExportMode,
    options: &ExportOptions,
) -> Result<ExportOutput, Box<dyn std::error::Error>> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {pos} records {msg}")?,
    );
    pb.set_message("Parsing archive...");
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let mut stream = converter.stream(mode, options)?;
    pb.set_message(format!("({} mode)", mode));

    let mut records = Vec::new();
    for record in stream.by_ref() {
        records.push(record);
        pb.inc(1);
    }
    pb.finish_with_message("Done!");

    Ok(ExportOutput {
        mode,
        schema: stream.schema(),
        records,
        report: stream.report().clone(),
    })
}

fn save(
    sink: &LocalDatasetSink,
    output: ExportOutput,
    dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let dataset = sink.accept(output)?;
    dataset.persist(dir)?;
    println!(
        "  {} {} records -> {}",
        "└─".dimmed(),
        dataset.len(),
        dir.display()
    );
    Ok(())
}
