use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod clean;
mod diagnostics;
mod model;
mod options;
mod render;
mod stats;
mod trace;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "pw-profile")]
#[command(about = "Page walk latency statistics from perf traces", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize every benchmark run in a perf trace, plus partition averages.
    Report {
        /// Log produced by `perf stat -I` around the benchmark.
        trace: PathBuf,

        /// Runs per partition, comma separated (e.g. 3,3).
        #[arg(short = 'p', long, value_delimiter = ',')]
        partitions: Vec<usize>,

        /// Run numbers to leave out, comma separated, counted from #1.
        #[arg(short = 'e', long, value_delimiter = ',')]
        exclusions: Vec<u32>,

        /// JSON file with `partitions` / `exclusions`; flags take precedence.
        #[arg(long)]
        options: Option<PathBuf>,

        /// Also write the report data as JSON.
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Strip dmesg timestamps and source locations from a kernel log.
    Clean {
        input: PathBuf,

        #[arg(short = 'o', long)]
        out: PathBuf,

        /// Keep the leading `[timestamp]`.
        #[arg(long)]
        keep_square_brackets: bool,

        /// Keep the trailing `(at file:line)`.
        #[arg(long)]
        keep_brackets: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::Report {
            trace: trace_path,
            partitions,
            exclusions,
            options: options_path,
            json,
        } => {
            // 1) Settings: file first, then command-line overrides.
            let base = match &options_path {
                Some(path) => options::AnalysisOptions::from_json_file(path)?,
                None => options::AnalysisOptions::default(),
            };
            let validated = base
                .override_with(partitions, exclusions)
                .validate_and_build()?;

            // 2) Load + classify.
            tracing::info!("Loading {}", trace_path.display());
            let lines = trace::read_trace_file(&trace_path)?;

            // 3) Segment + aggregate.
            let data = model::build_report_data(&lines, &validated);

            // 4) Render.
            print!("{}", render::render_text_report(&data)?);
            if let Some(path) = json {
                std::fs::write(&path, serde_json::to_string_pretty(&data)?)?;
                tracing::info!("Wrote {}", path.display());
            }
        }
        Commands::Clean {
            input,
            out,
            keep_square_brackets,
            keep_brackets,
        } => {
            clean::clean_file(
                &input,
                &out,
                clean::CleanOptions {
                    keep_square_brackets,
                    keep_brackets,
                },
            )?;
            tracing::info!("Wrote {}", out.display());
        }
    }

    Ok(())
}
