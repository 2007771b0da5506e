//! Corpus statistics report
//!
//! **Usage:**
//! ```bash
//! qcat-stats --input terminology_complete.csv [--output-dir <DIR>] [--top-n 10]
//! qcat-stats --write-config qcat.toml
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use qcat_common::config::{
    load_config_with_source, log_config_source, resolve_input, resolve_output_dir,
    write_toml_config, TomlConfig,
};
use qcat_common::load_index;
use qcat_stats::{run, OutputLayout, StatsOptions};

/// Corpus statistics over annotated human-evaluation papers
#[derive(Parser, Debug)]
#[clap(name = "qcat-stats")]
#[clap(about = "Frequency, year-wise and confusion tables for the annotated corpus")]
struct Args {
    /// Corpus sheet export (CSV)
    #[clap(long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Directory receiving Data/ and Tables/
    #[clap(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Config file (overrides QCAT_CONFIG)
    #[clap(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Rows per confusion table
    #[clap(long)]
    top_n: Option<usize>,

    /// First year counted as "after" in year-wise tables
    #[clap(long)]
    split_year: Option<i32>,

    /// Leave out rows by this annotator (repeatable)
    #[clap(long = "exclude-annotator", value_name = "ID")]
    exclude_annotator: Vec<String>,

    /// Write the effective configuration to FILE and exit
    #[clap(long, value_name = "FILE")]
    write_config: Option<PathBuf>,
}

impl Args {
    /// Apply command-line overrides on top of the loaded config
    fn apply(&self, config: &mut TomlConfig) {
        if let Some(top_n) = self.top_n {
            config.corpus.top_n = top_n;
        }
        if let Some(split_year) = self.split_year {
            config.corpus.split_year = split_year;
        }
        if !self.exclude_annotator.is_empty() {
            config.corpus.excluded_annotators = self.exclude_annotator.clone();
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let (mut config, source) =
        load_config_with_source(args.config.as_deref()).context("Failed to load config")?;
    args.apply(&mut config);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
        )
        .init();
    log_config_source(source.as_deref());

    if let Some(path) = &args.write_config {
        let mut effective = config.clone();
        effective.input = args.input.clone().or(effective.input);
        effective.output_dir = args.output_dir.clone().or(effective.output_dir);
        write_toml_config(&effective, path)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        println!("Config written to: {}", path.display());
        return Ok(());
    }

    let input = resolve_input(args.input.as_deref(), &config)?;
    let output_dir = resolve_output_dir(args.output_dir.as_deref(), &config);
    info!("Input: {}", input.display());
    info!("Output: {}", output_dir.display());

    let index = load_index(&input, &config.corpus.load_options())
        .with_context(|| format!("Failed to load {}", input.display()))?;

    let layout = OutputLayout::new(&output_dir);
    let options = StatsOptions::from(&config.corpus);
    let summary = run(&index, &options, &layout).context("Report generation failed")?;

    println!(
        "\n✓ {} papers ({} rows): {} files written to {}",
        summary.papers,
        summary.rows,
        summary.files_written.len(),
        output_dir.display()
    );
    Ok(())
}
