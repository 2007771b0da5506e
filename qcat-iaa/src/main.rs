//! Inter-annotator agreement for one annotation round
//!
//! **Usage:**
//! ```bash
//! qcat-iaa [--scheme v2] [--pairwise] [--export <FILE>] sheet1.csv sheet2.csv ...
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use qcat_common::config::{load_config_with_source, log_config_source, TomlConfig};
use qcat_common::SheetScheme;
use qcat_iaa::{closed_class_agreement, load_sheets, pairwise_agreement, CliFormatter, IaaReport};

/// Inter-annotator agreement between annotation sheets
#[derive(Parser, Debug)]
#[clap(name = "qcat-iaa")]
#[clap(about = "Krippendorff's alpha and pairwise agreement between annotation sheets")]
struct Args {
    /// Sheet layout: v1, v2, v2ec or v2ea (default from config)
    #[clap(long)]
    scheme: Option<SheetScheme>,

    /// Leading rows before the data in each sheet (default from config)
    #[clap(long)]
    header_rows: Option<usize>,

    /// Also print sheet × sheet agreement per closed-class column
    #[clap(long)]
    pairwise: bool,

    /// Export results to JSON file
    #[clap(long, value_name = "FILE")]
    export: Option<PathBuf>,

    /// Config file (logging level, corpus defaults)
    #[clap(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// One exported sheet per annotator
    #[clap(required = true, value_name = "SHEET")]
    sheets: Vec<PathBuf>,
}

impl Args {
    /// Sheet layout and header rows, falling back to the `[corpus]` config
    fn sheet_layout(&self, config: &TomlConfig) -> (SheetScheme, usize) {
        (
            self.scheme.unwrap_or(config.corpus.scheme),
            self.header_rows.unwrap_or(config.corpus.header_rows),
        )
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let (config, source) =
        load_config_with_source(args.config.as_deref()).context("Failed to load config")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
        )
        .init();
    log_config_source(source.as_deref());

    let (scheme, header_rows) = args.sheet_layout(&config);

    info!("Comparing {} sheets ({:?} layout)", args.sheets.len(), scheme);
    let table = load_sheets(&args.sheets, scheme, header_rows)
        .context("Failed to load annotation sheets")?;

    let closed_class = closed_class_agreement(&table, scheme);
    println!("{}", CliFormatter::format_alpha_table(&closed_class));

    let pairwise = if args.pairwise {
        scheme
            .closed_class_columns()
            .iter()
            .map(|&column| pairwise_agreement(&table, column))
            .collect()
    } else {
        Vec::new()
    };
    for agreement in &pairwise {
        println!("{}", CliFormatter::format_pairwise(agreement));
    }

    if let Some(path) = &args.export {
        let report = IaaReport::new(
            scheme,
            args.sheets.clone(),
            table.len(),
            closed_class,
            pairwise,
        );
        report
            .export_json(path)
            .with_context(|| format!("Failed to export results to {}", path.display()))?;
        println!("✓ Results exported to: {}", path.display());
    }

    Ok(())
}
