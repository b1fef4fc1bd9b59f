use crate::config::Config;
use crate::engine::conversion::{ConversionPipeline, ConversionReport, ConversionRequest};
use crate::engine::quantizer::ThresholdMode;
use crate::format::OutputFormat;
use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use tabled::{
    settings::{object::Rows, Alignment, Modify},
    Table, Tabled,
};

#[derive(Parser, Debug)]
#[command(name = "word2bits")]
#[command(about = "Convert binary word vectors to compressed, text or binary files")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    /// Binary word-vector file to read
    pub input: PathBuf,

    /// Destination file
    pub output: PathBuf,

    /// Threshold mode: 0 = none, 1 = signed ternary, 2 = binary bucket
    #[arg(allow_negative_numbers = true)]
    pub threshold: Option<String>,

    /// Output format (compressed, text, binary)
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Hide progress bars
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Tabled)]
struct StatsRow {
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Value")]
    value: String,
}

impl Cli {
    /// Resolves command-line arguments against the loaded config.
    pub fn to_request(&self, config: &Config) -> Result<ConversionRequest> {
        let mode = match &self.threshold {
            Some(value) => value.parse::<ThresholdMode>()?,
            None => config.threshold,
        };
        Ok(ConversionRequest {
            input: self.input.clone(),
            output: self.output.clone(),
            mode,
            format: self.format.unwrap_or(config.format),
            show_progress: config.show_progress && !self.quiet,
        })
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let config = Config::load();
    let request = cli.to_request(&config)?;

    eprintln!(
        "{} {} -> {} ({}, threshold {})",
        "Converting".cyan().bold(),
        request.input.display(),
        request.output.display(),
        request.format,
        request.mode
    );

    let report = ConversionPipeline::new(request).run()?;

    eprintln!("  {} Wrote {}", "✓".green(), cli.output.display());
    if report.distinct_words < report.declared_words {
        eprintln!(
            "  {} {} duplicate word(s) overwritten",
            "!".yellow(),
            report.declared_words - report.distinct_words
        );
    }
    println!("{}", report_table(&report));
    Ok(())
}

fn report_table(report: &ConversionReport) -> String {
    let mut stats = vec![
        stats_row("Declared Words", report.declared_words),
        stats_row("Distinct Words", report.distinct_words),
        stats_row("Dimension", report.dim),
        stats_row("Threshold", report.mode),
        stats_row("Format", report.format),
    ];
    if let (Some(bits), Some(size), Some(row)) =
        (report.bit_width, report.codebook_size, report.row_bytes)
    {
        stats.push(stats_row("Bits per Code", bits));
        stats.push(stats_row("Codebook Size", size));
        stats.push(stats_row("Row Bytes", row));
    }
    stats.push(stats_row("Bytes Written", report.bytes_written));

    Table::new(stats)
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
        .to_string()
}

fn stats_row(metric: &str, value: impl ToString) -> StatsRow {
    StatsRow {
        metric: metric.to_string(),
        value: value.to_string(),
    }
}
