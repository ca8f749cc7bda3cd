//! taxmap
//!
//! Maps codes recognized on financial statement pages to the cell ids of a
//! tax preparation template and writes them as `cell_id,value` CSV.

mod output;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use mapping_engine::{parse_recognizer_reply, PageInput, Pipeline, PipelineConfig};
use output::{default_file_name, write_report_file};
use shared_pdf::{
    parse_page_selection, LayoutTextSource, PdfLayoutText, PdftocairoRasterizer, Rasterizer,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "taxmap")]
#[command(
    version,
    about = "Map financial statement codes to tax preparation cells"
)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the configured mapping directory
    #[arg(long, global = true)]
    mapping_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the mapping dictionaries available
    Mappings,

    /// Print a mapping table as JSON
    ExportJson {
        dictionary: String,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render PDF pages to PNG images for recognition
    Render {
        pdf: PathBuf,
        /// Pages to render, e.g. "1-3,5"; every page when omitted
        #[arg(short, long)]
        pages: Option<String>,
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
        /// Overrides the configured resolution
        #[arg(long)]
        dpi: Option<u32>,
    },

    /// Normalize, merge and map recognizer replies, one file per page
    Process {
        /// Recognizer reply files, in page order
        #[arg(required = true)]
        replies: Vec<PathBuf>,
        /// Mapping dictionary; defaults to the configured one
        #[arg(short, long)]
        dictionary: Option<String>,
        /// Source PDF, read for parenthetical sign evidence
        #[arg(long)]
        pdf: Option<PathBuf>,
        /// Page numbers of the replies, e.g. "2-4"; 1.. when omitted
        #[arg(short, long)]
        pages: Option<String>,
        /// Output CSV path
        #[arg(short, long, conflicts_with = "output_dir")]
        output: Option<PathBuf>,
        /// Directory for a timestamped output CSV
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
        /// Print the full report as JSON on stdout
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // stdout carries command output, logs go to stderr
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    if let Some(dir) = args.mapping_dir {
        config.mapping_dir = dir;
    }

    match args.command {
        Command::Mappings => list_mappings(&config),
        Command::ExportJson { dictionary, output } => {
            export_json(&config, &dictionary, output.as_deref())
        }
        Command::Render {
            pdf,
            pages,
            out_dir,
            dpi,
        } => render(&config, &pdf, pages.as_deref(), out_dir, dpi),
        Command::Process {
            replies,
            dictionary,
            pdf,
            pages,
            output,
            output_dir,
            json,
        } => {
            let dictionary = dictionary.unwrap_or_else(|| config.default_dictionary.clone());
            let inputs = read_pages(&replies, pdf.as_deref(), pages.as_deref())?;
            let pipeline = Pipeline::from_config(&config)?;
            let report = pipeline.process_pages(&inputs, &dictionary)?;

            for warning in &report.warnings {
                tracing::warn!("{}", warning);
            }
            let path = output.unwrap_or_else(|| {
                output_dir.join(default_file_name(
                    &dictionary,
                    chrono::Local::now().naive_local(),
                ))
            });
            write_report_file(&report, &path)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", path.display());
            }
            Ok(())
        }
    }
}

fn list_mappings(config: &PipelineConfig) -> anyhow::Result<()> {
    let available = config.table_loader().list_available()?;
    if available.is_empty() {
        println!("No mappings found in {}", config.mapping_dir.display());
        return Ok(());
    }
    for info in available {
        if info.description.is_empty() {
            println!("{}", info.name);
        } else {
            println!("{}\t{}", info.name, info.description);
        }
    }
    Ok(())
}

fn export_json(
    config: &PipelineConfig,
    dictionary: &str,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let table = config.table_loader().load(dictionary)?;
    let json = table.to_json_pretty()?;
    match output {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{}", json),
    }
    Ok(())
}

fn render(
    config: &PipelineConfig,
    pdf: &Path,
    pages: Option<&str>,
    out_dir: PathBuf,
    dpi: Option<u32>,
) -> anyhow::Result<()> {
    let pages = pages.map(parse_page_selection).transpose()?;
    let rasterizer =
        PdftocairoRasterizer::new(out_dir).with_dpi(dpi.unwrap_or(config.rasterizer.dpi));
    for image in rasterizer.render(pdf, pages.as_deref())? {
        println!("{}", image.display());
    }
    Ok(())
}

/// Pair each reply file with its page number and, given a PDF, its layout text
fn read_pages(
    replies: &[PathBuf],
    pdf: Option<&Path>,
    pages: Option<&str>,
) -> anyhow::Result<Vec<PageInput>> {
    let numbers: Vec<u32> = match pages {
        Some(selection) => parse_page_selection(selection)?,
        None => (1..=replies.len() as u32).collect(),
    };
    if numbers.len() != replies.len() {
        bail!(
            "{} reply files given for {} selected pages",
            replies.len(),
            numbers.len()
        );
    }

    let layout = PdfLayoutText::new();
    let mut inputs = Vec::with_capacity(replies.len());
    for (path, page_number) in replies.iter().zip(numbers) {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let raw = parse_recognizer_reply(&content)
            .with_context(|| format!("Bad recognizer reply in {}", path.display()))?;

        let mut input = PageInput::new(page_number, raw);
        if let Some(pdf) = pdf {
            input = input.with_layout_text(layout.extract_text(pdf, page_number));
        }
        inputs.push(input);
    }
    Ok(inputs)
}
