//! Semsift CLI - harness for exercising the extraction iterator against a
//! live Ollama instance.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use semsift_cli::output::{print_section, render_value};
use semsift_cli::RunConfig;
use semsift_domain::ExtractConfig;
use semsift_iterator::{ExtractionMode, SemanticIterator};
use semsift_llm::OllamaService;
use serde_json::json;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "semsift", version, about = "Run one semantic extraction and print the results")]
struct Cli {
    /// Path to a TOML run file
    config: PathBuf,

    /// Extraction mode to use
    #[arg(long, value_enum, default_value_t = ModeArg::Auto)]
    mode: ModeArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Bulk extraction only
    Fast,
    /// Per-item extraction only
    Slow,
    /// Bulk extraction with per-item fallback
    Auto,
}

// Deliberately not #[tokio::main]: the iterator owns its scheduling context
// and must be driven from a non-async context.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let run_config = RunConfig::load(&cli.config)?;

    print_section(
        "CONFIGURATION",
        &format!(
            "endpoint: {}\nmodel: {}\nextraction_mode: {:?}\nformat: {}",
            run_config.endpoint, run_config.model, cli.mode, run_config.format
        ),
    );

    let content = run_config.input_content()?;
    print_section("INPUT DATA", &render_value(&content));
    print_section("EXTRACTION PROMPT", &run_config.instruction);

    let service = OllamaService::new(&run_config.endpoint, &run_config.model);
    let builder = SemanticIterator::builder().service(service);
    let factory = match cli.mode {
        ModeArg::Fast => builder.mode(ExtractionMode::Fast).allow_fallback(false),
        ModeArg::Slow => builder.mode(ExtractionMode::Slow),
        ModeArg::Auto => builder
            .mode(ExtractionMode::Fast)
            .mode(ExtractionMode::Slow)
            .allow_fallback(true),
    }
    .build()?;

    let extract_config =
        ExtractConfig::new(&run_config.instruction).with_format(run_config.format);
    let mut iter = factory.iterate(content, extract_config)?;

    println!("\nEXTRACTED ITEMS:");
    let mut items = Vec::new();
    for item in iter.by_ref() {
        items.push(item.clone());
        println!("\nITEM {}:", items.len());
        println!("{}", "-".repeat(40));
        println!("{}", render_value(&item));
    }

    print_section("LLM RAW RESPONSE", iter.raw_response());
    if let Some(error) = iter.error() {
        print_section("EXTRACTION ERROR", error);
    }

    let summary = json!({
        "total_items": items.len(),
        "extraction_mode": iter.current_mode(),
        "attempted_modes": iter.attempted_modes(),
        "items": items,
    });
    print_section("SUMMARY", &render_value(&summary));

    Ok(())
}
