use std::io::Read;

use anyhow::Context;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use slop_detector::{analyze, redact, AnalysisResult, DEFAULT_THRESHOLD};

#[derive(Parser)]
#[command(
    name = "slop-detector",
    about = "Score prose for machine-generated slop patterns",
    version
)]
struct Cli {
    /// File paths to analyze (reads stdin if none provided)
    files: Vec<String>,

    /// Score threshold for the slop verdict
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: i32,

    /// Emit the full analysis as pretty-printed JSON
    #[arg(long)]
    json: bool,

    /// Print the text with matched phrasing replaced by filler
    #[arg(long)]
    redact: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.files.is_empty() {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("failed to read stdin")?;
        report(&input, &cli)?;
    } else {
        for path in &cli.files {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {path}"))?;
            report(&text, &cli)?;
        }
    }
    Ok(())
}

fn report(text: &str, cli: &Cli) -> anyhow::Result<()> {
    if cli.redact {
        println!("{}", redact(text, cli.threshold));
        return Ok(());
    }

    let analysis = analyze(text);
    debug!(
        score = analysis.score,
        band = %analysis.band(),
        chars = text.len(),
        "analyzed input"
    );

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        render(&analysis, cli.threshold);
    }
    Ok(())
}

fn render(analysis: &AnalysisResult, threshold: i32) {
    println!("score:      {}", analysis.score);
    println!("confidence: {}", analysis.band());
    println!(
        "slop at {threshold}: {}",
        if analysis.exceeds(threshold) { "yes" } else { "no" }
    );
    if analysis.is_clean() {
        println!("no slop patterns detected");
        return;
    }
    for hit in &analysis.hits {
        println!("  {:<28} x{:<3} {:+} pts", hit.name, hit.count, hit.points);
    }
    if !analysis.buzzwords_found.is_empty() {
        println!("buzzwords:  {}", analysis.buzzwords_found.join(", "));
    }
}
