//! Normalize an HTML file and print its chunks as JSON lines.
//!
//! ```text
//! cargo run --example chunk_html -- page.html "Page Title" [target] [max] [level]
//! RUST_LOG=kodegen_tools_docchunk=debug cargo run --example chunk_html -- page.html
//! ```
//!
//! Without arguments a small built-in page is used.

use anyhow::{Context, Result};
use kodegen_tools_docchunk::{ChunkingConfig, NormalizerConfig, SourceDocument, process_document};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const SAMPLE_PAGE: &str = r#"<html><head><title>Sample</title></head><body>
<h1>Rate limits</h1>
<p>Requests are limited per project.</p>
<div class="section blockContent">
  <h2>Quotas</h2>
  <table>
    <tr><th>Resource</th><th>Limit</th></tr>
    <tr><td>Requests</td><td>100/s</td></tr>
    <tr><td rowspan="2">Payload</td><td>10 MB</td></tr>
    <tr><td>1 MB per field*</td></tr>
  </table>
  <p>* Fields above the limit are truncated.</p>
</div>
</body></html>"#;

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (name, html) = match args.first() {
        Some(path) => (
            path.clone(),
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))?,
        ),
        None => ("sample.html".to_string(), SAMPLE_PAGE.to_string()),
    };
    let title = args.get(1).cloned().unwrap_or_else(|| "Sample".to_string());

    let mut chunking = ChunkingConfig::new();
    if let Some(target) = args.get(2) {
        chunking = chunking.with_target_chunk_size(target.parse().context("Invalid target size")?);
    }
    if let Some(max) = args.get(3) {
        chunking = chunking.with_max_chunk_size(max.parse().context("Invalid max size")?);
    }
    if let Some(level) = args.get(4) {
        chunking = chunking.with_target_heading_level(level.parse().context("Invalid heading level")?);
    }

    let records = process_document(
        SourceDocument::new(name, title, html),
        &NormalizerConfig::default(),
        &chunking,
    )?;

    for record in &records {
        println!("{}", serde_json::to_string(record)?);
    }
    eprintln!("{} chunk(s)", records.len());
    Ok(())
}
