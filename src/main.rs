//! highlight-anchor
//!
//! Create and restore text anchors against (X)HTML files from the command
//! line.
//!
//! ```text
//! highlight-anchor create <document.xhtml> <start> <end>
//! highlight-anchor restore <document.xhtml> <descriptor.json>
//! ```

use std::{env, fs, path::Path, process};

use anyhow::{bail, Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use highlight_anchor::{AnchorConfig, AnchorDescriptor, Anchoring, Document, TextRange};

const USAGE: &str = "usage:
  highlight-anchor create <document> <start> <end>
  highlight-anchor restore <document> <descriptor.json>";

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "highlight_anchor=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    if let Err(e) = run(&args) {
        eprintln!("error: {:#}", e);
        process::exit(1);
    }
}

fn run(args: &[String]) -> Result<()> {
    let config = AnchorConfig::from_env().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config from env: {}, using defaults", e);
        AnchorConfig::default()
    });
    let anchoring = Anchoring::new(config);

    match args {
        [cmd, doc, start, end] if cmd == "create" => {
            let start: usize = start
                .parse()
                .with_context(|| format!("invalid start offset {:?}", start))?;
            let end: usize = end
                .parse()
                .with_context(|| format!("invalid end offset {:?}", end))?;
            create(&anchoring, Path::new(doc), start, end)
        }
        [cmd, doc, descriptor] if cmd == "restore" => {
            restore(&anchoring, Path::new(doc), Path::new(descriptor))
        }
        _ => bail!("{}", USAGE),
    }
}

fn load_document(path: &Path) -> Result<Document> {
    Document::parse_file(path).with_context(|| format!("failed to load {}", path.display()))
}

fn create(anchoring: &Anchoring, path: &Path, start: usize, end: usize) -> Result<()> {
    let doc = load_document(path)?;
    let range = TextRange::from_offsets(&doc, start, end).context("invalid selection")?;
    let descriptor = anchoring
        .create_anchor(&doc, &range)
        .context("failed to create anchor")?;
    println!("{}", serde_json::to_string_pretty(&descriptor)?);
    Ok(())
}

fn restore(anchoring: &Anchoring, path: &Path, descriptor_path: &Path) -> Result<()> {
    let doc = load_document(path)?;
    let json = fs::read_to_string(descriptor_path)
        .with_context(|| format!("failed to read {}", descriptor_path.display()))?;
    let descriptor = AnchorDescriptor::from_json(&json).context("invalid descriptor")?;

    let resolution = anchoring.resolve(&doc, &descriptor);
    let (Some(range), Some(strategy)) = (resolution.range, resolution.strategy) else {
        for attempt in &resolution.attempts {
            tracing::info!(strategy = %attempt.strategy, outcome = ?attempt.outcome, "Attempt");
        }
        bail!("anchor not found");
    };

    match range.offsets(&doc) {
        Some((start, end)) => println!("{}\t{}\t{}\t{}", strategy, start, end, range.text(&doc)),
        None => println!("{}\t-\t-\t{}", strategy, range.text(&doc)),
    }
    Ok(())
}
