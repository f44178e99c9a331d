//! Index builder CLI.
//!
//! Consumes the pipeline's pre-stemmed corpus and raw-text TSV and
//! writes a three-file inverted index. Progress logging goes to stderr
//! under `RUST_LOG`; the stats summary on stdout is `key=value` lines.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use quarry::IndexBuilder;

/// Build the on-disk inverted index from a crawled corpus
#[derive(Parser, Debug)]
#[command(name = "index_builder")]
#[command(about = "Build the on-disk inverted index from a crawled corpus")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Args {
    /// Pre-stemmed corpus: one `doc_id<TAB>token token ...` line per document
    stemmed: PathBuf,

    /// Raw crawl TSV: `doc_id<TAB>source<TAB>url<TAB>title<TAB>text`
    raw_text: PathBuf,

    /// Output directory for postings.bin, lexicon.bin, forward.bin
    index_dir: PathBuf,

    /// Term hash table capacity; rounded up to a power of two, floor 1024
    hash_capacity: Option<usize>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(args: Args) -> quarry::Result<()> {
    let mut builder = match args.hash_capacity {
        Some(capacity) => IndexBuilder::with_capacity(capacity),
        None => IndexBuilder::new(),
    };

    builder.index_stemmed_file(&args.stemmed)?;
    builder.load_metadata_tsv(&args.raw_text)?;
    let stats = builder.commit(&args.index_dir)?;

    println!("Index builder finished");
    println!("documents_indexed={}", stats.documents_indexed);
    println!("tokens_seen={}", stats.tokens_seen);
    println!("unique_terms={}", stats.unique_terms);
    println!("total_postings={}", stats.total_postings);
    println!("docs_with_meta={}", stats.docs_with_meta);
    Ok(())
}
