//! Search CLI.
//!
//! Loads an index directory and answers boolean queries, either one
//! `--query` or a line-per-query session on stdin. Results use a
//! tab-separated protocol on stdout:
//!
//! ```text
//! TOTAL\t<count>
//! DOC\t<doc_id>\t<title>\t<url>
//! ```
//!
//! In session mode each query line is echoed back as `QUERY\t<line>`
//! before its block, with a blank line after every block.

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use quarry::{QuarryError, SearchEngine, SearchPage};

/// Query the on-disk inverted index
#[derive(Parser, Debug)]
#[command(name = "search_cli")]
#[command(about = "Query the on-disk inverted index")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Args {
    /// Directory holding postings.bin, lexicon.bin, forward.bin
    #[arg(long)]
    index_dir: PathBuf,

    /// Evaluate one query and exit; omit to read queries from stdin
    #[arg(long)]
    query: Option<String>,

    /// Number of leading matches to skip
    #[arg(long, default_value_t = 0)]
    offset: usize,

    /// Maximum result rows per query
    #[arg(long, default_value_t = 50)]
    limit: usize,
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
    let engine = SearchEngine::open(&args.index_dir)?;

    if let Some(query) = &args.query {
        let page = engine.search(query, args.offset, args.limit)?;
        print_page(&page);
        return Ok(());
    }

    // Session mode: one query per stdin line until EOF. A parse or
    // evaluation error ends the session; the loaded index itself is
    // never affected by a bad query.
    for line in io::stdin().lock().lines() {
        let line = line.map_err(|e| QuarryError::io("stdin", e))?;
        if line.is_empty() {
            continue;
        }
        println!("QUERY\t{line}");
        let page = engine.search(&line, args.offset, args.limit)?;
        print_page(&page);
        println!();
    }
    Ok(())
}

fn print_page(page: &SearchPage) {
    println!("TOTAL\t{}", page.total);
    for row in &page.rows {
        println!("DOC\t{}\t{}\t{}", row.doc_id, row.title, row.url);
    }
}
