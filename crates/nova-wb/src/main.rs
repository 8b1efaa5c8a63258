//! nova-wb: request interception host
//!
//! Stands in for the embedded browser view's request hook. Builds the
//! filter engine once, installs it, then classifies every request target
//! it is handed (arguments, or one URL per line on stdin) and reports what
//! the view would do with it.

use anyhow::{Context, Result};
use clap::Parser;
use nova_filter::{Classification, CountingInterceptor, FilterConfig, FilterEngine, RequestInterceptor};
use std::io::{self, BufRead, BufWriter, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

// Use mimalloc as the global allocator for reduced memory fragmentation
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Classify request URLs against the ad/tracker filter list.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON filter config. Falls back to NOVA_FILTER_CONFIG, then the seed list.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Print request totals when done
    #[arg(short, long)]
    stats: bool,
    /// Request URLs. Read from stdin when none are given.
    urls: Vec<String>,
}

fn main() -> Result<()> {
    FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => FilterConfig::load(path)
            .with_context(|| format!("loading filter config {}", path.display()))?,
        None => FilterConfig::from_env().context("loading filter config from environment")?,
    };
    let list = config.build_list().context("building filter list")?;

    // Installed once, before any request is seen
    let interceptor = CountingInterceptor::new(FilterEngine::new(list)?);
    info!(
        "Interceptor installed with {} fragments",
        interceptor.inner().fragment_count()
    );

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    if cli.urls.is_empty() {
        for line in io::stdin().lock().lines() {
            let line = line.context("reading stdin")?;
            handle_request(&interceptor, line.trim_end_matches('\r'), &mut out)?;
        }
    } else {
        for url in &cli.urls {
            handle_request(&interceptor, url, &mut out)?;
        }
    }

    if cli.stats {
        let (total, blocked) = interceptor.stats().snapshot();
        writeln!(out, "TOTAL\t{}\tBLOCKED\t{}", total, blocked)?;
    }
    out.flush()?;

    Ok(())
}

/// What the browser view does with one outgoing request
fn handle_request(
    interceptor: &dyn RequestInterceptor,
    url: &str,
    out: &mut impl Write,
) -> Result<()> {
    match interceptor.intercept(&url) {
        Classification::Blocked(response) => {
            // Serve the substitute in place of the fetch
            writeln!(out, "BLOCKED\t{}\t{}", response.content_type(), url)?;
        }
        Classification::Allowed => {
            writeln!(out, "ALLOWED\t{}", url)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(urls: &[&str]) -> String {
        let interceptor = FilterEngine::seed();
        let mut out = Vec::new();
        for url in urls {
            handle_request(&interceptor, url, &mut out).unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_blocked_line() {
        assert_eq!(
            run(&["https://openx.net/"]),
            "BLOCKED\ttext/plain; charset=UTF-8\thttps://openx.net/\n"
        );
    }

    #[test]
    fn test_allowed_line() {
        assert_eq!(
            run(&["https://example.com/watch/episode-12"]),
            "ALLOWED\thttps://example.com/watch/episode-12\n"
        );
    }

    #[test]
    fn test_cli_parses_urls() {
        let cli = Cli::parse_from(["nova-wb", "--stats", "https://a.example/", "https://b.example/"]);
        assert!(cli.stats);
        assert!(cli.config.is_none());
        assert_eq!(cli.urls.len(), 2);
    }
}
