mod lsdb;
mod report;
mod resolve;
mod topology;

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use lsdb::db::{self, Lsdb};
use report::Report;
use resolve::{DnsResolver, Resolve, StaticResolver};
use topology::{diff, graph, neighbors};

/// Convert a decoded OSPF lsadump into the topology JSON the lsdbmon web
/// front end consumes, optionally diffing adjacencies against a previous
/// dump.
#[derive(Parser)]
#[command(name = "lsdbmon")]
struct Cli {
    /// Current lsadump output file
    dump: PathBuf,

    /// Previous dump; enables adjacency diffing
    #[arg(long)]
    prev: Option<PathBuf>,

    /// Append diff lines to this file instead of embedding them in the JSON
    #[arg(long)]
    diff_log: Option<PathBuf>,

    /// Disable reverse-DNS lookups for display names
    #[arg(long)]
    no_lookup: bool,

    /// Write the JSON document here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    rt.block_on(run(cli))
}

async fn run(cli: Cli) -> Result<()> {
    let timestamp = chrono::Local::now().format("%Y/%m/%d %H:%M:%S").to_string();

    let lsdb = load_lsdb(&cli.dump)?;
    let diff_lines = match &cli.prev {
        Some(prev) => {
            let previous = load_lsdb(prev)?;
            let lines = diff::diff_neighbor_sets(
                &neighbors::neighbor_sets(&lsdb),
                &neighbors::neighbor_sets(&previous),
            );
            info!(changes = lines.len(), "computed adjacency diff");
            Some(lines)
        }
        None => None,
    };

    let resolver: Box<dyn Resolve> = if cli.no_lookup {
        Box::new(StaticResolver)
    } else {
        match DnsResolver::from_system_conf() {
            Ok(resolver) => Box::new(resolver),
            Err(err) => {
                warn!(%err, "system resolver unavailable, disabling reverse lookups");
                Box::new(StaticResolver)
            }
        }
    };
    let arpa_info = resolve::arpa_info(&lsdb, resolver.as_ref()).await;

    let diff_log = match (diff_lines, &cli.diff_log) {
        (Some(lines), Some(path)) => {
            append_diff_log(path, &timestamp, &lines)
                .with_context(|| format!("appending diff log to {}", path.display()))?;
            None
        }
        (lines, _) => lines,
    };

    let report = Report {
        timestamp,
        neighbor_info: neighbors::adjacency_model(&lsdb),
        graph_info: graph::graph_info(&lsdb),
        arpa_info,
        diff_log,
    };
    let json = report.to_json()?;
    match &cli.output {
        Some(path) => {
            fs::write(path, json + "\n").with_context(|| format!("writing {}", path.display()))?
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn load_lsdb(path: &Path) -> Result<Lsdb> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let (lsdb, stats) = db::build_from_lines(text.lines())
        .with_context(|| format!("parsing {}", path.display()))?;
    if stats.skipped > 0 || stats.duplicates > 0 {
        warn!(
            skipped = stats.skipped,
            duplicates = stats.duplicates,
            path = %path.display(),
            "dropped records while loading dump"
        );
    }
    info!(
        path = %path.display(),
        records = stats.records,
        routers = lsdb.router_count(),
        networks = lsdb.network_count(),
        "loaded LSDB"
    );
    Ok(lsdb)
}

fn append_diff_log(path: &Path, timestamp: &str, lines: &[String]) -> std::io::Result<()> {
    if lines.is_empty() {
        return Ok(());
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    for line in lines {
        writeln!(file, "{timestamp} {line}")?;
    }
    Ok(())
}
