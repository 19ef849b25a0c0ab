//! CLI tool for binscout - looks up empty bins from an inventory spreadsheet
//!
//! Usage:
//!   binscout_cli <inventory.xlsx> AAAAA11201          # One lookup
//!   binscout_cli <inventory.csv> --json ID1 ID2       # JSON lines output
//!   binscout_cli <inventory.xlsx> --config lookup.toml < scans.txt
//!
//! With no IDs, every line on stdin is treated as one scan (keyboard-wedge
//! scanners type the code followed by Enter). Set `RUST_LOG=debug` for
//! per-lookup diagnostics on stderr.

#![allow(clippy::exit)]

use std::env;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use binscout::grouper::runs;
use binscout::{FileSource, LookupConfig, Outcome, PresentationSink, Session, TableStore};

const USAGE: &str =
    "Usage: binscout_cli <inventory.xlsx|csv|tsv> [--config lookup.toml] [--json] [ID ...]";

struct Args {
    inventory: String,
    config: Option<String>,
    json: bool,
    ids: Vec<String>,
}

fn parse_args() -> Option<Args> {
    let mut args = env::args().skip(1);
    let mut inventory = None;
    let mut config = None;
    let mut json = false;
    let mut ids = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => config = Some(args.next()?),
            "--json" => json = true,
            "-h" | "--help" => return None,
            _ if inventory.is_none() => inventory = Some(arg),
            _ => ids.push(arg),
        }
    }

    Some(Args {
        inventory: inventory?,
        config,
        json,
        ids,
    })
}

/// Prints outcomes to stdout, either as text or as JSON lines.
struct TerminalSink {
    json: bool,
    config: LookupConfig,
}

impl TerminalSink {
    fn render_text(&self, outcome: &Outcome) -> String {
        match outcome {
            Outcome::InputEmpty => "Please enter a valid ID.".to_string(),
            Outcome::NotFound { id } => format!("{id}: not found in inventory."),
            Outcome::NoEmptyBins { id } => format!(
                "{id}: no empty bins found matching the first {} characters.",
                self.config.prefix_len
            ),
            Outcome::Locations {
                id,
                found,
                locations,
            } => {
                let flat: Vec<String> = locations.iter().map(|l| l.location.clone()).collect();
                let mut out = if *found {
                    format!("{id}: {} empty bin(s)", flat.len())
                } else {
                    format!("{id}: not in inventory, {} empty bin(s) by prefix", flat.len())
                };
                for group in runs(&flat, self.config.group_key_len, self.config.palette_size()) {
                    let color = self
                        .config
                        .palette
                        .get(group.color)
                        .map_or("", String::as_str);
                    out.push_str(&format!(
                        "\n  [{color}] {}: {}",
                        group.key,
                        group.locations.join(", ")
                    ));
                }
                out
            }
            Outcome::LoadFailed { reason } => format!("Failed to load inventory: {reason}"),
        }
    }
}

impl PresentationSink for TerminalSink {
    fn present(&mut self, outcome: &Outcome) {
        let line = if self.json {
            serde_json::to_string(outcome).unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}"))
        } else {
            self.render_text(outcome)
        };
        let mut stdout = io::stdout().lock();
        // A closed pipe is not worth a panic.
        let _ = writeln!(stdout, "{line}");
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn main() {
    init_tracing();

    let Some(args) = parse_args() else {
        eprintln!("{USAGE}");
        std::process::exit(1);
    };

    let config = match &args.config {
        Some(path) => match LookupConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config {path}: {e}");
                std::process::exit(1);
            }
        },
        None => LookupConfig::default(),
    };

    let session = Session::new(config.clone(), Arc::new(TableStore::new()));
    let mut sink = TerminalSink {
        json: args.json,
        config,
    };

    let rows = session.startup(&FileSource::new(&args.inventory), &mut sink);
    if rows == 0 {
        std::process::exit(1);
    }

    if args.ids.is_empty() {
        for line in io::stdin().lock().lines() {
            session.on_scan(line, &mut sink);
        }
    } else {
        for id in &args.ids {
            session.submit(id, &mut sink);
        }
    }
}
