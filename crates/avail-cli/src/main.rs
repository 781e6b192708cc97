//! `avail` CLI — run availability queries and validate snapshot files.
//!
//! ## Usage
//!
//! ```sh
//! # Compute availability for a service over the next week
//! avail query -i snapshot.json --company acme --service svc-1 \
//!     --timezone America/Sao_Paulo --from 0 --to 6
//!
//! # Pin "now" for reproducible output
//! avail query -i snapshot.json --company acme --service svc-1 \
//!     --timezone America/Sao_Paulo --from 0 --to 0 --now 2026-03-02T12:00:00Z
//!
//! # Check every work range in a snapshot file
//! avail validate -i snapshot.json
//! ```

use std::collections::BTreeMap;
use std::process;

use anyhow::{bail, Context, Result};
use avail_engine::model::CompanySnapshot;
use avail_engine::query::{compute_availability, AvailabilityRequest};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Deserialize;

/// On-disk snapshot format: tenants keyed by company id.
#[derive(Debug, Deserialize)]
struct SnapshotFile {
    companies: BTreeMap<String, CompanySnapshot>,
}

#[derive(Parser)]
#[command(name = "avail", version, about = "Bookable availability engine CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute availability for one service and print the response JSON
    Query {
        /// Snapshot file to read
        #[arg(short, long)]
        input: String,
        /// Company (tenant) id within the snapshot
        #[arg(long)]
        company: String,
        /// Service id to compute availability for
        #[arg(long)]
        service: String,
        /// IANA timezone for date bucketing and time labels
        #[arg(long)]
        timezone: String,
        /// First day offset from today (inclusive)
        #[arg(long, default_value_t = 0)]
        from: i64,
        /// Last day offset from today (inclusive)
        #[arg(long, default_value_t = 6)]
        to: i64,
        /// Surface this client's own bookings as occupied slots
        #[arg(long)]
        client: Option<String>,
        /// Anchor instant (RFC 3339); defaults to the current instant
        #[arg(long)]
        now: Option<String>,
    },
    /// Validate every work range in a snapshot file
    Validate {
        /// Snapshot file to read
        #[arg(short, long)]
        input: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Query {
            input,
            company,
            service,
            timezone,
            from,
            to,
            client,
            now,
        } => {
            let file = read_snapshot(&input)?;
            let Some(snapshot) = file.companies.get(&company) else {
                bail!("Company '{}' not found in {}", company, input);
            };

            let now = parse_now(now.as_deref())?;
            let request = AvailabilityRequest {
                service_id: service,
                timezone,
                date_forward_start: from,
                date_forward_end: to,
                client_id: client,
            };

            let availability = compute_availability(&request, snapshot, now, None)
                .context("Failed to compute availability")?;
            println!("{}", serde_json::to_string_pretty(&availability)?);
        }
        Commands::Validate { input } => {
            let file = read_snapshot(&input)?;

            let mut invalid = 0usize;
            for (company, snapshot) in &file.companies {
                for range in &snapshot.work_ranges {
                    if let Err(err) = range.validate() {
                        invalid += 1;
                        eprintln!("{}: work range {}: {}", company, range.id, err);
                    }
                }
            }

            if invalid > 0 {
                eprintln!("{} invalid work range(s)", invalid);
                process::exit(1);
            }
            println!("All work ranges valid");
        }
    }

    Ok(())
}

fn read_snapshot(path: &str) -> Result<SnapshotFile> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse snapshot: {}", path))
}

fn parse_now(raw: Option<&str>) -> Result<DateTime<Utc>> {
    match raw {
        Some(s) => Ok(DateTime::parse_from_rfc3339(s)
            .with_context(|| format!("Invalid --now instant: {}", s))?
            .with_timezone(&Utc)),
        None => Ok(Utc::now()),
    }
}
