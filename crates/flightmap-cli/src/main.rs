// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use flightmap_core::html::render_html;
use flightmap_core::{
    prepare_store, CsvSource, Dashboard, DashboardError, FilterCriteria, MapConfig,
    MapRenderDescriptor, RasterIconProvider,
};
use log::{debug, info};
use simplelog::{ColorChoice, Config, LevelFilter, TerminalMode, TermLogger};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Airport table (CSV)
    #[arg(long, env = "FLIGHTMAP_AIRPORTS")]
    airports: PathBuf,

    /// Flight table (CSV)
    #[arg(long, env = "FLIGHTMAP_FLIGHTS")]
    flights: PathBuf,

    /// Map config (JSON). Defaults to the per-user config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the nearest airports of every flight
    Nearest,
    /// Render the map once for the given filters
    Render {
        /// Flight number substring
        #[arg(long)]
        flight: Option<String>,
        /// ICAO code substring
        #[arg(long)]
        airport: Option<String>,
        /// Radius around the first matching flight, in km
        #[arg(long)]
        radius: Option<f64>,
        #[arg(short, long, default_value = "flight_map.html")]
        output: PathBuf,
        /// Write the descriptor as JSON instead of HTML
        #[arg(long)]
        json: bool,
    },
    /// Read `flight;airport;radius` lines from stdin and re-render after each
    Shell {
        #[arg(short, long, default_value = "flight_map.html")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .context("Failed to initialise logging")?;

    let config = match &cli.config {
        Some(path) => MapConfig::load_from(path)?,
        None => MapConfig::load()?,
    };

    let source = CsvSource::new(&cli.airports, &cli.flights);
    let store = Arc::new(
        prepare_store(&source, config.nearest_count).context("Failed to load dashboard data")?,
    );
    let icons = Box::new(RasterIconProvider::with_icon_dir(config.icon_dir.clone()));
    info!(
        "Dashboard data ready — airports={} flights={}",
        store.airports().len(),
        store.flights().len()
    );

    match cli.command {
        Commands::Nearest => {
            for flight in store.flights() {
                println!("{}", flight.flight_number);
                for line in flight.nearest_summary.as_deref().unwrap_or("").lines() {
                    println!("    {}", line);
                }
            }
        }
        Commands::Render {
            flight,
            airport,
            radius,
            output,
            json,
        } => {
            let mut criteria = FilterCriteria::new();
            if let Some(f) = &flight {
                criteria = criteria.flight(f);
            }
            if let Some(a) = &airport {
                criteria = criteria.airport(a);
            }
            if let Some(r) = radius {
                criteria = criteria.radius_km(r);
            }

            let mut dashboard = Dashboard::new(store, icons, config)?;
            dashboard.apply(criteria)?;
            if json {
                let content = serde_json::to_string_pretty(dashboard.current())?;
                std::fs::write(&output, content)
                    .with_context(|| format!("Failed to write {}", output.display()))?;
            } else {
                write_html(&output, dashboard.current(), dashboard.config())?;
            }
            println!(
                "Wrote {} ({} markers)",
                output.display(),
                dashboard.current().markers.len()
            );
        }
        Commands::Shell { output } => {
            let mut dashboard = Dashboard::new(store, icons, config)?;
            write_html(&output, dashboard.current(), dashboard.config())?;
            println!("Map at {}. Enter flight;airport;radius (empty fields allowed).", output.display());

            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let line = line?;
                let mut parts = line.splitn(3, ';');
                let flight = parts.next().unwrap_or("");
                let airport = parts.next().unwrap_or("");
                let radius = parts.next().unwrap_or("");

                match dashboard.apply_inputs(flight, airport, radius) {
                    Ok(map) => {
                        println!(
                            "{} flights, {} airports, center ({:.4}, {:.4}){}",
                            map.flight_markers().count(),
                            map.airport_markers().count(),
                            map.center.lat,
                            map.center.lon,
                            if map.overlay.is_some() { ", radius shown" } else { "" }
                        );
                    }
                    Err(DashboardError::Filter(e)) => {
                        println!("{} (previous map kept)", e);
                        continue;
                    }
                    Err(e) => return Err(e.into()),
                }
                write_html(&output, dashboard.current(), dashboard.config())?;
                io::stdout().flush()?;
            }
        }
    }

    Ok(())
}

fn write_html(path: &Path, descriptor: &MapRenderDescriptor, config: &MapConfig) -> Result<()> {
    std::fs::write(path, render_html(descriptor, config))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    debug!(
        "Wrote map — path={} markers={}",
        path.display(),
        descriptor.markers.len()
    );
    Ok(())
}
