#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal front end for the vehicle theft dashboard.
//!
//! `report` prints every dashboard table for a filter given on the command
//! line, `options` lists the values a facet can be filtered on, and the
//! default `interactive` mode walks the user through the filters with
//! `dialoguer` menus.
//!
//! Uses `indicatif-log-bridge` (via [`theft_dashboard_cli_utils::init_logger`])
//! so the load spinner and log lines never fight for the terminal.

mod interactive;

use std::path::PathBuf;
use std::str::FromStr as _;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use theft_dashboard_cli_utils::{
    IndicatifProgress,
    render::{format_integer, render_table},
};
use theft_dashboard_dataset::{cache::DatasetCache, paths::resolve_data_path};
use theft_dashboard_filter_models::{DateRange, FilterState};
use theft_dashboard_incident_models::Facet;
use theft_dashboard_session::{DashboardReport, Session};

#[derive(Parser)]
#[command(name = "theft_dashboard", about = "Vehicle theft analytics dashboard")]
struct Cli {
    /// Source CSV (defaults to `THEFT_DASHBOARD_DATA`, then
    /// `stolen_vehicles_enhanced.csv`)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every dashboard table for the given filters
    Report {
        #[command(flatten)]
        filters: FilterArgs,

        /// Emit JSON instead of text tables
        #[arg(long)]
        json: bool,
    },
    /// List the values a facet can be filtered on
    Options {
        /// One of: make, vehicle_type, color, region, make_type
        #[arg(value_parser = parse_facet)]
        facet: Facet,
    },
    /// Pick filters from menus and browse the dashboard (default)
    Interactive,
}

#[derive(Args, Default)]
struct FilterArgs {
    /// Keep only this make (repeatable)
    #[arg(long = "make")]
    makes: Vec<String>,

    /// Keep only this vehicle type (repeatable)
    #[arg(long = "vehicle-type")]
    vehicle_types: Vec<String>,

    /// Keep only this color (repeatable)
    #[arg(long = "color")]
    colors: Vec<String>,

    /// Keep only this region (repeatable)
    #[arg(long = "region")]
    regions: Vec<String>,

    /// Keep only this make classification (repeatable)
    #[arg(long = "make-type")]
    make_types: Vec<String>,

    /// First theft date included (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last theft date included (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,
}

impl FilterArgs {
    fn into_state(self) -> FilterState {
        let mut state = FilterState::default();
        state.set(Facet::Make, self.makes);
        state.set(Facet::VehicleType, self.vehicle_types);
        state.set(Facet::Color, self.colors);
        state.set(Facet::Region, self.regions);
        state.set(Facet::MakeType, self.make_types);
        if self.from.is_some() || self.to.is_some() {
            state.set_date_range(Some(DateRange::new(
                self.from.unwrap_or(NaiveDate::MIN),
                self.to.unwrap_or(NaiveDate::MAX),
            )));
        }
        state
    }
}

fn parse_facet(raw: &str) -> Result<Facet, String> {
    Facet::from_str(raw).map_err(|_| {
        let names: Vec<&str> = Facet::all().iter().map(AsRef::as_ref).collect();
        format!("unknown facet '{raw}' (expected one of: {})", names.join(", "))
    })
}

/// One-line description of the active filters.
fn describe_filters(filters: &FilterState) -> String {
    if filters.is_unconstrained() {
        return "Filters: none".to_owned();
    }

    let mut parts: Vec<String> = filters
        .active_facets()
        .map(|facet| {
            let values: Vec<&str> = filters.values(facet).iter().map(String::as_str).collect();
            format!("{} = {}", facet.label(), values.join(" | "))
        })
        .collect();
    if let Some(range) = filters.date_range() {
        parts.push(format!("Date = {range}"));
    }
    format!("Filters: {}", parts.join("; "))
}

/// Prints `report` as text tables, or as pretty JSON when `json` is set.
fn print_report(report: &DashboardReport, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("{}", describe_filters(&report.filters));
    let total = i64::try_from(report.filter_summary.total_records).unwrap_or(i64::MAX);
    println!("Total records: {}", format_integer(total));
    for table in report.tables() {
        println!();
        print!("{}", render_table(&table));
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = theft_dashboard_cli_utils::init_logger();
    let cli = Cli::parse();

    let path = resolve_data_path(cli.data);
    let progress = IndicatifProgress::rows_spinner(&multi, "Loading incidents");
    let mut session = Session::new(DatasetCache::new(path).with_progress(progress));

    // Fail before any prompt if the source is unusable.
    session
        .dataset()
        .inspect_err(|e| log::error!("Cannot load incidents: {e}"))?;

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Report { filters, json } => {
            session.set_filters(filters.into_state());
            print_report(&session.report()?, json)?;
        }
        Commands::Options { facet } => {
            for option in session.facet_options(facet)? {
                println!("{option}");
            }
        }
        Commands::Interactive => interactive::run(&mut session)?,
    }

    Ok(())
}
