//! Menu-driven dashboard session.
//!
//! Each loop iteration shows the active filters and lets the user change
//! one of them, view the dashboard, or reload the source file. The session
//! recomputes every table on each "Show dashboard".

use chrono::NaiveDate;
use dialoguer::{Input, MultiSelect, Select};
use theft_dashboard_filter_models::DateRange;
use theft_dashboard_incident_models::Facet;
use theft_dashboard_session::Session;

/// Main menu entries.
#[derive(Clone, Copy)]
enum Action {
    ShowDashboard,
    Filter(Facet),
    SetDateRange,
    ClearDateRange,
    ResetFilters,
    Reload,
    Exit,
}

impl Action {
    const ALL: &[Self] = &[
        Self::ShowDashboard,
        Self::Filter(Facet::Make),
        Self::Filter(Facet::VehicleType),
        Self::Filter(Facet::Color),
        Self::Filter(Facet::Region),
        Self::Filter(Facet::MakeType),
        Self::SetDateRange,
        Self::ClearDateRange,
        Self::ResetFilters,
        Self::Reload,
        Self::Exit,
    ];

    #[must_use]
    const fn label(self) -> &'static str {
        match self {
            Self::ShowDashboard => "Show dashboard",
            Self::Filter(Facet::Make) => "Filter by make",
            Self::Filter(Facet::VehicleType) => "Filter by vehicle type",
            Self::Filter(Facet::Color) => "Filter by color",
            Self::Filter(Facet::Region) => "Filter by region",
            Self::Filter(Facet::MakeType) => "Filter by make type",
            Self::SetDateRange => "Set date range",
            Self::ClearDateRange => "Clear date range",
            Self::ResetFilters => "Reset all filters",
            Self::Reload => "Reload data",
            Self::Exit => "Exit",
        }
    }
}

/// Runs the interactive menu loop until the user exits.
///
/// # Errors
///
/// Returns an error if a prompt fails or the dataset cannot be (re)loaded.
pub fn run(session: &mut Session) -> Result<(), Box<dyn std::error::Error>> {
    let labels: Vec<&str> = Action::ALL.iter().map(|a| a.label()).collect();

    loop {
        println!();
        println!("{}", crate::describe_filters(session.filters()));

        let idx = Select::new()
            .with_prompt("Vehicle theft dashboard")
            .items(&labels)
            .default(0)
            .interact()?;

        match Action::ALL[idx] {
            Action::ShowDashboard => {
                if session.reload_if_changed()? {
                    println!("Source file changed; reloaded.");
                }
                crate::print_report(&session.report()?, false)?;
            }
            Action::Filter(facet) => pick_facet_values(session, facet)?,
            Action::SetDateRange => pick_date_range(session)?,
            Action::ClearDateRange => session.set_date_range(None),
            Action::ResetFilters => session.reset_filters(),
            Action::Reload => {
                let dataset = session.reload()?;
                println!(
                    "Reloaded {} incidents from {}.",
                    dataset.len(),
                    session.source_path().display()
                );
            }
            Action::Exit => {
                println!("Goodbye.");
                return Ok(());
            }
        }
    }
}

/// Multi-select over every value of `facet`. Selecting nothing removes the
/// constraint.
fn pick_facet_values(
    session: &mut Session,
    facet: Facet,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = session.facet_options(facet)?;
    let current = session.filters().values(facet);
    let defaults: Vec<bool> = options.iter().map(|o| current.contains(o)).collect();

    let chosen = MultiSelect::new()
        .with_prompt(format!(
            "{} (space to toggle, enter to confirm, none selected = all)",
            facet.label()
        ))
        .items(&options)
        .defaults(&defaults)
        .interact()?;

    if chosen.is_empty() {
        session.clear_facet(facet);
    } else {
        session.set_facet(facet, chosen.into_iter().map(|i| options[i].clone()));
    }
    Ok(())
}

/// Parses a `YYYY-MM-DD` answer; blank means "no bound".
fn parse_bound(raw: &str) -> Result<Option<NaiveDate>, chrono::ParseError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map(Some)
}

fn prompt_bound(prompt: &str) -> Result<Option<NaiveDate>, Box<dyn std::error::Error>> {
    loop {
        let raw: String = Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        match parse_bound(&raw) {
            Ok(date) => return Ok(date),
            Err(e) => println!("'{raw}' is not a YYYY-MM-DD date: {e}"),
        }
    }
}

/// Asks for an inclusive start and end date. Leaving both blank clears the
/// range.
fn pick_date_range(session: &mut Session) -> Result<(), Box<dyn std::error::Error>> {
    let dataset = session.dataset()?;
    let dates = dataset.records().iter().filter_map(|r| r.date_stolen);
    if let (Some(first), Some(last)) = (dates.clone().min(), dates.max()) {
        println!("Theft dates in the data run from {first} to {last}.");
    }

    let start = prompt_bound("From (YYYY-MM-DD, blank for no lower bound)")?;
    let end = prompt_bound("To (YYYY-MM-DD, blank for no upper bound)")?;

    let range = match (start, end) {
        (None, None) => None,
        (start, end) => Some(DateRange::new(
            start.unwrap_or(NaiveDate::MIN),
            end.unwrap_or(NaiveDate::MAX),
        )),
    };
    if let Some(range) = range
        && range.start > range.end
    {
        println!("Start is after end; no incidents will match.");
    }
    session.set_date_range(range);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_covers_every_facet() {
        for facet in Facet::all() {
            assert!(
                Action::ALL
                    .iter()
                    .any(|a| matches!(a, Action::Filter(f) if f == facet)),
                "{facet:?} missing from menu"
            );
        }
    }

    #[test]
    fn blank_bound_is_unbounded() {
        assert_eq!(parse_bound("  ").unwrap(), None);
        assert_eq!(
            parse_bound("2022-03-31").unwrap(),
            NaiveDate::from_ymd_opt(2022, 3, 31)
        );
        assert!(parse_bound("31/03/2022").is_err());
    }
}
