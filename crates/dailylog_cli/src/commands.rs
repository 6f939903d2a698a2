//! Subcommand definitions and execution.
//!
//! # Responsibility
//! - Parse user-typed strings through `EntryForm` before touching the store.
//! - Apply the default-date-to-today convenience for `add`.
//! - Render entries and aggregates as text tables or JSON.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use dailylog_core::{
    aggregate, chart_data, parse_date, Bucket, BucketMap, ChartData, Entry, EntryForm, EntryId,
    EntryListQuery, EntryService, Granularity, SqliteEntryRepository, DATE_FORMAT,
};
use rusqlite::Connection;
use std::io::Write;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Record metrics for one day
    Add {
        /// Day to record (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        #[command(flatten)]
        metrics: MetricArgs,
    },
    /// Overwrite every field of an existing entry
    Edit {
        id: EntryId,
        /// Day of the entry (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,
        #[command(flatten)]
        metrics: MetricArgs,
    },
    /// Permanently remove an entry
    Delete { id: EntryId },
    /// Print one entry
    Show { id: EntryId },
    /// List entries ordered by date
    List {
        /// First day to include (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// Last day to include (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },
    /// Print averaged metrics per period
    Charts {
        /// day | week | month | year; all four when omitted
        #[arg(short, long)]
        granularity: Option<String>,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

/// Raw metric values as typed on the command line.
#[derive(Debug, Clone, Args)]
pub struct MetricArgs {
    /// Hours slept
    #[arg(short, long)]
    pub sleep: String,
    #[arg(short, long)]
    pub calories: String,
    /// Liters of water
    #[arg(long)]
    pub hydration: String,
    /// Distance run
    #[arg(short, long)]
    pub mileage: String,
    #[arg(short, long)]
    pub notes: Option<String>,
}

impl MetricArgs {
    fn to_form(&self, date: String) -> EntryForm {
        EntryForm {
            date,
            sleep_hours: self.sleep.clone(),
            calories: self.calories.clone(),
            hydration: self.hydration.clone(),
            running_mileage: self.mileage.clone(),
            notes: self.notes.clone(),
        }
    }
}

/// Executes `command` against `conn`, writing user output to `out`.
///
/// `today` backs the default date of `add`.
pub fn run(
    command: &Command,
    conn: &mut Connection,
    today: NaiveDate,
    out: &mut impl Write,
) -> Result<()> {
    let repo = SqliteEntryRepository::try_new(conn).context("store is not ready")?;
    let mut service = EntryService::new(repo);

    match command {
        Command::Add { date, metrics } => {
            let date = date
                .clone()
                .unwrap_or_else(|| today.format(DATE_FORMAT).to_string());
            let input = metrics.to_form(date).parse()?;
            let entry = service.add(&input)?;
            writeln!(out, "Added entry {} for {}.", entry.id, entry.date)?;
        }
        Command::Edit { id, date, metrics } => {
            let input = metrics.to_form(date.clone()).parse()?;
            let entry = service.update(*id, &input)?;
            writeln!(out, "Updated entry {} ({}).", entry.id, entry.date)?;
        }
        Command::Delete { id } => {
            service.delete(*id)?;
            writeln!(out, "Deleted entry {id}.")?;
        }
        Command::Show { id } => {
            let entry = service.get(*id)?;
            write_entries(out, std::slice::from_ref(&entry))?;
        }
        Command::List { from, to } => {
            let query = EntryListQuery {
                from: from.as_deref().map(parse_date).transpose()?,
                to: to.as_deref().map(parse_date).transpose()?,
                ..EntryListQuery::default()
            };
            let entries = service.list(&query)?;
            if entries.is_empty() {
                writeln!(out, "No entries.")?;
            } else {
                write_entries(out, &entries)?;
            }
        }
        Command::Charts { granularity, json } => {
            let granularity = granularity
                .as_deref()
                .map(str::parse::<Granularity>)
                .transpose()?;
            let entries = service.list_ordered()?;
            match (granularity, *json) {
                (Some(granularity), true) => {
                    let series = aggregate(&entries, granularity);
                    writeln!(out, "{}", serde_json::to_string_pretty(&series)?)?;
                }
                (Some(granularity), false) => {
                    write_series(out, granularity, &aggregate(&entries, granularity))?;
                }
                (None, true) => {
                    let charts = chart_data(&entries);
                    writeln!(out, "{}", serde_json::to_string_pretty(&charts)?)?;
                }
                (None, false) => write_all_series(out, &chart_data(&entries))?,
            }
        }
    }

    Ok(())
}

fn write_entries(out: &mut impl Write, entries: &[Entry]) -> Result<()> {
    writeln!(
        out,
        "{:<36}  {:<10}  {:>6}  {:>8}  {:>9}  {:>7}  NOTES",
        "ID", "DATE", "SLEEP", "CALORIES", "HYDRATION", "MILEAGE"
    )?;
    for entry in entries {
        writeln!(
            out,
            "{:<36}  {:<10}  {:>6.2}  {:>8}  {:>9.2}  {:>7.2}  {}",
            entry.id,
            entry.date.format(DATE_FORMAT),
            entry.sleep_hours,
            entry.calories,
            entry.hydration,
            entry.running_mileage,
            entry.notes.as_deref().unwrap_or("")
        )?;
    }
    Ok(())
}

fn write_all_series(out: &mut impl Write, charts: &ChartData) -> Result<()> {
    for (index, granularity) in Granularity::ALL.into_iter().enumerate() {
        if index > 0 {
            writeln!(out)?;
        }
        write_series(out, granularity, charts.series(granularity))?;
    }
    Ok(())
}

fn write_series(
    out: &mut impl Write,
    granularity: Granularity,
    series: &BucketMap,
) -> Result<()> {
    writeln!(out, "[{granularity}]")?;
    if series.is_empty() {
        writeln!(out, "No entries.")?;
        return Ok(());
    }
    writeln!(
        out,
        "{:<10}  {:>5}  {:>6}  {:>8}  {:>9}  {:>7}",
        "PERIOD", "COUNT", "SLEEP", "CALORIES", "HYDRATION", "MILEAGE"
    )?;
    for (key, bucket) in series {
        write_bucket(out, key, bucket)?;
    }
    Ok(())
}

fn write_bucket(out: &mut impl Write, key: &str, bucket: &Bucket) -> Result<()> {
    writeln!(
        out,
        "{:<10}  {:>5}  {:>6.2}  {:>8.1}  {:>9.2}  {:>7.2}",
        key,
        bucket.count,
        bucket.avg_sleep_hours,
        bucket.avg_calories,
        bucket.avg_hydration,
        bucket.avg_running_mileage
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{run, Command, MetricArgs};
    use chrono::NaiveDate;
    use dailylog_core::db::open_db_in_memory;
    use dailylog_core::{FormError, InvalidGranularity, RepoError};
    use rusqlite::Connection;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 17).unwrap()
    }

    fn metrics(sleep: &str, calories: &str) -> MetricArgs {
        MetricArgs {
            sleep: sleep.to_string(),
            calories: calories.to_string(),
            hydration: "2.0".to_string(),
            mileage: "3.0".to_string(),
            notes: None,
        }
    }

    fn exec(conn: &mut Connection, command: Command) -> anyhow::Result<String> {
        let mut out = Vec::new();
        run(&command, conn, today(), &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn add_defaults_to_today_and_list_shows_entry() {
        let mut conn = open_db_in_memory().unwrap();
        let added = exec(
            &mut conn,
            Command::Add {
                date: None,
                metrics: metrics("7.5", "2100"),
            },
        )
        .unwrap();
        assert!(added.contains("for 2024-03-17"));

        let listed = exec(&mut conn, Command::List { from: None, to: None }).unwrap();
        assert!(listed.contains("2024-03-17"));
        assert!(listed.contains("2100"));
    }

    #[test]
    fn add_for_taken_date_surfaces_duplicate_date() {
        let mut conn = open_db_in_memory().unwrap();
        let add = || Command::Add {
            date: Some("2024-03-01".to_string()),
            metrics: metrics("7", "2000"),
        };
        exec(&mut conn, add()).unwrap();

        let err = exec(&mut conn, add()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RepoError>(),
            Some(RepoError::DuplicateDate(_))
        ));
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn malformed_input_is_rejected_before_the_store() {
        let mut conn = open_db_in_memory().unwrap();
        let err = exec(
            &mut conn,
            Command::Add {
                date: Some("2024-3-1".to_string()),
                metrics: metrics("7", "2000"),
            },
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FormError>(),
            Some(FormError::InvalidDate(_))
        ));

        let listed = exec(&mut conn, Command::List { from: None, to: None }).unwrap();
        assert_eq!(listed.trim(), "No entries.");
    }

    #[test]
    fn charts_rejects_unknown_granularity() {
        let mut conn = open_db_in_memory().unwrap();
        let err = exec(
            &mut conn,
            Command::Charts {
                granularity: Some("decade".to_string()),
                json: false,
            },
        )
        .unwrap_err();
        assert!(err.downcast_ref::<InvalidGranularity>().is_some());
    }

    #[test]
    fn charts_json_contains_monthly_average() {
        let mut conn = open_db_in_memory().unwrap();
        for (day, sleep) in [("2024-03-01", "6"), ("2024-03-15", "8")] {
            exec(
                &mut conn,
                Command::Add {
                    date: Some(day.to_string()),
                    metrics: metrics(sleep, "2000"),
                },
            )
            .unwrap();
        }

        let output = exec(
            &mut conn,
            Command::Charts {
                granularity: None,
                json: true,
            },
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["monthly"]["2024-03"]["count"], 2);
        assert_eq!(value["monthly"]["2024-03"]["avg_sleep_hours"], 7.0);

        let table = exec(
            &mut conn,
            Command::Charts {
                granularity: Some("month".to_string()),
                json: false,
            },
        )
        .unwrap();
        assert!(table.starts_with("[month]"));
        assert!(table.contains("2024-03"));
    }
}
