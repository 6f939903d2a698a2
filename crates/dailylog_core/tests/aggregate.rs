use chrono::NaiveDate;
use dailylog_core::{
    aggregate, aggregate_named, chart_data, Entry, EntryInput, Granularity, InvalidGranularity,
};

fn entry(day: &str, sleep_hours: f64, calories: i64) -> Entry {
    entry_with(day, sleep_hours, calories, 2.0, 3.0)
}

fn entry_with(
    day: &str,
    sleep_hours: f64,
    calories: i64,
    hydration: f64,
    running_mileage: f64,
) -> Entry {
    Entry::new(EntryInput {
        date: NaiveDate::parse_from_str(day, "%Y-%m-%d").unwrap(),
        sleep_hours,
        calories,
        hydration,
        running_mileage,
        notes: None,
    })
    .unwrap()
}

#[test]
fn empty_input_yields_empty_mapping_for_every_granularity() {
    for granularity in Granularity::ALL {
        assert!(aggregate(&[], granularity).is_empty(), "{granularity}");
    }
}

#[test]
fn duplicate_dates_are_averaged_into_one_day_bucket() {
    let entries = vec![entry("2024-03-01", 6.0, 2000), entry("2024-03-01", 8.0, 2200)];

    let buckets = aggregate(&entries, Granularity::Day);
    assert_eq!(buckets.len(), 1);
    let bucket = buckets["2024-03-01"];
    assert_eq!(bucket.avg_sleep_hours, 7.0);
    assert_eq!(bucket.avg_calories, 2100.0);
    assert_eq!(bucket.count, 2);
}

#[test]
fn month_groups_entries_of_the_same_calendar_month() {
    let entries = vec![entry("2024-03-01", 6.0, 2000), entry("2024-03-15", 7.0, 2400)];

    let buckets = aggregate(&entries, Granularity::Month);
    assert_eq!(buckets.keys().collect::<Vec<_>>(), vec!["2024-03"]);
    assert_eq!(buckets["2024-03"].count, 2);
    assert_eq!(buckets["2024-03"].avg_calories, 2200.0);
}

#[test]
fn every_metric_is_averaged_per_bucket() {
    let entries = vec![
        entry_with("2024-01-01", 6.0, 1800, 1.5, 0.0),
        entry_with("2024-06-30", 8.0, 2400, 2.5, 6.0),
        entry_with("2024-12-31", 7.0, 2100, 3.5, 3.0),
    ];

    let yearly = aggregate(&entries, Granularity::Year);
    let bucket = yearly["2024"];
    assert_eq!(bucket.count, 3);
    assert_eq!(bucket.avg_sleep_hours, 7.0);
    assert_eq!(bucket.avg_calories, 2100.0);
    assert_eq!(bucket.avg_hydration, 2.5);
    assert_eq!(bucket.avg_running_mileage, 3.0);
}

#[test]
fn calories_average_keeps_fractional_part() {
    let entries = vec![entry("2024-03-01", 7.0, 2000), entry("2024-03-02", 7.0, 2001)];
    let buckets = aggregate(&entries, Granularity::Year);
    assert_eq!(buckets["2024"].avg_calories, 2000.5);
}

#[test]
fn week_buckets_split_at_year_boundary() {
    let entries = vec![
        entry("2024-12-29", 6.0, 2000),
        entry("2024-12-31", 8.0, 2000),
        entry("2025-01-01", 7.0, 2000),
        entry("2025-01-04", 9.0, 2000),
        entry("2025-01-05", 5.0, 2000),
    ];

    let weekly = aggregate(&entries, Granularity::Week);
    let keys: Vec<_> = weekly.keys().cloned().collect();
    assert_eq!(keys, vec!["2024-W52", "2025-W00", "2025-W01"]);
    assert_eq!(weekly["2024-W52"].count, 2);
    assert_eq!(weekly["2024-W52"].avg_sleep_hours, 7.0);
    assert_eq!(weekly["2025-W00"].count, 2);
    assert_eq!(weekly["2025-W00"].avg_sleep_hours, 8.0);
    assert_eq!(weekly["2025-W01"].count, 1);
}

#[test]
fn input_order_does_not_change_result() {
    let forward = vec![
        entry("2024-03-01", 6.0, 2000),
        entry("2024-04-02", 7.0, 2100),
        entry("2024-04-20", 9.0, 2500),
    ];
    let mut reversed = forward.clone();
    reversed.reverse();

    for granularity in Granularity::ALL {
        assert_eq!(
            aggregate(&forward, granularity),
            aggregate(&reversed, granularity)
        );
    }
}

#[test]
fn aggregation_leaves_inputs_untouched() {
    let entries = vec![entry("2024-03-01", 6.0, 2000), entry("2024-03-02", 8.0, 2200)];
    let snapshot = entries.clone();

    let _ = chart_data(&entries);
    assert_eq!(entries, snapshot);
}

#[test]
fn named_granularity_rejects_decade() {
    let entries = vec![entry("2024-03-01", 6.0, 2000)];

    let err = aggregate_named(&entries, "decade").unwrap_err();
    assert_eq!(err, InvalidGranularity("decade".to_string()));
    assert!(err.to_string().contains("decade"));

    let ok = aggregate_named(&entries, "month").unwrap();
    assert_eq!(ok["2024-03"].count, 1);
}

#[test]
fn chart_data_builds_all_four_series() {
    let entries = vec![
        entry("2024-03-01", 6.0, 2000),
        entry("2024-03-15", 8.0, 2200),
        entry("2025-02-01", 7.0, 1900),
    ];

    let charts = chart_data(&entries);
    assert_eq!(charts.daily.len(), 3);
    assert_eq!(charts.monthly.len(), 2);
    assert_eq!(charts.yearly.len(), 2);
    assert_eq!(charts.series(Granularity::Week), &charts.weekly);

    let json = serde_json::to_value(&charts).unwrap();
    assert_eq!(json["monthly"]["2024-03"]["count"], 2);
    assert_eq!(json["yearly"]["2025"]["avg_calories"], 1900.0);
}
