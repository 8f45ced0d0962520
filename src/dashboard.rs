//! Dashboard overview metrics computed from the full table

use serde::Serialize;
use std::collections::HashMap;

use crate::records::{AgeBucket, TimeOfDay};
use crate::search::Summary;
use crate::store::Table;

/// A category label and how many rows carry it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
    /// Share of the counted rows, in percent
    pub percentage: f64,
}

/// Headline numbers and distributions for the landing page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub total_stops: usize,
    pub total_arrests: i64,
    pub searches_conducted: i64,
    pub drug_related_stops: i64,
    pub stops_by_country: Vec<CategoryCount>,
    pub gender_distribution: Vec<CategoryCount>,
    pub stop_outcomes: Vec<CategoryCount>,
    pub age_distribution: Vec<CategoryCount>,
    pub time_of_day: Vec<CategoryCount>,
}

impl Overview {
    pub fn from_table(table: &Table) -> Self {
        let summary = Summary::from_table(table);

        let ages = table
            .column_values("driver_age")
            .map(|values| {
                values
                    .filter_map(|v| v.as_i64())
                    .map(|age| AgeBucket::from_age(age).label().to_string())
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        let age_labels = AgeBucket::all().iter().map(|b| b.label());

        let periods = table
            .column_values("stop_time")
            .map(|values| {
                values
                    .filter_map(|v| v.hour())
                    .map(|hour| TimeOfDay::from_hour(hour).label().to_string())
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        let period_labels = TimeOfDay::all().iter().map(|p| p.label());

        Self {
            total_stops: summary.total,
            total_arrests: summary.arrests,
            searches_conducted: summary.searches,
            drug_related_stops: summary.drug_stops,
            stops_by_country: value_counts(text_column(table, "country_name")),
            gender_distribution: value_counts(text_column(table, "driver_gender")),
            stop_outcomes: value_counts(text_column(table, "stop_outcome")),
            age_distribution: fixed_counts(age_labels, &ages),
            time_of_day: fixed_counts(period_labels, &periods),
        }
    }
}

/// Non-null cells of a column rendered as text
fn text_column(table: &Table, column: &str) -> Vec<String> {
    table
        .column_values(column)
        .map(|values| {
            values
                .filter(|v| !v.is_null())
                .map(|v| v.to_string())
                .collect()
        })
        .unwrap_or_default()
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// Counts per distinct label, largest first; ties keep first-appearance order
pub fn value_counts(labels: Vec<String>) -> Vec<CategoryCount> {
    let total = labels.len();
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();

    for label in labels {
        let count = counts.entry(label.clone()).or_insert(0);
        if *count == 0 {
            order.push(label);
        }
        *count += 1;
    }

    let mut result: Vec<CategoryCount> = order
        .into_iter()
        .map(|label| {
            let count = counts.get(&label).copied().unwrap_or(0);
            CategoryCount {
                percentage: percentage(count, total),
                label,
                count,
            }
        })
        .collect();

    // Stable sort keeps first appearance among equal counts
    result.sort_by(|a, b| b.count.cmp(&a.count));
    result
}

/// Counts for a fixed, ordered set of labels (zero counts included)
fn fixed_counts<'a, I>(all_labels: I, labels: &[String]) -> Vec<CategoryCount>
where
    I: Iterator<Item = &'a str>,
{
    let total = labels.len();
    all_labels
        .map(|label| {
            let count = labels.iter().filter(|l| l.as_str() == label).count();
            CategoryCount {
                label: label.to_string(),
                count,
                percentage: percentage(count, total),
            }
        })
        .collect()
}
