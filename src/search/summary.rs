//! Aggregates over a filtered subset

use serde::Serialize;

use crate::store::Table;

/// Counts and rates for the rows currently shown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub arrests: i64,
    pub searches: i64,
    pub drug_stops: i64,
    /// Percentages; None when there are no rows
    pub arrest_rate: Option<f64>,
    pub search_rate: Option<f64>,
    pub drug_stop_rate: Option<f64>,
    /// None when no row carries an age
    pub average_age: Option<f64>,
}

impl Summary {
    pub fn from_table(table: &Table) -> Self {
        let total = table.len();
        let arrests = flag_sum(table, "is_arrested");
        let searches = flag_sum(table, "search_conducted");
        let drug_stops = flag_sum(table, "drugs_related_stop");

        let rate = |sum: i64| {
            if total == 0 {
                None
            } else {
                Some(sum as f64 / total as f64 * 100.0)
            }
        };

        let ages: Vec<f64> = table
            .column_values("driver_age")
            .map(|values| values.filter_map(|v| v.as_f64()).collect())
            .unwrap_or_default();
        let average_age = if ages.is_empty() {
            None
        } else {
            Some(ages.iter().sum::<f64>() / ages.len() as f64)
        };

        Self {
            total,
            arrests,
            searches,
            drug_stops,
            arrest_rate: rate(arrests),
            search_rate: rate(searches),
            drug_stop_rate: rate(drug_stops),
            average_age,
        }
    }
}

/// Sum of a 0/1 column; a missing column counts as zero
fn flag_sum(table: &Table, column: &str) -> i64 {
    table
        .column_values(column)
        .map(|values| values.filter_map(|v| v.as_i64()).sum())
        .unwrap_or(0)
}

/// Render a rate for display, "N/A" when undefined
pub fn format_rate(rate: Option<f64>) -> String {
    match rate {
        Some(r) => format!("{:.2}%", r),
        None => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::StopRecord;
    use crate::search::{Filter, Predicate};
    use crate::testing::{record, seed, temp_store};

    #[test]
    fn test_summary_counts_and_rates() {
        let (store, _dir) = temp_store();
        seed(
            &store,
            &[
                StopRecord { is_arrested: true, search_conducted: true, driver_age: Some(20), ..record() },
                StopRecord { drugs_related_stop: true, driver_age: Some(40), ..record() },
                StopRecord { driver_age: None, ..record() },
                record(),
            ],
        );
        let summary = Summary::from_table(&store.fetch_all().unwrap());

        assert_eq!(summary.total, 4);
        assert_eq!(summary.arrests, 1);
        assert_eq!(summary.searches, 1);
        assert_eq!(summary.drug_stops, 1);
        assert_eq!(summary.arrest_rate, Some(25.0));
        assert_eq!(summary.average_age, Some(30.0));
        assert_eq!(format_rate(summary.search_rate), "25.00%");
    }

    #[test]
    fn test_empty_subset_has_defined_rates() {
        let (store, _dir) = temp_store();
        seed(&store, &[record()]);
        let table = store.fetch_all().unwrap();

        let nothing = Filter::new()
            .and(Predicate::contains("country_name", "Atlantis"))
            .apply(&table)
            .unwrap();
        let summary = Summary::from_table(&nothing);

        assert_eq!(summary.total, 0);
        assert_eq!(summary.arrests, 0);
        assert_eq!(summary.arrest_rate, None);
        assert_eq!(summary.average_age, None);
        assert_eq!(format_rate(summary.arrest_rate), "N/A");
    }
}
