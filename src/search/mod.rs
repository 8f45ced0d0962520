//! Filter/Search Engine
//!
//! Filters run in memory over a [`Table`] that was already fetched from the
//! store. Changing a filter never re-queries; reload the table to pick up
//! new records.
//!
//! ```text
//! Table ──► Filter [Predicate AND Predicate AND ...] ──► Table ──► Summary
//! ```
//!
//! Three predicate kinds cover every page:
//!
//! - [`Predicate::Equals`]: exact match against a facet selection, where
//!   [`Selection::All`] disables the predicate
//! - [`Predicate::Contains`]: case-insensitive substring on a text column
//! - [`Predicate::Range`]: inclusive numeric range
//!
//! Null cells never satisfy a predicate.

mod presets;
mod summary;

pub use presets::{DriverSearch, IncidentSearch, VehicleSearch};
pub use summary::{format_rate, Summary};

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::store::{StoreError, StoreResult, Table, Value};

/// Facet option that selects every row
pub const ALL: &str = "All";

/// A facet dropdown choice
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Selection {
    #[default]
    All,
    Only(Value),
}

impl Selection {
    /// Read a dropdown choice; blank and "All" select everything
    pub fn parse(choice: Option<&str>) -> Self {
        match choice.map(str::trim) {
            None | Some("") | Some(ALL) => Selection::All,
            Some(value) => Selection::Only(Value::from(value)),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }
}

impl From<Value> for Selection {
    fn from(value: Value) -> Self {
        Selection::Only(value)
    }
}

impl From<&str> for Selection {
    fn from(value: &str) -> Self {
        Selection::Only(Value::from(value))
    }
}

impl From<String> for Selection {
    fn from(value: String) -> Self {
        Selection::Only(Value::from(value))
    }
}

impl From<bool> for Selection {
    fn from(value: bool) -> Self {
        Selection::Only(Value::from(value))
    }
}

/// A single row condition on one column
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Equals { column: String, value: Selection },
    Contains { column: String, needle: String },
    Range { column: String, min: f64, max: f64 },
}

impl Predicate {
    pub fn equals(column: impl Into<String>, value: impl Into<Selection>) -> Self {
        Predicate::Equals {
            column: column.into(),
            value: value.into(),
        }
    }

    pub fn contains(column: impl Into<String>, needle: impl Into<String>) -> Self {
        Predicate::Contains {
            column: column.into(),
            needle: needle.into(),
        }
    }

    pub fn range(column: impl Into<String>, min: f64, max: f64) -> Self {
        Predicate::Range {
            column: column.into(),
            min,
            max,
        }
    }

    pub fn column(&self) -> &str {
        match self {
            Predicate::Equals { column, .. }
            | Predicate::Contains { column, .. }
            | Predicate::Range { column, .. } => column,
        }
    }

    /// Whether a cell satisfies the predicate
    pub fn matches(&self, cell: &Value) -> bool {
        match self {
            Predicate::Equals {
                value: Selection::All,
                ..
            } => true,
            Predicate::Equals {
                value: Selection::Only(expected),
                ..
            } => cell.loosely_equals(expected),
            Predicate::Contains { needle, .. } => {
                !cell.is_null()
                    && cell
                        .to_string()
                        .to_lowercase()
                        .contains(&needle.to_lowercase())
            }
            Predicate::Range { min, max, .. } => cell
                .as_f64()
                .map(|v| *min <= v && v <= *max)
                .unwrap_or(false),
        }
    }
}

/// Predicates combined with AND
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    predicates: Vec<Predicate>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a predicate
    pub fn and(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn push(&mut self, predicate: Predicate) {
        self.predicates.push(predicate);
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Rows of `table` satisfying every predicate, in their original order
    pub fn apply(&self, table: &Table) -> StoreResult<Table> {
        let resolved = self
            .predicates
            .iter()
            .map(|p| Ok((column_index(table, p.column())?, p)))
            .collect::<StoreResult<Vec<_>>>()?;

        let filtered = table.retain_rows(|row| resolved.iter().all(|(idx, p)| p.matches(&row[*idx])));

        tracing::debug!(
            predicates = self.predicates.len(),
            before = table.len(),
            after = filtered.len(),
            "Filter applied"
        );
        Ok(filtered)
    }
}

fn column_index(table: &Table, column: &str) -> StoreResult<usize> {
    table
        .column_index(column)
        .ok_or_else(|| StoreError::Validation(format!("unknown column '{}'", column)))
}

/// Distinct non-null values of a column, in order of first appearance
pub fn distinct_values(table: &Table, column: &str) -> StoreResult<Vec<Value>> {
    let idx = column_index(table, column)?;

    let mut seen = HashSet::new();
    let mut values = Vec::new();
    for row in table.rows() {
        let value = &row[idx];
        if !value.is_null() && seen.insert(value.to_string()) {
            values.push(value.clone());
        }
    }
    Ok(values)
}

/// Dropdown options for a column: "All" followed by its distinct values
pub fn facet_options(table: &Table, column: &str) -> StoreResult<Vec<String>> {
    let mut options = vec![ALL.to_string()];
    options.extend(distinct_values(table, column)?.iter().map(Value::to_string));
    Ok(options)
}

/// Observed numeric bounds of a column, or None when it holds no numbers
pub fn numeric_bounds(table: &Table, column: &str) -> StoreResult<Option<(f64, f64)>> {
    let idx = column_index(table, column)?;

    let bounds = table
        .rows()
        .iter()
        .filter_map(|row| row[idx].as_f64())
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        });
    Ok(bounds)
}

/// Facet options and bounds for the search pages
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Facets {
    pub search_types: Vec<String>,
    pub countries: Vec<String>,
    pub violations: Vec<String>,
    pub genders: Vec<String>,
    pub age_bounds: Option<(f64, f64)>,
}

impl Facets {
    pub fn from_table(table: &Table) -> StoreResult<Self> {
        Ok(Self {
            search_types: facet_options(table, "search_type")?,
            countries: facet_options(table, "country_name")?,
            violations: facet_options(table, "violation")?,
            genders: facet_options(table, "driver_gender")?,
            age_bounds: numeric_bounds(table, "driver_age")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::StopRecord;
    use crate::testing::{record, seed, temp_store};

    fn loaded(stops: &[StopRecord]) -> Table {
        let (store, _dir) = temp_store();
        seed(&store, stops);
        store.fetch_all().unwrap()
    }

    fn vehicle(number: Option<&str>) -> StopRecord {
        StopRecord {
            vehicle_number: number.map(str::to_string),
            ..record()
        }
    }

    #[test]
    fn test_contains_is_case_insensitive_and_skips_nulls() {
        let table = loaded(&[
            vehicle(Some("ABC123")),
            vehicle(Some("xabc-9")),
            vehicle(Some("ZZZ")),
            vehicle(None),
        ]);

        let hits = Filter::new()
            .and(Predicate::contains("vehicle_number", "aBc"))
            .apply(&table)
            .unwrap();
        let found: Vec<String> = hits
            .column_values("vehicle_number")
            .unwrap()
            .map(|v| v.to_string())
            .collect();
        assert_eq!(found, vec!["ABC123", "xabc-9"]);

        let everything = Filter::new()
            .and(Predicate::contains("vehicle_number", ""))
            .apply(&table)
            .unwrap();
        assert_eq!(everything.len(), 3);
    }

    #[test]
    fn test_equals_and_all_bypass() {
        let table = loaded(&[
            StopRecord { country_name: "India".into(), ..record() },
            StopRecord { country_name: "Canada".into(), ..record() },
            StopRecord { country_name: "India".into(), ..record() },
        ]);

        let india = Filter::new()
            .and(Predicate::equals("country_name", "India"))
            .apply(&table)
            .unwrap();
        assert_eq!(india.len(), 2);

        let all = Filter::new()
            .and(Predicate::equals("country_name", Selection::All))
            .apply(&table)
            .unwrap();
        assert_eq!(all, table);
    }

    #[test]
    fn test_flag_equality_accepts_text_selection() {
        let table = loaded(&[
            StopRecord { is_arrested: true, ..record() },
            record(),
        ]);

        let arrested = Filter::new()
            .and(Predicate::equals("is_arrested", Selection::parse(Some("1"))))
            .apply(&table)
            .unwrap();
        assert_eq!(arrested.len(), 1);
    }

    #[test]
    fn test_range_is_inclusive_and_skips_nulls() {
        let table = loaded(&[
            StopRecord { driver_age: Some(20), ..record() },
            StopRecord { driver_age: Some(30), ..record() },
            StopRecord { driver_age: Some(40), ..record() },
            StopRecord { driver_age: None, ..record() },
        ]);

        let hits = Filter::new()
            .and(Predicate::range("driver_age", 20.0, 30.0))
            .apply(&table)
            .unwrap();
        assert_eq!(hits.len(), 2);

        assert_eq!(numeric_bounds(&table, "driver_age").unwrap(), Some((20.0, 40.0)));
    }

    #[test]
    fn test_predicates_compose_with_and() {
        let table = loaded(&[
            StopRecord { country_name: "India".into(), driver_age: Some(22), ..record() },
            StopRecord { country_name: "India".into(), driver_age: Some(50), ..record() },
            StopRecord { country_name: "Canada".into(), driver_age: Some(22), ..record() },
        ]);

        let hits = Filter::new()
            .and(Predicate::equals("country_name", "India"))
            .and(Predicate::range("driver_age", 18.0, 25.0))
            .apply(&table)
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits.columns(), table.columns());
    }

    #[test]
    fn test_unknown_column() {
        let table = loaded(&[record()]);
        let err = Filter::new()
            .and(Predicate::contains("plate", "A"))
            .apply(&table)
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[test]
    fn test_facet_options_in_first_appearance_order() {
        let table = loaded(&[
            StopRecord { violation: "Speeding".into(), ..record() },
            StopRecord { violation: "Seatbelt".into(), ..record() },
            StopRecord { violation: "Speeding".into(), ..record() },
            StopRecord { search_type: None, ..record() },
        ]);

        assert_eq!(
            facet_options(&table, "violation").unwrap(),
            vec!["All", "Speeding", "Seatbelt"]
        );
        // search_type is null everywhere
        assert_eq!(facet_options(&table, "search_type").unwrap(), vec!["All"]);
    }

    #[test]
    fn test_facets_follow_reloaded_table() {
        let (store, _dir) = temp_store();
        seed(&store, &[record()]);
        let before = Facets::from_table(&store.fetch_all().unwrap()).unwrap();
        assert_eq!(before.countries, vec!["All", "Canada"]);

        seed(&store, &[StopRecord { country_name: "Brazil".into(), ..record() }]);
        let after = Facets::from_table(&store.fetch_all().unwrap()).unwrap();
        assert_eq!(after.countries, vec!["All", "Canada", "Brazil"]);
    }

    #[test]
    fn test_bounds_of_empty_table() {
        let table = loaded(&[]);
        assert_eq!(numeric_bounds(&table, "driver_age").unwrap(), None);
    }
}
