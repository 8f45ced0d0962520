//! Typed query results
//!
//! A [`Table`] is an ordered list of column descriptors plus rows of
//! [`Value`]s. The schema is checked once, when the table is built; after
//! that every row is known to have one value per column, each either null or
//! of the column's declared type.
//!
//! Tables produced by the store infer their column types from the SQLite
//! declared type (when the column maps straight to a table column) and from
//! the storage classes actually returned. A column whose values disagree with
//! its declared semantic type is typed as text instead of failing the query.

use chrono::{NaiveDate, NaiveTime, Timelike};
use rusqlite::types::Value as SqlValue;
use serde::{Serialize, Serializer};
use std::fmt;
use std::io;

use super::error::{StoreError, StoreResult};

/// Storage format for `stop_date`
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Storage format for `stop_time`
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Parse a stored date value
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

/// Parse a stored time value (`HH:MM:SS`, optional fraction, or `HH:MM`)
pub fn parse_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()
}

/// Semantic type of a result column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Integer,
    Real,
    Text,
    Date,
    Time,
}

impl ColumnType {
    /// Whether a value may be stored in a column of this type
    pub fn accepts(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (_, Value::Null)
                | (ColumnType::Integer, Value::Integer(_))
                | (ColumnType::Real, Value::Real(_))
                | (ColumnType::Text, Value::Text(_))
                | (ColumnType::Date, Value::Date(_))
                | (ColumnType::Time, Value::Time(_))
        )
    }

    /// Type implied by a SQLite declared column type alone
    fn from_declared(declared: &str) -> Self {
        match declared {
            "DATE" => ColumnType::Date,
            "TIME" => ColumnType::Time,
            d if d.contains("INT") => ColumnType::Integer,
            d if d.contains("REAL") || d.contains("FLOA") || d.contains("DOUB") => {
                ColumnType::Real
            }
            _ => ColumnType::Text,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Integer => write!(f, "integer"),
            ColumnType::Real => write!(f, "real"),
            ColumnType::Text => write!(f, "text"),
            ColumnType::Date => write!(f, "date"),
            ColumnType::Time => write!(f, "time"),
        }
    }
}

/// Column descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ColumnType,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: ColumnType) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// A single cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Date(NaiveDate),
    Time(NaiveTime),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view of integer and real values
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Real(r) => Some(*r),
            _ => None,
        }
    }

    /// Hour of day for time values (or text holding a time)
    pub fn hour(&self) -> Option<u32> {
        match self {
            Value::Time(t) => Some(t.hour()),
            Value::Text(s) => parse_time(s).map(|t| t.hour()),
            _ => None,
        }
    }

    /// Equality used by facet selections.
    ///
    /// Numbers compare numerically, everything else by its rendered text, so
    /// a selection of `"1"` matches an integer flag of `1`. Null never
    /// matches anything.
    pub fn loosely_equals(&self, other: &Value) -> bool {
        if self.is_null() || other.is_null() {
            return false;
        }
        match (self.as_f64(), other.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => self.to_string() == other.to_string(),
        }
    }

    fn from_sql(kind: ColumnType, value: SqlValue) -> Self {
        match value {
            SqlValue::Null => Value::Null,
            SqlValue::Integer(i) => match kind {
                ColumnType::Integer => Value::Integer(i),
                ColumnType::Real => Value::Real(i as f64),
                _ => Value::Text(i.to_string()),
            },
            SqlValue::Real(r) => match kind {
                ColumnType::Real => Value::Real(r),
                _ => Value::Text(r.to_string()),
            },
            SqlValue::Text(s) => match kind {
                ColumnType::Date => parse_date(&s).map(Value::Date).unwrap_or(Value::Text(s)),
                ColumnType::Time => parse_time(&s).map(Value::Time).unwrap_or(Value::Text(s)),
                _ => Value::Text(s),
            },
            SqlValue::Blob(b) => Value::Text(String::from_utf8_lossy(&b).into_owned()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Real(r) => write!(f, "{}", r),
            Value::Text(s) => write!(f, "{}", s),
            Value::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            Value::Time(t) => write!(f, "{}", t.format(TIME_FORMAT)),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Real(r) => serializer.serialize_f64(*r),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Date(_) | Value::Time(_) => serializer.collect_str(self),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl From<NaiveTime> for Value {
    fn from(v: NaiveTime) -> Self {
        Value::Time(v)
    }
}

/// Result of a query: typed columns and rows matching them
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Build a table, checking every row against the column descriptors
    pub fn new(columns: Vec<Column>, rows: Vec<Vec<Value>>) -> StoreResult<Self> {
        for (idx, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(StoreError::Schema(format!(
                    "row {} has {} values, expected {}",
                    idx,
                    row.len(),
                    columns.len()
                )));
            }

            for (column, value) in columns.iter().zip(row) {
                if !column.kind.accepts(value) {
                    return Err(StoreError::Schema(format!(
                        "row {}: column '{}' is {} but holds {:?}",
                        idx, column.name, column.kind, value
                    )));
                }
            }
        }

        Ok(Self { columns, rows })
    }

    /// Build a table from raw SQLite output, inferring column types.
    ///
    /// `columns` pairs each column name with its declared type, if any.
    pub(crate) fn from_sqlite(
        columns: Vec<(String, Option<String>)>,
        raw_rows: Vec<Vec<SqlValue>>,
    ) -> Self {
        let kinds: Vec<ColumnType> = columns
            .iter()
            .enumerate()
            .map(|(idx, (_, declared))| {
                infer_kind(declared.as_deref(), raw_rows.iter().map(|row| &row[idx]))
            })
            .collect();

        let rows = raw_rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .zip(&kinds)
                    .map(|(value, kind)| Value::from_sql(*kind, value))
                    .collect()
            })
            .collect();

        let columns = columns
            .into_iter()
            .zip(kinds)
            .map(|((name, _), kind)| Column::new(name, kind))
            .collect();

        Self { columns, rows }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Value at a row for a named column
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// All values of a named column, in row order
    pub fn column_values<'a>(&'a self, column: &str) -> Option<impl Iterator<Item = &'a Value>> {
        let idx = self.column_index(column)?;
        Some(self.rows.iter().map(move |row| &row[idx]))
    }

    /// A new table with the same schema holding the rows `keep` accepts
    pub fn retain_rows<F>(&self, mut keep: F) -> Table
    where
        F: FnMut(&[Value]) -> bool,
    {
        Table {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .filter(|row| keep(row))
                .cloned()
                .collect(),
        }
    }

    /// Write the table as CSV: header of column names, one record per row
    pub fn write_csv<W: io::Write>(&self, writer: W) -> StoreResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(self.columns.iter().map(|c| c.name.as_str()))?;
        for row in &self.rows {
            csv_writer.write_record(row.iter().map(|v| v.to_string()))?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    pub fn to_csv_string(&self) -> StoreResult<String> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        String::from_utf8(buf).map_err(|e| StoreError::Schema(e.to_string()))
    }
}

/// Pick a column type from its declared type and the values returned
fn infer_kind<'a, I>(declared: Option<&str>, values: I) -> ColumnType
where
    I: Iterator<Item = &'a SqlValue> + Clone,
{
    let declared = declared.map(str::to_ascii_uppercase);

    let (mut saw_int, mut saw_real, mut saw_text) = (false, false, false);
    for value in values.clone() {
        match value {
            SqlValue::Null => {}
            SqlValue::Integer(_) => saw_int = true,
            SqlValue::Real(_) => saw_real = true,
            SqlValue::Text(_) | SqlValue::Blob(_) => saw_text = true,
        }
    }

    if !saw_int && !saw_real && !saw_text {
        return declared
            .as_deref()
            .map(ColumnType::from_declared)
            .unwrap_or(ColumnType::Text);
    }

    if !saw_int && !saw_real {
        let all_parse = |parse: fn(&str) -> bool| {
            values.clone().all(|v| match v {
                SqlValue::Text(s) => parse(s),
                SqlValue::Null => true,
                _ => false,
            })
        };

        match declared.as_deref() {
            Some("DATE") if all_parse(|s| parse_date(s).is_some()) => return ColumnType::Date,
            Some("TIME") if all_parse(|s| parse_time(s).is_some()) => return ColumnType::Time,
            _ => {}
        }
    }

    match (saw_int, saw_real, saw_text) {
        (_, _, true) => ColumnType::Text,
        (_, true, false) => ColumnType::Real,
        _ => ColumnType::Integer,
    }
}
