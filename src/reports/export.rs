//! CSV export of report results

use chrono::NaiveDateTime;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::store::{StoreError, StoreResult, Table};

/// Lower-case a report name and collapse non-alphanumeric runs to `_`
pub fn slugify(name: &str) -> StoreResult<String> {
    let re = regex::Regex::new(r"[^a-z0-9]+")
        .map_err(|e| StoreError::Validation(format!("slug pattern: {}", e)))?;

    let lower = name.to_lowercase();
    let slug = re.replace_all(&lower, "_");
    Ok(slug.trim_matches('_').to_string())
}

/// `<slug>_<YYYYMMDD_HHMMSS>.csv`
pub fn export_filename(name: &str, at: NaiveDateTime) -> StoreResult<String> {
    Ok(format!("{}_{}.csv", slugify(name)?, at.format("%Y%m%d_%H%M%S")))
}

/// Write a report result into `dir`, returning the file's path
pub fn write_export(table: &Table, dir: &Path, name: &str) -> StoreResult<PathBuf> {
    std::fs::create_dir_all(dir)?;

    let filename = export_filename(name, chrono::Local::now().naive_local())?;
    let path = dir.join(filename);

    let file = File::create(&path)?;
    table.write_csv(BufWriter::new(file))?;

    tracing::info!(report = name, path = %path.display(), rows = table.len(), "Report exported");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::{ReportCatalog, ReportTier};
    use crate::records::StopRecord;
    use crate::testing::{record, seed, temp_store};
    use chrono::NaiveDate;

    #[test]
    fn test_slugify() {
        assert_eq!(
            slugify("Top 10 Vehicles in Drug-Related Stops").unwrap(),
            "top_10_vehicles_in_drug_related_stops"
        );
        assert_eq!(
            slugify("Most Common Violations Among Younger Drivers (<25)").unwrap(),
            "most_common_violations_among_younger_drivers_25"
        );
        assert_eq!(
            slugify("Race & Gender Combination - Highest Search Rate").unwrap(),
            "race_gender_combination_highest_search_rate"
        );
    }

    #[test]
    fn test_export_filename() {
        let at = NaiveDate::from_ymd_opt(2024, 7, 9)
            .unwrap()
            .and_hms_opt(8, 5, 3)
            .unwrap();
        assert_eq!(
            export_filename("Night Stops vs Arrests", at).unwrap(),
            "night_stops_vs_arrests_20240709_080503.csv"
        );
    }

    #[test]
    fn test_export_round_trip() {
        let (store, dir) = temp_store();
        let stops: Vec<StopRecord> = ["Canada", "Canada", "India"]
            .into_iter()
            .map(|country| StopRecord {
                country_name: country.to_string(),
                is_arrested: country == "India",
                ..record()
            })
            .collect();
        seed(&store, &stops);

        let catalog = ReportCatalog::new(store);
        let name = "Countries with Highest Drug-Related Stops Rate";
        let table = catalog.run(ReportTier::Standard, name).unwrap();

        let out = dir.path().join("exports");
        let path = write_export(&table, &out, name).unwrap();
        let filename = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(filename.starts_with("countries_with_highest_drug_related_stops_rate_"));
        assert!(filename.ends_with(".csv"));

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, table.column_names());

        let rows: Vec<Vec<String>> = reader
            .records()
            .map(|r| r.unwrap().iter().map(String::from).collect())
            .collect();
        let expected: Vec<Vec<String>> = table
            .rows()
            .iter()
            .map(|row| row.iter().map(|v| v.to_string()).collect())
            .collect();
        assert_eq!(rows, expected);
        assert_eq!(rows.len(), 2);
    }
}
